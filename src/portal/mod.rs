use crate::canvas::ItemId;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod rules;

pub use rules::TypeRules;

/// The role a portal plays on its behaviour.
///
/// `Output` and `Product` portals are link sources; `Input` and `Parameter`
/// portals are link sinks. Inputs and outputs carry control flow, parameters
/// and products carry typed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalKind {
    Input,
    Output,
    Parameter,
    Product,
}

impl PortalKind {
    /// Returns `true` for kinds a link may start from.
    pub fn is_source(self) -> bool {
        matches!(self, PortalKind::Output | PortalKind::Product)
    }

    /// Returns `true` for kinds that only carry control flow.
    pub fn is_control(self) -> bool {
        matches!(self, PortalKind::Input | PortalKind::Output)
    }
}

impl fmt::Display for PortalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortalKind::Input => "input",
            PortalKind::Output => "output",
            PortalKind::Parameter => "parameter",
            PortalKind::Product => "product",
        };
        write!(f, "{}", name)
    }
}

/// The semantic type of the value a portal carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Number,
    Int,
    String,
    Bool,
    /// The generic "any" type; every product may feed an object parameter.
    Object,
    Asset,
    Group,
    File,
    Color,
    Enum,
    Hidden,
}

impl DataType {
    /// Checks whether `value` is a legal value for a portal of this type.
    /// `Null` is always accepted and means "unset". Numbers must be finite,
    /// since JSON has no representation for NaN or infinity.
    pub fn accepts(self, value: &PortalValue) -> bool {
        match (self, value) {
            (_, PortalValue::Null) => true,
            (_, PortalValue::Number(n)) if !n.is_finite() => false,
            (DataType::Object, _) => true,
            (DataType::Bool, PortalValue::Bool(_)) => true,
            (DataType::Number, PortalValue::Number(_)) => true,
            (DataType::Int, PortalValue::Number(n)) => n.fract() == 0.0,
            (DataType::String | DataType::Hidden, PortalValue::Text(_)) => true,
            (DataType::Color, PortalValue::Color(_)) => true,
            (DataType::Enum, PortalValue::Choice(_)) => true,
            (DataType::Asset | DataType::Group | DataType::File, PortalValue::Reference(_)) => true,
            _ => false,
        }
    }

    /// The value a freshly created portal of this type starts with.
    pub fn default_value(self) -> PortalValue {
        match self {
            DataType::Bool => PortalValue::Bool(false),
            DataType::Number | DataType::Int => PortalValue::Number(0.0),
            DataType::String | DataType::Hidden => PortalValue::Text(String::new()),
            DataType::Color => PortalValue::Color([255, 255, 255, 255]),
            _ => PortalValue::Null,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Number => "number",
            DataType::Int => "int",
            DataType::String => "string",
            DataType::Bool => "bool",
            DataType::Object => "object",
            DataType::Asset => "asset",
            DataType::Group => "group",
            DataType::File => "file",
            DataType::Color => "color",
            DataType::Enum => "enum",
            DataType::Hidden => "hidden",
        };
        write!(f, "{}", name)
    }
}

/// A value stored on a portal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// RGBA.
    Color([u8; 4]),
    /// The selected option of an enum portal.
    Choice(String),
    /// An asset, group or file identifier.
    Reference(String),
}

impl fmt::Display for PortalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalValue::Null => write!(f, "null"),
            PortalValue::Bool(b) => write!(f, "{}", b),
            PortalValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            PortalValue::Text(s) | PortalValue::Choice(s) => write!(f, "\"{}\"", s),
            PortalValue::Color([r, g, b, a]) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
            PortalValue::Reference(id) => write!(f, "&{}", id),
        }
    }
}

/// Addresses a portal by its owning item and its name.
///
/// Portal names are unique within their owner, so the pair is a stable
/// identifier that survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortalRef {
    pub item: ItemId,
    pub portal: String,
}

impl PortalRef {
    pub fn new(item: ItemId, portal: impl Into<String>) -> Self {
        Self {
            item,
            portal: portal.into(),
        }
    }
}

impl fmt::Display for PortalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.item, self.portal)
    }
}

/// The persisted description of a portal, as found in templates and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalDefinition {
    pub name: String,
    pub kind: PortalKind,
    pub data_type: DataType,
    #[serde(default)]
    pub value: PortalValue,
}

impl PortalDefinition {
    pub fn new(name: impl Into<String>, kind: PortalKind, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            kind,
            data_type,
            value: data_type.default_value(),
        }
    }

    pub fn with_value(mut self, value: PortalValue) -> Self {
        self.value = value;
        self
    }
}

/// A typed connection point owned by a behaviour or a container portal item.
///
/// The kind and data type are fixed at construction. The `links` list is a
/// non-owning index maintained by the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    name: String,
    kind: PortalKind,
    data_type: DataType,
    value: PortalValue,
    links: Vec<ItemId>,
}

impl Portal {
    /// Builds a portal from its definition.
    ///
    /// Control-flow kinds are forced to `bool`; a definition asking for
    /// another type on an input or output is normalised rather than rejected.
    pub fn from_definition(definition: &PortalDefinition) -> Result<Self, ValidationError> {
        let (data_type, value) = if definition.kind.is_control() {
            let value = match definition.value {
                PortalValue::Bool(b) => PortalValue::Bool(b),
                _ => PortalValue::Bool(false),
            };
            (DataType::Bool, value)
        } else {
            (definition.data_type, definition.value.clone())
        };

        if !data_type.accepts(&value) {
            return Err(ValidationError::ValueTypeMismatch {
                portal: definition.name.clone(),
                data_type,
                value: value.to_string(),
            });
        }

        Ok(Self {
            name: definition.name.clone(),
            kind: definition.kind,
            data_type,
            value,
            links: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PortalKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn value(&self) -> &PortalValue {
        &self.value
    }

    /// Ids of the links touching this portal, in ascending order.
    pub fn links(&self) -> &[ItemId] {
        &self.links
    }

    /// Replaces the value, rejecting values the data type does not accept.
    pub fn set_value(&mut self, value: PortalValue) -> Result<(), ValidationError> {
        if !self.data_type.accepts(&value) {
            return Err(ValidationError::ValueTypeMismatch {
                portal: self.name.clone(),
                data_type: self.data_type,
                value: value.to_string(),
            });
        }
        self.value = value;
        Ok(())
    }

    pub(crate) fn set_links(&mut self, links: Vec<ItemId>) {
        self.links = links;
    }

    pub fn to_definition(&self) -> PortalDefinition {
        PortalDefinition {
            name: self.name.clone(),
            kind: self.kind,
            data_type: self.data_type,
            value: self.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_portals_are_always_boolean() {
        let def = PortalDefinition::new("start", PortalKind::Input, DataType::Number);
        let portal = Portal::from_definition(&def).unwrap();
        assert_eq!(portal.data_type(), DataType::Bool);
        assert_eq!(portal.value(), &PortalValue::Bool(false));
    }

    #[test]
    fn mismatched_default_value_is_rejected() {
        let def = PortalDefinition::new("speed", PortalKind::Parameter, DataType::Number)
            .with_value(PortalValue::Text("fast".to_string()));
        assert!(matches!(
            Portal::from_definition(&def),
            Err(ValidationError::ValueTypeMismatch { .. })
        ));
    }

    #[test]
    fn int_only_accepts_whole_numbers() {
        assert!(DataType::Int.accepts(&PortalValue::Number(3.0)));
        assert!(!DataType::Int.accepts(&PortalValue::Number(3.5)));
        assert!(DataType::Object.accepts(&PortalValue::Text("x".to_string())));
    }

    #[test]
    fn non_finite_numbers_are_never_accepted() {
        for data_type in [DataType::Number, DataType::Int, DataType::Object] {
            assert!(!data_type.accepts(&PortalValue::Number(f64::NAN)));
            assert!(!data_type.accepts(&PortalValue::Number(f64::INFINITY)));
            assert!(!data_type.accepts(&PortalValue::Number(f64::NEG_INFINITY)));
        }
        assert!(DataType::Number.accepts(&PortalValue::Number(-0.5)));
    }
}
