use super::{DataType, Portal, PortalKind, PortalRef};
use crate::error::ValidationError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Decides which portals may be linked.
///
/// Kind pairing is fixed: `output -> input` always links, `product -> parameter`
/// links when the data types agree, the parameter is `object`, or a converter
/// from the product's type to the parameter's type is registered. Nothing else
/// links.
///
/// # Example
///
/// ```rust
/// use kairo::portal::{DataType, TypeRules};
///
/// let rules = TypeRules::new().with_converter(DataType::Int, DataType::Number);
/// assert!(rules.has_converter(DataType::Int, DataType::Number));
/// assert!(!rules.has_converter(DataType::Number, DataType::Int));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRules {
    #[serde(default)]
    converters: AHashSet<(DataType, DataType)>,
}

impl Default for TypeRules {
    /// The standard numeric and textual coercions.
    fn default() -> Self {
        Self::new()
            .with_converter(DataType::Int, DataType::Number)
            .with_converter(DataType::Number, DataType::Int)
            .with_converter(DataType::Number, DataType::String)
            .with_converter(DataType::Int, DataType::String)
            .with_converter(DataType::Bool, DataType::String)
    }
}

impl TypeRules {
    /// Rules without any converters: only exact type matches and `object` parameters link.
    pub fn new() -> Self {
        Self {
            converters: AHashSet::new(),
        }
    }

    pub fn with_converter(mut self, from: DataType, to: DataType) -> Self {
        self.register_converter(from, to);
        self
    }

    pub fn register_converter(&mut self, from: DataType, to: DataType) {
        self.converters.insert((from, to));
    }

    pub fn has_converter(&self, from: DataType, to: DataType) -> bool {
        self.converters.contains(&(from, to))
    }

    /// Returns `true` when a link from `source` to `target` is allowed.
    pub fn can_link(&self, source: &Portal, target: &Portal) -> bool {
        match (source.kind(), target.kind()) {
            (PortalKind::Output, PortalKind::Input) => true,
            (PortalKind::Product, PortalKind::Parameter) => {
                let (from, to) = (source.data_type(), target.data_type());
                to == DataType::Object || from == to || self.has_converter(from, to)
            }
            _ => false,
        }
    }

    /// Like [`TypeRules::can_link`], but reports why a link is refused.
    pub fn check_link(
        &self,
        source_ref: &PortalRef,
        source: &Portal,
        target_ref: &PortalRef,
        target: &Portal,
    ) -> Result<(), ValidationError> {
        if self.can_link(source, target) {
            Ok(())
        } else {
            Err(ValidationError::IncompatibleLink {
                from: source_ref.clone(),
                from_kind: source.kind(),
                from_type: source.data_type(),
                to: target_ref.clone(),
                to_kind: target.kind(),
                to_type: target.data_type(),
            })
        }
    }
}
