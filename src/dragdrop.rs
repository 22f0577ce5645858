//! The drag/drop payload exchanged with the view layer.
//!
//! A payload is JSON of the form `{ "type": "resource" | "template", "id": number | string }`.

use crate::action::Action;
use crate::error::ValidationError;
use crate::registry::{ResourceId, TemplateId};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    Resource(ResourceId),
    Template(TemplateId),
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<serde_json::Value>,
}

impl FromStr for DropPayload {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let payload: RawPayload = serde_json::from_str(raw)
            .map_err(|e| ValidationError::MalformedPayload(e.to_string()))?;

        let id = match payload.id {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(other) => {
                return Err(ValidationError::MalformedPayload(format!(
                    "id must be a number or a non-empty string, found {}",
                    other
                )));
            }
            None => return Err(ValidationError::MalformedPayload("missing id".to_string())),
        };

        match payload.kind.as_deref() {
            Some("resource") => Ok(DropPayload::Resource(ResourceId(id))),
            Some("template") => Ok(DropPayload::Template(TemplateId(id))),
            Some(other) => Err(ValidationError::MalformedPayload(format!(
                "unknown payload type '{}'",
                other
            ))),
            None => Err(ValidationError::MalformedPayload("missing type".to_string())),
        }
    }
}

impl DropPayload {
    /// The creation action this drop asks for at raw coordinates `(x, y)`.
    pub fn into_action(self, x: i32, y: i32) -> Action {
        match self {
            DropPayload::Resource(resource) => Action::DropResource { resource, x, y },
            DropPayload::Template(template) => Action::CreateBehaviour { template, x, y },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_are_accepted() {
        assert_eq!(
            "{\"type\":\"template\",\"id\":42}".parse::<DropPayload>(),
            Ok(DropPayload::Template(TemplateId::from("42")))
        );
        assert_eq!(
            "{\"type\":\"resource\",\"id\":\"scene-1\"}".parse::<DropPayload>(),
            Ok(DropPayload::Resource(ResourceId::from("scene-1")))
        );
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        for raw in [
            "not json",
            "{\"type\":\"template\"}",
            "{\"id\":3}",
            "{\"type\":\"folder\",\"id\":3}",
            "{\"type\":\"resource\",\"id\":null}",
            "{\"type\":\"resource\",\"id\":\"\"}",
        ] {
            assert!(
                matches!(raw.parse::<DropPayload>(), Err(ValidationError::MalformedPayload(_))),
                "payload {} should be rejected",
                raw
            );
        }
    }
}
