//! Collaborators the editor consumes but does not own.
//!
//! Templates and project resources are supplied by the host application
//! through the [`TemplateRegistry`] and [`ResourceLookup`] traits. In-memory
//! implementations are provided for tools and tests.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod resource;
pub mod template;

pub use resource::{
    AssetResource, ContainerResource, GroupResource, MemoryResources, ProjectResource,
    ResourceLookup,
};
pub use template::{BehaviourDefinition, MemoryTemplates, TemplateRegistry};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id! {
    /// Identifies a registered node template.
    TemplateId
}

string_id! {
    /// Identifies a project resource (container, asset or group).
    ResourceId
}
