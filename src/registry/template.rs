use super::TemplateId;
use crate::portal::PortalDefinition;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The prototype a new behaviour is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourDefinition {
    pub name: String,
    #[serde(default)]
    pub portals: Vec<PortalDefinition>,
}

impl BehaviourDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            portals: Vec::new(),
        }
    }

    pub fn with_portal(mut self, portal: PortalDefinition) -> Self {
        self.portals.push(portal);
        self
    }
}

/// Resolves template ids to behaviour definitions.
pub trait TemplateRegistry {
    fn template(&self, id: &TemplateId) -> Option<&BehaviourDefinition>;
}

/// A template registry backed by a hash map.
///
/// Deserializes from a JSON object mapping template ids to definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryTemplates {
    templates: AHashMap<TemplateId, BehaviourDefinition>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(
        mut self,
        id: impl Into<TemplateId>,
        definition: BehaviourDefinition,
    ) -> Self {
        self.insert(id, definition);
        self
    }

    pub fn insert(&mut self, id: impl Into<TemplateId>, definition: BehaviourDefinition) {
        self.templates.insert(id.into(), definition);
    }

    pub fn ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRegistry for MemoryTemplates {
    fn template(&self, id: &TemplateId) -> Option<&BehaviourDefinition> {
        self.templates.get(id)
    }
}
