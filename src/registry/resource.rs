use super::ResourceId;
use crate::snapshot::WorkspaceSnapshot;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A persisted graph that can be embedded in other graphs as an instance node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerResource {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub snapshot: WorkspaceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResource {
    pub id: ResourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResource {
    pub id: ResourceId,
    pub name: String,
}

/// Anything a user can drag from the project onto the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProjectResource {
    Container(ContainerResource),
    Asset(AssetResource),
    Group(GroupResource),
}

impl ProjectResource {
    pub fn id(&self) -> &ResourceId {
        match self {
            ProjectResource::Container(c) => &c.id,
            ProjectResource::Asset(a) => &a.id,
            ProjectResource::Group(g) => &g.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProjectResource::Container(c) => &c.name,
            ProjectResource::Asset(a) => &a.name,
            ProjectResource::Group(g) => &g.name,
        }
    }
}

/// Resolves resource ids to loaded project resources.
pub trait ResourceLookup {
    fn resource(&self, id: &ResourceId) -> Option<&ProjectResource>;

    /// Resolves `id` only if it names a container.
    fn container(&self, id: &ResourceId) -> Option<&ContainerResource> {
        match self.resource(id)? {
            ProjectResource::Container(c) => Some(c),
            _ => None,
        }
    }
}

/// A resource lookup backed by a hash map.
///
/// Deserializes from a JSON array of resources.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    resources: AHashMap<ResourceId, ProjectResource>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: ProjectResource) -> Self {
        self.insert(resource);
        self
    }

    pub fn insert(&mut self, resource: ProjectResource) {
        self.resources.insert(resource.id().clone(), resource);
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let list: Vec<ProjectResource> = serde_json::from_str(json)?;
        Ok(list.into_iter().fold(Self::new(), Self::with_resource))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceLookup for MemoryResources {
    fn resource(&self, id: &ResourceId) -> Option<&ProjectResource> {
        self.resources.get(id)
    }
}
