use super::{CommentRecord, LinkRecord, NodeRecord, SnapshotItem, WorkspaceSnapshot};
use crate::error::SnapshotError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

const FORMAT_VERSION: u32 = 1;

/// Externally tagged mirror of [`SnapshotItem`].
///
/// Binary formats cannot drive the internally tagged JSON layout, so the
/// artifact carries the same records under a plain enum tag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
enum ArtifactItem {
    Behaviour(NodeRecord),
    Asset(NodeRecord),
    Instance(NodeRecord),
    Portal(NodeRecord),
    Link(LinkRecord),
    Comment(CommentRecord),
}

impl From<SnapshotItem> for ArtifactItem {
    fn from(item: SnapshotItem) -> Self {
        match item {
            SnapshotItem::Behaviour(n) => ArtifactItem::Behaviour(n),
            SnapshotItem::Asset(n) => ArtifactItem::Asset(n),
            SnapshotItem::Instance(n) => ArtifactItem::Instance(n),
            SnapshotItem::Portal(n) => ArtifactItem::Portal(n),
            SnapshotItem::Link(l) => ArtifactItem::Link(l),
            SnapshotItem::Comment(c) => ArtifactItem::Comment(c),
        }
    }
}

impl From<ArtifactItem> for SnapshotItem {
    fn from(item: ArtifactItem) -> Self {
        match item {
            ArtifactItem::Behaviour(n) => SnapshotItem::Behaviour(n),
            ArtifactItem::Asset(n) => SnapshotItem::Asset(n),
            ArtifactItem::Instance(n) => SnapshotItem::Instance(n),
            ArtifactItem::Portal(n) => SnapshotItem::Portal(n),
            ArtifactItem::Link(l) => SnapshotItem::Link(l),
            ArtifactItem::Comment(c) => SnapshotItem::Comment(c),
        }
    }
}

/// A compact binary form of a [`WorkspaceSnapshot`], stored with bincode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotArtifact {
    version: u32,
    items: Vec<ArtifactItem>,
}

impl From<WorkspaceSnapshot> for SnapshotArtifact {
    fn from(snapshot: WorkspaceSnapshot) -> Self {
        Self {
            version: FORMAT_VERSION,
            items: snapshot.items.into_iter().map(ArtifactItem::from).collect(),
        }
    }
}

impl SnapshotArtifact {
    pub fn into_snapshot(self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            items: self.items.into_iter().map(SnapshotItem::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard())
            .map_err(|e| SnapshotError::Binary(format!("Serialization failed: {}", e)))
    }

    /// Saves the artifact to a file.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads an artifact from a file.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let mut file = fs::File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SnapshotError::Io {
                path: path.to_string(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes an artifact from a byte slice, rejecting unknown format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let artifact: Self = decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact) // bincode 2 returns (data, bytes_read)
            .map_err(|e| SnapshotError::Binary(format!("Deserialization failed: {}", e)))?;
        if artifact.version != FORMAT_VERSION {
            return Err(SnapshotError::Binary(format!(
                "Unsupported artifact version {}",
                artifact.version
            )));
        }
        Ok(artifact)
    }
}
