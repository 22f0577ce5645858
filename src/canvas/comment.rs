use super::{ItemId, Position};

/// A free-text note on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: ItemId,
    pub position: Position,
    pub text: String,
}

impl Comment {
    pub fn new(id: ItemId, position: Position, text: impl Into<String>) -> Self {
        Self {
            id,
            position,
            text: text.into(),
        }
    }
}
