use crate::canvas::CanvasItem;

/// A primitive change to a workspace's item list.
///
/// Every action is recorded as a sequence of edits. Each edit carries the
/// full item state on both sides, so its inverse is exact and undo never has
/// to re-derive anything from the post-state.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Insert { index: usize, item: CanvasItem },
    Remove { index: usize, item: CanvasItem },
    Replace {
        index: usize,
        before: CanvasItem,
        after: CanvasItem,
    },
}

impl Edit {
    pub fn inverse(&self) -> Edit {
        match self {
            Edit::Insert { index, item } => Edit::Remove {
                index: *index,
                item: item.clone(),
            },
            Edit::Remove { index, item } => Edit::Insert {
                index: *index,
                item: item.clone(),
            },
            Edit::Replace {
                index,
                before,
                after,
            } => Edit::Replace {
                index: *index,
                before: after.clone(),
                after: before.clone(),
            },
        }
    }

    /// Inverts a whole edit sequence: each edit inverted, in reverse order.
    pub fn invert_all(edits: &[Edit]) -> Vec<Edit> {
        edits.iter().rev().map(Edit::inverse).collect()
    }
}
