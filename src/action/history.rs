use crate::workspace::Edit;

/// One applied action: its name and the edits that performed it.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    pub(crate) serial: u64,
    pub(crate) kind: &'static str,
    pub(crate) edits: Vec<Edit>,
}

/// Linear undo/redo history.
///
/// Recording a new action after an undo discards the redo branch. The undo
/// stack is unbounded unless a limit is configured, in which case the oldest
/// records are dropped.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Record>,
    redo: Vec<Record>,
    limit: Option<usize>,
    next_serial: u64,
    saved_serial: u64,
    /// Serial of the newest record dropped by the limit; the state an empty
    /// undo stack stands for.
    floor_serial: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
            next_serial: 1,
            saved_serial: 0,
            floor_serial: 0,
        }
    }

    pub(crate) fn record(&mut self, kind: &'static str, edits: Vec<Edit>) {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.undo.push(Record {
            serial,
            kind,
            edits,
        });
        self.redo.clear();
        if let Some(limit) = self.limit {
            if self.undo.len() > limit {
                let excess = self.undo.len() - limit;
                if let Some(last) = self.undo.drain(..excess).last() {
                    self.floor_serial = last.serial;
                }
            }
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Record> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Record> {
        self.redo.pop()
    }

    pub(crate) fn push_undo(&mut self, record: Record) {
        self.undo.push(record);
    }

    pub(crate) fn push_redo(&mut self, record: Record) {
        self.redo.push(record);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The name of the action `undo` would revert.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.last().map(|r| r.kind)
    }

    /// The name of the action `redo` would re-apply.
    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo.last().map(|r| r.kind)
    }

    /// Identifies the current state: the serial of the newest applied record.
    fn current_serial(&self) -> u64 {
        self.undo.last().map_or(self.floor_serial, |r| r.serial)
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved_serial = self.current_serial();
    }

    /// `true` when the state differs from the last one marked as saved.
    pub fn is_dirty(&self) -> bool {
        self.current_serial() != self.saved_serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_drops_oldest_records() {
        let mut history = History::new(Some(2));
        history.record("A", Vec::new());
        history.record("B", Vec::new());
        history.record("C", Vec::new());
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo_label(), Some("C"));
    }

    #[test]
    fn dirty_tracks_saved_state() {
        let mut history = History::default();
        assert!(!history.is_dirty());
        history.record("A", Vec::new());
        assert!(history.is_dirty());
        history.mark_saved();
        assert!(!history.is_dirty());

        let record = history.pop_undo().unwrap();
        history.push_redo(record);
        assert!(history.is_dirty());

        let record = history.pop_redo().unwrap();
        history.push_undo(record);
        assert!(!history.is_dirty());
    }

    #[test]
    fn dropped_records_keep_the_state_dirty() {
        let mut history = History::new(Some(1));
        history.mark_saved();
        history.record("A", Vec::new());
        history.record("B", Vec::new());
        let record = history.pop_undo().unwrap();
        history.push_redo(record);
        assert!(!history.can_undo());
        assert!(history.is_dirty());

        let mut history = History::new(Some(0));
        history.record("A", Vec::new());
        assert!(!history.can_undo());
        assert!(history.is_dirty());
        history.mark_saved();
        assert!(!history.is_dirty());
    }
}
