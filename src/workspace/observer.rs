use super::Workspace;

/// Receives the workspace `change` signal.
///
/// The signal carries no payload. Observers get a shared reference to the
/// workspace and re-read whatever state they render; they cannot mutate it.
/// Any `FnMut(&Workspace)` closure is an observer.
pub trait ChangeObserver {
    fn on_change(&mut self, workspace: &Workspace);
}

impl<F> ChangeObserver for F
where
    F: FnMut(&Workspace),
{
    fn on_change(&mut self, workspace: &Workspace) {
        self(workspace)
    }
}

/// Handle returned by [`Workspace::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn ChangeObserver>)>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Box<dyn ChangeObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        before != self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn take(&mut self) -> Vec<(SubscriptionId, Box<dyn ChangeObserver>)> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn restore(&mut self, entries: Vec<(SubscriptionId, Box<dyn ChangeObserver>)>) {
        self.entries = entries;
    }
}
