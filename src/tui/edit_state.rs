//! Viewing/editing state machine for server-backed entities
//!
//! The snapshot is always the latest server value. While viewing, new server
//! data replaces what is shown; while editing, it replaces only the snapshot
//! so in-progress edits survive a background refetch.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState<T> {
    Viewing(T),
    Editing { snapshot: T, draft: T },
}

impl<T: Clone> EditState<T> {
    pub fn new(snapshot: T) -> Self {
        EditState::Viewing(snapshot)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing { .. })
    }

    /// Latest server value
    pub fn snapshot(&self) -> &T {
        match self {
            EditState::Viewing(snapshot) | EditState::Editing { snapshot, .. } => snapshot,
        }
    }

    /// What is displayed: the draft while editing, otherwise the snapshot
    pub fn current(&self) -> &T {
        match self {
            EditState::Viewing(snapshot) => snapshot,
            EditState::Editing { draft, .. } => draft,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self {
            EditState::Viewing(_) => None,
            EditState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Start editing with a draft copied from the snapshot
    pub fn begin(self) -> Self {
        match self {
            EditState::Viewing(snapshot) => EditState::Editing {
                draft: snapshot.clone(),
                snapshot,
            },
            editing => editing,
        }
    }

    /// Discard the draft
    pub fn cancel(self) -> Self {
        match self {
            EditState::Viewing(snapshot) | EditState::Editing { snapshot, .. } => {
                EditState::Viewing(snapshot)
            }
        }
    }

    /// Apply new server data
    pub fn sync(self, snapshot: T) -> Self {
        match self {
            EditState::Viewing(_) => EditState::Viewing(snapshot),
            EditState::Editing { draft, .. } => EditState::Editing { snapshot, draft },
        }
    }

    /// Leave editing after a confirmed save
    pub fn finish(self) -> Self {
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_copies_snapshot() {
        let state = EditState::new("a".to_string()).begin();
        assert!(state.is_editing());
        assert_eq!(state.current(), "a");
    }

    #[test]
    fn test_sync_while_viewing_replaces_display() {
        let state = EditState::new(1).sync(2);
        assert_eq!(state, EditState::Viewing(2));
    }

    #[test]
    fn test_sync_while_editing_keeps_draft() {
        let mut state = EditState::new(1).begin();
        *state.draft_mut().unwrap() = 5;
        let state = state.sync(2);
        assert_eq!(state.current(), &5);
        assert_eq!(state.snapshot(), &2);
    }

    #[test]
    fn test_cancel_restores_latest_snapshot() {
        let mut state = EditState::new(1).begin();
        *state.draft_mut().unwrap() = 5;
        let state = state.sync(3).cancel();
        assert_eq!(state, EditState::Viewing(3));
    }

    #[test]
    fn test_begin_while_editing_keeps_draft() {
        let mut state = EditState::new(1).begin();
        *state.draft_mut().unwrap() = 9;
        assert_eq!(state.begin().current(), &9);
    }
}
