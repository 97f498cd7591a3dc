// crates/aiva-editor/src/history.rs
//
// Snapshot undo/redo over Timeline values. Timelines are plain values, so a
// snapshot is just a clone taken before the mutation.

use std::collections::VecDeque;

use aiva_core::state::Timeline;

#[derive(Debug, Clone)]
pub struct History {
    /// Oldest snapshot at the front; evicted first once `depth` is reached.
    undo:  VecDeque<Timeline>,
    redo:  Vec<Timeline>,
    depth: usize,
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), depth: depth.max(1) }
    }

    /// Record `before` as the state to return to. Clears the redo stack.
    pub fn push(&mut self, before: &Timeline) {
        self.remember(before.clone());
        self.redo.clear();
    }

    fn remember(&mut self, snapshot: Timeline) {
        if self.undo.len() == self.depth {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
    }

    /// Swap `current` with the most recent snapshot. Returns `current`
    /// unchanged when there is nothing to undo.
    pub fn undo(&mut self, current: Timeline) -> Timeline {
        match self.undo.pop_back() {
            Some(prev) => {
                self.redo.push(current);
                prev
            }
            None => current,
        }
    }

    pub fn redo(&mut self, current: Timeline) -> Timeline {
        match self.redo.pop() {
            Some(next) => {
                self.remember(current);
                next
            }
            None => current,
        }
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

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiva_core::state::TrackKind;

    fn with_tracks(n: usize) -> Timeline {
        (0..n).fold(Timeline::new(), |tl, _| tl.add_track(TrackKind::Video).0)
    }

    #[test]
    fn undo_then_redo_restores() {
        let mut h = History::new(10);
        let a = with_tracks(1);
        let b = a.clone().add_track(TrackKind::Audio).0;
        h.push(&a);

        let back = h.undo(b.clone());
        assert_eq!(back, a);
        let fwd = h.redo(back);
        assert_eq!(fwd, b);
    }

    #[test]
    fn empty_history_returns_current() {
        let mut h = History::default();
        let tl = with_tracks(2);
        assert_eq!(h.undo(tl.clone()), tl);
        assert_eq!(h.redo(tl.clone()), tl);
    }

    #[test]
    fn push_clears_redo() {
        let mut h = History::new(10);
        let a = with_tracks(1);
        h.push(&a);
        let _ = h.undo(with_tracks(2));
        assert!(h.can_redo());
        h.push(&a);
        assert!(!h.can_redo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut h = History::new(2);
        for n in 0..5 {
            h.push(&with_tracks(n));
        }
        let tl = h.undo(with_tracks(9));
        assert_eq!(tl.video_tracks.len(), 4);
        let tl = h.undo(tl);
        assert_eq!(tl.video_tracks.len(), 3);
        assert!(!h.can_undo());
    }

    #[test]
    fn long_sessions_stay_within_depth() {
        let mut h = History::new(3);
        for n in 0..1000 {
            h.push(&with_tracks(n % 7));
            assert!(h.undo_len() <= 3);
        }
        let tl = h.undo(with_tracks(0));
        assert_eq!(tl.video_tracks.len(), 999 % 7);
    }

    #[test]
    fn redo_respects_depth() {
        let mut h = History::new(2);
        h.push(&with_tracks(1));
        h.push(&with_tracks(2));
        let tl = h.undo(with_tracks(3));
        assert_eq!(h.undo_len(), 1);
        let _ = h.redo(tl);
        assert_eq!(h.undo_len(), 2);
    }
}
