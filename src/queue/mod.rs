use crate::catalog::models::Track;
use rand::seq::SliceRandom;

/// Playback queue.
///
/// `ordering` is the playback order as indices into `entries`: the
/// identity when shuffle is off, a random permutation otherwise. Keeping
/// it around in both modes means stepping never branches on the shuffle
/// flag.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    entries: Vec<Track>,
    ordering: Vec<usize>,
    pos: Option<usize>,
    shuffle: bool,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Track) {
        self.entries.push(track);
        self.rebuild_order();
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.pos = match self.pos {
            Some(p) if index < p => Some(p - 1),
            // The playing entry itself went away; stay put so the next
            // track slides into its place, clamped at the new end.
            Some(p) if index == p => {
                if self.entries.is_empty() {
                    None
                } else {
                    Some(p.min(self.entries.len() - 1))
                }
            }
            other => other,
        };
        self.rebuild_order();
        Some(removed)
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.entries.len() || to >= self.entries.len() {
            return;
        }
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.pos = self.pos.map(|p| {
            if p == from {
                to
            } else if from < p && p <= to {
                p - 1
            } else if to <= p && p < from {
                p + 1
            } else {
                p
            }
        });
        self.rebuild_order();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ordering.clear();
        self.pos = None;
    }

    /// Flip shuffle and report the new state.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.rebuild_order();
        self.shuffle
    }

    pub fn shuffling(&self) -> bool {
        self.shuffle
    }

    pub fn jump(&mut self, index: usize) {
        if index < self.entries.len() {
            self.pos = Some(index);
        }
    }

    pub fn playing(&self) -> Option<&Track> {
        self.entries.get(self.pos?)
    }

    pub fn playing_index(&self) -> Option<usize> {
        self.pos
    }

    pub fn step_forward(&mut self) -> Option<&Track> {
        self.step(1)
    }

    pub fn step_back(&mut self) -> Option<&Track> {
        self.step(-1)
    }

    /// Back to the first entry in playback order (repeat-all wrap).
    pub fn restart(&mut self) -> Option<&Track> {
        self.pos = self.ordering.first().copied();
        self.playing()
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn step(&mut self, dir: isize) -> Option<&Track> {
        let slot = self.ordering.iter().position(|&i| Some(i) == self.pos)?;
        let target = *self.ordering.get(slot.checked_add_signed(dir)?)?;
        self.pos = Some(target);
        self.entries.get(target)
    }

    fn rebuild_order(&mut self) {
        self.ordering = (0..self.entries.len()).collect();
        if !self.shuffle {
            return;
        }
        self.ordering.shuffle(&mut rand::rng());
        // Whatever is playing moves to the front so the remainder of
        // the permutation plays after it.
        if let Some(p) = self.pos
            && let Some(slot) = self.ordering.iter().position(|&i| i == p)
        {
            self.ordering.swap(0, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> Track {
        Track {
            id: id.into(),
            title: format!("Song {id}"),
            artists: vec!["Band".into()],
            album: None,
            duration_seconds: Some(200),
            downloads: Vec::new(),
        }
    }

    fn filled(ids: &[&str]) -> Queue {
        let mut q = Queue::new();
        for id in ids {
            q.push(song(id));
        }
        q.jump(0);
        q
    }

    #[test]
    fn test_push_and_len() {
        let mut q = Queue::new();
        assert!(q.is_empty());
        q.push(song("a"));
        q.push(song("b"));
        assert_eq!(q.len(), 2);
        assert!(q.playing().is_none());
    }

    #[test]
    fn test_linear_stepping() {
        let mut q = filled(&["a", "b", "c"]);
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("a"));
        assert_eq!(q.step_forward().map(|t| t.id.as_str()), Some("b"));
        assert_eq!(q.step_forward().map(|t| t.id.as_str()), Some("c"));
        assert!(q.step_forward().is_none());
        // Position is unchanged after a failed step.
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("c"));
        assert_eq!(q.step_back().map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn test_step_back_stops_at_front() {
        let mut q = filled(&["a", "b"]);
        assert!(q.step_back().is_none());
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn test_remove_keeps_playing_entry() {
        let mut q = filled(&["a", "b", "c"]);
        q.jump(1);

        q.remove_at(0);
        assert_eq!(q.playing_index(), Some(0));
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("b"));

        // Removing the playing entry clamps to the new end.
        q.remove_at(0);
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("c"));
        q.remove_at(0);
        assert!(q.playing().is_none());
    }

    #[test]
    fn test_reorder_follows_playing_entry() {
        let mut q = filled(&["a", "b", "c"]);
        q.reorder(0, 2);
        assert_eq!(q.playing_index(), Some(2));
        assert_eq!(q.playing().map(|t| t.id.as_str()), Some("a"));

        let order: Vec<_> = q.entries().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_shuffle_covers_every_entry_once() {
        let mut q = filled(&["a", "b", "c", "d", "e"]);
        q.toggle_shuffle();

        let mut seen = vec![q.playing().map(|t| t.id.clone())];
        while let Some(t) = q.step_forward() {
            seen.push(Some(t.id.clone()));
        }
        let mut seen: Vec<_> = seen.into_iter().flatten().collect();
        seen.sort();
        assert_eq!(seen, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_restart_goes_to_playback_order_front() {
        let mut q = filled(&["a", "b", "c"]);
        q.step_forward();
        q.step_forward();
        assert_eq!(q.restart().map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn test_clear() {
        let mut q = filled(&["a", "b"]);
        q.clear();
        assert!(q.is_empty());
        assert!(q.playing().is_none());
        assert!(q.step_forward().is_none());
    }
}
