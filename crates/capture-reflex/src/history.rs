//! Recent-position memory for loop detection.

use capture_engine::Position;

pub const HISTORY_CAPACITY: usize = 8;

/// Fixed-capacity ring buffer of the most recent positions, oldest first.
///
/// Pushing into a full buffer overwrites the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistory<const N: usize = HISTORY_CAPACITY> {
    slots: [Position; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Default for PositionHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PositionHistory<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [Position::new(0, 0); N],
            head: 0,
            len: 0,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, position: Position) {
        if N == 0 {
            return;
        }
        if self.len < N {
            self.slots[(self.head + self.len) % N] = position;
            self.len += 1;
        } else {
            self.slots[self.head] = position;
            self.head = (self.head + 1) % N;
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Position> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % N])
    }

    #[must_use]
    pub fn count(&self, position: Position) -> usize {
        self.iter().filter(|p| *p == position).count()
    }

    /// Whether pushing `candidate` would leave it at least `threshold` times
    /// in the window.
    #[must_use]
    pub fn would_repeat(&self, candidate: Position, threshold: usize) -> bool {
        let kept = N.saturating_sub(1);
        let earlier = self.iter().rev().take(kept).filter(|p| *p == candidate).count();
        earlier + 1 >= threshold
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Position = Position::new(1, 1);
    const B: Position = Position::new(2, 1);
    const C: Position = Position::new(3, 1);

    #[test]
    fn test_push_wraps_and_keeps_newest() {
        let mut history = PositionHistory::<3>::new();
        for x in 0..5 {
            history.push(Position::new(x, 0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec![Position::new(2, 0), Position::new(3, 0), Position::new(4, 0)]
        );
    }

    #[test]
    fn test_third_visit_repeats() {
        let mut history = PositionHistory::<HISTORY_CAPACITY>::new();
        history.push(A);
        history.push(B);
        history.push(A);
        history.push(B);
        assert!(history.would_repeat(A, 3));
        assert!(!history.would_repeat(C, 3));
    }

    #[test]
    fn test_second_visit_does_not_repeat() {
        let mut history = PositionHistory::<HISTORY_CAPACITY>::new();
        history.push(A);
        history.push(B);
        history.push(C);
        assert!(!history.would_repeat(A, 3));
    }

    #[test]
    fn test_old_visits_fall_out_of_window() {
        let mut history = PositionHistory::<HISTORY_CAPACITY>::new();
        history.push(A);
        history.push(A);
        for x in 10..16 {
            history.push(Position::new(x, 5));
        }
        assert_eq!(history.count(A), 2);
        // one of the two A entries is the oldest and drops out once the
        // candidate is added
        assert!(!history.would_repeat(A, 3));
    }

    #[test]
    fn test_clear_forgets_visits() {
        let mut history = PositionHistory::<3>::new();
        for x in 0..4 {
            history.push(Position::new(x, 0));
        }
        history.clear();
        assert!(history.is_empty());
        history.push(A);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![A]);
    }
}
