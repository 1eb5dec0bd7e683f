//! Queue navigation
//!
//! Pure wraparound arithmetic over a queue length, kept apart from the store so the
//! index math can be tested on its own.

/// Direction of a relative move through the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end; wraps `len - 1 -> 0`
    Forward,
    /// Towards the start; wraps `0 -> len - 1`
    Backward,
}

/// Index reached by moving one song from `current` in `direction`
///
/// Returns `None` for an empty queue. A `current` that is already out of range is
/// reduced modulo `len` first.
pub fn step(current: usize, len: usize, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let current = current % len;
    let next = match direction {
        Direction::Forward => (current + 1) % len,
        Direction::Backward => (current + len - 1) % len,
    };

    Some(next)
}

/// Validate a client-supplied index against the queue length at apply time
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&index| index < len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_advances() {
        assert_eq!(step(0, 3, Direction::Forward), Some(1));
        assert_eq!(step(1, 3, Direction::Forward), Some(2));
    }

    #[test]
    fn forward_wraps_to_start() {
        assert_eq!(step(2, 3, Direction::Forward), Some(0));
    }

    #[test]
    fn backward_wraps_to_end() {
        assert_eq!(step(0, 3, Direction::Backward), Some(2));
        assert_eq!(step(2, 3, Direction::Backward), Some(1));
    }

    #[test]
    fn single_song_stays_put() {
        assert_eq!(step(0, 1, Direction::Forward), Some(0));
        assert_eq!(step(0, 1, Direction::Backward), Some(0));
    }

    #[test]
    fn empty_queue_has_no_step() {
        assert_eq!(step(0, 0, Direction::Forward), None);
        assert_eq!(step(0, 0, Direction::Backward), None);
    }

    #[test]
    fn out_of_range_current_is_reduced() {
        assert_eq!(step(5, 3, Direction::Forward), Some(0));
    }

    #[test]
    fn resolve_index_bounds() {
        assert_eq!(resolve_index(0, 2), Some(0));
        assert_eq!(resolve_index(1, 2), Some(1));
        assert_eq!(resolve_index(2, 2), None);
        assert_eq!(resolve_index(-1, 2), None);
        assert_eq!(resolve_index(0, 0), None);
    }
}
