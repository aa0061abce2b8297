//! Quiescence timer for the search box.

use std::time::{Duration, Instant};

/// Holds a settled value and at most one pending candidate.
///
/// The candidate replaces the settled value once `delay` has elapsed since
/// the last [`Debouncer::input`] call. Each input restarts the timer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    #[must_use]
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Promote the pending value if its deadline has passed.
    ///
    /// Returns the new settled value only when it actually changed.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let (_, deadline) = self.pending.as_ref()?;
        if now < *deadline {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value;
        Some(&self.settled)
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.settled
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn settles_after_quiescence() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);
        debouncer.input("a".to_string(), start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(499)), None);
        assert_eq!(
            debouncer.poll(start + DELAY).map(String::as_str),
            Some("a")
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.value(), "a");
    }

    #[test]
    fn every_input_restarts_the_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);
        debouncer.input("a".to_string(), start);
        debouncer.input("ab".to_string(), start + Duration::from_millis(300));
        debouncer.input("abc".to_string(), start + Duration::from_millis(600));

        // 500ms after the first keystroke, but only 200ms after the last.
        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
        assert_eq!(
            debouncer
                .poll(start + Duration::from_millis(1100))
                .map(String::as_str),
            Some("abc")
        );
        // Nothing left to promote.
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn reverting_to_settled_value_is_not_a_change() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("x".to_string(), DELAY);
        debouncer.input("xy".to_string(), start);
        debouncer.input("x".to_string(), start + Duration::from_millis(100));
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.value(), "x");
    }

    #[test]
    fn deadline_tracks_last_input() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0_u32, DELAY);
        assert_eq!(debouncer.deadline(), None);
        debouncer.input(1, start);
        debouncer.input(2, start + Duration::from_millis(100));
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(100) + DELAY)
        );
    }
}
