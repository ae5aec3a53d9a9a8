//! Ordered cue lists and a driver that fires them against a clock.

/// An action scheduled `offset_ms` after the timeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue<A> {
    pub offset_ms: u64,
    pub action: A,
}

/// Cues sorted by offset. Cues sharing an offset keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<A> {
    cues: Vec<Cue<A>>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self { cues: Vec::new() }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cue(mut self, offset_ms: u64, action: A) -> Self {
        // insert after every cue with offset <= this one so ties stay stable
        let at = self.cues.partition_point(|c| c.offset_ms <= offset_ms);
        self.cues.insert(at, Cue { offset_ms, action });
        self
    }

    pub fn cues(&self) -> &[Cue<A>] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl<A> FromIterator<(u64, A)> for Timeline<A> {
    fn from_iter<I: IntoIterator<Item = (u64, A)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Timeline::new(), |t, (offset, action)| t.cue(offset, action))
    }
}

/// Something that can be woken at a deadline and asked for the work that is due.
///
/// The browser runner arms one timeout for `next_deadline`, and tests call
/// `advance_to` with a virtual time.
pub trait Schedule {
    type Cue;

    /// Absolute time (ms) of the next pending cue.
    fn next_deadline(&self) -> Option<i64>;

    /// Fires every cue due at or before `now_ms`, in order.
    fn advance_to(&mut self, now_ms: i64) -> Vec<Self::Cue>;

    /// Drops all pending cues.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Idle,
    Running { started_at: i64 },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TimelineDriver<A> {
    timeline: Timeline<A>,
    state: DriverState,
    fired: usize,
}

impl<A: Clone> TimelineDriver<A> {
    pub fn new(timeline: Timeline<A>) -> Self {
        Self {
            timeline,
            state: DriverState::Idle,
            fired: 0,
        }
    }

    /// Sets the reference time every offset is measured from.
    /// Starting twice keeps the first reference.
    pub fn start(&mut self, now_ms: i64) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running { started_at: now_ms };
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. }) && !self.is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == DriverState::Cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.fired == self.timeline.len()
    }

    pub fn fired(&self) -> usize {
        self.fired
    }
}

impl<A: Clone> Schedule for TimelineDriver<A> {
    type Cue = A;

    fn next_deadline(&self) -> Option<i64> {
        let DriverState::Running { started_at } = self.state else {
            return None;
        };
        self.timeline
            .cues()
            .get(self.fired)
            .map(|c| started_at + c.offset_ms as i64)
    }

    fn advance_to(&mut self, now_ms: i64) -> Vec<A> {
        let DriverState::Running { started_at } = self.state else {
            return Vec::new();
        };
        let elapsed = now_ms - started_at;
        let mut due = Vec::new();
        while let Some(cue) = self.timeline.cues().get(self.fired) {
            if cue.offset_ms as i64 > elapsed {
                break;
            }
            due.push(cue.action.clone());
            self.fired += 1;
        }
        due
    }

    fn cancel(&mut self) {
        self.state = DriverState::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_sorted_with_stable_ties() {
        let t = Timeline::new()
            .cue(300, "c")
            .cue(100, "a")
            .cue(300, "d")
            .cue(200, "b");
        let order = t.cues().iter().map(|c| c.action).collect::<Vec<_>>();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_nothing_fires_before_start() {
        let mut d = TimelineDriver::new(Timeline::from_iter([(0, 1), (10, 2)]));
        assert_eq!(d.next_deadline(), None);
        assert!(d.advance_to(1_000).is_empty());
    }

    #[test]
    fn test_advance_fires_due_cues_in_order() {
        let mut d = TimelineDriver::new(Timeline::from_iter([(100, 'a'), (900, 'b'), (2000, 'c')]));
        d.start(5_000);
        assert_eq!(d.next_deadline(), Some(5_100));
        assert!(d.advance_to(5_099).is_empty());
        assert_eq!(d.advance_to(5_100), vec!['a']);
        assert_eq!(d.next_deadline(), Some(5_900));
        // a late wake-up fires everything that is overdue, still in order
        assert_eq!(d.advance_to(10_000), vec!['b', 'c']);
        assert!(d.is_finished());
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn test_cancel_drops_pending_cues() {
        let mut d = TimelineDriver::new(Timeline::from_iter([(10, 1), (20, 2)]));
        d.start(0);
        assert_eq!(d.advance_to(10), vec![1]);
        d.cancel();
        assert!(d.is_cancelled());
        assert_eq!(d.next_deadline(), None);
        assert!(d.advance_to(100).is_empty());
        assert_eq!(d.fired(), 1);
    }

    #[test]
    fn test_restart_keeps_first_reference() {
        let mut d = TimelineDriver::new(Timeline::from_iter([(10, ())]));
        d.start(0);
        d.start(500);
        assert_eq!(d.next_deadline(), Some(10));
    }

    #[test]
    fn test_cancelled_driver_cannot_restart() {
        let mut d = TimelineDriver::new(Timeline::from_iter([(10, ())]));
        d.cancel();
        d.start(0);
        assert!(!d.is_running());
        assert_eq!(d.next_deadline(), None);
    }
}
