//! Cancellable timers behind a host-provided clock.
//!
//! The controller never sleeps or reads the system clock itself. It asks a
//! [`Scheduler`] for the current time and for timer handles, and the host
//! delivers each fired [`Task`] back to whoever owns it. In the browser this
//! is `window.setInterval`; natively and in tests it is [`VirtualScheduler`].

/// Milliseconds, used for both timestamps and durations.
pub type Millis = u64;

/// What a scheduled callback is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Scramble the label once
    Tick,
    /// Run a deferred click action
    Commit,
}

/// Source of time and timers for a controller.
pub trait Scheduler {
    /// Owned token for a live timer. Consumed by [`Scheduler::cancel`].
    type Handle;

    /// Current time.
    fn now(&self) -> Millis;

    /// Start a timer that fires `task` every `interval` until cancelled.
    fn every(&mut self, interval: Millis, task: Task) -> Self::Handle;

    /// Start a timer that fires `task` once after `delay`.
    fn after(&mut self, delay: Millis, task: Task) -> Self::Handle;

    /// Stop a timer. Cancelling a one-shot timer that already fired is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Identifier of a timer in a [`VirtualScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that went off during [`VirtualScheduler::pop_due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub at: Millis,
    pub task: Task,
    pub timer: TimerId,
}

#[derive(Clone, Debug)]
struct Entry {
    id: TimerId,
    due: Millis,
    period: Option<Millis>,
    task: Task,
}

/// Manually advanced clock with an in-memory timer queue.
///
/// Nothing fires on its own: the host pulls due timers with
/// [`pop_due`](Self::pop_due) and dispatches them. Timers due at the same
/// instant fire in creation order.
///
/// ```rust
/// use rand_text_core::{Scheduler, Task, VirtualScheduler};
///
/// let mut timers = VirtualScheduler::new(0);
/// let tick = timers.every(70, Task::Tick);
///
/// let fired = timers.pop_due(100).unwrap();
/// assert_eq!((fired.at, fired.task), (70, Task::Tick));
/// assert!(timers.pop_due(100).is_none());
///
/// timers.cancel(tick);
/// assert_eq!(timers.active_intervals(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VirtualScheduler {
    now: Millis,
    next_id: u64,
    entries: Vec<Entry>,
}

impl VirtualScheduler {
    /// Create a scheduler whose clock reads `start`.
    pub fn new(start: Millis) -> Self {
        Self { now: start, next_id: 0, entries: Vec::new() }
    }

    /// Move the clock forward without firing anything.
    ///
    /// The clock never moves backwards.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Due time of the next timer, if any.
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Fire the earliest timer due at or before `until`.
    ///
    /// The clock moves to the timer's due time. Periodic timers are
    /// re-armed one period later; one-shot timers are removed.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired> {
        let (idx, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.id))?;

        let entry = &mut self.entries[idx];
        let fired = Fired { at: entry.due, task: entry.task, timer: entry.id };
        match entry.period {
            Some(period) => entry.due = entry.due.saturating_add(period),
            None => {
                self.entries.remove(idx);
            }
        }
        self.set_now(fired.at);
        Some(fired)
    }

    /// Number of live periodic timers.
    pub fn active_intervals(&self) -> usize {
        self.entries.iter().filter(|e| e.period.is_some()).count()
    }

    /// Number of one-shot timers that have not fired yet.
    pub fn pending_timeouts(&self) -> usize {
        self.entries.iter().filter(|e| e.period.is_none()).count()
    }

    fn insert(&mut self, due: Millis, period: Option<Millis>, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due, period, task });
        id
    }
}

impl Scheduler for VirtualScheduler {
    type Handle = TimerId;

    #[inline]
    fn now(&self) -> Millis {
        self.now
    }

    fn every(&mut self, interval: Millis, task: Task) -> TimerId {
        // A zero period would fire forever without the clock moving.
        let interval = interval.max(1);
        self.insert(self.now.saturating_add(interval), Some(interval), task)
    }

    fn after(&mut self, delay: Millis, task: Task) -> TimerId {
        self.insert(self.now.saturating_add(delay), None, task)
    }

    fn cancel(&mut self, handle: TimerId) {
        self.entries.retain(|e| e.id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_rearms() {
        let mut timers = VirtualScheduler::new(0);
        timers.every(70, Task::Tick);

        let mut fired = Vec::new();
        while let Some(f) = timers.pop_due(300) {
            fired.push(f.at);
        }
        assert_eq!(fired, vec![70, 140, 210, 280]);
        assert_eq!(timers.now(), 280);
        assert_eq!(timers.next_due(), Some(350));
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut timers = VirtualScheduler::new(10);
        timers.after(100, Task::Commit);
        assert_eq!(timers.pending_timeouts(), 1);

        assert!(timers.pop_due(109).is_none());
        let fired = timers.pop_due(110).unwrap();
        assert_eq!((fired.at, fired.task), (110, Task::Commit));
        assert!(timers.pop_due(1_000).is_none());
        assert_eq!(timers.pending_timeouts(), 0);
    }

    #[test]
    fn test_ties_fire_in_creation_order() {
        let mut timers = VirtualScheduler::new(0);
        timers.every(70, Task::Tick);
        timers.after(140, Task::Commit);

        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(140))
            .map(|f| (f.at, f.task))
            .collect();
        assert_eq!(order, vec![(70, Task::Tick), (140, Task::Tick), (140, Task::Commit)]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = VirtualScheduler::new(0);
        let a = timers.every(10, Task::Tick);
        let b = timers.after(10, Task::Commit);
        timers.cancel(a);
        timers.cancel(b);
        assert_eq!(timers.active_intervals(), 0);
        assert_eq!(timers.pending_timeouts(), 0);
        assert!(timers.pop_due(Millis::MAX).is_none());
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut timers = VirtualScheduler::new(500);
        timers.set_now(100);
        assert_eq!(timers.now(), 500);
    }

    #[test]
    fn test_due_times_saturate() {
        let mut timers = VirtualScheduler::new(u64::MAX - 10);
        timers.every(70, Task::Tick);
        timers.after(u64::MAX, Task::Commit);
        assert_eq!(timers.next_due(), Some(u64::MAX));

        let fired = timers.pop_due(u64::MAX).unwrap();
        assert_eq!((fired.at, fired.task), (u64::MAX, Task::Tick));
        // Re-armed interval stays pinned instead of wrapping
        assert_eq!(timers.next_due(), Some(u64::MAX));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut timers = VirtualScheduler::new(0);
        timers.every(0, Task::Tick);
        assert_eq!(timers.pop_due(5).map(|f| f.at), Some(1));
    }
}
