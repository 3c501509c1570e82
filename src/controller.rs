//! Debounced animation controller for the "feeling random" button.

use crate::config::ControllerConfig;
use crate::scheduler::{Millis, Scheduler, Task};

/// What the host should do with the native click it just delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A commit is already pending; drop this click
    Ignored,
    /// The animation has played long enough; let the click action run now
    Proceed,
    /// Suppress the native action; a [`Task::Commit`] fires after `delay`
    Deferred { delay: Millis },
}

/// Snapshot of the session flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub running: bool,
    pub latched: bool,
    pub earliest_click_at: Option<Millis>,
    pub commit_pending: bool,
}

/// Controller that keeps the label animating for a minimum time before a
/// click is allowed through.
///
/// Hovering previews the animation without committing. The first click
/// latches the controller; further clicks are ignored until the page is
/// hidden or the host calls [`release`](Self::release).
///
/// The controller owns at most one periodic tick timer and at most one
/// pending commit timer, both obtained from its [`Scheduler`].
///
/// ## Example
///
/// ```rust
/// use rand_text_core::{
///     ClickOutcome, ControllerConfig, DebounceController, Task, VirtualScheduler,
/// };
///
/// let mut ctrl = DebounceController::new(VirtualScheduler::new(0), ControllerConfig::default());
///
/// // A cold click is held back for the full minimum duration.
/// assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 700 });
/// assert_eq!(ctrl.on_click(), ClickOutcome::Ignored);
///
/// // Drain timers up to t=700; the last one is the commit.
/// let mut last = None;
/// while let Some(fired) = ctrl.scheduler_mut().pop_due(700) {
///     last = Some(fired.task);
/// }
/// assert_eq!(last, Some(Task::Commit));
/// assert!(ctrl.on_commit_due());
/// ```
#[derive(Debug)]
pub struct DebounceController<S: Scheduler> {
    scheduler: S,
    config: ControllerConfig,
    running: bool,
    latched: bool,
    earliest_click_at: Option<Millis>,
    ticker: Option<S::Handle>,
    pending_commit: Option<S::Handle>,
}

impl<S: Scheduler> DebounceController<S> {
    /// Create an idle controller.
    pub fn new(scheduler: S, config: ControllerConfig) -> Self {
        Self {
            scheduler,
            config,
            running: false,
            latched: false,
            earliest_click_at: None,
            ticker: None,
            pending_commit: None,
        }
    }

    /// Handle a click on the button.
    pub fn on_click(&mut self) -> ClickOutcome {
        if self.latched {
            log::debug!("click ignored: commit already latched");
            return ClickOutcome::Ignored;
        }
        self.latched = true;

        let now = self.scheduler.now();
        let remaining = match self.earliest_click_at {
            Some(at) => at.saturating_sub(now),
            None => self.config.min_duration,
        };

        if remaining == 0 {
            log::debug!("click proceeds immediately at {now}");
            return ClickOutcome::Proceed;
        }

        self.start_session();
        if let Some(stale) = self.pending_commit.take() {
            self.scheduler.cancel(stale);
        }
        self.pending_commit = Some(self.scheduler.after(remaining, Task::Commit));
        log::debug!("click deferred by {remaining}ms at {now}");
        ClickOutcome::Deferred { delay: remaining }
    }

    /// Pointer entered the button: preview the animation.
    pub fn on_hover_enter(&mut self) {
        self.start_session();
    }

    /// Pointer left the button.
    ///
    /// A latched controller keeps animating until its commit fires.
    pub fn on_hover_leave(&mut self) {
        if !self.latched {
            self.stop_session();
        }
    }

    /// The page is being hidden (navigation or back/forward cache).
    ///
    /// Clears the latch and any pending commit so a restored page starts fresh.
    pub fn on_page_hide(&mut self) {
        self.latched = false;
        if let Some(commit) = self.pending_commit.take() {
            log::debug!("pending commit cancelled by page hide");
            self.scheduler.cancel(commit);
        }
        self.stop_session();
    }

    /// The scheduled [`Task::Commit`] fired.
    ///
    /// Returns `true` when the host should run the click action now. Stray or
    /// cancelled commits return `false`.
    pub fn on_commit_due(&mut self) -> bool {
        if self.pending_commit.take().is_none() {
            return false;
        }
        log::debug!("commit at {}", self.scheduler.now());
        true
    }

    /// End the interaction for hosts whose click action does not navigate away.
    pub fn release(&mut self) {
        self.latched = false;
        if let Some(commit) = self.pending_commit.take() {
            self.scheduler.cancel(commit);
        }
        self.stop_session();
    }

    /// Start the tick animation. No-op while already running.
    pub fn start_session(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        let now = self.scheduler.now();
        self.earliest_click_at = Some(now.saturating_add(self.config.min_duration));

        if let Some(old) = self.ticker.take() {
            self.scheduler.cancel(old);
        }
        self.ticker = Some(self.scheduler.every(self.config.tick_interval, Task::Tick));
        log::debug!("session started at {now}");
    }

    /// Stop the tick animation and forget the click deadline.
    pub fn stop_session(&mut self) {
        if self.running {
            log::debug!("session stopped at {}", self.scheduler.now());
        }
        self.running = false;
        self.earliest_click_at = None;
        if let Some(ticker) = self.ticker.take() {
            self.scheduler.cancel(ticker);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Earliest time a click may go through without deferral.
    #[inline]
    pub fn earliest_click_at(&self) -> Option<Millis> {
        self.earliest_click_at
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            running: self.running,
            latched: self.latched,
            earliest_click_at: self.earliest_click_at,
            commit_pending: self.pending_commit.is_some(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access for hosts that drive the clock themselves.
    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::VirtualScheduler;

    fn controller() -> DebounceController<VirtualScheduler> {
        DebounceController::new(VirtualScheduler::new(0), ControllerConfig::default())
    }

    fn assert_consistent(ctrl: &DebounceController<VirtualScheduler>) {
        assert_eq!(ctrl.is_running(), ctrl.earliest_click_at().is_some());
        assert!(ctrl.scheduler().active_intervals() <= 1);
        assert_eq!(ctrl.scheduler().active_intervals(), ctrl.is_running() as usize);
    }

    #[test]
    fn test_cold_click_defers_full_duration() {
        let mut ctrl = controller();
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 700 });
        assert!(ctrl.is_running());
        assert!(ctrl.is_latched());
        assert_eq!(ctrl.earliest_click_at(), Some(700));
        assert_eq!(ctrl.scheduler().pending_timeouts(), 1);
        assert_consistent(&ctrl);
    }

    #[test]
    fn test_repeated_clicks_ignored_while_latched() {
        let mut ctrl = controller();
        ctrl.on_click();
        let before = ctrl.state();
        for t in [100, 200, 650] {
            ctrl.scheduler_mut().set_now(t);
            assert_eq!(ctrl.on_click(), ClickOutcome::Ignored);
        }
        assert_eq!(ctrl.state(), before);
        assert_eq!(ctrl.scheduler().pending_timeouts(), 1);
    }

    #[test]
    fn test_click_after_long_hover_proceeds() {
        let mut ctrl = controller();
        ctrl.on_hover_enter();
        ctrl.scheduler_mut().set_now(700);
        assert_eq!(ctrl.on_click(), ClickOutcome::Proceed);
        assert_eq!(ctrl.scheduler().pending_timeouts(), 0);

        ctrl.scheduler_mut().set_now(2_000);
        assert_eq!(ctrl.on_click(), ClickOutcome::Ignored);
    }

    #[test]
    fn test_click_during_short_hover_waits_remainder() {
        let mut ctrl = controller();
        ctrl.scheduler_mut().set_now(1_000);
        ctrl.on_hover_enter();
        ctrl.scheduler_mut().set_now(1_300);
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 400 });
        // Session was already running; deadline unchanged
        assert_eq!(ctrl.earliest_click_at(), Some(1_700));
        assert_consistent(&ctrl);
    }

    #[test]
    fn test_hover_enter_is_idempotent() {
        let mut ctrl = controller();
        ctrl.on_hover_enter();
        ctrl.scheduler_mut().set_now(300);
        ctrl.on_hover_enter();
        assert_eq!(ctrl.earliest_click_at(), Some(700));
        assert_eq!(ctrl.scheduler().active_intervals(), 1);
    }

    #[test]
    fn test_hover_leave_stops_unlatched_session() {
        let mut ctrl = controller();
        ctrl.on_hover_enter();
        ctrl.on_hover_leave();
        assert!(!ctrl.is_running());
        assert_eq!(ctrl.earliest_click_at(), None);
        assert_eq!(ctrl.scheduler().active_intervals(), 0);
        assert_consistent(&ctrl);
    }

    #[test]
    fn test_hover_leave_keeps_latched_session() {
        let mut ctrl = controller();
        ctrl.on_click();
        ctrl.on_hover_leave();
        assert!(ctrl.is_running());
        assert_eq!(ctrl.scheduler().pending_timeouts(), 1);
        assert_consistent(&ctrl);
    }

    #[test]
    fn test_page_hide_resets_everything() {
        let mut ctrl = controller();
        ctrl.on_click();
        ctrl.on_page_hide();
        assert_eq!(
            ctrl.state(),
            SessionState {
                running: false,
                latched: false,
                earliest_click_at: None,
                commit_pending: false,
            }
        );
        assert_eq!(ctrl.scheduler().active_intervals(), 0);
        assert_eq!(ctrl.scheduler().pending_timeouts(), 0);
        // Stray commit after restore does nothing
        assert!(!ctrl.on_commit_due());
    }

    #[test]
    fn test_page_hide_from_idle() {
        let mut ctrl = controller();
        ctrl.on_page_hide();
        assert!(!ctrl.is_running());
        assert!(!ctrl.is_latched());
        assert_consistent(&ctrl);
    }

    #[test]
    fn test_commit_due_fires_once() {
        let mut ctrl = controller();
        ctrl.on_click();
        assert!(ctrl.on_commit_due());
        assert!(!ctrl.on_commit_due());
        // Latch survives the commit
        assert!(ctrl.is_latched());
    }

    #[test]
    fn test_release_allows_new_click() {
        let mut ctrl = controller();
        ctrl.on_click();
        ctrl.on_commit_due();
        ctrl.release();
        assert_eq!(ctrl.state().latched, false);
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 700 });
    }

    #[test]
    fn test_start_stop_never_leaks_intervals() {
        let mut ctrl = controller();
        for i in 0..20u64 {
            ctrl.scheduler_mut().set_now(i * 13);
            match i % 4 {
                0 | 1 => ctrl.start_session(),
                2 => ctrl.stop_session(),
                _ => {
                    ctrl.stop_session();
                    ctrl.start_session();
                }
            }
            assert_consistent(&ctrl);
        }
    }

    #[test]
    fn test_huge_min_duration_saturates() {
        let config = ControllerConfig { min_duration: u64::MAX, tick_interval: 70 };
        assert_eq!(config.validate(), Ok(()));

        let mut ctrl = DebounceController::new(VirtualScheduler::new(1), config);
        ctrl.on_hover_enter();
        assert_eq!(ctrl.earliest_click_at(), Some(u64::MAX));
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: u64::MAX - 1 });
        assert_eq!(ctrl.scheduler().next_due(), Some(71));
        assert_consistent(&ctrl);

        // Cold click at a late clock reading
        let mut ctrl = DebounceController::new(VirtualScheduler::new(u64::MAX - 5), config);
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: u64::MAX });
        assert_eq!(ctrl.earliest_click_at(), Some(u64::MAX));
        assert_eq!(ctrl.scheduler().pending_timeouts(), 1);
    }

    #[test]
    fn test_failed_commit_release_rearms_button() {
        let mut ctrl = controller();
        ctrl.on_click();
        ctrl.scheduler_mut().set_now(700);
        assert!(ctrl.on_commit_due());

        // The action did not leave the page; without a release the button stays dead.
        assert_eq!(ctrl.on_click(), ClickOutcome::Ignored);
        ctrl.release();
        assert!(!ctrl.is_running());
        assert_eq!(ctrl.scheduler().active_intervals(), 0);

        ctrl.scheduler_mut().set_now(1_000);
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 700 });
        assert_eq!(ctrl.earliest_click_at(), Some(1_700));
    }

    #[test]
    fn test_teardown_while_hovering_clears_timers() {
        let mut ctrl = controller();
        ctrl.on_hover_enter();
        ctrl.on_click();
        assert_eq!(ctrl.scheduler().active_intervals(), 1);
        assert_eq!(ctrl.scheduler().pending_timeouts(), 1);

        ctrl.on_page_hide();
        assert_eq!(ctrl.scheduler().active_intervals(), 0);
        assert_eq!(ctrl.scheduler().pending_timeouts(), 0);
        assert!(ctrl.scheduler().next_due().is_none());
    }

    #[test]
    fn test_custom_config() {
        let config = ControllerConfig { min_duration: 300, tick_interval: 30 };
        let mut ctrl = DebounceController::new(VirtualScheduler::new(0), config);
        assert_eq!(ctrl.on_click(), ClickOutcome::Deferred { delay: 300 });
        assert_eq!(ctrl.scheduler().next_due(), Some(30));
    }
}
