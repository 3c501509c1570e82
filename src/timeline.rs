//! Deterministic driver for the button controller.
//!
//! A [`Timeline`] plays scripted pointer and page events against a
//! [`DebounceController`] on a [`VirtualScheduler`], dispatching ticks to a
//! [`GlyphText`] and recording when the click action ran. Native hosts can
//! use it to drive the controller from their own event loop.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ControllerConfig;
use crate::controller::{ClickOutcome, DebounceController};
use crate::glyph::GlyphText;
use crate::scheduler::{Millis, Scheduler, Task, VirtualScheduler};

/// Input delivered by the host UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    HoverEnter,
    HoverLeave,
    Click,
    PageHide,
}

/// Controller, label and clock wired together.
///
/// ## Example
///
/// ```rust
/// use rand_text_core::{ControllerConfig, Event, Timeline};
///
/// let mut timeline = Timeline::new(ControllerConfig::default(), "I'm feeling random", 1);
/// timeline.run(0, Event::Click);
/// timeline.run(200, Event::Click); // ignored, still latched
/// timeline.advance(1_000);
///
/// assert_eq!(timeline.commits(), &[700]);
/// assert_eq!(timeline.ticks().first(), Some(&70));
/// ```
#[derive(Debug)]
pub struct Timeline {
    controller: DebounceController<VirtualScheduler>,
    label: GlyphText,
    rng: StdRng,
    ticks: Vec<Millis>,
    commits: Vec<Millis>,
    outcomes: Vec<(Millis, ClickOutcome)>,
}

impl Timeline {
    /// Start at time zero with a seeded label scrambler.
    pub fn new(config: ControllerConfig, label: &str, seed: u64) -> Self {
        Self {
            controller: DebounceController::new(VirtualScheduler::new(0), config),
            label: GlyphText::new(label),
            rng: StdRng::seed_from_u64(seed),
            ticks: Vec::new(),
            commits: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Fire every timer due at or before `to`, then move the clock to `to`.
    pub fn advance(&mut self, to: Millis) {
        while let Some(fired) = self.controller.scheduler_mut().pop_due(to) {
            match fired.task {
                Task::Tick => {
                    log::trace!("tick at {}", fired.at);
                    self.label.scramble(&mut self.rng);
                    self.ticks.push(fired.at);
                }
                Task::Commit => {
                    if self.controller.on_commit_due() {
                        self.commits.push(fired.at);
                    }
                }
            }
        }
        self.controller.scheduler_mut().set_now(to);
    }

    /// Deliver `event` at time `at`. Timers due by then fire first.
    pub fn run(&mut self, at: Millis, event: Event) {
        self.advance(at);
        match event {
            Event::HoverEnter => self.controller.on_hover_enter(),
            Event::HoverLeave => self.controller.on_hover_leave(),
            Event::PageHide => self.controller.on_page_hide(),
            Event::Click => {
                let outcome = self.controller.on_click();
                if outcome == ClickOutcome::Proceed {
                    self.commits.push(at);
                }
                self.outcomes.push((at, outcome));
            }
        }
    }

    /// Current clock reading.
    #[inline]
    pub fn now(&self) -> Millis {
        self.controller.scheduler().now()
    }

    /// Times at which the label was scrambled.
    #[inline]
    pub fn ticks(&self) -> &[Millis] {
        &self.ticks
    }

    /// Times at which the click action ran.
    #[inline]
    pub fn commits(&self) -> &[Millis] {
        &self.commits
    }

    /// Outcome of every delivered click.
    #[inline]
    pub fn outcomes(&self) -> &[(Millis, ClickOutcome)] {
        &self.outcomes
    }

    #[inline]
    pub fn label(&self) -> &GlyphText {
        &self.label
    }

    #[inline]
    pub fn controller(&self) -> &DebounceController<VirtualScheduler> {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut DebounceController<VirtualScheduler> {
        &mut self.controller
    }
}
