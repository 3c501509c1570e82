//! # rand-text-core
//!
//! Front page interaction logic: the debounced "I'm feeling random" button
//! and the responsive navigation menu.
//!
//! This crate provides platform-agnostic state machines for:
//! - Holding a click back until the label animation has played for a minimum time
//! - Scrambling the button label glyphs on every animation tick
//! - Laying out the navigation menu for narrow and wide viewports
//! - Driving all of it deterministically on a virtual clock
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for config structures
//! - `toml` - Parse a site config file
//! - `web` - Enable browser bindings (DOM listeners, window timers)
//!
//! ## Example
//!
//! ```rust
//! use rand_text_core::{ClickOutcome, ControllerConfig, Event, Timeline};
//!
//! let mut timeline = Timeline::new(ControllerConfig::default(), "I'm feeling random", 7);
//!
//! // Hover long enough and the click goes straight through.
//! timeline.run(0, Event::HoverEnter);
//! timeline.run(800, Event::Click);
//! assert_eq!(timeline.outcomes(), &[(800, ClickOutcome::Proceed)]);
//! assert_eq!(timeline.commits(), &[800]);
//! ```

mod config;
mod controller;
mod glyph;
mod menu;
mod scheduler;
mod timeline;
#[cfg(feature = "web")]
pub mod web;

pub use config::{ConfigError, ControllerConfig, MenuConfig, SiteConfig};
pub use controller::{ClickOutcome, DebounceController, SessionState};
pub use glyph::{family_of, scramble_char, Glyph, GlyphColor, GlyphText};
pub use menu::{BarStyle, ItemFlow, MenuLayout, MenuMode, NavMenu};
pub use scheduler::{Fired, Millis, Scheduler, Task, TimerId, VirtualScheduler};
pub use timeline::{Event, Timeline};

#[cfg(feature = "web")]
pub use web::{FrontPage, RandomButton, WebScheduler};
