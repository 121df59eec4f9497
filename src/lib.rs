//! Timing and state core of a wrestling scoreboard.
//!
//! The library owns the clocks, the match-phase state machine and the board
//! state (bouts, scores, warnings). Everything that touches the browser is
//! reached through the small traits below, so the whole core runs and is
//! tested on the host.

use std::fmt;

pub mod board;
pub mod clock;
pub mod defaults;
pub mod keys;
pub mod settings;
pub mod sponsors;
pub mod timer;
pub mod utils;

pub use board::Board;
pub use clock::Clock;
pub use keys::{Action, Command, InputMode};
pub use settings::{ClockParams, Settings, SettingsError};
pub use timer::{ClockOutput, Runtime, Timer, TimerOutputs};

/// A display target for one clock or label.
///
/// `write` receives an HTML fragment. `reveal` and `conceal` are the smooth
/// variants of `show` and `hide`.
pub trait RenderSink {
    fn write(&self, html: &str);
    fn show(&self);
    fn hide(&self);
    fn reveal(&self);
    fn conceal(&self);
}

/// Image target of the sponsor rotation.
pub trait SponsorSink {
    fn set_source(&self, src: &str);
    fn show(&self);
    fn hide(&self);
}

/// A sound played when a clock reaches its limit.
pub trait Buzzer {
    fn rewind(&self);
    fn play(&self);
}

/// Monotonic milliseconds since an arbitrary epoch.
pub trait WallClock {
    fn now(&self) -> f64;
}

/// Requests one call of the animation step before the next display refresh.
pub trait FrameScheduler {
    /// False when the runtime refused the request.
    fn request_frame(&self) -> bool;
}

/// Red or blue corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blu,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Blu => write!(f, "blue"),
        }
    }
}
