//! A single countdown or count-up clock.

use crate::settings::ClockParams;
use crate::utils::pad0;
use crate::{Buzzer, RenderSink};
use log::debug;
use std::rc::Rc;

/// CSS class of the separators between minutes, seconds and tenths.
pub const TIME_SEPARATOR_CLASS: &str = "pt";

/// One timed quantity of a match (period, pause or active time).
///
/// Time advances only in [`Clock::reaches_limit`]. The displayed value is
/// always derived from the value at the last stop plus the time elapsed since
/// the last start, so stopping and restarting never accumulates drift.
pub struct Clock {
    params: ClockParams,
    buzzer: Rc<dyn Buzzer>,
    sink: Box<dyn RenderSink>,

    time: f64,
    full_time: f64,
    time_on_previous_stop: f64,
    recent_start: f64,

    live: bool,
    running: bool,
    ended: bool,
}

impl Clock {
    pub fn new(params: ClockParams, buzzer: Rc<dyn Buzzer>, sink: Box<dyn RenderSink>) -> Self {
        let full_time = params.duration_ms();
        let mut clock = Clock {
            params,
            buzzer,
            sink,
            time: 0.0,
            full_time,
            time_on_previous_stop: 0.0,
            recent_start: 0.0,
            live: false,
            running: false,
            ended: false,
        };
        clock.init();
        clock
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Current displayed time in milliseconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn params(&self) -> &ClockParams {
        &self.params
    }

    /// Back to the idle, hidden start value.
    pub fn init(&mut self) {
        self.live = false;
        self.running = false;
        self.ended = false;
        self.full_time = self.params.duration_ms();
        self.time = if self.params.countdown {
            self.full_time
        } else {
            0.0
        };
        self.time_on_previous_stop = self.time;
        self.sink.hide();
        self.render();
    }

    /// Starts ticking from `now`.
    ///
    /// Callers check [`Clock::is_running`] first: starting a running clock
    /// re-anchors it and loses the time since the previous start.
    pub fn start(&mut self, now: f64) {
        debug!("{} clock started at {:.1}", self.params.name, now);
        self.recent_start = now;
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!("{} clock stopped at {:.1} ms", self.params.name, self.time);
        }
        self.time_on_previous_stop = self.time;
        self.running = false;
    }

    /// Rings the buzzer from the beginning and marks the clock as ended.
    pub fn end(&mut self) {
        self.buzzer.rewind();
        self.buzzer.play();

        self.running = false;
        self.ended = true;
    }

    /// Updates the clock to `now`. Returns true if the clock has reached its
    /// limit during this call.
    pub fn reaches_limit(&mut self, now: f64) -> bool {
        if !self.running {
            return false;
        }

        // frame timestamps may predate the start anchor
        let elapsed = (now - self.recent_start).max(0.0);

        let mut reached = false;
        if self.params.countdown {
            self.time = self.time_on_previous_stop - elapsed;
            if self.time < 0.0 {
                self.time = 0.0;
                self.end();
                reached = true;
            }
        } else {
            self.time = self.time_on_previous_stop + elapsed;
            if self.time >= self.full_time {
                self.time = self.full_time;
                self.end();
                reached = true;
            }
        }

        self.render();

        reached
    }

    /// Shows or hides the clock, smoothly when `animated`.
    pub fn toggle_state(&mut self, live: bool, animated: bool) {
        self.live = live;
        match (live, animated) {
            (true, true) => self.sink.reveal(),
            (false, true) => self.sink.conceal(),
            (true, false) => self.sink.show(),
            (false, false) => self.sink.hide(),
        }
        self.render();
    }

    fn render(&self) {
        self.sink.write(&format_time(self.time, &self.params));
    }
}

/// Formats a clock value as an HTML fragment.
///
/// Minutes appear when the configured length has minutes or a leading zero is
/// requested. A countdown below the subsecond threshold shows tenths; clocks
/// with a threshold otherwise keep a spacer in that place so the digits do
/// not shift.
pub fn format_time(time_ms: f64, params: &ClockParams) -> String {
    let time = time_ms.max(0.0);
    let minutes = (time / 60_000.0).floor();
    let seconds = ((time - minutes * 60_000.0) / 1_000.0).floor();
    let separator = |text: &str| format!("<span class='{}'>{}</span>", TIME_SEPARATOR_CLASS, text);

    let mut out = String::new();
    if params.subsecond > 0 {
        out.push_str("&nbsp;");
        out.push_str(&separator("&nbsp;"));
    }
    if params.always_lead_zero || params.minutes > 0 {
        out.push_str(&(minutes as u64).to_string());
        out.push_str(&separator(":"));
    }
    out.push_str(&pad0(seconds as u64, 2));

    if params.countdown && minutes == 0.0 && seconds < f64::from(params.subsecond) {
        let millis = time - minutes * 60_000.0 - seconds * 1_000.0;
        out.push_str(&separator("."));
        out.push_str(&((millis / 100.0).floor() as u64).to_string());
    } else if params.subsecond > 0 {
        out.push_str(&separator("&nbsp;"));
        out.push_str("&nbsp;");
    }
    out
}
