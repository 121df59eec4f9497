//! Match-phase state machine over the period, pause and active-time clocks.

use crate::clock::Clock;
use crate::settings::Settings;
use crate::sponsors::Sponsors;
use crate::{Buzzer, FrameScheduler, RenderSink, Side, SponsorSink, WallClock};
use log::{debug, error, info};
use std::rc::Rc;

/// Display and sound of one clock.
pub struct ClockOutput {
    pub sink: Box<dyn RenderSink>,
    pub buzzer: Rc<dyn Buzzer>,
}

/// Everything the timer renders into. Period and pause usually share one
/// buzzer; they never end at the same time.
pub struct TimerOutputs {
    pub period: ClockOutput,
    pub pause: ClockOutput,
    pub active_red: ClockOutput,
    pub active_blu: ClockOutput,
    pub period_info: Box<dyn RenderSink>,
    pub sponsor: Box<dyn SponsorSink>,
}

/// Time source and frame scheduling of the host.
#[derive(Clone)]
pub struct Runtime {
    pub clock: Rc<dyn WallClock>,
    pub frames: Rc<dyn FrameScheduler>,
}

/// Drives the clocks of one match configuration.
///
/// Operator input calls [`Timer::toggle`], [`Timer::toggle_active_time`] and
/// [`Timer::reset`]. While period or pause run, the timer asks the host for
/// animation frames and expects [`Timer::step`] to be called with each frame
/// timestamp.
pub struct Timer {
    period: Clock,
    pause: Clock,
    active_red: Clock,
    active_blu: Clock,
    sponsors: Sponsors,
    period_info: Box<dyn RenderSink>,

    period_nr: u32,
    last_period: u32,
    period_suffix: String,

    runtime: Runtime,
    frame_requested: bool,
}

impl Timer {
    pub fn new(settings: &Settings, outputs: TimerOutputs, runtime: Runtime) -> Self {
        let timer_settings = &settings.timer;
        let match_params = &settings.match_params;
        let sponsors = Sponsors::new(
            &match_params.sponsors,
            match_params.theme,
            outputs.sponsor,
            runtime.clock.now(),
        );

        let mut timer = Timer {
            period: clock(timer_settings.period.clone(), outputs.period),
            pause: clock(timer_settings.pause.clone(), outputs.pause),
            active_red: clock(timer_settings.active.clone(), outputs.active_red),
            active_blu: clock(timer_settings.active.clone(), outputs.active_blu),
            sponsors,
            period_info: outputs.period_info,
            period_nr: 1,
            last_period: match_params.last_period.max(1),
            period_suffix: settings.lang.period_suffix.clone(),
            runtime,
            frame_requested: false,
        };
        timer.reset();
        timer
    }

    pub fn reset(&mut self) {
        info!("Timer reset");
        self.period.init();
        self.period.toggle_state(true, false);
        self.period_nr = 1;
        self.render_period_info();

        self.pause.init();
        self.active_red.init();
        self.active_blu.init();
    }

    /// Starts or stops whatever the current phase allows.
    pub fn toggle(&mut self) {
        let now = self.runtime.clock.now();

        // a live pause has priority over the period
        if self.pause.is_live() {
            if !self.pause.is_running() {
                self.pause.start(now);
                self.animate();
            } else {
                self.pause.stop();
            }
        } else if self.period_startable() {
            self.period.start(now);
            start_active_time(&mut self.active_red, now);
            start_active_time(&mut self.active_blu, now);
            self.animate();
        } else {
            self.period.stop();
            stop_active_time(&mut self.active_red);
            stop_active_time(&mut self.active_blu);
        }
    }

    /// Arms or retracts a wrestler's active-time clock between periods.
    pub fn toggle_active_time(&mut self, side: Side) {
        if self.period.is_running() || self.period.has_ended() {
            debug!("Active time {} locked while the period runs or has ended", side);
            return;
        }
        let clock = match side {
            Side::Red => &mut self.active_red,
            Side::Blu => &mut self.active_blu,
        };
        if !clock.is_live() {
            clock.init();
            clock.toggle_state(true, true);
        } else {
            clock.toggle_state(false, true);
        }
    }

    pub fn any_clock_running(&self) -> bool {
        self.period.is_running() || self.pause.is_running()
    }

    pub fn period_number(&self) -> u32 {
        self.period_nr
    }

    pub fn last_period(&self) -> u32 {
        self.last_period
    }

    pub fn period(&self) -> &Clock {
        &self.period
    }

    pub fn pause(&self) -> &Clock {
        &self.pause
    }

    pub fn active(&self, side: Side) -> &Clock {
        match side {
            Side::Red => &self.active_red,
            Side::Blu => &self.active_blu,
        }
    }

    /// One animation frame. Stops asking for frames once neither period nor
    /// pause runs.
    pub fn step(&mut self, timestamp: f64) {
        self.frame_requested = false;

        if self.period.is_running() && self.pause.is_running() {
            error!(
                "Both pause and period are running in period {}, halting both",
                self.period_nr
            );
            self.period.stop();
            self.pause.stop();
        }
        if !self.any_clock_running() {
            debug!("Animation stopped at {:.1}", timestamp);
            return;
        }

        self.calculate(timestamp);
        self.animate();
    }

    fn period_startable(&self) -> bool {
        if self.period.has_ended() && self.period_nr >= self.last_period {
            return false;
        }
        !(self.pause.is_running() || self.period.is_running() || self.pause.is_live())
    }

    fn animate(&mut self) {
        if !self.frame_requested {
            self.frame_requested = self.runtime.frames.request_frame();
        }
    }

    fn calculate(&mut self, timestamp: f64) {
        if self.period.reaches_limit(timestamp) {
            info!("Period {} of {} ended", self.period_nr, self.last_period);
            // the period ending always terminates active time
            for active in [&mut self.active_red, &mut self.active_blu] {
                active.end();
                active.toggle_state(false, false);
            }

            if self.period_nr < self.last_period {
                self.period_info.write("&nbsp;");
                self.pause.toggle_state(true, false);
                self.pause.start(timestamp);
            } else {
                info!("Match over");
                self.pause.init();
            }
        }

        if self.pause.reaches_limit(timestamp) {
            self.pause.toggle_state(false, false);
            self.period_nr += 1;
            info!("Pause ended, period {} ready", self.period_nr);
            self.period.init();
            self.period.toggle_state(true, false);
            self.render_period_info();
        }

        // active clocks stop on their own and never change the phase
        self.active_red.reaches_limit(timestamp);
        self.active_blu.reaches_limit(timestamp);

        self.sponsors.update(timestamp);
    }

    fn render_period_info(&self) {
        self.period_info
            .write(&format!("{}{}", self.period_nr, self.period_suffix));
    }
}

fn clock(params: crate::settings::ClockParams, output: ClockOutput) -> Clock {
    Clock::new(params, output.buzzer, output.sink)
}

fn start_active_time(clock: &mut Clock, now: f64) {
    if clock.is_live() && !clock.has_ended() {
        clock.start(now);
    }
}

fn stop_active_time(clock: &mut Clock) {
    if clock.is_live() {
        clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ClockParams;
    use crate::testing::{FakeBuzzer, FakeFrames, FakeImage, FakeSink, ManualClock, Visibility};

    struct Harness {
        timer: Timer,
        clock: Rc<ManualClock>,
        frames: Rc<FakeFrames>,
        buzzer: Rc<FakeBuzzer>,
        period: FakeSink,
        pause: FakeSink,
        red: FakeSink,
        info: FakeSink,
        sponsor: FakeImage,
    }

    fn short_match() -> Settings {
        let mut settings = Settings::default();
        let seconds = |name: &str, seconds: u32| ClockParams {
            name: name.to_string(),
            minutes: 0,
            seconds,
            countdown: true,
            subsecond: 0,
            always_lead_zero: false,
        };
        settings.timer.period = seconds("period", 3);
        settings.timer.pause = seconds("pause", 2);
        settings.timer.active = seconds("active", 1);
        settings.match_params.last_period = 2;
        settings
    }

    fn harness(settings: &Settings) -> Harness {
        let clock = Rc::new(ManualClock::default());
        let frames = Rc::new(FakeFrames::default());
        let buzzer = Rc::new(FakeBuzzer::default());
        let period = FakeSink::default();
        let pause = FakeSink::default();
        let red = FakeSink::default();
        let info = FakeSink::default();
        let sponsor = FakeImage::default();

        let outputs = TimerOutputs {
            period: ClockOutput {
                sink: Box::new(period.clone()),
                buzzer: buzzer.clone(),
            },
            pause: ClockOutput {
                sink: Box::new(pause.clone()),
                buzzer: buzzer.clone(),
            },
            active_red: ClockOutput {
                sink: Box::new(red.clone()),
                buzzer: Rc::new(FakeBuzzer::default()),
            },
            active_blu: ClockOutput {
                sink: Box::new(FakeSink::default()),
                buzzer: Rc::new(FakeBuzzer::default()),
            },
            period_info: Box::new(info.clone()),
            sponsor: Box::new(sponsor.clone()),
        };
        let runtime = Runtime {
            clock: clock.clone(),
            frames: frames.clone(),
        };
        Harness {
            timer: Timer::new(settings, outputs, runtime),
            clock,
            frames,
            buzzer,
            period,
            pause,
            red,
            info,
            sponsor,
        }
    }

    impl Harness {
        fn toggle_at(&mut self, now: f64) {
            self.clock.set(now);
            self.timer.toggle();
        }
    }

    #[test]
    fn new_timer_shows_an_idle_first_period() {
        let h = harness(&short_match());
        assert_eq!(h.timer.period_number(), 1);
        assert!(h.timer.period().is_live());
        assert!(!h.timer.period().is_running());
        assert!(!h.timer.pause().is_live());
        assert!(!h.timer.active(Side::Red).is_live());
        assert_eq!(h.period.visibility(), Some(Visibility::Shown));
        assert_eq!(h.pause.visibility(), Some(Visibility::Hidden));
        assert_eq!(h.info.html(), "1. Halbzeit");
        assert!(!h.timer.any_clock_running());
    }

    #[test]
    fn toggle_starts_and_stops_the_period() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        assert!(h.timer.period().is_running());
        assert!(h.timer.any_clock_running());
        assert_eq!(h.frames.requests.get(), 1);

        h.timer.step(1_000.0);
        assert_eq!(h.timer.period().time(), 2_000.0);
        assert_eq!(h.frames.requests.get(), 2);

        h.toggle_at(1_010.0);
        assert!(!h.timer.period().is_running());
        h.timer.step(1_016.0);
        assert_eq!(h.frames.requests.get(), 2);
        assert_eq!(h.timer.period().time(), 2_000.0);
    }

    #[test]
    fn quick_restart_keeps_a_single_frame_request() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.toggle_at(5.0);
        h.toggle_at(10.0);
        assert_eq!(h.frames.requests.get(), 1);
    }

    #[test]
    fn refused_frame_request_is_asked_again() {
        let mut h = harness(&short_match());
        h.frames.refusing.set(true);
        h.toggle_at(0.0);
        h.toggle_at(5.0);
        h.frames.refusing.set(false);
        h.toggle_at(10.0);
        assert!(h.timer.period().is_running());
        assert_eq!(h.frames.requests.get(), 2);
    }

    #[test]
    fn period_and_pause_running_together_halts_both() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.pause.toggle_state(true, false);
        h.timer.pause.start(0.0);
        assert_eq!(h.frames.requests.get(), 1);

        h.timer.step(1_000.0);
        assert!(!h.timer.period().is_running());
        assert!(!h.timer.pause().is_running());
        assert!(!h.timer.any_clock_running());
        assert_eq!(h.frames.requests.get(), 1);

        h.toggle_at(2_000.0);
        assert!(h.timer.pause().is_running());
        assert!(!h.timer.period().is_running());
        assert_eq!(h.frames.requests.get(), 2);
    }

    #[test]
    fn restarted_period_keeps_earlier_elapsed_time() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.step(1_000.0);
        h.toggle_at(1_000.0);
        h.timer.step(1_016.0);

        h.toggle_at(5_000.0);
        h.timer.step(5_500.0);
        assert_eq!(h.timer.period().time(), 1_500.0);
    }

    #[test]
    fn period_end_starts_pause_then_next_period() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.step(1_000.0);
        h.timer.step(3_001.0);

        assert!(h.timer.period().has_ended());
        assert!(h.timer.pause().is_live());
        assert!(h.timer.pause().is_running());
        assert_eq!(h.timer.pause().time(), 2_000.0);
        assert_eq!(h.timer.period_number(), 1);
        assert_eq!(h.info.html(), "&nbsp;");
        assert_eq!(h.buzzer.plays.get(), 1);

        h.timer.step(4_000.0);
        assert_eq!(h.timer.pause().time(), 1_001.0);
        h.timer.step(5_002.0);

        assert_eq!(h.timer.period_number(), 2);
        assert!(!h.timer.pause().is_live());
        assert!(!h.timer.pause().is_running());
        assert!(h.timer.period().is_live());
        assert!(!h.timer.period().is_running());
        assert!(!h.timer.period().has_ended());
        assert_eq!(h.timer.period().time(), 3_000.0);
        assert_eq!(h.info.html(), "2. Halbzeit");
        assert_eq!(h.buzzer.plays.get(), 2);
        assert!(!h.timer.any_clock_running());

        let requests = h.frames.requests.get();
        h.timer.step(5_018.0);
        assert_eq!(h.frames.requests.get(), requests);
    }

    #[test]
    fn final_period_end_leaves_pause_idle() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.step(3_001.0);
        h.timer.step(5_002.0);
        assert_eq!(h.timer.period_number(), 2);

        h.toggle_at(6_000.0);
        h.timer.step(9_001.0);
        assert!(h.timer.period().has_ended());
        assert!(!h.timer.pause().is_live());
        assert!(!h.timer.pause().is_running());
        assert!(!h.timer.any_clock_running());
        assert_eq!(h.buzzer.plays.get(), 3);

        let requests = h.frames.requests.get();
        h.toggle_at(10_000.0);
        assert!(!h.timer.period().is_running());
        assert!(!h.timer.pause().is_running());
        assert_eq!(h.frames.requests.get(), requests);
    }

    #[test]
    fn live_pause_takes_every_toggle() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.step(3_001.0);
        assert!(h.timer.pause().is_running());

        h.toggle_at(3_500.0);
        assert!(!h.timer.pause().is_running());
        assert!(!h.timer.period().is_running());
        assert!(h.timer.period().has_ended());

        h.toggle_at(4_000.0);
        assert!(h.timer.pause().is_running());
        assert!(!h.timer.period().is_running());
    }

    #[test]
    fn fresh_pause_does_not_complete_in_its_start_tick() {
        let mut settings = short_match();
        settings.timer.pause.seconds = 0;
        let mut h = harness(&settings);
        h.toggle_at(0.0);
        h.timer.step(3_500.0);
        assert!(h.timer.pause().is_running());
        assert_eq!(h.timer.period_number(), 1);
        h.timer.step(3_517.0);
        assert_eq!(h.timer.period_number(), 2);
    }

    #[test]
    fn active_time_is_locked_while_period_runs_or_ended() {
        let mut h = harness(&short_match());
        h.toggle_at(0.0);
        h.timer.toggle_active_time(Side::Red);
        assert!(!h.timer.active(Side::Red).is_live());

        h.timer.step(3_001.0);
        h.timer.toggle_active_time(Side::Red);
        assert!(!h.timer.active(Side::Red).is_live());
    }

    #[test]
    fn active_time_toggles_with_animation_between_periods() {
        let mut h = harness(&short_match());
        h.timer.toggle_active_time(Side::Red);
        assert!(h.timer.active(Side::Red).is_live());
        assert!(!h.timer.active(Side::Red).is_running());
        assert_eq!(h.red.visibility(), Some(Visibility::Revealed));

        h.timer.toggle_active_time(Side::Red);
        assert!(!h.timer.active(Side::Red).is_live());
        assert_eq!(h.red.visibility(), Some(Visibility::Concealed));
    }

    #[test]
    fn live_active_time_runs_with_the_period() {
        let mut h = harness(&short_match());
        h.timer.toggle_active_time(Side::Red);
        h.toggle_at(0.0);
        assert!(h.timer.active(Side::Red).is_running());
        assert!(!h.timer.active(Side::Blu).is_running());

        h.timer.step(500.0);
        h.toggle_at(500.0);
        assert!(!h.timer.active(Side::Red).is_running());
        assert_eq!(h.timer.active(Side::Red).time(), 500.0);
    }

    #[test]
    fn active_time_ends_on_its_own_without_stopping_the_period() {
        let mut h = harness(&short_match());
        h.timer.toggle_active_time(Side::Red);
        h.toggle_at(0.0);
        h.timer.step(1_001.0);
        assert!(h.timer.active(Side::Red).has_ended());
        assert!(h.timer.period().is_running());

        h.toggle_at(1_100.0);
        h.toggle_at(1_200.0);
        assert!(!h.timer.active(Side::Red).is_running());
    }

    #[test]
    fn period_end_hides_and_ends_active_time() {
        let mut settings = short_match();
        settings.timer.active.seconds = 30;
        let mut h = harness(&settings);
        h.timer.toggle_active_time(Side::Red);
        h.toggle_at(0.0);
        h.timer.step(3_001.0);

        let red = h.timer.active(Side::Red);
        assert!(red.has_ended());
        assert!(!red.is_running());
        assert!(!red.is_live());
        assert_eq!(h.red.visibility(), Some(Visibility::Hidden));
    }

    #[test]
    fn reset_returns_to_the_first_period() {
        let mut h = harness(&short_match());
        h.timer.toggle_active_time(Side::Blu);
        h.toggle_at(0.0);
        h.timer.step(3_001.0);
        h.timer.step(5_002.0);
        assert_eq!(h.timer.period_number(), 2);

        h.timer.reset();
        assert_eq!(h.timer.period_number(), 1);
        assert_eq!(h.info.html(), "1. Halbzeit");
        assert!(h.timer.period().is_live());
        assert_eq!(h.timer.period().time(), 3_000.0);
        assert!(!h.timer.pause().is_live());
        assert!(!h.timer.active(Side::Blu).is_live());
    }

    #[test]
    fn steps_rotate_sponsors() {
        let mut h = harness(&Settings::default());
        h.toggle_at(0.0);
        h.timer.step(45_001.0);
        assert_eq!(h.sponsor.sources.borrow().len(), 2);
    }
}
