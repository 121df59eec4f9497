//! Sponsor image rotation.

use crate::settings::SponsorParams;
use crate::utils::pad0;
use crate::SponsorSink;
use log::debug;

/// Cycles through numbered sponsor images on the animation tick.
pub struct Sponsors {
    sink: Box<dyn SponsorSink>,
    directory: String,
    interval_ms: f64,
    quantity: u32,
    enabled: bool,
    current: u32,
    last_change: f64,
}

impl Sponsors {
    pub fn new(params: &SponsorParams, light_theme: bool, sink: Box<dyn SponsorSink>, now: f64) -> Self {
        let directory = if light_theme {
            params.directory_light.clone()
        } else {
            params.directory_dark.clone()
        };
        let mut sponsors = Sponsors {
            sink,
            directory,
            interval_ms: f64::from(params.interval) * 1_000.0,
            quantity: params.quantity,
            enabled: params.show && params.quantity > 0,
            current: 1,
            last_change: now,
        };
        if sponsors.enabled {
            sponsors.sink.show();
            sponsors.set_image();
        } else {
            sponsors.sink.hide();
        }
        sponsors
    }

    pub fn update(&mut self, now: f64) {
        if self.enabled && now - self.last_change > self.interval_ms {
            self.last_change = now;
            self.set_image();
        }
    }

    fn set_image(&mut self) {
        let src = format!("{}{}.png", self.directory, pad0(u64::from(self.current), 2));
        debug!("Showing sponsor {}", src);
        self.sink.set_source(&src);
        self.current += 1;
        if self.current > self.quantity {
            self.current = 1;
        }
    }
}
