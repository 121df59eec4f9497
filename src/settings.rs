//! Match settings snapshot.
//!
//! Field names serialise in camelCase so files written by earlier versions of
//! the board load unchanged. Every struct falls back to its defaults for
//! missing fields.

use crate::defaults;
use crate::keys::{Action, Keymap};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of a single clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClockParams {
    pub name: String,
    pub minutes: u32,
    pub seconds: u32,
    pub countdown: bool,
    /// Below this many seconds a countdown shows tenths. `0` disables it.
    pub subsecond: u32,
    pub always_lead_zero: bool,
}

impl ClockParams {
    pub fn duration_ms(&self) -> f64 {
        f64::from(self.minutes) * 60_000.0 + f64::from(self.seconds) * 1_000.0
    }
}

impl Default for ClockParams {
    fn default() -> Self {
        defaults::period_params()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fight {
    pub red: String,
    pub blu: String,
    pub weight: String,
    pub greco: bool,
}

impl Fight {
    pub fn is_named(&self) -> bool {
        !self.red.is_empty() || !self.blu.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    pub period: ClockParams,
    pub pause: ClockParams,
    pub active: ClockParams,
}

impl Default for TimerSettings {
    fn default() -> Self {
        TimerSettings {
            period: defaults::period_params(),
            pause: defaults::pause_params(),
            active: defaults::active_params(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub period_suffix: String,
    pub weight_suffix: String,
    pub greco: String,
    pub non_greco: String,
    pub greco_short: String,
    pub non_greco_short: String,
    pub fullscreen_on: String,
    pub fullscreen_off: String,
}

impl Default for Language {
    fn default() -> Self {
        defaults::language()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SponsorParams {
    pub directory_light: String,
    pub directory_dark: String,
    /// Seconds between two images.
    pub interval: u32,
    pub quantity: u32,
    pub show: bool,
}

impl Default for SponsorParams {
    fn default() -> Self {
        defaults::sponsors()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchParams {
    pub red: String,
    pub blu: String,
    pub show_weigth: bool,
    pub last_period: u32,
    pub buzzer: String,
    pub mm_set: bool,
    pub show_teams: bool,
    pub sponsors: SponsorParams,
    /// `true` is the light theme.
    pub theme: bool,
    pub wrestlers_above_teams: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        defaults::match_params()
    }
}

/// Complete settings of one match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fights: Vec<Fight>,
    pub timer: TimerSettings,
    pub lang: Language,
    #[serde(rename = "match")]
    pub match_params: MatchParams,
    pub keymap: Keymap,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fights: defaults::first_leg_fights(),
            timer: TimerSettings::default(),
            lang: Language::default(),
            match_params: MatchParams::default(),
            keymap: Keymap::tastatur(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    InvalidPeriod { minutes: u32, seconds: u32 },
    InvalidLastPeriod(u32),
    UnparsableDuration(String),
    Json(String),
    DuplicateKey {
        key: String,
        first: Action,
        second: Action,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidPeriod { minutes, seconds } => write!(
                f,
                "Invalid period length {}:{:02} (minutes and seconds must be below 60 and not both zero)",
                minutes, seconds
            ),
            SettingsError::InvalidLastPeriod(n) => {
                write!(f, "A match needs at least one period, got {}", n)
            }
            SettingsError::UnparsableDuration(text) => write!(
                f,
                "Cannot read '{}' as a duration. Use 3:00, 2m30s, 90s or 90",
                text
            ),
            SettingsError::Json(e) => write!(f, "Settings file is not valid: {}", e),
            SettingsError::DuplicateKey { key, first, second } => write!(
                f,
                "Key '{}' is bound to both '{}' and '{}'",
                key,
                first.description(),
                second.description()
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Checks a period length entered by the operator.
pub fn validate_period(minutes: u32, seconds: u32) -> Result<(), SettingsError> {
    if minutes < 60 && seconds < 60 && (minutes > 0 || seconds > 0) {
        Ok(())
    } else {
        Err(SettingsError::InvalidPeriod { minutes, seconds })
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_period(self.timer.period.minutes, self.timer.period.seconds)?;
        if self.match_params.last_period == 0 {
            return Err(SettingsError::InvalidLastPeriod(0));
        }
        self.keymap.validate()
    }

    /// Returns a copy with a new period length.
    ///
    /// The countdown flag applies to period and pause, the subsecond flag
    /// switches the period's tenths display on at the default threshold.
    pub fn with_period(
        &self,
        minutes: u32,
        seconds: u32,
        countdown: bool,
        subsecond: bool,
    ) -> Result<Settings, SettingsError> {
        validate_period(minutes, seconds)?;
        let mut next = self.clone();
        next.timer.period.minutes = minutes;
        next.timer.period.seconds = seconds;
        next.timer.period.subsecond = if subsecond {
            defaults::SUBSECOND_THRESHOLD
        } else {
            0
        };
        next.timer.period.countdown = countdown;
        next.timer.pause.countdown = countdown;
        Ok(next)
    }

    pub fn subsecond_enabled(&self) -> bool {
        self.timer.period.subsecond > 0 || self.timer.pause.subsecond > 0
    }

    pub fn has_named_fights(&self) -> bool {
        self.fights.iter().any(Fight::is_named)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Json(e.to_string()))
    }

    /// Reads a settings file on top of these settings.
    ///
    /// Language strings, sponsor locations and display-only clock parameters
    /// are not taken from files and stay as they are.
    pub fn import(&self, json: &str) -> Result<Settings, SettingsError> {
        let loaded: Settings =
            serde_json::from_str(json).map_err(|e| SettingsError::Json(e.to_string()))?;

        let mut next = self.clone();
        next.timer.period.minutes = loaded.timer.period.minutes;
        next.timer.period.seconds = loaded.timer.period.seconds;
        next.timer.period.countdown = loaded.timer.period.countdown;
        next.timer.pause.countdown = loaded.timer.period.countdown;
        next.timer.period.subsecond = if loaded.subsecond_enabled() {
            defaults::SUBSECOND_THRESHOLD
        } else {
            0
        };
        next.fights = loaded.fights;

        let m = loaded.match_params;
        next.match_params.red = m.red;
        next.match_params.blu = m.blu;
        next.match_params.show_weigth = m.show_weigth;
        next.match_params.last_period = m.last_period;
        next.match_params.buzzer = m.buzzer;
        next.match_params.mm_set = m.mm_set;
        next.match_params.show_teams = m.show_teams;
        next.match_params.sponsors.show = m.sponsors.show;
        next.match_params.theme = m.theme;
        next.match_params.wrestlers_above_teams = m.wrestlers_above_teams;

        if loaded.keymap.validate().is_ok() {
            next.keymap = loaded.keymap;
        } else {
            debug!("Ignoring key bindings with duplicates from settings file");
        }

        next.validate()?;
        info!("Imported settings with {} fights", next.fights.len());
        Ok(next)
    }

    pub fn add_fight(&mut self) {
        self.fights.push(Fight::default());
    }

    pub fn remove_fight(&mut self) {
        self.fights.pop();
    }

    pub fn clear_names(&mut self) {
        for fight in &mut self.fights {
            fight.red.clear();
            fight.blu.clear();
        }
    }

    /// Writes the default weight classes into the first rows. The return leg
    /// swaps greco and freestyle.
    pub fn apply_weight_preset(&mut self, return_leg: bool) {
        for (fight, preset) in self.fights.iter_mut().zip(defaults::first_leg_fights()) {
            fight.weight = preset.weight;
            fight.greco = preset.greco != return_leg;
        }
    }
}
