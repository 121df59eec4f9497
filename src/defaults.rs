//! Built-in settings, key binding presets and weight classes.

use crate::keys::Keymap;
use crate::settings::{ClockParams, Fight, Language, MatchParams, SponsorParams};

/// Subsecond threshold in seconds used when the operator enables tenths.
pub const SUBSECOND_THRESHOLD: u32 = 10;

pub const DEFAULT_KEYMAP: &str = "tastatur";
pub const KEYMAP_PRESETS: [&str; 2] = ["tastatur", "alos"];

/// Selectable buzzer sounds. An empty path is silence.
pub const BUZZER_FILES: [(&str, &str); 6] = [
    ("IndustrialAlarm", "audio/IndustrialAlarm.mp3"),
    ("Schiff", "audio/AirHornShip.mp3"),
    ("AirHorn", "audio/AirHorn.mp3"),
    ("Buzz", "audio/Buzz.mp3"),
    ("DoorBuzzer", "audio/DoorBuzzer.mp3"),
    ("(Kein Ton)", ""),
];

/// Audio file of a buzzer by name, silence for unknown names.
pub fn buzzer_file(name: &str) -> &'static str {
    BUZZER_FILES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, file)| *file)
        .unwrap_or("")
}

pub fn period_params() -> ClockParams {
    ClockParams {
        name: "period".to_string(),
        minutes: 3,
        seconds: 0,
        countdown: true,
        subsecond: SUBSECOND_THRESHOLD,
        always_lead_zero: true,
    }
}

pub fn pause_params() -> ClockParams {
    ClockParams {
        name: "pause".to_string(),
        minutes: 0,
        seconds: 30,
        countdown: true,
        subsecond: 0,
        always_lead_zero: false,
    }
}

pub fn active_params() -> ClockParams {
    ClockParams {
        name: "active".to_string(),
        ..pause_params()
    }
}

pub fn language() -> Language {
    Language {
        period_suffix: ". Halbzeit".to_string(),
        weight_suffix: " kg".to_string(),
        greco: "Greco".to_string(),
        non_greco: "Freistil".to_string(),
        greco_short: "G".to_string(),
        non_greco_short: "F".to_string(),
        fullscreen_on: "Vollbild ein".to_string(),
        fullscreen_off: "Vollbild aus".to_string(),
    }
}

pub fn sponsors() -> SponsorParams {
    SponsorParams {
        directory_light: "sponsoren/light/".to_string(),
        directory_dark: "sponsoren/dark/".to_string(),
        interval: 45,
        quantity: 3,
        show: true,
    }
}

pub fn match_params() -> MatchParams {
    MatchParams {
        red: "RR Schattdorf".to_string(),
        blu: "Gäste".to_string(),
        show_weigth: true,
        last_period: 2,
        buzzer: "IndustrialAlarm".to_string(),
        mm_set: true,
        show_teams: true,
        sponsors: sponsors(),
        theme: false,
        wrestlers_above_teams: true,
    }
}

/// Weight classes of a team match, first leg.
pub fn first_leg_fights() -> Vec<Fight> {
    [
        ("57", false),
        ("61", true),
        ("65", false),
        ("70", true),
        ("74", false),
        ("74", true),
        ("80", false),
        ("86", true),
        ("97", false),
        ("130", true),
    ]
    .iter()
    .map(|&(weight, greco)| Fight {
        red: String::new(),
        blu: String::new(),
        weight: weight.to_string(),
        greco,
    })
    .collect()
}

pub const TASTATUR_KEYS: [&str; 20] = [
    "space", "z", "t", "y", "f", "v", "j", "n", "d", "c", "k", "m", "e", "i", "w", "q", "o", "p",
    ",", "1",
];

pub const ALOS_KEYS: [&str; 20] = [
    "m", "x", "c", "v", "f", "s", "r", "w", "d", "j", "e", "u", "f1", "2", "5", "f2", "4", "3",
    "6", "7",
];

/// Key binding preset by name.
pub fn keymap(name: &str) -> Option<Keymap> {
    match name {
        "tastatur" => Some(Keymap::tastatur()),
        "alos" => Some(Keymap::from_keys(ALOS_KEYS)),
        _ => None,
    }
}
