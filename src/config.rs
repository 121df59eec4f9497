//! Application-level configuration constants.

use log::LevelFilter;

// UI Behavior
pub const TITLEBAR_HIDE_MS: u32 = 2_000;
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const SETTINGS_FILE_NAME: &str = "scoreboard.json";
pub const LOGO_SRC: &str = "img/logo.png";

// CSS classes toggled outside the virtual DOM
pub const CONCEALED_CLASS: &str = "concealed";
pub const LIGHT_THEME_CLASS: &str = "light";
pub const DARK_THEME_CLASS: &str = "dark";

// CSS classes of form and board state
pub const INVALID_CLASS: &str = "invalid";
pub const WARNING_SHOWN_CLASS: &str = "showWarning";

// Labels
pub const SETTINGS_LABEL: &str = "Einstellungen";
pub const KEYS_LABEL: &str = "Tastenbelegung";
pub const WEIGHT_PRESETS: [(&str, Option<bool>); 3] = [
    ("Gewichtsklassen", None),
    ("Hinrunde", Some(false)),
    ("Rückrunde", Some(true)),
];
