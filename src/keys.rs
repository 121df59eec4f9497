//! Keyboard bindings and input modes.

use crate::defaults;
use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};

/// Everything an operator can trigger from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Toggle,
    Next,
    Prev,
    Reset,
    IncrRedWres,
    IncrRedTeam,
    IncrBluWres,
    IncrBluTeam,
    DecrRedWres,
    DecrRedTeam,
    DecrBluWres,
    DecrBluTeam,
    ActiveRed,
    ActiveBlu,
    IncrWarnRed,
    DecrWarnRed,
    IncrWarnBlu,
    DecrWarnBlu,
    OpenMatchConfig,
    ToggleOverview,
}

impl Action {
    pub const ALL: [Action; 20] = [
        Action::Toggle,
        Action::Next,
        Action::Prev,
        Action::Reset,
        Action::IncrRedWres,
        Action::IncrRedTeam,
        Action::IncrBluWres,
        Action::IncrBluTeam,
        Action::DecrRedWres,
        Action::DecrRedTeam,
        Action::DecrBluWres,
        Action::DecrBluTeam,
        Action::ActiveRed,
        Action::ActiveBlu,
        Action::IncrWarnRed,
        Action::DecrWarnRed,
        Action::IncrWarnBlu,
        Action::DecrWarnBlu,
        Action::OpenMatchConfig,
        Action::ToggleOverview,
    ];

    /// Label shown next to the binding in the key configuration form.
    pub fn description(self) -> &'static str {
        match self {
            Action::Toggle => "Start/Stop Uhr",
            Action::Next => "Nächster Kampf",
            Action::Prev => "Vorheriger Kampf",
            Action::Reset => "Kampf zurücksetzen",
            Action::IncrRedWres => "Einzelpunkte Rot +1",
            Action::IncrRedTeam => "Teampunkte Rot +1",
            Action::IncrBluWres => "Einzelpunkte Blau +1",
            Action::IncrBluTeam => "Teampunkte Blau +1",
            Action::DecrRedWres => "Einzelpunkte Rot -1",
            Action::DecrRedTeam => "Teampunkte Rot -1",
            Action::DecrBluWres => "Einzelpunkte Blau -1",
            Action::DecrBluTeam => "Teampunkte Blau -1",
            Action::ActiveRed => "Aktivzeit Rot",
            Action::ActiveBlu => "Aktivzeit Blau",
            Action::IncrWarnRed => "Verwarnung Rot +1",
            Action::DecrWarnRed => "Verwarnung Rot -1",
            Action::IncrWarnBlu => "Verwarnung Blau +1",
            Action::DecrWarnBlu => "Verwarnung Blau -1",
            Action::OpenMatchConfig => "Einstellungen öffnen",
            Action::ToggleOverview => "Matchübersicht öffnen",
        }
    }
}

/// One key name per action, as stored in settings files. The default binds
/// nothing; keys missing from a file fall back to the `tastatur` preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default = "Keymap::tastatur")]
pub struct Keymap {
    pub toggle: String,
    pub next: String,
    pub prev: String,
    pub reset: String,
    pub incr_red_wres: String,
    pub incr_red_team: String,
    pub incr_blu_wres: String,
    pub incr_blu_team: String,
    pub decr_red_wres: String,
    pub decr_red_team: String,
    pub decr_blu_wres: String,
    pub decr_blu_team: String,
    pub active_red: String,
    pub active_blu: String,
    pub incr_warn_red: String,
    pub decr_warn_red: String,
    pub incr_warn_blu: String,
    pub decr_warn_blu: String,
    pub open_match_config: String,
    pub toggle_overview: String,
}

impl Keymap {
    pub fn tastatur() -> Self {
        Keymap::from_keys(defaults::TASTATUR_KEYS)
    }

    /// Builds a keymap from key names in the order of [`Action::ALL`].
    pub fn from_keys(keys: [&str; 20]) -> Self {
        let mut keymap = Keymap::default();
        for (action, key) in Action::ALL.iter().zip(keys) {
            keymap.set(*action, key);
        }
        keymap
    }

    pub fn key(&self, action: Action) -> &str {
        match action {
            Action::Toggle => &self.toggle,
            Action::Next => &self.next,
            Action::Prev => &self.prev,
            Action::Reset => &self.reset,
            Action::IncrRedWres => &self.incr_red_wres,
            Action::IncrRedTeam => &self.incr_red_team,
            Action::IncrBluWres => &self.incr_blu_wres,
            Action::IncrBluTeam => &self.incr_blu_team,
            Action::DecrRedWres => &self.decr_red_wres,
            Action::DecrRedTeam => &self.decr_red_team,
            Action::DecrBluWres => &self.decr_blu_wres,
            Action::DecrBluTeam => &self.decr_blu_team,
            Action::ActiveRed => &self.active_red,
            Action::ActiveBlu => &self.active_blu,
            Action::IncrWarnRed => &self.incr_warn_red,
            Action::DecrWarnRed => &self.decr_warn_red,
            Action::IncrWarnBlu => &self.incr_warn_blu,
            Action::DecrWarnBlu => &self.decr_warn_blu,
            Action::OpenMatchConfig => &self.open_match_config,
            Action::ToggleOverview => &self.toggle_overview,
        }
    }

    pub fn set(&mut self, action: Action, key: impl Into<String>) {
        let slot = match action {
            Action::Toggle => &mut self.toggle,
            Action::Next => &mut self.next,
            Action::Prev => &mut self.prev,
            Action::Reset => &mut self.reset,
            Action::IncrRedWres => &mut self.incr_red_wres,
            Action::IncrRedTeam => &mut self.incr_red_team,
            Action::IncrBluWres => &mut self.incr_blu_wres,
            Action::IncrBluTeam => &mut self.incr_blu_team,
            Action::DecrRedWres => &mut self.decr_red_wres,
            Action::DecrRedTeam => &mut self.decr_red_team,
            Action::DecrBluWres => &mut self.decr_blu_wres,
            Action::DecrBluTeam => &mut self.decr_blu_team,
            Action::ActiveRed => &mut self.active_red,
            Action::ActiveBlu => &mut self.active_blu,
            Action::IncrWarnRed => &mut self.incr_warn_red,
            Action::DecrWarnRed => &mut self.decr_warn_red,
            Action::IncrWarnBlu => &mut self.incr_warn_blu,
            Action::DecrWarnBlu => &mut self.decr_warn_blu,
            Action::OpenMatchConfig => &mut self.open_match_config,
            Action::ToggleOverview => &mut self.toggle_overview,
        };
        *slot = key.into();
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        if key.is_empty() {
            return None;
        }
        Action::ALL.iter().copied().find(|a| self.key(*a) == key)
    }

    /// Actions whose key is also bound to another action. Unbound actions
    /// never collide.
    pub fn duplicates(&self) -> Vec<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|a| {
                let key = self.key(*a);
                !key.is_empty()
                    && Action::ALL
                        .iter()
                        .any(|other| other != a && self.key(*other) == key)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (i, first) in Action::ALL.iter().enumerate() {
            let key = self.key(*first);
            if key.is_empty() {
                continue;
            }
            if let Some(second) = Action::ALL[i + 1..].iter().find(|a| self.key(**a) == key) {
                return Err(SettingsError::DuplicateKey {
                    key: key.to_string(),
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(())
    }
}

/// What a key press means in the current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Board(Action),
    ToggleOverview,
    OpenMatchConfig,
    CloseConfig,
}

/// Which surface currently receives the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Board,
    Overview,
    MatchConfig,
    KeysConfig,
}

impl InputMode {
    pub fn resolve(self, key: &str, keymap: &Keymap) -> Option<Command> {
        match self {
            InputMode::Board => keymap.action_for(key).map(|action| match action {
                Action::OpenMatchConfig => Command::OpenMatchConfig,
                Action::ToggleOverview => Command::ToggleOverview,
                other => Command::Board(other),
            }),
            InputMode::Overview => {
                if key == "esc" || key == keymap.key(Action::ToggleOverview) {
                    Some(Command::ToggleOverview)
                } else {
                    None
                }
            }
            InputMode::MatchConfig => (key == "esc").then_some(Command::CloseConfig),
            InputMode::KeysConfig => None,
        }
    }

    /// Mode after `command`. Overlays only open from the board and while no
    /// clock runs; `locked` also covers fullscreen for the settings form.
    pub fn after(self, command: Command, locked: bool) -> InputMode {
        match (self, command) {
            (_, Command::Board(_)) => self,
            (InputMode::Overview, Command::ToggleOverview) => InputMode::Board,
            (InputMode::Board, Command::ToggleOverview) if !locked => InputMode::Overview,
            (InputMode::Board, Command::OpenMatchConfig) if !locked => InputMode::MatchConfig,
            (InputMode::MatchConfig | InputMode::KeysConfig, Command::CloseConfig) => {
                InputMode::Board
            }
            _ => self,
        }
    }
}

/// Normalises a browser `KeyboardEvent.key` value to a binding name.
pub fn key_name(key: &str) -> String {
    match key {
        " " | "Spacebar" => "space".to_string(),
        "Escape" | "Esc" => "esc".to_string(),
        "ArrowUp" => "up".to_string(),
        "ArrowDown" => "down".to_string(),
        "ArrowLeft" => "left".to_string(),
        "ArrowRight" => "right".to_string(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keymap_resolves_board_actions() {
        let keymap = Keymap::tastatur();
        assert_eq!(
            InputMode::Board.resolve("space", &keymap),
            Some(Command::Board(Action::Toggle))
        );
        assert_eq!(
            InputMode::Board.resolve("e", &keymap),
            Some(Command::Board(Action::ActiveRed))
        );
        assert_eq!(
            InputMode::Board.resolve(",", &keymap),
            Some(Command::OpenMatchConfig)
        );
        assert_eq!(InputMode::Board.resolve("x", &keymap), None);
    }

    #[test]
    fn overview_only_listens_to_its_toggle_and_escape() {
        let keymap = Keymap::tastatur();
        assert_eq!(
            InputMode::Overview.resolve("1", &keymap),
            Some(Command::ToggleOverview)
        );
        assert_eq!(
            InputMode::Overview.resolve("esc", &keymap),
            Some(Command::ToggleOverview)
        );
        assert_eq!(InputMode::Overview.resolve("space", &keymap), None);
    }

    #[test]
    fn config_modes_ignore_board_keys() {
        let keymap = Keymap::tastatur();
        assert_eq!(InputMode::MatchConfig.resolve("space", &keymap), None);
        assert_eq!(
            InputMode::MatchConfig.resolve("esc", &keymap),
            Some(Command::CloseConfig)
        );
        assert_eq!(InputMode::KeysConfig.resolve("esc", &keymap), None);
    }

    #[test]
    fn overlays_open_only_while_unlocked() {
        assert_eq!(
            InputMode::Board.after(Command::ToggleOverview, false),
            InputMode::Overview
        );
        assert_eq!(
            InputMode::Board.after(Command::ToggleOverview, true),
            InputMode::Board
        );
        assert_eq!(
            InputMode::Board.after(Command::OpenMatchConfig, true),
            InputMode::Board
        );
        assert_eq!(
            InputMode::Board.after(Command::OpenMatchConfig, false),
            InputMode::MatchConfig
        );
    }

    #[test]
    fn overlays_always_close() {
        assert_eq!(
            InputMode::Overview.after(Command::ToggleOverview, true),
            InputMode::Board
        );
        assert_eq!(
            InputMode::MatchConfig.after(Command::CloseConfig, true),
            InputMode::Board
        );
        assert_eq!(
            InputMode::Overview.after(Command::Board(Action::Toggle), false),
            InputMode::Overview
        );
    }

    #[test]
    fn duplicate_bindings_are_reported() {
        let mut keymap = Keymap::tastatur();
        keymap.set(Action::Next, "space");
        assert_eq!(keymap.duplicates(), vec![Action::Toggle, Action::Next]);
        assert_eq!(
            keymap.validate(),
            Err(SettingsError::DuplicateKey {
                key: "space".to_string(),
                first: Action::Toggle,
                second: Action::Next,
            })
        );
    }

    #[test]
    fn unbound_actions_do_not_collide() {
        let mut keymap = Keymap::tastatur();
        keymap.set(Action::Next, "");
        keymap.set(Action::Prev, "");
        assert!(keymap.validate().is_ok());
        assert_eq!(keymap.action_for(""), None);
    }

    #[test]
    fn default_keymap_binds_nothing() {
        let keymap = Keymap::default();
        assert!(Action::ALL.iter().all(|a| keymap.key(*a).is_empty()));
        assert_eq!(InputMode::Board.resolve("space", &keymap), None);
    }

    #[test]
    fn partial_keymap_files_fall_back_to_tastatur() {
        let keymap: Keymap = serde_json::from_str(r#"{ "toggle": "m" }"#).unwrap();
        assert_eq!(keymap.key(Action::Toggle), "m");
        assert_eq!(keymap.key(Action::Next), "z");
        assert_eq!(keymap.key(Action::ToggleOverview), "1");
    }

    #[test]
    fn browser_key_values_are_normalised() {
        assert_eq!(key_name(" "), "space");
        assert_eq!(key_name("Escape"), "esc");
        assert_eq!(key_name("F1"), "f1");
        assert_eq!(key_name("Q"), "q");
        assert_eq!(key_name(","), ",");
    }
}
