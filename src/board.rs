//! Board state: bout list, scores, warnings and the match timer.

use crate::keys::Action;
use crate::settings::{Fight, Settings};
use crate::timer::{Runtime, Timer, TimerOutputs};
use crate::Side;
use log::{debug, info};
use std::rc::Rc;

/// Fight index for each bout position when the tournament order is active.
const TOURNAMENT_ORDER: [usize; 11] = [0, 0, 9, 1, 8, 2, 7, 3, 6, 4, 5];

pub const MAX_SCORE: u32 = 99;
pub const MAX_WARNINGS: u32 = 3;

/// A bounded counter. Changes that would leave the bounds are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    value: u32,
    max: u32,
}

impl Score {
    pub fn new(max: u32) -> Self {
        Score { value: 0, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn delta(&mut self, d: i32) -> u32 {
        let next = i64::from(self.value) + i64::from(d);
        if (0..=i64::from(self.max)).contains(&next) {
            self.value = next as u32;
        }
        self.value
    }

    pub fn clear(&mut self) {
        self.value = 0;
    }
}

/// Team score, wrestler score and warnings of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub team: Score,
    pub wres: Score,
    pub warnings: Score,
}

impl Default for Corner {
    fn default() -> Self {
        Corner {
            team: Score::new(MAX_SCORE),
            wres: Score::new(MAX_SCORE),
            warnings: Score::new(MAX_WARNINGS),
        }
    }
}

/// Position in the bout list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bouts {
    position: usize,
    current: Option<usize>,
    count: usize,
    tournament_order: bool,
}

impl Bouts {
    pub fn new(count: usize, tournament_order: bool) -> Self {
        Bouts {
            position: 1,
            current: Some(0),
            count,
            tournament_order,
        }
    }

    /// 1-based bout number.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Index into the fight list, if the position maps to a fight.
    pub fn current(&self) -> Option<usize> {
        self.current.filter(|&index| index < self.count)
    }

    /// Moves by `delta` bouts. Returns false when the target is outside the list.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let target = self.position as isize + delta;
        if target < 1 || target as usize > self.count {
            return false;
        }
        self.position = target as usize;
        self.current = if self.tournament_order {
            TOURNAMENT_ORDER.get(self.position).copied()
        } else {
            Some(self.position - 1)
        };
        true
    }
}

pub struct Board {
    settings: Rc<Settings>,
    bouts: Bouts,
    red: Corner,
    blu: Corner,
    timer: Timer,
}

impl Board {
    pub fn new(settings: Rc<Settings>, outputs: TimerOutputs, runtime: Runtime) -> Self {
        info!(
            "Board loaded with {} fights, {} periods",
            settings.fights.len(),
            settings.match_params.last_period
        );
        let timer = Timer::new(&settings, outputs, runtime);
        Board {
            bouts: Bouts::new(settings.fights.len(), settings.match_params.mm_set),
            red: Corner::default(),
            blu: Corner::default(),
            timer,
            settings,
        }
    }

    pub fn settings(&self) -> &Rc<Settings> {
        &self.settings
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn bouts(&self) -> &Bouts {
        &self.bouts
    }

    pub fn corner(&self, side: Side) -> &Corner {
        match side {
            Side::Red => &self.red,
            Side::Blu => &self.blu,
        }
    }

    pub fn fight(&self) -> Option<&Fight> {
        self.bouts
            .current()
            .and_then(|index| self.settings.fights.get(index))
    }

    pub fn wrestler(&self, side: Side) -> &str {
        match (self.fight(), side) {
            (Some(fight), Side::Red) => &fight.red,
            (Some(fight), Side::Blu) => &fight.blu,
            (None, _) => "",
        }
    }

    pub fn weight_label(&self) -> String {
        match self.fight() {
            Some(fight) if !fight.weight.is_empty() => {
                format!("{}{}", fight.weight, self.settings.lang.weight_suffix)
            }
            _ => String::new(),
        }
    }

    pub fn style_label(&self) -> &str {
        match self.fight() {
            Some(fight) if fight.greco => &self.settings.lang.greco,
            Some(_) => &self.settings.lang.non_greco,
            None => "",
        }
    }

    /// Team scores appear in the overview once either side has scored.
    pub fn overview_shows_team_scores(&self) -> bool {
        let scored = self.red.team.value() > 0 || self.blu.team.value() > 0;
        scored && self.settings.match_params.show_teams
    }

    pub fn overview_shows_bouts(&self) -> bool {
        self.settings.has_named_fights() && self.settings.match_params.show_weigth
    }

    pub fn is_clock_running(&self) -> bool {
        self.timer.any_clock_running()
    }

    pub fn step(&mut self, timestamp: f64) {
        self.timer.step(timestamp);
    }

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Toggle => self.timer.toggle(),
            Action::Next => {
                self.next();
            }
            Action::Prev => {
                self.prev();
            }
            Action::Reset => {
                self.reset();
            }
            Action::IncrRedWres => {
                self.red.wres.delta(1);
            }
            Action::IncrRedTeam => {
                self.red.team.delta(1);
            }
            Action::IncrBluWres => {
                self.blu.wres.delta(1);
            }
            Action::IncrBluTeam => {
                self.blu.team.delta(1);
            }
            Action::DecrRedWres => {
                self.red.wres.delta(-1);
            }
            Action::DecrRedTeam => {
                self.red.team.delta(-1);
            }
            Action::DecrBluWres => {
                self.blu.wres.delta(-1);
            }
            Action::DecrBluTeam => {
                self.blu.team.delta(-1);
            }
            Action::ActiveRed => self.timer.toggle_active_time(Side::Red),
            Action::ActiveBlu => self.timer.toggle_active_time(Side::Blu),
            Action::IncrWarnRed => {
                self.red.warnings.delta(1);
            }
            Action::DecrWarnRed => {
                self.red.warnings.delta(-1);
            }
            Action::IncrWarnBlu => {
                self.blu.warnings.delta(1);
            }
            Action::DecrWarnBlu => {
                self.blu.warnings.delta(-1);
            }
            Action::OpenMatchConfig | Action::ToggleOverview => {
                debug!("{:?} is not a board action", action);
            }
        }
    }

    /// Clears wrestler scores and warnings and resets the timer. Team scores
    /// stay. Refused while a clock runs.
    pub fn reset(&mut self) -> bool {
        if self.is_clock_running() {
            debug!("Reset refused while a clock runs");
            return false;
        }
        for corner in [&mut self.red, &mut self.blu] {
            corner.wres.clear();
            corner.warnings.clear();
        }
        self.timer.reset();
        true
    }

    pub fn next(&mut self) -> bool {
        self.move_bout(1)
    }

    pub fn prev(&mut self) -> bool {
        self.move_bout(-1)
    }

    fn move_bout(&mut self, delta: isize) -> bool {
        if self.is_clock_running() {
            debug!("Changing the bout refused while a clock runs");
            return false;
        }
        if self.bouts.move_by(delta) {
            info!("Bout {} of {}", self.bouts.position(), self.settings.fights.len());
        }
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ClockOutput;
    use crate::testing::{FakeBuzzer, FakeFrames, FakeImage, FakeSink, ManualClock};

    fn clock_output() -> ClockOutput {
        ClockOutput {
            sink: Box::new(FakeSink::default()),
            buzzer: Rc::new(FakeBuzzer::default()),
        }
    }

    fn board_with(settings: Settings) -> Board {
        let outputs = TimerOutputs {
            period: clock_output(),
            pause: clock_output(),
            active_red: clock_output(),
            active_blu: clock_output(),
            period_info: Box::new(FakeSink::default()),
            sponsor: Box::new(FakeImage::default()),
        };
        let runtime = Runtime {
            clock: Rc::new(ManualClock::default()),
            frames: Rc::new(FakeFrames::default()),
        };
        Board::new(Rc::new(settings), outputs, runtime)
    }

    fn named_settings() -> Settings {
        let mut settings = Settings::default();
        for (i, fight) in settings.fights.iter_mut().enumerate() {
            fight.red = format!("red {}", i);
            fight.blu = format!("blue {}", i);
        }
        settings.match_params.mm_set = false;
        settings
    }

    #[test]
    fn score_ignores_changes_out_of_bounds() {
        let mut score = Score::new(2);
        assert_eq!(score.delta(-1), 0);
        assert_eq!(score.delta(1), 1);
        assert_eq!(score.delta(1), 2);
        assert_eq!(score.delta(1), 2);
        assert_eq!(score.delta(-1), 1);
    }

    #[test]
    fn warnings_stay_between_zero_and_three() {
        let mut board = board_with(Settings::default());
        for _ in 0..5 {
            board.perform(Action::IncrWarnRed);
        }
        assert_eq!(board.corner(Side::Red).warnings.value(), 3);
        board.perform(Action::DecrWarnBlu);
        assert_eq!(board.corner(Side::Blu).warnings.value(), 0);
    }

    #[test]
    fn score_actions_change_the_right_counter() {
        let mut board = board_with(Settings::default());
        board.perform(Action::IncrRedWres);
        board.perform(Action::IncrRedWres);
        board.perform(Action::IncrBluTeam);
        board.perform(Action::DecrRedWres);
        assert_eq!(board.corner(Side::Red).wres.value(), 1);
        assert_eq!(board.corner(Side::Red).team.value(), 0);
        assert_eq!(board.corner(Side::Blu).team.value(), 1);
        assert_eq!(board.corner(Side::Blu).wres.value(), 0);
    }

    #[test]
    fn reset_keeps_team_scores() {
        let mut board = board_with(Settings::default());
        board.perform(Action::IncrRedTeam);
        board.perform(Action::IncrRedWres);
        board.perform(Action::IncrWarnBlu);
        assert!(board.reset());
        assert_eq!(board.corner(Side::Red).team.value(), 1);
        assert_eq!(board.corner(Side::Red).wres.value(), 0);
        assert_eq!(board.corner(Side::Blu).warnings.value(), 0);
    }

    #[test]
    fn reset_and_bout_changes_are_refused_while_running() {
        let mut board = board_with(named_settings());
        board.perform(Action::IncrRedWres);
        board.perform(Action::Toggle);
        assert!(board.is_clock_running());

        assert!(!board.reset());
        assert!(!board.next());
        board.perform(Action::Prev);
        assert_eq!(board.corner(Side::Red).wres.value(), 1);
        assert_eq!(board.bouts().position(), 1);

        board.perform(Action::Toggle);
        assert!(board.next());
        assert_eq!(board.bouts().position(), 2);
        assert_eq!(board.corner(Side::Red).wres.value(), 0);
    }

    #[test]
    fn bouts_move_within_the_list_only() {
        let mut board = board_with(named_settings());
        assert_eq!(board.wrestler(Side::Red), "red 0");
        board.prev();
        assert_eq!(board.bouts().position(), 1);

        for _ in 0..20 {
            board.next();
        }
        assert_eq!(board.bouts().position(), 10);
        assert_eq!(board.wrestler(Side::Blu), "blue 9");
        assert_eq!(board.weight_label(), "130 kg");
    }

    #[test]
    fn tournament_order_maps_positions() {
        let mut bouts = Bouts::new(10, true);
        let mut order = vec![bouts.current()];
        while bouts.move_by(1) {
            order.push(bouts.current());
        }
        assert_eq!(
            order,
            [0, 9, 1, 8, 2, 7, 3, 6, 4, 5].map(Some).to_vec()
        );
    }

    #[test]
    fn positions_beyond_the_tournament_order_have_no_fight() {
        let mut bouts = Bouts::new(12, true);
        for _ in 0..11 {
            bouts.move_by(1);
        }
        assert_eq!(bouts.position(), 12);
        assert_eq!(bouts.current(), None);
    }

    #[test]
    fn empty_fight_list_has_no_current_fight() {
        let mut settings = Settings::default();
        settings.fights.clear();
        let mut board = board_with(settings);
        assert!(board.fight().is_none());
        assert_eq!(board.wrestler(Side::Red), "");
        assert_eq!(board.style_label(), "");
        board.next();
        assert_eq!(board.bouts().position(), 1);
    }

    #[test]
    fn overview_shows_what_is_available() {
        let mut board = board_with(named_settings());
        assert!(!board.overview_shows_team_scores());
        assert!(board.overview_shows_bouts());
        board.perform(Action::IncrBluTeam);
        assert!(board.overview_shows_team_scores());

        let unnamed = board_with(Settings::default());
        assert!(!unnamed.overview_shows_bouts());
    }

    #[test]
    fn active_actions_reach_the_timer() {
        let mut board = board_with(Settings::default());
        board.perform(Action::ActiveBlu);
        assert!(board.timer().active(Side::Blu).is_live());
        assert!(!board.timer().active(Side::Red).is_live());
    }
}
