use std::collections::VecDeque;

use crate::compare::{TeamComparison, dual_window};
use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TeamPick,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSide {
    Left,
    Right,
}

pub struct AppState {
    pub screen: Screen,
    pub dataset: Dataset,
    pub teams: Vec<String>,
    pub pick_side: PickSide,
    pub left_cursor: usize,
    pub right_cursor: usize,
    pub left_team: Option<String>,
    pub right_team: Option<String>,
    pub left_compare: Option<TeamComparison>,
    pub right_compare: Option<TeamComparison>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let teams = dataset.team_names();
        Self {
            screen: Screen::TeamPick,
            dataset,
            teams,
            pick_side: PickSide::Left,
            left_cursor: 0,
            right_cursor: 0,
            left_team: None,
            right_team: None,
            left_compare: None,
            right_compare: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_side(&mut self) {
        self.pick_side = match self.pick_side {
            PickSide::Left => PickSide::Right,
            PickSide::Right => PickSide::Left,
        };
    }

    fn active_cursor_mut(&mut self) -> &mut usize {
        match self.pick_side {
            PickSide::Left => &mut self.left_cursor,
            PickSide::Right => &mut self.right_cursor,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.teams.len();
        let cursor = self.active_cursor_mut();
        if total == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.teams.len();
        let cursor = self.active_cursor_mut();
        if total == 0 {
            *cursor = 0;
            return;
        }
        *cursor = if *cursor == 0 { total - 1 } else { *cursor - 1 };
    }

    /// Confirm the active selector. Once both sides name different teams,
    /// compute both comparisons and move to the stats screen; picking the
    /// same team twice keeps the picker up, as the original app did.
    pub fn confirm_selection(&mut self) {
        let cursor = match self.pick_side {
            PickSide::Left => self.left_cursor,
            PickSide::Right => self.right_cursor,
        };
        let Some(team) = self.teams.get(cursor) else {
            return;
        };
        let team = team.clone();
        match self.pick_side {
            PickSide::Left => self.left_team = Some(team),
            PickSide::Right => self.right_team = Some(team),
        }
        self.toggle_side();

        let (Some(left), Some(right)) = (self.left_team.clone(), self.right_team.clone()) else {
            return;
        };
        if left == right {
            self.push_log("[WARN] Seleziona due squadre diverse");
            return;
        }

        let left_compare = dual_window(&self.dataset, &left);
        let right_compare = dual_window(&self.dataset, &right);
        for cmp in [&left_compare, &right_compare] {
            if cmp.detail.is_empty() {
                self.push_log(format!("[INFO] Nessuna partita per {}", cmp.team));
            } else if !cmp.has_stats() {
                self.push_log(format!(
                    "[INFO] Nessuna statistica calcolabile per {}",
                    cmp.team
                ));
            }
        }
        self.left_compare = Some(left_compare);
        self.right_compare = Some(right_compare);
        self.screen = Screen::Stats;
    }

    pub fn back_to_pick(&mut self) {
        self.screen = Screen::TeamPick;
    }
}
