use serde::{Deserialize, Serialize};

use crate::board::{Board, Monitor};

/// `true` when every unpressed monitor has a negative score.
pub fn is_negative(board: &Board) -> bool {
    board.unpressed().all(|monitor| monitor.score() < 0)
}

/// Which end of the score range a negative-context press draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Press the highest scores first.
    Max,
    /// Then the lowest.
    Min,
    /// Both ends are exhausted; nothing is legal.
    Closed,
}

/// What governs the legality of the next press.
///
/// The anchors are the monitors most recently pressed in each negative-context
/// phase. They survive context re-evaluation and are only replaced by a new press.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressContext {
    negative: bool,
    last_max: Option<usize>,
    last_min: Option<usize>,
}

impl PressContext {
    pub fn new(board: &Board) -> Self {
        Self {
            negative: is_negative(board),
            last_max: None,
            last_min: None,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn last_max(&self) -> Option<usize> {
        self.last_max
    }

    pub fn last_min(&self) -> Option<usize> {
        self.last_min
    }

    /// Evaluate the context predicate from scratch. Returns `true` if it changed.
    pub(crate) fn reevaluate(&mut self, board: &Board) -> bool {
        let negative = is_negative(board);
        let changed = negative != self.negative;
        self.negative = negative;
        changed
    }

    fn anchor_score(board: &Board, anchor: Option<usize>) -> Option<i32> {
        anchor.and_then(|index| board.monitor(index)).map(Monitor::score)
    }

    /// The current negative-context phase and the monitors legal to press in it.
    pub fn negative_candidates(&self, board: &Board) -> (Phase, Vec<usize>) {
        let (Some(max), Some(min)) = (board.max_unpressed_score(), board.min_unpressed_score())
        else {
            return (Phase::Closed, Vec::new());
        };

        match Self::anchor_score(board, self.last_max) {
            Some(anchor) if max < anchor => {}
            _ => return (Phase::Max, board.unpressed_with_score(max)),
        }

        match Self::anchor_score(board, self.last_min) {
            Some(anchor) if min > anchor => (Phase::Closed, Vec::new()),
            _ => (Phase::Min, board.unpressed_with_score(min)),
        }
    }

    /// `true` once the max phase has been exhausted below its anchor.
    pub fn max_exhausted(&self, board: &Board) -> bool {
        match (
            Self::anchor_score(board, self.last_max),
            board.max_unpressed_score(),
        ) {
            (Some(anchor), Some(max)) => max < anchor,
            _ => false,
        }
    }

    /// Note a legal press made in `phase`.
    pub(crate) fn pressed(&mut self, phase: Phase, index: usize) {
        match phase {
            Phase::Max => {
                self.last_max = Some(index);
                self.last_min = None;
            }
            Phase::Min => self.last_min = Some(index),
            Phase::Closed => {}
        }
    }

    /// Negative-context completion: both anchors exist, every monitor sharing
    /// an anchor's score is pressed, and no unpressed score lies beyond either.
    pub fn is_settled(&self, board: &Board) -> bool {
        let all_pressed_at = |score: i32| {
            board
                .monitors()
                .iter()
                .filter(|monitor| monitor.score() == score)
                .all(Monitor::is_pressed)
        };

        let Some(max_anchor) = Self::anchor_score(board, self.last_max) else {
            return false;
        };
        if board
            .max_unpressed_score()
            .is_some_and(|max| max > max_anchor)
        {
            return false;
        }
        if !all_pressed_at(max_anchor) {
            return false;
        }

        let Some(min_anchor) = Self::anchor_score(board, self.last_min) else {
            return false;
        };
        if board
            .min_unpressed_score()
            .is_some_and(|min| min < min_anchor)
        {
            return false;
        }
        all_pressed_at(min_anchor)
    }
}
