//! The scoring engine.
//!
//! A monitor's score is the sum of five independent contributions, each a
//! pure function of the monitor, its indicators and the colors of the cables
//! touching it.

use std::fmt;

use crate::{
    board::{Board, Indicator, Monitor, INDICATOR_SLOTS},
    color::Color,
    rules,
    table::Table,
    topology::CableDirection,
};

/// `DIRECTION[(color, direction)]`, rows in `CableDirection` order.
const DIRECTION: Table<i32, 6, 8> = Table::new([
    // N
    [-3, -1, 2, -2, 3, 1],
    // NE
    [3, -3, -1, 1, 2, -2],
    // E
    [-1, -2, 1, 3, 2, -3],
    // SE
    [-3, -2, 1, -1, 3, 2],
    // S
    [3, -2, 1, 2, -1, -3],
    // SW
    [3, 1, -2, 2, -3, -1],
    // W
    [3, 2, -1, -3, 1, -2],
    // NW
    [-3, 2, -2, 1, -1, 3],
]);

/// `PAIRS[(slot, color)]`: `.0` scores a solid lamp by slot, `.1` scores the
/// nth lamp of the same color on a monitor.
const PAIRS: Table<(i32, i32), INDICATOR_SLOTS, 6> = Table::new([
    [(1, 2), (-3, -1), (3, 3)],
    [(-2, -3), (2, -2), (2, 1)],
    [(-3, -1), (1, 3), (2, 3)],
    [(3, 2), (-1, 2), (-1, 1)],
    [(1, -2), (-2, 1), (-3, -2)],
    [(-1, -3), (2, -1), (3, 3)],
]);

/// `FLASHING[(slot, color)]`: scores a flashing lamp by slot.
const FLASHING: Table<i32, INDICATOR_SLOTS, 6> = Table::new([
    [2, -6, -2],
    [4, -2, 6],
    [-6, 6, -6],
    [-4, -4, 4],
    [6, -2, 2],
    [4, 2, -4],
]);

pub fn color_score(color: Color) -> i32 {
    match color {
        Color::Red => 2,
        Color::Orange => 1,
        Color::Green => 0,
        Color::Blue => -1,
        Color::Purple => -2,
        Color::White => 0,
    }
}

/// Each lamp counts for the monitor on even numbers and against it on odd ones.
pub fn indicator_count_score(display_value: i32, indicators: usize) -> i32 {
    let count = indicators as i32;
    if display_value % 2 == 0 {
        count
    } else {
        -count
    }
}

/// Position and color contributions of a monitor's own lamps, in slot order.
pub fn indicator_score(indicators: &[Indicator]) -> i32 {
    let mut seen = [0_usize; 6];
    indicators
        .iter()
        .map(|indicator| {
            let color = indicator.color.index();
            let position = if indicator.flashing {
                FLASHING[(indicator.slot, color)]
            } else {
                PAIRS[(indicator.slot, color)].0
            };
            let occurrence = seen[color];
            seen[color] += 1;
            position + PAIRS[(occurrence, color)].1
        })
        .sum()
}

pub fn cable_score(board: &Board, index: usize) -> i32 {
    let mut multipliers = [0; 6];
    for cable in board.incoming(index).chain(board.outgoing(index)) {
        multipliers[cable.color.index()] += 1;
    }

    let value = |direction: CableDirection, color: Color| {
        DIRECTION[(color.index(), direction.index())] * multipliers[color.index()]
    };
    let incoming: i32 = board
        .incoming(index)
        .map(|cable| value(cable.direction.opposite(), cable.color))
        .sum();
    let outgoing: i32 = board
        .outgoing(index)
        .map(|cable| value(cable.direction, cable.color))
        .sum();

    incoming + outgoing
}

/// The five contributions making up a monitor's score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub color: i32,
    pub number: i32,
    pub indicator_count: i32,
    pub indicators: i32,
    pub cables: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.color + self.number + self.indicator_count + self.indicators + self.cables
    }

    pub fn sections(&self) -> [(&'static str, i32); 5] {
        [
            ("color", self.color),
            ("number", self.number),
            ("indicator count", self.indicator_count),
            ("indicators", self.indicators),
            ("cables", self.cables),
        ]
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for (name, value) in self.sections() {
            write!(f, "{separator}{name}: {value}")?;
            separator = ", ";
        }
        write!(f, " => {}", self.total())
    }
}

/// Score `monitor` as the board currently stands.
///
/// Pure: the result depends only on the board, so calling it twice without
/// an intervening mutation yields the same breakdown.
pub fn breakdown(board: &Board, monitor: &Monitor) -> ScoreBreakdown {
    ScoreBreakdown {
        color: color_score(monitor.color()),
        number: rules::number_score(monitor.display_value()),
        indicator_count: indicator_count_score(
            monitor.display_value(),
            monitor.indicators().len(),
        ),
        indicators: indicator_score(monitor.indicators()),
        cables: cable_score(board, monitor.index()),
    }
}

/// Test hook forcing the sign of a score.
///
/// Only reachable through an explicit puzzle construction function; normal
/// play always uses [`ScoreBias::Neutral`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreBias {
    #[default]
    Neutral,
    /// Fold into a strictly positive score.
    Positive,
    /// Fold into a strictly negative score.
    Negative,
}

impl ScoreBias {
    pub fn apply(self, score: i32) -> i32 {
        match self {
            ScoreBias::Neutral => score,
            ScoreBias::Positive if score == 0 => 1,
            ScoreBias::Positive => score.abs(),
            ScoreBias::Negative if score == 0 => -1,
            ScoreBias::Negative => -score.abs(),
        }
    }
}
