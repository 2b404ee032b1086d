use std::fmt;

use serde::{Deserialize, Serialize};

/// Colors shared by monitor bodies, cables and indicator lamps.
///
/// The declaration order is the column order of every color-indexed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Orange,
    Green,
    Blue,
    Purple,
    White,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::White,
    ];

    /// Colors a monitor body may have.
    pub const BODY: [Color; 5] = [
        Color::Red,
        Color::Orange,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The color at `index` in declaration order, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_body(self) -> bool {
        self != Color::White
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// State of a monitor's displayed number.
///
/// A monitor in the `Trigger` state is reshuffled when a neighbour is pressed correctly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayColor {
    #[default]
    Normal,
    Trigger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorType {
    RedEven,
    RedOdd,
    OrangeEven,
    OrangeOdd,
    GreenEven,
    GreenOdd,
    BlueEven,
    BlueOdd,
    PurpleEven,
    PurpleOdd,
}

impl MonitorType {
    /// Classify a monitor by its body color and the parity of its current score.
    ///
    /// `None` for colors which can't be a monitor body.
    pub fn classify(color: Color, score: i32) -> Option<Self> {
        let even = score % 2 == 0;
        let (even_type, odd_type) = match color {
            Color::Red => (MonitorType::RedEven, MonitorType::RedOdd),
            Color::Orange => (MonitorType::OrangeEven, MonitorType::OrangeOdd),
            Color::Green => (MonitorType::GreenEven, MonitorType::GreenOdd),
            Color::Blue => (MonitorType::BlueEven, MonitorType::BlueOdd),
            Color::Purple => (MonitorType::PurpleEven, MonitorType::PurpleOdd),
            Color::White => return None,
        };
        Some(if even { even_type } else { odd_type })
    }

    pub fn color(self) -> Color {
        match self {
            MonitorType::RedEven | MonitorType::RedOdd => Color::Red,
            MonitorType::OrangeEven | MonitorType::OrangeOdd => Color::Orange,
            MonitorType::GreenEven | MonitorType::GreenOdd => Color::Green,
            MonitorType::BlueEven | MonitorType::BlueOdd => Color::Blue,
            MonitorType::PurpleEven | MonitorType::PurpleOdd => Color::Purple,
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
