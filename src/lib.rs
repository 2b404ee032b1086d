mod board;
mod color;
mod context;
mod generate;
mod order;
mod pool;
mod puzzle;
mod random;
mod rules;
mod score;
mod table;
mod topology;
mod trace;

pub use board::{Board, Cable, Indicator, Monitor, MonitorSeed, DISPLAY_VALUES, INDICATOR_SLOTS};
pub use color::{Color, DisplayColor, MonitorType};
pub use context::{is_negative, Phase, PressContext};
pub use generate::generate;
pub use order::{next_to_press, press_order};
pub use pool::ValuePool;
pub use puzzle::{ChangeSet, PressOutcome, Puzzle, Turn};
pub use random::{RandomSource, RngSource, Scripted};
pub use rules::{matching, number_score, Rule, RULES};
pub use score::{breakdown, ScoreBias, ScoreBreakdown};
pub use table::Table;
pub use topology::{CableDirection, Edge, Topology, MONITOR_COUNT, REFERENCE_SLOT};
pub use trace::{LogTrace, NullTrace, Trace};

pub mod error {
    pub use crate::board::Error as BoardError;
    pub use crate::generate::Error as GenerateError;
    pub use crate::puzzle::Error as PuzzleError;
    pub use crate::topology::Error as TopologyError;
}
