use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    color::{Color, DisplayColor, MonitorType},
    topology::{CableDirection, Topology, MONITOR_COUNT},
};

/// Exclusive upper bound of a displayed number.
pub const DISPLAY_VALUES: i32 = 100;

/// Lamp slots per monitor.
pub const INDICATOR_SLOTS: usize = 3;

/// An enabled indicator lamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    /// Index of the owning monitor.
    pub monitor: usize,
    /// Local slot on the owning monitor, `0..3`.
    pub slot: usize,
    pub color: Color,
    /// Unique across the board, `0..45`.
    pub global_index: usize,
    pub flashing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cable {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    pub direction: CableDirection,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Monitor {
    index: usize,
    display_value: i32,
    color: Color,
    display_color: DisplayColor,
    score: i32,
    pressed: bool,
    indicators: Vec<Indicator>,
    in_cables: Vec<usize>,
    out_cables: Vec<usize>,
}

impl Monitor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display_value(&self) -> i32 {
        self.display_value
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn display_color(&self) -> DisplayColor {
        self.display_color
    }

    pub fn is_trigger(&self) -> bool {
        self.display_color == DisplayColor::Trigger
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Ids of the cables ending at this monitor.
    pub fn in_cables(&self) -> &[usize] {
        &self.in_cables
    }

    /// Ids of the cables starting at this monitor.
    pub fn out_cables(&self) -> &[usize] {
        &self.out_cables
    }

    /// The ordering bucket of this monitor given its current score.
    pub fn monitor_type(&self) -> Option<MonitorType> {
        MonitorType::classify(self.color, self.score)
    }

    pub(crate) fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    pub(crate) fn press(&mut self) {
        self.pressed = true;
    }

    pub(crate) fn redisplay(&mut self, value: i32) {
        self.display_value = value;
    }

    pub(crate) fn set_display_color(&mut self, display_color: DisplayColor) {
        self.display_color = display_color;
    }
}

/// The randomized, per-monitor data a board is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorSeed {
    pub display_value: i32,
    pub color: Color,
    pub display_color: DisplayColor,
    /// Enabled indicators only, in slot order.
    pub indicators: Vec<Indicator>,
}

impl MonitorSeed {
    pub fn new(display_value: i32, color: Color) -> Self {
        Self {
            display_value,
            color,
            display_color: DisplayColor::Normal,
            indicators: Vec::new(),
        }
    }

    pub fn trigger(mut self) -> Self {
        self.display_color = DisplayColor::Trigger;
        self
    }

    /// Enable the next lamp slot on this monitor.
    ///
    /// `monitor` and `global_index` are assigned when the board is built.
    pub fn with_indicator(mut self, color: Color, flashing: bool) -> Self {
        let slot = self.indicators.len();
        self.indicators.push(Indicator {
            monitor: 0,
            slot,
            color,
            global_index: 0,
            flashing,
        });
        self
    }
}

/// Arena owning every monitor and cable of a puzzle.
///
/// Monitors refer to cables by id and cables refer to monitors by index, so
/// neither owns the other.
///
/// Only built through [`Board::new`] or [`Board::with_indicators`], which
/// validate it; serialization is one way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    monitors: Vec<Monitor>,
    cables: Vec<Cable>,
}

impl Board {
    /// Lay out a board over `topology`.
    ///
    /// `cable_colors` is consumed in the topology's edge order. Indicator
    /// global indices are `monitor * 3 + slot` unless the seed was built with
    /// explicit ones, see [`Board::with_indicators`].
    pub fn new(
        topology: &Topology,
        mut seeds: Vec<MonitorSeed>,
        cable_colors: Vec<Color>,
    ) -> Result<Self, Error> {
        for (index, seed) in seeds.iter_mut().enumerate() {
            for indicator in seed.indicators.iter_mut() {
                indicator.monitor = index;
                indicator.global_index = index * INDICATOR_SLOTS + indicator.slot;
            }
        }
        Self::with_indicators(topology, seeds, cable_colors)
    }

    /// Lay out a board whose seeds already carry final indicator data.
    pub fn with_indicators(
        topology: &Topology,
        seeds: Vec<MonitorSeed>,
        cable_colors: Vec<Color>,
    ) -> Result<Self, Error> {
        if seeds.len() != MONITOR_COUNT {
            return Err(Error::MonitorCount(seeds.len()));
        }
        if cable_colors.len() != topology.edges().len() {
            return Err(Error::CableCount {
                expect: topology.edges().len(),
                got: cable_colors.len(),
            });
        }

        let mut values = HashSet::new();
        let mut global_indices = HashSet::new();
        for (index, seed) in seeds.iter().enumerate() {
            if !(0..DISPLAY_VALUES).contains(&seed.display_value) {
                return Err(Error::ValueOutOfRange {
                    index,
                    value: seed.display_value,
                });
            }
            if !values.insert(seed.display_value) {
                return Err(Error::DuplicateValue(seed.display_value));
            }
            if !seed.color.is_body() {
                return Err(Error::BodyColor {
                    index,
                    color: seed.color,
                });
            }
            if seed.indicators.len() > INDICATOR_SLOTS {
                return Err(Error::TooManyIndicators {
                    index,
                    count: seed.indicators.len(),
                });
            }
            let mut slots = HashSet::new();
            for indicator in &seed.indicators {
                if indicator.monitor != index
                    || indicator.slot >= INDICATOR_SLOTS
                    || !slots.insert(indicator.slot)
                {
                    return Err(Error::IndicatorSlot {
                        index,
                        slot: indicator.slot,
                    });
                }
                if indicator.global_index >= MONITOR_COUNT * INDICATOR_SLOTS
                    || !global_indices.insert(indicator.global_index)
                {
                    return Err(Error::GlobalIndex(indicator.global_index));
                }
            }
        }

        let mut monitors: Vec<Monitor> = seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| Monitor {
                index,
                display_value: seed.display_value,
                color: seed.color,
                display_color: seed.display_color,
                score: 0,
                pressed: false,
                indicators: seed.indicators,
                in_cables: Vec::new(),
                out_cables: Vec::new(),
            })
            .collect();

        let cables: Vec<Cable> = topology
            .edges()
            .iter()
            .zip(cable_colors)
            .enumerate()
            .map(|(id, (edge, color))| Cable {
                id,
                from: edge.from,
                to: edge.to,
                direction: edge.direction,
                color,
            })
            .collect();

        for cable in &cables {
            monitors[cable.from].out_cables.push(cable.id);
            monitors[cable.to].in_cables.push(cable.id);
        }

        Ok(Self { monitors, cables })
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn monitor(&self, index: usize) -> Option<&Monitor> {
        self.monitors.get(index)
    }

    pub(crate) fn monitor_mut(&mut self, index: usize) -> Option<&mut Monitor> {
        self.monitors.get_mut(index)
    }

    pub fn cables(&self) -> &[Cable] {
        &self.cables
    }

    /// Cables ending at `index`.
    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &Cable> {
        self.cable_ids(index, Monitor::in_cables)
    }

    /// Cables starting at `index`.
    pub fn outgoing(&self, index: usize) -> impl Iterator<Item = &Cable> {
        self.cable_ids(index, Monitor::out_cables)
    }

    fn cable_ids<'a>(
        &'a self,
        index: usize,
        ids: fn(&Monitor) -> &[usize],
    ) -> impl Iterator<Item = &'a Cable> {
        self.monitors
            .get(index)
            .map(ids)
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.cables.get(id))
    }

    /// Monitors cabled to `index` in either direction: sources of incoming
    /// cables first, then targets of outgoing cables.
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming(index)
            .map(|cable| cable.from)
            .chain(self.outgoing(index).map(|cable| cable.to))
    }

    pub fn unpressed(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter().filter(|monitor| !monitor.pressed)
    }

    pub fn all_pressed(&self) -> bool {
        self.monitors.iter().all(|monitor| monitor.pressed)
    }

    pub fn display_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.monitors.iter().map(|monitor| monitor.display_value)
    }

    /// Highest score among unpressed monitors.
    pub fn max_unpressed_score(&self) -> Option<i32> {
        self.unpressed().map(Monitor::score).max()
    }

    /// Lowest score among unpressed monitors.
    pub fn min_unpressed_score(&self) -> Option<i32> {
        self.unpressed().map(Monitor::score).min()
    }

    /// Indices of the unpressed monitors holding exactly `score`.
    pub fn unpressed_with_score(&self, score: i32) -> Vec<usize> {
        self.unpressed()
            .filter(|monitor| monitor.score == score)
            .map(Monitor::index)
            .collect()
    }

    /// Every enabled indicator, deduplicated and ordered by global index.
    pub fn indicators(&self) -> Vec<Indicator> {
        let mut indicators: Vec<Indicator> = self
            .monitors
            .iter()
            .flat_map(|monitor| monitor.indicators.iter().copied())
            .collect();
        indicators.sort_by_key(|indicator| indicator.global_index);
        indicators.dedup_by_key(|indicator| indicator.global_index);
        indicators
    }

    /// Pretty JSON rendering of the complete board, for postmortems.
    pub fn dump(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|err| format!("board could not be serialized: {err}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a board needs exactly {} monitors, got {0}", MONITOR_COUNT)]
    MonitorCount(usize),
    #[error("expected {expect} cable colors, got {got}")]
    CableCount { expect: usize, got: usize },
    #[error("monitor {index} displays {value}, outside `0..{}`", DISPLAY_VALUES)]
    ValueOutOfRange { index: usize, value: i32 },
    #[error("display value {0} is used by more than one monitor")]
    DuplicateValue(i32),
    #[error("monitor {index} can't have a {color} body")]
    BodyColor { index: usize, color: Color },
    #[error("monitor {index} has {count} indicators, more than {}", INDICATOR_SLOTS)]
    TooManyIndicators { index: usize, count: usize },
    #[error("monitor {index} has an invalid or repeated indicator slot {slot}")]
    IndicatorSlot { index: usize, slot: usize },
    #[error("indicator global index {0} is out of range or repeated")]
    GlobalIndex(usize),
}
