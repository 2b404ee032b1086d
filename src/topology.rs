use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::{Color, MonitorType};

/// Number of monitors on a board.
pub const MONITOR_COUNT: usize = 15;

/// Slot of the monitor whose body color selects the press order.
pub const REFERENCE_SLOT: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CableDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CableDirection {
    pub fn opposite(self) -> Self {
        use CableDirection::*;
        match self {
            N => S,
            NE => SW,
            E => W,
            SE => NW,
            S => N,
            SW => NE,
            W => E,
            NW => SE,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A directed cable position in the topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub direction: CableDirection,
}

const fn edge(from: usize, to: usize, direction: CableDirection) -> Edge {
    Edge {
        from,
        to,
        direction,
    }
}

const STANDARD_EDGES: [Edge; 39] = {
    use CableDirection::*;
    [
        edge(0, 1, E),
        edge(0, 3, S),
        edge(0, 4, SE),
        edge(1, 2, E),
        edge(1, 3, SW),
        edge(1, 4, S),
        edge(1, 5, SE),
        edge(2, 4, SW),
        edge(2, 5, S),
        edge(2, 6, SE),
        edge(3, 4, E),
        edge(3, 7, S),
        edge(3, 8, SE),
        edge(4, 5, E),
        edge(4, 7, SW),
        edge(4, 8, S),
        edge(4, 9, SE),
        edge(5, 6, E),
        edge(5, 8, SW),
        edge(5, 9, S),
        edge(5, 10, SE),
        edge(6, 9, SW),
        edge(6, 10, S),
        edge(7, 8, E),
        edge(7, 11, S),
        edge(7, 12, SE),
        edge(8, 9, E),
        edge(8, 11, SW),
        edge(8, 12, S),
        edge(8, 13, SE),
        edge(9, 10, E),
        edge(9, 12, SW),
        edge(9, 13, S),
        edge(9, 14, SE),
        edge(10, 13, SW),
        edge(10, 14, S),
        edge(11, 12, E),
        edge(12, 13, E),
        edge(13, 14, E),
    ]
};

/// Press orders keyed by the reference monitor's body color, in `Color::BODY` order.
const STANDARD_PRESS_ORDERS: [[MonitorType; 10]; 5] = {
    use MonitorType::*;
    [
        // red
        [
            PurpleOdd, GreenOdd, OrangeEven, BlueEven, PurpleEven, GreenEven, RedOdd, RedEven,
            OrangeOdd, BlueOdd,
        ],
        // orange
        [
            PurpleEven, GreenEven, RedEven, OrangeEven, GreenOdd, PurpleOdd, OrangeOdd, BlueOdd,
            BlueEven, RedOdd,
        ],
        // green
        [
            BlueOdd, GreenEven, RedEven, RedOdd, BlueEven, OrangeEven, OrangeOdd, PurpleOdd,
            GreenOdd, PurpleEven,
        ],
        // blue
        [
            RedEven, RedOdd, PurpleOdd, OrangeEven, OrangeOdd, GreenOdd, BlueEven, PurpleEven,
            GreenEven, BlueOdd,
        ],
        // purple
        [
            PurpleEven, GreenOdd, PurpleOdd, BlueEven, GreenEven, RedEven, RedOdd, BlueOdd,
            OrangeOdd, OrangeEven,
        ],
    ]
};

/// The immutable layout of a puzzle: which monitors are cabled together, in which
/// direction, and how the positive-context press order is chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyConfig")]
pub struct Topology {
    edges: Vec<Edge>,
    press_orders: [[MonitorType; 10]; 5],
    reference_slot: usize,
}

/// Unchecked form of a [`Topology`] as read from configuration.
#[derive(Deserialize)]
struct TopologyConfig {
    edges: Vec<Edge>,
    press_orders: [[MonitorType; 10]; 5],
    reference_slot: usize,
}

impl TryFrom<TopologyConfig> for Topology {
    type Error = Error;

    fn try_from(config: TopologyConfig) -> Result<Self, Self::Error> {
        Topology::new(config.edges, config.press_orders, config.reference_slot)
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            edges: STANDARD_EDGES.to_vec(),
            press_orders: STANDARD_PRESS_ORDERS,
            reference_slot: REFERENCE_SLOT,
        }
    }
}

impl Topology {
    /// The standard 15 monitor layout.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Build a custom topology, checking that it describes a sane puzzle.
    pub fn new(
        edges: Vec<Edge>,
        press_orders: [[MonitorType; 10]; 5],
        reference_slot: usize,
    ) -> Result<Self, Error> {
        if reference_slot >= MONITOR_COUNT {
            return Err(Error::ReferenceSlot(reference_slot));
        }

        let mut seen = HashSet::new();
        for edge in &edges {
            for endpoint in [edge.from, edge.to] {
                if endpoint >= MONITOR_COUNT {
                    return Err(Error::OutOfBounds {
                        from: edge.from,
                        to: edge.to,
                    });
                }
            }
            if edge.from == edge.to {
                return Err(Error::SelfLoop(edge.from));
            }
            let key = (edge.from.min(edge.to), edge.from.max(edge.to));
            if !seen.insert(key) {
                return Err(Error::DuplicateEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }
        }

        for (color, order) in Color::BODY.into_iter().zip(press_orders.iter()) {
            let distinct: HashSet<_> = order.iter().collect();
            if distinct.len() != order.len() {
                return Err(Error::NotAPermutation(color));
            }
        }

        Ok(Self {
            edges,
            press_orders,
            reference_slot,
        })
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn reference_slot(&self) -> usize {
        self.reference_slot
    }

    /// The bucket order used in positive context when the reference monitor has this body color.
    pub fn press_order(&self, color: Color) -> Option<&[MonitorType; 10]> {
        color
            .is_body()
            .then(|| &self.press_orders[color.index()])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cable `{from} -> {to}` references a monitor outside `0..{}`", MONITOR_COUNT)]
    OutOfBounds { from: usize, to: usize },
    #[error("cable on monitor {0} connects it to itself")]
    SelfLoop(usize),
    #[error("monitors `{from}` and `{to}` are cabled together more than once")]
    DuplicateEdge { from: usize, to: usize },
    #[error("the press order for {0} repeats a monitor type")]
    NotAPermutation(Color),
    #[error("reference slot {0} is out of bounds")]
    ReferenceSlot(usize),
}
