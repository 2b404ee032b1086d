//! Random puzzle setup.
//!
//! The random source is consumed in a fixed order, so a scripted source fully
//! determines the board:
//!
//! 1. number of trigger monitors in `1..4`, then each trigger slot, distinct, in `0..15`;
//! 2. per monitor: display value, distinct, in `0..100`, then body color in `0..5`;
//! 3. per monitor: for each of the three lamp slots a color in `0..6` and a
//!    flashing roll in `0..6` (flashing on 1), then the number of enabled slots in `0..4`;
//! 4. per topology edge: cable color in `0..6`.

use crate::{
    board::{self, Board, Indicator, MonitorSeed, DISPLAY_VALUES, INDICATOR_SLOTS},
    color::{Color, DisplayColor},
    pool::ValuePool,
    random::RandomSource,
    topology::{Topology, MONITOR_COUNT},
    trace::{record, Trace},
};

const MAX_TRIGGERS: i32 = 3;
const FLASHING_ROLL: i32 = 1;

fn color_in<R>(random: &mut R, count: usize) -> Color
where
    R: RandomSource + ?Sized,
{
    let roll = random.next(0, count as i32);
    Color::from_index(roll.max(0) as usize).unwrap_or(Color::White)
}

fn trigger_slots<R>(random: &mut R) -> Result<Vec<usize>, Error>
where
    R: RandomSource + ?Sized,
{
    let count = random.next(1, MAX_TRIGGERS + 1);
    let mut pool = ValuePool::new(MONITOR_COUNT as i32);
    (0..count)
        .map(|_| {
            pool.draw(&mut *random)
                .map(|slot| slot as usize)
                .ok_or(Error::Exhausted("trigger slots"))
        })
        .collect()
}

fn indicators<R>(random: &mut R, monitor: usize) -> Vec<Indicator>
where
    R: RandomSource + ?Sized,
{
    let mut lamps: Vec<Indicator> = (0..INDICATOR_SLOTS)
        .map(|slot| {
            let color = color_in(&mut *random, Color::ALL.len());
            let flashing = random.next(0, 6) == FLASHING_ROLL;
            Indicator {
                monitor,
                slot,
                color,
                global_index: monitor * INDICATOR_SLOTS + slot,
                flashing,
            }
        })
        .collect();
    let enabled = random.next(0, INDICATOR_SLOTS as i32 + 1).max(0) as usize;
    lamps.truncate(enabled);
    lamps
}

/// Lay out a fresh random board over `topology`.
pub fn generate<R, T>(topology: &Topology, random: &mut R, trace: &mut T) -> Result<Board, Error>
where
    R: RandomSource + ?Sized,
    T: Trace + ?Sized,
{
    let triggers = trigger_slots(random)?;

    let mut values = ValuePool::new(DISPLAY_VALUES);
    let mut seeds = Vec::with_capacity(MONITOR_COUNT);
    for index in 0..MONITOR_COUNT {
        let display_value = values
            .draw(random)
            .ok_or(Error::Exhausted("display values"))?;
        let color = color_in(random, Color::BODY.len());
        let mut seed = MonitorSeed::new(display_value, color);
        if triggers.contains(&index) {
            seed.display_color = DisplayColor::Trigger;
        }
        seeds.push(seed);
    }

    for (index, seed) in seeds.iter_mut().enumerate() {
        seed.indicators = indicators(random, index);
        let lamps: Vec<String> = seed
            .indicators
            .iter()
            .map(|lamp| {
                format!(
                    "Index: {}: Color: {}, It is {}",
                    lamp.slot + 1,
                    lamp.color,
                    if lamp.flashing { "Blinking" } else { "Solid" }
                )
            })
            .collect();
        record!(
            *trace,
            "Monitor: {} | Number: {} | Color: {} | Indicators: {} | Display color: {:?}",
            index + 1,
            seed.display_value,
            seed.color,
            if lamps.is_empty() {
                "None".to_owned()
            } else {
                lamps.join("; ")
            },
            seed.display_color,
        );
    }

    let cable_colors: Vec<Color> = topology
        .edges()
        .iter()
        .map(|edge| {
            let color = color_in(&mut *random, Color::ALL.len());
            record!(
                *trace,
                "Cable going from monitor: {} To monitor: {} is {}.",
                edge.from + 1,
                edge.to + 1,
                color
            );
            color
        })
        .collect();

    Ok(Board::with_indicators(topology, seeds, cable_colors)?)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ran out of distinct {0} while generating")]
    Exhausted(&'static str),
    #[error(transparent)]
    Board(#[from] board::Error),
}
