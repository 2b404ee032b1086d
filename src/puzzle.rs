use crate::{
    board::{Board, Indicator, Monitor, DISPLAY_VALUES},
    color::{DisplayColor, MonitorType},
    context::{self, Phase, PressContext},
    generate,
    order,
    pool::ValuePool,
    random::RandomSource,
    score::{self, ScoreBias},
    topology::{Topology, MONITOR_COUNT},
    trace::{record, Trace},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    AlreadyPressed,
    Strike,
    Success,
}

/// Monitors touched by a cascade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Indices of every monitor whose display value was redrawn, in the order they changed.
    pub changed: Vec<usize>,
    /// Some score crossed zero.
    pub sign_changed: bool,
    /// The press context flipped between positive and negative.
    pub context_changed: bool,
}

/// The complete result of [`Puzzle::play`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub outcome: PressOutcome,
    pub changes: ChangeSet,
    pub solved: bool,
}

fn sign_changed(before: i32, after: i32) -> bool {
    (before < 0) != (after < 0)
}

/// Render 0-based indices as the 1-based monitor numbers players see.
fn numbers(indices: impl IntoIterator<Item = usize>) -> String {
    indices
        .into_iter()
        .map(|index| (index + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single puzzle instance: the board, the press context, and the injected
/// randomness and trace capabilities.
///
/// Every operation runs to completion before returning; nothing here is shared.
#[derive(Debug, Clone)]
pub struct Puzzle<R, T> {
    topology: Topology,
    board: Board,
    biases: [ScoreBias; MONITOR_COUNT],
    context: Option<PressContext>,
    poisoned: bool,
    random: R,
    trace: T,
}

impl<R, T> Puzzle<R, T>
where
    R: RandomSource,
    T: Trace,
{
    /// Wrap an existing board. Call [`initialize`][Self::initialize] before playing.
    pub fn new(topology: Topology, board: Board, random: R, trace: T) -> Self {
        Self::with_bias(
            topology,
            board,
            random,
            trace,
            [ScoreBias::Neutral; MONITOR_COUNT],
        )
    }

    /// Like [`new`][Self::new], but folds each monitor's score through a [`ScoreBias`].
    ///
    /// For test harnesses which need a particular context regardless of the numbers drawn.
    pub fn with_bias(
        topology: Topology,
        board: Board,
        random: R,
        trace: T,
        biases: [ScoreBias; MONITOR_COUNT],
    ) -> Self {
        Self {
            topology,
            board,
            biases,
            context: None,
            poisoned: false,
            random,
            trace,
        }
    }

    /// Generate a random board and initialize it.
    pub fn generate(topology: Topology, mut random: R, mut trace: T) -> Result<Self, Error> {
        let board = generate::generate(&topology, &mut random, &mut trace)?;
        let mut puzzle = Self::new(topology, board, random, trace);
        puzzle.initialize();
        Ok(puzzle)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn monitor(&self, index: usize) -> Option<&Monitor> {
        self.board.monitor(index)
    }

    /// `None` until the puzzle is initialized.
    pub fn context(&self) -> Option<&PressContext> {
        self.context.as_ref()
    }

    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Score every monitor and establish the press context.
    ///
    /// Calling this again mid-game rescores the board and re-evaluates the
    /// context, keeping the negative-context anchors of earlier presses.
    pub fn initialize(&mut self) {
        for index in 0..self.board.monitors().len() {
            self.rescore(index);
        }
        let context = self
            .context
            .get_or_insert_with(|| PressContext::new(&self.board));
        context.reevaluate(&self.board);
        self.trace_order();
    }

    /// Every enabled indicator, ordered by global index.
    pub fn all_indicators(&self) -> Vec<Indicator> {
        self.board.indicators()
    }

    fn check_bounds(&self, index: usize) -> Result<(), Error> {
        if index < self.board.monitors().len() {
            Ok(())
        } else {
            Err(Error::OutOfBounds { index })
        }
    }

    fn check_ready(&self) -> Result<&PressContext, Error> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        self.context.as_ref().ok_or(Error::NotInitialized)
    }

    /// Recompute one monitor's score. Returns the previous and new scores.
    fn rescore(&mut self, index: usize) -> Option<(i32, i32)> {
        let monitor = self.board.monitor(index)?;
        let breakdown = score::breakdown(&self.board, monitor);
        let before = monitor.score();
        for (section, value) in breakdown.sections() {
            record!(
                self.trace,
                "Monitor: {}, Section: {}, Score: {}",
                index + 1,
                section,
                value
            );
        }
        let after = self.biases[index].apply(breakdown.total());
        record!(self.trace, "Monitor: {}, Total score: {}", index + 1, after);
        self.board.monitor_mut(index)?.set_score(after);
        Some((before, after))
    }

    fn press_keys(&self) -> &[MonitorType] {
        self.board
            .monitor(self.topology.reference_slot())
            .and_then(|reference| self.topology.press_order(reference.color()))
            .map(|keys| keys.as_slice())
            .unwrap_or_default()
    }

    /// The full positive-context press order over the current scores.
    pub fn press_order(&self) -> Vec<usize> {
        order::press_order(&self.board, self.press_keys())
    }

    fn trace_order(&mut self) {
        let Some(context) = &self.context else {
            return;
        };
        if context.is_negative() {
            if self.is_solved() {
                return;
            }
            let max = self
                .board
                .max_unpressed_score()
                .map(|score| self.board.unpressed_with_score(score))
                .unwrap_or_default();
            let min = self
                .board
                .min_unpressed_score()
                .map(|score| self.board.unpressed_with_score(score))
                .unwrap_or_default();
            if context.max_exhausted(&self.board) {
                record!(
                    self.trace,
                    "All monitors are negative. Max values are already pressed, press monitor(s) {} in any order.",
                    numbers(min)
                );
            } else {
                record!(
                    self.trace,
                    "All monitors are negative. First press monitor(s) {} in any order and then monitor(s) {} in any order.",
                    numbers(max),
                    numbers(min)
                );
            }
        } else {
            let candidates = numbers(
                self.board
                    .unpressed()
                    .filter(|monitor| monitor.score() >= 0)
                    .map(Monitor::index),
            );
            let keys = self
                .press_keys()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let order = numbers(self.press_order());
            record!(self.trace, "Candidates: {}", candidates);
            record!(self.trace, "The keys are: {}", keys);
            record!(self.trace, "Press order: {}", order);
        }
    }

    /// Report an impossible state: dump the board to the trace and poison the puzzle.
    fn fault(&mut self, reason: &'static str) -> Error {
        let dump = self.board.dump();
        record!(
            self.trace,
            "Start of error dump\nReason: {}\nBoard:\n{}\nEnd of error dump",
            reason,
            dump
        );
        self.poisoned = true;
        Error::Inconsistent { reason, dump }
    }

    /// Press the monitor at `index`.
    ///
    /// An illegal press is a [`PressOutcome::Strike`], not an error; the caller
    /// should follow it with [`recalculate_on_strike`][Self::recalculate_on_strike],
    /// and a success with
    /// [`recalculate_trigger_neighbours`][Self::recalculate_trigger_neighbours].
    /// [`play`][Self::play] does both.
    pub fn press(&mut self, index: usize) -> Result<PressOutcome, Error> {
        self.check_bounds(index)?;
        let negative = self.check_ready()?.is_negative();
        record!(self.trace, "Pressed monitor {}.", index + 1);

        if self.board.monitors()[index].is_pressed() {
            return Ok(PressOutcome::AlreadyPressed);
        }
        if self.is_solved() {
            return Err(Error::Solved);
        }

        let accepted = if negative {
            self.press_negative(index)
        } else {
            self.press_positive(index)?
        };
        Ok(if accepted {
            PressOutcome::Success
        } else {
            PressOutcome::Strike
        })
    }

    fn press_positive(&mut self, index: usize) -> Result<bool, Error> {
        if context::is_negative(&self.board) {
            return Err(self.fault("every unpressed score is negative in positive context"));
        }
        let Some(next) = order::next_to_press(&self.board, self.press_keys()) else {
            return Err(self.fault("nothing to press in positive context"));
        };
        if next != index {
            return Ok(false);
        }
        if let Some(monitor) = self.board.monitor_mut(index) {
            monitor.press();
        }
        Ok(true)
    }

    fn press_negative(&mut self, index: usize) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };
        let (phase, candidates) = context.negative_candidates(&self.board);
        if phase == Phase::Closed || !candidates.contains(&index) {
            return false;
        }
        if let Some(monitor) = self.board.monitor_mut(index) {
            monitor.press();
        }
        context.pressed(phase, index);
        true
    }

    /// Indices which may legally be pressed right now.
    pub fn legal_presses(&self) -> Result<Vec<usize>, Error> {
        let context = self.check_ready()?;
        if self.is_solved() {
            return Ok(Vec::new());
        }
        if context.is_negative() {
            Ok(context.negative_candidates(&self.board).1)
        } else {
            Ok(order::next_to_press(&self.board, self.press_keys())
                .into_iter()
                .collect())
        }
    }

    /// Redraw display values of `targets`, rescoring each and re-evaluating the
    /// context if any score crossed zero.
    fn redraw(
        &mut self,
        targets: Vec<usize>,
        reset_trigger: bool,
        describe: impl Fn(usize, i32) -> String,
    ) -> Result<ChangeSet, Error> {
        let mut changes = ChangeSet::default();
        if targets.is_empty() {
            return Ok(changes);
        }

        let mut pool = ValuePool::with_taken(DISPLAY_VALUES, self.board.display_values());
        for target in targets {
            let value = pool.draw(&mut self.random).ok_or(Error::Exhausted)?;
            let monitor = self
                .board
                .monitor_mut(target)
                .ok_or(Error::OutOfBounds { index: target })?;
            if reset_trigger {
                monitor.set_display_color(DisplayColor::Normal);
            }
            monitor.redisplay(value);
            record!(self.trace, "{}", describe(target, value));

            let Some((before, after)) = self.rescore(target) else {
                continue;
            };
            if sign_changed(before, after) {
                changes.sign_changed = true;
            }
            record!(
                self.trace,
                "Score for index: {}, changed from: {}, to: {}.",
                target + 1,
                before,
                after
            );
            changes.changed.push(target);
        }

        if changes.sign_changed {
            if let Some(context) = self.context.as_mut() {
                changes.context_changed = context.reevaluate(&self.board);
            }
        }
        self.trace_order();
        Ok(changes)
    }

    /// After a correct press on `index`, reshuffle every unpressed neighbour in
    /// the trigger display state.
    pub fn recalculate_trigger_neighbours(&mut self, index: usize) -> Result<ChangeSet, Error> {
        self.check_bounds(index)?;
        self.check_ready()?;
        let targets: Vec<usize> = self
            .board
            .neighbours(index)
            .filter(|&neighbour| {
                self.board
                    .monitor(neighbour)
                    .is_some_and(|monitor| monitor.is_trigger() && !monitor.is_pressed())
            })
            .collect();
        self.redraw(targets, true, |target, value| {
            format!(
                "Monitor {} was pressed. Which caused monitor {} to change. New display: {}",
                index + 1,
                target + 1,
                value
            )
        })
    }

    /// After a strike on `index`, reshuffle every unpressed monitor.
    pub fn recalculate_on_strike(&mut self, index: usize) -> Result<ChangeSet, Error> {
        self.check_bounds(index)?;
        self.check_ready()?;
        let targets: Vec<usize> = self.board.unpressed().map(Monitor::index).collect();
        self.redraw(targets, false, |target, value| {
            format!(
                "A strike was received. Which caused monitor {} to change. New display: {}",
                target + 1,
                value
            )
        })
    }

    /// Press `index` and run whichever cascade the outcome calls for.
    pub fn play(&mut self, index: usize) -> Result<Turn, Error> {
        let outcome = self.press(index)?;
        let changes = match outcome {
            PressOutcome::AlreadyPressed => ChangeSet::default(),
            PressOutcome::Strike => {
                record!(self.trace, "That is incorrect. Strike!");
                self.recalculate_on_strike(index)?
            }
            PressOutcome::Success => self.recalculate_trigger_neighbours(index)?,
        };
        let solved = self.is_solved();
        if solved && outcome == PressOutcome::Success {
            record!(self.trace, "That is correct, module solved!");
        }
        Ok(Turn {
            outcome,
            changes,
            solved,
        })
    }

    pub fn is_solved(&self) -> bool {
        let Some(context) = &self.context else {
            return false;
        };
        if self.board.all_pressed() {
            return true;
        }
        if !context.is_negative() {
            return !self.board.unpressed().any(|monitor| monitor.score() >= 0);
        }
        context.is_settled(&self.board)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("monitor `{index}` is out of bounds. max: `{}`", MONITOR_COUNT - 1)]
    OutOfBounds { index: usize },
    #[error("the puzzle has not been initialized")]
    NotInitialized,
    #[error("the puzzle is already solved")]
    Solved,
    #[error("no unused display value is left to draw")]
    Exhausted,
    #[error("internal inconsistency: {reason}")]
    Inconsistent { reason: &'static str, dump: String },
    #[error("the puzzle hit an internal inconsistency and can't continue")]
    Poisoned,
    #[error(transparent)]
    Generate(#[from] generate::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        random::{RngSource, Scripted},
        trace::NullTrace,
    };
    use rstest::rstest;
    use std::collections::HashSet;

    /// Script generating a board where monitor `i` shows `20 + i`, every cable is
    /// red, monitor 0 is red, monitor 14 purple and the rest green. Monitor 1 has
    /// a solid and a flashing red lamp; `trigger` is the only trigger monitor.
    fn scenario_script(trigger: i32) -> Vec<i32> {
        let mut script = vec![1, trigger];
        for index in 0..MONITOR_COUNT as i32 {
            let color = match index {
                0 => 0,
                14 => 4,
                _ => 2,
            };
            script.extend([20 + index, color]);
        }
        for index in 0..MONITOR_COUNT {
            if index == 1 {
                script.extend([0, 0, 0, 1, 0, 0, 2]);
            } else {
                script.extend([0, 0, 0, 0, 0, 0, 0]);
            }
        }
        script.extend(vec![0; Topology::standard().edges().len()]);
        script
    }

    const SCENARIO_SCORES: [i32; MONITOR_COUNT] =
        [-2, 21, 19, -12, 13, -12, 21, -6, 15, 18, 11, -4, -10, -11, -16];

    type Scenario = Puzzle<Scripted, Vec<String>>;

    fn scenario_with(
        trigger: i32,
        then: impl IntoIterator<Item = i32>,
        biases: [ScoreBias; MONITOR_COUNT],
    ) -> Scenario {
        let mut random = Scripted::new(scenario_script(trigger)).with_fallback_seed(99);
        let topology = Topology::standard();
        let board = generate::generate(&topology, &mut random, &mut NullTrace).unwrap();
        random.push(then);
        let mut puzzle = Puzzle::with_bias(topology, board, random, Vec::new(), biases);
        puzzle.initialize();
        puzzle
    }

    fn scenario(then: impl IntoIterator<Item = i32>) -> Scenario {
        scenario_with(10, then, [ScoreBias::Neutral; MONITOR_COUNT])
    }

    fn negative_scenario() -> Scenario {
        scenario_with(10, [], [ScoreBias::Negative; MONITOR_COUNT])
    }

    fn scores<R: RandomSource, T: Trace>(puzzle: &Puzzle<R, T>) -> Vec<i32> {
        puzzle.board().monitors().iter().map(Monitor::score).collect()
    }

    fn assert_distinct<R: RandomSource, T: Trace>(puzzle: &Puzzle<R, T>) {
        let values: HashSet<_> = puzzle.board().display_values().collect();
        assert_eq!(values.len(), MONITOR_COUNT);
        assert!(values.iter().all(|value| (0..100).contains(value)));
    }

    #[test]
    fn scenario_scores_match_hand_computation() {
        let puzzle = scenario([]);
        assert_eq!(scores(&puzzle), SCENARIO_SCORES);
        assert!(!puzzle.context().unwrap().is_negative());
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn scores_are_idempotent() {
        let mut puzzle = scenario([]);
        let before = scores(&puzzle);
        puzzle.initialize();
        assert_eq!(scores(&puzzle), before);
        for monitor in puzzle.board().monitors() {
            assert_eq!(
                score::breakdown(puzzle.board(), monitor).total(),
                monitor.score()
            );
        }
    }

    #[test]
    fn positive_order_uses_reference_color() {
        let puzzle = scenario([]);
        // reference monitor 11 is green: GreenEven (9) precedes GreenOdd
        assert_eq!(puzzle.press_order(), vec![9, 6, 1, 2, 8, 4, 10]);
        assert_eq!(puzzle.legal_presses().unwrap(), vec![9]);
        assert!(puzzle
            .trace()
            .iter()
            .any(|line| line == "Press order: 10, 7, 2, 3, 9, 5, 11"));
    }

    #[test]
    fn exactly_one_legal_press_in_positive_context() {
        let puzzle = scenario([]);
        for index in 0..MONITOR_COUNT {
            let mut attempt = puzzle.clone();
            let expect = if index == 9 {
                PressOutcome::Success
            } else {
                PressOutcome::Strike
            };
            assert_eq!(attempt.press(index).unwrap(), expect, "monitor {index}");
        }
    }

    #[test]
    fn correct_press_reshuffles_trigger_neighbour() {
        // 21 is already on monitor 1 and gets rejected
        let mut puzzle = scenario([21, 77]);
        assert_eq!(puzzle.press(9).unwrap(), PressOutcome::Success);
        assert!(puzzle.monitor(9).unwrap().is_pressed());

        let changes = puzzle.recalculate_trigger_neighbours(9).unwrap();
        assert_eq!(
            changes,
            ChangeSet {
                changed: vec![10],
                sign_changed: false,
                context_changed: false,
            }
        );
        let neighbour = puzzle.monitor(10).unwrap();
        assert_eq!(neighbour.display_value(), 77);
        assert_eq!(neighbour.display_color(), DisplayColor::Normal);
        // number rules 4, cables 15
        assert_eq!(neighbour.score(), 19);
        assert_distinct(&puzzle);

        // ties at 19 go to the higher index
        assert_eq!(puzzle.press_order(), vec![6, 1, 10, 2, 8, 4]);
    }

    #[test]
    fn pressed_trigger_neighbours_are_left_alone() {
        let mut puzzle = scenario([]);
        let before = puzzle.board().clone();
        // monitor 1 has no trigger neighbour
        let changes = puzzle.recalculate_trigger_neighbours(1).unwrap();
        assert_eq!(changes, ChangeSet::default());
        assert_eq!(puzzle.board(), &before);
    }

    #[test]
    fn already_pressed_mutates_nothing() {
        let mut puzzle = scenario([]);
        puzzle.press(9).unwrap();
        let before = puzzle.board().clone();
        let context = puzzle.context().cloned();
        assert_eq!(puzzle.press(9).unwrap(), PressOutcome::AlreadyPressed);
        assert_eq!(puzzle.board(), &before);
        assert_eq!(puzzle.context().cloned(), context);
    }

    #[test]
    fn strike_reshuffles_every_unpressed_monitor() {
        let mut puzzle = scenario([]);
        puzzle.press(9).unwrap();
        let before: Vec<i32> = puzzle.board().display_values().collect();

        assert_eq!(puzzle.press(1).unwrap(), PressOutcome::Strike);
        assert!(!puzzle.monitor(1).unwrap().is_pressed());
        let changes = puzzle.recalculate_on_strike(1).unwrap();

        let expected: Vec<usize> = (0..MONITOR_COUNT).filter(|&index| index != 9).collect();
        assert_eq!(changes.changed, expected);
        for index in expected {
            assert_ne!(puzzle.monitor(index).unwrap().display_value(), before[index]);
        }
        assert_eq!(puzzle.monitor(9).unwrap().display_value(), before[9]);
        assert_distinct(&puzzle);
        for monitor in puzzle.board().monitors() {
            assert_eq!(
                score::breakdown(puzzle.board(), monitor).total(),
                monitor.score()
            );
        }
    }

    #[test]
    fn negative_context_requires_unique_max_first() {
        let puzzle = negative_scenario();
        assert!(puzzle.context().unwrap().is_negative());
        assert_eq!(puzzle.legal_presses().unwrap(), vec![0]);
        for index in 1..MONITOR_COUNT {
            let mut attempt = puzzle.clone();
            assert_eq!(attempt.press(index).unwrap(), PressOutcome::Strike);
        }
    }

    #[test]
    fn negative_context_runs_max_then_min() {
        let mut puzzle = negative_scenario();
        assert_eq!(puzzle.press(0).unwrap(), PressOutcome::Success);
        assert_eq!(puzzle.context().unwrap().last_max(), Some(0));

        // monitors 1 and 6 share the lowest score, -21
        assert_eq!(puzzle.legal_presses().unwrap(), vec![1, 6]);
        assert_eq!(puzzle.press(11).unwrap(), PressOutcome::Strike);
        assert_eq!(puzzle.press(6).unwrap(), PressOutcome::Success);
        assert!(!puzzle.is_solved());
        assert_eq!(puzzle.legal_presses().unwrap(), vec![1]);
        assert_eq!(puzzle.press(1).unwrap(), PressOutcome::Success);

        assert!(puzzle.is_solved());
        assert_eq!(puzzle.legal_presses().unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn min_phase_is_closed_while_max_remains() {
        let mut puzzle = negative_scenario();
        // monitor 1 holds the minimum but the maximum hasn't been pressed
        assert_eq!(puzzle.press(1).unwrap(), PressOutcome::Strike);
        assert_eq!(puzzle.press(0).unwrap(), PressOutcome::Success);
        assert_eq!(puzzle.press(1).unwrap(), PressOutcome::Success);
    }

    #[test]
    fn solved_is_monotonic() {
        let mut puzzle = negative_scenario();
        for index in [0, 6, 1] {
            puzzle.press(index).unwrap();
        }
        assert!(puzzle.is_solved());
        for index in 0..MONITOR_COUNT {
            match puzzle.press(index) {
                Ok(PressOutcome::AlreadyPressed) | Err(Error::Solved) => {}
                other => panic!("monitor {index}: unexpected {other:?}"),
            }
            assert!(puzzle.is_solved());
        }
    }

    #[test]
    fn strike_flip_changes_context() {
        let mut biases = [ScoreBias::Negative; MONITOR_COUNT];
        biases[0] = ScoreBias::Neutral;
        // monitor 0 redraws 77: red +2, number rules +4, cables -3
        let redraws = std::iter::once(77).chain(40..54);
        let mut puzzle = scenario_with(10, redraws, biases);
        assert!(puzzle.context().unwrap().is_negative());
        assert_eq!(puzzle.legal_presses().unwrap(), vec![0]);

        let turn = puzzle.play(3).unwrap();
        assert_eq!(turn.outcome, PressOutcome::Strike);
        assert!(turn.changes.sign_changed);
        assert!(turn.changes.context_changed);
        assert_eq!(puzzle.monitor(0).unwrap().score(), 3);
        assert!(!puzzle.context().unwrap().is_negative());

        assert_eq!(puzzle.legal_presses().unwrap(), vec![0]);
        let turn = puzzle.play(0).unwrap();
        assert_eq!(turn.outcome, PressOutcome::Success);
        assert!(turn.solved);
    }

    #[test]
    fn reinitialize_keeps_anchors() {
        let mut puzzle = negative_scenario();
        puzzle.press(0).unwrap();
        puzzle.initialize();
        assert_eq!(puzzle.context().unwrap().last_max(), Some(0));
        assert_eq!(puzzle.legal_presses().unwrap(), vec![1, 6]);
        assert_eq!(puzzle.press(11).unwrap(), PressOutcome::Strike);
    }

    #[test]
    fn max_anchor_survives_positive_detour() {
        let mut biases = [ScoreBias::Negative; MONITOR_COUNT];
        biases[0] = ScoreBias::Neutral;
        biases[3] = ScoreBias::Neutral;
        // first strike: monitor 3 draws 99 and scores 0 (number rules +5, cables -5)
        // second strike: every unpressed monitor gets its starting value back
        let redraws = [40, 41, 99]
            .into_iter()
            .chain(43..54)
            .chain(21..35);
        let mut puzzle = scenario_with(10, redraws, biases);
        assert_eq!(puzzle.legal_presses().unwrap(), vec![0]);
        assert_eq!(puzzle.play(0).unwrap().outcome, PressOutcome::Success);
        assert_eq!(puzzle.context().unwrap().last_max(), Some(0));

        let turn = puzzle.play(5).unwrap();
        assert_eq!(turn.outcome, PressOutcome::Strike);
        assert!(turn.changes.context_changed);
        assert_eq!(puzzle.monitor(3).unwrap().score(), 0);
        assert!(!puzzle.context().unwrap().is_negative());
        assert_eq!(puzzle.legal_presses().unwrap(), vec![3]);

        let turn = puzzle.play(1).unwrap();
        assert_eq!(turn.outcome, PressOutcome::Strike);
        assert!(turn.changes.context_changed);
        assert!(puzzle.context().unwrap().is_negative());
        assert_eq!(puzzle.monitor(3).unwrap().score(), -12);
        assert_eq!(puzzle.context().unwrap().last_max(), Some(0));

        // the highest unpressed score, -4 on monitor 11, is below the anchor's -2,
        // so the max phase stays closed
        assert_eq!(puzzle.board().max_unpressed_score(), Some(-4));
        assert_eq!(puzzle.legal_presses().unwrap(), vec![1, 6]);
        assert_eq!(puzzle.press(11).unwrap(), PressOutcome::Strike);
        assert_eq!(puzzle.press(6).unwrap(), PressOutcome::Success);
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn play_runs_trigger_cascade_in_negative_context() {
        let mut puzzle = negative_scenario();
        puzzle.play(0).unwrap();
        // monitor 6 neighbours the trigger monitor 10
        let turn = puzzle.play(6).unwrap();
        assert_eq!(turn.outcome, PressOutcome::Success);
        assert_eq!(turn.changes.changed, vec![10]);
        assert!(!turn.changes.sign_changed);
        assert!(puzzle.monitor(10).unwrap().score() < 0);
        assert!(!puzzle.monitor(10).unwrap().is_trigger());
    }

    #[test]
    fn errors_before_initialize() {
        let mut random = Scripted::new(scenario_script(10));
        let topology = Topology::standard();
        let board = generate::generate(&topology, &mut random, &mut NullTrace).unwrap();
        let mut puzzle = Puzzle::new(topology, board, random, NullTrace);
        assert!(!puzzle.is_solved());
        assert!(matches!(puzzle.press(0), Err(Error::NotInitialized)));
        assert!(matches!(puzzle.legal_presses(), Err(Error::NotInitialized)));
        assert!(matches!(
            puzzle.recalculate_on_strike(0),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn out_of_bounds_press() {
        let mut puzzle = scenario([]);
        assert!(matches!(
            puzzle.press(15),
            Err(Error::OutOfBounds { index: 15 })
        ));
    }

    #[test]
    fn fault_dumps_and_poisons() {
        let mut puzzle = scenario([]);
        let Error::Inconsistent { reason, dump } = puzzle.fault("test") else {
            panic!("fault must be an inconsistency");
        };
        assert_eq!(reason, "test");
        assert!(dump.contains("\"monitors\""));
        assert!(puzzle
            .trace()
            .iter()
            .any(|line| line.starts_with("Start of error dump")));
        assert!(matches!(puzzle.press(9), Err(Error::Poisoned)));
    }

    #[test]
    fn indicators_snapshot() {
        let puzzle = scenario([]);
        let indicators = puzzle.all_indicators();
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].global_index, 3);
        assert_eq!(indicators[1].global_index, 4);
        assert!(indicators.iter().all(|lamp| lamp.color == Color::Red));
        assert!(indicators[1].flashing);
    }

    #[rstest]
    #[case(1)]
    #[case(17)]
    #[case(4242)]
    #[case(987_654_321)]
    fn random_play_keeps_invariants(#[case] seed: u64) {
        let mut puzzle =
            Puzzle::generate(Topology::standard(), RngSource::seeded(seed), NullTrace).unwrap();
        let mut fallback = RngSource::seeded(seed ^ 0x5eed);

        for _ in 0..200 {
            if puzzle.is_solved() {
                break;
            }
            let legal = puzzle.legal_presses().unwrap();
            assert!(!legal.is_empty());
            if !puzzle.context().unwrap().is_negative() {
                assert_eq!(legal.len(), 1);
            }

            // mostly play correctly, sometimes strike on purpose
            let index = if fallback.next(0, 4) == 0 {
                fallback.next(0, MONITOR_COUNT as i32) as usize
            } else {
                legal[fallback.next(0, legal.len() as i32) as usize]
            };
            let pressed_before: Vec<bool> = puzzle
                .board()
                .monitors()
                .iter()
                .map(Monitor::is_pressed)
                .collect();

            let turn = puzzle.play(index).unwrap();
            match turn.outcome {
                PressOutcome::Success => assert!(legal.contains(&index)),
                PressOutcome::Strike => assert!(!legal.contains(&index)),
                PressOutcome::AlreadyPressed => assert!(pressed_before[index]),
            }
            for (index, was_pressed) in pressed_before.into_iter().enumerate() {
                if was_pressed {
                    assert!(puzzle.monitor(index).unwrap().is_pressed());
                }
            }
            assert_distinct(&puzzle);
            if turn.solved {
                assert!(puzzle.is_solved());
            }
        }
    }
}
