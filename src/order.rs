use crate::{
    board::{Board, Monitor},
    color::MonitorType,
};

/// The positive-context press order.
///
/// Candidates are the unpressed monitors with a non-negative score. They are
/// bucketed by [`MonitorType`] in the order given by `keys`; within a bucket
/// higher scores come first, ties going to the higher index.
pub fn press_order(board: &Board, keys: &[MonitorType]) -> Vec<usize> {
    let candidates: Vec<&Monitor> = board
        .unpressed()
        .filter(|monitor| monitor.score() >= 0)
        .collect();

    let mut order = Vec::with_capacity(candidates.len());
    for &key in keys {
        let mut bucket: Vec<&Monitor> = candidates
            .iter()
            .copied()
            .filter(|monitor| monitor.monitor_type() == Some(key))
            .collect();
        bucket.sort_by(|left, right| {
            right
                .score()
                .cmp(&left.score())
                .then_with(|| right.index().cmp(&left.index()))
        });
        order.extend(bucket.into_iter().map(Monitor::index));
    }
    order
}

/// The single monitor legal to press next in positive context, if any.
pub fn next_to_press(board: &Board, keys: &[MonitorType]) -> Option<usize> {
    press_order(board, keys).into_iter().next()
}
