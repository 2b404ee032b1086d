use crate::random::RandomSource;

/// A pool keeps track of which values in `0..bound` are already taken, and
/// draws fresh ones from a [`RandomSource`].
///
/// Values are never released: a value drawn once stays taken for the
/// lifetime of the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePool {
    bound: i32,
    // We maintain the invariant that this vector is sorted and deduplicated
    taken: Vec<i32>,
}

impl ValuePool {
    pub fn new(bound: i32) -> Self {
        Self {
            bound,
            taken: Vec::new(),
        }
    }

    /// Build a pool with all provided values already taken.
    pub fn with_taken(bound: i32, values: impl IntoIterator<Item = i32>) -> Self {
        let mut taken: Vec<i32> = values.into_iter().collect();
        taken.sort_unstable();
        taken.dedup();
        Self { bound, taken }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.taken.binary_search(&value).is_ok()
    }

    /// Mark `value` as taken. Returns `false` if it already was.
    pub fn insert(&mut self, value: i32) -> bool {
        match self.taken.binary_search(&value) {
            Ok(_) => false,
            Err(idx) => {
                self.taken.insert(idx, value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// `true` when every value in `0..bound` is taken.
    pub fn is_exhausted(&self) -> bool {
        self.taken.iter().filter(|&&value| (0..self.bound).contains(&value)).count()
            >= self.bound.max(0) as usize
    }

    /// Draw a value uniformly from the untaken part of `0..bound` and mark it taken.
    ///
    /// Rejection sampling: the source is asked again whenever it produces a
    /// taken value. Returns `None` if nothing is left to draw.
    pub fn draw<R>(&mut self, random: &mut R) -> Option<i32>
    where
        R: RandomSource + ?Sized,
    {
        if self.is_exhausted() {
            return None;
        }
        loop {
            let value = random.next(0, self.bound);
            if self.insert(value) {
                return Some(value);
            }
        }
    }
}
