use std::fmt;

/// Write-only diagnostic sink.
///
/// Nothing recorded here may influence how a puzzle plays.
pub trait Trace {
    fn record(&mut self, message: fmt::Arguments<'_>);
}

/// Record a formatted message on a [`Trace`].
macro_rules! record {
    ($trace:expr, $($arg:tt)+) => {
        $crate::trace::Trace::record(&mut $trace, format_args!($($arg)+))
    };
}
pub(crate) use record;

impl<T> Trace for &mut T
where
    T: Trace + ?Sized,
{
    fn record(&mut self, message: fmt::Arguments<'_>) {
        (**self).record(message)
    }
}

impl Trace for Box<dyn Trace> {
    fn record(&mut self, message: fmt::Arguments<'_>) {
        (**self).record(message)
    }
}

/// Collects every message; handy in tests.
impl Trace for Vec<String> {
    fn record(&mut self, message: fmt::Arguments<'_>) {
        self.push(message.to_string());
    }
}

/// Forwards messages to the [`log`] facade, tagged with the puzzle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTrace {
    id: usize,
    level: log::Level,
}

impl LogTrace {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            level: log::Level::Info,
        }
    }

    pub fn with_level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }
}

impl Trace for LogTrace {
    fn record(&mut self, message: fmt::Arguments<'_>) {
        log::log!(self.level, "[Connected Monitors #{}] {}", self.id, message);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullTrace;

impl Trace for NullTrace {
    fn record(&mut self, _message: fmt::Arguments<'_>) {}
}
