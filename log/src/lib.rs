use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Environment variable selecting the initial verbosity.
pub const ENV_VAR: &str = "DEMANGLE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Trace = 3,
}

impl Level {
    fn from_u8(level: u8) -> Self {
        match level {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            _ => Self::Trace,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Trace => "trace",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

static LEVEL: Lazy<AtomicU8> = Lazy::new(|| {
    let level = std::env::var(ENV_VAR)
        .ok()
        .and_then(|var| var.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    AtomicU8::new(level as u8)
});

pub fn level() -> Level {
    Level::from_u8(LEVEL.load(Ordering::Relaxed))
}

pub fn set_level(level: Level) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Whether a message at `level` would be recorded.
#[inline]
pub fn enabled(level: Level) -> bool {
    level <= self::level()
}

#[macro_export]
macro_rules! notify {
    () => {};

    ($($arg:tt)*) => {{
        $crate::log!($crate::Level::Info, $($arg)*)
    }};
}

#[macro_export]
macro_rules! error {
    () => {};

    ($($arg:tt)*) => {{
        $crate::log!($crate::Level::Error, $($arg)*)
    }};
}

#[macro_export]
macro_rules! warn {
    () => {};

    ($($arg:tt)*) => {{
        $crate::log!($crate::Level::Warn, $($arg)*)
    }};
}

#[macro_export]
macro_rules! trace {
    () => {};

    ($($arg:tt)*) => {{
        $crate::log!($crate::Level::Trace, $($arg)*)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {{
        if $crate::enabled($level) {
            // A poisoned logger only loses the line.
            if let Ok(mut logger) = $crate::LOGGER.lock() {
                logger.append(format!($($arg)*), $level);
            }
        }
    }};
}

pub static LOGGER: Lazy<Mutex<Logger<300>>> = Lazy::new(|| Mutex::new(Logger::new(true)));

/// Ring buffer of the most recent `N` log lines.
pub struct Logger<const N: usize> {
    lines: [(String, Level); N],
    head: usize,
    len: usize,
    echo: bool,
}

impl<const N: usize> Logger<N> {
    /// Creates an empty logger, `echo` mirrors every appended line to stderr.
    pub fn new(echo: bool) -> Self {
        Self {
            lines: std::array::from_fn(|_| (String::new(), Level::Trace)),
            head: 0,
            len: 0,
            echo,
        }
    }

    pub fn append(&mut self, line: String, level: Level) {
        if N == 0 {
            return;
        }

        if self.echo {
            eprintln!("[{}] {line}", level.tag());
        }

        self.lines[self.head] = (line, level);
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lines in the order they were appended, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = (&str, Level)> {
        let (a, b) = if self.len < N {
            (&self.lines[0..self.len], &[][..])
        } else {
            // wrapped around, so we need to return two slices
            let (a, b) = self.lines.split_at(self.head);

            (b, a)
        };

        a.iter().chain(b).map(|(line, level)| (line.as_str(), *level))
    }
}
