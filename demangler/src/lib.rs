//! Symbol demangler for the Microsoft, Itanium and GNU v2 C++ mangling schemes.
//!
//! Every entry point is a pure function of the symbol and [`Options`], returning `None` rather
//! than a partial rendering when the symbol doesn't parse.

use std::fmt;
use std::str::FromStr;

mod cursor;
mod error;
mod simplify;
mod tests;

pub mod cxx;
pub mod gnu_v2;
pub mod msvc;

pub use error::{Error, Result};
pub use simplify::simplify;

bitflags::bitflags! {
    /// Rendering options, not every scheme honors every flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Options: u32 {
        /// Default rendering.
        const BASE = 0;
        const NONE = 0;
        /// Shorten well-known standard library types.
        const SIMPLIFY = 1 << 0;
        const ANSI = 1 << 1;
        /// Render function parameter lists.
        const PARAMS = 1 << 2;
        const ALL = Self::SIMPLIFY.bits() | Self::ANSI.bits() | Self::PARAMS.bits();
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::BASE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Cxx,
    Msvc,
}

impl Language {
    /// Names accepted by [`Language::from_str`].
    pub const ALL: &'static [&'static str] = &["c++", "msvc"];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cxx => "c++",
            Self::Msvc => "msvc",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "c++" => Ok(Self::Cxx),
            "msvc" => Ok(Self::Msvc),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown language '{}'", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

/// Demangle `symbol` with the scheme of the given language.
pub fn demangle(lang: Language, symbol: &str, opts: Options) -> Option<String> {
    match lang {
        Language::Cxx => cxx::demangle(symbol, opts),
        Language::Msvc => msvc::demangle(symbol, opts),
    }
}
