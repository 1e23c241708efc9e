//! Custom `Error` and `Result` types shared by the demangling engines.

use std::fmt;

/// Errors that can occur while demangling a symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Unrecognised type or operator code.
    UncorrectTypeCode,

    /// Recognised code that isn't rendered.
    UnsupportedTypeCode,

    /// The mangled symbol is not well-formed, e.g. it's missing a terminator or has a bad
    /// number or length prefix.
    UncorrectMangledSymbol,

    /// Found a back reference that is out-of-bounds of the memorized names or types.
    BackrefOutOfRange,

    /// Encountered too much recursion when demangling symbol.
    RecursionLimit,

    /// A size computation overflowed, e.g. an array dimension.
    Alloc,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Error::UncorrectTypeCode => "UncorrectTypeCode",
            Error::UnsupportedTypeCode => "UnsupportedTypeCode",
            Error::UncorrectMangledSymbol => "UncorrectMangledSymbol",
            Error::BackrefOutOfRange => "BackrefOutOfRange",
            Error::RecursionLimit => "RecursionLimit",
            Error::Alloc => "Alloc",
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UncorrectTypeCode => write!(f, "unrecognised type code"),
            Error::UnsupportedTypeCode => write!(f, "type code is recognised but not supported"),
            Error::UncorrectMangledSymbol => write!(f, "mangled symbol is not well-formed"),
            Error::BackrefOutOfRange => {
                write!(f, "back reference that is out-of-bounds of the memorized entries")
            }
            Error::RecursionLimit => write!(f, "encountered too much recursion"),
            Error::Alloc => write!(f, "size of demangled symbol overflowed"),
        }
    }
}

impl std::error::Error for Error {}

#[test]
fn size_of_error() {
    assert_eq!(std::mem::size_of::<Error>(), 1);
}
