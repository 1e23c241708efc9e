use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Max recursion depth
pub(super) const MAX_DEPTH: usize = 256;

/// Back references are a single digit.
const MAX_BACKREFS: usize = 10;

/// Previously rendered names and types, referenced later in the symbol by a single digit.
#[derive(Debug, Default)]
pub(super) struct Backrefs {
    /// Names memorized while parsing qualified names and templates.
    pub names: Vec<String>,

    /// Function arguments whose encoding was longer than a single character.
    pub types: Vec<String>,
}

impl Backrefs {
    pub fn memorize_name(&mut self, name: &str) {
        if self.names.len() < MAX_BACKREFS {
            self.names.push(name.to_string());
        }
    }

    pub fn memorize_type(&mut self, tipe: &str) {
        if self.types.len() < MAX_BACKREFS {
            self.types.push(tipe.to_string());
        }
    }

    pub fn name(&self, idx: usize) -> Result<&str> {
        self.names.get(idx).map(String::as_str).ok_or(Error::BackrefOutOfRange)
    }

    pub fn tipe(&self, idx: usize) -> Result<&str> {
        self.types.get(idx).map(String::as_str).ok_or(Error::BackrefOutOfRange)
    }
}

/// Encoded number, its textual form keeps the sign of `?@` which reads as `-0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Number {
    pub value: u64,
    pub negative: bool,
}

impl Number {
    pub fn signed(self) -> i64 {
        let value = self.value as i64;
        if self.negative {
            value.wrapping_neg()
        } else {
            value
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }

        write!(f, "{}", self.value)
    }
}

/// State that needs to be shared whilst parsing a symbol.
#[derive(Debug)]
pub(super) struct Context<'a> {
    cursor: Cursor<'a>,
    pub backrefs: Backrefs,
    depth: usize,
}

impl<'a> Deref for Context<'a> {
    type Target = Cursor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl DerefMut for Context<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}

impl<'a> Context<'a> {
    /// Create an initialized parser that hasn't started parsing yet.
    pub fn new(s: &'a str) -> Self {
        Self {
            cursor: Cursor::new(s),
            backrefs: Backrefs::default(),
            depth: 0,
        }
    }

    /// Runs `f` one level deeper, failing once [`MAX_DEPTH`] is reached.
    pub fn descent<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::RecursionLimit);
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Consume `byte` or fail with `err`.
    pub fn expect(&mut self, byte: u8, err: Error) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Parses an `@` terminated identifier.
    pub fn ident(&mut self) -> Result<&'a str> {
        self.take_until(b'@').ok_or(Error::UncorrectMangledSymbol)
    }

    /// Parses a generic number (positive, negative, hex or decimal).
    ///
    /// ```text
    /// <number> = [?] <unsigned>
    ///
    /// <unsigned> = @                      # 0
    ///            | 0..=9                  # 1..=10
    ///            | {A..=P} [@]            # hex nibbles
    ///            | A..=P 0x {<hex>} [@]
    /// ```
    pub fn number(&mut self) -> Result<Number> {
        let negative = self.eat(b'?');

        let value = match self.peek().ok_or(Error::UncorrectMangledSymbol)? {
            b'@' => {
                self.advance(1);
                0
            }
            digit @ b'0'..=b'9' => {
                self.advance(1);
                (digit - b'0') as u64 + 1
            }
            b'A'..=b'P' => {
                let value = if self.peek_slice(3).map_or(false, |s| &s[1..] == b"0x")
                    && self.peek_at(3).map_or(false, |b| b.is_ascii_hexdigit())
                {
                    self.advance(3);
                    self.hex(|b| (b as char).to_digit(16).map(u64::from))?
                } else {
                    self.hex(|b| match b {
                        b'A'..=b'P' => Some((b - b'A') as u64),
                        _ => None,
                    })?
                };

                self.eat(b'@');
                value
            }
            _ => return Err(Error::UncorrectMangledSymbol),
        };

        Ok(Number { value, negative })
    }

    fn hex(&mut self, nibble: impl Fn(u8) -> Option<u64>) -> Result<u64> {
        let mut value: u64 = 0;
        while let Some(n) = self.peek().and_then(&nibble) {
            value = value
                .checked_mul(16)
                .and_then(|v| v.checked_add(n))
                .ok_or(Error::UncorrectMangledSymbol)?;
            self.advance(1);
        }

        Ok(value)
    }
}
