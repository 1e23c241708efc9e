//! Range-checked reader over a mangled symbol.
//!
//! Every parser in this crate only touches the symbol through a [`Cursor`], reads past the end
//! yield `None` and moves that would leave the symbol are refused.

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, offset: 0 }
    }

    /// Remaining bytes of the symbol.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.src.as_bytes().get(self.offset..).unwrap_or_default()
    }

    /// Remaining part of the symbol, empty if the offset isn't on a char boundary.
    pub fn rest(&self) -> &'a str {
        self.src.get(self.offset..).unwrap_or_default()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.src.len()
    }

    /// Jump to an absolute position, refusing positions past the end.
    pub fn seek(&mut self, pos: usize) -> bool {
        if pos > self.src.len() {
            return false;
        }

        self.offset = pos;
        true
    }

    /// Move forward `n` bytes if that stays within the symbol.
    pub fn advance(&mut self, n: usize) -> bool {
        match self.offset.checked_add(n) {
            Some(pos) => self.seek(pos),
            None => false,
        }
    }

    /// View the current byte in the mangled symbol without incrementing the offset.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.remaining().first().copied()
    }

    /// View the byte `n` positions ahead without incrementing the offset.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.remaining().get(n).copied()
    }

    /// View a slice in the mangled symbol without incrementing the offset.
    pub fn peek_slice(&self, len: usize) -> Option<&'a [u8]> {
        self.remaining().get(..len)
    }

    /// View the current byte in the mangled symbol, incrementing the offset.
    pub fn take(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.offset += 1;
        Some(byte)
    }

    /// Take `len` bytes as a string, failing if they run past the end or split a character.
    pub fn take_str(&mut self, len: usize) -> Option<&'a str> {
        let end = self.offset.checked_add(len)?;
        let s = self.src.get(self.offset..end)?;
        self.offset = end;
        Some(s)
    }

    /// Increment the offset if the current byte equals the byte given.
    pub fn eat(&mut self, byte: u8) -> bool {
        let matches = self.peek() == Some(byte);
        self.offset += matches as usize;
        matches
    }

    /// Increment the offset if the slices match.
    pub fn eat_slice(&mut self, slice: &[u8]) -> bool {
        let matches = self.peek_slice(slice.len()) == Some(slice);
        self.offset += slice.len() * (matches as usize);
        matches
    }

    /// Take everything up to `terminator`, consuming the terminator itself.
    pub fn take_until(&mut self, terminator: u8) -> Option<&'a str> {
        let len = self.remaining().iter().position(|&b| b == terminator)?;
        let s = self.take_str(len)?;
        self.offset += 1;
        Some(s)
    }

    /// Parses an unsigned base10 number, incrementing the offset.
    ///
    /// Fails without moving if there are no digits or the number doesn't fit.
    pub fn decimal(&mut self) -> Option<usize> {
        let digits = self.remaining().iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }

        let mut n: usize = 0;
        for &digit in &self.remaining()[..digits] {
            n = n.checked_mul(10)?.checked_add((digit - b'0') as usize)?;
        }

        self.offset += digits;
        Some(n)
    }

    /// Parses an optionally signed base10 number, yielding `0` without moving if there are
    /// no digits.
    pub fn signed_decimal(&mut self) -> Option<i64> {
        let start = self.offset;
        let negative = self.eat(b'-');
        let n = match self.decimal() {
            Some(n) => i64::try_from(n).ok()?,
            None => {
                self.offset = start;
                return Some(0);
            }
        };

        Some(if negative { -n } else { n })
    }
}
