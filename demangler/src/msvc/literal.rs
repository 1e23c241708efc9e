//! Encoded string literals.
//!
//! ```text
//! <string-literal> = @_ <char-kind> <length> <checksum> {<encoded-byte>} @
//!
//! <char-kind>    = 0    # single byte characters
//!                | 1    # big endian UTF-16 code units
//!
//! <encoded-byte> = ?$ A..=P A..=P     # hex nibbles
//!                | ? 0..=9            # one of ",/\:. \v\n'-"
//!                | ? a..=z            # byte + 0x80
//!                | ? A..=Z            # byte + 0x80
//!                | <byte>
//! ```

use super::context::Context;
use crate::error::{Error, Result};

const ESCAPED: &[u8; 10] = b",/\\:. \x0b\n'-";

pub(super) fn parse(ctx: &mut Context) -> Result<String> {
    if !ctx.eat_slice(b"@_") {
        return Err(Error::UncorrectMangledSymbol);
    }

    let wide = match ctx.take() {
        Some(b'0') => false,
        Some(b'1') => true,
        _ => return Err(Error::UncorrectMangledSymbol),
    };

    let _length = ctx.number()?;
    let checksum = ctx.number()?;

    let mut bytes = Vec::new();
    loop {
        let byte = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
            b'@' => break,
            b'?' => escaped(ctx)?,
            byte => byte,
        };

        bytes.push(byte);
    }

    let text = if wide { decode_wide(&bytes)? } else { decode_narrow(&bytes) };

    Ok(format!("`string'::{checksum}::\"{text}\""))
}

fn escaped(ctx: &mut Context) -> Result<u8> {
    let byte = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'$' => {
            let nibble = |b: Option<u8>| match b {
                Some(b @ b'A'..=b'P') => Ok(b - b'A'),
                _ => Err(Error::UncorrectMangledSymbol),
            };

            let high = nibble(ctx.take())?;
            let low = nibble(ctx.take())?;
            (high << 4) | low
        }
        digit @ b'0'..=b'9' => ESCAPED[(digit - b'0') as usize],
        byte @ (b'a'..=b'z' | b'A'..=b'Z') => byte + 0x80,
        _ => return Err(Error::UncorrectMangledSymbol),
    };

    Ok(byte)
}

/// Single byte strings end at the first NUL, bytes are read as Latin-1.
fn decode_narrow(bytes: &[u8]) -> String {
    bytes.iter().take_while(|&&b| b != 0).map(|&b| b as char).collect()
}

/// Wide strings end at the first NUL code unit, a trailing odd byte is ignored.
fn decode_wide(bytes: &[u8]) -> Result<String> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0);

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|_| Error::UncorrectMangledSymbol)
}
