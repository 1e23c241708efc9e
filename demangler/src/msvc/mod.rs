//! Microsoft Visual C++ symbol demangler.
//!
//! ```text
//! <symbol> = ? <mangled-name>
//!          | .? <storage-class> <type>                    # RTTI type name
//!
//! <mangled-name> = <qualified-name> @ [$$F] [_] <encoding>
//!                | <string-literal>
//!
//! <encoding> = 0..=5 <type> <ptr-modifiers> <storage-class>       # variable
//!            | 6 | 7 <ptr-modifiers> <storage-class> [<scopes>] @  # vftable and friends
//!            | 8 | 9                                              # local static guards
//!            | <function>
//! ```
//!
//! Names and argument types that were already seen can be referenced by a single digit, these
//! are tracked per symbol in a [`context::Backrefs`] table.

use std::fmt;

use crate::error::{Error, Result};
use crate::Options;

mod context;
mod function;
mod literal;
mod names;
mod tests;
mod types;

use context::Context;
use names::QualifiedName;

/// Demangle a MSVC symbol, yielding `None` if it's malformed.
pub fn demangle(s: &str, opts: Options) -> Option<String> {
    match try_demangle(s, opts) {
        Ok(demangled) => Some(demangled),
        Err(err) => {
            log::trace!("msvc: rejected '{s}': {err:?}");
            None
        }
    }
}

/// Demangle a MSVC symbol, reporting why it couldn't be demangled.
///
/// Options are accepted for parity with the other schemes, the output is always rendered in
/// full.
pub fn try_demangle(s: &str, _opts: Options) -> Result<String> {
    let s = s.trim_end();
    let mut ctx = Context::new(s);

    let demangled = if ctx.eat_slice(b".?") {
        rtti_type_name(&mut ctx)?
    } else if ctx.eat(b'?') {
        mangled_name(&mut ctx, false)?.to_string()
    } else {
        return Err(Error::UncorrectMangledSymbol);
    };

    if !ctx.is_empty() {
        log::trace!("msvc: ignoring trailing '{}' of '{s}'", ctx.rest());
    }

    Ok(demangled)
}

/// A demangled symbol, also used for symbols nested in names and template arguments.
#[derive(Debug, Clone)]
pub(super) enum Symbol {
    StringLiteral(QualifiedName),
    Data {
        name: QualifiedName,
        left: Option<String>,
        right: String,
    },
    Function(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::StringLiteral(name) => write!(f, "{name}"),
            Symbol::Data { name, left, right } => {
                if let Some(left) = left {
                    write!(f, "{left} ")?;
                }
                write!(f, "{name}{right}")
            }
            Symbol::Function(func) => f.write_str(func),
        }
    }
}

fn mangled_name(ctx: &mut Context, memorize: bool) -> Result<Symbol> {
    ctx.descent(|ctx| {
        let name = names::qualified_name(ctx, memorize)?;

        if ctx.is_empty() {
            return if name.is_string_literal() {
                Ok(Symbol::StringLiteral(name))
            } else {
                Err(Error::UncorrectMangledSymbol)
            };
        }

        ctx.expect(b'@', Error::UncorrectMangledSymbol)?;
        ctx.eat_slice(b"$$F");
        ctx.eat(b'_');

        match ctx.peek() {
            Some(b'0'..=b'9') => {
                let (left, right) = data_type(ctx)?;
                Ok(Symbol::Data { name, left, right })
            }
            Some(byte) if byte.is_ascii_alphabetic() => {
                function::function(ctx, &name).map(Symbol::Function)
            }
            _ => Err(Error::UncorrectMangledSymbol),
        }
    })
}

/// Variables and compiler generated tables, returning what's rendered left and right of the
/// name.
fn data_type(ctx: &mut Context) -> Result<(Option<String>, String)> {
    let code = ctx.take().ok_or(Error::UncorrectMangledSymbol)?;

    match code {
        b'0'..=b'5' => {
            let access = match code {
                b'0' => "private: static ",
                b'1' => "protected: static ",
                b'2' => "public: static ",
                _ => "",
            };

            let tipe = types::parse(ctx)?;
            let modifier = ptr_modifier(ctx);
            let storage = ctx
                .take()
                .ok_or(Error::UncorrectMangledSymbol)
                .and_then(storage_class)?;

            let mut left = format!("{access}{}{tipe}", modifier.left);
            if let Some(storage) = storage {
                left.push(' ');
                left += storage;
            }
            left += &modifier.right;

            Ok((Some(left), String::new()))
        }
        b'6' | b'7' => {
            let modifier = ptr_modifier(ctx);
            let storage = ctx
                .take()
                .ok_or(Error::UncorrectMangledSymbol)
                .and_then(storage_class)?;

            let left = format!("{}{}{}", storage.unwrap_or_default(), modifier.left, modifier.right);
            let right = if ctx.eat(b'@') { String::new() } else { scopes(ctx)? };

            Ok((Some(left), right))
        }
        b'8' | b'9' => Ok((None, String::new())),
        _ => Err(Error::UncorrectMangledSymbol),
    }
}

/// Classes a vftable is laid out for.
///
/// ```text
/// <scopes> = <qualified-name> @ {<qualified-name> @} @
/// ```
fn scopes(ctx: &mut Context) -> Result<String> {
    let mut rendered = String::from("{for ");

    loop {
        let scope = names::qualified_name(ctx, true)?;
        ctx.expect(b'@', Error::UncorrectMangledSymbol)?;

        if !rendered.ends_with(' ') {
            rendered += "'s ";
        }
        rendered += &format!("`{scope}");

        if ctx.eat(b'@') {
            break;
        }
    }

    rendered += "'}";
    Ok(rendered)
}

fn rtti_type_name(ctx: &mut Context) -> Result<String> {
    let storage = ctx
        .take()
        .ok_or(Error::UncorrectMangledSymbol)
        .and_then(storage_class)?;
    let tipe = types::parse(ctx)?;

    Ok(match storage {
        Some(storage) => format!("{tipe} {storage}"),
        None => tipe.to_string(),
    })
}

fn storage_class(code: u8) -> Result<Option<&'static str>> {
    match code {
        b'A' => Ok(None),
        b'B' | b'J' => Ok(Some("const")),
        b'C' | b'G' | b'K' => Ok(Some("volatile")),
        b'D' | b'H' | b'L' => Ok(Some("const volatile")),
        _ => Err(Error::UncorrectMangledSymbol),
    }
}

fn calling_convention(code: u8) -> Option<&'static str> {
    Some(match code {
        b'A' => "__cdecl",
        b'B' => "__cdecl __declspec(dllexport)",
        b'C' => "__pascal",
        b'D' => "__pascal __declspec(dllexport)",
        b'E' => "__thiscall",
        b'F' => "__thiscall __declspec(dllexport)",
        b'G' => "__stdcall",
        b'H' => "__stdcall __declspec(dllexport)",
        b'I' => "__fastcall",
        b'J' => "__fastcall __declspec(dllexport)",
        b'K' => "default (none given)",
        b'L' => "default (none given) __declspec(dllexport)",
        b'M' => "__clrcall",
        b'N' => "__clrcall __declspec(dllexport)",
        b'O' => "__eabi",
        b'P' => "__eabi __declspec(dllexport)",
        b'Q' => "__vectorcall",
        b'R' => "__vectorcall __declspec(dllexport)",
        b'S' => "__swift_1",
        b'T' => "__swift_1 __declspec(dllexport)",
        b'U' => "__swift_2",
        b'V' => "__swift_2 __declspec(dllexport)",
        b'W' => "__swift_3",
        _ => return None,
    })
}

/// Pointer modifiers, split in what's rendered before and after the pointer.
#[derive(Debug, Default)]
struct PtrModifier {
    left: String,
    right: String,
    count: usize,
}

/// ```text
/// <ptr-modifiers> = {E | F | G | H | I}
/// ```
fn ptr_modifier(ctx: &mut Context) -> PtrModifier {
    let mut modifier = PtrModifier::default();
    let (mut reference, mut rvalue_reference) = (false, false);

    while let Some(byte) = ctx.peek() {
        match byte {
            b'E' => modifier.right += " __ptr64",
            b'F' => modifier.left += " __unaligned",
            b'I' => modifier.right += " __restrict",
            b'G' => reference = true,
            b'H' => rvalue_reference = true,
            _ => break,
        }

        ctx.advance(1);
        modifier.count += 1;
    }

    if reference {
        modifier.right.push('&');
        if rvalue_reference {
            modifier.right.push(' ');
        }
    }

    if rvalue_reference {
        modifier.right += "&&";
    }

    modifier
}
