//! Function encodings.
//!
//! ```text
//! <function> = <access> [E] [$ <any>] [<this-modifiers>] <calling-convention>
//!              [? <storage-class>] <return-type> <args>
//!
//! <access> = A..=F | I..=N | Q..=V         # member functions
//!          | G | H | O | P | W | X <number> # virtual thunks
//!          | Y | Z                         # free functions
//!
//! <this-modifiers> = <ptr-modifiers> <storage-class>
//!
//! <return-type> = @                         # void
//!               | <type>
//!
//! <args> = {<type> | 0..=9} [Z] {@} Z
//! ```

use super::context::Context;
use super::names::QualifiedName;
use super::{calling_convention, ptr_modifier, storage_class, types};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Access {
    prefix: &'static str,
    adjustor: Option<String>,
    has_this: bool,
}

fn access(ctx: &mut Context) -> Result<Access> {
    let code = ctx.take().ok_or(Error::UncorrectMangledSymbol)?;

    let member = |prefix| Access { prefix, adjustor: None, has_this: true };
    let stat = |prefix| Access { prefix, adjustor: None, has_this: false };

    let access = match code {
        b'A' | b'B' => member("private"),
        b'C' | b'D' => stat("private: static"),
        b'E' | b'F' => member("private virtual"),
        b'I' | b'J' => member("protected"),
        b'K' | b'L' => stat("protected: static"),
        b'M' | b'N' => member("protected virtual"),
        b'Q' | b'R' => member("public"),
        b'S' | b'T' => stat("public: static"),
        b'U' | b'V' => member("public virtual"),
        b'G' | b'H' | b'O' | b'P' | b'W' | b'X' => {
            let prefix = match code {
                b'G' | b'H' => "[thunk]:private virtual",
                b'O' | b'P' => "[thunk]:protected virtual",
                _ => "[thunk]:public virtual",
            };

            let displacement = ctx.number()?;
            Access {
                prefix,
                adjustor: Some(format!("`adjustor{{{displacement}}}'")),
                has_this: true,
            }
        }
        b'Y' | b'Z' => Access::default(),
        _ => return Err(Error::UncorrectMangledSymbol),
    };

    Ok(access)
}

/// Parses a function's encoding, everything after its name.
pub(super) fn function(ctx: &mut Context, name: &QualifiedName) -> Result<String> {
    let access = access(ctx)?;
    let ptr64 = ctx.eat(b'E');

    if ctx.eat(b'$') {
        ctx.advance(1);
    }

    let mut this_storage = None;
    let mut this_modifier = Default::default();
    if access.has_this {
        this_modifier = ptr_modifier(ctx);
        this_storage = ctx
            .take()
            .ok_or(Error::UncorrectMangledSymbol)
            .and_then(storage_class)?;
    }

    let calling_convention = ctx
        .take()
        .and_then(calling_convention)
        .ok_or(Error::UncorrectMangledSymbol)?;

    let ret_storage = if ctx.eat(b'?') {
        ctx.take().ok_or(Error::UncorrectMangledSymbol).and_then(storage_class)?
    } else {
        None
    };

    let mut ret = if ctx.eat(b'@') {
        "void".to_string()
    } else {
        types::parse(ctx).map_err(|_| Error::UncorrectMangledSymbol)?.to_string()
    };

    if let Some(storage) = ret_storage {
        ret.push(' ');
        ret += storage;
    }

    let args = function_args(ctx)?;

    let mut rendered = String::new();
    if !access.prefix.is_empty() {
        rendered += access.prefix;
        rendered += if access.prefix.contains("static") { " " } else { ": " };
    }

    rendered += &format!("{ret} {calling_convention} {}", name.render(Some(&ret)));
    if let Some(adjustor) = access.adjustor {
        rendered += &adjustor;
    }

    rendered += &args;
    if let Some(storage) = this_storage {
        rendered += storage;
    }

    rendered += &this_modifier.left;
    if ptr64 {
        rendered += " __ptr64";
    }
    rendered += &this_modifier.right;

    Ok(rendered)
}

/// Parses an argument list, rendered with its surrounding parentheses.
///
/// Arguments whose encoding is longer than one character are memorized, to be referenced
/// later by a digit.
pub(super) fn function_args(ctx: &mut Context) -> Result<String> {
    let mut args: Vec<String> = Vec::new();

    while let Some(byte) = ctx.peek() {
        match byte {
            b'Z' => break,
            b'@' => {
                ctx.advance(1);
                continue;
            }
            b'0'..=b'9' => {
                ctx.advance(1);
                let tipe = ctx.backrefs.tipe((byte - b'0') as usize)?;
                args.push(tipe.to_string());
            }
            _ => {
                let start = ctx.position();
                let tipe = types::parse(ctx)?.to_string();
                if ctx.position() - start > 1 {
                    ctx.backrefs.memorize_type(&tipe);
                }
                args.push(tipe);
            }
        }

        if args.last().map_or(false, |arg| arg == "void") {
            break;
        }
    }

    if !args.is_empty() && ctx.peek_slice(2) == Some(b"ZZ") {
        ctx.advance(1);
        args.push("...".to_string());
    }

    while ctx.eat(b'@') {}
    ctx.expect(b'Z', Error::UncorrectMangledSymbol)?;

    Ok(format!("({})", args.join(", ")))
}
