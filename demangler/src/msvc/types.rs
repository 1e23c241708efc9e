//! Type codes.
//!
//! ```text
//! <type> = C..=O | X | Z                     # primitives
//!        | _ <extended-primitive>
//!        | T <qualified-name> @              # union
//!        | U <qualified-name> @              # struct
//!        | V <qualified-name> @              # class
//!        | W 4 <qualified-name> @            # enum
//!        | P | Q | R | S <pointee>           # pointers with cv qualifiers
//!        | A | B <pointee>                   # references
//!        | $$ <extended-type>
//!
//! <pointee> = 6 | 7 <function-pointer>
//!           | 8 | 9 <qualified-name> @ <ptr-modifiers> <storage-class> <function-pointer>
//!           | <type-modifier>
//! ```

use std::fmt;

use super::context::Context;
use super::function::function_args;
use super::names::qualified_name;
use super::{calling_convention, ptr_modifier, storage_class};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Type {
    /// Fully rendered type.
    Plain(String),

    /// Pointer to a function, kept apart so its declarator ends up inside the parentheses.
    Function(Box<FunctionPointer>),
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct FunctionPointer {
    ret: Type,
    ret_storage: Option<&'static str>,
    calling_convention: &'static str,
    /// `*`, `* const` or `Class::*`.
    pointer: String,
    args: String,
}

impl Type {
    fn plain(s: &str) -> Result<Self> {
        Ok(Type::Plain(s.to_string()))
    }

    /// Render the type around a declarator, `int` with `x` renders as `int x`.
    pub fn render(&self, declarator: &str) -> String {
        match self {
            Type::Plain(s) if declarator.is_empty() => s.clone(),
            Type::Plain(s) => format!("{s} {declarator}"),
            Type::Function(func) => {
                let declarator = format!(
                    "({} {}{}){}",
                    func.calling_convention, func.pointer, declarator, func.args
                );

                match (&func.ret, func.ret_storage) {
                    (Type::Plain(ret), Some(storage)) => format!("{ret} {storage} {declarator}"),
                    (ret, _) => ret.render(&declarator),
                }
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

pub(super) fn parse(ctx: &mut Context) -> Result<Type> {
    ctx.descent(|ctx| {
        match ctx.take().ok_or(Error::UncorrectTypeCode)? {
            b'C' => Type::plain("signed char"),
            b'D' => Type::plain("char"),
            b'E' => Type::plain("unsigned char"),
            b'F' => Type::plain("short int"),
            b'G' => Type::plain("unsigned short int"),
            b'H' => Type::plain("int"),
            b'I' => Type::plain("unsigned int"),
            b'J' => Type::plain("long int"),
            b'K' => Type::plain("unsigned long int"),
            b'M' => Type::plain("float"),
            b'N' => Type::plain("double"),
            b'O' => Type::plain("long double"),
            b'X' => Type::plain("void"),
            b'Z' => Type::plain("..."),
            b'_' => extended(ctx),
            b'T' => user_defined(ctx, "union ", &[
                ("__m64@@", "__m64"),
                ("__m128@@", "__m128"),
                ("__m128i@@", "__m128i"),
                ("__m256@@", "__m256"),
                ("__m256i@@", "__m256i"),
                ("__m512@@", "__m512"),
                ("__m512i@@", "__m512i"),
            ]),
            b'U' => user_defined(ctx, "struct ", &[
                ("__m128d@@", "__m128d"),
                ("__m256d@@", "__m256d"),
                ("__m512d@@", "__m512d"),
            ]),
            b'V' => user_defined(ctx, "class ", &[]),
            b'W' => {
                ctx.expect(b'4', Error::UncorrectTypeCode)?;
                user_defined(ctx, "enum ", &[])
            }
            b'P' => pointer(ctx, "*"),
            b'Q' => pointer(ctx, "* const"),
            b'R' => pointer(ctx, "* volatile"),
            b'S' => pointer(ctx, "* const volatile"),
            b'A' => pointer(ctx, "&"),
            b'B' => pointer(ctx, "& volatile"),
            b'$' => dollar(ctx),
            _ => Err(Error::UncorrectTypeCode),
        }
    })
}

fn extended(ctx: &mut Context) -> Result<Type> {
    match ctx.take().ok_or(Error::UncorrectTypeCode)? {
        b'D' => Type::plain("__int8"),
        b'E' => Type::plain("unsigned __int8"),
        b'F' => Type::plain("__int16"),
        b'G' => Type::plain("unsigned __int16"),
        b'H' => Type::plain("__int32"),
        b'I' => Type::plain("unsigned __int32"),
        b'J' => Type::plain("long long(__int64)"),
        b'K' => Type::plain("unsigned long long(unsigned __int64)"),
        b'L' => Type::plain("__int128"),
        b'M' => Type::plain("unsigned __int128"),
        b'N' => Type::plain("bool"),
        b'Q' => Type::plain("char8_t"),
        b'S' => Type::plain("char16_t"),
        b'T' => Type::plain("long double(80 bit precision)"),
        b'U' => Type::plain("char32_t"),
        b'W' => Type::plain("wchar_t"),
        b'Z' => Type::plain("long double(64 bit precision)"),
        _ => Err(Error::UncorrectTypeCode),
    }
}

fn user_defined(ctx: &mut Context, keyword: &str, intrinsics: &[(&str, &str)]) -> Result<Type> {
    for (mangled, name) in intrinsics {
        if ctx.eat_slice(mangled.as_bytes()) {
            return Type::plain(name);
        }
    }

    let name = qualified_name(ctx, true).map_err(|err| match err {
        Error::UncorrectMangledSymbol => Error::UncorrectTypeCode,
        err => err,
    })?;
    ctx.expect(b'@', Error::UncorrectTypeCode)?;

    Ok(Type::Plain(format!("{keyword}{name}")))
}

/// ```text
/// <extended-type> = A | F <pointee>       # function types
///                 | B | C <type-modifier>
///                 | Q <type-modifier>     # rvalue reference
///                 | R <type-modifier>     # volatile rvalue reference
///                 | T                     # std::nullptr_t
///                 | V | Z                 # empty
/// ```
fn dollar(ctx: &mut Context) -> Result<Type> {
    ctx.expect(b'$', Error::UncorrectTypeCode)?;

    match ctx.take().ok_or(Error::UncorrectTypeCode)? {
        b'A' | b'F' => pointer(ctx, "*"),
        b'B' | b'C' => type_modifier(ctx, ""),
        b'Q' => type_modifier(ctx, "&&"),
        b'R' => type_modifier(ctx, "&& volatile"),
        b'T' => Type::plain("std::nullptr_t"),
        b'V' | b'Z' => Type::plain(""),
        _ => Err(Error::UncorrectTypeCode),
    }
}

fn pointer(ctx: &mut Context, pointer: &str) -> Result<Type> {
    match ctx.peek() {
        Some(b'6' | b'7') => {
            ctx.advance(1);
            function_pointer(ctx, pointer.to_string())
        }
        Some(b'8' | b'9') => {
            ctx.advance(1);
            member_function_pointer(ctx, pointer)
        }
        _ => type_modifier(ctx, pointer),
    }
}

/// ```text
/// <function-pointer> = <calling-convention> [? <storage-class>] <return-type> <args>
/// ```
fn function_pointer(ctx: &mut Context, pointer: String) -> Result<Type> {
    let calling_convention = ctx
        .take()
        .and_then(calling_convention)
        .ok_or(Error::UncorrectTypeCode)?;

    let ret_storage = if ctx.eat(b'?') {
        ctx.take().ok_or(Error::UncorrectTypeCode).and_then(storage_class)?
    } else {
        None
    };

    let ret = parse(ctx)?;
    let args = function_args(ctx)?;

    Ok(Type::Function(Box::new(FunctionPointer {
        ret,
        ret_storage,
        calling_convention,
        pointer,
        args,
    })))
}

fn member_function_pointer(ctx: &mut Context, pointer: &str) -> Result<Type> {
    let class = qualified_name(ctx, true)?;
    ctx.expect(b'@', Error::UncorrectTypeCode)?;

    let modifier = ptr_modifier(ctx);
    let storage = ctx.take().ok_or(Error::UncorrectTypeCode).and_then(storage_class)?;
    let func = function_pointer(ctx, format!("{class}::{pointer}"))?;

    let mut rendered = modifier.left;
    rendered += &func.to_string();
    if let Some(storage) = storage {
        rendered.push(' ');
        rendered += storage;
    }
    rendered += &modifier.right;

    Ok(Type::Plain(rendered))
}

/// Managed handle kinds introduced by `$A`, `$B` and `$C`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Managed {
    Handle(char),
    Pin,
}

/// Pointers and references to data.
///
/// ```text
/// <type-modifier> = <ptr-modifiers> [$ A..=C] {<ptr-modifiers> <storage-class>} [Y <dims>] <type>
///
/// <dims> = <number> {<number>}
/// ```
fn type_modifier(ctx: &mut Context, modifier: &str) -> Result<Type> {
    let initial = ptr_modifier(ctx);
    let mut left = initial.left;
    let mut right = initial.right;

    let mut managed = None;
    if ctx.eat(b'$') {
        managed = Some(match ctx.take().ok_or(Error::UncorrectTypeCode)? {
            b'A' => Managed::Handle('^'),
            b'B' => Managed::Pin,
            b'C' => Managed::Handle('%'),
            _ => return Err(Error::UnsupportedTypeCode),
        });
    }

    let mut storage = String::new();
    loop {
        let modifiers = ptr_modifier(ctx);
        if let Some(Ok(class)) = ctx.peek().map(storage_class) {
            ctx.advance(1);
            storage += class.unwrap_or_default();
        }

        left += &modifiers.left;
        right += &modifiers.right;
        if modifiers.count == 0 {
            break;
        }
    }

    let mut declarator = String::new();
    if ctx.eat(b'Y') {
        let dims = ctx.number()?.signed();

        if !(storage.is_empty() && left.is_empty() && right.is_empty() && modifier.is_empty()) {
            declarator.push('(');
            declarator += &storage;
            declarator += &left;
            if !declarator.ends_with(|c| c == ' ' || c == '(') {
                declarator.push(' ');
            }
            declarator += modifier;
            declarator += &right;
            declarator.push(')');
        }

        for _ in 0..dims {
            let dim = ctx.number()?;
            declarator += &format!("[{dim}]");
        }
    }

    if declarator.is_empty() {
        declarator += &storage;
        declarator += &left;
        if !declarator.is_empty() && !declarator.ends_with(' ') {
            declarator.push(' ');
        }

        match managed {
            Some(Managed::Handle(handle)) if !modifier.is_empty() => {
                declarator.push(handle);
                let skip = if modifier.as_bytes().get(1) == Some(&b'&') { 2 } else { 1 };
                declarator += modifier.get(skip..).unwrap_or_default();
            }
            Some(Managed::Pin) if !modifier.is_empty() => {
                declarator += modifier[1..].trim_start_matches(' ');
            }
            _ => declarator += modifier,
        }

        declarator += &right;
        declarator.truncate(declarator.trim_end().len());
    }

    ctx.eat_slice(b"__Z");

    let pointee = parse(ctx).map_err(|err| match err {
        Error::UncorrectTypeCode => Error::UnsupportedTypeCode,
        err => err,
    })?;

    let mut rendered = String::new();
    let is_pin = managed == Some(Managed::Pin);
    if is_pin {
        rendered += "cli::pin_ptr<";
    }
    rendered += &pointee.to_string();
    if !declarator.is_empty()
        && !rendered.is_empty()
        && !rendered.ends_with(' ')
        && !declarator.starts_with(' ')
    {
        rendered.push(' ');
    }
    rendered += &declarator;
    if is_pin {
        rendered.push('>');
    }

    Ok(Type::Plain(rendered))
}
