//! Qualified names, templates and special names.
//!
//! ```text
//! <qualified-name> = [<special-name>] {<segment>}
//!
//! <segment> = ?$ <template>
//!           | ?Q <qualified-name> @          # anonymous namespace
//!           | ? [<number>] [?? <symbol>]     # nested scope
//!           | 0..=9                          # memorized name
//!           | <ident> @
//!
//! <template> = <template-name> {<template-arg>} @
//! ```
//!
//! Segments are mangled innermost first, so they're rendered in reverse.

use std::fmt;

use super::context::Context;
use super::{literal, mangled_name, storage_class, types};
use crate::error::{Error, Result};

/// Longest identifier allowed in a segment.
const MAX_IDENT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Segment {
    Text(String),

    /// `operator <type>`, the type is the return type of the enclosing function.
    Conversion { template_args: Option<String> },

    /// Encoded string literal, a complete symbol on its own.
    StringLiteral(String),
}

impl Segment {
    fn render(&self, conversion: Option<&str>, f: &mut String) {
        match self {
            Segment::Text(s) | Segment::StringLiteral(s) => f.push_str(s),
            Segment::Conversion { template_args } => {
                f.push_str("operator ");
                f.push_str(conversion.unwrap_or("cast"));
                if let Some(args) = template_args {
                    f.push_str(args);
                }
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        self.render(None, &mut s);
        f.write_str(&s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct QualifiedName {
    /// Segments in mangled order, innermost first.
    segments: Vec<Segment>,
}

impl QualifiedName {
    /// Whether the name is an encoded string literal, which has no type encoding following it.
    pub fn is_string_literal(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::StringLiteral(_)))
    }

    /// Render the name, substituting `conversion` as the target type of a conversion operator.
    pub fn render(&self, conversion: Option<&str>) -> String {
        let mut s = String::new();
        for (idx, segment) in self.segments.iter().rev().enumerate() {
            if idx != 0 {
                s.push_str("::");
            }
            segment.render(conversion, &mut s);
        }
        s
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Parses a qualified name up to, but not including, its terminating `@`.
pub(super) fn qualified_name(ctx: &mut Context, memorize: bool) -> Result<QualifiedName> {
    ctx.descent(|ctx| {
        let mut memorize = memorize;
        let mut segments = Vec::new();

        if ctx.peek() == Some(b'?') {
            segments.push(special_name(ctx, memorize)?);
            memorize = true;
        }

        while let Some(byte) = ctx.peek() {
            let segment = match byte {
                b'@' => break,
                b'?' if ctx.peek_at(1) == Some(b'$') => {
                    ctx.advance(2);
                    template(ctx, memorize)?
                }
                b'?' if ctx.peek_at(1) == Some(b'Q') => {
                    ctx.advance(2);
                    let inner = qualified_name(ctx, true)?;
                    ctx.expect(b'@', Error::UncorrectMangledSymbol)?;
                    Segment::Text(format!("[{inner}]"))
                }
                b'?' => {
                    ctx.advance(1);
                    nested(ctx)?
                }
                b'0'..=b'9' => {
                    ctx.advance(1);
                    memorize = true;
                    Segment::Text(ctx.backrefs.name((byte - b'0') as usize)?.to_string())
                }
                _ => {
                    let ident = ctx.ident()?;
                    if ident.is_empty() || ident.len() > MAX_IDENT_LEN {
                        return Err(Error::UncorrectMangledSymbol);
                    }
                    ctx.backrefs.memorize_name(ident);
                    memorize = true;
                    Segment::Text(ident.to_string())
                }
            };

            segments.push(segment);
        }

        if segments.is_empty() {
            return Err(Error::UncorrectMangledSymbol);
        }

        Ok(QualifiedName { segments })
    })
}

/// Nested scope, either a numbered block or a whole symbol the name is local to.
///
/// ```text
/// <nested> = ? <symbol>              # `symbol'
///          | <number>                # `number'
///          | <number> ?? <symbol>    # `symbol'::`number'
/// ```
fn nested(ctx: &mut Context) -> Result<Segment> {
    let (number, is_nested) = if ctx.eat(b'?') {
        (None, true)
    } else {
        let number = ctx.number()?;
        (Some(number), ctx.eat_slice(b"??"))
    };

    let symbol = if is_nested {
        Some(mangled_name(ctx, false)?.to_string())
    } else {
        None
    };

    let text = match (&symbol, number) {
        (Some(symbol), Some(number)) => format!("`{symbol}'::`{number}'"),
        (Some(symbol), None) => format!("`{symbol}'"),
        (None, Some(number)) => format!("`{number}'"),
        (None, None) => String::new(),
    };

    if symbol.is_some() {
        ctx.backrefs.memorize_name(&text);
    }

    Ok(Segment::Text(text))
}

/// Parses a template, everything after the leading `?$`.
///
/// Template arguments get their own table of memorized names, the memorized types are shared
/// with the rest of the symbol.
pub(super) fn template(ctx: &mut Context, memorize: bool) -> Result<Segment> {
    ctx.descent(|ctx| {
        let mut names = Vec::new();
        let name = if ctx.peek() == Some(b'?') {
            special_name(ctx, memorize)?
        } else {
            let ident = ctx.ident()?;
            names.push(ident.to_string());
            Segment::Text(ident.to_string())
        };

        let outer = std::mem::replace(&mut ctx.backrefs.names, names);
        let args = template_args(ctx);
        ctx.backrefs.names = outer;
        let args = args?;

        let segment = match name {
            Segment::Conversion { .. } => Segment::Conversion {
                template_args: Some(args),
            },
            name => Segment::Text(format!("{name}{args}")),
        };

        if memorize {
            ctx.backrefs.memorize_name(&segment.to_string());
        }

        Ok(segment)
    })
}

fn template_args(ctx: &mut Context) -> Result<String> {
    let mut args = String::from("<");
    let mut first = true;

    loop {
        match ctx.peek() {
            Some(b'@') => {
                ctx.advance(1);
                break;
            }
            Some(b'?') => {}
            Some(b'$') if ctx.peek_at(1) != Some(b'$') => {}
            Some(_) => {
                let tipe = types::parse(ctx)?.to_string();
                push_template_arg(&mut args, &mut first, &tipe);
                continue;
            }
            None => return Err(Error::UncorrectMangledSymbol),
        }

        let arg = template_param(ctx)?;
        push_template_arg(&mut args, &mut first, &arg);
    }

    args.push('>');
    Ok(args)
}

fn push_template_arg(args: &mut String, first: &mut bool, arg: &str) {
    if arg.is_empty() {
        return;
    }

    if !*first {
        args.push_str(", ");
    }

    args.push_str(arg);
    *first = false;
}

/// Non-type template parameters.
///
/// ```text
/// <template-param> = ? <number>                       # anonymous parameter
///                  | $0 <number>                      # integer
///                  | $1 ? <symbol>                    # address of symbol
///                  | $2 <number> <number>             # real value, mantissa and exponent
///                  | $D <number>                      # anonymous parameter
///                  | $F <number> <number>             # {a, b}
///                  | $G <number> <number> <number>    # {a, b, c}
///                  | $H <number>                      # unsigned integer
///                  | $I <number> <number>             # unsigned {a, b}
///                  | $J <number> <number> <number>    # unsigned {a, b, c}
///                  | $Q <number>                      # anonymous non-type parameter
///                  | $S                               # empty parameter pack
/// ```
fn template_param(ctx: &mut Context) -> Result<String> {
    if ctx.eat(b'?') {
        return Ok(format!("template-parameter-{}", ctx.number()?));
    }

    ctx.expect(b'$', Error::UncorrectMangledSymbol)?;

    let param = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'0' => ctx.number()?.signed().to_string(),
        b'1' => {
            ctx.expect(b'?', Error::UncorrectMangledSymbol)?;
            format!("&{}", mangled_name(ctx, true)?)
        }
        b'2' => {
            let mantissa = ctx.number()?;
            let exponent = ctx.number()?;
            format!("{mantissa}E{}", exponent.signed())
        }
        b'D' => format!("template-parameter-{}", ctx.number()?),
        b'F' => {
            let (a, b) = (ctx.number()?, ctx.number()?);
            format!("{{{}, {}}}", a.signed(), b.signed())
        }
        b'G' => {
            let (a, b, c) = (ctx.number()?, ctx.number()?, ctx.number()?);
            format!("{{{}, {}, {}}}", a.signed(), b.signed(), c.signed())
        }
        b'H' => ctx.number()?.to_string(),
        b'I' => {
            let (a, b) = (ctx.number()?, ctx.number()?);
            format!("{{{a}, {b}}}")
        }
        b'J' => {
            let (a, b, c) = (ctx.number()?, ctx.number()?, ctx.number()?);
            format!("{{{a}, {b}, {c}}}")
        }
        b'Q' => format!("non-type-template-parameter-{}", ctx.number()?),
        b'S' => String::new(),
        _ => return Err(Error::UnsupportedTypeCode),
    };

    Ok(param)
}

/// Operator and compiler generated names, everything starting with a `?`.
fn special_name(ctx: &mut Context, memorize: bool) -> Result<Segment> {
    ctx.advance(1);

    let name = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'0' => "constructor",
        b'1' => "~destructor",
        b'2' => "operator new",
        b'3' => "operator delete",
        b'4' => "operator=",
        b'5' => "operator>>",
        b'6' => "operator<<",
        b'7' => "operator!",
        b'8' => "operator==",
        b'9' => "operator!=",
        b'A' => "operator[]",
        b'B' => return Ok(Segment::Conversion { template_args: None }),
        b'C' => "operator->",
        b'D' => "operator*",
        b'E' => "operator++",
        b'F' => "operator--",
        b'G' => "operator-",
        b'H' => "operator+",
        b'I' => "operator&",
        b'J' => "operator->*",
        b'K' => "operator/",
        b'L' => "operator%",
        b'M' => "operator<",
        b'N' => "operator<=",
        b'O' => "operator>",
        b'P' => "operator>=",
        b'Q' => "operator,",
        b'R' => "operator()",
        b'S' => "operator~",
        b'T' => "operator^",
        b'U' => "operator|",
        b'V' => "operator&&",
        b'W' => "operator||",
        b'X' => "operator*=",
        b'Y' => "operator+=",
        b'Z' => "operator-=",
        b'$' => return template(ctx, memorize),
        b'_' => return underscore_name(ctx),
        _ => return Err(Error::UncorrectTypeCode),
    };

    Ok(Segment::Text(name.to_string()))
}

/// Special names starting with `?_`.
fn underscore_name(ctx: &mut Context) -> Result<Segment> {
    let name = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'0' => "operator/=",
        b'1' => "operator%=",
        b'2' => "operator>>=",
        b'3' => "operator<<=",
        b'4' => "operator&=",
        b'5' => "operator|=",
        b'6' => "operator^=",
        b'7' => "vftable",
        b'8' => "vbtable",
        b'9' => "vcall",
        b'A' => "typeof",
        b'B' => "local_static_guard",
        b'C' => return literal::parse(ctx).map(Segment::StringLiteral),
        b'D' => "vbase_dtor",
        b'E' => "vector_dtor",
        b'F' => "default_ctor_closure",
        b'G' => "scalar_dtor",
        b'H' => "vector_ctor_iter",
        b'I' => "vector_dtor_iter",
        b'J' => "vector_vbase_ctor_iter",
        b'K' => "virtual_displacement_map",
        b'L' => "eh_vector_ctor_iter",
        b'M' => "eh_vector_dtor_iter",
        b'N' => "eh_vector_vbase_ctor_iter",
        b'O' => "copy_ctor_closure",
        b'R' => return rtti(ctx).map(Segment::Text),
        b'S' => "local_vftable",
        b'T' => "local_vftable_ctor_closure",
        b'U' => "operator new[]",
        b'V' => "operator delete[]",
        b'X' => "placement_new_closure",
        b'Y' => "placement_delete_closure",
        b'_' => return double_underscore_name(ctx),
        _ => return Err(Error::UncorrectTypeCode),
    };

    Ok(Segment::Text(name.to_string()))
}

/// Special names starting with `?__`.
fn double_underscore_name(ctx: &mut Context) -> Result<Segment> {
    let name = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'A' => "managed_vector_ctor_iter",
        b'B' => "managed_vector_dtor_iter",
        b'C' => "eh_vector_copy_ctor_iter",
        b'D' => "eh_vector_vbase_copy_ctor_iter",
        b'E' => {
            let name = ctx.ident()?;
            return Ok(Segment::Text(format!("`dynamic initializer for '{name}''")));
        }
        b'F' => {
            let name = ctx.ident()?;
            return Ok(Segment::Text(format!("`dynamic atexit destructor for '{name}''")));
        }
        b'G' => "vector_copy_ctor_iter",
        b'H' => "vector_vbase_copy_ctor_iter",
        b'I' => "managed_vector_copy_ctor_iter",
        b'J' => "local_static_thread_guard",
        b'K' => "user_defined_literal_op",
        _ => return Err(Error::UncorrectTypeCode),
    };

    Ok(Segment::Text(name.to_string()))
}

/// RTTI descriptors.
///
/// ```text
/// <rtti> = 0 <any> <storage-class> <type>                  # type descriptor
///        | 1 <number> <number> <number> <number>           # base class descriptor
///        | 2                                               # base class array
///        | 3                                               # class hierarchy descriptor
///        | 4                                               # complete object locator
/// ```
fn rtti(ctx: &mut Context) -> Result<String> {
    let descriptor = match ctx.take().ok_or(Error::UncorrectMangledSymbol)? {
        b'0' => {
            ctx.take().ok_or(Error::UncorrectMangledSymbol)?;
            let storage = ctx
                .take()
                .ok_or(Error::UncorrectMangledSymbol)
                .and_then(storage_class)?;
            let tipe = types::parse(ctx)?;
            match storage {
                Some(storage) => format!("{tipe} {storage} `RTTI Type Descriptor'"),
                None => format!("{tipe} `RTTI Type Descriptor'"),
            }
        }
        b'1' => {
            let (a, b) = (ctx.number()?, ctx.number()?);
            let (c, d) = (ctx.number()?, ctx.number()?);
            format!("`RTTI Base Class Descriptor at ({a},{b},{c},{d})'")
        }
        b'2' => "`RTTI Base Class Array'".to_string(),
        b'3' => "`RTTI Class Hierarchy Descriptor'".to_string(),
        b'4' => "`RTTI Complete Object Locator'".to_string(),
        _ => return Err(Error::UncorrectTypeCode),
    };

    Ok(descriptor)
}
