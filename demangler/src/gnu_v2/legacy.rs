//! Reduced GNU v2 demangler, used as a last resort for symbols the full grammar rejects.
//!
//! It understands plain functions, methods, static members, constructors, destructors and
//! operators, but no templates, thunks or virtual tables.

use std::ops::{Deref, DerefMut};

use super::param::{join, Param};
use super::{MAX_REPETITIONS, OPERATORS};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::Options;

pub fn demangle(s: &str, opts: Options) -> Option<String> {
    match try_demangle(s, opts) {
        Ok(demangled) => Some(demangled),
        Err(err) => {
            log::trace!("gnu v2 (legacy): rejected '{s}': {err:?}");
            None
        }
    }
}

pub fn try_demangle(s: &str, _opts: Options) -> Result<String> {
    let mut dem = Legacy::new(s);
    dem.public_name()?;

    if !dem.is_empty() {
        return Err(Error::UncorrectMangledSymbol);
    }

    let mut demangled = dem.name;
    if dem.has_params {
        demangled.push('(');
        demangled += &join(&dem.params);
        demangled.push(')');
    }

    Ok(demangled)
}

#[derive(Debug)]
struct Legacy<'a> {
    cursor: Cursor<'a>,

    /// Name including its qualifiers, `A::B::foo`.
    name: String,
    /// Class the symbol belongs to, referenced by `T0`.
    class: Option<String>,
    params: Vec<Param>,
    has_params: bool,

    is_ctor: bool,
    is_dtor: bool,
    is_operator: bool,
}

impl<'a> Deref for Legacy<'a> {
    type Target = Cursor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl DerefMut for Legacy<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}

impl<'a> Legacy<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            cursor: Cursor::new(s),
            name: String::new(),
            class: None,
            params: Vec::new(),
            has_params: false,
            is_ctor: false,
            is_dtor: false,
            is_operator: false,
        }
    }

    fn public_name(&mut self) -> Result<()> {
        if self.peek() == Some(b'_') {
            let start = self.position();
            self.advance(1);

            // static member, `_<qualifiers>$<name>`
            if self.qualifiers_list().is_ok()
                && matches!(self.peek(), Some(b'$' | b'.'))
                && self.advance(1)
                && self.name().is_ok()
            {
                return Ok(());
            }

            self.seek(start);
            self.name.clear();
            self.class = None;
        }

        self.name()?;

        if self.remaining().len() < 3 {
            return Err(Error::UncorrectMangledSymbol);
        }

        let separated = if self.is_ctor || self.is_dtor || self.is_operator {
            self.eat(b'_')
        } else {
            self.eat_slice(b"__")
        };

        if !separated {
            return Err(Error::UncorrectMangledSymbol);
        }

        match self.peek() {
            Some(b'F') => {
                self.advance(1);
                self.func_params()
            }
            Some(b'H') => Err(Error::UnsupportedTypeCode),
            _ => {
                self.qualifiers_list()?;
                self.func_params()
            }
        }
    }

    fn name(&mut self) -> Result<()> {
        if self.peek() == Some(b'_') {
            let start = self.position();
            self.advance(1);

            match self.peek() {
                Some(b'$' | b'.') => {
                    self.advance(1);
                    self.is_dtor = true;
                    return Ok(());
                }
                Some(b'_') => {
                    let rest = self.remaining();
                    if rest.starts_with(b"_op") && rest.get(3).map_or(false, u8::is_ascii_digit) {
                        // conversion operator, `__op<len><type>`
                        self.advance(3);
                        let len = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
                        let tipe = self.take_str(len).ok_or(Error::UncorrectMangledSymbol)?;
                        self.name += "operator ";
                        self.name += tipe;
                        return Ok(());
                    }

                    if let Some(&(mangled, operator)) =
                        OPERATORS.iter().find(|(mangled, _)| rest.starts_with(mangled.as_bytes()))
                    {
                        self.advance(mangled.len());
                        self.name += operator;
                        self.is_operator = true;
                        return Ok(());
                    }

                    self.is_ctor = true;
                    return Ok(());
                }
                _ => {
                    self.seek(start);
                }
            }
        }

        // names run up to `__` followed by a qualifier or parameter list
        let rest = self.remaining();
        let mut len = 1;
        while len < rest.len() {
            let tail = &rest[len..];
            if tail.starts_with(b"__")
                && matches!(tail.get(2), Some(b'F' | b'Q' | b'H' | b'0'..=b'9'))
            {
                break;
            }

            len += 1;
        }

        let name = self.take_str(len).ok_or(Error::UncorrectMangledSymbol)?;
        self.name += name;
        Ok(())
    }

    fn qualifiers_list(&mut self) -> Result<()> {
        let count = if self.eat(b'Q') {
            if self.eat(b'_') {
                let count = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
                if !self.eat(b'_') {
                    return Err(Error::UncorrectMangledSymbol);
                }
                count
            } else {
                match self.take() {
                    Some(digit @ b'0'..=b'9') => (digit - b'0') as usize,
                    _ => return Err(Error::UncorrectMangledSymbol),
                }
            }
        } else {
            1
        };

        if count == 0 {
            return Err(Error::UncorrectMangledSymbol);
        }

        let mut names = Vec::with_capacity(count.min(16));
        for _ in 0..count {
            names.push(self.custom_type_name()?);
        }

        let mut qualified = String::new();
        for name in &names {
            qualified += name;
            qualified += "::";
        }

        if let Some(last) = names.last() {
            if self.is_ctor {
                qualified += last;
            } else if self.is_dtor {
                qualified.push('~');
                qualified += last;
            }
        }

        self.class = Some(names.join("::"));
        self.name.insert_str(0, &qualified);
        self.is_ctor = false;
        self.is_dtor = false;

        Ok(())
    }

    fn custom_type_name(&mut self) -> Result<&'a str> {
        match self.decimal() {
            Some(len) if len > 0 => self.take_str(len).ok_or(Error::UncorrectMangledSymbol),
            _ => Err(Error::UncorrectMangledSymbol),
        }
    }

    /// Builtin or length prefixed type name.
    fn terminal(&mut self) -> Result<String> {
        let byte = self.peek().ok_or(Error::UncorrectTypeCode)?;

        let name = match byte {
            b'b' => "bool",
            b'c' => "char",
            b'd' => "double",
            b'e' => "...",
            b'f' => "float",
            b'i' => "int",
            b'l' => "long",
            b'r' => "long double",
            b's' => "short",
            b'v' => "void",
            b'w' => "wchar_t",
            b'x' => "long long",
            b'G' => {
                self.advance(1);
                return self.custom_type_name().map(str::to_string);
            }
            b'0'..=b'9' => return self.custom_type_name().map(str::to_string),
            b'U' | b'S' | b'J' => {
                let name = match (byte, self.peek_at(1)) {
                    (b'U', Some(b'c')) => "unsigned char",
                    (b'U', Some(b's')) => "unsigned short",
                    (b'U', Some(b'i')) => "unsigned int",
                    (b'U', Some(b'l')) => "unsigned long",
                    (b'U', Some(b'x')) => "unsigned long long",
                    (b'S', Some(b'c')) => "signed char",
                    (b'J', Some(b'f')) => "__complex__ float",
                    (b'J', Some(b'd')) => "__complex__ double",
                    _ => return Err(Error::UncorrectTypeCode),
                };

                self.advance(2);
                return Ok(name.to_string());
            }
            _ => return Err(Error::UncorrectTypeCode),
        };

        self.advance(1);
        Ok(name.to_string())
    }

    /// What follows a `P` or `R`.
    fn pointee(&mut self, mut param: Param) -> Result<Param> {
        if self.eat(b'C') {
            param.qualify("const");
            if self.eat(b'V') {
                param.qualify("volatile");
            }
        } else if self.eat(b'V') {
            param.qualify("volatile");
            param.name = self.custom_type_name()?.to_string();
            return Ok(param);
        }

        param.name = self.terminal()?;
        Ok(param)
    }

    fn backref(&mut self, reps: usize) -> Result<()> {
        let idx = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
        self.eat(b'_');

        let param = match idx {
            0 => self.class.clone().map(Param::named),
            idx => self.params.get(idx - 1).cloned(),
        };

        let param = param.ok_or(Error::BackrefOutOfRange)?;
        for _ in 0..reps {
            self.params.push(param.clone());
        }

        Ok(())
    }

    fn func_params(&mut self) -> Result<()> {
        self.has_params = true;

        while let Some(byte) = self.peek() {
            let mut param = Param::default();

            match byte {
                b'R' => {
                    self.advance(1);
                    param.suffix.push('&');
                    if self.eat(b'P') {
                        param.suffix.insert(0, '*');
                    }
                    let param = self.pointee(param)?;
                    self.params.push(param);
                }
                b'P' => {
                    self.advance(1);
                    param.suffix.push('*');
                    let param = self.pointee(param)?;
                    self.params.push(param);
                }
                b'T' => {
                    self.advance(1);
                    self.backref(1)?;
                }
                b'N' => {
                    self.advance(1);
                    let reps = match self.take() {
                        Some(digit @ b'1'..=b'9') => (digit - b'0') as usize,
                        _ => return Err(Error::UncorrectMangledSymbol),
                    };
                    self.backref(reps.min(MAX_REPETITIONS))?;
                }
                _ => {
                    param.name = self.terminal()?;
                    self.params.push(param);
                }
            }
        }

        Ok(())
    }
}
