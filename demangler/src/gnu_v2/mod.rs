//! GNU v2 (pre GCC 3) C++ symbol demangler.
//!
//! ```text
//! <public-name> = _ <qualifiers> <term> <name>            # static member
//!               | _vt <term> {<name> [<term>]}             # virtual table
//!               | __thunk_ <delta> _ <public-name>         # virtual function thunk
//!               | __t [i | f] <type>                       # type_info node or function
//!               | _GLOBAL_ <sep> [I | D] <sep> <public-name>
//!               | <name> __ F {<type>}                     # free function
//!               | <name> __ H <template-function>
//!               | <name> __ C <qualifiers> {<type>}        # const method
//!               | <name> __ <qualifiers> {<type>}          # method
//!
//! <qualifiers>  = Q <digit> {<class-name>}
//!               | Q _ <number> _ {<class-name>}
//!               | <class-name>
//!
//! <class-name>  = <number> <ident>
//!               | t <number> <ident> <number> {<template-param>}
//!
//! <term>        = $ | .
//! ```
//!
//! Constructors, destructors and operators are encoded in the name itself, e.g. `__ls` for
//! `operator<<` and `_$` for a destructor.

use std::ops::{Deref, DerefMut};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::Options;

pub mod legacy;
mod param;

use param::{join, Param};

/// Max recursion depth.
const MAX_DEPTH: usize = 256;

/// Most copies of a parameter `N` may append.
const MAX_REPETITIONS: usize = 255;

/// Mangled operator names, longer ones first so `_aml_` isn't read as `_ml_`.
const OPERATORS: &[(&str, &str)] = &[
    ("_aad_", "operator&="),
    ("_adv_", "operator/="),
    ("_aer_", "operator^="),
    ("_als_", "operator<<="),
    ("_aml_", "operator*="),
    ("_amd_", "operator%="),
    ("_ami_", "operator-="),
    ("_aor_", "operator|="),
    ("_apl_", "operator+="),
    ("_ars_", "operator>>="),
    ("_aa_", "operator&&"),
    ("_ad_", "operator&"),
    ("_as_", "operator="),
    ("_cl_", "operator()"),
    ("_co_", "operator~"),
    ("_cm_", "operator,"),
    ("_dl_", "operator delete"),
    ("_dv_", "operator/"),
    ("_eq_", "operator=="),
    ("_er_", "operator^"),
    ("_ge_", "operator>="),
    ("_gt_", "operator>"),
    ("_le_", "operator<="),
    ("_ls_", "operator<<"),
    ("_lt_", "operator<"),
    ("_md_", "operator%"),
    ("_mi_", "operator-"),
    ("_ml_", "operator*"),
    ("_mm_", "operator--"),
    ("_ne_", "operator!="),
    ("_nt_", "operator!"),
    ("_nw_", "operator new"),
    ("_oo_", "operator||"),
    ("_or_", "operator|"),
    ("_pl_", "operator+"),
    ("_pp_", "operator++"),
    ("_rf_", "operator->"),
    ("_rm_", "operator->*"),
    ("_rs_", "operator>>"),
    ("_vc_", "operator[]"),
    ("_vd_", "operator delete[]"),
    ("_vn_", "operator new[]"),
];

/// Demangle a GNU v2 symbol, yielding `None` if it's malformed.
pub fn demangle(s: &str, opts: Options) -> Option<String> {
    match try_demangle(s, opts) {
        Ok(demangled) => Some(demangled),
        Err(err) => {
            log::trace!("gnu v2: rejected '{s}': {err:?}");
            None
        }
    }
}

/// Demangle a GNU v2 symbol, reporting why it couldn't be demangled.
pub fn try_demangle(s: &str, _opts: Options) -> Result<String> {
    let mut dem = Demangler::new(s);
    dem.public_name()?;

    if !dem.is_empty() {
        return Err(Error::UncorrectMangledSymbol);
    }

    Ok(dem.render())
}

#[derive(Debug)]
struct Demangler<'a> {
    cursor: Cursor<'a>,

    /// Classes and namespaces the symbol lives in, outermost first.
    qualifiers: Vec<String>,
    base_name: String,
    params: Vec<Param>,
    /// Whether a parameter list is rendered, an empty one renders as `(void)`.
    has_params: bool,

    /// Rendered before the name, a return type or a description like `global constructors`.
    prefix: String,
    /// Rendered after everything else, like `const` or `virtual table`.
    suffix: String,
    /// Target type of a conversion operator.
    conversion: String,
    operator: Option<&'static str>,

    has_global_name: bool,
    is_ctor: bool,
    is_dtor: bool,

    depth: usize,
}

impl<'a> Deref for Demangler<'a> {
    type Target = Cursor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl DerefMut for Demangler<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}

/// Which decoration the parameter parser is accumulating.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Decoration {
    Bare,
    Reference,
    Pointer,
    Const,
    Volatile,
    /// Only a plain type may follow.
    Named,
}

impl<'a> Demangler<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            cursor: Cursor::new(s),
            qualifiers: Vec::new(),
            base_name: String::new(),
            params: Vec::new(),
            has_params: false,
            prefix: String::new(),
            suffix: String::new(),
            conversion: String::new(),
            operator: None,
            has_global_name: false,
            is_ctor: false,
            is_dtor: false,
            depth: 0,
        }
    }

    fn descent<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::RecursionLimit);
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn is_xtor(&self) -> bool {
        self.is_ctor || self.is_dtor || self.operator.is_some() || !self.conversion.is_empty()
    }

    fn is_term(&self) -> bool {
        matches!(self.peek(), Some(b'$' | b'.'))
    }

    fn render(&self) -> String {
        let mut s = String::new();

        if !self.prefix.is_empty() {
            s += &self.prefix;
            s.push(' ');
        }

        match self.qualifiers.last() {
            Some(last) => {
                for qualifier in &self.qualifiers {
                    s += qualifier;
                    s += "::";
                }

                // constructors are named after the class without its template arguments
                let class = last.split('<').next().unwrap_or_default();
                if self.is_ctor {
                    s += class;
                } else if self.is_dtor {
                    s.push('~');
                    s += class;
                } else if !self.is_xtor() {
                    s += &self.base_name;
                }
            }
            None => s += &self.base_name,
        }

        if let Some(operator) = self.operator {
            s += operator;
        } else if !self.conversion.is_empty() {
            s += "operator ";
            s += &self.conversion;
        }

        if self.has_params {
            s.push('(');
            s += &join(&self.params);
            s.push(')');
        }

        if !self.suffix.is_empty() {
            s.push(' ');
            s += &self.suffix;
        }

        s
    }

    fn public_name(&mut self) -> Result<()> {
        if self.peek() == Some(b'_') {
            let start = self.position();
            self.advance(1);

            if self.remaining().len() >= 3
                && (self.remaining().starts_with(b"vt") || self.remaining().starts_with(b"_vt"))
            {
                if self.eat_slice(b"vt$") || self.eat_slice(b"vt.") || self.eat_slice(b"_vt_") {
                    self.suffix += "virtual table";
                    return self.virtual_table();
                }

                self.seek(start);
            } else if self.remaining().len() >= 8 && self.eat_slice(b"_thunk_") {
                let delta = self.take_until(b'_').ok_or(Error::UncorrectMangledSymbol)?;
                self.prefix = format!("virtual function thunk (delta:-{delta}) for");
            } else if self.remaining().len() >= 3 && self.remaining().starts_with(b"_t") {
                if self.type_info()? {
                    return Ok(());
                }

                self.seek(start);
            } else if self.eat_slice(b"GLOBAL_") || self.eat_slice(b"_GLOBAL_") {
                self.global_name()?;
            } else {
                let qualifiers = self.qualifiers.len();
                if self.qualifiers_list().is_ok() && self.is_term() {
                    // `_<qualifiers>$<member>`, the member is the rest of the symbol
                    self.advance(1);
                    let member = self.rest();
                    self.base_name += member;
                    let end = self.position() + self.remaining().len();
                    self.seek(end);
                    return Ok(());
                }

                self.qualifiers.truncate(qualifiers);
                self.seek(start);
            }
        }

        if !self.has_global_name {
            self.name()?;
        }

        let mut global_with_qualifiers = false;
        if self.is_xtor() {
            if !self.eat(b'_') {
                return Err(Error::UncorrectMangledSymbol);
            }
        } else if self.has_global_name {
            global_with_qualifiers = self.eat(b'_');
        } else if !self.eat_slice(b"__") {
            return Err(Error::UncorrectMangledSymbol);
        }

        if self.has_global_name {
            if global_with_qualifiers {
                self.qualifiers_list()?;
                if !self.is_term() {
                    return Err(Error::UncorrectMangledSymbol);
                }
                self.advance(1);
            }

            return self.name();
        }

        match self.peek() {
            Some(b'F') => {
                self.advance(1);
                self.func_params()
            }
            Some(b'H') => {
                self.advance(1);
                self.template_function()
            }
            Some(b'C') => {
                self.advance(1);
                self.suffix += "const";
                self.qualifiers_list()?;
                self.func_params()
            }
            _ => {
                self.qualifiers_list()?;
                self.func_params()
            }
        }
    }

    /// Names following `_vt$`, separated by terminators.
    fn virtual_table(&mut self) -> Result<()> {
        while !self.is_empty() {
            let start = self.position();

            if let Ok(names) = self.class_names(1) {
                self.base_name.extend(names);
            } else if self.name().is_err() || self.position() == start {
                break;
            }

            if self.is_term() {
                self.base_name += "::";
                self.advance(1);
            }
        }

        Ok(())
    }

    /// `__ti<type>` and `__tf<type>`, returning false if the symbol is something else.
    fn type_info(&mut self) -> Result<bool> {
        self.advance(2);

        let what = match self.take() {
            Some(b'i') => "type_info node",
            Some(b'f') => "type_info function",
            _ => return Ok(false),
        };

        let start = self.position();
        if let Ok(mut names) = self.class_names(1) {
            self.base_name = names.pop().unwrap_or_default();
            self.suffix += what;
            return Ok(true);
        }

        self.seek(start);
        let mut types = Vec::new();
        if self.param_type(&mut types).is_ok() && !types.is_empty() {
            self.base_name = types.swap_remove(0).name;
            self.suffix += what;
            return Ok(true);
        }

        Ok(false)
    }

    /// `_GLOBAL_$I$` and `_GLOBAL_$D$`, also separated by `.` or `_`.
    fn global_name(&mut self) -> Result<()> {
        if !matches!(self.take(), Some(b'$' | b'.' | b'_')) {
            return Err(Error::UncorrectMangledSymbol);
        }

        let keyed = match self.take() {
            Some(b'I') => "global constructors keyed to",
            Some(b'D') => "global destructors keyed to",
            _ => return Err(Error::UncorrectMangledSymbol),
        };
        self.prefix += keyed;

        if !matches!(self.take(), Some(b'$' | b'.' | b'_')) {
            return Err(Error::UncorrectMangledSymbol);
        }

        self.has_global_name = true;
        Ok(())
    }

    fn qualifier_count(&mut self) -> Result<usize> {
        match self.peek() {
            Some(b'Q') => {
                self.advance(1);

                let count = if self.eat(b'_') {
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
                };

                if count == 0 {
                    return Err(Error::UncorrectMangledSymbol);
                }

                Ok(count)
            }
            Some(b'0'..=b'9' | b't') => Ok(1),
            _ => Err(Error::UncorrectMangledSymbol),
        }
    }

    /// Parses a qualifier list into [`Self::qualifiers`], leaving everything untouched on
    /// failure.
    fn qualifiers_list(&mut self) -> Result<()> {
        let start = self.position();

        let names = self.qualifier_count().and_then(|count| self.class_names(count));
        match names {
            Ok(names) => {
                self.qualifiers.extend(names);
                Ok(())
            }
            Err(err) => {
                self.seek(start);
                Err(err)
            }
        }
    }

    fn class_names(&mut self, count: usize) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for _ in 0..count {
            let name = match self.peek() {
                Some(b't') => {
                    self.advance(1);
                    self.template_class()?
                }
                Some(b'0'..=b'9') => self.custom_type_name()?.to_string(),
                _ => return Err(Error::UncorrectMangledSymbol),
            };

            names.push(name);
        }

        Ok(names)
    }

    /// Length prefixed identifier.
    fn custom_type_name(&mut self) -> Result<&'a str> {
        let start = self.position();

        let name = match self.decimal() {
            Some(len) if len > 0 => self.take_str(len),
            _ => None,
        };

        name.ok_or_else(|| {
            self.seek(start);
            Error::UncorrectMangledSymbol
        })
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
                    if self.remaining().len() >= 4 && self.remaining().starts_with(b"_op") {
                        self.advance(3);

                        let mut params = Vec::new();
                        if self.param_type(&mut params).is_ok() && !params.is_empty() {
                            if self.eat(b'_') {
                                self.conversion = params.swap_remove(0).to_string();
                                return Ok(());
                            }

                            self.seek(start);
                            return self.plain_name();
                        }

                        self.seek(start + 1);
                    } else if let Some(&(mangled, operator)) = OPERATORS
                        .iter()
                        .find(|(mangled, _)| self.remaining().starts_with(mangled.as_bytes()))
                    {
                        self.advance(mangled.len());
                        self.operator = Some(operator);
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

        self.plain_name()
    }

    /// Identifier running up to the `__` that starts the qualifiers or parameters.
    fn plain_name(&mut self) -> Result<()> {
        match self.peek() {
            Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' => {}
            _ => return Err(Error::UncorrectMangledSymbol),
        }

        let rest = self.remaining();
        let mut len = 0;
        while let Some(&byte) = rest.get(len) {
            if byte == b'$' || byte == b'.' {
                break;
            }

            if byte == b'_' {
                let next = if self.has_global_name {
                    rest.get(len + 1)
                } else if rest.get(len + 1) == Some(&b'_') {
                    rest.get(len + 2)
                } else {
                    None
                };

                if let Some(b'C' | b'F' | b'H' | b'Q' | b't' | b'0'..=b'9') = next {
                    break;
                }
            }

            len += 1;
        }

        let name = self.take_str(len).ok_or(Error::UncorrectMangledSymbol)?;
        self.base_name += name;
        Ok(())
    }

    /// Parses as many parameters as possible.
    fn func_params(&mut self) -> Result<()> {
        self.has_params = true;

        let mut params = std::mem::take(&mut self.params);
        let result = self.param_list(&mut params);
        self.params = params;
        result
    }

    /// Parses parameters until one doesn't start with a type, parameters that are malformed
    /// halfway through are an error.
    fn param_list(&mut self, params: &mut Vec<Param>) -> Result<()> {
        while !self.is_empty() {
            let start = self.position();

            if let Err(err) = self.param_type(params) {
                if self.position() == start && err != Error::RecursionLimit {
                    break;
                }

                return Err(err);
            }
        }

        Ok(())
    }

    /// Parses a single parameter type, appending it to `params`.
    ///
    /// Back-references can append multiple parameters at once.
    fn param_type(&mut self, params: &mut Vec<Param>) -> Result<()> {
        self.descent(|this| this.decorated_type(params))
    }

    fn decorated_type(&mut self, params: &mut Vec<Param>) -> Result<()> {
        use Decoration::*;

        let mut param = Param::default();
        let (mut is_ref, mut is_ptr) = (false, false);
        let mut decoration = Bare;

        loop {
            let byte = self.peek().ok_or(Error::UncorrectTypeCode)?;

            match (decoration, byte) {
                (Bare, b'G') => {
                    self.advance(1);
                    decoration = Named;
                }
                (Bare | Reference, b'R') => {
                    self.advance(1);
                    param.suffix.push('&');
                    is_ref = true;
                    decoration = Reference;
                }
                (Bare | Reference | Pointer | Const, b'P') => {
                    self.advance(1);
                    param.suffix.insert(0, '*');
                    is_ptr = true;
                    decoration = Pointer;
                }
                (Pointer, b'A') => {
                    param.suffix = "(*)".to_string();
                    return self.array(param, params);
                }
                (Pointer, b'F') => {
                    self.advance(1);
                    // the innermost `*` is part of the function declarator
                    param.suffix.remove(0);
                    return self.function_pointer(param.suffix, params);
                }
                (Bare | Reference | Pointer, b'T') => {
                    self.advance(1);
                    return self.backref(1, is_ref, is_ptr, params);
                }
                (Bare, b'N') => {
                    self.advance(1);
                    let reps = self.repetitions()?;
                    return self.backref(reps, false, false, params);
                }
                (Bare | Reference | Pointer, b'C') => {
                    self.advance(1);
                    param.qualify("const");
                    decoration = Const;
                }
                (Bare | Reference | Pointer | Const, b'V') => {
                    self.advance(1);
                    param.qualify("volatile");
                    decoration = Volatile;
                }
                _ => {
                    param.name = self.plain_type()?;
                    params.push(param);
                    return Ok(());
                }
            }
        }
    }

    /// Builtin, length prefixed or qualified type.
    fn plain_type(&mut self) -> Result<String> {
        let builtin = |byte| {
            Some(match byte {
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
                _ => return None,
            })
        };

        let byte = self.peek().ok_or(Error::UncorrectTypeCode)?;
        if let Some(name) = builtin(byte) {
            self.advance(1);
            return Ok(name.to_string());
        }

        let name = match byte {
            b't' => {
                self.advance(1);
                return self.template_class();
            }
            b'0'..=b'9' => return self.custom_type_name().map(str::to_string),
            b'Q' => {
                let count = self.qualifier_count()?;
                return Ok(self.class_names(count)?.join("::"));
            }
            b'U' => match self.peek_at(1) {
                Some(b'c') => "unsigned char",
                Some(b's') => "unsigned short",
                Some(b'i') => "unsigned int",
                Some(b'l') => "unsigned long",
                Some(b'x') => "unsigned long long",
                _ => return Err(Error::UncorrectTypeCode),
            },
            b'S' => match self.peek_at(1) {
                Some(b'c') => "signed char",
                _ => return Err(Error::UncorrectTypeCode),
            },
            b'J' => match self.peek_at(1) {
                Some(b'f') => "__complex__ float",
                Some(b'd') => "__complex__ double",
                _ => return Err(Error::UncorrectTypeCode),
            },
            _ => return Err(Error::UncorrectTypeCode),
        };

        self.advance(2);
        Ok(name.to_string())
    }

    /// Pointer to an array, `A<size>_` repeated per dimension.
    fn array(&mut self, mut param: Param, params: &mut Vec<Param>) -> Result<()> {
        while self.eat(b'A') {
            let size = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
            let size = size.checked_add(1).ok_or(Error::Alloc)?;

            if !self.eat(b'_') {
                return Err(Error::UncorrectMangledSymbol);
            }

            param.suffix += &format!("[{size}]");
        }

        param.name = self.plain_type()?;
        params.push(param);
        Ok(())
    }

    /// ```text
    /// <function-pointer> = PF {<type>} [_ <return-type>]
    /// ```
    fn function_pointer(&mut self, suffix: String, params: &mut Vec<Param>) -> Result<()> {
        let mut args = Vec::new();
        self.param_list(&mut args)?;

        let ret = if self.eat(b'_') {
            let mut ret = Vec::new();
            self.param_type(&mut ret)?;
            ret.into_iter().next().ok_or(Error::UncorrectTypeCode)?
        } else {
            Param::named("void")
        };

        let mut func = Param::function(ret, format!("({})", join(&args)));
        func.suffix = suffix;
        params.push(func);
        Ok(())
    }

    /// Repetition count of `N<count><index>`, a count of more than one digit is followed by
    /// an underscore.
    fn repetitions(&mut self) -> Result<usize> {
        let digits = self.remaining().iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(Error::UncorrectMangledSymbol);
        }

        let reps = if self.peek_at(digits) == Some(b'_') {
            let reps = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
            self.advance(1);
            reps
        } else {
            self.take().map(|digit| (digit - b'0') as usize).unwrap_or_default()
        };

        if reps == 0 || reps > MAX_REPETITIONS {
            return Err(Error::UncorrectMangledSymbol);
        }

        if !matches!(self.peek(), Some(b'0'..=b'9')) {
            return Err(Error::UncorrectMangledSymbol);
        }

        Ok(reps)
    }

    /// Copies an earlier parameter `reps` times.
    ///
    /// When the symbol is qualified, index 0 is the class itself and the parameters count
    /// from 1.
    fn backref(
        &mut self,
        reps: usize,
        is_ref: bool,
        is_ptr: bool,
        params: &mut Vec<Param>,
    ) -> Result<()> {
        let idx = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
        self.eat(b'_');

        let referenced = if self.qualifiers.is_empty() {
            params.get(idx).cloned()
        } else if idx == 0 {
            Some(Param::named(self.qualifiers.join("::")))
        } else {
            params.get(idx - 1).cloned()
        };

        let referenced = referenced.ok_or(Error::BackrefOutOfRange)?;
        for _ in 0..reps {
            let mut param = referenced.clone();
            if is_ref {
                param.suffix.push('&');
            }
            if is_ptr {
                param.suffix.insert(0, '*');
            }
            params.push(param);
        }

        Ok(())
    }

    /// ```text
    /// <template-class> = <number> <ident> <number> {<template-param>}
    /// ```
    fn template_class(&mut self) -> Result<String> {
        self.descent(|this| {
            let name = this.custom_type_name()?;
            let count = this.decimal().ok_or(Error::UncorrectMangledSymbol)?;
            if count == 0 {
                return Err(Error::UncorrectMangledSymbol);
            }

            let mut params = Vec::new();
            for _ in 0..count {
                this.template_param(&mut params)?;
            }

            Ok(format!("{name}<{}>", join(&params)))
        })
    }

    /// ```text
    /// <template-param> = Z <type>         # type parameter
    ///                  | <type> <value>   # value of the given type
    /// ```
    fn template_param(&mut self, params: &mut Vec<Param>) -> Result<()> {
        if self.eat(b'Z') {
            return self.param_type(params);
        }

        self.param_type(params)?;

        let before = self.remaining();
        let value = self.signed_decimal().ok_or(Error::UncorrectMangledSymbol)?;
        let text = &before[..before.len() - self.remaining().len()];
        if text.is_empty() {
            return Err(Error::UncorrectMangledSymbol);
        }

        let param = params.last_mut().ok_or(Error::UncorrectTypeCode)?;
        let rendered = match param.name.as_str() {
            "bool" if param.function.is_none() => (if value != 0 { "true" } else { "false" }).to_string(),
            _ => String::from_utf8_lossy(text).into_owned(),
        };

        *param = Param::named(rendered);
        Ok(())
    }

    /// ```text
    /// <template-function> = <number> {<template-param>} _ [<qualifiers>]
    ///                       {<type> | X <index> 1} _ <return-type>
    /// ```
    fn template_function(&mut self) -> Result<()> {
        let count = self.decimal().ok_or(Error::UncorrectMangledSymbol)?;
        if count == 0 {
            return Err(Error::UncorrectMangledSymbol);
        }

        let mut tparams = Vec::new();
        for _ in 0..count {
            self.template_param(&mut tparams)?;
        }

        self.base_name += &format!("<{}>", join(&tparams));

        if !self.eat(b'_') {
            return Err(Error::UncorrectMangledSymbol);
        }

        let _ = self.qualifiers_list();
        self.has_params = true;

        let mut params = std::mem::take(&mut self.params);
        let result = self.template_function_params(&tparams, &mut params);
        self.params = params;
        result?;

        if !self.eat(b'_') {
            return Err(Error::UncorrectMangledSymbol);
        }

        let mut ret = Vec::new();
        self.param_type(&mut ret)?;
        let ret = ret.into_iter().next().ok_or(Error::UncorrectTypeCode)?;
        self.prefix += &ret.to_string();

        Ok(())
    }

    fn template_function_params(&mut self, tparams: &[Param], params: &mut Vec<Param>) -> Result<()> {
        while !matches!(self.peek(), None | Some(b'_')) {
            let start = self.position();

            match self.param_type(params) {
                Ok(()) => continue,
                Err(err) if self.position() != start || self.peek() != Some(b'X') => return Err(err),
                Err(_) => {}
            }

            // `X<index>1` refers to a template parameter
            self.advance(1);
            let rest = self.remaining();
            let len = rest.iter().position(|&b| b == b'X' || b == b'_').unwrap_or(rest.len());
            let digits = &rest[..len];

            let idx = match digits.split_last() {
                Some((b'1', idx)) if !idx.is_empty() && idx.iter().all(u8::is_ascii_digit) => {
                    std::str::from_utf8(idx)
                        .ok()
                        .and_then(|idx| idx.parse::<usize>().ok())
                        .ok_or(Error::UncorrectMangledSymbol)?
                }
                _ => return Err(Error::UncorrectMangledSymbol),
            };

            let param = tparams.get(idx).cloned().ok_or(Error::BackrefOutOfRange)?;
            params.push(param);
            self.advance(len);
        }

        Ok(())
    }
}
