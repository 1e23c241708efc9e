//! Parameter types shared by both GNU v2 engines.

use std::fmt;

/// A rendered parameter type, `const char *` is stored as prefix `const`, name `char` and
/// suffix `*`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct Param {
    pub name: String,
    pub prefix: String,
    pub suffix: String,

    /// Set for pointers to functions, their declarator goes inside the return type and the
    /// suffix holds any indirection past the first `*`.
    pub function: Option<Box<FunctionPointer>>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct FunctionPointer {
    pub ret: Param,
    /// Rendered argument list including the parentheses.
    pub args: String,
}

impl Param {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn function(ret: Param, args: String) -> Self {
        Self {
            function: Some(Box::new(FunctionPointer { ret, args })),
            ..Self::default()
        }
    }

    /// Qualify the type with `const` or `volatile`.
    pub fn qualify(&mut self, qualifier: &str) {
        if !self.prefix.is_empty() {
            self.prefix.push(' ');
        }

        self.prefix += qualifier;
    }

    pub fn is_variadic(&self) -> bool {
        self.function.is_none() && self.name == "..."
    }

    /// Render the parameter around a declarator.
    ///
    /// A pointer to a function returning a pointer to a function renders as
    /// `int (*(*)(char))(long)`.
    pub fn render(&self, declarator: &str) -> String {
        if let Some(func) = &self.function {
            return func.ret.render(&format!("(*{}{declarator}){}", self.suffix, func.args));
        }

        let mut s = String::new();
        if !self.prefix.is_empty() {
            s += &self.prefix;
            s.push(' ');
        }

        s += &self.name;
        if !self.suffix.is_empty() {
            s.push(' ');
            s += &self.suffix;
        }

        if !declarator.is_empty() {
            s.push(' ');
            s += declarator;
        }

        s
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// Join parameters into an argument list, an empty list is `void`.
///
/// Varargs follow the previous parameter with a bare comma: `float,...`.
pub(super) fn join(params: &[Param]) -> String {
    if params.is_empty() {
        return "void".to_string();
    }

    let mut s = String::new();
    for (idx, param) in params.iter().enumerate() {
        if idx != 0 {
            s += if param.is_variadic() { "," } else { ", " };
        }

        s += &param.to_string();
    }

    s
}
