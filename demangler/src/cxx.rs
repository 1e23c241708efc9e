//! C++ symbols mangled by GCC or Clang.
//!
//! Itanium (v3) symbols are handed to [`cpp_demangle`], anything else or anything it rejects
//! is tried as a GNU v2 symbol, first with the full grammar and then with the legacy one.

use cpp_demangle::{DemangleOptions, Symbol};

use crate::{gnu_v2, simplify, Options};

/// Prefixes added to imported symbols by linkers and disassemblers.
const STUB_PREFIXES: &[&str] = &["__symbol_stub1_", "reloc.", "sym.imp.", "imp."];

/// Symbol versions appended by the GNU toolchain.
const VERSION_SUFFIXES: &[&str] = &["@@CXXABI", "@GLIBCXX"];

pub fn demangle(s: &str, opts: Options) -> Option<String> {
    let symbol = strip(s);
    if symbol.is_empty() {
        return None;
    }

    let demangled = itanium(symbol, opts)
        .or_else(|| gnu_v2::demangle(symbol, opts))
        .or_else(|| gnu_v2::legacy::demangle(symbol, opts))?;

    if opts.contains(Options::SIMPLIFY) {
        return Some(simplify(&demangled).into_owned());
    }

    Some(demangled)
}

/// Removes import stub prefixes and symbol versions.
fn strip(s: &str) -> &str {
    let mut s = s.trim();

    if let Some(prefix) = STUB_PREFIXES.iter().find(|prefix| s.starts_with(*prefix)) {
        s = &s[prefix.len()..];
    }

    // mach-o symbols carry an extra underscore
    if s.starts_with("__Z") {
        s = &s[1..];
    }

    for suffix in VERSION_SUFFIXES {
        if let Some(idx) = s.find(suffix) {
            let idx = if s[..idx].ends_with('@') { idx - 1 } else { idx };
            s = &s[..idx];
        }
    }

    s
}

fn itanium(s: &str, opts: Options) -> Option<String> {
    if !s.starts_with("_Z") {
        return None;
    }

    let mut options = DemangleOptions::new();
    if !opts.is_empty() && !opts.contains(Options::PARAMS) {
        options = options.no_params();
    }

    let demangled = Symbol::new(s).map_err(|err| err.to_string()).and_then(|symbol| {
        symbol.demangle(&options).map_err(|err| err.to_string())
    });

    match demangled {
        Ok(demangled) => Some(demangled),
        Err(err) => {
            log::trace!("itanium: rejected '{s}': {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripping() {
        assert_eq!(strip("sym.imp._ZN3foo3barEv"), "_ZN3foo3barEv");
        assert_eq!(strip("imp.foo__1Ai"), "foo__1Ai");
        assert_eq!(strip("reloc._Z3fooi"), "_Z3fooi");
        assert_eq!(strip("__symbol_stub1__Z3fooi"), "_Z3fooi");
        assert_eq!(strip("__ZN3foo3barEv"), "_ZN3foo3barEv");
        assert_eq!(strip("_ZSt9terminatev@@GLIBCXX_3.4"), "_ZSt9terminatev");
        assert_eq!(
            strip("_ZTVN10__cxxabiv117__class_type_infoE@@CXXABI_1.3"),
            "_ZTVN10__cxxabiv117__class_type_infoE"
        );
        assert_eq!(strip("_ZSt4cout@GLIBCXX_3.4"), "_ZSt4cout");
    }

    #[test]
    fn itanium_symbols() {
        assert_eq!(demangle("_Z3fooi", Options::BASE).as_deref(), Some("foo(int)"));
        assert_eq!(
            demangle("_ZN3foo3barEv", Options::BASE).as_deref(),
            Some("foo::bar()")
        );
        assert_eq!(
            demangle("sym.imp._ZN3foo3barEv", Options::BASE).as_deref(),
            Some("foo::bar()")
        );
        assert_eq!(demangle("__Z3fooi", Options::BASE).as_deref(), Some("foo(int)"));
    }

    #[test]
    fn parameters_are_optional() {
        assert_eq!(demangle("_Z3fooi", Options::SIMPLIFY).as_deref(), Some("foo"));
        assert_eq!(demangle("_Z3fooi", Options::ALL).as_deref(), Some("foo(int)"));
    }

    #[test]
    fn simplified() {
        assert_eq!(
            demangle("_Z3fooxy", Options::BASE).as_deref(),
            Some("foo(long long, unsigned long long)")
        );
        assert_eq!(demangle("_Z3fooxy", Options::ALL).as_deref(), Some("foo(int64_t, uint64_t)"));
        assert_eq!(demangle("foo__Fx", Options::SIMPLIFY).as_deref(), Some("foo(int64_t)"));
    }

    #[test]
    fn gnu_v2_fallback() {
        assert_eq!(demangle("foo__1Ai", Options::BASE).as_deref(), Some("A::foo(int)"));
        assert_eq!(
            demangle("_vt$foo$bar", Options::BASE).as_deref(),
            Some("foo::bar virtual table")
        );
        assert_eq!(
            demangle("imp.__pl__3fooRC3foo", Options::BASE).as_deref(),
            Some("foo::operator+(const foo &)")
        );
    }

    #[test]
    fn legacy_fallback() {
        // the full grammar ends names at a `.`
        assert_eq!(gnu_v2::demangle("foo.part__1Ai", Options::BASE), None);
        assert_eq!(
            demangle("foo.part__1Ai", Options::BASE).as_deref(),
            Some("A::foo.part(int)")
        );
    }

    #[test]
    fn rejected() {
        assert_eq!(demangle("", Options::BASE), None);
        assert_eq!(demangle("sym.imp.", Options::BASE), None);
        assert_eq!(demangle("_ZNSt2147483648ios_base4InitD1Ev", Options::BASE), None);
        assert_eq!(demangle("main", Options::BASE), None);
    }
}
