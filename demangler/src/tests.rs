//! Behaviour shared by every scheme.
#![cfg(test)]

use super::*;

const MSVC: &[&str] = &[
    "?var_int@@3HA",
    "?arr2@@3PAY07HA",
    "?var_int_ptr@@3PEAHA",
    "??_R0?AVResultException@wil@@@8",
    "??_7NetworkUXViewProviderImpl@@6BIWeakReferenceSource@@@",
    "??0TEST_CLASS@@QEAA@H@Z",
    "?Fxix_i@@YAHP6AHH@ZH0@Z",
    "?xyz@?$abc@V?$def@H@@PAX@@YAXXZ",
    "?printf_like@@YAHPBDZZ",
];

const CXX: &[&str] = &[
    "_vt$foo$bar",
    "foo__1Ai",
    "foo__1Afe",
    "_3foo$varname",
    "__t6vector1Zii",
    "foo__FiT0",
    "foo__H1Zi_i_v",
    "_ZN3foo3barEi",
];

#[test]
fn deterministic() {
    for symbol in MSVC {
        let first = demangle(Language::Msvc, symbol, Options::BASE);
        assert!(first.is_some(), "'{symbol}' should demangle");
        assert_eq!(first, demangle(Language::Msvc, symbol, Options::BASE));
    }

    for symbol in CXX {
        let first = demangle(Language::Cxx, symbol, Options::BASE);
        assert!(first.is_some(), "'{symbol}' should demangle");
        assert_eq!(first, demangle(Language::Cxx, symbol, Options::BASE));
    }
}

#[test]
fn truncation_is_never_silently_accepted() {
    let corpus = MSVC
        .iter()
        .map(|s| (Language::Msvc, s))
        .chain(CXX.iter().map(|s| (Language::Cxx, s)));

    for (lang, symbol) in corpus {
        let full = demangle(lang, symbol, Options::BASE);

        for len in 0..symbol.len() {
            let prefix = &symbol[..len];

            // trailing whitespace is trimmed, so those prefixes are the same symbol
            if prefix.ends_with(' ') {
                continue;
            }

            assert_ne!(
                demangle(lang, prefix, Options::BASE),
                full,
                "'{prefix}' renders the same as '{symbol}'"
            );
        }
    }
}

#[test]
fn back_references_are_bounded() {
    assert_eq!(msvc::try_demangle("?f@@YAXPAH1@Z", Options::BASE), Err(Error::BackrefOutOfRange));
    assert_eq!(msvc::try_demangle("?f@3@YAXXZ", Options::BASE), Err(Error::BackrefOutOfRange));
    assert_eq!(gnu_v2::try_demangle("foo__FiT9", Options::BASE), Err(Error::BackrefOutOfRange));
    assert_eq!(
        gnu_v2::legacy::try_demangle("foo__FiT9", Options::BASE),
        Err(Error::BackrefOutOfRange)
    );
}

#[test]
fn tables_are_isolated() {
    // `0` refers to the first memorized type of the same symbol only
    let referencing = "?func@@YAHPAH0@Z";
    let expected = demangle(Language::Msvc, referencing, Options::BASE);
    assert_eq!(expected.as_deref(), Some("int __cdecl func(int *, int *)"));

    for unrelated in ["?Fxix_i@@YAHP6AHH@ZH0@Z", "?xyz@?$abc@V?$def@H@@PAX@@YAXXZ"] {
        assert!(demangle(Language::Msvc, unrelated, Options::BASE).is_some());
        assert_eq!(demangle(Language::Msvc, referencing, Options::BASE), expected);
    }

    // without a memorized type the same reference is out of range
    assert_eq!(msvc::try_demangle("?func@@YAH0@Z", Options::BASE), Err(Error::BackrefOutOfRange));

    assert_eq!(gnu_v2::try_demangle("foo__FiT0", Options::BASE).as_deref(), Ok("foo(int, int)"));
    assert_eq!(gnu_v2::try_demangle("foo__FT0", Options::BASE), Err(Error::BackrefOutOfRange));
}

#[test]
fn empty_input() {
    assert_eq!(demangle(Language::Msvc, "", Options::BASE), None);
    assert_eq!(demangle(Language::Cxx, "", Options::BASE), None);
    assert_eq!(gnu_v2::demangle("", Options::BASE), None);
    assert_eq!(gnu_v2::legacy::demangle("", Options::BASE), None);
}

#[test]
fn languages() {
    for name in Language::ALL {
        let lang: Language = name.parse().unwrap();
        assert_eq!(lang.name(), *name);
    }

    assert_eq!("rust".parse::<Language>(), Err(UnknownLanguage("rust".to_string())));
}

#[test]
fn scenarios() {
    assert_eq!(
        demangle(Language::Msvc, "?var_int@@3HA", Options::BASE).as_deref(),
        Some("int var_int")
    );
    assert_eq!(
        demangle(Language::Msvc, "?arr2@@3PAY07HA", Options::BASE).as_deref(),
        Some("int (*)[8] arr2")
    );
    assert_eq!(
        demangle(Language::Msvc, "??_R0?AVResultException@wil@@@8", Options::BASE).as_deref(),
        Some("class wil::ResultException `RTTI Type Descriptor'")
    );
    assert_eq!(
        demangle(Language::Cxx, "_vt$foo$bar", Options::BASE).as_deref(),
        Some("foo::bar virtual table")
    );
    assert_eq!(
        demangle(Language::Cxx, "foo__1Ai", Options::BASE).as_deref(),
        Some("A::foo(int)")
    );
    assert_eq!(
        demangle(Language::Cxx, "_ZNSt2147483648ios_base4InitD1Ev", Options::BASE),
        None
    );
}
