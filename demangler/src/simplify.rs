use std::borrow::Cow;

/// Replacements applied in order, longer spellings of a type come before shorter ones.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("std::basic_string<char, std::char_traits<char>, std::allocator<char> >", "std::string"),
    ("std::basic_string<char, std::char_traits<char>, std::allocator<char>>", "std::string"),
    ("std::basic_string<char, std::char_traits<char> >", "std::string"),
    ("std::basic_string<char, std::char_traits<char>>", "std::string"),
    ("std::basic_iostream<char, std::char_traits<char> >", "std::iostream"),
    ("std::basic_iostream<char, std::char_traits<char>>", "std::iostream"),
    ("std::basic_istream<char, std::char_traits<char> >", "std::istream"),
    ("std::basic_istream<char, std::char_traits<char>>", "std::istream"),
    ("std::basic_ostream<char, std::char_traits<char> >", "std::ostream"),
    ("std::basic_ostream<char, std::char_traits<char>>", "std::ostream"),
    ("unsigned long long", "uint64_t"),
    ("long long", "int64_t"),
];

/// Shorten well-known standard library types in a rendered C++ declaration.
pub fn simplify(demangled: &str) -> Cow<str> {
    let mut simplified = Cow::Borrowed(demangled);

    for (from, to) in REPLACEMENTS {
        if simplified.contains(from) {
            simplified = Cow::Owned(simplified.replace(from, to));
        }
    }

    simplified
}
