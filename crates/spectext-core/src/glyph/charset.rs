//! Supported-character policy.
//!
//! A single table maps every renderable character to the stem of its glyph
//! asset (`a` -> `a`, `A` -> `AA`, `&` -> `ampersand`, ...). The table is
//! built once on first use; anything absent from it is unsupported.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Punctuation and symbols with named asset stems.
const NAMED_SYMBOLS: &[(char, &str)] = &[
    ('_', "_"),
    ('&', "ampersand"),
    ('\'', "apostrophe"),
    ('*', "asterisk"),
    ('\\', "backslash"),
    ('^', "carrot"),
    (':', "colon"),
    (',', "comma"),
    ('{', "curly_bracket_start"),
    ('}', "curly_bracket_end"),
    ('$', "dollar_sign"),
    ('=', "equal"),
    ('!', "exclamation_point"),
    ('/', "forward_slash"),
    ('>', "greater_than"),
    ('<', "less_than"),
    ('-', "minus"),
    ('(', "parentheses_start"),
    (')', "parentheses_end"),
    ('%', "percent"),
    ('.', "period"),
    ('+', "plus"),
    ('#', "pound"),
    ('?', "question_mark"),
    ('"', "quotes"),
    (';', "semicolon"),
    (' ', "space"),
    ('[', "square_bracket_start"),
    (']', "square_bracket_end"),
    ('~', "twoodle"),
];

static CHARSET: LazyLock<BTreeMap<char, String>> = LazyLock::new(|| {
    let mut table = BTreeMap::new();
    for c in ('a'..='z').chain('0'..='9') {
        table.insert(c, c.to_string());
    }
    // Uppercase stems are the letter doubled: A -> AA.
    for c in 'A'..='Z' {
        table.insert(c, format!("{c}{c}"));
    }
    for &(c, stem) in NAMED_SYMBOLS {
        table.insert(c, stem.to_string());
    }
    table
});

/// Returns true if `c` has a glyph.
pub fn is_supported(c: char) -> bool {
    CHARSET.contains_key(&c)
}

/// Asset file stem for `c`, if supported.
pub fn asset_stem(c: char) -> Option<&'static str> {
    CHARSET.get(&c).map(String::as_str)
}

/// All supported characters in code point order.
pub fn supported_chars() -> impl Iterator<Item = char> {
    CHARSET.keys().copied()
}
