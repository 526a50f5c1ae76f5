//! Character classes of the HiPack grammar.
//!
//! Every predicate is total over `char`: anything outside ASCII is an
//! ordinary character, legal inside both strings and keys.

/// Tab, line feed, carriage return and space.
#[inline]
#[must_use]
pub const fn is_whitespace(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | ' ')
}

/// Characters allowed in dictionary keys and annotation tags.
#[inline]
#[must_use]
pub const fn is_key_character(ch: char) -> bool {
    !is_whitespace(ch) && !matches!(ch, '[' | ']' | '{' | '}' | ':' | ',')
}

#[inline]
#[must_use]
pub const fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Characters that make up the body of a numeric literal.
///
/// Both sign characters belong to the class so that a stray sign in the
/// middle of a literal is scanned and rejected by the number lexer instead
/// of silently ending the literal.
#[inline]
#[must_use]
pub const fn is_number_character(ch: char) -> bool {
    is_hex_digit(ch) || matches!(ch, '.' | '+' | '-')
}

#[inline]
#[must_use]
pub const fn is_octal_nonzero_digit(ch: char) -> bool {
    matches!(ch, '1'..='7')
}

/// Value of a hexadecimal digit, `None` for anything else.
#[inline]
#[must_use]
pub const fn hex_digit_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        'a'..='f' => Some(ch as u32 - 'a' as u32 + 10),
        'A'..='F' => Some(ch as u32 - 'A' as u32 + 10),
        _ => None,
    }
}
