//! Escaping of names and strings so they can be written back as CSS source.
//!
//! See [CSS Syntax Level 3, 4.3.7](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point) for
//! how escapes are read back.
use std::borrow::Cow;

/// Context a name is escaped for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// Identifiers, function names and at-keywords
    Identifier,
    /// Value of a hash token. This does not have to be a valid identifier, so a leading digit or
    /// hyphen needs no escaping.
    HashName,
    /// Unit of a dimension. An `e` or `E` directly after the number would be read back as an
    /// exponent.
    Dimension,
}

/// Letters, underscore and any non-ascii code point
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_code(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Non-printable code points, plus form feed which would end a string as a newline
fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000C}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
}

/// Writes `c` as a hex escape terminated by a single space. Only used for ascii characters.
fn push_hex(out: &mut String, c: char) {
    out.push_str(&format!("\\{:X} ", c as u32));
}

/// Escapes `s` so it is read back as a single name in the given context. Returns the input
/// unchanged when nothing needed escaping.
#[must_use]
pub fn escape_ident(s: &str, mode: EscapeMode) -> Cow<'_, str> {
    if s.is_empty() {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut changed = false;
    let mut chars = s.chars().peekable();

    // Hash names can start with anything a name can contain
    if mode != EscapeMode::HashName {
        if let Some(first) = chars.next() {
            match first {
                'e' | 'E' if mode == EscapeMode::Dimension => {
                    push_hex(&mut out, first);
                    changed = true;
                }
                '-' => match chars.peek() {
                    None => return Cow::Borrowed("\\-"),
                    Some(&next) if is_name_start(next) => out.push('-'),
                    Some(_) => {
                        out.push_str("\\-");
                        changed = true;
                    }
                },
                c if is_name_start(c) => out.push(c),
                // A digit cannot simply be prefixed with a backslash: it would be read as a hex escape
                c => {
                    push_hex(&mut out, c);
                    changed = true;
                }
            }
        }
    }

    for c in chars {
        if is_name_code(c) {
            out.push(c);
        } else {
            push_hex(&mut out, c);
            changed = true;
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    }
}

#[must_use]
pub fn escape_identifier(s: &str) -> Cow<'_, str> {
    escape_ident(s, EscapeMode::Identifier)
}

#[must_use]
pub fn escape_hash_name(s: &str) -> Cow<'_, str> {
    escape_ident(s, EscapeMode::HashName)
}

#[must_use]
pub fn escape_dimension(s: &str) -> Cow<'_, str> {
    escape_ident(s, EscapeMode::Dimension)
}

/// Escapes the contents of a string. When a delimiter is given, the output is wrapped in it.
/// Double quotes are always escaped.
#[must_use]
pub fn escape_string(s: &str, delim: Option<char>) -> String {
    let mut out = String::with_capacity(s.len() + 2);

    if let Some(d) = delim {
        out.push(d);
    }

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            c if Some(c) == delim => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\0A "),
            '\r' => out.push_str("\\0D "),
            '\\' => out.push_str("\\\\"),
            c if is_non_printable(c) => push_hex(&mut out, c),
            c => out.push(c),
        }
    }

    if let Some(d) = delim {
        out.push(d);
    }

    out
}
