//! Rendering of single tokens back to CSS source. For a sequence of tokens, use the
//! [`TokenSerializer`](crate::serializer::TokenSerializer) instead, which takes care of tokens
//! that would merge when written next to each other.
use crate::escape::{escape_dimension, escape_hash_name, escape_identifier, escape_string};
use crate::tokens::{Token, TokenKind};
use std::fmt;
use std::io::Write;

/// Writes the CSS source representation of the token. `Error` and `Eof` tokens write nothing.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Error(_) | TokenKind::Eof => Ok(()),
            TokenKind::Ident => write!(f, "{}", escape_identifier(&self.value)),
            TokenKind::AtKeyword => write!(f, "@{}", escape_identifier(&self.value)),
            // A lone backslash is a bad escape and should not end up as a delim
            TokenKind::Delim if self.value == "\\" => write!(f, "\\\n"),
            TokenKind::Delim => write!(f, "{}", self.value),
            TokenKind::Hash(extra) if extra.is_identifier => write!(f, "#{}", escape_identifier(&self.value)),
            TokenKind::Hash(_) => write!(f, "#{}", escape_hash_name(&self.value)),
            TokenKind::Number(_) => write!(f, "{}", self.value),
            TokenKind::Percentage(_) => write!(f, "{}%", self.value),
            TokenKind::Dimension(extra) => write!(f, "{}{}", self.value, escape_dimension(&extra.dimension)),
            TokenKind::QuotedString => write!(f, "{}", escape_string(&self.value, Some('"'))),
            TokenKind::Url => write!(f, "url({})", escape_string(&self.value, Some('"'))),
            TokenKind::UnicodeRange(extra) => write!(f, "{extra}"),
            TokenKind::Comment => write!(f, "/*{}*/", self.value),
            TokenKind::Function => write!(f, "{}(", escape_identifier(&self.value)),
            TokenKind::BadEscape(_) => write!(f, "\\\n"),
            // Unterminated: no closing quote
            TokenKind::BadString(_) => write!(f, "\"{}\n", escape_string(&self.value, None)),
            TokenKind::BadUrl(_) => {
                let escaped = escape_string(&self.value, None);
                let escaped = escaped.strip_suffix('"').unwrap_or(&escaped);
                write!(f, "url(\"{escaped}\n)")
            }
            TokenKind::Whitespace
            | TokenKind::IncludeMatch
            | TokenKind::DashMatch
            | TokenKind::PrefixMatch
            | TokenKind::SuffixMatch
            | TokenKind::SubstringMatch
            | TokenKind::Column
            | TokenKind::Colon
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LCurly
            | TokenKind::RCurly
            | TokenKind::Cdo
            | TokenKind::Cdc => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    /// Returns the CSS source representation of the token
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Writes the CSS source representation of the token to the given writer and returns the
    /// number of bytes written.
    pub fn write_to(&self, w: &mut dyn Write) -> std::io::Result<usize> {
        let rendered = self.render();
        w.write_all(rendered.as_bytes())?;

        Ok(rendered.len())
    }
}
