use crate::errors::ParseError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tag identifying the kind of a token. This is the complete list of tokens in
/// [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/#tokenization), plus the
/// scanner flags `Error` and `Eof`.
///
/// The `Display` output is the canonical token name.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    #[display("error")]
    Error,
    #[display("EOF")]
    Eof,
    #[display("IDENT")]
    Ident,
    #[display("FUNCTION")]
    Function,
    #[display("URI")]
    Url,
    /// Single character
    #[display("DELIM")]
    Delim,
    #[display("ATKEYWORD")]
    AtKeyword,
    #[display("STRING")]
    QuotedString,
    #[display("S")]
    Whitespace,
    /// Comments are removed from the token stream by CSS Syntax Level 3, but are preserved here.
    #[display("COMMENT")]
    Comment,
    #[display("HASH")]
    Hash,
    #[display("NUMBER")]
    Number,
    #[display("PERCENTAGE")]
    Percentage,
    #[display("DIMENSION")]
    Dimension,
    #[display("UNICODE-RANGE")]
    UnicodeRange,
    #[display("BAD-STRING")]
    BadString,
    #[display("BAD-URI")]
    BadUrl,
    /// A `\` right before a newline
    #[display("BAD-ESCAPE")]
    BadEscape,
    /// `~=`
    #[display("INCLUDES")]
    IncludeMatch,
    /// `|=`
    #[display("DASHMATCH")]
    DashMatch,
    /// `^=`
    #[display("PREFIXMATCH")]
    PrefixMatch,
    /// `$=`
    #[display("SUFFIXMATCH")]
    SuffixMatch,
    /// `*=`
    #[display("SUBSTRINGMATCH")]
    SubstringMatch,
    /// `||`
    #[display("COLUMN")]
    Column,
    #[display("COLON")]
    Colon,
    #[display("SEMICOLON")]
    Semicolon,
    #[display("COMMA")]
    Comma,
    #[display("LEFT-BRACKET")]
    LBracket,
    #[display("RIGHT-BRACKET")]
    RBracket,
    #[display("LEFT-PAREN")]
    LParen,
    #[display("RIGHT-PAREN")]
    RParen,
    #[display("LEFT-BRACE")]
    LCurly,
    #[display("RIGHT-BRACE")]
    RCurly,
    /// `<!--`
    #[display("CDO")]
    Cdo,
    /// `-->`
    #[display("CDC")]
    Cdc,
}

impl TokenType {
    /// Stop tokens are `Error`, `Eof`, `BadEscape`, `BadString` and `BadUrl`. A consumer that does
    /// not want to tolerate parsing errors should stop when this returns true.
    #[must_use]
    pub fn is_stop_token(self) -> bool {
        matches!(
            self,
            TokenType::Error | TokenType::Eof | TokenType::BadEscape | TokenType::BadString | TokenType::BadUrl
        )
    }

    /// Returns true when tokens of this type carry extra data beyond their value
    #[must_use]
    pub fn has_extra(self) -> bool {
        matches!(
            self,
            TokenType::Error
                | TokenType::BadEscape
                | TokenType::BadString
                | TokenType::BadUrl
                | TokenType::Hash
                | TokenType::Number
                | TokenType::Percentage
                | TokenType::Dimension
                | TokenType::UnicodeRange
        )
    }

    /// Source text of the fixed-string tokens
    #[must_use]
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            TokenType::IncludeMatch => "~=",
            TokenType::DashMatch => "|=",
            TokenType::PrefixMatch => "^=",
            TokenType::SuffixMatch => "$=",
            TokenType::SubstringMatch => "*=",
            TokenType::Column => "||",
            TokenType::Colon => ":",
            TokenType::Semicolon => ";",
            TokenType::Comma => ",",
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LCurly => "{",
            TokenType::RCurly => "}",
            TokenType::Cdo => "<!--",
            TokenType::Cdc => "-->",
            _ => return None,
        };

        Some(text)
    }
}

/// Extra data for a `Hash` token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashExtra {
    /// When set, the hash value would be a valid identifier (type flag "id")
    pub is_identifier: bool,
}

impl fmt::Display for HashExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identifier {
            write!(f, "id")
        } else {
            write!(f, "unrestricted")
        }
    }
}

/// Extra data for `Number`, `Percentage` and `Dimension` tokens. The numeric value itself is
/// kept as text in the token value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericExtra {
    pub non_integer: bool,
    /// Unit of a dimension, empty for numbers and percentages
    #[serde(default)]
    pub dimension: String,
}

impl fmt::Display for NumericExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dimension)
    }
}

/// Extra data for a `UnicodeRange` token. Both ends are inclusive code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeExtra {
    pub start: u32,
    pub end: u32,
}

/// Displays as the CSS representation of the range (`U+0041` or `U+0030-0039`)
impl fmt::Display for RangeExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "U+{:04X}", self.start)
        } else {
            write!(f, "U+{:04X}-{:04X}", self.start, self.end)
        }
    }
}

/// Extra data for `Error`, `BadEscape`, `BadString` and `BadUrl` tokens: the failure the scanner
/// ran into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ErrorExtra {
    #[error("{0}")]
    Parse(ParseError),
    #[error("{0}")]
    Failure(String),
}

impl ErrorExtra {
    /// Returns the structured parse error, if the failure was one
    #[must_use]
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            ErrorExtra::Parse(err) => Some(err),
            ErrorExtra::Failure(_) => None,
        }
    }
}

/// A token kind together with the extra data that is legal for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Error(ErrorExtra),
    Eof,
    Ident,
    Function,
    Url,
    Delim,
    AtKeyword,
    QuotedString,
    Whitespace,
    Comment,
    Hash(HashExtra),
    Number(NumericExtra),
    Percentage(NumericExtra),
    Dimension(NumericExtra),
    UnicodeRange(RangeExtra),
    BadString(ErrorExtra),
    BadUrl(ErrorExtra),
    BadEscape(ErrorExtra),
    IncludeMatch,
    DashMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,
    Column,
    Colon,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LCurly,
    RCurly,
    Cdo,
    Cdc,
}

impl TokenKind {
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenKind::Error(_) => TokenType::Error,
            TokenKind::Eof => TokenType::Eof,
            TokenKind::Ident => TokenType::Ident,
            TokenKind::Function => TokenType::Function,
            TokenKind::Url => TokenType::Url,
            TokenKind::Delim => TokenType::Delim,
            TokenKind::AtKeyword => TokenType::AtKeyword,
            TokenKind::QuotedString => TokenType::QuotedString,
            TokenKind::Whitespace => TokenType::Whitespace,
            TokenKind::Comment => TokenType::Comment,
            TokenKind::Hash(_) => TokenType::Hash,
            TokenKind::Number(_) => TokenType::Number,
            TokenKind::Percentage(_) => TokenType::Percentage,
            TokenKind::Dimension(_) => TokenType::Dimension,
            TokenKind::UnicodeRange(_) => TokenType::UnicodeRange,
            TokenKind::BadString(_) => TokenType::BadString,
            TokenKind::BadUrl(_) => TokenType::BadUrl,
            TokenKind::BadEscape(_) => TokenType::BadEscape,
            TokenKind::IncludeMatch => TokenType::IncludeMatch,
            TokenKind::DashMatch => TokenType::DashMatch,
            TokenKind::PrefixMatch => TokenType::PrefixMatch,
            TokenKind::SuffixMatch => TokenType::SuffixMatch,
            TokenKind::SubstringMatch => TokenType::SubstringMatch,
            TokenKind::Column => TokenType::Column,
            TokenKind::Colon => TokenType::Colon,
            TokenKind::Semicolon => TokenType::Semicolon,
            TokenKind::Comma => TokenType::Comma,
            TokenKind::LBracket => TokenType::LBracket,
            TokenKind::RBracket => TokenType::RBracket,
            TokenKind::LParen => TokenType::LParen,
            TokenKind::RParen => TokenType::RParen,
            TokenKind::LCurly => TokenType::LCurly,
            TokenKind::RCurly => TokenType::RCurly,
            TokenKind::Cdo => TokenType::Cdo,
            TokenKind::Cdc => TokenType::Cdc,
        }
    }

    /// Returns the kind for a fixed-string token type
    #[must_use]
    pub fn fixed(token_type: TokenType) -> Option<TokenKind> {
        let kind = match token_type {
            TokenType::IncludeMatch => TokenKind::IncludeMatch,
            TokenType::DashMatch => TokenKind::DashMatch,
            TokenType::PrefixMatch => TokenKind::PrefixMatch,
            TokenType::SuffixMatch => TokenKind::SuffixMatch,
            TokenType::SubstringMatch => TokenKind::SubstringMatch,
            TokenType::Column => TokenKind::Column,
            TokenType::Colon => TokenKind::Colon,
            TokenType::Semicolon => TokenKind::Semicolon,
            TokenType::Comma => TokenKind::Comma,
            TokenType::LBracket => TokenKind::LBracket,
            TokenType::RBracket => TokenKind::RBracket,
            TokenType::LParen => TokenKind::LParen,
            TokenType::RParen => TokenKind::RParen,
            TokenType::LCurly => TokenKind::LCurly,
            TokenType::RCurly => TokenKind::RCurly,
            TokenType::Cdo => TokenKind::Cdo,
            TokenType::Cdc => TokenKind::Cdc,
            _ => return None,
        };

        Some(kind)
    }
}

/// A token in the CSS syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Kind of the token, including its extra data
    pub kind: TokenKind,
    /// Text of the token. Its meaning depends on the kind: for a `Url` it is the url itself,
    /// for a `Percentage` it is the number without the percent sign.
    #[serde(default)]
    pub value: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, value: &str) -> Token {
        Token {
            kind,
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    /// Returns the extra data of the token as a descriptive string, if it has any
    #[must_use]
    pub fn extra(&self) -> Option<&dyn fmt::Display> {
        match &self.kind {
            TokenKind::Hash(extra) => Some(extra),
            TokenKind::Number(extra) | TokenKind::Percentage(extra) | TokenKind::Dimension(extra) => Some(extra),
            TokenKind::UnicodeRange(extra) => Some(extra),
            TokenKind::Error(extra)
            | TokenKind::BadString(extra)
            | TokenKind::BadUrl(extra)
            | TokenKind::BadEscape(extra) => Some(extra),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_stop_token(&self) -> bool {
        self.token_type().is_stop_token()
    }

    #[must_use]
    pub fn error(err: ErrorExtra) -> Token {
        Token::new(TokenKind::Error(err), "")
    }

    #[must_use]
    pub fn eof() -> Token {
        Token::new(TokenKind::Eof, "")
    }

    #[must_use]
    pub fn ident(value: &str) -> Token {
        Token::new(TokenKind::Ident, value)
    }

    #[must_use]
    pub fn function(name: &str) -> Token {
        Token::new(TokenKind::Function, name)
    }

    #[must_use]
    pub fn url(value: &str) -> Token {
        Token::new(TokenKind::Url, value)
    }

    #[must_use]
    pub fn delim(c: char) -> Token {
        Token::new(TokenKind::Delim, c.encode_utf8(&mut [0; 4]))
    }

    #[must_use]
    pub fn at_keyword(keyword: &str) -> Token {
        Token::new(TokenKind::AtKeyword, keyword)
    }

    #[must_use]
    pub fn quoted_string(value: &str) -> Token {
        Token::new(TokenKind::QuotedString, value)
    }

    #[must_use]
    pub fn whitespace(value: &str) -> Token {
        Token::new(TokenKind::Whitespace, value)
    }

    #[must_use]
    pub fn comment(value: &str) -> Token {
        Token::new(TokenKind::Comment, value)
    }

    #[must_use]
    pub fn hash(value: &str, is_identifier: bool) -> Token {
        Token::new(TokenKind::Hash(HashExtra { is_identifier }), value)
    }

    #[must_use]
    pub fn number(value: &str, non_integer: bool) -> Token {
        Token::new(
            TokenKind::Number(NumericExtra {
                non_integer,
                dimension: String::new(),
            }),
            value,
        )
    }

    #[must_use]
    pub fn percentage(value: &str, non_integer: bool) -> Token {
        Token::new(
            TokenKind::Percentage(NumericExtra {
                non_integer,
                dimension: String::new(),
            }),
            value,
        )
    }

    #[must_use]
    pub fn dimension(value: &str, non_integer: bool, unit: &str) -> Token {
        Token::new(
            TokenKind::Dimension(NumericExtra {
                non_integer,
                dimension: unit.to_string(),
            }),
            value,
        )
    }

    #[must_use]
    pub fn unicode_range(start: u32, end: u32) -> Token {
        let extra = RangeExtra { start, end };
        Token::new(TokenKind::UnicodeRange(extra), &extra.to_string())
    }

    #[must_use]
    pub fn bad_string(value: &str, err: ErrorExtra) -> Token {
        Token::new(TokenKind::BadString(err), value)
    }

    #[must_use]
    pub fn bad_url(value: &str, err: ErrorExtra) -> Token {
        Token::new(TokenKind::BadUrl(err), value)
    }

    #[must_use]
    pub fn bad_escape(err: ErrorExtra) -> Token {
        Token::new(TokenKind::BadEscape(err), "\\")
    }

    /// Returns a fixed-string token (`:`, `~=`, `-->` etc.) with its canonical value, or `None`
    /// when the given type is not a fixed-string type.
    #[must_use]
    pub fn fixed(token_type: TokenType) -> Option<Token> {
        let kind = TokenKind::fixed(token_type)?;
        let text = token_type.fixed_text()?;

        Some(Token::new(kind, text))
    }
}
