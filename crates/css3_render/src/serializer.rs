//! Serialization of token streams.
//!
//! Tokens written directly after each other can be read back as a different token: `a` followed
//! by `b` would be read as the single ident `ab`. The serializer keeps track of the previous token
//! and inserts an empty comment (`/**/`) between such pairs, following
//! [CSS Syntax Level 3, section 9](https://www.w3.org/TR/css-syntax-3/#serialization).
use crate::errors::{RenderError, RenderResult};
use crate::render_config::RenderConfig;
use crate::tokens::{Token, TokenKind, TokenType};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// Empty comment used as separator
const EMPTY_COMMENT: &str = "/**/";

/// Identity of a token in the comment insertion table. Delim tokens and single character
/// punctuation are keyed on their character, all other tokens on their type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjacencyKey {
    Kind(TokenType),
    Char(u8),
}

impl AdjacencyKey {
    #[must_use]
    pub fn of(token: &Token) -> AdjacencyKey {
        match token.kind {
            TokenKind::Delim => match token.value.as_bytes().first() {
                Some(&c) => AdjacencyKey::Char(c),
                None => AdjacencyKey::Kind(TokenType::Delim),
            },
            _ => match token.token_type().fixed_text().map(str::as_bytes) {
                Some(&[c]) => AdjacencyKey::Char(c),
                _ => AdjacencyKey::Kind(token.token_type()),
            },
        }
    }
}

use AdjacencyKey::{Char, Kind};

/// Tokens that start like an identifier or a number
const IDENT_LIKE_AND_NUMERIC: [AdjacencyKey; 8] = [
    Kind(TokenType::Ident),
    Kind(TokenType::Function),
    Kind(TokenType::Url),
    Kind(TokenType::BadUrl),
    Kind(TokenType::Number),
    Kind(TokenType::Percentage),
    Kind(TokenType::Dimension),
    Kind(TokenType::UnicodeRange),
];

const NUMERIC: [AdjacencyKey; 3] = [
    Kind(TokenType::Number),
    Kind(TokenType::Percentage),
    Kind(TokenType::Dimension),
];

lazy_static! {
    /// Previous token key -> following token keys that need a comment in between
    static ref COMMENT_INSERTION_RULES: HashMap<AdjacencyKey, HashSet<AdjacencyKey>> = {
        let thru_cdc: HashSet<AdjacencyKey> = IDENT_LIKE_AND_NUMERIC
            .iter()
            .copied()
            .chain([Kind(TokenType::Cdc)])
            .collect();

        let mut rules = HashMap::new();

        rules.insert(
            Kind(TokenType::Ident),
            thru_cdc.iter().copied().chain([Char(b'-'), Char(b'(')]).collect(),
        );
        rules.insert(Kind(TokenType::AtKeyword), thru_cdc.clone());
        rules.insert(Kind(TokenType::Hash), thru_cdc.clone());
        rules.insert(Kind(TokenType::Dimension), thru_cdc);
        rules.insert(
            Char(b'#'),
            IDENT_LIKE_AND_NUMERIC.iter().copied().chain([Char(b'-')]).collect(),
        );
        rules.insert(Char(b'-'), IDENT_LIKE_AND_NUMERIC.iter().copied().collect());
        rules.insert(Kind(TokenType::Number), IDENT_LIKE_AND_NUMERIC.iter().copied().collect());
        rules.insert(
            Char(b'@'),
            [
                Kind(TokenType::Ident),
                Kind(TokenType::Function),
                Kind(TokenType::Url),
                Kind(TokenType::BadUrl),
                Kind(TokenType::UnicodeRange),
                Char(b'-'),
            ]
            .into_iter()
            .collect(),
        );
        rules.insert(
            Kind(TokenType::UnicodeRange),
            [
                Kind(TokenType::Ident),
                Kind(TokenType::Function),
                Kind(TokenType::Number),
                Kind(TokenType::Percentage),
                Kind(TokenType::Dimension),
                Char(b'?'),
            ]
            .into_iter()
            .collect(),
        );
        rules.insert(Char(b'.'), NUMERIC.into_iter().collect());
        rules.insert(Char(b'+'), NUMERIC.into_iter().collect());
        for c in [b'$', b'*', b'^', b'~'] {
            rules.insert(Char(c), HashSet::from([Char(b'=')]));
        }
        rules.insert(Char(b'|'), HashSet::from([Char(b'='), Char(b'|')]));
        rules.insert(Char(b'/'), HashSet::from([Char(b'*')]));

        rules
    };
}

/// Returns true when a token keyed `cur` written directly after a token keyed `prev` would be
/// read back differently, and needs an empty comment in between.
#[must_use]
pub fn needs_comment(prev: AdjacencyKey, cur: AdjacencyKey) -> bool {
    COMMENT_INSERTION_RULES
        .get(&prev)
        .is_some_and(|following| following.contains(&cur))
}

/// Serializes a sequence of tokens so that reading the output back yields the same tokens.
///
/// A serializer remembers the last token written, so use one instance per output stream.
#[derive(Debug, Default)]
pub struct TokenSerializer {
    config: RenderConfig,
    /// Key of the previously written token, none when nothing has been written yet
    last_key: Option<AdjacencyKey>,
}

impl TokenSerializer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config, last_key: None }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Forgets the previous token, so the serializer can start on a new output stream
    pub fn reset(&mut self) {
        self.last_key = None;
    }

    /// Moves on to the given token and returns true when it must be preceded by an empty comment
    fn advance(&mut self, token: &Token) -> bool {
        let cur = AdjacencyKey::of(token);
        let prev = self.last_key.replace(cur);

        let separate = self.config.insert_comments && prev.is_some_and(|prev| needs_comment(prev, cur));
        if separate {
            log::debug!("inserting comment between {:?} and {:?}", prev, cur);
        }

        separate
    }

    /// Writes a token to the given writer, preceded by an empty comment when the previous token
    /// requires it. Returns the number of bytes written.
    pub fn write_token(&mut self, w: &mut dyn Write, token: &Token) -> std::io::Result<usize> {
        log::trace!("{:?}", token);

        let mut n = 0;
        if self.advance(token) {
            w.write_all(EMPTY_COMMENT.as_bytes())?;
            n += EMPTY_COMMENT.len();
        }

        Ok(n + token.write_to(w)?)
    }

    /// Writes all tokens to the given writer and returns the number of bytes written. When
    /// `stop_on_error` is configured, this stops at the first stop token: an EOF token ends the
    /// stream normally, any other stop token results in an error.
    pub fn write_all<'t, I>(&mut self, w: &mut dyn Write, tokens: I) -> RenderResult<usize>
    where
        I: IntoIterator<Item = &'t Token>,
    {
        let mut n = 0;

        for token in tokens {
            if self.config.stop_on_error && token.is_stop_token() {
                if token.token_type() == TokenType::Eof {
                    break;
                }

                let message = token.extra().map(|e| e.to_string()).unwrap_or_default();
                log::debug!("stopping at {}: {}", token.token_type(), message);

                return Err(RenderError::StopToken {
                    token_type: token.token_type(),
                    message,
                });
            }

            n += self.write_token(w, token)?;
        }

        Ok(n)
    }

    /// Renders all tokens into a string, following the same rules as `write_all`
    pub fn render_tokens<'t, I>(&mut self, tokens: I) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'t Token>,
    {
        let mut output: Vec<u8> = Vec::new();
        self.write_all(&mut output, tokens)?;

        // Tokens only ever render to valid utf-8
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// Renders the tokens with a default configured serializer
#[must_use]
pub fn serialize(tokens: &[Token]) -> String {
    // The default configuration does not stop on error tokens, and writing to memory cannot fail
    TokenSerializer::default().render_tokens(tokens).unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::AdjacencyKey::{Char, Kind};
    use super::*;
    use crate::tokens::ErrorExtra;
    use simple_logger::SimpleLogger;
    use test_case::test_case;

    fn ident() -> Token {
        Token::ident("a")
    }

    fn number() -> Token {
        Token::number("1", false)
    }

    #[test_case(vec![ident(), Token::ident("b")], "a/**/b"; "ident ident")]
    #[test_case(vec![ident(), Token::delim('(')], "a/**/("; "ident paren delim")]
    #[test_case(vec![ident(), Token::whitespace(" "), Token::ident("b")], "a b"; "whitespace separates")]
    #[test_case(vec![ident(), Token::fixed(TokenType::LParen).unwrap()], "a/**/("; "ident paren token")]
    #[test_case(vec![ident(), Token::delim('-')], "a/**/-"; "ident hyphen")]
    #[test_case(vec![ident(), number()], "a/**/1"; "ident number")]
    #[test_case(vec![ident(), Token::fixed(TokenType::Cdc).unwrap()], "a/**/-->"; "ident cdc")]
    #[test_case(vec![Token::delim('+'), Token::delim('-')], "+-"; "plus hyphen")]
    #[test_case(vec![Token::delim('+'), number()], "+/**/1"; "plus number")]
    #[test_case(vec![Token::delim('.'), Token::percentage("5", false)], "./**/5%"; "dot percentage")]
    #[test_case(vec![Token::delim('-'), Token::delim('-')], "--"; "hyphen hyphen")]
    #[test_case(vec![Token::delim('-'), ident()], "-/**/a"; "hyphen ident")]
    #[test_case(vec![Token::delim('#'), ident()], "#/**/a"; "hash delim ident")]
    #[test_case(vec![Token::delim('#'), Token::fixed(TokenType::Cdc).unwrap()], "#-->"; "hash delim cdc")]
    #[test_case(vec![Token::delim('@'), ident()], "@/**/a"; "at delim ident")]
    #[test_case(vec![Token::delim('@'), number()], "@1"; "at delim number")]
    #[test_case(vec![Token::hash("x", true), Token::dimension("2", false, "px")], "#x/**/2px"; "hash dimension")]
    #[test_case(vec![Token::hash("x", true), Token::delim('(')], "#x("; "hash paren")]
    #[test_case(vec![Token::at_keyword("m"), Token::function("f")], "@m/**/f("; "at keyword function")]
    #[test_case(vec![Token::dimension("1", false, "px"), Token::fixed(TokenType::Cdc).unwrap()], "1px/**/-->"; "dimension cdc")]
    #[test_case(vec![number(), Token::delim('-')], "1-"; "number hyphen")]
    #[test_case(vec![number(), Token::url("u")], "1/**/url(\"u\")"; "number url")]
    #[test_case(vec![Token::unicode_range(0x41, 0x41), Token::delim('?')], "U+0041/**/?"; "range question")]
    #[test_case(vec![Token::unicode_range(0x41, 0x41), Token::unicode_range(0x42, 0x42)], "U+0041U+0042"; "range range")]
    #[test_case(vec![Token::delim('|'), Token::delim('|')], "|/**/|"; "pipe pipe")]
    #[test_case(vec![Token::delim('|'), Token::delim('=')], "|/**/="; "pipe equals")]
    #[test_case(vec![Token::delim('~'), Token::delim('=')], "~/**/="; "tilde equals")]
    #[test_case(vec![Token::delim('/'), Token::delim('*')], "//**/*"; "slash star")]
    #[test_case(vec![Token::delim('*'), Token::delim('/')], "*/"; "star slash")]
    fn serialize_pairs(tokens: Vec<Token>, expected: &str) {
        assert_eq!(serialize(&tokens), expected);
    }

    #[test]
    fn adjacency_keys() {
        assert_eq!(AdjacencyKey::of(&Token::delim('-')), Char(b'-'));
        assert_eq!(AdjacencyKey::of(&Token::ident("-")), Kind(TokenType::Ident));
        assert_eq!(AdjacencyKey::of(&Token::fixed(TokenType::LParen).unwrap()), Char(b'('));
        assert_eq!(
            AdjacencyKey::of(&Token::fixed(TokenType::Cdc).unwrap()),
            Kind(TokenType::Cdc)
        );
        assert_eq!(
            AdjacencyKey::of(&Token::new(TokenKind::Delim, "")),
            Kind(TokenType::Delim)
        );
    }

    #[test]
    fn table_is_one_directional() {
        assert!(needs_comment(Char(b'/'), Char(b'*')));
        assert!(!needs_comment(Char(b'*'), Char(b'/')));
        assert!(needs_comment(Kind(TokenType::Ident), Char(b'(')));
        assert!(!needs_comment(Kind(TokenType::AtKeyword), Char(b'(')));
        assert!(!needs_comment(Kind(TokenType::Whitespace), Kind(TokenType::Ident)));
    }

    #[test]
    fn comment_insertion_table() {
        let ident_like = [
            Kind(TokenType::Ident),
            Kind(TokenType::Function),
            Kind(TokenType::Url),
            Kind(TokenType::BadUrl),
        ];
        let numeric = [
            Kind(TokenType::Number),
            Kind(TokenType::Percentage),
            Kind(TokenType::Dimension),
        ];
        let range = Kind(TokenType::UnicodeRange);
        let cdc = Kind(TokenType::Cdc);

        let thru_cdc: Vec<AdjacencyKey> = ident_like
            .iter()
            .chain(numeric.iter())
            .copied()
            .chain([range, cdc])
            .collect();
        let ident_numeric_range: Vec<AdjacencyKey> =
            ident_like.iter().chain(numeric.iter()).copied().chain([range]).collect();

        // previous key, following keys that need a comment, following keys that don't
        let rules: Vec<(AdjacencyKey, Vec<AdjacencyKey>, Vec<AdjacencyKey>)> = vec![
            (
                Kind(TokenType::Ident),
                thru_cdc.iter().copied().chain([Char(b'-'), Char(b'(')]).collect(),
                vec![],
            ),
            (Kind(TokenType::AtKeyword), thru_cdc.clone(), vec![Char(b'(')]),
            (Kind(TokenType::Hash), thru_cdc.clone(), vec![Char(b'(')]),
            (Kind(TokenType::Dimension), thru_cdc.clone(), vec![Char(b'(')]),
            (
                Char(b'#'),
                ident_numeric_range.iter().copied().chain([Char(b'-')]).collect(),
                vec![cdc, Char(b'(')],
            ),
            (Char(b'-'), ident_numeric_range.clone(), vec![cdc, Char(b'-'), Char(b'(')]),
            (
                Kind(TokenType::Number),
                ident_numeric_range.clone(),
                vec![cdc, Char(b'-'), Char(b'(')],
            ),
            (
                Char(b'@'),
                ident_like.iter().copied().chain([range, Char(b'-')]).collect(),
                numeric.iter().copied().chain([cdc]).collect(),
            ),
            (
                range,
                [Kind(TokenType::Ident), Kind(TokenType::Function)]
                    .into_iter()
                    .chain(numeric)
                    .chain([Char(b'?')])
                    .collect(),
                vec![range],
            ),
            (Char(b'.'), numeric.to_vec(), vec![]),
            (Char(b'+'), numeric.to_vec(), vec![]),
            (Char(b'$'), vec![Char(b'=')], vec![]),
            (Char(b'*'), vec![Char(b'=')], vec![]),
            (Char(b'^'), vec![Char(b'=')], vec![]),
            (Char(b'~'), vec![Char(b'=')], vec![]),
            (Char(b'|'), vec![Char(b'='), Char(b'|')], vec![]),
            (Char(b'/'), vec![Char(b'*')], vec![]),
        ];

        // Keys that never follow with a comment, whatever comes before
        let unlisted = [
            Kind(TokenType::Whitespace),
            Kind(TokenType::Comment),
            Kind(TokenType::QuotedString),
            Kind(TokenType::Hash),
            Kind(TokenType::AtKeyword),
            Kind(TokenType::Cdo),
            Kind(TokenType::Eof),
            Char(b':'),
            Char(b';'),
            Char(b','),
            Char(b'{'),
            Char(b'!'),
        ];

        for (prev, insert, no_insert) in &rules {
            for cur in insert {
                assert!(needs_comment(*prev, *cur), "{prev:?} before {cur:?} needs a comment");
            }
            for cur in no_insert.iter().chain(unlisted.iter()) {
                assert!(!needs_comment(*prev, *cur), "{prev:?} before {cur:?} needs no comment");
            }
        }

        // Keys without a row never need a comment after them
        let listed: Vec<AdjacencyKey> = rules.iter().map(|(prev, _, _)| *prev).collect();
        let followers: Vec<AdjacencyKey> = thru_cdc
            .iter()
            .copied()
            .chain([Char(b'-'), Char(b'('), Char(b'='), Char(b'|'), Char(b'*'), Char(b'?')])
            .collect();
        for prev in unlisted.iter().chain([Kind(TokenType::Percentage), Char(b'=')].iter()) {
            if listed.contains(prev) {
                continue;
            }
            for cur in &followers {
                assert!(!needs_comment(*prev, *cur), "{prev:?} before {cur:?} needs no comment");
            }
        }
    }

    #[test]
    fn render_tokens_stops_on_error() {
        let tokens = vec![
            ident(),
            Token::bad_url("x", ErrorExtra::Failure("bad url".into())),
            Token::ident("b"),
        ];

        let mut serializer = TokenSerializer::new(RenderConfig {
            stop_on_error: true,
            ..Default::default()
        });
        assert!(matches!(
            serializer.render_tokens(&tokens),
            Err(RenderError::StopToken {
                token_type: TokenType::BadUrl,
                ..
            })
        ));

        let mut serializer = TokenSerializer::default();
        assert_eq!(serializer.render_tokens(&tokens).unwrap(), "a/**/url(\"x\n)b");
    }

    #[test]
    fn first_token_has_no_comment() {
        let mut serializer = TokenSerializer::default();
        let mut output: Vec<u8> = Vec::new();

        let n = serializer.write_token(&mut output, &number()).unwrap();
        assert_eq!(n, 1);
        let n = serializer.write_token(&mut output, &number()).unwrap();
        assert_eq!(n, 5);
        assert_eq!(output, b"1/**/1");
    }

    #[test]
    fn reset_forgets_previous_token() {
        let mut serializer = TokenSerializer::default();

        assert_eq!(serializer.render_tokens(&[ident()]).unwrap(), "a");
        assert_eq!(serializer.render_tokens(&[ident()]).unwrap(), "/**/a");

        serializer.reset();
        assert_eq!(serializer.render_tokens(&[ident()]).unwrap(), "a");
    }

    #[test]
    fn comments_disabled() {
        let mut serializer = TokenSerializer::new(RenderConfig {
            insert_comments: false,
            ..Default::default()
        });

        assert_eq!(serializer.render_tokens(&[ident(), number(), ident()]).unwrap(), "a1a");
    }

    #[test]
    fn write_all_renders_error_tokens() {
        let tokens = vec![
            ident(),
            Token::bad_string("x", ErrorExtra::Failure("unexpected newline".into())),
            Token::eof(),
        ];

        let mut output: Vec<u8> = Vec::new();
        let n = TokenSerializer::default().write_all(&mut output, &tokens).unwrap();

        assert_eq!(n, 4);
        assert_eq!(output, b"a\"x\n");
    }

    #[test]
    fn write_all_stops_on_error() {
        let _ = SimpleLogger::new().init();

        let tokens = vec![
            ident(),
            Token::bad_string("x", ErrorExtra::Failure("unexpected newline".into())),
            Token::ident("b"),
        ];

        let mut serializer = TokenSerializer::new(RenderConfig {
            stop_on_error: true,
            ..Default::default()
        });
        let mut output: Vec<u8> = Vec::new();
        let result = serializer.write_all(&mut output, &tokens);

        match result {
            Err(RenderError::StopToken { token_type, message }) => {
                assert_eq!(token_type, TokenType::BadString);
                assert_eq!(message, "unexpected newline");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(output, b"a");
    }

    #[test]
    fn write_all_ends_at_eof() {
        let tokens = vec![ident(), Token::eof(), Token::ident("b")];

        let mut serializer = TokenSerializer::new(RenderConfig {
            stop_on_error: true,
            ..Default::default()
        });
        let mut output: Vec<u8> = Vec::new();
        let n = serializer.write_all(&mut output, &tokens).unwrap();

        assert_eq!(n, 1);
        assert_eq!(output, b"a");
    }
}
