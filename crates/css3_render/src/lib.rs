//! Token model and serializer for [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/) tokens.
//!
//! Tokens are produced by a scanner elsewhere; this crate only writes them back as CSS source.
//! Single tokens render through their `Display` implementation, streams of tokens through a
//! [`TokenSerializer`], which makes sure the output reads back as the same token sequence.
pub mod errors;
pub mod escape;
mod render;
pub mod render_config;
pub mod serializer;
pub mod tokens;

pub use errors::{ParseError, RenderError, RenderResult};
pub use render_config::RenderConfig;
pub use serializer::{serialize, AdjacencyKey, TokenSerializer};
pub use tokens::{ErrorExtra, HashExtra, NumericExtra, RangeExtra, Token, TokenKind, TokenType};
