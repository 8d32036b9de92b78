//! Error results that can be returned from the css3 token serializer
use crate::tokens::TokenType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Syntax error recorded by the scanner on the token it produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Token type that was being scanned when the error occurred
    pub token_type: TokenType,
    /// Error message
    pub message: String,
    /// Position (0-based) of the error in the input stream
    pub loc: usize,
}

impl ParseError {
    #[must_use]
    pub fn new(token_type: TokenType, message: &str, loc: usize) -> Self {
        Self {
            token_type,
            message: message.to_string(),
            loc,
        }
    }
}

/// Errors that can occur while serializing a token stream
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stop token {token_type}: {message}")]
    StopToken { token_type: TokenType, message: String },
}

pub type RenderResult<T> = Result<T, RenderError>;
