//! JSON Pointer (RFC 6901) utilities for docbin.
//!
//! A pointer is parsed once into an owned token sequence ([`JsonPointer`])
//! and then walked token-by-token by the DOM resolver. The empty pointer
//! (`""`) addresses the whole document; every other pointer must be
//! absolute (start with `/`).
//!
//! # Example
//!
//! ```
//! use docbin_json_pointer::JsonPointer;
//!
//! let ptr = JsonPointer::parse("/foo/0/a~1b").unwrap();
//! assert_eq!(ptr.tokens(), ["foo", "0", "a/b"]);
//! assert_eq!(ptr.to_string(), "/foo/0/a~1b");
//! assert!(JsonPointer::parse("").unwrap().is_root());
//! ```

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("json pointer must be absolute or empty")]
    NotAbsolute,
}

/// Unescapes one pointer token.
///
/// Per RFC 6901, `~1` becomes `/` and `~0` becomes `~`.
pub fn unescape_token(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    token.replace("~1", "/").replace("~0", "~")
}

/// Escapes one pointer token.
///
/// Per RFC 6901, `~` becomes `~0` and `/` becomes `~1`.
pub fn escape_token(token: &str) -> String {
    if !token.contains('/') && !token.contains('~') {
        return token.to_string();
    }
    // Order matters: ~ must be escaped before /
    token.replace('~', "~0").replace('/', "~1")
}

/// Parses an array token into a concrete element index.
///
/// Accepts canonical decimals only: no sign, no leading zeros (except
/// `"0"` itself). The `-` append sentinel is not an index and is handled
/// by the caller.
pub fn array_index(token: &str) -> Option<i64> {
    let bytes = token.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return None;
    }
    if !bytes.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// A parsed JSON Pointer: an owned, ordered sequence of unescaped tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// Parses RFC 6901 pointer text.
    ///
    /// `""` parses to the root pointer. Anything else must start with
    /// `/`; each `/`-separated token is unescaped.
    pub fn parse(pointer: &str) -> Result<Self, PointerError> {
        if pointer.is_empty() {
            return Ok(Self { tokens: Vec::new() });
        }
        if !pointer.starts_with('/') {
            return Err(PointerError::NotAbsolute);
        }
        Ok(Self {
            tokens: pointer.split('/').skip(1).map(unescape_token).collect(),
        })
    }

    /// The root pointer (no tokens).
    pub fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Builds a pointer from already-unescaped tokens.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// True when this pointer addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Splits into (parent tokens, leaf token). `None` for the root.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((parent, last.as_str()))
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape_token(token))?;
        }
        Ok(())
    }
}
