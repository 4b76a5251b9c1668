//! Provider contract types
//!
//! A `Continuation` is an opaque token meaningful only to the provider that
//! issued it; the engine stores and echoes it back without interpretation.
//! A `Page` is one batch of normalized transactions plus the token for the
//! next fetch, or `None` when the source is exhausted.

use crate::error::{Error, Result};
use crate::report::Transaction;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Opaque continuation token for resuming a paginated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation(String);

impl Continuation {
    /// Wrap a raw token issued by a source
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for echoing back to the source
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the raw token
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Encode provider-private cursor state as a token.
    ///
    /// Providers that track more than a single upstream token (e.g. a wallet
    /// index plus an inner continuation) serialize that state here; the
    /// result stays opaque to the engine.
    pub fn encode<T: Serialize>(state: &T) -> Result<Self> {
        let json = serde_json::to_vec(state)?;
        Ok(Self(BASE64.encode(json)))
    }

    /// Decode a token produced by [`Continuation::encode`]
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let json = BASE64
            .decode(&self.0)
            .map_err(|e| Error::continuation(format!("not valid base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| Error::continuation(format!("malformed cursor state: {e}")))
    }
}

impl std::fmt::Display for Continuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One batch of transactions plus the token for the next fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Transactions in source order; may be empty
    pub items: Vec<Transaction>,
    /// Token for the next page, or `None` when exhausted
    pub continuation: Option<Continuation>,
}

impl Page {
    /// Create a page with a continuation
    pub fn new(items: Vec<Transaction>, continuation: Option<Continuation>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// Create the terminal page of a sequence
    pub fn last(items: Vec<Transaction>) -> Self {
        Self {
            items,
            continuation: None,
        }
    }

    /// Create an empty terminal page
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Create a page from a raw token as returned by a source
    pub fn from_token(items: Vec<Transaction>, token: Option<String>) -> Self {
        Self {
            items,
            continuation: token.map(Continuation::new),
        }
    }

    /// Check whether this is the last page
    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}
