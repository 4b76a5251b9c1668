//! Tests for provider contract types

use super::*;
use crate::report::Transaction;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Continuation Tests
// ============================================================================

#[test]
fn test_continuation_wraps_raw_token() {
    let token = Continuation::new("NextPartitionKey=1!8!MDA3;NextRowKey=1!4!ZGY-");
    assert_eq!(token.as_str(), "NextPartitionKey=1!8!MDA3;NextRowKey=1!4!ZGY-");
    assert_eq!(token.clone().into_inner(), token.as_str());
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct CursorState {
    wallet: usize,
    token: Option<String>,
}

#[test]
fn test_continuation_encode_decode() {
    let state = CursorState {
        wallet: 3,
        token: Some("abc".to_string()),
    };

    let encoded = Continuation::encode(&state).unwrap();
    let decoded: CursorState = encoded.decode().unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn test_continuation_decode_rejects_garbage() {
    let err = Continuation::new("%%% not base64 %%%")
        .decode::<CursorState>()
        .unwrap_err();
    assert!(err.to_string().contains("continuation"));

    // Valid base64, but not the expected shape
    let err = Continuation::new("eyJvdGhlciI6IDF9")
        .decode::<CursorState>()
        .unwrap_err();
    assert!(err.to_string().contains("malformed"));
}

// ============================================================================
// Page Tests
// ============================================================================

fn some_tx() -> Transaction {
    Transaction::deposit("BTC", "hash", Uuid::nil(), "addr")
}

#[test]
fn test_page_last() {
    let page = Page::last(vec![some_tx()]);
    assert!(page.is_last());
    assert_eq!(page.items.len(), 1);
}

#[test]
fn test_page_empty() {
    let page = Page::empty();
    assert!(page.is_last());
    assert!(page.items.is_empty());
}

#[test]
fn test_page_from_token() {
    let page = Page::from_token(vec![some_tx()], Some("next".to_string()));
    assert!(!page.is_last());
    assert_eq!(page.continuation.unwrap().as_str(), "next");

    let page = Page::from_token(Vec::new(), None);
    assert!(page.is_last());
}
