//! HTTP client module
//!
//! Shared client for the providers that speak REST: base URL handling,
//! default headers, timeouts, and token bucket rate limiting.
//!
//! The client deliberately performs no retries. Retry-forever semantics
//! belong to the export engine, which wraps whole page fetches; a provider
//! failure here surfaces immediately and is retried at that level.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
