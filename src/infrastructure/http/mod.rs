//! HTTP transport to the upstream API.

pub mod client;

pub use client::{HttpTransport, API_KEY_HEADER};
