//! HTTP client for the Gemini `generateContent` endpoint.

mod client;

pub use client::*;
