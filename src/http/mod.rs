//! HTTP transport layer: `StreamHttp` opens the NDJSON body stream.

pub mod client;

pub use client::StreamHttp;
