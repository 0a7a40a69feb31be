//! Dispatch infrastructure module
//!
//! Delivers finalized utterances to the remote endpoint over HTTP.

mod http;

pub use http::HttpDispatcher;
