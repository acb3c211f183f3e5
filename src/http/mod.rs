//! HTTP/1.1 protocol implementation.
//!
//! # Architecture
//!
//! - **`headers`**: Case-insensitive header map with a line-at-a-time parser
//! - **`request`**: Request data model and parser states
//! - **`parser`**: Incremental request parser fed with raw bytes
//! - **`response`**: Status codes and default response headers
//! - **`writer`**: Ordered response writer, fixed-length or chunked bodies
//! - **`connection`**: Read loop and the per-connection task
//!
//! # Request Parser States
//!
//! ```text
//!        ┌──────────────────┐
//!        │   Initialized    │ ← Waiting for a full request line
//!        └──────┬───────────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingHeaders  │ ← One header line per step
//!        └──────┬───────────┘
//!               │ Blank line
//!               ├─ No Content-Length → Done
//!               ▼
//!        ┌──────────────────┐
//!        │   ParsingBody    │ ← Until Content-Length bytes arrive
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │       Done       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use httpwire::http::request::{Method, Request};
//!
//! let mut req = Request::new();
//! let n = req.feed(b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//!
//! assert_eq!(n, 41);
//! assert!(req.is_done());
//! assert_eq!(req.method(), Method::GET);
//! assert_eq!(req.target(), "/coffee");
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
