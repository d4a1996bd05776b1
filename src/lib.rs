//! newsbus - news item lookup over a message bus
//!
//! A stateless HTTP gateway forwards numeric identifiers as binary requests
//! over a request/reply bus; a storage worker answers them from a SQL table.
//!
//! ```text
//! [HTTP client] -> [gateway] -> [bridge] --(bus subject)--> [lookup handler] -> [store]
//!                      ^            |                              |
//!                      +------------+<---------(reply)-------------+
//! ```

pub mod bus;
pub mod codec;
pub mod config;
pub mod handlers;
pub mod proto;
pub mod storage;
pub mod termination;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
