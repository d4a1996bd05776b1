//! Wire messages exchanged on the lookup subject.
//!
//! The structs are declared with prost derives directly rather than
//! generated from a `.proto` file, so building needs no `protoc`. The
//! equivalent schema:
//!
//! ```proto
//! syntax = "proto3";
//! package newsbus;
//!
//! message LookupRequest { int64 id = 1; }
//!
//! message NewsItem {
//!   int64 id = 1;
//!   string header = 2;
//!   string data = 3;
//! }
//!
//! enum ReplyStatus {
//!   REPLY_STATUS_UNSPECIFIED = 0;
//!   REPLY_STATUS_FOUND = 1;
//!   REPLY_STATUS_NOT_FOUND = 2;
//!   REPLY_STATUS_INTERNAL = 3;
//! }
//!
//! message LookupReply {
//!   ReplyStatus status = 1;
//!   NewsItem item = 2;
//!   string error = 3;
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Request for a single news item.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct LookupRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

/// One stored news item.
///
/// Also the JSON body the gateway returns, hence the serde field names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
pub struct NewsItem {
    #[prost(int64, tag = "1")]
    #[serde(rename = "ID")]
    pub id: i64,
    #[prost(string, tag = "2")]
    #[serde(rename = "Header")]
    pub header: String,
    #[prost(string, tag = "3")]
    #[serde(rename = "Data")]
    pub data: String,
}

/// Outcome tag carried by every reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ReplyStatus {
    Unspecified = 0,
    Found = 1,
    NotFound = 2,
    Internal = 3,
}

/// Reply to a [`LookupRequest`].
#[derive(Clone, PartialEq, prost::Message)]
pub struct LookupReply {
    #[prost(enumeration = "ReplyStatus", tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub item: Option<NewsItem>,
    #[prost(string, tag = "3")]
    pub error: String,
}
