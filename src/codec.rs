//! Encoding and validation of lookup messages.
//!
//! Encoding an in-memory value into a growable buffer cannot fail, so the
//! encoders return [`Bytes`] directly. Decoding is where corruption or a
//! protocol mismatch between tiers shows up; callers treat every
//! [`CodecError`] as a local fault, never as a business outcome.

use bytes::Bytes;
use prost::Message;

use crate::proto::{LookupReply, LookupRequest, NewsItem, ReplyStatus};

/// Errors that can occur while decoding lookup messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed message: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("unknown reply status: {0}")]
    UnknownStatus(i32),

    #[error("reply status FOUND carries no item")]
    MissingItem,

    #[error("reply status {0:?} must not carry an item")]
    UnexpectedItem(ReplyStatus),

    #[error("reply status FOUND must not carry an error: {0}")]
    UnexpectedError(String),
}

/// Validated reply to a lookup.
///
/// Exactly one outcome per reply; an item and an error can never travel
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The item exists.
    Found(NewsItem),
    /// No item with the requested identifier.
    NotFound,
    /// The store failed; the message is for logs, not for end users.
    Internal(String),
}

impl From<&Reply> for LookupReply {
    fn from(reply: &Reply) -> Self {
        match reply {
            Reply::Found(item) => LookupReply {
                status: ReplyStatus::Found.into(),
                item: Some(item.clone()),
                error: String::new(),
            },
            Reply::NotFound => LookupReply {
                status: ReplyStatus::NotFound.into(),
                item: None,
                error: String::new(),
            },
            Reply::Internal(message) => LookupReply {
                status: ReplyStatus::Internal.into(),
                item: None,
                error: message.clone(),
            },
        }
    }
}

impl TryFrom<LookupReply> for Reply {
    type Error = CodecError;

    fn try_from(reply: LookupReply) -> Result<Self, Self::Error> {
        let status = ReplyStatus::try_from(reply.status)
            .map_err(|_| CodecError::UnknownStatus(reply.status))?;

        match status {
            ReplyStatus::Unspecified => Err(CodecError::UnknownStatus(reply.status)),
            ReplyStatus::Found => {
                if !reply.error.is_empty() {
                    return Err(CodecError::UnexpectedError(reply.error));
                }
                reply.item.map(Reply::Found).ok_or(CodecError::MissingItem)
            }
            ReplyStatus::NotFound | ReplyStatus::Internal if reply.item.is_some() => {
                Err(CodecError::UnexpectedItem(status))
            }
            ReplyStatus::NotFound => Ok(Reply::NotFound),
            ReplyStatus::Internal => Ok(Reply::Internal(reply.error)),
        }
    }
}

/// Encode a lookup request for `id`.
pub fn encode_request(id: i64) -> Bytes {
    LookupRequest { id }.encode_to_vec().into()
}

/// Decode a lookup request, returning the requested identifier.
pub fn decode_request(buf: &[u8]) -> Result<i64, CodecError> {
    Ok(LookupRequest::decode(buf)?.id)
}

/// Encode a reply.
pub fn encode_reply(reply: &Reply) -> Bytes {
    LookupReply::from(reply).encode_to_vec().into()
}

/// Decode and validate a reply.
pub fn decode_reply(buf: &[u8]) -> Result<Reply, CodecError> {
    Reply::try_from(LookupReply::decode(buf)?)
}
