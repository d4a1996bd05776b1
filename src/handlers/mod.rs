//! Request handling on both sides of the bus.
//!
//! - `lookup`: storage tier, answers lookup requests from the store
//! - `bridge`: gateway tier, turns an identifier into a bus round trip
//! - `gateway`: HTTP surface in front of the bridge

pub mod bridge;
pub mod gateway;
pub mod lookup;

pub use bridge::{Bridge, LookupOutcome};
pub use lookup::{HandlerState, LookupHandler};
