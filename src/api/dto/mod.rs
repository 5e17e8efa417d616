//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Request fields are optional so
//! that validation failures become 400 responses with a clear message
//! instead of a deserialization rejection.

pub mod common_dto;
pub mod monitoring_dto;
pub mod stats_dto;

pub use common_dto::*;
pub use monitoring_dto::*;
pub use stats_dto::*;
