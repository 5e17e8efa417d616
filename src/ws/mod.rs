//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The endpoint at `/ws` streams persisted monitoring results
//! ([`crate::domain::WatchEvent`]) to clients that subscribed to the
//! competitor concerned, or to `"*"`.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
