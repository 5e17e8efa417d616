//! Page snapshotting.
//!
//! [`SnapshotBuilder`] fetches a page through a [`PageFetcher`], extracts
//! its title and comparison text (plus parsed menu items on structured
//! menu pages), and returns an immutable [`crate::domain::Snapshot`].

pub mod builder;
pub mod extract;
pub mod fetcher;

pub use builder::{SnapshotBuilder, SnapshotOptions};
pub use fetcher::{HttpFetcher, PageFetcher};
