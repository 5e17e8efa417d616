//! Change detection core.
//!
//! Everything in this module is synchronous and free of I/O:
//!
//! - [`text`]: normalisation, content hashing, and Jaccard similarity.
//! - [`menu_parser`]: structured menu extraction with a stable item key.
//! - [`classifier`]: pluggable change typing, severity, and summaries.
//! - [`detector`]: whole-page comparison of two snapshots.
//! - [`menu_diff`]: per-item comparison of two parsed menus.

pub mod classifier;
pub mod detector;
pub mod menu_diff;
pub mod menu_parser;
pub(crate) mod patterns;
pub mod text;

pub use classifier::{ChangeClassifier, KeywordClassifier, determine_severity};
pub use detector::{ChangeDetector, DEFAULT_SIMILARITY_THRESHOLD, detect_change};
pub use menu_diff::diff_menus;
pub use menu_parser::{generate_item_key, normalize_price, parse_menu};
pub use text::{content_hash, normalize_text, similarity};
