//! Artifact cache and the per-artifact fill engine.
//!
//! The cache is a flat directory of artifact files. Presence of
//! `<cache>/<artifact>` is the only test for completeness: entries are never
//! re-validated or overwritten, which keeps repeated runs free of network and
//! copy I/O.
//!
//! # Cache Location
//!
//! The `cache` setting names the directory. When unset it defaults to
//! `<temp-dir>/cxxpm`, see [`default_cache_dir`].
//!
//! # Partial Writes
//!
//! Fetches write to a hidden staging file next to the final entry and rename
//! it into place only after the whole artifact has been written and synced.
//! An interrupted download therefore never masquerades as a cached artifact.

mod config;
mod directory;
mod fill;

pub use config::default_cache_dir;
pub use directory::CacheDir;
pub use fill::{FetchOutcome, fill_cache};
