//! Aggregates encode/decode benchmark results per category, relates every
//! algorithm to a baseline and reports the outcome as text tables and chart
//! series.

pub mod aggregate;
pub mod align;
pub mod chart;
pub mod compare;
pub mod config;
pub mod error;
pub mod group;
pub mod input;
pub mod percentage;
pub mod pipeline;
pub mod record;
pub mod report;

pub use error::{Error, LoadError, Mismatch};
pub use pipeline::{Pipeline, Report, Settings};
pub use record::{OperationKind, RawEntry, Record};

/// Insertion-ordered map; every stage reports in first-seen order.
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, xxhash_rust::xxh3::Xxh3Builder>;
