//! Core data model and the reconciliation algorithm.
//!
//! ## Module Structure
//!
//! - `text`: case folding and the per-pass `DiscoverySet`
//! - `dictionary`: case-insensitive, order-preserving `TextDictionary`
//! - `reconcile`: merges a discovery set into a dictionary
//! - `entry`: one persisted per-language dictionary file
//! - `catalog`: loaded entries addressable by title
//! - `document`: the scanner's wire payload

pub mod catalog;
pub mod dictionary;
pub mod document;
pub mod entry;
pub mod reconcile;
pub mod text;

pub use catalog::Catalog;
pub use dictionary::{TextDictionary, missing_sentinel};
pub use document::Document;
pub use entry::{Entry, StagedSave};
pub use reconcile::{ReconcileSummary, reconcile};
pub use text::{DiscoverySet, fold_case};
