//! loctext - localizable text extraction and dictionary reconciliation
//!
//! loctext collects every localizable string a project references, from an
//! out-of-process static-analysis scanner reached over a local IPC endpoint
//! and from in-process sources, then reconciles the union into per-language
//! JSON dictionaries. Existing translations survive for keys that are still
//! referenced; keys nothing references anymore are dropped.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Data model (discovery set, dictionaries, entries) and the reconciler
//! - `error`: Error taxonomy of an extraction pass
//! - `extractor`: Single-flight orchestration of one pass
//! - `ipc`: Endpoint, framing and channel used to talk to the scanner
//! - `logging`: Tracing subscriber setup
//! - `process`: Scanner process supervision
//! - `sources`: Text sources (scanner, assets, inline)

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extractor;
pub mod ipc;
pub mod logging;
pub mod process;
pub mod sources;
