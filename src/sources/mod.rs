//! Text sources contribute candidate strings to an extraction pass.
//!
//! The set of sources is static: [`sources_from_config`] declares them in a
//! fixed order (scanner, assets, inline) and the orchestrator runs them one
//! after another. In-process sources are synchronous and dispatched through
//! [`CollectText`]; the out-of-process scanner is the only one that suspends.

mod assets;
mod inline;
mod scanner;

use std::path::Path;

use enum_dispatch::enum_dispatch;

pub use assets::{AssetSource, scan_asset_files};
pub use inline::InlineSource;
pub use scanner::ScannerSource;

use crate::config::Config;
use crate::core::DiscoverySet;
use crate::error::{ExtractError, ExtractResult};

/// Capability "produce a set of candidate strings".
#[allow(async_fn_in_trait)]
pub trait TextSource {
    fn name(&self) -> &str;

    async fn discover(&self) -> ExtractResult<DiscoverySet>;
}

/// Synchronous in-process collection.
#[enum_dispatch]
pub trait CollectText {
    fn name(&self) -> &str;

    fn collect(&self) -> anyhow::Result<DiscoverySet>;
}

#[enum_dispatch(CollectText)]
#[derive(Debug)]
pub enum InProcessSource {
    Assets(AssetSource),
    Inline(InlineSource),
}

#[derive(Debug)]
pub enum Source {
    Scanner(ScannerSource),
    InProcess(InProcessSource),
}

impl TextSource for Source {
    fn name(&self) -> &str {
        match self {
            Source::Scanner(scanner) => scanner.name(),
            Source::InProcess(source) => CollectText::name(source),
        }
    }

    async fn discover(&self) -> ExtractResult<DiscoverySet> {
        match self {
            Source::Scanner(scanner) => scanner.discover().await,
            Source::InProcess(source) => source.collect().map_err(|e| ExtractError::Source {
                name: CollectText::name(source).to_string(),
                source: e,
            }),
        }
    }
}

impl From<ScannerSource> for Source {
    fn from(scanner: ScannerSource) -> Self {
        Source::Scanner(scanner)
    }
}

impl From<AssetSource> for Source {
    fn from(assets: AssetSource) -> Self {
        Source::InProcess(assets.into())
    }
}

impl From<InlineSource> for Source {
    fn from(inline: InlineSource) -> Self {
        Source::InProcess(inline.into())
    }
}

/// Build the source list for a project rooted at `root`.
///
/// Order is fixed: scanner, assets, inline texts. `use_scanner = false`
/// leaves the scanner out even when it is configured.
pub fn sources_from_config(config: &Config, root: &Path, use_scanner: bool) -> Vec<Source> {
    let mut sources = Vec::new();

    if let Some(scanner) = config.scanner.as_ref().filter(|_| use_scanner) {
        sources.push(ScannerSource::from_config(scanner, root).into());
    }
    if let Some(assets) = &config.assets {
        sources.push(AssetSource::from_config(assets, root).into());
    }
    if !config.texts.is_empty() {
        sources.push(InlineSource::new(config.texts.clone()).into());
    }

    sources
}
