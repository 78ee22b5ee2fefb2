//! Single-flight extraction pass over every source and entry.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::core::{DiscoverySet, Entry, ReconcileSummary, reconcile};
use crate::error::{ExtractError, ExtractResult};
use crate::sources::TextSource;

/// Progress events emitted during [`Extractor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase<'a> {
    Started,
    /// A source is about to be discovered.
    Source(&'a str),
    Reconciling,
    Finished,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Reconcile in memory only; nothing is written.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    /// Distinct strings this source produced.
    pub found: usize,
    /// Of those, how many no earlier source had produced.
    pub new: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub title: String,
    pub path: PathBuf,
    pub summary: ReconcileSummary,
    pub saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub entries: Vec<EntryReport>,
    /// Size of the unioned discovery set.
    pub discovered: usize,
    pub dry_run: bool,
}

impl RunReport {
    /// True if any entry's key set changed (or would have, on a dry run).
    pub fn changed(&self) -> bool {
        self.entries.iter().any(|entry| entry.summary.changed())
    }
}

type Observer = Box<dyn Fn(RunPhase<'_>)>;

/// Owns the sources and entries of one project and runs extraction passes
/// over them, at most one at a time.
///
/// Lifecycle is `Idle -> Running -> Idle`. A pass either reconciles and
/// saves every changed entry or, if any source, entry load or staged write
/// fails, leaves every file on disk untouched. Changed entries are written
/// to temp files first and renamed into place only once all writes succeed;
/// a failed rename at that point can still leave earlier entries replaced.
pub struct Extractor<S> {
    sources: Vec<S>,
    entries: Mutex<Vec<Entry>>,
    running: AtomicBool,
    observer: Option<Observer>,
}

impl<S: TextSource> Extractor<S> {
    pub fn new(sources: Vec<S>, entries: Vec<Entry>) -> ExtractResult<Self> {
        if entries.is_empty() {
            return Err(ExtractError::NoEntriesConfigured);
        }
        Ok(Self {
            sources,
            entries: Mutex::new(entries),
            running: AtomicBool::new(false),
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: impl Fn(RunPhase<'_>) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one extraction pass.
    ///
    /// Fails with `AlreadyInProgress`, without side effects, while another
    /// pass on this extractor has not finished. Dropping the returned future
    /// releases the extractor.
    pub async fn run(&self, options: RunOptions) -> ExtractResult<RunReport> {
        let _guard = RunGuard::acquire(&self.running)?;
        self.notify(RunPhase::Started);

        let mut discovery = DiscoverySet::new();
        let mut sources = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            self.notify(RunPhase::Source(source.name()));
            let found = source.discover().await?;
            let count = found.len();
            let new = discovery.union_with(found);
            debug!(source = source.name(), found = count, new, "source discovered");
            sources.push(SourceReport {
                name: source.name().to_string(),
                found: count,
                new,
            });
        }

        self.notify(RunPhase::Reconciling);
        let entries = self.reconcile_entries(&discovery, options)?;

        let report = RunReport {
            sources,
            entries,
            discovered: discovery.len(),
            dry_run: options.dry_run,
        };
        info!(
            discovered = report.discovered,
            entries = report.entries.len(),
            changed = report.changed(),
            dry_run = options.dry_run,
            "extraction finished"
        );
        self.notify(RunPhase::Finished);
        Ok(report)
    }

    fn reconcile_entries(
        &self,
        discovery: &DiscoverySet,
        options: RunOptions,
    ) -> ExtractResult<Vec<EntryReport>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        for entry in entries.iter_mut() {
            entry.load()?;
        }

        let summaries: Vec<ReconcileSummary> = entries
            .iter_mut()
            .map(|entry| reconcile(entry.text_mut(), discovery))
            .collect();

        let staged = if options.dry_run {
            Vec::new()
        } else {
            entries
                .iter()
                .zip(&summaries)
                .filter(|(_, summary)| summary.changed())
                .map(|(entry, _)| entry.stage())
                .collect::<ExtractResult<Vec<_>>>()?
        };
        for save in staged {
            save.commit()?;
        }

        let mut reports = Vec::with_capacity(entries.len());
        for (entry, summary) in entries.iter().zip(summaries) {
            let saved = summary.changed() && !options.dry_run;
            info!(
                entry = entry.title(),
                added = summary.added,
                retained = summary.retained,
                pruned = summary.pruned,
                saved,
                "entry reconciled"
            );
            reports.push(EntryReport {
                title: entry.title().to_string(),
                path: entry.path().to_path_buf(),
                summary,
                saved,
            });
        }
        Ok(reports)
    }

    fn notify(&self, phase: RunPhase<'_>) {
        if let Some(observer) = &self.observer {
            observer(phase);
        }
    }

    /// Hand back the entries as of the last pass.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the running flag; clears it on every exit path.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ExtractResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExtractError::AlreadyInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
