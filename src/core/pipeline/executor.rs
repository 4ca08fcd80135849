//! Pipeline execution implementation.

use super::cancel::{CancelSignal, CancellationToken};
use crate::core::cluster::{ClusterConfig, Clusterer, FileCluster};
use crate::core::duplicates::{DuplicateFinder, DuplicateGroup};
use crate::core::relocate::{RelocationFailure, RelocationReport, Relocator};
use crate::core::scanner::{FileDescriptor, ScanConfig, TreeScanner};
use crate::error::{PhotoClusterError, Result};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
    CANCEL_MARKER, FINISH_MARKER, INVALID_MARKER,
};
use chrono::Duration;
use serde::Serialize;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{info, warn};

/// Indentation used for member lines under a group or cluster header
const MEMBER_PREFIX: &str = "         Path: ";

/// Result of a completed run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    /// The scanned directory
    pub root: PathBuf,
    /// Every file found, in walk order
    pub files: Vec<FileDescriptor>,
    /// Groups of files sharing a name
    pub duplicates: Vec<DuplicateGroup>,
    /// Number of files with a media extension
    pub media_files: usize,
    /// Number of files left out of clustering
    pub non_media_files: usize,
    /// Media clusters in ascending date order
    pub clusters: Vec<FileCluster>,
    /// Present when files were actually moved
    pub relocation: Option<RelocationReport>,
    /// Entries skipped while scanning (non-fatal)
    pub scan_errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_files: self.files.len(),
            duplicate_groups: self.duplicates.len(),
            media_files: self.media_files,
            non_media_files: self.non_media_files,
            clusters: self.clusters.len(),
            files_moved: self
                .relocation
                .as_ref()
                .map(|r| r.files_moved())
                .unwrap_or(0),
            move_failures: self
                .relocation
                .as_ref()
                .map(|r| r.failure_count())
                .unwrap_or(0),
            scan_errors: self.scan_errors.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// How a run ended
#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(PipelineResult),
    /// Cancelled during the scan; no later stage ran
    Cancelled { files_scanned: usize },
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Move files into their cluster directories
    pub relocate: bool,
    /// Where cluster directories are created (defaults to `root`)
    pub destination: Option<PathBuf>,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// Clustering configuration
    pub cluster_config: ClusterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            relocate: false,
            destination: None,
            scan_config: ScanConfig::default(),
            cluster_config: ClusterConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Move files instead of only reporting
    pub fn relocate(mut self, relocate: bool) -> Self {
        self.config.relocate = relocate;
        self
    }

    /// Create cluster directories somewhere other than the scan root
    pub fn destination(mut self, destination: Option<PathBuf>) -> Self {
        self.config.destination = destination;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Largest gap between neighbouring files within one cluster
    pub fn max_gap(mut self, gap: Duration) -> Self {
        self.config.cluster_config.max_gap = gap;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The scan → duplicates → cluster → relocate pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run to completion on the current thread without events
    pub fn run(&self) -> Result<PipelineOutcome> {
        self.run_with_events(&null_sender(), &CancellationToken::new())
    }

    /// Run on the current thread, reporting on `events` and polling `cancel`
    /// throughout the scan.
    pub fn run_with_events(
        &self,
        events: &EventSender,
        cancel: &dyn CancelSignal,
    ) -> Result<PipelineOutcome> {
        let start_time = Instant::now();

        let root = match TreeScanner::validate_root(&self.config.root) {
            Ok(root) => root,
            Err(e) => return Err(fail(events, e.into())),
        };

        // Absolute like the scanned paths, so files already in place compare equal
        let destination = match &self.config.destination {
            Some(destination) => match std::path::absolute(destination) {
                Ok(destination) => destination,
                Err(e) => {
                    let error = PhotoClusterError::Config(format!(
                        "Invalid destination {}: {}",
                        destination.display(),
                        e
                    ));
                    return Err(fail(events, error));
                }
            },
            None => root.clone(),
        };

        info!(root = %root.display(), relocate = self.config.relocate, "pipeline started");
        events.send(Event::Pipeline(PipelineEvent::Started { root: root.clone() }));

        // Phase 1: Scanning (the only cancellable phase)
        enter(events, PipelinePhase::Scanning);
        let scanner = TreeScanner::new(self.config.scan_config.clone());
        let scan = match scanner.scan_with_events(&root, events, cancel) {
            Ok(scan) => scan,
            Err(e) => return Err(fail(events, e.into())),
        };

        if scan.cancelled {
            let files_scanned = scan.files.len();
            info!(files_scanned, "pipeline cancelled");
            events.line(CANCEL_MARKER);
            events.send(Event::Pipeline(PipelineEvent::Cancelled { files_scanned }));
            return Ok(PipelineOutcome::Cancelled { files_scanned });
        }

        let files = scan.files;
        let scan_errors: Vec<String> = scan.errors.iter().map(|e| e.to_string()).collect();
        events.line(format!("Detected total {} files", files.len()));

        // Phase 2: Duplicate names
        enter(events, PipelinePhase::DuplicateAnalysis);
        let duplicates = DuplicateFinder::find(&files);
        report_duplicates(events, &duplicates);

        // Phase 3: Media / non-media split
        enter(events, PipelinePhase::Classifying);
        let (mut media, other): (Vec<FileDescriptor>, Vec<FileDescriptor>) =
            files.iter().cloned().partition(|f| f.is_media());
        media.sort_by_key(|f| f.date());
        events.line(format!("Detected {} media files", media.len()));
        events.line(format!("Detected {} non-media files", other.len()));

        // Phase 4: Clustering
        enter(events, PipelinePhase::Clustering);
        let clusters = Clusterer::new(self.config.cluster_config.clone()).cluster(&media);

        // Phase 5: Report clusters, moving files when asked to
        let relocator = Relocator::new(destination);
        let mut relocation = if self.config.relocate {
            enter(events, PipelinePhase::Relocating);
            Some(RelocationReport::default())
        } else {
            None
        };

        for cluster in &clusters {
            let directory = relocator.directory_for(cluster);
            events.line_with_path(format!("Cluster: {}", directory.display()), &directory);
            for file in &cluster.files {
                events.line_with_path(
                    format!("{}{}", MEMBER_PREFIX, file.path().display()),
                    file.path(),
                );
            }

            if let Some(report) = relocation.as_mut() {
                match relocator.relocate(cluster, events) {
                    Ok(moved) => report.clusters.push(moved),
                    Err(e) => {
                        warn!("{}", e);
                        events.line_with_path(format!("   {}", e), &directory);
                        report.unplaced.extend(
                            cluster
                                .files
                                .iter()
                                .map(|f| RelocationFailure::new(f.path().to_path_buf(), &e)),
                        );
                    }
                }
            }
        }

        let result = PipelineResult {
            root,
            files,
            duplicates,
            media_files: media.len(),
            non_media_files: other.len(),
            clusters,
            relocation,
            scan_errors,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            files = result.files.len(),
            clusters = result.clusters.len(),
            "pipeline finished"
        );
        events.line(FINISH_MARKER);
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary(),
        }));

        Ok(PipelineOutcome::Completed(result))
    }

    /// Run on a dedicated worker thread.
    ///
    /// The returned handle is the control side: it can cancel the run,
    /// poll for liveness and collect the outcome.
    pub fn spawn(self, events: EventSender) -> Result<PipelineHandle> {
        let token = CancellationToken::new();
        let worker_token = token.clone();

        let thread = thread::Builder::new()
            .name("photo-cluster-worker".to_string())
            .spawn(move || self.run_with_events(&events, &worker_token))
            .map_err(|e| PhotoClusterError::Worker(e.to_string()))?;

        Ok(PipelineHandle { token, thread })
    }
}

/// Control-side handle to a pipeline running on its worker thread
pub struct PipelineHandle {
    token: CancellationToken,
    thread: JoinHandle<Result<PipelineOutcome>>,
}

impl PipelineHandle {
    /// Ask the worker to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A clone of the cancel flag, e.g. for a Ctrl-C handler
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker and return its outcome
    pub fn join(self) -> Result<PipelineOutcome> {
        match self.thread.join() {
            Ok(outcome) => outcome,
            Err(_) => Err(PhotoClusterError::Worker(
                "pipeline worker panicked".to_string(),
            )),
        }
    }
}

fn enter(events: &EventSender, phase: PipelinePhase) {
    info!(%phase, "entering phase");
    events.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
}

/// Emit the validation marker and its detail for a run that could not start
fn fail(events: &EventSender, error: PhotoClusterError) -> PhotoClusterError {
    let message = match &error {
        PhotoClusterError::Scan(scan) => scan.to_string(),
        other => other.to_string(),
    };
    warn!("{}", message);
    events.line(INVALID_MARKER);
    events.line(message.clone());
    events.send(Event::Pipeline(PipelineEvent::Error { message }));
    error
}

fn report_duplicates(events: &EventSender, duplicates: &[DuplicateGroup]) {
    if duplicates.is_empty() {
        events.line("No duplicates found");
        return;
    }

    for group in duplicates {
        events.line(format!("Duplicate file: {}", group.name()));
        for file in &group.files {
            events.line_with_path(
                format!("{}{}", MEMBER_PREFIX, file.path().display()),
                file.path(),
            );
        }
    }
}
