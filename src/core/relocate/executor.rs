//! Executes cluster moves.

use super::{ClusterRelocation, MovedFile, RelocationFailure};
use crate::core::cluster::FileCluster;
use crate::error::RelocateError;
use crate::events::EventSender;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of a single successful `move_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Source and destination are the same path
    AlreadyInPlace,
}

/// Moves the members of each cluster into `destination_root/<dir_name>`
pub struct Relocator {
    destination_root: PathBuf,
}

impl Relocator {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
        }
    }

    /// Directory a cluster's files end up in
    pub fn directory_for(&self, cluster: &FileCluster) -> PathBuf {
        self.destination_root.join(&cluster.dir_name)
    }

    /// Create the cluster directory and move every member into it.
    ///
    /// Only a failure to create the directory is returned as `Err`; per-file
    /// failures are reported on `events` and collected in the result.
    pub fn relocate(
        &self,
        cluster: &FileCluster,
        events: &EventSender,
    ) -> Result<ClusterRelocation, RelocateError> {
        let directory = self.directory_for(cluster);
        let created_directory = !directory.is_dir();

        fs::create_dir_all(&directory).map_err(|source| RelocateError::CreateDirectory {
            path: directory.clone(),
            source,
        })?;

        let mut report = ClusterRelocation {
            directory: directory.clone(),
            created_directory,
            ..Default::default()
        };

        for file in &cluster.files {
            let destination = directory.join(file.path().file_name().unwrap_or_default());

            match move_file(file.path(), &destination) {
                Ok(MoveOutcome::Moved) => report.moved.push(MovedFile {
                    from: file.path().to_path_buf(),
                    to: destination,
                }),
                Ok(MoveOutcome::AlreadyInPlace) => {
                    report.already_in_place.push(file.path().to_path_buf())
                }
                Err(e) => {
                    warn!("{}", e);
                    events.line_with_path(format!("   Move failed: {}", e), file.path());
                    report
                        .failures
                        .push(RelocationFailure::new(file.path().to_path_buf(), &e));
                }
            }
        }

        Ok(report)
    }
}

/// Move one file, refusing to replace anything already at `destination`.
///
/// Falls back to copy + size check + delete only when the rename crosses
/// filesystems. Any other rename error is returned as is.
pub fn move_file(source: &Path, destination: &Path) -> Result<MoveOutcome, RelocateError> {
    if source == destination {
        return Ok(MoveOutcome::AlreadyInPlace);
    }

    if !source.exists() {
        return Err(RelocateError::SourceMissing {
            path: source.to_path_buf(),
        });
    }

    if destination.exists() {
        return Err(RelocateError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(MoveOutcome::Moved),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(error = %e, "rename crosses filesystems, copying instead");
            copy_then_remove(source, destination, |path| fs::remove_file(path))?;
            Ok(MoveOutcome::Moved)
        }
        Err(e) => Err(RelocateError::MoveFailed {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy, verify, then delete the source with `remove_source`.
///
/// On every failure the copy is removed again, so the file ends up in
/// exactly one place.
fn copy_then_remove(
    source: &Path,
    destination: &Path,
    remove_source: impl FnOnce(&Path) -> io::Result<()>,
) -> Result<(), RelocateError> {
    let failed = |e: io::Error| RelocateError::MoveFailed {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    let expected = fs::metadata(source).map_err(failed)?.len();

    if let Err(e) = fs::copy(source, destination) {
        let _ = fs::remove_file(destination);
        return Err(failed(e));
    }

    let actual = match fs::metadata(destination) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            let _ = fs::remove_file(destination);
            return Err(failed(e));
        }
    };
    if actual != expected {
        let _ = fs::remove_file(destination);
        return Err(RelocateError::VerificationFailed {
            path: source.to_path_buf(),
            expected,
            actual,
        });
    }

    if let Err(e) = remove_source(source) {
        warn!(path = %source.display(), "source could not be removed, discarding copy");
        let _ = fs::remove_file(destination);
        return Err(failed(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cluster::Clusterer;
    use crate::core::scanner::FileDescriptor;
    use crate::core::test_support::base_time;
    use crate::core::timestamp::DateSource;
    use crate::events::{line_texts, null_sender, EventChannel};
    use chrono::Duration;
    use tempfile::TempDir;

    fn real_file(dir: &Path, name: &str, hours: i64) -> FileDescriptor {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        FileDescriptor::new(
            path,
            base_time() + Duration::hours(hours),
            DateSource::FileSystem,
        )
    }

    fn single_cluster(files: Vec<FileDescriptor>) -> FileCluster {
        let mut clusters = Clusterer::default().cluster(&files);
        assert_eq!(clusters.len(), 1);
        clusters.remove(0)
    }

    #[test]
    fn move_file_moves() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, b"test content").unwrap();

        assert_eq!(move_file(&source, &destination).unwrap(), MoveOutcome::Moved);
        assert!(!source.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"test content");
    }

    #[test]
    fn move_file_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, b"new").unwrap();
        fs::write(&destination, b"old").unwrap();

        let result = move_file(&source, &destination);

        assert!(matches!(result, Err(RelocateError::DestinationExists { .. })));
        assert_eq!(fs::read(&source).unwrap(), b"new");
        assert_eq!(fs::read(&destination).unwrap(), b"old");
    }

    #[test]
    fn move_file_reports_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = move_file(
            &temp_dir.path().join("gone.jpg"),
            &temp_dir.path().join("dest.jpg"),
        );
        assert!(matches!(result, Err(RelocateError::SourceMissing { .. })));
    }

    #[test]
    fn rename_failure_is_not_retried_as_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("missing").join("a.jpg");
        fs::write(&source, b"x").unwrap();

        let result = move_file(&source, &destination);

        assert!(matches!(result, Err(RelocateError::MoveFailed { .. })));
        assert!(source.exists());
        assert!(!destination.exists());
    }

    #[test]
    fn copy_fallback_moves_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, b"test content").unwrap();

        copy_then_remove(&source, &destination, |path| fs::remove_file(path)).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"test content");
    }

    #[test]
    fn copy_fallback_discards_copy_when_source_stays() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.jpg");
        let destination = temp_dir.path().join("b.jpg");
        fs::write(&source, b"test content").unwrap();

        let result = copy_then_remove(&source, &destination, |_| {
            Err(io::Error::from(ErrorKind::PermissionDenied))
        });

        assert!(matches!(result, Err(RelocateError::MoveFailed { .. })));
        assert_eq!(fs::read(&source).unwrap(), b"test content");
        assert!(!destination.exists());
    }

    #[test]
    fn move_onto_itself_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.jpg");
        fs::write(&path, b"x").unwrap();

        assert_eq!(move_file(&path, &path).unwrap(), MoveOutcome::AlreadyInPlace);
        assert!(path.exists());
    }

    #[test]
    fn relocate_creates_directory_and_moves_members() {
        let temp_dir = TempDir::new().unwrap();
        let cluster = single_cluster(vec![
            real_file(temp_dir.path(), "a.jpg", 0),
            real_file(temp_dir.path(), "b.jpg", 2),
        ]);

        let relocator = Relocator::new(temp_dir.path());
        let report = relocator.relocate(&cluster, &null_sender()).unwrap();

        let directory = temp_dir.path().join("2024-01-15");
        assert_eq!(report.directory, directory);
        assert!(report.created_directory);
        assert_eq!(report.moved.len(), 2);
        assert!(directory.join("a.jpg").exists());
        assert!(directory.join("b.jpg").exists());
        assert!(!temp_dir.path().join("a.jpg").exists());
    }

    #[test]
    fn relocate_reuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("2024-01-15")).unwrap();
        let cluster = single_cluster(vec![real_file(temp_dir.path(), "a.jpg", 0)]);

        let report = Relocator::new(temp_dir.path())
            .relocate(&cluster, &null_sender())
            .unwrap();

        assert!(!report.created_directory);
        assert_eq!(report.moved.len(), 1);
    }

    #[test]
    fn one_collision_does_not_stop_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("2024-01-15");
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join("a.jpg"), b"already here").unwrap();

        let cluster = single_cluster(vec![
            real_file(temp_dir.path(), "a.jpg", 0),
            real_file(temp_dir.path(), "b.jpg", 1),
        ]);

        let (sender, receiver) = EventChannel::new();
        let report = Relocator::new(temp_dir.path())
            .relocate(&cluster, &sender)
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, temp_dir.path().join("a.jpg"));
        assert_eq!(report.moved.len(), 1);
        assert!(directory.join("b.jpg").exists());
        assert!(temp_dir.path().join("a.jpg").exists());

        let lines = line_texts(&receiver.drain());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Move failed"));
    }

    #[test]
    fn files_already_in_their_cluster_stay_put() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("2024-01-15");
        fs::create_dir_all(&directory).unwrap();
        let cluster = single_cluster(vec![real_file(&directory, "a.jpg", 0)]);

        let report = Relocator::new(temp_dir.path())
            .relocate(&cluster, &null_sender())
            .unwrap();

        assert_eq!(report.already_in_place, vec![directory.join("a.jpg")]);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn directory_creation_failure_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // A file where the destination root should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let cluster = single_cluster(vec![real_file(temp_dir.path(), "a.jpg", 0)]);

        let result = Relocator::new(&blocker).relocate(&cluster, &null_sender());

        assert!(matches!(result, Err(RelocateError::CreateDirectory { .. })));
        assert!(temp_dir.path().join("a.jpg").exists());
    }
}
