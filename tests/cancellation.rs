//! Cancellation is a normal terminal state, not an error.

use std::fs;
use std::sync::Mutex;

use dupscan::{CancelToken, FsDocumentSource, ScanConfig, ScanPhase, ScanProgress, Scanner};

const BODY: &str = "the quick brown fox jumps over the lazy dog while the \
    patient grey owl watches from the old oak tree near the river bend";

#[test]
fn cancelling_mid_compare_yields_empty_duplicates_with_counts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), BODY).unwrap();
    fs::write(dir.path().join("b.md"), BODY).unwrap();
    fs::write(dir.path().join("c.md"), BODY.replacen("fox", "hare", 1)).unwrap();

    let source = FsDocumentSource::new(dir.path());
    let scanner = Scanner::new(ScanConfig::new().with_seed(42)).unwrap();

    let cancel = CancelToken::new();
    let phases: Mutex<Vec<ScanPhase>> = Mutex::new(Vec::new());
    let on_progress = |progress: ScanProgress| {
        if progress.phase == ScanPhase::Comparing {
            cancel.cancel();
        }
        phases.lock().unwrap().push(progress.phase);
    };

    let result = scanner.scan(&source, &cancel, Some(&on_progress)).unwrap();

    assert!(result.cancelled);
    assert!(result.duplicates.is_empty());
    assert_eq!(result.scanned_count, 3);
    assert_eq!(result.skipped_count, 0);

    let phases = phases.into_inner().unwrap();
    assert_eq!(*phases.last().unwrap(), ScanPhase::Cancelled);
    assert!(!phases.contains(&ScanPhase::Complete));
}

#[test]
fn cancelling_before_the_scan_still_delivers_a_terminal_event() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), BODY).unwrap();
    fs::write(dir.path().join("b.md"), BODY).unwrap();

    let source = FsDocumentSource::new(dir.path());
    let scanner = Scanner::new(ScanConfig::new().with_seed(42)).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let phases: Mutex<Vec<ScanPhase>> = Mutex::new(Vec::new());
    let on_progress = |progress: ScanProgress| phases.lock().unwrap().push(progress.phase);

    let result = scanner.scan(&source, &cancel, Some(&on_progress)).unwrap();

    assert!(result.cancelled);
    assert!(result.duplicates.is_empty());
    // No document was hashed before the cancellation was observed.
    assert_eq!(result.scanned_count, 0);

    let phases = phases.into_inner().unwrap();
    assert_eq!(*phases.last().unwrap(), ScanPhase::Cancelled);
}
