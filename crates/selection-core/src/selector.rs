//! Image selector: walk the input tree and keep recent, allowed snapshots.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use goesgif_common::error::{GoesgifError, GoesgifResult};
use goesgif_snapshot_model::classify::classify;
use goesgif_snapshot_model::snapshot::SnapshotDescriptor;

use crate::filter::SatelliteFilter;

/// Criteria applied while scanning.
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    /// Snapshots must be captured strictly after this instant.
    pub cutoff: DateTime<Utc>,

    /// Satellite allow-list.
    pub satellites: SatelliteFilter,
}

impl SelectionCriteria {
    pub fn accepts(&self, snapshot: &SnapshotDescriptor) -> bool {
        snapshot.captured_at > self.cutoff && self.satellites.accepts(&snapshot.satellite)
    }
}

/// Recursively scan `root` and return the selected snapshots, oldest first.
///
/// Entries are visited in file-name order within each directory, and
/// snapshots sharing a capture time keep that visiting order. Symbolic
/// links are followed; link cycles are warned about and skipped.
pub fn select_snapshots(
    root: &Path,
    criteria: &SelectionCriteria,
) -> GoesgifResult<Vec<SnapshotDescriptor>> {
    if !root.is_dir() {
        return Err(GoesgifError::InputDirNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
            Err(e) => return Err(std::io::Error::from(e).into()),
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "Scanned input tree");
    Ok(select_from_paths(files, criteria))
}

/// Classify and filter `paths` (in encounter order), then order by capture time.
pub fn select_from_paths<I>(paths: I, criteria: &SelectionCriteria) -> Vec<SnapshotDescriptor>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut selected: Vec<SnapshotDescriptor> = paths
        .into_iter()
        .filter_map(|path| classify(&path).matched())
        .filter(|snapshot| criteria.accepts(snapshot))
        .collect();

    // Stable: equal capture times keep encounter order.
    selected.sort_by_key(|snapshot| snapshot.captured_at);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn criteria(satellites: &str) -> SelectionCriteria {
        SelectionCriteria {
            cutoff: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            satellites: SatelliteFilter::parse(satellites).unwrap(),
        }
    }

    fn names(selected: &[SnapshotDescriptor]) -> Vec<String> {
        selected
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_orders_by_capture_time() {
        let paths = [
            "a/GOES18_FD_13_20240101T020000Z.jpg",
            "b/GOES18_FD_13_20240101T003000Z.jpg",
            "GOES18_M1_02_20240101T010000Z.jpg",
        ]
        .map(PathBuf::from);

        let selected = select_from_paths(paths, &criteria("all"));
        assert_eq!(
            names(&selected),
            vec![
                "GOES18_FD_13_20240101T003000Z.jpg",
                "GOES18_M1_02_20240101T010000Z.jpg",
                "GOES18_FD_13_20240101T020000Z.jpg",
            ]
        );
    }

    #[test]
    fn test_cutoff_is_exclusive() {
        let paths = [
            "GOES18_FD_13_20240101T000000Z.jpg",
            "GOES18_FD_13_20240101T000001Z.jpg",
            "GOES18_FD_13_20231231T235959Z.jpg",
        ]
        .map(PathBuf::from);

        let selected = select_from_paths(paths, &criteria("all"));
        assert_eq!(names(&selected), vec!["GOES18_FD_13_20240101T000001Z.jpg"]);
    }

    #[test]
    fn test_satellite_allow_list() {
        let paths = [
            "GOES18_FD_13_20240101T010000Z.jpg",
            "GOES19_FD_13_20240101T010000Z.jpg",
        ]
        .map(PathBuf::from);

        let selected = select_from_paths(paths.clone(), &criteria("GOES19"));
        assert_eq!(names(&selected), vec!["GOES19_FD_13_20240101T010000Z.jpg"]);

        assert!(select_from_paths(paths[..1].to_vec(), &criteria("GOES19")).is_empty());
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let paths = [
            "z/GOES18_FD_13_20240101T010000Z.jpg",
            "a/GOES18_FD_02_20240101T010000Z.jpg",
        ]
        .map(PathBuf::from);

        let selected = select_from_paths(paths, &criteria("all"));
        assert_eq!(selected[0].channel, "13");
        assert_eq!(selected[1].channel, "02");
    }

    #[test]
    fn test_scan_missing_root() {
        let err = select_snapshots(Path::new("/definitely/not/here"), &criteria("all"))
            .unwrap_err();
        assert!(matches!(err, GoesgifError::InputDirNotFound { .. }));
    }

    #[test]
    fn test_scan_recurses_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("GOES18").join("FD");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("GOES18_FD_13_20240101T020000Z.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("GOES18_FD_13_20240101T010000Z.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir_all(dir.path().join("GOES18_FD_13_20240101T030000Z.jpg")).unwrap();

        let selected = select_snapshots(dir.path(), &criteria("all")).unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected[0].path.starts_with(dir.path()));
        assert!(selected[1].path.starts_with(&nested));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinks() {
        let archive = tempfile::tempdir().unwrap();
        let target = archive.path().join("GOES18_FD_13_20240101T010000Z.jpg");
        std::fs::write(&target, b"").unwrap();
        let shared = archive.path().join("shared");
        std::fs::create_dir(&shared).unwrap();
        std::fs::write(shared.join("GOES18_M1_02_20240101T020000Z.jpg"), b"").unwrap();

        let input = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, input.path().join("GOES18_FD_13_20240101T010000Z.jpg"))
            .unwrap();
        std::os::unix::fs::symlink(&shared, input.path().join("linked")).unwrap();
        // A cycle back to the input root is skipped, not fatal.
        std::os::unix::fs::symlink(input.path(), input.path().join("loop")).unwrap();

        let selected = select_snapshots(input.path(), &criteria("all")).unwrap();
        assert_eq!(
            names(&selected),
            vec![
                "GOES18_FD_13_20240101T010000Z.jpg",
                "GOES18_M1_02_20240101T020000Z.jpg",
            ]
        );
        assert!(selected[0].path.starts_with(input.path()));
    }

    proptest! {
        #[test]
        fn prop_output_sorted_for_any_input_order(
            stamps in prop::collection::vec((2u32..28, 0u32..24, 0u32..60), 0..40),
            seed in any::<u64>(),
        ) {
            let paths: Vec<PathBuf> = stamps
                .iter()
                .enumerate()
                .map(|(i, (d, h, m))| {
                    PathBuf::from(format!("{i}/GOES18_FD_13_202401{d:02}T{h:02}{m:02}00Z.jpg"))
                })
                .collect();

            let mut shuffled = paths.clone();
            let len = shuffled.len();
            if len > 1 {
                shuffled.rotate_left((seed % len as u64) as usize);
            }

            let forward = select_from_paths(paths, &criteria("all"));
            let rotated = select_from_paths(shuffled, &criteria("all"));

            prop_assert_eq!(forward.len(), stamps.len());
            prop_assert!(forward.windows(2).all(|w| w[0].captured_at <= w[1].captured_at));

            let forward_times: Vec<_> = forward.iter().map(|s| s.captured_at).collect();
            let rotated_times: Vec<_> = rotated.iter().map(|s| s.captured_at).collect();
            prop_assert_eq!(forward_times, rotated_times);
        }
    }
}
