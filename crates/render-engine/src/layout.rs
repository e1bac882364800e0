//! Output layout for animation artifacts.

use std::path::{Path, PathBuf};

use goesgif_snapshot_model::group::GroupKey;

/// Subdirectory holding closeup artifacts.
pub const CLOSEUP_DIR: &str = "closeup";

/// `<output>/<satellite>/<region>/<channel>[/closeup]/output_<satellite>_<region>_<channel>[_closeup].gif`
pub fn artifact_path(output_dir: &Path, key: &GroupKey, closeup: bool) -> PathBuf {
    let mut dir = output_dir
        .join(&key.satellite)
        .join(key.region.as_str())
        .join(&key.channel);
    let suffix = if closeup {
        dir.push(CLOSEUP_DIR);
        "_closeup"
    } else {
        ""
    };
    dir.join(format!(
        "output_{}_{}_{}{suffix}.gif",
        key.satellite, key.region, key.channel
    ))
}
