use std::path::Path;
use std::process::{Command, Output};

use chrono::{Duration, Utc};
use image::{Rgb, RgbImage};

fn goesgif(args: &[&str], config_home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_goesgif"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("goesgif binary should run")
}

fn recent_snapshot(dir: &Path, prefix: &str, minutes_ago: i64) {
    let stamp = (Utc::now() - Duration::minutes(minutes_ago)).format("%Y%m%dT%H%M%SZ");
    let img = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 120]));
    img.save(dir.join(format!("{prefix}_{stamp}.jpg")))
        .expect("synthetic jpeg should be writable");
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are utf-8")
}

#[test]
fn missing_input_dir_fails() {
    let config = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let missing = config.path().join("does-not-exist");

    let out = goesgif(&[path_str(&missing), path_str(output.path())], config.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn unknown_timezone_fails_and_names_it() {
    let config = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    recent_snapshot(input.path(), "GOES18_FD_13", 30);

    let out = goesgif(
        &[
            path_str(input.path()),
            path_str(output.path()),
            "--timezone",
            "Mars/Olympus_Mons",
        ],
        config.path(),
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Mars/Olympus_Mons"), "stderr: {stderr}");
    assert!(!output.path().join("GOES18").exists());
}

#[test]
fn no_matching_satellite_exits_cleanly() {
    let config = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    recent_snapshot(input.path(), "GOES18_FD_13", 30);

    let out = goesgif(
        &[
            path_str(input.path()),
            path_str(output.path()),
            "--satellites",
            "GOES19",
        ],
        config.path(),
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("No images found"), "stdout: {stdout}");
    assert!(std::fs::read_dir(output.path()).unwrap().next().is_none());
}

#[test]
fn renders_gif_per_group() {
    let config = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    recent_snapshot(input.path(), "GOES18_FD_13", 50);
    recent_snapshot(input.path(), "GOES18_FD_13", 40);
    recent_snapshot(input.path(), "GOES18_M1_02", 45);

    let out = goesgif(
        &[
            path_str(input.path()),
            path_str(output.path()),
            "--resize_percentage",
            "50",
        ],
        config.path(),
    );
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(output
        .path()
        .join("GOES18/FD/13/output_GOES18_FD_13.gif")
        .is_file());
    assert!(output
        .path()
        .join("GOES18/M1/02/output_GOES18_M1_02.gif")
        .is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let config = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    recent_snapshot(input.path(), "GOES18_FD_13", 30);

    let out = goesgif(
        &[
            path_str(input.path()),
            path_str(output.path()),
            "--closeup",
            "--dry_run",
        ],
        config.path(),
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("GOES18/FD/13"), "stdout: {stdout}");
    assert!(stdout.contains("output_GOES18_FD_13_closeup.gif"), "stdout: {stdout}");
    assert!(std::fs::read_dir(output.path()).unwrap().next().is_none());
}
