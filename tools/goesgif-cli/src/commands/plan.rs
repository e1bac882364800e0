//! Dry run: list the groups and artifacts a render would produce.

use goesgif_common::clock::SystemClock;
use goesgif_render_engine::{plan_run, RenderJob};

pub fn run(job: &RenderJob) -> anyhow::Result<()> {
    println!("Planning render of: {}", job.input_dir.display());

    let groups =
        plan_run(job, &SystemClock).map_err(|e| anyhow::anyhow!("Planning failed: {e}"))?;

    if groups.is_empty() {
        println!("No images found. Exiting.");
        return Ok(());
    }

    for group in &groups {
        println!(
            "  {}: {} frame(s), {} .. {}",
            group.key,
            group.frames,
            group.first_capture.format("%Y-%m-%d %H:%M:%SZ"),
            group.last_capture.format("%Y-%m-%d %H:%M:%SZ"),
        );
        for artifact in &group.artifacts {
            println!("    -> {}", artifact.display());
        }
    }

    let frames: usize = groups.iter().map(|g| g.frames).sum();
    println!("\n{} group(s), {frames} frame(s). Nothing written.", groups.len());
    Ok(())
}
