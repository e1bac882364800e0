//! Render every selected group to GIF.

use std::io::Write;

use goesgif_common::clock::SystemClock;
use goesgif_common::timezone::TzDatabase;
use goesgif_render_engine::{run_pipeline, RenderJob, RenderProgress, RenderStage};

pub fn run(job: &RenderJob) -> anyhow::Result<()> {
    println!("Rendering snapshots from: {}", job.input_dir.display());
    println!("  Output: {}", job.output_dir.display());
    if let Some(log_file) = &job.log_file {
        println!("  Run log: {}", log_file.display());
    }

    let progress_cb: Box<dyn Fn(RenderProgress) + Send> = Box::new(|p| {
        match p.stage {
            RenderStage::Rendering => print!(
                "\r  [{}/{}] {}: {}/{} frames  ",
                p.group_index + 1,
                p.group_count,
                p.group,
                p.frames_done,
                p.frames_total,
            ),
            RenderStage::Finalizing => print!(
                "\r  [{}/{}] {}: writing GIF  ",
                p.group_index + 1,
                p.group_count,
                p.group,
            ),
            RenderStage::Complete => println!(
                "\r  [{}/{}] {}: {} frames done  ",
                p.group_index + 1,
                p.group_count,
                p.group,
                p.frames_total,
            ),
        }
        let _ = std::io::stdout().flush();
    });

    let summary = run_pipeline(job, &SystemClock, &TzDatabase, Some(progress_cb))
        .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;

    if summary.selected == 0 {
        println!("No images found. Exiting.");
        return Ok(());
    }
    if summary.groups == 0 {
        println!("No images match the region/channel filters. Exiting.");
        return Ok(());
    }

    println!(
        "\nCreated {} GIF(s) from {} snapshot(s) in {} group(s)",
        summary.artifacts.len(),
        summary.selected,
        summary.groups
    );
    for artifact in &summary.artifacts {
        println!("  {} ({} frames)", artifact.path.display(), artifact.frames);
    }
    if summary.gaps > 0 {
        println!("  ⚠ {} gap(s) detected between frames", summary.gaps);
    }
    if !summary.skipped.is_empty() {
        println!("  ⚠ {} unreadable image(s) skipped", summary.skipped.len());
        for path in &summary.skipped {
            tracing::debug!(path = %path.display(), "Skipped");
        }
    }

    Ok(())
}
