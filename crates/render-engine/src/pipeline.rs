//! Pipeline entry points: plan and render one batch run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use goesgif_common::clock::{threshold_cutoff, Clock};
use goesgif_common::config::{DecodeErrorPolicy, PipelineConfig};
use goesgif_common::error::{GoesgifError, GoesgifResult};
use goesgif_common::timezone::TimezoneResolver;
use goesgif_selection_core::filter::{PartitionFilter, SatelliteFilter};
use goesgif_selection_core::gap::GapAuditor;
use goesgif_selection_core::partition::partition;
use goesgif_selection_core::selector::{select_snapshots, SelectionCriteria};
use goesgif_snapshot_model::group::{Group, GroupKey};

use crate::assembler::{AnimationAssembler, AnimationSettings, Artifact};
use crate::compositor::{decode_source, Compositor, FrameView, OverlayFont};
use crate::layout::artifact_path;
use crate::run_log::RunLog;

/// One batch run, ready to execute.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Directory tree scanned for snapshots.
    pub input_dir: PathBuf,

    /// Root of the artifact layout.
    pub output_dir: PathBuf,

    /// Optional human-readable run log.
    pub log_file: Option<PathBuf>,

    /// Run parameters.
    pub config: PipelineConfig,
}

/// Progress callback for rendering.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Render progress report.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    /// Group being rendered.
    pub group: GroupKey,

    /// Zero-based index of the group.
    pub group_index: usize,

    /// Number of groups in the run.
    pub group_count: usize,

    /// Frames of this group processed so far.
    pub frames_done: usize,

    /// Frames in this group.
    pub frames_total: usize,

    /// Current stage.
    pub stage: RenderStage,
}

/// Stages of rendering one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Rendering,
    Finalizing,
    Complete,
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Snapshots that passed the time and satellite filters.
    pub selected: usize,

    /// Groups left after region, channel and enhanced filtering.
    pub groups: usize,

    /// Artifacts written, in group order.
    pub artifacts: Vec<Artifact>,

    /// Gaps found across all groups.
    pub gaps: usize,

    /// Sources left out under the skip policy.
    pub skipped: Vec<PathBuf>,
}

/// A group as it would be rendered.
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    pub key: GroupKey,
    pub frames: usize,
    pub first_capture: DateTime<Utc>,
    pub last_capture: DateTime<Utc>,
    pub artifacts: Vec<PathBuf>,
}

struct Filters {
    criteria: SelectionCriteria,
    partition: PartitionFilter,
}

fn parse_filters(config: &PipelineConfig, now: DateTime<Utc>) -> GoesgifResult<Filters> {
    Ok(Filters {
        criteria: SelectionCriteria {
            cutoff: threshold_cutoff(now, config.time_threshold_hours),
            satellites: SatelliteFilter::parse(&config.satellites)?,
        },
        partition: PartitionFilter::parse(
            &config.region,
            &config.channels,
            config.include_enhanced,
        )?,
    })
}

fn check_input_dir(job: &RenderJob) -> GoesgifResult<()> {
    if job.input_dir.is_dir() {
        Ok(())
    } else {
        Err(GoesgifError::InputDirNotFound {
            path: job.input_dir.clone(),
        })
    }
}

fn planned_artifacts(job: &RenderJob, key: &GroupKey) -> Vec<PathBuf> {
    let mut paths = vec![artifact_path(&job.output_dir, key, false)];
    if job.config.closeup && key.region.is_full_disk() {
        paths.push(artifact_path(&job.output_dir, key, true));
    }
    paths
}

/// Select and partition without rendering anything.
pub fn plan_run(job: &RenderJob, clock: &dyn Clock) -> GoesgifResult<Vec<PlannedGroup>> {
    job.config.validate()?;
    let filters = parse_filters(&job.config, clock.now())?;
    check_input_dir(job)?;

    let selected = select_snapshots(&job.input_dir, &filters.criteria)?;
    let groups = partition(selected, &filters.partition);

    Ok(groups
        .iter()
        .map(|group| PlannedGroup {
            key: group.key().clone(),
            frames: group.len(),
            first_capture: group.first().captured_at,
            last_capture: group.last().captured_at,
            artifacts: planned_artifacts(job, group.key()),
        })
        .collect())
}

/// Run the whole pipeline: select, partition, composite and assemble.
///
/// Configuration problems (bad parameters, missing input directory,
/// unknown timezone, unreadable font) are reported before any image I/O.
pub fn run_pipeline(
    job: &RenderJob,
    clock: &dyn Clock,
    timezones: &dyn TimezoneResolver,
    progress: Option<ProgressCallback>,
) -> GoesgifResult<RunSummary> {
    let config = &job.config;
    config.validate()?;
    let filters = parse_filters(config, clock.now())?;
    check_input_dir(job)?;
    let timezone = timezones.resolve(&config.timezone)?;

    let font = OverlayFont::discover(config.font_path.as_deref())?;
    match font.source() {
        Some(path) => tracing::debug!(font = %path.display(), "Overlay font loaded"),
        None => tracing::debug!("Using embedded overlay font"),
    }
    let compositor = Compositor::new(timezone, font, config.font_scale, config.frame_delay_ms);

    let mut log = RunLog::open(job.log_file.as_deref())?;

    tracing::info!(input = %job.input_dir.display(), "Finding images");
    let selected = select_snapshots(&job.input_dir, &filters.criteria)?;
    tracing::info!(count = selected.len(), "Found images");

    let mut summary = RunSummary {
        selected: selected.len(),
        ..RunSummary::default()
    };
    if selected.is_empty() {
        tracing::info!("No images found");
        return Ok(summary);
    }

    let groups = partition(selected, &filters.partition);
    summary.groups = groups.len();
    if groups.is_empty() {
        tracing::info!("No images left after region/channel filtering");
        return Ok(summary);
    }

    let settings = AnimationSettings {
        loop_count: config.loop_count,
        speed: config.gif_speed,
    };
    let group_count = groups.len();
    let mut renderer = GroupRenderer {
        job,
        compositor: &compositor,
        settings,
        log: &mut log,
        progress: progress.as_ref(),
        summary: &mut summary,
    };
    for (group_index, group) in groups.iter().enumerate() {
        renderer.render(group, group_index, group_count)?;
    }

    log.flush()?;
    if let Some(path) = log.path() {
        tracing::info!(log = %path.display(), lines = log.lines_written(), "Run log written");
    }
    tracing::info!(
        artifacts = summary.artifacts.len(),
        gaps = summary.gaps,
        skipped = summary.skipped.len(),
        output = %job.output_dir.display(),
        "Run complete"
    );
    Ok(summary)
}

struct GroupRenderer<'a> {
    job: &'a RenderJob,
    compositor: &'a Compositor,
    settings: AnimationSettings,
    log: &'a mut RunLog,
    progress: Option<&'a ProgressCallback>,
    summary: &'a mut RunSummary,
}

impl GroupRenderer<'_> {
    fn report(
        &self,
        group: &Group,
        group_index: usize,
        group_count: usize,
        frames_done: usize,
        stage: RenderStage,
    ) {
        if let Some(cb) = self.progress {
            cb(RenderProgress {
                group: group.key().clone(),
                group_index,
                group_count,
                frames_done,
                frames_total: group.len(),
                stage,
            });
        }
    }

    fn render(
        &mut self,
        group: &Group,
        group_index: usize,
        group_count: usize,
    ) -> GoesgifResult<()> {
        let config = &self.job.config;
        let key = group.key();
        tracing::info!(group = %key, frames = group.len(), "Rendering group");

        let mut standard = AnimationAssembler::new(
            artifact_path(&self.job.output_dir, key, false),
            self.settings,
            false,
        );
        let mut closeup = (config.closeup && key.region.is_full_disk()).then(|| {
            AnimationAssembler::new(
                artifact_path(&self.job.output_dir, key, true),
                self.settings,
                true,
            )
        });
        let standard_view = FrameView {
            closeup: false,
            resize_percentage: config.resize_percentage,
        };
        let closeup_view = FrameView {
            closeup: true,
            resize_percentage: config.effective_closeup_resize(),
        };

        let mut auditor = GapAuditor::new(config.gap_threshold_minutes);
        self.report(group, group_index, group_count, 0, RenderStage::Rendering);

        for (done, snapshot) in group.iter().enumerate() {
            let source = match decode_source(&snapshot.path) {
                Ok(source) => source,
                Err(e) if config.on_decode_error == DecodeErrorPolicy::Skip => {
                    tracing::warn!(
                        path = %snapshot.path.display(),
                        error = %e,
                        "Skipping unreadable image"
                    );
                    self.log.record_skip(&snapshot.path, &e.to_string())?;
                    self.summary.skipped.push(snapshot.path.clone());
                    continue;
                }
                Err(e) => return Err(e),
            };

            standard.append(self.compositor.compose(&source, snapshot, standard_view))?;
            self.log.record_frame(&snapshot.path, standard.output_path())?;

            if let Some(closeup) = closeup.as_mut() {
                closeup.append(self.compositor.compose(&source, snapshot, closeup_view))?;
                self.log.record_frame(&snapshot.path, closeup.output_path())?;
            }
            drop(source);

            if let Some(gap) = auditor.observe(snapshot.captured_at) {
                tracing::warn!(
                    group = %key,
                    gap_minutes = gap.minutes(),
                    at = %snapshot.captured_at,
                    "Gap between frames"
                );
                self.log.record_gap(&gap)?;
                self.summary.gaps += 1;
            }

            self.report(
                group,
                group_index,
                group_count,
                done + 1,
                RenderStage::Rendering,
            );
        }

        self.report(
            group,
            group_index,
            group_count,
            group.len(),
            RenderStage::Finalizing,
        );
        for assembler in std::iter::once(standard).chain(closeup) {
            if let Some(artifact) = assembler.finish()? {
                tracing::info!(
                    artifact = %artifact.path.display(),
                    frames = artifact.frames,
                    "Created animation"
                );
                self.summary.artifacts.push(artifact);
            }
        }
        self.report(
            group,
            group_index,
            group_count,
            group.len(),
            RenderStage::Complete,
        );
        Ok(())
    }
}
