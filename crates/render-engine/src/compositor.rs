//! Frame compositor: crop, resize, and timestamp overlay for one snapshot.
//!
//! The compositor borrows a decoded source image and returns a finished
//! animation frame. It never holds on to either.

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use chrono_tz::Tz;
use image::imageops::FilterType;
use image::{Delay, DynamicImage, Frame, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use goesgif_common::error::{GoesgifError, GoesgifResult};
use goesgif_common::timezone::overlay_label;
use goesgif_snapshot_model::snapshot::SnapshotDescriptor;

/// Smallest overlay font size in pixels, before the scale factor.
pub const MIN_FONT_PX: f32 = 12.0;

/// Overlay font size as a fraction of frame height.
const FONT_HEIGHT_RATIO: f32 = 0.03;

const TEXT_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// DejaVu Sans Bold, used when no overlay font is configured.
const EMBEDDED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Pixel rectangle within a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// The closeup sub-rectangle of a full-disk image.
///
/// Starts 25% in from the left and 10% down from the top, spans 35% of
/// each dimension, and is clamped to stay inside the image. Width and
/// height are at least one pixel.
pub fn closeup_crop(width: u32, height: u32) -> CropRect {
    let share = |extent: u32, percent: u64| (u64::from(extent) * percent / 100) as u32;

    let left = share(width, 25);
    let top = share(height, 10);
    CropRect {
        left,
        top,
        width: share(width, 35).max(1).min(width.saturating_sub(left)),
        height: share(height, 35).max(1).min(height.saturating_sub(top)),
    }
}

/// Dimensions after scaling by `percentage`, never below one pixel.
pub fn resized_dimensions(width: u32, height: u32, percentage: u32) -> (u32, u32) {
    let scale = |extent: u32| ((u64::from(extent) * u64::from(percentage)) / 100).max(1) as u32;
    (scale(width), scale(height))
}

/// Overlay font size in pixels for a frame of the given height.
pub fn overlay_font_px(frame_height: u32, font_scale: f32) -> f32 {
    (frame_height as f32 * FONT_HEIGHT_RATIO).max(MIN_FONT_PX) * font_scale
}

/// Font used to draw the timestamp overlay.
pub struct OverlayFont {
    font: FontArc,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayFont")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl OverlayFont {
    /// Load a TrueType/OpenType font file.
    pub fn from_file(path: &Path) -> GoesgifResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            GoesgifError::config(format!("Cannot read font {}: {e}", path.display()))
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            GoesgifError::config(format!("Invalid font {}: {e}", path.display()))
        })?;
        Ok(Self {
            font,
            source: Some(path.to_path_buf()),
        })
    }

    /// The font bundled into the binary.
    pub fn embedded() -> GoesgifResult<Self> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT)
            .map_err(|e| anyhow::anyhow!("Embedded overlay font is unreadable: {e}"))?;
        Ok(Self { font, source: None })
    }

    /// Load `explicit` if given, failing if it cannot be loaded; otherwise
    /// the embedded font.
    pub fn discover(explicit: Option<&Path>) -> GoesgifResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    /// File the font was loaded from; `None` for the embedded font.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Which derivative of a snapshot to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView {
    /// Crop to the closeup rectangle (full-disk snapshots only).
    pub closeup: bool,
    pub resize_percentage: u32,
}

/// Turns decoded snapshots into timestamped animation frames.
#[derive(Debug)]
pub struct Compositor {
    timezone: Tz,
    font: OverlayFont,
    font_scale: f32,
    delay_ms: u32,
}

impl Compositor {
    pub fn new(timezone: Tz, font: OverlayFont, font_scale: f32, delay_ms: u32) -> Self {
        Self {
            timezone,
            font,
            font_scale,
            delay_ms,
        }
    }

    /// Produce one frame from a decoded source image.
    pub fn compose(
        &self,
        source: &DynamicImage,
        snapshot: &SnapshotDescriptor,
        view: FrameView,
    ) -> Frame {
        let cropped;
        let base = if view.closeup && snapshot.region.is_full_disk() {
            let rect = closeup_crop(source.width(), source.height());
            cropped = source.crop_imm(rect.left, rect.top, rect.width, rect.height);
            &cropped
        } else {
            source
        };

        let (width, height) =
            resized_dimensions(base.width(), base.height(), view.resize_percentage);
        let mut canvas = if (width, height) == (base.width(), base.height()) {
            base.to_rgba8()
        } else {
            base.resize_exact(width, height, FilterType::Triangle)
                .into_rgba8()
        };

        let label = overlay_label(snapshot.captured_at, self.timezone);
        draw_outlined_label(&mut canvas, &self.font.font, &label, self.font_scale);

        Frame::from_parts(
            canvas,
            0,
            0,
            Delay::from_numer_denom_ms(self.delay_ms, 1),
        )
    }
}

/// Decode a snapshot from disk.
pub fn decode_source(path: &Path) -> GoesgifResult<DynamicImage> {
    image::open(path).map_err(|e| GoesgifError::decode(path, e))
}

/// Light text with a dark outline, near the bottom-left corner.
fn draw_outlined_label(canvas: &mut RgbaImage, font: &FontArc, text: &str, font_scale: f32) {
    let px = overlay_font_px(canvas.height(), font_scale);
    let scale = PxScale::from(px);
    let (_, text_height) = text_size(scale, font, text);

    let margin = (px * 0.5).round() as i32;
    let x = margin;
    let y = canvas.height() as i32 - text_height as i32 - margin;
    let outline = ((px / 16.0).ceil() as i32).clamp(1, 3);

    for dx in -outline..=outline {
        for dy in -outline..=outline {
            if dx != 0 || dy != 0 {
                draw_text_mut(canvas, TEXT_OUTLINE, x + dx, y + dy, scale, font, text);
            }
        }
    }
    draw_text_mut(canvas, TEXT_FILL, x, y, scale, font, text);
}
