//! Animation assembler: stream frames of one group into a GIF file.
//!
//! Frames are encoded as they arrive, so only the frame being appended is
//! held in memory. The encoder writes to `<artifact>.partial` and the file
//! is renamed into place by [`AnimationAssembler::finish`] only once every
//! byte, trailer included, has reached the disk. An assembler dropped
//! without finishing deletes its partial file.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::Frame;

use goesgif_common::error::{GoesgifError, GoesgifResult};

/// Global animation properties shared by every artifact of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    /// 0 loops forever.
    pub loop_count: u16,
    /// Palette quantization speed (1 = best quality, 30 = fastest).
    pub speed: i32,
}

impl AnimationSettings {
    fn repeat(&self) -> Repeat {
        match self.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        }
    }
}

/// A finished animation on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub frames: usize,
    pub closeup: bool,
}

/// First write failure seen on an artifact file.
type WriteFailure = Rc<RefCell<Option<io::Error>>>;

/// Buffered artifact file that remembers its first write failure.
///
/// The GIF encoder writes its trailer and the buffer is flushed while the
/// encoder is dropped, where errors cannot be returned.
struct ArtifactWriter {
    inner: BufWriter<File>,
    failure: WriteFailure,
}

impl ArtifactWriter {
    fn record<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &result {
            let mut failure = self.failure.borrow_mut();
            if failure.is_none() {
                *failure = Some(io::Error::new(e.kind(), e.to_string()));
            }
        }
        result
    }
}

impl Write for ArtifactWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.record(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.record(result)
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        let result = self.inner.flush();
        let _ = self.record(result);
    }
}

/// Owns the open encoder for one artifact.
pub struct AnimationAssembler {
    output_path: PathBuf,
    partial_path: PathBuf,
    settings: AnimationSettings,
    closeup: bool,
    encoder: Option<GifEncoder<ArtifactWriter>>,
    file: Option<File>,
    failure: WriteFailure,
    canvas: Option<(u32, u32)>,
    frames: usize,
}

impl AnimationAssembler {
    /// Prepare an assembler. Nothing touches the filesystem until the
    /// first frame is appended.
    pub fn new(output_path: PathBuf, settings: AnimationSettings, closeup: bool) -> Self {
        let partial_path = output_path.with_extension("gif.partial");
        Self {
            output_path,
            partial_path,
            settings,
            closeup,
            encoder: None,
            file: None,
            failure: WriteFailure::default(),
            canvas: None,
            frames: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Encode one frame. The frame is consumed and released here.
    ///
    /// Frames whose size differs from the first frame are resized to match it.
    pub fn append(&mut self, frame: Frame) -> GoesgifResult<()> {
        let (width, height) = frame.buffer().dimensions();
        let frame = match self.canvas {
            Some(canvas) if canvas != (width, height) => {
                tracing::debug!(
                    artifact = %self.output_path.display(),
                    from = ?(width, height),
                    to = ?canvas,
                    "Resizing frame to animation canvas"
                );
                let delay = frame.delay();
                let resized =
                    imageops::resize(frame.buffer(), canvas.0, canvas.1, FilterType::Triangle);
                Frame::from_parts(resized, 0, 0, delay)
            }
            Some(_) => frame,
            None => {
                self.canvas = Some((width, height));
                frame
            }
        };

        let encoder = match self.encoder.take() {
            Some(encoder) => encoder,
            None => self.open()?,
        };
        let encoder = self.encoder.insert(encoder);
        encoder
            .encode_frame(frame)
            .map_err(|e| GoesgifError::encode(&self.output_path, e.to_string()))?;
        self.frames += 1;
        Ok(())
    }

    fn open(&mut self) -> GoesgifResult<GifEncoder<ArtifactWriter>> {
        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.partial_path)?;
        self.file = Some(file.try_clone()?);
        let writer = ArtifactWriter {
            inner: BufWriter::new(file),
            failure: Rc::clone(&self.failure),
        };
        let mut encoder = GifEncoder::new_with_speed(writer, self.settings.speed);
        encoder
            .set_repeat(self.settings.repeat())
            .map_err(|e| GoesgifError::encode(&self.output_path, e.to_string()))?;
        Ok(encoder)
    }

    /// Close the encoder and move the artifact into place.
    ///
    /// Returns `None` when no frame was appended; nothing is written then.
    /// A write failure at any point, trailer included, leaves no file behind.
    pub fn finish(mut self) -> GoesgifResult<Option<Artifact>> {
        let Some(encoder) = self.encoder.take() else {
            return Ok(None);
        };
        // Dropping the encoder writes the GIF trailer and flushes the file.
        drop(encoder);
        let failure = self.failure.borrow_mut().take();
        let file = self.file.take();
        let written = match (failure, file) {
            (Some(e), _) => Err(e),
            (None, Some(file)) => file.sync_all(),
            (None, None) => Ok(()),
        };
        if let Err(e) = written.and_then(|()| std::fs::rename(&self.partial_path, &self.output_path))
        {
            let _ = std::fs::remove_file(&self.partial_path);
            return Err(GoesgifError::encode(&self.output_path, e.to_string()));
        }

        tracing::debug!(
            artifact = %self.output_path.display(),
            frames = self.frames,
            "Wrote animation"
        );
        Ok(Some(Artifact {
            path: self.output_path.clone(),
            frames: self.frames,
            closeup: self.closeup,
        }))
    }
}

impl Drop for AnimationAssembler {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            drop(encoder);
            let _ = std::fs::remove_file(&self.partial_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Delay, Rgba, RgbaImage};
    use std::io::BufReader;

    const SETTINGS: AnimationSettings = AnimationSettings {
        loop_count: 0,
        speed: 10,
    };

    fn frame(width: u32, height: u32, shade: u8) -> Frame {
        Frame::from_parts(
            RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255])),
            0,
            0,
            Delay::from_numer_denom_ms(100, 1),
        )
    }

    fn decode(path: &Path) -> Vec<image::Frame> {
        let reader = BufReader::new(File::open(path).unwrap());
        GifDecoder::new(reader)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap()
    }

    #[test]
    fn test_frames_are_streamed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b").join("out.gif");

        let mut assembler = AnimationAssembler::new(out.clone(), SETTINGS, false);
        for shade in [0u8, 128, 255] {
            assembler.append(frame(8, 6, shade)).unwrap();
        }
        assert_eq!(assembler.frames(), 3);

        let artifact = assembler.finish().unwrap().unwrap();
        assert_eq!(artifact.path, out);
        assert_eq!(artifact.frames, 3);
        assert!(!artifact.closeup);
        assert!(!out.with_extension("gif.partial").exists());

        let frames = decode(&out);
        assert_eq!(frames.len(), 3);
        assert_eq!(
            std::time::Duration::from(frames[0].delay()),
            std::time::Duration::from_millis(100)
        );
        let shades: Vec<u8> = frames.iter().map(|f| f.buffer().get_pixel(0, 0)[0]).collect();
        assert!(shades[0] < shades[1] && shades[1] < shades[2]);
    }

    #[test]
    fn test_no_frames_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("GOES18").join("FD");
        let assembler = AnimationAssembler::new(folder.join("out.gif"), SETTINGS, false);
        assert_eq!(assembler.finish().unwrap(), None);
        assert!(!folder.exists());
    }

    #[test]
    fn test_unfinished_assembler_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");
        {
            let mut assembler = AnimationAssembler::new(out.clone(), SETTINGS, true);
            assembler.append(frame(4, 4, 10)).unwrap();
            assert!(out.with_extension("gif.partial").exists());
        }
        assert!(!out.exists());
        assert!(!out.with_extension("gif.partial").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_at_finish_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");
        let partial = out.with_extension("gif.partial");
        // Every write to /dev/full fails with ENOSPC.
        std::os::unix::fs::symlink("/dev/full", &partial).unwrap();

        let mut assembler = AnimationAssembler::new(out.clone(), SETTINGS, false);
        assembler.append(frame(4, 4, 10)).unwrap();
        let err = assembler.finish().unwrap_err();

        assert!(matches!(err, GoesgifError::Encode { .. }));
        assert!(std::fs::symlink_metadata(&out).is_err());
        assert!(std::fs::symlink_metadata(&partial).is_err());
    }

    #[test]
    fn test_mismatched_frames_take_first_size() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");

        let mut assembler = AnimationAssembler::new(out.clone(), SETTINGS, false);
        assembler.append(frame(10, 10, 50)).unwrap();
        assembler.append(frame(20, 16, 50)).unwrap();
        assembler.finish().unwrap();

        let frames = decode(&out);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].buffer().dimensions(), (10, 10));
    }

    #[test]
    fn test_repeat_mapping() {
        assert!(matches!(SETTINGS.repeat(), Repeat::Infinite));
        let finite = AnimationSettings {
            loop_count: 3,
            speed: 10,
        };
        assert!(matches!(finite.repeat(), Repeat::Finite(3)));
    }
}
