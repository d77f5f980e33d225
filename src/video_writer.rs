// src/video_writer.rs

use anyhow::{bail, Context, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{VideoWriter, VideoWriterTrait, VideoWriterTraitConst},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// mp4v encoder handle. The underlying writer is released on `finish` or,
/// if the caller bails out mid-sequence, on drop.
pub struct VideoEncoder {
    writer: VideoWriter,
    path: PathBuf,
    size: core::Size,
    frames_written: usize,
    released: bool,
}

impl VideoEncoder {
    pub fn create(path: &Path, fps: f64, width: i32, height: i32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let path_str = path
            .to_str()
            .with_context(|| format!("Non UTF-8 video path {}", path.display()))?;

        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let size = core::Size::new(width, height);
        let writer = VideoWriter::new(path_str, fourcc, fps, size, true)
            .with_context(|| format!("Failed to create video writer for {}", path.display()))?;

        if !writer.is_opened()? {
            bail!("Video encoder could not open {}", path.display());
        }

        info!(
            "Output video: {} ({}x{} @ {:.1} FPS)",
            path.display(),
            width,
            height,
            fps
        );

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            size,
            frames_written: 0,
            released: false,
        })
    }

    pub fn write(&mut self, frame: &Mat) -> Result<()> {
        let frame_size = frame.size()?;
        if frame_size != self.size {
            bail!(
                "Frame is {}x{}, encoder expects {}x{}",
                frame_size.width,
                frame_size.height,
                self.size.width,
                self.size.height
            );
        }
        self.writer.write(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush and close the container. Returns the number of frames written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.release()?;
        self.released = true;
        debug!("Closed {} after {} frames", self.path.display(), self.frames_written);
        Ok(self.frames_written)
    }
}

impl Drop for VideoEncoder {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.writer.release() {
                warn!("Failed to release video writer {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Encode an ordered frame sequence to `path` at `fps`.
pub fn encode(frames: &[Mat], fps: f64, width: i32, height: i32, path: &Path) -> Result<usize> {
    if frames.is_empty() {
        bail!("No frames to encode");
    }

    let mut encoder = VideoEncoder::create(path, fps, width, height)?;
    for frame in frames {
        encoder.write(frame)?;
    }
    let written = encoder.finish()?;

    info!("🎬 Video simulation saved as '{}'", path.display());
    Ok(written)
}
