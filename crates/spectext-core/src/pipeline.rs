//! End-to-end text to WAV conversion.
//!
//! A run moves through `Idle -> Loading -> Composing -> Encoding -> Writing`
//! and ends in `Done` or `Failed`. Configuration is validated when the
//! pipeline is built, before any glyph is touched. Every glyph is resolved
//! before compositing starts, and output files only appear once complete.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use crate::compose::{compose, CompositeImage};
use crate::config::{EncoderConfig, RenderOptions};
use crate::encode::{PcmBuffer, Progress, SpectrogramEncoder};
use crate::error::{SpectextError, SpectextResult};
use crate::glyph::{resolve_text, GlyphAtlas};
use crate::png::PngConfig;
use crate::wav::WavResult;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "converted.wav";

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing started.
    Idle,
    /// Resolving glyphs.
    Loading,
    /// Building the composite image.
    Composing,
    /// Synthesizing PCM.
    Encoding,
    /// Writing output files.
    Writing,
    /// Finished successfully.
    Done,
    /// Aborted by an error.
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Composing => "composing",
            PipelineState::Encoding => "encoding",
            PipelineState::Writing => "writing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// In-memory result of rendering text.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Composite image after any invert/rotate options.
    pub image: CompositeImage,
    /// Encoded samples.
    pub pcm: PcmBuffer,
    /// WAV container around `pcm`.
    pub wav: WavResult,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
    /// Sample frames written.
    pub frames: usize,
    /// Audio length in seconds.
    pub duration_seconds: f64,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: String,
    /// WAV file written.
    pub output: PathBuf,
    /// Debug image written, if requested.
    pub debug_image: Option<PathBuf>,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Converts text into a spectrogram WAV file.
#[derive(Debug)]
pub struct Pipeline<A> {
    atlas: A,
    encoder: SpectrogramEncoder,
    options: RenderOptions,
    state: PipelineState,
}

impl<A: GlyphAtlas> Pipeline<A> {
    /// Builds a pipeline, validating `config` up front.
    pub fn new(atlas: A, config: EncoderConfig, options: RenderOptions) -> SpectextResult<Self> {
        let encoder = SpectrogramEncoder::new(config)?;
        Ok(Self {
            atlas,
            encoder,
            options,
            state: PipelineState::Idle,
        })
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Encoder in use.
    pub fn encoder(&self) -> &SpectrogramEncoder {
        &self.encoder
    }

    /// Renders `text` in memory without writing any file. The run skips the
    /// `Writing` state.
    pub fn render(&mut self, text: &str) -> SpectextResult<Rendered> {
        self.render_with_progress(text, |_| {})
    }

    /// Renders `text` in memory, reporting column progress.
    pub fn render_with_progress<F>(&mut self, text: &str, on_progress: F) -> SpectextResult<Rendered>
    where
        F: Fn(Progress) + Sync,
    {
        self.enter(PipelineState::Idle);
        let result = self.render_inner(text, on_progress);
        match &result {
            Ok(_) => self.enter(PipelineState::Done),
            Err(_) => self.enter(PipelineState::Failed),
        }
        result
    }

    /// Renders `text` and writes the WAV (and debug image) to disk.
    pub fn run(&mut self, text: &str, output: &Path) -> SpectextResult<RenderReport> {
        self.run_with_progress(text, output, |_| {})
    }

    /// Renders `text` and writes the WAV (and debug image), reporting column progress.
    pub fn run_with_progress<F>(
        &mut self,
        text: &str,
        output: &Path,
        on_progress: F,
    ) -> SpectextResult<RenderReport>
    where
        F: Fn(Progress) + Sync,
    {
        let start = Instant::now();
        self.enter(PipelineState::Idle);

        let result = self
            .render_inner(text, on_progress)
            .and_then(|rendered| self.write(&rendered, output, start));

        match &result {
            Ok(_) => self.enter(PipelineState::Done),
            Err(e) => {
                tracing::error!(error = %e, code = e.code(), "conversion failed");
                self.enter(PipelineState::Failed);
            }
        }
        result
    }

    fn render_inner<F>(&mut self, text: &str, on_progress: F) -> SpectextResult<Rendered>
    where
        F: Fn(Progress) + Sync,
    {
        self.enter(PipelineState::Loading);
        let glyphs = resolve_text(&self.atlas, text)?;

        self.enter(PipelineState::Composing);
        let mut image = compose(&glyphs)?;
        if self.options.invert {
            image = image.invert();
        }
        if self.options.rotate {
            image = image.rotate_ccw();
        }

        self.enter(PipelineState::Encoding);
        let cache = self.encoder.new_cache();
        let pcm = self
            .encoder
            .encode_with_progress(&image, &cache, on_progress)?;
        let wav = WavResult::from_pcm(&pcm).map_err(|e| SpectextError::io("<memory>", e))?;

        Ok(Rendered { image, pcm, wav })
    }

    fn write(
        &mut self,
        rendered: &Rendered,
        output: &Path,
        start: Instant,
    ) -> SpectextResult<RenderReport> {
        self.enter(PipelineState::Writing);

        // Stage every file before any of them replaces its target.
        let wav = StagedFile::stage(output, &rendered.wav.wav_data)?;
        let debug = match &self.options.debug_image {
            Some(path) => {
                let png_data = rendered.image.to_png(&PngConfig::default())?;
                Some(StagedFile::stage(path, &png_data)?)
            }
            None => None,
        };

        let debug_image = match debug {
            Some(staged) => Some(staged.commit()?),
            None => None,
        };
        wav.commit()?;

        Ok(RenderReport {
            width: rendered.image.width,
            height: rendered.image.height,
            frames: rendered.wav.num_frames,
            duration_seconds: rendered.wav.duration_seconds(),
            pcm_hash: rendered.wav.pcm_hash.clone(),
            output: output.to_path_buf(),
            debug_image,
            elapsed: start.elapsed(),
        })
    }

    fn enter(&mut self, state: PipelineState) {
        tracing::info!(from = %self.state, to = %state, "pipeline state");
        self.state = state;
    }
}

/// Writes `bytes` to `path` through a sibling temporary file and a rename,
/// so `path` either keeps its old contents or receives the complete new ones.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> SpectextResult<()> {
    StagedFile::stage(path, bytes)?.commit()?;
    Ok(())
}

/// Fully written temporary file waiting to be renamed onto its target.
///
/// Dropping it without [`StagedFile::commit`] deletes the temporary file and
/// leaves the target untouched.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
    len: usize,
}

impl StagedFile {
    /// Writes and syncs `bytes` to a temporary file next to `target`,
    /// creating the parent directory if needed.
    pub fn stage(target: &Path, bytes: &[u8]) -> SpectextResult<Self> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| SpectextError::io(parent, e))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| SpectextError::io(target, e))?;
        tmp.write_all(bytes)
            .map_err(|e| SpectextError::io(target, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| SpectextError::io(target, e))?;

        Ok(Self {
            tmp,
            target: target.to_path_buf(),
            len: bytes.len(),
        })
    }

    /// Path the file will be renamed to.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the temporary file onto the target and returns the target path.
    pub fn commit(self) -> SpectextResult<PathBuf> {
        let Self { tmp, target, len } = self;
        tmp.persist(&target)
            .map_err(|e| SpectextError::io(&target, e.error))?;
        tracing::debug!(path = %target.display(), bytes = len, "wrote file");
        Ok(target)
    }
}
