use super::budget::WORDS_PER_SECOND;
use serde::Serialize;

/// One sampled still, addressable by clients through `url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub url: String,
    pub timestamp: f64,
    pub phase: String,
}

/// Frames produced for a single phase, plus whether they came from cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseFrames {
    pub phase: String,
    pub frames: Vec<Frame>,
    pub cached: bool,
}

/// Response body for a processed video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePayload {
    pub job_id: String,
    pub duration: f64,
    pub word_budget: u64,
    pub words_per_second: f64,
    pub total_frames: usize,
    pub frames: Vec<Frame>,
    pub cached: bool,
}

impl FramePayload {
    /// Concatenates phase outputs in the given order and caps the result at
    /// `max_frames`. `cached` holds only when the video and every phase were
    /// already on disk.
    pub fn assemble(
        job_id: String,
        duration: f64,
        word_budget: u64,
        phases: Vec<PhaseFrames>,
        video_cached: bool,
        max_frames: usize,
    ) -> Self {
        let all_phases_cached = phases.iter().all(|p| p.cached);
        let frames: Vec<Frame> = phases
            .into_iter()
            .flat_map(|p| p.frames)
            .take(max_frames)
            .collect();

        Self {
            job_id,
            duration,
            word_budget,
            words_per_second: WORDS_PER_SECOND,
            total_frames: frames.len(),
            frames,
            cached: video_cached && all_phases_cached,
        }
    }
}
