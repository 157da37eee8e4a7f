use serde::Serialize;

/// Upper bound on frames returned for one video.
pub const MAX_FRAMES: usize = 18;

/// Named window over the normalised timeline [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phase {
    pub name: &'static str,
    pub start_fraction: f64,
    pub end_fraction: f64,
}

/// Fixed phase order. Output frames follow this order, not timestamps.
pub const PHASES: [Phase; 4] = [
    Phase {
        name: "early",
        start_fraction: 0.0,
        end_fraction: 0.35,
    },
    Phase {
        name: "mid",
        start_fraction: 0.35,
        end_fraction: 0.60,
    },
    Phase {
        name: "late",
        start_fraction: 0.60,
        end_fraction: 0.85,
    },
    Phase {
        name: "final",
        start_fraction: 0.85,
        end_fraction: 1.0,
    },
];

/// Extraction parameters for one phase of one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWindow {
    pub phase: Phase,
    pub start_time: f64,
    pub end_time: f64,
    pub interval: f64,
    pub frame_count: usize,
}

impl PhaseWindow {
    pub fn new(phase: Phase, duration: f64, frame_count: usize) -> Self {
        let start_time = duration * phase.start_fraction;
        let end_time = duration * phase.end_fraction;
        // 1s floor keeps narrow windows and very short videos from
        // producing zero or negative intervals.
        let interval = ((end_time - start_time) / frame_count.max(1) as f64).max(1.0);

        Self {
            phase,
            start_time,
            end_time,
            interval,
            frame_count,
        }
    }

    /// Timestamp of the `index`-th extracted frame, rounded to 2 decimals.
    pub fn timestamp_at(&self, index: usize) -> f64 {
        round2(self.start_time + index as f64 * self.interval)
    }
}

/// `ceil(max_frames / phase_count)`.
pub fn frames_per_phase(max_frames: usize, phase_count: usize) -> usize {
    if phase_count == 0 {
        return 0;
    }
    max_frames.div_ceil(phase_count)
}

/// Windows for every phase of a video, in declaration order.
pub fn plan(phases: &[Phase], duration: f64, max_frames: usize) -> Vec<PhaseWindow> {
    let per_phase = frames_per_phase(max_frames, phases.len());
    phases
        .iter()
        .map(|phase| PhaseWindow::new(*phase, duration, per_phase))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
