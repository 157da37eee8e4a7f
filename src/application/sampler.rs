use crate::domain::cache_key::CacheKey;
use crate::domain::frames::{Frame, PhaseFrames};
use crate::domain::phases::PhaseWindow;
use crate::error::PipelineError;
use crate::ports::cache::CacheStore;
use crate::ports::media::MediaTool;
use regex::Regex;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Written into a phase directory once extraction finished successfully.
pub const COMPLETION_MARKER: &str = ".complete";

fn frame_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^scene_\d+\.jpg$").expect("valid frame pattern"))
}

/// When a phase directory counts as already extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Only a directory carrying [`COMPLETION_MARKER`]. Anything else found
    /// there is a leftover from an interrupted run and gets cleared.
    #[default]
    Marker,
    /// Any non-empty directory.
    NonEmpty,
}

impl FromStr for CompletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" => Ok(CompletionPolicy::Marker),
            "non-empty" | "nonempty" | "non_empty" => Ok(CompletionPolicy::NonEmpty),
            other => Err(format!("unknown phase completion policy: {}", other)),
        }
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionPolicy::Marker => f.write_str("marker"),
            CompletionPolicy::NonEmpty => f.write_str("non-empty"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseState {
    Missing,
    Empty,
    Stale,
    Complete,
}

async fn phase_state(dir: &Path, policy: CompletionPolicy) -> io::Result<PhaseState> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PhaseState::Missing),
        Err(e) => return Err(e),
    };

    let mut non_empty = false;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name() == COMPLETION_MARKER {
            return Ok(PhaseState::Complete);
        }
        non_empty = true;
    }

    Ok(match (non_empty, policy) {
        (false, _) => PhaseState::Empty,
        (true, CompletionPolicy::NonEmpty) => PhaseState::Complete,
        (true, CompletionPolicy::Marker) => PhaseState::Stale,
    })
}

/// Frame file names in the directory, in lexicographic order.
pub async fn list_frame_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if frame_name_pattern().is_match(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Extracts one phase unless it is already on disk, then lists its frames.
pub async fn sample_phase<C, M>(
    store: &C,
    media: &M,
    video_path: &Path,
    key: &CacheKey,
    window: &PhaseWindow,
    policy: CompletionPolicy,
) -> Result<PhaseFrames, PipelineError>
where
    C: CacheStore + ?Sized,
    M: MediaTool + ?Sized,
{
    let phase = window.phase.name;
    let dir = store.phase_dir(key, phase);

    let state = phase_state(&dir, policy).await?;
    let cached = state == PhaseState::Complete;

    if cached {
        debug!(job = %key, phase, "phase already extracted");
    } else {
        if state == PhaseState::Stale {
            warn!(job = %key, phase, "clearing partial phase output");
            tokio::fs::remove_dir_all(&dir).await?;
        }
        tokio::fs::create_dir_all(&dir).await?;

        info!(
            job = %key,
            phase,
            start = window.start_time,
            interval = window.interval,
            frames = window.frame_count,
            "extracting frames"
        );
        media
            .extract_frames(
                video_path,
                window.start_time,
                window.interval,
                window.frame_count,
                &dir,
            )
            .await
            .map_err(|source| PipelineError::Extraction {
                phase: phase.to_string(),
                source,
            })?;

        tokio::fs::write(dir.join(COMPLETION_MARKER), b"").await?;
    }

    let frames = list_frame_files(&dir)
        .await?
        .into_iter()
        .enumerate()
        .map(|(idx, name)| Frame {
            url: store.frame_url(key, phase, &name),
            timestamp: window.timestamp_at(idx),
            phase: phase.to_string(),
        })
        .collect();

    Ok(PhaseFrames {
        phase: phase.to_string(),
        frames,
        cached,
    })
}
