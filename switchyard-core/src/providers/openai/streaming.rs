//! SSE re-framing for OpenAI-style streams

use super::converter::map_finish_reason;
use super::types::{ChatCompletionChunk, ReframedChoice, ReframedChunk};
use crate::providers::error::TransformResult;
use crate::providers::support::{sse_data, Reframed, DONE_FRAME, DONE_SENTINEL, SSE_DATA_PREFIX};

/// Re-frame one upstream line
///
/// Errors only on payloads that are not chunk JSON; the caller decides how
/// to fail open.
pub fn reframe_line(raw: &str) -> TransformResult<Reframed> {
    let Some(payload) = raw.strip_prefix(SSE_DATA_PREFIX) else {
        return Ok(Reframed::Unchanged);
    };

    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return Ok(Reframed::Frame(DONE_FRAME.to_string()));
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(payload)?;
    let choice = chunk.choices.into_iter().next();
    if choice.is_none() && chunk.usage.is_none() {
        return Ok(Reframed::Suppressed);
    }

    let reframed = ReframedChunk {
        id: chunk.id,
        model: chunk.model,
        created: chunk.created,
        choices: choice
            .map(|choice| ReframedChoice {
                index: choice.index,
                delta: choice.delta,
                finish_reason: choice.finish_reason.as_deref().and_then(map_finish_reason),
            })
            .into_iter()
            .collect(),
        usage: chunk.usage,
    };

    sse_data(&reframed).map(Reframed::Frame)
}
