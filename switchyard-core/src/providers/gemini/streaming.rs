//! Re-framing of Gemini stream units
//!
//! `streamGenerateContent` sends whole JSON objects, either as SSE data lines
//! (`alt=sse`) or as elements of one JSON array spread across lines. A unit is
//! recognised by the candidates marker, not by a line prefix.

use super::converter::map_finish_reason;
use super::types::{GenerateContentResponse, ReframedCandidate, ReframedCandidateChunk};
use crate::providers::error::{TransformError, TransformResult};
use crate::providers::support::{sse_data, Reframed, SSE_DATA_PREFIX};
use serde::Deserialize;
use serde_json::Value;

/// Substring present in every unit carrying model output
pub const CANDIDATES_MARKER: &str = "\"candidates\"";

pub fn reframe_chunk(raw: &str) -> TransformResult<Reframed> {
    if !raw.contains(CANDIDATES_MARKER) {
        return Ok(Reframed::Unchanged);
    }

    let value: Value = serde_json::from_str(unwrap_framing(raw))?;
    if !value.is_object() {
        return Err(TransformError::UnexpectedShape(format!(
            "expected a JSON object, found {}",
            value
        )));
    }

    let chunk = GenerateContentResponse::deserialize(&value)?;
    let candidate = chunk.candidates.into_iter().next();
    if candidate.is_none() && chunk.usage_metadata.is_none() {
        return Ok(Reframed::Suppressed);
    }

    let reframed = ReframedCandidateChunk {
        candidates: candidate
            .map(|candidate| ReframedCandidate {
                content: candidate.content.unwrap_or_default(),
                finish_reason: candidate.finish_reason.as_deref().map(map_finish_reason),
            })
            .into_iter()
            .collect(),
        usage_metadata: chunk.usage_metadata,
    };

    sse_data(&reframed).map(Reframed::Frame)
}

/// Strip SSE and JSON-array framing around one object
fn unwrap_framing(raw: &str) -> &str {
    let mut payload = raw.trim();
    if let Some(rest) = payload.strip_prefix(SSE_DATA_PREFIX.trim_end()) {
        payload = rest.trim_start();
    }
    payload
        .trim_start_matches(['[', ','])
        .trim_end_matches([']', ','])
        .trim()
}
