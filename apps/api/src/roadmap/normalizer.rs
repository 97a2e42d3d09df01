//! Response Normalizer — turns loosely-structured model output into the
//! fixed RoadmapData schema and a flattened human-readable rendering.
//!
//! Pipeline: extract a JSON object from the raw text → decode → coerce
//! field-by-field (permissively: wrong-typed fields degrade to empty
//! defaults, they never error) → validate (at least one phase) → render.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const MAX_PHASES: usize = 4;
const MAX_WEEKLY_PLAN: usize = 5;
const MAX_ACTIONS: usize = 5;
const MAX_PROJECTS: usize = 3;
const MAX_RESOURCES: usize = 4;

const DEFAULT_DURATION: &str = "2-4 weeks";

/// One stage of a roadmap with bounded action/project/resource lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    pub duration: String,
    pub focus: String,
    pub actions: Vec<String>,
    pub projects: Vec<String>,
    pub resources: Vec<String>,
}

/// The full structured roadmap. Valid only when `phases` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapData {
    pub summary: String,
    pub weekly_plan: Vec<String>,
    pub phases: Vec<RoadmapPhase>,
}

/// Structured data plus its flattened text form, as returned to the caller
/// and persisted (text only) in the submission record.
#[derive(Debug, Clone)]
pub struct NormalizedRoadmap {
    pub data: RoadmapData,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// No JSON object could be located in the raw text.
    #[error("could not parse AI response")]
    Extract,

    /// The located slice was not valid JSON. Propagates unclassified.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Decoded fine but did not coerce into a roadmap with at least one phase.
    #[error("could not build a structured roadmap")]
    Structure,
}

/// Runs the full normalization pipeline on raw completion text.
pub fn normalize(raw: &str) -> Result<NormalizedRoadmap, NormalizeError> {
    let slice = extract_json(raw)?;
    let value: Value = serde_json::from_str(slice)?;
    let data = coerce_roadmap(&value).ok_or(NormalizeError::Structure)?;
    if data.phases.is_empty() {
        return Err(NormalizeError::Structure);
    }
    let text = render(&data);
    Ok(NormalizedRoadmap { data, text })
}

/// Locates the JSON object inside raw completion text: strips an optional
/// leading/trailing code fence, then slices from the first `{` to the last
/// `}` (inclusive). The closing brace must strictly follow the opening one.
pub fn extract_json(raw: &str) -> Result<&str, NormalizeError> {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);

    let start = text.find('{').ok_or(NormalizeError::Extract)?;
    let end = text.rfind('}').ok_or(NormalizeError::Extract)?;
    if end <= start {
        return Err(NormalizeError::Extract);
    }
    Ok(&text[start..=end])
}

/// Coerces a decoded JSON value into RoadmapData. Returns None when the
/// root is not an object; individual fields degrade to empty defaults.
pub fn coerce_roadmap(value: &Value) -> Option<RoadmapData> {
    if !value.is_object() {
        return None;
    }

    let phases = match value.get("phases").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .take(MAX_PHASES)
            .enumerate()
            .map(|(i, phase)| coerce_phase(phase, i))
            .collect(),
        None => Vec::new(),
    };

    Some(RoadmapData {
        summary: coerce_string(value.get("summary")),
        weekly_plan: coerce_string_list(value.get("weeklyPlan"), MAX_WEEKLY_PLAN),
        phases,
    })
}

fn coerce_phase(value: &Value, index: usize) -> RoadmapPhase {
    let title = coerce_string(value.get("title"));
    let duration = coerce_string(value.get("duration"));

    RoadmapPhase {
        title: if title.is_empty() {
            format!("Phase {}", index + 1)
        } else {
            title
        },
        duration: if duration.is_empty() {
            DEFAULT_DURATION.to_string()
        } else {
            duration
        },
        focus: coerce_string(value.get("focus")),
        actions: coerce_string_list(value.get("actions"), MAX_ACTIONS),
        projects: coerce_string_list(value.get("projects"), MAX_PROJECTS),
        resources: coerce_string_list(value.get("resources"), MAX_RESOURCES),
    }
}

/// Best-effort scalar-to-string coercion: strings are trimmed, numbers and
/// booleans are stringified, anything else becomes empty.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Filter-trim-truncate rule shared by all list fields: non-sequence
/// sources yield an empty list; elements that do not coerce to a non-empty
/// string are dropped; the result is capped at `max`.
fn coerce_string_list(value: Option<&Value>, max: usize) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|item| coerce_string(Some(item)))
            .filter(|s| !s.is_empty())
            .take(max)
            .collect(),
        None => Vec::new(),
    }
}

/// Flattens RoadmapData into the human-readable text persisted alongside
/// the submission. Sections are separated by blank lines.
pub fn render(data: &RoadmapData) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !data.summary.is_empty() {
        sections.push(format!("Summary: {}", data.summary));
    }

    if !data.weekly_plan.is_empty() {
        let mut lines = vec!["Weekly plan:".to_string()];
        for (i, entry) in data.weekly_plan.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, entry));
        }
        sections.push(lines.join("\n"));
    }

    for (i, phase) in data.phases.iter().enumerate() {
        let mut lines = vec![format!("{}. {} ({})", i + 1, phase.title, phase.duration)];
        if !phase.focus.is_empty() {
            lines.push(format!("Focus: {}", phase.focus));
        }
        for (heading, items) in [
            ("Actions:", &phase.actions),
            ("Projects:", &phase.projects),
            ("Resources:", &phase.resources),
        ] {
            if !items.is_empty() {
                lines.push(heading.to_string());
                for item in items {
                    lines.push(format!("- {item}"));
                }
            }
        }
        sections.push(lines.join("\n"));
    }

    sections.join("\n\n")
}
