// Prompt constants and builders for the roadmap pipeline.

use serde::{Deserialize, Serialize};

/// A user's profile as submitted through the form. Four free-text fields,
/// validated client-side only (non-empty after trim).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub skills: String,
    pub interests: String,
    pub goals: String,
}

/// Roadmap prompt template. Replace `{name}`, `{skills}`, `{interests}`,
/// `{goals}` before sending. Spells out the exact JSON schema the
/// normalizer expects and forbids fences/prose so extraction stays cheap.
const ROADMAP_PROMPT_TEMPLATE: &str = r#"User: {name}
Skills: {skills}
Interests: {interests}
Goals: {goals}

Create a step-by-step career roadmap for this user.

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "One-paragraph overview of the plan",
  "weeklyPlan": ["Week-by-week habit or task", "..."],
  "phases": [
    {
      "title": "Phase name",
      "duration": "2-4 weeks",
      "focus": "What this phase is about",
      "actions": ["Concrete step", "..."],
      "projects": ["Portfolio project", "..."],
      "resources": ["Course, book, or link", "..."]
    }
  ]
}

Rules:
- Respond with valid JSON only.
- Do NOT use markdown code fences.
- Do NOT include any text outside the JSON object.
- At most 4 phases."#;

/// Formats the profile into the completion prompt. Pure string formatting;
/// the fields are embedded verbatim.
pub fn build_prompt(profile: &Profile) -> String {
    ROADMAP_PROMPT_TEMPLATE
        .replace("{name}", &profile.name)
        .replace("{skills}", &profile.skills)
        .replace("{interests}", &profile.interests)
        .replace("{goals}", &profile.goals)
}
