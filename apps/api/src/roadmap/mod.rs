// Roadmap generation pipeline: prompt build → completion call → normalization → persistence.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod normalizer;
pub mod prompts;
