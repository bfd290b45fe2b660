// Discharge summary pipeline: template registry, diagnosis resolution,
// prompt assembly, output sanitation, generation.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod assembler;
pub mod generator;
pub mod handlers;
pub mod sanitize;
pub mod templates;
