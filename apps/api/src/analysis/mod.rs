// Resume analysis: gate, prompt, generation, response parsing, persistence.
// All generation calls go through llm_client via the FeedbackGenerator trait.

pub mod gate;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod records;
