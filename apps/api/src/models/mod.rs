pub mod prompt;
pub mod saved_prompt;
