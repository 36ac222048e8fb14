// Shared prompt fragments. Each assistant capability keeps its own templates
// in `assistant/prompts.rs`; this file holds what they have in common.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for answers that are inserted verbatim into a field.
pub const PLAIN_TEXT_ONLY: &str = "Respond with the requested text only. \
    Do NOT add quotes, labels, preambles or explanations.";

/// Persona shared by the feedback and analysis capabilities.
pub const PROMPT_COACH_SYSTEM: &str = "You are an expert prompt engineer who reviews \
    prompts written for generative AI tools (chat assistants, image, video and music \
    generators). You are direct, specific and constructive.";
