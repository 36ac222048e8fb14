// Assistant prompt templates. `{placeholders}` are substituted with `str::replace`.

pub const SUGGEST_SYSTEM: &str = "You help people fill in prompt templates. \
    You propose short, concrete values for a single template field.";

pub const SUGGEST_PROMPT: &str = r#"The user is filling in the "{framework_name}" prompt framework.

FIELD: {field_label}
CURRENT VALUE: {current_value}

Suggest between 3 and 5 alternative values for this field. If the current value is
not empty, improve on it or continue it. Keep each suggestion under 25 words and write
them in the same language as the field label.

OUTPUT SCHEMA (return exactly this structure):
{"suggestions": ["string", "string", "string"]}"#;

pub const FEEDBACK_PROMPT: &str = r#"Review the following prompt and give brief feedback.

PROMPT:
{prompt}

Answer in the same language as the prompt, using exactly these markdown sections:
## Strengths
## Improvements
## Improved prompt"#;

pub const ANALYSIS_PROMPT: &str = r#"Analyze the following prompt in depth.

PROMPT:
{prompt}

Answer in the same language as the prompt, using exactly these markdown sections:
## Clarity
## Specificity
## Context
## Output format
## Risks
## Score
(The Score section is a single line "N/10" followed by one sentence.)"#;

pub const TRANSLATE_SYSTEM: &str = "You are a professional translator for prompt text. \
    Preserve meaning, tone, line breaks and any parameter flags such as --ar 16:9 or --v 6 \
    exactly as written.";

pub const TRANSLATE_PROMPT: &str = r#"Translate the following text from {from} to {to}.

TEXT:
{text}"#;
