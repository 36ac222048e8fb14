use crate::models::prompt::Language;

/// Preview text shown while the session is pristine.
pub fn placeholder(language: Language, ai_available: bool) -> &'static str {
    match (language, ai_available) {
        (Language::En, true) => {
            "Your prompt will appear here. Fill in the fields or ask the assistant for suggestions."
        }
        (Language::En, false) => "Your prompt will appear here as you fill in the fields.",
        (Language::Es, true) => {
            "Tu prompt aparecerá aquí. Completa los campos o pide sugerencias al asistente."
        }
        (Language::Es, false) => "Tu prompt aparecerá aquí a medida que completes los campos.",
    }
}
