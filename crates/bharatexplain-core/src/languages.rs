//! Languages offered for translating explanations.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TranslationLanguage {
    pub code: &'static str,
    pub label: &'static str,
}

pub const TRANSLATION_LANGUAGES: &[TranslationLanguage] = &[
    TranslationLanguage { code: "en-IN", label: "English (Bharat)" },
    TranslationLanguage { code: "hi-IN", label: "Hindi (हिंदी)" },
    TranslationLanguage { code: "bn-IN", label: "Bengali (বাংলা)" },
    TranslationLanguage { code: "te-IN", label: "Telugu (తెలుగు)" },
    TranslationLanguage { code: "mr-IN", label: "Marathi (मराठी)" },
    TranslationLanguage { code: "ta-IN", label: "Tamil (தமிழ்)" },
    TranslationLanguage { code: "gu-IN", label: "Gujarati (ગુજરાતી)" },
    TranslationLanguage { code: "kn-IN", label: "Kannada (ಕನ್ನಡ)" },
    TranslationLanguage { code: "ml-IN", label: "Malayalam (മലയാളം)" },
    TranslationLanguage { code: "pa-IN", label: "Punjabi (ਪੰਜਾਬੀ)" },
    TranslationLanguage { code: "ur-IN", label: "Urdu (اردو)" },
    TranslationLanguage { code: "or-IN", label: "Odia (ଓଡ଼ିଆ)" },
    TranslationLanguage { code: "as-IN", label: "Assamese (অসমীয়া)" },
];

/// Display label for a language code. Unknown codes are their own label.
pub fn language_label(code: &str) -> &str {
    TRANSLATION_LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.label)
        .unwrap_or(code)
}
