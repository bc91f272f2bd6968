//! Language code to human-readable name mapping for prompt construction.

/// Convert a language code to the name used in translation prompts.
///
/// Unknown codes pass through verbatim so the backend still gets something
/// meaningful to work with.
pub fn language_name(code: &str) -> String {
    let lowercase = code.to_lowercase();
    let name = match lowercase.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "nl" => "Dutch",
        "pl" => "Polish",
        "zh" => "Chinese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "ar" => "Arabic",
        "fa" => "Persian",
        "hi" => "Hindi",
        "tr" => "Turkish",
        "vi" => "Vietnamese",
        "th" => "Thai",
        "id" => "Indonesian",
        "uk" => "Ukrainian",
        _ => return code.to_string(),
    };
    name.to_string()
}

/// Language codes accepted by the CLI, in catalog order.
pub const LANGUAGE_CODES: [&str; 20] = [
    "en", "es", "fr", "de", "it", "pt", "ru", "nl", "pl", "zh", "ja", "ko", "ar", "fa", "hi", "tr",
    "vi", "th", "id", "uk",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("ja"), "Japanese");
        assert_eq!(language_name("fa"), "Persian");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(language_name("ES"), "Spanish");
        assert_eq!(language_name("Zh"), "Chinese");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        assert_eq!(language_name("xx"), "xx");
        assert_eq!(language_name("tlh"), "tlh");
    }

    #[test]
    fn test_catalog_is_known() {
        for code in LANGUAGE_CODES {
            assert_ne!(language_name(code), code, "{code} missing from catalog");
        }
    }
}
