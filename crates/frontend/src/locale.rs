const FALLBACK_LANGUAGE: &str = "en";

/// First subtag of a BCP 47 tag ("vi-VN" -> "vi"), or "en".
pub fn primary_subtag(language: Option<&str>) -> String {
    language
        .and_then(|tag| tag.split('-').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

/// Language hint for the geocoder, from `navigator.language`.
pub fn browser_language() -> String {
    let language = web_sys::window().and_then(|w| w.navigator().language());
    primary_subtag(language.as_deref())
}
