//! Language names used by text records and their two letter codes

use std::sync::LazyLock;

use ahash::AHashMap;

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_CODE: &str = "en";

pub const LANGUAGES: [(&str, &str); 19] = [
    ("Arabic", "ar"),
    ("Bengali", "bn"),
    ("Chinese", "zh"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hebrew", "he"),
    ("Hindi", "hi"),
    ("Irish", "ga"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Latin", "la"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Spanish", "es"),
];

static NAME_TO_CODE: LazyLock<AHashMap<&'static str, &'static str>> =
    LazyLock::new(|| LANGUAGES.into_iter().collect());

static CODE_TO_NAME: LazyLock<AHashMap<&'static str, &'static str>> =
    LazyLock::new(|| LANGUAGES.into_iter().map(|(name, code)| (code, name)).collect());

/// `English` -> `en`, unknown names fall back to `en`
pub fn lang_to_code(name: &str) -> &'static str {
    NAME_TO_CODE.get(name).copied().unwrap_or(DEFAULT_CODE)
}

/// `en` -> `English`, region subtags are ignored (`pt-BR` -> `Portuguese`)
pub fn code_to_lang(code: &str) -> &'static str {
    let primary = code.split(['-', '_']).next().unwrap_or_default();
    CODE_TO_NAME
        .get(primary)
        .or_else(|| CODE_TO_NAME.get(primary.to_ascii_lowercase().as_str()))
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

pub fn is_known_language(name: &str) -> bool {
    NAME_TO_CODE.contains_key(name)
}
