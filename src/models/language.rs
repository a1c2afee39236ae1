//! Content language definitions

use serde::{Deserialize, Serialize};

/// Wikipedia language edition used for content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// English
    #[default]
    #[serde(rename = "en")]
    English,
    /// Spanish
    #[serde(rename = "es")]
    Spanish,
    /// French
    #[serde(rename = "fr")]
    French,
    /// German
    #[serde(rename = "de")]
    German,
    /// Italian
    #[serde(rename = "it")]
    Italian,
    /// Portuguese
    #[serde(rename = "pt")]
    Portuguese,
    /// Dutch
    #[serde(rename = "nl")]
    Dutch,
    /// Russian
    #[serde(rename = "ru")]
    Russian,
    /// Japanese
    #[serde(rename = "ja")]
    Japanese,
    /// Chinese
    #[serde(rename = "zh")]
    Chinese,
    /// Korean
    #[serde(rename = "ko")]
    Korean,
    /// Arabic
    #[serde(rename = "ar")]
    Arabic,
    /// Hindi
    #[serde(rename = "hi")]
    Hindi,
    /// Turkish
    #[serde(rename = "tr")]
    Turkish,
}

impl Language {
    /// Get all supported languages
    pub const fn all() -> &'static [Self] {
        &[
            Self::English,
            Self::Spanish,
            Self::French,
            Self::German,
            Self::Italian,
            Self::Portuguese,
            Self::Dutch,
            Self::Russian,
            Self::Japanese,
            Self::Chinese,
            Self::Korean,
            Self::Arabic,
            Self::Hindi,
            Self::Turkish,
        ]
    }

    /// Wikipedia subdomain / language code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Portuguese => "pt",
            Self::Dutch => "nl",
            Self::Russian => "ru",
            Self::Japanese => "ja",
            Self::Chinese => "zh",
            Self::Korean => "ko",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
            Self::Turkish => "tr",
        }
    }

    /// English display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Portuguese => "Portuguese",
            Self::Dutch => "Dutch",
            Self::Russian => "Russian",
            Self::Japanese => "Japanese",
            Self::Chinese => "Chinese",
            Self::Korean => "Korean",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
            Self::Turkish => "Turkish",
        }
    }

    /// Name of the language in the language itself
    pub const fn native_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Español",
            Self::French => "Français",
            Self::German => "Deutsch",
            Self::Italian => "Italiano",
            Self::Portuguese => "Português",
            Self::Dutch => "Nederlands",
            Self::Russian => "Русский",
            Self::Japanese => "日本語",
            Self::Chinese => "中文",
            Self::Korean => "한국어",
            Self::Arabic => "العربية",
            Self::Hindi => "हिन्दी",
            Self::Turkish => "Türkçe",
        }
    }

    /// Flag emoji
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::English => "🇬🇧",
            Self::Spanish => "🇪🇸",
            Self::French => "🇫🇷",
            Self::German => "🇩🇪",
            Self::Italian => "🇮🇹",
            Self::Portuguese => "🇵🇹",
            Self::Dutch => "🇳🇱",
            Self::Russian => "🇷🇺",
            Self::Japanese => "🇯🇵",
            Self::Chinese => "🇨🇳",
            Self::Korean => "🇰🇷",
            Self::Arabic => "🇸🇦",
            Self::Hindi => "🇮🇳",
            Self::Turkish => "🇹🇷",
        }
    }

    /// Parse from a language code or English name
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|l| l.code() == s || l.name().to_lowercase() == s)
            .copied()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.flag(), self.native_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Language::from_str("de"), Some(Language::German));
        assert_eq!(Language::from_str(" French "), Some(Language::French));
        assert_eq!(Language::from_str("JA"), Some(Language::Japanese));
        assert_eq!(Language::from_str("klingon"), None);
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Language::Portuguese).unwrap();
        assert_eq!(json, "\"pt\"");
        let parsed: Language = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(parsed, Language::Korean);
    }
}
