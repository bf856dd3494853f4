//! Languages the cloning server can synthesize.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a language name or code is not recognised.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct LanguageParseError(pub String);

/// A synthesis language.
///
/// The display name is what the server expects in the `language` form
/// field; the short code is what it maps the name to internally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Polish,
    Turkish,
    Russian,
    Dutch,
    Czech,
    Arabic,
    ChineseSimplified,
    Japanese,
    Hungarian,
    Korean,
    Hindi,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 17] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Polish,
        Language::Turkish,
        Language::Russian,
        Language::Dutch,
        Language::Czech,
        Language::Arabic,
        Language::ChineseSimplified,
        Language::Japanese,
        Language::Hungarian,
        Language::Korean,
        Language::Hindi,
    ];

    /// Human-readable name, as sent to the server.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Polish => "Polish",
            Language::Turkish => "Turkish",
            Language::Russian => "Russian",
            Language::Dutch => "Dutch",
            Language::Czech => "Czech",
            Language::Arabic => "Arabic",
            Language::ChineseSimplified => "Chinese (Simplified)",
            Language::Japanese => "Japanese",
            Language::Hungarian => "Hungarian",
            Language::Korean => "Korean",
            Language::Hindi => "Hindi",
        }
    }

    /// Short language code used by the synthesis model.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Polish => "pl",
            Language::Turkish => "tr",
            Language::Russian => "ru",
            Language::Dutch => "nl",
            Language::Czech => "cs",
            Language::Arabic => "ar",
            Language::ChineseSimplified => "zh-cn",
            Language::Japanese => "ja",
            Language::Hungarian => "hu",
            Language::Korean => "ko",
            Language::Hindi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    /// Accepts either the display name (case-insensitive) or the code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.name().eq_ignore_ascii_case(needle) || lang.code().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| LanguageParseError(s.to_string()))
    }
}
