//! Data models for Wort

mod review;
mod settings;
mod word;

pub use review::ReviewData;
pub use settings::{ReviewDirection, ThemeMode, UserSettings};
pub use word::{
    normalize_string_list, Example, FrequencyLevel, Gender, Translation, TranslationLanguage, Word,
    WordId, WordType,
};
