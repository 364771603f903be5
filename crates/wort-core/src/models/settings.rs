//! User settings model

use serde::{Deserialize, Serialize};

use super::TranslationLanguage;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

/// Direction for review prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewDirection {
    #[default]
    GermanToTranslation,
    TranslationToGerman,
    Both,
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Translation languages shown in listings, in preference order
    pub preferred_languages: Vec<TranslationLanguage>,
    pub review_direction: ReviewDirection,
    pub daily_review_goal: u32,
    pub theme: ThemeMode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            preferred_languages: TranslationLanguage::ALL.to_vec(),
            review_direction: ReviewDirection::GermanToTranslation,
            daily_review_goal: 20,
            theme: ThemeMode::System,
        }
    }
}

impl UserSettings {
    /// First preferred language, used for compact listings
    #[must_use]
    pub fn primary_language(&self) -> TranslationLanguage {
        self.preferred_languages
            .first()
            .copied()
            .unwrap_or(TranslationLanguage::English)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = UserSettings::default();
        assert_eq!(settings.daily_review_goal, 20);
        assert_eq!(settings.theme, ThemeMode::System);
        assert_eq!(settings.primary_language(), TranslationLanguage::English);
    }

    #[test]
    fn primary_language_falls_back_to_english() {
        let settings = UserSettings {
            preferred_languages: Vec::new(),
            ..UserSettings::default()
        };
        assert_eq!(settings.primary_language(), TranslationLanguage::English);
    }
}
