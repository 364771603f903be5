use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wort_core::models::{FrequencyLevel, Gender, WordType};

#[derive(Parser)]
#[command(name = "wort")]
#[command(about = "Manage your German vocabulary from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name for sync configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Quick capture: wort "Fernweh"
    #[arg(trailing_var_arg = true)]
    pub word: Vec<String>,
}

/// Word field flags shared by `add` and `edit`.
#[derive(Args, Default)]
pub struct WordFieldArgs {
    /// English translation (comma-separated alternatives)
    #[arg(long = "en", value_name = "TEXT")]
    pub english: Option<String>,
    /// Russian translation (comma-separated alternatives)
    #[arg(long = "ru", value_name = "TEXT")]
    pub russian: Option<String>,
    /// Ukrainian translation (comma-separated alternatives)
    #[arg(long = "uk", value_name = "TEXT")]
    pub ukrainian: Option<String>,
    /// Word type (noun, verb, adjective, ...)
    #[arg(long, value_name = "TYPE")]
    pub word_type: Option<WordType>,
    /// Definite article for nouns (der/die/das)
    #[arg(long, value_name = "ARTICLE")]
    pub gender: Option<Gender>,
    /// CEFR level (A1..C2)
    #[arg(long, value_name = "LEVEL")]
    pub level: Option<FrequencyLevel>,
    /// Example sentence, optionally with translation: "Satz=translation"
    #[arg(long = "example", value_name = "SENTENCE")]
    pub examples: Vec<String>,
    /// Synonym (repeatable; replaces the stored set when editing)
    #[arg(long = "synonym", value_name = "WORD")]
    pub synonyms: Vec<String>,
    /// Antonym (repeatable; replaces the stored set when editing)
    #[arg(long = "antonym", value_name = "WORD")]
    pub antonyms: Vec<String>,
    /// Collocation (repeatable; replaces the stored set when editing)
    #[arg(long = "collocation", value_name = "PHRASE")]
    pub collocations: Vec<String>,
    /// Free-text notes
    #[arg(long, value_name = "TEXT")]
    pub notes: Option<String>,
    /// Image resource URL
    #[arg(long, value_name = "URL")]
    pub image_url: Option<String>,
    /// Audio resource URL
    #[arg(long, value_name = "URL")]
    pub audio_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new word
    #[command(alias = "new")]
    Add {
        /// German headword
        german: String,
        #[command(flatten)]
        fields: WordFieldArgs,
    },
    /// List recent words
    List {
        /// Number of words to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Filter by word type
        #[arg(long, value_name = "TYPE")]
        word_type: Option<WordType>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search words
    Search {
        /// Search query
        query: String,
        /// Number of words to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a word in full
    Show {
        /// Word ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing word
    Edit {
        /// Word ID or unique ID prefix
        id: String,
        #[command(flatten)]
        fields: WordFieldArgs,
    },
    /// Delete an existing word
    Delete {
        /// Word ID or unique ID prefix
        id: String,
    },
    /// Export words
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Synchronize the local store with the word API
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Manage user settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored sign-in principal
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Push every local word through the change-set protocol (default)
    Push,
    /// Full refresh: replace the local store with the remote word list
    Pull,
    /// Show connectivity, auth, and cursor state
    Status,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Update settings
    Set {
        /// Preferred languages, comma-separated codes (e.g. "en,ru")
        #[arg(long, value_name = "CODES")]
        languages: Option<String>,
        /// Review direction (german-to-translation, translation-to-german, both)
        #[arg(long, value_name = "DIRECTION")]
        review_direction: Option<String>,
        /// Daily review goal
        #[arg(long, value_name = "N")]
        daily_goal: Option<u32>,
        /// Theme (light, dark, system)
        #[arg(long, value_name = "THEME")]
        theme: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Word API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Hosting site URL whose /.auth/me endpoint resolves the principal
        #[arg(long, value_name = "URL")]
        auth_site_url: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store the sign-in principal for this profile
    Login {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Principal user id
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Principal display name (usually the account email)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// Identity provider name
        #[arg(long, value_name = "IDP", default_value = "github")]
        provider: String,
        /// Base64 principal blob as issued by the hosting platform
        #[arg(long, value_name = "BLOB", conflicts_with_all = ["user_id", "name"])]
        principal: Option<String>,
    },
    /// Show auth status for profile
    Status {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Clear the stored principal
    Logout {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
