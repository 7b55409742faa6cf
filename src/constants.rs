//! Configuration constants for the charades game
//!
//! This module contains the limits, defaults and well-known keys used
//! throughout the game so that validation and setup screens share the
//! same boundaries.

/// Team setup limits
pub mod teams {
    /// Minimum number of teams (each with at least one player) to start a game
    pub const MIN_TEAMS: usize = 2;
    /// Default maximum number of teams during setup
    pub const DEFAULT_MAX_TEAMS: usize = 8;
    /// Lowest value an administrator may configure for the team cap
    pub const MIN_MAX_TEAMS: usize = 2;
    /// Highest value an administrator may configure for the team cap
    pub const MAX_MAX_TEAMS: usize = 12;
    /// Default maximum number of players in a single team
    pub const DEFAULT_MAX_PLAYERS_PER_TEAM: usize = 10;
    /// Lowest value an administrator may configure for the player cap
    pub const MIN_MAX_PLAYERS_PER_TEAM: usize = 1;
    /// Highest value an administrator may configure for the player cap
    pub const MAX_MAX_PLAYERS_PER_TEAM: usize = 20;
    /// Maximum length of a team or player name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
}

/// Per-game settings limits and defaults
pub mod game {
    /// Turn lengths in seconds that can be selected
    pub const TIME_LIMIT_CHOICES: [u64; 4] = [30, 60, 90, 120];
    /// Default turn length in seconds
    pub const DEFAULT_TIME_LIMIT: u64 = 60;
    /// Minimum rounds each team plays
    pub const MIN_ROUNDS: u8 = 1;
    /// Maximum rounds each team plays
    pub const MAX_ROUNDS: u8 = 10;
    /// Default rounds each team plays
    pub const DEFAULT_ROUNDS: u8 = 5;
}

/// Card and category limits
pub mod cards {
    /// Maximum length of the text on a card
    pub const MAX_TEXT_LENGTH: usize = 200;
    /// Maximum length of a card hint
    pub const MAX_HINT_LENGTH: usize = 200;
    /// Maximum length of a category name
    pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;
    /// Icon shown for categories without their own icon
    pub const DEFAULT_CATEGORY_ICON: &str = "🎯";
    /// Color shown for categories without their own color
    pub const DEFAULT_CATEGORY_COLOR: &str = "from-blue-400 to-purple-500";
    /// Description given to custom categories created without one
    pub const DEFAULT_CATEGORY_DESCRIPTION: &str = "Custom category";
    /// Category label given to loose custom cards created without one
    pub const DEFAULT_CARD_CATEGORY: &str = "Custom";
}

/// Branding defaults
pub mod branding {
    /// Default game title
    pub const TITLE: &str = "Digital Charades";
    /// Default game subtitle
    pub const SUBTITLE: &str = "The Ultimate Party Game";
    /// Default game description
    pub const DESCRIPTION: &str = "The ultimate party game experience! Act out words and phrases while your team guesses. Perfect for families, friends, and gatherings of all sizes.";
    /// Default game icon
    pub const ICON: &str = "🎭";
    /// Default theme gradient token
    pub const PRIMARY_COLOR: &str = "from-purple-400 via-pink-500 to-red-500";
    /// Maximum length of the title and subtitle
    pub const MAX_TITLE_LENGTH: usize = 100;
    /// Maximum length of the description
    pub const MAX_DESCRIPTION_LENGTH: usize = 500;
}

/// Persistence configuration
pub mod storage {
    /// The single key the snapshot is stored under
    pub const KEY: &str = "charades-game-data";
    /// Current snapshot format version
    pub const SNAPSHOT_VERSION: u32 = 1;
}

/// Administrator console access
pub mod admin {
    /// The only accepted admin username
    pub const USERNAME: &str = "GameMicey";
    /// The only accepted admin password
    pub const PASSWORD: &str = "RUReady25?";
}

/// Sound playback
pub mod sound {
    /// Sound URL value meaning "play nothing"
    pub const NONE: &str = "none";
    /// Default master volume
    pub const DEFAULT_VOLUME: f32 = 0.7;
}
