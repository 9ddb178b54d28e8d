use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Raster dimensions differ: before is {before_width}x{before_height}, after is {after_width}x{after_height}")]
    DimensionMismatch {
        before_width: u32,
        before_height: u32,
        after_width: u32,
        after_height: u32,
    },

    #[error("Invalid raster: {width}x{height} needs {expected} bytes, got {found}")]
    InvalidRaster { width: u32, height: u32, expected: usize, found: usize },

    #[error("Contribution {contribution_id} belongs to player {expected}, not {found}")]
    PlayerMismatch { contribution_id: String, expected: String, found: String },

    #[error("Unknown player: {player_id}")]
    UnknownPlayer { player_id: String },

    #[error("Player registered twice: {player_id}")]
    DuplicatePlayer { player_id: String },

    #[error("Contribution already scored: {contribution_id}")]
    AlreadyScored { contribution_id: String },

    #[error("Player {player_id} already submitted for round {round}")]
    DuplicateSubmission { player_id: String, round: u32 },

    #[error("Match is finished after {max_rounds} rounds")]
    MatchFinished { max_rounds: u32 },

    #[error("Match has no players")]
    NoPlayers,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScoringError {
    /// Faults caused by what the caller handed in, as opposed to engine state.
    pub fn is_input_error(&self) -> bool {
        match self {
            ScoringError::DimensionMismatch { .. } => true,
            ScoringError::InvalidRaster { .. } => true,
            ScoringError::PlayerMismatch { .. } => true,
            ScoringError::UnknownPlayer { .. } => true,
            ScoringError::DuplicatePlayer { .. } => true,
            ScoringError::DuplicateSubmission { .. } => true,
            ScoringError::AlreadyScored { .. } => false,
            ScoringError::MatchFinished { .. } => false,
            ScoringError::NoPlayers => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
