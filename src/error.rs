use thiserror::Error;

/// Reasons a level table cannot become a playable grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LevelError {
    #[error("level grid is empty")]
    EmptyGrid,

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {glyph:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, glyph: char },

    #[error("level has no player spawn marker")]
    MissingPlayerSpawn,

    #[error("level has no enemy spawn markers")]
    NoEnemySpawns,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid level {level}: {source}")]
    InvalidLevel {
        level: usize,
        #[source]
        source: LevelError,
    },

    #[error("no level numbered {0}")]
    UnknownLevel(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimError>;
