use thiserror::Error;

/// Errors reported while parsing and validating a spot string. Nothing in
/// the simulation hot path can fail; every problem surfaces here, before a
/// single game is played.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpotError {
    #[error("malformed card token `{0}`")]
    MalformedToken(String),

    #[error("duplicate card `{0}`")]
    DuplicateCard(String),

    #[error("player count must be between 2 and 9, got {0}")]
    BadPlayerCount(usize),

    #[error("board must hold 0, 3, 4 or 5 cards, got {0}")]
    BadBoardSize(usize),

    #[error("spot requires more cards than the deck holds")]
    Overflow,
}
