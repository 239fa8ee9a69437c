use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
