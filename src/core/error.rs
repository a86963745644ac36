use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Remote generation error: {0}")]
    Remote(String),

    #[error("Document parse error: {0}")]
    Parse(String),

    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
