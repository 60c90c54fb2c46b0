use crate::processor::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid processor configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("layout was canceled")]
    Canceled,
}

pub type Result<T> = std::result::Result<T, Error>;
