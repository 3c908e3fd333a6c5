use thiserror::Error;

#[derive(Debug, Error)]
pub enum MipError {
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("unknown variable x{index} (model has {num_vars} variables)")]
    UnknownVariable { index: usize, num_vars: usize },
    #[error("LP relaxation failed at node {node}: {source}")]
    Relaxation {
        node: u64,
        #[source]
        source: minilp::Error,
    },
}

pub type MipResult<T> = std::result::Result<T, MipError>;

impl MipError {
    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel(message.into())
    }
}
