use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{binary} executable not found")]
    BinaryNotFound { binary: String },

    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} exited with code {}: {detail}", code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    Failed {
        binary: String,
        code: Option<i32>,
        detail: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn spawn(binary: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::BinaryNotFound {
                binary: binary.to_string(),
            }
        } else {
            Self::Spawn {
                binary: binary.to_string(),
                source,
            }
        }
    }
}
