use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A path produced coverage data at the build revision but has no
    /// annotate data there. The build artifact and the repository history
    /// disagree, so nothing computed from this batch can be trusted.
    #[error("No annotate data for '{path}' at build revision {revision}")]
    MissingBuildProvenance { revision: String, path: String },

    #[error("Provenance provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, CovmapError>;
