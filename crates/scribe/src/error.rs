#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Failed to construct backend client: {0}")]
    ClientBuild(String),
}
