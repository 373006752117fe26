use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' has invalid boolean value '{value}'"))]
    InvalidEnvVar { key: String, value: String },

    #[snafu(display("Failed to read manifest {}: {source}", path.display()))]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse manifest {}: {source}", path.display()))]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("No jobs to run"))]
    EmptyJobList,

    #[snafu(display("Job '{name}' failed: {source}"))]
    JobFailed { name: String, source: Box<Error> },

    #[snafu(display("{} job(s) failed: {}", failed.len(), failed.join(", ")))]
    JobsFailed { failed: Vec<String> },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
