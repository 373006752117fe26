// JSON job manifests for `progline batch`
use crate::error::{ManifestParseSnafu, ManifestReadSnafu, Result};
use crate::runner::JobSpec;
use serde::Deserialize;
use snafu::ResultExt;
use std::path::Path;
use tokio::fs;

/// A batch of jobs plus optional display settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub title: Option<String>,
    /// Maximum number of jobs running at once.
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub units: Option<String>,
    pub tasks: Vec<TaskEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub command: String,
}

impl Manifest {
    pub fn job_specs(&self) -> Vec<JobSpec> {
        self.tasks
            .iter()
            .map(|task| match &task.name {
                Some(name) => JobSpec::new(name.clone(), task.command.clone()),
                None => JobSpec::from_command(task.command.clone()),
            })
            .collect()
    }
}

/// Read and parse a manifest file.
pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    log::debug!("load_manifest path={}", path.display());
    let text = fs::read_to_string(path).await.context(ManifestReadSnafu {
        path: path.to_path_buf(),
    })?;
    serde_json::from_str(&text).context(ManifestParseSnafu {
        path: path.to_path_buf(),
    })
}
