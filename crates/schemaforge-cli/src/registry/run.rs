use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use schemaforge_render::{GenerateRequest, RenderOutput};

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// Where the raw columns come from (file path or collector label).
    pub source: String,
    pub contract_version: String,
    pub run_dir: PathBuf,
    pub out: Option<PathBuf>,
    pub request: GenerateRequest,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub source: String,
    pub contract_version: String,
    pub request: GenerateRequest,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub render_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn run_folder_name(ctx: &RunContext) -> String {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ");
    format!("{timestamp}__run_{}", ctx.run_id)
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let root = ctx.run_dir.join(run_folder_name(ctx));
    create_dir_all(&root)?;

    let render_path = root.join("render.json");
    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        source: ctx.source.clone(),
        contract_version: ctx.contract_version.clone(),
        request: ctx.request.clone(),
        git: collect_git_info(),
    };
    write_json(&config_path, &config)?;

    OpenOptions::new().create(true).append(true).open(&logs_path)?;

    Ok(RunPaths {
        root,
        render_path,
        logs_path,
    })
}

/// Write `render.json` into the run folder and, when asked, a copy to `out_path`.
pub fn write_render(
    paths: &RunPaths,
    output: &RenderOutput,
    out_path: Option<&Path>,
) -> RegistryResult<()> {
    write_json(&paths.render_path, output)?;

    if let Some(out_path) = out_path {
        if let Some(parent) = out_path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }
        write_json(out_path, output)?;
    }

    Ok(())
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new().create(true).truncate(true).write(true).open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn run_folder_sorts_by_start_time() {
        let ctx = RunContext {
            run_id: "4b1c".to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).single().expect("time"),
            source: "raw.json".to_string(),
            contract_version: "0.1".to_string(),
            run_dir: PathBuf::from("runs"),
            out: None,
            request: GenerateRequest::default(),
        };
        assert_eq!(run_folder_name(&ctx), "2026-03-14T09-26-53Z__run_4b1c");
    }
}
