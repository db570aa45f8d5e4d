use std::fs;
use std::path::Path;

use demand_insight_core::PipelineConfig;

use crate::input::stdin;

/// Resolve the pipeline configuration: an explicit `--config` file (JSON or
/// YAML by extension), piped stdin JSON, or the built-in defaults.
pub fn load_config(path: Option<&str>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    if let Some(p) = path {
        return read_config_file(p);
    }
    if let Some(value) = stdin::read_stdin()? {
        return Ok(serde_json::from_value(value)?);
    }
    Ok(PipelineConfig::default())
}

fn read_config_file(path: &str) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let ext = canonical
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let config = if matches!(ext, "yaml" | "yml") {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(config)
}

/// Resolve and validate the path before reading.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
