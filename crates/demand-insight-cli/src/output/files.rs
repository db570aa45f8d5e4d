use serde::Serialize;
use std::fs;
use std::path::Path;

/// Create the directory (and parents) before writing into it. Failures are
/// fatal and name the attempted path.
pub fn ensure_dir(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create directory '{}': {}", dir.display(), e).into())
}

/// Write serde rows as CSV. With zero rows the header line is still written
/// so the export stays a valid table.
pub fn write_csv_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
    empty_headers: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;

    if rows.is_empty() {
        wtr.write_record(empty_headers)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }
    wtr.flush()
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(())
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, contents)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e).into())
}
