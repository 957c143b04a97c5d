use crate::error::TempoResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Read a JSON array from `path`. A missing or blank file is an empty list.
pub async fn read_json_list<T: DeserializeOwned>(path: &Path) -> TempoResult<Vec<T>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Overwrite `path` with `items` as a pretty-printed JSON array
pub async fn write_json_list<T: Serialize>(path: &Path, items: &[T]) -> TempoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(items)?;
    fs::write(path, json).await?;
    Ok(())
}
