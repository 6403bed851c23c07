use crate::village::model::ensure_unique_ids;
use crate::village::VillageRecord;
use anyhow::Context;
use std::path::Path;

/// Reads a JSON array of village records. Ids must be unique within the file.
pub async fn read_json_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<VillageRecord>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    parse_records(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_records(text: &str) -> anyhow::Result<Vec<VillageRecord>> {
    let records: Vec<VillageRecord> = serde_json::from_str(text)?;
    ensure_unique_ids(&records)?;
    Ok(records)
}
