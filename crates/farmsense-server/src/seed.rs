use crate::config::AnimalsSeedFile;
use anyhow::Result;
use farmsense_storage::AnimalRepository;
use std::collections::HashSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: u32,
    pub skipped: u32,
    pub failed: u32,
}

pub fn load_seed_file(path: &str) -> Result<AnimalsSeedFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read seed file '{}': {}", path, e))?;
    let seed: AnimalsSeedFile = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse seed file '{}': {}", path, e))?;
    Ok(seed)
}

/// Inserts the seed animals, skipping display ids already in the store or
/// repeated within the seed itself.
pub async fn init_animals(
    store: &dyn AnimalRepository,
    seed: &AnimalsSeedFile,
) -> Result<SeedSummary> {
    let mut existing: HashSet<String> = store
        .list_animals()
        .await?
        .into_iter()
        .map(|a| a.display_id)
        .collect();

    let mut summary = SeedSummary::default();
    for animal in &seed.animals {
        if animal.display_id.trim().is_empty() {
            tracing::warn!("Seed animal without display id, skipping");
            summary.skipped += 1;
            continue;
        }
        if existing.contains(&animal.display_id) {
            tracing::warn!(display_id = %animal.display_id, "Animal already exists, skipping");
            summary.skipped += 1;
            continue;
        }

        match store.insert_animal(animal).await {
            Ok(inserted) => {
                tracing::info!(display_id = %inserted.display_id, id = %inserted.id, "Animal created");
                existing.insert(inserted.display_id);
                summary.created += 1;
            }
            Err(e) => {
                tracing::error!(display_id = %animal.display_id, error = %e, "Failed to create animal");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.failed,
        "init-animals completed"
    );
    Ok(summary)
}
