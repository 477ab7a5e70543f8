use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::dataset::{MonsterTable, RawTable, WeaponTable};
use crate::model::{DatasetManifest, SourceEntry};
use crate::store::DB_SCHEMA_VERSION;
use crate::util::{read_source_file, sha256_hex};

#[derive(Debug, Clone)]
pub(super) struct LoadedSheet {
    pub path: PathBuf,
    pub sha256: String,
    pub table: RawTable,
}

pub(super) fn load_sheet(path: &Path) -> Result<LoadedSheet> {
    let bytes = read_source_file(path)?;
    let table = RawTable::from_json_slice(&bytes)
        .with_context(|| format!("failed to parse sheet export: {}", path.display()))?;

    debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "loaded sheet export"
    );

    Ok(LoadedSheet {
        path: path.to_path_buf(),
        sha256: sha256_hex(&bytes),
        table,
    })
}

const NO_MONSTER_SHEET: &str = "no monster sheet supplied; monster detection is disabled";

/// Data quality notes that do not stop an ingest.
pub(super) fn collect_warnings(
    weapons: &WeaponTable,
    monsters: Option<&MonsterTable>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if !weapons.has_low_rank {
        warnings.push(
            "weapon sheet has no 下位 column; low-rank availability filtering is disabled"
                .to_string(),
        );
    }

    let unknown_rarity = weapons
        .records
        .iter()
        .filter(|record| record.rarity.as_number().is_none())
        .count();
    if unknown_rarity > 0 {
        warnings.push(format!(
            "{unknown_rarity} weapon rows have a non-numeric レア度 and never pass rarity filters"
        ));
    }

    let unknown_attack = weapons
        .records
        .iter()
        .filter(|record| record.total_attack.as_number().is_none())
        .count();
    if unknown_attack > 0 {
        warnings.push(format!(
            "{unknown_attack} weapon rows have a non-numeric 総攻撃力 and are never ranked by it"
        ));
    }

    match monsters {
        None => warnings.push(NO_MONSTER_SHEET.to_string()),
        Some(table) => {
            let blank_weakness = table
                .records
                .iter()
                .filter(|record| record.weakness.trim().is_empty())
                .count();
            if blank_weakness > 0 {
                warnings.push(format!(
                    "{blank_weakness} monster rows have no 弱点 and are never detected"
                ));
            }
        }
    }

    warnings
}

pub(super) fn build_manifest(
    db_path: &Path,
    weapon_sheet: &LoadedSheet,
    weapons: &WeaponTable,
    monster_source: Option<(&LoadedSheet, &MonsterTable)>,
    warnings: Vec<String>,
    generated_at: String,
) -> DatasetManifest {
    let mut sources = vec![SourceEntry {
        table: "weapons".to_string(),
        path: weapon_sheet.path.display().to_string(),
        sha256: weapon_sheet.sha256.clone(),
        row_count: weapons.records.len(),
        has_low_rank_column: weapons.has_low_rank,
    }];

    if let Some((sheet, table)) = monster_source {
        sources.push(SourceEntry {
            table: "monsters".to_string(),
            path: sheet.path.display().to_string(),
            sha256: sheet.sha256.clone(),
            row_count: table.records.len(),
            has_low_rank_column: table.has_low_rank,
        });
    }

    DatasetManifest {
        manifest_version: 1,
        generated_at,
        db_path: db_path.display().to_string(),
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        sources,
        warnings,
    }
}
