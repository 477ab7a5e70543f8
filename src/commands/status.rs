use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::DatasetManifest;
use crate::store;
use crate::util::read_json;

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_path = args.resolved_manifest_path();
    let db_path = args.resolved_db_path();

    info!(cache_root = %args.cache_root.display(), "status requested");

    if manifest_path.exists() {
        let manifest: DatasetManifest = read_json(&manifest_path)?;

        info!(
            generated_at = %manifest.generated_at,
            db_schema_version = %manifest.db_schema_version,
            sources = manifest.sources.len(),
            warnings = manifest.warnings.len(),
            "loaded dataset manifest"
        );
        for source in &manifest.sources {
            info!(
                table = %source.table,
                path = %source.path,
                sha256 = %source.sha256,
                rows = source.row_count,
                has_low_rank_column = source.has_low_rank_column,
                "dataset source"
            );
        }
        for warning in &manifest.warnings {
            warn!(warning = %warning, "dataset warning");
        }
    } else {
        warn!(path = %manifest_path.display(), "dataset manifest missing");
    }

    if db_path.exists() {
        let connection = store::open_read_only(&db_path)?;
        let weapons = store::count_rows(&connection, "weapons").unwrap_or(0);
        let monsters = store::count_rows(&connection, "monsters").unwrap_or(0);
        let ingested_at = store::read_metadata(&connection, "ingested_at")
            .ok()
            .flatten()
            .unwrap_or_default();

        info!(
            path = %db_path.display(),
            weapons,
            monsters,
            ingested_at = %ingested_at,
            "dataset cache status"
        );
    } else {
        warn!(path = %db_path.display(), "dataset cache missing; run `wilds-navi ingest`");
    }

    Ok(())
}
