use anyhow::{Context, Result};
use tracing::{info, warn};

use super::source::{build_manifest, collect_warnings, load_sheet};
use crate::cli::IngestArgs;
use crate::dataset::{MonsterTable, WeaponTable};
use crate::store;
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: IngestArgs) -> Result<()> {
    let db_path = args.resolved_db_path();
    let manifest_path = args.resolved_manifest_path();

    info!(
        cache_root = %args.cache_root.display(),
        weapons = %args.weapons.display(),
        "starting ingest"
    );

    let weapon_sheet = load_sheet(&args.weapons)?;
    let weapons = WeaponTable::from_raw(&weapon_sheet.table)
        .with_context(|| format!("invalid weapon sheet: {}", args.weapons.display()))?;

    let monster_sheet = args.monsters.as_deref().map(load_sheet).transpose()?;
    let monsters = match &monster_sheet {
        Some(sheet) => Some(
            MonsterTable::from_raw(&sheet.table)
                .with_context(|| format!("invalid monster sheet: {}", sheet.path.display()))?,
        ),
        None => None,
    };

    let warnings = collect_warnings(&weapons, monsters.as_ref());
    for warning in &warnings {
        warn!(warning = %warning, "dataset warning");
    }

    let ingested_at = now_utc_string();
    let mut connection = store::open_for_write(&db_path)?;
    store::replace_dataset(&mut connection, &weapons, monsters.as_ref(), &ingested_at)?;
    info!(
        path = %db_path.display(),
        weapons = weapons.records.len(),
        monsters = monsters.as_ref().map_or(0, |table| table.records.len()),
        "wrote dataset cache"
    );

    let manifest = build_manifest(
        &db_path,
        &weapon_sheet,
        &weapons,
        monster_sheet.as_ref().zip(monsters.as_ref()),
        warnings,
        ingested_at,
    );
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote dataset manifest");

    Ok(())
}
