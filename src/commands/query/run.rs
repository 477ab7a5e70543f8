use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::advisor::{QueryRequest, WeaponAdvisor};
use super::monster_index::LazyMonsterIndex;
use super::output::{write_json_response, write_text_response};
use crate::cli::QueryArgs;
use crate::store;

pub fn run(args: QueryArgs) -> Result<()> {
    // Reject bad input before touching the dataset cache.
    let request = QueryRequest::parse(&args.text, &args.rank)?;

    let db_path = args.resolved_db_path();
    let connection = store::open_read_only(&db_path)?;
    let weapons = store::load_weapons(&connection)?;
    let monsters = store::load_monsters(&connection)?;

    info!(
        db_path = %db_path.display(),
        weapons = weapons.records.len(),
        monsters = monsters.records.len(),
        "loaded dataset"
    );
    if monsters.records.is_empty() {
        warn!("monster table is empty; monster detection disabled");
    }

    let show_low_rank = weapons.has_low_rank;
    let index = Arc::new(LazyMonsterIndex::new(monsters.records));
    let advisor = WeaponAdvisor::new(weapons, index)?;
    let advice = advisor.advise(&request);

    info!(
        rule = ?advice.recommendation.rule,
        returned = advice.recommendation.records.len(),
        "query completed"
    );

    if args.json {
        write_json_response(&request, &advice)
    } else {
        write_text_response(&request, &advice, show_low_rank)
    }
}
