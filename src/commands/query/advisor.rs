use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::intent::QueryIntent;
use super::monster_index::LazyMonsterIndex;
use super::ranking::{RankTier, Recommendation, rank_weapons};
use super::segment::{LexiconSegmenter, Segmenter};
use crate::dataset::WeaponTable;
use crate::error::QueryError;

/// A question that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub text: String,
    pub rank: RankTier,
}

impl QueryRequest {
    pub fn parse(text: &str, rank: &str) -> Result<Self, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::validation("query text must not be empty"));
        }

        Ok(Self {
            text: text.to_string(),
            rank: RankTier::parse(rank)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub intent: QueryIntent,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

/// Answers questions against one weapon table and a shared monster index.
pub struct WeaponAdvisor<S = LexiconSegmenter> {
    weapons: WeaponTable,
    monsters: Arc<LazyMonsterIndex>,
    segmenter: S,
}

impl WeaponAdvisor<LexiconSegmenter> {
    pub fn new(weapons: WeaponTable, monsters: Arc<LazyMonsterIndex>) -> Result<Self> {
        let segmenter = LexiconSegmenter::new()?;
        Ok(Self::with_segmenter(weapons, monsters, segmenter))
    }
}

impl<S: Segmenter> WeaponAdvisor<S> {
    pub fn with_segmenter(
        weapons: WeaponTable,
        monsters: Arc<LazyMonsterIndex>,
        segmenter: S,
    ) -> Self {
        Self {
            weapons,
            monsters,
            segmenter,
        }
    }

    pub fn advise(&self, request: &QueryRequest) -> Advice {
        let index = self.monsters.get();
        let tokens = self.segmenter.segment(&request.text);
        let intent = QueryIntent::extract(&request.text, &tokens, index);
        debug!(tokens = ?tokens, intent = ?intent, "interpreted query");

        let recommendation = rank_weapons(&self.weapons, &intent, request.rank, index);
        debug!(
            rule = ?recommendation.rule,
            returned = recommendation.records.len(),
            "ranked weapons"
        );

        Advice {
            intent,
            recommendation,
        }
    }
}
