use std::cmp::Ordering;

use serde::Serialize;

use super::attribute::normalize;
use super::intent::{QueryIntent, Superlative};
use super::monster_index::MonsterIndex;
use crate::dataset::WeaponTable;
use crate::error::QueryError;
use crate::model::{Cell, WeaponRecord};

const LOW_TIER_MAX_RARITY: f64 = 4.0;
const HIGH_TIER_MIN_RARITY: f64 = 5.0;
const EFFECTIVE_TOP_N: usize = 3;

const NO_CANDIDATES_MESSAGE: &str = "条件に合うデータがありません。";
const NO_ATTRIBUTE_MATCH_MESSAGE: &str = "指定の属性に一致するデータがありません。";
const NO_MATCH_MESSAGE: &str = "該当する条件が見つかりませんでした。";

/// Rank the player is currently in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    Low,
    High,
}

impl RankTier {
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        match value {
            "low" | "下位" => Ok(Self::Low),
            "high" | "上位" => Ok(Self::High),
            other => Err(QueryError::validation(format!(
                "rank must be `low` or `high`, got `{other}`"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Which selection rule produced a recommendation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    MonsterMostEffective,
    MonsterTopThree,
    MonsterByTotalAttack,
    MonsterPhysicalFallback,
    MonsterNoMatch,
    NoCandidates,
    AttributeStrongest,
    AttributeWeakest,
    AttributeNoMatch,
    PhysicalAttackHighest,
    PhysicalAttackLowest,
    PhysicalAttackAll,
    CritRateHighest,
    CritRateLowest,
    CritRateAll,
    Unranked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rule: MatchRule,
    pub message: String,
    pub records: Vec<WeaponRecord>,
}

impl Recommendation {
    fn new(rule: MatchRule, message: impl Into<String>, records: Vec<&WeaponRecord>) -> Self {
        Self {
            rule,
            message: message.into(),
            records: records.into_iter().cloned().collect(),
        }
    }

    fn unexplained(rule: MatchRule, records: Vec<&WeaponRecord>) -> Self {
        Self::new(rule, String::new(), records)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Extreme {
    Max,
    Min,
}

pub fn rank_weapons(
    table: &WeaponTable,
    intent: &QueryIntent,
    rank: RankTier,
    index: &MonsterIndex,
) -> Recommendation {
    let candidates = apply_scalar_filters(&table.records, intent);

    let mut recommendation = if intent.targets_monster() {
        rank_for_monsters(table, candidates, intent, rank, index)
    } else {
        rank_general(candidates, intent)
    };

    if recommendation.records.is_empty() && recommendation.message.is_empty() {
        recommendation.message = NO_MATCH_MESSAGE.to_string();
    }
    recommendation
}

fn apply_scalar_filters<'a>(
    records: &'a [WeaponRecord],
    intent: &QueryIntent,
) -> Vec<&'a WeaponRecord> {
    records
        .iter()
        .filter(|record| {
            let rarity = record.rarity.as_number();
            let rarity_ok = intent
                .exact_rarity
                .is_none_or(|wanted| rarity == Some(wanted as f64));
            // An exact rarity overrides the tier band; asking for both tiers cancels it.
            let tier_ok = match (intent.exact_rarity, intent.low_tier, intent.high_tier) {
                (None, true, false) => rarity.is_some_and(|value| value <= LOW_TIER_MAX_RARITY),
                (None, false, true) => rarity.is_some_and(|value| value >= HIGH_TIER_MIN_RARITY),
                _ => true,
            };
            let crit_ok = intent.crit_rate_threshold.is_none_or(|threshold| {
                record
                    .crit_rate
                    .as_number()
                    .is_some_and(|value| value >= threshold as f64)
            });
            rarity_ok && tier_ok && crit_ok
        })
        .collect()
}

fn rank_for_monsters(
    table: &WeaponTable,
    candidates: Vec<&WeaponRecord>,
    intent: &QueryIntent,
    rank: RankTier,
    index: &MonsterIndex,
) -> Recommendation {
    let monsters = intent
        .monsters
        .iter()
        .map(|mention| format!("{}（弱点:{}）", mention.name, mention.weakness))
        .collect::<Vec<String>>()
        .join(", ");
    let header = format!("[モンスター検出] {monsters}");

    let threshold = match rank {
        RankTier::Low if table.has_low_rank => intent
            .monsters
            .first()
            .and_then(|mention| index.low_rank_threshold(&mention.name)),
        _ => None,
    };

    let matching = obtainable_before(filter_by_attribute(&candidates, intent), threshold);

    if matching.is_empty() {
        let fallback = obtainable_before(candidates, threshold);
        if fallback.is_empty() {
            return Recommendation::new(
                MatchRule::MonsterNoMatch,
                format!("{header}\n該当する武器が見つかりませんでした。"),
                Vec::new(),
            );
        }

        return Recommendation::new(
            MatchRule::MonsterPhysicalFallback,
            format!(
                "{header}\n弱点属性の武器が見つからないため、条件内で総攻撃力(物理)が最大の武器を表示しています。"
            ),
            extreme_subset(&fallback, |record| &record.physical_attack, Extreme::Max),
        );
    }

    match intent.superlative {
        Superlative::MostEffective => Recommendation::new(
            MatchRule::MonsterMostEffective,
            format!("{header}（最強判定: 総攻撃力 最大）"),
            extreme_subset(&matching, |record| &record.total_attack, Extreme::Max),
        ),
        Superlative::Effective => {
            let mut sorted = matching;
            sort_by_total_attack_desc(&mut sorted);
            sorted.truncate(EFFECTIVE_TOP_N);
            Recommendation::new(
                MatchRule::MonsterTopThree,
                format!("{header}（効く判定: 総攻撃力 上位{EFFECTIVE_TOP_N}件）"),
                sorted,
            )
        }
        Superlative::Unspecified => {
            let mut sorted = matching;
            sort_by_total_attack_desc(&mut sorted);
            Recommendation::new(
                MatchRule::MonsterByTotalAttack,
                format!("{header}（総攻撃力 降順）"),
                sorted,
            )
        }
    }
}

fn rank_general(candidates: Vec<&WeaponRecord>, intent: &QueryIntent) -> Recommendation {
    if candidates.is_empty() {
        return Recommendation::new(MatchRule::NoCandidates, NO_CANDIDATES_MESSAGE, Vec::new());
    }

    let has_attributes = !intent.attributes.is_empty();

    if has_attributes && (intent.strong || intent.weak) {
        let matching = filter_by_attribute(&candidates, intent);
        if matching.is_empty() {
            return Recommendation::new(
                MatchRule::AttributeNoMatch,
                NO_ATTRIBUTE_MATCH_MESSAGE,
                Vec::new(),
            );
        }

        let (extreme, rule) = if intent.strong {
            (Extreme::Max, MatchRule::AttributeStrongest)
        } else {
            (Extreme::Min, MatchRule::AttributeWeakest)
        };
        return Recommendation::unexplained(
            rule,
            extreme_subset(&matching, |record| &record.total_attack, extreme),
        );
    }

    if intent.attack_focus {
        return select_by_level(
            candidates,
            intent,
            |record| &record.physical_attack,
            [
                MatchRule::PhysicalAttackHighest,
                MatchRule::PhysicalAttackLowest,
                MatchRule::PhysicalAttackAll,
            ],
        );
    }

    if intent.crit_focus {
        return select_by_level(
            candidates,
            intent,
            |record| &record.crit_rate,
            [
                MatchRule::CritRateHighest,
                MatchRule::CritRateLowest,
                MatchRule::CritRateAll,
            ],
        );
    }

    Recommendation::unexplained(MatchRule::Unranked, candidates)
}

/// `rules` is ordered highest, lowest, unfiltered.
fn select_by_level(
    candidates: Vec<&WeaponRecord>,
    intent: &QueryIntent,
    key: fn(&WeaponRecord) -> &Cell,
    rules: [MatchRule; 3],
) -> Recommendation {
    let [highest, lowest, all] = rules;
    if intent.high {
        Recommendation::unexplained(highest, extreme_subset(&candidates, key, Extreme::Max))
    } else if intent.low {
        Recommendation::unexplained(lowest, extreme_subset(&candidates, key, Extreme::Min))
    } else {
        Recommendation::unexplained(all, candidates)
    }
}

fn filter_by_attribute<'a>(
    records: &[&'a WeaponRecord],
    intent: &QueryIntent,
) -> Vec<&'a WeaponRecord> {
    records
        .iter()
        .copied()
        .filter(|record| intent.attributes.contains(&normalize(&record.element)))
        .collect()
}

/// Keeps weapons whose low-rank ordinal comes before the monster's.
fn obtainable_before(records: Vec<&WeaponRecord>, threshold: Option<i64>) -> Vec<&WeaponRecord> {
    let Some(threshold) = threshold else {
        return records;
    };

    records
        .into_iter()
        .filter(|record| {
            record
                .low_rank
                .as_number()
                .is_some_and(|value| value < threshold as f64)
        })
        .collect()
}

/// Every record tied at the extreme value; unparsable keys never qualify.
fn extreme_subset<'a>(
    records: &[&'a WeaponRecord],
    key: fn(&WeaponRecord) -> &Cell,
    extreme: Extreme,
) -> Vec<&'a WeaponRecord> {
    let target = records
        .iter()
        .filter_map(|record| key(record).as_number())
        .reduce(|best, value| match extreme {
            Extreme::Max => best.max(value),
            Extreme::Min => best.min(value),
        });

    let Some(target) = target else {
        return Vec::new();
    };

    records
        .iter()
        .copied()
        .filter(|record| key(record).as_number() == Some(target))
        .collect()
}

fn sort_by_total_attack_desc(records: &mut [&WeaponRecord]) {
    records.sort_by(|a, b| match (a.total_attack.as_number(), b.total_attack.as_number()) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
