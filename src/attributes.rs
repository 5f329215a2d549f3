//! Deterministic game-attribute generation for collected kanji.
//!
//! Every kanji card carries a rarity, an element, a skill, and battle stats.
//! A hand-tuned table covers the showpiece characters; everything else is
//! derived from the character's Unicode scalar, so regenerating the file
//! always produces the same result.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::mappings::write_csv;

/// Card rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, in display order.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// Get the string value for CSV output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    /// Base power before the per-character nudge.
    fn base_power(self) -> u32 {
        match self {
            Self::Legendary => 9,
            Self::Epic => 7,
            Self::Rare => 5,
            Self::Common => 4,
        }
    }

    /// Stat budget distributed over attack/defense/speed.
    fn stat_budget(self) -> u32 {
        match self {
            Self::Legendary => 25,
            Self::Epic => 20,
            Self::Rare => 16,
            Self::Common => 13,
        }
    }
}

/// Card elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

/// Element wheel, indexed by scalar modulo its length.
const ELEMENTS: [Element; 6] = [
    Element::Fire,
    Element::Water,
    Element::Earth,
    Element::Wind,
    Element::Light,
    Element::Dark,
];

impl Element {
    /// Get the string value for CSV output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Wind => "wind",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Attack/defense/speed split of the stat budget, in percent.
    fn stat_split(self) -> (u32, u32, u32) {
        match self {
            Self::Fire => (50, 20, 30),
            Self::Water => (20, 50, 30),
            Self::Earth => (35, 40, 25),
            Self::Wind => (30, 20, 50),
            Self::Light => (35, 35, 30),
            Self::Dark => (45, 25, 30),
        }
    }
}

/// Card skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    XpBoost,
    CoinBoost,
    ComboBonus,
    StreakPower,
    Revival,
    LuckyDraw,
    Synergy,
    MultiAnswer,
    TimeFreeze,
    Shield,
}

impl Skill {
    /// Get the string value for CSV output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XpBoost => "xp_boost",
            Self::CoinBoost => "coin_boost",
            Self::ComboBonus => "combo_bonus",
            Self::StreakPower => "streak_power",
            Self::Revival => "revival",
            Self::LuckyDraw => "lucky_draw",
            Self::Synergy => "synergy",
            Self::MultiAnswer => "multi_answer",
            Self::TimeFreeze => "time_freeze",
            Self::Shield => "shield",
        }
    }
}

/// Full attribute set for one kanji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub rarity: Rarity,
    pub element: Element,
    pub skill: Skill,
    pub power: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

const fn attrs(
    rarity: Rarity,
    element: Element,
    skill: Skill,
    power: u32,
    attack: u32,
    defense: u32,
    speed: u32,
) -> Attributes {
    Attributes {
        rarity,
        element,
        skill,
        power,
        attack,
        defense,
        speed,
    }
}

/// Hand-tuned attributes for the showpiece kanji.
#[rustfmt::skip]
static SPECIAL: LazyLock<HashMap<char, Attributes>> = LazyLock::new(|| {
    use Element::*;
    use Rarity::*;
    use Skill::*;
    HashMap::from([
        ('龍', attrs(Legendary, Fire,  ComboBonus,  10, 10,  6,  8)),
        ('竜', attrs(Legendary, Fire,  ComboBonus,  10, 10,  7,  8)),
        ('火', attrs(Rare,      Fire,  XpBoost,      6,  8,  3,  5)),
        ('水', attrs(Rare,      Water, CoinBoost,    6,  3,  8,  5)),
        ('土', attrs(Common,    Earth, Shield,       5,  5,  7,  4)),
        ('風', attrs(Common,    Wind,  MultiAnswer,  4,  6,  4,  8)),
        ('光', attrs(Epic,      Light, LuckyDraw,    7,  7,  7,  6)),
        ('雷', attrs(Rare,      Light, StreakPower,  7,  9,  2,  7)),
        ('海', attrs(Rare,      Water, CoinBoost,    5,  4,  9,  4)),
        ('森', attrs(Common,    Earth, Revival,      5,  5,  8,  3)),
        ('空', attrs(Rare,      Wind,  MultiAnswer,  6,  5,  5,  9)),
        ('星', attrs(Epic,      Light, XpBoost,      8,  8,  5,  7)),
        ('夜', attrs(Rare,      Dark,  StreakPower,  8,  9,  4,  6)),
        ('炎', attrs(Epic,      Fire,  XpBoost,      7,  9,  4,  6)),
        ('氷', attrs(Epic,      Water, TimeFreeze,   8,  5,  8,  5)),
        ('岩', attrs(Rare,      Earth, Shield,       7,  6, 10,  2)),
        ('嵐', attrs(Epic,      Wind,  ComboBonus,   7,  7,  5,  9)),
        ('聖', attrs(Legendary, Light, Revival,     10,  8,  8,  8)),
        ('闇', attrs(Epic,      Dark,  Synergy,      8, 10,  3,  7)),
        ('焔', attrs(Legendary, Fire,  XpBoost,      9, 10,  5,  7)),
        ('泉', attrs(Rare,      Water, CoinBoost,    7,  4,  9,  5)),
        ('煉', attrs(Legendary, Fire,  XpBoost,     10, 10,  6,  8)),
        ('滝', attrs(Epic,      Water, CoinBoost,    8,  5, 10,  6)),
        ('翔', attrs(Legendary, Wind,  MultiAnswer,  9,  7,  6, 10)),
        ('輝', attrs(Legendary, Light, LuckyDraw,   10,  9,  8,  8)),
        ('魔', attrs(Legendary, Dark,  Synergy,     10, 10,  5,  9)),
        ('天', attrs(Epic,      Light, XpBoost,      7,  7,  6,  7)),
        ('地', attrs(Epic,      Earth, CoinBoost,    7,  6,  8,  5)),
        ('山', attrs(Common,    Earth, Shield,       4,  5,  7,  3)),
        ('川', attrs(Common,    Water, Revival,      4,  4,  6,  5)),
        ('雨', attrs(Common,    Water, CoinBoost,    4,  3,  6,  5)),
        ('雪', attrs(Rare,      Water, TimeFreeze,   6,  4,  7,  4)),
        ('雲', attrs(Common,    Wind,  MultiAnswer,  4,  5,  4,  7)),
        ('王', attrs(Epic,      Light, ComboBonus,   7,  7,  7,  6)),
        ('皇', attrs(Legendary, Light, ComboBonus,   9,  8,  8,  7)),
        ('帝', attrs(Legendary, Dark,  ComboBonus,   9,  9,  7,  7)),
        ('神', attrs(Legendary, Light, LuckyDraw,   10,  9,  9,  9)),
        ('仏', attrs(Epic,      Light, Revival,      8,  6,  8,  6)),
        ('悪', attrs(Epic,      Dark,  StreakPower,  7,  8,  4,  7)),
        ('鬼', attrs(Epic,      Dark,  ComboBonus,   8,  9,  5,  7)),
        ('魂', attrs(Rare,      Dark,  Revival,      6,  6,  6,  6)),
        ('夢', attrs(Rare,      Light, LuckyDraw,    6,  5,  5,  7)),
        ('愛', attrs(Epic,      Light, Revival,      8,  6,  7,  7)),
        ('心', attrs(Common,    Light, Revival,      4,  4,  5,  5)),
        ('力', attrs(Common,    Fire,  XpBoost,      4,  7,  3,  5)),
        ('剣', attrs(Rare,      Fire,  StreakPower,  6,  8,  3,  6)),
        ('刀', attrs(Rare,      Fire,  StreakPower,  6,  8,  2,  7)),
        ('槍', attrs(Rare,      Fire,  ComboBonus,   6,  7,  3,  6)),
        ('弓', attrs(Common,    Wind,  MultiAnswer,  4,  6,  3,  7)),
        ('矢', attrs(Common,    Wind,  StreakPower,  4,  6,  2,  8)),
        ('盾', attrs(Rare,      Earth, Shield,       6,  3,  9,  3)),
        ('鎧', attrs(Epic,      Earth, Shield,       8,  4, 10,  2)),
    ])
});

/// Attributes for a kanji: the hand-tuned table wins, everything else is
/// derived from the character's Unicode scalar.
#[must_use]
pub fn derive_attributes(kanji: char) -> Attributes {
    SPECIAL
        .get(&kanji)
        .copied()
        .unwrap_or_else(|| generated(kanji))
}

fn generated(kanji: char) -> Attributes {
    let code = kanji as u32;
    let rarity = rarity_for(code);
    let element = ELEMENTS[(code % 6) as usize];
    let skill = skill_for(rarity, code);
    let power = rarity.base_power() + code % 2;
    let (attack, defense, speed) = stats_for(element, rarity, code);
    Attributes {
        rarity,
        element,
        skill,
        power,
        attack,
        defense,
        speed,
    }
}

fn rarity_for(code: u32) -> Rarity {
    match code % 100 {
        0..=59 => Rarity::Common,
        60..=84 => Rarity::Rare,
        85..=95 => Rarity::Epic,
        _ => Rarity::Legendary,
    }
}

/// Five-slot skill pool per rarity; the scalar picks the slot.
fn skill_for(rarity: Rarity, code: u32) -> Skill {
    use Skill::*;
    let pool = match rarity {
        Rarity::Legendary => [ComboBonus, LuckyDraw, Synergy, XpBoost, CoinBoost],
        Rarity::Epic => [XpBoost, CoinBoost, StreakPower, TimeFreeze, ComboBonus],
        Rarity::Rare => [XpBoost, CoinBoost, MultiAnswer, Shield, StreakPower],
        Rarity::Common => [Revival, Shield, MultiAnswer, XpBoost, CoinBoost],
    };
    pool[(code % 5) as usize]
}

fn stats_for(element: Element, rarity: Rarity, code: u32) -> (u32, u32, u32) {
    let budget = rarity.stat_budget();
    let (attack_pct, defense_pct, speed_pct) = element.stat_split();

    let attack = budget * attack_pct / 100;
    let defense = budget * defense_pct / 100;
    let speed = budget * speed_pct / 100;

    // Nudge attack by the scalar so same-element cards differ slightly.
    let variation = i64::from(code % 3) - 1;
    let attack = u32::try_from((i64::from(attack) + variation).max(1)).unwrap_or(1);

    (attack, defense, speed)
}

/// CSV row of the attribute file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRow {
    pub kanji: String,
    pub rarity: Rarity,
    pub element: Element,
    pub skill: Skill,
    pub power: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// Outcome of an attribute generation run.
#[derive(Debug)]
pub struct AttributeReport {
    /// Rows written.
    pub rows: usize,
    /// Number of kanji per rarity tier.
    pub rarity_counts: HashMap<Rarity, usize>,
    /// Rows skipped or coerced.
    pub warnings: Vec<String>,
}

/// Read the kanji column (first column, header skipped) from `input` and
/// write the full attribute CSV to `output`.
///
/// `input` and `output` may be the same path: all rows are read before the
/// output is written, and the write is atomic.
pub fn generate_attributes(input: &Path, output: &Path) -> Result<AttributeReport> {
    if !input.is_file() {
        return Err(ScrapeError::MissingFile(input.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(input)?;
    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2; // 1-based, after the header
        let cell = record.get(0).map(str::trim).unwrap_or_default();
        if cell.is_empty() {
            warnings.push(format!("line {line}: empty kanji cell, skipped"));
            continue;
        }

        let Some(kanji) = cell.chars().next() else {
            continue;
        };
        if cell.chars().count() > 1 {
            warnings.push(format!("line {line}: multi-character cell '{cell}', using '{kanji}'"));
        }

        let a = derive_attributes(kanji);
        rows.push(AttributeRow {
            kanji: kanji.to_string(),
            rarity: a.rarity,
            element: a.element,
            skill: a.skill,
            power: a.power,
            attack: a.attack,
            defense: a.defense,
            speed: a.speed,
        });
    }

    drop(reader); // Input fully read; output may be the same path

    let mut rarity_counts: HashMap<Rarity, usize> = HashMap::new();
    for row in &rows {
        *rarity_counts.entry(row.rarity).or_default() += 1;
    }

    write_csv(output, &rows)?;

    Ok(AttributeReport {
        rows: rows.len(),
        rarity_counts,
        warnings,
    })
}
