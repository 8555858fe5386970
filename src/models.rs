use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Declared draw order. The weight-consumption step walks tiers in this order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    /// 1 for common through 5 for legendary.
    pub fn rank(self) -> u8 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::Epic => 4,
            Rarity::Legendary => 5,
        }
    }

    pub fn badge_color(self) -> &'static str {
        match self {
            Rarity::Common => "#9CA3AF",
            Rarity::Uncommon => "#22C55E",
            Rarity::Rare => "#3B82F6",
            Rarity::Epic => "#A855F7",
            Rarity::Legendary => "#F59E0B",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown rarity `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mammal,
    Bird,
    Reptile,
    Amphibian,
    Fish,
    Insect,
    Arachnid,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Mammal,
        Category::Bird,
        Category::Reptile,
        Category::Amphibian,
        Category::Fish,
        Category::Insect,
        Category::Arachnid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Mammal => "mammal",
            Category::Bird => "bird",
            Category::Reptile => "reptile",
            Category::Amphibian => "amphibian",
            Category::Fish => "fish",
            Category::Insect => "insect",
            Category::Arachnid => "arachnid",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Mammal => "#EF4444",
            Category::Bird => "#60A5FA",
            Category::Reptile => "#22C55E",
            Category::Amphibian => "#14B8A6",
            Category::Fish => "#06B6D4",
            Category::Insect => "#F59E0B",
            Category::Arachnid => "#6B7280",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub speed: u8,
    pub strength: u8,
    pub cuteness: u8,
    pub intelligence: u8,
    pub stealth: u8,
}

impl Stats {
    pub fn values(&self) -> [u8; 5] {
        [
            self.speed,
            self.strength,
            self.cuteness,
            self.intelligence,
            self.stealth,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// Catalog entry. Serialized field names match the stored collection payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    /// Scientific name.
    pub species: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub rarity: Rarity,
    pub habitat: String,
    pub description: String,
    pub stats: Stats,
    pub colors: Palette,
    pub emoji: String,
}

impl SpeciesRecord {
    pub fn stat_total(&self) -> u32 {
        self.stats.values().iter().map(|value| u32::from(*value)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchEvent {
    pub id: String,
    pub animal: SpeciesRecord,
    pub caught_at: DateTime<Utc>,
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl CatchEvent {
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.animal.name)
    }
}

/// What the capture surface hands over when the user triggers a catch.
#[derive(Debug, Clone, Default)]
pub struct CatchRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProgress<K> {
    pub key: K,
    pub caught: usize,
    pub total: usize,
}

impl<K> GroupProgress<K> {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.caught as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}
