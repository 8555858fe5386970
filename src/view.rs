use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{CatchEvent, Rarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest catch first.
    Recent,
    /// Legendary first.
    Rarity,
    /// Common first.
    RarityAsc,
    Name,
    Category,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Rarity => "rarity",
            SortOrder::RarityAsc => "rarity-asc",
            SortOrder::Name => "name",
            SortOrder::Category => "type",
        }
    }

    fn compare(self, a: &CatchEvent, b: &CatchEvent) -> Ordering {
        match self {
            SortOrder::Recent => b.caught_at.cmp(&a.caught_at),
            SortOrder::Rarity => b.animal.rarity.rank().cmp(&a.animal.rarity.rank()),
            SortOrder::RarityAsc => a.animal.rarity.rank().cmp(&b.animal.rarity.rank()),
            SortOrder::Name => a
                .animal
                .name
                .to_lowercase()
                .cmp(&b.animal.name.to_lowercase()),
            SortOrder::Category => a.animal.category.as_str().cmp(b.animal.category.as_str()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "rarity" | "rarity-desc" => Ok(SortOrder::Rarity),
            "rarity-asc" => Ok(SortOrder::RarityAsc),
            "name" => Ok(SortOrder::Name),
            "type" | "category" => Ok(SortOrder::Category),
            other => Err(format!(
                "unknown sort `{other}` (expected recent, rarity, rarity-asc, name, type)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RarityFilter {
    All,
    Only(Rarity),
}

impl RarityFilter {
    pub fn matches(self, event: &CatchEvent) -> bool {
        match self {
            RarityFilter::All => true,
            RarityFilter::Only(rarity) => event.animal.rarity == rarity,
        }
    }
}

impl FromStr for RarityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(RarityFilter::All);
        }
        s.parse::<Rarity>().map(RarityFilter::Only)
    }
}

/// Filtered, stably sorted snapshot of the collection; equal keys keep catch order.
pub fn arrange(
    collection: &[CatchEvent],
    filter: RarityFilter,
    order: SortOrder,
) -> Vec<CatchEvent> {
    let mut shown: Vec<CatchEvent> = collection
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect();
    shown.sort_by(|a, b| order.compare(a, b));
    shown
}
