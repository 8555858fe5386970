use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::error::{DexError, Result};
use crate::models::{Rarity, SpeciesRecord};

/// Draw weights, walked in this order by [`select_tier`].
pub const RARITY_WEIGHTS: [(Rarity, u32); 5] = [
    (Rarity::Common, 40),
    (Rarity::Uncommon, 30),
    (Rarity::Rare, 20),
    (Rarity::Epic, 8),
    (Rarity::Legendary, 2),
];

pub fn total_weight() -> u32 {
    RARITY_WEIGHTS.iter().map(|(_, weight)| weight).sum()
}

pub fn weight_of(rarity: Rarity) -> u32 {
    RARITY_WEIGHTS
        .iter()
        .find(|(tier, _)| *tier == rarity)
        .map(|(_, weight)| *weight)
        .unwrap_or(0)
}

/// Maps a roll in `[0, total_weight)` onto a tier. A remainder of exactly zero
/// selects the tier whose weight was just consumed.
pub fn select_tier(roll: f64) -> Rarity {
    let mut remainder = roll;
    for (rarity, weight) in RARITY_WEIGHTS {
        remainder -= f64::from(weight);
        if remainder <= 0.0 {
            return rarity;
        }
    }
    RARITY_WEIGHTS[0].0
}

pub fn draw_tier<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    let roll = rng.gen_range(0.0..f64::from(total_weight()));
    select_tier(roll)
}

pub fn draw_species<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Result<SpeciesRecord> {
    let tier = draw_tier(rng);
    let pool = catalog.of_rarity(tier);
    let picked = pool.choose(rng).ok_or_else(|| {
        DexError::configuration(format!("no species available for rarity tier `{tier}`"))
    })?;

    debug!("drew {} (#{}) from the {} tier", picked.name, picked.id, tier);
    Ok((*picked).clone())
}
