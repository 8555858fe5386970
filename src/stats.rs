use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::models::{
    Achievement, CatchEvent, Category, GroupProgress, MapRegion, Rarity, SpeciesRecord,
};

const DEFAULT_REGION: MapRegion = MapRegion {
    latitude: -33.8688,
    longitude: 151.2093,
    latitude_delta: 0.1,
    longitude_delta: 0.1,
};
const MIN_REGION_SPAN: f64 = 0.05;
const REGION_PADDING: f64 = 1.5;

pub fn caught_ids(collection: &[CatchEvent]) -> HashSet<u32> {
    collection.iter().map(|event| event.animal.id).collect()
}

pub fn unique_species_count(collection: &[CatchEvent]) -> usize {
    caught_ids(collection).len()
}

pub fn progress_percent(collection: &[CatchEvent], catalog: &Catalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    unique_species_count(collection) as f64 / catalog.len() as f64 * 100.0
}

pub fn located_count(collection: &[CatchEvent]) -> usize {
    collection
        .iter()
        .filter(|event| event.location.is_some())
        .count()
}

/// Caught vs. total catalog species for every tier, in declared order.
pub fn rarity_breakdown(
    collection: &[CatchEvent],
    catalog: &Catalog,
) -> Vec<GroupProgress<Rarity>> {
    let caught = caught_ids(collection);
    Rarity::ALL
        .into_iter()
        .map(|rarity| group_progress(rarity, catalog.of_rarity(rarity), &caught))
        .collect()
}

/// Like [`rarity_breakdown`], skipping categories the catalog has no species for.
pub fn category_breakdown(
    collection: &[CatchEvent],
    catalog: &Catalog,
) -> Vec<GroupProgress<Category>> {
    let caught = caught_ids(collection);
    Category::ALL
        .into_iter()
        .map(|category| group_progress(category, catalog.of_category(category), &caught))
        .filter(|progress| progress.total > 0)
        .collect()
}

fn group_progress<K>(
    key: K,
    members: Vec<&SpeciesRecord>,
    caught: &HashSet<u32>,
) -> GroupProgress<K> {
    GroupProgress {
        key,
        caught: members
            .iter()
            .filter(|record| caught.contains(&record.id))
            .count(),
        total: members.len(),
    }
}

/// Species not yet caught, grouped by tier. Tiers with nothing missing are left out.
pub fn missing_by_rarity<'a>(
    collection: &[CatchEvent],
    catalog: &'a Catalog,
) -> Vec<(Rarity, Vec<&'a SpeciesRecord>)> {
    let caught = caught_ids(collection);
    Rarity::ALL
        .into_iter()
        .map(|rarity| {
            let missing: Vec<&SpeciesRecord> = catalog
                .of_rarity(rarity)
                .into_iter()
                .filter(|record| !caught.contains(&record.id))
                .collect();
            (rarity, missing)
        })
        .filter(|(_, missing)| !missing.is_empty())
        .collect()
}

pub fn achievements(collection: &[CatchEvent], catalog: &Catalog) -> Vec<Achievement> {
    let total = collection.len();
    let has = |rarity: Rarity| collection.iter().any(|event| event.animal.rarity == rarity);

    vec![
        Achievement {
            icon: "🎯",
            title: "First Catch",
            description: "Catch your first animal",
            unlocked: total >= 1,
        },
        Achievement {
            icon: "🏅",
            title: "Collector",
            description: "Catch 10 animals",
            unlocked: total >= 10,
        },
        Achievement {
            icon: "🏆",
            title: "Master Collector",
            description: "Catch 100 animals",
            unlocked: total >= 100,
        },
        Achievement {
            icon: "💎",
            title: "Rare Find",
            description: "Catch a rare animal",
            unlocked: has(Rarity::Rare),
        },
        Achievement {
            icon: "🔮",
            title: "Epic Find",
            description: "Catch an epic animal",
            unlocked: has(Rarity::Epic),
        },
        Achievement {
            icon: "👑",
            title: "Legendary",
            description: "Catch a legendary animal",
            unlocked: has(Rarity::Legendary),
        },
        Achievement {
            icon: "🗺️",
            title: "Explorer",
            description: "Catch 5 animals with location",
            unlocked: located_count(collection) >= 5,
        },
        Achievement {
            icon: "⭐",
            title: "Completionist",
            description: "Catch all unique species",
            unlocked: unique_species_count(collection) == catalog.len(),
        },
    ]
}

/// Region a map should open on: the padded bounding box of located catches,
/// else the user's position, else a fixed default.
pub fn map_region(collection: &[CatchEvent], user: Option<(f64, f64)>) -> MapRegion {
    let points: Vec<(f64, f64)> = collection
        .iter()
        .filter_map(|event| event.location.as_ref())
        .map(|location| (location.latitude, location.longitude))
        .collect();

    if let Some(&(first_lat, first_lng)) = points.first() {
        let (mut min_lat, mut max_lat, mut min_lng, mut max_lng) =
            (first_lat, first_lat, first_lng, first_lng);
        for &(lat, lng) in &points[1..] {
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lng = min_lng.min(lng);
            max_lng = max_lng.max(lng);
        }

        return MapRegion {
            latitude: (min_lat + max_lat) / 2.0,
            longitude: (min_lng + max_lng) / 2.0,
            latitude_delta: MIN_REGION_SPAN.max((max_lat - min_lat) * REGION_PADDING),
            longitude_delta: MIN_REGION_SPAN.max((max_lng - min_lng) * REGION_PADDING),
        };
    }

    match user {
        Some((latitude, longitude)) => MapRegion {
            latitude,
            longitude,
            latitude_delta: MIN_REGION_SPAN,
            longitude_delta: MIN_REGION_SPAN,
        },
        None => DEFAULT_REGION,
    }
}
