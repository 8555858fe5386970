use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::location;
use crate::models::{CatchEvent, CatchRequest, Location};
use crate::store::{self, CollectionStore};

#[derive(Debug, Deserialize)]
struct ImportRow {
    species_id: u32,
    caught_at: DateTime<Utc>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
    nickname: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    species_id: u32,
    name: &'a str,
    rarity: &'a str,
    caught_at: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<&'a str>,
    nickname: Option<&'a str>,
}

/// Reads catches from a CSV file, validating every row before anything is saved.
pub fn read_catches(catalog: &Catalog, csv_path: &Path) -> anyhow::Result<Vec<CatchEvent>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut events = Vec::new();

    for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("invalid row on line {line}"))?;
        let Some(animal) = catalog.get(row.species_id) else {
            bail!("line {line}: unknown species id {}", row.species_id);
        };

        let request = CatchRequest {
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address,
            nickname: None,
        };
        let location = location::resolve(&request).unwrap_or_else(|err| {
            warn!("line {line}: importing without location: {err}");
            None
        });

        events.push(CatchEvent {
            id: store::new_catch_id(row.caught_at),
            animal: animal.clone(),
            caught_at: row.caught_at,
            location,
            nickname: row.nickname.filter(|name| !name.trim().is_empty()),
        });
    }

    Ok(events)
}

pub async fn import_csv(
    store: &CollectionStore,
    catalog: &Catalog,
    csv_path: &Path,
) -> anyhow::Result<usize> {
    let events = read_catches(catalog, csv_path)?;
    let imported = events.len();
    store.append_all(events).await?;
    Ok(imported)
}

pub fn export_csv(collection: &[CatchEvent], csv_path: &Path) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;

    for event in collection {
        let location = event.location.as_ref();
        writer.serialize(ExportRow {
            id: &event.id,
            species_id: event.animal.id,
            name: &event.animal.name,
            rarity: event.animal.rarity.as_str(),
            caught_at: event.caught_at.to_rfc3339(),
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
            address: location.and_then(|l| l.address.as_deref()),
            nickname: event.nickname.as_deref(),
        })?;
    }

    writer.flush()?;
    Ok(collection.len())
}

/// A handful of realistic catches around Sydney, spread over the last week.
pub fn demo_catches(catalog: &Catalog, now: DateTime<Utc>) -> anyhow::Result<Vec<CatchEvent>> {
    let seeds = [
        (1, 6, Some((-33.8688, 151.2093, "George St, Sydney, NSW"))),
        (3, 5, Some((-33.8915, 151.2767, "Bondi Beach, NSW"))),
        (9, 4, None),
        (16, 3, Some((-33.7969, 151.2840, "Manly, NSW"))),
        (1, 2, Some((-33.8568, 151.2153, "Circular Quay, NSW"))),
        (22, 1, None),
    ];

    let mut events = Vec::new();
    for (species_id, days_ago, place) in seeds {
        let animal = catalog
            .get(species_id)
            .with_context(|| format!("demo species {species_id} missing from catalog"))?;
        let caught_at = now - Duration::days(days_ago);
        events.push(CatchEvent {
            id: store::new_catch_id(caught_at),
            animal: animal.clone(),
            caught_at,
            location: place.map(|(latitude, longitude, address)| Location {
                latitude,
                longitude,
                address: Some(address.to_string()),
            }),
            nickname: None,
        });
    }

    Ok(events)
}
