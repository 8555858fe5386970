//! The persisted collection: one JSON array of catch events in a single slot.
//!
//! Every mutation reads the whole collection, changes it, and writes the whole
//! collection back. Two overlapping mutations therefore race and the last
//! writer wins.

use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::draw;
use crate::error::{DexError, Result};
use crate::location;
use crate::models::{CatchEvent, CatchRequest};
use crate::slots::SlotBackend;

pub const COLLECTION_KEY: &str = "@animal_pokedex_collection";

pub struct CollectionStore {
    slots: Box<dyn SlotBackend>,
    key: String,
}

impl CollectionStore {
    pub fn new(slots: impl SlotBackend + 'static) -> Self {
        Self {
            slots: Box::new(slots),
            key: COLLECTION_KEY.to_string(),
        }
    }

    /// Returns the collection in catch order. Missing, unreadable, or corrupt
    /// data reads as an empty collection.
    pub async fn read_all(&self) -> Vec<CatchEvent> {
        self.load().await.unwrap_or_else(|err| {
            warn!("could not load collection: {err}");
            Vec::new()
        })
    }

    /// Like `read_all`, but a backend that cannot be read is an error so a
    /// mutation never overwrites data it did not see.
    async fn load(&self) -> Result<Vec<CatchEvent>> {
        let Some(payload) = self.slots.read(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<CatchEvent>>(&payload) {
            Ok(collection) => Ok(collection),
            Err(err) => {
                warn!("{}; treating collection as empty", DexError::from(err));
                Ok(Vec::new())
            }
        }
    }

    pub async fn append(&self, event: CatchEvent) -> Result<()> {
        self.append_all(vec![event]).await
    }

    /// Appends several events with a single write.
    pub async fn append_all(&self, events: Vec<CatchEvent>) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let added = events.len();
        let mut collection = self.load().await?;
        collection.extend(events);
        self.persist(&collection).await?;
        info!("saved {added} catch(es); collection now holds {}", collection.len());
        Ok(())
    }

    /// Removes the catch with `id`. Returns `false`, leaving storage untouched,
    /// when no entry matches.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut collection = self.load().await?;
        let before = collection.len();
        collection.retain(|event| event.id != id);
        if collection.len() == before {
            return Ok(false);
        }

        self.persist(&collection).await?;
        info!("released catch {id}");
        Ok(true)
    }

    pub async fn clear(&self) -> Result<()> {
        self.slots.remove(&self.key).await?;
        info!("collection cleared");
        Ok(())
    }

    pub async fn set_nickname(&self, id: &str, nickname: Option<String>) -> Result<CatchEvent> {
        let mut collection = self.load().await?;
        let event = collection
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| DexError::not_found(format!("catch `{id}`")))?;
        event.nickname = nickname
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let updated = event.clone();

        self.persist(&collection).await?;
        Ok(updated)
    }

    /// Draws a species and records it. A location the request cannot supply
    /// is dropped and the catch is saved without one.
    pub async fn catch<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        rng: &mut R,
        request: &CatchRequest,
    ) -> Result<CatchEvent> {
        let animal = draw::draw_species(catalog, rng)?;
        let location = location::resolve(request).unwrap_or_else(|err| {
            warn!("recording catch without location: {err}");
            None
        });

        let caught_at = Utc::now();
        let event = CatchEvent {
            id: new_catch_id(caught_at),
            animal,
            caught_at,
            location,
            nickname: request.nickname.clone(),
        };

        self.append(event.clone()).await?;
        Ok(event)
    }

    async fn persist(&self, collection: &[CatchEvent]) -> Result<()> {
        let payload = serde_json::to_string(collection)?;
        self.slots.write(&self.key, &payload).await
    }
}

/// Millisecond timestamp followed by a random nine-character suffix.
pub fn new_catch_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", at.timestamp_millis(), &suffix[..9])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Location;
    use crate::slots::{scratch_dir, FileSlots, MemorySlots};
    use std::sync::Arc;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    pub(crate) fn event(id: &str, species_id: u32, minute: u32) -> CatchEvent {
        let catalog = Catalog::builtin();
        CatchEvent {
            id: id.to_string(),
            animal: catalog.get(species_id).cloned().expect("species exists"),
            caught_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
            location: None,
            nickname: None,
        }
    }

    pub(crate) fn located(mut event: CatchEvent, latitude: f64, longitude: f64) -> CatchEvent {
        event.location = Some(Location {
            latitude,
            longitude,
            address: None,
        });
        event
    }

    #[tokio::test]
    async fn empty_store_reads_empty() {
        let store = CollectionStore::new(MemorySlots::new());
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn append_extends_collection_by_one() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("a", 1, 0)).await.unwrap();
        let before = store.read_all().await.len();

        let added = event("b", 27, 1);
        store.append(added.clone()).await.unwrap();

        let collection = store.read_all().await;
        assert_eq!(collection.len(), before + 1);
        assert_eq!(collection.last(), Some(&added));
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("legendary", 27, 5)).await.unwrap();
        store.append(event("common", 1, 1)).await.unwrap();

        let ids: Vec<String> = store.read_all().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["legendary", "common"]);
    }

    #[tokio::test]
    async fn delete_removes_only_matching_id() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("a", 1, 0)).await.unwrap();
        store.append(event("b", 1, 1)).await.unwrap();

        assert!(store.delete_by_id("a").await.unwrap());
        let collection = store.read_all().await;
        assert!(collection.iter().all(|e| e.id != "a"));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_a_no_op() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("a", 1, 0)).await.unwrap();
        let before = store.read_all().await;

        assert!(!store.delete_by_id("missing").await.unwrap());
        assert_eq!(store.read_all().await, before);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("a", 3, 0)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.read_all().await.is_empty());
        store.clear().await.unwrap();
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_payload_reads_as_empty() {
        let slots = MemorySlots::new().with_value(COLLECTION_KEY, "{\"not\": \"a list\"");
        let store = CollectionStore::new(slots);
        assert!(store.read_all().await.is_empty());

        store.append(event("fresh", 2, 0)).await.unwrap();
        assert_eq!(store.read_all().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_write_surfaces_storage_error() {
        let store = CollectionStore::new(MemorySlots::read_only());
        let err = store.append(event("a", 1, 0)).await.unwrap_err();
        assert!(matches!(err, DexError::Storage(_)));
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn unreadable_backend_blocks_mutations_without_losing_catches() {
        let slots = Arc::new(MemorySlots::new());
        let store = CollectionStore::new(Arc::clone(&slots));
        for (id, minute) in [("a", 0), ("b", 1), ("c", 2)] {
            store.append(event(id, 1, minute)).await.unwrap();
        }

        slots.fail_reads(true);
        assert!(store.read_all().await.is_empty());
        let err = store.append(event("d", 2, 3)).await.unwrap_err();
        assert!(matches!(err, DexError::Storage(_)));
        assert!(matches!(
            store.delete_by_id("a").await,
            Err(DexError::Storage(_))
        ));
        assert!(matches!(
            store.set_nickname("b", Some("Pip".to_string())).await,
            Err(DexError::Storage(_))
        ));

        slots.fail_reads(false);
        let ids: Vec<String> = store.read_all().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn nickname_updates_single_entry() {
        let store = CollectionStore::new(MemorySlots::new());
        store.append(event("a", 1, 0)).await.unwrap();
        store.append(event("b", 2, 1)).await.unwrap();

        let updated = store
            .set_nickname("b", Some("  Gus ".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.nickname.as_deref(), Some("Gus"));
        assert_eq!(updated.display_name(), "Gus");

        let collection = store.read_all().await;
        assert_eq!(collection[0].nickname, None);
        assert_eq!(collection[1].nickname.as_deref(), Some("Gus"));

        let err = store.set_nickname("zzz", None).await.unwrap_err();
        assert!(matches!(err, DexError::NotFound(_)));
    }

    #[tokio::test]
    async fn catch_records_drawn_species_with_location() {
        let store = CollectionStore::new(MemorySlots::new());
        let catalog = Catalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let request = CatchRequest {
            latitude: Some(-33.86),
            longitude: Some(151.2),
            address: Some("Circular Quay".to_string()),
            nickname: None,
        };

        let caught = store.catch(&catalog, &mut rng, &request).await.unwrap();
        assert_eq!(catalog.get(caught.animal.id), Some(&caught.animal));
        assert_eq!(
            caught.location.as_ref().and_then(|l| l.address.as_deref()),
            Some("Circular Quay")
        );
        assert_eq!(store.read_all().await, vec![caught]);
    }

    #[tokio::test]
    async fn catch_with_bad_coordinates_drops_location() {
        let store = CollectionStore::new(MemorySlots::new());
        let catalog = Catalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let request = CatchRequest {
            latitude: Some(120.0),
            longitude: Some(0.0),
            ..CatchRequest::default()
        };

        let caught = store.catch(&catalog, &mut rng, &request).await.unwrap();
        assert!(caught.location.is_none());
        assert_eq!(store.read_all().await.len(), 1);
    }

    #[tokio::test]
    async fn payload_uses_wire_field_names() {
        let slots = MemorySlots::new();
        let store = CollectionStore::new(slots);
        store
            .append(located(event("a", 11, 0), 1.5, 2.5))
            .await
            .unwrap();
        store.append(event("b", 8, 1)).await.unwrap();

        let payload = store.slots.read(COLLECTION_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], "a");
        assert_eq!(first["animal"]["type"], "amphibian");
        assert_eq!(first["animal"]["rarity"], "uncommon");
        assert_eq!(first["animal"]["stats"]["speed"], 65);
        assert_eq!(first["location"]["latitude"], 1.5);
        assert!(first["caughtAt"].as_str().unwrap().starts_with("2026-03-01T12:00:00"));
        assert!(first.get("nickname").is_none());
        assert!(value[1]["location"].is_null());
    }

    #[tokio::test]
    async fn reads_payload_written_by_mobile_client() {
        let payload = r##"
        [
          {
            "id": "1717171717171-abc123xyz",
            "animal": {
              "id": 27,
              "name": "Snow Leopard",
              "species": "Panthera uncia",
              "type": "mammal",
              "rarity": "legendary",
              "habitat": "Mountain peaks",
              "description": "Ghost of the mountains.",
              "stats": {
                "speed": 90,
                "strength": 85,
                "cuteness": 90,
                "intelligence": 85,
                "stealth": 100
              },
              "colors": {
                "primary": "#C0C0C0",
                "secondary": "#FFFFFF",
                "accent": "#2F2F2F"
              },
              "emoji": "🐆"
            },
            "caughtAt": "2024-06-01T10:15:17.171Z",
            "location": {
              "latitude": -33.8688,
              "longitude": 151.2093
            }
          }
        ]
        "##;
        let store = CollectionStore::new(MemorySlots::new().with_value(COLLECTION_KEY, payload));

        let collection = store.read_all().await;
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].animal.id, 27);
        assert_eq!(collection[0].nickname, None);
        assert_eq!(
            collection[0].location.as_ref().map(|l| l.longitude),
            Some(151.2093)
        );
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let root = scratch_dir();
        {
            let store = CollectionStore::new(FileSlots::new(&root));
            store.append(event("a", 27, 0)).await.unwrap();
            store.append(event("b", 1, 1)).await.unwrap();
        }

        let reopened = CollectionStore::new(FileSlots::new(&root));
        assert_eq!(reopened.read_all().await.len(), 2);
        reopened.clear().await.unwrap();
        assert!(reopened.read_all().await.is_empty());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn catch_ids_carry_timestamp_and_suffix() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let id = new_catch_id(at);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, at.timestamp_millis().to_string());
        assert_eq!(suffix.len(), 9);
        assert_ne!(new_catch_id(at), id);
    }
}
