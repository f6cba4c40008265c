use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, SqlitePool};
use tracing::warn;

use crate::types::{InviteKey, Room};

pub const ROOMS_KEY: &str = "agentchat_rooms";
pub const KEYS_KEY: &str = "agentchat_keys";

const STORAGE_VERSION: u32 = 1;

/// Versioned payload stored under each collection key.
#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    items: Vec<T>,
}

/// Per-profile persistence for rooms and invite keys.
///
/// Two collections live as JSON text under the `agentchat_rooms` and
/// `agentchat_keys` rows of a `storage(key, value)` table. Every mutation is a
/// full read-modify-write of one collection; there is no concurrency control,
/// so a single server process must be the only writer.
///
/// Reads never fail: a missing row, an unknown version, or an unparseable
/// payload all come back as an empty collection (warn-logged). Writes return
/// their errors.
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open (creating if missing) the storage database at `url`.
    pub async fn open(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    /// In-memory store for tests.
    pub async fn in_memory() -> anyhow::Result<Self> {
        // one connection, otherwise every pool checkout is a fresh empty db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query("CREATE TABLE IF NOT EXISTS storage (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
            .execute(&pool)
            .await?;
        Ok(Self { pool })
    }

    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw: Option<(String,)> =
            match sqlx::query_as("SELECT value FROM storage WHERE key=?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
            {
                Ok(row) => row,
                Err(e) => {
                    warn!(key, error = %e, "storage unavailable, reading as empty");
                    return Vec::new();
                }
            };

        let Some((raw,)) = raw else {
            return Vec::new();
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.version == STORAGE_VERSION => envelope.items,
            Ok(envelope) => {
                warn!(key, version = envelope.version, "unknown storage version, reading as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key, error = %e, "malformed collection, reading as empty");
                Vec::new()
            }
        }
    }

    async fn write_collection<T: Serialize>(&self, key: &str, items: Vec<T>) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&Envelope {
            version: STORAGE_VERSION,
            items,
        })?;
        sqlx::query(
            "INSERT INTO storage (key,value) VALUES (?,?) \
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        )
        .bind(key)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All persisted rooms, insertion order.
    pub async fn rooms(&self) -> Vec<Room> {
        self.read_collection(ROOMS_KEY).await
    }

    /// Append a room. No uniqueness check on `room.id`.
    pub async fn save_room(&self, room: Room) -> anyhow::Result<()> {
        let mut rooms = self.rooms().await;
        rooms.push(room);
        self.write_collection(ROOMS_KEY, rooms).await
    }

    /// Remove the room with `id` and every invite key pointing at it.
    ///
    /// Two sequential writes, not a transaction; the rooms write landing
    /// without the keys write leaves orphaned keys behind.
    pub async fn delete_room(&self, id: &str) -> anyhow::Result<()> {
        let rooms: Vec<Room> = self
            .rooms()
            .await
            .into_iter()
            .filter(|r| r.id != id)
            .collect();
        self.write_collection(ROOMS_KEY, rooms).await?;

        let keys: Vec<InviteKey> = self
            .keys()
            .await
            .into_iter()
            .filter(|k| k.room_id != id)
            .collect();
        self.write_collection(KEYS_KEY, keys).await
    }

    /// All persisted invite keys, insertion order.
    pub async fn keys(&self) -> Vec<InviteKey> {
        self.read_collection(KEYS_KEY).await
    }

    /// Invite keys for one room, relative order preserved.
    pub async fn keys_for_room(&self, room_id: &str) -> Vec<InviteKey> {
        self.keys()
            .await
            .into_iter()
            .filter(|k| k.room_id == room_id)
            .collect()
    }

    /// Append an invite key. No uniqueness check on `key.key`.
    pub async fn save_key(&self, key: InviteKey) -> anyhow::Result<()> {
        let mut keys = self.keys().await;
        keys.push(key);
        self.write_collection(KEYS_KEY, keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, name: &str) -> Room {
        Room {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
            created_at: "2026-01-01T00:00:00Z".to_owned(),
        }
    }

    fn invite(key: &str, room_id: &str) -> InviteKey {
        InviteKey {
            key: key.to_owned(),
            room_id: room_id.to_owned(),
            label: None,
            created_at: "2026-01-01T00:01:00Z".to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_store_reads_empty() {
        let store = LocalStore::in_memory().await.unwrap();
        assert!(store.rooms().await.is_empty());
        assert!(store.keys().await.is_empty());
        assert!(store.keys_for_room("room_nowhere").await.is_empty());
    }

    #[tokio::test]
    async fn saved_room_round_trips() {
        let store = LocalStore::in_memory().await.unwrap();
        let r = Room {
            id: "room_abc123456789".to_owned(),
            name: "Test".to_owned(),
            description: Some("a room".to_owned()),
            created_at: "2026-01-01T00:00:00Z".to_owned(),
        };
        store.save_room(r.clone()).await.unwrap();

        let rooms = store.rooms().await;
        assert_eq!(rooms, vec![r]);
    }

    #[tokio::test]
    async fn rooms_keep_insertion_order() {
        let store = LocalStore::in_memory().await.unwrap();
        store.save_room(room("room_a00000000000", "A")).await.unwrap();
        store.save_room(room("room_b00000000000", "B")).await.unwrap();
        store.save_room(room("room_c00000000000", "C")).await.unwrap();

        let names: Vec<_> = store.rooms().await.into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn keys_for_room_filters_and_preserves_order() {
        let store = LocalStore::in_memory().await.unwrap();
        store.save_key(invite("ak_1", "room_x")).await.unwrap();
        store.save_key(invite("ak_2", "room_y")).await.unwrap();
        store.save_key(invite("ak_3", "room_x")).await.unwrap();

        let xs: Vec<_> = store
            .keys_for_room("room_x")
            .await
            .into_iter()
            .map(|k| k.key)
            .collect();
        assert_eq!(xs, ["ak_1", "ak_3"]);
        assert_eq!(store.keys().await.len(), 3);
    }

    #[tokio::test]
    async fn delete_room_cascades_to_its_keys_only() {
        let store = LocalStore::in_memory().await.unwrap();
        store.save_room(room("room_gone00000000", "Gone")).await.unwrap();
        store.save_room(room("room_kept00000000", "Kept")).await.unwrap();
        store.save_key(invite("ak_gone", "room_gone00000000")).await.unwrap();
        store.save_key(invite("ak_kept", "room_kept00000000")).await.unwrap();

        store.delete_room("room_gone00000000").await.unwrap();

        let rooms = store.rooms().await;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "room_kept00000000");

        let keys = store.keys().await;
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "ak_kept");
    }

    #[tokio::test]
    async fn save_then_key_then_delete_scenario() {
        let store = LocalStore::in_memory().await.unwrap();
        store.save_room(room("room_abc123456789", "Test")).await.unwrap();
        assert_eq!(store.rooms().await.len(), 1);

        store
            .save_key(invite("ak_XYZ", "room_abc123456789"))
            .await
            .unwrap();
        let keys = store.keys_for_room("room_abc123456789").await;
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "ak_XYZ");

        store.delete_room("room_abc123456789").await.unwrap();
        assert!(store.rooms().await.is_empty());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_saves_are_callers_problem() {
        let store = LocalStore::in_memory().await.unwrap();
        let r = room("room_dup000000000", "Dup");
        store.save_room(r.clone()).await.unwrap();
        store.save_room(r).await.unwrap();
        assert_eq!(store.rooms().await.len(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_reads_as_empty() {
        let store = LocalStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO storage (key,value) VALUES (?,?)")
            .bind(ROOMS_KEY)
            .bind("{not json")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.rooms().await.is_empty());

        // and the store recovers on the next write
        store.save_room(room("room_fresh0000000", "Fresh")).await.unwrap();
        assert_eq!(store.rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_version_reads_as_empty() {
        let store = LocalStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO storage (key,value) VALUES (?,?)")
            .bind(KEYS_KEY)
            .bind(r#"{"version":2,"items":[{"key":"ak_v2","roomId":"room_x","createdAt":"2026-01-01T00:00:00Z"}]}"#)
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.keys().await.is_empty());
    }
}
