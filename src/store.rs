use crate::types::inventory::Document;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("data file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("data file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("data file is inconsistent: item {item_id} is lent without a borrower")]
    LentWithoutBorrower { item_id: u32 },
}

/// Handle to the JSON data file.
///
/// Writers go through [`Store::update`], which holds `writer` across the
/// whole load-mutate-save cycle. Readers never take the lock: saves replace
/// the file by rename, so a load sees either the old or the new document.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    writer: Mutex<()>,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            writer: Mutex::new(()),
        };
        if store.initialize_if_absent()? {
            tracing::info!(path = %store.path.display(), "initialized empty data file");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes an empty document when the data file does not exist yet.
    /// Returns whether a file was written.
    pub fn initialize_if_absent(&self) -> Result<bool, StoreError> {
        match std::fs::metadata(&self.path) {
            Ok(_) => return Ok(false),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(StoreError::Io(err)),
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        self.save(&Document::default())?;
        Ok(true)
    }

    pub fn load(&self) -> Result<Document, StoreError> {
        let contents = std::fs::read(&self.path)?;
        let mut document: Document =
            serde_json::from_slice(&contents).map_err(StoreError::Corrupt)?;
        normalize_loans(&mut document)?;
        Ok(document)
    }

    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let contents = encode_document(document)?;
        atomic_write(&self.path, &contents)?;
        Ok(())
    }

    pub fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, StoreError> {
        let document = self.load()?;
        Ok(f(&document))
    }

    pub fn update<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T, StoreError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.load()?;
        let output = f(&mut document);
        self.save(&document)?;
        Ok(output)
    }
}

/// A borrower only counts while the item is lent; a lent item must name one.
fn normalize_loans(document: &mut Document) -> Result<(), StoreError> {
    for item in document.items.iter_mut() {
        match (item.lent, item.borrower) {
            (true, None) => return Err(StoreError::LentWithoutBorrower { item_id: item.id }),
            (false, Some(user_id)) => {
                tracing::warn!(item_id = item.id, user_id, "dropping borrower of available item");
                item.borrower = None;
            }
            _ => {}
        }
    }
    Ok(())
}

fn encode_document(document: &Document) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(StoreError::Corrupt)?;
    Ok(buffer)
}

fn atomic_write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("inventario.json");
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    for attempt in 0..10u32 {
        let temp_path = parent.join(format!(".{file_name}.tmp-{pid}-{nanos}-{attempt}"));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(mut file) => {
                file.write_all(contents)?;
                file.sync_all()?;
                std::fs::rename(&temp_path, path)?;
                return Ok(());
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to create temp file",
    ))
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::types::inventory::{Administrator, Item, User};

    use std::sync::Arc;

    #[test]
    fn open__should_initialize_all_collections() {
        // Given
        let root = create_temp_root("store-init");
        let path = root.join("data").join("inventario.json");

        // When
        let store = Store::open(&path).expect("open store");

        // Then
        let raw = std::fs::read_to_string(&path).expect("read data file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("parse json");
        assert_eq!(value["cascos"], serde_json::json!([]));
        assert_eq!(value["usuarios"], serde_json::json!([]));
        assert_eq!(value["administradores"], serde_json::json!([]));
        assert_eq!(store.load().expect("load"), Document::default());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn open__should_keep_existing_file() {
        // Given
        let root = create_temp_root("store-existing");
        let path = root.join("inventario.json");
        let raw = r#"{"cascos": [{"id": 4, "nombre": "Viejo", "geles": 1, "prestado": false, "usuario": null}], "usuarios": []}"#;
        std::fs::write(&path, raw).expect("write data file");

        // When
        let store = Store::open(&path).expect("open store");

        // Then
        let document = store.load().expect("load");
        assert_eq!(document.items.len(), 1);
        assert_eq!(document.items[0].id, 4);
        assert!(document.administrators.is_empty());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn load__should_report_corrupt_file() {
        // Given
        let root = create_temp_root("store-corrupt");
        let path = root.join("inventario.json");
        std::fs::write(&path, "{not json").expect("write data file");
        let store = Store::open(&path).expect("open store");

        // When
        let result = store.load();

        // Then
        assert!(matches!(result, Err(StoreError::Corrupt(_))));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn load__should_reject_lent_item_without_borrower() {
        // Given
        let root = create_temp_root("store-lent-no-borrower");
        let path = root.join("inventario.json");
        let raw = r#"{"cascos": [{"id": 1, "nombre": "A", "geles": 1, "prestado": true}], "usuarios": []}"#;
        std::fs::write(&path, raw).expect("write data file");
        let store = Store::open(&path).expect("open store");

        // When
        let result = store.load();

        // Then
        assert!(matches!(
            result,
            Err(StoreError::LentWithoutBorrower { item_id: 1 })
        ));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn load__should_clear_borrower_of_available_item() {
        // Given
        let root = create_temp_root("store-available-borrower");
        let path = root.join("inventario.json");
        let raw = r#"{"cascos": [{"id": 2, "nombre": "B", "geles": 1, "prestado": false, "usuario": 7}], "usuarios": []}"#;
        std::fs::write(&path, raw).expect("write data file");
        let store = Store::open(&path).expect("open store");

        // When
        let document = store.load().expect("load");

        // Then
        assert!(!document.items[0].lent);
        assert_eq!(document.items[0].borrower, None);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn save__should_round_trip_loaded_document() {
        // Given
        let root = create_temp_root("store-round-trip");
        let path = root.join("inventario.json");
        let store = Store::open(&path).expect("open store");
        let document = sample_document();
        store.save(&document).expect("save");
        let first = std::fs::read_to_string(&path).expect("read first");

        // When
        let loaded = store.load().expect("load");
        store.save(&loaded).expect("save again");

        // Then
        let second = std::fs::read_to_string(&path).expect("read second");
        assert_eq!(loaded, document);
        assert_eq!(first, second);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn save__should_indent_with_four_spaces() {
        // Given
        let root = create_temp_root("store-indent");
        let path = root.join("inventario.json");
        let store = Store::open(&path).expect("open store");

        // When
        store.save(&sample_document()).expect("save");

        // Then
        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.starts_with("{\n    \"cascos\": ["));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn update__should_not_lose_concurrent_writes() {
        // Given
        let root = create_temp_root("store-concurrent");
        let store = Arc::new(Store::open(root.join("inventario.json")).expect("open store"));

        // When
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .update(|document| {
                            document.users.push(User {
                                id: n,
                                name: format!("user-{n}"),
                            })
                        })
                        .expect("update");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }

        // Then
        let document = store.load().expect("load");
        assert_eq!(document.users.len(), 8);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    fn sample_document() -> Document {
        Document {
            items: vec![
                Item {
                    id: 2,
                    name: "Casco B".to_string(),
                    capacity: 3,
                    lent: true,
                    borrower: Some(1),
                },
                Item {
                    id: 1,
                    name: "Casco A".to_string(),
                    capacity: 2,
                    lent: false,
                    borrower: None,
                },
            ],
            users: vec![User {
                id: 1,
                name: "Ana".to_string(),
            }],
            administrators: vec![Administrator {
                id: 1,
                name: "Admin".to_string(),
                national_id: "12345678".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            }],
        }
    }

    fn create_temp_root(test_name: &str) -> PathBuf {
        let mut root = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        root.push(format!("cascos-{}-{}", test_name, nanos));
        std::fs::create_dir_all(&root).expect("create temp dir");
        root
    }
}
