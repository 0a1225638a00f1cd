// File backed implementation of the RecordStore port.
//
// Responsibilities
// - One JSON file per cache key, named `{username}_{YYYYMMDDHH}.json`.
// - Writes land in a uniquely named temp file that is renamed into place, so
//   readers see either the old entry or the complete new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::modules::repository_charts::core::hour_bucket::{CacheKey, HourBucket};
use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::shared::infrastructure::record_store::{RecordStore, RecordStoreError};

const EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct CachedRecords {
    cached_at: DateTime<Utc>,
    records: Vec<RepositoryRecord>,
}

pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", key.file_stem()))
    }
}

#[async_trait::async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self, key: &CacheKey) -> Result<Option<Vec<RepositoryRecord>>, RecordStoreError> {
        let contents = match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let cached: CachedRecords =
            serde_json::from_str(&contents).map_err(|e| RecordStoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(cached.records))
    }

    async fn save(&self, key: &CacheKey, records: &[RepositoryRecord]) -> Result<(), RecordStoreError> {
        fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_vec(&CachedRecords {
            cached_at: Utc::now(),
            records: records.to_vec(),
        })?;

        let path = self.path_for(key);
        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key.file_stem(), Uuid::now_v7()));
        if let Err(e) = write_then_rename(&temp_path, &path, &json).await {
            // a failed write can leave a partial temp file behind
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn prune(&self, username: &str, keep_from: HourBucket) -> Result<usize, RecordStoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(CacheKey::from_file_stem)
            else {
                continue;
            };
            if key.username() == username && key.bucket() < keep_from {
                match fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    // a concurrent prune got there first
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(removed)
    }
}

async fn write_then_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(temp_path, contents).await?;
    fs::rename(temp_path, path).await
}

#[cfg(test)]
mod file_record_store_tests {
    use super::*;
    use crate::modules::repository_charts::core::username::Username;
    use crate::tests::fixtures::records::sample_portfolio;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn key(login: &str, hour: u32) -> CacheKey {
        let instant = Utc.with_ymd_and_hms(2024, 6, 2, hour, 40, 0).unwrap();
        CacheKey::new(&Username::parse(login).unwrap(), HourBucket::containing(instant))
    }

    #[fixture]
    fn before_each() -> (TempDir, FileRecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileRecordStore::new(temp_dir.path().join("cache"));
        (temp_dir, store)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_none_when_nothing_was_cached(before_each: (TempDir, FileRecordStore)) {
        let (_temp_dir, store) = before_each;
        assert_eq!(store.load(&key("octocat", 1)).await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_write_one_file_per_key_and_read_it_back(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        let records = sample_portfolio();
        store.save(&key("octocat", 3), &records).await.expect("save failed");

        assert!(store.dir().join("octocat_2024060203.json").is_file());
        assert_eq!(store.load(&key("octocat", 3)).await.unwrap(), Some(records));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_survive_a_restart(before_each: (TempDir, FileRecordStore)) {
        let (_temp_dir, store) = before_each;
        let records = sample_portfolio();
        store.save(&key("octocat", 3), &records).await.unwrap();

        let reopened = FileRecordStore::new(store.dir().to_path_buf());
        assert_eq!(reopened.load(&key("octocat", 3)).await.unwrap(), Some(records));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_overwrite_an_existing_entry_without_leaving_temp_files(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        let records = sample_portfolio();
        store.save(&key("octocat", 3), &records).await.unwrap();
        store.save(&key("octocat", 3), &records[..1]).await.unwrap();

        assert_eq!(
            store.load(&key("octocat", 3)).await.unwrap(),
            Some(records[..1].to_vec())
        );
        let files = std::fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_an_undecodable_file_as_corrupt(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.path_for(&key("octocat", 3)), "{not json").unwrap();

        let result = store.load(&key("octocat", 3)).await;
        assert!(matches!(result, Err(RecordStoreError::Corrupt { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_prune_older_entries_of_one_user_only(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        let records = sample_portfolio();
        for k in [key("octocat", 1), key("octocat", 2), key("octocat", 3), key("hubot", 1)] {
            store.save(&k, &records).await.unwrap();
        }
        std::fs::write(store.dir().join("notes.txt"), "keep me").unwrap();

        let removed = store.prune("octocat", key("octocat", 3).bucket()).await.unwrap();

        assert_eq!(removed, 2);
        assert!(store.path_for(&key("octocat", 3)).is_file());
        assert!(store.path_for(&key("hubot", 1)).is_file());
        assert!(!store.path_for(&key("octocat", 1)).exists());
        assert!(store.dir().join("notes.txt").is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_prune_nothing_when_the_directory_does_not_exist(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        let removed = store.prune("octocat", key("octocat", 3).bucket()).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_remove_the_temp_file_when_the_entry_cannot_be_written(
        before_each: (TempDir, FileRecordStore),
    ) {
        let (_temp_dir, store) = before_each;
        let target = store.path_for(&key("octocat", 3));
        std::fs::create_dir_all(target.join("occupied")).unwrap();

        let result = store.save(&key("octocat", 3), &sample_portfolio()).await;

        assert!(matches!(result, Err(RecordStoreError::Io(_))));
        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|e| e == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
