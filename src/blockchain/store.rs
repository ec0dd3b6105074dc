use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use tokio::fs;

use super::{Block, verify_chain};
use crate::error::{ChainViolation, StoreError};

const FILE_PREFIX: &str = "BLK";
const FILE_SUFFIX: &str = ".json";

/// One pretty-printed JSON file per block, named by zero-padded index.
///
/// The store assumes a single logical writer. `save_block` on an index
/// that already exists overwrites it.
#[derive(Debug, Clone)]
pub struct BlockStore {
    dir: PathBuf,
}

impl BlockStore {
    /// Open the store, creating its directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if let Err(source) = fs::create_dir_all(&dir).await {
            error!("STORE - cannot create block directory {}: {source}", dir.display());
            return Err(StoreError::Init { path: dir, source });
        }
        info!("STORE - block directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn block_path(&self, index: u64) -> PathBuf {
        self.dir.join(block_file_name(index))
    }

    pub async fn save_block(&self, block: &Block) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(block)?;
        fs::write(self.block_path(block.index), json).await?;
        debug!("STORE - saved block #{} (hash={})", block.index, block.hash);
        Ok(())
    }

    /// `Ok(None)` when no file exists for `index`.
    pub async fn get_block(&self, index: u64) -> Result<Option<Block>, StoreError> {
        let bytes = match fs::read(self.block_path(index)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Highest index among recognised block files; `None` for an empty chain.
    pub async fn latest_block_index(&self) -> Result<Option<u64>, StoreError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut latest = None;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(index) = name.to_str().and_then(parse_block_file_name) else {
                continue;
            };
            latest = latest.max(Some(index));
        }
        Ok(latest)
    }

    /// Every block from 0 to the latest index, ascending.
    ///
    /// A missing intermediate file is reported as [`StoreError::MissingBlock`].
    pub async fn get_all_blocks(&self) -> Result<Vec<Block>, StoreError> {
        let Some(latest) = self.latest_block_index().await? else {
            return Ok(Vec::new());
        };

        // `latest` comes from a file name, so it cannot size an allocation.
        let mut blocks = Vec::new();
        for index in 0..=latest {
            match self.get_block(index).await? {
                Some(block) => blocks.push(block),
                None => return Err(StoreError::MissingBlock { index, latest }),
            }
        }
        Ok(blocks)
    }

    /// Audit the stored chain.
    ///
    /// The outer error is a storage failure; the inner result is the verdict,
    /// carrying the chain length when it holds. A gap is a violation, not a
    /// storage failure.
    pub async fn verify(&self) -> Result<Result<usize, ChainViolation>, StoreError> {
        let blocks = match self.get_all_blocks().await {
            Ok(blocks) => blocks,
            Err(StoreError::MissingBlock { index, .. }) => {
                return Ok(Err(ChainViolation::MissingBlock { index }));
            }
            Err(e) => return Err(e),
        };
        Ok(verify_chain(&blocks).map(|()| blocks.len()))
    }
}

fn block_file_name(index: u64) -> String {
    format!("{FILE_PREFIX}{index:04}{FILE_SUFFIX}")
}

fn parse_block_file_name(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{BlockStore, block_file_name, parse_block_file_name};
    use crate::blockchain::Block;
    use crate::error::{ChainViolation, StoreError};
    use serde_json::json;
    use tempfile::TempDir;

    async fn store() -> (TempDir, BlockStore) {
        let tmp = TempDir::new().unwrap();
        let store = BlockStore::open(tmp.path().join("blocks")).await.unwrap();
        (tmp, store)
    }

    async fn save_chain(store: &BlockStore, len: usize) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(json!({"genesis": true}))];
        while blocks.len() < len {
            let next = blocks[blocks.len() - 1].next(json!({"winnerId": blocks.len()}));
            blocks.push(next);
        }
        for b in &blocks {
            store.save_block(b).await.unwrap();
        }
        blocks
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(block_file_name(7), "BLK0007.json");
        assert_eq!(block_file_name(12345), "BLK12345.json");
        assert_eq!(parse_block_file_name("BLK0007.json"), Some(7));
        assert_eq!(parse_block_file_name("BLK12345.json"), Some(12345));
        assert_eq!(parse_block_file_name("BLK7.json"), None);
        assert_eq!(parse_block_file_name("BLK00a7.json"), None);
        assert_eq!(parse_block_file_name("BLK0007.json.tmp"), None);
        assert_eq!(parse_block_file_name("notes.txt"), None);
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        BlockStore::open(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn open_reports_uncreatable_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("occupied");
        std::fs::write(&file, b"not a dir").unwrap();
        let err = BlockStore::open(file.join("blocks")).await.unwrap_err();
        assert!(matches!(err, StoreError::Init { .. }));
    }

    #[tokio::test]
    async fn round_trip() {
        let (_tmp, store) = store().await;
        let block = Block::genesis(json!({"nested": {"b": [1, 2.5, "x"], "a": null}}));
        store.save_block(&block).await.unwrap();
        assert_eq!(store.get_block(0).await.unwrap(), Some(block));
    }

    #[tokio::test]
    async fn absent_block_is_none() {
        let (_tmp, store) = store().await;
        assert_eq!(store.get_block(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_block_file_is_an_error() {
        let (_tmp, store) = store().await;
        std::fs::write(store.dir().join("BLK0000.json"), b"{ not json").unwrap();
        let err = store.get_block(0).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn empty_store_has_no_latest_index() {
        let (_tmp, store) = store().await;
        assert_eq!(store.latest_block_index().await.unwrap(), None);
        assert!(store.get_all_blocks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_saves_are_returned_in_order() {
        let (_tmp, store) = store().await;
        let saved = save_chain(&store, 5).await;
        std::fs::write(store.dir().join("README.md"), b"ignored").unwrap();

        assert_eq!(store.latest_block_index().await.unwrap(), Some(4));
        assert_eq!(store.get_all_blocks().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn gap_is_reported() {
        let (_tmp, store) = store().await;
        save_chain(&store, 4).await;
        std::fs::remove_file(store.dir().join("BLK0002.json")).unwrap();

        let err = store.get_all_blocks().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingBlock {
                index: 2,
                latest: 3
            }
        ));
    }

    #[tokio::test]
    async fn save_overwrites_existing_index() {
        let (_tmp, store) = store().await;
        let blocks = save_chain(&store, 2).await;
        let replacement = Block::new(1, json!("other"), blocks[0].hash.clone());
        store.save_block(&replacement).await.unwrap();
        assert_eq!(store.get_block(1).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn verify_flags_tampered_file() {
        let (_tmp, store) = store().await;
        let blocks = save_chain(&store, 3).await;
        let mut forged = blocks[1].clone();
        forged.data = json!("forged");
        store.save_block(&forged).await.unwrap();

        assert_eq!(
            store.verify().await.unwrap(),
            Err(ChainViolation::HashMismatch { index: 1 })
        );
    }

    #[tokio::test]
    async fn verify_accepts_intact_chain_and_reports_gaps() {
        let (_tmp, store) = store().await;
        assert_eq!(store.verify().await.unwrap(), Ok(0));

        save_chain(&store, 3).await;
        assert_eq!(store.verify().await.unwrap(), Ok(3));

        std::fs::remove_file(store.dir().join("BLK0001.json")).unwrap();
        assert_eq!(
            store.verify().await.unwrap(),
            Err(ChainViolation::MissingBlock { index: 1 })
        );
    }

    #[tokio::test]
    async fn huge_index_file_is_a_gap_not_a_panic() {
        let (_tmp, store) = store().await;
        save_chain(&store, 1).await;
        std::fs::write(store.dir().join(block_file_name(u64::MAX)), b"{}").unwrap();

        assert_eq!(store.latest_block_index().await.unwrap(), Some(u64::MAX));
        let err = store.get_all_blocks().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingBlock {
                index: 1,
                latest: u64::MAX
            }
        ));
        assert_eq!(
            store.verify().await.unwrap(),
            Err(ChainViolation::MissingBlock { index: 1 })
        );
    }
}
