use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::records::{BLOCKS_HEADER, REWARDS_HEADER};
use crate::error::HubError;

pub const BLOCKS_FILE: &str = "Blocks.csv";
pub const REWARDS_FILE: &str = "mining_rewards.csv";

/// Locations of the two ledger files inside the ledger directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFiles {
    pub dir: PathBuf,
    pub blocks: PathBuf,
    pub rewards: PathBuf,
}

impl LedgerFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            blocks: dir.join(BLOCKS_FILE),
            rewards: dir.join(REWARDS_FILE),
            dir,
        }
    }

    /// Make sure the directory and both files exist.
    ///
    /// A missing file is created holding only its header row; existing files
    /// are left untouched.
    pub async fn ensure_exist(&self) -> Result<(), HubError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| HubError::Bootstrap {
                path: self.dir.clone(),
                source,
            })?;

        create_with_header(&self.blocks, BLOCKS_HEADER).await?;
        create_with_header(&self.rewards, REWARDS_HEADER).await
    }
}

async fn create_with_header(path: &Path, header: &str) -> Result<(), HubError> {
    let bootstrap_err = |source| HubError::Bootstrap {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => return Err(bootstrap_err(e)),
    };

    file.write_all(format!("{header}\n").as_bytes())
        .await
        .map_err(bootstrap_err)?;
    file.flush().await.map_err(bootstrap_err)?;
    info!("LEDGER - created {} with header row", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::LedgerFiles;
    use crate::ledger::records::{BLOCKS_HEADER, REWARDS_HEADER};
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_missing_files_with_headers() {
        let tmp = TempDir::new().unwrap();
        let files = LedgerFiles::new(tmp.path().join("data"));
        files.ensure_exist().await.unwrap();

        let blocks = std::fs::read_to_string(&files.blocks).unwrap();
        let rewards = std::fs::read_to_string(&files.rewards).unwrap();
        assert_eq!(blocks, format!("{BLOCKS_HEADER}\n"));
        assert_eq!(rewards, format!("{REWARDS_HEADER}\n"));
    }

    #[tokio::test]
    async fn keeps_existing_content() {
        let tmp = TempDir::new().unwrap();
        let files = LedgerFiles::new(tmp.path());
        let existing = "Miner Address,Total Rewards\nm1,50\n";
        std::fs::write(&files.rewards, existing).unwrap();

        files.ensure_exist().await.unwrap();
        files.ensure_exist().await.unwrap();

        assert_eq!(std::fs::read_to_string(&files.rewards).unwrap(), existing);
        assert!(files.blocks.exists());
    }
}
