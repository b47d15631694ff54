use anyhow::{Context, Result};
use journey_core::{JourneyTracker, JOURNEY_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manages isolated test environments with tempfile
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the journey directory
    pub fn journey_dir(&self) -> PathBuf {
        self.path().join(JOURNEY_DIR)
    }

    /// Initialize a journey store in workspace
    pub fn init_tracker(&self) -> Result<JourneyTracker> {
        Ok(JourneyTracker::init(self.path())?)
    }

    /// Open the existing journey store
    pub fn open_tracker(&self) -> Result<JourneyTracker> {
        Ok(JourneyTracker::open(self.path())?)
    }

    /// Overwrite `config.toml` before the store is next opened
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(self.journey_dir().join("config.toml"), content)
            .context("Failed to write config.toml")
    }

    /// Check if a file exists under the journey directory
    pub fn journey_file_exists(&self, name: &str) -> bool {
        self.journey_dir().join(name).exists()
    }
}
