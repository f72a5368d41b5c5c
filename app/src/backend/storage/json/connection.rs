use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_DIRECTORY_NAME: &str = "holiday-calendar";

/// JsonConnection owns the device-local data directory and its named slots.
///
/// Every slot is one small JSON file. Writes go to a temp file that is then
/// renamed over the slot, so a crash never leaves a half-written slot.
#[derive(Clone, Debug)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Open a connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("failed to create data directory {}", base_path.display())
            })?;
            info!("📁 Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// The platform data directory, e.g. `~/.local/share/holiday-calendar`
    pub fn default_directory() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;
        Ok(data_dir.join(DEFAULT_DIRECTORY_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_directory.join(slot)
    }

    /// Raw content of a slot, `None` when the slot was never written
    pub fn read_slot(&self, slot: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace a slot atomically
    pub fn write_slot(&self, slot: &str, content: &str) -> Result<()> {
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!("Saved slot '{}' ({} bytes)", slot, content.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestEnvironment;

    #[test]
    fn test_new_creates_missing_directory() {
        let env = TestEnvironment::new().unwrap();
        let nested = env.base_directory().join("a").join("b");
        let connection = JsonConnection::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(connection.base_directory(), nested.as_path());
    }

    #[test]
    fn test_slot_round_trip_and_missing_slot() {
        let env = TestEnvironment::new().unwrap();
        assert_eq!(env.connection.read_slot("absent.json").unwrap(), None);

        env.connection.write_slot("value.json", "42").unwrap();
        assert_eq!(
            env.connection.read_slot("value.json").unwrap().as_deref(),
            Some("42")
        );

        env.connection.write_slot("value.json", "43").unwrap();
        assert_eq!(
            env.connection.read_slot("value.json").unwrap().as_deref(),
            Some("43")
        );
        assert!(!env.connection.slot_path("value.tmp").exists());
    }
}
