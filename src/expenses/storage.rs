#[cfg(test)]
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
#[cfg(test)]
use std::rc::Rc;

use crate::errors::RashodyError;

/// A single durable slot holding the whole serialized collection.
pub trait Storage {
    /// Returns `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>, RashodyError>;
    /// Overwrites the slot wholesale.
    fn save(&mut self, contents: &str) -> Result<(), RashodyError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<String>, RashodyError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), RashodyError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // write next to the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut file_writer = BufWriter::new(file);
            file_writer.write_all(contents.as_bytes())?;
            file_writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MemorySlot {
    contents: Option<String>,
    fail_writes: bool,
}

/// In-process slot; clones share the same contents.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<MemorySlot>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        let storage = Self::default();
        storage.slot.borrow_mut().contents = Some(contents.to_string());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().contents.clone()
    }

    /// Makes every following `save` fail, like a full disk.
    pub fn fail_writes(&self, fail: bool) {
        self.slot.borrow_mut().fail_writes = fail;
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, RashodyError> {
        Ok(self.contents())
    }

    fn save(&mut self, contents: &str) -> Result<(), RashodyError> {
        let mut slot = self.slot.borrow_mut();
        if slot.fail_writes {
            return Err(std::io::Error::new(ErrorKind::Other, "storage quota exceeded").into());
        }
        slot.contents = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("expenses.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn file_storage_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.json");
        let mut storage = JsonFileStorage::new(&path);
        storage.save("[1]").unwrap();
        storage.save("[]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[]"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn memory_storage_clones_share_slot() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();
        writer.save("[]").unwrap();
        assert_eq!(storage.contents().as_deref(), Some("[]"));

        storage.fail_writes(true);
        assert!(writer.save("[1]").is_err());
        assert_eq!(storage.contents().as_deref(), Some("[]"));
    }
}
