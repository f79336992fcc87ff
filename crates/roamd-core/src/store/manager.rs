//! Store file manager.
//!
//! Binds registered [`StoreData`] datasets to their physical files under a
//! base directory and owns the versioned file envelope:
//!
//! ```text
//! RealmStore {
//!   Version = i32(1)
//!   <dataset name> {
//!     ...
//!   }
//! }
//! ```
//!
//! Writes are atomic: the new contents land in a temporary file next to the
//! target which is then persisted over it.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::codec::{Element, SectionReader, SectionWriter};
use crate::store::data::{StoreData, StoreFile};
use crate::store::error::StoreError;

/// Version written into every store file envelope.
pub const STORE_VERSION: i32 = 1;

const TAG_SECTION_STORE: &str = "RealmStore";
const TAG_VERSION: &str = "Version";

#[derive(Debug)]
pub struct StoreManager {
    base_dir: PathBuf,
    datasets: Vec<Arc<dyn StoreData>>,
}

impl StoreManager {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            datasets: Vec::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn register(&mut self, data: Arc<dyn StoreData>) {
        self.datasets.push(data);
    }

    /// Persist every store file that has a dataset with pending changes.
    pub fn write(&self) -> Result<(), StoreError> {
        for file in StoreFile::ALL {
            self.write_file(file)?;
        }
        Ok(())
    }

    /// Load every store file, dispatching sections to registered datasets.
    /// Missing files mean there is nothing to load yet and are not errors.
    pub fn read(&self) -> Result<(), StoreError> {
        for file in StoreFile::ALL {
            self.read_file(file)?;
        }
        Ok(())
    }

    fn datasets_for(&self, file: StoreFile) -> Vec<&Arc<dyn StoreData>> {
        self.datasets
            .iter()
            .filter(|d| d.target_file() == file)
            .collect()
    }

    fn write_file(&self, file: StoreFile) -> Result<(), StoreError> {
        let datasets = self.datasets_for(file);
        if datasets.is_empty() || !datasets.iter().any(|d| d.has_pending_changes()) {
            return Ok(());
        }

        let mut out = SectionWriter::new();
        out.start_section(TAG_SECTION_STORE)?;
        out.write_i32(TAG_VERSION, STORE_VERSION)?;
        for dataset in &datasets {
            out.start_section(dataset.name())?;
            dataset.serialize(&mut out)?;
            out.end_section(dataset.name())?;
        }
        out.end_section(TAG_SECTION_STORE)?;
        let contents = out.finish()?;

        fs::create_dir_all(&self.base_dir)
            .map_err(|e| StoreError::io(e, "create_dir_all", self.base_dir.clone()))?;
        let path = self.base_dir.join(file.file_name());
        let mut temp = NamedTempFile::new_in(&self.base_dir)
            .map_err(|e| StoreError::io(e, "create_temp_file", self.base_dir.clone()))?;
        temp.write_all(contents.as_bytes())
            .map_err(|e| StoreError::io(e, "write_temp_file", path.clone()))?;
        temp.persist(&path)
            .map_err(|e| StoreError::io(e.error, "persist", path.clone()))?;
        log::debug!("wrote store file {}", path.display());
        Ok(())
    }

    fn read_file(&self, file: StoreFile) -> Result<(), StoreError> {
        let datasets = self.datasets_for(file);
        if datasets.is_empty() {
            return Ok(());
        }
        let path = self.base_dir.join(file.file_name());
        if !path.is_file() {
            log::debug!("store file {} not present, nothing to load", path.display());
            for dataset in &datasets {
                dataset.deserialize(None, 0)?;
            }
            return Ok(());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| StoreError::io(e, "read_to_string", path.clone()))?;
        let mut source = SectionReader::new(&contents)?;
        if !source.goto_next_section_with_name_or_end(TAG_SECTION_STORE, 0)? {
            return Err(StoreError::MissingEnvelope);
        }

        // The version leads the envelope; anything else first is a
        // structurally broken file.
        let version = match source.next_element_within(1)? {
            Some(Element::Value { name, value }) if name == TAG_VERSION => value.as_i32(&name)?,
            _ => return Err(StoreError::MissingVersion),
        };
        if version > STORE_VERSION {
            log::warn!(
                "store file {} has version {} (current {}), attempting to parse anyway",
                path.display(),
                version,
                STORE_VERSION
            );
        }

        let mut seen: HashSet<&'static str> = HashSet::new();
        while let Some(section) = source.goto_next_section_or_end(1)? {
            match datasets.iter().find(|d| d.name() == section) {
                Some(dataset) => {
                    dataset.deserialize(Some(&mut source), 2)?;
                    seen.insert(dataset.name());
                }
                None => {
                    log::warn!("ignoring unknown store data section '{}'", section);
                    source.skip_current_section()?;
                }
            }
        }

        // Datasets the file no longer carries fall back to empty.
        for dataset in &datasets {
            if !seen.contains(dataset.name()) {
                dataset.reset();
            }
        }
        Ok(())
    }
}
