#![allow(clippy::module_name_repetitions)]

pub(crate) mod record;

use std::{
    io::{Read, Seek},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::{
    source::{self, read_exact_or_truncated},
    Error,
};
use record::{TileAttributeEntry, RECORD_LEN};

/// The decoded records of one `.MCD` file, indexed by position
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct TileAttributeTable {
    name: String,
    entries: Vec<TileAttributeEntry>,
}

impl TileAttributeTable {
    /// Decodes every 62 byte record of `r`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] if the size of `r` is not a multiple of 62
    #[instrument(skip(r), level = "debug")]
    pub fn from_reader(mut r: impl Read + Seek, name: &str) -> Result<Self, Error> {
        let size = source::len(&mut r)?;
        if size % RECORD_LEN as u64 != 0 {
            return Err(Error::InvalidSize {
                size,
                record_len: RECORD_LEN,
            });
        }
        let count = usize::try_from(size / RECORD_LEN as u64).unwrap_or(usize::MAX);
        debug!("{count} tile records");
        let mut entries = Vec::with_capacity(count);
        let mut rec = [0; RECORD_LEN];
        for i in 0..count {
            read_exact_or_truncated(&mut r, &mut rec, "tile record")?;
            let entry = TileAttributeEntry::from_record(&rec);
            trace!("tile {i}: {:?}", entry.tile_type);
            entries.push(entry);
        }
        Ok(Self {
            name: name.to_owned(),
            entries,
        })
    }

    /// Decodes an `.MCD` file, naming the table after the file stem
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the file is missing, see also
    /// [`Self::from_reader`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        info!("Reading MCD file {}", path.display());
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_reader(source::open(path)?, &name)
    }

    /// Name of the terrain the table belongs to
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in file order
    #[must_use]
    pub fn entries(&self) -> &[TileAttributeEntry] {
        &self.entries
    }

    /// The entry at position `i`
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&TileAttributeEntry> {
        self.entries.get(i)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
