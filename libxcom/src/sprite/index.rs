use std::{io::Read, path::Path};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    source::{self, next_byte, read_exact_or_truncated},
    Error,
};

/// Width of one entry of a `.TAB` index file
#[derive(Default, Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize)]
pub enum TabWidth {
    /// 2 byte entries, used by almost every archive
    #[default]
    Two,
    /// 4 byte entries, used by the unit archives of TFTD
    Four,
}

impl TabWidth {
    /// Number of bytes per entry
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Swaps the byte order of `offset` within this width.
    ///
    /// The index stores little-endian offsets that are read big-endian, so this converts
    /// between a stream offset and a stored value in both directions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn swap(self, offset: u32) -> u32 {
        match self {
            Self::Two => (offset as u16).swap_bytes() as u32,
            Self::Four => offset.swap_bytes(),
        }
    }
}

/// One entry of a `.TAB` index file
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct TabEntry {
    /// logical sprite id (position in the index file)
    pub index: usize,
    /// the stored value, read big-endian
    pub stored_offset: u32,
}

impl TabEntry {
    /// Returns the archive byte offset this entry points at
    #[must_use]
    pub const fn stream_offset(&self, width: TabWidth) -> u32 {
        width.swap(self.stored_offset)
    }
}

/// Decoded `.TAB` file, mapping logical sprite ids to archive offsets
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct TabIndex {
    width: TabWidth,
    entries: Vec<TabEntry>,
}

impl TabIndex {
    /// Reads fixed-width big-endian entries until the end of `r`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the source ends inside an entry
    #[instrument(skip(r), level = "debug")]
    pub fn from_reader(mut r: impl Read, width: TabWidth) -> Result<Self, Error> {
        let mut entries = Vec::new();
        let mut buf = [0; 4];
        let buf = &mut buf[..width.bytes()];
        while let Some(first) = next_byte(&mut r)? {
            buf[0] = first;
            read_exact_or_truncated(&mut r, &mut buf[1..], "tab entry")?;
            let stored_offset = buf.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
            entries.push(TabEntry {
                index: entries.len(),
                stored_offset,
            });
        }
        debug!("read {} tab entries", entries.len());
        Ok(Self { width, entries })
    }

    /// Reads a `.TAB` file. A missing file is not an error: it yields `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_reader`]
    pub fn from_file(path: impl AsRef<Path>, width: TabWidth) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        match source::open(path) {
            Ok(r) => Self::from_reader(r, width).map(Some),
            Err(Error::SourceNotFound { .. }) => {
                warn!("Tab file {} not found", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Entry width of this index
    #[must_use]
    pub const fn width(&self) -> TabWidth {
        self.width
    }

    /// All entries, in logical id order
    #[must_use]
    pub fn entries(&self) -> &[TabEntry] {
        &self.entries
    }

    /// The entry for logical sprite id `id`
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&TabEntry> {
        self.entries.get(id)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
