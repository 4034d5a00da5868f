use std::{
    io::{Read, Seek},
    path::Path,
};

use tracing::{debug, info, instrument};

use super::Palette;
use crate::{
    source::{self, read_exact_or_truncated},
    Error,
};

/// Number of colors in one backdrop overlay
pub const OVERLAY_COLORS: usize = 16;
/// Number of overlays in a `BACKPALS.DAT` archive
pub const OVERLAY_COUNT: usize = 8;
const OVERLAY_RECORD_LEN: usize = OVERLAY_COLORS * 3;

/// The eight 16 color backdrop overlays.
///
/// At render time the last 16 entries of a palette are replaced by one of these depending on
/// context; use [`Palette::with_overlay`] to build the combined palette.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct OverlayPalettes {
    palettes: Vec<Palette>,
}

impl OverlayPalettes {
    /// Reads 8 consecutive 16 color blocks
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSize`] if the size is not a multiple of 48 bytes
    /// - [`Error::Truncated`] if fewer than 8 blocks are present
    #[instrument(skip(r), level = "debug")]
    pub fn from_reader(mut r: impl Read + Seek) -> Result<Self, Error> {
        let size = source::len(&mut r)?;
        if size % OVERLAY_RECORD_LEN as u64 != 0 {
            return Err(Error::InvalidSize {
                size,
                record_len: OVERLAY_RECORD_LEN,
            });
        }
        let available = usize::try_from(size / OVERLAY_RECORD_LEN as u64).unwrap_or(usize::MAX);
        debug!("{available} overlay blocks in archive");
        if available < OVERLAY_COUNT {
            return Err(Error::Truncated {
                what: "overlay palettes",
                expected: OVERLAY_COUNT,
                found: available,
            });
        }
        let mut palettes = Vec::with_capacity(OVERLAY_COUNT);
        let mut buf = [0; OVERLAY_RECORD_LEN];
        for _ in 0..OVERLAY_COUNT {
            read_exact_or_truncated(&mut r, &mut buf, "overlay palette")?;
            palettes.push(Palette::from_vga_bytes(&buf));
        }
        Ok(Self { palettes })
    }

    /// Reads `GEODATA/BACKPALS.DAT` of a game installation rooted at `root`
    ///
    /// # Errors
    ///
    /// See [`Self::from_reader`]; a missing file is [`Error::SourceNotFound`]
    pub fn from_game_dir(root: impl AsRef<Path>) -> Result<Self, Error> {
        let path = root.as_ref().join("GEODATA").join("BACKPALS.DAT");
        info!("Reading backdrop overlays from {}", path.display());
        Self::from_reader(source::open(path)?)
    }

    /// Returns overlay `index` (0-7)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    /// Iterates over all overlays in archive order
    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{palette::Color, ErrorKind};
    use std::io::Cursor;

    #[test]
    fn reads_eight_blocks() {
        let data: Vec<u8> = (0..8u8)
            .flat_map(|i| std::iter::repeat(i).take(OVERLAY_RECORD_LEN))
            .collect();
        let overlays = OverlayPalettes::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(overlays.iter().count(), 8);
        let last = overlays.get(7).unwrap();
        assert_eq!(last.len(), 16);
        assert_eq!(last.get(15), Some(Color::new(28, 28, 28)));
        assert!(overlays.get(8).is_none());
    }

    #[test]
    fn rejects_partial_blocks() {
        let err = OverlayPalettes::from_reader(Cursor::new(vec![0; 385])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn rejects_too_few_blocks() {
        let err = OverlayPalettes::from_reader(Cursor::new(vec![0; 48 * 7])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncation);
    }
}
