//! Minimap tiles from `GEODATA/SCANG.DAT`
//!
//! The file is a plain sequence of 4x4 pixel blocks, one palette index per pixel, with no
//! compression and no header. The first few tiles mark items on the map; the rest are
//! miniature terrain tiles, addressed through [`TileAttributeEntry::minimap_offset`].
//!
//! [`TileAttributeEntry::minimap_offset`]: crate::TileAttributeEntry::minimap_offset

use std::{
    io::{Read, Seek},
    path::Path,
};

use image::{ImageBuffer, Rgba, RgbaImage};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    palette::{rasterize, Palette},
    source::{self, read_exact_or_truncated},
    sprite::sheet::{sheet_position, sheet_rows},
    Error,
};

/// Side length of a minimap tile in pixels
pub const MINIMAP_TILE_SIZE: u32 = 4;

/// Length of one minimap tile record
pub const MINIMAP_RECORD_LEN: usize = 16;

/// One 4x4 minimap tile
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct MinimapTile {
    /// byte offset of the tile within its source, its only identity
    pub offset: u64,
    /// palette indexes, row by row
    pub pixels: [u8; MINIMAP_RECORD_LEN],
}

impl MinimapTile {
    /// Returns the RGBA pixels of the tile, index 0 transparent
    #[must_use]
    pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
        rasterize(&self.pixels, palette)
    }

    /// Returns the tile as an image
    #[must_use]
    pub fn to_image(&self, palette: &Palette) -> RgbaImage {
        ImageBuffer::from_fn(MINIMAP_TILE_SIZE, MINIMAP_TILE_SIZE, |x, y| {
            Rgba(palette.rgba(self.pixels[(y * MINIMAP_TILE_SIZE + x) as usize]))
        })
    }
}

/// All tiles of a minimap source
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize)]
pub struct MinimapAtlas {
    tiles: Vec<MinimapTile>,
}

impl MinimapAtlas {
    /// Decodes consecutive 16-byte tiles until the end of `r`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] if the source ends with a partial tile
    #[instrument(level = "debug", skip_all)]
    pub fn from_reader(mut r: impl Read + Seek) -> Result<Self, Error> {
        let size = source::len(&mut r)?;
        if size % MINIMAP_RECORD_LEN as u64 != 0 {
            return Err(Error::InvalidSize {
                size,
                record_len: MINIMAP_RECORD_LEN,
            });
        }
        let count = size / MINIMAP_RECORD_LEN as u64;
        debug!("{count} minimap tiles");
        let tiles = (0..count)
            .map(|i| {
                let mut pixels = [0; MINIMAP_RECORD_LEN];
                read_exact_or_truncated(&mut r, &mut pixels, "minimap tile")?;
                Ok(MinimapTile {
                    offset: i * MINIMAP_RECORD_LEN as u64,
                    pixels,
                })
            })
            .collect::<Result<_, Error>>()?;
        Ok(Self { tiles })
    }

    /// Decodes the file at `path`
    ///
    /// # Errors
    ///
    /// See [`Self::from_reader`]; a missing file is [`Error::SourceNotFound`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        info!("Reading minimap tiles from {}", path.display());
        Self::from_reader(source::open(path)?)
    }

    /// Reads `GEODATA/SCANG.DAT` of a game installation rooted at `root`
    ///
    /// # Errors
    ///
    /// See [`Self::from_file`]
    pub fn from_game_dir(root: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_file(root.as_ref().join("GEODATA").join("SCANG.DAT"))
    }

    /// All tiles in file order
    #[must_use]
    pub fn tiles(&self) -> &[MinimapTile] {
        &self.tiles
    }

    /// Tile `i` in file order
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&MinimapTile> {
        self.tiles.get(i)
    }

    /// Number of tiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the source held no tiles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Packs every tile into one image, `columns` tiles per row
    ///
    /// The atlas is never wider than the number of tiles.
    #[must_use]
    pub fn atlas_image(&self, palette: &Palette, columns: u32) -> RgbaImage {
        let count = u32::try_from(self.tiles.len()).unwrap_or(u32::MAX);
        let columns = columns.clamp(1, count.max(1));
        let mut atlas = RgbaImage::new(
            columns * MINIMAP_TILE_SIZE,
            sheet_rows(count, columns) * MINIMAP_TILE_SIZE,
        );
        for (i, tile) in (0..count).zip(&self.tiles) {
            let pos = sheet_position(i, columns);
            image::imageops::replace(
                &mut atlas,
                &tile.to_image(palette),
                i64::from(pos.col * MINIMAP_TILE_SIZE),
                i64::from(pos.row * MINIMAP_TILE_SIZE),
            );
        }
        atlas
    }
}
