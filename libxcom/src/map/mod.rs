#![allow(clippy::module_name_repetitions)]

pub(crate) mod resolve;
pub(crate) mod terrain;

use std::{io::Read, path::Path};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    source::{self, next_byte, read_exact_or_truncated},
    Error,
};

/// Number of bytes per map cell
pub const CELL_LEN: usize = 4;

/// What to do when a map body holds fewer cells than its header declares
#[derive(Default, Debug, Eq, PartialEq, Copy, Clone)]
pub enum Partial {
    /// Fail with [`Error::Truncated`]
    #[default]
    Reject,
    /// Keep the cells that are present and fill the rest with [`MapCell::EMPTY`]
    Tolerate,
}

/// The four tile references of one map cell, as indexes into the concatenated tile tables
/// of the map's terrains
#[derive(Default, Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize)]
pub struct MapCell {
    /// floor tile
    pub floor: u8,
    /// west wall tile
    pub west: u8,
    /// north wall tile
    pub north: u8,
    /// object tile
    pub object: u8,
}

impl MapCell {
    /// A cell referencing tile 0 in every slot
    pub const EMPTY: Self = Self {
        floor: 0,
        west: 0,
        north: 0,
        object: 0,
    };

    const fn from_bytes(b: [u8; CELL_LEN]) -> Self {
        Self {
            floor: b[0],
            west: b[1],
            north: b[2],
            object: b[3],
        }
    }
}

/// A decoded `.MAP` file: `height` levels of `depth` rows of `width` cells
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct MapGrid {
    height: u8,
    width: u8,
    depth: u8,
    cells: Vec<MapCell>,
    complete: bool,
}

impl MapGrid {
    /// Decodes a map: a 3 byte header (height, width, depth, in that order) followed by
    /// 4 byte cells, row by row within each level
    ///
    /// Bytes after the declared cells are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the header is incomplete, if the body ends inside a
    /// cell, or (with [`Partial::Reject`]) if it holds fewer cells than declared
    #[instrument(skip(r), level = "debug")]
    pub fn from_reader(mut r: impl Read, partial: Partial) -> Result<Self, Error> {
        let mut header = [0; 3];
        read_exact_or_truncated(&mut r, &mut header, "map header")?;
        let [height, width, depth] = header;
        let total = usize::from(height) * usize::from(width) * usize::from(depth);
        debug!("map is {width}x{depth} with {height} levels, {total} cells");

        let mut cells = Vec::with_capacity(total);
        let mut buf = [0; CELL_LEN];
        while cells.len() < total {
            let Some(first) = next_byte(&mut r)? else {
                break;
            };
            buf[0] = first;
            read_exact_or_truncated(&mut r, &mut buf[1..], "map cell")?;
            cells.push(MapCell::from_bytes(buf));
        }

        let complete = cells.len() == total;
        if !complete {
            match partial {
                Partial::Reject => {
                    return Err(Error::Truncated {
                        what: "map cells",
                        expected: total,
                        found: cells.len(),
                    })
                }
                Partial::Tolerate => {
                    warn!("map holds {} of {total} cells", cells.len());
                    cells.resize(total, MapCell::EMPTY);
                }
            }
        } else if next_byte(&mut r)?.is_some() {
            warn!("ignoring trailing bytes after {total} map cells");
        }

        Ok(Self {
            height,
            width,
            depth,
            cells,
            complete,
        })
    }

    /// Decodes the `.MAP` file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the file is missing, see also
    /// [`Self::from_reader`]
    pub fn from_file(path: impl AsRef<Path>, partial: Partial) -> Result<Self, Error> {
        let path = path.as_ref();
        info!("Reading map file {}", path.display());
        Self::from_reader(source::open(path)?, partial)
    }

    /// Number of levels
    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Number of columns per row
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows per level
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// False if the body was short and the missing cells were filled in
    #[must_use]
    pub const fn complete(&self) -> bool {
        self.complete
    }

    /// All cells, level by level, row by row
    #[must_use]
    pub fn cells(&self) -> &[MapCell] {
        &self.cells
    }

    /// The cell at `level`, `row`, `col`
    #[must_use]
    pub fn cell(&self, level: u8, row: u8, col: u8) -> Option<&MapCell> {
        if level >= self.height || row >= self.depth || col >= self.width {
            return None;
        }
        self.cells.get(self.cell_index(level, row, col))
    }

    /// The rows of `level`
    pub fn rows(&self, level: u8) -> impl Iterator<Item = &[MapCell]> {
        let level_len = usize::from(self.width) * usize::from(self.depth);
        let start = (usize::from(level) * level_len).min(self.cells.len());
        let end = (start + level_len).min(self.cells.len());
        self.cells[start..end].chunks(usize::from(self.width).max(1))
    }

    /// The grid as nested `[level][row][col]` slices
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<&[MapCell]>> {
        (0..self.height).map(|l| self.rows(l).collect()).collect()
    }

    const fn cell_index(&self, level: u8, row: u8, col: u8) -> usize {
        (level as usize * self.depth as usize + row as usize) * self.width as usize + col as usize
    }
}
