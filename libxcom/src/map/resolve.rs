use serde::Serialize;
use tracing::debug;

use super::{terrain::TerrainBundle, MapCell, MapGrid};
use crate::{
    tile::{record::TileAttributeEntry, TileAttributeTable},
    Error,
};

/// A tile reference resolved against the concatenated tile tables of a map
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct ResolvedTile<'a> {
    /// terrain the tile comes from
    pub terrain: &'a str,
    /// position of the tile within its terrain's table
    pub local_index: usize,
    /// the tile attributes
    pub entry: &'a TileAttributeEntry,
}

/// A map cell whose four references have been resolved
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct ResolvedCell<'a> {
    /// floor tile
    pub floor: ResolvedTile<'a>,
    /// west wall tile
    pub west: ResolvedTile<'a>,
    /// north wall tile
    pub north: ResolvedTile<'a>,
    /// object tile
    pub object: ResolvedTile<'a>,
}

/// A [`MapGrid`] with every reference replaced by the tile it names
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ResolvedMapGrid<'a> {
    height: u8,
    width: u8,
    depth: u8,
    cells: Vec<ResolvedCell<'a>>,
}

impl MapGrid {
    /// Resolves every cell against the tile tables of `terrains`, concatenated in the order
    /// given
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if a reference is past the end of the concatenated
    /// table
    pub fn resolve<'a>(&self, terrains: &'a [TerrainBundle]) -> Result<ResolvedMapGrid<'a>, Error> {
        let tables: Vec<_> = terrains.iter().map(TerrainBundle::tiles).collect();
        self.resolve_tables(&tables)
    }

    /// Like [`Self::resolve`], from bare tile tables
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if a reference is past the end of the concatenated
    /// table
    pub fn resolve_tables<'a>(
        &self,
        tables: &[&'a TileAttributeTable],
    ) -> Result<ResolvedMapGrid<'a>, Error> {
        let concatenated: Vec<ResolvedTile<'a>> = tables
            .iter()
            .flat_map(|&table| {
                table
                    .entries()
                    .iter()
                    .enumerate()
                    .map(move |(local_index, entry)| ResolvedTile {
                        terrain: table.name(),
                        local_index,
                        entry,
                    })
            })
            .collect();
        debug!(
            "resolving {} cells against {} tiles",
            self.cells().len(),
            concatenated.len()
        );
        let lookup = |reference: u8| {
            concatenated
                .get(usize::from(reference))
                .copied()
                .ok_or(Error::OutOfRange {
                    reference: usize::from(reference),
                    len: concatenated.len(),
                })
        };
        let cells = self
            .cells()
            .iter()
            .map(|&MapCell {
                      floor,
                      west,
                      north,
                      object,
                  }| {
                Ok(ResolvedCell {
                    floor: lookup(floor)?,
                    west: lookup(west)?,
                    north: lookup(north)?,
                    object: lookup(object)?,
                })
            })
            .collect::<Result<_, Error>>()?;
        Ok(ResolvedMapGrid {
            height: self.height(),
            width: self.width(),
            depth: self.depth(),
            cells,
        })
    }
}

impl<'a> ResolvedMapGrid<'a> {
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

    /// All resolved cells, level by level, row by row
    #[must_use]
    pub fn cells(&self) -> &[ResolvedCell<'a>] {
        &self.cells
    }

    /// The resolved cell at `level`, `row`, `col`
    #[must_use]
    pub fn cell(&self, level: u8, row: u8, col: u8) -> Option<&ResolvedCell<'a>> {
        if level >= self.height || row >= self.depth || col >= self.width {
            return None;
        }
        let i = (usize::from(level) * usize::from(self.depth) + usize::from(row))
            * usize::from(self.width)
            + usize::from(col);
        self.cells.get(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map::Partial, tile::record::RECORD_LEN, ErrorKind};
    use std::io::Cursor;

    fn table(name: &str, count: usize) -> TileAttributeTable {
        let mut data = vec![0; count * RECORD_LEN];
        for i in 0..count {
            // tag each record with its local index
            data[i * RECORD_LEN + crate::tile::record::offsets::ARMOUR] = i as u8;
        }
        TileAttributeTable::from_reader(Cursor::new(data), name).unwrap()
    }

    fn single_cell(refs: [u8; 4]) -> MapGrid {
        let mut data = vec![1, 1, 1];
        data.extend(refs);
        MapGrid::from_reader(Cursor::new(data), Partial::Reject).unwrap()
    }

    #[test]
    fn references_span_concatenated_tables() {
        let (a, b) = (table("BLANKS", 10), table("AVENGER", 15));
        let tables = [&a, &b];
        let resolved = single_cell([0, 9, 10, 24]).resolve_tables(&tables).unwrap();
        let cell = resolved.cell(0, 0, 0).unwrap();
        assert_eq!((cell.floor.terrain, cell.floor.local_index), ("BLANKS", 0));
        assert_eq!((cell.west.terrain, cell.west.local_index), ("BLANKS", 9));
        assert_eq!((cell.north.terrain, cell.north.local_index), ("AVENGER", 0));
        assert_eq!((cell.object.terrain, cell.object.local_index), ("AVENGER", 14));
        assert_eq!(cell.object.entry.armour, 14);
    }

    #[test]
    fn reference_past_the_end_is_out_of_range() {
        let (a, b) = (table("BLANKS", 10), table("AVENGER", 15));
        let err = single_cell([0, 0, 0, 25])
            .resolve_tables(&[&a, &b])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(matches!(
            err,
            Error::OutOfRange {
                reference: 25,
                len: 25
            }
        ));
    }

    #[test]
    fn declaration_order_matters() {
        let (a, b) = (table("BLANKS", 10), table("AVENGER", 15));
        let resolved = single_cell([12, 0, 0, 0]).resolve_tables(&[&b, &a]).unwrap();
        assert_eq!(resolved.cells()[0].floor.terrain, "AVENGER");
        assert_eq!(resolved.cells()[0].floor.local_index, 12);
    }
}
