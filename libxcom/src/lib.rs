//! # libxcom
//!
//!
//! This library decodes the binary asset formats of the 1990s X-COM games, *UFO: Enemy
//! Unknown* and *Terror from the Deep*, into plain Rust values.
//!
//! It aims to provide a small, read-only API to build viewers and converters upon. Every
//! decoder takes a byte source, returns fully decoded values and never mutates them
//! afterwards; rendering, editing and game rules are left to the users of this crate.
//!
//! ### Formats
//!
//! - `PALETTES.DAT`, `BACKPALS.DAT` and the TFTD `D*.LBM` headers: [`PrimaryPalettes`],
//!   [`OverlayPalettes`]
//! - `.PCK` run-length encoded sprite archives and their `.TAB` indexes: [`PckFile`],
//!   [`TabIndex`]
//! - `.MCD` tile attributes: [`TileAttributeTable`]
//! - `.MAP` tactical map grids: [`MapGrid`], resolved against [`TerrainBundle`]s
//! - `SCANG.DAT` minimap tiles: [`MinimapAtlas`]
//!
//! None of these formats are formally documented; the community write-ups on
//! [UFOpaedia](https://www.ufopaedia.org) have been the main reference.
//!
//! ### Usage
//!
//! #### Decoding a sprite archive
//!
//! Sprite archives are plain byte streams, so they can be decoded from anything that
//! implements [`Read`](std::io::Read) and [`Seek`](std::io::Seek). The cell size and
//! palette are picked from the game, the resource directory and the file name.
//!
//! ```rust
//! use libxcom::{Color, PckFile, PckOptions, Palette, ResourceCategory};
//! use std::io::Cursor;
//!
//! fn main() -> anyhow::Result<()> {
//!     // one sprite: skip 39 rows, draw two pixels, end
//!     let data = vec![39, 5, 6, 0xFF];
//!     let options = PckOptions::builder()
//!         .category(ResourceCategory::Terrain)
//!         .file_name("AVENGER.PCK")
//!         .build();
//!     let pck = PckFile::from_reader(Cursor::new(data), &options)?;
//!     assert_eq!(pck.sprites().len(), 1);
//!
//!     let sprite = &pck.sprites()[0];
//!     assert_eq!((sprite.width, sprite.height), (32, 40));
//!
//!     let palette = Palette::from_colors(vec![Color::new(0, 0, 255); 256]).unwrap();
//!     let rgba = sprite.to_rgba(&palette);
//!     assert_eq!(&rgba[39 * 32 * 4..][..4], &[0, 0, 255, 255]);
//!     Ok(())
//! }
//! ```
//!
//! #### Resolving a map
//!
//! Map cells refer to tiles by their position in the concatenated tile tables of the
//! terrains a map uses, in the order the terrains are declared.
//!
//! ```rust
//! use libxcom::{MapGrid, Partial, TileAttributeTable};
//! use std::io::Cursor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let blanks = TileAttributeTable::from_reader(Cursor::new(vec![0; 62 * 2]), "BLANKS")?;
//!     let avenger = TileAttributeTable::from_reader(Cursor::new(vec![0; 62 * 3]), "AVENGER")?;
//!
//!     // height 1, width 1, depth 1, one cell
//!     let grid = MapGrid::from_reader(Cursor::new(vec![1, 1, 1, 0, 1, 2, 4]), Partial::Reject)?;
//!     let resolved = grid.resolve_tables(&[&blanks, &avenger])?;
//!
//!     let cell = resolved.cell(0, 0, 0).unwrap();
//!     assert_eq!(cell.north.terrain, "AVENGER");
//!     assert_eq!(cell.object.local_index, 2);
//!     Ok(())
//! }
//! ```
//!
//! #### Unstable API
//!
//! This crate is still very much a work-in-progress. Expect breaking changes between minor
//! releases until `v1.0`.
//!
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
mod game;
mod map;
mod palette;
mod scang;
pub mod source;
mod sprite;
mod tile;

pub use error::{Error, ErrorKind};
pub use game::{GameVariant, ResourceCategory};
pub use map::{
    resolve::{ResolvedCell, ResolvedMapGrid, ResolvedTile},
    terrain::TerrainBundle,
    MapCell, MapGrid, Partial, CELL_LEN,
};
pub use palette::{
    overlay::{OverlayPalettes, OVERLAY_COLORS, OVERLAY_COUNT},
    primary::{
        PaletteLayout, PaletteSelector, PrimaryPalettes, ResearchSource, TacticalSource,
        EXTERNAL_TACTICAL_COUNT, PALETTE_RECORD_LEN,
    },
    rasterize, Color, Palette, PALETTE_DATA_LEN,
};
pub use scang::{MinimapAtlas, MinimapTile, MINIMAP_RECORD_LEN, MINIMAP_TILE_SIZE};
pub use sprite::{
    decode_all,
    decompress::{decompress_sprite, DecodedSprite},
    index::{TabEntry, TabIndex, TabWidth},
    layout::SpriteLayout,
    sheet::{compose_sheet, sheet_position, sheet_rows, SheetPosition},
    PckFile, PckOptions, Sprite,
};
pub use tile::{
    record::{
        offsets, ExplosiveType, FootstepSound, SpecialProperty, TileAttributeEntry, TileType,
        RECORD_LEN,
    },
    TileAttributeTable,
};
