#![allow(clippy::module_name_repetitions)]

pub(crate) mod decompress;
pub(crate) mod index;
pub(crate) mod layout;
pub(crate) mod sheet;

use std::{
    io::{Read, Seek},
    path::{Path, PathBuf},
};

use bon::Builder;
use image::{ImageBuffer, Rgba, RgbaImage};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    palette::{rasterize, Palette, PaletteSelector},
    source, Error, GameVariant, ResourceCategory,
};
use decompress::{decompress_sprite, DecodedSprite};
use index::{TabEntry, TabIndex, TabWidth};
use layout::SpriteLayout;
use sheet::{compose_sheet, sheet_position, SheetPosition};

/// Caller configuration for decoding a `.PCK` archive
#[derive(Builder, Debug, Clone)]
pub struct PckOptions {
    /// the game the archive belongs to
    #[builder(default)]
    pub variant: GameVariant,
    /// the directory the archive comes from
    #[builder(default)]
    pub category: ResourceCategory,
    /// archive file name, e.g. `BIGOBS.PCK`
    #[builder(into)]
    pub file_name: String,
    /// which tactical palette to draw terrain and units with
    #[builder(default)]
    pub tactical_palette: usize,
    /// columns of the packed sprite sheet
    #[builder(default = 8)]
    pub sheet_columns: u32,
}

impl PckOptions {
    /// Resolves the [`SpriteLayout`] for these options
    #[must_use]
    pub fn layout(&self) -> SpriteLayout {
        let mut layout = SpriteLayout::lookup(self.variant, self.category, &self.file_name);
        layout.palette = layout.palette.with_tactical_index(self.tactical_palette);
        layout
    }
}

/// A decoded sprite, fitted into its cell
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct Sprite {
    /// position of the sprite in the archive (discovery order)
    pub index: usize,
    /// byte offset of the sprite in the archive
    pub offset: u32,
    /// number of archive bytes the sprite occupies
    pub byte_len: usize,
    /// cell width
    pub width: u16,
    /// cell height
    pub height: u16,
    /// `width * height` palette indexes
    #[serde(skip)]
    pub pixels: Vec<u8>,
}

impl Sprite {
    /// Fits a decoded sprite into a `width` x `height` cell
    ///
    /// Pixels past the end of the cell are dropped and a short sprite is padded with
    /// transparent pixels.
    #[must_use]
    pub fn new(index: usize, offset: u32, decoded: DecodedSprite, width: u16, height: u16) -> Self {
        let DecodedSprite {
            mut pixels,
            bytes_consumed,
        } = decoded;
        let cell_len = usize::from(width) * usize::from(height);
        if pixels.len() > cell_len {
            warn!(
                "sprite {index} at {offset:#x} overflows its {width}x{height} cell by {} pixels",
                pixels.len() - cell_len
            );
        }
        pixels.resize(cell_len, 0);
        Self {
            index,
            offset,
            byte_len: bytes_consumed,
            width,
            height,
            pixels,
        }
    }

    /// The value a `.TAB` file stores for this sprite's offset
    #[must_use]
    pub const fn tab_offset(&self, width: TabWidth) -> u32 {
        width.swap(self.offset)
    }

    /// Returns the palette indexes of the cell, row by row
    #[must_use]
    pub fn pixel_indices(&self) -> &[u8] {
        &self.pixels
    }

    /// Rasterizes the sprite into RGBA bytes; index 0 is fully transparent
    #[must_use]
    pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
        rasterize(&self.pixels, palette)
    }

    /// Rasterizes the sprite into an [`RgbaImage`] of its cell size
    ///
    /// Cells missing from [`Self::pixels`] are drawn transparent.
    #[must_use]
    pub fn to_image(&self, palette: &Palette) -> RgbaImage {
        let width = u32::from(self.width);
        ImageBuffer::from_fn(width, u32::from(self.height), |x, y| {
            let index = self.pixels.get((y * width + x) as usize).copied();
            Rgba(palette.rgba(index.unwrap_or(0)))
        })
    }
}

/// Decodes every sprite of an archive, front to back, until the source is exhausted
///
/// # Errors
///
/// Returns [`Error::Truncated`] if the last sprite has no terminator
#[instrument(skip(r), level = "debug")]
pub fn decode_all(mut r: impl Read + Seek, width: u16, height: u16) -> Result<Vec<Sprite>, Error> {
    let total = source::len(&mut r)?;
    let mut sprites = Vec::new();
    let mut offset: u64 = 0;
    while offset < total {
        let decoded = decompress_sprite(&mut r, width)?;
        let consumed = decoded.bytes_consumed as u64;
        let stored_offset = u32::try_from(offset).unwrap_or(u32::MAX);
        sprites.push(Sprite::new(sprites.len(), stored_offset, decoded, width, height));
        offset += consumed;
    }
    debug!("decoded {} sprites from {total} bytes", sprites.len());
    Ok(sprites)
}

/// A decoded `.PCK` sprite archive, with its optional `.TAB` index
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PckFile {
    name: String,
    layout: SpriteLayout,
    sheet_columns: u32,
    sprites: Vec<Sprite>,
    tab: Option<TabIndex>,
}

impl PckFile {
    /// Decodes an archive from `r` using the layout `options` select
    ///
    /// An archive whose name marks it as a different format is not read; the result reports
    /// [`Self::is_valid`] as false and holds no sprites.
    ///
    /// # Errors
    ///
    /// See [`decode_all`]
    pub fn from_reader(r: impl Read + Seek, options: &PckOptions) -> Result<Self, Error> {
        let layout = options.layout();
        if !layout.valid {
            return Ok(Self::unsupported(options, layout));
        }
        Ok(Self {
            name: stem(&options.file_name),
            layout,
            sheet_columns: options.sheet_columns,
            sprites: decode_all(r, layout.width, layout.height)?,
            tab: None,
        })
    }

    fn unsupported(options: &PckOptions, layout: SpriteLayout) -> Self {
        warn!("{} is really a SPK file", options.file_name);
        Self {
            name: stem(&options.file_name),
            layout,
            sheet_columns: options.sheet_columns,
            sprites: Vec::new(),
            tab: None,
        }
    }

    /// Decodes the archive at `path` together with the `.TAB` file next to it, if there is one
    ///
    /// `options.file_name` is ignored in favour of the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the archive is missing; see also
    /// [`Self::from_reader`] and [`TabIndex::from_reader`]
    pub fn from_file(path: impl AsRef<Path>, options: &PckOptions) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = PckOptions {
            file_name: path
                .file_name()
                .map_or_else(|| options.file_name.clone(), |n| n.to_string_lossy().into_owned()),
            ..options.clone()
        };
        info!("Reading PCK file {}", path.display());
        let layout = options.layout();
        if !layout.valid {
            return Ok(Self::unsupported(&options, layout));
        }
        let pck = Self::from_reader(source::open(path)?, &options)?;
        Ok(match TabIndex::from_file(tab_path(path), layout.tab_width)? {
            Some(tab) => pck.with_tab(tab),
            None => pck,
        })
    }

    /// Attaches a decoded `.TAB` index, enabling lookup by logical id
    #[must_use]
    pub fn with_tab(mut self, tab: TabIndex) -> Self {
        if tab.width() != self.layout.tab_width {
            warn!(
                "{}: tab index width {:?} differs from expected {:?}",
                self.name,
                tab.width(),
                self.layout.tab_width
            );
        }
        self.tab = Some(tab);
        self
    }

    /// Archive name without extension
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False if the archive is an unsupported sibling format
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.layout.valid
    }

    /// The layout used to decode the archive
    #[must_use]
    pub const fn layout(&self) -> &SpriteLayout {
        &self.layout
    }

    /// The palette the archive's sprites are drawn with
    #[must_use]
    pub const fn palette_selector(&self) -> PaletteSelector {
        self.layout.palette
    }

    /// All sprites in discovery order
    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// The `.TAB` index, if one was found
    #[must_use]
    pub const fn tab(&self) -> Option<&TabIndex> {
        self.tab.as_ref()
    }

    /// Finds the sprite a `.TAB` entry points at
    #[must_use]
    pub fn sprite_by_tab(&self, entry: &TabEntry) -> Option<&Sprite> {
        let width = self.tab.as_ref().map_or(self.layout.tab_width, TabIndex::width);
        self.sprites
            .iter()
            .find(|s| s.tab_offset(width) == entry.stored_offset)
    }

    /// Finds a sprite by its logical id; always `None` without a `.TAB` index
    #[must_use]
    pub fn sprite_by_logical_id(&self, id: usize) -> Option<&Sprite> {
        self.tab
            .as_ref()
            .and_then(|tab| tab.get(id))
            .and_then(|entry| self.sprite_by_tab(entry))
    }

    /// Sprite sheet position of sprite `i`
    #[must_use]
    pub const fn sheet_position(&self, i: u32) -> SheetPosition {
        sheet_position(i, self.sheet_columns)
    }

    /// Packs all sprites into one sheet image
    #[must_use]
    pub fn sheet_image(&self, palette: &Palette) -> RgbaImage {
        compose_sheet(
            &self.sprites,
            palette,
            self.sheet_columns,
            (self.layout.width, self.layout.height),
        )
    }
}

/// The `.TAB` file next to `pck`, preferring the letter case of the archive's extension
fn tab_path(pck: &Path) -> PathBuf {
    let lower = pck
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.chars().all(|c| c.is_ascii_lowercase()));
    let (preferred, other) = if lower { ("tab", "TAB") } else { ("TAB", "tab") };
    let preferred = pck.with_extension(preferred);
    if preferred.is_file() {
        return preferred;
    }
    let other = pck.with_extension(other);
    if other.is_file() {
        other
    } else {
        preferred
    }
}

fn stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_owned(), |s| s.to_string_lossy().into_owned())
}
