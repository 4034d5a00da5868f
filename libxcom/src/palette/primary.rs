use std::{
    io::{Read, Seek},
    path::Path,
};

use tracing::{debug, info, instrument};

use super::{Palette, PALETTE_DATA_LEN};
use crate::{
    source::{self, read_exact_or_truncated},
    Error, GameVariant,
};

/// Length of one `PALETTES.DAT` record: 768 bytes of colors followed by 6 ignored bytes
pub const PALETTE_RECORD_LEN: usize = 774;

/// Number of tactical palettes kept outside `PALETTES.DAT` when they are sourced externally
pub const EXTERNAL_TACTICAL_COUNT: usize = 4;

/// Where the research palette comes from
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ResearchSource {
    /// A record of its own, directly after the graph palette
    Inline,
    /// No record, the base palette is reused
    SharesBase,
}

/// Where the tactical palettes come from
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum TacticalSource {
    /// This many records follow the research palette in `PALETTES.DAT`
    Inline(usize),
    /// Each tactical palette is stored in the header of its own image file
    /// (`UFOGRAPH/D0.LBM` .. `D3.LBM`) and installed with
    /// [`PrimaryPalettes::with_external_tactical`]
    External,
}

/// Describes which records a palette archive holds
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct PaletteLayout {
    /// research palette source
    pub research: ResearchSource,
    /// tactical palette source
    pub tactical: TacticalSource,
}

impl PaletteLayout {
    /// Returns the layout the given game uses
    #[must_use]
    pub const fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::Ufo => Self {
                research: ResearchSource::Inline,
                tactical: TacticalSource::Inline(1),
            },
            GameVariant::Tftd => Self {
                research: ResearchSource::SharesBase,
                tactical: TacticalSource::External,
            },
        }
    }

    /// Number of records that must be present in the archive
    #[must_use]
    pub const fn inline_records(&self) -> usize {
        let research = match self.research {
            ResearchSource::Inline => 1,
            ResearchSource::SharesBase => 0,
        };
        let tactical = match self.tactical {
            TacticalSource::Inline(n) => n,
            TacticalSource::External => 0,
        };
        3 + research + tactical
    }
}

/// Selects one of the named palettes of [`PrimaryPalettes`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum PaletteSelector {
    /// geoscape palette
    Geoscape,
    /// base palette
    Base,
    /// graph palette
    Graph,
    /// research palette
    Research,
    /// tactical palette with the given index
    Tactical(usize),
}

impl PaletteSelector {
    /// Replaces the index of a tactical selector, leaving the others untouched
    #[must_use]
    pub const fn with_tactical_index(self, index: usize) -> Self {
        match self {
            Self::Tactical(_) => Self::Tactical(index),
            other => other,
        }
    }
}

/// The named 256 color palettes of the game
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PrimaryPalettes {
    geoscape: Palette,
    base: Palette,
    graph: Palette,
    research: Palette,
    tactical: Vec<Palette>,
}

impl PrimaryPalettes {
    /// Reads the palettes described by `layout` from a `PALETTES.DAT` style archive
    ///
    /// Records are read in order: geoscape, base, graph, research (if inline), then the
    /// inline tactical palettes. With [`TacticalSource::External`] the tactical list is empty
    /// until [`Self::with_external_tactical`] is called.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSize`] if the archive size is not a multiple of
    ///   [`PALETTE_RECORD_LEN`]
    /// - [`Error::Truncated`] if the archive holds fewer records than `layout` requires
    #[instrument(skip(r), level = "debug")]
    pub fn from_reader(mut r: impl Read + Seek, layout: &PaletteLayout) -> Result<Self, Error> {
        let size = source::len(&mut r)?;
        if size % PALETTE_RECORD_LEN as u64 != 0 {
            return Err(Error::InvalidSize {
                size,
                record_len: PALETTE_RECORD_LEN,
            });
        }
        let available = usize::try_from(size / PALETTE_RECORD_LEN as u64).unwrap_or(usize::MAX);
        debug!("{available} palette records in archive");
        let needed = layout.inline_records();
        if available < needed {
            return Err(Error::Truncated {
                what: "palette records",
                expected: needed,
                found: available,
            });
        }

        let geoscape = read_record(&mut r)?;
        let base = read_record(&mut r)?;
        let graph = read_record(&mut r)?;
        let research = match layout.research {
            ResearchSource::Inline => read_record(&mut r)?,
            ResearchSource::SharesBase => base.clone(),
        };
        let tactical = match layout.tactical {
            TacticalSource::Inline(n) => (0..n)
                .map(|_| read_record(&mut r))
                .collect::<Result<_, _>>()?,
            TacticalSource::External => Vec::new(),
        };
        Ok(Self {
            geoscape,
            base,
            graph,
            research,
            tactical,
        })
    }

    /// Reads all primary palettes of a game installation rooted at `root`
    ///
    /// Reads `GEODATA/PALETTES.DAT`, and for games with external tactical palettes
    /// `UFOGRAPH/D0.LBM` through `UFOGRAPH/D3.LBM`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if any of the files is missing, and the errors of
    /// [`Self::from_reader`] and [`Palette::from_image_header`]
    pub fn from_game_dir(root: impl AsRef<Path>, variant: GameVariant) -> Result<Self, Error> {
        let root = root.as_ref();
        let layout = PaletteLayout::for_variant(variant);
        let path = root.join("GEODATA").join("PALETTES.DAT");
        info!("Reading palettes from {}", path.display());
        let palettes = Self::from_reader(source::open(&path)?, &layout)?;
        match layout.tactical {
            TacticalSource::Inline(_) => Ok(palettes),
            TacticalSource::External => {
                let tactical = (0..EXTERNAL_TACTICAL_COUNT)
                    .map(|i| {
                        let path = root.join("UFOGRAPH").join(format!("D{i}.LBM"));
                        debug!("Reading tactical palette from {}", path.display());
                        Palette::from_image_header(source::open(&path)?)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(palettes.with_external_tactical(tactical))
            }
        }
    }

    /// Installs externally sourced tactical palettes, replacing any read inline
    #[must_use]
    pub fn with_external_tactical(mut self, tactical: Vec<Palette>) -> Self {
        self.tactical = tactical;
        self
    }

    /// Geoscape palette (record 0)
    #[must_use]
    pub const fn geoscape(&self) -> &Palette {
        &self.geoscape
    }

    /// Base palette (record 1)
    #[must_use]
    pub const fn base(&self) -> &Palette {
        &self.base
    }

    /// Graph palette (record 2)
    #[must_use]
    pub const fn graph(&self) -> &Palette {
        &self.graph
    }

    /// Research palette
    #[must_use]
    pub const fn research(&self) -> &Palette {
        &self.research
    }

    /// Tactical palette `index`, if present
    #[must_use]
    pub fn tactical(&self, index: usize) -> Option<&Palette> {
        self.tactical.get(index)
    }

    /// All tactical palettes
    #[must_use]
    pub fn tactical_variants(&self) -> &[Palette] {
        &self.tactical
    }

    /// Returns the palette a [`PaletteSelector`] names
    #[must_use]
    pub fn select(&self, selector: PaletteSelector) -> Option<&Palette> {
        match selector {
            PaletteSelector::Geoscape => Some(&self.geoscape),
            PaletteSelector::Base => Some(&self.base),
            PaletteSelector::Graph => Some(&self.graph),
            PaletteSelector::Research => Some(&self.research),
            PaletteSelector::Tactical(i) => self.tactical(i),
        }
    }
}

impl Palette {
    /// Reads a 256 color palette stored at the start of an image file header
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the reader holds fewer than 768 bytes
    pub fn from_image_header(mut r: impl Read) -> Result<Self, Error> {
        let mut buf = [0; PALETTE_DATA_LEN];
        read_exact_or_truncated(&mut r, &mut buf, "image header palette")?;
        Ok(Self::from_vga_bytes(&buf))
    }
}

fn read_record(r: &mut impl Read) -> Result<Palette, Error> {
    let mut buf = [0; PALETTE_RECORD_LEN];
    read_exact_or_truncated(r, &mut buf, "palette record")?;
    Ok(Palette::from_vga_bytes(&buf[..PALETTE_DATA_LEN]))
}
