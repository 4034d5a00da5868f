use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    sprite::{PckFile, PckOptions},
    tile::TileAttributeTable,
    Error, ResourceCategory,
};

/// The sprites and tile attributes of one terrain (`NAME.PCK`, `NAME.TAB`, `NAME.MCD`)
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TerrainBundle {
    name: String,
    sprites: PckFile,
    tiles: TileAttributeTable,
}

impl TerrainBundle {
    /// Joins already decoded terrain resources
    #[must_use]
    pub fn new(name: impl Into<String>, sprites: PckFile, tiles: TileAttributeTable) -> Self {
        Self {
            name: name.into(),
            sprites,
            tiles,
        }
    }

    /// Loads terrain `name` from the first of `search_dirs` that holds all three of its files
    ///
    /// Several directories may be given so that modded terrains can shadow stock ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if no directory holds the complete set, and any
    /// decoding error of the files themselves
    pub fn load<P: AsRef<Path>>(
        name: &str,
        search_dirs: &[P],
        options: &PckOptions,
    ) -> Result<Self, Error> {
        let Some(dir) = search_dirs.iter().map(AsRef::<Path>::as_ref).find(|dir| {
            ["PCK", "TAB", "MCD"]
                .iter()
                .all(|ext| dir.join(format!("{name}.{ext}")).is_file())
        }) else {
            return Err(Error::SourceNotFound {
                path: PathBuf::from(format!("{name}.MCD")),
            });
        };
        info!("Loading terrain {name} from {}", dir.display());
        let options = PckOptions {
            category: ResourceCategory::Terrain,
            file_name: format!("{name}.PCK"),
            ..options.clone()
        };
        let sprites = PckFile::from_file(dir.join(&options.file_name), &options)?;
        let tiles = TileAttributeTable::from_file(dir.join(format!("{name}.MCD")))?;
        debug!(
            "terrain {name}: {} sprites, {} tiles",
            sprites.sprites().len(),
            tiles.len()
        );
        Ok(Self::new(name, sprites, tiles))
    }

    /// Terrain name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The terrain's sprite archive
    #[must_use]
    pub const fn sprites(&self) -> &PckFile {
        &self.sprites
    }

    /// The terrain's tile attributes
    #[must_use]
    pub const fn tiles(&self) -> &TileAttributeTable {
        &self.tiles
    }
}
