use serde::Serialize;

use super::index::TabWidth;
use crate::{palette::PaletteSelector, GameVariant, ResourceCategory};

/// Archives in `UFOGRAPH/` that carry a `.PCK` extension but are really full-screen `SPK`
/// images
const SPK_IMPOSTORS: [&str; 6] = [
    "DETBORD.PCK",
    "DETBORD2.PCK",
    "MEDIBORD.PCK",
    "SCANBORD.PCK",
    "UNIBORD.PCK",
    "ICONS.PCK",
];

/// How the sprites of one archive are laid out and colored
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct SpriteLayout {
    /// cell width in pixels
    pub width: u16,
    /// cell height in pixels
    pub height: u16,
    /// the palette the sprites are drawn with
    #[serde(skip)]
    pub palette: PaletteSelector,
    /// entry width of the companion `.TAB` file
    pub tab_width: TabWidth,
    /// false if the archive is not a sprite archive at all
    pub valid: bool,
}

impl SpriteLayout {
    const fn cell(width: u16, height: u16, palette: PaletteSelector) -> Self {
        Self {
            width,
            height,
            palette,
            tab_width: TabWidth::Two,
            valid: true,
        }
    }

    const fn tactical(width: u16, height: u16) -> Self {
        Self::cell(width, height, PaletteSelector::Tactical(0))
    }

    /// Looks up the layout of an archive from the game, its directory and its file name.
    ///
    /// File names are matched case-insensitively and `.PCK` is assumed when no extension is
    /// given.
    #[must_use]
    pub fn lookup(variant: GameVariant, category: ResourceCategory, file_name: &str) -> Self {
        let name = normalize(file_name);
        let name = name.as_str();
        let mut layout = match category {
            ResourceCategory::Terrain => Self::tactical(32, 40),
            ResourceCategory::Units => match name {
                "BIGOBS.PCK" => Self::tactical(32, 48),
                _ => Self::tactical(32, 40),
            },
            ResourceCategory::Ufograph => match name {
                "ICONS.PCK" => Self::tactical(320, 200),
                "INTICONS.PCK" => Self::cell(24, 24, PaletteSelector::Geoscape),
                "X1.PCK" => Self::tactical(128, 64),
                n if n.starts_with("BIGOB") => Self::tactical(32, 48),
                _ => Self::tactical(32, 40),
            },
            ResourceCategory::Geograph => match name {
                "BASEBITS.PCK" => Self::cell(32, 40, PaletteSelector::Base),
                "INTICON.PCK" | "INTICONS.PCK" => Self::cell(24, 25, PaletteSelector::Geoscape),
                _ => Self::tactical(32, 40),
            },
        };
        if category == ResourceCategory::Ufograph && SPK_IMPOSTORS.contains(&name) {
            layout.valid = false;
        }
        if variant == GameVariant::Tftd && category == ResourceCategory::Units {
            layout.tab_width = TabWidth::Four;
        }
        layout
    }

    /// Number of pixels in one cell
    #[must_use]
    pub const fn cell_len(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn normalize(file_name: &str) -> String {
    let mut name = file_name.to_ascii_uppercase();
    if !name.contains('.') {
        name.push_str(".PCK");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use GameVariant::{Tftd, Ufo};
    use ResourceCategory::{Geograph, Terrain, Ufograph, Units};

    fn dims(l: SpriteLayout) -> (u16, u16) {
        (l.width, l.height)
    }

    #[test]
    fn terrain_and_units() {
        let terrain = SpriteLayout::lookup(Ufo, Terrain, "AVENGER.PCK");
        assert_eq!(dims(terrain), (32, 40));
        assert_eq!(terrain.palette, PaletteSelector::Tactical(0));
        assert!(terrain.valid);
        assert_eq!(dims(SpriteLayout::lookup(Ufo, Units, "SECTOID.PCK")), (32, 40));
        assert_eq!(dims(SpriteLayout::lookup(Ufo, Units, "bigobs.pck")), (32, 48));
    }

    #[test]
    fn interface_sheets() {
        let inticons = SpriteLayout::lookup(Ufo, Ufograph, "INTICONS.PCK");
        assert_eq!(dims(inticons), (24, 24));
        assert_eq!(inticons.palette, PaletteSelector::Geoscape);
        assert_eq!(dims(SpriteLayout::lookup(Ufo, Ufograph, "BIGOBS2.PCK")), (32, 48));
        assert_eq!(dims(SpriteLayout::lookup(Ufo, Ufograph, "X1.PCK")), (128, 64));
        assert_eq!(dims(SpriteLayout::lookup(Ufo, Ufograph, "SMOKE.PCK")), (32, 40));
    }

    #[test]
    fn spk_impostors_are_invalid() {
        let icons = SpriteLayout::lookup(Ufo, Ufograph, "ICONS.PCK");
        assert_eq!(dims(icons), (320, 200));
        assert!(!icons.valid);
        for name in ["DETBORD", "DETBORD2.PCK", "MEDIBORD.PCK", "SCANBORD.PCK", "UNIBORD.PCK"] {
            assert!(!SpriteLayout::lookup(Ufo, Ufograph, name).valid, "{name}");
        }
        // same names elsewhere are fine
        assert!(SpriteLayout::lookup(Ufo, Units, "ICONS.PCK").valid);
    }

    #[test]
    fn geograph_sheets() {
        let basebits = SpriteLayout::lookup(Ufo, Geograph, "BASEBITS.PCK");
        assert_eq!(basebits.palette, PaletteSelector::Base);
        let inticon = SpriteLayout::lookup(Ufo, Geograph, "INTICON.PCK");
        assert_eq!(dims(inticon), (24, 25));
        assert_eq!(inticon.palette, PaletteSelector::Geoscape);
    }

    #[test]
    fn tftd_unit_index_is_four_bytes() {
        assert_eq!(SpriteLayout::lookup(Tftd, Units, "DEEPONE").tab_width, TabWidth::Four);
        assert_eq!(SpriteLayout::lookup(Tftd, Terrain, "SEABED").tab_width, TabWidth::Two);
        assert_eq!(SpriteLayout::lookup(Ufo, Units, "SECTOID").tab_width, TabWidth::Two);
    }
}
