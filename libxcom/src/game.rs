use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

/// The two games of the family whose assets this crate reads
#[derive(
    Default, Debug, Eq, PartialEq, Hash, Copy, Clone, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum GameVariant {
    /// UFO: Enemy Unknown / X-COM: UFO Defense
    #[default]
    Ufo,
    /// X-COM: Terror From the Deep
    Tftd,
}

/// The directory a `.PCK` archive comes from, which decides how it is decoded
#[derive(
    Default, Debug, Eq, PartialEq, Hash, Copy, Clone, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ResourceCategory {
    /// Battlescape terrain tiles (`TERRAIN/`)
    #[default]
    Terrain,
    /// Unit sprites (`UNITS/`)
    Units,
    /// Battlescape interface graphics (`UFOGRAPH/`)
    Ufograph,
    /// Geoscape and base graphics (`GEOGRAPH/`)
    Geograph,
}

impl ResourceCategory {
    /// Returns the game directory the category lives in
    #[must_use]
    pub fn as_str(self) -> &'static str {
        Into::<&'static str>::into(self)
    }
}
