//! Byte layout of a single 62 byte `.MCD` record.

use serde::Serialize;

use crate::GameVariant;

/// Length of one record
pub const RECORD_LEN: usize = 62;

/// Byte offset of every decoded field within a record
#[allow(missing_docs)]
pub mod offsets {
    /// 8 animation frame numbers
    pub const ANIMATION: usize = 0;
    /// 12 line-of-fire template ids, one per voxel layer
    pub const LINE_OF_FIRE: usize = 8;
    /// little-endian u16 minimap tile index
    pub const MINIMAP: usize = 20;
    pub const SLIDING_DOOR: usize = 30;
    pub const BLOCKS_LINE_OF_SIGHT: usize = 31;
    pub const NO_FLOOR: usize = 32;
    pub const BIG_WALL: usize = 33;
    pub const LIFT: usize = 34;
    pub const HINGED_DOOR: usize = 35;
    pub const BLOCKS_FIRE: usize = 36;
    pub const BLOCKS_GAS: usize = 37;
    pub const WALK_COST: usize = 39;
    pub const SLIDE_COST: usize = 40;
    pub const FLY_COST: usize = 41;
    pub const ARMOUR: usize = 42;
    pub const EXPLOSIVE_BLOCKAGE: usize = 43;
    pub const DEATH_TILE: usize = 44;
    pub const FLAMMABILITY: usize = 45;
    pub const DOOR_OPENED_TILE: usize = 46;
    pub const SLIDING_DOOR_OPENED: usize = 47;
    /// sign-magnitude: low 7 bits magnitude, bit 7 sign
    pub const UNIT_Y_OFFSET: usize = 48;
    pub const TILE_Y_OFFSET: usize = 49;
    pub const DAMAGE_TYPE: usize = 50;
    pub const LIGHT_BLOCK: usize = 51;
    pub const FOOTSTEP_SOUND: usize = 52;
    pub const TILE_TYPE: usize = 53;
    pub const EXPLOSIVE_TYPE: usize = 54;
    pub const EXPLOSIVE_STRENGTH: usize = 55;
    pub const GAS_BLOCKAGE: usize = 56;
    pub const FUEL: usize = 57;
    pub const BRIGHTNESS: usize = 58;
    pub const SPECIAL_PROPERTY: usize = 59;
    pub const BASE_TARGET: usize = 60;
    pub const VICTORY_POINTS: usize = 61;
}

/// Sound played when a unit walks on the tile
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
#[allow(missing_docs)]
pub enum FootstepSound {
    Default,
    Metal,
    Normal,
    MountainGround,
    WaterPool,
    Sand,
    Mars,
    Snow,
    Unknown(u8),
}

impl From<u8> for FootstepSound {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Default,
            1 => Self::Metal,
            2 => Self::Normal,
            3 => Self::MountainGround,
            4 => Self::WaterPool,
            5 => Self::Sand,
            6 => Self::Mars,
            7 => Self::Snow,
            n => Self::Unknown(n),
        }
    }
}

/// Which part of a map cell a tile occupies
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
#[allow(missing_docs)]
pub enum TileType {
    Floor,
    WestWall,
    NorthWall,
    Object,
    Unknown(u8),
}

impl From<u8> for TileType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Floor,
            1 => Self::WestWall,
            2 => Self::NorthWall,
            3 => Self::Object,
            n => Self::Unknown(n),
        }
    }
}

/// What the tile releases when destroyed
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
#[allow(missing_docs)]
pub enum ExplosiveType {
    HighExplosive,
    Smoke,
    Unknown(u8),
}

impl From<u8> for ExplosiveType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::HighExplosive,
            1 => Self::Smoke,
            n => Self::Unknown(n),
        }
    }
}

/// Special purpose of a tile. Codes 3-8 and 11 name different things in the two games.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
#[allow(missing_docs)]
pub enum SpecialProperty {
    None,
    EntryPoint,
    UfoPowerSource,
    UfoNavigation,
    UfoConstruction,
    AlienFood,
    AlienReproduction,
    AlienEntertainment,
    AlienSurgery,
    ExaminationRoom,
    AlienAlloys,
    AlienHabitat,
    SubNavigation,
    SubConstruction,
    AlienCryogenics,
    AlienCloning,
    AlienLearningArrays,
    AlienImplanter,
    AlienReanimationZone,
    DeadTile,
    ExitPoint,
    MustDestroy,
    Unknown(u8),
}

impl SpecialProperty {
    /// Names the raw special property code for the given game
    #[must_use]
    pub const fn from_raw(variant: GameVariant, value: u8) -> Self {
        match (variant, value) {
            (_, 0) => Self::None,
            (_, 1) => Self::EntryPoint,
            (_, 2) => Self::UfoPowerSource,
            (GameVariant::Ufo, 3) => Self::UfoNavigation,
            (GameVariant::Ufo, 4) => Self::UfoConstruction,
            (GameVariant::Ufo, 5) => Self::AlienFood,
            (GameVariant::Ufo, 6) => Self::AlienReproduction,
            (GameVariant::Ufo, 7) => Self::AlienEntertainment,
            (GameVariant::Ufo, 8) => Self::AlienSurgery,
            (GameVariant::Tftd, 3) => Self::SubNavigation,
            (GameVariant::Tftd, 4) => Self::SubConstruction,
            (GameVariant::Tftd, 5) => Self::AlienCryogenics,
            (GameVariant::Tftd, 6) => Self::AlienCloning,
            (GameVariant::Tftd, 7) => Self::AlienLearningArrays,
            (GameVariant::Tftd, 8) => Self::AlienImplanter,
            (_, 9) => Self::ExaminationRoom,
            (_, 10) => Self::AlienAlloys,
            (GameVariant::Ufo, 11) => Self::AlienHabitat,
            (GameVariant::Tftd, 11) => Self::AlienReanimationZone,
            (_, 12) => Self::DeadTile,
            (_, 13) => Self::ExitPoint,
            (_, 14) => Self::MustDestroy,
            (_, n) => Self::Unknown(n),
        }
    }
}

/// Decoded tile attributes of one `.MCD` record
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools, missing_docs)]
pub struct TileAttributeEntry {
    /// frame numbers (into the terrain's sprite archive) of the tile animation
    pub animation_frames: [u8; 8],
    /// line-of-fire template ids, bottom layer first
    pub line_of_fire_templates: [u8; 12],
    /// minimap tile index, see [`Self::minimap_offset`]
    pub minimap_index: u16,
    pub is_sliding_door: bool,
    pub blocks_line_of_sight: bool,
    pub no_floor: bool,
    pub is_big_wall: bool,
    pub is_lift: bool,
    pub is_hinged_door: bool,
    pub blocks_fire: bool,
    pub blocks_gas: bool,
    pub walk_cost: u8,
    pub slide_cost: u8,
    pub fly_cost: u8,
    pub armour: u8,
    pub explosive_blockage: u8,
    /// tile this one turns into when destroyed
    pub death_tile: u8,
    pub flammability: u8,
    /// tile shown once the door is open
    pub door_opened_tile: u8,
    pub sliding_door_opened: bool,
    /// vertical offset of units standing on the tile
    pub unit_y_offset: i8,
    /// the stored byte behind [`Self::unit_y_offset`]
    pub unit_y_offset_raw: u8,
    pub tile_y_offset: u8,
    pub damage_type: u8,
    pub light_block: u8,
    pub footstep_sound: FootstepSound,
    pub tile_type: TileType,
    pub explosive_type: ExplosiveType,
    pub explosive_strength: u8,
    pub gas_blockage: u8,
    pub fuel: u8,
    pub brightness: u8,
    /// raw code, see [`SpecialProperty::from_raw`]
    pub special_property: u8,
    pub base_target: u8,
    pub victory_points: u8,
}

impl TileAttributeEntry {
    /// Decodes one record
    #[must_use]
    pub fn from_record(rec: &[u8; RECORD_LEN]) -> Self {
        use offsets::*;
        let flag = |offset: usize| rec[offset] == 1;
        let mut animation_frames = [0; 8];
        animation_frames.copy_from_slice(&rec[ANIMATION..ANIMATION + 8]);
        let mut line_of_fire_templates = [0; 12];
        line_of_fire_templates.copy_from_slice(&rec[LINE_OF_FIRE..LINE_OF_FIRE + 12]);
        Self {
            animation_frames,
            line_of_fire_templates,
            minimap_index: u16::from_le_bytes([rec[MINIMAP], rec[MINIMAP + 1]]),
            is_sliding_door: flag(SLIDING_DOOR),
            blocks_line_of_sight: flag(BLOCKS_LINE_OF_SIGHT),
            no_floor: flag(NO_FLOOR),
            is_big_wall: flag(BIG_WALL),
            is_lift: flag(LIFT),
            is_hinged_door: flag(HINGED_DOOR),
            blocks_fire: flag(BLOCKS_FIRE),
            blocks_gas: flag(BLOCKS_GAS),
            walk_cost: rec[WALK_COST],
            slide_cost: rec[SLIDE_COST],
            fly_cost: rec[FLY_COST],
            armour: rec[ARMOUR],
            explosive_blockage: rec[EXPLOSIVE_BLOCKAGE],
            death_tile: rec[DEATH_TILE],
            flammability: rec[FLAMMABILITY],
            door_opened_tile: rec[DOOR_OPENED_TILE],
            sliding_door_opened: flag(SLIDING_DOOR_OPENED),
            unit_y_offset: sign_magnitude(rec[UNIT_Y_OFFSET]),
            unit_y_offset_raw: rec[UNIT_Y_OFFSET],
            tile_y_offset: rec[TILE_Y_OFFSET],
            damage_type: rec[DAMAGE_TYPE],
            light_block: rec[LIGHT_BLOCK],
            footstep_sound: rec[FOOTSTEP_SOUND].into(),
            tile_type: rec[TILE_TYPE].into(),
            explosive_type: rec[EXPLOSIVE_TYPE].into(),
            explosive_strength: rec[EXPLOSIVE_STRENGTH],
            gas_blockage: rec[GAS_BLOCKAGE],
            fuel: rec[FUEL],
            brightness: rec[BRIGHTNESS],
            special_property: rec[SPECIAL_PROPERTY],
            base_target: rec[BASE_TARGET],
            victory_points: rec[VICTORY_POINTS],
        }
    }

    /// Offset of the tile's image in `SCANG.DAT`, in tiles (the first 35 minimap tiles are
    /// reserved for units and items)
    #[must_use]
    pub const fn minimap_offset(&self) -> u32 {
        self.minimap_index as u32 + 35
    }

    /// Names [`Self::special_property`] for the given game
    #[must_use]
    pub const fn special(&self, variant: GameVariant) -> SpecialProperty {
        SpecialProperty::from_raw(variant, self.special_property)
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn sign_magnitude(raw: u8) -> i8 {
    let magnitude = (raw & 0x7F) as i8;
    if raw & 0x80 == 0 {
        magnitude
    } else {
        -magnitude
    }
}
