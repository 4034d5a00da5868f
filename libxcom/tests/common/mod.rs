#![allow(dead_code)]

use std::{fs, path::Path};

use libxcom::{offsets, RECORD_LEN};
use mktemp::Temp;

pub const PALETTE_RECORD: usize = 774;

/// `AVENGER.PCK`: a two pixel sprite at offset 0 and a run-length sprite at offset 5
pub const AVENGER_PCK: [u8; 10] = [39, 1, 2, 3, 0xFF, 0, 0xFE, 4, 7, 0xFF];
/// offsets 0 and 5, stored little-endian
pub const AVENGER_TAB: [u8; 4] = [0, 0, 5, 0];
pub const BLANKS_PCK: [u8; 2] = [0, 0xFF];

/// A palette record whose every component is `value`
pub fn palette_record(value: u8) -> Vec<u8> {
    let mut record = vec![value; 768];
    record.extend([0xAA; 6]);
    record
}

/// A tile record tagged with `armour`
pub fn tile_record(armour: u8) -> Vec<u8> {
    let mut record = vec![0; RECORD_LEN];
    record[offsets::ARMOUR] = armour;
    record[offsets::WALK_COST] = 4;
    record
}

fn write(root: &Path, relative: &str, data: &[u8]) -> anyhow::Result<()> {
    let path = root.join(relative);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, data)?;
    Ok(())
}

/// Creates a minimal UFO installation in a temporary directory
///
/// - `PALETTES.DAT` records hold component values 1 to 5 (geoscape to tactical)
/// - `BACKPALS.DAT` block `i` holds component value `i`
/// - `SCANG.DAT` holds three tiles
/// - `TERRAIN/` holds `BLANKS` (one tile), `AVENGER` (two tiles) and `BARN` (no `.TAB`),
///   plus `lower.pck`/`lower.tab`, a lowercase copy of the `AVENGER` sprites
/// - `MAPS/TEST.MAP` is one level of 2x2 cells referring to both terrains
pub fn ufo_game_dir() -> anyhow::Result<Temp> {
    let dir = Temp::new_dir()?;
    let root: &Path = dir.as_ref();

    let palettes: Vec<u8> = (1..=5).flat_map(palette_record).collect();
    write(root, "GEODATA/PALETTES.DAT", &palettes)?;
    let backpals: Vec<u8> = (0..8).flat_map(|i| [i; 48]).collect();
    write(root, "GEODATA/BACKPALS.DAT", &backpals)?;
    let scang: Vec<u8> = (0..3).flat_map(|i| [i; 16]).collect();
    write(root, "GEODATA/SCANG.DAT", &scang)?;

    write(root, "TERRAIN/BLANKS.PCK", &BLANKS_PCK)?;
    write(root, "TERRAIN/BLANKS.TAB", &[0, 0])?;
    write(root, "TERRAIN/BLANKS.MCD", &tile_record(0))?;
    write(root, "TERRAIN/lower.pck", &AVENGER_PCK)?;
    write(root, "TERRAIN/lower.tab", &AVENGER_TAB)?;
    write(root, "TERRAIN/BARN.PCK", &BLANKS_PCK)?;
    write(root, "TERRAIN/BARN.MCD", &tile_record(0))?;
    write(root, "TERRAIN/AVENGER.PCK", &AVENGER_PCK)?;
    write(root, "TERRAIN/AVENGER.TAB", &AVENGER_TAB)?;
    let avenger: Vec<u8> = [10, 20].into_iter().flat_map(tile_record).collect();
    write(root, "TERRAIN/AVENGER.MCD", &avenger)?;

    write(root, "UFOGRAPH/ICONS.PCK", &[0; 64])?;

    // height 1, width 2, depth 2
    let map = [
        1, 2, 2, //
        0, 0, 0, 0, //
        1, 0, 0, 0, //
        0, 0, 0, 0, //
        0, 0, 0, 2,
    ];
    write(root, "MAPS/TEST.MAP", &map)?;
    Ok(dir)
}

/// Creates a minimal TFTD installation: three inline palette records and four `D*.LBM`
/// headers whose components are 10 to 13
pub fn tftd_game_dir() -> anyhow::Result<Temp> {
    let dir = Temp::new_dir()?;
    let root: &Path = dir.as_ref();
    let palettes: Vec<u8> = (1..=3).flat_map(palette_record).collect();
    write(root, "GEODATA/PALETTES.DAT", &palettes)?;
    for i in 0..4u8 {
        let mut lbm = vec![10 + i; 768];
        lbm.extend([0xEE; 100]);
        write(root, &format!("UFOGRAPH/D{i}.LBM"), &lbm)?;
    }
    Ok(dir)
}
