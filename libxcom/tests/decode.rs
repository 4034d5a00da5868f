use std::{fs::File, path::Path};

mod common;
use common::{tftd_game_dir, ufo_game_dir};
use image::{codecs::png::PngEncoder, ImageEncoder};
use libxcom::{
    Color, ErrorKind, GameVariant, MapGrid, MinimapAtlas, OverlayPalettes, Palette, Partial,
    PckFile, PckOptions, PrimaryPalettes, ResourceCategory, TerrainBundle, TileAttributeTable,
};
use mktemp::Temp;

fn terrain_options() -> PckOptions {
    PckOptions::builder()
        .category(ResourceCategory::Terrain)
        .file_name("")
        .build()
}

#[test]
fn ufo_palettes_are_read_inline() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let palettes = PrimaryPalettes::from_game_dir(&game, GameVariant::Ufo)?;
    assert_eq!(palettes.geoscape().get(1), Some(Color::new(4, 4, 4)));
    assert_eq!(palettes.research().get(1), Some(Color::new(16, 16, 16)));
    assert_eq!(palettes.tactical_variants().len(), 1);
    assert_eq!(palettes.tactical(0).and_then(|p| p.get(255)), Some(Color::new(20, 20, 20)));
    Ok(())
}

#[test]
fn tftd_palettes_come_from_image_headers() -> anyhow::Result<()> {
    let game = tftd_game_dir()?;
    let palettes = PrimaryPalettes::from_game_dir(&game, GameVariant::Tftd)?;
    assert_eq!(palettes.research(), palettes.base());
    assert_eq!(palettes.tactical_variants().len(), 4);
    assert_eq!(palettes.tactical(2).and_then(|p| p.get(7)), Some(Color::new(48, 48, 48)));
    Ok(())
}

#[test]
fn overlay_replaces_tactical_tail() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let palettes = PrimaryPalettes::from_game_dir(&game, GameVariant::Ufo)?;
    let overlays = OverlayPalettes::from_game_dir(&game)?;
    let tactical = palettes.tactical(0).expect("tactical palette");
    let combined = tactical.with_overlay(overlays.get(3).expect("overlay 3"));
    assert_eq!(combined.get(239), Some(Color::new(20, 20, 20)));
    assert_eq!(combined.get(240), Some(Color::new(12, 12, 12)));
    assert_eq!(combined.get(255), Some(Color::new(12, 12, 12)));
    Ok(())
}

#[test]
fn pck_with_tab_resolves_logical_ids() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let path = root.join("TERRAIN").join("AVENGER.PCK");
    let pck = PckFile::from_file(&path, &terrain_options())?;
    assert!(pck.is_valid());
    assert_eq!(pck.name(), "AVENGER");
    assert_eq!(pck.sprites().len(), 2);

    let second = pck.sprite_by_logical_id(1).expect("sprite 1");
    assert_eq!(second.index, 1);
    assert_eq!(second.offset, 5);
    // four transparent pixels, then index 7
    assert_eq!(&second.pixel_indices()[..5], &[0, 0, 0, 0, 7]);
    assert_eq!(second.pixel_indices().len(), 32 * 40);
    Ok(())
}

#[test]
fn lowercase_pck_uses_lowercase_tab() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let pck = PckFile::from_file(root.join("TERRAIN").join("lower.pck"), &terrain_options())?;
    assert_eq!(pck.name(), "lower");
    assert_eq!(pck.tab().map(|tab| tab.len()), Some(2));
    assert_eq!(pck.sprite_by_logical_id(1).map(|s| s.offset), Some(5));
    Ok(())
}

#[test]
fn pck_without_tab_still_decodes() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let path = root.join("TERRAIN").join("BARN.PCK");
    let pck = PckFile::from_file(&path, &terrain_options())?;
    assert!(pck.tab().is_none());
    assert_eq!(pck.sprites().len(), 1);
    assert!(pck.sprite_by_logical_id(0).is_none());
    Ok(())
}

#[test]
fn spk_impostor_is_flagged_invalid() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let path = root.join("UFOGRAPH").join("ICONS.PCK");
    let options = PckOptions::builder()
        .category(ResourceCategory::Ufograph)
        .file_name("ICONS.PCK")
        .build();
    let pck = PckFile::from_file(&path, &options)?;
    assert!(!pck.is_valid());
    assert!(pck.sprites().is_empty());
    Ok(())
}

#[test]
fn sprite_sheet_to_png() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let path = root.join("TERRAIN").join("AVENGER.PCK");
    let pck = PckFile::from_file(&path, &terrain_options())?;
    let palettes = PrimaryPalettes::from_game_dir(&game, GameVariant::Ufo)?;
    let palette = palettes.select(pck.palette_selector()).expect("tactical palette");
    let sheet = pck.sheet_image(palette);
    assert_eq!(sheet.dimensions(), (2 * 32, 40));
    assert_eq!(sheet.get_pixel(0, 39).0, [20, 20, 20, 255]);
    assert_eq!(sheet.get_pixel(32, 0).0, [0, 0, 0, 0]);

    let output = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(Temp::new_file()?)?;
    let encoder = PngEncoder::new(output);
    encoder.write_image(
        sheet.as_raw(),
        sheet.width(),
        sheet.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

#[test]
fn map_resolves_against_terrains() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let terrains = [
        TerrainBundle::load("BLANKS", &[root.join("TERRAIN")], &terrain_options())?,
        TerrainBundle::load("AVENGER", &[root.join("TERRAIN")], &terrain_options())?,
    ];
    let grid = MapGrid::from_file(root.join("MAPS").join("TEST.MAP"), Partial::Reject)?;
    assert_eq!((grid.height(), grid.width(), grid.depth()), (1, 2, 2));

    let resolved = grid.resolve(&terrains)?;
    let floor = resolved.cell(0, 0, 1).expect("cell").floor;
    assert_eq!((floor.terrain, floor.local_index), ("AVENGER", 0));
    assert_eq!(floor.entry.armour, 10);
    let object = resolved.cell(0, 1, 1).expect("cell").object;
    assert_eq!((object.terrain, object.local_index), ("AVENGER", 1));
    assert_eq!(object.entry.armour, 20);
    assert_eq!(resolved.cell(0, 0, 0).expect("cell").floor.terrain, "BLANKS");
    Ok(())
}

#[test]
fn map_reference_past_terrains_is_out_of_range() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let blanks = TileAttributeTable::from_file(root.join("TERRAIN").join("BLANKS.MCD"))?;
    let grid = MapGrid::from_file(root.join("MAPS").join("TEST.MAP"), Partial::Reject)?;
    let err = grid.resolve_tables(&[&blanks]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
    Ok(())
}

#[test]
fn missing_terrain_is_not_found() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let root: &Path = game.as_ref();
    let err = TerrainBundle::load("MARS", &[root.join("TERRAIN")], &terrain_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    // BARN has no .TAB, so it is not a complete terrain
    let err = TerrainBundle::load("BARN", &[root.join("TERRAIN")], &terrain_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    Ok(())
}

#[test]
fn minimap_atlas_from_game_dir() -> anyhow::Result<()> {
    let game = ufo_game_dir()?;
    let atlas = MinimapAtlas::from_game_dir(&game)?;
    assert_eq!(atlas.len(), 3);
    assert_eq!(atlas.tiles()[2].offset, 32);

    let palette = Palette::tactical_backdrop();
    let img = atlas.atlas_image(&palette, 16);
    assert_eq!(img.dimensions(), (12, 4));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(4, 0).0, [0x84, 0x8a, 0x8c, 255]);
    Ok(())
}

#[test]
fn missing_palettes_are_not_found() -> anyhow::Result<()> {
    let dir = Temp::new_dir()?;
    let err = PrimaryPalettes::from_game_dir(&dir, GameVariant::Ufo).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    Ok(())
}
