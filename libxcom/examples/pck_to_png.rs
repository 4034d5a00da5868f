/// Demonstrates how to create a sprite sheet png from a terrain [`PckFile`]
/// using the [`image`] crate
///
/// Usage: `cargo run --example pck_to_png -- <GAME_DIR> <TERRAIN>`
use image::{codecs::png::PngEncoder, ImageEncoder};
use libxcom::{GameVariant, PckFile, PckOptions, PrimaryPalettes, ResourceCategory};
use std::{fs::File, path::PathBuf};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let game_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));
    let terrain = args.next().unwrap_or_else(|| "AVENGER".to_owned());

    let options = PckOptions::builder()
        .category(ResourceCategory::Terrain)
        .file_name(format!("{terrain}.PCK"))
        .build();
    let pck = PckFile::from_file(
        game_dir.join("TERRAIN").join(&options.file_name),
        &options,
    )?;
    let palettes = PrimaryPalettes::from_game_dir(&game_dir, GameVariant::Ufo)?;
    let palette = palettes
        .select(pck.palette_selector())
        .ok_or_else(|| anyhow::anyhow!("no palette for {}", pck.name()))?;
    let sheet = pck.sheet_image(palette);

    let output = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(format!("{terrain}.png"))?;

    let encoder = PngEncoder::new(output);
    encoder.write_image(
        sheet.as_raw(),
        sheet.width(),
        sheet.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
