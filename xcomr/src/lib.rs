use std::{
    collections::HashMap,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use image::{codecs::png::PngEncoder, ImageEncoder, RgbaImage};
use libxcom::{
    GameVariant, MapGrid, MinimapAtlas, OverlayPalettes, Palette, Partial, PckFile, PckOptions,
    PrimaryPalettes, SheetPosition, Sprite, SpriteLayout, TabIndex, TerrainBundle,
    TileAttributeTable,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

fn create(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))
}

/// Writes an RGBA image as PNG
pub fn write_png(img: &RgbaImage, output_name: &Path) -> Result<()> {
    let output = create(output_name)?;
    info!("Writing image to {}", output_name.display());
    let encoder = PngEncoder::new(output);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    info!("Successfully wrote image to {}", output_name.display());
    Ok(())
}

/// Writes `value` as pretty printed JSON
pub fn write_json<T: Serialize + ?Sized>(value: &T, output_name: &Path) -> Result<()> {
    let output = BufWriter::new(create(output_name)?);
    info!("Writing JSON to {}", output_name.display());
    serde_json::to_writer_pretty(output, value)?;
    Ok(())
}

/// `DIR/STEM.SUFFIX` for an input file, used when no output is given
pub fn default_output(input: &Path, suffix: &str) -> Result<PathBuf> {
    let Some(dir) = input.parent() else {
        bail!("Invalid input file {}", input.display());
    };
    let Some(stem) = input.file_stem().and_then(|os| os.to_str()) else {
        bail!("Invalid input file {}", input.display());
    };
    let output = dir.join(format!("{stem}.{suffix}"));
    debug!("output name: {}", output.display());
    Ok(output)
}

/// Game directory holding a resource, i.e. the parent of its category directory
pub fn game_dir_of(resource: &Path) -> Result<PathBuf> {
    resource
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Cannot locate game directory of {}", resource.display()))
}

/// Writes a swatch of every palette of the game plus the backdrop overlays
#[instrument]
pub fn export_palettes(game_dir: &Path, variant: GameVariant, out_dir: &Path) -> Result<()> {
    const SWATCH_HEIGHT: u32 = 16;
    std::fs::create_dir_all(out_dir)?;
    let primary = PrimaryPalettes::from_game_dir(game_dir, variant)?;
    let named = [
        ("geoscape", primary.geoscape()),
        ("base", primary.base()),
        ("graph", primary.graph()),
        ("research", primary.research()),
    ];
    for (name, palette) in named {
        write_png(&palette.swatch(SWATCH_HEIGHT), &out_dir.join(format!("{name}.png")))?;
    }
    let backdrop = Palette::tactical_backdrop();
    for (i, palette) in primary.tactical_variants().iter().enumerate() {
        write_png(
            &palette.swatch(SWATCH_HEIGHT),
            &out_dir.join(format!("tactical{i}.png")),
        )?;
        write_png(
            &palette.with_overlay(&backdrop).swatch(SWATCH_HEIGHT),
            &out_dir.join(format!("tactical{i}_backdrop.png")),
        )?;
    }
    match OverlayPalettes::from_game_dir(game_dir) {
        Ok(overlays) => {
            for (i, overlay) in overlays.iter().enumerate() {
                write_png(
                    &overlay.swatch(SWATCH_HEIGHT),
                    &out_dir.join(format!("backpals{i}.png")),
                )?;
            }
        }
        Err(e) => warn!("Skipping backdrop overlays: {e}"),
    }
    write_png(&backdrop.swatch(SWATCH_HEIGHT), &out_dir.join("backdrop.png"))?;
    Ok(())
}

#[derive(Serialize)]
struct PckDump<'a> {
    name: &'a str,
    valid: bool,
    layout: &'a SpriteLayout,
    sprites: Vec<SpriteDump<'a>>,
    tab: Option<&'a TabIndex>,
}

#[derive(Serialize)]
struct SpriteDump<'a> {
    #[serde(flatten)]
    sprite: &'a Sprite,
    tab_offset: u32,
    logical_id: Option<usize>,
    position: SheetPosition,
}

fn pck_dump(pck: &PckFile) -> PckDump<'_> {
    let tab_width = pck.tab().map_or(pck.layout().tab_width, TabIndex::width);
    let logical_ids = pck.tab().map(|tab| {
        tab.entries()
            .iter()
            .filter_map(|entry| pck.sprite_by_tab(entry).map(|s| (s.index, entry.index)))
            .collect::<HashMap<_, _>>()
    });
    let sprites = pck
        .sprites()
        .iter()
        .zip(0u32..)
        .map(|(sprite, i)| SpriteDump {
            sprite,
            tab_offset: sprite.tab_offset(tab_width),
            logical_id: logical_ids
                .as_ref()
                .and_then(|ids| ids.get(&sprite.index).copied()),
            position: pck.sheet_position(i),
        })
        .collect();
    PckDump {
        name: pck.name(),
        valid: pck.is_valid(),
        layout: pck.layout(),
        sprites,
        tab: pck.tab(),
    }
}

/// Decodes a `.PCK` archive into a sprite sheet and, optionally, a JSON description of it
#[instrument(skip(options))]
pub fn export_pck(
    pck_file: &Path,
    options: &PckOptions,
    game_dir: &Path,
    output: &Path,
    json: Option<&Path>,
) -> Result<()> {
    let pck = PckFile::from_file(pck_file, options)?;
    if !pck.is_valid() {
        bail!("{} is not a sprite archive", pck_file.display());
    }
    debug!("Decoded {} sprites", pck.sprites().len());
    let palettes = PrimaryPalettes::from_game_dir(game_dir, options.variant)?;
    let palette = palettes
        .select(pck.palette_selector())
        .ok_or_else(|| anyhow!("No palette {:?}", pck.palette_selector()))?;
    write_png(&pck.sheet_image(palette), output)?;

    if let Some(json) = json {
        write_json(&pck_dump(&pck), json)?;
    }
    Ok(())
}

/// Dumps a `.MCD` tile attribute file as JSON
#[instrument]
pub fn export_mcd(mcd_file: &Path, output: &Path) -> Result<()> {
    let table = TileAttributeTable::from_file(mcd_file)?;
    debug!("Decoded {} tile records", table.len());
    write_json(&table, output)
}

/// Resolves a `.MAP` grid against its terrains and dumps it as JSON
#[instrument(skip(options))]
pub fn export_map(
    map_file: &Path,
    terrains: &[String],
    terrain_dirs: &[PathBuf],
    options: &PckOptions,
    partial: Partial,
    output: &Path,
) -> Result<()> {
    let grid = MapGrid::from_file(map_file, partial)?;
    let bundles = terrains
        .iter()
        .map(|name| TerrainBundle::load(name, terrain_dirs, options))
        .collect::<Result<Vec<_>, _>>()?;
    let resolved = grid.resolve(&bundles)?;
    write_json(&resolved, output)
}

/// Draws every `SCANG.DAT` tile into one atlas image, using the first tactical palette
#[instrument]
pub fn export_scang(
    game_dir: &Path,
    variant: GameVariant,
    columns: u32,
    output: &Path,
) -> Result<()> {
    let atlas = MinimapAtlas::from_game_dir(game_dir)?;
    let palettes = PrimaryPalettes::from_game_dir(game_dir, variant)?;
    let palette = palettes
        .tactical(0)
        .ok_or_else(|| anyhow!("No tactical palette"))?;
    write_png(&atlas.atlas_image(palette, columns), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libxcom::{ResourceCategory, TabWidth};
    use std::io::Cursor;

    #[test]
    fn pck_dump_carries_tab_offsets_and_index() {
        let options = PckOptions::builder()
            .category(ResourceCategory::Terrain)
            .file_name("AVENGER.PCK")
            .build();
        // sprites at offsets 0 and 5; logical id 0 is the second one
        let data = vec![39, 1, 2, 3, 0xFF, 0, 0xFE, 4, 7, 0xFF];
        let tab = TabIndex::from_reader(Cursor::new(vec![5, 0, 0, 0]), TabWidth::Two).unwrap();
        let pck = PckFile::from_reader(Cursor::new(data), &options)
            .unwrap()
            .with_tab(tab);

        let json = serde_json::to_value(pck_dump(&pck)).unwrap();
        let sprites = json["sprites"].as_array().unwrap();
        assert_eq!(sprites[1]["offset"], 5);
        assert_eq!(sprites[1]["tab_offset"], 0x0500);
        assert_eq!(sprites[1]["logical_id"], 0);
        assert_eq!(sprites[0]["logical_id"], 1);
        assert_eq!(json["tab"]["entries"][0]["stored_offset"], 0x0500);
        assert_eq!(json["tab"]["width"], "Two");
    }

    #[test]
    fn pck_dump_without_tab() {
        let options = PckOptions::builder().file_name("BLANKS.PCK").build();
        let pck = PckFile::from_reader(Cursor::new(vec![0, 0xFF]), &options).unwrap();
        let json = serde_json::to_value(pck_dump(&pck)).unwrap();
        assert!(json["tab"].is_null());
        assert!(json["sprites"][0]["logical_id"].is_null());
        assert_eq!(json["sprites"][0]["tab_offset"], 0);
    }
}
