use std::path::PathBuf;
use tracing::{info, Level};
use xcomr::{
    default_output, export_map, export_mcd, export_palettes, export_pck, export_scang,
    game_dir_of,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use libxcom::{GameVariant, Partial, PckOptions, ResourceCategory};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// The game the files belong to (UFO or TFTD)
    #[arg(long, global = true, default_value_t = GameVariant::Ufo)]
    variant: GameVariant,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// writes a swatch image for every palette of a game
    Palettes {
        /// The game directory (holding GEODATA/)
        game_dir: PathBuf,

        /// The output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// converts a PCK sprite archive to a sprite sheet
    Pck {
        /// The PCK file
        pck_file: PathBuf,

        /// The directory the archive comes from (TERRAIN, UNITS, UFOGRAPH or GEOGRAPH)
        #[arg(short, long, default_value_t = ResourceCategory::Terrain)]
        category: ResourceCategory,

        /// Which tactical palette to use
        #[arg(short, long, default_value_t = 0)]
        tactical: usize,

        /// Sprites per row of the sheet
        #[arg(long, default_value_t = 8)]
        columns: u32,

        /// The game directory, defaults to the grandparent of the PCK file
        #[arg(short, long)]
        game_dir: Option<PathBuf>,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write sprite metadata as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// dumps an MCD tile attribute file as JSON
    Mcd {
        /// The MCD file
        mcd_file: PathBuf,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// resolves a MAP file against its terrains and dumps it as JSON
    Map {
        /// The MAP file
        map_file: PathBuf,

        /// Terrain names, in the order the map uses them
        #[arg(long = "terrain", required = true)]
        terrains: Vec<String>,

        /// Directories to look for terrain files in, first match wins
        #[arg(long = "terrain-dir", required = true)]
        terrain_dirs: Vec<PathBuf>,

        /// Accept maps that end early, filling missing cells with empty ones
        #[arg(long)]
        partial: bool,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// converts SCANG.DAT to a minimap atlas image
    Scang {
        /// The game directory (holding GEODATA/)
        game_dir: PathBuf,

        /// Tiles per row of the atlas
        #[arg(long, default_value_t = 16)]
        columns: u32,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    let variant = cli.variant;
    match cli.command {
        Commands::Palettes { game_dir, output } => {
            let output = output.unwrap_or_else(|| game_dir.join("palettes"));
            export_palettes(&game_dir, variant, &output)?;
        }
        Commands::Pck {
            pck_file,
            category,
            tactical,
            columns,
            game_dir,
            output,
            json,
        } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&pck_file, "png")?,
            };
            let game_dir = match game_dir {
                Some(g) => g,
                None => game_dir_of(&pck_file)?,
            };
            info!("game directory: {}", game_dir.display());
            let options = PckOptions::builder()
                .variant(variant)
                .category(category)
                .file_name(pck_file.to_string_lossy())
                .tactical_palette(tactical)
                .sheet_columns(columns)
                .build();
            export_pck(&pck_file, &options, &game_dir, &output, json.as_deref())?;
        }
        Commands::Mcd { mcd_file, output } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&mcd_file, "json")?,
            };
            export_mcd(&mcd_file, &output)?;
        }
        Commands::Map {
            map_file,
            terrains,
            terrain_dirs,
            partial,
            output,
        } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&map_file, "json")?,
            };
            let options = PckOptions::builder()
                .variant(variant)
                .category(ResourceCategory::Terrain)
                .file_name(String::new())
                .build();
            let partial = if partial {
                Partial::Tolerate
            } else {
                Partial::Reject
            };
            export_map(
                &map_file,
                &terrains,
                &terrain_dirs,
                &options,
                partial,
                &output,
            )?;
        }
        Commands::Scang {
            game_dir,
            columns,
            output,
        } => {
            let output = output.unwrap_or_else(|| game_dir.join("scang.png"));
            export_scang(&game_dir, variant, columns, &output)?;
        }
    }
    Ok(())
}
