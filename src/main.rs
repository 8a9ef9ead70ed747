use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use velotype::reader::{self, FileFormat};
use velotype::{classify_and_score, BikeProfile, RoadType, RACING_PROFILE, TOURING_PROFILE};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct ExtractError(PathBuf, #[source] reader::ReadError);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ProfileArg {
    Touring,
    Racing,
}

impl ProfileArg {
    fn profile(self) -> &'static BikeProfile<'static> {
        match self {
            Self::Touring => &TOURING_PROFILE,
            Self::Racing => &RACING_PROFILE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    /// Guess from the file extension
    Auto,
    Xml,
    Gz,
    Bz2,
}

impl FormatArg {
    fn file_format(self) -> FileFormat {
        match self {
            Self::Auto => FileFormat::Unknown,
            Self::Xml => FileFormat::Xml,
            Self::Gz => FileFormat::XmlGz,
            Self::Bz2 => FileFormat::XmlBz2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Routing profile interpreting the way tags
    #[arg(long, value_enum, default_value = "touring")]
    profile: ProfileArg,

    /// Format of the input file
    #[arg(long, value_enum, default_value = "auto")]
    format: FormatArg,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let profile = cli.profile.profile();
    let extract = reader::read_from_file(cli.format.file_format(), &cli.osm_file)
        .map_err(|e| ExtractError(cli.osm_file.clone(), e))?;

    println!("way\troad_type_fwd\troad_type_bwd\tpriority_fwd\tpriority_bwd");
    for way in &extract.ways {
        let attrs = classify_and_score(profile, way, extract.network_of(way.id));
        println!(
            "{}\t{}\t{}\t{}\t{}",
            way.id,
            road_type_column(attrs.road_type(false)),
            road_type_column(attrs.road_type(true)),
            attrs.priority(false),
            attrs.priority(true),
        );
    }

    log::info!(
        "classified {} ways with the {} profile",
        extract.ways.len(),
        profile.name,
    );
    Ok(())
}

fn road_type_column(road_type: Option<RoadType>) -> String {
    match road_type {
        Some(road_type) => road_type.to_string(),
        None => "-".to_string(),
    }
}
