mod phase;

use std::fmt;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use glam::Vec3;
use gridkit_codec::BitOption;
use gridkit_grid::CellHandle;
use gridkit_host::mem::{EntityKind, MemoryWorld};
use tracing_subscriber::EnvFilter;

use crate::phase::ReleasePhase;

#[derive(Parser)]
#[command(name = "gridkit-cli", about = "Administrative CLI for GridKit")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info, and the current release phase
    Info,
    /// Inspect a cell and its neighbors on a demo in-memory world
    Cell {
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: i32,
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        z: i32,
        /// Number of demo entities to spawn in the cell
        #[arg(short, long, default_value = "6")]
        entities: usize,
    },
    /// Encode a set of weekdays into a 64-bit code
    Encode {
        /// Day names, e.g. `monday tuesday friday`
        days: Vec<String>,
    },
    /// Decode a 64-bit code back into weekdays
    Decode { code: u64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let phase = ReleasePhase::current();
    if phase.warns() {
        tracing::warn!(%phase, "this GridKit build is not meant for production use");
    }

    match cli.command {
        Commands::Info => {
            println!("gridkit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("host:  {}", gridkit_host::crate_info());
            println!("grid:  {}", gridkit_grid::crate_info());
            println!("codec: {}", gridkit_codec::crate_info());
            println!("release phase: {phase}");
            if phase.warns() {
                println!("This version should not be used in a production environment.");
            }
        }
        Commands::Cell { x, z, entities } => {
            let world = MemoryWorld::new("demo");
            let size = world.cell_size();
            for i in 0..entities {
                let kind = if i % 2 == 0 {
                    EntityKind::Player
                } else {
                    EntityKind::Creature
                };
                let position = Vec3::new(
                    x as f32 * size + (i % size as usize) as f32 + 0.5,
                    0.0,
                    z as f32 * size + 0.5,
                );
                world.spawn(position, kind);
            }

            let handle = CellHandle::new(world.clone(), x, z);
            println!("{handle}");
            println!("loaded before load(): {}", handle.is_loaded()?);
            handle.load()?;
            println!("loaded after load():  {}", handle.is_loaded()?);
            println!("entities: {}", handle.entities()?.len());
            println!("players:  {}", handle.players()?.len());
            println!("adjacent:");
            for neighbor in handle.adjacent() {
                println!("  {neighbor}");
            }
            println!("host lookups performed: {}", world.lookup_count());
        }
        Commands::Encode { days } => {
            let days = days
                .iter()
                .map(|day| day.parse::<Weekday>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|day| anyhow::anyhow!("unknown weekday `{day}`"))?;
            let code = gridkit_codec::encode(days)?;
            println!("{code}");
        }
        Commands::Decode { code } => {
            for day in gridkit_codec::decode::<Weekday>(code) {
                println!("{day}");
            }
        }
    }

    Ok(())
}

/// Demo option set for the codec subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl BitOption for Weekday {
    const VARIANTS: &'static [Self] = &[
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    fn ordinal(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        })
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            "saturday" => Ok(Self::Saturday),
            "sunday" => Ok(Self::Sunday),
            _ => Err(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parse_and_display() {
        for day in Weekday::VARIANTS {
            assert_eq!(day.to_string().parse::<Weekday>(), Ok(*day));
        }
        assert!("someday".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_codec_vector() {
        let code =
            gridkit_codec::encode([Weekday::Monday, Weekday::Tuesday, Weekday::Friday]).unwrap();
        assert_eq!(code, 19);
        assert_eq!(
            gridkit_codec::decode::<Weekday>(code),
            [Weekday::Monday, Weekday::Tuesday, Weekday::Friday]
        );
    }
}
