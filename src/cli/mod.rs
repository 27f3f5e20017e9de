//! CLI module for the firm content API
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `sheet`: dump one spreadsheet tab as JSON
//! - `locations`: print the resolved location list

pub mod locations;
pub mod serve;
pub mod sheet;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Firm Content API - spreadsheet-backed content for the firm website
#[derive(Parser)]
#[command(name = "firm-content-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Print the rows of one sheet as JSON
    Sheet(sheet::SheetArgs),

    /// Print the location list the site would render
    Locations(locations::LocationsArgs),
}

/// Loads `.env` and the layered config, then installs logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sheet_command() {
        let cli = Cli::try_parse_from(["firm-content-api", "sheet", "Cities", "--state", "Texas"]).unwrap();

        match cli.command {
            Command::Sheet(args) => {
                assert_eq!(args.name, "Cities");
                assert_eq!(args.state.as_deref(), Some("Texas"));
            }
            _ => panic!("expected sheet command"),
        }
    }

    #[test]
    fn test_parses_locations_refresh() {
        let cli = Cli::try_parse_from(["firm-content-api", "locations", "--refresh"]).unwrap();

        assert!(matches!(cli.command, Command::Locations(args) if args.refresh));
    }
}
