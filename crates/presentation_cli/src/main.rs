//! OpenCage CLI
//!
//! Command-line interface for forward and reverse geocoding.

#![allow(clippy::print_stdout)]

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use integration_opencage::{OpenCageClient, OpenCageConfig};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{GeocodeArgs, ReverseArgs};

/// OpenCage CLI
#[derive(Parser)]
#[command(name = "opencage-cli")]
#[command(author, version, about = "OpenCage geocoding CLI", long_about = None)]
struct Cli {
    /// Verbosity level (-v also logs request parameters and response bodies)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./opencage.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key, used when neither OPENCAGE_KEY nor the config file provide one
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up coordinates for an address or place name
    ///
    /// Example: opencage-cli geocode "Wattstraße 11, Berlin" --country-code de --limit 1
    Geocode(GeocodeArgs),

    /// Look up the address at a coordinate pair
    ///
    /// Example: opencage-cli reverse 52.541 13.390
    Reverse(ReverseArgs),
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the client configuration from file, environment and flags
fn build_config(cli: &Cli) -> anyhow::Result<OpenCageConfig> {
    let mut config = OpenCageConfig::load(cli.config.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if cli.verbose > 0 {
        config.verbose = true;
    }
    config.resolve_api_key(OpenCageConfig::api_key_from_env(), cli.api_key.clone())?;

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = build_config(&cli)?;
    debug!(config = ?config, "Loaded configuration");
    let client = OpenCageClient::new(config)?;

    let output = match &cli.command {
        Commands::Geocode(args) => commands::geocode(&client, args).await?,
        Commands::Reverse(args) => commands::reverse(&client, args).await?,
    };
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::io::Write;

    use super::*;
    use integration_opencage::ParamValue;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        Cli::try_parse_from(os_args)
    }

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn cli_parses_geocode_command() {
        let cli = parse_args(&["opencage-cli", "geocode", "Wattstraße 11, Berlin"]).unwrap();
        let Commands::Geocode(args) = cli.command else {
            panic!("Expected Geocode command");
        };
        assert_eq!(args.query, "Wattstraße 11, Berlin");
        assert!(args.bounds.is_none());
        assert!(!args.no_record);
        assert!(!args.json);
    }

    #[test]
    fn cli_parses_geocode_options() {
        let cli = parse_args(&[
            "opencage-cli",
            "geocode",
            "Berlin",
            "--bounds",
            "-0.56,51.28,0.27,51.68",
            "--country-code",
            "de",
            "--language",
            "en",
            "--limit",
            "5",
            "--proximity",
            "52.5,13.3",
            "--no-record",
            "--roadinfo",
            "--param",
            "foo=bar",
            "--param",
            "no_dedupe=true",
            "--json",
        ])
        .unwrap();
        let Commands::Geocode(args) = cli.command else {
            panic!("Expected Geocode command");
        };
        assert_eq!(args.bounds, Some([-0.56, 51.28, 0.27, 51.68]));
        assert_eq!(args.country_code.as_deref(), Some("de"));
        assert_eq!(args.language.as_deref(), Some("en"));
        assert_eq!(args.limit, Some(5));
        assert!(args.proximity.is_some());
        assert!(args.no_record);
        assert!(args.roadinfo);
        assert!(!args.abbreviate);
        assert_eq!(
            args.params,
            vec![
                ("foo".to_string(), ParamValue::Text("bar".to_string())),
                ("no_dedupe".to_string(), ParamValue::Bool(true)),
            ]
        );
        assert!(args.json);
    }

    #[test]
    fn cli_rejects_short_bounds() {
        let result = parse_args(&["opencage-cli", "geocode", "Berlin", "--bounds", "1,2,3"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_reverse_with_negative_coordinates() {
        let cli = parse_args(&["opencage-cli", "reverse", "-33.8688", "151.2093"]).unwrap();
        let Commands::Reverse(args) = cli.command else {
            panic!("Expected Reverse command");
        };
        assert!((args.latitude + 33.8688).abs() < f64::EPSILON);
        assert!((args.longitude - 151.2093).abs() < f64::EPSILON);
    }

    #[test]
    fn cli_parses_global_options() {
        let cli = parse_args(&[
            "opencage-cli",
            "-vv",
            "--api-key",
            "abc",
            "--base-url",
            "http://localhost:8080",
            "reverse",
            "1",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(parse_args(&["opencage-cli"]).is_err());
    }

    #[test]
    fn build_config_applies_flags() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_key = \"file-key\"\ntimeout_secs = 9").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = parse_args(&[
            "opencage-cli",
            "-v",
            "--config",
            &path,
            "--base-url",
            "http://localhost:8080",
            "reverse",
            "1",
            "2",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 9);
        assert!(config.verbose);
        assert!(config.api_key_str().is_some());
    }

    #[test]
    fn cli_api_key_comes_only_from_flag() {
        let cli = parse_args(&["opencage-cli", "reverse", "1", "2"]).unwrap();
        assert!(cli.api_key.is_none());
    }

    #[test]
    fn build_config_uses_flag_key_when_file_has_none() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "timeout_secs = 9").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = parse_args(&[
            "opencage-cli",
            "--config",
            &path,
            "--api-key",
            "flag-key",
            "reverse",
            "1",
            "2",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();

        match OpenCageConfig::api_key_from_env() {
            Some(env_key) => assert_eq!(config.api_key_str(), Some(env_key.as_str())),
            None => assert_eq!(config.api_key_str(), Some("flag-key")),
        }
    }
}
