//! Command-line parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use drivesim_core::config::ConfigOverrides;
use drivesim_core::cycle::Narrowing;

/// Synthetic driving-cycle telemetry streamed as TLV records.
///
/// Log level is taken from RUST_LOG (default: info).
#[derive(Parser, Debug)]
#[command(name = "drivesim", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Generator options when no subcommand is given
    #[command(flatten)]
    generate: GenerateArgs,

    #[command(flatten)]
    pub link: LinkArgs,
}

impl Cli {
    /// Subcommand to run; streaming the cycle is the default
    pub fn action(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Generate(self.generate.clone()))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stream the driving cycle
    Generate(GenerateArgs),
    /// Decode a stream and show live values
    Monitor,
    /// List serial ports
    Ports,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Stop after N ticks
    #[arg(short = 'n', long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Write the binary stream to stdout
    #[arg(long)]
    pub stdout: bool,
}

/// Link and cadence settings; each one overrides the config file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkArgs {
    /// Serial port [default: /dev/ttyUSB0]
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Baud rate [default: 115200]
    #[arg(short, long, value_name = "RATE", global = true)]
    pub baud: Option<u32>,

    /// Use a TCP endpoint instead of a serial port
    #[arg(long, value_name = "HOST:PORT", global = true)]
    pub tcp: Option<String>,

    /// Load settings from a JSON file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Tick period in milliseconds [default: 50]
    #[arg(long, value_name = "MS", global = true)]
    pub period_ms: Option<u64>,

    /// Clamp out-of-range readings instead of wrapping
    #[arg(long, global = true)]
    pub saturate: bool,
}

impl LinkArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port.clone(),
            baud_rate: self.baud,
            tcp: self.tcp.clone(),
            tick_period_ms: self.period_ms,
            narrowing: self.saturate.then_some(Narrowing::Saturate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("drivesim").chain(line.split_whitespace()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_generate() {
        let cli = parse("").unwrap();
        assert_eq!(cli.action(), Command::Generate(GenerateArgs::default()));
        assert_eq!(cli.link, LinkArgs::default());
        assert_eq!(cli.link.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_monitor_with_options() {
        let cli = parse("monitor --port /dev/ttyS0 -b 57600").unwrap();
        assert_eq!(cli.action(), Command::Monitor);
        assert_eq!(cli.link.port.as_deref(), Some("/dev/ttyS0"));
        assert_eq!(cli.link.baud, Some(57600));
    }

    #[test]
    fn test_generate_flags_without_subcommand() {
        let cli = parse("--stdout --ticks 20 --saturate --period-ms 10").unwrap();
        assert_eq!(
            cli.action(),
            Command::Generate(GenerateArgs {
                ticks: Some(20),
                stdout: true,
            })
        );
        let overrides = cli.link.overrides();
        assert_eq!(overrides.tick_period_ms, Some(10));
        assert_eq!(overrides.narrowing, Some(Narrowing::Saturate));
    }

    #[test]
    fn test_generate_subcommand() {
        let cli = parse("generate -n 5 --tcp 127.0.0.1:5555").unwrap();
        assert_eq!(
            cli.action(),
            Command::Generate(GenerateArgs {
                ticks: Some(5),
                stdout: false,
            })
        );
        assert_eq!(cli.link.tcp.as_deref(), Some("127.0.0.1:5555"));
    }

    #[test]
    fn test_config_path() {
        let cli = parse("ports -c drivesim.json").unwrap();
        assert_eq!(cli.action(), Command::Ports);
        assert_eq!(cli.link.config, Some(PathBuf::from("drivesim.json")));
    }

    #[test]
    fn test_help() {
        let err = parse("ports --help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_errors() {
        assert!(parse("--baud fast").is_err());
        assert!(parse("--port").is_err());
        assert!(parse("--bogus").is_err());
        assert!(parse("monitor --ticks 3").is_err());
    }
}
