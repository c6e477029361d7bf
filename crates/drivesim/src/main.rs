//! drivesim - synthetic driving-cycle telemetry over serial

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use drivesim_core::config::{GeneratorConfig, LinkTarget};
use drivesim_core::cycle::CycleSimulator;
use drivesim_core::generator::Generator;
use drivesim_core::monitor::Monitor;
use drivesim_core::protocol::{
    list_ports, SerialChannel, TcpChannel, TelemetryChannel, DEFAULT_TIMEOUT_MS,
};

use args::{Cli, Command, GenerateArgs};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = GeneratorConfig::resolve(cli.link.config.as_deref(), &cli.link.overrides())?;

    match cli.action() {
        Command::Ports => {
            print_ports();
            Ok(())
        }
        Command::Generate(args) => generate(&args, &config),
        Command::Monitor => monitor(&config),
    }
}

fn open_link(config: &GeneratorConfig) -> Result<Box<dyn TelemetryChannel>> {
    let link: Box<dyn TelemetryChannel> = match config.link() {
        LinkTarget::Tcp(addr) => Box::new(
            TcpChannel::connect(addr).with_context(|| format!("connecting to {}", addr))?,
        ),
        LinkTarget::Serial { port, baud_rate } => Box::new(
            SerialChannel::open(port, baud_rate).with_context(|| format!("opening {}", port))?,
        ),
    };
    tracing::info!("Opened {}", link.describe());
    Ok(link)
}

fn generate(args: &GenerateArgs, config: &GeneratorConfig) -> Result<()> {
    let simulator = CycleSimulator::with_narrowing(config.narrowing);
    let mut generator = Generator::realtime(simulator, config.tick_period());

    if args.stdout {
        let stdout = io::stdout();
        let mut sink = stdout.lock();
        generator.run(&mut sink, args.ticks)?;
        sink.flush()?;
    } else {
        let mut link = open_link(config)?;
        generator.run(link.as_mut(), args.ticks)?;
    }
    Ok(())
}

fn monitor(config: &GeneratorConfig) -> Result<()> {
    let mut link = open_link(config)?;
    link.set_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))?;

    let mut monitor = Monitor::new(link);
    loop {
        if monitor.poll()? > 0 {
            // Clear screen and home the cursor before redrawing.
            print!("\x1B[2J\x1B[H");
            print!("{}", monitor.values().render());
            io::stdout().flush()?;
        }
    }
}

fn print_ports() {
    let ports = list_ports();
    if ports.is_empty() {
        println!("No serial ports found");
        return;
    }
    for port in ports {
        match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => println!(
                "{}  [{:04x}:{:04x}] {}",
                port.name,
                vid,
                pid,
                port.product.unwrap_or_default()
            ),
            _ => println!("{}", port.name),
        }
    }
}
