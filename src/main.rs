use std::process::ExitCode;

use can_we_talk::can::{BusConfig, BusType};
use can_we_talk::obd::ObdClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Query the OBD-II CAN bus and print the unpacked replies.
#[derive(Parser)]
#[command(name = "can_we_talk", version, about, disable_version_flag = true)]
struct Cli {
    /// CAN bus type (socketcan, socketcan_native, virtual)
    #[arg(short, long = "bustype", default_value = "socketcan_native")]
    bustype: BusType,

    /// CAN channel
    #[arg(short, long, default_value = "can0")]
    channel: String,

    /// Bitrate in bits per second, for adapters that can set it
    #[arg(long, default_value_t = 500_000)]
    bitrate: u32,

    /// Display version information
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BusConfig {
        bus_type: cli.bustype,
        channel: cli.channel,
        bitrate: cli.bitrate,
    };

    let adapter = match config.open() {
        Ok(adapter) => adapter,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut client = ObdClient::new(adapter);
    match can_we_talk::report::run(&mut client, &mut std::io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
