use can_we_talk::can::BusType;
use can_we_talk::obd::{DiagnosticRequest, ObdClient};
use tracing_subscriber;

/// Usage: query_pid [channel] [pid in hex]
fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let channel = args.next().unwrap_or_else(|| "can0".to_string());
    let pid = args
        .next()
        .map(|pid| u8::from_str_radix(pid.trim_start_matches("0x"), 16).unwrap())
        .unwrap_or(0x0d);

    let adapter = can_we_talk::can::open(BusType::SocketCan, &channel, 500_000).unwrap();
    let mut client = ObdClient::new(adapter);

    match client.query(&DiagnosticRequest::new(pid)).unwrap() {
        Some(reply) => println!("0x{:02x}: {}", pid, hex::encode(reply.data())),
        None => println!("0x{:02x}: no reply", pid),
    }
}
