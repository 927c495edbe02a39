//! Web server command.

use std::net::{IpAddr, SocketAddr};

use crate::cli::icons::info;
use jobimport::config::Settings;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let addr = parse_bind_address(bind)?;

    println!("{} Starting jobimport server at http://{}", info(), addr);
    println!("  POST /api/import {{\"url\": \"...\"}}");
    println!("  Press Ctrl+C to stop");

    jobimport::server::serve(settings, addr).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<SocketAddr> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
    }

    if let Ok(addr) = bind.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let host = bind.trim_start_matches('[').trim_end_matches(']');
    let ip: IpAddr = host
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid bind address: {}", bind))?;
    Ok(SocketAddr::new(ip, 3030))
}
