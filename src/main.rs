mod config;
mod error;
mod ether;
mod net;
mod socket;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config};
use crate::ether::{EthernetFrame, ETH_FRAME_LEN};
use crate::net::HostNet;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args);

    let config = Config::resolve(args, &HostNet).context("cannot resolve configuration")?;
    debug!(interface = %config.interface, dst = %config.dst, src = %config.src);

    let frame = EthernetFrame::new(config.dst, config.src, config.payload)?.to_byte_array()?;
    if frame.len() > ETH_FRAME_LEN {
        warn!(
            len = frame.len(),
            max = ETH_FRAME_LEN,
            "frame exceeds the untagged ethernet maximum"
        );
    }
    let header = EthernetFrame::parse(&frame)?;
    debug!(
        dst = %header.dst_mac_addr,
        src = %header.source_mac_addr,
        type_len = ?header.type_len,
        len = frame.len(),
        "frame built"
    );

    let num_bytes_sent = socket::send_frame(&frame, &config.interface)
        .with_context(|| format!("cannot send frame on {}", config.interface))?;

    println!(
        "Sent {}-byte Ethernet frame on {}",
        num_bytes_sent, config.interface
    );
    Ok(())
}
