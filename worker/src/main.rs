use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use clap::Parser;
use rangecrack_core::{HashFunction, Worker};
use rangecrack_worker::{serve, DEFAULT_PORT};

/// Worker service brute-forcing password digests over ranges of the search space.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The address to bind.
    #[clap(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to listen on.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// The hash function of the digests to crack.
    #[clap(long, default_value_t = HashFunction::Md5)]
    hash: HashFunction,

    /// Log every request, including cache hits.
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let addr = SocketAddr::new(cli.host, cli.port);
    let worker = Worker::with_memory_cache(cli.hash);

    serve(addr, worker)
        .await
        .with_context(|| format!("Unable to run the worker on {addr}"))
}
