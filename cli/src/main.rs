mod coordinator;
mod transport;

use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, value_parser, CommandFactory, Parser};
use human_repr::HumanDuration;
use rangecrack_core::{HashFunction, MAX_PASSWORD_LENGTH_ALLOWED};

use coordinator::{ChunkOutcome, Coordinator};
use transport::{Endpoint, HttpTransport};

/// The default timeout of a request sent to a worker, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Recover a password from its digest by splitting the search space between workers.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The port of the first worker.
    #[clap(value_parser)]
    start_port: u16,

    /// The port of the last worker. Every port in between is used.
    #[clap(value_parser)]
    end_port: u16,

    /// The digest to attack, in hexadecimal.
    #[clap(value_parser = check_hex)]
    digest: String,

    /// The maximum password length to search.
    #[clap(value_parser = value_parser!(u8).range(1..=MAX_PASSWORD_LENGTH_ALLOWED as i64))]
    max_length: u8,

    /// The hash function of the digest. It must match the one of the workers.
    #[clap(long, default_value_t = HashFunction::Md5)]
    hash: HashFunction,

    /// The address of the workers.
    #[clap(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The number of chunks to split the search space into.
    /// Defaults to the number of workers.
    #[clap(short, long, value_parser = value_parser!(u64).range(1..))]
    chunks: Option<u64>,

    /// How long to wait for a worker to answer, in seconds.
    #[clap(short, long, value_parser = value_parser!(u64).range(1..), default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Send up to this many chunks at the same time instead of one after another.
    /// The first password found wins.
    #[clap(short, long, value_parser = value_parser!(u64).range(1..))]
    parallel: Option<u64>,

    /// Show every request sent to the workers.
    #[clap(short, long)]
    verbose: bool,
}

/// Checks if the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;

    if hex.is_empty() {
        bail!("The digest is empty");
    }

    Ok(hex.to_owned())
}

impl Cli {
    /// Checks the arguments that depend on each other.
    fn validate(self) -> Result<Self, clap::Error> {
        if self.start_port > self.end_port {
            return Err(Cli::command().error(
                ErrorKind::ValueValidation,
                "The start port should not be greater than the end port",
            ));
        }

        if let Err(e) = self.hash.parse_digest(&self.digest) {
            return Err(Cli::command().error(ErrorKind::ValueValidation, e));
        }

        Ok(self)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse().validate().unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let endpoints = (cli.start_port..=cli.end_port)
        .map(|port| Endpoint::new(cli.host, port))
        .collect::<Vec<_>>();
    let transport = HttpTransport::new(Duration::from_secs(cli.timeout))?;

    let mut coordinator = Coordinator::new(
        Arc::new(transport),
        endpoints,
        cli.digest.to_ascii_lowercase(),
        cli.max_length,
    )?;
    if let Some(chunks) = cli.chunks {
        coordinator = coordinator.chunks(chunks as usize);
    }

    let report = match cli.parallel {
        Some(pool_size) => coordinator.run_concurrent(pool_size as usize)?,
        None => coordinator.run()?,
    };

    for chunk_report in &report.chunks {
        let chunk = &chunk_report.chunk;
        let (start, end) = (
            chunk.start_index(),
            chunk.end_index().unwrap_or(chunk.start_index()),
        );

        match &chunk_report.outcome {
            ChunkOutcome::Exhausted { endpoint, message } => {
                println!("Chunk {start}-{end} processed by {endpoint}: {message}")
            }
            ChunkOutcome::Abandoned => eprintln!(
                "No worker could search {start}-{end} after {} attempts, the password may have been missed",
                chunk_report.tried.len()
            ),
            ChunkOutcome::Found { .. } => (),
        }
    }

    match report.found() {
        Some((password, endpoint)) => {
            println!("Password cracked! {password}");
            println!("Found by: {endpoint}");
            println!(
                "Total time to crack: {}",
                report.elapsed.as_secs_f64().human_duration()
            );
        }
        None => println!("Password not found in given range."),
    }

    Ok(())
}
