//! Splits the search space between workers and collects the first password found.

use std::{
    iter,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use rangecrack_core::{
    space::total_space, Chunk, ChunkIterator, CrackRequest, CrackResponse, DEFAULT_CHARSET,
};

use crate::transport::{Endpoint, Transport};

/// What happened to a chunk once it left the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// A worker found the password in this chunk.
    Found { password: String, endpoint: Endpoint },
    /// A worker searched the whole chunk without finding the password.
    Exhausted { endpoint: Endpoint, message: String },
    /// No worker could be reached for this chunk. It is never retried.
    Abandoned,
}

/// The history of a single chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkReport {
    pub chunk: Chunk,
    /// The endpoints the chunk was sent to, in order.
    pub tried: Vec<Endpoint>,
    pub outcome: ChunkOutcome,
}

/// The result of a whole run.
#[derive(Debug)]
pub struct CrackReport {
    /// The reports of the chunks that were dispatched, in completion order.
    pub chunks: Vec<ChunkReport>,
    pub elapsed: Duration,
}

impl CrackReport {
    /// Returns the password and the endpoint that found it.
    pub fn found(&self) -> Option<(&str, &Endpoint)> {
        self.chunks.iter().find_map(|report| match &report.outcome {
            ChunkOutcome::Found { password, endpoint } => Some((password.as_str(), endpoint)),
            _ => None,
        })
    }
}

/// Dispatches the chunks of a search space to a list of workers.
#[derive(Clone)]
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    endpoints: Arc<[Endpoint]>,
    hashed_password: String,
    max_length: u8,
    chunk_count: usize,
}

impl Coordinator {
    /// Creates a coordinator splitting the space in as many chunks as there are endpoints.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Vec<Endpoint>,
        hashed_password: impl Into<String>,
        max_length: u8,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            bail!("At least one worker endpoint is needed");
        }

        Ok(Self {
            transport,
            chunk_count: endpoints.len(),
            endpoints: endpoints.into(),
            hashed_password: hashed_password.into(),
            max_length,
        })
    }

    /// Sets the number of chunks. Chunks are assigned to the endpoints in a round-robin fashion.
    pub fn chunks(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;

        self
    }

    /// Splits the search space. Empty chunks are left out.
    pub fn plan(&self) -> Result<Vec<Chunk>> {
        let total = total_space(DEFAULT_CHARSET.len() as u64, self.max_length)
            .context("The search space is too big")?;

        let chunks = ChunkIterator::new(total, self.chunk_count)?
            .filter(|chunk| !chunk.is_empty())
            .collect();

        Ok(chunks)
    }

    /// Sends the chunks one after another and stops at the first password found.
    pub fn run(&self) -> Result<CrackReport> {
        let start_time = Instant::now();
        let chunks = self.plan()?;
        tracing::info!(
            "Searching {} chunks on {} workers",
            chunks.len(),
            self.endpoints.len()
        );

        let mut reports = Vec::new();
        for chunk in chunks {
            let report = self.dispatch(chunk);
            let is_found = matches!(report.outcome, ChunkOutcome::Found { .. });
            reports.push(report);

            if is_found {
                break;
            }
        }

        Ok(CrackReport {
            chunks: reports,
            elapsed: start_time.elapsed(),
        })
    }

    /// Sends all the chunks at once, at most `pool_size` at a time, and returns as soon as
    /// a password is found. Requests already sent keep running on their workers.
    pub fn run_concurrent(&self, pool_size: usize) -> Result<CrackReport> {
        let start_time = Instant::now();
        let chunks = self.plan()?;
        let chunk_count = chunks.len();
        tracing::info!(
            "Searching {} chunks on {} workers, {} at a time",
            chunk_count,
            self.endpoints.len(),
            pool_size
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(pool_size)
            .build()
            .context("Unable to create the dispatch pool")?;
        let (sender, receiver) = crossbeam_channel::unbounded();
        let done = Arc::new(AtomicBool::new(false));

        for chunk in chunks {
            let coordinator = self.clone();
            let sender = sender.clone();
            let done = done.clone();

            pool.spawn(move || {
                // chunks still waiting for a thread are dropped once the password is found
                if done.load(Ordering::Relaxed) {
                    return;
                }
                let _ = sender.send(coordinator.dispatch(chunk));
            });
        }
        drop(sender);

        let mut reports = Vec::new();
        for report in receiver.iter().take(chunk_count) {
            let is_found = matches!(report.outcome, ChunkOutcome::Found { .. });
            reports.push(report);

            if is_found {
                done.store(true, Ordering::Relaxed);
                break;
            }
        }

        Ok(CrackReport {
            chunks: reports,
            elapsed: start_time.elapsed(),
        })
    }

    /// Sends a chunk to its assigned endpoint, then to every other endpoint in order
    /// until one of them answers.
    fn dispatch(&self, chunk: Chunk) -> ChunkReport {
        let request = self.request(&chunk);
        let assigned = &self.endpoints[chunk.number % self.endpoints.len()];
        let mut tried: Vec<Endpoint> = Vec::new();

        let outcome = iter::once(assigned)
            .chain(self.endpoints.iter())
            .find_map(|endpoint| {
                if tried.contains(endpoint) {
                    return None;
                }
                if !tried.is_empty() {
                    tracing::info!(chunk = chunk.number, %endpoint, "Retrying chunk");
                }
                tried.push(endpoint.clone());

                tracing::debug!(
                    chunk = chunk.number,
                    start = chunk.start_index(),
                    end = ?chunk.end_index(),
                    %endpoint,
                    "Dispatching chunk"
                );

                match self.transport.crack(endpoint, &request) {
                    Ok(response) => Some(self.outcome(&chunk, endpoint, response)),
                    Err(e) => {
                        tracing::warn!(chunk = chunk.number, %endpoint, "{}", e);
                        None
                    }
                }
            })
            .unwrap_or_else(|| {
                tracing::error!(
                    chunk = chunk.number,
                    start = chunk.start_index(),
                    end = ?chunk.end_index(),
                    "Every worker failed, abandoning the chunk"
                );
                ChunkOutcome::Abandoned
            });

        ChunkReport {
            chunk,
            tried,
            outcome,
        }
    }

    fn outcome(&self, chunk: &Chunk, endpoint: &Endpoint, response: CrackResponse) -> ChunkOutcome {
        match response {
            CrackResponse::Success {
                cleartext_password, ..
            } => {
                tracing::info!(chunk = chunk.number, %endpoint, "Password found");
                ChunkOutcome::Found {
                    password: cleartext_password,
                    endpoint: endpoint.clone(),
                }
            }
            CrackResponse::Failed { message, .. } => {
                tracing::info!(chunk = chunk.number, %endpoint, "{}", message);
                ChunkOutcome::Exhausted {
                    endpoint: endpoint.clone(),
                    message,
                }
            }
        }
    }

    fn request(&self, chunk: &Chunk) -> CrackRequest {
        // empty chunks are never dispatched
        let end = chunk.end_index().unwrap_or(chunk.start_index());

        CrackRequest::range(
            self.hashed_password.clone(),
            self.max_length,
            chunk.start_index(),
            end,
        )
    }
}
