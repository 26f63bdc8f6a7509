//! Distributed brute-force of password digests.
//!
//! The search space (every password from length 1 to a maximum length over a
//! charset) is numbered with counters, so it can be split into contiguous
//! chunks that independent workers search in parallel.

pub mod cache;
pub mod compute;
pub mod ctx;
pub mod error;
pub mod hash;
pub mod messages;
pub mod scheduling;
pub mod space;
pub mod worker;

pub use {
    cache::{CacheKey, MemoryCache, ResultCache},
    ctx::{SearchSpaceCtx, SearchSpaceCtxBuilder},
    error::{RangecrackError, RangecrackResult},
    hash::HashFunction,
    messages::{CrackJob, CrackRequest, CrackResponse, ErrorResponse},
    scheduling::{partition, Chunk, ChunkIterator},
    worker::Worker,
};

/// The default maximum password length.
pub const DEFAULT_MAX_PASSWORD_LENGTH: u8 = 4;

/// The default charset.
pub const DEFAULT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// The maximum password size allowed.
pub const MAX_PASSWORD_LENGTH_ALLOWED: usize = 10;

/// An ASCII password.
pub type Password = Vec<u8>;

/// A digest stored in a vector of bytes.
pub type Digest = Vec<u8>;
