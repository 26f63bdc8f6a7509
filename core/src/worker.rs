use std::sync::Arc;

use crate::{
    cache::{MemoryCache, ResultCache},
    compute::{crack_full, crack_range},
    ctx::SearchSpaceCtx,
    error::RangecrackResult,
    hash::HashFunction,
    messages::{CrackJob, CrackResponse},
};

/// Brute-forces crack jobs and remembers their results.
#[derive(Clone)]
pub struct Worker {
    hash: HashFunction,
    cache: Arc<dyn ResultCache>,
}

impl Worker {
    pub fn new(hash: HashFunction, cache: Arc<dyn ResultCache>) -> Self {
        Self { hash, cache }
    }

    /// Creates a worker with an empty in-memory cache.
    pub fn with_memory_cache(hash: HashFunction) -> Self {
        Self::new(hash, Arc::new(MemoryCache::new()))
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    /// Runs a job, or returns the stored result of an identical job.
    /// The response always echoes the digest as written in `job`.
    /// Blocks until the search is over.
    pub fn crack(&self, job: &CrackJob) -> RangecrackResult<CrackResponse> {
        let key = job.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(digest = %key.digest, range = ?job.range, "Cache hit");
            return Ok(cached.with_hashed_password(&job.hashed_password));
        }

        let ctx = SearchSpaceCtx::with_max_password_length(job.max_length)?;
        let found = match job.range {
            Some((start, end)) => {
                tracing::info!(start, end, max_length = job.max_length, "Searching range");
                crack_range(&ctx, self.hash, &job.target, start, end)
            }
            None => {
                tracing::info!(max_length = job.max_length, "Searching the whole space");
                crack_full(&ctx, self.hash, &job.target)
            }
        };

        let response = match found {
            Some(password) => CrackResponse::Success {
                cleartext_password: String::from_utf8_lossy(&password).into_owned(),
                hashed_password: job.hashed_password.clone(),
            },
            None => CrackResponse::not_found(job),
        };

        self.cache.set(key, response.clone());

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        cache::{CacheKey, MemoryCache, ResultCache},
        hash::HashFunction,
        messages::{CrackRequest, CrackResponse},
        worker::Worker,
    };

    /// Counts the writes going through to a memory cache.
    #[derive(Default)]
    struct CountingCache {
        inner: MemoryCache,
        sets: AtomicUsize,
    }

    impl ResultCache for CountingCache {
        fn get(&self, key: &CacheKey) -> Option<CrackResponse> {
            self.inner.get(key)
        }

        fn set(&self, key: CacheKey, value: CrackResponse) {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value);
        }
    }

    fn hex_md5(password: &[u8]) -> String {
        hex::encode(HashFunction::Md5.digest(password))
    }

    #[test]
    fn test_crack_full() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);
        let job = CrackRequest::full(hex_md5(b"abcd"), 4)
            .validate(HashFunction::Md5)
            .unwrap();

        assert_eq!(Some("abcd"), worker.crack(&job).unwrap().cleartext());
    }

    #[test]
    fn test_crack_range_not_found() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);
        let job = CrackRequest::range(hex_md5(b"ok"), 2, 0, 175)
            .validate(HashFunction::Md5)
            .unwrap();

        assert_eq!(
            CrackResponse::Failed {
                message: "Password not found in range 0-175 up to length 2".to_owned(),
                hashed_password: hex_md5(b"ok"),
            },
            worker.crack(&job).unwrap()
        );
    }

    #[test]
    fn test_identical_requests_are_cached() {
        let cache = Arc::new(CountingCache::default());
        let worker = Worker::new(HashFunction::Md5, cache.clone());
        let job = CrackRequest::range(hex_md5(b"ok"), 2, 352, 526)
            .validate(HashFunction::Md5)
            .unwrap();

        let first = worker.crack(&job).unwrap();
        let second = worker.crack(&job).unwrap();

        assert_eq!(first, second);
        assert_eq!(Some("ok"), second.cleartext());
        assert_eq!(1, cache.sets.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cached_result_is_authoritative() {
        let cache = Arc::new(MemoryCache::new());
        let worker = Worker::new(HashFunction::Md5, cache.clone());
        let job = CrackRequest::range(hex_md5(b"ok"), 2, 0, 701)
            .validate(HashFunction::Md5)
            .unwrap();

        let stored = CrackResponse::Failed {
            message: "stored".to_owned(),
            hashed_password: hex_md5(b"ok"),
        };
        cache.set(job.cache_key(), stored.clone());

        assert_eq!(stored, worker.crack(&job).unwrap());
    }

    #[test]
    fn test_cached_result_echoes_request_digest() {
        let worker = Worker::with_memory_cache(HashFunction::Md5);
        let lower = CrackRequest::range(hex_md5(b"ok"), 2, 352, 526)
            .validate(HashFunction::Md5)
            .unwrap();
        let upper = CrackRequest::range(hex_md5(b"ok").to_uppercase(), 2, 352, 526)
            .validate(HashFunction::Md5)
            .unwrap();

        let first = worker.crack(&upper).unwrap();
        let second = worker.crack(&lower).unwrap();
        let third = worker.crack(&upper).unwrap();

        assert_eq!(
            CrackResponse::Success {
                cleartext_password: "ok".to_owned(),
                hashed_password: hex_md5(b"ok").to_uppercase(),
            },
            first
        );
        assert_eq!(
            CrackResponse::Success {
                cleartext_password: "ok".to_owned(),
                hashed_password: hex_md5(b"ok"),
            },
            second
        );
        assert_eq!(first, third);
    }
}
