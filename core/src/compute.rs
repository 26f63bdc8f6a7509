//! Multithreaded brute-force over the search space.

use rayon::prelude::*;

use crate::{ctx::SearchSpaceCtx, hash::HashFunction, space::counter_to_plaintext, Password};

/// Searches the whole space for a password producing `target`.
pub fn crack_full(ctx: &SearchSpaceCtx, hash: HashFunction, target: &[u8]) -> Option<Password> {
    if ctx.n == 0 {
        return None;
    }

    crack_range(ctx, hash, target, 0, ctx.n - 1)
}

/// Searches the counters `start..=end` for a password producing `target`.
/// Counters past the end of the space are skipped.
/// If several passwords match, the one with the lowest counter is returned.
pub fn crack_range(
    ctx: &SearchSpaceCtx,
    hash: HashFunction,
    target: &[u8],
    start: u64,
    end: u64,
) -> Option<Password> {
    if start >= ctx.n || start > end {
        return None;
    }
    let end = end.min(ctx.n - 1);

    (start..=end).into_par_iter().find_map_first(|counter| {
        let plaintext = counter_to_plaintext(counter, ctx).ok()?;
        (hash.digest(&plaintext) == target).then_some(plaintext)
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        compute::{crack_full, crack_range},
        ctx::SearchSpaceCtx,
        hash::HashFunction,
        space::plaintext_to_counter,
    };

    #[test]
    fn test_crack_full() {
        let ctx = SearchSpaceCtx::with_max_password_length(4).unwrap();
        let target = HashFunction::Md5.digest(b"abcd");

        assert_eq!(
            Some(b"abcd".to_vec()),
            crack_full(&ctx, HashFunction::Md5, &target)
        );
    }

    #[test]
    fn test_crack_full_not_found() {
        let ctx = SearchSpaceCtx::with_max_password_length(2).unwrap();
        let target = HashFunction::Md5.digest(b"abc");

        assert_eq!(None, crack_full(&ctx, HashFunction::Md5, &target));
    }

    #[test]
    fn test_crack_range() {
        let ctx = SearchSpaceCtx::with_max_password_length(2).unwrap();
        let target = HashFunction::Md5.digest(b"ok");
        let counter = plaintext_to_counter(b"ok", &ctx).unwrap();

        assert_eq!(
            Some(b"ok".to_vec()),
            crack_range(&ctx, HashFunction::Md5, &target, counter, counter)
        );
        assert_eq!(
            Some(b"ok".to_vec()),
            crack_range(&ctx, HashFunction::Md5, &target, 352, 526)
        );
        assert_eq!(
            None,
            crack_range(&ctx, HashFunction::Md5, &target, 0, counter - 1)
        );
        assert_eq!(
            None,
            crack_range(&ctx, HashFunction::Md5, &target, counter + 1, 701)
        );
    }

    #[test]
    fn test_crack_range_past_the_space() {
        let ctx = SearchSpaceCtx::with_max_password_length(2).unwrap();
        let target = HashFunction::Md5.digest(b"zz");

        // the end overshoots the space, the valid part is still searched
        assert_eq!(
            Some(b"zz".to_vec()),
            crack_range(&ctx, HashFunction::Md5, &target, 600, 10_000)
        );
        assert_eq!(
            None,
            crack_range(&ctx, HashFunction::Md5, &target, 702, 10_000)
        );
    }

    #[test]
    fn test_crack_other_hash() {
        let ctx = SearchSpaceCtx::with_max_password_length(3).unwrap();
        let target = HashFunction::Sha2_256.digest(b"dog");

        assert_eq!(
            Some(b"dog".to_vec()),
            crack_full(&ctx, HashFunction::Sha2_256, &target)
        );
    }
}
