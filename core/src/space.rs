//! Bijection between a counter and a password of the search space.
//!
//! Passwords are enumerated by length first, then as base-N numbers whose most
//! significant digit is the first character. For the lowercase charset this
//! gives `a, b, .., z, aa, ab, .., zz, aaa, ..`.

use crate::{
    ctx::SearchSpaceCtx,
    error::{RangecrackError, RangecrackResult},
    Password,
};

/// Returns the number of passwords of length 1 to `max_password_length` over a charset.
/// Returns `None` if the space doesn't fit in a `u64`.
pub fn total_space(charset_len: u64, max_password_length: u8) -> Option<u64> {
    let mut n: u64 = 0;
    let mut power: u64 = 1;

    for _ in 0..max_password_length {
        power = power.checked_mul(charset_len)?;
        n = n.checked_add(power)?;
    }

    Some(n)
}

/// Creates a plaintext from a counter.
pub fn counter_to_plaintext(counter: u64, ctx: &SearchSpaceCtx) -> RangecrackResult<Password> {
    if counter >= ctx.n {
        return Err(RangecrackError::OutOfRange { counter, n: ctx.n });
    }

    // search_spaces[0] is always 0 so a length >= 1 is found
    let len = ctx
        .search_spaces
        .iter()
        .position(|space| counter < *space)
        .ok_or(RangecrackError::OutOfRange { counter, n: ctx.n })?;

    let mut offset = counter - ctx.search_spaces[len - 1];
    let base = ctx.charset.len() as u64;

    let mut plaintext = Password::with_capacity(len);
    for _ in 0..len {
        plaintext.push(charset_to_ascii(offset % base, &ctx.charset));
        offset /= base;
    }
    plaintext.reverse();

    Ok(plaintext)
}

/// Creates a counter from a plaintext.
pub fn plaintext_to_counter(plaintext: &[u8], ctx: &SearchSpaceCtx) -> RangecrackResult<u64> {
    if plaintext.is_empty() || plaintext.len() > ctx.max_password_length as usize {
        return Err(RangecrackError::PasswordLength {
            len: plaintext.len(),
            max: ctx.max_password_length,
        });
    }

    let base = ctx.charset.len() as u64;
    let mut offset = 0;
    for &c in plaintext {
        offset = offset * base + ascii_to_charset(c, &ctx.charset)? as u64;
    }

    Ok(ctx.search_spaces[plaintext.len() - 1] + offset)
}

/// Converts a character from a charset to its ASCII representation.
#[inline]
pub fn charset_to_ascii(n: u64, charset: &[u8]) -> u8 {
    charset[n as usize]
}

/// Converts an ASCII character to the given charset.
#[inline]
pub fn ascii_to_charset(c: u8, charset: &[u8]) -> RangecrackResult<u8> {
    charset
        .iter()
        .position(|x| *x == c)
        .map(|i| i as u8)
        .ok_or(RangecrackError::InvalidCharacter(c as char))
}
