use crate::{
    error::{RangecrackError, RangecrackResult},
    DEFAULT_CHARSET, DEFAULT_MAX_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH_ALLOWED,
};

/// A builder for a search space context.
#[derive(Clone)]
pub struct SearchSpaceCtxBuilder {
    charset: Vec<u8>,
    max_password_length: u8,
}

impl Default for SearchSpaceCtxBuilder {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.to_owned(),
            max_password_length: DEFAULT_MAX_PASSWORD_LENGTH,
        }
    }
}

impl SearchSpaceCtxBuilder {
    /// Creates a new SearchSpaceCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the charset of the context.
    /// The order of the characters defines the enumeration order of the space.
    pub fn charset(mut self, charset: &[u8]) -> Self {
        self.charset = charset.to_owned();

        self
    }

    /// Sets the maximum password length of the context.
    pub fn max_password_length(mut self, max_password_length: u8) -> Self {
        self.max_password_length = max_password_length;

        self
    }

    /// Builds a SearchSpaceCtx with the specified parameters.
    pub fn build(self) -> RangecrackResult<SearchSpaceCtx> {
        if self.max_password_length == 0
            || self.max_password_length > MAX_PASSWORD_LENGTH_ALLOWED as u8
        {
            return Err(RangecrackError::PasswordLength {
                len: self.max_password_length as usize,
                max: MAX_PASSWORD_LENGTH_ALLOWED as u8,
            });
        }

        let mut seen = [false; 128];
        for &c in &self.charset {
            if !c.is_ascii() || seen[c as usize] {
                return Err(RangecrackError::Charset);
            }
            seen[c as usize] = true;
        }

        if self.charset.is_empty() {
            return Err(RangecrackError::Charset);
        }

        // create the search spaces, the empty password is not part of the space
        let mut n: u128 = 0;
        let mut power: u128 = 1;
        let mut search_spaces = vec![0];

        for _ in 0..self.max_password_length {
            power *= self.charset.len() as u128;
            n += power;
            search_spaces.push(n);
        }

        // make sure the search space is <= 2^64
        if n > u64::MAX as u128 {
            return Err(RangecrackError::Space((n as f64).log2().ceil() as u8));
        }

        Ok(SearchSpaceCtx {
            search_spaces: search_spaces.into_iter().map(|space| space as u64).collect(),
            n: n as u64,
            charset: self.charset,
            max_password_length: self.max_password_length,
        })
    }
}

/// Context describing a bounded search space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSpaceCtx {
    /// The charset used.
    pub charset: Vec<u8>,
    /// The maximum password length.
    pub max_password_length: u8,
    /// The size of the total search space.
    pub n: u64,
    /// `search_spaces[i]` is the number of passwords shorter than or equal to `i`.
    /// Passwords of length `i` start at the counter `search_spaces[i - 1]`.
    pub search_spaces: Vec<u64>,
}

impl SearchSpaceCtx {
    /// Creates a context over the default charset.
    pub fn with_max_password_length(max_password_length: u8) -> RangecrackResult<Self> {
        SearchSpaceCtxBuilder::new()
            .max_password_length(max_password_length)
            .build()
    }
}

#[cfg(test)]
pub fn build_test_ctx() -> SearchSpaceCtx {
    SearchSpaceCtxBuilder::new()
        .charset(b"abc")
        .max_password_length(3)
        .build()
        .unwrap()
}
