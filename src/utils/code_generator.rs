//! Short code generation.

use rand::distr::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};

use crate::domain::entities::ShortCode;

/// Default number of symbols in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates random short codes over `[A-Za-z0-9]`.
///
/// Symbols are drawn uniformly from the operating system's cryptographic random
/// source. Generation never checks for collisions; callers detect those with a
/// conditional write.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws a new code of the configured length.
    pub fn generate(&self) -> ShortCode {
        let code: String = OsRng
            .unwrap_err()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();

        ShortCode::new_unchecked(code)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}
