//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-character alphabet. A generated code is
//! only a candidate: uniqueness is enforced by the link store on insert.

use anyhow::{Context, Result};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::sync::{Mutex, PoisonError};

/// Characters a short code is built from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Code length used when none is configured.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Codes shadowed by fixed top-level routes; never handed out.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Produces random fixed-length codes from an injected randomness source.
///
/// The source is behind a mutex so a single generator can be shared by
/// concurrent requests.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use shortify::utils::code_generator::CodeGenerator;
///
/// let generator = CodeGenerator::new(6, StdRng::seed_from_u64(7));
/// assert_eq!(generator.generate().len(), 6);
/// ```
pub struct CodeGenerator {
    length: usize,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl CodeGenerator {
    /// Creates a generator drawing from the given randomness source.
    pub fn new(length: usize, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            length,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Creates a generator seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Fails if the OS randomness source cannot be read. This is a startup
    /// configuration fault, not something to retry per request.
    pub fn from_os_rng(length: usize) -> Result<Self> {
        let rng = StdRng::try_from_os_rng().context("system randomness source is unavailable")?;
        Ok(Self::new(length, rng))
    }

    /// Configured code length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns a new candidate code.
    ///
    /// Reserved codes are redrawn.
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            let code: String = (0..self.length)
                .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
                .collect();

            if !RESERVED_CODES.contains(&code.as_str()) {
                return code;
            }
        }
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Returns true if `code` has the given length and only alphabet characters.
pub fn is_valid_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| ALPHABET.contains(&b))
}
