//! Random identifier generation.
//!
//! Session, device and access-token ids use the long hyphenated form, user
//! ids the short form. All ids are lowercase alphanumeric.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Segment lengths of a long-form id (`8-4-4-4-12`).
const LONG_SEGMENTS: [usize; 5] = [8, 4, 4, 4, 12];
const SHORT_LEN: usize = 22;
const DEFAULT_LEN: usize = 40;

/// Shape of a generated identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdShape {
    /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
    Long,
    /// 22 characters, no separators.
    Short,
    /// 40 characters, no separators.
    Default,
}

/// Produces random identifiers of fixed shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityGenerator;

impl IdentityGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate an id of the given shape using the thread-local RNG.
    pub fn generate(&self, shape: IdShape) -> String {
        let mut rng = rand::rng();
        Self::generate_with(&mut rng, shape)
    }

    /// Generate an id of the given shape from an explicit RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, shape: IdShape) -> String {
        match shape {
            IdShape::Long => LONG_SEGMENTS
                .iter()
                .map(|len| random_chars(rng, *len))
                .collect::<Vec<_>>()
                .join("-"),
            IdShape::Short => random_chars(rng, SHORT_LEN),
            IdShape::Default => random_chars(rng, DEFAULT_LEN),
        }
    }

    pub fn long_id(&self) -> String {
        self.generate(IdShape::Long)
    }

    pub fn short_id(&self) -> String {
        self.generate(IdShape::Short)
    }
}

fn random_chars<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
