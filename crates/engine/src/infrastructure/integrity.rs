//! Tamper-evident signing for client-held game state.
//!
//! The full game state travels to the client and back on every turn, so the
//! server cannot trust what comes in. Each outgoing state is tagged with an
//! HMAC-SHA256 over its canonical encoding; incoming states must present a
//! tag that verifies under one of the configured keys. The tag proves the
//! state was produced by this server, not that it is secret.

use hmac::{Hmac, Mac};
use lockroom_domain::{canonical_bytes, GameState};
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Required key length in bytes.
pub const STATE_KEY_LEN: usize = 32;

/// Errors from signing or verifying a state tag.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("State tag is missing")]
    MissingTag,

    #[error("State tag does not match the supplied state")]
    TagMismatch,

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("State could not be encoded for signing: {0}")]
    Encoding(String),
}

/// A secret key for state tags.
#[derive(Clone)]
pub struct StateKey([u8; STATE_KEY_LEN]);

impl StateKey {
    /// Parse a key from a hex string. The key must decode to exactly
    /// [`STATE_KEY_LEN`] bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, AuthError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| AuthError::InvalidKey(format!("not valid hex: {e}")))?;
        let bytes: [u8; STATE_KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            AuthError::InvalidKey(format!(
                "expected {} bytes, got {}",
                STATE_KEY_LEN,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Generate a fresh random key.
    ///
    /// States signed with a generated key stop verifying when the process
    /// restarts, so deployments that must survive restarts should configure
    /// keys explicitly.
    pub fn generate() -> Self {
        let mut bytes = [0u8; STATE_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Keys never appear in logs or error output.
impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateKey(..)")
    }
}

/// Signs outgoing states and verifies incoming ones.
///
/// Holds one active key plus any number of previous keys. New tags are
/// always produced with the active key; verification accepts a tag from any
/// configured key, which lets deployments rotate keys without invalidating
/// states already in flight.
#[derive(Debug, Clone)]
pub struct StateSigner {
    active: StateKey,
    previous: Vec<StateKey>,
}

impl StateSigner {
    pub fn new(active: StateKey) -> Self {
        Self {
            active,
            previous: Vec::new(),
        }
    }

    pub fn with_previous(mut self, keys: Vec<StateKey>) -> Self {
        self.previous = keys;
        self
    }

    /// Compute the hex tag for a state using the active key.
    pub fn sign(&self, state: &GameState) -> Result<String, AuthError> {
        let bytes = encode(state)?;
        let mut mac = new_mac(&self.active)?;
        mac.update(&bytes);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check a tag against a state.
    ///
    /// The tag must verify under the active key or one of the previous
    /// keys. Comparison is constant-time.
    pub fn verify(&self, state: &GameState, tag: Option<&str>) -> Result<(), AuthError> {
        let tag = tag.ok_or(AuthError::MissingTag)?;
        let supplied = hex::decode(tag.trim()).map_err(|_| AuthError::TagMismatch)?;
        let bytes = encode(state)?;

        for key in std::iter::once(&self.active).chain(self.previous.iter()) {
            let mut mac = new_mac(key)?;
            mac.update(&bytes);
            if mac.verify_slice(&supplied).is_ok() {
                return Ok(());
            }
        }

        Err(AuthError::TagMismatch)
    }
}

fn encode(state: &GameState) -> Result<Vec<u8>, AuthError> {
    canonical_bytes(state).map_err(|e| AuthError::Encoding(e.to_string()))
}

fn new_mac(key: &StateKey) -> Result<HmacSha256, AuthError> {
    HmacSha256::new_from_slice(key.as_bytes()).map_err(|e| AuthError::InvalidKey(e.to_string()))
}
