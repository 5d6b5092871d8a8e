//! Concrete implementation of an ed25519 keypair.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod signer;

pub use signer::{unique_signers, Signer, SignerError, Signers};
use {
    ed25519_dalek::Signer as DalekSigner,
    thiserror::Error,
    txwire_address::Address,
    txwire_signature::Signature,
};

/// Length of the secret half of a keypair.
pub const SECRET_KEY_LENGTH: usize = 32;
/// Length of the `secret || public` encoding of a keypair.
pub const KEYPAIR_LENGTH: usize = 64;
const MAX_BASE58_KEYPAIR_LEN: usize = 88;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeypairError {
    #[error("keypair must be {KEYPAIR_LENGTH} bytes, got {0}")]
    WrongSize(usize),
    #[error("failed to base58 decode keypair")]
    InvalidBase58,
    #[error("failed to hex decode keypair")]
    InvalidHex,
    /// The public half does not belong to the secret half.
    #[error("public key does not match secret key")]
    PubkeyMismatch,
}

/// A vanilla Ed25519 key pair
#[derive(Debug)]
pub struct Keypair(ed25519_dalek::SigningKey);

impl Keypair {
    /// Constructs a new, random `Keypair` from the thread-local RNG.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::new_from_array(rand::random())
    }

    /// Builds the keypair whose secret key is `secret_key`.
    pub fn new_from_array(secret_key: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&secret_key))
    }

    /// Recovers a `Keypair` from its 64-byte `secret || public` encoding.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        let bytes = <&[u8; KEYPAIR_LENGTH]>::try_from(bytes)
            .map_err(|_| KeypairError::WrongSize(bytes.len()))?;
        ed25519_dalek::SigningKey::from_keypair_bytes(bytes)
            .map(Self)
            .map_err(|_| KeypairError::PubkeyMismatch)
    }

    /// Returns this `Keypair` as a byte array
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.0.to_keypair_bytes()
    }

    /// Recovers a `Keypair` from a base58-encoded string
    pub fn from_base58_string(s: &str) -> Result<Self, KeypairError> {
        if s.len() > MAX_BASE58_KEYPAIR_LEN {
            return Err(KeypairError::InvalidBase58);
        }
        let mut bytes = [0u8; KEYPAIR_LENGTH];
        five8::decode_64(s, &mut bytes).map_err(|_| KeypairError::InvalidBase58)?;
        Self::try_from_bytes(&bytes)
    }

    /// Returns this `Keypair` as a base58-encoded string
    pub fn to_base58_string(&self) -> String {
        let mut out = [0u8; MAX_BASE58_KEYPAIR_LEN];
        let len = five8::encode_64(&self.to_bytes(), &mut out) as usize;
        out[..len].iter().copied().map(char::from).collect()
    }

    /// Recovers a `Keypair` from a hex-encoded string
    pub fn from_hex(s: &str) -> Result<Self, KeypairError> {
        let bytes = hex::decode(s).map_err(|_| KeypairError::InvalidHex)?;
        Self::try_from_bytes(&bytes)
    }

    /// Gets this `Keypair`'s secret key
    pub fn secret_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        self.0.as_bytes()
    }

    /// Allows Keypair cloning
    ///
    /// `Clone` is not implemented so copies of a secret key stay explicit.
    pub fn insecure_clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl Signer for Keypair {
    #[inline]
    fn pubkey(&self) -> Address {
        Address::from(self.0.verifying_key().to_bytes())
    }

    fn try_pubkey(&self) -> Result<Address, SignerError> {
        Ok(self.pubkey())
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::from(self.0.sign(message).to_bytes())
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(self.sign_message(message))
    }
}

impl<T> PartialEq<T> for Keypair
where
    T: Signer,
{
    fn eq(&self, other: &T) -> bool {
        self.pubkey() == other.pubkey()
    }
}

impl TryFrom<&[u8]> for Keypair {
    type Error = KeypairError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_bytes(bytes)
    }
}
