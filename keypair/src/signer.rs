//! Abstraction over anything able to produce an ed25519 signature.

use {thiserror::Error, txwire_address::Address, txwire_signature::Signature};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("keypair-pubkey mismatch")]
    KeypairPubkeyMismatch,

    #[error("not enough signers")]
    NotEnoughSigners,

    #[error("too many signers")]
    TooManySigners,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("custom error: {0}")]
    Custom(String),
}

/// The `Signer` trait declares operations that all digital signature providers
/// must support.
pub trait Signer {
    /// Infallibly gets the implementor's public key. Returns the all-zeros
    /// address if the implementor has none.
    fn pubkey(&self) -> Address {
        self.try_pubkey().unwrap_or_default()
    }

    /// Fallibly gets the implementor's public key.
    fn try_pubkey(&self) -> Result<Address, SignerError>;

    /// Infallibly produces an ed25519 signature over `message`. Returns the
    /// all-zeros signature if signing is not possible.
    fn sign_message(&self, message: &[u8]) -> Signature {
        self.try_sign_message(message).unwrap_or_default()
    }

    /// Fallibly produces an ed25519 signature over `message`.
    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

impl<T: Signer + ?Sized> Signer for &T {
    fn pubkey(&self) -> Address {
        (**self).pubkey()
    }

    fn try_pubkey(&self) -> Result<Address, SignerError> {
        (**self).try_pubkey()
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        (**self).sign_message(message)
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        (**self).try_sign_message(message)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn pubkey(&self) -> Address {
        (**self).pubkey()
    }

    fn try_pubkey(&self) -> Result<Address, SignerError> {
        (**self).try_pubkey()
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        (**self).sign_message(message)
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        (**self).try_sign_message(message)
    }
}

/// A collection of signers, signed over the same message in one call.
pub trait Signers {
    fn pubkeys(&self) -> Vec<Address>;
    fn try_pubkeys(&self) -> Result<Vec<Address>, SignerError>;
    fn sign_message(&self, message: &[u8]) -> Vec<Signature>;
    fn try_sign_message(&self, message: &[u8]) -> Result<Vec<Signature>, SignerError>;
}

impl<T: Signer> Signers for [T] {
    fn pubkeys(&self) -> Vec<Address> {
        self.iter().map(|keypair| keypair.pubkey()).collect()
    }

    fn try_pubkeys(&self) -> Result<Vec<Address>, SignerError> {
        self.iter().map(|keypair| keypair.try_pubkey()).collect()
    }

    fn sign_message(&self, message: &[u8]) -> Vec<Signature> {
        self.iter()
            .map(|keypair| keypair.sign_message(message))
            .collect()
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Vec<Signature>, SignerError> {
        self.iter()
            .map(|keypair| keypair.try_sign_message(message))
            .collect()
    }
}

impl<T: Signer, const N: usize> Signers for [T; N] {
    fn pubkeys(&self) -> Vec<Address> {
        self[..].pubkeys()
    }

    fn try_pubkeys(&self) -> Result<Vec<Address>, SignerError> {
        self[..].try_pubkeys()
    }

    fn sign_message(&self, message: &[u8]) -> Vec<Signature> {
        Signers::sign_message(&self[..], message)
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Vec<Signature>, SignerError> {
        Signers::try_sign_message(&self[..], message)
    }
}

impl<T: Signer> Signers for Vec<T> {
    fn pubkeys(&self) -> Vec<Address> {
        self[..].pubkeys()
    }

    fn try_pubkeys(&self) -> Result<Vec<Address>, SignerError> {
        self[..].try_pubkeys()
    }

    fn sign_message(&self, message: &[u8]) -> Vec<Signature> {
        Signers::sign_message(&self[..], message)
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Vec<Signature>, SignerError> {
        Signers::try_sign_message(&self[..], message)
    }
}

/// Returns true if every signer's key is distinct.
pub fn unique_signers<T: Signers + ?Sized>(signers: &T) -> bool {
    let mut pubkeys = signers.pubkeys();
    let len = pubkeys.len();
    pubkeys.sort();
    pubkeys.dedup();
    pubkeys.len() == len
}
