//! Signed transactions and their wire format.
//!
//! A transaction pairs a [`VersionedMessage`] with one signature per required
//! signer. The signatures cover the serialized message and appear in the same
//! order as the signer keys at the front of the message's account list.
//!
//! ```text
//! compact-u16 count, signatures [u8; 64] x count
//! message bytes (legacy or versioned)
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

use {
    log::debug,
    std::{cmp::Ordering, collections::HashMap},
    thiserror::Error,
    txwire_address::Address,
    txwire_hash::Hash,
    txwire_instruction::Instruction,
    txwire_keypair::{SignerError, Signers},
    txwire_message::{legacy, CompileError, MessageError, VersionedMessage},
    txwire_short_vec::{self as short_vec, ShortVecError},
    txwire_signature::{Signature, SIGNATURE_BYTES},
};

/// Errors that can occur when assembling, encoding or decoding a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Message parsing or serialization failed.
    #[error("message error: {0}")]
    Message(#[from] MessageError),
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
    #[error("signer error: {0}")]
    Signer(#[from] SignerError),
    /// No signature was supplied for a required signer.
    #[error("missing signature for {0}")]
    MissingSignature(Address),
    /// Not enough account keys for the required number of signatures.
    #[error("not enough account keys for required signatures")]
    NotEnoughAccountKeys,
    /// Not enough bytes for the expected number of signatures.
    #[error("not enough bytes for signatures")]
    NotEnoughSignatureBytes,
    #[error("invalid signature count: {0}")]
    InvalidSignatureCount(ShortVecError),
    /// Size calculation overflowed.
    #[error("size calculation overflow")]
    Overflow,
    /// Signature count doesn't match num_required_signatures.
    #[error("signature count mismatch: expected {expected}, got {actual}")]
    SignatureCountMismatch {
        /// Expected number of signatures from message header.
        expected: usize,
        /// Actual number of signatures provided.
        actual: usize,
    },
    /// Unexpected trailing data after transaction.
    #[error("unexpected trailing data after transaction")]
    TrailingData,
}

/// A message together with the signatures that authorize it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction signatures, one per required signer.
    /// Order matches the first `num_required_signatures` accounts in the message.
    pub signatures: Vec<Signature>,
    /// The message containing instructions and accounts.
    pub message: VersionedMessage,
}

impl Transaction {
    /// Create a transaction from a message and existing signatures.
    ///
    /// Returns an error if the signature count doesn't match `num_required_signatures`.
    pub fn from_signatures(
        message: VersionedMessage,
        signatures: Vec<Signature>,
    ) -> Result<Self, TransactionError> {
        let expected = usize::from(message.header().num_required_signatures);
        if signatures.len() != expected {
            return Err(TransactionError::SignatureCountMismatch {
                expected,
                actual: signatures.len(),
            });
        }
        Ok(Self {
            signatures,
            message,
        })
    }

    /// Create a transaction with a default signature in every required slot,
    /// to be filled by [`Transaction::try_partial_sign`] or replaced later.
    pub fn new_unsigned(message: VersionedMessage) -> Self {
        let num_required_signatures = usize::from(message.header().num_required_signatures);
        Self {
            signatures: vec![Signature::default(); num_required_signatures],
            message,
        }
    }

    /// The signer keys whose signatures this transaction requires, in slot
    /// order.
    fn required_signer_keys(&self) -> Option<&[Address]> {
        let num_required_signatures = usize::from(self.message.header().num_required_signatures);
        self.message
            .static_account_keys()
            .get(..num_required_signatures)
    }

    /// Sign a message and create a transaction.
    ///
    /// Keypairs can be provided in any order; they will be matched to the
    /// expected signers (first `num_required_signatures` accounts in the message)
    /// by public key.
    pub fn try_sign<T: Signers + ?Sized>(
        message: VersionedMessage,
        keypairs: &T,
    ) -> Result<Self, SignerError> {
        let num_required_signatures = usize::from(message.header().num_required_signatures);
        let expected_signer_keys = message
            .static_account_keys()
            .get(..num_required_signatures)
            .ok_or_else(|| SignerError::InvalidInput("invalid message".to_string()))?;

        let signer_keys = keypairs.try_pubkeys()?;
        match signer_keys.len().cmp(&expected_signer_keys.len()) {
            Ordering::Greater => Err(SignerError::TooManySigners),
            Ordering::Less => Err(SignerError::NotEnoughSigners),
            Ordering::Equal => Ok(()),
        }?;

        let message_data = message.to_bytes().map_err(|err| {
            debug!("failed to serialize message for signing: {err}");
            SignerError::InvalidInput(err.to_string())
        })?;

        // Map expected signers to provided keypair positions
        let signature_indexes: Vec<usize> = expected_signer_keys
            .iter()
            .map(|signer_key| {
                signer_keys
                    .iter()
                    .position(|key| key == signer_key)
                    .ok_or(SignerError::KeypairPubkeyMismatch)
            })
            .collect::<Result<_, SignerError>>()?;

        debug!(
            "signing {} byte message with {} signers",
            message_data.len(),
            signature_indexes.len()
        );

        // Sign and reorder signatures to match expected order
        let unordered_signatures = keypairs.try_sign_message(&message_data)?;
        let signatures = signature_indexes
            .into_iter()
            .map(|index| {
                unordered_signatures
                    .get(index)
                    .copied()
                    .ok_or(SignerError::NotEnoughSigners)
            })
            .collect::<Result<Vec<Signature>, SignerError>>()?;

        Ok(Self {
            signatures,
            message,
        })
    }

    /// Sign with a subset of the required signers, leaving the other slots
    /// untouched.
    ///
    /// Every keypair must be one of the required signers.
    pub fn try_partial_sign<T: Signers + ?Sized>(
        &mut self,
        keypairs: &T,
    ) -> Result<(), SignerError> {
        let expected_signer_keys = self
            .required_signer_keys()
            .ok_or_else(|| SignerError::InvalidInput("invalid message".to_string()))?;
        if self.signatures.len() != expected_signer_keys.len() {
            return Err(SignerError::InvalidInput(
                "signature slots do not match required signers".to_string(),
            ));
        }

        let positions: Vec<usize> = keypairs
            .try_pubkeys()?
            .iter()
            .map(|key| {
                expected_signer_keys
                    .iter()
                    .position(|signer_key| signer_key == key)
                    .ok_or(SignerError::KeypairPubkeyMismatch)
            })
            .collect::<Result<_, SignerError>>()?;

        let message_data = self
            .message
            .to_bytes()
            .map_err(|err| SignerError::InvalidInput(err.to_string()))?;
        let signatures = keypairs.try_sign_message(&message_data)?;
        for (position, signature) in positions.into_iter().zip(signatures) {
            if let Some(slot) = self.signatures.get_mut(position) {
                *slot = signature;
            }
        }
        Ok(())
    }

    /// Assemble a transaction from signatures gathered elsewhere, looking up
    /// each required signer's signature by its key.
    pub fn try_assemble(
        message: VersionedMessage,
        signatures: &HashMap<Address, Signature>,
    ) -> Result<Self, TransactionError> {
        let num_required_signatures = usize::from(message.header().num_required_signatures);
        let signatures = message
            .static_account_keys()
            .get(..num_required_signatures)
            .ok_or(TransactionError::NotEnoughAccountKeys)?
            .iter()
            .map(|key| {
                signatures
                    .get(key)
                    .copied()
                    .ok_or(TransactionError::MissingSignature(*key))
            })
            .collect::<Result<Vec<Signature>, TransactionError>>()?;
        Ok(Self {
            signatures,
            message,
        })
    }

    /// The bytes each signature covers.
    pub fn message_data(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(self.message.to_bytes()?)
    }

    /// Calculate the size of this transaction when serialized.
    pub fn size(&self) -> usize {
        short_vec::encoded_len(self.signatures.len())
            .saturating_add(self.signatures.len().saturating_mul(SIGNATURE_BYTES))
            .saturating_add(self.message.size())
    }

    /// Serialize the transaction to wire format.
    ///
    /// Fails if the number of signatures differs from the number the message
    /// requires.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let expected = usize::from(self.message.header().num_required_signatures);
        if self.signatures.len() != expected {
            debug!(
                "refusing to serialize transaction with {} of {expected} signatures",
                self.signatures.len()
            );
            return Err(TransactionError::SignatureCountMismatch {
                expected,
                actual: self.signatures.len(),
            });
        }

        let message_data = self.message.to_bytes()?;
        let signature_bytes = self
            .signatures
            .len()
            .checked_mul(SIGNATURE_BYTES)
            .ok_or(TransactionError::Overflow)?;
        let mut out = Vec::with_capacity(
            short_vec::MAX_ENCODING_LENGTH
                .saturating_add(signature_bytes)
                .saturating_add(message_data.len()),
        );
        short_vec::append_len(&mut out, self.signatures.len())
            .map_err(TransactionError::InvalidSignatureCount)?;
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_ref());
        }
        out.extend_from_slice(&message_data);
        Ok(out)
    }

    /// Parse a transaction that spans all of `bytes`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        let (tx, consumed) = Self::from_bytes_partial(bytes)?;
        if consumed != bytes.len() {
            return Err(TransactionError::TrailingData);
        }
        Ok(tx)
    }

    /// Parse a transaction from the front of `bytes`, returning it with the
    /// number of bytes consumed.
    ///
    /// The signature count is not checked against the message header; see
    /// [`Transaction::sanitize`].
    pub fn from_bytes_partial(bytes: &[u8]) -> Result<(Self, usize), TransactionError> {
        let (num_signatures, len_size) =
            short_vec::decode_len(bytes).map_err(|err| match err {
                ShortVecError::InsufficientData => TransactionError::NotEnoughSignatureBytes,
                err => TransactionError::InvalidSignatureCount(err),
            })?;
        let signatures_len = num_signatures
            .checked_mul(SIGNATURE_BYTES)
            .ok_or(TransactionError::Overflow)?;
        let message_offset = len_size
            .checked_add(signatures_len)
            .ok_or(TransactionError::Overflow)?;
        let signature_bytes = bytes
            .get(len_size..message_offset)
            .ok_or(TransactionError::NotEnoughSignatureBytes)?;

        let signatures: Vec<Signature> = signature_bytes
            .chunks_exact(SIGNATURE_BYTES)
            .map(Signature::try_from)
            .collect::<Result<_, _>>()
            .map_err(|_| TransactionError::NotEnoughSignatureBytes)?;

        let message_bytes = bytes.get(message_offset..).unwrap_or_default();
        let (message, message_len) = VersionedMessage::from_bytes_partial(message_bytes)?;

        Ok((
            Self {
                signatures,
                message,
            },
            message_offset.saturating_add(message_len),
        ))
    }

    /// Check the signature count against the header, then the message
    /// itself.
    pub fn sanitize(&self) -> Result<(), TransactionError> {
        let expected = usize::from(self.message.header().num_required_signatures);
        if self.signatures.len() != expected {
            return Err(TransactionError::SignatureCountMismatch {
                expected,
                actual: self.signatures.len(),
            });
        }
        self.message.sanitize()?;
        Ok(())
    }

    /// Verify all signatures against the message.
    ///
    /// Returns `true` if all signatures are valid, `false` if any is invalid.
    /// Returns `Err` if the transaction is malformed or cannot be serialized.
    #[cfg(feature = "verify")]
    pub fn verify(&self) -> Result<bool, TransactionError> {
        Ok(self.verify_with_results()?.iter().all(|&valid| valid))
    }

    /// Verify each signature and return individual results.
    ///
    /// Returns a vector of booleans, one per signature, indicating whether
    /// each signature is valid. Returns `Err` if the transaction is malformed
    /// or the message cannot be serialized.
    #[cfg(feature = "verify")]
    pub fn verify_with_results(&self) -> Result<Vec<bool>, TransactionError> {
        let required = usize::from(self.message.header().num_required_signatures);

        // Ensure we verify exactly the signer region, not a subset
        if self.signatures.len() != required {
            return Err(TransactionError::SignatureCountMismatch {
                expected: required,
                actual: self.signatures.len(),
            });
        }
        let signer_keys = self
            .required_signer_keys()
            .ok_or(TransactionError::NotEnoughAccountKeys)?;

        let message_bytes = self.message.to_bytes()?;

        Ok(self
            .signatures
            .iter()
            .zip(signer_keys)
            .map(|(signature, pubkey)| signature.verify(pubkey.as_ref(), &message_bytes))
            .collect())
    }
}

/// Compile `instructions` into a legacy message, sign it and serialize the
/// result.
///
/// A `None` or all-zero `fee_payer` makes the first signer the instructions
/// mention pay the fee.
pub fn create_raw_transaction<T: Signers + ?Sized>(
    fee_payer: Option<&Address>,
    instructions: &[Instruction],
    signers: &T,
    recent_blockhash: Hash,
) -> Result<Vec<u8>, TransactionError> {
    let message = legacy::Message::try_compile(fee_payer, instructions, recent_blockhash)?;
    let transaction = Transaction::try_sign(VersionedMessage::Legacy(message), signers)?;
    transaction.serialize()
}
