//! Types for directing the execution of programs.
//!
//! An [`Instruction`] names the program to run, the accounts it touches and an
//! opaque payload. Instruction builders for individual programs produce these
//! values; the message compiler consumes them.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use {serde::Serialize as SerializePayload, txwire_address::Address, txwire_codec::CodecError};

/// A directive for a single invocation of a program.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Instruction {
    /// Address of the program that executes this instruction.
    pub program_id: Address,
    /// Metadata describing accounts that should be passed to the program.
    pub accounts: Vec<AccountMeta>,
    /// Opaque data passed to the program for its own interpretation.
    pub data: Vec<u8>,
}

impl Instruction {
    /// Create an instruction whose payload is `data` encoded with the fixed
    /// little-endian payload codec.
    ///
    /// Fails only if `data` contains a shape the codec does not support.
    pub fn new_with_codec<T: SerializePayload + ?Sized>(
        program_id: Address,
        data: &T,
        accounts: Vec<AccountMeta>,
    ) -> Result<Self, CodecError> {
        let data = txwire_codec::to_vec(data)?;
        Ok(Self {
            program_id,
            accounts,
            data,
        })
    }

    pub fn new_with_bytes(program_id: Address, data: &[u8], accounts: Vec<AccountMeta>) -> Self {
        Self {
            program_id,
            accounts,
            data: data.to_vec(),
        }
    }
}

/// Describes a single account read or written by a program during instruction
/// execution.
///
/// When an account appears in several instructions of one message its flags
/// are merged, so an account is a signer (or writable) if any reference says
/// so.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct AccountMeta {
    /// An account's address.
    pub pubkey: Address,
    /// True if an `Instruction` requires a `Transaction` signature matching `pubkey`.
    pub is_signer: bool,
    /// True if the account data or metadata may be mutated during program execution.
    pub is_writable: bool,
}

impl AccountMeta {
    /// Construct metadata for a writable account.
    pub fn new(pubkey: Address, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// Construct metadata for a read-only account.
    pub fn new_readonly(pubkey: Address, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}
