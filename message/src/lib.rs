//! Sequences of instructions executed within a single transaction.
//!
//! In this crate, a message is the part of a transaction that signatures
//! cover. It names every account the instructions touch, records which of
//! them sign and which may be written, and fixes a recent blockhash.
//!
//! Two formats exist:
//!
//! - [`legacy::Message`] lists every account key inline.
//! - [`v0::Message`] may load non-signer keys from address lookup tables,
//!   referring to each by a one-byte position in a table.
//!
//! [`compile`] builds either from a list of [`Instruction`]s, and
//! [`VersionedMessage`] reads and writes both encodings.
//!
//! ```
//! use {
//!     txwire_address::Address,
//!     txwire_hash::Hash,
//!     txwire_instruction::{AccountMeta, Instruction},
//!     txwire_message::{compile, VersionedMessage},
//! };
//!
//! let payer = Address::new_from_array([1; 32]);
//! let program_id = Address::new_from_array([2; 32]);
//! let instruction = Instruction::new_with_bytes(
//!     program_id,
//!     &[0],
//!     vec![AccountMeta::new(payer, true)],
//! );
//!
//! let message = compile(Some(&payer), &[instruction], Hash::default(), None).unwrap();
//! assert!(matches!(message, VersionedMessage::Legacy(_)));
//! assert_eq!(message.static_account_keys(), &[payer, program_id]);
//!
//! let bytes = message.to_bytes().unwrap();
//! assert_eq!(VersionedMessage::from_bytes(&bytes).unwrap(), message);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use {txwire_address::Address, txwire_hash::Hash, txwire_instruction::Instruction};

mod account_keys;
mod address_lookup_table_account;
pub mod compiled_instruction;
mod compiled_keys;
mod error;
pub mod legacy;
mod serialization;
#[cfg(test)]
mod test_vectors;
mod versions;

pub use {
    account_keys::AccountKeys,
    address_lookup_table_account::AddressLookupTableAccount,
    compiled_instruction::CompiledInstruction,
    compiled_keys::CompileError,
    error::MessageError,
    legacy::Message,
    versions::{v0, VersionedMessage, MESSAGE_VERSION_PREFIX},
};

/// The length of a message header in bytes.
pub const MESSAGE_HEADER_LENGTH: usize = 3;

/// Describes the organization of a `Message`'s account keys.
///
/// Every [`Instruction`] specifies which accounts it may reference, or
/// otherwise requires specific permissions of. Those specifications are:
/// whether the account is read-only, or read-write; and whether the account
/// must have signed the transaction containing the instruction.
///
/// Whereas individual `Instruction`s contain a list of all accounts they may
/// access, along with their required permissions, a `Message` contains a
/// single shared flat list of _all_ accounts that may be referenced by any
/// instruction in the message. The `MessageHeader` identifies which of those
/// accounts are signers and which are writable:
///
/// - The first `num_required_signatures` keys sign; the last
///   `num_readonly_signed_accounts` of those are read-only.
/// - Of the remaining keys, the last `num_readonly_unsigned_accounts` are
///   read-only.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct MessageHeader {
    /// The number of signatures required for this message to be considered
    /// valid. The signers of those signatures must match the first
    /// `num_required_signatures` of [`Message::account_keys`].
    pub num_required_signatures: u8,

    /// The last `num_readonly_signed_accounts` of the signed keys are read-only
    /// accounts.
    pub num_readonly_signed_accounts: u8,

    /// The last `num_readonly_unsigned_accounts` of the unsigned keys are
    /// read-only accounts.
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    /// Check the header against the number of static account keys it
    /// describes.
    pub(crate) fn sanitize(&self, num_static_account_keys: usize) -> Result<(), MessageError> {
        if self.num_required_signatures == 0 {
            return Err(MessageError::ZeroSigners);
        }
        // the fee payer is the first signer and must be writable
        if self.num_readonly_signed_accounts >= self.num_required_signatures {
            return Err(MessageError::NoWritableFeePayer);
        }
        let num_described_accounts = usize::from(self.num_required_signatures)
            .saturating_add(usize::from(self.num_readonly_unsigned_accounts));
        if num_described_accounts > num_static_account_keys {
            return Err(MessageError::NotEnoughAddressesForSignatures);
        }
        Ok(())
    }
}

/// Compile `instructions` into a message paying fees from `fee_payer`.
///
/// Without a lookup table the result is a legacy message. With one, the
/// result is always a v0 message, even when the table supplies none of the
/// keys. A `None` or all-zero fee payer leaves the first signer to whichever
/// key the instructions mention first.
pub fn compile(
    fee_payer: Option<&Address>,
    instructions: &[Instruction],
    recent_blockhash: Hash,
    address_lookup_table: Option<&AddressLookupTableAccount>,
) -> Result<VersionedMessage, CompileError> {
    match address_lookup_table {
        Some(address_lookup_table) => v0::Message::try_compile(
            fee_payer,
            instructions,
            core::slice::from_ref(address_lookup_table),
            recent_blockhash,
        )
        .map(VersionedMessage::V0),
        None => legacy::Message::try_compile(fee_payer, instructions, recent_blockhash)
            .map(VersionedMessage::Legacy),
    }
}
