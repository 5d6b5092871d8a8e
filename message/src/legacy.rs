//! The original and current message format.
//!
//! A legacy message carries every account key it references inline, so it
//! is limited to the keys that fit alongside its instructions in one
//! transaction. See [`crate::v0`] for the format that can load keys from
//! address lookup tables.

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use {
    crate::{
        compiled_instruction::{self, CompiledInstruction},
        compiled_keys::CompiledKeys,
        AccountKeys, CompileError, MessageError, MessageHeader,
    },
    std::collections::HashSet,
    txwire_address::Address,
    txwire_hash::Hash,
    txwire_instruction::Instruction,
};

/// A transaction message in the legacy format.
///
/// Account keys are ordered in four groups: writable signers, readonly
/// signers, writable non-signers and readonly non-signers. The
/// [`MessageHeader`] records the size of each group so that a key's
/// permissions follow from its position alone.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Message {
    /// The message header, identifying signed and read-only `account_keys`.
    pub header: MessageHeader,

    /// All the account keys used by this transaction.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub account_keys: Vec<Address>,

    /// The id of a recent ledger entry.
    pub recent_blockhash: Hash,

    /// Programs that will be executed in sequence and committed in one atomic transaction if all
    /// succeed.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Create a message from instructions, a fee payer and a recent blockhash.
    ///
    /// The fee payer becomes the first account key and is always a writable
    /// signer. Passing `None` (or the all-zero address) leaves the keys in
    /// the order the instructions first mention them.
    ///
    /// # Errors
    ///
    /// Fails with [`CompileError::NoInstructions`] when `instructions` is
    /// empty, and with [`CompileError::AccountIndexOverflow`] when more than
    /// 256 distinct keys are referenced.
    pub fn try_compile(
        payer: Option<&Address>,
        instructions: &[Instruction],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        if instructions.is_empty() {
            return Err(CompileError::NoInstructions);
        }
        let compiled_keys = CompiledKeys::compile(instructions, payer);
        let (header, account_keys) = compiled_keys.try_into_message_components()?;
        let instructions =
            AccountKeys::new(&account_keys, None).try_compile_instructions(instructions)?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// Returns the fee payer, the first signer, if there is one.
    pub fn fee_payer(&self) -> Option<&Address> {
        if self.header.num_required_signatures == 0 {
            return None;
        }
        self.account_keys.first()
    }

    /// Returns true if the account at the specified index signs this message.
    pub fn is_signer(&self, index: usize) -> bool {
        index < usize::from(self.header.num_required_signatures)
    }

    /// Returns true if the account at the specified index falls in one of the
    /// writable groups of the header.
    pub fn is_writable_index(&self, i: usize) -> bool {
        let num_required_signatures = usize::from(self.header.num_required_signatures);
        let num_readonly_signed = usize::from(self.header.num_readonly_signed_accounts);
        let num_readonly_unsigned = usize::from(self.header.num_readonly_unsigned_accounts);
        i < num_required_signatures.saturating_sub(num_readonly_signed)
            || (i >= num_required_signatures
                && i < self
                    .account_keys
                    .len()
                    .saturating_sub(num_readonly_unsigned))
    }

    /// Returns true if the account at the specified index is the program of
    /// any instruction.
    pub fn is_key_called_as_program(&self, key_index: usize) -> bool {
        u8::try_from(key_index).is_ok_and(|key_index| {
            self.instructions
                .iter()
                .any(|ix| ix.program_id_index == key_index)
        })
    }

    /// Returns true if the account at the specified index may be written.
    ///
    /// Invoked programs are demoted to readonly even when the header places
    /// them in a writable group.
    pub fn is_maybe_writable(&self, i: usize) -> bool {
        self.is_writable_index(i) && !self.is_key_called_as_program(i)
    }

    pub fn signer_keys(&self) -> Vec<&Address> {
        let last_key = self
            .account_keys
            .len()
            .min(usize::from(self.header.num_required_signatures));
        self.account_keys[..last_key].iter().collect()
    }

    /// Returns `true` if `account_keys` has any duplicate keys.
    pub fn has_duplicates(&self) -> bool {
        let mut uniq = HashSet::with_capacity(self.account_keys.len());
        self.account_keys.iter().any(|key| !uniq.insert(key))
    }

    /// Check that the header, account keys and instruction indexes agree.
    pub fn sanitize(&self) -> Result<(), MessageError> {
        self.header.sanitize(self.account_keys.len())?;
        if self.account_keys.len() > usize::from(u8::MAX).saturating_add(1) {
            return Err(MessageError::TooManyAccountsReferenced);
        }
        if self.has_duplicates() {
            return Err(MessageError::DuplicateAccountKey);
        }

        for ix in &self.instructions {
            let program_id_index = usize::from(ix.program_id_index);
            // the fee payer can't be invoked
            if program_id_index == 0 || program_id_index >= self.account_keys.len() {
                return Err(MessageError::InvalidProgramIdIndex);
            }
            if ix
                .accounts
                .iter()
                .any(|index| usize::from(*index) >= self.account_keys.len())
            {
                return Err(MessageError::InvalidInstructionAccountIndex);
            }
        }
        Ok(())
    }

    /// Rebuild the instructions this message was compiled from.
    ///
    /// Account permissions come from the header, so a key that was merged
    /// across instructions reports the union of its flags in each of them.
    pub fn decompile_instructions(&self) -> Result<Vec<Instruction>, MessageError> {
        let account_keys = AccountKeys::new(&self.account_keys, None);
        compiled_instruction::decompile_instructions(&self.instructions, &account_keys, |index| {
            (self.is_signer(index), self.is_writable_index(index))
        })
    }
}
