#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use {
    crate::{AccountKeys, MessageError},
    txwire_address::Address,
    txwire_instruction::{AccountMeta, Instruction},
};

/// A compact encoding of an instruction.
///
/// A `CompiledInstruction` is a component of a multi-instruction [`Message`],
/// which is the core of a transaction. It is created during the construction
/// of `Message`. Most users will not interact with it directly.
///
/// [`Message`]: crate::Message
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CompiledInstruction {
    /// Index into the transaction keys array indicating the program account that executes this instruction.
    pub program_id_index: u8,
    /// Ordered indices into the transaction keys array indicating which accounts to pass to the program.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub accounts: Vec<u8>,
    /// The program input data.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    pub fn new_from_raw_parts(program_id_index: u8, data: Vec<u8>, accounts: Vec<u8>) -> Self {
        Self {
            program_id_index,
            accounts,
            data,
        }
    }

    pub fn program_id<'a>(&self, account_keys: &'a [Address]) -> Option<&'a Address> {
        account_keys.get(usize::from(self.program_id_index))
    }
}

/// Expand compiled instructions back into full instructions.
///
/// `account_flags` reports `(is_signer, is_writable)` for an index into
/// `account_keys`.
pub(crate) fn decompile_instructions(
    instructions: &[CompiledInstruction],
    account_keys: &AccountKeys,
    account_flags: impl Fn(usize) -> (bool, bool),
) -> Result<Vec<Instruction>, MessageError> {
    instructions
        .iter()
        .map(|compiled_ix| {
            let program_id = *account_keys
                .get(usize::from(compiled_ix.program_id_index))
                .ok_or(MessageError::InvalidProgramIdIndex)?;
            let accounts = compiled_ix
                .accounts
                .iter()
                .map(|account_index| {
                    let account_index = usize::from(*account_index);
                    let pubkey = *account_keys
                        .get(account_index)
                        .ok_or(MessageError::InvalidInstructionAccountIndex)?;
                    let (is_signer, is_writable) = account_flags(account_index);
                    Ok(AccountMeta {
                        pubkey,
                        is_signer,
                        is_writable,
                    })
                })
                .collect::<Result<Vec<_>, MessageError>>()?;
            Ok(Instruction {
                program_id,
                accounts,
                data: compiled_ix.data.clone(),
            })
        })
        .collect()
}
