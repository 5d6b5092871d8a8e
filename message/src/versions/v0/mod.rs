//! A future message format that loads some account keys from address lookup
//! tables.
//!
//! A v0 message is a legacy message followed by a list of lookups, each
//! naming a table and the positions in it of the writable and readonly keys
//! to load. Loaded keys are never signers and never invoked programs, so those
//! always stay in the static key list.

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
pub use loaded::LoadedAddresses;
use {
    crate::{
        compiled_instruction::{self, CompiledInstruction},
        compiled_keys::CompiledKeys,
        AccountKeys, AddressLookupTableAccount, CompileError, MessageError, MessageHeader,
    },
    std::collections::HashSet,
    txwire_address::Address,
    txwire_hash::Hash,
    txwire_instruction::Instruction,
};

mod loaded;

/// Address table lookups describe an on-chain address lookup table to use
/// for loading more readonly and writable accounts in a single tx.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct MessageAddressTableLookup {
    /// Address lookup table account key
    pub account_key: Address,
    /// List of indexes used to load writable account addresses
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub writable_indexes: Vec<u8>,
    /// List of indexes used to load readonly account addresses
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub readonly_indexes: Vec<u8>,
}

impl MessageAddressTableLookup {
    /// A lookup that selects nothing; it is dropped from the wire encoding.
    pub fn is_empty(&self) -> bool {
        self.writable_indexes.is_empty() && self.readonly_indexes.is_empty()
    }
}

/// A transaction message which supports loading addresses from lookup tables.
///
/// Instruction indexes address the static keys first, then the writable keys
/// of every lookup in order, then the readonly keys of every lookup in order.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Message {
    /// The message header, identifying signed and read-only `account_keys`.
    /// Header values only describe static `account_keys`, they do not describe
    /// any additional account keys loaded via address table lookups.
    pub header: MessageHeader,

    /// List of accounts loaded by this transaction.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub account_keys: Vec<Address>,

    /// The blockhash of a recent block.
    pub recent_blockhash: Hash,

    /// Instructions that invoke a designated program, are executed in sequence,
    /// and committed in one atomic transaction if all succeed.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub instructions: Vec<CompiledInstruction>,

    /// List of address table lookups used to load additional accounts
    /// for this transaction.
    #[cfg_attr(feature = "serde", serde(with = "txwire_short_vec"))]
    pub address_table_lookups: Vec<MessageAddressTableLookup>,
}

impl Message {
    /// Create a signable transaction message from a `payer` public key,
    /// `recent_blockhash`, list of `instructions`, and a list of
    /// `address_lookup_table_accounts`.
    ///
    /// Tables are consulted in the order given. Each eligible key is taken
    /// from the first table that holds it, and a table that supplies no keys
    /// produces no lookup.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`crate::legacy::Message::try_compile`], fails
    /// with [`CompileError::AddressTableLookupIndexOverflow`] when a key
    /// would be loaded from a table position beyond 255.
    pub fn try_compile(
        payer: Option<&Address>,
        instructions: &[Instruction],
        address_lookup_table_accounts: &[AddressLookupTableAccount],
        recent_blockhash: Hash,
    ) -> Result<Self, CompileError> {
        if instructions.is_empty() {
            return Err(CompileError::NoInstructions);
        }
        let mut compiled_keys = CompiledKeys::compile(instructions, payer);

        let mut address_table_lookups = Vec::with_capacity(address_lookup_table_accounts.len());
        let mut loaded_addresses_list = Vec::with_capacity(address_lookup_table_accounts.len());
        for lookup_table_account in address_lookup_table_accounts {
            if let Some((lookup, loaded_addresses)) =
                compiled_keys.try_extract_table_lookup(lookup_table_account)?
            {
                address_table_lookups.push(lookup);
                loaded_addresses_list.push(loaded_addresses);
            }
        }

        let (header, static_keys) = compiled_keys.try_into_message_components()?;
        let dynamic_keys = loaded_addresses_list.into_iter().collect();
        let account_keys = AccountKeys::new(&static_keys, Some(&dynamic_keys));
        let instructions = account_keys.try_compile_instructions(instructions)?;

        Ok(Self {
            header,
            account_keys: static_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
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

    /// Number of writable keys loaded across all lookups.
    fn num_lookup_writable_keys(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|lookup| lookup.writable_indexes.len())
            .fold(0usize, |acc, len| acc.saturating_add(len))
    }

    /// Number of keys loaded across all lookups.
    fn num_lookup_keys(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|lookup| {
                lookup
                    .writable_indexes
                    .len()
                    .saturating_add(lookup.readonly_indexes.len())
            })
            .fold(0usize, |acc, len| acc.saturating_add(len))
    }

    /// Returns true if the account at the specified index of the combined key
    /// space is writable, judging static keys by the header and loaded keys
    /// by the lookup that loads them.
    pub fn is_writable_index(&self, key_index: usize) -> bool {
        let num_account_keys = self.account_keys.len();
        let num_signed_accounts = usize::from(self.header.num_required_signatures);
        if key_index >= num_account_keys {
            let loaded_addresses_index = key_index.saturating_sub(num_account_keys);
            loaded_addresses_index < self.num_lookup_writable_keys()
        } else if key_index >= num_signed_accounts {
            let num_unsigned_accounts = num_account_keys.saturating_sub(num_signed_accounts);
            let num_writable_unsigned_accounts = num_unsigned_accounts
                .saturating_sub(usize::from(self.header.num_readonly_unsigned_accounts));
            let unsigned_account_index = key_index.saturating_sub(num_signed_accounts);
            unsigned_account_index < num_writable_unsigned_accounts
        } else {
            let num_writable_signed_accounts = num_signed_accounts
                .saturating_sub(usize::from(self.header.num_readonly_signed_accounts));
            key_index < num_writable_signed_accounts
        }
    }

    /// Returns true if the account at the specified index is called as a program by an instruction
    pub fn is_key_called_as_program(&self, key_index: usize) -> bool {
        u8::try_from(key_index).is_ok_and(|key_index| {
            self.instructions
                .iter()
                .any(|ix| ix.program_id_index == key_index)
        })
    }

    /// Returns true if the account at the specified index was requested as
    /// writable. Invoked programs are demoted to readonly.
    pub fn is_maybe_writable(&self, key_index: usize) -> bool {
        self.is_writable_index(key_index) && !self.is_key_called_as_program(key_index)
    }

    pub fn signer_keys(&self) -> Vec<&Address> {
        let last_key = self
            .account_keys
            .len()
            .min(usize::from(self.header.num_required_signatures));
        self.account_keys[..last_key].iter().collect()
    }

    /// Check that the header, static keys, lookups and instruction indexes
    /// agree. Lookup table contents are not needed.
    pub fn sanitize(&self) -> Result<(), MessageError> {
        let num_static_account_keys = self.account_keys.len();
        self.header.sanitize(num_static_account_keys)?;

        let mut uniq = HashSet::with_capacity(num_static_account_keys);
        if self.account_keys.iter().any(|key| !uniq.insert(key)) {
            return Err(MessageError::DuplicateAccountKey);
        }

        if self.address_table_lookups.iter().any(|lookup| lookup.is_empty()) {
            return Err(MessageError::EmptyAddressTableLookup);
        }

        let total_account_keys = num_static_account_keys.saturating_add(self.num_lookup_keys());
        if total_account_keys > usize::from(u8::MAX).saturating_add(1) {
            return Err(MessageError::TooManyAccountsReferenced);
        }

        for ix in &self.instructions {
            let program_id_index = usize::from(ix.program_id_index);
            // programs can't be loaded from lookup tables and the fee payer
            // can't be invoked
            if program_id_index == 0 || program_id_index >= num_static_account_keys {
                return Err(MessageError::InvalidProgramIdIndex);
            }
            if ix
                .accounts
                .iter()
                .any(|index| usize::from(*index) >= total_account_keys)
            {
                return Err(MessageError::InvalidInstructionAccountIndex);
            }
        }
        Ok(())
    }

    /// Resolve every lookup against `address_lookup_table_accounts`.
    ///
    /// Writable keys of all lookups come first, in lookup order, followed by
    /// readonly keys, matching the combined index space.
    pub fn try_load_addresses(
        &self,
        address_lookup_table_accounts: &[AddressLookupTableAccount],
    ) -> Result<LoadedAddresses, MessageError> {
        self.address_table_lookups
            .iter()
            .map(|lookup| {
                let table = address_lookup_table_accounts
                    .iter()
                    .find(|table| table.key == lookup.account_key)
                    .ok_or(MessageError::LookupTableNotProvided(lookup.account_key))?;
                let resolve = |indexes: &[u8]| -> Result<Vec<Address>, MessageError> {
                    indexes
                        .iter()
                        .map(|index| {
                            table.addresses.get(usize::from(*index)).copied().ok_or(
                                MessageError::AddressNotInLookupTable {
                                    table: table.key,
                                    index: *index,
                                },
                            )
                        })
                        .collect()
                };
                Ok(LoadedAddresses {
                    writable: resolve(&lookup.writable_indexes)?,
                    readonly: resolve(&lookup.readonly_indexes)?,
                })
            })
            .collect::<Result<Vec<_>, MessageError>>()
            .map(|loaded| loaded.into_iter().collect())
    }

    /// Rebuild the instructions this message was compiled from, loading
    /// looked-up keys from `address_lookup_table_accounts`.
    pub fn decompile_instructions(
        &self,
        address_lookup_table_accounts: &[AddressLookupTableAccount],
    ) -> Result<Vec<Instruction>, MessageError> {
        let loaded_addresses = self.try_load_addresses(address_lookup_table_accounts)?;
        let account_keys = AccountKeys::new(&self.account_keys, Some(&loaded_addresses));
        compiled_instruction::decompile_instructions(&self.instructions, &account_keys, |index| {
            (self.is_signer(index), self.is_writable_index(index))
        })
    }
}
