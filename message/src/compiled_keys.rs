use {
    crate::{
        v0::{LoadedAddresses, MessageAddressTableLookup},
        AddressLookupTableAccount, MessageHeader,
    },
    log::trace,
    std::collections::{hash_map::Entry, HashMap},
    thiserror::Error,
    txwire_address::Address,
    txwire_instruction::Instruction,
};

/// A helper struct to collect pubkeys compiled for a set of instructions
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledKeys {
    payer: Option<Address>,
    ordered_keys: Vec<Address>,
    key_meta_map: HashMap<Address, CompiledKeyMeta>,
}

#[derive(PartialEq, Debug, Error, Eq, Clone)]
pub enum CompileError {
    #[error("message has no instructions")]
    NoInstructions,
    #[error("account index overflowed during compilation")]
    AccountIndexOverflow,
    #[error("address lookup table index overflowed during compilation")]
    AddressTableLookupIndexOverflow,
    #[error("encountered unknown account key `{0}` during instruction compilation")]
    UnknownInstructionKey(Address),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct CompiledKeyMeta {
    is_signer: bool,
    is_writable: bool,
    is_invoked: bool,
}

impl CompiledKeys {
    /// Compiles the pubkeys referenced by a list of instructions and organizes by
    /// signer/non-signer and writable/readonly.
    ///
    /// An all-zero payer is treated as no payer at all.
    pub(crate) fn compile(instructions: &[Instruction], payer: Option<&Address>) -> Self {
        let payer = payer.copied().filter(|payer| !payer.is_zeroed());
        let mut compiled_keys = Self {
            payer,
            ..Self::default()
        };
        for ix in instructions {
            compiled_keys.meta_mut(ix.program_id).is_invoked = true;
            for account_meta in &ix.accounts {
                let meta = compiled_keys.meta_mut(account_meta.pubkey);
                meta.is_signer |= account_meta.is_signer;
                meta.is_writable |= account_meta.is_writable;
            }
        }
        if let Some(payer) = payer {
            let meta = compiled_keys.meta_mut(payer);
            meta.is_signer = true;
            meta.is_writable = true;
        }
        compiled_keys
    }

    fn meta_mut(&mut self, key: Address) -> &mut CompiledKeyMeta {
        match self.key_meta_map.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.ordered_keys.push(key);
                entry.insert(CompiledKeyMeta::default())
            }
        }
    }

    /// Keys other than the payer whose meta passes `filter`, in the order
    /// they were first encountered.
    fn filtered_keys<'a>(
        &'a self,
        filter: impl Fn(&CompiledKeyMeta) -> bool + 'a,
    ) -> impl Iterator<Item = Address> + 'a {
        self.ordered_keys
            .iter()
            .filter(move |key| Some(**key) != self.payer)
            .filter(move |key| self.key_meta_map.get(*key).is_some_and(&filter))
            .copied()
    }

    pub(crate) fn try_into_message_components(
        self,
    ) -> Result<(MessageHeader, Vec<Address>), CompileError> {
        let try_into_u8 = |num: usize| -> Result<u8, CompileError> {
            u8::try_from(num).map_err(|_| CompileError::AccountIndexOverflow)
        };

        let writable_signer_keys: Vec<Address> = self
            .payer
            .into_iter()
            .chain(self.filtered_keys(|meta| meta.is_signer && meta.is_writable))
            .collect();
        let readonly_signer_keys: Vec<Address> = self
            .filtered_keys(|meta| meta.is_signer && !meta.is_writable)
            .collect();
        let writable_non_signer_keys: Vec<Address> = self
            .filtered_keys(|meta| !meta.is_signer && meta.is_writable)
            .collect();
        let readonly_non_signer_keys: Vec<Address> = self
            .filtered_keys(|meta| !meta.is_signer && !meta.is_writable)
            .collect();

        let signers_len = writable_signer_keys
            .len()
            .saturating_add(readonly_signer_keys.len());

        let header = MessageHeader {
            num_required_signatures: try_into_u8(signers_len)?,
            num_readonly_signed_accounts: try_into_u8(readonly_signer_keys.len())?,
            num_readonly_unsigned_accounts: try_into_u8(readonly_non_signer_keys.len())?,
        };

        trace!(
            "compiled {} static keys: {} writable signers, {} readonly signers, {} writable, {} readonly",
            signers_len
                .saturating_add(writable_non_signer_keys.len())
                .saturating_add(readonly_non_signer_keys.len()),
            writable_signer_keys.len(),
            readonly_signer_keys.len(),
            writable_non_signer_keys.len(),
            readonly_non_signer_keys.len(),
        );

        let static_account_keys = std::iter::empty()
            .chain(writable_signer_keys)
            .chain(readonly_signer_keys)
            .chain(writable_non_signer_keys)
            .chain(readonly_non_signer_keys)
            .collect();

        Ok((header, static_account_keys))
    }

    /// Moves every eligible key found in `lookup_table_account` out of the
    /// static set. Signers and invoked programs always stay static.
    ///
    /// Returns `None` when the table holds none of the remaining keys.
    pub(crate) fn try_extract_table_lookup(
        &mut self,
        lookup_table_account: &AddressLookupTableAccount,
    ) -> Result<Option<(MessageAddressTableLookup, LoadedAddresses)>, CompileError> {
        let (writable_indexes, drained_writable_keys) = self
            .try_drain_keys_found_in_lookup_table(&lookup_table_account.addresses, |meta| {
                !meta.is_signer && !meta.is_invoked && meta.is_writable
            })?;
        let (readonly_indexes, drained_readonly_keys) = self
            .try_drain_keys_found_in_lookup_table(&lookup_table_account.addresses, |meta| {
                !meta.is_signer && !meta.is_invoked && !meta.is_writable
            })?;

        // Don't extract lookup if no keys were found
        if writable_indexes.is_empty() && readonly_indexes.is_empty() {
            return Ok(None);
        }

        trace!(
            "lookup table {} resolves {} writable and {} readonly keys",
            lookup_table_account.key,
            writable_indexes.len(),
            readonly_indexes.len(),
        );

        Ok(Some((
            MessageAddressTableLookup {
                account_key: lookup_table_account.key,
                writable_indexes,
                readonly_indexes,
            },
            LoadedAddresses {
                writable: drained_writable_keys,
                readonly: drained_readonly_keys,
            },
        )))
    }

    /// Drained keys come back sorted by their position in the table.
    fn try_drain_keys_found_in_lookup_table(
        &mut self,
        lookup_table_addresses: &[Address],
        key_meta_filter: impl Fn(&CompiledKeyMeta) -> bool,
    ) -> Result<(Vec<u8>, Vec<Address>), CompileError> {
        let mut found = Vec::new();
        for key in self.filtered_keys(&key_meta_filter) {
            if let Some(position) = lookup_table_addresses
                .iter()
                .position(|address| *address == key)
            {
                let index = u8::try_from(position)
                    .map_err(|_| CompileError::AddressTableLookupIndexOverflow)?;
                found.push((index, key));
            }
        }
        found.sort_by_key(|(index, _)| *index);

        for (_, key) in &found {
            self.key_meta_map.remove(key);
        }
        let key_meta_map = &self.key_meta_map;
        self.ordered_keys.retain(|key| key_meta_map.contains_key(key));

        Ok(found.into_iter().unzip())
    }
}
