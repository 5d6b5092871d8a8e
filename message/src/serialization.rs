//! Wire encoding of legacy and v0 messages.
//!
//! # Binary Format
//!
//! ```text
//! legacy:       header (3 x u8)
//!               compact-u16 count, account keys [u8; 32] x count
//!               recent blockhash [u8; 32]
//!               compact-u16 count, instructions x count
//!
//! v0:           0x80, then the legacy layout
//!               compact-u16 count, address table lookups x count
//!
//! instruction:  program id index (u8)
//!               compact-u16 count, account indexes (u8) x count
//!               compact-u16 count, data (u8) x count
//!
//! lookup:       table key [u8; 32]
//!               compact-u16 count, writable indexes (u8) x count
//!               compact-u16 count, readonly indexes (u8) x count
//! ```
//!
//! Signatures are not part of the message; the transaction places them in
//! front of it.

use {
    crate::{
        compiled_instruction::CompiledInstruction,
        legacy::Message as LegacyMessage,
        v0::{self, MessageAddressTableLookup},
        MessageError, MessageHeader, VersionedMessage, MESSAGE_HEADER_LENGTH,
        MESSAGE_VERSION_PREFIX,
    },
    txwire_address::{Address, ADDRESS_BYTES},
    txwire_hash::{Hash, HASH_BYTES},
    txwire_short_vec::{self as short_vec, ShortVecError},
};

/// Read a fixed-size array from a byte slice at the given offset.
fn read_at<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], MessageError> {
    let end = offset.checked_add(N).ok_or(MessageError::BufferTooSmall)?;
    bytes
        .get(offset..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(MessageError::BufferTooSmall)
}

/// Read a compact length at `offset`, returning it with its encoded size.
fn read_compact_len(bytes: &[u8], offset: usize) -> Result<(usize, usize), MessageError> {
    let remaining = bytes.get(offset..).ok_or(MessageError::BufferTooSmall)?;
    short_vec::decode_len(remaining).map_err(|err| match err {
        ShortVecError::InsufficientData => MessageError::BufferTooSmall,
        err => MessageError::InvalidCompactLength(err),
    })
}

/// Read a length-prefixed byte string, returning it with the offset just past
/// its end.
fn read_compact_bytes(bytes: &[u8], offset: usize) -> Result<(Vec<u8>, usize), MessageError> {
    let (len, len_size) = read_compact_len(bytes, offset)?;
    let start = offset.saturating_add(len_size);
    let end = start.checked_add(len).ok_or(MessageError::BufferTooSmall)?;
    let data = bytes.get(start..end).ok_or(MessageError::BufferTooSmall)?;
    Ok((data.to_vec(), end))
}

fn append_compact_len(
    bytes: &mut Vec<u8>,
    len: usize,
    too_large: MessageError,
) -> Result<(), MessageError> {
    short_vec::append_len(bytes, len).map_err(|_| too_large)
}

/// Size of a length-prefixed run of `len` items of `item_size` bytes.
fn compact_run_size(len: usize, item_size: usize) -> usize {
    short_vec::encoded_len(len).saturating_add(len.saturating_mul(item_size))
}

/// Fields shared by every message version, in wire order.
struct MessageBody {
    header: MessageHeader,
    account_keys: Vec<Address>,
    recent_blockhash: Hash,
    instructions: Vec<CompiledInstruction>,
}

fn body_size(account_keys: &[Address], instructions: &[CompiledInstruction]) -> usize {
    let instructions_size = instructions
        .iter()
        .map(|ix| {
            1usize
                .saturating_add(compact_run_size(ix.accounts.len(), 1))
                .saturating_add(compact_run_size(ix.data.len(), 1))
        })
        .fold(0usize, |acc, size| acc.saturating_add(size));

    MESSAGE_HEADER_LENGTH
        .saturating_add(compact_run_size(account_keys.len(), ADDRESS_BYTES))
        .saturating_add(HASH_BYTES)
        .saturating_add(short_vec::encoded_len(instructions.len()))
        .saturating_add(instructions_size)
}

fn write_body(
    bytes: &mut Vec<u8>,
    header: &MessageHeader,
    account_keys: &[Address],
    recent_blockhash: &Hash,
    instructions: &[CompiledInstruction],
) -> Result<(), MessageError> {
    bytes.push(header.num_required_signatures);
    bytes.push(header.num_readonly_signed_accounts);
    bytes.push(header.num_readonly_unsigned_accounts);

    append_compact_len(bytes, account_keys.len(), MessageError::TooManyAccountKeys)?;
    for key in account_keys {
        bytes.extend_from_slice(key.as_ref());
    }

    bytes.extend_from_slice(recent_blockhash.as_ref());

    append_compact_len(bytes, instructions.len(), MessageError::TooManyInstructions)?;
    for ix in instructions {
        bytes.push(ix.program_id_index);
        append_compact_len(
            bytes,
            ix.accounts.len(),
            MessageError::InstructionAccountsTooLarge,
        )?;
        bytes.extend_from_slice(&ix.accounts);
        append_compact_len(bytes, ix.data.len(), MessageError::InstructionDataTooLarge)?;
        bytes.extend_from_slice(&ix.data);
    }
    Ok(())
}

fn read_body(bytes: &[u8], mut offset: usize) -> Result<(MessageBody, usize), MessageError> {
    let [num_required_signatures, num_readonly_signed_accounts, num_readonly_unsigned_accounts] =
        read_at::<MESSAGE_HEADER_LENGTH>(bytes, offset)?;
    offset = offset.saturating_add(MESSAGE_HEADER_LENGTH);
    let header = MessageHeader {
        num_required_signatures,
        num_readonly_signed_accounts,
        num_readonly_unsigned_accounts,
    };

    let (num_account_keys, len_size) = read_compact_len(bytes, offset)?;
    offset = offset.saturating_add(len_size);
    // check the whole run up front so a bogus count can't drive the allocation
    let account_keys_size = num_account_keys
        .checked_mul(ADDRESS_BYTES)
        .ok_or(MessageError::BufferTooSmall)?;
    if bytes.len() < offset.saturating_add(account_keys_size) {
        return Err(MessageError::BufferTooSmall);
    }
    let mut account_keys = Vec::with_capacity(num_account_keys);
    for _ in 0..num_account_keys {
        account_keys.push(Address::new_from_array(read_at(bytes, offset)?));
        offset = offset.saturating_add(ADDRESS_BYTES);
    }

    let recent_blockhash = Hash::new_from_array(read_at(bytes, offset)?);
    offset = offset.saturating_add(HASH_BYTES);

    let (num_instructions, len_size) = read_compact_len(bytes, offset)?;
    offset = offset.saturating_add(len_size);
    let mut instructions = Vec::new();
    for _ in 0..num_instructions {
        let [program_id_index] = read_at::<1>(bytes, offset)?;
        offset = offset.saturating_add(1);
        let (accounts, next) = read_compact_bytes(bytes, offset)?;
        let (data, next) = read_compact_bytes(bytes, next)?;
        offset = next;
        instructions.push(CompiledInstruction {
            program_id_index,
            accounts,
            data,
        });
    }

    Ok((
        MessageBody {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        },
        offset,
    ))
}

fn read_address_table_lookups(
    bytes: &[u8],
    mut offset: usize,
) -> Result<(Vec<MessageAddressTableLookup>, usize), MessageError> {
    // a v0 message that ends after its instructions has no lookups
    if offset == bytes.len() {
        return Ok((Vec::new(), offset));
    }

    let (num_lookups, len_size) = read_compact_len(bytes, offset)?;
    offset = offset.saturating_add(len_size);
    let mut lookups = Vec::new();
    for _ in 0..num_lookups {
        let account_key = Address::new_from_array(read_at(bytes, offset)?);
        offset = offset.saturating_add(ADDRESS_BYTES);
        let (writable_indexes, next) = read_compact_bytes(bytes, offset)?;
        let (readonly_indexes, next) = read_compact_bytes(bytes, next)?;
        offset = next;
        lookups.push(MessageAddressTableLookup {
            account_key,
            writable_indexes,
            readonly_indexes,
        });
    }
    Ok((lookups, offset))
}

impl LegacyMessage {
    /// Calculate the size of this message in bytes.
    pub fn size(&self) -> usize {
        body_size(&self.account_keys, &self.instructions)
    }

    /// Serialize this legacy message to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        let mut bytes = Vec::with_capacity(self.size());
        write_body(
            &mut bytes,
            &self.header,
            &self.account_keys,
            &self.recent_blockhash,
            &self.instructions,
        )?;
        Ok(bytes)
    }

    /// Deserialize a legacy message that spans all of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let (message, bytes_consumed) = Self::from_bytes_partial(bytes)?;
        if bytes_consumed != bytes.len() {
            return Err(MessageError::TrailingData);
        }
        Ok(message)
    }

    /// Deserialize a legacy message from the front of `bytes`, returning it
    /// with the number of bytes consumed.
    pub fn from_bytes_partial(bytes: &[u8]) -> Result<(Self, usize), MessageError> {
        if bytes
            .first()
            .is_some_and(|first| first & MESSAGE_VERSION_PREFIX != 0)
        {
            return Err(MessageError::UnexpectedVersionPrefix);
        }
        let (body, offset) = read_body(bytes, 0)?;
        Ok((
            Self {
                header: body.header,
                account_keys: body.account_keys,
                recent_blockhash: body.recent_blockhash,
                instructions: body.instructions,
            },
            offset,
        ))
    }
}

impl v0::Message {
    /// Calculate the size of this message in bytes, including the version
    /// prefix. Lookups that select nothing are not counted.
    pub fn size(&self) -> usize {
        let lookups: Vec<&MessageAddressTableLookup> = self
            .address_table_lookups
            .iter()
            .filter(|lookup| !lookup.is_empty())
            .collect();
        let lookups_size = lookups
            .iter()
            .map(|lookup| {
                ADDRESS_BYTES
                    .saturating_add(compact_run_size(lookup.writable_indexes.len(), 1))
                    .saturating_add(compact_run_size(lookup.readonly_indexes.len(), 1))
            })
            .fold(0usize, |acc, size| acc.saturating_add(size));

        1usize
            .saturating_add(body_size(&self.account_keys, &self.instructions))
            .saturating_add(short_vec::encoded_len(lookups.len()))
            .saturating_add(lookups_size)
    }

    /// Serialize this v0 message to bytes.
    ///
    /// Lookups with no writable and no readonly indexes are left out.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        let mut bytes = Vec::with_capacity(self.size());
        bytes.push(MESSAGE_VERSION_PREFIX);
        write_body(
            &mut bytes,
            &self.header,
            &self.account_keys,
            &self.recent_blockhash,
            &self.instructions,
        )?;

        let lookups: Vec<&MessageAddressTableLookup> = self
            .address_table_lookups
            .iter()
            .filter(|lookup| !lookup.is_empty())
            .collect();
        append_compact_len(
            &mut bytes,
            lookups.len(),
            MessageError::TooManyAddressTableLookups,
        )?;
        for lookup in lookups {
            bytes.extend_from_slice(lookup.account_key.as_ref());
            append_compact_len(
                &mut bytes,
                lookup.writable_indexes.len(),
                MessageError::AddressTableLookupTooLarge,
            )?;
            bytes.extend_from_slice(&lookup.writable_indexes);
            append_compact_len(
                &mut bytes,
                lookup.readonly_indexes.len(),
                MessageError::AddressTableLookupTooLarge,
            )?;
            bytes.extend_from_slice(&lookup.readonly_indexes);
        }
        Ok(bytes)
    }

    /// Deserialize a v0 message that spans all of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let (message, bytes_consumed) = Self::from_bytes_partial(bytes)?;
        if bytes_consumed != bytes.len() {
            return Err(MessageError::TrailingData);
        }
        Ok(message)
    }

    /// Deserialize a v0 message from the front of `bytes`, returning it with
    /// the number of bytes consumed. The input must start with `0x80`.
    ///
    /// The lookup section may be absent entirely, which reads as no lookups.
    pub fn from_bytes_partial(bytes: &[u8]) -> Result<(Self, usize), MessageError> {
        let [prefix] = read_at::<1>(bytes, 0)?;
        if prefix & MESSAGE_VERSION_PREFIX == 0 {
            return Err(MessageError::MissingVersionPrefix);
        }
        let version = prefix & !MESSAGE_VERSION_PREFIX;
        if version != 0 {
            return Err(MessageError::UnsupportedVersion(version));
        }

        let (body, offset) = read_body(bytes, 1)?;
        let (address_table_lookups, offset) = read_address_table_lookups(bytes, offset)?;
        Ok((
            Self {
                header: body.header,
                account_keys: body.account_keys,
                recent_blockhash: body.recent_blockhash,
                instructions: body.instructions,
                address_table_lookups,
            },
            offset,
        ))
    }
}

impl VersionedMessage {
    /// Calculate the size of this message in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Legacy(message) => message.size(),
            Self::V0(message) => message.size(),
        }
    }

    /// Serialize this message to bytes in the encoding of its version.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        match self {
            Self::Legacy(message) => message.to_bytes(),
            Self::V0(message) => message.to_bytes(),
        }
    }

    /// Deserialize a message of any supported version that spans all of
    /// `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        let (message, bytes_consumed) = Self::from_bytes_partial(bytes)?;
        if bytes_consumed != bytes.len() {
            return Err(MessageError::TrailingData);
        }
        Ok(message)
    }

    /// Deserialize a message of any supported version from the front of
    /// `bytes`, returning it with the number of bytes consumed.
    ///
    /// The high bit of the first byte selects the encoding: clear means a
    /// legacy message, set means a versioned one whose low seven bits give
    /// the version.
    pub fn from_bytes_partial(bytes: &[u8]) -> Result<(Self, usize), MessageError> {
        let [first] = read_at::<1>(bytes, 0)?;
        if first & MESSAGE_VERSION_PREFIX == 0 {
            return LegacyMessage::from_bytes_partial(bytes)
                .map(|(message, consumed)| (Self::Legacy(message), consumed));
        }
        match first & !MESSAGE_VERSION_PREFIX {
            0 => v0::Message::from_bytes_partial(bytes)
                .map(|(message, consumed)| (Self::V0(message), consumed)),
            version => Err(MessageError::UnsupportedVersion(version)),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_vectors::{self, LEGACY_TRANSFER, V0_NO_LOOKUPS, V0_ONE_LOOKUP, V0_TWO_LOOKUPS},
        proptest::prelude::*,
    };

    #[test]
    fn test_legacy_byte_layout() {
        let message = test_vectors::legacy_transfer();
        let bytes = message.to_bytes().unwrap();
        assert_eq!(bytes, LEGACY_TRANSFER);
        assert_eq!(message.size(), bytes.len());

        // header, then three keys
        assert_eq!(&bytes[..4], &[1, 0, 1, 3]);
        assert_eq!(&bytes[4..36], message.account_keys[0].as_ref());
        let blockhash_offset = 4 + 3 * ADDRESS_BYTES;
        assert_eq!(
            &bytes[blockhash_offset..blockhash_offset + HASH_BYTES],
            message.recent_blockhash.as_ref()
        );
        // one instruction: program 2, accounts [0, 1], 12 bytes of data
        assert_eq!(
            &bytes[blockhash_offset + HASH_BYTES..blockhash_offset + HASH_BYTES + 6],
            &[1, 2, 2, 0, 1, 12]
        );
    }

    #[test]
    fn test_v0_byte_layout() {
        for (message, expected) in [
            (test_vectors::v0_no_lookups(), V0_NO_LOOKUPS),
            (test_vectors::v0_one_lookup(), V0_ONE_LOOKUP),
            (test_vectors::v0_two_lookups(), V0_TWO_LOOKUPS),
        ] {
            let bytes = message.to_bytes().unwrap();
            assert_eq!(bytes, expected);
            assert_eq!(message.size(), bytes.len());
            assert_eq!(bytes[0], MESSAGE_VERSION_PREFIX);
        }
    }

    #[test]
    fn test_v0_skips_empty_lookups() {
        let mut message = test_vectors::v0_no_lookups();
        message
            .address_table_lookups
            .push(MessageAddressTableLookup {
                account_key: test_vectors::lookup_table(vec![]).key,
                writable_indexes: vec![],
                readonly_indexes: vec![],
            });
        assert_eq!(message.to_bytes().unwrap(), V0_NO_LOOKUPS);
        assert_eq!(message.size(), V0_NO_LOOKUPS.len());
    }

    #[test]
    fn test_versioned_from_bytes() {
        assert_eq!(
            VersionedMessage::from_bytes(LEGACY_TRANSFER).unwrap(),
            VersionedMessage::Legacy(test_vectors::legacy_transfer())
        );
        assert_eq!(
            VersionedMessage::from_bytes(V0_NO_LOOKUPS).unwrap(),
            VersionedMessage::V0(test_vectors::v0_no_lookups())
        );
        assert_eq!(
            VersionedMessage::from_bytes(V0_ONE_LOOKUP).unwrap(),
            VersionedMessage::V0(test_vectors::v0_one_lookup())
        );
        assert_eq!(
            VersionedMessage::from_bytes(V0_TWO_LOOKUPS).unwrap(),
            VersionedMessage::V0(test_vectors::v0_two_lookups())
        );
    }

    #[test]
    fn test_v0_without_lookup_section() {
        let bytes = &V0_NO_LOOKUPS[..V0_NO_LOOKUPS.len() - 1];
        assert_eq!(
            v0::Message::from_bytes(bytes).unwrap(),
            test_vectors::v0_no_lookups()
        );
    }

    #[test]
    fn test_version_prefix_checks() {
        assert_eq!(
            VersionedMessage::from_bytes(&[]),
            Err(MessageError::BufferTooSmall)
        );
        assert_eq!(
            VersionedMessage::from_bytes(&[MESSAGE_VERSION_PREFIX]),
            Err(MessageError::BufferTooSmall)
        );

        let mut bytes = V0_NO_LOOKUPS.to_vec();
        bytes[0] = MESSAGE_VERSION_PREFIX | 1;
        assert_eq!(
            VersionedMessage::from_bytes(&bytes),
            Err(MessageError::UnsupportedVersion(1))
        );
        assert_eq!(
            v0::Message::from_bytes(&bytes),
            Err(MessageError::UnsupportedVersion(1))
        );
        bytes[0] = 0xff;
        assert_eq!(
            VersionedMessage::from_bytes(&bytes),
            Err(MessageError::UnsupportedVersion(127))
        );

        assert_eq!(
            LegacyMessage::from_bytes(V0_NO_LOOKUPS),
            Err(MessageError::UnexpectedVersionPrefix)
        );
        assert_eq!(
            v0::Message::from_bytes(LEGACY_TRANSFER),
            Err(MessageError::MissingVersionPrefix)
        );
    }

    #[test]
    fn test_trailing_data() {
        let mut bytes = LEGACY_TRANSFER.to_vec();
        bytes.push(0);
        assert_eq!(
            VersionedMessage::from_bytes(&bytes),
            Err(MessageError::TrailingData)
        );
        let (message, consumed) = VersionedMessage::from_bytes_partial(&bytes).unwrap();
        assert_eq!(consumed, LEGACY_TRANSFER.len());
        assert_eq!(message, VersionedMessage::Legacy(test_vectors::legacy_transfer()));

        let mut bytes = V0_TWO_LOOKUPS.to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        assert_eq!(
            v0::Message::from_bytes(&bytes),
            Err(MessageError::TrailingData)
        );
        assert_eq!(
            v0::Message::from_bytes_partial(&bytes).unwrap().1,
            V0_TWO_LOOKUPS.len()
        );
    }

    #[test]
    fn test_every_truncation_fails() {
        for len in 0..LEGACY_TRANSFER.len() {
            assert_eq!(
                VersionedMessage::from_bytes(&LEGACY_TRANSFER[..len]),
                Err(MessageError::BufferTooSmall),
                "truncated to {len}"
            );
        }

        // cutting exactly before the lookup section leaves a valid message
        let mut without_lookups = test_vectors::v0_two_lookups();
        without_lookups.address_table_lookups.clear();
        let lookups_offset = without_lookups.size() - 1;
        for len in 0..V0_TWO_LOOKUPS.len() {
            let result = VersionedMessage::from_bytes(&V0_TWO_LOOKUPS[..len]);
            if len == lookups_offset {
                let VersionedMessage::V0(message) = result.unwrap() else {
                    panic!("expected a v0 message");
                };
                assert!(message.address_table_lookups.is_empty());
            } else {
                assert_eq!(result, Err(MessageError::BufferTooSmall), "truncated to {len}");
            }
        }
    }

    #[test]
    fn test_invalid_compact_length() {
        // account key count with a redundant zero group
        let mut bytes = vec![1, 0, 0, 0x80, 0x00];
        bytes.extend_from_slice(&[0; 64]);
        assert_eq!(
            VersionedMessage::from_bytes(&bytes),
            Err(MessageError::InvalidCompactLength(ShortVecError::Alias))
        );
    }

    #[test]
    fn test_oversized_counts_fail_before_allocating() {
        // claims 0x3fff account keys but carries none
        let bytes = [1, 0, 0, 0xff, 0x7f];
        assert_eq!(
            VersionedMessage::from_bytes(&bytes),
            Err(MessageError::BufferTooSmall)
        );
    }

    #[test]
    fn test_serialize_limits() {
        let mut message = test_vectors::legacy_transfer();
        message.instructions[0].data = vec![0; usize::from(u16::MAX) + 1];
        assert_eq!(
            message.to_bytes(),
            Err(MessageError::InstructionDataTooLarge)
        );

        let mut message = test_vectors::legacy_transfer();
        message.instructions[0].accounts = vec![0; usize::from(u16::MAX) + 1];
        assert_eq!(
            message.to_bytes(),
            Err(MessageError::InstructionAccountsTooLarge)
        );

        let mut message = test_vectors::v0_one_lookup();
        message.address_table_lookups[0].readonly_indexes = vec![0; usize::from(u16::MAX) + 1];
        assert_eq!(
            message.to_bytes(),
            Err(MessageError::AddressTableLookupTooLarge)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_layout_matches_wire_format() {
        let message = test_vectors::legacy_transfer();
        assert_eq!(
            txwire_codec::to_vec(&message).unwrap(),
            message.to_bytes().unwrap()
        );
        assert_eq!(
            bincode::serialize(&message).unwrap(),
            message.to_bytes().unwrap()
        );
        assert_eq!(
            txwire_codec::from_bytes::<LegacyMessage>(LEGACY_TRANSFER).unwrap(),
            message
        );

        // the v0 serde form is the body without the version prefix
        let message = test_vectors::v0_two_lookups();
        assert_eq!(
            bincode::serialize(&message).unwrap(),
            &V0_TWO_LOOKUPS[1..]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(test_vectors::v0_one_lookup()).unwrap();
        assert_eq!(json["header"]["numRequiredSignatures"], 1);
        assert!(json.get("recentBlockhash").is_some());
        // compact-prefixed vectors keep their length item in front
        assert_eq!(json["addressTableLookups"][0], serde_json::json!([1]));
        assert_eq!(
            json["addressTableLookups"][1]["writableIndexes"],
            serde_json::json!([[1], 1])
        );
        assert_eq!(
            json["addressTableLookups"][1]["readonlyIndexes"],
            serde_json::json!([[0]])
        );
    }

    fn arb_address() -> impl Strategy<Value = Address> {
        any::<[u8; 32]>().prop_map(Address::new_from_array)
    }

    fn arb_instruction() -> impl Strategy<Value = CompiledInstruction> {
        (
            any::<u8>(),
            proptest::collection::vec(any::<u8>(), 0..8),
            proptest::collection::vec(any::<u8>(), 0..200),
        )
            .prop_map(|(program_id_index, accounts, data)| CompiledInstruction {
                program_id_index,
                accounts,
                data,
            })
    }

    fn arb_lookup() -> impl Strategy<Value = MessageAddressTableLookup> {
        (
            arb_address(),
            proptest::collection::vec(any::<u8>(), 1..4),
            proptest::collection::vec(any::<u8>(), 0..4),
        )
            .prop_map(|(account_key, writable_indexes, readonly_indexes)| {
                MessageAddressTableLookup {
                    account_key,
                    writable_indexes,
                    readonly_indexes,
                }
            })
    }

    proptest! {
        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let _ = VersionedMessage::from_bytes(&bytes);
            let _ = VersionedMessage::from_bytes_partial(&bytes);
        }

        #[test]
        fn v0_encoding_is_reversible(
            header in any::<[u8; 3]>().prop_map(|[a, b, c]| MessageHeader {
                num_required_signatures: a & 0x7f,
                num_readonly_signed_accounts: b,
                num_readonly_unsigned_accounts: c,
            }),
            account_keys in proptest::collection::vec(arb_address(), 0..6),
            blockhash in any::<[u8; 32]>(),
            instructions in proptest::collection::vec(arb_instruction(), 0..4),
            address_table_lookups in proptest::collection::vec(arb_lookup(), 0..3),
        ) {
            let message = v0::Message {
                header,
                account_keys,
                recent_blockhash: Hash::new_from_array(blockhash),
                instructions,
                address_table_lookups,
            };
            let bytes = message.to_bytes().unwrap();
            prop_assert_eq!(bytes.len(), message.size());
            prop_assert_eq!(
                VersionedMessage::from_bytes(&bytes).unwrap(),
                VersionedMessage::V0(message.clone())
            );

            let legacy = LegacyMessage {
                header: message.header,
                account_keys: message.account_keys,
                recent_blockhash: message.recent_blockhash,
                instructions: message.instructions,
            };
            let bytes = legacy.to_bytes().unwrap();
            prop_assert_eq!(bytes.len(), legacy.size());
            prop_assert_eq!(LegacyMessage::from_bytes(&bytes).unwrap(), legacy);
        }
    }
}
