//! Messages with known encodings, shared by the unit tests.

use {
    crate::{
        compiled_instruction::CompiledInstruction,
        legacy,
        v0::{self, MessageAddressTableLookup},
        AddressLookupTableAccount, MessageHeader,
    },
    txwire_address::Address,
    txwire_hash::Hash,
    txwire_instruction::{AccountMeta, Instruction},
};

pub(crate) const SYSTEM_PROGRAM_ID: Address = Address::new_from_array([0; 32]);

pub(crate) fn address(s: &str) -> Address {
    s.parse().unwrap()
}

pub(crate) fn blockhash(s: &str) -> Hash {
    s.parse().unwrap()
}

pub(crate) fn system_transfer(from: Address, to: Address, lamports: u64) -> Instruction {
    let mut data = 2u32.to_le_bytes().to_vec();
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction::new_with_bytes(
        SYSTEM_PROGRAM_ID,
        &data,
        vec![AccountMeta::new(from, true), AccountMeta::new(to, false)],
    )
}

/// 256 lamports from `EvN4...` to `A4iU...`.
pub(crate) fn legacy_transfer_instruction() -> Instruction {
    system_transfer(
        address("EvN4kgKmCmYzdbd5kL8Q8YgkUW5RoqMTpBczrfLExtx7"),
        address("A4iUVr5KjmsLymUcv4eSKPedUtoaBceiPeGipKMYc69b"),
        256,
    )
}

pub(crate) fn legacy_transfer_blockhash() -> Hash {
    blockhash("FwRYtTPRk5N4wUeP87rTw9kQVSwigB6kbikGzzeCMrW5")
}

/// Encodes as [`LEGACY_TRANSFER`].
pub(crate) fn legacy_transfer() -> legacy::Message {
    legacy::Message {
        header: MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        },
        account_keys: vec![
            address("EvN4kgKmCmYzdbd5kL8Q8YgkUW5RoqMTpBczrfLExtx7"),
            address("A4iUVr5KjmsLymUcv4eSKPedUtoaBceiPeGipKMYc69b"),
            SYSTEM_PROGRAM_ID,
        ],
        recent_blockhash: legacy_transfer_blockhash(),
        instructions: vec![CompiledInstruction {
            program_id_index: 2,
            accounts: vec![0, 1],
            data: vec![2, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
        }],
    }
}

pub(crate) fn v0_payer() -> Address {
    address("9aE476sH92Vz7DMPyq5WLPkrKWivxeuTKEFKd2sZZcde")
}

pub(crate) fn v0_recipient() -> Address {
    address("2xNweLHLqrbx4zo1waDvgWJHgsUpPj8Y8icbAFeR4a8i")
}

/// One lamport from [`v0_payer`] to [`v0_recipient`].
pub(crate) fn v0_transfer_instruction() -> Instruction {
    system_transfer(v0_payer(), v0_recipient(), 1)
}

pub(crate) fn lookup_table(addresses: Vec<Address>) -> AddressLookupTableAccount {
    AddressLookupTableAccount {
        key: address("HEhDGuxaxGr9LuNtBdvbX2uggyAKoxYgHFaAiqxVu8UY"),
        addresses,
    }
}

/// Encodes as [`V0_NO_LOOKUPS`].
pub(crate) fn v0_no_lookups() -> v0::Message {
    v0::Message {
        header: MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        },
        account_keys: vec![v0_payer(), v0_recipient(), SYSTEM_PROGRAM_ID],
        recent_blockhash: blockhash("9rAtxuhtKn8qagc3UtZFyhLrw5zkh6etv43TibaXuSKo"),
        instructions: vec![CompiledInstruction {
            program_id_index: 2,
            accounts: vec![0, 1],
            data: vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
        }],
        address_table_lookups: vec![],
    }
}

/// Encodes as [`V0_ONE_LOOKUP`].
pub(crate) fn v0_one_lookup() -> v0::Message {
    v0::Message {
        header: MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        },
        account_keys: vec![v0_payer(), SYSTEM_PROGRAM_ID],
        recent_blockhash: blockhash("5EvWPqKeYfN2P7SAQZ2TLnXhV3Ltjn6qEhK1F279dUUW"),
        instructions: vec![CompiledInstruction {
            program_id_index: 1,
            accounts: vec![0, 2],
            data: vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
        }],
        address_table_lookups: vec![MessageAddressTableLookup {
            account_key: address("HEhDGuxaxGr9LuNtBdvbX2uggyAKoxYgHFaAiqxVu8UY"),
            writable_indexes: vec![1],
            readonly_indexes: vec![],
        }],
    }
}

pub(crate) fn token_payer() -> Address {
    address("FUarP2p5EnxD66vVDL4PWRoWMzA56ZVHG24hpEDFShEz")
}

/// `TransferChecked` of one base unit with nine decimals.
pub(crate) fn token_transfer_checked_instruction() -> Instruction {
    Instruction::new_with_bytes(
        address("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"),
        &[12, 1, 0, 0, 0, 0, 0, 0, 0, 9],
        vec![
            AccountMeta::new(address("8YNmYW9rWwpmLxUDycqHj1JMAMdm1v2VBB55tXqt7jej"), false),
            AccountMeta::new_readonly(address("5XaEXmAEiA4t3EdFWADixN9537Nct5Y5PMRz391eD9N1"), false),
            AccountMeta::new(address("CPaB3EuV5qJK25stSWzH3815BspeyGgYvaR1Z8B72hbp"), false),
            AccountMeta::new_readonly(token_payer(), true),
        ],
    )
}

/// Two tables that share the mint, consulted in this order.
pub(crate) fn token_lookup_tables() -> [AddressLookupTableAccount; 2] {
    [
        AddressLookupTableAccount {
            key: address("4jBXhGD8X8i2MCkunSDnqvyzQrGcfV6rqy5A4ETJBtaA"),
            addresses: vec![
                address("5XaEXmAEiA4t3EdFWADixN9537Nct5Y5PMRz391eD9N1"),
                address("CPaB3EuV5qJK25stSWzH3815BspeyGgYvaR1Z8B72hbp"),
            ],
        },
        AddressLookupTableAccount {
            key: address("F5wakDtup2KKx1SACvLyYDJn2r6eMGRwQDTw7ZKBWATb"),
            addresses: vec![
                address("5XaEXmAEiA4t3EdFWADixN9537Nct5Y5PMRz391eD9N1"),
                address("8YNmYW9rWwpmLxUDycqHj1JMAMdm1v2VBB55tXqt7jej"),
            ],
        },
    ]
}

/// Encodes as [`V0_TWO_LOOKUPS`].
pub(crate) fn v0_two_lookups() -> v0::Message {
    v0::Message {
        header: MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        },
        account_keys: vec![
            token_payer(),
            address("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"),
        ],
        recent_blockhash: blockhash("8QYt53pDt3jMhgFKWWeGPkbpPprGBp7mTx68q6vv5JW1"),
        instructions: vec![CompiledInstruction {
            program_id_index: 1,
            accounts: vec![3, 4, 2, 0],
            data: vec![12, 1, 0, 0, 0, 0, 0, 0, 0, 9],
        }],
        address_table_lookups: vec![
            MessageAddressTableLookup {
                account_key: address("4jBXhGD8X8i2MCkunSDnqvyzQrGcfV6rqy5A4ETJBtaA"),
                writable_indexes: vec![1],
                readonly_indexes: vec![0],
            },
            MessageAddressTableLookup {
                account_key: address("F5wakDtup2KKx1SACvLyYDJn2r6eMGRwQDTw7ZKBWATb"),
                writable_indexes: vec![1],
                readonly_indexes: vec![],
            },
        ],
    }
}

pub(crate) const LEGACY_TRANSFER: &[u8] = &[
    1, 0, 1, 3, 206, 211, 135, 230, 195, 111, 87, 254, 147, 239, 143, 81, 110, 159, 49, 140,
    109, 137, 224, 197, 24, 49, 223, 61, 123, 8, 78, 109, 110, 136, 228, 240, 134, 172, 209,
    213, 227, 137, 61, 108, 116, 171, 205, 124, 54, 68, 61, 110, 80, 31, 240, 117, 108, 137, 97,
    222, 38, 242, 68, 156, 27, 65, 29, 142, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 221, 244, 189, 59, 8, 252, 7, 91, 129, 169, 22,
    151, 32, 104, 208, 131, 64, 75, 232, 201, 77, 13, 187, 220, 103, 232, 190, 100, 35, 210, 17,
    42, 1, 2, 2, 0, 1, 12, 2, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0,
];

pub(crate) const V0_NO_LOOKUPS: &[u8] = &[
    128, 1, 0, 1, 3, 127, 96, 107, 250, 152, 133, 208, 224, 73, 251, 113, 151, 128, 139, 86, 80,
    101, 70, 138, 50, 141, 153, 218, 110, 56, 39, 122, 181, 120, 55, 86, 185, 29, 11, 113, 4,
    101, 239, 39, 167, 201, 112, 156, 239, 236, 36, 251, 140, 76, 199, 150, 228, 218, 214, 20,
    123, 180, 181, 103, 160, 71, 251, 237, 123, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 131, 118, 36, 248, 169, 123, 97, 98, 215,
    133, 18, 92, 220, 162, 163, 79, 201, 66, 96, 112, 57, 224, 101, 105, 255, 83, 217, 144, 233,
    242, 195, 102, 1, 2, 2, 0, 1, 12, 2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0,
];

pub(crate) const V0_ONE_LOOKUP: &[u8] = &[
    128, 1, 0, 1, 2, 127, 96, 107, 250, 152, 133, 208, 224, 73, 251, 113, 151, 128, 139, 86, 80,
    101, 70, 138, 50, 141, 153, 218, 110, 56, 39, 122, 181, 120, 55, 86, 185, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 62, 255, 204,
    109, 44, 223, 1, 225, 41, 92, 205, 204, 199, 90, 32, 104, 6, 123, 211, 72, 233, 131, 88, 65,
    115, 38, 138, 217, 189, 202, 86, 39, 1, 1, 2, 0, 2, 12, 2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0,
    1, 241, 61, 2, 62, 211, 181, 33, 219, 74, 147, 127, 38, 231, 159, 99, 194, 103, 129, 201,
    15, 51, 106, 114, 199, 122, 142, 121, 87, 112, 78, 138, 249, 1, 1, 0,
];

pub(crate) const V0_TWO_LOOKUPS: &[u8] = &[
    128, 1, 0, 1, 2, 215, 20, 147, 30, 186, 106, 25, 168, 244, 220, 108, 1, 154, 255, 38, 79,
    95, 191, 104, 197, 162, 142, 224, 179, 185, 135, 85, 206, 57, 214, 73, 211, 6, 221, 246,
    225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133, 237, 95, 91,
    55, 145, 58, 140, 245, 133, 126, 255, 0, 169, 110, 10, 54, 233, 206, 100, 206, 20, 210, 67,
    23, 247, 30, 228, 82, 91, 213, 121, 154, 103, 2, 244, 121, 216, 91, 51, 89, 238, 234, 100,
    201, 70, 1, 1, 4, 3, 4, 2, 0, 10, 12, 1, 0, 0, 0, 0, 0, 0, 0, 9, 2, 55, 97, 92, 52, 123,
    217, 238, 66, 226, 228, 18, 46, 33, 216, 61, 49, 147, 61, 56, 53, 154, 58, 97, 207, 99, 252,
    242, 109, 33, 155, 109, 79, 1, 1, 1, 0, 209, 71, 167, 243, 125, 4, 5, 3, 86, 158, 20, 79,
    26, 218, 111, 112, 201, 138, 90, 45, 166, 173, 184, 149, 122, 87, 238, 41, 150, 221, 227,
    178, 1, 1, 0,
];
