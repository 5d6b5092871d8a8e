use {thiserror::Error, txwire_address::Address, txwire_short_vec::ShortVecError};

/// Errors raised while encoding, decoding or checking a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Input ended before the message did.
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("invalid compact length: {0}")]
    InvalidCompactLength(#[from] ShortVecError),
    #[error("unsupported message version {0}")]
    UnsupportedVersion(u8),
    /// A legacy message was expected but the first byte carries the version flag.
    #[error("unexpected version prefix on a legacy message")]
    UnexpectedVersionPrefix,
    #[error("missing version prefix")]
    MissingVersionPrefix,
    #[error("unexpected trailing data")]
    TrailingData,

    #[error("too many account keys (max 65535)")]
    TooManyAccountKeys,
    #[error("too many instructions (max 65535)")]
    TooManyInstructions,
    #[error("instruction has too many accounts (max 65535)")]
    InstructionAccountsTooLarge,
    #[error("instruction data too large (max 65535 bytes)")]
    InstructionDataTooLarge,
    #[error("too many address table lookups (max 65535)")]
    TooManyAddressTableLookups,
    #[error("address table lookup has too many indexes (max 65535)")]
    AddressTableLookupTooLarge,

    #[error("must have at least one signer (fee payer)")]
    ZeroSigners,
    #[error("fee payer must be writable")]
    NoWritableFeePayer,
    #[error("not enough addresses for the counts in the message header")]
    NotEnoughAddressesForSignatures,
    #[error("duplicate account key")]
    DuplicateAccountKey,
    #[error("too many accounts referenced (max 256)")]
    TooManyAccountsReferenced,
    #[error("program id index out of bounds or is fee payer")]
    InvalidProgramIdIndex,
    #[error("instruction account index out of bounds")]
    InvalidInstructionAccountIndex,
    #[error("address table lookup selects no addresses")]
    EmptyAddressTableLookup,

    #[error("lookup table {0} was not provided")]
    LookupTableNotProvided(Address),
    #[error("lookup table {table} has no address at index {index}")]
    AddressNotInLookupTable { table: Address, index: u8 },
}
