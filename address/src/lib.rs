//! Address representation for accounts on the wire.
//!
//! An address is a sequence of 32 bytes, often shown as a base58 encoded string
//! (e.g. 14grJpemFaf88c8tiVb77W7TYg2W3ir6pfkKz3YjhhZ5).

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use {
    core::{fmt, str::FromStr},
    thiserror::Error,
};

/// Number of bytes in an address.
pub const ADDRESS_BYTES: usize = 32;
/// Maximum string length of a base58 encoded address.
const MAX_BASE58_LEN: usize = 44;

/// The address of an account.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address(pub(crate) [u8; ADDRESS_BYTES]);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("String is the wrong size")]
    WrongSize,
    #[error("Invalid Base58 string")]
    Invalid,
}

impl Address {
    pub const fn new_from_array(address_array: [u8; ADDRESS_BYTES]) -> Self {
        Self(address_array)
    }

    /// Unique address for tests and benchmarks.
    #[cfg(feature = "dev-context-only-utils")]
    pub fn new_unique() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static I: AtomicU64 = AtomicU64::new(1);

        let mut b = [0u8; ADDRESS_BYTES];
        let i = I.fetch_add(1, Ordering::Relaxed);
        // use big endian so the base58 forms sort with the counter
        b[0..8].copy_from_slice(&i.to_be_bytes());
        Self::from(b)
    }

    pub const fn to_bytes(self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Whether every byte of the address is zero.
    ///
    /// The all-zero address is the system program id.
    pub fn is_zeroed(&self) -> bool {
        self.0 == [0u8; ADDRESS_BYTES]
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    #[inline]
    fn from(from: [u8; ADDRESS_BYTES]) -> Self {
        Self(from)
    }
}

impl From<Address> for [u8; ADDRESS_BYTES] {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = core::array::TryFromSliceError;

    #[inline]
    fn try_from(address: &[u8]) -> Result<Self, Self::Error> {
        <[u8; ADDRESS_BYTES]>::try_from(address).map(Self::from)
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Address::from_str(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use five8::DecodeError;
        if s.len() > MAX_BASE58_LEN {
            return Err(ParseAddressError::WrongSize);
        }
        let mut bytes = [0; ADDRESS_BYTES];
        five8::decode_32(s, &mut bytes).map_err(|e| match e {
            DecodeError::InvalidChar(_) => ParseAddressError::Invalid,
            DecodeError::TooLong
            | DecodeError::TooShort
            | DecodeError::LargestTermTooHigh
            | DecodeError::OutputTooLong => ParseAddressError::WrongSize,
        })?;
        Ok(Self(bytes))
    }
}

fn write_as_base58(f: &mut fmt::Formatter, address: &Address) -> fmt::Result {
    let mut out = [0u8; MAX_BASE58_LEN];
    let len = five8::encode_32(&address.0, &mut out) as usize;
    let as_str = core::str::from_utf8(&out[..len]).map_err(|_| fmt::Error)?;
    f.write_str(as_str)
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_as_base58(f, self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_as_base58(f, self)
    }
}
