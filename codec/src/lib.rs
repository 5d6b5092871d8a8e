//! Binary encoding for instruction payloads.
//!
//! Programs read their instruction data in a fixed little-endian layout:
//!
//! | shape                          | encoding                                   |
//! |--------------------------------|--------------------------------------------|
//! | `u8`..`u64`, `i8`..`i64`       | fixed width, little-endian                 |
//! | `bool`                         | one byte, `0` or `1`                       |
//! | `[u8; N]`, tuples              | elements back to back, no length           |
//! | `Vec<T>`, `&[T]`, `String`     | `u64` little-endian length, then elements  |
//! | `Option<T>`                    | `0`, or `1` followed by the value          |
//! | structs                        | fields in declaration order, no padding    |
//!
//! Anything else (floats, `char`, 128-bit integers, maps, enums) is rejected
//! with [`CodecError::UnsupportedType`]. These lengths are fixed 8-byte
//! prefixes, unlike the compact lengths used by the message wire format.
//!
//! ```
//! #[derive(serde_derive::Serialize)]
//! struct Transfer {
//!     instruction: u32,
//!     lamports: u64,
//! }
//!
//! let data = txwire_codec::to_vec(&Transfer { instruction: 2, lamports: 1 }).unwrap();
//! assert_eq!(data, [2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod de;
mod error;
pub mod ser;

pub use {
    de::{from_bytes, from_bytes_partial, Deserializer},
    error::CodecError,
    ser::{serialized_size, to_vec, Serializer},
};
