//! Compact serde-encoding of vectors with small length.
//!
//! Wire-level vector lengths (account keys, instructions, signatures, lookup
//! indexes) are written as a variable-length unsigned integer holding 7 bits
//! per byte, least significant group first, with the high bit of each byte set
//! while more bytes follow. Lengths are bounded by `u16::MAX`, so an encoding is
//! one to three bytes long.
//!
//! Payload-level vectors inside instruction data use a fixed 8-byte length
//! instead; see the `txwire-codec` crate.

#![cfg_attr(docsrs, feature(doc_cfg))]

use {
    core::{fmt, marker::PhantomData, mem::size_of},
    serde::{
        de::{self, Deserializer, SeqAccess, Visitor},
        ser::{self, SerializeTuple, Serializer},
        Deserialize, Serialize,
    },
    thiserror::Error,
};

/// Maximum number of bytes a compact length can occupy.
pub const MAX_ENCODING_LENGTH: usize = 3;

/// A u16 that serializes as a compact length. The third byte may only carry
/// the 2 least-significant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortU16(pub u16);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortVecError {
    /// Input ended while the continuation bit was still set.
    #[error("insufficient data for compact length")]
    InsufficientData,
    /// The encoding continues past the third byte.
    #[error("compact length encoding is longer than {MAX_ENCODING_LENGTH} bytes")]
    TooLong,
    /// The encoded value does not fit in a u16.
    #[error("compact length {0} does not fit in a u16")]
    Overflow(usize),
    /// A redundant trailing zero group.
    #[error("compact length has a non-canonical encoding")]
    Alias,
}

/// A compact length in its encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLen {
    bytes: [u8; MAX_ENCODING_LENGTH],
    len: u8,
}

impl EncodedLen {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }
}

impl AsRef<[u8]> for EncodedLen {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Encode `len` as a compact length.
pub fn encode_len(len: usize) -> Result<EncodedLen, ShortVecError> {
    let value = u16::try_from(len).map_err(|_| ShortVecError::Overflow(len))?;
    let mut encoded = EncodedLen {
        bytes: [0u8; MAX_ENCODING_LENGTH],
        len: 0,
    };
    let mut rem_val = value;
    for slot in encoded.bytes.iter_mut() {
        let mut elem = (rem_val & 0x7f) as u8;
        rem_val >>= 7;
        encoded.len = encoded.len.saturating_add(1);
        if rem_val == 0 {
            *slot = elem;
            break;
        }
        elem |= 0x80;
        *slot = elem;
    }
    Ok(encoded)
}

/// Append `len` as a compact length to `out`.
pub fn append_len(out: &mut Vec<u8>, len: usize) -> Result<(), ShortVecError> {
    out.extend_from_slice(encode_len(len)?.as_slice());
    Ok(())
}

enum VisitStatus {
    Done(u16),
    More(u16),
}

/// Fold one encoded byte into the value accumulated so far.
fn visit_byte(elem: u8, val: u16, nth_byte: usize) -> Result<VisitStatus, ShortVecError> {
    if elem == 0 && nth_byte != 0 {
        return Err(ShortVecError::Alias);
    }

    let val = u32::from(val);
    let elem = u32::from(elem);
    let elem_val = elem & 0x7f;
    let elem_done = (elem & 0x80) == 0;

    if nth_byte >= MAX_ENCODING_LENGTH
        || (nth_byte == MAX_ENCODING_LENGTH.saturating_sub(1) && !elem_done)
    {
        return Err(ShortVecError::TooLong);
    }

    let shift = u32::try_from(nth_byte)
        .unwrap_or(u32::MAX)
        .saturating_mul(7);
    let elem_val = elem_val.checked_shl(shift).unwrap_or(u32::MAX);

    let new_val = val | elem_val;
    let val = u16::try_from(new_val).map_err(|_| ShortVecError::Overflow(new_val as usize))?;

    if elem_done {
        Ok(VisitStatus::Done(val))
    } else {
        Ok(VisitStatus::More(val))
    }
}

/// Decode a compact length from the front of `bytes`.
///
/// Returns the length and the number of bytes it occupied.
pub fn decode_len(bytes: &[u8]) -> Result<(usize, usize), ShortVecError> {
    let mut val = 0;
    for (nth_byte, byte) in bytes.iter().take(MAX_ENCODING_LENGTH).enumerate() {
        match visit_byte(*byte, val, nth_byte)? {
            VisitStatus::More(new_val) => val = new_val,
            VisitStatus::Done(new_val) => {
                return Ok((usize::from(new_val), nth_byte.saturating_add(1)));
            }
        }
    }
    Err(ShortVecError::InsufficientData)
}

impl Serialize for ShortU16 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Pass a non-zero value to serialize_tuple() so that serde_json will
        // generate an open bracket.
        let encoded = encode_len(usize::from(self.0)).map_err(ser::Error::custom)?;
        let mut seq = serializer.serialize_tuple(1)?;
        for byte in encoded.as_slice() {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }
}

struct ShortU16Visitor;

impl<'a> Visitor<'a> for ShortU16Visitor {
    type Value = ShortU16;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a ShortU16")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<ShortU16, A::Error>
    where
        A: SeqAccess<'a>,
    {
        // Decodes an unsigned 16 bit integer one-to-one encoded as follows:
        // 1 byte  : 0xxxxxxx                   => 00000000 0xxxxxxx :      0 -    127
        // 2 bytes : 1xxxxxxx 0yyyyyyy          => 00yyyyyy yxxxxxxx :    128 - 16,383
        // 3 bytes : 1xxxxxxx 1yyyyyyy 000000zz => zzyyyyyy yxxxxxxx : 16,384 - 65,535
        let mut val: u16 = 0;
        for nth_byte in 0..MAX_ENCODING_LENGTH {
            let elem: u8 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(nth_byte, &self))?;
            match visit_byte(elem, val, nth_byte).map_err(de::Error::custom)? {
                VisitStatus::Done(new_val) => return Ok(ShortU16(new_val)),
                VisitStatus::More(new_val) => val = new_val,
            }
        }

        Err(de::Error::custom(ShortVecError::TooLong))
    }
}

impl<'de> Deserialize<'de> for ShortU16 {
    fn deserialize<D>(deserializer: D) -> Result<ShortU16, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_tuple(MAX_ENCODING_LENGTH, ShortU16Visitor)
    }
}

/// Serialize a vector behind a compact length, for use as
/// `#[serde(with = "txwire_short_vec")]` on a `Vec` field.
pub fn serialize<S: Serializer, T: Serialize>(
    elements: &[T],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    // Pass a non-zero value to serialize_tuple() so that serde_json will
    // generate an open bracket.
    let mut seq = serializer.serialize_tuple(1)?;

    let len = elements.len();
    if len > usize::from(u16::MAX) {
        return Err(ser::Error::custom(ShortVecError::Overflow(len)));
    }
    let short_len = ShortU16(len as u16);
    seq.serialize_element(&short_len)?;

    for element in elements {
        seq.serialize_element(element)?;
    }
    seq.end()
}

struct ShortVecVisitor<T> {
    _t: PhantomData<T>,
}

impl<'a, T> Visitor<'a> for ShortVecVisitor<T>
where
    T: Deserialize<'a>,
{
    type Value = Vec<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a Vec with a multi-byte length")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<T>, A::Error>
    where
        A: SeqAccess<'a>,
    {
        let short_len: ShortU16 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let len = usize::from(short_len.0);

        // Elements are at least one byte on the wire, so never reserve more
        // than a sane bound up front.
        let mut result = Vec::with_capacity(len.min(4096 / size_of::<T>().max(1)));
        for i in 0..len {
            let elem = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
            result.push(elem);
        }
        Ok(result)
    }
}

/// Counterpart of [`serialize`].
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let visitor = ShortVecVisitor { _t: PhantomData };
    deserializer.deserialize_tuple(usize::MAX, visitor)
}

/// Number of bytes `len` occupies once encoded.
pub fn encoded_len(len: usize) -> usize {
    encode_len(len).map_or(MAX_ENCODING_LENGTH, |encoded| encoded.len())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        bincode::{deserialize, serialize},
        proptest::prelude::*,
        serde_derive::{Deserialize, Serialize},
    };

    /// Return the serialized length.
    fn bincode_len(len: u16) -> usize {
        bincode::serialized_size(&ShortU16(len)).unwrap() as usize
    }

    fn assert_len_encoding(len: u16, bytes: &[u8]) {
        assert_eq!(bincode_len(len), bytes.len(), "unexpected usize encoding");
        assert_eq!(
            encode_len(usize::from(len)).unwrap().as_slice(),
            bytes,
            "unexpected compact encoding"
        );
        assert_eq!(
            decode_len(bytes).unwrap(),
            (usize::from(len), bytes.len()),
            "unexpected compact decoding"
        );
        let serialized = serialize(&ShortU16(len)).unwrap();
        assert_eq!(serialized, bytes);
        let deserialized: ShortU16 = deserialize(bytes).unwrap();
        assert_eq!(deserialized.0, len);
    }

    #[test]
    fn test_short_u16_encode() {
        assert_len_encoding(0x0, &[0x0]);
        assert_len_encoding(0x7f, &[0x7f]);
        assert_len_encoding(0x80, &[0x80, 0x01]);
        assert_len_encoding(0xff, &[0xff, 0x01]);
        assert_len_encoding(0x100, &[0x80, 0x02]);
        assert_len_encoding(0x7fff, &[0xff, 0xff, 0x01]);
        assert_len_encoding(0xffff, &[0xff, 0xff, 0x03]);
    }

    #[test]
    fn test_boundary_widths() {
        for (len, width) in [(0, 1), (127, 1), (128, 2), (16383, 2), (16384, 3)] {
            let encoded = encode_len(len).unwrap();
            assert_eq!(encoded.len(), width, "width of {len}");
            assert_eq!(encoded_len(len), width);
            assert_eq!(decode_len(encoded.as_slice()).unwrap(), (len, width));
        }
    }

    #[test]
    fn test_encode_rejects_values_above_u16() {
        assert_eq!(encode_len(0x1_0000), Err(ShortVecError::Overflow(0x1_0000)));
        let mut out = vec![];
        assert_eq!(
            append_len(&mut out, usize::MAX),
            Err(ShortVecError::Overflow(usize::MAX))
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_append_len() {
        let mut out = vec![0xaa];
        append_len(&mut out, 300).unwrap();
        assert_eq!(out, vec![0xaa, 0xac, 0x02]);
    }

    fn assert_good_deserialized_value(value: u16, bytes: &[u8]) {
        assert_eq!(value, deserialize::<ShortU16>(bytes).unwrap().0);
        assert_eq!(decode_len(bytes).unwrap().0, usize::from(value));
    }

    fn assert_bad_deserialized_value(bytes: &[u8]) {
        assert!(deserialize::<ShortU16>(bytes).is_err(), "{bytes:?}");
        assert!(decode_len(bytes).is_err(), "{bytes:?}");
    }

    #[test]
    fn test_deserialize() {
        assert_good_deserialized_value(0x0000, &[0x00]);
        assert_good_deserialized_value(0x007f, &[0x7f]);
        assert_good_deserialized_value(0x0080, &[0x80, 0x01]);
        assert_good_deserialized_value(0x00ff, &[0xff, 0x01]);
        assert_good_deserialized_value(0x0100, &[0x80, 0x02]);
        assert_good_deserialized_value(0x07ff, &[0xff, 0x0f]);
        assert_good_deserialized_value(0x3fff, &[0xff, 0x7f]);
        assert_good_deserialized_value(0x4000, &[0x80, 0x80, 0x01]);
        assert_good_deserialized_value(0xffff, &[0xff, 0xff, 0x03]);

        // aliases
        // 0x0000
        assert_bad_deserialized_value(&[0x80, 0x00]);
        assert_bad_deserialized_value(&[0x80, 0x80, 0x00]);
        // 0x007f
        assert_bad_deserialized_value(&[0xff, 0x00]);
        assert_bad_deserialized_value(&[0xff, 0x80, 0x00]);
        // 0x0080
        assert_bad_deserialized_value(&[0x80, 0x81, 0x00]);
        // 0x00ff
        assert_bad_deserialized_value(&[0xff, 0x81, 0x00]);
        // 0x0100
        assert_bad_deserialized_value(&[0x80, 0x82, 0x00]);
        // 0x07ff
        assert_bad_deserialized_value(&[0xff, 0x8f, 0x00]);
        // 0x3fff
        assert_bad_deserialized_value(&[0xff, 0xff, 0x00]);

        // too short
        assert_bad_deserialized_value(&[]);
        assert_bad_deserialized_value(&[0x80]);

        // too long
        assert_bad_deserialized_value(&[0x80, 0x80, 0x80, 0x00]);

        // too large
        // 0x0001_0000
        assert_bad_deserialized_value(&[0x80, 0x80, 0x04]);
        // 0x0001_8000
        assert_bad_deserialized_value(&[0x80, 0x80, 0x06]);
    }

    #[test]
    fn test_decode_error_kinds() {
        assert_eq!(decode_len(&[]), Err(ShortVecError::InsufficientData));
        assert_eq!(decode_len(&[0xff, 0xff]), Err(ShortVecError::InsufficientData));
        assert_eq!(decode_len(&[0x80, 0x00]), Err(ShortVecError::Alias));
        assert_eq!(decode_len(&[0xff, 0xff, 0xff]), Err(ShortVecError::TooLong));
        assert!(matches!(
            decode_len(&[0x80, 0x80, 0x04]),
            Err(ShortVecError::Overflow(_))
        ));
        // only the prefix is consumed
        assert_eq!(decode_len(&[0x05, 0xff, 0xff]), Ok((5, 1)));
    }

    #[test]
    fn test_short_vec_u8() {
        #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
        struct Wrapper {
            #[serde(with = "crate")]
            bytes: Vec<u8>,
        }

        let vec = Wrapper {
            bytes: vec![4u8; 32],
        };
        let bytes = serialize(&vec).unwrap();
        assert_eq!(bytes.len(), vec.bytes.len() + 1);

        let vec1: Wrapper = deserialize(&bytes).unwrap();
        assert_eq!(vec.bytes, vec1.bytes);
    }

    #[test]
    fn test_short_vec_u8_too_long() {
        #[derive(Debug, Serialize)]
        struct Wrapper {
            #[serde(with = "crate")]
            bytes: Vec<u8>,
        }

        let vec = Wrapper {
            bytes: vec![4u8; u16::MAX as usize],
        };
        assert!(serialize(&vec).is_ok());

        let vec = Wrapper {
            bytes: vec![4u8; u16::MAX as usize + 1],
        };
        assert!(serialize(&vec).is_err());
    }

    #[test]
    fn test_short_vec_json() {
        #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
        struct Wrapper {
            #[serde(with = "crate")]
            bytes: Vec<u8>,
        }

        let vec = Wrapper {
            bytes: vec![0, 1, 2],
        };
        let s = serde_json::to_string(&vec).unwrap();
        assert_eq!(s, r#"{"bytes":[[3],0,1,2]}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&s).unwrap(), vec);
    }

    #[test]
    fn test_short_vec_aliased_length() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            #[serde(with = "crate")]
            #[allow(dead_code)]
            bytes: Vec<u8>,
        }

        let bytes = [
            0x81, 0x80, 0x00, // 3-byte alias of 1
            0x00,
        ];
        assert!(deserialize::<Wrapper>(&bytes).is_err());
    }

    proptest! {
        #[test]
        fn compact_len_roundtrip(len in 0usize..=u16::MAX as usize) {
            let encoded = encode_len(len).unwrap();
            prop_assert!(encoded.len() >= 1 && encoded.len() <= MAX_ENCODING_LENGTH);
            prop_assert_eq!(decode_len(encoded.as_slice()).unwrap(), (len, encoded.len()));
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..8)) {
            let _ = decode_len(&bytes);
        }
    }
}
