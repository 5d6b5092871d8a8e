//! Decoding half of the payload codec.
//!
//! Every read checks the remaining length before slicing, so truncated input
//! surfaces as [`CodecError::InsufficientData`].

use {
    crate::CodecError,
    serde::de::{self, DeserializeSeed, SeqAccess, Visitor},
};

/// Decode a `T` that must span all of `bytes`.
pub fn from_bytes<'a, T>(bytes: &'a [u8]) -> Result<T, CodecError>
where
    T: de::Deserialize<'a>,
{
    let (value, consumed) = from_bytes_partial(bytes)?;
    let trailing = bytes.len().saturating_sub(consumed);
    if trailing != 0 {
        return Err(CodecError::TrailingBytes(trailing));
    }
    Ok(value)
}

/// Decode a `T` from the front of `bytes`, returning it with the number of
/// bytes it occupied.
pub fn from_bytes_partial<'a, T>(bytes: &'a [u8]) -> Result<(T, usize), CodecError>
where
    T: de::Deserialize<'a>,
{
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    let consumed = bytes.len().saturating_sub(deserializer.input.len());
    Ok((value, consumed))
}

pub struct Deserializer<'de> {
    input: &'de [u8],
}

impl<'de> Deserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self { input }
    }

    fn take(&mut self, len: usize) -> Result<&'de [u8], CodecError> {
        if self.input.len() < len {
            return Err(CodecError::InsufficientData);
        }
        let (head, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(head)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.take(N)?
            .try_into()
            .map_err(|_| CodecError::InsufficientData)
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = u64::from_le_bytes(self.read_array()?);
        usize::try_from(len).map_err(|_| CodecError::LengthOverflow(len))
    }

    fn read_bytes(&mut self) -> Result<&'de [u8], CodecError> {
        let len = self.read_len()?;
        self.take(len)
    }
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = CodecError;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("self-describing value"))
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        match self.read_u8()? {
            0 => visitor.visit_bool(false),
            1 => visitor.visit_bool(true),
            other => Err(CodecError::InvalidBoolEncoding(other)),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i8(i8::from_le_bytes(self.read_array()?))
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i16(i16::from_le_bytes(self.read_array()?))
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i32(i32::from_le_bytes(self.read_array()?))
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(i64::from_le_bytes(self.read_array()?))
    }

    fn deserialize_i128<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("i128"))
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u8(self.read_u8()?)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u16(u16::from_le_bytes(self.read_array()?))
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u32(u32::from_le_bytes(self.read_array()?))
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(u64::from_le_bytes(self.read_array()?))
    }

    fn deserialize_u128<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("u128"))
    }

    fn deserialize_f32<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("f32"))
    }

    fn deserialize_f64<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("f64"))
    }

    fn deserialize_char<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("char"))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        let bytes = self.read_bytes()?;
        let s = core::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        visitor.visit_borrowed_str(s)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.read_bytes()?)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        match self.read_u8()? {
            0 => visitor.visit_none(),
            1 => visitor.visit_some(self),
            tag => Err(CodecError::InvalidOptionTag(tag)),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        let len = self.read_len()?;
        visitor.visit_seq(Access { de: self, len })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(Access { de: self, len })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("map"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(fields.len(), visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("enum"))
    }

    fn deserialize_identifier<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("identifier"))
    }

    fn deserialize_ignored_any<V>(self, _visitor: V) -> Result<V::Value, CodecError>
    where
        V: Visitor<'de>,
    {
        Err(CodecError::UnsupportedType("ignored value"))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Yields at most `len` elements; records, tuples and sequences all read
/// their elements back to back.
struct Access<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    len: usize,
}

impl<'de, 'a> SeqAccess<'de> for Access<'a, 'de> {
    type Error = CodecError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, CodecError>
    where
        T: DeserializeSeed<'de>,
    {
        if self.len == 0 {
            return Ok(None);
        }
        self.len = self.len.saturating_sub(1);
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}
