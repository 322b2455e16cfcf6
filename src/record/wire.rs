//! Minimal protobuf wire-format reader.

use thiserror::Error;

/// A violation of the protobuf wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended in the middle of a value.
    #[error("record truncated at byte {0}")]
    Truncated(usize),

    /// A varint ran past ten bytes.
    #[error("varint overflow at byte {0}")]
    VarintOverflow(usize),

    /// Field number zero or out of range.
    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    /// Unknown or unsupported (group) wire type.
    #[error("unsupported wire type {wire_type} for field {field}")]
    UnsupportedWireType { field: u32, wire_type: u8 },

    /// A known field carried the wrong wire type.
    #[error("field {field} of {message} has wire type {found}, expected {expected}")]
    WireTypeMismatch {
        message: &'static str,
        field: u32,
        expected: &'static str,
        found: &'static str,
    },

    /// A string field is not valid UTF-8.
    #[error("field {field} of {message} is not valid UTF-8")]
    InvalidUtf8 { message: &'static str, field: u32 },
}

/// A raw field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

impl<'a> Value<'a> {
    fn kind(&self) -> &'static str {
        match self {
            Value::Varint(_) => "varint",
            Value::Fixed64(_) => "fixed64",
            Value::Bytes(_) => "length-delimited",
            Value::Fixed32(_) => "fixed32",
        }
    }
}

/// A decoded field: number plus raw value, tagged with its message name for
/// error reporting.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub message: &'static str,
    pub number: u32,
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    fn mismatch(&self, expected: &'static str) -> WireError {
        WireError::WireTypeMismatch {
            message: self.message,
            field: self.number,
            expected,
            found: self.value.kind(),
        }
    }

    /// `float` field. A fixed64 value is read as a double and narrowed.
    pub fn as_f32(&self) -> Result<f32, WireError> {
        match self.value {
            Value::Fixed32(bits) => Ok(f32::from_bits(bits)),
            Value::Fixed64(bits) => Ok(f64::from_bits(bits) as f32),
            _ => Err(self.mismatch("fixed32")),
        }
    }

    /// `int32` or enum field.
    pub fn as_i32(&self) -> Result<i32, WireError> {
        match self.value {
            Value::Varint(v) => Ok(v as i64 as i32),
            _ => Err(self.mismatch("varint")),
        }
    }

    /// `uint32` field.
    pub fn as_u32(&self) -> Result<u32, WireError> {
        match self.value {
            Value::Varint(v) => Ok(v as u32),
            Value::Fixed32(v) => Ok(v),
            _ => Err(self.mismatch("varint")),
        }
    }

    /// `bool` field.
    pub fn as_bool(&self) -> Result<bool, WireError> {
        match self.value {
            Value::Varint(v) => Ok(v != 0),
            _ => Err(self.mismatch("varint")),
        }
    }

    /// Embedded message or bytes.
    pub fn as_bytes(&self) -> Result<&'a [u8], WireError> {
        match self.value {
            Value::Bytes(b) => Ok(b),
            _ => Err(self.mismatch("length-delimited")),
        }
    }

    /// `string` field.
    pub fn as_str(&self) -> Result<&'a str, WireError> {
        std::str::from_utf8(self.as_bytes()?).map_err(|_| WireError::InvalidUtf8 {
            message: self.message,
            field: self.number,
        })
    }
}

/// Sequential reader over the fields of one message.
pub struct WireReader<'a> {
    message: &'static str,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Read the fields of `message` from `buf`.
    pub fn new(message: &'static str, buf: &'a [u8]) -> Self {
        Self {
            message,
            buf,
            pos: 0,
        }
    }

    fn read_varint(&mut self) -> Result<u64, WireError> {
        let start = self.pos;
        let mut value = 0u64;
        for shift in (0..70).step_by(7) {
            let byte = *self.buf.get(self.pos).ok_or(WireError::Truncated(self.pos))?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::VarintOverflow(start))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or(WireError::Truncated(self.buf.len()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Next field, or `None` at the end of the message.
    pub fn next_field(&mut self) -> Result<Option<Field<'a>>, WireError> {
        if self.pos >= self.buf.len() {
            return Ok(None);
        }

        let key = self.read_varint()?;
        let number = key >> 3;
        if number == 0 || number > u64::from(u32::MAX >> 3) {
            return Err(WireError::InvalidFieldNumber(number));
        }
        let number = number as u32;

        let value = match (key & 0x7) as u8 {
            0 => Value::Varint(self.read_varint()?),
            1 => {
                let bytes = self.take(8)?;
                Value::Fixed64(u64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])))
            }
            2 => {
                let len = self.read_varint()?;
                let len = usize::try_from(len).map_err(|_| WireError::Truncated(self.pos))?;
                Value::Bytes(self.take(len)?)
            }
            5 => {
                let bytes = self.take(4)?;
                Value::Fixed32(u32::from_le_bytes(bytes.try_into().unwrap_or([0; 4])))
            }
            wire_type => {
                return Err(WireError::UnsupportedWireType {
                    field: number,
                    wire_type,
                })
            }
        };

        Ok(Some(Field {
            message: self.message,
            number,
            value,
        }))
    }
}
