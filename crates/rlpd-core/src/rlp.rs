// RLP wire reader. Strict: only canonical encodings are accepted and the
// top-level item must consume the whole input.
use crate::error::RlpError;
use crate::value::Value;

/// Deepest list nesting accepted on input; deeper trees would exhaust the
/// stack in the recursive reader and everything downstream of it.
pub const MAX_DEPTH: usize = 1024;

#[derive(Debug)]
pub struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    // end of the innermost list payload being read
    limit: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            limit: data.len(),
            depth: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Reads one item and requires it to span the entire input.
    pub fn parse_value(&mut self) -> Result<Value, RlpError> {
        let v = self.read_item()?;
        if self.pos != self.data.len() {
            return Err(RlpError::TrailingBytes(self.data.len() - self.pos));
        }
        Ok(v)
    }

    pub fn read_item(&mut self) -> Result<Value, RlpError> {
        let start = self.pos;
        let prefix = self.read_u8()?;
        match prefix {
            0x00..=0x7f => Ok(Value::Leaf(vec![prefix])),
            0x80..=0xb7 => {
                let len = (prefix - 0x80) as usize;
                let bytes = self.read_slice(len)?;
                if len == 1 && bytes[0] < 0x80 {
                    return Err(RlpError::NonCanonicalSingleByte(start));
                }
                Ok(Value::Leaf(bytes.to_vec()))
            }
            0xb8..=0xbf => {
                let len = self.read_long_length((prefix - 0xb7) as usize, start)?;
                Ok(Value::Leaf(self.read_slice(len)?.to_vec()))
            }
            0xc0..=0xf7 => self.read_list_payload((prefix - 0xc0) as usize),
            0xf8..=0xff => {
                let len = self.read_long_length((prefix - 0xf7) as usize, start)?;
                self.read_list_payload(len)
            }
        }
    }

    fn read_list_payload(&mut self, len: usize) -> Result<Value, RlpError> {
        if len > self.limit - self.pos {
            return Err(self.short_read());
        }
        if self.depth >= MAX_DEPTH {
            return Err(RlpError::TooDeep(self.pos));
        }
        let saved = self.limit;
        self.limit = self.pos + len;
        self.depth += 1;
        let mut items = Vec::new();
        let mut res = Ok(());
        while self.pos < self.limit {
            match self.read_item() {
                Ok(v) => items.push(v),
                Err(e) => {
                    res = Err(e);
                    break;
                }
            }
        }
        self.depth -= 1;
        self.limit = saved;
        res.map(|_| Value::List(items))
    }

    fn read_long_length(&mut self, len_of_len: usize, start: usize) -> Result<usize, RlpError> {
        let raw = self.read_slice(len_of_len)?;
        if raw[0] == 0 {
            return Err(RlpError::NonCanonicalLength(start));
        }
        let len = raw.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
        if len < 56 {
            return Err(RlpError::NonCanonicalLength(start));
        }
        usize::try_from(len).map_err(|_| RlpError::UnexpectedEof(self.pos))
    }

    fn short_read(&self) -> RlpError {
        if self.limit < self.data.len() {
            RlpError::ListOverrun(self.pos)
        } else {
            RlpError::UnexpectedEof(self.pos)
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, RlpError> {
        if self.pos >= self.limit {
            return Err(self.short_read());
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], RlpError> {
        if len > self.limit - self.pos {
            return Err(self.short_read());
        }
        let s = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(s)
    }
}

pub fn decode(data: &[u8]) -> Result<Value, RlpError> {
    Parser::new(data).parse_value()
}

/// Strips all whitespace and adds a `0x` prefix when absent.
pub fn normalize_wire_text(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.starts_with("0x") || compact.starts_with("0X") {
        compact
    } else {
        format!("0x{}", compact)
    }
}

/// Parses normalized wire text (`0x`-prefixed hex) into bytes.
pub fn wire_text_bytes(text: &str) -> Result<Vec<u8>, RlpError> {
    let normalized = normalize_wire_text(text);
    hex::decode(&normalized[2..]).map_err(|_| RlpError::InvalidHex)
}

pub fn decode_wire_text(text: &str) -> Result<Value, RlpError> {
    decode(&wire_text_bytes(text)?)
}
