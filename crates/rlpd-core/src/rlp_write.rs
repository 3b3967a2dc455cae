use crate::error::RlpError;
use crate::value::Value;

pub fn encode(v: &Value) -> Result<Vec<u8>, RlpError> {
    let mut w = Writer::new();
    w.write_value(v)?;
    Ok(w.out)
}

/// Canonical wire text (`0x`-prefixed lowercase hex) for a value.
pub fn encode_wire_text(v: &Value) -> Result<String, RlpError> {
    Ok(format!("0x{}", hex::encode(encode(v)?)))
}

struct Writer {
    out: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: Vec::with_capacity(64),
        }
    }

    fn write_value(&mut self, v: &Value) -> Result<(), RlpError> {
        match v {
            Value::Leaf(b) if b.len() == 1 && b[0] < 0x80 => {
                self.out.push(b[0]);
                Ok(())
            }
            Value::Leaf(b) => {
                self.write_header(0x80, 0xb7, b.len())?;
                self.out.extend_from_slice(b);
                Ok(())
            }
            Value::List(items) => {
                // Payload is built separately since its length goes first.
                let mut inner = Writer::new();
                for it in items {
                    inner.write_value(it)?;
                }
                self.write_header(0xc0, 0xf7, inner.out.len())?;
                self.out.extend_from_slice(&inner.out);
                Ok(())
            }
        }
    }

    fn write_header(&mut self, short_base: u8, long_base: u8, len: usize) -> Result<(), RlpError> {
        if len < 56 {
            self.out.push(short_base + len as u8);
            return Ok(());
        }
        let len64 = u64::try_from(len).map_err(|_| RlpError::TooLong(len))?;
        let be = len64.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        let len_bytes = &be[skip..];
        self.out.push(long_base + len_bytes.len() as u8);
        self.out.extend_from_slice(len_bytes);
        Ok(())
    }
}
