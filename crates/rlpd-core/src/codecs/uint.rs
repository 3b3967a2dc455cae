// Big-endian unsigned integer view, limited to 8 bytes on the decode side.
use super::be_to_u64;

const MAX_BYTES: usize = 8;

pub fn decode(bytes: &[u8]) -> Option<String> {
    if bytes.len() > MAX_BYTES {
        return None;
    }
    Some(be_to_u64(bytes).to_string())
}

/// Accepts any non-negative decimal integer, however large.
pub fn encode(text: &str) -> Option<Vec<u8>> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // big-endian base-256 accumulator
    let mut out: Vec<u8> = Vec::new();
    for d in digits.bytes() {
        let mut carry = (d - b'0') as u32;
        for byte in out.iter_mut().rev() {
            let v = *byte as u32 * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            out.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    if out.is_empty() {
        out.push(0);
    }
    Some(out)
}
