// Hex view. Grouping is display-only; whitespace is ignored when parsing.

pub fn decode(bytes: &[u8], group_bytes: usize) -> String {
    if group_bytes == 0 {
        return ::hex::encode(bytes);
    }
    bytes
        .chunks(group_bytes)
        .map(::hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn encode(text: &str) -> Option<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    if digits.len() % 2 == 1 {
        ::hex::decode(format!("0{}", digits)).ok()
    } else {
        ::hex::decode(digits).ok()
    }
}
