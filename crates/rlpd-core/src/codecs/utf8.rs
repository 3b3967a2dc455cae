// UTF-8 text view.

/// C0 controls other than tab/LF/CR, and all C1 controls.
fn is_control(c: char) -> bool {
    let cp = c as u32;
    let c0 = cp <= 0x1f && !matches!(cp, 0x09 | 0x0a | 0x0d);
    let c1 = (0x80..=0x9f).contains(&cp);
    c0 || c1
}

pub fn decode(bytes: &[u8], reject_control: bool) -> Option<String> {
    let s = std::str::from_utf8(bytes).ok()?;
    if reject_control && s.chars().any(is_control) {
        return None;
    }
    Some(s.to_owned())
}

pub fn encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}
