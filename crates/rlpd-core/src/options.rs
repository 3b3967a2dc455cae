/// Editor-wide knobs shared by every node of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Bytes per space-separated group in the hex view; `0` disables grouping.
    pub hex_group_bytes: usize,
    /// Reject C0/C1 control characters in the UTF-8 view.
    pub reject_control_chars: bool,
    /// Bytes of a freshly inserted leaf.
    pub placeholder: Vec<u8>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            hex_group_bytes: 4,
            reject_control_chars: true,
            placeholder: vec![0x00],
        }
    }
}
