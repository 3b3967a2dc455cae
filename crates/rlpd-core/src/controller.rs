// Owner of the authoritative tree and the Encoded <-> Decoded mode switch.
//
// Encoded: raw wire text is typed; every change re-runs the decoder.
// Decoded: the tree is edited; every valid root notification re-encodes.
// Boundary failures only ever disable a control, they never touch the last
// good wire text.
use crate::codecs::Representation;
use crate::error::EditError;
use crate::options::EditorOptions;
use crate::rlp::{decode_wire_text, normalize_wire_text};
use crate::rlp_write::encode_wire_text;
use crate::tree::{NodeId, Notification, Tree};

pub const LABEL_EMPTY: &str = "RLP is empty";
pub const LABEL_DECODE_ERROR: &str = "RLP decode error";
pub const LABEL_DECODE: &str = "Decode";
pub const LABEL_ENCODE: &str = "Encode";
pub const LABEL_INVALID: &str = "Invalid value";
pub const LABEL_ENCODE_ERROR: &str = "RLP encode error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encoded,
    Decoded,
}

/// Enabled state and caption of a mode-transition control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub enabled: bool,
    pub label: &'static str,
}

impl Control {
    fn enabled(label: &'static str) -> Self {
        Self {
            enabled: true,
            label,
        }
    }
    fn disabled(label: &'static str) -> Self {
        Self {
            enabled: false,
            label,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RootController {
    mode: Mode,
    input: String,
    tree: Option<Tree>,
    wire_text: Option<String>,
    decode_control: Control,
    encode_control: Control,
    revision: u64,
    opts: EditorOptions,
}

impl Default for RootController {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl RootController {
    pub fn new(opts: EditorOptions) -> Self {
        Self {
            mode: Mode::Encoded,
            input: String::new(),
            tree: None,
            wire_text: None,
            decode_control: Control::disabled(LABEL_EMPTY),
            encode_control: Control::enabled(LABEL_ENCODE),
            revision: 0,
            opts,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
    /// Last wire text known to encode the tree.
    pub fn wire_text(&self) -> Option<&str> {
        self.wire_text.as_deref()
    }
    pub fn decode_control(&self) -> Control {
        self.decode_control
    }
    pub fn encode_control(&self) -> Control {
        self.encode_control
    }
    /// Bumped whenever the tree is replaced or structurally edited.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ---- Encoded mode ----

    pub fn set_input(&mut self, text: &str) -> Result<(), EditError> {
        if self.mode != Mode::Encoded {
            return Err(EditError::WrongMode("encoded"));
        }
        self.load_input(text);
        Ok(())
    }

    fn load_input(&mut self, text: &str) {
        self.input = text.to_owned();
        if text.trim().is_empty() {
            self.tree = None;
            self.wire_text = None;
            self.decode_control = Control::disabled(LABEL_EMPTY);
            return;
        }
        match decode_wire_text(text) {
            Ok(value) => {
                log::debug!("decoded wire text into {} value", if value.is_list() { "list" } else { "leaf" });
                self.tree = Some(Tree::from_value(value, self.opts.clone()));
                self.wire_text = Some(normalize_wire_text(text));
                self.decode_control = Control::enabled(LABEL_DECODE);
                self.revision += 1;
            }
            Err(e) => {
                log::warn!("wire text rejected: {}", e);
                self.tree = None;
                self.wire_text = None;
                self.decode_control = Control::disabled(LABEL_DECODE_ERROR);
            }
        }
    }

    pub fn enter_decoded(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Encoded {
            return Err(EditError::WrongMode("encoded"));
        }
        if !self.decode_control.enabled || self.tree.is_none() {
            return Err(EditError::NoTree);
        }
        self.mode = Mode::Decoded;
        self.encode_control = Control::enabled(LABEL_ENCODE);
        Ok(())
    }

    // ---- Decoded mode ----

    /// Returns to Encoded mode. Edits that never produced wire text (the
    /// tree is invalid right now) are discarded by re-decoding the last good
    /// wire text.
    pub fn leave_decoded(&mut self) -> Result<(), EditError> {
        if self.mode != Mode::Decoded {
            return Err(EditError::WrongMode("decoded"));
        }
        self.mode = Mode::Encoded;
        let text = self.wire_text.clone().unwrap_or_default();
        if self.encode_control.enabled {
            self.input = text;
        } else {
            log::debug!("discarding invalid edits");
            self.load_input(&text);
        }
        Ok(())
    }

    /// Runs one edit against the tree and absorbs the root notification.
    pub fn edit<F>(&mut self, f: F) -> Result<Notification, EditError>
    where
        F: FnOnce(&mut Tree) -> Result<Notification, EditError>,
    {
        if self.mode != Mode::Decoded {
            return Err(EditError::WrongMode("decoded"));
        }
        let tree = self.tree.as_mut().ok_or(EditError::NoTree)?;
        let note = f(tree)?;
        self.absorb(&note);
        Ok(note)
    }

    pub fn edit_text(&mut self, id: NodeId, text: &str) -> Result<Notification, EditError> {
        self.edit(|t| t.edit_text(id, text))
    }
    pub fn select(&mut self, id: NodeId, repr: Representation) -> Result<Notification, EditError> {
        self.edit(|t| t.select(id, repr))
    }
    pub fn insert_after(&mut self, id: NodeId) -> Result<Notification, EditError> {
        self.edit(|t| t.insert_after(id))
    }
    pub fn remove(&mut self, id: NodeId) -> Result<Notification, EditError> {
        self.edit(|t| t.remove(id))
    }
    pub fn wrap_into_list(&mut self, id: NodeId) -> Result<Notification, EditError> {
        self.edit(|t| t.wrap_into_list(id))
    }
    pub fn append(&mut self, list: NodeId) -> Result<Notification, EditError> {
        self.edit(|t| t.append(list))
    }
    pub fn insert_at_head(&mut self, list: NodeId) -> Result<Notification, EditError> {
        self.edit(|t| t.insert_at_head(list))
    }

    fn absorb(&mut self, note: &Notification) {
        if note.rebuild {
            self.revision += 1;
        }
        if note.invalid {
            self.encode_control = Control::disabled(LABEL_INVALID);
            return;
        }
        let Some(value) = &note.value else {
            self.encode_control = Control::disabled(LABEL_INVALID);
            return;
        };
        match encode_wire_text(value) {
            Ok(text) => {
                self.wire_text = Some(text);
                self.encode_control = Control::enabled(LABEL_ENCODE);
            }
            Err(e) => {
                log::warn!("re-encode failed: {}", e);
                self.encode_control = Control::disabled(LABEL_ENCODE_ERROR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_states() {
        let mut c = RootController::default();
        assert_eq!(c.decode_control(), Control::disabled(LABEL_EMPTY));
        c.set_input("  \n").unwrap();
        assert_eq!(c.decode_control().label, LABEL_EMPTY);
        c.set_input("c3 82 74").unwrap();
        assert_eq!(c.decode_control(), Control::disabled(LABEL_DECODE_ERROR));
        assert!(c.enter_decoded().is_err());
        c.set_input("c382746f").unwrap();
        assert_eq!(c.decode_control(), Control::enabled(LABEL_DECODE));
        assert_eq!(c.wire_text(), Some("0xc382746f"));
        c.enter_decoded().unwrap();
        assert_eq!(c.mode(), Mode::Decoded);
        assert_eq!(c.set_input("c0"), Err(EditError::WrongMode("encoded")));
    }

    #[test]
    fn invalid_edit_keeps_wire_text() {
        let mut c = RootController::default();
        c.set_input("0xc382746f").unwrap();
        c.enter_decoded().unwrap();
        let leaf = c.tree().unwrap().resolve("/0").unwrap();
        c.edit_text(leaf, "0xnope").unwrap();
        assert_eq!(c.encode_control(), Control::disabled(LABEL_INVALID));
        assert_eq!(c.wire_text(), Some("0xc382746f"));

        c.leave_decoded().unwrap();
        assert_eq!(c.mode(), Mode::Encoded);
        assert_eq!(c.input(), "0xc382746f");
        let tree = c.tree().unwrap();
        assert!(tree.is_valid());
        let leaf = tree.resolve("/0").unwrap();
        assert_eq!(tree.leaf(leaf).unwrap().value(), Some(&b"to"[..]));
    }

    #[test]
    fn structural_edit_bumps_revision() {
        let mut c = RootController::default();
        c.set_input("c0").unwrap();
        let before = c.revision();
        c.enter_decoded().unwrap();
        let root = c.tree().unwrap().root();
        c.append(root).unwrap();
        assert_eq!(c.revision(), before + 1);
        assert_eq!(c.wire_text(), Some("0xc100"));
    }
}
