// Per-node editing state. Leaves keep their bytes plus a cache of all four
// views; lists keep the last value each child reported and which children
// are currently invalid.
use std::collections::BTreeSet;

use crate::codecs::{LeafViews, Representation};
use crate::options::EditorOptions;
use crate::tree::{NodeId, Notification};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(LeafState),
    List(ListState),
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
    pub fn is_valid(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf.is_valid(),
            NodeKind::List(list) => list.invalid_children.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeafState {
    value: Option<Vec<u8>>,
    selected: Representation,
    views: LeafViews,
    // text of the last rejected edit, shown instead of the cached view
    draft: Option<String>,
}

impl LeafState {
    pub fn new(bytes: Vec<u8>, opts: &EditorOptions) -> Self {
        Self {
            views: LeafViews::compute(&bytes, opts),
            value: Some(bytes),
            selected: Representation::default(),
            draft: None,
        }
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
    pub fn selected(&self) -> Representation {
        self.selected
    }
    pub fn views(&self) -> &LeafViews {
        &self.views
    }
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }
    pub fn is_valid(&self) -> bool {
        self.value.is_some() && self.draft.is_none()
    }

    /// Text for the selected representation; empty when unrepresentable.
    pub fn text(&self) -> &str {
        self.draft
            .as_deref()
            .or_else(|| self.views.get(self.selected))
            .unwrap_or("")
    }

    /// Text edit in the selected representation.
    pub fn edit_text(&mut self, text: &str, opts: &EditorOptions) -> Notification {
        match self.selected.encode(text) {
            Some(bytes) => {
                self.views = LeafViews::compute(&bytes, opts);
                self.value = Some(bytes);
                self.draft = None;
                Notification::value(self.leaf_value(), false)
            }
            None => {
                log::debug!("{} rejected {:?}", self.selected, text);
                self.draft = Some(text.to_owned());
                Notification::value(self.leaf_value(), true)
            }
        }
    }

    /// Representation switch: the new bytes come from encoding the cached
    /// view of `repr`, so an unrepresentable view leaves the leaf without a
    /// value until the user types a valid one.
    pub fn select(&mut self, repr: Representation, opts: &EditorOptions) -> Notification {
        self.selected = repr;
        self.draft = None;
        self.value = self.views.get(repr).and_then(|text| repr.encode(text));
        match &self.value {
            Some(bytes) => {
                self.views = LeafViews::compute(bytes, opts);
                Notification::value(self.leaf_value(), false)
            }
            None => Notification::value(None, true),
        }
    }

    pub(crate) fn leaf_value(&self) -> Option<Value> {
        self.value.clone().map(Value::Leaf)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub(crate) value: Vec<Value>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) invalid_children: BTreeSet<usize>,
}

impl ListState {
    pub fn value(&self) -> &[Value] {
        &self.value
    }
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
    pub fn invalid_children(&self) -> &BTreeSet<usize> {
        &self.invalid_children
    }
    pub fn len(&self) -> usize {
        self.children.len()
    }
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn mark(&mut self, index: usize, invalid: bool) {
        if invalid {
            self.invalid_children.insert(index);
        } else {
            self.invalid_children.remove(&index);
        }
    }

    /// Overwrites `value[index]` when a value is supplied; an invalid child
    /// without bytes keeps its last reported value.
    pub(crate) fn replace(&mut self, index: usize, value: Option<Value>, invalid: bool) {
        if let Some(v) = value {
            self.value[index] = v;
        }
        self.mark(index, invalid);
    }

    pub(crate) fn splice_in(&mut self, pos: usize, id: NodeId, value: Value) {
        self.invalid_children = self
            .invalid_children
            .iter()
            .map(|&i| if i >= pos { i + 1 } else { i })
            .collect();
        self.children.insert(pos, id);
        self.value.insert(pos, value);
    }

    pub(crate) fn splice_out(&mut self, index: usize) -> NodeId {
        self.invalid_children = self
            .invalid_children
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        self.value.remove(index);
        self.children.remove(index)
    }

    pub(crate) fn report(&self, rebuild: bool) -> Notification {
        Notification {
            value: Some(Value::List(self.value.clone())),
            invalid: !self.invalid_children.is_empty(),
            rebuild,
        }
    }
}
