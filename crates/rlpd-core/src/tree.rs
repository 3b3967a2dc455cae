//! Arena-backed editable tree and the child -> parent notification protocol.
//!
//! Every edit starts at one node and produces a [`Notification`]. The
//! notification is handed to the parent list as a [`ChildRequest::Replace`],
//! the parent updates its copy of the child value and its invalid set, and
//! emits its own notification, until the root is reached. Structural edits
//! (insert, remove, wrap) set the `rebuild` flag: child positions changed,
//! so anything cached per position above the mutation is stale.
//!
//! Nodes are addressed by [`NodeId`] inside one [`Tree`]; child indices are
//! always derived from the parent's child vector, never stored.
use serde_json::json;

use crate::codecs::Representation;
use crate::error::EditError;
use crate::node::{LeafState, ListState, Node, NodeKind};
use crate::options::EditorOptions;
use crate::rlp::MAX_DEPTH;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: usize) -> Self {
        NodeId(raw)
    }
}

/// A request a child sends to its parent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRequest {
    Replace {
        index: usize,
        value: Option<Value>,
        invalid: bool,
    },
    InsertAfter(usize),
    Remove(usize),
    WrapIntoList(usize),
}

/// What a node reports upward after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub value: Option<Value>,
    pub invalid: bool,
    pub rebuild: bool,
}

impl Notification {
    pub fn value(value: Option<Value>, invalid: bool) -> Self {
        Self {
            value,
            invalid,
            rebuild: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
    opts: EditorOptions,
}

impl Tree {
    pub fn from_value(value: Value, opts: EditorOptions) -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            opts,
        };
        tree.root = tree.build(value, None);
        tree
    }

    fn build(&mut self, value: Value, parent: Option<NodeId>) -> NodeId {
        match value {
            Value::Leaf(bytes) => {
                let leaf = LeafState::new(bytes, &self.opts);
                self.alloc(Node {
                    parent,
                    kind: NodeKind::Leaf(leaf),
                })
            }
            Value::List(items) => {
                let id = self.alloc(Node {
                    parent,
                    kind: NodeKind::List(ListState::default()),
                });
                let children = items
                    .iter()
                    .map(|it| self.build(it.clone(), Some(id)))
                    .collect();
                if let Some(Some(Node {
                    kind: NodeKind::List(list),
                    ..
                })) = self.nodes.get_mut(id.0)
                {
                    list.children = children;
                    list.value = items;
                }
                id
            }
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            NodeId(slot)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur.0).and_then(Option::take) {
                if let NodeKind::List(list) = node.kind {
                    stack.extend(list.children);
                }
                self.free.push(cur.0);
            }
        }
    }

    // ---- inspection ----

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn options(&self) -> &EditorOptions {
        &self.opts
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, EditError> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(EditError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, EditError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(EditError::UnknownNode(id))
    }

    pub fn leaf(&self, id: NodeId) -> Result<&LeafState, EditError> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::List(_) => Err(EditError::NotALeaf(id)),
        }
    }

    pub fn list(&self, id: NodeId) -> Result<&ListState, EditError> {
        match &self.node(id)?.kind {
            NodeKind::List(list) => Ok(list),
            NodeKind::Leaf(_) => Err(EditError::NotAList(id)),
        }
    }

    fn leaf_mut(&mut self, id: NodeId) -> Result<&mut LeafState, EditError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::List(_) => Err(EditError::NotALeaf(id)),
        }
    }

    fn list_mut(&mut self, id: NodeId) -> Result<&mut ListState, EditError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::List(list) => Ok(list),
            NodeKind::Leaf(_) => Err(EditError::NotAList(id)),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self) -> bool {
        self.node(self.root).map(Node::is_valid).unwrap_or(false)
    }

    /// Value at the root, or `None` if the root is a leaf without bytes.
    pub fn value(&self) -> Option<Value> {
        self.value_of(self.root)
    }

    pub fn value_of(&self, id: NodeId) -> Option<Value> {
        match &self.node(id).ok()?.kind {
            NodeKind::Leaf(leaf) => leaf.leaf_value(),
            NodeKind::List(list) => Some(Value::List(list.value.clone())),
        }
    }

    /// Number of ancestors of `id`.
    pub fn depth_of(&self, id: NodeId) -> Result<usize, EditError> {
        let mut depth = 0;
        let mut cur = self.node(id)?;
        while let Some(parent) = cur.parent {
            depth += 1;
            cur = self.node(parent)?;
        }
        Ok(depth)
    }

    /// Position of `child` inside its parent.
    pub fn index_of(&self, child: NodeId) -> Result<(NodeId, usize), EditError> {
        let parent = self.node(child)?.parent.ok_or(EditError::NoParent(child))?;
        let index = self
            .list(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(EditError::UnknownNode(child))?;
        Ok((parent, index))
    }

    /// Pointer-style lookup: `""` is the root, `/0/2` is child 2 of child 0.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let mut cur = self.root;
        for tok in path.split('/').filter(|t| !t.is_empty()) {
            let index: usize = tok.parse().ok()?;
            cur = *self.list(cur).ok()?.children.get(index)?;
        }
        Some(cur)
    }

    pub fn path_of(&self, id: NodeId) -> Result<String, EditError> {
        let mut parts = Vec::new();
        let mut cur = id;
        while self.node(cur)?.parent.is_some() {
            let (parent, index) = self.index_of(cur)?;
            parts.push(index.to_string());
            cur = parent;
        }
        parts.reverse();
        Ok(parts.iter().map(|p| format!("/{}", p)).collect())
    }

    /// Full per-node state as JSON, independent of any front end.
    pub fn snapshot(&self) -> serde_json::Value {
        self.snapshot_node(self.root)
    }

    fn snapshot_node(&self, id: NodeId) -> serde_json::Value {
        match self.node(id).map(|n| &n.kind) {
            Ok(NodeKind::Leaf(leaf)) => {
                let mut views = serde_json::Map::new();
                for (repr, text) in leaf.views().iter() {
                    views.insert(repr.name().to_string(), json!(text));
                }
                json!({
                    "kind": "leaf",
                    "selected": leaf.selected().name(),
                    "value": leaf.value().map(hex::encode),
                    "views": views,
                    "draft": leaf.draft(),
                    "valid": leaf.is_valid(),
                })
            }
            Ok(NodeKind::List(list)) => json!({
                "kind": "list",
                "invalidChildren": list.invalid_children.iter().collect::<Vec<_>>(),
                "children": list
                    .children
                    .iter()
                    .map(|&c| self.snapshot_node(c))
                    .collect::<Vec<_>>(),
            }),
            Err(_) => serde_json::Value::Null,
        }
    }

    // ---- leaf edits ----

    pub fn edit_text(&mut self, id: NodeId, text: &str) -> Result<Notification, EditError> {
        let opts = self.opts.clone();
        let note = self.leaf_mut(id)?.edit_text(text, &opts);
        self.propagate(id, note)
    }

    pub fn select(&mut self, id: NodeId, repr: Representation) -> Result<Notification, EditError> {
        let opts = self.opts.clone();
        let note = self.leaf_mut(id)?.select(repr, &opts);
        log::debug!("node {:?} switched to {} (invalid={})", id, repr, note.invalid);
        self.propagate(id, note)
    }

    // ---- structural edits requested by a child of its parent ----

    pub fn insert_after(&mut self, id: NodeId) -> Result<Notification, EditError> {
        let (parent, index) = self.index_of(id)?;
        self.request(parent, ChildRequest::InsertAfter(index))
    }

    pub fn remove(&mut self, id: NodeId) -> Result<Notification, EditError> {
        let (parent, index) = self.index_of(id)?;
        self.request(parent, ChildRequest::Remove(index))
    }

    pub fn wrap_into_list(&mut self, id: NodeId) -> Result<Notification, EditError> {
        let (parent, index) = self.index_of(id)?;
        self.request(parent, ChildRequest::WrapIntoList(index))
    }

    // ---- list-level controls ----

    /// Appends a placeholder leaf to the end of `list`.
    pub fn append(&mut self, list: NodeId) -> Result<Notification, EditError> {
        let pos = self.list(list)?.len();
        self.insert_placeholder(list, pos)?;
        let note = self.list(list)?.report(true);
        self.propagate(list, note)
    }

    pub fn insert_at_head(&mut self, list: NodeId) -> Result<Notification, EditError> {
        self.insert_placeholder(list, 0)?;
        let note = self.list(list)?.report(true);
        self.propagate(list, note)
    }

    // Structural requests only; value replacements originate in `propagate`.
    fn request(&mut self, parent: NodeId, req: ChildRequest) -> Result<Notification, EditError> {
        let note = self.deliver(parent, req, false).inspect_err(|e| {
            log::error!("structural edit at {:?} failed: {}", parent, e);
        })?;
        self.propagate(parent, note)
    }

    fn propagate(&mut self, from: NodeId, mut note: Notification) -> Result<Notification, EditError> {
        let mut cur = from;
        while self.node(cur)?.parent.is_some() {
            let (parent, index) = self.index_of(cur)?;
            let rebuild = note.rebuild;
            let req = ChildRequest::Replace {
                index,
                value: note.value,
                invalid: note.invalid,
            };
            note = self.deliver(parent, req, rebuild)?;
            cur = parent;
        }
        log::debug!(
            "root notified (invalid={}, rebuild={})",
            note.invalid,
            note.rebuild
        );
        Ok(note)
    }

    fn deliver(
        &mut self,
        parent: NodeId,
        req: ChildRequest,
        rebuild: bool,
    ) -> Result<Notification, EditError> {
        let len = self.list(parent)?.len();
        let check = |index: usize| {
            if index < len {
                Ok(())
            } else {
                Err(EditError::IndexOutOfBounds { index, len })
            }
        };
        match req {
            ChildRequest::Replace {
                index,
                value,
                invalid,
            } => {
                check(index)?;
                if rebuild {
                    self.regenerate(parent, index, invalid)?;
                } else {
                    self.list_mut(parent)?.replace(index, value, invalid);
                }
                Ok(self.list(parent)?.report(rebuild))
            }
            ChildRequest::InsertAfter(index) => {
                check(index)?;
                self.insert_placeholder(parent, index + 1)?;
                Ok(self.list(parent)?.report(true))
            }
            ChildRequest::Remove(index) => {
                check(index)?;
                let child = self.list_mut(parent)?.splice_out(index);
                self.release(child);
                log::debug!("removed child {} of {:?}", index, parent);
                Ok(self.list(parent)?.report(true))
            }
            ChildRequest::WrapIntoList(index) => {
                check(index)?;
                self.wrap_child(parent, index)?;
                Ok(self.list(parent)?.report(true))
            }
        }
    }

    fn insert_placeholder(&mut self, list: NodeId, pos: usize) -> Result<(), EditError> {
        self.list(list)?;
        let bytes = self.opts.placeholder.clone();
        let leaf = LeafState::new(bytes.clone(), &self.opts);
        let id = self.alloc(Node {
            parent: Some(list),
            kind: NodeKind::Leaf(leaf),
        });
        self.list_mut(list)?.splice_in(pos, id, Value::Leaf(bytes));
        log::debug!("inserted placeholder at {} of {:?}", pos, list);
        Ok(())
    }

    fn wrap_child(&mut self, parent: NodeId, index: usize) -> Result<(), EditError> {
        let child = self.list(parent)?.children[index];
        if self.depth_of(child)? >= MAX_DEPTH {
            return Err(EditError::TooDeep(child));
        }
        let valid = match &self.node(child)?.kind {
            NodeKind::Leaf(leaf) => leaf.is_valid(),
            NodeKind::List(_) => return Err(EditError::NotALeaf(child)),
        };
        let old = self.list(parent)?.value[index].clone();
        let mut wrapper = ListState {
            value: vec![old.clone()],
            children: vec![child],
            ..ListState::default()
        };
        wrapper.mark(0, !valid);
        let wrapper_id = self.alloc(Node {
            parent: Some(parent),
            kind: NodeKind::List(wrapper),
        });
        self.node_mut(child)?.parent = Some(wrapper_id);
        let list = self.list_mut(parent)?;
        list.children[index] = wrapper_id;
        list.value[index] = Value::List(vec![old]);
        log::debug!("wrapped child {} of {:?} into {:?}", index, parent, wrapper_id);
        Ok(())
    }

    // Rebuild: the list's copy of its children is regenerated from the
    // children themselves rather than patched at one index.
    fn regenerate(&mut self, list: NodeId, index: usize, invalid: bool) -> Result<(), EditError> {
        let children = self.list(list)?.children.clone();
        let fresh: Vec<Option<Value>> = children.iter().map(|&c| self.value_of(c)).collect();
        let state = self.list_mut(list)?;
        for (slot, v) in state.value.iter_mut().zip(fresh) {
            if let Some(v) = v {
                *slot = v;
            }
        }
        state.mark(index, invalid);
        Ok(())
    }
}
