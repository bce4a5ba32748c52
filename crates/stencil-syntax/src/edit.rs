//! Persistent rewriting of positioned trees.
//!
//! An edit never mutates the tree it was made against. [`TreeEditor::finish`]
//! rebuilds the green nodes on the paths from the root to each edit and
//! reuses every other subtree as is, then wraps the result in a new
//! positioned root.

use std::collections::BTreeMap;

use crate::{
    Annotation, GreenElement, GreenNode, NodeOrToken, SyntaxElement, SyntaxError,
    SyntaxListBuilder, SyntaxNode, SyntaxToken,
};

type SlotPath = Vec<u32>;

#[derive(Default)]
struct SlotEdit {
    before: Vec<GreenElement>,
    replacement: Option<Replacement>,
    after: Vec<GreenElement>,
}

impl SlotEdit {
    fn is_structural(&self) -> bool {
        self.replacement.is_some()
    }
}

enum Replacement {
    With(GreenElement),
    Remove,
}

/// Collects edits against one positioned tree and applies them together.
pub struct TreeEditor {
    root: SyntaxNode,
    edits: BTreeMap<SlotPath, SlotEdit>,
}

impl TreeEditor {
    pub fn new(node: &SyntaxNode) -> Self {
        Self { root: node.root(), edits: BTreeMap::new() }
    }

    /// Substitutes `replacement` for `target`.
    pub fn replace(
        &mut self,
        target: impl Into<SyntaxElement>,
        replacement: impl Into<GreenElement>,
    ) -> Result<&mut Self, SyntaxError> {
        let path = self.path_of(target.into())?;
        self.set_replacement(path, Replacement::With(replacement.into()))
    }

    /// Removes `target`. Inside a `LIST` the remaining items close up;
    /// elsewhere the slot becomes absent.
    pub fn remove(&mut self, target: impl Into<SyntaxElement>) -> Result<&mut Self, SyntaxError> {
        let path = self.path_of(target.into())?;
        if path.is_empty() {
            return Err(SyntaxError::RootEdit);
        }
        self.set_replacement(path, Replacement::Remove)
    }

    pub fn insert_before(
        &mut self,
        anchor: impl Into<SyntaxElement>,
        element: impl Into<GreenElement>,
    ) -> Result<&mut Self, SyntaxError> {
        let path = self.path_of(anchor.into())?;
        if path.is_empty() {
            return Err(SyntaxError::RootEdit);
        }
        self.edits.entry(path).or_default().before.push(element.into());
        Ok(self)
    }

    pub fn insert_after(
        &mut self,
        anchor: impl Into<SyntaxElement>,
        element: impl Into<GreenElement>,
    ) -> Result<&mut Self, SyntaxError> {
        let path = self.path_of(anchor.into())?;
        if path.is_empty() {
            return Err(SyntaxError::RootEdit);
        }
        self.edits.entry(path).or_default().after.push(element.into());
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies all edits and returns the root of the new tree.
    pub fn finish(self) -> Result<SyntaxNode, SyntaxError> {
        if self.edits.is_empty() {
            return Ok(self.root);
        }
        self.check_overlaps()?;

        if let Some(root_edit) = self.edits.get(&SlotPath::new()) {
            return match &root_edit.replacement {
                Some(Replacement::With(NodeOrToken::Node(node))) => {
                    tracing::debug!(kind = ?node.kind(), "replaced tree root");
                    Ok(SyntaxNode::new_root(node.clone()))
                }
                _ => Err(SyntaxError::InvalidRoot),
            };
        }

        let mut rebuilt = 0usize;
        let green = rebuild(self.root.green(), &mut SlotPath::new(), &self.edits, &mut rebuilt);
        tracing::debug!(edits = self.edits.len(), rebuilt, "rewrote tree");
        match green {
            Some(NodeOrToken::Node(node)) => Ok(SyntaxNode::new_root(node)),
            _ => Err(SyntaxError::InvalidRoot),
        }
    }

    fn path_of(&self, element: SyntaxElement) -> Result<SlotPath, SyntaxError> {
        if !element.same_tree(&self.root) {
            return Err(SyntaxError::ForeignElement);
        }
        Ok(element.slot_path())
    }

    fn set_replacement(
        &mut self,
        path: SlotPath,
        replacement: Replacement,
    ) -> Result<&mut Self, SyntaxError> {
        let edit = self.edits.entry(path.clone()).or_default();
        if edit.replacement.is_some() {
            return Err(SyntaxError::OverlappingEdits { path });
        }
        edit.replacement = Some(replacement);
        Ok(self)
    }

    /// A replaced or removed element must not have edits below it.
    fn check_overlaps(&self) -> Result<(), SyntaxError> {
        let mut replaced: Option<&SlotPath> = None;
        for (path, edit) in &self.edits {
            if let Some(ancestor) = replaced {
                if path.starts_with(ancestor) {
                    return Err(SyntaxError::OverlappingEdits { path: path.clone() });
                }
            }
            if edit.is_structural() {
                replaced = Some(path);
            }
        }
        Ok(())
    }
}

/// Rebuilds `node` below `prefix`. Returns `None` when a list loses all of
/// its items, and a single item when a list shrinks to one.
fn rebuild(
    node: &GreenNode,
    prefix: &mut SlotPath,
    edits: &BTreeMap<SlotPath, SlotEdit>,
    rebuilt: &mut usize,
) -> Option<GreenElement> {
    *rebuilt += 1;
    let depth = prefix.len();
    let mut touched: Vec<u32> = edits
        .range(prefix.clone()..)
        .map(|(path, _)| path)
        .take_while(|path| path.starts_with(prefix))
        .filter_map(|path| path.get(depth).copied())
        .collect();
    touched.dedup();

    let mut slots = node.slots().to_vec();
    let mut expanded: Vec<(usize, Vec<GreenElement>)> = Vec::new();
    for slot in touched {
        let index = slot as usize;
        prefix.push(slot);

        let mut child = slots.get(index).cloned().flatten();
        let has_nested = edits
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .any(|(path, _)| path.len() > prefix.len());
        if has_nested {
            if let Some(NodeOrToken::Node(inner)) = &child {
                child = rebuild(inner, prefix, edits, rebuilt);
            }
        }

        let mut items = Vec::new();
        if let Some(edit) = edits.get(prefix.as_slice()) {
            items.extend(edit.before.iter().cloned());
            match &edit.replacement {
                Some(Replacement::With(replacement)) => items.push(replacement.clone()),
                Some(Replacement::Remove) => {}
                None => items.extend(child),
            }
            items.extend(edit.after.iter().cloned());
        } else {
            items.extend(child);
        }
        prefix.pop();

        match items.len() {
            0 => slots[index] = None,
            1 => slots[index] = items.pop(),
            _ => expanded.push((index, items)),
        }
    }

    if node.kind().is_list() {
        return splice_list(slots, expanded);
    }

    for (index, items) in expanded {
        let mut builder = SyntaxListBuilder::pooled();
        for item in &items {
            builder.add_list(item);
        }
        slots[index] = builder.to_list();
    }
    Some(node.with_slots(slots).into())
}

/// Flattens the edited slots of a `LIST` back into a list.
fn splice_list(
    slots: Vec<Option<GreenElement>>,
    mut expanded: Vec<(usize, Vec<GreenElement>)>,
) -> Option<GreenElement> {
    let mut builder = SyntaxListBuilder::pooled();
    expanded.reverse();
    for (index, slot) in slots.iter().enumerate() {
        match expanded.last() {
            Some((expanded_index, _)) if *expanded_index == index => {
                if let Some((_, items)) = expanded.pop() {
                    for item in &items {
                        builder.add_list(item);
                    }
                }
            }
            _ => {
                if let Some(item) = slot {
                    builder.add_list(item);
                }
            }
        }
    }
    builder.to_list()
}

impl SyntaxNode {
    /// Replaces this node and returns the root of the new tree.
    pub fn replace_with(
        &self,
        replacement: impl Into<GreenElement>,
    ) -> Result<Self, SyntaxError> {
        let mut editor = TreeEditor::new(self);
        editor.replace(self.clone(), replacement)?;
        editor.finish()
    }

    /// Returns this node, annotated, in a new tree. Position and parent
    /// chain are unchanged.
    pub fn with_annotation(&self, annotation: Annotation) -> Result<Self, SyntaxError> {
        let path = self.slot_path();
        let root = self.replace_with(self.green().with_annotation(annotation))?;
        root.descend_path(&path).and_then(NodeOrToken::into_node).ok_or(SyntaxError::InvalidRoot)
    }
}

impl SyntaxToken {
    /// Replaces this token and returns the root of the new tree.
    pub fn replace_with(
        &self,
        replacement: impl Into<GreenElement>,
    ) -> Result<SyntaxNode, SyntaxError> {
        let mut editor = TreeEditor::new(&self.parent());
        editor.replace(self.clone(), replacement)?;
        editor.finish()
    }

    /// Returns this token, annotated, in a new tree.
    pub fn with_annotation(&self, annotation: Annotation) -> Result<Self, SyntaxError> {
        let path = self.slot_path();
        let root = self.replace_with(self.green().with_annotation(annotation))?;
        root.descend_path(&path).and_then(NodeOrToken::into_token).ok_or(SyntaxError::InvalidRoot)
    }
}
