//! Packet trees.
//!
//! A document is a tree of [`PacketNode`]s. Each node owns one [`Packet`]
//! (a triangulation, a surface list, some text, ...) together with a label,
//! a set of tags and an ordered list of children. Children are addressed by
//! their position under their parent.

use std::collections::BTreeSet;

use regina_surfaces::NormalSurfaces;
use regina_triangulation::{Dim3, Dim4, Triangulation};

use crate::{Attachment, PacketError, PacketResult, PacketVisitor};

/// Kind of content held by a packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::Display)]
pub enum PacketType {
    /// Holds nothing and only groups its children.
    #[strum(to_string = "Container")]
    Container,
    /// Holds plain text.
    #[strum(to_string = "Text")]
    Text,
    /// Holds a 3-manifold triangulation.
    #[strum(to_string = "3-D Triangulation")]
    Triangulation3,
    /// Holds a 4-manifold triangulation.
    #[strum(to_string = "4-D Triangulation")]
    Triangulation4,
    /// Holds a list of normal surfaces.
    #[strum(to_string = "Normal Surface List")]
    SurfaceList,
    /// Holds an arbitrary file.
    #[strum(to_string = "Attachment")]
    Attachment,
}

/// Content of a packet.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub enum Packet {
    Container,
    Text(String),
    Triangulation3(Triangulation<Dim3>),
    Triangulation4(Triangulation<Dim4>),
    SurfaceList(NormalSurfaces),
    Attachment(Attachment),
}

impl Packet {
    /// Returns the kind of content.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Container => PacketType::Container,
            Packet::Text(_) => PacketType::Text,
            Packet::Triangulation3(_) => PacketType::Triangulation3,
            Packet::Triangulation4(_) => PacketType::Triangulation4,
            Packet::SurfaceList(_) => PacketType::SurfaceList,
            Packet::Attachment(_) => PacketType::Attachment,
        }
    }
}

impl From<Triangulation<Dim3>> for Packet {
    fn from(tri: Triangulation<Dim3>) -> Self {
        Packet::Triangulation3(tri)
    }
}
impl From<Triangulation<Dim4>> for Packet {
    fn from(tri: Triangulation<Dim4>) -> Self {
        Packet::Triangulation4(tri)
    }
}
impl From<NormalSurfaces> for Packet {
    fn from(list: NormalSurfaces) -> Self {
        Packet::SurfaceList(list)
    }
}
impl From<Attachment> for Packet {
    fn from(attachment: Attachment) -> Self {
        Packet::Attachment(attachment)
    }
}

/// Node in a packet tree.
#[derive(Debug, Clone)]
pub struct PacketNode {
    label: String,
    tags: BTreeSet<String>,
    packet: Packet,
    children: Vec<PacketNode>,
}

impl PacketNode {
    /// Constructs a node with no children.
    pub fn new(label: impl Into<String>, packet: impl Into<Packet>) -> Self {
        Self {
            label: label.into(),
            tags: BTreeSet::new(),
            packet: packet.into(),
            children: vec![],
        }
    }
    /// Constructs an empty container.
    pub fn container(label: impl Into<String>) -> Self {
        Self::new(label, Packet::Container)
    }
    /// Constructs a text packet.
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label, Packet::Text(text.into()))
    }

    /// Returns the content.
    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    /// Returns the content mutably.
    pub fn packet_mut(&mut self) -> &mut Packet {
        &mut self.packet
    }
    /// Returns the kind of content.
    pub fn packet_type(&self) -> PacketType {
        self.packet.packet_type()
    }

    /// Returns the label, which may be empty.
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Replaces the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
    /// Returns the label for display, which is never empty.
    pub fn human_label(&self) -> &str {
        match self.label.is_empty() {
            true => "(no label)",
            false => &self.label,
        }
    }
    /// Returns the label followed by `adornment` in parentheses, or just
    /// `adornment` if the label is blank.
    pub fn adorned_label(&self, adornment: &str) -> String {
        match self.label.trim() {
            "" => adornment.to_owned(),
            label => format!("{label} ({adornment})"),
        }
    }
    /// Returns the label together with the kind of packet.
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.human_label(), self.packet_type())
    }

    /// Returns the tags in sorted order.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
    /// Returns whether the packet has the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
    /// Adds a tag. Returns `false` if it was already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }
    /// Removes a tag. Returns `false` if it was not present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }
    /// Removes every tag.
    pub fn remove_all_tags(&mut self) {
        self.tags.clear();
    }

    /// Returns the children in order.
    pub fn children(&self) -> &[PacketNode] {
        &self.children
    }
    /// Returns the number of immediate children.
    pub fn count_children(&self) -> usize {
        self.children.len()
    }
    /// Returns the number of strict descendants.
    pub fn count_descendants(&self) -> usize {
        self.total_tree_size() - 1
    }
    /// Returns the number of nodes in this subtree, including this one.
    pub fn total_tree_size(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_tree_size()).sum::<usize>()
    }

    /// Returns the child at `index`.
    pub fn child(&self, index: usize) -> PacketResult<&PacketNode> {
        let len = self.children.len();
        self.children.get(index).ok_or(PacketError::ChildOutOfRange { index, len })
    }
    /// Returns the child at `index` mutably.
    pub fn child_mut(&mut self, index: usize) -> PacketResult<&mut PacketNode> {
        let len = self.children.len();
        self.children.get_mut(index).ok_or(PacketError::ChildOutOfRange { index, len })
    }

    /// Adds a child after the existing children.
    pub fn append(&mut self, child: PacketNode) -> &mut PacketNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
    /// Adds a child before the existing children.
    pub fn prepend(&mut self, child: PacketNode) -> &mut PacketNode {
        self.children.insert(0, child);
        &mut self.children[0]
    }
    /// Inserts a child so that it ends up at `index`.
    pub fn insert(&mut self, index: usize, child: PacketNode) -> PacketResult<&mut PacketNode> {
        let len = self.children.len();
        if index > len {
            return Err(PacketError::ChildOutOfRange { index, len });
        }
        self.children.insert(index, child);
        Ok(&mut self.children[index])
    }
    /// Detaches and returns the child at `index`, with its subtree.
    pub fn remove(&mut self, index: usize) -> PacketResult<PacketNode> {
        let len = self.children.len();
        if index >= len {
            return Err(PacketError::ChildOutOfRange { index, len });
        }
        Ok(self.children.remove(index))
    }
    /// Moves the child at `from` so that it ends up at `to`, shifting the
    /// children in between.
    pub fn move_child(&mut self, from: usize, to: usize) -> PacketResult<()> {
        let len = self.children.len();
        for index in [from, to] {
            if index >= len {
                return Err(PacketError::ChildOutOfRange { index, len });
            }
        }
        match from < to {
            true => self.children[from..=to].rotate_left(1),
            false => self.children[to..=from].rotate_right(1),
        }
        Ok(())
    }
    /// Moves every child of this node to the end of `other`'s children.
    pub fn transfer_children(&mut self, other: &mut PacketNode) {
        other.children.append(&mut self.children);
    }
    /// Sorts the immediate children by label. Children with equal labels
    /// keep their relative order.
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| a.label.cmp(&b.label));
    }

    /// Iterates over this node and all its descendants in depth-first
    /// order, parents before children.
    pub fn subtree(&self) -> Subtree<'_> {
        Subtree { stack: vec![self] }
    }
    /// Iterates over the strict descendants in depth-first order.
    pub fn descendants(&self) -> Subtree<'_> {
        Subtree {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Returns the first node in this subtree with the given label.
    pub fn find_label(&self, label: &str) -> Option<&PacketNode> {
        self.subtree().find(|node| node.label == label)
    }
    /// Returns the first node in this subtree holding the given kind of
    /// packet.
    pub fn first_of_type(&self, packet_type: PacketType) -> Option<&PacketNode> {
        self.subtree().find(|node| node.packet_type() == packet_type)
    }

    /// Returns the path of child indices from this node down to the first
    /// node with the given label.
    pub fn path_to_label(&self, label: &str) -> Option<Vec<usize>> {
        if self.label == label {
            return Some(vec![]);
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            let mut path = child.path_to_label(label)?;
            path.insert(0, i);
            Some(path)
        })
    }
    /// Returns the descendant reached by following a path of child indices.
    pub fn at_path(&self, path: &[usize]) -> PacketResult<&PacketNode> {
        path.iter().try_fold(self, |node, &i| node.child(i))
    }
    /// Returns the descendant reached by following a path of child indices,
    /// mutably.
    pub fn at_path_mut(&mut self, path: &[usize]) -> PacketResult<&mut PacketNode> {
        path.iter().try_fold(self, |node, &i| node.child_mut(i))
    }

    /// Walks this subtree depth-first, calling `visitor` on every node.
    pub fn accept(&self, visitor: &mut impl PacketVisitor) {
        self.accept_at_depth(visitor, 0);
    }
    fn accept_at_depth(&self, visitor: &mut impl PacketVisitor, depth: usize) {
        visitor.enter(self, depth);
        match &self.packet {
            Packet::Container => visitor.visit_container(self),
            Packet::Text(text) => visitor.visit_text(self, text),
            Packet::Triangulation3(tri) => visitor.visit_triangulation3(self, tri),
            Packet::Triangulation4(tri) => visitor.visit_triangulation4(self, tri),
            Packet::SurfaceList(list) => visitor.visit_surface_list(self, list),
            Packet::Attachment(attachment) => visitor.visit_attachment(self, attachment),
        }
        for child in &self.children {
            child.accept_at_depth(visitor, depth + 1);
        }
        visitor.leave(self, depth);
    }
}

/// Depth-first iterator over a packet subtree.
#[derive(Debug, Clone)]
pub struct Subtree<'a> {
    stack: Vec<&'a PacketNode>,
}

impl<'a> Iterator for Subtree<'a> {
    type Item = &'a PacketNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
