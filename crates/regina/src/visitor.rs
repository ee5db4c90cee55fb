use regina_surfaces::NormalSurfaces;
use regina_triangulation::{Dim3, Dim4, Triangulation};

use crate::{Attachment, PacketNode};

/// Callbacks for [`PacketNode::accept()`].
///
/// Every method does nothing by default, so implementors only override the
/// kinds of packet they care about. For each node, `enter()` is called
/// first, then the method for its kind of packet, then the whole walk over
/// its children, and finally `leave()`.
#[allow(unused_variables)]
pub trait PacketVisitor {
    /// Called before anything else for each node. The root has depth 0.
    fn enter(&mut self, node: &PacketNode, depth: usize) {}
    /// Called after all the children of a node have been visited.
    fn leave(&mut self, node: &PacketNode, depth: usize) {}

    /// Visits a container.
    fn visit_container(&mut self, node: &PacketNode) {}
    /// Visits a text packet.
    fn visit_text(&mut self, node: &PacketNode, text: &str) {}
    /// Visits a 3-manifold triangulation.
    fn visit_triangulation3(&mut self, node: &PacketNode, tri: &Triangulation<Dim3>) {}
    /// Visits a 4-manifold triangulation.
    fn visit_triangulation4(&mut self, node: &PacketNode, tri: &Triangulation<Dim4>) {}
    /// Visits a normal surface list.
    fn visit_surface_list(&mut self, node: &PacketNode, list: &NormalSurfaces) {}
    /// Visits an attachment.
    fn visit_attachment(&mut self, node: &PacketNode, attachment: &Attachment) {}
}
