//! Computational topology of triangulated manifolds.
//!
//! This crate re-exports the Regina engine crates and adds the packet tree
//! that groups triangulations, surface lists, text and attachments into one
//! document.
//!
//! # Example
//!
//! ```rust
//! use regina::prelude::*;
//!
//! let tri = Triangulation::<Dim3>::from_isosig("cPcbbbiht").unwrap();
//! assert_eq!(tri.homology().unwrap().to_string(), "Z");
//!
//! let options = EnumerationOptions::vertex(CoordSystem::Quad);
//! let surfaces = NormalSurfaces::enumerate(&tri, &options).unwrap();
//! assert_eq!(surfaces.len(), 4);
//!
//! let mut root = PacketNode::container("Figure eight");
//! root.append(PacketNode::new("Quad vertex surfaces", Packet::SurfaceList(surfaces)));
//! assert_eq!(root.total_tree_size(), 2);
//! ```

mod attachment;
mod error;
mod format;
mod packet;
mod visitor;

pub use attachment::{Attachment, BASE64_LINE_LEN};
pub use error::{PacketError, PacketResult};
pub use format::FileFormat;
pub use packet::{Packet, PacketNode, PacketType, Subtree};
pub use visitor::PacketVisitor;
pub use {
    regina_maths as maths, regina_surfaces as surfaces, regina_triangulation as triangulation,
    regina_util as util,
};

/// Prelude of common imports.
pub mod prelude {
    pub use regina_maths::prelude::*;
    pub use regina_surfaces::prelude::*;
    pub use regina_triangulation::prelude::*;

    pub use crate::{
        Attachment, FileFormat, Packet, PacketError, PacketNode, PacketResult, PacketType,
        PacketVisitor,
    };
}
