//! End-to-end checks on small census manifolds.

use std::collections::BTreeSet;

use eyre::{OptionExt, Result};
use pretty_assertions::assert_eq;
use proptest as _;
use regina::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vectors(list: &NormalSurfaces) -> BTreeSet<Vec<Integer>> {
    list.into_iter().map(|s| s.vector().to_vec()).collect()
}

#[test]
fn test_figure_eight_from_isosig() -> Result<()> {
    init_logging();
    let tri = Triangulation::<Dim3>::from_isosig("cPcbbbiht")?;
    assert_eq!(tri.size(), 2);
    assert!(tri.is_ideal());
    assert_eq!(tri.homology()?.to_string(), "Z");

    let quad = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Quad))?;
    assert_eq!(quad.len(), 4);
    assert!(quad.into_iter().all(|s| !s.is_compact()));

    let standard = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Standard))?;
    let link = standard.get(SurfaceId(0))?;
    assert_eq!(standard.len(), 1);
    assert!(link.is_vertex_linking());
    assert!(link.euler_char()?.is_zero());
    Ok(())
}

#[test]
fn test_twisted_kxi_conversion() -> Result<()> {
    init_logging();
    let tri = example::twisted_kxi()?;
    let standard = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Standard))?;
    let mut euler = standard
        .into_iter()
        .map(|s| Ok(s.euler_char()?.numerator().to_i64().ok_or_eyre("huge Euler characteristic")?))
        .collect::<Result<Vec<i64>>>()?;
    euler.sort();
    assert_eq!(euler, [-1, 0, 0, 0, 0, 0, 0, 1]);

    let quad = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Quad))?;
    let converted = standard.standard_to_quad()?;
    assert_eq!(converted.len(), 6);
    assert_eq!(vectors(&converted), vectors(&quad));
    Ok(())
}

#[test]
fn test_conversion_drops_vertex_links() -> Result<()> {
    let tri = example::s3()?;
    let standard = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Standard))?;
    assert_eq!(standard.len(), 7);
    let quad = standard.standard_to_quad()?;
    assert_eq!(quad.len(), 3);
    for s in &quad {
        assert!(!s.quad_to_standard()?.is_vertex_linking());
    }
    Ok(())
}

#[test]
fn test_census_homology() -> Result<()> {
    init_logging();
    for (dehydration, expected) in [
        ("cabbbbaei", "Z"),
        ("baaaade", "Z"),
        ("cabbbbapt", "Z + Z_5"),
        ("jgpadaaeffghfiihirmxitdagbj", "Z_3 + Z_6"),
    ] {
        let tri = Triangulation::<Dim3>::rehydrate(dehydration)?;
        assert_eq!(tri.homology()?.to_string(), expected, "{dehydration}");
        let mut subdivided = tri.clone();
        subdivided.barycentric_subdivision()?;
        assert_eq!(subdivided.size(), 24 * tri.size());
        assert_eq!(subdivided.homology()?.to_string(), expected, "subdivided {dehydration}");
    }
    Ok(())
}

#[test]
fn test_lens_space_enumeration() -> Result<()> {
    for (p, q) in [(3, 1), (5, 2), (7, 2)] {
        let tri = example::lens(p, q)?;
        assert_eq!(tri.homology()?.to_string(), format!("Z_{p}"));
        let tree = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Quad))?;
        let dd = NormalSurfaces::enumerate(
            &tri,
            &EnumerationOptions::vertex(CoordSystem::Quad).with_algorithm(Algorithm::DoubleDescription),
        )?;
        assert_eq!(vectors(&tree), vectors(&dd), "L({p},{q})");
        assert!(tree.into_iter().all(NormalSurface::is_compact));
    }
    Ok(())
}

#[derive(Default)]
struct SurfaceCounter {
    triangulations: usize,
    surfaces: usize,
    attachment_bytes: usize,
}

impl PacketVisitor for SurfaceCounter {
    fn visit_triangulation3(&mut self, _node: &PacketNode, _tri: &Triangulation<Dim3>) {
        self.triangulations += 1;
    }
    fn visit_surface_list(&mut self, _node: &PacketNode, list: &NormalSurfaces) {
        self.surfaces += list.len();
    }
    fn visit_attachment(&mut self, _node: &PacketNode, attachment: &Attachment) {
        self.attachment_bytes += attachment.size();
    }
}

#[test]
fn test_document() -> Result<()> {
    init_logging();
    let mut root = PacketNode::container("Census");
    for (label, sig) in [("Figure eight", "cPcbbbiht"), ("Gieseking", "bkaaid")] {
        let tri = Triangulation::<Dim3>::from_isosig(sig)?;
        let surfaces = NormalSurfaces::enumerate(&tri, &EnumerationOptions::vertex(CoordSystem::Standard))?;
        root.append(PacketNode::new(label, tri))
            .append(PacketNode::new(surfaces.coords().to_string(), surfaces));
    }
    let notes = Attachment::new(b"census notes\n".repeat(10), "notes.txt");
    let text = notes.to_base64();
    assert!(text.lines().all(|line| line.len() <= regina::BASE64_LINE_LEN));
    root.append(PacketNode::new("Notes", Attachment::from_base64(&text, notes.filename())?));

    let mut counter = SurfaceCounter::default();
    root.accept(&mut counter);
    assert_eq!(counter.triangulations, 2);
    assert_eq!(counter.surfaces, 2);
    assert_eq!(counter.attachment_bytes, 130);

    let gieseking = root.find_label("Gieseking").ok_or_eyre("missing packet")?;
    let Packet::Triangulation3(tri) = gieseking.packet() else {
        eyre::bail!("wrong packet type {}", gieseking.packet_type());
    };
    assert_eq!(tri.isosig(), "bkaaid");
    assert!(!tri.is_orientable());
    assert_eq!(FileFormat::from_root_element(FileFormat::default().root_element())?, FileFormat::Regina);
    Ok(())
}
