use std::collections::BTreeSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use regina_maths::{Integer, Rational};
use regina_triangulation::{Dim3, FaceId, SimplexId, Triangulation, example};
use strum::IntoEnumIterator;

use crate::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn one_tet() -> Triangulation<Dim3> {
    example::ball().unwrap()
}

fn vertex(tri: &Triangulation<Dim3>, coords: CoordSystem, algorithm: Algorithm) -> NormalSurfaces {
    let options = EnumerationOptions::vertex(coords).with_algorithm(algorithm);
    NormalSurfaces::enumerate(tri, &options).unwrap()
}

fn vectors(list: &NormalSurfaces) -> BTreeSet<Vec<i64>> {
    list.into_iter().map(small_vector).collect()
}

fn small_vector(s: &NormalSurface) -> Vec<i64> {
    s.vector().iter().map(|x| x.to_i64().unwrap()).collect()
}

fn ints(v: &[i64]) -> Vec<Integer> {
    v.iter().map(|&x| Integer::from(x)).collect()
}

/// Everything a surface reports about itself, for comparing against known
/// answers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Profile {
    vector: Vec<i64>,
    euler: i64,
    orientable: bool,
    two_sided: bool,
    real_boundary: bool,
    vertex_linking: bool,
    thin_edge_links: usize,
    central: Option<usize>,
    splitting: bool,
    components: usize,
    boundary_curves: usize,
    pieces: usize,
}

type Row = (&'static [i64], i64, bool, bool, bool, bool, usize, Option<usize>, bool, usize, usize, usize);

impl Profile {
    fn of(s: &NormalSurface) -> Self {
        let euler = s.euler_char().unwrap();
        assert!(euler.is_integer());
        Self {
            vector: small_vector(s),
            euler: euler.numerator().to_i64().unwrap(),
            orientable: s.is_orientable().unwrap(),
            two_sided: s.is_two_sided().unwrap(),
            real_boundary: s.has_real_boundary(),
            vertex_linking: s.is_vertex_linking(),
            thin_edge_links: s.thin_edge_links().unwrap().len(),
            central: s.central_disc_count(),
            splitting: s.is_splitting(),
            components: s.count_components().unwrap(),
            boundary_curves: s.boundary_curve_count().unwrap(),
            pieces: s.cut_along().unwrap(),
        }
    }

    fn expected(row: &Row) -> Self {
        let &(vector, euler, orientable, two_sided, real_boundary, vertex_linking, thin, central, splitting, components, curves, pieces) =
            row;
        Self {
            vector: vector.to_vec(),
            euler,
            orientable,
            two_sided,
            real_boundary,
            vertex_linking,
            thin_edge_links: thin,
            central,
            splitting,
            components,
            boundary_curves: curves,
            pieces,
        }
    }
}

fn assert_profiles(list: &NormalSurfaces, expected: &[Row]) {
    let mut actual: Vec<Profile> = list.into_iter().map(Profile::of).collect();
    actual.sort();
    let mut expected: Vec<Profile> = expected.iter().map(Profile::expected).collect();
    expected.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_matching_equation_shape() {
    init_logging();
    let kxi = example::twisted_kxi().unwrap();
    let eqs = MatchingEquations::new(&kxi, CoordSystem::Standard).unwrap();
    assert_eq!(eqs.width(), 21);
    assert_eq!(eqs.matrix().rows(), 15);
    assert_eq!(eqs.cliques().len(), 3);
    assert!(eqs.octagon_columns().is_empty());

    let an = MatchingEquations::new(&kxi, CoordSystem::AlmostNormal).unwrap();
    assert_eq!(an.width(), 30);
    assert_eq!(an.octagon_columns().len(), 9);
    assert_eq!(an.cliques()[0].len(), 6);

    let oriented = MatchingEquations::new(&kxi, CoordSystem::OrientedStandard).unwrap();
    assert_eq!(oriented.width(), 42);
    assert!(oriented.cliques()[0].iter().all(|group| group.len() == 2));

    // A single tetrahedron has nothing to match.
    let ball = MatchingEquations::new(&one_tet(), CoordSystem::Quad).unwrap();
    assert_eq!(ball.matrix().rows(), 0);
    assert_eq!(ball.width(), 3);
}

#[test]
fn test_admissibility() {
    let s3 = example::s3().unwrap();
    let eqs = MatchingEquations::new(&s3, CoordSystem::Standard).unwrap();
    let link = ints(&[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0]);
    assert!(eqs.is_admissible(&link).unwrap());
    let unmatched = ints(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert!(!eqs.is_admissible(&unmatched).unwrap());
    let negative = ints(&[-1, 0, 0, 0, 0, 0, 0, -1, 0, 0, 0, 0, 0, 0]);
    assert!(!eqs.is_admissible(&negative).unwrap());
    let two_quads = ints(&[0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0]);
    assert!(!eqs.is_admissible(&two_quads).unwrap());
    assert!(matches!(eqs.is_admissible(&link[1..]), Err(SurfaceError::InvalidArgument(_))));
}

#[test]
fn test_vertex_counts() {
    init_logging();
    let cases = [
        ("one tetrahedron", one_tet(), 3, 7, 10),
        ("C(1)", example::layered_loop(1, false).unwrap(), 1, 3, 4),
        ("C(2)", example::layered_loop(2, false).unwrap(), 3, 5, 5),
        ("C~(3)", example::layered_loop(3, true).unwrap(), 4, 5, 5),
        ("twisted KxI", example::twisted_kxi().unwrap(), 6, 8, 13),
        ("Gieseking", example::gieseking().unwrap(), 0, 1, 1),
        ("figure eight", example::figure_eight().unwrap(), 4, 1, 1),
        ("S3", example::s3().unwrap(), 3, 7, 7),
    ];
    for (name, tri, quad, standard, almost_normal) in cases {
        for algorithm in [Algorithm::Tree, Algorithm::DoubleDescription] {
            let counts = [CoordSystem::Quad, CoordSystem::Standard, CoordSystem::AlmostNormal]
                .map(|coords| vertex(&tri, coords, algorithm).len());
            assert_eq!(counts, [quad, standard, almost_normal], "{name} by {algorithm}");
        }
    }
}

#[test]
fn test_tree_matches_double_description() {
    init_logging();
    let triangulations = [
        one_tet(),
        example::s3().unwrap(),
        example::figure_eight().unwrap(),
        example::gieseking().unwrap(),
        example::twisted_kxi().unwrap(),
        example::layered_loop(2, false).unwrap(),
        example::layered_loop(3, true).unwrap(),
        example::layered_solid_torus(1, 2).unwrap(),
    ];
    for tri in &triangulations {
        for coords in [CoordSystem::Standard, CoordSystem::Quad, CoordSystem::AlmostNormal, CoordSystem::QuadOct] {
            let tree = vertex(tri, coords, Algorithm::Tree);
            let dd = vertex(tri, coords, Algorithm::DoubleDescription);
            assert_eq!(tree.status(), Enumeration::Complete);
            assert_eq!(tree.len(), vectors(&tree).len(), "duplicate surfaces");
            assert_eq!(vectors(&tree), vectors(&dd), "{coords} coordinates on {}", tri.isosig());

            let eqs = MatchingEquations::new(tri, coords).unwrap();
            for s in &tree {
                assert!(eqs.is_admissible(s.vector()).unwrap());
                assert!(s.is_embedded());
            }
        }
    }
}

#[test]
fn test_tree_search_on_long_layered_loops() {
    init_logging();
    // Each level pivots the parent tableau rather than solving from scratch.
    let start = std::time::Instant::now();
    let long = example::layered_loop(10, false).unwrap();
    let tree = vertex(&long, CoordSystem::Quad, Algorithm::Tree);
    assert_eq!(tree.status(), Enumeration::Complete);
    assert_eq!(tree.len(), 11);
    assert_eq!(vectors(&tree), vectors(&vertex(&long, CoordSystem::Quad, Algorithm::DoubleDescription)));
    let elapsed = start.elapsed();
    assert!(elapsed.as_secs() < 30, "quad enumeration took {elapsed:?}");

    for (len, count) in [(4, 9), (6, 20)] {
        let tri = example::layered_loop(len, false).unwrap();
        let tree = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
        assert_eq!(tree.len(), count, "layered loop of length {len}");
        assert_eq!(
            vectors(&tree),
            vectors(&vertex(&tri, CoordSystem::Standard, Algorithm::DoubleDescription)),
        );
    }
}

#[test]
fn test_figure_eight_standard() {
    init_logging();
    let tri = example::figure_eight().unwrap();
    let list = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
    assert_eq!(list.len(), 1);
    let s = list.get(SurfaceId(0)).unwrap();
    assert_eq!(small_vector(s), vec![1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0]);
    assert!(s.euler_char().unwrap().is_zero());
    assert!(s.is_vertex_linking());
    assert_eq!(s.vertex_link().unwrap(), Some(FaceId(0)));
    assert!(s.is_orientable().unwrap());
    assert!(s.is_two_sided().unwrap());
    assert!(s.is_connected().unwrap());
    assert_eq!(s.boundary_curve_count().unwrap(), 0);
    assert!(!s.has_real_boundary());
}

#[test]
fn test_figure_eight_spun_surfaces() {
    let tri = example::figure_eight().unwrap();
    let list = vertex(&tri, CoordSystem::Quad, Algorithm::Tree);
    let expected: BTreeSet<Vec<i64>> = [
        vec![0, 0, 2, 1, 0, 0],
        vec![0, 2, 0, 1, 0, 0],
        vec![1, 0, 0, 0, 0, 2],
        vec![1, 0, 0, 0, 2, 0],
    ]
    .into_iter()
    .collect();
    assert_eq!(vectors(&list), expected);
    for s in &list {
        assert!(!s.is_compact());
        assert!(!s.is_vertex_linking());
        assert_eq!(s.triangles(SimplexId(0), 0).unwrap(), None);
        assert!(matches!(s.euler_char(), Err(SurfaceError::FailedPrecondition(_))));
        assert!(matches!(s.is_orientable(), Err(SurfaceError::FailedPrecondition(_))));
        assert!(matches!(s.quad_to_standard(), Err(SurfaceError::NotImplemented(_))));
    }
    let s = NormalSurface::new(Arc::clone(list.triangulation()), CoordSystem::Quad, ints(&[1, 0, 0, 0, 2, 0])).unwrap();
    assert_eq!(s.to_string(), "inf inf inf inf ; 1 0 0 || inf inf inf inf ; 0 2 0");
}

#[test]
fn test_twisted_kxi_standard() {
    init_logging();
    let tri = example::twisted_kxi().unwrap();
    let list = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
    #[rustfmt::skip]
    let expected: &[Row] = &[
        (&[0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0], -1, true, false, true, false, 0, Some(3), true, 1, 1, 1),
        (&[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0], 0, false, false, false, false, 0, Some(3), false, 1, 0, 1),
        (&[0, 0, 1, 0, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0, 0, 0, 0], 0, false, false, true, false, 0, None, false, 1, 1, 1),
        (&[0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 1, 0, 0, 0], 0, false, false, true, false, 0, None, false, 1, 1, 1),
        (&[0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0], 0, true, false, true, false, 0, None, false, 1, 2, 1),
        (&[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1], 0, false, true, true, false, 0, Some(3), false, 1, 1, 1),
        (&[1, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0], 0, true, true, true, false, 1, None, false, 1, 2, 2),
        (&[1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0], 1, true, true, true, true, 0, None, false, 1, 1, 2),
    ];
    assert_profiles(&list, expected);

    let link = list.into_iter().find(|s| s.is_vertex_linking()).unwrap();
    assert_eq!(link.vertex_link().unwrap(), Some(FaceId(0)));
    let edges = tri.ensure_skeleton().faces(1).len();
    let weights: Vec<Integer> = (0..edges).map(|e| link.edge_weight(FaceId(e as u32)).unwrap()).collect();
    // Both ends of every edge are at the one vertex.
    assert!(weights.iter().all(|w| *w == 2_i64));
}

#[test]
fn test_twisted_kxi_quad() {
    let tri = example::twisted_kxi().unwrap();
    let list = vertex(&tri, CoordSystem::Quad, Algorithm::Tree);
    #[rustfmt::skip]
    let expected: &[Row] = &[
        (&[0, 0, 0, 0, 0, 0, 0, 0, 1], 0, false, true, true, false, 0, Some(3), false, 1, 1, 1),
        (&[0, 0, 0, 0, 0, 0, 0, 1, 0], 0, false, false, false, false, 0, Some(3), false, 1, 0, 1),
        (&[0, 0, 0, 0, 0, 0, 1, 0, 0], 0, true, false, true, false, 0, None, false, 1, 2, 1),
        (&[0, 0, 1, 0, 0, 1, 0, 0, 0], 0, true, true, true, false, 1, None, false, 1, 2, 2),
        (&[0, 1, 0, 0, 1, 0, 0, 0, 0], 0, false, false, true, false, 0, None, false, 1, 1, 1),
        (&[1, 0, 0, 1, 0, 0, 0, 0, 0], 0, false, false, true, false, 0, None, false, 1, 1, 1),
    ];
    assert_profiles(&list, expected);
}

#[test]
fn test_layered_loop_quads() {
    let c2 = example::layered_loop(2, false).unwrap();
    #[rustfmt::skip]
    assert_profiles(&vertex(&c2, CoordSystem::Quad, Algorithm::Tree), &[
        (&[0, 0, 1, 0, 1, 0], 1, false, false, false, false, 1, Some(2), true, 1, 0, 1),
        (&[0, 1, 0, 0, 0, 1], 1, false, false, false, false, 1, Some(2), true, 1, 0, 1),
        (&[1, 0, 0, 1, 0, 0], 0, true, true, false, false, 2, Some(2), true, 1, 0, 2),
    ]);

    let twisted = example::layered_loop(3, true).unwrap();
    #[rustfmt::skip]
    assert_profiles(&vertex(&twisted, CoordSystem::Quad, Algorithm::DoubleDescription), &[
        (&[0, 0, 1, 0, 0, 1, 0, 2, 0], 0, true, true, false, false, 1, None, false, 1, 0, 2),
        (&[0, 0, 1, 0, 2, 0, 0, 0, 1], 0, true, true, false, false, 1, None, false, 1, 0, 2),
        (&[0, 2, 0, 0, 0, 1, 0, 0, 1], 0, true, true, false, false, 1, None, false, 1, 0, 2),
        (&[1, 0, 0, 1, 0, 0, 1, 0, 0], 0, false, false, false, false, 1, Some(3), true, 1, 0, 1),
    ]);
}

#[test]
fn test_single_tetrahedron_almost_normal() {
    let tri = one_tet();
    let list = vertex(&tri, CoordSystem::AlmostNormal, Algorithm::Tree);
    let mut expected: Vec<Row> = vec![];
    for c in 0..10 {
        let mut v = [0; 10];
        v[c] = 1;
        let vector: &'static [i64] = Vec::leak(v.to_vec());
        let (linking, thin, splitting) = match c {
            0..=3 => (true, 0, false),
            4..=6 => (false, 2, true),
            _ => (false, 0, false),
        };
        expected.push((vector, 1, true, true, true, linking, thin, Some(1), splitting, 1, 1, 2));
    }
    assert_profiles(&list, &expected);
    for s in &list {
        assert!(!s.has_multiple_octagon_discs());
    }
}

#[test]
fn test_gieseking_link() {
    let tri = example::gieseking().unwrap();
    let list = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
    assert_profiles(&list, &[(&[1, 1, 1, 1, 0, 0, 0], 0, false, true, false, true, 0, None, false, 1, 0, 2)]);
    assert!(vertex(&tri, CoordSystem::Quad, Algorithm::Tree).is_empty());
}

#[test]
fn test_s3_surfaces() {
    let tri = example::s3().unwrap();
    let list = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
    assert_eq!(list.len(), 7);
    assert_eq!(list.into_iter().filter(|s| s.is_vertex_linking()).count(), 4);
    for s in &list {
        assert_eq!(s.euler_char().unwrap(), Rational::from(2_i64));
        assert!(s.is_orientable().unwrap());
        assert!(s.is_two_sided().unwrap());
        assert_eq!(s.count_components().unwrap(), 1);
        assert_eq!(s.boundary_curve_count().unwrap(), 0);
        assert_eq!(s.cut_along().unwrap(), 2);
    }

    let link = NormalSurface::new(
        Arc::new(tri.clone()),
        CoordSystem::Standard,
        ints(&[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0]),
    )
    .unwrap();
    let skeleton = tri.ensure_skeleton();
    let total: Integer = skeleton
        .faces(1)
        .iter_keys()
        .map(|e| link.edge_weight(e).unwrap())
        .sum();
    assert_eq!(total, Integer::from(3_i64));
    let (face, _) = skeleton.facet(SimplexId(0), 3);
    let arcs: Integer = (0..3).map(|v| link.arcs(face, v).unwrap()).sum();
    assert_eq!(arcs, Integer::from(1_i64));
    assert_eq!(link.vertex_link().unwrap(), Some(skeleton.vertex(SimplexId(0), 0)));
    assert_eq!(link.to_string(), "1 0 0 0 ; 0 0 0 || 1 0 0 0 ; 0 0 0");

    // Two vertex links together are disconnected and not a single link.
    let other = NormalSurface::new(
        Arc::new(tri.clone()),
        CoordSystem::Standard,
        ints(&[0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]),
    )
    .unwrap();
    let both = link.sum(&other).unwrap();
    assert_eq!(both.count_components().unwrap(), 2);
    assert!(!both.is_connected().unwrap());
    assert_eq!(both.vertex_link().unwrap(), None);
    assert_eq!(both.cut_along().unwrap(), 3);
    assert_eq!(both.euler_char().unwrap(), Rational::from(4_i64));
}

#[test]
fn test_fundamental_surfaces() {
    init_logging();
    let cases = [
        one_tet(),
        example::s3().unwrap(),
        example::figure_eight().unwrap(),
        example::gieseking().unwrap(),
        example::twisted_kxi().unwrap(),
    ];
    for tri in &cases {
        for coords in [CoordSystem::Standard, CoordSystem::Quad] {
            let fundamental = NormalSurfaces::enumerate(tri, &EnumerationOptions::fundamental(coords)).unwrap();
            assert_eq!(fundamental.kind(), SurfaceKind::Fundamental);
            assert_eq!(fundamental.algorithm(), Algorithm::HilbertDual);
            let vertex = vertex(tri, coords, Algorithm::DoubleDescription);
            // Every vertex surface here is also fundamental, and nothing else is.
            assert_eq!(vectors(&fundamental), vectors(&vertex));
        }
    }
}

#[test]
fn test_fundamental_contains_vertex() {
    let tri = example::layered_loop(2, false).unwrap();
    for coords in [CoordSystem::Standard, CoordSystem::Quad] {
        let fundamental = NormalSurfaces::enumerate(&tri, &EnumerationOptions::fundamental(coords)).unwrap();
        let vertex = vertex(&tri, coords, Algorithm::Tree);
        assert!(vectors(&vertex).is_subset(&vectors(&fundamental)));
        let eqs = MatchingEquations::new(&tri, coords).unwrap();
        for s in &fundamental {
            assert!(eqs.is_admissible(s.vector()).unwrap());
        }
    }
}

#[test]
fn test_oriented_coordinates() {
    init_logging();
    let tri = one_tet();
    let quad = vertex(&tri, CoordSystem::OrientedQuad, Algorithm::Tree);
    assert_eq!(quad.algorithm(), Algorithm::DoubleDescription);
    assert_eq!(quad.len(), 6);
    let standard = vertex(&tri, CoordSystem::OrientedStandard, Algorithm::DoubleDescription);
    assert_eq!(standard.len(), 14);

    let s = NormalSurface::new(Arc::new(tri), CoordSystem::OrientedQuad, ints(&[0, 0, 2, 1, 0, 0])).unwrap();
    assert_eq!(s.quads(SimplexId(0), 1).unwrap(), &Integer::from(3));
    assert_eq!(s.oriented(SimplexId(0), DiscType::Quad(1), Orientation::Positive).unwrap(), &Integer::from(2));
    assert_eq!(s.oriented(SimplexId(0), DiscType::Quad(1), Orientation::Negative).unwrap(), &Integer::from(1));
    assert!(matches!(s.quad_to_standard(), Err(SurfaceError::NotImplemented(_))));
}

#[test]
fn test_coordinate_conversion() {
    init_logging();
    for tri in [
        example::s3().unwrap(),
        example::twisted_kxi().unwrap(),
        example::layered_loop(2, false).unwrap(),
        example::layered_loop(3, true).unwrap(),
    ] {
        let standard = vertex(&tri, CoordSystem::Standard, Algorithm::Tree);
        let quad = vertex(&tri, CoordSystem::Quad, Algorithm::Tree);
        let converted = standard.standard_to_quad().unwrap();
        assert_eq!(converted.coords(), CoordSystem::Quad);
        assert_eq!(vectors(&converted), vectors(&quad));

        let eqs = MatchingEquations::new(&tri, CoordSystem::Standard).unwrap();
        for s in &quad {
            let full = s.quad_to_standard().unwrap();
            assert_eq!(full.coords(), CoordSystem::Standard);
            assert!(eqs.is_admissible(full.vector()).unwrap());
            assert!(vectors(&standard).contains(&small_vector(&full)));
            assert_eq!(full.standard_to_quad().unwrap(), *s);
            assert_eq!(full.euler_char().unwrap(), s.euler_char().unwrap());
        }
    }

    let s3 = example::s3().unwrap();
    let links = vertex(&s3, CoordSystem::Standard, Algorithm::Tree);
    assert_eq!(links.standard_to_quad().unwrap().len(), 3);

    let ideal = vertex(&example::figure_eight().unwrap(), CoordSystem::Standard, Algorithm::Tree);
    assert!(matches!(ideal.standard_to_quad(), Err(SurfaceError::NotImplemented(_))));
    let quad = vertex(&s3, CoordSystem::Quad, Algorithm::Tree);
    assert!(matches!(quad.standard_to_quad(), Err(SurfaceError::NotImplemented(_))));
}

#[test]
fn test_cancellation() {
    init_logging();
    let tri = example::s3().unwrap();
    let cancel = Cancellation::new();
    cancel.clone().cancel();
    assert!(cancel.is_cancelled());
    for (kind, algorithm) in [
        (SurfaceKind::Vertex, Algorithm::Tree),
        (SurfaceKind::Vertex, Algorithm::DoubleDescription),
        (SurfaceKind::Fundamental, Algorithm::HilbertDual),
    ] {
        let options = EnumerationOptions {
            coords: CoordSystem::Standard,
            kind,
            algorithm,
            cancel: Some(cancel.clone()),
        };
        let list = NormalSurfaces::enumerate(&tri, &options).unwrap();
        assert_eq!(list.status(), Enumeration::Cancelled, "{algorithm}");
        assert!(list.is_empty());
    }
    let fresh = EnumerationOptions::vertex(CoordSystem::Standard).with_cancellation(Cancellation::new());
    assert_eq!(NormalSurfaces::enumerate(&tri, &fresh).unwrap().status(), Enumeration::Complete);
}

#[test]
fn test_errors() {
    let tri = example::s3().unwrap();
    let hilbert_vertex = EnumerationOptions::vertex(CoordSystem::Standard).with_algorithm(Algorithm::HilbertDual);
    assert!(matches!(
        NormalSurfaces::enumerate(&tri, &hilbert_vertex),
        Err(SurfaceError::InvalidArgument(_)),
    ));
    let tree_fundamental = EnumerationOptions::fundamental(CoordSystem::Quad).with_algorithm(Algorithm::Tree);
    assert!(matches!(
        NormalSurfaces::enumerate(&tri, &tree_fundamental),
        Err(SurfaceError::NotImplemented(_)),
    ));

    let shared = Arc::new(tri);
    assert!(matches!(
        NormalSurface::new(Arc::clone(&shared), CoordSystem::Quad, ints(&[1, 0, 0])),
        Err(SurfaceError::InvalidArgument(_)),
    ));
    assert!(matches!(
        NormalSurface::new(Arc::clone(&shared), CoordSystem::Quad, ints(&[1, 0, 0, -1, 0, 0])),
        Err(SurfaceError::InvalidArgument(_)),
    ));
    let s = NormalSurface::new(Arc::clone(&shared), CoordSystem::Quad, ints(&[1, 0, 0, 1, 0, 0])).unwrap();
    assert!(s.triangles(SimplexId(2), 0).is_err());
    assert!(s.quads(SimplexId(0), 3).is_err());
    assert!(matches!(s.standard_to_quad(), Err(SurfaceError::InvalidArgument(_))));
    assert!(matches!(
        s.oriented(SimplexId(0), DiscType::Quad(0), Orientation::Positive),
        Err(SurfaceError::InvalidArgument(_)),
    ));

    // Two quad types in one tetrahedron cannot be examined disc by disc.
    let crossed = NormalSurface::new(shared, CoordSystem::Quad, ints(&[1, 1, 0, 1, 1, 0])).unwrap();
    assert!(!crossed.is_embedded());
    assert!(matches!(crossed.is_orientable(), Err(SurfaceError::FailedPrecondition(_))));
}

#[test]
fn test_without_multiple_octagons() {
    let tri = example::layered_loop(1, false).unwrap();
    let list = vertex(&tri, CoordSystem::AlmostNormal, Algorithm::Tree);
    assert_eq!(list.len(), 4);
    let filtered = list.without_multiple_octagons();
    assert_eq!(filtered.len(), 4);
    assert_eq!(filtered.coords(), CoordSystem::AlmostNormal);

    let doubled = list
        .into_iter()
        .find(|s| (0..3).any(|k| !s.octagons(SimplexId(0), k).unwrap().is_zero()))
        .unwrap();
    let doubled = doubled.sum(doubled).unwrap();
    assert!(doubled.has_multiple_octagon_discs());
    assert_eq!(doubled.central_disc_count(), None);
}

#[test]
fn test_coords_iteration() {
    for coords in CoordSystem::iter() {
        assert_eq!(coords.reduced().reduced(), coords.reduced());
        assert!(!coords.reduced().has_triangles());
        assert!(coords.unreduced().has_triangles());
        assert_eq!(coords.reduced().is_oriented(), coords.is_oriented());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn proptest_layered_loop_enumeration(len in 2..=4usize, twisted: bool) {
        let tri = example::layered_loop(len, twisted).unwrap();
        let tree = vertex(&tri, CoordSystem::Quad, Algorithm::Tree);
        let dd = vertex(&tri, CoordSystem::Quad, Algorithm::DoubleDescription);
        prop_assert_eq!(vectors(&tree), vectors(&dd));
        for s in &tree {
            prop_assert!(s.is_compact());
            prop_assert_eq!(s.quad_to_standard().unwrap().standard_to_quad().unwrap(), s.clone());
        }
    }
}
