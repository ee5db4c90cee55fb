use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regina_maths::{Perm, Permutation};

use crate::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn h1<D: Dimension>(tri: &Triangulation<D>) -> String {
    tri.homology().unwrap().to_string()
}

/// Relabels `tri` by a random isomorphism.
fn shuffled<D: Dimension>(tri: &Triangulation<D>, seed: u64) -> Triangulation<D> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut simplex_image: Vec<SimplexId> = tri.simplices().iter_keys().collect();
    simplex_image.shuffle(&mut rng);
    let perms: Vec<D::Perm> = D::Perm::all().collect();
    let facet_perm = (0..tri.size())
        .map(|_| perms[rng.random_range(0..perms.len())])
        .collect();
    Isomorphism::new(simplex_image, facet_perm).unwrap().apply(tri).unwrap()
}

#[test]
fn test_s3_skeleton() {
    init_logging();
    let tri = example::s3().unwrap();
    assert_eq!(tri.f_vector(), vec![4, 6, 4, 2]);
    assert!(tri.is_valid());
    assert!(tri.is_orientable());
    assert!(tri.is_closed());
    assert!(!tri.is_ideal());
    assert!(tri.is_connected());
    assert_eq!(tri.euler_char_tri(), 0);
    assert_eq!(tri.boundary_component_count(), 0);
    assert_eq!(h1(&tri), "0");
    assert_eq!(tri.isosig(), "cPcbbbaaa");
    for v in tri.ensure_skeleton().faces(0).iter_keys() {
        let link = tri.vertex_link(v).unwrap();
        assert_eq!(link.size(), 2);
        assert_eq!(link.euler_char_tri(), 2);
        assert_eq!(tri.face(0, v).unwrap().link(), Some(LinkKind::Sphere));
    }
}

#[test]
fn test_figure_eight() {
    let tri = example::figure_eight().unwrap();
    assert_eq!(tri.f_vector(), vec![1, 2, 4, 2]);
    assert!(tri.is_valid());
    assert!(tri.is_orientable());
    assert!(tri.is_ideal());
    assert!(!tri.has_boundary_facets());
    assert_eq!(tri.boundary_component_count(), 1);
    assert_eq!(tri.boundary_components()[BoundaryComponentId(0)].kind(), BoundaryKind::Ideal);
    assert_eq!(h1(&tri), "Z");
    assert_eq!(tri.isosig(), "cPcbbbiht");

    let vertex = tri.face(0, FaceId(0)).unwrap();
    assert_eq!(vertex.degree(), 8);
    assert_eq!(vertex.link(), Some(LinkKind::Ideal));
    let link = tri.vertex_link(FaceId(0)).unwrap();
    assert_eq!(link.size(), 8);
    assert_eq!(link.euler_char_tri(), 0);
    assert!(link.is_orientable());
    assert!(link.is_closed());
}

#[test]
fn test_gieseking() {
    let tri = example::gieseking().unwrap();
    assert_eq!(tri.f_vector(), vec![1, 1, 2, 1]);
    assert!(tri.is_valid());
    assert!(!tri.is_orientable());
    assert!(tri.is_ideal());
    assert_eq!(h1(&tri), "Z");
    assert_eq!(tri.isosig(), "bkaaid");
    assert!(matches!(tri.clone().orient(), Err(TriangulationError::FailedPrecondition(_))));
}

#[test]
fn test_rp2() {
    let tri = example::rp2().unwrap();
    assert_eq!(tri.f_vector(), vec![2, 3, 2]);
    assert!(!tri.is_orientable());
    assert!(tri.is_closed());
    assert_eq!(tri.euler_char_tri(), 1);
    assert_eq!(h1(&tri), "Z_2");
    assert_eq!(tri.homology_primal(1).unwrap().to_string(), "Z_2");
    assert_eq!(tri.homology_primal(2).unwrap().to_string(), "0");
    assert_eq!(tri.isosig(), "cPbbac");
}

#[test]
fn test_torus_and_circle() {
    let torus = example::torus().unwrap();
    assert_eq!(torus.f_vector(), vec![1, 3, 2]);
    assert!(torus.is_orientable());
    assert_eq!(h1(&torus), "2 Z");
    assert_eq!(torus.homology_primal(2).unwrap().to_string(), "Z");

    let circle = example::circle().unwrap();
    assert_eq!(circle.f_vector(), vec![1, 1]);
    assert!(circle.is_closed());
    assert_eq!(circle.homology_primal(1).unwrap().to_string(), "Z");
}

#[test]
fn test_twisted_kxi() {
    let tri = example::twisted_kxi().unwrap();
    assert_eq!(tri.f_vector(), vec![1, 5, 7, 3]);
    assert!(tri.is_valid());
    assert!(!tri.is_orientable());
    assert!(tri.has_boundary_facets());
    assert_eq!(tri.count_boundary_facets(), 2);
    assert_eq!(tri.boundary_component_count(), 1);
    let bc = &tri.boundary_components()[BoundaryComponentId(0)];
    assert!(bc.is_real());
    assert_eq!(bc.euler_char(), 0);
    assert_eq!(h1(&tri), "Z + Z_2");
    assert_eq!(tri.isosig(), "dHPabccjhf");
}

#[test]
fn test_ball_and_sphere_in_higher_dimensions() {
    let ball = example::ball::<Dim4>().unwrap();
    assert_eq!(ball.f_vector(), vec![5, 10, 10, 5, 1]);
    assert!(ball.is_valid());
    assert_eq!(ball.count_boundary_facets(), 5);
    assert_eq!(ball.face(0, FaceId(0)).unwrap().link(), Some(LinkKind::Ball));

    let s4 = example::sphere::<Dim4>().unwrap();
    assert_eq!(s4.f_vector(), vec![5, 10, 10, 5, 2]);
    assert!(s4.is_valid());
    assert!(s4.is_orientable());
    assert_eq!(s4.euler_char_tri(), 2);
    assert_eq!(h1(&s4), "0");

    let s6 = example::sphere::<Dim6>().unwrap();
    assert_eq!(s6.count_vertices(), 7);
    assert!(s6.is_orientable());
    assert_eq!(h1(&s6), "0");
}

#[test]
fn test_invalid_edge() {
    let tri = Triangulation::<Dim3>::from_gluings(1, [(0, 0, 0, [1, 0, 3, 2])]).unwrap();
    assert!(!tri.is_valid());
    let (edge, _) = tri.ensure_skeleton().face_of(SimplexId(0), &[2, 3]).unwrap();
    assert!(tri.face(1, edge).unwrap().has_bad_identification());
    assert!(matches!(tri.homology(), Err(TriangulationError::FailedPrecondition(_))));
}

#[test]
fn test_join_validation() {
    let mut tri = Triangulation::<Dim3>::new();
    let ids = tri.new_simplices(2).unwrap();
    let (a, b) = (ids[0], ids[1]);
    tri.join(a, 0, b, Perm::IDENTITY).unwrap();
    let generation = tri.generation();
    assert!(matches!(
        tri.join(a, 0, b, Perm::transposition(0, 1)),
        Err(TriangulationError::InvalidArgument(_)),
    ));
    assert!(matches!(
        tri.join(a, 1, a, Perm::IDENTITY),
        Err(TriangulationError::InvalidArgument(_)),
    ));
    assert!(matches!(tri.join(a, 4, b, Perm::IDENTITY), Err(TriangulationError::InvalidArgument(_))));
    assert_eq!(tri.generation(), generation);

    let g = tri.unjoin(b, 0).unwrap();
    assert_eq!(g.simplex, a);
    assert!(tri.gluing(a, 0).is_none());
}

#[test]
fn test_remove_simplex_reindexes() {
    let mut tri = example::twisted_kxi().unwrap();
    tri.remove_simplex(SimplexId(0)).unwrap();
    assert_eq!(tri.size(), 2);
    for (s, simplex) in tri.simplices() {
        for (f, gluing) in simplex.gluings() {
            let Some(g) = gluing else { continue };
            let back = tri.gluing(g.simplex, g.perm.image(f)).unwrap();
            assert_eq!(back.simplex, s);
            assert_eq!(back.perm, g.perm.inverse());
        }
    }
    assert_eq!(tri.count_boundary_facets(), 4);
}

#[test]
fn test_change_span_coalesces_events() {
    let events = Arc::new(AtomicUsize::new(0));
    let mut tri = Triangulation::<Dim3>::new();
    let counter = Arc::clone(&events);
    tri.set_listener(Some(Arc::new(move |_event: &ChangeEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    {
        let mut span = tri.change_span();
        let a = span.new_simplex().unwrap();
        let b = span.new_simplex().unwrap();
        for f in 0..4 {
            span.join(a, f, b, Perm::IDENTITY).unwrap();
        }
        // Queries inside a span see the changes made so far.
        assert_eq!(span.count_vertices(), 4);
    }
    assert_eq!(events.load(Ordering::SeqCst), 1);

    tri.new_simplex().unwrap();
    assert_eq!(events.load(Ordering::SeqCst), 2);
}

#[test]
fn test_handles() {
    let mut tri = example::s3().unwrap();
    let handle = tri.simplex_handle(SimplexId(1)).unwrap();
    assert_eq!(tri.resolve_simplex(handle).unwrap(), SimplexId(1));
    let face = tri.face_handle(1, FaceId(5)).unwrap();
    assert_eq!(tri.resolve_face(face).unwrap(), (1, FaceId(5)));
    assert!(tri.face_handle(1, FaceId(6)).is_err());

    let other = example::s3().unwrap();
    assert!(matches!(other.resolve_simplex(handle), Err(TriangulationError::InvalidArgument(_))));

    tri.new_simplex().unwrap();
    assert_eq!(tri.resolve_simplex(handle), Err(TriangulationError::SnapshotOutOfDate));
    assert_eq!(tri.resolve_face(face), Err(TriangulationError::SnapshotOutOfDate));
}

#[test]
fn test_isosig_round_trip() {
    for tri in [
        example::s3().unwrap(),
        example::figure_eight().unwrap(),
        example::gieseking().unwrap(),
        example::twisted_kxi().unwrap(),
    ] {
        let sig = tri.isosig();
        let rebuilt = Triangulation::<Dim3>::from_isosig(&sig).unwrap();
        assert_eq!(rebuilt.isosig(), sig);
        assert!(rebuilt.is_isomorphic_to(&tri));
    }
    assert_eq!(Triangulation::<Dim3>::new().isosig(), "a");
    assert_eq!(Triangulation::<Dim3>::from_isosig("a").unwrap().size(), 0);

    let mut two = example::s3().unwrap();
    two.insert_triangulation(&example::figure_eight().unwrap()).unwrap();
    let sig = two.isosig();
    assert_eq!(sig, "cPcbbbaaacPcbbbiht");
    let rebuilt = Triangulation::<Dim3>::from_isosig(&sig).unwrap();
    assert_eq!(rebuilt.count_components(), 2);
}

#[test]
fn test_bad_isosigs() {
    for sig in ["", "c", "cPcbbb", "cPcbbbaa*", "b!"] {
        assert!(
            matches!(Triangulation::<Dim3>::from_isosig(sig), Err(TriangulationError::InvalidArgument(_))),
            "{sig:?} should not parse",
        );
    }
}

#[test]
fn test_find_isomorphism() {
    let tri = example::twisted_kxi().unwrap();
    let other = shuffled(&tri, 7);
    let iso = tri.find_isomorphism(&other).unwrap();
    assert_eq!(iso.apply(&tri).unwrap(), other);
    assert!(tri.find_isomorphism(&example::s3().unwrap()).is_none());

    let mut canonical = other.clone();
    canonical.make_canonical().unwrap();
    let mut again = tri.clone();
    again.make_canonical().unwrap();
    assert_eq!(canonical, again);
}

#[test]
fn test_dehydration_homology() {
    for (dehydration, orientable, homology) in [
        ("cabbbbmlq", true, "Z + Z_5"),
        ("baaaade", false, "Z"),
        ("cabbbbaei", true, "Z"),
        ("cabbbbapt", true, "Z + Z_5"),
        ("cabbbbabw", false, "Z + Z_2"),
        ("eahcdbddbokpv", false, "Z + Z_2"),
        ("eahccdcddbfof", true, "Z + Z_2"),
        ("gepaacdfefefknakanx", true, "Z + 2 Z_2"),
        ("gkfacaccdeffffohhhf", true, "Z + Z_16"),
        ("eanadccdnxfno", true, "2 Z"),
        ("jofbdaabccfhgihiiffhofoxohx", false, "Z + Z_2 + Z_4"),
        ("jgpadaaeffghfiihirmxitdagbj", true, "Z_3 + Z_6"),
        ("mnnjjcabehfgjijkijllaaqabhoehrtab", true, "2 Z_7"),
    ] {
        let tri = Triangulation::<Dim3>::rehydrate(dehydration).unwrap();
        assert!(tri.is_valid(), "{dehydration}");
        assert_eq!(tri.is_orientable(), orientable, "{dehydration}");
        assert_eq!(h1(&tri), homology, "{dehydration}");
    }

    let tri = Triangulation::<Dim3>::rehydrate("jgpadaaeffghfiihirmxitdagbj").unwrap();
    assert_eq!(tri.f_vector(), vec![1, 10, 18, 9]);
    assert_eq!(tri.homology_primal(1).unwrap().to_string(), "Z_3 + Z_6");
}

#[test]
fn test_dehydrate_is_canonical() {
    for (input, expected) in [
        ("cabbbbmlq", "cabbbbapt"),
        ("baaaade", "baaaade"),
        ("cabbbbaei", "cabbbbaei"),
        ("cabbbbabw", "cabbbbabw"),
        ("eahcdbddbokpv", "eahbccddgkekf"),
        ("eahccdcddbfof", "eahbccddigvnn"),
        ("gepaacdfefefknakanx", "gbpaadefdeffbgxgbqq"),
        ("eanadccdnxfno", "eahbbcddxfbfn"),
        ("jgpadaaeffghfiihirmxitdagbj", "jbpahaacdeihhgihifwsiafffov"),
    ] {
        let tri = Triangulation::<Dim3>::rehydrate(input).unwrap();
        assert_eq!(tri.dehydrate().unwrap(), expected, "{input}");
        let shuffled = shuffled(&tri, 11);
        assert_eq!(shuffled.dehydrate().unwrap(), expected, "{input}");
    }
}

#[test]
fn test_dehydration_errors() {
    for bad in ["", "cabbbbml", "cabbbbmlq!", "Cabbbbmlq", "aa"] {
        assert!(Triangulation::<Dim3>::rehydrate(bad).is_err(), "{bad:?}");
    }
    assert!(matches!(
        example::twisted_kxi().unwrap().dehydrate(),
        Err(TriangulationError::FailedPrecondition(_)),
    ));
    let mut two = example::s3().unwrap();
    two.insert_triangulation(&example::s3().unwrap()).unwrap();
    assert!(matches!(two.dehydrate(), Err(TriangulationError::FailedPrecondition(_))));
}

#[test]
fn test_lens_spaces() {
    init_logging();
    assert_eq!(h1(&example::lens(1, 0).unwrap()), "0");
    assert_eq!(h1(&example::lens(0, 1).unwrap()), "Z");
    assert_eq!(h1(&example::lens(2, 1).unwrap()), "Z_2");
    assert_eq!(h1(&example::lens(7, 2).unwrap()), "Z_7");
    assert!(matches!(example::lens(6, 2), Err(TriangulationError::InvalidArgument(_))));
    assert!(matches!(example::lens(0, 0), Err(TriangulationError::InvalidArgument(_))));

    let l72 = example::lens(7, 2).unwrap();
    assert_eq!(l72.count_vertices(), 1);
    assert!(l72.is_closed());
    assert!(l72.is_orientable());
    assert_eq!(example::lens(7, 5).unwrap().isosig(), l72.isosig());
}

#[test]
fn test_layered_loops() {
    init_logging();
    for len in 2..=5 {
        let tri = example::layered_loop(len, false).unwrap();
        assert_eq!(tri.size(), len);
        assert_eq!(tri.count_vertices(), 2);
        assert!(tri.is_closed() && tri.is_valid() && tri.is_orientable());
        assert_eq!(h1(&tri), format!("Z_{len}"));

        let twisted = example::layered_loop(len, true).unwrap();
        assert_eq!(twisted.count_vertices(), 1);
        assert!(twisted.is_closed() && twisted.is_valid());
        let expected = match len % 2 {
            0 => "2 Z_2",
            _ => "Z_4",
        };
        assert_eq!(h1(&twisted), expected);
    }
    assert!(matches!(example::layered_loop(0, false), Err(TriangulationError::InvalidArgument(_))));
}

#[test]
fn test_layered_solid_torus() {
    let lst = example::layered_solid_torus(2, 3).unwrap();
    assert_eq!(lst.size(), 2);
    assert_eq!(lst.count_vertices(), 1);
    assert!(lst.is_valid());
    assert!(lst.is_orientable());
    assert_eq!(lst.count_boundary_facets(), 2);
    assert_eq!(h1(&lst), "Z");
    assert_eq!(lst.homology_relative().unwrap().to_string(), "0");
    assert!(example::layered_solid_torus(2, 4).is_err());
}

#[test]
fn test_layer_on() {
    let mut tri = example::ball::<Dim3>().unwrap();
    let (edge, _) = tri.ensure_skeleton().face_of(SimplexId(0), &[0, 1]).unwrap();
    let new = tri.layer_on(edge).unwrap();
    assert_eq!(new, SimplexId(1));
    assert_eq!(tri.count_boundary_facets(), 4);
    assert!(tri.is_valid());
    assert!(tri.gluing(new, 0).is_none());
    assert!(tri.gluing(new, 1).is_none());

    let (internal, _) = example::s3()
        .unwrap()
        .ensure_skeleton()
        .face_of(SimplexId(0), &[0, 1])
        .unwrap();
    assert!(example::s3().unwrap().layer_on(internal).is_err());
}

#[test]
fn test_orient() {
    let mut tri = shuffled(&example::figure_eight().unwrap(), 3);
    tri.orient().unwrap();
    for (_, simplex) in tri.simplices() {
        for (_, gluing) in simplex.gluings() {
            assert_eq!(gluing.unwrap().perm.sign(), -1);
        }
    }
    assert_eq!(tri.isosig(), "cPcbbbiht");
}

#[test]
fn test_double_cover() {
    let gieseking = example::gieseking().unwrap();
    let cover = gieseking.double_cover().unwrap();
    assert_eq!(cover.size(), 2);
    assert!(cover.is_orientable());
    assert!(cover.is_connected());
    assert!(cover.is_valid());

    let s3 = example::s3().unwrap();
    let mut cover = s3.clone();
    cover.make_double_cover().unwrap();
    assert_eq!(cover.size(), 4);
    assert_eq!(cover.count_components(), 2);
    assert_eq!(cover.isosig(), "cPcbbbaaacPcbbbaaa");

    let rp2 = example::rp2().unwrap().double_cover().unwrap();
    assert!(rp2.is_connected());
    assert_eq!(rp2.euler_char_tri(), 2);
    assert_eq!(h1(&rp2), "0");
}

#[test]
fn test_barycentric_subdivision() {
    let mut s3 = example::s3().unwrap();
    s3.barycentric_subdivision().unwrap();
    assert_eq!(s3.size(), 48);
    assert!(s3.is_valid());
    assert!(s3.is_closed());
    assert_eq!(h1(&s3), "0");
    assert_eq!(s3.euler_char_tri(), 0);

    let mut rp2 = example::rp2().unwrap();
    rp2.barycentric_subdivision().unwrap();
    assert_eq!(rp2.size(), 12);
    assert_eq!(rp2.f_vector(), vec![7, 18, 12]);
    assert_eq!(h1(&rp2), "Z_2");

    let mut lens = example::lens(5, 2).unwrap();
    lens.barycentric_subdivision().unwrap();
    assert!(lens.is_valid());
    assert_eq!(h1(&lens), "Z_5");
}

#[test]
fn test_pachner_1_to_n() {
    let mut tri = example::figure_eight().unwrap();
    tri.pachner_1_to_n(SimplexId(0)).unwrap();
    assert_eq!(tri.size(), 5);
    assert_eq!(tri.count_vertices(), 2);
    assert!(tri.is_valid());
    assert_eq!(h1(&tri), "Z");

    let mut gieseking = example::gieseking().unwrap();
    gieseking.pachner_1_to_n(SimplexId(0)).unwrap();
    assert_eq!(gieseking.size(), 4);
    assert!(!gieseking.has_boundary_facets());
    assert_eq!(h1(&gieseking), "Z");

    let mut s2 = example::sphere::<Dim2>().unwrap();
    s2.pachner_1_to_n(SimplexId(1)).unwrap();
    assert_eq!(s2.f_vector(), vec![4, 6, 4]);
}

#[test]
fn test_descriptions_survive_relabelling() {
    let mut tri = example::s3().unwrap();
    tri.set_description(SimplexId(1), "north").unwrap();
    let iso = Isomorphism::new(vec![SimplexId(1), SimplexId(0)], vec![Perm::IDENTITY; 2]).unwrap();
    tri.relabel(&iso).unwrap();
    assert_eq!(tri.simplices()[SimplexId(0)].description(), "north");
    assert_eq!(tri.simplices()[SimplexId(1)].description(), "");
}

proptest! {
    #[test]
    fn proptest_lens_homology(p in 2_u64..40, q in 1_u64..40) {
        prop_assume!(num_integer::gcd(p, q) == 1);
        let tri = example::lens(p, q).unwrap();
        prop_assert!(tri.is_valid());
        prop_assert!(tri.is_orientable());
        prop_assert_eq!(tri.euler_char_tri(), 0);
        let homology = tri.homology().unwrap();
        prop_assert!(homology.is_zn(p));
        prop_assert_eq!(homology, tri.homology_primal(1).unwrap());
    }

    #[test]
    fn proptest_isosig_ignores_labelling(seed: u64, which in 0_usize..4) {
        let tri = [
            example::s3(),
            example::figure_eight(),
            example::twisted_kxi(),
            example::lens(8, 3),
        ][which].clone().unwrap();
        let relabelled = shuffled(&tri, seed);
        prop_assert_eq!(relabelled.isosig(), tri.isosig());
        prop_assert_eq!(relabelled.f_vector(), tri.f_vector());
        prop_assert_eq!(relabelled.homology().unwrap(), tri.homology().unwrap());
    }

    #[test]
    fn proptest_face_counts(seed: u64) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let size = rng.random_range(1..6);
        let mut tri = Triangulation::<Dim3>::new();
        let ids = tri.new_simplices(size).unwrap();
        let perms: Vec<Perm<4>> = Perm::<4>::iter_ordered().collect();
        for _ in 0..2 * size {
            let (s, t) = (ids[rng.random_range(0..size)], ids[rng.random_range(0..size)]);
            let (f, perm) = (rng.random_range(0..4), perms[rng.random_range(0..24)]);
            // Collisions are rejected without changing anything.
            let _ = tri.join(s, f, t, perm);
        }
        let embeddings: usize = (0..3)
            .map(|k| tri.ensure_skeleton().faces(k).iter_values().map(|face| face.degree()).sum::<usize>())
            .sum();
        prop_assert_eq!(embeddings, size * (4 + 6 + 4));
        let free = tri.simplices().iter_values().map(|s| s.gluings().filter(|(_, g)| g.is_none()).count()).sum::<usize>();
        prop_assert_eq!(free, tri.count_boundary_facets());
    }
}
