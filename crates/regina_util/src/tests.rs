use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::prelude::*;

typed_index_struct! {
    struct SmallId(u8);
}

#[test]
fn test_tivec_push_until_overflow() {
    let mut v = TiVec::<SmallId, ()>::new();
    for _ in 0..255 {
        v.push(()).unwrap();
    }
    assert_eq!(v.len(), 255);
    assert_eq!(v.push(()), Err(IndexOverflow::new::<SmallId>()));
}

#[test]
fn test_tivec_remove_shifts() {
    let mut v: TiVec<SmallId, char> = "abcd".chars().collect();
    assert_eq!(v.remove(SmallId(1)), Ok('b'));
    let contents = v.iter().map(|(i, c)| (i.0, *c)).collect::<Vec<_>>();
    assert_eq!(contents, vec![(0, 'a'), (1, 'c'), (2, 'd')]);
    assert_eq!(v.remove(SmallId(3)), Err(IndexOutOfRange::new(SmallId(3), 3)));
    assert_eq!(v.map_ref(|i, &c| (c, i.0)).get(SmallId(2)), Ok(&('d', 2)));
}

#[test]
fn test_id_set() {
    let mut set = IdSet::new();
    for id in [SmallId(4), SmallId(200), SmallId(4)] {
        set.insert(id);
    }
    let mut ids = set.iter().collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, [SmallId(4), SmallId(200)]);
    assert_eq!(SmallId::try_from_index(255), Err(IndexOverflow::new::<SmallId>()));
}

#[test]
fn test_index_display() {
    assert_eq!(SmallId(7).to_string(), "7");
    assert_eq!(format!("{:?}", SmallId(7)), "SmallId#7");
}

proptest! {
    #[test]
    fn proptest_mask_matches_vec_of_bools(bools in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mask = TiMask::<SmallId>::from_fn(bools.len(), |i| bools[i.0 as usize]);
        prop_assert_eq!(mask.len(), bools.iter().filter(|&&b| b).count());
        let expected: Vec<SmallId> = (0..bools.len())
            .filter(|&i| bools[i])
            .map(|i| SmallId(i as u8))
            .collect();
        prop_assert_eq!(mask.iter().collect::<Vec<_>>(), expected);
        prop_assert!(mask.is_subset(&TiMask::new_full(bools.len())));
        prop_assert_eq!(mask.intersection(&mask.union(&TiMask::new_empty(bools.len()))), mask.clone());
    }
}
