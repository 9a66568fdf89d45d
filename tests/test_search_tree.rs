const NUM_OF_OPERATIONS: usize = 10_000;

macro_rules! search_tree_tests {
    ($($module_name:ident: $type_name:ident$(,)*)*) => {
        $(
            mod $module_name {
                use rand::{Rng, SeedableRng, XorShiftRng};
                use search_tree::bst::$type_name;
                use search_tree::Error;
                use std::collections::BTreeSet;
                use super::NUM_OF_OPERATIONS;

                #[test]
                fn int_test_round_trip() {
                    let mut tree = $type_name::new();
                    for key in &[10, 11, 18, 6, 2] {
                        tree.insert(*key);
                    }
                    assert_eq!(tree.inorder(), vec![&2, &6, &10, &11, &18]);
                    assert!(tree.check_invariant());
                }

                #[test]
                fn int_test_random_operations() {
                    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut tree = $type_name::new();
                    let mut expected = BTreeSet::new();

                    for _ in 0..NUM_OF_OPERATIONS {
                        let key = rng.gen_range(0, 1000u32);
                        if rng.gen::<bool>() {
                            let node = tree.insert(key);
                            expected.insert(key);
                            assert_eq!(tree[node], key);
                        } else {
                            assert_eq!(tree.delete(&key), expected.take(&key));
                        }
                        assert_eq!(tree.validate(), Ok(()));
                        assert_eq!(tree.len(), expected.len());
                    }

                    assert_eq!(
                        tree.iter().collect::<Vec<&u32>>(),
                        expected.iter().collect::<Vec<&u32>>(),
                    );
                }

                #[test]
                fn int_test_delete_everything() {
                    let mut rng: XorShiftRng = SeedableRng::from_seed([2, 2, 2, 2]);
                    let mut keys: Vec<u32> = (0..500).collect();
                    rng.shuffle(&mut keys);
                    let mut tree: $type_name<u32> = keys.iter().cloned().collect();

                    rng.shuffle(&mut keys);
                    for (i, key) in keys.iter().enumerate() {
                        assert_eq!(tree.delete(key), Some(*key));
                        assert_eq!(tree.find(key), None);
                        assert_eq!(tree.len(), keys.len() - i - 1);
                        assert_eq!(tree.validate(), Ok(()));
                    }

                    assert!(tree.is_empty());
                    assert_eq!(tree.root(), None);
                    assert_eq!(tree.height(), -1);
                }

                #[test]
                fn int_test_duplicate_insert() {
                    let mut tree: $type_name<u32> = vec![5, 3, 8, 1, 4].into_iter().collect();
                    let before = tree.inorder().into_iter().cloned().collect::<Vec<u32>>();
                    let node = tree.find(&3).unwrap();
                    let root = tree.root();

                    assert_eq!(tree.insert(3), node);
                    assert_eq!(tree.root(), root);
                    assert_eq!(tree.len(), before.len());
                    assert_eq!(tree.into_iter().collect::<Vec<u32>>(), before);
                }

                #[test]
                fn int_test_successor_boundaries() {
                    let tree: $type_name<u32> = (0..100).collect();
                    let max = tree.max().unwrap();
                    let min = tree.min().unwrap();
                    assert_eq!(tree.next_larger(max), Err(Error::NoSuccessor));
                    assert_eq!(tree.next_smaller(min), Err(Error::NoPredecessor));
                    assert_eq!(tree.successor(&99), Err(Error::NoSuccessor));
                    assert_eq!(tree.predecessor(&0), Err(Error::NoPredecessor));

                    let mut curr = min;
                    for key in 1..100 {
                        curr = tree.next_larger(curr).unwrap();
                        assert_eq!(tree[curr], key);
                    }
                    for key in (0..99).rev() {
                        curr = tree.next_smaller(curr).unwrap();
                        assert_eq!(tree[curr], key);
                    }
                }

                #[test]
                fn int_test_floor_ceil() {
                    let mut rng: XorShiftRng = SeedableRng::from_seed([3, 3, 3, 3]);
                    let mut tree = $type_name::new();
                    let mut expected = BTreeSet::new();
                    for _ in 0..1000 {
                        let key = rng.gen_range(0, 10_000u32);
                        tree.insert(key);
                        expected.insert(key);
                    }

                    for _ in 0..1000 {
                        let key = rng.gen_range(0, 10_000u32);
                        assert_eq!(
                            tree.floor(&key).map(|node| tree[node]),
                            expected.range(..=key).next_back().cloned(),
                        );
                        assert_eq!(
                            tree.ceil(&key).map(|node| tree[node]),
                            expected.range(key..).next().cloned(),
                        );
                    }
                }
            }
        )*
    }
}

search_tree_tests!(bst: Bst, avl: AvlTree);
