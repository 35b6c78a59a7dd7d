//! End-to-end scenarios from §8's worked examples, driven by hand-built
//! callback sequences (the forest driver itself is out of scope, §1).
//!
//! [`tn_io::LoopbackTransport`] needs every rank's owned count before any
//! rank's `number_forest` call, so each scenario first runs the traversal
//! once per rank to learn that count (cheap and pure, no network touched).
//! The exchange engine then genuinely blocks on its peer's messages, the
//! same way a real `Waitsome` would across real processes, so every
//! multi-rank scenario here drives its ranks on separate OS threads
//! sharing one [`LoopbackNetwork`] rather than calling `number_forest`
//! for each rank in sequence.

use std::thread;

use tn_core::{ElementIndex, NumberingConfig, Rank};
use tn_io::{LoopbackNetwork, Quadrant, VecGhostLayer};
use tn_pipeline::{number_forest, NumberingResult, TraversalAdapter};

fn owned_count(
    self_rank: Rank,
    config: NumberingConfig,
    ghosts: &VecGhostLayer,
    build: &dyn Fn(&mut TraversalAdapter),
) -> i64 {
    let mut adapter = TraversalAdapter::new(self_rank, config, ghosts);
    build(&mut adapter);
    let (mut table, _, _, err) = adapter.finish();
    assert!(err.is_none(), "traversal contract violation: {err:?}");
    tn_algo::partition_and_sort(table.cnodes_mut(), self_rank).num_owned()
}

#[test]
fn two_rank_shared_face_matches_worked_example_one() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, true);

    let ghosts0 = VecGhostLayer::new(vec![0, 0, 1], vec![(Rank(1), ElementIndex(0))]);
    let ghosts1 = VecGhostLayer::new(vec![0, 1, 1], vec![(Rank(0), ElementIndex(0))]);

    fn build0(a: &mut TraversalAdapter) {
        use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: false },
                FaceSide::Full { tree: 0, quad_id: 0, face: 0, is_ghost: true },
            ),
        });
        for face in [0u8, 2, 3] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: false }] });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 1, is_ghost: false },
                CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: true },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: false },
                CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: true },
            ],
        });
    }
    fn build1(a: &mut TraversalAdapter) {
        use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 0, is_ghost: false },
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: true },
            ),
        });
        for face in [1u8, 2, 3] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: false },
                CornerSide { tree: 0, quad_id: 0, corner: 1, is_ghost: true },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 1, is_ghost: false }] });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: false },
                CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: true },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: false }] });
    }

    let c0 = owned_count(Rank(0), config, &ghosts0, &build0);
    let c1 = owned_count(Rank(1), config, &ghosts1, &build1);

    // Rank 0 is the lower rank for every shared node (corners 1/3 and the
    // midpoint), so it owns its two unshared corners plus the two shared
    // corners plus the promoted midpoint, matching the worked example's
    // "5 owned-corner + 5 owned-face nodes".
    assert_eq!(c0, 10);
    assert_eq!(c1, 8); // rank 1 does not own the two corners rank 0 owns

    let net = LoopbackNetwork::new(2);
    let (r0, r1) = thread::scope(|scope| {
        let mut t0 = net.transport(Rank(0), vec![c0, c1]);
        let mut t1 = net.transport(Rank(1), vec![c0, c1]);
        let h0 = scope.spawn(move || number_forest(&mut t0, &ghosts0, config, build0).unwrap());
        let h1 = scope.spawn(move || number_forest(&mut t1, &ghosts1, config, build1).unwrap());
        (h0.join().unwrap(), h1.join().unwrap())
    });

    assert_eq!(r0.num_owned, c0);
    assert_eq!(r1.num_owned, c1);
    assert_eq!(r0.global_offset, 0);
    assert_eq!(r1.global_offset, c0);
    assert_eq!(r0.elements.len(), 1);
    assert_eq!(r0.elements[0].config_byte, 32);
    assert_eq!(r1.elements[0].config_byte, 32);

    assert!(!r1.nonlocal_nodes.is_empty());
}

#[test]
fn single_rank_2x2_uniform_mesh_is_fully_conforming() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);
    let ghosts = VecGhostLayer::new(vec![0, 0], vec![]);

    let build = |a: &mut TraversalAdapter| {
        for (quad_id, child_id) in [(0, 0u8), (1, 1), (2, 2), (3, 3)] {
            a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: quad_id, quadrant: Quadrant { level: 1, child_id } });
        }
        for (quad_id, face) in [(0, 0u8), (0, 2), (1, 1), (1, 2), (2, 0), (2, 3), (3, 1), (3, 3)] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id, face, is_ghost: false }),
            });
        }
        let interior = [((0, 1u8), (1, 0u8)), ((2, 1), (3, 0)), ((0, 3), (2, 2)), ((1, 3), (3, 2))];
        for ((qa, fa), (qb, fb)) in interior {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: false,
                sides: FaceSides::Interior(
                    FaceSide::Full { tree: 0, quad_id: qa, face: fa, is_ghost: false },
                    FaceSide::Full { tree: 0, quad_id: qb, face: fb, is_ghost: false },
                ),
            });
        }
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: false },
                CornerSide { tree: 0, quad_id: 1, corner: 2, is_ghost: false },
                CornerSide { tree: 0, quad_id: 2, corner: 1, is_ghost: false },
                CornerSide { tree: 0, quad_id: 3, corner: 0, is_ghost: false },
            ],
        });
        let singles = [
            (0, 0u8), (0, 1), (0, 2),
            (1, 0), (1, 1), (1, 3),
            (2, 0), (2, 2), (2, 3),
            (3, 1), (3, 2), (3, 3),
        ];
        for (quad_id, corner) in singles {
            a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id, corner, is_ghost: false }] });
        }
    };

    let c0 = owned_count(Rank(0), config, &ghosts, &build);

    let net = LoopbackNetwork::new(1);
    let mut t0 = net.transport(Rank(0), vec![c0]);
    let result = number_forest(&mut t0, &ghosts, config, |a| build(a)).unwrap();

    assert_eq!(result.num_owned, c0);
    assert_eq!(result.global_offset, 0);
    assert_eq!(result.sharers.len(), 1);
    assert!(result.sharers[0].is_self);
    assert_eq!(result.elements.len(), 4);
    for element in &result.elements {
        assert_eq!(element.config_byte, 0, "uniform mesh must be fully conforming");
    }
    assert!(result.nonlocal_nodes.is_empty());
}

#[test]
fn single_rank_hanging_face_among_three_siblings() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);
    let ghosts = VecGhostLayer::new(vec![0, 0], vec![]);

    // Element 0: a level-0 full neighbor. Elements 1, 2: two level-1
    // siblings hanging off element 0's face 1.
    let build = |a: &mut TraversalAdapter| {
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 1, quadrant: Quadrant { level: 1, child_id: 0 } });
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 2, quadrant: Quadrant { level: 1, child_id: 1 } });

        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: false },
                FaceSide::Hanging {
                    tree: 0,
                    quad_id: [1, 2],
                    quad: [Quadrant { level: 1, child_id: 0 }, Quadrant { level: 1, child_id: 1 }],
                    face: 0,
                    is_ghost: [false, false],
                },
            ),
        });

        for face in [0u8, 2, 3] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        for (quad_id, face) in [(1, 2u8), (1, 3), (2, 1), (2, 3)] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id, face, is_ghost: false }),
            });
        }

        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 1, is_ghost: false },
                CornerSide { tree: 0, quad_id: 1, corner: 0, is_ghost: false },
            ],
        });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: false },
                CornerSide { tree: 0, quad_id: 2, corner: 1, is_ghost: false },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 1, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 2, corner: 3, is_ghost: false }] });
    };

    let c0 = owned_count(Rank(0), config, &ghosts, &build);
    let net = LoopbackNetwork::new(1);
    let mut t0 = net.transport(Rank(0), vec![c0]);
    let result = number_forest(&mut t0, &ghosts, config, |a| build(a)).unwrap();

    assert_eq!(result.elements.len(), 3);
    assert_eq!(result.elements[0].config_byte, 0b0010, "face 1 hanging on the large element");
    assert_eq!(result.elements[0].face_code, 0);
    assert_ne!(result.elements[1].face_code, 0);
    assert_ne!(result.elements[2].face_code, 0);
}

#[test]
fn single_rank_hanging_face_against_non_full_large_element() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);
    let ghosts = VecGhostLayer::new(vec![0, 0], vec![]);

    // Element 0 is the large side of a hanging face, but unlike
    // `single_rank_hanging_face_among_three_siblings` it is not level 0:
    // level 1 with child_id 0 means it starts out at config byte 0 (plain
    // conforming, no half bit), not byte 32 (full). Elements 1, 2 are two
    // level-2 siblings hanging off its face 1. This is the case the
    // promotion guard used to skip entirely.
    let build = |a: &mut TraversalAdapter| {
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 1, child_id: 0 } });
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 1, quadrant: Quadrant { level: 2, child_id: 0 } });
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 2, quadrant: Quadrant { level: 2, child_id: 1 } });

        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: false },
                FaceSide::Hanging {
                    tree: 0,
                    quad_id: [1, 2],
                    quad: [Quadrant { level: 2, child_id: 0 }, Quadrant { level: 2, child_id: 1 }],
                    face: 0,
                    is_ghost: [false, false],
                },
            ),
        });

        for face in [0u8, 2, 3] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        for (quad_id, face) in [(1, 2u8), (1, 3), (2, 1), (2, 3)] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id, face, is_ghost: false }),
            });
        }

        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 1, is_ghost: false },
                CornerSide { tree: 0, quad_id: 1, corner: 0, is_ghost: false },
            ],
        });
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 3, is_ghost: false },
                CornerSide { tree: 0, quad_id: 2, corner: 1, is_ghost: false },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 1, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 2, corner: 3, is_ghost: false }] });
    };

    let c0 = owned_count(Rank(0), config, &ghosts, &build);
    let net = LoopbackNetwork::new(1);
    let mut t0 = net.transport(Rank(0), vec![c0]);
    let result = number_forest(&mut t0, &ghosts, config, |a| build(a)).unwrap();

    assert_eq!(result.elements.len(), 3);
    assert_eq!(result.elements[0].config_byte, 0b0010, "face 1 hanging on the promoted large element");
    assert_eq!(result.elements[0].face_code, 0);
    assert_ne!(result.elements[1].face_code, 0);
    assert_ne!(result.elements[2].face_code, 0);
}

#[test]
fn two_rank_hanging_face_crossing_partition() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);

    // Rank 0 owns the large element; rank 1 owns the two small siblings.
    let ghosts0 = VecGhostLayer::new(vec![0, 0, 2], vec![(Rank(1), ElementIndex(0)), (Rank(1), ElementIndex(1))]);
    let ghosts1 = VecGhostLayer::new(vec![0, 1, 1], vec![(Rank(0), ElementIndex(0))]);

    fn build0(a: &mut TraversalAdapter) {
        use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: false },
                FaceSide::Hanging {
                    tree: 0,
                    quad_id: [0, 1],
                    quad: [Quadrant { level: 1, child_id: 0 }, Quadrant { level: 1, child_id: 1 }],
                    face: 0,
                    is_ghost: [true, true],
                },
            ),
        });
        for face in [0u8, 2, 3] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        for corner in 0u8..4 {
            a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner, is_ghost: false }] });
        }
    }

    fn build1(a: &mut TraversalAdapter) {
        use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 1, child_id: 0 } });
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 1, quadrant: Quadrant { level: 1, child_id: 1 } });
        a.visit_face(&FaceInfo {
            orientation: 0,
            tree_boundary: false,
            sides: FaceSides::Interior(
                FaceSide::Full { tree: 0, quad_id: 0, face: 1, is_ghost: true },
                FaceSide::Hanging {
                    tree: 0,
                    quad_id: [0, 1],
                    quad: [Quadrant { level: 1, child_id: 0 }, Quadrant { level: 1, child_id: 1 }],
                    face: 0,
                    is_ghost: [false, false],
                },
            ),
        });
        for (quad_id, face) in [(0, 2u8), (0, 3), (1, 1), (1, 3)] {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id, face, is_ghost: false }),
            });
        }
        a.visit_corner(&CornerInfo {
            sides: vec![
                CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: false },
                CornerSide { tree: 0, quad_id: 0, corner: 0, is_ghost: true },
            ],
        });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner: 2, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 1, corner: 1, is_ghost: false }] });
        a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 1, corner: 3, is_ghost: false }] });
    }

    let c0 = owned_count(Rank(0), config, &ghosts0, &build0);
    let c1 = owned_count(Rank(1), config, &ghosts1, &build1);

    let net = LoopbackNetwork::new(2);
    let (r0, r1): (NumberingResult, NumberingResult) = thread::scope(|scope| {
        let mut t0 = net.transport(Rank(0), vec![c0, c1]);
        let mut t1 = net.transport(Rank(1), vec![c0, c1]);
        let h0 = scope.spawn(move || number_forest(&mut t0, &ghosts0, config, build0).unwrap());
        let h1 = scope.spawn(move || number_forest(&mut t1, &ghosts1, config, build1).unwrap());
        (h0.join().unwrap(), h1.join().unwrap())
    });

    assert_eq!(r0.elements[0].config_byte, 0b0010);
    assert!(!r1.nonlocal_nodes.is_empty());
    assert_eq!(
        r1.nonlocal_nodes.len() as i64,
        r1.sharers.iter().find(|s| s.rank == Rank(0)).unwrap().shared_nodes.len() as i64
    );
}

#[test]
fn three_rank_shared_corner() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);

    let ghosts = [
        VecGhostLayer::new(vec![0, 0, 1, 2], vec![(Rank(1), ElementIndex(0)), (Rank(2), ElementIndex(0))]),
        VecGhostLayer::new(vec![0, 1, 1, 2], vec![(Rank(0), ElementIndex(0)), (Rank(2), ElementIndex(0))]),
        VecGhostLayer::new(vec![0, 1, 2, 2], vec![(Rank(0), ElementIndex(0)), (Rank(1), ElementIndex(0))]),
    ];

    fn build(rank: i32) -> impl Fn(&mut TraversalAdapter) {
        move |a: &mut TraversalAdapter| {
            use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};
            a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
            for face in 0u8..4 {
                a.visit_face(&FaceInfo {
                    orientation: 0,
                    tree_boundary: true,
                    sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
                });
            }
            let mut sides = vec![CornerSide { tree: 0, quad_id: 0, corner: rank as u8, is_ghost: false }];
            for other in 0..3i32 {
                if other != rank {
                    sides.push(CornerSide { tree: 0, quad_id: 0, corner: other as u8, is_ghost: true });
                }
            }
            a.visit_corner(&CornerInfo { sides });
            for corner in 0u8..4 {
                if corner as i32 != rank {
                    a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner, is_ghost: false }] });
                }
            }
        }
    }

    let counts: Vec<i64> = (0..3).map(|r| owned_count(Rank(r), config, &ghosts[r as usize], &build(r))).collect();

    let net = LoopbackNetwork::new(3);
    let results: Vec<NumberingResult> = thread::scope(|scope| {
        let mut transports: Vec<_> = (0..3).map(|r| net.transport(Rank(r), counts.clone())).collect();
        let handles: Vec<_> = (0..3)
            .rev()
            .map(|r| {
                let mut t = transports.pop().unwrap();
                let ghosts_r = &ghosts[r as usize];
                scope.spawn(move || number_forest(&mut t, ghosts_r, config, build(r)).unwrap())
            })
            .collect();
        handles.into_iter().rev().map(|h| h.join().unwrap()).collect()
    });

    // The shared corner is owned by rank 0 (lowest rank among contributors).
    assert_eq!(results[0].num_owned, counts[0]);
    assert!(!results[1].nonlocal_nodes.is_empty());
    assert!(!results[2].nonlocal_nodes.is_empty());
}

#[test]
fn determinism_rerun_produces_identical_results() {
    use tn_io::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, VolumeInfo};

    let config = NumberingConfig::new(false, false);
    let ghosts = VecGhostLayer::new(vec![0, 0], vec![]);

    let build = |a: &mut TraversalAdapter| {
        a.visit_volume(&VolumeInfo { tree_id: 0, quad_id_in_tree: 0, quadrant: Quadrant { level: 0, child_id: 0 } });
        for face in 0u8..4 {
            a.visit_face(&FaceInfo {
                orientation: 0,
                tree_boundary: true,
                sides: FaceSides::Boundary(FaceSide::Full { tree: 0, quad_id: 0, face, is_ghost: false }),
            });
        }
        for corner in 0u8..4 {
            a.visit_corner(&CornerInfo { sides: vec![CornerSide { tree: 0, quad_id: 0, corner, is_ghost: false }] });
        }
    };

    let c0 = owned_count(Rank(0), config, &ghosts, &build);

    let run = || {
        let net = LoopbackNetwork::new(1);
        let mut t0 = net.transport(Rank(0), vec![c0]);
        number_forest(&mut t0, &ghosts, config, |a| build(a)).unwrap()
    };

    let first = run();
    let second = run();

    assert_eq!(first.num_owned, second.num_owned);
    assert_eq!(first.global_offset, second.global_offset);
    for (a, b) in first.elements.iter().zip(&second.elements) {
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.config_byte, b.config_byte);
        assert_eq!(a.face_code, b.face_code);
    }
}
