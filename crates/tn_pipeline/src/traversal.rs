//! The traversal adapter: drives `tn_algo::NodeTable` from `tn_io`'s
//! `ForestVisitor` callback contract (§4.1).
//!
//! Every callback processes one topological entity (an element's own
//! center/corners, a face, a corner) in a single call, so a cnode handle
//! only ever needs to live as a local `Option<usize>` for the duration of
//! that call — it never has to be threaded across separate callback
//! invocations. The one exception is the pair of hanging-face sub-face
//! midpoints the large side registers, which the matching small sides look
//! up a moment later within the *same* `visit_face` call; that short-lived
//! handoff is `pending_subfaces`.

use std::collections::HashMap;

use tn_core::{slots, Bcon, CoreError, ElementIndex, NumberingConfig, Rank, Slot};
use tn_io::{CornerInfo, FaceInfo, FaceSide, FaceSides, ForestVisitor, GhostLayer, VolumeInfo};

use tn_algo::{FaceCode, NodeTable};

/// The two per-element accumulators built up across a traversal pass:
/// the configuration bits feeding [`tn_algo::resolve_config_byte`] and the
/// face code feeding the element's output record.
pub struct TraversalAdapter<'g> {
    self_rank: Rank,
    config: NumberingConfig,
    ghosts: &'g dyn GhostLayer,
    table: NodeTable,
    element_lookup: HashMap<(i32, i64), ElementIndex>,
    element_bits: Vec<tn_core::ConfigBits>,
    element_faces: Vec<FaceCode>,
    pending_subfaces: [Option<usize>; 2],
    error: Option<CoreError>,
}

impl<'g> TraversalAdapter<'g> {
    pub fn new(self_rank: Rank, config: NumberingConfig, ghosts: &'g dyn GhostLayer) -> Self {
        Self {
            self_rank,
            config,
            ghosts,
            table: NodeTable::new(self_rank, config.vnodes()),
            element_lookup: HashMap::new(),
            element_bits: Vec::new(),
            element_faces: Vec::new(),
            pending_subfaces: [None, None],
            error: None,
        }
    }

    /// Consumes the adapter once the forest driver's traversal pass is
    /// done, handing back everything `tn_pipeline::numbering` needs next.
    pub fn finish(self) -> (NodeTable, Vec<tn_core::ConfigBits>, Vec<FaceCode>, Option<CoreError>) {
        (self.table, self.element_bits, self.element_faces, self.error)
    }

    fn local_index(&self, tree: i32, quad_id: i64) -> ElementIndex {
        *self
            .element_lookup
            .get(&(tree, quad_id))
            .expect("face/corner callback referenced a local element before its volume callback")
    }

    fn note<T>(&mut self, result: tn_core::CoreResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                debug_assert!(false, "{err}");
                log::error!("node registration failed: {err}");
                if self.error.is_none() {
                    self.error = Some(err);
                }
                None
            }
        }
    }
}

impl<'g> ForestVisitor for TraversalAdapter<'g> {
    fn visit_volume(&mut self, info: &VolumeInfo) {
        let element = self.table.add_local_element();
        self.element_lookup.insert((info.tree_id, info.quad_id_in_tree), element);
        self.element_bits.push(tn_core::ConfigBits::new());
        self.element_faces.push(FaceCode::new());
        let idx = element.0 as usize;

        let is_full = self.config.full_style || info.quadrant.level == 0;
        if is_full {
            self.element_bits[idx].set_full();
            let mut lni = None;
            let r = self.table.register_local(&mut lni, element, Slot(slots::CENTER), Bcon::CornerLike);
            self.note(r);
            if self.config.with_faces {
                for &corner_slot in &slots::CENTER_CORNERS {
                    let mut lni = None;
                    let r = self.table.register_local(&mut lni, element, Slot(corner_slot), Bcon::FaceInterior);
                    self.note(r);
                }
            }
        } else {
            // Only child-id 1 or 2 carries the half-subdivision bit; 0 and
            // 3 stay plain conforming (byte 0) per §4.1's volume callback.
            if info.quadrant.child_id == 1 || info.quadrant.child_id == 2 {
                self.element_bits[idx].set_half();
            }
            if self.config.with_faces {
                let mut lni = None;
                let r = self.table.register_local(&mut lni, element, Slot(slots::CENTER), Bcon::FaceInterior);
                self.note(r);
            }
        }
    }

    fn visit_face(&mut self, info: &FaceInfo) {
        match &info.sides {
            FaceSides::Boundary(side) => self.visit_face_boundary(side),
            FaceSides::Interior(a, b) => match (a, b) {
                (FaceSide::Full { .. }, FaceSide::Full { .. }) => {
                    self.visit_face_conforming(a, b);
                }
                (FaceSide::Full { .. }, FaceSide::Hanging { .. }) => {
                    self.visit_face_hanging(a, b, info.orientation);
                }
                (FaceSide::Hanging { .. }, FaceSide::Full { .. }) => {
                    self.visit_face_hanging(b, a, info.orientation);
                }
                (FaceSide::Hanging { .. }, FaceSide::Hanging { .. }) => {
                    log::error!("two hanging sides on one face violates 2:1 balance");
                }
            },
        }
    }

    fn visit_corner(&mut self, info: &CornerInfo) {
        let mut lni = None;
        for side in &info.sides {
            if side.is_ghost {
                let (rank, element) = self.ghosts.owner_of(side.quad_id);
                let r = self
                    .table
                    .register_remote(&mut lni, rank, element, Slot(side.corner), Bcon::CornerLike);
                self.note(r);
            } else {
                let element = self.local_index(side.tree, side.quad_id);
                let r = self.table.register_local(&mut lni, element, Slot(side.corner), Bcon::CornerLike);
                self.note(r);
            }
        }
    }
}

impl<'g> TraversalAdapter<'g> {
    fn visit_face_boundary(&mut self, side: &FaceSide) {
        if !self.config.with_faces {
            return;
        }
        let FaceSide::Full { tree, quad_id, face, is_ghost } = side else {
            return;
        };
        if *is_ghost {
            return;
        }
        let element = self.local_index(*tree, *quad_id);
        let mut lni = None;
        let r = self
            .table
            .register_local(&mut lni, element, Slot(slots::FACE_MIDPOINTS[*face as usize]), Bcon::FaceInterior);
        self.note(r);
    }

    fn visit_face_conforming(&mut self, a: &FaceSide, b: &FaceSide) {
        if !self.config.with_faces {
            return;
        }
        let mut lni = None;
        for side in [a, b] {
            let FaceSide::Full { tree, quad_id, face, is_ghost } = side else {
                continue;
            };
            let slot = Slot(slots::FACE_MIDPOINTS[*face as usize]);
            if *is_ghost {
                let (rank, element) = self.ghosts.owner_of(*quad_id);
                let r = self.table.register_remote(&mut lni, rank, element, slot, Bcon::FaceInterior);
                self.note(r);
            } else {
                let element = self.local_index(*tree, *quad_id);
                let r = self.table.register_local(&mut lni, element, slot, Bcon::FaceInterior);
                self.note(r);
            }
        }
    }

    /// One large full side plus two small hanging sides (§4.1's promotion
    /// case). The large side's face midpoint is promoted to a corner-like
    /// node; each small side contributes its own corner — coincident with
    /// its virtual parent's center, which under the standard quadtree
    /// child/corner numbering is always `3 - child_id`.
    fn visit_face_hanging(&mut self, large: &FaceSide, hanging: &FaceSide, orientation: u8) {
        let FaceSide::Full { tree: large_tree, quad_id: large_quad, face: large_face, is_ghost: large_is_ghost } = large else {
            return;
        };
        let FaceSide::Hanging { tree: small_tree, quad_id: small_quads, quad: small_quadrants, face: small_face, is_ghost: small_is_ghost } = hanging else {
            return;
        };

        let large_slot = Slot(slots::FACE_MIDPOINTS[*large_face as usize]);
        let mut corner_lni = None;
        self.pending_subfaces = [None, None];

        if !*large_is_ghost {
            let element = self.local_index(*large_tree, *large_quad);
            let idx = element.0 as usize;
            // Promotes both config byte 0 (plain, level>0 child 0|3) and
            // byte 16 (half, child 1|2) — the large side's own config was
            // never full, so going hanging always needs this step.
            if self.element_bits[idx].is_plain_or_half() {
                self.element_bits[idx].clear_half();
                if self.config.with_faces {
                    // The volume callback already registered the center as
                    // face-interior; promote that existing cnode rather
                    // than registering it again.
                    let center_cnode = self.table.element_slot_vector(element)[slots::CENTER as usize] as usize;
                    self.table.cnodes_mut()[center_cnode].bcon.promote_to_corner();
                    for &corner_slot in &slots::CENTER_CORNERS {
                        let mut lni = None;
                        let r = self.table.register_local(&mut lni, element, Slot(corner_slot), Bcon::FaceInterior);
                        self.note(r);
                    }
                } else {
                    let mut lni = None;
                    let r = self.table.register_local(&mut lni, element, Slot(slots::CENTER), Bcon::CornerLike);
                    self.note(r);
                }
            }
            self.element_bits[idx].set_face_hanging(*large_face as usize);

            let r = self.table.register_local(&mut corner_lni, element, large_slot, Bcon::CornerLike);
            self.note(r);
            if let Some(cidx) = corner_lni {
                self.table.cnodes_mut()[cidx].bcon.promote_to_corner();
            }

            if self.config.with_faces {
                let split_slot = Slot(slots::SPLIT_MIDPOINTS[*large_face as usize]);
                let mut split_lni = None;
                let r = self.table.register_local(&mut split_lni, element, split_slot, Bcon::FaceInterior);
                self.note(r);

                for (i, &sub_slot) in slots::HANGING_SUBFACES[*large_face as usize].iter().enumerate() {
                    let mut sub_lni = self.pending_subfaces[i];
                    let r = self.table.register_local(&mut sub_lni, element, Slot(sub_slot), Bcon::FaceInterior);
                    self.note(r);
                    self.pending_subfaces[i] = sub_lni;
                }
            }
        } else {
            let (owner_rank, owner_element) = self.ghosts.owner_of(*large_quad);
            let r = self
                .table
                .register_remote(&mut corner_lni, owner_rank, owner_element, large_slot, Bcon::CornerLike);
            self.note(r);

            if self.config.with_faces {
                for (i, &sub_slot) in slots::HANGING_SUBFACES[*large_face as usize].iter().enumerate() {
                    let mut sub_lni = self.pending_subfaces[i];
                    let r = self.table.register_remote(&mut sub_lni, owner_rank, owner_element, Slot(sub_slot), Bcon::FaceInterior);
                    self.note(r);
                    self.pending_subfaces[i] = sub_lni;
                }
            }
        }

        let swap = orientation != 0;
        for i in 0..2 {
            let corner_slot = Slot(3 - small_quadrants[i].child_id);
            let mut contrib = corner_lni;
            if small_is_ghost[i] {
                let (rank, element) = self.ghosts.owner_of(small_quads[i]);
                let r = self.table.register_remote(&mut contrib, rank, element, corner_slot, Bcon::CornerLike);
                self.note(r);
                continue;
            }

            let element = self.local_index(*small_tree, small_quads[i]);
            let r = self.table.register_local(&mut contrib, element, corner_slot, Bcon::CornerLike);
            self.note(r);

            self.element_faces[element.0 as usize].set_hanging(*small_face, small_quadrants[i].child_id);

            if self.config.with_faces {
                let sub_index = if swap { 1 - i } else { i };
                let mut shared = self.pending_subfaces[sub_index];
                let r = self.table.register_local(&mut shared, element, Slot(slots::FACE_MIDPOINTS[*small_face as usize]), Bcon::FaceInterior);
                self.note(r);
            }
        }
    }
}
