//! Per-element configuration resolution and face-code assembly (§4.1,
//! §4.5, §4.6).

use tn_core::{slots, tables, CNode, ConfigBits, CoreError, CoreResult};

/// Spatial dimension of the forest (quadtrees); fixes the face-code bit
/// position `1 << (DIM + face/2)` of §4.1/§8.
pub const DIM: u8 = 2;

/// A per-element face code (§4.1 "updates its face code", §8, §6 "Output
/// structure"): high bits mark which faces are hanging on this element's
/// small side, low bits carry the (shared) child id of the small side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FaceCode(pub u8);

impl FaceCode {
    pub fn new() -> Self {
        Self(0)
    }

    /// Marks `face` as hanging on this (small) side and records its
    /// child id. All hanging faces of one element share the same child
    /// id, so calling this more than once for different faces is safe.
    pub fn set_hanging(&mut self, face: u8, child_id: u8) {
        self.0 |= 1 << (DIM + face / 2);
        self.0 |= child_id & 0b11;
    }

    pub fn raw(self) -> u8 {
        self.0
    }
}

/// §4.5 last paragraph: collapses the accumulated per-element
/// [`ConfigBits`] to the byte that indexes the triangulation tables.
/// Rows 1-15 are the 16 hanging-face patterns, indexed directly by the
/// nonzero face mask; rows 0/16/17 are the three non-hanging styles
/// (conforming, half subdivision, pure full subdivision) and use the
/// literal byte values 0, 16, and the sentinel 32 respectively, matching
/// `tables::resolve_config_index`.
pub fn resolve_config_byte(bits: ConfigBits) -> u8 {
    let face_mask = bits.face_mask();
    if face_mask != 0 {
        face_mask
    } else if bits.has_full() {
        tables::FULL_SUBDIVISION_SENTINEL
    } else if bits.has_half() {
        16
    } else {
        0
    }
}

/// §4.5: materializes one element's final dense node-id vector from its
/// slot-to-cnode mapping and resolved configuration row. Unused slots are
/// left at `-1` (§8 invariant).
pub fn finalize_element_nodes(
    element_slots: &[i64],
    cnodes: &[CNode],
    config_byte: u8,
    with_faces: bool,
) -> CoreResult<Vec<i64>> {
    let row = tables::resolve_config_index(config_byte)
        .ok_or(CoreError::UnknownConfiguration(config_byte))?;
    let vnodes = slots::vnodes(with_faces);
    let mut out = vec![-1i64; vnodes];

    for &slot in tables::CONFIG_CORNERS[row].iter().filter(|&&s| s >= 0) {
        write_slot(&mut out, element_slots, cnodes, slot as usize, config_byte)?;
    }
    if with_faces {
        for &slot in tables::CONFIG_FACES[row].iter().filter(|&&s| s >= 0) {
            write_slot(&mut out, element_slots, cnodes, slot as usize, config_byte)?;
        }
    }
    Ok(out)
}

fn write_slot(
    out: &mut [i64],
    element_slots: &[i64],
    cnodes: &[CNode],
    slot: usize,
    config_byte: u8,
) -> CoreResult<()> {
    let cnode_idx = element_slots[slot];
    if cnode_idx < 0 {
        return Err(CoreError::ContractViolation(
            "configuration requires a slot that was never registered",
        ));
    }
    let _ = config_byte;
    out[slot] = cnodes[cnode_idx as usize].runid;
    Ok(())
}
