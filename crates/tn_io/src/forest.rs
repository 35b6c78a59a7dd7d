//! The forest iteration contract (§6 "Forest iteration contract"). The
//! forest data structure, its 2:1 balance routine, and its per-tree
//! element iteration are out of scope (§1); this module only defines the
//! callback shapes the core consumes.

/// One quadrant's refinement state: level and child-id, packed as one
/// byte by the volume callback (§4.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quadrant {
    pub level: u8,
    pub child_id: u8,
}

/// `(tree_id, quad_id_in_tree, quadrant)`.
#[derive(Clone, Copy, Debug)]
pub struct VolumeInfo {
    pub tree_id: i32,
    pub quad_id_in_tree: i64,
    pub quadrant: Quadrant,
}

/// One side of a face: either a single element ("full") or two same-level
/// small elements bundled together ("hanging").
#[derive(Clone, Debug)]
pub enum FaceSide {
    Full {
        tree: i32,
        quad_id: i64,
        face: u8,
        is_ghost: bool,
    },
    Hanging {
        tree: i32,
        quad_id: [i64; 2],
        quad: [Quadrant; 2],
        face: u8,
        is_ghost: [bool; 2],
    },
}

/// A face visited by the traversal: one side if it is a domain boundary,
/// two sides otherwise (same-level conforming, or one large + two small
/// hanging).
#[derive(Clone, Debug)]
pub enum FaceSides {
    Boundary(FaceSide),
    Interior(FaceSide, FaceSide),
}

#[derive(Clone, Debug)]
pub struct FaceInfo {
    pub orientation: u8,
    pub tree_boundary: bool,
    pub sides: FaceSides,
}

/// One element incident to a visited corner.
#[derive(Clone, Copy, Debug)]
pub struct CornerSide {
    pub tree: i32,
    pub quad_id: i64,
    pub corner: u8,
    pub is_ghost: bool,
}

#[derive(Clone, Debug)]
pub struct CornerInfo {
    pub sides: Vec<CornerSide>,
}

/// The three callback kinds the forest driver invokes during one
/// traversal pass (§4, §6). The forest itself decides traversal order;
/// this trait only fixes what each callback is handed.
pub trait ForestVisitor {
    fn visit_volume(&mut self, info: &VolumeInfo);
    fn visit_face(&mut self, info: &FaceInfo);
    fn visit_corner(&mut self, info: &CornerInfo);
}
