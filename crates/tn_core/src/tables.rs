//! The 18-row triangulation configuration tables (§4.6, §6). These are
//! reproduced bit-for-bit from the reference implementation's
//! `p4est_tnodes_config_{count,corners,faces}` and must never be
//! hand-edited independently of each other.

/// `(num_corners, num_face_nodes)` per configuration row.
pub const CONFIG_COUNT: [(usize, usize); 18] = [
    (4, 5),
    (6, 10),
    (6, 10),
    (7, 12),
    (6, 10),
    (7, 12),
    (7, 12),
    (8, 14),
    (6, 10),
    (7, 12),
    (7, 12),
    (8, 14),
    (7, 12),
    (8, 14),
    (8, 14),
    (9, 16),
    (4, 5),
    (5, 8),
];

/// Up to 9 corner slots per row, -1 padded.
pub const CONFIG_CORNERS: [[i8; 9]; 18] = [
    [0, 1, 2, 3, -1, -1, -1, -1, -1],
    [0, 1, 2, 3, 4, 5, -1, -1, -1],
    [0, 1, 2, 3, 4, 6, -1, -1, -1],
    [0, 1, 2, 3, 4, 5, 6, -1, -1],
    [0, 1, 2, 3, 4, 7, -1, -1, -1],
    [0, 1, 2, 3, 4, 5, 7, -1, -1],
    [0, 1, 2, 3, 4, 6, 7, -1, -1],
    [0, 1, 2, 3, 4, 5, 6, 7, -1],
    [0, 1, 2, 3, 4, 8, -1, -1, -1],
    [0, 1, 2, 3, 4, 5, 8, -1, -1],
    [0, 1, 2, 3, 4, 6, 8, -1, -1],
    [0, 1, 2, 3, 4, 5, 6, 8, -1],
    [0, 1, 2, 3, 4, 7, 8, -1, -1],
    [0, 1, 2, 3, 4, 5, 7, 8, -1],
    [0, 1, 2, 3, 4, 6, 7, 8, -1],
    [0, 1, 2, 3, 4, 5, 6, 7, 8],
    [0, 1, 2, 3, -1, -1, -1, -1, -1],
    [0, 1, 2, 3, 4, -1, -1, -1, -1],
];

/// Up to 16 face slots per row, -1 padded.
pub const CONFIG_FACES: [[i8; 16]; 18] = [
    [4, 5, 6, 7, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1, -1, -1, -1, -1, -1],
    [5, 7, 8, 9, 10, 11, 12, 16, 17, 18, -1, -1, -1, -1, -1, -1],
    [7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, -1, -1, -1, -1],
    [5, 6, 8, 9, 10, 11, 12, 19, 20, 21, -1, -1, -1, -1, -1, -1],
    [6, 8, 9, 10, 11, 12, 13, 14, 15, 19, 20, 21, -1, -1, -1, -1],
    [5, 8, 9, 10, 11, 12, 16, 17, 18, 19, 20, 21, -1, -1, -1, -1],
    [8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, -1, -1],
    [5, 6, 7, 9, 10, 11, 12, 22, 23, 24, -1, -1, -1, -1, -1, -1],
    [6, 7, 9, 10, 11, 12, 13, 14, 15, 22, 23, 24, -1, -1, -1, -1],
    [5, 7, 9, 10, 11, 12, 16, 17, 18, 22, 23, 24, -1, -1, -1, -1],
    [7, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 22, 23, 24, -1, -1],
    [5, 6, 9, 10, 11, 12, 19, 20, 21, 22, 23, 24, -1, -1, -1, -1],
    [6, 9, 10, 11, 12, 13, 14, 15, 19, 20, 21, 22, 23, 24, -1, -1],
    [5, 9, 10, 11, 12, 16, 17, 18, 19, 20, 21, 22, 23, 24, -1, -1],
    [9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24],
    [4, 5, 6, 7, 8, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],
    [5, 6, 7, 8, 9, 10, 11, 12, -1, -1, -1, -1, -1, -1, -1, -1],
];

/// Sentinel configuration byte for pure full subdivision at root level
/// (§4.5); resolves to table row 17.
pub const FULL_SUBDIVISION_SENTINEL: u8 = 32;

/// Resolve a per-element configuration byte (0..=16, or the sentinel 32)
/// to a table row index (§4.5).
pub fn resolve_config_index(cfg_byte: u8) -> Option<usize> {
    if cfg_byte == FULL_SUBDIVISION_SENTINEL {
        Some(17)
    } else if (cfg_byte as usize) <= 16 {
        Some(cfg_byte as usize)
    } else {
        None
    }
}
