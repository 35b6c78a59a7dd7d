//! The persisted sphere input format (§6, informative/auxiliary): a
//! binary file beginning with one platform-native `size_t` global point
//! count, followed by that many fixed 40-byte geodesic-segment records,
//! all host-endian. Ported from the sphere-segment records read by
//! `example/gmt/gmt_models.c` in the reference implementation.

use std::io::Read;
use std::mem::size_of;

use byteorder::{NativeEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// One geodesic segment: the owning tree and two endpoints in
/// (longitude, latitude) degrees. The 4-byte `pad` field exists only to
/// keep each record at exactly 40 bytes and is not surfaced here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSegment {
    pub tree_id: i32,
    pub p1: (f64, f64),
    pub p2: (f64, f64),
}

/// Size in bytes of one on-disk record: `i32 + i32 (pad) + 4 * f64`.
pub const SEGMENT_RECORD_BYTES: usize = 4 + 4 + 4 * 8;

/// Read the sphere point file: a host-native `size_t` count followed by
/// that many 40-byte records.
pub fn read_sphere_segments<R: Read>(mut reader: R) -> Result<Vec<SphereSegment>> {
    let count = read_native_size_t(&mut reader)?;

    let mut segments = Vec::with_capacity(count);
    for _ in 0..count {
        let tree_id = reader.read_i32::<NativeEndian>()?;
        let _pad = reader.read_i32::<NativeEndian>()?;
        let p1x = reader.read_f64::<NativeEndian>()?;
        let p1y = reader.read_f64::<NativeEndian>()?;
        let p2x = reader.read_f64::<NativeEndian>()?;
        let p2y = reader.read_f64::<NativeEndian>()?;
        segments.push(SphereSegment {
            tree_id,
            p1: (p1x, p1y),
            p2: (p2x, p2y),
        });
    }
    Ok(segments)
}

fn read_native_size_t<R: Read>(reader: &mut R) -> Result<usize> {
    let width = size_of::<usize>();
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf[..width])?;
    let value = if width == 8 {
        usize::from_ne_bytes(buf)
    } else if width == 4 {
        let mut b4 = [0u8; 4];
        b4.copy_from_slice(&buf[..4]);
        u32::from_ne_bytes(b4) as usize
    } else {
        return Err(Error::Overflow);
    };
    Ok(value)
}
