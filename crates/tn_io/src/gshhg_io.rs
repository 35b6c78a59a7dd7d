//! The GSHHG binary format (§6, informative/auxiliary): sequential
//! polygon headers of 11 big-endian `i32` words, followed by that many
//! big-endian `i32` point pairs in micro-degrees. Longitudes greater than
//! 180 degrees wrap to `[-180, 180)` by subtracting 360, matching the
//! reference implementation's `example/gmt/gmt_models.c` handling of the
//! `west`/`east` extent fields.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::Result;

const MICRODEGREE: f64 = 1.0e-6;

/// One GSHHG polygon header plus its point ring, converted to degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct GshhgPolygon {
    pub id: i32,
    pub flag: i32,
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
    pub area: i32,
    pub area_full: i32,
    pub container: i32,
    pub ancestor: i32,
    /// (longitude, latitude) degrees, wrapped to `[-180, 180)`.
    pub points: Vec<(f64, f64)>,
}

/// Wrap a longitude in degrees to `[-180, 180)`.
pub fn wrap_longitude_deg(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Read every polygon record until EOF.
pub fn read_gshhg_polygons<R: Read>(mut reader: R) -> Result<Vec<GshhgPolygon>> {
    let mut polygons = Vec::new();
    loop {
        let id = match reader.read_i32::<BigEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        let n = reader.read_i32::<BigEndian>()?;
        let flag = reader.read_i32::<BigEndian>()?;
        let west = reader.read_i32::<BigEndian>()?;
        let east = reader.read_i32::<BigEndian>()?;
        let south = reader.read_i32::<BigEndian>()?;
        let north = reader.read_i32::<BigEndian>()?;
        let area = reader.read_i32::<BigEndian>()?;
        let area_full = reader.read_i32::<BigEndian>()?;
        let container = reader.read_i32::<BigEndian>()?;
        let ancestor = reader.read_i32::<BigEndian>()?;

        let mut points = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let lon_u = reader.read_i32::<BigEndian>()?;
            let lat_u = reader.read_i32::<BigEndian>()?;
            let lon = wrap_longitude_deg(lon_u as f64 * MICRODEGREE);
            let lat = lat_u as f64 * MICRODEGREE;
            points.push((lon, lat));
        }

        polygons.push(GshhgPolygon {
            id,
            flag,
            west: wrap_longitude_deg(west as f64 * MICRODEGREE),
            east: wrap_longitude_deg(east as f64 * MICRODEGREE),
            south: south as f64 * MICRODEGREE,
            north: north as f64 * MICRODEGREE,
            area,
            area_full,
            container,
            ancestor,
            points,
        });
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn write_header<W: std::io::Write>(w: &mut W, fields: [i32; 10]) {
        for f in fields {
            w.write_i32::<BigEndian>(f).unwrap();
        }
    }

    #[test]
    fn reads_one_polygon_with_wrap() {
        let mut buf = Vec::new();
        // id=1, n=2, flag=0, west=350_000_000 (-> wraps), east=10_000_000,
        // south=-10_000_000, north=10_000_000, area/area_full/container/ancestor = 0
        write_header(&mut buf, [1, 2, 0, 350_000_000, 10_000_000, -10_000_000, 10_000_000, 0, 0, 0]);
        buf.write_i32::<BigEndian>(350_000_000).unwrap(); // lon -> wraps to -10
        buf.write_i32::<BigEndian>(0).unwrap();
        buf.write_i32::<BigEndian>(10_000_000).unwrap();
        buf.write_i32::<BigEndian>(5_000_000).unwrap();

        let polys = read_gshhg_polygons(Cursor::new(buf)).unwrap();
        assert_eq!(polys.len(), 1);
        let p = &polys[0];
        assert_eq!(p.id, 1);
        assert!((p.west - (-10.0)).abs() < 1e-9);
        assert!((p.east - 10.0).abs() < 1e-9);
        assert_eq!(p.points.len(), 2);
        assert!((p.points[0].0 - (-10.0)).abs() < 1e-9);
        assert!((p.points[1].0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_longitude_is_idempotent_under_180() {
        assert_eq!(wrap_longitude_deg(90.0), 90.0);
        assert_eq!(wrap_longitude_deg(-90.0), -90.0);
        assert_eq!(wrap_longitude_deg(181.0), -179.0);
    }

    #[test]
    fn empty_stream_yields_no_polygons() {
        assert!(read_gshhg_polygons(Cursor::new(Vec::<u8>::new())).unwrap().is_empty());
    }
}
