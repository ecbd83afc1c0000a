//! Raw float dump of grids.
//!
//! Layout: `i32` width, `i32` height, then `width * height * C` `f32` values
//! row by row, `C` being the number of components per sample. Everything is
//! native-endian, so files are only portable between machines of the same
//! byte order.

use cv_core::{Error, GradientField, Grid, Result, Sample};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Write `grid` in the raw layout.
pub fn serialize<T: Sample, W: Write>(grid: &Grid<T>, writer: &mut W) -> Result<()> {
    let dims = [
        dimension_to_i32(grid.width())?,
        dimension_to_i32(grid.height())?,
    ];
    writer.write_all(bytemuck::cast_slice(&dims[..]))?;

    let values: Vec<f32> = grid
        .data()
        .iter()
        .flat_map(|s| (0..T::COMPONENTS).map(move |c| s.component(c)))
        .collect();
    writer.write_all(bytemuck::cast_slice(values.as_slice()))?;
    Ok(())
}

/// Read a grid written by [`serialize`]. The sample type decides how many
/// components per pixel are expected.
pub fn deserialize<T: Sample, R: Read>(reader: &mut R) -> Result<Grid<T>> {
    let mut header = [0u8; 8];
    reader.read_exact(&mut header)?;
    let dims: [i32; 2] = bytemuck::pod_read_unaligned(&header);
    let (w, h) = (dims[0], dims[1]);
    if w <= 0 || h <= 0 {
        return Err(Error::InvalidInput(format!(
            "Invalid grid header: {}x{}",
            w, h
        )));
    }
    let (w, h) = (w as usize, h as usize);

    let expected = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(T::COMPONENTS * std::mem::size_of::<f32>()))
        .ok_or_else(|| Error::InvalidInput(format!("Grid {}x{} is too large", w, h)))?;
    // The header is untrusted: read at most one byte past the claimed payload
    // instead of reserving it up front.
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(expected as u64 + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(Error::InvalidInput(format!(
            "Expected {} bytes of samples for a {}x{} grid, found {}",
            expected,
            w,
            h,
            bytes.len()
        )));
    }

    let values: Vec<f32> = bytemuck::pod_collect_to_vec(&bytes);
    let data = values
        .chunks_exact(T::COMPONENTS)
        .map(T::from_components)
        .collect();
    Grid::from_vec(w, h, data)
}

pub fn save_binary<T: Sample, P: AsRef<Path>>(grid: &Grid<T>, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serialize(grid, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_binary<T: Sample, P: AsRef<Path>>(path: P) -> Result<Grid<T>> {
    let mut reader = BufReader::new(File::open(path)?);
    deserialize(&mut reader)
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Save both components of a gradient field as `<base>_dx.bin` and
/// `<base>_dy.bin`.
pub fn save_gradients<P: AsRef<Path>>(field: &GradientField, base: P) -> Result<()> {
    let base = base.as_ref();
    save_binary(field.dx(), with_suffix(base, "_dx.bin"))?;
    save_binary(field.dy(), with_suffix(base, "_dy.bin"))
}

pub fn read_gradients<P: AsRef<Path>>(base: P) -> Result<GradientField> {
    let base = base.as_ref();
    let dx = read_binary(with_suffix(base, "_dx.bin"))?;
    let dy = read_binary(with_suffix(base, "_dy.bin"))?;
    GradientField::from_parts(dx, dy)
}

fn dimension_to_i32(v: usize) -> Result<i32> {
    i32::try_from(v).map_err(|_| Error::InvalidInput(format!("Dimension {} does not fit in i32", v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{RgbGrid, ScalarGrid};
    use nalgebra::Vector3;

    #[test]
    fn header_layout() {
        let grid = ScalarGrid::from_vec(2, 1, vec![1.5, -2.0]).unwrap();
        let mut buf = Vec::new();
        serialize(&grid, &mut buf).unwrap();
        assert_eq!(buf.len(), 8 + 2 * 4);
        assert_eq!(&buf[0..4], &2i32.to_ne_bytes());
        assert_eq!(&buf[4..8], &1i32.to_ne_bytes());
        assert_eq!(&buf[12..16], &(-2.0f32).to_ne_bytes());
    }

    #[test]
    fn rgb_components_are_interleaved() {
        let grid = RgbGrid::filled(1, 1, Vector3::new(0.1, 0.2, 0.3)).unwrap();
        let mut buf = Vec::new();
        serialize(&grid, &mut buf).unwrap();
        assert_eq!(buf.len(), 8 + 12);
        assert_eq!(&buf[12..16], &0.2f32.to_ne_bytes());
    }

    #[test]
    fn truncated_payload_rejected() {
        let grid = ScalarGrid::filled(3, 3, 1.0).unwrap();
        let mut buf = Vec::new();
        serialize(&grid, &mut buf).unwrap();
        buf.truncate(buf.len() - 4);
        let res: Result<ScalarGrid> = deserialize(&mut buf.as_slice());
        assert!(res.is_err());
    }

    #[test]
    fn negative_header_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-1i32).to_ne_bytes());
        buf.extend_from_slice(&1i32.to_ne_bytes());
        let res: Result<ScalarGrid> = deserialize(&mut buf.as_slice());
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn oversized_header_rejected_without_allocating() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(1i32 << 30).to_ne_bytes());
        buf.extend_from_slice(&(1i32 << 30).to_ne_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        let res: Result<ScalarGrid> = deserialize(&mut buf.as_slice());
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let grid = ScalarGrid::filled(2, 2, 0.5).unwrap();
        let mut buf = Vec::new();
        serialize(&grid, &mut buf).unwrap();
        buf.extend_from_slice(&[0u8; 4]);
        let res: Result<ScalarGrid> = deserialize(&mut buf.as_slice());
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn scalar_file_read_as_rgb_fails() {
        let grid = ScalarGrid::filled(2, 2, 0.5).unwrap();
        let mut buf = Vec::new();
        serialize(&grid, &mut buf).unwrap();
        let res: Result<RgbGrid> = deserialize(&mut buf.as_slice());
        assert!(res.is_err());
    }
}
