//! Field-tagged point cloud message.
//!
//! Mirrors the layout of a ROS `PointCloud2`: a packed byte buffer of
//! fixed-size records, described by a list of named fields. Only `x`, `y`
//! and `z` are read by ingestion; any other field (rgb, intensity, ring,
//! ...) is carried along and ignored.
//!
//! ```text
//! record (point_step bytes)
//! ┌──────────┬──────────┬──────────┬──────────────┐
//! │ x: f32   │ y: f32   │ z: f32   │ intensity... │
//! └──────────┴──────────┴──────────┴──────────────┘
//!   offset 0   offset 4   offset 8   offset 12
//! ```

use serde::{Deserialize, Serialize};

/// Storage type of a point field (PointCloud2 datatype codes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FieldDatatype {
    /// Signed 8-bit integer
    Int8 = 1,
    /// Unsigned 8-bit integer
    Uint8 = 2,
    /// Signed 16-bit integer
    Int16 = 3,
    /// Unsigned 16-bit integer
    Uint16 = 4,
    /// Signed 32-bit integer
    Int32 = 5,
    /// Unsigned 32-bit integer
    Uint32 = 6,
    /// 32-bit float
    Float32 = 7,
    /// 64-bit float
    Float64 = 8,
}

impl FieldDatatype {
    /// Size of one element in bytes
    #[inline]
    pub fn size(self) -> usize {
        match self {
            FieldDatatype::Int8 | FieldDatatype::Uint8 => 1,
            FieldDatatype::Int16 | FieldDatatype::Uint16 => 2,
            FieldDatatype::Int32 | FieldDatatype::Uint32 | FieldDatatype::Float32 => 4,
            FieldDatatype::Float64 => 8,
        }
    }

    /// Convert from the wire code. Unknown codes return `None`.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(FieldDatatype::Int8),
            2 => Some(FieldDatatype::Uint8),
            3 => Some(FieldDatatype::Int16),
            4 => Some(FieldDatatype::Uint16),
            5 => Some(FieldDatatype::Int32),
            6 => Some(FieldDatatype::Uint32),
            7 => Some(FieldDatatype::Float32),
            8 => Some(FieldDatatype::Float64),
            _ => None,
        }
    }

    /// Decode one element starting at `bytes[0]`.
    ///
    /// `bytes` must hold at least [`size`](Self::size) bytes.
    pub fn read(self, bytes: &[u8], big_endian: bool) -> f64 {
        macro_rules! decode {
            ($t:ty, $n:expr) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&bytes[..$n]);
                if big_endian {
                    <$t>::from_be_bytes(raw) as f64
                } else {
                    <$t>::from_le_bytes(raw) as f64
                }
            }};
        }

        match self {
            FieldDatatype::Int8 => bytes[0] as i8 as f64,
            FieldDatatype::Uint8 => bytes[0] as f64,
            FieldDatatype::Int16 => decode!(i16, 2),
            FieldDatatype::Uint16 => decode!(u16, 2),
            FieldDatatype::Int32 => decode!(i32, 4),
            FieldDatatype::Uint32 => decode!(u32, 4),
            FieldDatatype::Float32 => decode!(f32, 4),
            FieldDatatype::Float64 => decode!(f64, 8),
        }
    }
}

/// Description of one named field inside each record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name (`x`, `y`, `z`, `intensity`, ...)
    pub name: String,
    /// Byte offset from the start of the record
    pub offset: usize,
    /// Element storage type
    pub datatype: FieldDatatype,
    /// Number of elements
    pub count: usize,
}

impl FieldDescriptor {
    /// Create a scalar field descriptor
    pub fn new(name: impl Into<String>, offset: usize, datatype: FieldDatatype) -> Self {
        Self {
            name: name.into(),
            offset,
            datatype,
            count: 1,
        }
    }

    /// Byte offset one past the end of this field, `None` on overflow
    #[inline]
    pub fn end(&self) -> Option<usize> {
        self.datatype
            .size()
            .checked_mul(self.count.max(1))
            .and_then(|bytes| self.offset.checked_add(bytes))
    }
}

/// Packed point cloud message with named fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloudMessage {
    /// Rows (1 for unorganized clouds)
    pub height: usize,
    /// Points per row
    pub width: usize,
    /// Record layout
    pub fields: Vec<FieldDescriptor>,
    /// Byte order of every field
    pub is_bigendian: bool,
    /// Bytes per record
    pub point_step: usize,
    /// Bytes per row
    pub row_step: usize,
    /// Packed records
    pub data: Vec<u8>,
    /// True if the producer guarantees no invalid points
    pub is_dense: bool,
}

impl PointCloudMessage {
    /// Build an unorganized little-endian XYZ cloud (`f32` fields).
    pub fn from_xyz(points: &[[f32; 3]]) -> Self {
        let mut builder = PointCloudBuilder::xyz();
        for p in points {
            builder.push(*p, &[]);
        }
        builder.build()
    }

    /// Build an unorganized XYZ + intensity cloud (`f32` fields).
    pub fn from_xyzi(points: &[[f32; 4]]) -> Self {
        let mut builder = PointCloudBuilder::xyz().with_extra_field("intensity");
        for p in points {
            builder.push([p[0], p[1], p[2]], &[p[3]]);
        }
        builder.build()
    }

    /// Total number of records (saturates for nonsensical dimensions)
    #[inline]
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Does the message hold no records?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Incremental builder for little-endian `f32` point cloud messages.
#[derive(Clone, Debug)]
pub struct PointCloudBuilder {
    fields: Vec<FieldDescriptor>,
    data: Vec<u8>,
    count: usize,
}

impl PointCloudBuilder {
    /// Start a cloud with `x`, `y`, `z` fields.
    pub fn xyz() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("x", 0, FieldDatatype::Float32),
                FieldDescriptor::new("y", 4, FieldDatatype::Float32),
                FieldDescriptor::new("z", 8, FieldDatatype::Float32),
            ],
            data: Vec::new(),
            count: 0,
        }
    }

    /// Append an extra `f32` field after the existing ones.
    pub fn with_extra_field(mut self, name: &str) -> Self {
        let offset = self.point_step();
        self.fields
            .push(FieldDescriptor::new(name, offset, FieldDatatype::Float32));
        self
    }

    fn point_step(&self) -> usize {
        self.fields.iter().filter_map(|f| f.end()).max().unwrap_or(0)
    }

    /// Append one record. Missing extra values are written as zero.
    pub fn push(&mut self, xyz: [f32; 3], extra: &[f32]) {
        for v in xyz {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        for i in 0..self.fields.len().saturating_sub(3) {
            let v = extra.get(i).copied().unwrap_or(0.0);
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        self.count += 1;
    }

    /// Finish the message as an unorganized cloud.
    pub fn build(self) -> PointCloudMessage {
        let point_step = self.point_step();
        PointCloudMessage {
            height: 1,
            width: self.count,
            fields: self.fields,
            is_bigendian: false,
            point_step,
            row_step: point_step * self.count,
            data: self.data,
            is_dense: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_sizes() {
        assert_eq!(FieldDatatype::Int8.size(), 1);
        assert_eq!(FieldDatatype::Uint16.size(), 2);
        assert_eq!(FieldDatatype::Float32.size(), 4);
        assert_eq!(FieldDatatype::Float64.size(), 8);
        assert_eq!(FieldDatatype::from_u8(7), Some(FieldDatatype::Float32));
        assert_eq!(FieldDatatype::from_u8(9), None);
    }

    #[test]
    fn test_read_endianness() {
        let le = 1.5f32.to_le_bytes();
        let be = 1.5f32.to_be_bytes();
        assert_eq!(FieldDatatype::Float32.read(&le, false), 1.5);
        assert_eq!(FieldDatatype::Float32.read(&be, true), 1.5);
        assert_eq!(FieldDatatype::Int16.read(&(-3i16).to_le_bytes(), false), -3.0);
        assert_eq!(FieldDatatype::Int8.read(&[0xff], false), -1.0);
    }

    #[test]
    fn test_builder_layout() {
        let msg = PointCloudMessage::from_xyzi(&[[1.0, 2.0, 3.0, 0.5], [4.0, 5.0, 6.0, 0.7]]);
        assert_eq!(msg.len(), 2);
        assert_eq!(msg.point_step, 16);
        assert_eq!(msg.row_step, 32);
        assert_eq!(msg.data.len(), 32);
        assert_eq!(msg.field("intensity").map(|f| f.offset), Some(12));
        assert!(msg.field("rgb").is_none());
    }

    #[test]
    fn test_field_end_overflow() {
        let field = FieldDescriptor {
            name: "x".to_string(),
            offset: usize::MAX - 2,
            datatype: FieldDatatype::Float32,
            count: 1,
        };
        assert_eq!(field.end(), None);
        assert_eq!(FieldDescriptor::new("y", 4, FieldDatatype::Float64).end(), Some(12));
    }
}
