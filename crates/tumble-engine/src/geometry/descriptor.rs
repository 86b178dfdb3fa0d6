use crate::error::{EngineError, Result};

const POSITION_COMPONENTS: u32 = 3;
const TEXCOORD_COMPONENTS: u32 = 2;
const NORMAL_COMPONENTS: u32 = 3;

const FLOAT_BYTES: u32 = std::mem::size_of::<f32>() as u32;

/// Floats per interleaved vertex record (position + texcoord + normal).
pub const FLOATS_PER_VERTEX: usize =
    (POSITION_COMPONENTS + TEXCOORD_COMPONENTS + NORMAL_COMPONENTS) as usize;

/// Location of one attribute inside a vertex record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeLayout {
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset from the start of the record.
    pub offset: u32,
}

/// Interleaved vertex data plus its layout.
///
/// Record layout (no padding):
///
/// | attribute | components | byte offset |
/// |-----------|------------|-------------|
/// | position  | 3          | 0           |
/// | texcoord  | 2          | 12          |
/// | normal    | 3          | 20          |
///
/// The vertex shader's `vertCoord`/`vertTexCoord`/`vertNormal` inputs are bound
/// with exactly these values every frame.
#[derive(Debug, Clone, Copy)]
pub struct GeometryDescriptor<'a> {
    data: &'a [f32],
}

impl<'a> GeometryDescriptor<'a> {
    /// Wraps a flat float stream, validating that it holds whole records.
    pub fn new(data: &'a [f32]) -> Result<Self> {
        if data.len() % FLOATS_PER_VERTEX != 0 {
            return Err(EngineError::Layout {
                float_count: data.len(),
                per_vertex: FLOATS_PER_VERTEX,
            });
        }
        Ok(Self { data })
    }

    /// Byte distance between consecutive records.
    #[inline]
    pub const fn stride(&self) -> u32 {
        FLOATS_PER_VERTEX as u32 * FLOAT_BYTES
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        (self.data.len() / FLOATS_PER_VERTEX) as u32
    }

    #[inline]
    pub const fn position(&self) -> AttributeLayout {
        AttributeLayout {
            components: POSITION_COMPONENTS,
            offset: 0,
        }
    }

    #[inline]
    pub const fn texcoord(&self) -> AttributeLayout {
        AttributeLayout {
            components: TEXCOORD_COMPONENTS,
            offset: POSITION_COMPONENTS * FLOAT_BYTES,
        }
    }

    #[inline]
    pub const fn normal(&self) -> AttributeLayout {
        AttributeLayout {
            components: NORMAL_COMPONENTS,
            offset: (POSITION_COMPONENTS + TEXCOORD_COMPONENTS) * FLOAT_BYTES,
        }
    }

    /// The float stream reinterpreted as bytes for upload.
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn eight_vertices_from_64_floats() {
        let data = [0.0f32; 64];
        let g = GeometryDescriptor::new(&data).unwrap();
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.stride(), 32);
    }

    #[test]
    fn empty_stream_is_zero_vertices() {
        let g = GeometryDescriptor::new(&[]).unwrap();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.stride(), 32);
    }

    #[test]
    fn whole_records_always_accepted() {
        for records in 0..20 {
            let data = vec![1.0f32; records * 8];
            let g = GeometryDescriptor::new(&data).unwrap();
            assert_eq!(g.vertex_count() as usize, records);
            assert_eq!(g.stride(), 32);
        }
    }

    #[test]
    fn partial_record_is_layout_error() {
        for len in [1usize, 7, 9, 15, 63, 65] {
            let data = vec![0.0f32; len];
            let err = GeometryDescriptor::new(&data).unwrap_err();
            assert!(
                matches!(err, EngineError::Layout { float_count, per_vertex: 8 } if float_count == len),
                "len {len}: {err}"
            );
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn attribute_offsets_match_record_layout() {
        let data = [0.0f32; 64];
        let g = GeometryDescriptor::new(&data).unwrap();
        assert_eq!(g.position(), AttributeLayout { components: 3, offset: 0 });
        assert_eq!(g.texcoord(), AttributeLayout { components: 2, offset: 12 });
        assert_eq!(g.normal(), AttributeLayout { components: 3, offset: 20 });
    }

    #[test]
    fn last_attribute_ends_at_stride() {
        let g = GeometryDescriptor::new(&[]).unwrap();
        let n = g.normal();
        assert_eq!(n.offset + n.components * 4, g.stride());
    }

    #[test]
    fn byte_view_covers_all_floats() {
        let data = [0.5f32; 16];
        let g = GeometryDescriptor::new(&data).unwrap();
        assert_eq!(g.as_bytes().len(), 64);
    }
}
