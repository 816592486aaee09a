//! Synthetic NVX2/N3 stream writers shared by the integration tests

#![allow(dead_code)]

use nebula_formats::ByteOrder;

/// Builds an NVX2 file one section at a time
pub struct Nvx2Builder {
    components: u32,
    vertex_width: i32,
    vertex_count: i32,
    groups: Vec<[i32; 6]>,
    vertices: Vec<u8>,
    triangles: Vec<[u16; 3]>,
}

impl Nvx2Builder {
    pub fn new(components: u32, vertex_width_words: i32) -> Self {
        Self {
            components,
            vertex_width: vertex_width_words,
            vertex_count: 0,
            groups: Vec::new(),
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Group record: vertex_first, vertex_count, triangle_first, triangle_count
    pub fn group(
        mut self,
        vertex_first: i32,
        vertex_count: i32,
        tri_first: i32,
        tri_count: i32,
    ) -> Self {
        self.groups
            .push([vertex_first, vertex_count, tri_first, tri_count, 0, 0]);
        self
    }

    /// Start a new vertex record
    pub fn vertex(mut self) -> Self {
        self.vertex_count += 1;
        self
    }

    pub fn f32s(mut self, values: &[f32]) -> Self {
        for v in values {
            self.vertices.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn i16s(mut self, values: &[i16]) -> Self {
        for v in values {
            self.vertices.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn u8s(mut self, values: &[u8]) -> Self {
        self.vertices.extend_from_slice(values);
        self
    }

    pub fn triangle(mut self, a: u16, b: u16, c: u16) -> Self {
        self.triangles.push([a, b, c]);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut data = b"NVX2".to_vec();
        for field in [
            self.groups.len() as i32,
            self.vertex_count,
            self.vertex_width,
            self.triangles.len() as i32,
            0,
        ] {
            data.extend_from_slice(&field.to_le_bytes());
        }
        data.extend_from_slice(&self.components.to_le_bytes());
        for group in &self.groups {
            for field in group {
                data.extend_from_slice(&field.to_le_bytes());
            }
        }
        data.extend_from_slice(&self.vertices);
        for tri in &self.triangles {
            for index in tri {
                data.extend_from_slice(&index.to_le_bytes());
            }
        }
        data
    }
}

/// Writes an N3 tag stream in either byte order
pub struct N3Writer {
    order: ByteOrder,
    data: Vec<u8>,
}

impl N3Writer {
    pub fn new(order: ByteOrder, version: u32) -> Self {
        let mut w = Self {
            order,
            data: Vec::new(),
        };
        w.tag(b"NEB3").u32(version);
        w
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        match self.order {
            ByteOrder::Little => self.data.extend_from_slice(&v.to_le_bytes()),
            ByteOrder::Big => self.data.extend_from_slice(&v.to_be_bytes()),
        }
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.u32(v as u32)
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.u32(v.to_bits())
    }

    pub fn vec4(&mut self, v: [f32; 4]) -> &mut Self {
        for c in v {
            self.f32(c);
        }
        self
    }

    pub fn byte(&mut self, v: u8) -> &mut Self {
        self.data.push(v);
        self
    }

    /// Tags are u32 values whose little-endian bytes spell the code
    pub fn tag(&mut self, tag: &[u8; 4]) -> &mut Self {
        self.u32(u32::from_le_bytes(*tag))
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        let len = s.len() as u16;
        match self.order {
            ByteOrder::Little => self.data.extend_from_slice(&len.to_le_bytes()),
            ByteOrder::Big => self.data.extend_from_slice(&len.to_be_bytes()),
        }
        self.data.extend_from_slice(s.as_bytes());
        self
    }

    pub fn model(&mut self, model_type: &[u8; 4], name: &str) -> &mut Self {
        self.tag(b">MDL").tag(model_type).string(name)
    }

    pub fn open_node(&mut self, node_type: &[u8; 4], name: &str) -> &mut Self {
        self.tag(b">MND").tag(node_type).string(name)
    }

    pub fn close_node(&mut self) -> &mut Self {
        self.tag(b"<MND")
    }

    /// Append the model-close tag and return the stream
    pub fn finish(&mut self) -> Vec<u8> {
        self.tag(b"<MDL");
        std::mem::take(&mut self.data)
    }

    /// Offset of the next byte to be written
    pub fn offset(&self) -> usize {
        self.data.len()
    }
}
