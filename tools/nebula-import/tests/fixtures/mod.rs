//! Fixture files for the import tests

#![allow(dead_code)]

use std::path::Path;

/// Coord | Weights | JIndices under Nebula 3
pub const SKINNED_COMPONENTS: u32 = 1 | (1 << 17) | (1 << 19);

/// Little-endian NVX2 file from `(vertex_first, vertex_count, tri_first, tri_count)` groups
pub fn nvx2(
    components: u32,
    width: i32,
    vertex_words: &[f32],
    groups: &[[i32; 4]],
    triangles: &[[u16; 3]],
) -> Vec<u8> {
    let mut data = b"NVX2".to_vec();
    let vertex_count = vertex_words.len() as i32 / width;
    for field in [
        groups.len() as i32,
        vertex_count,
        width,
        triangles.len() as i32,
        0,
    ] {
        data.extend_from_slice(&field.to_le_bytes());
    }
    data.extend_from_slice(&components.to_le_bytes());
    for group in groups {
        for field in group.iter().chain(&[0, 0]) {
            data.extend_from_slice(&field.to_le_bytes());
        }
    }
    for word in vertex_words {
        data.extend_from_slice(&word.to_le_bytes());
    }
    for tri in triangles {
        for index in tri {
            data.extend_from_slice(&index.to_le_bytes());
        }
    }
    data
}

/// One positions-only triangle
pub fn triangle_nvx2() -> Vec<u8> {
    nvx2(
        1,
        3,
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[[0, 3, 0, 1]],
        &[[0, 1, 2]],
    )
}

/// Two skinned triangles in two groups, bound to joints 0 and 1
pub fn skinned_nvx2() -> Vec<u8> {
    let mut words = Vec::new();
    for (i, joint) in [0.0, 0.0, 1.0, 0.0, 1.0, 1.0].into_iter().enumerate() {
        words.extend_from_slice(&[i as f32, 0.0, 0.0]);
        words.extend_from_slice(&[1.0, 0.0, 0.0, 0.0]);
        words.extend_from_slice(&[joint, 0.0, 0.0, 0.0]);
    }
    nvx2(
        SKINNED_COMPONENTS,
        11,
        &words,
        &[[0, 3, 0, 1], [3, 3, 1, 1]],
        &[[0, 1, 2], [3, 4, 5]],
    )
}

/// Little-endian N3 stream writer
#[derive(Default)]
pub struct N3 {
    data: Vec<u8>,
}

impl N3 {
    pub fn new(version: u32) -> Self {
        let mut w = Self::default();
        w.tag(b"NEB3").u32(version);
        w
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.data.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.u32(v as u32)
    }

    pub fn vec4(&mut self, v: [f32; 4]) -> &mut Self {
        for c in v {
            self.u32(c.to_bits());
        }
        self
    }

    pub fn tag(&mut self, tag: &[u8; 4]) -> &mut Self {
        self.u32(u32::from_le_bytes(*tag))
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.data.extend_from_slice(&(s.len() as u16).to_le_bytes());
        self.data.extend_from_slice(s.as_bytes());
        self
    }

    pub fn open(&mut self, node_type: &[u8; 4], name: &str) -> &mut Self {
        self.tag(b">MND").tag(node_type).string(name)
    }

    pub fn close(&mut self) -> &mut Self {
        self.tag(b"<MND")
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.tag(b"<MDL");
        std::mem::take(&mut self.data)
    }
}

/// Character with two joints and a skinned shape pointing at `msh:hero`
pub fn hero_n3() -> Vec<u8> {
    let mut w = N3::new(2);
    w.tag(b">MDL").tag(b"Mdl ").string("hero");
    w.open(b"char", "hero").tag(b"NJNT").i32(2);
    w.tag(b"JONT")
        .i32(0)
        .i32(-1)
        .vec4([0.0; 4])
        .vec4([0.0, 0.0, 0.0, 1.0])
        .vec4([1.0; 4])
        .string("root");
    w.tag(b"JONT")
        .i32(1)
        .i32(0)
        .vec4([0.0, 1.0, 0.0, 0.0])
        .vec4([0.0, 0.0, 0.0, 1.0])
        .vec4([1.0; 4])
        .string("spine");
    w.open(b"cskn", "body")
        .tag(b"MATE")
        .string("skin")
        .tag(b"STXT")
        .string("DiffMap0")
        .string("tex:hero_diff")
        .tag(b"MESH")
        .string("msh:hero")
        .tag(b"PGRI")
        .i32(1);
    w.close().close();
    w.finish()
}

/// Write `data` to `dir/name` and return the path
pub fn write(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
    }
    std::fs::write(&path, data).expect("Failed to write fixture");
    path
}
