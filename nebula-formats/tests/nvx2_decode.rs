//! End-to-end NVX2 decoding

mod common;

use common::Nvx2Builder;
use nebula_formats::{
    DecodeError, Diagnostic, FormatVersion, FormatVersionHint, Nvx2Options, decode_nvx2,
    decode_nvx2_with,
};

const COORD: u32 = 1 << 0;
const NORMAL: u32 = 1 << 1;
const UV0: u32 = 1 << 3;
const UV0_S2: u32 = 1 << 4;
const UV1_S2: u32 = 1 << 6;
const UV2: u32 = 1 << 7;
const UV3_S2: u32 = 1 << 10;
const COLOR_UB4N: u32 = 1 << 12;
const TANGENT: u32 = 1 << 13;
const WEIGHTS_UB4N: u32 = 1 << 18;
const JINDICES_UB4: u32 = 1 << 20;

const LEGACY_UV0: u32 = 1 << 2;
const LEGACY_WEIGHTS: u32 = 1 << 9;
const LEGACY_JINDICES: u32 = 1 << 10;
const LEGACY_COORD4: u32 = 1 << 11;

fn approx(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[test]
fn test_single_triangle() {
    let data = Nvx2Builder::new(COORD, 3)
        .group(0, 3, 0, 1)
        .vertex()
        .f32s(&[0.0, 0.0, 0.0])
        .vertex()
        .f32s(&[1.0, 0.0, 0.0])
        .vertex()
        .f32s(&[0.0, 1.0, 0.0])
        .triangle(0, 1, 2)
        .build();

    let mesh = decode_nvx2(&data, &Nvx2Options::default()).unwrap();
    assert_eq!(mesh.groups.len(), 1);
    let group = &mesh.groups[0];
    assert_eq!(group.attributes.positions.len(), 3);
    assert_eq!(group.triangles, vec![[0, 1, 2]]);
    assert!(group.attributes.uvs.iter().all(Vec::is_empty));
}

#[test]
fn test_skinned_current_vertex() {
    let mask = COORD | NORMAL | UV0_S2 | COLOR_UB4N | TANGENT | WEIGHTS_UB4N | JINDICES_UB4;
    // 12 + 12 + 4 + 4 + 12 + 4 + 4 bytes
    let data = Nvx2Builder::new(mask, 13)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[1.5, -2.0, 0.25])
        .f32s(&[0.0, 1.0, 0.0])
        .i16s(&[4096, 2048])
        .u8s(&[10, 20, 30, 255])
        .f32s(&[1.0, 0.0, 0.0])
        .u8s(&[255, 128, 0, 0])
        .u8s(&[3, 1, 0, 0])
        .build();

    let options = Nvx2Options {
        create_colors: true,
        ..Default::default()
    };
    let mesh = decode_nvx2(&data, &options).unwrap();
    assert_eq!(mesh.version, FormatVersion::Current);

    let attrs = &mesh.groups[0].attributes;
    assert_eq!(attrs.positions, vec![[1.5, -2.0, 0.25]]);

    let uv = attrs.uvs[0][0];
    assert!(approx(uv[0], 0.5, 1.0 / 8191.0));
    assert!(approx(uv[1], 0.75, 1.0 / 8191.0));

    let color = attrs.colors[0];
    assert!(approx(color[1], 20.0 / 255.0, 1e-6));
    assert!(approx(color[3], 1.0, 1e-6));

    // Weights sit after the dropped tangent, so they prove its width was skipped
    let weights = attrs.weights[0];
    assert!(approx(weights[0], 1.0, 1.0 / 255.0));
    assert!(approx(weights[1], 0.5, 1.0 / 255.0));
    assert_eq!(weights[2], 0.0);

    // Byte joint indices keep their raw value
    assert_eq!(attrs.joint_indices, vec![[3.0, 1.0, 0.0, 0.0]]);
}

#[test]
fn test_skinned_legacy_vertex() {
    let mask = COORD | LEGACY_UV0 | LEGACY_WEIGHTS | LEGACY_JINDICES;
    let data = Nvx2Builder::new(mask, 13)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[0.0, 1.0, 2.0])
        .f32s(&[0.1, 0.9])
        .f32s(&[0.7, 0.3, 0.0, 0.0])
        .f32s(&[12.0, 4.0, 0.0, 0.0])
        .build();

    let mut diags: Vec<Diagnostic> = Vec::new();
    let mesh = decode_nvx2_with(&data, &Nvx2Options::default(), &mut diags).unwrap();
    assert_eq!(mesh.version, FormatVersion::Legacy);
    assert_eq!(diags[0].message, "Detected nvx2 version: 2");

    let attrs = &mesh.groups[0].attributes;
    assert_eq!(attrs.uvs[0], vec![[0.1, 0.9]]);
    assert_eq!(attrs.weights, vec![[0.7, 0.3, 0.0, 0.0]]);
    assert_eq!(attrs.joint_indices, vec![[12.0, 4.0, 0.0, 0.0]]);
}

#[test]
fn test_legacy_coord4_positions() {
    // Same width as current Color (4f), so the version has to be forced
    let data = Nvx2Builder::new(LEGACY_COORD4, 4)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[5.0, 6.0, 7.0, 1.0])
        .build();
    let options = Nvx2Options {
        version: FormatVersionHint::Legacy,
        ..Default::default()
    };

    let mesh = decode_nvx2(&data, &options).unwrap();
    assert_eq!(mesh.groups[0].attributes.positions, vec![[5.0, 6.0, 7.0]]);
}

#[test]
fn test_weights_disabled() {
    let mask = COORD | WEIGHTS_UB4N | JINDICES_UB4;
    let data = Nvx2Builder::new(mask, 5)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[0.0; 3])
        .u8s(&[255, 0, 0, 0])
        .u8s(&[1, 0, 0, 0])
        .build();
    let options = Nvx2Options {
        create_weights: false,
        ..Default::default()
    };

    let mesh = decode_nvx2(&data, &options).unwrap();
    let attrs = &mesh.groups[0].attributes;
    assert!(attrs.weights.is_empty());
    assert!(attrs.joint_indices.is_empty());
    assert_eq!(attrs.positions.len(), 1);
}

#[test]
fn test_groups_partition_buffers() {
    let mut builder = Nvx2Builder::new(COORD, 3)
        .group(0, 4, 0, 2)
        .group(4, 3, 2, 1);
    for i in 0..7 {
        builder = builder.vertex().f32s(&[i as f32, 0.0, 0.0]);
    }
    let data = builder
        .triangle(0, 1, 2)
        .triangle(2, 3, 0)
        .triangle(6, 5, 4)
        .build();

    let mesh = decode_nvx2(&data, &Nvx2Options::default()).unwrap();
    assert_eq!(mesh.groups.len(), 2);
    assert_eq!(mesh.groups[0].vertex_count(), 4);
    assert_eq!(mesh.groups[1].vertex_count(), 3);
    assert_eq!(mesh.groups[1].triangles, vec![[2, 1, 0]]);
    assert_eq!(mesh.groups[1].attributes.positions[2], [6.0, 0.0, 0.0]);
    assert_eq!(mesh.groups[1].group.vertex_first, 4);

    for group in &mesh.groups {
        assert_eq!(group.attributes.positions.len(), group.group.vertex_count);
        for tri in &group.triangles {
            assert!(tri.iter().all(|&v| (v as usize) < group.vertex_count()));
        }
    }
}

#[test]
fn test_group_exceeds_vertex_buffer() {
    let data = Nvx2Builder::new(COORD, 3)
        .group(2, 3, 0, 0)
        .vertex()
        .f32s(&[0.0; 3])
        .vertex()
        .f32s(&[0.0; 3])
        .vertex()
        .f32s(&[0.0; 3])
        .build();

    assert!(matches!(
        decode_nvx2(&data, &Nvx2Options::default()),
        Err(DecodeError::GroupOutOfRange { group: 0, .. })
    ));
}

#[test]
fn test_face_outside_group() {
    let mut builder = Nvx2Builder::new(COORD, 3).group(0, 3, 0, 1).group(3, 3, 1, 0);
    for _ in 0..6 {
        builder = builder.vertex().f32s(&[0.0; 3]);
    }
    let data = builder.triangle(0, 1, 4).build();

    assert!(matches!(
        decode_nvx2(&data, &Nvx2Options::default()),
        Err(DecodeError::GroupOutOfRange { group: 0, .. })
    ));
}

#[test]
fn test_four_uv_layers_current() {
    let mask = COORD | UV0 | UV1_S2 | UV2 | UV3_S2;
    // 12 + 8 + 4 + 8 + 4 bytes, 64 under the Nebula 2 table
    let data = Nvx2Builder::new(mask, 9)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[0.0, 0.0, 0.0])
        .f32s(&[0.25, 0.75])
        .i16s(&[8191, 0])
        .f32s(&[0.5, 0.125])
        .i16s(&[4096, 2048])
        .build();

    let mut events: Vec<Diagnostic> = Vec::new();
    let mesh = decode_nvx2_with(&data, &Nvx2Options::default(), &mut events).unwrap();
    assert_eq!(mesh.version, FormatVersion::Current);
    assert_eq!(events[0].message, "Detected nvx2 version: 3");

    let uvs = &mesh.groups[0].attributes.uvs;
    // Float layers are stored as-is
    assert_eq!(uvs[0], vec![[0.25, 0.75]]);
    assert_eq!(uvs[2], vec![[0.5, 0.125]]);
    // Fixed-point layers scale by 1/8191 and flip v
    assert_eq!(uvs[1], vec![[1.0, 1.0]]);
    let uv3 = uvs[3][0];
    assert!(approx(uv3[0], 4096.0 / 8191.0, 1e-6));
    assert!(approx(uv3[1], 1.0 - 2048.0 / 8191.0, 1e-6));
}

#[test]
fn test_negative_count() {
    let mut data = Nvx2Builder::new(COORD, 3).group(0, 0, 0, 0).build();
    // Vertex count field
    data[8..12].copy_from_slice(&(-1i32).to_le_bytes());
    assert_eq!(
        decode_nvx2(&data, &Nvx2Options::default()),
        Err(DecodeError::NegativeCount {
            field: "vertex count",
            value: -1
        })
    );
}

#[test]
fn test_serializes_to_json() {
    let data = Nvx2Builder::new(COORD, 3)
        .group(0, 1, 0, 0)
        .vertex()
        .f32s(&[1.0, 2.0, 3.0])
        .build();
    let mesh = decode_nvx2(&data, &Nvx2Options::default()).unwrap();

    let json = serde_json::to_value(&mesh).unwrap();
    assert_eq!(json["version"], "current");
    assert_eq!(json["header"]["magic"], "NVX2");
    assert_eq!(json["groups"][0]["attributes"]["positions"][0][2], 3.0);
}
