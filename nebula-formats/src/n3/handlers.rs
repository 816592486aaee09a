//! Per-category data tag handlers
//!
//! Each handler either recognizes the tag, reads its payload and updates the
//! node, or returns [`Outcome::NotMine`] without consuming any bytes.
//! [`dispatch`] tries them in [`HandlerCategory::PRIORITY`] order.

use crate::error::DecodeResult;
use crate::fourcc::FourCC;
use crate::reader::ByteReader;

use super::node::{BoundingBox, Joint, JointMask, Node, ShaderParam, SkinList};
use super::tags::{HandlerCategory, character, data, misc, shape, skin, state, transform};

/// Result of offering a tag to one handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    NotMine,
}

/// Decoding context shared by all handlers
#[derive(Debug, Clone, Copy)]
pub struct TagContext {
    /// File version from the header
    pub version: u32,
}

pub type TagHandler =
    fn(FourCC, &mut ByteReader<'_>, TagContext, &mut Node) -> DecodeResult<Outcome>;

/// Handlers in dispatch priority order, matching [`HandlerCategory::PRIORITY`]
pub const HANDLERS: [(HandlerCategory, TagHandler); 7] = [
    (HandlerCategory::Character, handle_character),
    (HandlerCategory::CharacterSkin, handle_character_skin),
    (HandlerCategory::State, handle_state),
    (HandlerCategory::Transform, handle_transform),
    (HandlerCategory::Shape, handle_shape),
    (HandlerCategory::Data, handle_data),
    (HandlerCategory::Misc, handle_misc),
];

/// Offer `tag` to every handler in priority order
///
/// Returns the category that handled it, or `None` if none did.
pub fn dispatch(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Option<HandlerCategory>> {
    for (category, handler) in HANDLERS {
        if handler(tag, reader, ctx, node)? == Outcome::Handled {
            return Ok(Some(category));
        }
    }
    Ok(None)
}

fn read_i32_list(reader: &mut ByteReader<'_>, field: &'static str) -> DecodeResult<Vec<i32>> {
    let count = reader.read_count(field)?;
    reader.ensure(count.saturating_mul(4))?;
    (0..count).map(|_| reader.read_i32()).collect()
}

fn read_f32_list(reader: &mut ByteReader<'_>, field: &'static str) -> DecodeResult<Vec<f32>> {
    let count = reader.read_count(field)?;
    reader.ensure(count.saturating_mul(4))?;
    (0..count).map(|_| reader.read_f32()).collect()
}

fn read_string_list(reader: &mut ByteReader<'_>, field: &'static str) -> DecodeResult<Vec<String>> {
    let count = reader.read_count(field)?;
    // Every string carries at least its 2-byte length
    reader.ensure(count.saturating_mul(2))?;
    (0..count).map(|_| reader.read_string()).collect()
}

pub fn handle_character(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    let c = &mut node.character;
    match tag {
        character::ANIMATION => c.animation = Some(reader.read_string()?),
        character::NUM_JOINTS => c.num_joints = Some(reader.read_i32()?),
        character::JOINT => {
            let joint = Joint {
                index: reader.read_i32()?,
                parent: reader.read_i32()?,
                translation: reader.read_f32x4()?,
                rotation: reader.read_f32x4()?,
                scale: reader.read_f32x4()?,
                name: reader.read_string()?,
            };
            tracing::trace!(
                "joint {} '{}' parent {}",
                joint.index,
                joint.name,
                joint.parent
            );
            c.joints.push(joint);
        }
        character::NUM_JOINT_MASKS => c.num_joint_masks = Some(reader.read_i32()?),
        character::JOINT_MASK => {
            let name = reader.read_string()?;
            let weights = read_f32_list(reader, "joint mask weight count")?;
            c.joint_masks.push(JointMask { name, weights });
        }
        character::VARIATION => c.variation = Some(reader.read_string()?),
        character::NUM_SKIN_LISTS => c.num_skin_lists = Some(reader.read_i32()?),
        character::SKIN_LIST => {
            let name = reader.read_string()?;
            let skins = read_string_list(reader, "skin count")?;
            let extra = if ctx.version == 2 {
                reader.read_u8()?;
                Some(reader.read_string()?)
            } else {
                None
            };
            c.skin_lists.push(SkinList { name, skins, extra });
        }
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_character_skin(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    match tag {
        skin::NUM_FRAGMENTS => node.skin.num_fragments = Some(reader.read_i32()?),
        skin::FRAGMENT => {
            let group = reader.read_i32()?;
            let joints = read_i32_list(reader, "skin fragment joint count")?;
            node.skin.fragments.insert(group, joints);
        }
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_state(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    let s = &mut node.state;
    match tag {
        state::MATERIAL_STRING => s.material_string = Some(reader.read_string()?),
        state::MATERIAL => s.material_name = Some(reader.read_string()?),
        state::TEXTURE => {
            let slot = reader.read_string()?;
            let path = reader.read_string()?;
            s.textures.insert(slot, path);
        }
        state::INT => {
            let name = reader.read_string()?;
            let value = reader.read_i32()?;
            s.params.insert(name, ShaderParam::Int(value));
        }
        state::FLOAT => {
            let name = reader.read_string()?;
            let value = reader.read_f32()?;
            s.params.insert(name, ShaderParam::Float(value));
        }
        state::BOOL => {
            let name = reader.read_string()?;
            let value = reader.read_bool()?;
            s.params.insert(name, ShaderParam::Bool(value));
        }
        state::VEC2 => {
            let name = reader.read_string()?;
            let value = reader.read_f32x2()?;
            s.params.insert(name, ShaderParam::Vec2(value));
        }
        state::VEC4 | state::VEC4_ALT => {
            let name = reader.read_string()?;
            let value = reader.read_f32x4()?;
            s.params.insert(name, ShaderParam::Vec4(value));
        }
        state::UV_STRETCH => {
            let name = format!("MLPUVStretch{}", reader.read_i32()?);
            let value = reader.read_f32x4()?;
            s.params.insert(name, ShaderParam::Vec4(value));
        }
        state::SPEC_INTENSITY => {
            let name = format!("MLPSpecIntensity{}", reader.read_i32()?);
            let value = reader.read_f32x4()?;
            s.params.insert(name, ShaderParam::Vec4(value));
        }
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_transform(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    let t = &mut node.transform;
    match tag {
        transform::POSITION => t.position = reader.read_f32x4()?,
        transform::ROTATION => t.rotation = reader.read_f32x4()?,
        transform::SCALE => t.scale = reader.read_f32x4()?,
        transform::ROTATE_PIVOT => t.rotate_pivot = Some(reader.read_f32x4()?),
        transform::SCALE_PIVOT => t.scale_pivot = Some(reader.read_f32x4()?),
        transform::VIEW_IN_SPACE => t.view_in_space = reader.read_bool()?,
        transform::LOCKED_TO_VIEWER => t.locked_to_viewer = reader.read_bool()?,
        transform::MIN_DISTANCE => t.min_distance = reader.read_f32()?,
        transform::MAX_DISTANCE => t.max_distance = reader.read_f32()?,
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_shape(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    match tag {
        shape::MESH => node.shape.mesh = Some(reader.read_string()?),
        shape::PRIMITIVE_GROUP => node.shape.primitive_group = Some(reader.read_i32()?),
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_data(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    let d = &mut node.data;
    match tag {
        data::BOUNDING_BOX => {
            d.bounding_box = Some(BoundingBox {
                center: reader.read_f32x4()?,
                extents: reader.read_f32x4()?,
            });
        }
        data::MODEL_NODE_TYPE => d.model_node_type = Some(reader.read_string()?),
        data::STRING_ATTRIBUTE => {
            let key = reader.read_string()?;
            let value = reader.read_string()?;
            d.attributes.insert(key, value);
        }
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}

pub fn handle_misc(
    tag: FourCC,
    reader: &mut ByteReader<'_>,
    _ctx: TagContext,
    node: &mut Node,
) -> DecodeResult<Outcome> {
    match tag {
        misc::CASH => node.misc.cash = Some(reader.read_bool()?),
        misc::SHADER => node.misc.shader = Some(reader.read_string()?),
        _ => return Ok(Outcome::NotMine),
    }
    Ok(Outcome::Handled)
}
