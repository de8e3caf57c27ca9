//! Rig hierarchy module
//!
//! Stores skeletal hierarchies as arena-owned node trees:
//! - [`Rig`]: node arena with root list, traversal and world-space queries
//! - [`BoneNode`]: named node with parent/children links and a local transform
//! - [`Transform`]: local position, rotation, scale

pub mod node;
pub mod rig;
pub mod transform;

pub use node::{BoneNode, NodeKind};
pub use rig::Rig;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct BoneHandle;
}
