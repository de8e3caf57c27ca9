use crate::scene::{BoneHandle, Transform};

/// Transform component a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

/// Track `track_index` of a clip, resolved to a node of a rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: BoneHandle,
    pub target: TargetPath,
}

/// A sampled track value ready to be written to a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampledValue {
    Vector3(glam::Vec3),
    Quaternion(glam::Quat),
}

impl SampledValue {
    /// Writes the value into the component selected by `target`.
    ///
    /// Mismatched pairs (a rotation sample aimed at `Translation`, ...) are
    /// ignored.
    pub fn apply(self, target: TargetPath, transform: &mut Transform) {
        match (target, self) {
            (TargetPath::Translation, Self::Vector3(v)) => transform.position = v,
            (TargetPath::Scale, Self::Vector3(v)) => transform.scale = v,
            (TargetPath::Rotation, Self::Quaternion(q)) => transform.rotation = q,
            _ => {}
        }
    }
}
