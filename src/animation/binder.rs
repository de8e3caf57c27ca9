use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{BoneHandle, Rig};

pub struct Binder;

impl Binder {
    /// Resolves a clip's tracks against the subtree at `root_node`.
    ///
    /// Tracks whose node name is not found are left unbound. When a name occurs
    /// more than once the first node in pre-order wins.
    #[must_use]
    pub fn bind(rig: &Rig, root_node: BoneHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let index = rig.name_index(root_node);
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let node_name = track.meta.node_name.as_str();

            match index.get(node_name) {
                Some(&node_handle) => bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                }),
                None => log::debug!("Track '{node_name}' of clip '{}' has no target node", clip.name),
            }
        }

        bindings
    }
}
