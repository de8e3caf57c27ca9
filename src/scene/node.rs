use crate::scene::BoneHandle;
use crate::scene::transform::Transform;

/// What a decoded node represents.
///
/// Animation files carry more than joints. The importer strips cameras and
/// lights before mapping, everything else is kept as part of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    #[default]
    Joint,
    Camera,
    Light,
    Mesh,
}

/// A named node in a rig.
///
/// # Hierarchy
///
/// - `parent`: handle to the parent node (`None` for root nodes)
/// - `children`: ordered child handles; the order is the traversal order used by
///   bone mapping, so it must stay stable
///
/// The owning [`Rig`](crate::scene::Rig) keeps both sides of every link in sync.
#[derive(Debug, Clone)]
pub struct BoneNode {
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<BoneHandle>,
    pub(crate) children: Vec<BoneHandle>,

    /// Local transform relative to `parent`.
    pub transform: Transform,
}

impl BoneNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Joint,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BoneHandle] {
        &self.children
    }
}
