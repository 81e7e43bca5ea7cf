//! Retained scene graph
//!
//! Nodes carry a parent-relative transform. Reparenting through [`SceneGraph::attach`]
//! keeps the world transform, everything else keeps the local one.

use std::collections::HashMap;

use glam::{DMat4, DQuat, DVec3};
use shared::{Color, ObjectId, PrimitiveKind, Transform};

/// Thickness given to planar shapes so the slab test has a non-empty box
const PLANAR_HALF_DEPTH: f64 = 1e-6;

/// Generate a fresh node ID
pub fn new_id() -> ObjectId {
    uuid::Uuid::new_v4().to_string()
}

/// Position / rotation / scale triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn from_matrix(m: &DMat4) -> Self {
        let (scale, rotation, position) = m.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Component-wise comparison within `eps`
    pub fn abs_diff_eq(&self, other: &Self, eps: f64) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && self.scale.abs_diff_eq(other.scale, eps)
            // q and -q are the same rotation
            && (self.rotation.abs_diff_eq(other.rotation, eps)
                || self.rotation.abs_diff_eq(-other.rotation, eps))
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<&Transform> for NodeTransform {
    fn from(t: &Transform) -> Self {
        let [x, y, z, w] = t.rotation;
        Self {
            position: DVec3::from_array(t.position),
            rotation: DQuat::from_xyzw(x, y, z, w).normalize(),
            scale: DVec3::from_array(t.scale),
        }
    }
}

impl From<&NodeTransform> for Transform {
    fn from(t: &NodeTransform) -> Self {
        Self {
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

/// Where a node hangs in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Root,
    Node(ObjectId),
    /// Removed from the scene but still owned (e.g. awaiting undo)
    Detached,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh { primitive: PrimitiveKind, color: Color },
    Group,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: ObjectId,
    pub name: String,
    pub kind: NodeKind,
    pub local: NodeTransform,
    parent: Parent,
    children: Vec<ObjectId>,
}

impl Node {
    pub fn parent(&self) -> &Parent {
        &self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn color(&self) -> Option<Color> {
        match self.kind {
            NodeKind::Mesh { color, .. } => Some(color),
            NodeKind::Group => None,
        }
    }

    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            NodeKind::Mesh { primitive, .. } => Some(primitive),
            NodeKind::Group => None,
        }
    }
}

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Object-space bounds of a unit primitive
    pub fn unit(primitive: PrimitiveKind) -> Self {
        let half_z = if primitive.is_planar() {
            PLANAR_HALF_DEPTH
        } else {
            0.5
        };
        Self {
            min: DVec3::new(-0.5, -0.5, -half_z),
            max: DVec3::new(0.5, 0.5, half_z),
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Bounds of this box after transforming its eight corners
    pub fn transformed(&self, m: &DMat4) -> Aabb {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for i in 0..8 {
            let corner = DVec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = m.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the ray parameter of the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Scene graph owning every node, attached or not
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<ObjectId, Node>,
    roots: Vec<ObjectId>,
}

impl SceneGraph {
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of owned nodes, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of the scene root
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Create a node outside the scene
    pub fn insert_detached(&mut self, name: String, kind: NodeKind, local: NodeTransform) -> ObjectId {
        let id = new_id();
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                name,
                kind,
                local,
                parent: Parent::Detached,
                children: Vec::new(),
            },
        );
        id
    }

    /// True if the node's ancestor chain reaches the scene root
    pub fn is_attached(&self, id: &str) -> bool {
        let mut current = id;
        loop {
            match self.nodes.get(current).map(|n| &n.parent) {
                Some(Parent::Root) => return true,
                Some(Parent::Node(p)) => current = p,
                _ => return false,
            }
        }
    }

    /// Put a node directly under the root, keeping its local transform
    pub fn add_to_root(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.unlink(id);
        self.roots.push(id.to_string());
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Parent::Root;
        }
        true
    }

    /// Take a node out of the scene without dropping it
    pub fn detach(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.unlink(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Parent::Detached;
        }
        true
    }

    /// Drop a node and its whole subtree
    pub fn destroy(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            return;
        }
        self.unlink(id);
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.children);
            }
        }
    }

    /// Reparent `id` under `parent` (the root when `None`) keeping its world transform.
    ///
    /// Refuses to create a cycle.
    pub fn attach(&mut self, id: &str, parent: Option<&str>) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) || p == id || self.is_ancestor(id, p) {
                return false;
            }
        }

        let world = self.world_matrix(id);
        let parent_world = parent.map(|p| self.world_matrix(p)).unwrap_or(DMat4::IDENTITY);
        let local = NodeTransform::from_matrix(&(parent_world.inverse() * world));

        self.unlink(id);
        match parent {
            Some(p) => {
                if let Some(pn) = self.nodes.get_mut(p) {
                    pn.children.push(id.to_string());
                }
            }
            None => self.roots.push(id.to_string()),
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent.map_or(Parent::Root, |p| Parent::Node(p.to_string()));
            node.local = local;
        }
        true
    }

    /// Composed transform through every ancestor
    pub fn world_matrix(&self, id: &str) -> DMat4 {
        let mut matrix = DMat4::IDENTITY;
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(cid) else {
                break;
            };
            matrix = node.local.matrix() * matrix;
            current = match &node.parent {
                Parent::Node(p) => Some(p.as_str()),
                _ => None,
            };
        }
        matrix
    }

    pub fn world_transform(&self, id: &str) -> Option<NodeTransform> {
        self.nodes
            .contains_key(id)
            .then(|| NodeTransform::from_matrix(&self.world_matrix(id)))
    }

    /// Set the local transform so the node lands on `world`
    pub fn set_world_transform(&mut self, id: &str, world: &NodeTransform) -> bool {
        let parent_world = match self.nodes.get(id).map(|n| &n.parent) {
            None => return false,
            Some(Parent::Node(p)) => self.world_matrix(p),
            Some(_) => DMat4::IDENTITY,
        };
        let local = NodeTransform::from_matrix(&(parent_world.inverse() * world.matrix()));
        if let Some(node) = self.nodes.get_mut(id) {
            node.local = local;
        }
        true
    }

    /// World-space bounds of the attached meshes among `ids`
    pub fn world_bounds(&self, ids: &[ObjectId]) -> Option<Aabb> {
        ids.iter()
            .filter(|id| self.is_attached(id))
            .filter_map(|id| {
                let primitive = self.nodes.get(id)?.primitive()?;
                Some(Aabb::unit(primitive).transformed(&self.world_matrix(id)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Nearest attached mesh among `candidates` hit by the ray
    pub fn pick(&self, ray: &Ray, candidates: &[ObjectId]) -> Option<ObjectId> {
        let mut best: Option<(&ObjectId, f64)> = None;

        for id in candidates {
            if !self.is_attached(id) {
                continue;
            }
            let Some(primitive) = self.nodes.get(id).and_then(|n| n.primitive()) else {
                continue;
            };
            let inv = self.world_matrix(id).inverse();
            // Not normalized, so the ray parameter stays comparable across objects
            let local_ray = Ray::new(
                inv.transform_point3(ray.origin),
                inv.transform_vector3(ray.direction),
            );
            if let Some(t) = ray_aabb(&local_ray, &Aabb::unit(primitive)) {
                if best.as_ref().is_none_or(|(_, d)| t < *d) {
                    best = Some((id, t));
                }
            }
        }

        best.map(|(id, _)| id.clone())
    }

    fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut current = self.nodes.get(id).map(|n| &n.parent);
        while let Some(Parent::Node(p)) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).map(|n| &n.parent);
        }
        false
    }

    /// Remove the node from its parent's child list (or the roots)
    fn unlink(&mut self, id: &str) {
        let parent = match self.nodes.get(id) {
            Some(node) => node.parent.clone(),
            None => return,
        };
        match parent {
            Parent::Root => self.roots.retain(|r| r != id),
            Parent::Node(p) => {
                if let Some(pn) = self.nodes.get_mut(&p) {
                    pn.children.retain(|c| c != id);
                }
            }
            Parent::Detached => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn cube_at(g: &mut SceneGraph, pos: DVec3) -> ObjectId {
        let id = g.insert_detached(
            "cube".into(),
            NodeKind::Mesh {
                primitive: PrimitiveKind::Cube,
                color: 0xff0000,
            },
            NodeTransform::from_position(pos),
        );
        g.add_to_root(&id);
        id
    }

    #[test]
    fn test_insert_is_detached() {
        let mut g = SceneGraph::default();
        let id = g.insert_detached("g".into(), NodeKind::Group, NodeTransform::IDENTITY);
        assert!(g.contains(&id));
        assert!(!g.is_attached(&id));
        assert!(g.roots().is_empty());
    }

    #[test]
    fn test_attach_preserves_world_transform() {
        let mut g = SceneGraph::default();
        let a = cube_at(&mut g, DVec3::new(1.0, 0.0, 0.0));
        let group = g.insert_detached(
            "group".into(),
            NodeKind::Group,
            NodeTransform {
                position: DVec3::new(2.0, 1.0, 0.0),
                rotation: DQuat::from_rotation_y(0.7),
                scale: DVec3::splat(2.0),
            },
        );
        g.add_to_root(&group);

        assert!(g.attach(&a, Some(&group)));
        assert_eq!(g.get(&a).unwrap().parent(), &Parent::Node(group.clone()));
        let world = g.world_transform(&a).unwrap();
        assert!(world.position.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), EPS));
        assert!(world.scale.abs_diff_eq(DVec3::ONE, EPS));

        assert!(g.attach(&a, None));
        let local = g.get(&a).unwrap().local;
        assert!(local.abs_diff_eq(&NodeTransform::from_position(DVec3::X), EPS));
        assert_eq!(g.roots().iter().filter(|r| **r == a).count(), 1);
    }

    #[test]
    fn test_attach_refuses_cycle() {
        let mut g = SceneGraph::default();
        let a = g.insert_detached("a".into(), NodeKind::Group, NodeTransform::IDENTITY);
        let b = g.insert_detached("b".into(), NodeKind::Group, NodeTransform::IDENTITY);
        g.add_to_root(&a);
        assert!(g.attach(&b, Some(&a)));
        assert!(!g.attach(&a, Some(&b)));
        assert!(!g.attach(&a, Some(&a)));
    }

    #[test]
    fn test_detach_keeps_node() {
        let mut g = SceneGraph::default();
        let a = cube_at(&mut g, DVec3::ZERO);
        assert!(g.detach(&a));
        assert!(g.contains(&a));
        assert!(!g.is_attached(&a));
        assert!(g.roots().is_empty());
        assert!(g.add_to_root(&a));
        assert!(g.is_attached(&a));
    }

    #[test]
    fn test_destroy_subtree() {
        let mut g = SceneGraph::default();
        let group = g.insert_detached("g".into(), NodeKind::Group, NodeTransform::IDENTITY);
        g.add_to_root(&group);
        let a = cube_at(&mut g, DVec3::ZERO);
        g.attach(&a, Some(&group));
        g.destroy(&group);
        assert!(g.is_empty());
        assert!(g.roots().is_empty());
    }

    #[test]
    fn test_set_world_transform_under_parent() {
        let mut g = SceneGraph::default();
        let group = g.insert_detached(
            "g".into(),
            NodeKind::Group,
            NodeTransform::from_position(DVec3::new(5.0, 0.0, 0.0)),
        );
        g.add_to_root(&group);
        let a = cube_at(&mut g, DVec3::ZERO);
        g.attach(&a, Some(&group));

        let target = NodeTransform::from_position(DVec3::new(1.0, 2.0, 3.0));
        assert!(g.set_world_transform(&a, &target));
        assert!(g.world_transform(&a).unwrap().abs_diff_eq(&target, EPS));
        assert!(g
            .get(&a)
            .unwrap()
            .local
            .position
            .abs_diff_eq(DVec3::new(-4.0, 2.0, 3.0), EPS));
    }

    #[test]
    fn test_pick_nearest() {
        let mut g = SceneGraph::default();
        let near = cube_at(&mut g, DVec3::new(0.0, 0.0, 2.0));
        let far = cube_at(&mut g, DVec3::new(0.0, 0.0, -2.0));
        let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z);
        let candidates = vec![far.clone(), near.clone()];
        assert_eq!(g.pick(&ray, &candidates), Some(near.clone()));

        g.detach(&near);
        assert_eq!(g.pick(&ray, &candidates), Some(far));

        let miss = Ray::new(DVec3::new(5.0, 5.0, 10.0), DVec3::NEG_Z);
        assert_eq!(g.pick(&miss, &candidates), None);
    }

    #[test]
    fn test_pick_respects_scale() {
        let mut g = SceneGraph::default();
        let a = cube_at(&mut g, DVec3::ZERO);
        g.get_mut(&a).unwrap().local.scale = DVec3::new(4.0, 1.0, 1.0);
        let ray = Ray::new(DVec3::new(1.5, 0.0, 10.0), DVec3::NEG_Z);
        assert_eq!(g.pick(&ray, &[a.clone()]), Some(a));
    }

    #[test]
    fn test_world_bounds() {
        let mut g = SceneGraph::default();
        let a = cube_at(&mut g, DVec3::new(-1.0, 0.0, 0.0));
        let b = cube_at(&mut g, DVec3::new(3.0, 0.0, 0.0));
        let bounds = g.world_bounds(&[a, b]).unwrap();
        assert!(bounds.min.abs_diff_eq(DVec3::new(-1.5, -0.5, -0.5), EPS));
        assert!(bounds.max.abs_diff_eq(DVec3::new(3.5, 0.5, 0.5), EPS));
        assert!(bounds.center().abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), EPS));
        assert!(g.world_bounds(&[]).is_none());
    }

    #[test]
    fn test_transform_conversion() {
        let t = Transform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [2.0, 2.0, 2.0],
        };
        let n = NodeTransform::from(&t);
        assert_eq!(Transform::from(&n), t);
    }
}
