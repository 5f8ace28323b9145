//! The scene the reader builds into and the writer walks back out.
//!
//! This is the minimal surface of the host content tool the translator
//! needs: a tree of named transform nodes, animation curves bound to a
//! (node, attribute) pair, an active selection, and lookup by name. Nodes
//! are stored in a flat arena and referenced by indices. Nothing here ever
//! deletes a node; once created it belongs to the scene.

use cgmath::Vector3;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

use crate::errors::Result;

pub type NodeIdx = u32;
pub type CurveIdx = usize;

pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeIdx>,
    curves: Vec<AnimCurve>,
    selection: Vec<NodeIdx>,
}

pub struct Node {
    pub name: String,
    pub translation: Vector3<f64>,
    pub rotation_order: RotationOrder,
    /// Ordered animation channels assigned to this node (at most six).
    pub channels: SmallVec<[Attr; 6]>,
    /// Terminal end-site offset, for leaf joints that carry one.
    pub tip_offset: Option<Vector3<f64>>,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
}

/// Order the three rotation channels compose in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOrder {
    Xyz,
    Yzx,
    Zxy,
    Xzy,
    Yxz,
    Zyx,
}

/// One animatable transform component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    TranslateX,
    TranslateY,
    TranslateZ,
    RotateX,
    RotateY,
    RotateZ,
}

impl Attr {
    pub fn is_rotation(self) -> bool {
        match self {
            Attr::RotateX | Attr::RotateY | Attr::RotateZ => true,
            _ => false,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            Attr::TranslateX => "translateX",
            Attr::TranslateY => "translateY",
            Attr::TranslateZ => "translateZ",
            Attr::RotateX => "rotateX",
            Attr::RotateY => "rotateY",
            Attr::RotateZ => "rotateZ",
        };
        f.write_str(s)
    }
}

/// Keyframed curve bound to one attribute of one node. Keys are kept in
/// strictly increasing frame order; rotation values are radians.
pub struct AnimCurve {
    pub node: NodeIdx,
    pub attr: Attr,
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    pub frame: u32,
    pub value: f64,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            nodes: vec![],
            roots: vec![],
            curves: vec![],
            selection: vec![],
        }
    }

    pub fn add_node(&mut self, name: &str, parent: Option<NodeIdx>) -> NodeIdx {
        self.nodes.push(Node {
            name: name.to_string(),
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation_order: RotationOrder::Xyz,
            channels: SmallVec::new(),
            tip_offset: None,
            parent,
            children: vec![],
        });
        let idx = (self.nodes.len() - 1) as NodeIdx;
        match parent {
            Some(p) => self.nodes[p as usize].children.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx as usize]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx as usize]
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.nodes[idx as usize].parent
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.nodes[idx as usize].children
    }

    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node whose name matches, in creation order. Joint names are
    /// expected to be unique; more than one match is ambiguous and callers
    /// treat it as a soft error.
    pub fn find_by_name(&self, name: &str) -> Vec<NodeIdx> {
        let matches: Vec<NodeIdx> = (0..self.nodes.len() as NodeIdx)
            .filter(|&idx| self.nodes[idx as usize].name == name)
            .collect();
        if matches.len() > 1 {
            warn!("{} nodes share the name {}; using the first", matches.len(), name);
        }
        matches
    }

    /// All nodes, breadth-first from the roots.
    pub fn breadth_first(&self) -> Vec<NodeIdx> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<NodeIdx> = self.roots.iter().cloned().collect();
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            queue.extend(self.nodes[idx as usize].children.iter().cloned());
        }
        order
    }

    pub fn select(&mut self, idx: NodeIdx) {
        self.selection.push(idx);
    }

    pub fn selection(&self) -> &[NodeIdx] {
        &self.selection
    }

    pub fn create_curve(&mut self, node: NodeIdx, attr: Attr) -> CurveIdx {
        self.curves.push(AnimCurve { node, attr, keys: vec![] });
        self.curves.len() - 1
    }

    /// Append a key. Fails if `frame` does not come after the last key.
    pub fn add_key(&mut self, curve: CurveIdx, frame: u32, value: f64) -> Result<()> {
        let keys = &mut self.curves[curve].keys;
        if let Some(last) = keys.last() {
            if frame <= last.frame {
                bail!("keyframe at frame {} is not after frame {}", frame, last.frame);
            }
        }
        keys.push(Key { frame, value });
        Ok(())
    }

    pub fn curve(&self, curve: CurveIdx) -> &AnimCurve {
        &self.curves[curve]
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// The first curve bound to (node, attr), if any.
    pub fn curve_for(&self, node: NodeIdx, attr: Attr) -> Option<&AnimCurve> {
        self.curves.iter().find(|c| c.node == node && c.attr == attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenting() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", None);
        let b = scene.add_node("b", Some(a));
        let c = scene.add_node("c", Some(a));
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.children(a), &[b, c]);
        assert_eq!(scene.roots(), &[a]);
    }

    #[test]
    fn breadth_first_order() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", None);
        let b = scene.add_node("b", Some(a));
        let c = scene.add_node("c", Some(a));
        let d = scene.add_node("d", Some(b));
        assert_eq!(scene.breadth_first(), vec![a, b, c, d]);
    }

    #[test]
    fn name_lookup() {
        let mut scene = Scene::new();
        let a = scene.add_node("hip", None);
        let b = scene.add_node("hip", Some(a));
        scene.add_node("knee", Some(b));
        assert_eq!(scene.find_by_name("hip"), vec![a, b]);
        assert_eq!(scene.find_by_name("ankle"), vec![]);
    }

    #[test]
    fn keys_must_advance() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", None);
        let curve = scene.create_curve(a, Attr::TranslateX);
        scene.add_key(curve, 0, 1.0).unwrap();
        scene.add_key(curve, 1, 2.0).unwrap();
        assert!(scene.add_key(curve, 1, 3.0).is_err());
        assert_eq!(scene.curve(curve).keys.len(), 2);
    }

    #[test]
    fn curve_binding() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", None);
        let curve = scene.create_curve(a, Attr::RotateZ);
        scene.add_key(curve, 0, 0.5).unwrap();
        let found = scene.curve_for(a, Attr::RotateZ).unwrap();
        assert_eq!(found.keys, vec![Key { frame: 0, value: 0.5 }]);
        assert!(scene.curve_for(a, Attr::RotateX).is_none());
    }
}
