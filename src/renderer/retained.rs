//! Retained-mode scene graph
//!
//! Implements `HostSurface` as a plain table of nodes. The browser host draws
//! it to a canvas every frame; tests inspect it directly.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{DrawLayer, HostSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Sprite { key: String, size: Vec2, frame: u32 },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub layer: DrawLayer,
    pub pos: Vec2,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RetainedScene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visible nodes in paint order (layer, then creation)
    pub fn draw_list(&self) -> Vec<(NodeId, &Node)> {
        let mut list: Vec<(NodeId, &Node)> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.visible)
            .map(|(id, node)| (*id, node))
            .collect();
        list.sort_by_key(|(id, node)| (node.layer, *id));
        list
    }

    /// Nodes showing the given image key
    pub fn sprites_with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .values()
            .filter(move |node| matches!(&node.kind, NodeKind::Sprite { key: k, .. } if k == key))
    }

    /// All text currently shown
    pub fn texts(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|node| node.visible)
            .filter_map(|node| match &node.kind {
                NodeKind::Text { text } => Some(text.as_str()),
                NodeKind::Sprite { .. } => None,
            })
            .collect()
    }
}

impl HostSurface for RetainedScene {
    type Handle = NodeId;

    fn create_sprite(&mut self, key: &str, layer: DrawLayer, pos: Vec2, size: Vec2) -> NodeId {
        self.insert(Node {
            kind: NodeKind::Sprite {
                key: key.to_string(),
                size,
                frame: 0,
            },
            layer,
            pos,
            visible: true,
        })
    }

    fn create_text(&mut self, text: &str, pos: Vec2) -> NodeId {
        self.insert(Node {
            kind: NodeKind::Text {
                text: text.to_string(),
            },
            layer: DrawLayer::Hud,
            pos,
            visible: true,
        })
    }

    fn set_position(&mut self, handle: NodeId, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.pos = pos;
        }
    }

    fn set_frame(&mut self, handle: NodeId, frame: u32) {
        if let Some(Node {
            kind: NodeKind::Sprite { frame: f, .. },
            ..
        }) = self.nodes.get_mut(&handle)
        {
            *f = frame;
        }
    }

    fn set_visible(&mut self, handle: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.visible = visible;
        }
    }

    fn set_text(&mut self, handle: NodeId, text: &str) {
        if let Some(Node {
            kind: NodeKind::Text { text: t },
            ..
        }) = self.nodes.get_mut(&handle)
        {
            if t.as_str() != text {
                *t = text.to_string();
            }
        }
    }

    fn destroy(&mut self, handle: NodeId) {
        self.nodes.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_order_by_layer() {
        let mut scene = RetainedScene::new();
        let text = scene.create_text("Score: 0", Vec2::new(16.0, 16.0));
        let coin = scene.create_sprite("coin", DrawLayer::Entities, Vec2::ZERO, Vec2::splat(32.0));
        let bg = scene.create_sprite("bg", DrawLayer::Background, Vec2::ZERO, Vec2::splat(800.0));
        let order: Vec<NodeId> = scene.draw_list().iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![bg, coin, text]);
    }

    #[test]
    fn test_hidden_nodes_not_drawn() {
        let mut scene = RetainedScene::new();
        let id = scene.create_sprite("coin", DrawLayer::Entities, Vec2::ZERO, Vec2::splat(32.0));
        scene.set_visible(id, false);
        assert!(scene.draw_list().is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_unknown_handles_are_ignored() {
        let mut scene = RetainedScene::new();
        let id = scene.create_text("hi", Vec2::ZERO);
        scene.destroy(id);
        scene.destroy(id);
        scene.set_position(id, Vec2::ONE);
        scene.set_text(id, "bye");
        assert!(scene.is_empty());
    }

    #[test]
    fn test_set_frame_only_touches_sprites() {
        let mut scene = RetainedScene::new();
        let sprite = scene.create_sprite("player", DrawLayer::Player, Vec2::ZERO, Vec2::ONE);
        let text = scene.create_text("hi", Vec2::ZERO);
        scene.set_frame(sprite, 1);
        scene.set_frame(text, 1);
        assert!(matches!(
            scene.get(sprite).map(|n| &n.kind),
            Some(NodeKind::Sprite { frame: 1, .. })
        ));
        assert_eq!(scene.texts(), vec!["hi"]);
    }
}
