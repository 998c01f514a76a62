#![forbid(unsafe_code)]

//! In-memory host page.
//!
//! A flat node store in document order, with parent links for containment
//! and per-node rectangles for measurement. The [`fieldtip::FieldQuery`]
//! interpretation here stands in for a real form framework's selector
//! conventions: logical identifiers are plain strings on field nodes, and
//! labels reference them through `for_control`.

use ahash::AHashMap;
use fieldtip::{FieldQuery, FieldRole, HostPage, IconId, IconSlot, IconSpec, NodeId};
use fieldtip_core::{Error, Rect, Result, Side};

/// What a simulated node is.
#[derive(Debug, Clone, PartialEq)]
pub enum SimKind {
    Root,
    Container,
    /// The component's own mount point.
    Mount,
    Field {
        role: FieldRole,
        control: Option<String>,
    },
    Label {
        for_control: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct SimNode {
    parent: Option<u64>,
    kind: SimKind,
    rect: Rect,
}

/// An icon the component attached, with everything it attached with.
#[derive(Debug, Clone)]
pub struct SimIcon {
    pub id: IconId,
    /// Node the icon sits next to; `None` for the fixed-position fallback.
    pub near: Option<NodeId>,
    pub slot: IconSlot,
    pub spec: IconSpec,
    pub rect: Rect,
}

/// Recorded panel state.
#[derive(Debug, Clone, Default)]
pub struct SimPanel {
    pub created: bool,
    pub body: String,
    pub placed: Option<(f64, f64, Side)>,
    pub visible: bool,
    /// Size reported by `panel_rect` measurements.
    pub size: (f64, f64),
}

/// A deterministic, fully recording [`HostPage`].
#[derive(Debug)]
pub struct SimPage {
    nodes: AHashMap<u64, SimNode>,
    /// Document order.
    order: Vec<u64>,
    next_id: u64,
    root: u64,
    mount: u64,
    viewport: Rect,

    pub icons: Vec<SimIcon>,
    next_icon: u64,
    pub panel: SimPanel,
    pub styles: AHashMap<String, String>,
    pub navigations: Vec<(String, bool)>,
    pub frames_requested: usize,
    pub mount_concealed: bool,

    /// Fault injection: make `attach_icon` fail.
    pub fail_attach: bool,
    /// Fault injection: make `attach_fallback_icon` fail.
    pub fail_fallback: bool,
    /// Fault injection: make `create_panel` fail.
    pub fail_panel: bool,
}

impl SimPage {
    /// A page with a root container and a mount point directly under it.
    pub fn new(viewport: Rect) -> Self {
        let mut nodes = AHashMap::new();
        nodes.insert(
            0,
            SimNode {
                parent: None,
                kind: SimKind::Root,
                rect: viewport,
            },
        );
        nodes.insert(
            1,
            SimNode {
                parent: Some(0),
                kind: SimKind::Mount,
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            },
        );
        Self {
            nodes,
            order: vec![0, 1],
            next_id: 2,
            root: 0,
            mount: 1,
            viewport,
            icons: Vec::new(),
            next_icon: 0,
            panel: SimPanel {
                size: (200.0, 80.0),
                ..SimPanel::default()
            },
            styles: AHashMap::new(),
            navigations: Vec::new(),
            frames_requested: 0,
            mount_concealed: false,
            fail_attach: false,
            fail_fallback: false,
            fail_panel: false,
        }
    }

    fn insert(&mut self, parent: NodeId, kind: SimKind, rect: Rect) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            SimNode {
                parent: Some(parent.0),
                kind,
                rect,
            },
        );
        self.order.push(id);
        NodeId(id)
    }

    pub fn add_container(&mut self, parent: NodeId, rect: Rect) -> NodeId {
        self.insert(parent, SimKind::Container, rect)
    }

    pub fn add_field(
        &mut self,
        parent: NodeId,
        role: FieldRole,
        control: Option<&str>,
        rect: Rect,
    ) -> NodeId {
        self.insert(
            parent,
            SimKind::Field {
                role,
                control: control.map(str::to_string),
            },
            rect,
        )
    }

    pub fn add_label(&mut self, parent: NodeId, for_control: Option<&str>, rect: Rect) -> NodeId {
        self.insert(
            parent,
            SimKind::Label {
                for_control: for_control.map(str::to_string),
            },
            rect,
        )
    }

    /// Re-parent the mount point (to simulate where the host renders it).
    pub fn place_mount_under(&mut self, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(&self.mount) {
            node.parent = Some(parent.0);
        }
    }

    /// Change a node's measured rectangle (layout shift).
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.rect = rect;
        }
    }

    /// Change the viewport (resize).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.rect = viewport;
        }
    }

    /// Size reported for the panel on measurement.
    pub fn set_panel_size(&mut self, width: f64, height: f64) {
        self.panel.size = (width, height);
    }

    /// Pin an attached icon's measured rectangle (for placement tests).
    pub fn set_icon_rect(&mut self, icon: IconId, rect: Rect) {
        if let Some(entry) = self.icons.iter_mut().find(|i| i.id == icon) {
            entry.rect = rect;
        }
    }

    pub fn fallback_icon(&self) -> Option<&SimIcon> {
        self.icons.iter().find(|i| i.slot == IconSlot::Fallback)
    }

    fn contains_impl(&self, ancestor: u64, node: u64) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }
}

impl HostPage for SimPage {
    fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    fn mount(&self) -> NodeId {
        NodeId(self.mount)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node.0).and_then(|n| n.parent).map(NodeId)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.contains_impl(ancestor.0, node.0)
    }

    fn query(&self, scope: NodeId, query: &FieldQuery<'_>) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.contains_impl(scope.0, *id))
            .filter(|id| {
                let Some(node) = self.nodes.get(id) else {
                    return false;
                };
                match (query, &node.kind) {
                    (FieldQuery::Target(t), SimKind::Field { control, .. }) => {
                        control.as_deref() == Some(*t)
                    }
                    (FieldQuery::Role(r), SimKind::Field { role, .. }) => role == r,
                    (FieldQuery::AnyField, SimKind::Field { .. }) => true,
                    (FieldQuery::LabelFor(t), SimKind::Label { for_control }) => {
                        for_control.as_deref() == Some(*t)
                    }
                    (FieldQuery::AnyLabel, SimKind::Label { .. }) => true,
                    _ => false,
                }
            })
            .map(NodeId)
            .collect()
    }

    fn control_name(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(&node.0)?.kind {
            SimKind::Field { control, .. } => control.clone(),
            _ => None,
        }
    }

    fn measure(&self, node: NodeId) -> Rect {
        self.nodes.get(&node.0).map(|n| n.rect).unwrap_or_default()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn hosts_icon(&self, node: NodeId) -> bool {
        self.icons.iter().any(|icon| {
            icon.near
                .is_some_and(|near| self.contains_impl(node.0, near.0))
        })
    }

    fn conceal_mount(&mut self) {
        self.mount_concealed = true;
    }

    fn inject_style(&mut self, id: &str, css: &str) -> Result<()> {
        self.styles.entry(id.to_string()).or_insert_with(|| css.to_string());
        Ok(())
    }

    fn remove_style(&mut self, id: &str) {
        self.styles.remove(id);
    }

    fn attach_icon(&mut self, near: NodeId, slot: IconSlot, spec: &IconSpec) -> Result<IconId> {
        if self.fail_attach {
            return Err(Error::host("icon attachment disabled by test"));
        }
        let id = IconId(self.next_icon);
        self.next_icon += 1;
        let near_rect = self.measure(near);
        self.icons.push(SimIcon {
            id,
            near: Some(near),
            slot,
            spec: spec.clone(),
            rect: Rect::new(near_rect.top, near_rect.right() + 4.0, 16.0, 16.0),
        });
        Ok(id)
    }

    fn attach_fallback_icon(&mut self, spec: &IconSpec) -> Result<IconId> {
        if self.fail_fallback {
            return Err(Error::host("fallback icon attachment disabled by test"));
        }
        let id = IconId(self.next_icon);
        self.next_icon += 1;
        self.icons.push(SimIcon {
            id,
            near: None,
            slot: IconSlot::Fallback,
            spec: spec.clone(),
            rect: Rect::new(10.0, self.viewport.right() - 26.0, 16.0, 16.0),
        });
        Ok(id)
    }

    fn update_icon(&mut self, icon: IconId, spec: &IconSpec) {
        if let Some(entry) = self.icons.iter_mut().find(|i| i.id == icon) {
            entry.spec = spec.clone();
        }
    }

    fn remove_icon(&mut self, icon: IconId) {
        self.icons.retain(|i| i.id != icon);
    }

    fn icon_rect(&self, icon: IconId) -> Rect {
        self.icons
            .iter()
            .find(|i| i.id == icon)
            .map(|i| i.rect)
            .unwrap_or_default()
    }

    fn create_panel(&mut self) -> Result<()> {
        if self.fail_panel {
            return Err(Error::host("panel creation disabled by test"));
        }
        self.panel.created = true;
        Ok(())
    }

    fn set_panel_body(&mut self, html: &str) {
        self.panel.body = html.to_string();
    }

    fn panel_rect(&self) -> Rect {
        if self.panel.created {
            Rect::from_size(self.panel.size.0, self.panel.size.1)
        } else {
            Rect::default()
        }
    }

    fn place_panel(&mut self, top: f64, left: f64, side: Side) {
        self.panel.placed = Some((top, left, side));
    }

    fn present_panel(&mut self) {
        self.panel.visible = true;
    }

    fn conceal_panel(&mut self) {
        self.panel.visible = false;
    }

    fn remove_panel(&mut self) {
        self.panel = SimPanel {
            size: self.panel.size,
            ..SimPanel::default()
        };
    }

    fn navigate(&mut self, url: &str, new_tab: bool) {
        self.navigations.push((url.to_string(), new_tab));
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }
}
