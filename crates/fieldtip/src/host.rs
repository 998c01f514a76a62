// SPDX-License-Identifier: MIT
//! The seam between the component and the page that embeds it.
//!
//! The component never touches a real DOM. Everything it needs from the
//! host page (element queries, rectangle measurement, icon/panel/style
//! mutation, navigation) goes through [`HostPage`]. The matching rules
//! for fields and labels are expressed as [`FieldQuery`] *values* that the
//! host interprets against its own element/attribute conventions, so the
//! library carries no selector strings from any particular form framework.
//!
//! Ownership rules (the component side of the contract):
//! - the component owns the elements it creates (icon, panel, stylesheet)
//!   and removes them all on teardown;
//! - host elements are only ever touched by attaching a sibling icon,
//!   never restructured.

#![forbid(unsafe_code)]

use fieldtip_core::{Rect, Result, Side};

/// Opaque handle to a host element.
///
/// The adapter assigns stable ids to the elements it exposes; the
/// component only stores and compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Handle to an icon the component attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(pub u64);

/// Structural role of a form field, used by the pattern-match strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    TextInput,
    Dropdown,
    ChoiceGroup,
}

/// A host-interpreted element query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldQuery<'a> {
    /// Field bound to the given logical identifier.
    Target(&'a str),
    /// Any field matching the structural role pattern.
    Role(FieldRole),
    /// Any field-like element, regardless of role.
    AnyField,
    /// Label explicitly referencing the given logical identifier.
    LabelFor(&'a str),
    /// Any label descendant.
    AnyLabel,
}

/// Where the icon ends up relative to the resolved anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSlot {
    /// Appended to the field's label.
    Label,
    /// Adjacent to the field itself (no label was found).
    FieldInline,
    /// Fixed position in the document, not anchored to any field.
    Fallback,
}

/// Visual parameters for the icon, derived from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub glyph: &'static str,
    pub size: f64,
}

/// Everything the component needs from the embedding page.
pub trait HostPage {
    /// The document-level search scope.
    fn root(&self) -> NodeId;

    /// The component's own mount point inside the host form.
    fn mount(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `ancestor` contains `node` (a node contains itself).
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Run a query within `scope`, returning matches in document order.
    fn query(&self, scope: NodeId, query: &FieldQuery<'_>) -> Vec<NodeId>;

    /// Logical identifier the host associates with a field, if any.
    fn control_name(&self, node: NodeId) -> Option<String>;

    /// Fresh measurement of a node. Unrendered nodes measure empty.
    fn measure(&self, node: NodeId) -> Rect;

    fn viewport(&self) -> Rect;

    /// Whether the node's subtree already hosts an anchored icon.
    fn hosts_icon(&self, node: NodeId) -> bool;

    /// Collapse the mount point so it occupies no visible space.
    fn conceal_mount(&mut self);

    /// Install the component stylesheet under a stable id. Installing the
    /// same id twice is a no-op.
    fn inject_style(&mut self, id: &str, css: &str) -> Result<()>;

    fn remove_style(&mut self, id: &str);

    /// Attach the trigger icon next to `near` at the given slot.
    fn attach_icon(&mut self, near: NodeId, slot: IconSlot, spec: &IconSpec) -> Result<IconId>;

    /// Attach a fixed-position icon directly to the document.
    fn attach_fallback_icon(&mut self, spec: &IconSpec) -> Result<IconId>;

    /// Refresh glyph/size of an already attached icon.
    fn update_icon(&mut self, icon: IconId, spec: &IconSpec);

    fn remove_icon(&mut self, icon: IconId);

    /// Fresh measurement of an attached icon.
    fn icon_rect(&self, icon: IconId) -> Rect;

    /// Create the (hidden) panel element.
    fn create_panel(&mut self) -> Result<()>;

    fn set_panel_body(&mut self, html: &str);

    /// Measure the panel while it is still invisible.
    fn panel_rect(&self) -> Rect;

    /// Write the panel's resolved position and side.
    fn place_panel(&mut self, top: f64, left: f64, side: Side);

    /// Flip the panel visible. The component only calls this from its
    /// paint-step callback, never synchronously from a timer.
    fn present_panel(&mut self);

    fn conceal_panel(&mut self);

    fn remove_panel(&mut self);

    /// Navigate away (the redirect short-circuit).
    fn navigate(&mut self, url: &str, new_tab: bool);

    /// Ask for a paint-step callback (`Component::on_frame`).
    fn request_frame(&mut self);
}
