// SPDX-License-Identifier: MIT
//! Anchor resolution.
//!
//! Finds the host element the icon should attach to, using an ordered list
//! of matching strategies. Each strategy is tried to exhaustion before the
//! next one; "no match" is an expected outcome that tells the retry
//! scheduler to come back later, not an error.
//!
//! The strategies themselves are data ([`ResolvePlan`]), and the matching
//! rules are [`FieldQuery`] values interpreted by the host adapter, so the
//! library knows nothing about any form framework's class or attribute
//! conventions.

#![forbid(unsafe_code)]

use crate::host::{FieldQuery, FieldRole, HostPage, IconSlot, NodeId};

/// One anchor-matching strategy, in decreasing specificity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Exact logical-identifier match (needs a configured target).
    Target,
    /// Structural/role-based field pattern match, role by role.
    RolePattern(Vec<FieldRole>),
    /// Ancestor walk outward from the mount point, bounded depth, looking
    /// for any visible field-like element.
    Proximity { max_depth: usize },
}

/// The ordered strategy list driving one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePlan {
    pub strategies: Vec<Strategy>,
}

impl Default for ResolvePlan {
    fn default() -> Self {
        Self {
            strategies: vec![
                Strategy::Target,
                Strategy::RolePattern(vec![
                    FieldRole::TextInput,
                    FieldRole::Dropdown,
                    FieldRole::ChoiceGroup,
                ]),
                Strategy::Proximity { max_depth: 5 },
            ],
        }
    }
}

/// A successfully resolved anchor: the field, an optional label to carry
/// the icon, and the slot the icon should attach at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub field: NodeId,
    pub label: Option<NodeId>,
    pub slot: IconSlot,
}

/// Attempt one resolution pass over the plan.
///
/// `used` is the "already hosting an overlay" predicate: an element that
/// carries an icon is never a valid anchor twice.
pub fn resolve<H: HostPage>(
    host: &H,
    target: Option<&str>,
    plan: &ResolvePlan,
    used: impl Fn(NodeId) -> bool,
) -> Option<ResolvedAnchor> {
    let root = host.root();
    let mount = host.mount();

    for strategy in &plan.strategies {
        let field = match strategy {
            Strategy::Target => {
                let Some(id) = target else { continue };
                first_valid(host, mount, &used, host.query(root, &FieldQuery::Target(id)))
            }
            Strategy::RolePattern(roles) => roles.iter().find_map(|role| {
                first_valid(host, mount, &used, host.query(root, &FieldQuery::Role(*role)))
            }),
            Strategy::Proximity { max_depth } => proximity(host, mount, &used, *max_depth),
        };

        if let Some(field) = field {
            tracing::debug!(?strategy, node = field.0, "anchor resolved");
            let label = find_label(host, field);
            let slot = if label.is_some() { IconSlot::Label } else { IconSlot::FieldInline };
            return Some(ResolvedAnchor { field, label, slot });
        }
        tracing::trace!(?strategy, "anchor strategy exhausted");
    }

    None
}

/// Candidate validity per the resolver contract.
fn is_valid<H: HostPage>(
    host: &H,
    mount: NodeId,
    used: &impl Fn(NodeId) -> bool,
    candidate: NodeId,
) -> bool {
    candidate != mount
        && !host.contains(candidate, mount)
        && !used(candidate)
        && !host.measure(candidate).is_empty()
}

fn first_valid<H: HostPage>(
    host: &H,
    mount: NodeId,
    used: &impl Fn(NodeId) -> bool,
    candidates: Vec<NodeId>,
) -> Option<NodeId> {
    candidates
        .into_iter()
        .find(|candidate| is_valid(host, mount, used, *candidate))
}

/// Walk ancestor scopes outward from the mount point, querying each for
/// any visible field-like element.
fn proximity<H: HostPage>(
    host: &H,
    mount: NodeId,
    used: &impl Fn(NodeId) -> bool,
    max_depth: usize,
) -> Option<NodeId> {
    let mut scope = host.parent(mount);
    for _ in 0..max_depth {
        let current = scope?;
        if let Some(field) = first_valid(host, mount, used, host.query(current, &FieldQuery::AnyField))
        {
            return Some(field);
        }
        scope = host.parent(current);
    }
    None
}

/// Label discovery for an accepted field: explicit label-for reference
/// first, then the nearest ancestor container's label descendant.
fn find_label<H: HostPage>(host: &H, field: NodeId) -> Option<NodeId> {
    if let Some(name) = host.control_name(field)
        && let Some(label) = host
            .query(host.root(), &FieldQuery::LabelFor(&name))
            .into_iter()
            .find(|label| !host.measure(*label).is_empty())
    {
        return Some(label);
    }

    let mut scope = Some(field);
    for _ in 0..8 {
        let current = scope?;
        if let Some(label) = host
            .query(current, &FieldQuery::AnyLabel)
            .into_iter()
            .find(|label| !host.measure(*label).is_empty())
        {
            return Some(label);
        }
        scope = host.parent(current);
    }
    None
}
