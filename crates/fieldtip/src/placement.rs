// SPDX-License-Identifier: MIT
//! Auto-placement for the floating panel.
//!
//! Given fresh measurements of the icon (anchor), the still-invisible
//! panel, and the viewport, [`resolve`] picks a side plus final top/left
//! coordinates. Placement is recomputed from scratch on every show
//! transition and on every resize/scroll while visible; anchor and panel
//! positions are never assumed stable between frames.
//!
//! The algorithm is bounded: at most four side trials plus one
//! overlap-correction pass. No recursion, no loops over retries.

#![forbid(unsafe_code)]

use fieldtip_core::{Placement, Rect, Side};

/// Preference order for `auto` placement and for the none-fit fallback.
const PREFERENCE: [Side; 4] = [Side::Bottom, Side::Top, Side::Right, Side::Left];

/// Inputs to one placement computation. All rectangles freshly measured.
#[derive(Debug, Clone, Copy)]
pub struct PlacementInput {
    pub anchor: Rect,
    pub panel: Rect,
    pub viewport: Rect,
    pub preference: Placement,
    /// Gap between the anchor edge and the panel.
    pub offset: f64,
    /// Minimum distance kept from the viewport edge.
    pub margin: f64,
}

/// A resolved placement. `top`/`left` are final, post-clamp coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub side: Side,
    pub top: f64,
    pub left: f64,
}

/// Compute the panel position for the given measurements.
pub fn resolve(input: &PlacementInput) -> Resolution {
    if input.anchor.is_empty() || input.panel.is_empty() {
        // Nothing usable to anchor against: pin the panel inside the
        // viewport's top-right margin corner, next to where the fallback
        // icon lives.
        let pinned = corner_fallback(input);
        tracing::debug!(top = pinned.top, left = pinned.left, "placement fell back to corner");
        return pinned;
    }

    let side = choose_side(input);
    let clamped = candidate(side, input).clamp_into(&input.viewport, input.margin);

    // Clamping can squeeze the panel back over the anchor. Try the
    // orthogonal sides; take the first whose raw candidate fully fits (its
    // clamp is then the identity). Otherwise accept the residual overlap.
    let resolved = if clamped.overlaps(&input.anchor) {
        orthogonal_escape(side, input).unwrap_or((side, clamped))
    } else {
        (side, clamped)
    };

    tracing::trace!(side = resolved.0.name(), top = resolved.1.top, left = resolved.1.left, "placement resolved");
    Resolution {
        side: resolved.0,
        top: resolved.1.top,
        left: resolved.1.left,
    }
}

fn corner_fallback(input: &PlacementInput) -> Resolution {
    let rect = Rect {
        top: input.viewport.top + input.margin,
        left: input.viewport.right() - input.margin - input.panel.width,
        width: input.panel.width.max(1.0),
        height: input.panel.height.max(1.0),
    }
    .clamp_into(&input.viewport, input.margin);
    Resolution {
        side: Side::Bottom,
        top: rect.top,
        left: rect.left,
    }
}

fn choose_side(input: &PlacementInput) -> Side {
    match input.preference {
        // An explicit side is the only candidate: it wins whether or not
        // it fits, and clamping absorbs the overflow.
        Placement::Exact(side) => side,
        Placement::Auto => PREFERENCE
            .into_iter()
            .find(|side| side_fits(*side, input))
            .unwrap_or(PREFERENCE[0]),
    }
}

/// Directional fit test for side selection.
///
/// A side fits iff the panel plus offset plus boundary margin has room on
/// the placement axis. The orthogonal axis is deliberately not tested
/// here; it is handled by the per-axis clamp afterwards.
fn side_fits(side: Side, input: &PlacementInput) -> bool {
    let PlacementInput {
        anchor,
        panel,
        viewport,
        offset,
        margin,
        ..
    } = *input;
    match side {
        Side::Bottom => anchor.bottom() + offset + panel.height + margin <= viewport.bottom(),
        Side::Top => anchor.top - offset - panel.height - margin >= viewport.top,
        Side::Right => anchor.right() + offset + panel.width + margin <= viewport.right(),
        Side::Left => anchor.left - offset - panel.width - margin >= viewport.left,
    }
}

/// Candidate rectangle for a side: offset from the anchor edge, centered
/// on the anchor's orthogonal axis.
fn candidate(side: Side, input: &PlacementInput) -> Rect {
    let PlacementInput { anchor, panel, offset, .. } = *input;
    let (top, left) = match side {
        Side::Bottom => (anchor.bottom() + offset, anchor.center_x() - panel.width / 2.0),
        Side::Top => (anchor.top - offset - panel.height, anchor.center_x() - panel.width / 2.0),
        Side::Right => (anchor.center_y() - panel.height / 2.0, anchor.right() + offset),
        Side::Left => (anchor.center_y() - panel.height / 2.0, anchor.left - offset - panel.width),
    };
    Rect {
        top,
        left,
        width: panel.width,
        height: panel.height,
    }
}

fn orthogonal_escape(original: Side, input: &PlacementInput) -> Option<(Side, Rect)> {
    let alternates: [Side; 2] = if original.is_vertical() {
        [Side::Right, Side::Left]
    } else {
        [Side::Bottom, Side::Top]
    };
    alternates.into_iter().find_map(|side| {
        let rect = candidate(side, input);
        rect.fits_within(&input.viewport, input.margin)
            .then(|| (side, rect.clamp_into(&input.viewport, input.margin)))
    })
}

#[cfg(test)]
mod tests {
    use super::{PlacementInput, Resolution, resolve};
    use fieldtip_core::{Placement, Rect, Side};

    fn input(anchor: Rect, panel: Rect, viewport: Rect) -> PlacementInput {
        PlacementInput {
            anchor,
            panel,
            viewport,
            preference: Placement::Auto,
            offset: 12.0,
            margin: 16.0,
        }
    }

    #[test]
    fn bottom_is_first_preference() {
        // Anchor 20x20 at (100,100), panel 200x80, viewport 300x400:
        // 100+20+12+80+16 = 228 <= 400, so bottom wins even though the
        // centered left coordinate starts out of bounds and gets clamped.
        let input = input(
            Rect::new(100.0, 100.0, 20.0, 20.0),
            Rect::from_size(200.0, 80.0),
            Rect::from_size(300.0, 400.0),
        );
        let r = resolve(&input);
        assert_eq!(r.side, Side::Bottom);
        assert_eq!(r.top, 132.0);
        // Centered would be 110 - 100 = 10; clamped into [16, 84].
        assert_eq!(r.left, 16.0);
    }

    #[test]
    fn short_viewport_falls_through_to_right() {
        // Viewport height 140: bottom needs 228, top needs 100-12-80-16 =
        // -8 < 0, so the horizontal sides are evaluated and right fits.
        let input = input(
            Rect::new(100.0, 100.0, 20.0, 20.0),
            Rect::from_size(200.0, 80.0),
            Rect::from_size(600.0, 140.0),
        );
        let r = resolve(&input);
        assert_eq!(r.side, Side::Right);
        assert_eq!(r.left, 132.0);
        // Centered 110 - 40 = 70, clamped into [16, 140-80-16 = 44].
        assert_eq!(r.top, 44.0);
    }

    #[test]
    fn no_side_fits_degrades_to_clamped_bottom() {
        let input = input(
            Rect::new(100.0, 100.0, 20.0, 20.0),
            Rect::from_size(200.0, 80.0),
            Rect::from_size(300.0, 140.0),
        );
        let r = resolve(&input);
        assert_eq!(r.side, Side::Bottom);
        // Clamped into the margin band on both axes.
        assert_eq!(r.left, 16.0);
        assert_eq!(r.top, 44.0);
    }

    #[test]
    fn explicit_side_wins_when_it_fits() {
        let mut input = input(
            Rect::new(100.0, 100.0, 20.0, 20.0),
            Rect::from_size(100.0, 40.0),
            Rect::from_size(400.0, 400.0),
        );
        input.preference = Placement::Exact(Side::Top);
        let r = resolve(&input);
        assert_eq!(r.side, Side::Top);
        assert_eq!(r.top, 100.0 - 12.0 - 40.0);
    }

    #[test]
    fn clamp_squeeze_onto_anchor_escapes_orthogonally() {
        // Explicit bottom in a viewport too short for it: clamping pushes
        // the panel back over the anchor, and the right side (which fully
        // fits) takes over.
        let mut input = input(
            Rect::new(100.0, 50.0, 20.0, 20.0),
            Rect::from_size(100.0, 40.0),
            Rect::from_size(200.0, 150.0),
        );
        input.preference = Placement::Exact(Side::Bottom);
        input.offset = 8.0;
        input.margin = 10.0;
        let r = resolve(&input);
        assert_eq!(r.side, Side::Right);
        assert_eq!(r.left, 78.0);
        assert_eq!(r.top, 90.0);
    }

    #[test]
    fn residual_overlap_is_kept_when_no_orthogonal_side_fits() {
        // Viewport barely larger than the panel: nothing fits anywhere,
        // the clamped bottom result overlapping the anchor is accepted.
        let mut input = input(
            Rect::new(40.0, 40.0, 30.0, 30.0),
            Rect::from_size(100.0, 80.0),
            Rect::from_size(120.0, 100.0),
        );
        input.preference = Placement::Exact(Side::Bottom);
        let r = resolve(&input);
        assert_eq!(r.side, Side::Bottom);
        let placed = Rect::new(r.top, r.left, 100.0, 80.0);
        assert!(placed.overlaps(&input.anchor));
    }

    #[test]
    fn empty_anchor_pins_to_corner() {
        let input = input(
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::from_size(200.0, 80.0),
            Rect::from_size(800.0, 600.0),
        );
        let r = resolve(&input);
        assert_eq!(r.top, 16.0);
        assert_eq!(r.left, 800.0 - 16.0 - 200.0);
    }

    #[test]
    fn empty_panel_pins_to_corner() {
        let input = input(
            Rect::new(100.0, 100.0, 20.0, 20.0),
            Rect::from_size(0.0, 0.0),
            Rect::from_size(800.0, 600.0),
        );
        let Resolution { top, left, .. } = resolve(&input);
        assert_eq!(top, 16.0);
        assert!(left <= 800.0 - 16.0);
    }

    #[test]
    fn recompute_tracks_fresh_measurements() {
        let wide = input(
            Rect::new(300.0, 300.0, 20.0, 20.0),
            Rect::from_size(200.0, 80.0),
            Rect::from_size(1000.0, 800.0),
        );
        assert_eq!(resolve(&wide).side, Side::Bottom);

        // Same anchor after a resize that removes the room below.
        let squeezed = PlacementInput {
            viewport: Rect::from_size(1000.0, 380.0),
            ..wide
        };
        assert_eq!(resolve(&squeezed).side, Side::Top);
    }
}
