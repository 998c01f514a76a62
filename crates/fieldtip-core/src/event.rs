#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! The host adapter translates its platform's pointer/keyboard/viewport
//! notifications into this one enum and feeds it to the component. All
//! variants derive `Clone` and `PartialEq` for use in tests.

/// Which owned element a pointer or click event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The small always-visible trigger icon.
    Icon,
    /// The floating content panel.
    Panel,
}

/// Keys the component reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Space,
    Escape,
}

impl KeyCode {
    /// Enter and Space both activate the icon, mirroring a button role.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Canonical input event delivered by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Pointer moved onto the icon or the panel.
    PointerEnter(PointerTarget),
    /// Pointer moved off the icon or the panel.
    PointerLeave(PointerTarget),
    /// Click on the icon or the panel.
    Click(PointerTarget),
    /// Click registered outside both icon and panel.
    OutsideClick,
    /// The icon received keyboard focus.
    Focus,
    /// The icon lost keyboard focus.
    Blur,
    /// Key pressed while the icon has focus.
    Key(KeyCode),
    /// The viewport was resized.
    Resize,
    /// The page scrolled.
    Scroll,
}

#[cfg(test)]
mod tests {
    use super::{Event, KeyCode, PointerTarget};

    #[test]
    fn activation_keys() {
        assert!(KeyCode::Enter.is_activation());
        assert!(KeyCode::Space.is_activation());
        assert!(!KeyCode::Escape.is_activation());
    }

    #[test]
    fn events_compare_for_tests() {
        assert_eq!(
            Event::PointerEnter(PointerTarget::Icon),
            Event::PointerEnter(PointerTarget::Icon)
        );
        assert_ne!(
            Event::PointerEnter(PointerTarget::Icon),
            Event::PointerLeave(PointerTarget::Icon)
        );
    }
}
