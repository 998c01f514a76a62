// SPDX-License-Identifier: MIT
//! Show/hide state machine.
//!
//! Owns the `hidden / pendingShow / visible / pendingHide` state and the
//! hover bookkeeping behind it. The machine itself performs no side
//! effects: every transition returns a list of [`Effect`]s for the
//! component to apply (arm/cancel timers, present/conceal the panel), in
//! the order given.
//!
//! Timer callbacks are validated against current state when they fire: a
//! show timer that outlives the pointer does nothing. Ordering between
//! timers and input events is not guaranteed, so every entry point is
//! idempotent.

#![forbid(unsafe_code)]

use fieldtip_core::{PointerTarget, TriggerMode};

/// Visibility lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    /// Show scheduled, waiting out `showDelay`.
    PendingShow,
    Visible,
    /// Hide scheduled, panel still on screen during `hideDelay`.
    PendingHide,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Arm the show timer (`showDelay`).
    ScheduleShow,
    CancelShow,
    /// Arm the hide timer (`hideDelay`).
    ScheduleHide,
    CancelHide,
    /// Enter the visible state: refresh content, compute placement, and
    /// present on the next paint step; arm auto-hide if configured.
    Show,
    /// Leave the visible state: conceal the panel, disarm auto-hide.
    Hide,
}

/// Timer kinds the machine reacts to (mirrors the component's timer set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTimer {
    Show,
    Hide,
    AutoHide,
}

#[derive(Debug, Default)]
pub struct VisibilityMachine {
    state: VisibilityState,
    hover_icon: bool,
    hover_panel: bool,
    focused: bool,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Whether the panel is currently on screen (visible, or still shown
    /// while a hide is pending).
    pub fn panel_shown(&self) -> bool {
        matches!(self.state, VisibilityState::Visible | VisibilityState::PendingHide)
    }

    fn engaged(&self) -> bool {
        self.hover_icon || self.hover_panel || self.focused
    }

    /// Pointer entered the icon or the panel.
    pub fn pointer_enter(&mut self, target: PointerTarget, mode: TriggerMode) -> Vec<Effect> {
        match target {
            PointerTarget::Icon => self.hover_icon = true,
            PointerTarget::Panel => self.hover_panel = true,
        }
        if !mode.hover_enabled() {
            return Vec::new();
        }
        match self.state {
            VisibilityState::Hidden => {
                self.state = VisibilityState::PendingShow;
                vec![Effect::CancelHide, Effect::ScheduleShow]
            }
            // Pointer traveled from icon to panel (or back) before the
            // hide fired: stay visible.
            VisibilityState::PendingHide => {
                self.state = VisibilityState::Visible;
                vec![Effect::CancelHide]
            }
            VisibilityState::PendingShow | VisibilityState::Visible => Vec::new(),
        }
    }

    /// Pointer left the icon or the panel.
    pub fn pointer_leave(&mut self, target: PointerTarget, mode: TriggerMode) -> Vec<Effect> {
        match target {
            PointerTarget::Icon => self.hover_icon = false,
            PointerTarget::Panel => self.hover_panel = false,
        }
        if !mode.hover_enabled() || self.engaged() {
            return Vec::new();
        }
        match self.state {
            VisibilityState::PendingShow => {
                self.state = VisibilityState::Hidden;
                vec![Effect::CancelShow]
            }
            VisibilityState::Visible => {
                self.state = VisibilityState::PendingHide;
                vec![Effect::ScheduleHide]
            }
            VisibilityState::Hidden | VisibilityState::PendingHide => Vec::new(),
        }
    }

    /// Keyboard focus on the icon participates like hover, so the panel is
    /// reachable without a pointer.
    pub fn focus(&mut self, mode: TriggerMode) -> Vec<Effect> {
        self.focused = true;
        if !mode.hover_enabled() {
            return Vec::new();
        }
        match self.state {
            VisibilityState::Hidden => {
                self.state = VisibilityState::PendingShow;
                vec![Effect::CancelHide, Effect::ScheduleShow]
            }
            VisibilityState::PendingHide => {
                self.state = VisibilityState::Visible;
                vec![Effect::CancelHide]
            }
            _ => Vec::new(),
        }
    }

    pub fn blur(&mut self, mode: TriggerMode) -> Vec<Effect> {
        self.focused = false;
        if !mode.hover_enabled() || self.engaged() {
            return Vec::new();
        }
        match self.state {
            VisibilityState::PendingShow => {
                self.state = VisibilityState::Hidden;
                vec![Effect::CancelShow]
            }
            VisibilityState::Visible => {
                self.state = VisibilityState::PendingHide;
                vec![Effect::ScheduleHide]
            }
            _ => Vec::new(),
        }
    }

    /// Click (or Enter/Space) activation: toggle directly with no delay,
    /// canceling whatever was pending.
    pub fn activate(&mut self) -> Vec<Effect> {
        if self.panel_shown() {
            self.state = VisibilityState::Hidden;
            vec![Effect::CancelShow, Effect::CancelHide, Effect::Hide]
        } else {
            self.state = VisibilityState::Visible;
            vec![Effect::CancelShow, Effect::CancelHide, Effect::Show]
        }
    }

    /// Escape: immediate, undelayed hide. Applied within the same tick.
    pub fn escape(&mut self) -> Vec<Effect> {
        self.force_hide()
    }

    /// Click outside both icon and panel while shown.
    pub fn outside_click(&mut self) -> Vec<Effect> {
        self.force_hide()
    }

    fn force_hide(&mut self) -> Vec<Effect> {
        match self.state {
            VisibilityState::Visible | VisibilityState::PendingHide => {
                self.state = VisibilityState::Hidden;
                vec![Effect::CancelShow, Effect::CancelHide, Effect::Hide]
            }
            VisibilityState::PendingShow => {
                self.state = VisibilityState::Hidden;
                vec![Effect::CancelShow]
            }
            VisibilityState::Hidden => Vec::new(),
        }
    }

    /// A timer fired. Stale callbacks are validated against current hover
    /// state and dropped when they no longer apply.
    pub fn timer_fired(&mut self, timer: VisibilityTimer) -> Vec<Effect> {
        match timer {
            VisibilityTimer::Show => {
                if self.state == VisibilityState::PendingShow && self.engaged() {
                    self.state = VisibilityState::Visible;
                    vec![Effect::Show]
                } else {
                    // Pointer already left; fall back to hidden quietly.
                    if self.state == VisibilityState::PendingShow {
                        self.state = VisibilityState::Hidden;
                    }
                    Vec::new()
                }
            }
            VisibilityTimer::Hide => {
                if self.state == VisibilityState::PendingHide && !self.engaged() {
                    self.state = VisibilityState::Hidden;
                    vec![Effect::Hide]
                } else {
                    if self.state == VisibilityState::PendingHide {
                        self.state = VisibilityState::Visible;
                    }
                    Vec::new()
                }
            }
            VisibilityTimer::AutoHide => {
                if self.panel_shown() {
                    self.state = VisibilityState::Hidden;
                    vec![Effect::CancelShow, Effect::CancelHide, Effect::Hide]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Drop back to hidden without emitting effects. Used on teardown and
    /// on the suppression-flag toggle, where the component conceals the
    /// panel itself.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
