// SPDX-License-Identifier: MIT
//! Component lifecycle and wiring.
//!
//! [`FieldTip`] is the host-facing entry point. The host constructs it
//! with `init`, feeds it a fresh configuration snapshot on every re-render
//! via `update_view`, forwards input events, drives the timer set from its
//! tick, delivers paint-step callbacks, and finally calls `destroy`, which
//! releases every timer and owned element.
//!
//! The component never reads a clock and never blocks: every entry point
//! takes `now` from the host, and every wait lives in the timer set.

#![forbid(unsafe_code)]

use fieldtip_core::{Config, Event, KeyCode, ParamBag, PointerTarget, Result, TimerKind, Timers};
use web_time::Instant;

use crate::anchor::{self, ResolvePlan};
use crate::content;
use crate::host::{HostPage, IconId, IconSlot, NodeId};
use crate::placement::{self, PlacementInput};
use crate::retry::{self, RetrySchedule, RetryState};
use crate::style;
use crate::visibility::{Effect, VisibilityMachine, VisibilityState, VisibilityTimer};

/// The live attachment: resolved field (absent in fallback mode), the
/// label that carries the icon, and the icon itself.
///
/// At most one handle is live per component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorHandle {
    pub field: Option<NodeId>,
    pub label: Option<NodeId>,
    pub icon: IconId,
    pub slot: IconSlot,
}

/// The host-facing output record. This component exposes no outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outputs;

/// An anchored info-tip component instance.
pub struct FieldTip {
    config: Config,
    plan: ResolvePlan,
    machine: VisibilityMachine,
    timers: Timers,
    retry: RetrySchedule,
    anchor: Option<AnchorHandle>,
    panel_created: bool,
    present_queued: bool,
}

impl FieldTip {
    /// Start a component instance.
    ///
    /// `_notify_change` is part of the host contract; the output record is
    /// empty, so it is never invoked. A setup failure degrades to the
    /// fixed-position fallback icon instead of leaving the widget broken.
    pub fn init<H: HostPage>(
        host: &mut H,
        params: &ParamBag,
        _notify_change: impl FnMut() + 'static,
        now: Instant,
    ) -> Self {
        let config = Config::from_params(params);
        let mut tip = Self {
            config,
            plan: ResolvePlan::default(),
            machine: VisibilityMachine::new(),
            timers: Timers::new(),
            retry: RetrySchedule::new(now),
            anchor: None,
            panel_created: false,
            present_queued: false,
        };

        // The mount point is collapsed whether or not rendering is
        // suppressed; the host reserves layout space for it otherwise.
        host.conceal_mount();
        if tip.config.hidden {
            tracing::debug!("rendering suppressed by configuration");
            return tip;
        }

        if let Err(err) = tip.setup(host, now) {
            tracing::warn!(%err, "setup failed, degrading to fallback icon");
            tip.synthesize_fallback(host);
        }
        tip
    }

    /// Use a custom anchor-matching plan instead of [`ResolvePlan::default`].
    #[must_use]
    pub fn with_plan(mut self, plan: ResolvePlan) -> Self {
        self.plan = plan;
        self
    }

    fn setup<H: HostPage>(&mut self, host: &mut H, now: Instant) -> Result<()> {
        host.inject_style(style::STYLE_ID, &style::stylesheet(&self.config))?;
        if !self.panel_created {
            host.create_panel()?;
            self.panel_created = true;
        }
        self.schedule_next_retry(now);
        Ok(())
    }

    /// Take a fresh configuration snapshot from the host re-render.
    pub fn update_view<H: HostPage>(&mut self, host: &mut H, params: &ParamBag, now: Instant) {
        let was_hidden = self.config.hidden;
        self.config = Config::from_params(params);

        if self.config.hidden != was_hidden {
            if self.config.hidden {
                self.suppress(host);
            } else {
                // Coming back from suppression: restart attachment from a
                // clean retry session.
                host.conceal_mount();
                self.retry.reset(now);
                if let Err(err) = self.setup(host, now) {
                    tracing::warn!(%err, "re-setup failed, degrading to fallback icon");
                    self.synthesize_fallback(host);
                }
            }
            return;
        }
        if self.config.hidden {
            return;
        }

        if let Some(handle) = &self.anchor {
            host.update_icon(handle.icon, &style::icon_spec(&self.config));
        }
        if self.machine.panel_shown() {
            host.set_panel_body(&content::render_body(
                &self.config.content,
                self.config.allow_html,
            ));
            self.reposition(host);
        }
        if !self.retry.resolved() {
            self.timers
                .schedule(TimerKind::Retry, now + retry::UPDATE_RETRY_DELAY);
        }
    }

    /// The host-facing output record (empty).
    pub fn get_outputs(&self) -> Outputs {
        Outputs
    }

    /// Full teardown: cancel every timer, detach every owned element.
    pub fn destroy<H: HostPage>(&mut self, host: &mut H) {
        self.timers.clear();
        if let Some(handle) = self.anchor.take() {
            host.remove_icon(handle.icon);
        }
        if self.panel_created {
            host.remove_panel();
            self.panel_created = false;
        }
        host.remove_style(style::STYLE_ID);
        self.machine.reset();
        self.present_queued = false;
        tracing::debug!("destroyed, host resources released");
    }

    /// Feed one input event.
    pub fn handle_event<H: HostPage>(&mut self, host: &mut H, event: Event, now: Instant) {
        if self.config.hidden {
            return;
        }
        let trigger = self.config.trigger;
        let effects = match event {
            Event::PointerEnter(target) => self.machine.pointer_enter(target, trigger),
            Event::PointerLeave(target) => self.machine.pointer_leave(target, trigger),
            Event::Focus => self.machine.focus(trigger),
            Event::Blur => self.machine.blur(trigger),
            Event::Click(PointerTarget::Icon) => {
                // Pointer clicks toggle only in click/both mode; keyboard
                // activation below works in every mode.
                if trigger.click_enabled() {
                    self.activate(host, now);
                }
                Vec::new()
            }
            Event::Click(PointerTarget::Panel) => Vec::new(),
            Event::Key(key) if key.is_activation() => {
                self.activate(host, now);
                Vec::new()
            }
            Event::Key(KeyCode::Escape) => self.machine.escape(),
            Event::Key(_) => Vec::new(),
            Event::OutsideClick => self.machine.outside_click(),
            Event::Resize | Event::Scroll => {
                if self.machine.panel_shown() {
                    self.reposition(host);
                }
                Vec::new()
            }
        };
        self.apply(host, effects, now);
    }

    /// Fire due timers. The host calls this from its own scheduling tick.
    pub fn tick<H: HostPage>(&mut self, host: &mut H, now: Instant) {
        for kind in self.timers.due(now) {
            match kind {
                TimerKind::Show => {
                    let effects = self.machine.timer_fired(VisibilityTimer::Show);
                    self.apply(host, effects, now);
                }
                TimerKind::Hide => {
                    let effects = self.machine.timer_fired(VisibilityTimer::Hide);
                    self.apply(host, effects, now);
                }
                TimerKind::AutoHide => {
                    let effects = self.machine.timer_fired(VisibilityTimer::AutoHide);
                    self.apply(host, effects, now);
                }
                TimerKind::Retry | TimerKind::MutationDebounce => {
                    self.attempt_attach(host, now);
                }
            }
        }
    }

    /// Paint-step callback, delivered after [`HostPage::request_frame`].
    pub fn on_frame<H: HostPage>(&mut self, host: &mut H) {
        if self.present_queued && self.machine.panel_shown() {
            host.present_panel();
        }
        self.present_queued = false;
    }

    /// The host DOM changed. Debounced; honored only while the bounded
    /// observation window is open and the anchor is unresolved.
    pub fn notify_mutation(&mut self, now: Instant) {
        if self.config.hidden || !self.retry.observing(now) {
            return;
        }
        self.timers
            .schedule(TimerKind::MutationDebounce, now + retry::MUTATION_DEBOUNCE);
    }

    /// Earliest pending deadline, for hosts that sleep between ticks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn visibility(&self) -> VisibilityState {
        self.machine.state()
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry.state()
    }

    pub fn anchor(&self) -> Option<&AnchorHandle> {
        self.anchor.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Click/keyboard activation. A configured redirect short-circuits the
    /// state machine; navigation and panel display are mutually exclusive
    /// per click.
    fn activate<H: HostPage>(&mut self, host: &mut H, now: Instant) {
        if let Some(raw) = self.config.redirect_url.clone() {
            match content::sanitize_url(&raw) {
                Some(url) => {
                    host.navigate(&url, self.config.open_in_new_tab);
                    return;
                }
                None => {
                    tracing::warn!(url = %raw, "redirect refused by protocol allowlist");
                }
            }
        }
        let effects = self.machine.activate();
        self.apply(host, effects, now);
    }

    fn apply<H: HostPage>(&mut self, host: &mut H, effects: Vec<Effect>, now: Instant) {
        for effect in effects {
            match effect {
                Effect::ScheduleShow => self
                    .timers
                    .schedule(TimerKind::Show, now + self.config.show_delay),
                Effect::CancelShow => self.timers.cancel(TimerKind::Show),
                Effect::ScheduleHide => self
                    .timers
                    .schedule(TimerKind::Hide, now + self.config.hide_delay),
                Effect::CancelHide => self.timers.cancel(TimerKind::Hide),
                Effect::Show => self.begin_show(host, now),
                Effect::Hide => self.conceal(host),
            }
        }
    }

    /// Entering the visible state: refresh content, compute placement,
    /// and queue presentation for the next paint step.
    fn begin_show<H: HostPage>(&mut self, host: &mut H, now: Instant) {
        if !self.panel_created {
            if host.create_panel().is_err() {
                return;
            }
            self.panel_created = true;
        }
        host.set_panel_body(&content::render_body(
            &self.config.content,
            self.config.allow_html,
        ));
        self.reposition(host);
        self.present_queued = true;
        host.request_frame();
        if let Some(delay) = self.config.auto_hide {
            self.timers.schedule(TimerKind::AutoHide, now + delay);
        }
    }

    /// Recompute placement from fresh measurements and write it through.
    fn reposition<H: HostPage>(&mut self, host: &mut H) {
        let Some(handle) = &self.anchor else {
            return;
        };
        let resolution = placement::resolve(&PlacementInput {
            anchor: host.icon_rect(handle.icon),
            panel: host.panel_rect(),
            viewport: host.viewport(),
            preference: self.config.placement,
            offset: self.config.offset,
            margin: self.config.margin,
        });
        host.place_panel(resolution.top, resolution.left, resolution.side);
    }

    fn conceal<H: HostPage>(&mut self, host: &mut H) {
        host.conceal_panel();
        self.timers.cancel(TimerKind::AutoHide);
        self.present_queued = false;
    }

    /// One resolution attempt, driven by the retry or mutation timer.
    fn attempt_attach<H: HostPage>(&mut self, host: &mut H, now: Instant) {
        if self.config.hidden || self.retry.resolved() {
            return;
        }
        if !self.retry.begin_attempt() {
            if self.retry.exhausted() {
                self.synthesize_fallback(host);
            }
            return;
        }
        let attempt = self.retry.state().attempts;

        let found = {
            let page: &H = &*host;
            anchor::resolve(page, self.config.target.as_deref(), &self.plan, |node| {
                page.hosts_icon(node)
            })
        };

        match found {
            Some(found) => {
                let near = found.label.unwrap_or(found.field);
                match host.attach_icon(near, found.slot, &style::icon_spec(&self.config)) {
                    Ok(icon) => {
                        self.anchor = Some(AnchorHandle {
                            field: Some(found.field),
                            label: found.label,
                            icon,
                            slot: found.slot,
                        });
                        self.retry.mark_resolved();
                        self.timers.cancel(TimerKind::Retry);
                        self.timers.cancel(TimerKind::MutationDebounce);
                        tracing::debug!(attempt, slot = ?found.slot, "icon attached");
                    }
                    Err(err) => {
                        tracing::debug!(attempt, %err, "attachment failed, retrying");
                        self.after_failed_attempt(host, now);
                    }
                }
            }
            None => {
                tracing::debug!(attempt, "no anchor candidate yet");
                self.after_failed_attempt(host, now);
            }
        }
    }

    fn after_failed_attempt<H: HostPage>(&mut self, host: &mut H, now: Instant) {
        if self.retry.exhausted() {
            self.synthesize_fallback(host);
        } else {
            self.schedule_next_retry(now);
        }
    }

    fn schedule_next_retry(&mut self, now: Instant) {
        if let Some(delay) = self.retry.next_delay() {
            self.timers.schedule(TimerKind::Retry, now + delay);
        }
    }

    /// Attach the fixed-position fallback icon and resolve the session in
    /// degraded mode, keeping the affordance reachable.
    fn synthesize_fallback<H: HostPage>(&mut self, host: &mut H) {
        if self.retry.resolved() || self.anchor.is_some() {
            return;
        }
        match host.attach_fallback_icon(&style::icon_spec(&self.config)) {
            Ok(icon) => {
                self.anchor = Some(AnchorHandle {
                    field: None,
                    label: None,
                    icon,
                    slot: IconSlot::Fallback,
                });
                self.retry.mark_resolved();
                self.timers.cancel(TimerKind::Retry);
                self.timers.cancel(TimerKind::MutationDebounce);
                tracing::warn!("anchor resolution exhausted, using fallback icon");
            }
            Err(err) => {
                tracing::warn!(%err, "fallback icon attachment failed");
            }
        }
    }

    /// Suppression-flag teardown: keep the panel element, drop the icon,
    /// stop all activity.
    fn suppress<H: HostPage>(&mut self, host: &mut H) {
        self.timers.clear();
        if let Some(handle) = self.anchor.take() {
            host.remove_icon(handle.icon);
        }
        if self.panel_created {
            host.conceal_panel();
        }
        self.machine.reset();
        self.present_queued = false;
        tracing::debug!("rendering suppressed, icon detached");
    }
}
