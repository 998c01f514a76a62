#![forbid(unsafe_code)]

//! Configuration snapshots.
//!
//! The host hands the component a read-only key/value parameter bag on
//! every re-render. [`Config::from_params`] turns one bag into an immutable
//! [`Config`] snapshot; the component swaps whole snapshots and never
//! mutates one in place, so there is no hidden state drift across host
//! re-renders.
//!
//! Unknown keys are ignored and malformed values fall back to defaults;
//! a misconfigured widget must degrade, not break the host page.

use serde_json::Value;
use web_time::Duration;

use crate::geometry::Side;

/// How show/hide is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerMode {
    #[default]
    Hover,
    Click,
    /// Hover scheduling and click toggling coexist.
    Both,
}

impl TriggerMode {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "click" => Self::Click,
            "both" => Self::Both,
            _ => Self::Hover,
        }
    }

    /// Whether pointer enter/leave participates in visibility.
    #[must_use]
    pub const fn hover_enabled(self) -> bool {
        matches!(self, Self::Hover | Self::Both)
    }

    /// Whether a pointer click toggles visibility.
    #[must_use]
    pub const fn click_enabled(self) -> bool {
        matches!(self, Self::Click | Self::Both)
    }
}

/// Placement preference for the panel relative to the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// Pick the first fitting side in preference order.
    #[default]
    Auto,
    /// Use exactly this side, clamped into the viewport if it overflows.
    Exact(Side),
}

impl Placement {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "top" => Self::Exact(Side::Top),
            "bottom" => Self::Exact(Side::Bottom),
            "left" => Self::Exact(Side::Left),
            "right" => Self::Exact(Side::Right),
            _ => Self::Auto,
        }
    }
}

/// Glyph family for the trigger icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IconKind {
    #[default]
    Info,
    Question,
    Warning,
    Error,
    Help,
    Tip,
}

impl IconKind {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "question" => Self::Question,
            "warning" => Self::Warning,
            "error" => Self::Error,
            "help" => Self::Help,
            "tip" => Self::Tip,
            _ => Self::Info,
        }
    }

    /// The character rendered inside the icon.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Question | Self::Help => "?",
            Self::Warning => "\u{26a0}",
            Self::Error => "!",
            Self::Tip => "\u{1f4a1}",
        }
    }
}

/// A read-only view over the host-supplied parameter bag.
///
/// Values arrive as loosely typed JSON; the typed getters coerce the way
/// host parameter bags are observed to behave (booleans may be the strings
/// `"true"`/`"false"`, numbers may be strings).
#[derive(Debug, Clone, Default)]
pub struct ParamBag(serde_json::Map<String, Value>);

impl ParamBag {
    pub fn new(values: serde_json::Map<String, Value>) -> Self {
        Self(values)
    }

    /// Convenience constructor for tests and examples.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Trimmed, non-empty string value.
    pub fn str_opt(&self, key: &str) -> Option<&str> {
        let s = self.raw(key)?.as_str()?.trim();
        (!s.is_empty()).then_some(s)
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.str_opt(key).unwrap_or(default).to_string()
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        let parsed = match self.raw(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        // Non-finite values would poison the rectangle math downstream.
        parsed.filter(|v| v.is_finite()).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.raw(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Non-negative millisecond duration.
    pub fn millis_or(&self, key: &str, default_ms: u64) -> Duration {
        let ms = self.f64_or(key, default_ms as f64);
        if ms.is_finite() && ms >= 0.0 {
            Duration::from_millis(ms as u64)
        } else {
            Duration::from_millis(default_ms)
        }
    }
}

/// Immutable snapshot of every externally supplied display/behavior option.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Logical identifier of the field to anchor to, if the host knows it.
    pub target: Option<String>,
    pub trigger: TriggerMode,
    pub show_delay: Duration,
    pub hide_delay: Duration,
    /// Forced hide armed at show time; `None` disables it.
    pub auto_hide: Option<Duration>,
    pub placement: Placement,
    /// Gap between the icon edge and the panel, in pixels.
    pub offset: f64,
    /// Minimum distance kept between the panel and the viewport edge.
    pub margin: f64,
    pub content: String,
    pub allow_html: bool,
    pub redirect_url: Option<String>,
    pub open_in_new_tab: bool,
    pub icon: IconKind,
    pub icon_size: f64,
    pub background_color: String,
    pub text_color: String,
    pub max_width: f64,
    /// Suppresses all rendering and retry activity while set.
    pub hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: None,
            trigger: TriggerMode::Hover,
            show_delay: Duration::from_millis(300),
            hide_delay: Duration::from_millis(100),
            auto_hide: None,
            placement: Placement::Auto,
            offset: 12.0,
            margin: 16.0,
            content: String::new(),
            allow_html: false,
            redirect_url: None,
            open_in_new_tab: true,
            icon: IconKind::Info,
            icon_size: 10.0,
            background_color: "#2d3748".to_string(),
            text_color: "#ffffff".to_string(),
            max_width: 350.0,
            hidden: false,
        }
    }
}

impl Config {
    /// Build a snapshot from a host parameter bag, defaulting every
    /// missing or malformed value.
    pub fn from_params(params: &ParamBag) -> Self {
        let defaults = Self::default();
        let auto_hide = params.millis_or("autoHideDelay", 0);
        Self {
            target: params.str_opt("target").map(str::to_string),
            trigger: TriggerMode::parse(&params.str_or("trigger", "hover")),
            show_delay: params.millis_or("showDelay", 300),
            hide_delay: params.millis_or("hideDelay", 100),
            auto_hide: (!auto_hide.is_zero()).then_some(auto_hide),
            placement: Placement::parse(&params.str_or("placement", "auto")),
            offset: params.f64_or("offset", defaults.offset),
            margin: params.f64_or("margin", defaults.margin),
            content: params.str_or("content", ""),
            allow_html: params.bool_or("allowHtml", false),
            redirect_url: params.str_opt("redirectUrl").map(str::to_string),
            open_in_new_tab: params.bool_or("openInNewTab", true),
            icon: IconKind::parse(&params.str_or("icon", "info")),
            icon_size: params.f64_or("iconSize", defaults.icon_size),
            background_color: params.str_or("backgroundColor", &defaults.background_color),
            text_color: params.str_or("textColor", &defaults.text_color),
            max_width: params.f64_or("maxWidth", defaults.max_width),
            hidden: params.bool_or("hidden", false),
        }
    }
}
