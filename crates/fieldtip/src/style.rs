// SPDX-License-Identifier: MIT
//! The component stylesheet.
//!
//! One declarative sheet owned by the component, built from the theme
//! values in the configuration and injected once under a stable id. The
//! component never re-applies inline styles per call site; precedence is
//! asserted here, once.

#![forbid(unsafe_code)]

use fieldtip_core::Config;

use crate::host::IconSpec;

/// Stable id the stylesheet is registered under. Re-injection under the
/// same id is a host-side no-op.
pub const STYLE_ID: &str = "fieldtip-styles";

/// Class carried by every attached icon.
pub const ICON_CLASS: &str = "fieldtip-icon";

/// Class carried by the floating panel.
pub const PANEL_CLASS: &str = "fieldtip-panel";

/// Icon visuals for the current configuration.
pub fn icon_spec(config: &Config) -> IconSpec {
    IconSpec {
        glyph: config.icon.glyph(),
        size: config.icon_size,
    }
}

/// Build the component stylesheet for the given theme values.
pub fn stylesheet(config: &Config) -> String {
    format!(
        r#".{icon} {{
    display: inline-flex;
    align-items: center;
    justify-content: center;
    width: 16px;
    height: 16px;
    margin-left: 6px;
    border-radius: 50%;
    cursor: help;
    font-size: {icon_size}px;
    font-weight: 700;
    color: #ffffff;
    background: #3182ce;
    flex-shrink: 0;
}}

.{icon}:focus-visible {{
    outline: 2px solid #3182ce;
    outline-offset: 2px;
}}

.{icon}--fallback {{
    position: fixed;
    top: 10px;
    right: 10px;
    z-index: 2147483000;
}}

.{panel} {{
    position: fixed;
    max-width: {max_width}px;
    min-width: 200px;
    padding: 12px 16px;
    border-radius: 8px;
    background: {background};
    color: {text};
    font-size: 14px;
    line-height: 1.5;
    overflow-wrap: break-word;
    box-shadow: 0 10px 20px rgba(0, 0, 0, 0.15);
    visibility: hidden;
    opacity: 0;
    pointer-events: none;
    z-index: 2147483001;
}}

.{panel}.visible {{
    visibility: visible;
    opacity: 1;
    pointer-events: auto;
}}

.{panel}.top::after,
.{panel}.bottom::after,
.{panel}.left::after,
.{panel}.right::after {{
    content: "";
    position: absolute;
    border: 6px solid transparent;
}}

.{panel}.bottom::after {{
    top: -12px;
    left: 50%;
    transform: translateX(-50%);
    border-bottom-color: {background};
}}

.{panel}.top::after {{
    bottom: -12px;
    left: 50%;
    transform: translateX(-50%);
    border-top-color: {background};
}}

.{panel}.right::after {{
    left: -12px;
    top: 50%;
    transform: translateY(-50%);
    border-right-color: {background};
}}

.{panel}.left::after {{
    right: -12px;
    top: 50%;
    transform: translateY(-50%);
    border-left-color: {background};
}}
"#,
        icon = ICON_CLASS,
        panel = PANEL_CLASS,
        icon_size = config.icon_size,
        max_width = config.max_width,
        background = config.background_color,
        text = config.text_color,
    )
}
