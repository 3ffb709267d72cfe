//! Stylesheet consuming the projection hooks.
//!
//! All rules are scoped under `html.a11y-base` or the theme attribute, so the
//! host page is untouched until the overlay mounts and after it tears down.

use crate::projector::hooks;
use a11y_overlay_domain::{FeatureSet, OverlayConfig, Theme};
use std::fmt::Write;

/// Element id of the injected `<style>`.
pub const STYLESHEET_ID: &str = "a11y-style";

/// Rendered stylesheet text plus its optional CSP nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub css: String,
    pub nonce: Option<String>,
}

const fn palette(theme: Theme) -> (&'static str, &'static str) {
    match theme {
        Theme::Default => ("#111", "#fff"),
        Theme::Contrast => ("#000", "#fff"),
        Theme::Dark => ("#f5f5f5", "#121212"),
        Theme::Sepia => ("#3b2f2f", "#f4ecd8"),
    }
}

impl StyleSheet {
    pub fn render(config: &OverlayConfig, features: &FeatureSet) -> Self {
        let base = hooks::BASE_CLASS;
        let theme_attr = hooks::THEME_ATTRIBUTE;
        let z = config.z_index;
        let mut css = String::with_capacity(4096);

        // `write!` into a String cannot fail.
        let _ = writeln!(
            css,
            ":root{{ {}:{}; {}:{}; {}:{}; }}",
            hooks::ACCENT_PROPERTY,
            config.accent,
            hooks::BOTTOM_PROPERTY,
            config.bottom_offset,
            hooks::SIDE_PROPERTY,
            config.side_offset,
        );
        let _ = writeln!(
            css,
            "@font-face{{ font-family:'OpenDyslexic'; font-style:normal; font-weight:400; src: local('OpenDyslexic'), local('OpenDyslexic Regular'); }}"
        );
        let _ = writeln!(
            css,
            "html.{base}{{ font-size: calc(16px * var({},1)); }}",
            hooks::FONT_SCALE_PROPERTY
        );
        for theme in [Theme::Default, Theme::Contrast, Theme::Dark, Theme::Sepia] {
            let (fg, bg) = palette(theme);
            let _ = writeln!(
                css,
                "html[{theme_attr}=\"{theme}\"]{{ --a11y-fg:{fg}; --a11y-bg:{bg}; }}"
            );
        }
        let _ = writeln!(
            css,
            "html.{base} body{{ color: var(--a11y-fg); background: var(--a11y-bg); }}"
        );
        let _ = writeln!(
            css,
            "html.{} *{{ font-family:\"OpenDyslexic\", system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif !important; }}",
            hooks::DYSLEXIA_CLASS
        );
        let _ = writeln!(
            css,
            ":where(button,[href],input,select,textarea,[tabindex]):focus-visible{{ outline:3px solid var({}); outline-offset:2px; }}",
            hooks::ACCENT_PROPERTY
        );
        let _ = writeln!(
            css,
            ".sr-only{{ position:absolute!important; width:1px; height:1px; padding:0; margin:-1px; overflow:hidden; clip:rect(0,0,1px,1px); white-space:nowrap; border:0; }}"
        );
        let _ = writeln!(
            css,
            ".a11y-btn{{ position:fixed; bottom:var(--a11y-bottom); inset-inline-end:var(--a11y-side); z-index:{z}; width:56px; height:56px; border-radius:50%; background:var(--a11y-accent); color:#fff; border:none; cursor:pointer; }}"
        );
        let _ = writeln!(
            css,
            ".a11y-panel{{ position:fixed; bottom:calc(var(--a11y-bottom) + 64px); inset-inline-end:var(--a11y-side); z-index:{z}; width:min(92vw,360px); display:none; }}"
        );
        let _ = writeln!(css, ".a11y-panel[data-a11y-active=\"true\"]{{ display:block; }}");
        let _ = writeln!(
            css,
            ".a11y-panel{{ background:#fff; color:#111; border:1px solid #ddd; border-radius:12px; padding:12px; box-shadow:0 8px 24px rgba(0,0,0,.2); font:14px/1.4 system-ui, sans-serif; }}"
        );
        let _ = writeln!(
            css,
            ".a11y-hdr{{ font-weight:600; margin-bottom:8px; }} .a11y-row{{ display:grid; grid-template-columns:1fr auto; gap:8px; align-items:center; padding:6px 0; }} .a11y-actions{{ display:flex; flex-wrap:wrap; gap:6px; }}"
        );
        let _ = writeln!(
            css,
            ".a11y-ctrl,.a11y-chip,.a11y-select{{ min-height:32px; padding:4px 10px; border:1px solid #ccc; border-radius:8px; background:transparent; color:inherit; cursor:pointer; }}"
        );
        let _ = writeln!(
            css,
            ".a11y-chip[aria-pressed=\"true\"]{{ background:var({}); color:#fff; }} .a11y-pill{{ padding:2px 8px; border-radius:999px; background:#eee; color:#111; font-size:12px; }} .a11y-note{{ font-size:12px; opacity:.8; margin-top:8px; }}",
            hooks::ACCENT_PROPERTY
        );
        let _ = writeln!(
            css,
            "html[{}=\"true\"] .a11y-row{{ grid-template-columns: 1fr; }}",
            hooks::COMPACT_ATTRIBUTE
        );
        let _ = writeln!(
            css,
            "html[{theme_attr}=\"dark\"] .a11y-panel{{ background:#1b1b1b; color:#f5f5f5; border-color:#2a2a2a; }}"
        );
        if features.focus_highlight {
            let _ = writeln!(
                css,
                "html.{} *:focus{{ outline:3px solid #e63946 !important; outline-offset:3px; }}",
                hooks::FOCUS_HIGHLIGHT_CLASS
            );
        }
        if features.big_cursor {
            let _ = writeln!(
                css,
                "html.{} body{{ cursor: url('data:image/svg+xml;utf8,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"32\" height=\"32\"><circle cx=\"16\" cy=\"16\" r=\"10\" fill=\"black\"/></svg>'), auto; }}",
                hooks::BIG_CURSOR_CLASS
            );
        }

        Self {
            css,
            nonce: config.style_nonce.clone(),
        }
    }
}
