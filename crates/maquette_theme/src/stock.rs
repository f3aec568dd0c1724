//! Stock themes
//!
//! Two built-in themes ship with the editor: `paper` (light) and `ink`
//! (dark). Both define the same token-key vocabulary, so swapping a board
//! or node between stock themes never drops a reference. The custom theme
//! on a document starts as a copy of `paper`.

use std::sync::OnceLock;

use maquette_core::{Color, Dim};

use crate::theme::{FontSpec, ScaleBase, SectionName, Theme, ThemeId, TokenPayload};
use crate::token::TokenRef;

/// Theme id every fallback bottoms out at
pub fn default_theme_id() -> ThemeId {
    ThemeId::new("paper")
}

/// All stock themes, listing order
pub fn stock_themes() -> &'static [Theme] {
    static THEMES: OnceLock<Vec<Theme>> = OnceLock::new();
    THEMES.get_or_init(|| vec![paper(), ink()])
}

/// Look a stock theme up by id
pub fn stock_theme(id: &ThemeId) -> Option<&'static Theme> {
    stock_themes().iter().find(|theme| &theme.id == id)
}

struct Palette {
    primary: Color,
    on_primary: Color,
    surface: Color,
    on_surface: Color,
    muted: Color,
    outline: Color,
    accent: Color,
    danger: Color,
}

fn paper() -> Theme {
    build(
        "paper",
        "Paper",
        Palette {
            primary: Color::from_hex(0x1e66f5),
            on_primary: Color::from_hex(0xffffff),
            surface: Color::from_hex(0xeff1f5),
            on_surface: Color::from_hex(0x4c4f69),
            muted: Color::from_hex(0x6c6f85),
            outline: Color::from_hex(0xccd0da),
            accent: Color::from_hex(0x8839ef),
            danger: Color::from_hex(0xd20f39),
        },
    )
}

fn ink() -> Theme {
    build(
        "ink",
        "Ink",
        Palette {
            primary: Color::from_hex(0x89b4fa),
            on_primary: Color::from_hex(0x1e1e2e),
            surface: Color::from_hex(0x1e1e2e),
            on_surface: Color::from_hex(0xcdd6f4),
            muted: Color::from_hex(0xa6adc8),
            outline: Color::from_hex(0x313244),
            accent: Color::from_hex(0xcba6f7),
            danger: Color::from_hex(0xf38ba8),
        },
    )
}

fn build(id: &str, name: &str, palette: Palette) -> Theme {
    let mut theme = Theme::new(id, name);
    theme.base = ScaleBase::default();

    let swatch = |theme: &mut Theme, key: &str, color: Color| {
        theme.set_token(
            TokenRef::new(SectionName::Swatches, key),
            TokenPayload::Color(color),
        );
    };
    swatch(&mut theme, "primary", palette.primary);
    swatch(&mut theme, "on-primary", palette.on_primary);
    swatch(&mut theme, "surface", palette.surface);
    swatch(&mut theme, "on-surface", palette.on_surface);
    swatch(&mut theme, "muted", palette.muted);
    swatch(&mut theme, "outline", palette.outline);
    swatch(&mut theme, "accent", palette.accent);
    swatch(&mut theme, "danger", palette.danger);

    let font = |theme: &mut Theme, key: &str, spec: FontSpec| {
        theme.set_token(
            TokenRef::new(SectionName::Fonts, key),
            TokenPayload::Font(spec),
        );
    };
    font(&mut theme, "body", FontSpec::new("Inter", 400, Dim::px(16.0)));
    font(&mut theme, "heading", FontSpec::new("Inter", 600, Dim::px(24.0)));
    font(
        &mut theme,
        "mono",
        FontSpec::new("JetBrains Mono", 400, Dim::px(14.0)),
    );

    // Sizes and gaps are steps on the ordinal scale; corners are fixed
    let steps = [("xs", -2), ("sm", -1), ("md", 0), ("lg", 1), ("xl", 2)];
    for (key, step) in steps {
        theme.set_token(
            TokenRef::new(SectionName::Sizes, key),
            TokenPayload::Step(step),
        );
        theme.set_token(
            TokenRef::new(SectionName::Gaps, key),
            TokenPayload::Step(step),
        );
    }

    let corners = [
        ("none", 0.0),
        ("sm", 2.0),
        ("md", 6.0),
        ("lg", 12.0),
        ("pill", 999.0),
    ];
    for (key, radius) in corners {
        theme.set_token(
            TokenRef::new(SectionName::Corners, key),
            TokenPayload::Dim(Dim::px(radius)),
        );
    }

    theme
}
