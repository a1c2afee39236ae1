//! Theme configuration and colors.
//!
//! Palettes come from the `ratatui-themes` crate; this module maps them onto
//! the handful of roles the card UI needs.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

use crate::models::SwipeAction;

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// All available theme names, in picker order.
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Kebab-case slug, as stored in config and analytics
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        self.0.slug()
    }

    /// Position in [`Theme::all`]
    #[must_use]
    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| *t == self.0).unwrap_or(0)
    }

    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Color roles used by the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Primary background
    pub bg: Color,
    /// Card background
    pub card: Color,
    /// Stacked card edges behind the top card
    pub card_edge: Color,
    /// Primary text
    pub fg: Color,
    /// Secondary text
    pub fg_muted: Color,

    pub primary: Color,
    pub accent: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub border: Color,
    pub border_focus: Color,
    pub selection: Color,

    /// Swipe right
    pub like: Color,
    /// Swipe left
    pub dislike: Color,
    pub bookmark: Color,
}

impl ThemeColors {
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            card: lighten(p.bg, 12),
            card_edge: lighten(p.bg, 28),
            fg: p.fg,
            fg_muted: p.muted,

            primary: p.accent,
            accent: p.secondary,

            success: p.success,
            warning: p.warning,
            error: p.error,

            border: p.muted,
            border_focus: p.accent,
            selection: p.selection,

            like: p.success,
            dislike: p.error,
            bookmark: p.info,
        }
    }

    // Style helpers

    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Card title
    #[must_use]
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Card body
    #[must_use]
    pub fn card(&self) -> Style {
        Style::default().fg(self.fg).bg(self.card)
    }

    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.border_focus)
    }

    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    #[must_use]
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Color for a swipe decision
    #[must_use]
    pub const fn action(&self, action: SwipeAction) -> Color {
        match action {
            SwipeAction::Like => self.like,
            SwipeAction::Dislike => self.dislike,
            SwipeAction::Bookmark => self.bookmark,
        }
    }

    #[must_use]
    pub fn action_style(&self, action: SwipeAction) -> Style {
        Style::new().fg(self.action(action)).add_modifier(Modifier::BOLD)
    }
}

fn lighten(color: Color, amount: u8) -> Color {
    if let Color::Rgb(r, g, b) = color {
        Color::Rgb(
            r.saturating_add(amount),
            g.saturating_add(amount),
            b.saturating_add(amount),
        )
    } else {
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, name) in Theme::all().iter().enumerate() {
            assert_eq!(Theme(*name).index(), i);
        }
    }

    #[test]
    fn test_lighten_saturates() {
        assert_eq!(lighten(Color::Rgb(250, 0, 10), 10), Color::Rgb(255, 10, 20));
        assert_eq!(lighten(Color::Red, 10), Color::Red);
    }

    #[test]
    fn test_action_colors_distinct() {
        let colors = Theme::default().colors();
        assert_eq!(colors.action(SwipeAction::Like), colors.like);
        assert_eq!(colors.action(SwipeAction::Dislike), colors.dislike);
    }
}
