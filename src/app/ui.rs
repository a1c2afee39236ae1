//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap,
    },
};
use ratatui_image::StatefulImage;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::{AppState, Mode, SettingsItem, View};
use crate::bookmarks::MAX_BOOKMARKS;
use crate::models::{Article, Language, SwipeAction};
use crate::theme::{Theme, ThemeColors};

const ICON: &str = "📚";

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Widest a card gets, in columns
const CARD_MAX_WIDTH: u16 = 84;

/// Main render function
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let colors = state.theme.colors();

    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, state, chunks[0]);
    match state.view {
        View::Swipe => render_swipe_view(frame, state, chunks[1]),
        View::Bookmarks => render_bookmarks_view(frame, state, chunks[1]),
        View::Settings => render_settings_view(frame, state, chunks[1]),
    }
    render_status_bar(frame, state, chunks[2]);

    match state.mode {
        Mode::Help => render_help_popup(frame, state),
        Mode::ThemePicker => render_theme_picker(frame, state),
        Mode::LanguagePicker => render_language_picker(frame, state),
        Mode::ConfirmClear => render_confirm_clear(frame, state),
        Mode::Normal => {}
    }
}

fn render_tabs(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let tab = |view: View, label: &str| {
        let dot = if state.view == view { "●" } else { "○" };
        Line::from(format!("{dot}  {label}"))
    };
    let titles = vec![
        tab(View::Swipe, "Discover"),
        tab(View::Bookmarks, &format!("Bookmarks ({})", state.bookmarks.len())),
        tab(View::Settings, "Settings"),
    ];

    let selected = match state.view {
        View::Swipe => 0,
        View::Bookmarks => 1,
        View::Settings => 2,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(format!(" {ICON} SwipePedia "))
                .title_style(colors.title())
                .title(Line::from(format!(" {} ", state.language())).right_aligned()),
        )
        .select(selected)
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.text_muted()));

    frame.render_widget(tabs, area);
}

// ==================== Discover ====================

fn render_swipe_view(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();

    let Some(article) = state.current_article().cloned() else {
        render_empty_deck(frame, state, area);
        return;
    };

    let width = area.width.min(CARD_MAX_WIDTH);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    // Cards waiting underneath show as edges below the top one
    let behind = u16::try_from(state.feed.len().saturating_sub(1)).unwrap_or(0).min(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(behind)])
        .split(column);

    let border_color = state
        .flash()
        .map_or(colors.border_focus, |a| colors.action(a));

    let card = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(colors.card())
        .title(Line::from(format!(" {} more in deck ", state.feed.len() - 1)).right_aligned())
        .title_bottom(swipe_hints(&colors).centered());
    let inner = card.inner(chunks[0]);
    frame.render_widget(card, chunks[0]);

    let text_area = if state.has_focused_image() {
        let image_height = (inner.height / 2).min(16);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(image_height), Constraint::Min(0)])
            .split(inner);
        if let Some(protocol) = state.focused_image_protocol() {
            let padded = Rect {
                x: parts[0].x + 2,
                width: parts[0].width.saturating_sub(4),
                ..parts[0]
            };
            frame.render_stateful_widget(StatefulImage::new(), padded, protocol);
        }
        parts[1]
    } else {
        inner
    };

    let bookmarked = state.bookmarks.contains(&article.id);
    frame.render_widget(article_text(&article, bookmarked, &colors), text_area);

    for i in 0..behind {
        let inset = 2 * (i + 1);
        let edge = Rect {
            x: chunks[1].x + inset,
            y: chunks[1].y + i,
            width: chunks[1].width.saturating_sub(inset * 2),
            height: 1,
        };
        let line = "▔".repeat(usize::from(edge.width));
        frame.render_widget(
            Paragraph::new(line).style(Style::default().fg(colors.card_edge)),
            edge,
        );
    }
}

fn article_text<'a>(article: &'a Article, bookmarked: bool, colors: &ThemeColors) -> Paragraph<'a> {
    let mut title = vec![Span::styled(article.title.as_str(), colors.title())];
    if bookmarked {
        title.push(Span::styled("  🔖", colors.text_muted()));
    }

    let summary = if article.summary.is_empty() {
        Line::styled("No summary available.", colors.text_muted())
    } else {
        Line::styled(article.summary.as_str(), colors.text())
    };

    Paragraph::new(vec![Line::from(""), Line::from(title), Line::from(""), summary])
        .style(colors.card())
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(2)))
}

fn swipe_hints(colors: &ThemeColors) -> Line<'static> {
    let hint = |action: SwipeAction, key: &'static str, label: &'static str| {
        vec![
            Span::styled(key, colors.action_style(action)),
            Span::styled(label, colors.text_muted()),
        ]
    };
    let mut spans = vec![Span::raw(" ")];
    spans.extend(hint(SwipeAction::Dislike, "← h", " nope   "));
    spans.extend(hint(SwipeAction::Bookmark, "b", " save   "));
    spans.extend(hint(SwipeAction::Like, "l →", " like "));
    Line::from(spans)
}

fn render_empty_deck(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let lines = if state.loading() {
        let spinner = SPINNER[spinner_frame(state)];
        vec![Line::styled(
            format!("{spinner} Loading articles..."),
            colors.text_primary(),
        )]
    } else if let Some(error) = state.feed.last_error() {
        vec![
            Line::styled(error.to_string(), colors.text_error()),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", colors.text_muted()),
                Span::styled("r", colors.key_hint()),
                Span::styled(" to try again", colors.text_muted()),
            ]),
        ]
    } else {
        vec![
            Line::styled("The deck is empty.", colors.text_muted()),
            Line::from(vec![
                Span::styled("Press ", colors.text_muted()),
                Span::styled("r", colors.key_hint()),
                Span::styled(" to deal more cards", colors.text_muted()),
            ]),
        ]
    };

    let height = u16::try_from(lines.len()).unwrap_or(1);
    let y = area.y + area.height.saturating_sub(height) / 2;
    let message = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(message, Rect { y, height, ..area });
}

fn spinner_frame(state: &AppState) -> usize {
    usize::try_from(state.current_tick() / 2).unwrap_or(0) % SPINNER.len()
}

// ==================== Bookmarks ====================

fn render_bookmarks_view(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let colors = state.theme.colors();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.block_focus())
        .title(format!(
            " 🔖 Saved {}/{MAX_BOOKMARKS} · {} ",
            state.bookmarks.len(),
            state.config.bookmark_sort
        ))
        .title_bottom(Line::from(" s sort │ d delete │ D clear │ o open ").centered());

    if state.bookmarks.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::styled("  No bookmarks yet.", colors.text_muted()),
            Line::styled("  Press b on a card to save it.", colors.text_muted()),
        ])
        .block(list_block);
        frame.render_widget(empty, chunks[0]);
        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block()),
            chunks[1],
        );
        return;
    }

    let row_width = usize::from(chunks[0].width.saturating_sub(6));
    let items: Vec<ListItem> = state
        .sorted_bookmarks()
        .into_iter()
        .map(|article| {
            ListItem::new(vec![
                Line::styled(truncate(&article.title, row_width), colors.text()),
                Line::styled(truncate(&article.preview(200), row_width), colors.text_muted()),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(list_block)
        .highlight_style(colors.selected())
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(Some(state.selected_bookmark));
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let detail_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.block());
    let inner = detail_block.inner(chunks[1]);
    frame.render_widget(detail_block, chunks[1]);

    let Some(article) = state.selected_bookmark_article().cloned() else {
        return;
    };

    let text_area = if state.has_focused_image() {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length((inner.height / 2).min(14)), Constraint::Min(0)])
            .split(inner);
        if let Some(protocol) = state.focused_image_protocol() {
            frame.render_stateful_widget(StatefulImage::new(), parts[0], protocol);
        }
        parts[1]
    } else {
        inner
    };

    let text = article_text(&article, false, &colors).style(colors.text());
    frame.render_widget(text, text_area);
}

/// Cut `s` to at most `width` display columns, adding an ellipsis if needed
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ==================== Settings ====================

fn render_settings_view(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let value = |item: SettingsItem| -> String {
        match item {
            SettingsItem::Language => state.language().to_string(),
            SettingsItem::Theme => state.theme.name().to_string(),
            SettingsItem::BookmarkSort => state.config.bookmark_sort.to_string(),
            SettingsItem::ShowImages => {
                (if state.config.show_images { "on" } else { "off" }).to_string()
            }
            SettingsItem::ClearBookmarks => format!("{} saved", state.bookmarks.len()),
        }
    };
    let label = |item: SettingsItem| match item {
        SettingsItem::Language => "🌐 Language",
        SettingsItem::Theme => "🎨 Theme",
        SettingsItem::BookmarkSort => "↕  Bookmark order",
        SettingsItem::ShowImages => "🖼  Card images",
        SettingsItem::ClearBookmarks => "🗑  Clear bookmarks",
    };

    let items: Vec<ListItem> = SettingsItem::ALL
        .iter()
        .map(|item| {
            let style = if *item == SettingsItem::ClearBookmarks {
                colors.text_error()
            } else {
                colors.text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", label(*item)), style),
                Span::styled(value(*item), colors.text_primary()),
            ]))
        })
        .collect();

    let width = area.width.min(64);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        height: area.height.min(9),
        ..area
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block_focus())
                .title(" ⚙ Settings ")
                .title_bottom(Line::from(" ↑↓ select │ ↵ change ").centered()),
        )
        .highlight_style(colors.selected())
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(Some(state.settings_index));
    frame.render_stateful_widget(list, column, &mut list_state);
}

// ==================== Status bar ====================

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let loading_indicator = if state.loading() {
        format!("{} ", SPINNER[spinner_frame(state)])
    } else {
        String::new()
    };

    let content = if !state.status.is_empty() {
        vec![
            Span::raw(" "),
            Span::styled(&loading_indicator, colors.text_primary()),
            Span::styled(&state.status, colors.text_primary()),
        ]
    } else if let Some(error) = state.feed.last_error() {
        vec![
            Span::raw(" "),
            Span::styled(error, colors.text_error()),
            Span::styled("  r", colors.key_hint()),
            Span::styled(": retry", colors.text_muted()),
        ]
    } else {
        vec![
            Span::raw(" "),
            Span::styled(&loading_indicator, colors.text_primary()),
            Span::styled("Tab", colors.key_hint()),
            Span::styled(": views  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("t", colors.key_hint()),
            Span::styled(": theme  ", colors.text_muted()),
            Span::styled("L", colors.key_hint()),
            Span::styled(": language  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    };

    let status = Paragraph::new(Line::from(content)).style(Style::default().bg(colors.card));
    frame.render_widget(status, area);
}

// ==================== Popups ====================

fn popup_block(title: String, colors: &ThemeColors) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.primary))
        .style(Style::default().bg(colors.bg))
        .title(title)
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let section = |name: &'static str| {
        Line::styled(
            format!("  {name}"),
            colors.text_primary().add_modifier(Modifier::BOLD),
        )
    };
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("    {k:<12}"), colors.key_hint()),
            Span::styled(desc, colors.text()),
        ])
    };

    let help = vec![
        Line::from(""),
        section("Cards"),
        key("l / →", "Like"),
        key("h / ←", "Dislike"),
        key("b", "Bookmark (card stays)"),
        key("o / Enter", "Open in browser"),
        key("r", "Load more cards"),
        Line::from(""),
        section("Bookmarks"),
        key("j / k", "Move selection"),
        key("s", "Toggle sort order"),
        key("d", "Delete bookmark"),
        key("D", "Clear all bookmarks"),
        Line::from(""),
        section("General"),
        key("Tab / 1-3", "Switch view"),
        key("t", "Theme picker"),
        key("L", "Language picker"),
        key("?", "This help"),
        key("q", "Quit"),
    ];

    let paragraph = Paragraph::new(help).block(
        popup_block(" ❓ Help ".to_string(), &colors)
            .title_bottom(Line::from(" Esc close ").centered()),
    );
    frame.render_widget(paragraph, popup_area);
}

fn render_theme_picker(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let themes = Theme::all();
    let items: Vec<ListItem> = themes
        .iter()
        .map(|theme_name| {
            let palette = theme_name.palette();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<24}", theme_name.display_name()),
                    Style::default().fg(palette.fg),
                ),
                Span::styled("█", Style::default().fg(palette.accent)),
                Span::styled("█", Style::default().fg(palette.secondary)),
                Span::styled("█", Style::default().fg(palette.success)),
                Span::styled("█", Style::default().fg(palette.error)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            popup_block(
                format!(
                    " 🎨 Select Theme ({}/{}) ",
                    state.theme_picker_index + 1,
                    themes.len()
                ),
                &colors,
            )
            .title_bottom(Line::from(" ↑↓ navigate │ ↵ apply │ Esc cancel ").centered()),
        )
        .highlight_style(colors.selected())
        .highlight_symbol("▸");
    let mut list_state = ListState::default().with_selected(Some(state.theme_picker_index));
    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

fn render_language_picker(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(40, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = Language::all()
        .iter()
        .map(|lang| {
            let current = if *lang == state.language() { " ✓" } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} {:<14}", lang.flag(), lang.native_name()), colors.text()),
                Span::styled(lang.name(), colors.text_muted()),
                Span::styled(current, colors.text_success()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            popup_block(" 🌐 Article Language ".to_string(), &colors)
                .title_bottom(Line::from(" ↑↓ navigate │ ↵ apply │ Esc cancel ").centered()),
        )
        .highlight_style(colors.selected())
        .highlight_symbol("▸");
    let mut list_state = ListState::default().with_selected(Some(state.language_picker_index));
    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

fn render_confirm_clear(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let area = frame.area();
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(48) / 2,
        y: area.y + area.height.saturating_sub(7) / 2,
        width: area.width.min(48),
        height: area.height.min(7),
    };
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::styled(
            format!("Delete all {} bookmarks?", state.bookmarks.len()),
            colors.text(),
        ),
        Line::styled("This cannot be undone.", colors.text_warning()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", colors.key_hint()),
            Span::styled(" delete   ", colors.text_muted()),
            Span::styled("n", colors.key_hint()),
            Span::styled(" keep", colors.text_muted()),
        ]),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(popup_block(" 🗑 Clear Bookmarks ".to_string(), &colors));
    frame.render_widget(dialog, popup_area);
}

/// Helper function to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_width() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("Photosynthesis", 6), "Photo…");
        // Wide characters count double
        assert_eq!(truncate("東京都庁舎", 5), "東京…");
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}
