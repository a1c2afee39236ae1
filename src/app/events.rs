//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Mode, SettingsItem, View};
use crate::models::{Article, Language, SwipeAction};
use crate::theme::Theme;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    // Handle mode-specific input first
    match state.mode {
        Mode::ThemePicker => {
            handle_theme_picker_key(state, key);
            return None;
        }
        Mode::LanguagePicker => return handle_language_picker_key(state, key),
        Mode::ConfirmClear => {
            handle_confirm_clear_key(state, key);
            return None;
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::Normal => {}
    }

    // Global shortcuts (work in normal mode)
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            return None;
        }
        (_, KeyCode::Char('?') | KeyCode::F(1)) => {
            state.mode = Mode::Help;
            return None;
        }
        (_, KeyCode::Tab) => {
            state.view = state.view.next();
            return None;
        }
        (_, KeyCode::BackTab) => {
            state.view = state.view.prev();
            return None;
        }
        (_, KeyCode::Char('1')) => {
            state.view = View::Swipe;
            return None;
        }
        (_, KeyCode::Char('2')) => {
            state.view = View::Bookmarks;
            return None;
        }
        (_, KeyCode::Char('3')) => {
            state.view = View::Settings;
            return None;
        }
        (_, KeyCode::Char('t')) => {
            open_theme_picker(state);
            return None;
        }
        (_, KeyCode::Char('L')) => {
            open_language_picker(state);
            return None;
        }
        _ => {}
    }

    match state.view {
        View::Swipe => handle_swipe_key(state, key),
        View::Bookmarks => {
            handle_bookmarks_key(state, key);
            None
        }
        View::Settings => handle_settings_key(state, key),
    }
}

fn handle_swipe_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => state.swipe(SwipeAction::Like),
        KeyCode::Left | KeyCode::Char('h') => state.swipe(SwipeAction::Dislike),
        KeyCode::Char('b') => state.swipe(SwipeAction::Bookmark),
        KeyCode::Char('o') | KeyCode::Enter => {
            if let Some(article) = state.current_article().cloned() {
                open_article(state, &article);
            }
            None
        }
        KeyCode::Char('r') => {
            let cmd = state.request_refill();
            if cmd.is_none() && state.loading() {
                state.set_status("Already loading...");
            }
            cmd
        }
        _ => None,
    }
}

fn handle_bookmarks_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.select_next_bookmark(),
        KeyCode::Up | KeyCode::Char('k') => state.select_prev_bookmark(),
        KeyCode::Home | KeyCode::Char('g') => state.selected_bookmark = 0,
        KeyCode::End | KeyCode::Char('G') => {
            state.selected_bookmark = state.bookmarks.len().saturating_sub(1);
        }
        KeyCode::Char('s') => state.toggle_bookmark_sort(),
        KeyCode::Char('d') | KeyCode::Delete => state.remove_selected_bookmark(),
        KeyCode::Char('D') => {
            if !state.bookmarks.is_empty() {
                state.mode = Mode::ConfirmClear;
            }
        }
        KeyCode::Char('o') | KeyCode::Enter => {
            if let Some(article) = state.selected_bookmark_article().cloned() {
                open_article(state, &article);
            }
        }
        _ => {}
    }
}

fn handle_settings_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.select_next_setting(),
        KeyCode::Up | KeyCode::Char('k') => state.select_prev_setting(),
        KeyCode::Enter | KeyCode::Char(' ') => match state.selected_setting() {
            SettingsItem::Language => open_language_picker(state),
            SettingsItem::Theme => open_theme_picker(state),
            SettingsItem::BookmarkSort => state.toggle_bookmark_sort(),
            SettingsItem::ShowImages => {
                state.config.show_images = !state.config.show_images;
                let label = if state.config.show_images { "on" } else { "off" };
                state.set_status(format!("Images {label}"));
            }
            SettingsItem::ClearBookmarks => {
                if state.bookmarks.is_empty() {
                    state.set_status("No bookmarks to clear");
                } else {
                    state.mode = Mode::ConfirmClear;
                }
            }
        },
        _ => {}
    }
    None
}

fn open_theme_picker(state: &mut AppState) {
    state.theme_picker_index = state.theme.index();
    state.mode = Mode::ThemePicker;
}

fn open_language_picker(state: &mut AppState) {
    state.language_picker_index = Language::all()
        .iter()
        .position(|l| *l == state.language())
        .unwrap_or(0);
    state.mode = Mode::LanguagePicker;
}

fn open_article(state: &mut AppState, article: &Article) {
    let url = article.url(state.language());
    match open::that(&url) {
        Ok(()) => state.set_status("✓ Opened in browser"),
        Err(e) => state.set_status(format!("❌ Could not open {url}: {e}")),
    }
}

fn handle_theme_picker_key(state: &mut AppState, key: KeyEvent) {
    let themes = Theme::all();
    let len = themes.len();

    match key.code {
        KeyCode::Esc => {
            // Drop the preview
            state.theme = state.config.theme;
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            state.set_theme(Theme::from(themes[state.theme_picker_index]));
            state.mode = Mode::Normal;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.theme_picker_index = (state.theme_picker_index + 1) % len;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.theme_picker_index = state.theme_picker_index.checked_sub(1).unwrap_or(len - 1);
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        _ => {}
    }
}

fn handle_language_picker_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    let languages = Language::all();
    let len = languages.len();

    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            None
        }
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            state.set_language(languages[state.language_picker_index])
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.language_picker_index = (state.language_picker_index + 1) % len;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.language_picker_index =
                state.language_picker_index.checked_sub(1).unwrap_or(len - 1);
            None
        }
        _ => None,
    }
}

fn handle_confirm_clear_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
            state.clear_bookmarks();
            state.mode = Mode::Normal;
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => state.mode = Mode::Normal,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Analytics;
    use crate::bookmarks::Bookmarks;
    use crate::config::Config;
    use crate::db::Database;

    fn state() -> AppState {
        let bookmarks =
            Bookmarks::load(Database::open_in_memory().unwrap(), Analytics::disabled()).unwrap();
        let mut state = AppState::new(Config::default(), bookmarks, Analytics::disabled());
        let ticket = state.feed.begin_refill().unwrap();
        let batch = (0..5)
            .map(|i| Article::new(i.to_string(), format!("Article {i}"), "", None))
            .collect();
        state.feed.finish_refill(ticket, Ok(batch));
        state
    }

    fn press(state: &mut AppState, code: KeyCode) -> Option<AsyncCommand> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_swipe_keys() {
        let mut state = state();
        press(&mut state, KeyCode::Char('l'));
        press(&mut state, KeyCode::Left);
        assert_eq!(state.current_article().unwrap().id, "2");

        press(&mut state, KeyCode::Char('b'));
        assert_eq!(state.current_article().unwrap().id, "2");
        assert!(state.bookmarks.contains("2"));
    }

    #[test]
    fn test_view_cycle() {
        let mut state = state();
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.view, View::Bookmarks);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.view, View::Settings);
        press(&mut state, KeyCode::BackTab);
        assert_eq!(state.view, View::Bookmarks);
    }

    #[test]
    fn test_language_picker_resets_deck() {
        let mut state = state();
        press(&mut state, KeyCode::Char('L'));
        assert_eq!(state.mode, Mode::LanguagePicker);

        press(&mut state, KeyCode::Down);
        let cmd = press(&mut state, KeyCode::Enter);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.language(), Language::all()[1]);
        assert!(matches!(cmd, Some(AsyncCommand::Prefetch { .. })));
        assert!(state.feed.is_empty());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut state = state();
        press(&mut state, KeyCode::Char('b'));
        press(&mut state, KeyCode::Char('2'));

        press(&mut state, KeyCode::Char('D'));
        assert_eq!(state.mode, Mode::ConfirmClear);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.bookmarks.len(), 1);

        press(&mut state, KeyCode::Char('D'));
        press(&mut state, KeyCode::Char('y'));
        assert!(state.bookmarks.is_empty());
    }

    #[test]
    fn test_theme_picker_escape_restores() {
        let mut state = state();
        let original = state.theme;
        press(&mut state, KeyCode::Char('t'));
        press(&mut state, KeyCode::Down);
        assert_ne!(state.theme, original);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.theme, original);
    }
}
