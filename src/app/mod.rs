//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::{AppState, Mode, View};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::analytics::Analytics;
use crate::api;
use crate::bookmarks::Bookmarks;
use crate::config::Config;
use crate::db::Database;
use crate::images::{self, ImageChain};

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};

/// Run the TUI application
pub fn run() -> Result<()> {
    let rt = Runtime::new()?;

    let config = Config::load()?;
    // Opening the database creates the data directory the event log lives in
    let db = Database::open()?;
    let analytics = Analytics::open(config.analytics);
    analytics.log(&crate::analytics::Event::AppOpen);
    let bookmarks = Bookmarks::load(db, analytics.clone()).context("Failed to load bookmarks")?;

    let chain = ImageChain::new(api::providers_from_config(&config));
    let async_handle = rt.block_on(async { spawn_worker(chain) });

    // Terminal graphics detection has to happen before the alternate screen
    if config.show_images {
        images::init_picker();
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config, bookmarks, analytics);

    if let Some(cmd) = state.request_refill() {
        let _ = async_handle.cmd_tx.blocking_send(cmd);
    }

    let result = run_app(&mut terminal, &mut state, async_handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
) -> Result<()> {
    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            handle_async_result(state, result);
        }

        state.note_view();

        terminal.draw(|frame| ui::render(frame, state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Some(cmd) = events::handle_key(state, key)
        {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        // Queue image work for whatever card is in focus
        if let Some(cmd) = state.next_image_work() {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        state.tick();

        if state.should_quit {
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Save config on exit
    state.config.save()?;

    Ok(())
}

fn handle_async_result(state: &mut AppState, result: AsyncResult) {
    match result {
        AsyncResult::ArticlesFetched { ticket, result } => {
            let appended = state.feed.finish_refill(ticket, result);
            tracing::debug!("{appended} articles added to the deck");
            // The status bar shows a fetch error only while no other message is up
            if state.feed.last_error().is_some() || state.status.starts_with("Loading") {
                state.clear_status();
            }
        }
        AsyncResult::ImageResolved {
            generation,
            article_id,
            url,
        } => {
            state.image_resolved(generation, &article_id, url);
        }
        AsyncResult::ImageLoaded { url, image } => {
            state.image_loaded(&url, image);
        }
        AsyncResult::ImageFailed { url, error } => {
            // Images fail quietly; the card just shows text
            tracing::warn!("Failed to load image {url}: {error}");
            state.image_failed(&url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::Article;

    fn state() -> AppState {
        let bookmarks =
            Bookmarks::load(Database::open_in_memory().unwrap(), Analytics::disabled()).unwrap();
        AppState::new(Config::default(), bookmarks, Analytics::disabled())
    }

    fn batch(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| Article::new(i.to_string(), format!("Article {i}"), "", None))
            .collect()
    }

    #[test]
    fn test_fetched_articles_fill_deck() {
        let mut state = state();
        let Some(AsyncCommand::Prefetch { ticket, .. }) = state.request_refill() else {
            panic!("expected a prefetch");
        };
        assert!(state.loading());

        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket,
                result: Ok(batch(10)),
            },
        );
        assert_eq!(state.feed.len(), 5);
        assert!(!state.loading());
        assert!(state.status.is_empty());
    }

    #[test]
    fn test_failed_fetch_surfaces_error() {
        let mut state = state();
        let Some(AsyncCommand::Prefetch { ticket, .. }) = state.request_refill() else {
            panic!("expected a prefetch");
        };

        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket,
                result: Err(ApiError::NoResult),
            },
        );
        assert!(state.feed.is_empty());
        assert!(state.feed.last_error().is_some());
    }

    #[test]
    fn test_stale_fetch_after_language_change_is_dropped() {
        let mut state = state();
        let Some(AsyncCommand::Prefetch { ticket: old, .. }) = state.request_refill() else {
            panic!("expected a prefetch");
        };
        let Some(AsyncCommand::Prefetch { ticket: new, .. }) =
            state.set_language(crate::models::Language::French)
        else {
            panic!("expected a prefetch");
        };

        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket: old,
                result: Ok(batch(3)),
            },
        );
        assert!(state.feed.is_empty());

        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket: new,
                result: Ok(batch(3)),
            },
        );
        assert_eq!(state.feed.len(), 3);
    }

    #[test]
    fn test_refill_error_after_swipe_is_shown() {
        use ratatui::backend::TestBackend;

        let mut state = state();
        let Some(AsyncCommand::Prefetch { ticket, .. }) = state.request_refill() else {
            panic!("expected a prefetch");
        };
        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket,
                result: Ok(batch(5)),
            },
        );

        assert!(state.swipe(crate::models::SwipeAction::Like).is_none());
        let Some(AsyncCommand::Prefetch { ticket, .. }) =
            state.swipe(crate::models::SwipeAction::Dislike)
        else {
            panic!("expected a prefetch");
        };
        assert!(!state.status.is_empty());

        handle_async_result(
            &mut state,
            AsyncResult::ArticlesFetched {
                ticket,
                result: Err(ApiError::NoResult),
            },
        );
        assert_eq!(state.feed.len(), 3);
        assert!(state.status.is_empty());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| ui::render(frame, &mut state)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(screen.contains("no usable result"));
    }

    #[test]
    fn test_image_failure_is_quiet() {
        let mut state = state();
        handle_async_result(
            &mut state,
            AsyncResult::ImageFailed {
                url: "https://img.example/a.png".to_string(),
                error: "boom".to_string(),
            },
        );
        assert!(state.status.is_empty());
    }
}
