//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::Searching => handle_search_input(app, key),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::Quitting => true,
        AppState::Normal => handle_normal_input(app, key),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('r') => app.start_load(),
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.clear_search();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::app::tests::{customers, deliver, test_app};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_search_mode_typing_filters() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);

        // 'q' is text while searching, not quit
        type_str(&mut app, "bravo");
        assert_eq!(app.search_query, "bravo");
        assert_eq!(app.view.data_row_count(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_query, "bravo");

        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
        assert_eq!(app.view.data_row_count(), 4);
    }

    #[tokio::test]
    async fn test_escape_while_searching_clears() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "qq");
        assert_eq!(app.view.data_row_count(), 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_query, "q");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.view.data_row_count(), 4);
    }

    #[tokio::test]
    async fn test_navigation_keys() {
        let (_dir, mut app) = test_app();
        deliver(&mut app, Ok(customers())).await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selection, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selection, 1);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selection, 3);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn test_quit_confirmation() {
        let (_dir, mut app) = test_app();

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_toggle() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_reload_key_starts_load() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.is_loading());
    }
}
