//! Colours for the customer table.
//!
//! Styles are named for what they mark on screen. The status bar colour
//! tracks where the displayed data came from.

use custcache_core::{DataSource, LoadState};
use ratatui::style::{Color, Modifier, Style};

const FRAME: Color = Color::Rgb(70, 130, 180);
const ONLINE: Color = Color::Rgb(96, 170, 110);
const OFFLINE: Color = Color::Rgb(214, 160, 48);
const NO_DATA: Color = Color::Rgb(200, 72, 72);
const DIM: Color = Color::Rgb(120, 120, 130);
const TEXT: Color = Color::Rgb(220, 220, 220);
const SELECTED_BG: Color = Color::Rgb(40, 52, 72);
const BAR_BG: Color = Color::Rgb(28, 30, 38);

/// Status text colour for each load state.
pub fn status_style(state: LoadState) -> Style {
    match state {
        LoadState::Loaded(DataSource::Online) => Style::default().fg(ONLINE),
        LoadState::Loaded(DataSource::Offline) => Style::default().fg(OFFLINE),
        LoadState::Empty => Style::default().fg(NO_DATA).add_modifier(Modifier::BOLD),
        LoadState::Idle | LoadState::Fetching | LoadState::RestoringCache => hint_style(),
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(TEXT)
}

pub fn app_title_style() -> Style {
    Style::default().fg(FRAME).add_modifier(Modifier::BOLD)
}

/// The "User X1" / "All users" label next to the title.
pub fn scope_style() -> Style {
    Style::default().fg(OFFLINE)
}

pub fn hint_style() -> Style {
    Style::default().fg(DIM)
}

pub fn frame_style(focused: bool) -> Style {
    Style::default().fg(if focused { FRAME } else { DIM })
}

pub fn column_header_style() -> Style {
    Style::default()
        .fg(FRAME)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn row_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn selected_row_style() -> Style {
    Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD)
}

/// The "No customers found" row.
pub fn empty_message_style() -> Style {
    Style::default().fg(DIM).add_modifier(Modifier::ITALIC)
}

pub fn search_text_style() -> Style {
    Style::default().fg(OFFLINE)
}

pub fn overlay_heading_style() -> Style {
    Style::default().fg(OFFLINE).add_modifier(Modifier::BOLD)
}

pub fn key_style() -> Style {
    Style::default().fg(OFFLINE).add_modifier(Modifier::BOLD)
}

pub fn key_desc_style() -> Style {
    Style::default().fg(TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_style_tracks_data_source() {
        let online = status_style(LoadState::Loaded(DataSource::Online));
        let offline = status_style(LoadState::Loaded(DataSource::Offline));
        let empty = status_style(LoadState::Empty);

        assert_eq!(online.fg, Some(ONLINE));
        assert_eq!(offline.fg, Some(OFFLINE));
        assert_eq!(empty.fg, Some(NO_DATA));
        assert_eq!(status_style(LoadState::Fetching), hint_style());
    }
}
