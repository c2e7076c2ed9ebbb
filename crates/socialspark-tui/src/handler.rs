use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane, InputMode, OnboardingFocus, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Apply a line-editing key to `text`. Returns false for keys that are not
/// editing keys.
fn edit_line(text: &mut String, cursor: &mut usize, key: KeyCode) -> bool {
    let char_count = text.chars().count();
    *cursor = (*cursor).min(char_count);

    match key {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(char_count),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = char_count,
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(text, *cursor);
            text.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => return false,
    }
    true
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Session(event) => app.apply_session_event(event),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match (app.screen, app.is_connected()) {
        (Screen::Landing, _) => handle_landing(app, key),
        (Screen::Chat, false) => handle_onboarding(app, key),
        (Screen::Chat, true) => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
    }
}

fn handle_landing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char('g') => app.open_chat(),
        KeyCode::Char('j') | KeyCode::Down => app.landing_scroll = app.landing_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => app.landing_scroll = app.landing_scroll.saturating_sub(1),
        KeyCode::PageDown => app.landing_scroll = app.landing_scroll.saturating_add(10),
        KeyCode::PageUp => app.landing_scroll = app.landing_scroll.saturating_sub(10),
        KeyCode::Home => app.landing_scroll = 0,
        _ => {}
    }
}

fn handle_onboarding(app: &mut App, key: KeyEvent) {
    // Tab cycles Handle -> Connect -> Skip from any mode
    if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
        app.onboarding_focus = match (app.onboarding_focus, key.code) {
            (OnboardingFocus::Handle, KeyCode::Tab) => OnboardingFocus::Connect,
            (OnboardingFocus::Connect, KeyCode::Tab) => OnboardingFocus::Skip,
            (OnboardingFocus::Skip, KeyCode::Tab) => OnboardingFocus::Handle,
            (OnboardingFocus::Handle, _) => OnboardingFocus::Skip,
            (OnboardingFocus::Connect, _) => OnboardingFocus::Handle,
            (OnboardingFocus::Skip, _) => OnboardingFocus::Connect,
        };
        app.input_mode = if app.onboarding_focus == OnboardingFocus::Handle {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
        return;
    }

    if app.input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Enter => app.connect(),
            code => {
                edit_line(&mut app.handle_input, &mut app.handle_cursor, code);
            }
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('b') => app.open_landing(),
        KeyCode::Char('i') => {
            app.onboarding_focus = OnboardingFocus::Handle;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('s') => app.skip_connection(),
        KeyCode::Enter => match app.onboarding_focus {
            OnboardingFocus::Handle | OnboardingFocus::Connect => app.connect(),
            OnboardingFocus::Skip => app.skip_connection(),
        },
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('b') => app.open_landing(),

        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Input => FocusPane::Suggestions,
                FocusPane::Suggestions => FocusPane::Transcript,
                FocusPane::Transcript => FocusPane::Input,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Suggestions => app.suggestion_nav_down(),
            _ => app.scroll_chat_down(1),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Suggestions => app.suggestion_nav_up(),
            _ => app.scroll_chat_up(1),
        },
        KeyCode::Char('g') => app.scroll_chat_to_top(),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_down(app.chat_height / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_up(app.chat_height / 2);
        }

        KeyCode::Enter => match app.focus {
            FocusPane::Suggestions => app.apply_selected_suggestion(),
            FocusPane::Input | FocusPane::Transcript => {
                app.focus = FocusPane::Input;
                app.input_mode = InputMode::Editing;
            }
        },
        KeyCode::Char('i') | KeyCode::Char('a') => {
            app.focus = FocusPane::Input;
            app.input_mode = InputMode::Editing;
        }

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = FocusPane::Suggestions;
        }
        KeyCode::Enter => app.submit_draft(),
        code => {
            // Input is disabled while a reply is pending
            if app.session.state().is_sending() {
                return;
            }
            let mut draft = app.session.state().draft_input().to_string();
            if edit_line(&mut draft, &mut app.draft_cursor, code) {
                app.session.set_draft(draft);
            }
        }
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_transcript = app.transcript_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_landing = app.landing_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_transcript {
                app.scroll_chat_down(3);
            } else if in_landing {
                app.landing_scroll = app.landing_scroll.saturating_add(3);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_transcript {
                app.scroll_chat_up(3);
            } else if in_landing {
                app.landing_scroll = app.landing_scroll.saturating_sub(3);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use socialspark_core::content::SUGGESTIONS;
    use socialspark_core::{
        AccountIngestor, ChatMessage, ChatSession, GenerationError, ProcessingError, Reply,
        ResponseGenerator, SessionEvent, SessionSettings, Summary,
    };
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct EchoBackend;

    #[async_trait]
    impl AccountIngestor for EchoBackend {
        async fn connect_account(&self, handle: &str) -> Result<Summary, ProcessingError> {
            if handle == "@bad" {
                return Err(ProcessingError::new("unknown handle"));
            }
            Ok(Summary {
                message: format!("Processed posts for {}.", handle),
            })
        }
    }

    #[async_trait]
    impl ResponseGenerator for EchoBackend {
        async fn send_message(&self, text: &str) -> Result<Reply, GenerationError> {
            Ok(Reply {
                response: format!("echo: {}", text),
            })
        }
    }

    fn test_app() -> (App, UnboundedReceiver<SessionEvent>) {
        let backend = Arc::new(EchoBackend);
        let (session, rx) = ChatSession::new(backend.clone(), backend, SessionSettings::default());
        (App::new(session, "http://test".to_string()), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn deliver(app: &mut App, rx: &mut UnboundedReceiver<SessionEvent>) {
        let event = rx.recv().await.expect("session event");
        handle_event(app, AppEvent::Session(event));
    }

    #[test]
    fn test_edit_line_utf8() {
        let mut text = String::from("héllo");
        let mut cursor = 2;

        edit_line(&mut text, &mut cursor, KeyCode::Backspace);
        assert_eq!(text, "hllo");
        assert_eq!(cursor, 1);

        edit_line(&mut text, &mut cursor, KeyCode::Char('ë'));
        assert_eq!(text, "hëllo");

        edit_line(&mut text, &mut cursor, KeyCode::End);
        edit_line(&mut text, &mut cursor, KeyCode::Delete);
        assert_eq!(text, "hëllo");
        assert!(!edit_line(&mut text, &mut cursor, KeyCode::F(1)));
    }

    #[tokio::test]
    async fn test_connect_flow_from_landing() {
        let (mut app, mut rx) = test_app();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "@spark");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.state().is_connecting());
        assert!(!app.can_connect());

        deliver(&mut app, &mut rx).await;
        assert!(app.is_connected());
        assert_eq!(app.focus, FocusPane::Input);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(
            app.session.state().transcript()[0].content,
            "Processed posts for @spark. You can now ask specific questions about your content!"
        );
    }

    #[tokio::test]
    async fn test_failed_connect_keeps_onboarding() {
        let (mut app, mut rx) = test_app();
        app.open_chat();
        type_text(&mut app, "@bad");
        press(&mut app, KeyCode::Enter);
        deliver(&mut app, &mut rx).await;

        assert!(!app.is_connected());
        assert!(app.session.state().transient_error().is_some());
    }

    #[tokio::test]
    async fn test_skip_then_chat_turn() {
        let (mut app, mut rx) = test_app();
        app.open_chat();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.onboarding_focus, OnboardingFocus::Skip);
        press(&mut app, KeyCode::Enter);
        assert!(app.is_connected());
        assert!(app.session.state().transcript().is_empty());

        type_text(&mut app, "  hi there ");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.state().is_sending());
        assert_eq!(app.session.state().draft_input(), "");
        assert_eq!(app.draft_cursor, 0);

        // Typing is ignored while the reply is pending
        type_text(&mut app, "x");
        assert_eq!(app.session.state().draft_input(), "");

        deliver(&mut app, &mut rx).await;
        assert_eq!(
            app.session.state().transcript(),
            &[ChatMessage::user("hi there"), ChatMessage::assistant("echo: hi there")]
        );
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let (mut app, _rx) = test_app();
        app.open_chat();
        app.skip_connection();

        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(!app.session.state().is_sending());
        assert!(app.session.state().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_fills_draft_without_sending() {
        let (mut app, _rx) = test_app();
        app.open_chat();
        app.skip_connection();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, FocusPane::Suggestions);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.state().draft_input(), SUGGESTIONS[1]);
        assert_eq!(app.draft_cursor, SUGGESTIONS[1].chars().count());
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.session.state().transcript().is_empty());
        assert!(!app.session.state().is_sending());
    }

    #[tokio::test]
    async fn test_resize_leaves_state_alone() {
        let (mut app, _rx) = test_app();
        app.open_chat();
        type_text(&mut app, "@spark");

        handle_event(&mut app, AppEvent::Resize(80, 24));

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.handle_input, "@spark");
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_escape_returns_to_landing() {
        let (mut app, _rx) = test_app();
        app.open_chat();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Landing);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
