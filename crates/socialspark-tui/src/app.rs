use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use socialspark_core::content::SUGGESTIONS;
use socialspark_core::{ChatSession, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Focus within the connected chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Suggestions,
    Transcript,
}

/// Focus within the onboarding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingFocus {
    Handle,
    Connect,
    Skip,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub onboarding_focus: OnboardingFocus,

    // Chat session (owns transcript, draft and request flags)
    pub session: ChatSession,
    pub backend_url: String,

    // Onboarding form
    pub handle_input: String,
    pub handle_cursor: usize,

    // Chat input cursor, in characters, into the session draft
    pub draft_cursor: usize,

    pub suggestion_state: ListState,

    // Scrolling
    pub landing_scroll: u16,
    pub chat_scroll: u16,
    pub chat_height: u16,     // Inner height of the transcript area
    pub chat_width: u16,      // Inner width, for wrap estimates
    pub chat_total_lines: u16,
    pub follow_transcript: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub transcript_area: Option<Rect>,
    pub landing_area: Option<Rect>,
}

impl App {
    pub fn new(session: ChatSession, backend_url: String) -> Self {
        let mut suggestion_state = ListState::default();
        suggestion_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Landing,
            input_mode: InputMode::Normal,
            focus: FocusPane::Input,
            onboarding_focus: OnboardingFocus::Handle,

            session,
            backend_url,

            handle_input: String::new(),
            handle_cursor: 0,
            draft_cursor: 0,

            suggestion_state,

            landing_scroll: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_total_lines: 0,
            follow_transcript: true,

            animation_frame: 0,

            transcript_area: None,
            landing_area: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.state().is_connected()
    }

    /// Switch to the chat view, ready for typing.
    pub fn open_chat(&mut self) {
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Editing;
        if self.is_connected() {
            self.focus = FocusPane::Input;
        } else {
            self.onboarding_focus = OnboardingFocus::Handle;
        }
    }

    pub fn open_landing(&mut self) {
        self.screen = Screen::Landing;
        self.input_mode = InputMode::Normal;
    }

    /// Connect is offered only with a handle and no attempt in flight.
    pub fn can_connect(&self) -> bool {
        !self.handle_input.trim().is_empty() && !self.session.state().is_connecting()
    }

    pub fn can_send(&self) -> bool {
        let state = self.session.state();
        !state.is_sending() && !state.draft_input().trim().is_empty()
    }

    pub fn connect(&mut self) {
        if self.session.connect_account(&self.handle_input) {
            self.input_mode = InputMode::Normal;
            self.onboarding_focus = OnboardingFocus::Connect;
        }
    }

    pub fn skip_connection(&mut self) {
        self.session.skip_connection();
        self.focus = FocusPane::Input;
        self.input_mode = InputMode::Editing;
    }

    pub fn submit_draft(&mut self) {
        if self.session.submit_draft() {
            self.draft_cursor = 0;
            self.follow_transcript = true;
        }
    }

    pub fn apply_selected_suggestion(&mut self) {
        if let Some(suggestion) = self.suggestion_state.selected().and_then(|i| SUGGESTIONS.get(i)) {
            self.session.apply_suggestion(suggestion);
            self.draft_cursor = suggestion.chars().count();
            self.focus = FocusPane::Input;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn apply_session_event(&mut self, event: SessionEvent) {
        let was_connected = self.is_connected();
        self.session.apply(event);

        // The draft may have been cleared underneath the cursor.
        self.draft_cursor = self.draft_cursor.min(self.session.state().draft_input().chars().count());
        self.follow_transcript = true;

        if !was_connected && self.is_connected() && self.screen == Screen::Chat {
            self.focus = FocusPane::Input;
            self.input_mode = InputMode::Editing;
        }
    }

    // Suggestion navigation
    pub fn suggestion_nav_down(&mut self) {
        let i = self.suggestion_state.selected().unwrap_or(0);
        self.suggestion_state.select(Some((i + 1).min(SUGGESTIONS.len() - 1)));
    }

    pub fn suggestion_nav_up(&mut self) {
        let i = self.suggestion_state.selected().unwrap_or(0);
        self.suggestion_state.select(Some(i.saturating_sub(1)));
    }

    // Transcript scrolling
    fn max_chat_scroll(&self) -> u16 {
        self.chat_total_lines.saturating_sub(self.chat_height)
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = (self.chat_scroll.saturating_add(lines)).min(self.max_chat_scroll());
        self.follow_transcript = self.chat_scroll >= self.max_chat_scroll();
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_transcript = false;
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_chat_scroll();
        self.follow_transcript = true;
    }

    pub fn scroll_chat_to_top(&mut self) {
        self.chat_scroll = 0;
        self.follow_transcript = false;
    }

    /// Called by the renderer once the transcript height is known.
    pub fn set_chat_metrics(&mut self, total_lines: u16, height: u16, width: u16) {
        self.chat_total_lines = total_lines;
        self.chat_height = height;
        self.chat_width = width;
        if self.follow_transcript {
            self.chat_scroll = self.max_chat_scroll();
        } else {
            self.chat_scroll = self.chat_scroll.min(self.max_chat_scroll());
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        let state = self.session.state();
        if state.is_sending() || state.is_connecting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
