//! Per-session state
//!
//! Each interactive session owns its output transcript, its conversation
//! history, its pony and its terminal width. Screens are built from the
//! transcript on demand and are never shared between sessions.

use crate::conversation::{format_response, History, Message, Role};
use crate::persona::Persona;
use anyhow::Result;
use pony_terminal::{parse_into, Screen};
use std::sync::atomic::{AtomicU16, Ordering};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Width assumed until the terminal reports one
pub const DEFAULT_WIDTH: u16 = 80;

/// Line that ends the conversation
pub const QUIT_COMMAND: &str = "quit";

/// What to do after a line typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// Close the session
    Quit,

    /// The line was added to the history; a response is expected
    Respond,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    user: String,

    /// Terminal width; updated by window-change events from another task
    width: AtomicU16,

    /// Everything written to the session terminal, escape sequences included
    transcript: Vec<u8>,

    persona: Persona,

    history: History,

    /// Row budget for screens built from the transcript
    max_rows: Option<usize>,
}

impl Session {
    /// Start a session with a randomly chosen pony
    pub fn new(user: impl Into<String>, width: u16) -> Self {
        Self::with_persona(user, width, Persona::random())
    }

    pub fn with_persona(user: impl Into<String>, width: u16, persona: Persona) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            user: user.into(),
            width: AtomicU16::new(width),
            transcript: Vec::new(),
            history: History::new(persona.system_prompt()),
            persona,
            max_rows: None,
        };
        info!(
            session = %session.id,
            user = %session.user,
            pony = session.persona.code_name(),
            width,
            "session started"
        );
        session
    }

    /// Start a session for `user`, who must be the configured pony user
    pub fn open(user: &str, allowed_user: &str, width: u16) -> Result<Self> {
        if user != allowed_user {
            warn!(user, "user is not allowed to log in");
            anyhow::bail!("User {user} is not allowed to log in");
        }
        Ok(Self::new(user, width))
    }

    /// Keep at most `max_rows` rows in screens built for this session
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn width(&self) -> u16 {
        self.width.load(Ordering::Relaxed)
    }

    pub fn set_width(&self, width: u16) {
        debug!(session = %self.id, width, "terminal width changed");
        self.width.store(width, Ordering::Relaxed);
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Text the pony introduces itself with
    pub fn greeting(&self) -> String {
        self.persona.greeting()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn transcript(&self) -> &[u8] {
        &self.transcript
    }

    /// Record raw output sent to the session terminal
    pub fn record_output(&mut self, bytes: &[u8]) {
        self.transcript.extend_from_slice(bytes);
    }

    /// Handle a line typed by the user.
    ///
    /// `quit` ends the session; anything else joins the history.
    pub fn handle_line(&mut self, line: &str) -> LineAction {
        if line == QUIT_COMMAND {
            debug!(session = %self.id, "user quit");
            return LineAction::Quit;
        }
        self.history.push(Message::new(Role::User, line));
        LineAction::Respond
    }

    /// Format a generated response for this terminal and record it.
    ///
    /// Returns the text to send to the session terminal.
    pub fn write_response(&mut self, response: &str) -> String {
        let formatted = format_response(response, self.width());
        self.record_output(formatted.as_bytes());
        self.history.push(Message::new(Role::Assistant, response));
        formatted
    }

    /// Parse the transcript into a fresh screen
    pub fn screen(&self) -> Result<Screen> {
        let mut screen = match self.max_rows {
            Some(max_rows) => Screen::with_max_rows(max_rows)?,
            None => Screen::new(),
        };
        parse_into(&mut screen, &self.transcript);
        Ok(screen)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        info!(
            session = %self.id,
            bytes = self.transcript.len(),
            messages = self.history.len(),
            "session ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pony_terminal::screen_to_lines;
    use pretty_assertions::assert_eq;

    fn session(width: u16) -> Session {
        Session::with_persona("pony", width, Persona::new("rarity"))
    }

    #[test]
    fn test_sessions_are_distinct() {
        let a = Session::new("pony", DEFAULT_WIDTH);
        let b = Session::new("pony", DEFAULT_WIDTH);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.user(), "pony");
    }

    #[test]
    fn test_history_starts_with_persona_prompt() {
        let session = session(80);
        let messages = session.history().messages();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, Persona::new("rarity").system_prompt());
        assert_eq!(session.greeting(), "Hello! My name is Rarity!");
    }

    #[test]
    fn test_random_session_uses_known_pony() {
        let session = Session::new("pony", 80);

        assert!(crate::persona::PONIES.contains(&session.persona().code_name()));
        assert!(session.history().messages()[0]
            .content
            .contains(session.persona().name()));
    }

    #[test]
    fn test_only_the_pony_user_may_open() {
        assert!(Session::open("pony", "pony", 80).is_ok());

        let err = Session::open("mallory", "pony", 80).unwrap_err();
        assert_eq!(err.to_string(), "User mallory is not allowed to log in");
    }

    #[test]
    fn test_quit_line() {
        let mut session = session(80);

        assert_eq!(session.handle_line("hello"), LineAction::Respond);
        assert_eq!(session.handle_line("quit"), LineAction::Quit);
        assert_eq!(session.handle_line(" quit"), LineAction::Respond);
        assert_eq!(session.history().len(), 3);
        assert!(session
            .history()
            .messages()
            .iter()
            .all(|message| message.content != "quit"));
    }

    #[test]
    fn test_width_can_change_through_shared_reference() {
        let session = std::sync::Arc::new(session(80));
        let resizer = std::sync::Arc::clone(&session);

        std::thread::spawn(move || resizer.set_width(40))
            .join()
            .unwrap();
        assert_eq!(session.width(), 40);
    }

    #[test]
    fn test_response_is_recorded() {
        let mut session = session(20);
        session.handle_line("hello");
        let written = session.write_response("Hay there, how are you");

        assert_eq!(written, "\n Hay there, how\n are you\n\n");
        assert_eq!(session.transcript(), written.as_bytes());
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().messages()[2].role, Role::Assistant);
    }

    #[test]
    fn test_screen_from_transcript() {
        let mut session = session(80);
        session.record_output(b"\x1b[1mPony\x1b[0m says hi\r\n");

        let screen = session.screen().unwrap();
        assert_eq!(screen_to_lines(&screen), vec!["Pony says hi"]);
        assert!(screen.cell(0, 0).unwrap().style.attrs.bold);
    }

    #[test]
    fn test_screen_row_budget() {
        let mut session = session(80).with_max_rows(2);
        session.record_output(b"one\ntwo\nthree\n");

        let screen = session.screen().unwrap();
        assert_eq!(screen_to_lines(&screen), vec!["three"]);

        let invalid = self::session(80).with_max_rows(0);
        assert!(invalid.screen().is_err());
    }
}
