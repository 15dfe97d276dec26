//! Escape sequence state machine
//!
//! Consumes a byte buffer one decoded character at a time and drives a
//! [`Screen`]. The machine has four modes:
//!
//! - `Normal`: text is written to the screen, `\n`, `\r` and backspace move the
//!   cursor. ESC enters `Escape`.
//! - `Escape`: `[` opens a control sequence, `]` opens an operating system
//!   command. Anything else aborts.
//! - `Control`: digits and `?` build the current parameter, `;` closes it, one
//!   of `A B C D G K M` (any case) completes the sequence. `h`/`l` complete it
//!   without effect. Anything else aborts.
//! - `Osc`: everything up to BEL is captured and handed to the element parser.
//!
//! Aborting rewinds to the ESC that opened the sequence. The ESC is then
//! written as a literal character and the rest of the sequence is replayed as
//! text, so malformed input is shown verbatim instead of being lost. Escape
//! and control sequences cut off by the end of input are flushed the same
//! way. An unterminated OSC capture is dropped.

use crate::element::parse_element_sequence;
use crate::params::Params;
use crate::screen::Screen;
use tracing::{debug, trace};

/// Text written in place of an element payload that failed to parse
pub const ELEMENT_ERROR_PREFIX: &str = "*** Error parsing custom element escape sequence: ";

const ESC: char = '\x1b';
const BEL: char = '\x07';
const BACKSPACE: char = '\x08';

/// Parser mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Escape,
    Control,
    Osc,
}

/// Parser for terminal escape sequences
#[derive(Debug, Clone, Default)]
pub struct Parser {
    mode: Mode,

    /// Read offset into the input
    offset: usize,

    /// Offset of the ESC that opened the current sequence
    escape_started_at: usize,

    /// Offset of the first payload byte of the current OSC
    osc_started_at: usize,

    /// Parameters of the current control sequence
    params: Params,

    /// ESC being replayed after an abort; written as text, not interpreted
    literal_escape_at: Option<usize>,
}

/// Parse `input` into `screen` with a fresh parser
pub fn parse_into(screen: &mut Screen, input: &[u8]) {
    Parser::new().parse(screen, input);
}

impl Parser {
    /// Create a new parser in normal mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode. Always `Normal` once `parse` returns.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Parse the whole of `input` into `screen`.
    ///
    /// Never fails: malformed sequences become text, element errors become a
    /// diagnostic line, and an unterminated OSC is discarded.
    pub fn parse(&mut self, screen: &mut Screen, input: &[u8]) {
        *self = Self::default();

        loop {
            while let Some(rest) = input.get(self.offset..).filter(|rest| !rest.is_empty()) {
                let (c, width) = decode_char(rest);
                let at = self.offset;
                self.offset = at + width;

                match self.mode {
                    Mode::Normal => self.handle_normal(screen, c, at),
                    Mode::Escape => self.handle_escape(c),
                    Mode::Control => self.handle_control(screen, input, c, at),
                    Mode::Osc => self.handle_osc(screen, input, c, at),
                }
            }

            match self.mode {
                Mode::Normal => break,
                Mode::Escape | Mode::Control => {
                    trace!(
                        offset = self.escape_started_at,
                        "flushing unterminated escape sequence as text"
                    );
                    self.abort();
                }
                Mode::Osc => {
                    trace!(
                        offset = self.escape_started_at,
                        bytes = input.len() - self.osc_started_at,
                        "dropping unterminated operating system command"
                    );
                    self.mode = Mode::Normal;
                    break;
                }
            }
        }
    }

    fn handle_normal(&mut self, screen: &mut Screen, c: char, at: usize) {
        match c {
            '\n' => screen.new_line(),
            '\r' => screen.carriage_return(),
            BACKSPACE => screen.backspace(),
            ESC if self.literal_escape_at == Some(at) => {
                self.literal_escape_at = None;
                screen.append(c);
            }
            ESC => {
                self.escape_started_at = at;
                self.mode = Mode::Escape;
            }
            _ => screen.append(c),
        }
    }

    fn handle_escape(&mut self, c: char) {
        match c {
            '[' => {
                self.params.reset(self.offset);
                self.mode = Mode::Control;
            }
            ']' => {
                self.osc_started_at = self.offset;
                self.mode = Mode::Osc;
            }
            _ => {
                trace!(offset = self.escape_started_at, found = ?c, "not an escape sequence");
                self.abort();
            }
        }
    }

    fn handle_control(&mut self, screen: &mut Screen, input: &[u8], c: char, at: usize) {
        match c.to_ascii_uppercase() {
            '0'..='9' | '?' => {}
            ';' => {
                self.params.close(at);
                self.params.begin(self.offset);
            }
            'A' | 'B' | 'C' | 'D' | 'G' | 'K' | 'M' => {
                self.params.close(at);
                let params = self.params.resolve(input);
                screen.apply_escape(c, &params);
                self.mode = Mode::Normal;
            }
            // Set/reset mode (SM/RM), ignored
            'H' | 'L' => self.mode = Mode::Normal,
            _ => {
                trace!(offset = self.escape_started_at, found = ?c, "aborting control sequence");
                self.abort();
            }
        }
    }

    fn handle_osc(&mut self, screen: &mut Screen, input: &[u8], c: char, at: usize) {
        if c != BEL {
            return;
        }
        self.mode = Mode::Normal;

        let payload = String::from_utf8_lossy(&input[self.osc_started_at..at]);
        apply_element(screen, &payload);
    }

    /// Rewind to the ESC of the current sequence and replay it as text
    fn abort(&mut self) {
        self.offset = self.escape_started_at;
        self.literal_escape_at = Some(self.escape_started_at);
        self.mode = Mode::Normal;
    }
}

/// Insert the element carried by an OSC payload.
///
/// Links flow with the text. Images and parse errors sit on a line of their
/// own.
fn apply_element(screen: &mut Screen, payload: &str) {
    let result = match parse_element_sequence(payload) {
        Ok(None) => return,
        other => other,
    };

    let block = !matches!(&result, Ok(Some(element)) if element.is_inline());

    if block {
        if screen.cursor().col != 0 {
            screen.new_line();
        }
        let cursor = screen.cursor();
        screen.clear_to_end(cursor.row, cursor.col);
    }

    match result {
        Ok(Some(element)) => screen.append_element(element),
        Ok(None) => {}
        Err(err) => {
            debug!(error = %err, "invalid element sequence");
            screen.append_str(ELEMENT_ERROR_PREFIX);
            screen.append_str(&err.to_string());
        }
    }

    if block {
        screen.new_line();
    }
}

/// Decode one character from the start of `bytes`.
///
/// Invalid or truncated UTF-8 yields U+FFFD and a width of one byte.
fn decode_char(bytes: &[u8]) -> (char, usize) {
    let width = match bytes.first() {
        Some(0x00..=0x7F) => 1,
        Some(0xC2..=0xDF) => 2,
        Some(0xE0..=0xEF) => 3,
        Some(0xF0..=0xF4) => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };

    bytes
        .get(..width)
        .and_then(|encoded| std::str::from_utf8(encoded).ok())
        .and_then(|s| s.chars().next())
        .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, width))
}
