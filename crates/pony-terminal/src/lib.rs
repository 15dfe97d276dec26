//! ANSI output parsing for Pony
//!
//! Turns a byte stream of text and ANSI escape sequences into a [`Screen`] of
//! styled cells, with support for inline links and images carried in OSC
//! element sequences.

pub mod display;
pub mod element;
pub mod params;
pub mod parser;
pub mod screen;
pub mod style;

pub use display::{render, render_ansi, render_row_ansi, screen_to_lines, RenderFormat};
pub use element::{parse_element_sequence, Dimension, Element, ElementError, Image, ImageSource, Link};
pub use parser::{parse_into, Mode, Parser, ELEMENT_ERROR_PREFIX};
pub use screen::{Cell, CellContent, Cells, Cursor, Row, Screen, MAX_MOTION};
pub use style::{Attributes, Color, Style};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Row budget must be at least one row")]
    InvalidRowBudget,
}
