//! Screen model for parsed terminal output
//!
//! Manages the growable grid of cells, the cursor and the current style
//! register. Rows grow on demand as content is written.
//!
//! Rows are sparse: only written cells are stored, and unwritten columns read
//! back as empty cells. Cursor motion alone never allocates cells, so memory
//! grows with the amount of input rather than with how far the cursor moves.

use crate::element::Element;
use crate::style::Style;
use crate::TerminalError;
use std::ops::{Index, Range};

/// Upper bound for a single relative or absolute cursor motion
pub const MAX_MOTION: usize = 9999;

/// What a cell holds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellContent {
    /// Nothing written yet, or cleared
    #[default]
    Empty,

    /// A single character
    Char(char),

    /// A structured element occupying one cell
    Element(Box<Element>),
}

/// A single cell on the screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// The content of this cell
    pub content: CellContent,

    /// Style snapshot taken when the cell was written
    pub style: Style,
}

/// Read back for columns nothing was written to
static EMPTY_CELL: Cell = Cell {
    content: CellContent::Empty,
    style: Style::DEFAULT,
};

impl Cell {
    /// The character in this cell, if it holds one
    pub fn char(&self) -> Option<char> {
        match self.content {
            CellContent::Char(c) => Some(c),
            _ => None,
        }
    }

    /// The element in this cell, if it holds one
    pub fn element(&self) -> Option<&Element> {
        match &self.content {
            CellContent::Element(element) => Some(&**element),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }
}

/// One screen row
///
/// `len` is the number of columns the row spans, gaps included. It grows when
/// a cell is written past the end and never shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Written cells by column, ascending
    cells: Vec<(usize, Cell)>,
    width: usize,
}

impl Row {
    pub fn len(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Cell at `col`; empty for unwritten columns, `None` past the end
    pub fn get(&self, col: usize) -> Option<&Cell> {
        if col >= self.width {
            return None;
        }
        let cell = match self.position(col) {
            Ok(index) => &self.cells[index].1,
            Err(_) => &EMPTY_CELL,
        };
        Some(cell)
    }

    /// Every column from left to right
    pub fn iter(&self) -> Cells<'_> {
        Cells {
            row: self,
            col: 0,
            index: 0,
        }
    }

    /// Cells actually stored, with their column
    pub fn written(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }

    fn position(&self, col: usize) -> Result<usize, usize> {
        self.cells.binary_search_by_key(&col, |(c, _)| *c)
    }

    fn set(&mut self, col: usize, cell: Cell) {
        match self.position(col) {
            Ok(index) => self.cells[index].1 = cell,
            Err(index) => self.cells.insert(index, (col, cell)),
        }
        self.width = self.width.max(col + 1);
    }

    fn clear(&mut self, range: Range<usize>) {
        let start = self.cells.partition_point(|(c, _)| *c < range.start);
        let end = self.cells.partition_point(|(c, _)| *c < range.end);
        if start < end {
            self.cells.drain(start..end);
        }
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, col: usize) -> &Cell {
        match self.get(col) {
            Some(cell) => cell,
            None => panic!("column {col} out of range for row of width {}", self.width),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Cells<'a> {
        self.iter()
    }
}

/// Iterator over every column of a [`Row`]
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    row: &'a Row,
    col: usize,
    index: usize,
}

impl<'a> Iterator for Cells<'a> {
    type Item = &'a Cell;

    fn next(&mut self) -> Option<&'a Cell> {
        if self.col >= self.row.width {
            return None;
        }
        let cell = match self.row.cells.get(self.index) {
            Some((col, cell)) if *col == self.col => {
                self.index += 1;
                cell
            }
            _ => &EMPTY_CELL,
        };
        self.col += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.width - self.col;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}

/// Cursor position, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Screen containing parsed terminal content
#[derive(Debug, Clone, Default)]
pub struct Screen {
    /// Rows of cells, oldest first
    rows: Vec<Row>,

    /// Cursor position
    cursor: Cursor,

    /// Style applied to newly written cells
    style: Style,

    /// Maximum number of rows kept; the oldest row is dropped beyond it
    max_rows: Option<usize>,
}

impl Screen {
    /// Create an empty screen without a row budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty screen that keeps at most `max_rows` rows
    pub fn with_max_rows(max_rows: usize) -> Result<Self, TerminalError> {
        if max_rows == 0 {
            return Err(TerminalError::InvalidRowBudget);
        }
        Ok(Self {
            max_rows: Some(max_rows),
            ..Self::default()
        })
    }

    /// Parse `input` into a fresh screen
    pub fn from_ansi(input: &[u8]) -> Self {
        let mut screen = Self::new();
        crate::parser::parse_into(&mut screen, input);
        screen
    }

    /// Get cursor position
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Get the current style register
    pub fn style(&self) -> Style {
        self.style
    }

    /// Replace the current style register
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Get the row budget, if any
    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    /// All rows written so far
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by index
    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// Number of cells stored across all rows
    pub fn written_cells(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }

    /// Get cell at position
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// Write a character at the cursor and advance
    pub fn append(&mut self, c: char) {
        self.write(CellContent::Char(c));
    }

    /// Write every character of `text` at the cursor
    pub fn append_str(&mut self, text: &str) {
        self.append_many(text.chars());
    }

    /// Write a sequence of characters at the cursor
    pub fn append_many<I>(&mut self, chars: I)
    where
        I: IntoIterator<Item = char>,
    {
        for c in chars {
            self.append(c);
        }
    }

    /// Insert an element as a single cell at the cursor and advance
    pub fn append_element(&mut self, element: Element) {
        self.write(CellContent::Element(Box::new(element)));
    }

    fn write(&mut self, content: CellContent) {
        let style = self.style;
        let col = self.cursor.col;
        self.line_mut().set(col, Cell { content, style });
        self.cursor.col += 1;
    }

    /// The row under the cursor, created if needed
    fn line_mut(&mut self) -> &mut Row {
        let row = self.cursor.row;
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Row::default);
        }
        &mut self.rows[row]
    }

    /// Move cursor to the start of the next line
    pub fn new_line(&mut self) {
        self.cursor.col = 0;
        self.cursor.row += 1;

        if let Some(max_rows) = self.max_rows {
            if self.cursor.row >= max_rows {
                if !self.rows.is_empty() {
                    self.rows.remove(0);
                }
                self.cursor.row = max_rows - 1;
            }
        }
    }

    /// Carriage return (move to start of line)
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Move one column left without erasing
    pub fn backspace(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
    }

    /// Reset the cells of `row` within `range` to empty.
    ///
    /// The row length never changes.
    pub fn clear(&mut self, row: usize, range: Range<usize>) {
        if let Some(line) = self.rows.get_mut(row) {
            line.clear(range);
        }
    }

    /// Clear `row` from `start` to its end
    pub fn clear_to_end(&mut self, row: usize, start: usize) {
        self.clear(row, start..usize::MAX);
    }

    /// Apply a completed control sequence.
    ///
    /// `command` is the terminating letter (case-insensitive) and `params` the
    /// raw parameter text. Unknown commands are ignored.
    pub fn apply_escape(&mut self, command: char, params: &[&str]) {
        let first = params.first().copied().unwrap_or("");

        match command.to_ascii_uppercase() {
            // Cursor up
            'A' => {
                let n = motion_count(first);
                self.cursor.row = self.cursor.row.saturating_sub(n);
            }

            // Cursor down
            'B' => {
                let n = motion_count(first);
                let mut row = bounded_advance(self.cursor.row, n);
                if let Some(max_rows) = self.max_rows {
                    row = row.min(max_rows - 1);
                }
                self.cursor.row = row;
            }

            // Cursor forward
            'C' => {
                let n = motion_count(first);
                self.cursor.col = bounded_advance(self.cursor.col, n);
            }

            // Cursor back
            'D' => {
                let n = motion_count(first);
                self.cursor.col = self.cursor.col.saturating_sub(n);
            }

            // Cursor to absolute column (1-based)
            'G' => {
                let n = motion_count(first);
                self.cursor.col = n - 1;
            }

            // Erase in line
            'K' => {
                let Cursor { row, col } = self.cursor;
                match parse_number(first).unwrap_or(0) {
                    0 => self.clear_to_end(row, col),
                    1 => self.clear(row, 0..col + 1),
                    2 => self.clear_to_end(row, 0),
                    _ => {}
                }
            }

            // SGR (Select Graphic Rendition)
            'M' => self.style.apply_sgr(params),

            _ => {}
        }
    }
}

fn parse_number(param: &str) -> Option<usize> {
    if param.is_empty() {
        return None;
    }
    param.parse().ok()
}

/// Motion count: 1 when missing, empty, zero or unparseable
fn motion_count(param: &str) -> usize {
    parse_number(param)
        .filter(|&n| n > 0)
        .unwrap_or(1)
        .min(MAX_MOTION)
}

/// Advance `from` by `n`, never past `MAX_MOTION` unless already beyond it
fn bounded_advance(from: usize, n: usize) -> usize {
    from.saturating_add(n).min(from.max(MAX_MOTION))
}
