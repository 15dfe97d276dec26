//! Screen display conversion
//!
//! Converts a parsed screen to formats suitable for display. The screen itself
//! is never modified.

use crate::element::Element;
use crate::screen::{Cell, CellContent, Screen};
use crate::style::{Color, Style};
use std::fmt::Write;

/// Output format for a rendered screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RenderFormat {
    /// Text only, trailing blanks trimmed
    #[default]
    Plain,

    /// Text re-encoded with SGR sequences and OSC 8 links
    Ansi,

    /// Numbered rows followed by the cursor position
    Debug,
}

/// Render the whole screen in the given format
pub fn render(screen: &Screen, format: RenderFormat) -> String {
    match format {
        RenderFormat::Plain => screen_to_lines(screen).join("\n"),
        RenderFormat::Ansi => render_ansi(screen),
        RenderFormat::Debug => render_debug(screen),
    }
}

/// Plain text of every row.
///
/// Empty cells become spaces, elements their fallback text, and control
/// characters other than tab their Unicode control picture so nothing is
/// sent to a terminal live.
pub fn screen_to_lines(screen: &Screen) -> Vec<String> {
    screen
        .rows()
        .iter()
        .map(|row| {
            let mut line = String::new();
            for cell in row {
                match &cell.content {
                    CellContent::Empty => line.push(' '),
                    CellContent::Char(c) => line.push(visible(*c)),
                    CellContent::Element(element) => line.push_str(&element.fallback_text()),
                }
            }
            line.truncate(line.trim_end_matches(' ').len());
            line
        })
        .collect()
}

/// Render every row with ANSI escape codes, one line per row
pub fn render_ansi(screen: &Screen) -> String {
    (0..screen.rows().len())
        .map(|row| render_row_ansi(screen, row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a row of cells to a string with ANSI escape codes
pub fn render_row_ansi(screen: &Screen, row: usize) -> String {
    let mut output = String::new();
    let mut last_style = Style::default();

    for cell in screen.row(row).into_iter().flatten() {
        // Check if we need to update attributes
        if cell.style != last_style {
            output.push_str(&style_to_ansi(&cell.style));
            last_style = cell.style;
        }

        push_cell_ansi(&mut output, cell);
    }

    // Reset at end of line
    output.push_str("\x1b[0m");
    output
}

fn push_cell_ansi(output: &mut String, cell: &Cell) {
    match &cell.content {
        CellContent::Empty => output.push(' '),
        CellContent::Char(c) => output.push(visible(*c)),
        CellContent::Element(element) => match &**element {
            Element::Link(link) => {
                let _ = write!(output, "\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", link.url, link.content);
            }
            other => output.push_str(&other.fallback_text()),
        },
    }
}

fn render_debug(screen: &Screen) -> String {
    let mut output = String::new();
    for (index, line) in screen_to_lines(screen).iter().enumerate() {
        let _ = writeln!(output, "{index:>4}| {line}");
    }
    let cursor = screen.cursor();
    let _ = write!(output, "cursor: row {} col {}", cursor.row, cursor.col);
    output
}

/// Map C0 controls and DEL to their control-picture glyphs. Tab is kept.
fn visible(c: char) -> char {
    match c {
        '\t' => c,
        '\u{00}'..='\u{1f}' => char::from_u32(0x2400 + c as u32).unwrap_or(c),
        '\u{7f}' => '\u{2421}',
        _ => c,
    }
}

/// Convert a style to an ANSI escape sequence
fn style_to_ansi(style: &Style) -> String {
    let mut codes: Vec<u16> = Vec::new();

    // Reset first
    codes.push(0);

    // Text attributes
    let attrs = &style.attrs;
    if attrs.bold { codes.push(1); }
    if attrs.faint { codes.push(2); }
    if attrs.italic { codes.push(3); }
    if attrs.underline { codes.push(4); }
    if attrs.blink { codes.push(5); }
    if attrs.reverse { codes.push(7); }
    if attrs.hidden { codes.push(8); }
    if attrs.strikethrough { codes.push(9); }

    push_color(&mut codes, style.fg, 30, 90, 38);
    push_color(&mut codes, style.bg, 40, 100, 48);

    format!(
        "\x1b[{}m",
        codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(";")
    )
}

fn push_color(codes: &mut Vec<u16>, color: Color, base: u16, bright: u16, extended: u16) {
    match color {
        Color::Default => {}
        Color::Indexed(n) if n < 8 => codes.push(base + n as u16),
        Color::Indexed(n) if n < 16 => codes.push(bright + (n - 8) as u16),
        Color::Indexed(n) => codes.extend([extended, 5, n as u16]),
        Color::Rgb(r, g, b) => codes.extend([extended, 2, r as u16, g as u16, b as u16]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Link;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_trim_trailing_blanks() {
        let mut screen = Screen::new();
        screen.append_str("ab  ");
        screen.new_line();
        screen.apply_escape('C', &["2"]);
        screen.append('c');

        assert_eq!(screen_to_lines(&screen), vec!["ab", "  c"]);
    }

    #[test]
    fn test_control_characters_are_visible() {
        let mut screen = Screen::new();
        screen.append_str("\x1b[9z");

        assert_eq!(screen_to_lines(&screen), vec!["\u{241b}[9z"]);
    }

    #[test]
    fn test_elements_use_fallback_text() {
        let mut screen = Screen::new();
        screen.append_str("see ");
        screen.append_element(Element::Link(Link {
            url: "https://example.com".to_string(),
            content: "here".to_string(),
        }));

        assert_eq!(screen_to_lines(&screen), vec!["see here"]);
        assert!(render_row_ansi(&screen, 0).contains("\x1b]8;;https://example.com\x1b\\here"));
    }

    #[test]
    fn test_ansi_rendering() {
        let mut screen = Screen::new();

        // Set bold red text
        screen.apply_escape('m', &["1", "31"]);
        screen.append_str("RED");
        screen.apply_escape('m', &["0"]);
        screen.append('!');

        let rendered = render_row_ansi(&screen, 0);
        assert_eq!(rendered, "\x1b[0;1;31mRED\x1b[0m!\x1b[0m");
    }

    #[test]
    fn test_extended_colors() {
        let style = Style {
            fg: Color::Indexed(200),
            bg: Color::Rgb(1, 2, 3),
            ..Style::default()
        };

        assert_eq!(style_to_ansi(&style), "\x1b[0;38;5;200;48;2;1;2;3m");
    }

    #[test]
    fn test_debug_format() {
        let mut screen = Screen::new();
        screen.append_str("hi");

        assert_eq!(render(&screen, RenderFormat::Debug), "   0| hi\ncursor: row 0 col 2");
    }

    #[test]
    fn test_tab_is_kept() {
        let mut screen = Screen::new();
        screen.append_str("a\tb\x07");

        assert_eq!(screen_to_lines(&screen), vec!["a\tb\u{2407}"]);
        assert_eq!(render_row_ansi(&screen, 0), "a\tb\u{2407}\x1b[0m");
    }

    #[test]
    fn test_gaps_render_as_spaces() {
        let mut screen = Screen::new();
        screen.apply_escape('C', &["3"]);
        screen.append('x');

        assert_eq!(render_row_ansi(&screen, 0), "   x\x1b[0m");
        assert_eq!(render_row_ansi(&screen, 7), "\x1b[0m");
    }
}
