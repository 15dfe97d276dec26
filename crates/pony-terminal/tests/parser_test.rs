use pony_terminal::{screen_to_lines, Color, Cursor, Element, Screen};
use pony_test_utils::fixtures::data;
use pony_test_utils::terminal::assert_lines;
use pretty_assertions::assert_eq;

fn chars(screen: &Screen, row: usize) -> Vec<char> {
    screen
        .row(row)
        .into_iter()
        .flatten()
        .filter_map(|cell| cell.char())
        .collect()
}

#[test]
fn plain_text_is_written_verbatim() {
    let screen = Screen::from_ansi(data::HELLO_WORLD.as_bytes());

    assert_eq!(chars(&screen, 0), "Hello, World!".chars().collect::<Vec<_>>());
    assert_eq!(screen.cursor(), Cursor { row: 1, col: 0 });
}

#[test]
fn unicode_text_is_written_per_character() {
    let screen = Screen::from_ansi(data::UNICODE_TEST.as_bytes());

    assert_lines(&["🦀 Rust 日本語 العربية"], &screen_to_lines(&screen));
}

#[test]
fn plain_text_starts_at_existing_cursor() {
    let mut screen = Screen::new();
    screen.append_str("ab");
    pony_terminal::parse_into(&mut screen, b"cd");

    assert_lines(&["abcd"], &screen_to_lines(&screen));
}

#[test]
fn bold_red_then_reset() {
    let mut screen = Screen::from_ansi(b"\x1b[1;31mHI\x1b[0m");

    for col in 0..2 {
        let cell = screen.cell(0, col).unwrap();
        assert!(cell.style.attrs.bold);
        assert_eq!(cell.style.fg, Color::Indexed(1));
    }
    assert_eq!(chars(&screen, 0), vec!['H', 'I']);

    // Register was reset by the trailing SGR 0
    screen.append('!');
    assert!(screen.cell(0, 2).unwrap().style.is_default());
}

#[test]
fn colors_fixture() {
    let screen = Screen::from_ansi(data::ANSI_COLORS.as_bytes());

    assert_lines(&["Red Green Blue"], &screen_to_lines(&screen));
    assert_eq!(screen.cell(0, 0).unwrap().style.fg, Color::Indexed(1));
    assert!(screen.cell(0, 3).unwrap().style.is_default());
    assert_eq!(screen.cell(0, 4).unwrap().style.fg, Color::Indexed(2));
    assert_eq!(screen.cell(0, 10).unwrap().style.fg, Color::Indexed(4));
}

#[test]
fn unrecognized_terminator_replays_sequence() {
    let screen = Screen::from_ansi(b"\x1b[9zHI");

    assert_eq!(chars(&screen, 0), vec!['\x1b', '[', '9', 'z', 'H', 'I']);
}

#[test]
fn bare_escape_renders_as_glyph() {
    let screen = Screen::from_ansi(b"a\x1bqb");

    assert_eq!(chars(&screen, 0), vec!['a', '\x1b', 'q', 'b']);
    assert_lines(&["a\u{241b}qb"], &screen_to_lines(&screen));
}

#[test]
fn backspace_at_column_zero_stays_put() {
    for repeat in [1, 2, 10, 500] {
        let input = "\x08".repeat(repeat);
        let screen = Screen::from_ansi(input.as_bytes());
        assert_eq!(screen.cursor().col, 0);
    }

    let screen = Screen::from_ansi(b"abc\x08\x08X");
    assert_lines(&["aXc"], &screen_to_lines(&screen));
}

#[test]
fn progress_line_is_redrawn() {
    let screen = Screen::from_ansi(data::PROGRESS.as_bytes());

    assert_lines(&["Downloading 100%", "Done"], &screen_to_lines(&screen));
}

#[test]
fn cursor_motion_sequences() {
    let screen = Screen::from_ansi(b"line one\nline two\x1b[A\x1b[4D\x1b[1CX\x1b[B\x1b[1GY");

    assert_lines(&["line Xne", "Yine two"], &screen_to_lines(&screen));
}

#[test]
fn link_is_inline() {
    let input = format!("see {} now", data::link_sequence("https://example.com", "docs"));
    let screen = Screen::from_ansi(input.as_bytes());

    assert_eq!(screen.rows().len(), 1);
    let link = screen.cell(0, 4).and_then(|cell| cell.element()).unwrap();
    assert!(matches!(link, Element::Link(l) if l.url == "https://example.com"));
    assert_lines(&["see docs now"], &screen_to_lines(&screen));
}

#[test]
fn image_gets_its_own_line() {
    let input = format!("before{}after", data::external_image_sequence("pony.png", "a pony"));
    let screen = Screen::from_ansi(input.as_bytes());

    assert_lines(&["before", "[image: a pony]", "after"], &screen_to_lines(&screen));
    assert!(screen.cell(1, 0).and_then(|cell| cell.element()).is_some());
    assert_eq!(screen.row(1).unwrap().len(), 1);
}

#[test]
fn image_at_line_start_adds_no_blank_line() {
    let input = format!("{}after", data::external_image_sequence("pony.png", "a pony"));
    let screen = Screen::from_ansi(input.as_bytes());

    assert_lines(&["[image: a pony]", "after"], &screen_to_lines(&screen));
}

#[test]
fn inline_image_sequence() {
    // "pony.png" and "PNG" in base64
    let input = data::inline_image_sequence("cG9ueS5wbmc=", "UE5H");
    let screen = Screen::from_ansi(input.as_bytes());

    assert_lines(&["[image: pony.png]"], &screen_to_lines(&screen));
    assert_eq!(screen.cursor(), Cursor { row: 1, col: 0 });
}

#[test]
fn block_element_clears_rest_of_reused_row() {
    let input = format!(
        "first\nsecond\x1b[A\r{}",
        data::external_image_sequence("x.png", "img")
    );
    let screen = Screen::from_ansi(input.as_bytes());

    assert_lines(&["[image: img]", "second"], &screen_to_lines(&screen));
}

#[test]
fn unknown_osc_is_ignored() {
    let screen = Screen::from_ansi(b"a\x1b]0;window title\x07b");

    assert_lines(&["ab"], &screen_to_lines(&screen));
}

#[test]
fn truncated_osc_is_dropped() {
    let screen = Screen::from_ansi(b"text\x1b]1339;url=https://example.com;content=lost");

    assert_lines(&["text"], &screen_to_lines(&screen));
    assert!(screen
        .rows()
        .iter()
        .flatten()
        .all(|cell| cell.element().is_none()));
}

#[test]
fn row_budget_scrolls() {
    let mut screen = Screen::with_max_rows(3).unwrap();
    let input = data::generate_text_lines(10);
    pony_terminal::parse_into(&mut screen, input.as_bytes());

    let lines = screen_to_lines(&screen);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("Line 9:"));
}
