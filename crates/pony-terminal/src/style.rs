//! Style register and SGR (Select Graphic Rendition) handling
//!
//! A [`Style`] is a small `Copy` value. Every written cell takes its own
//! snapshot, so changing the register never touches cells already on screen.

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Default terminal color
    #[default]
    Default,

    /// ANSI 256-color palette index
    Indexed(u8),

    /// RGB color
    Rgb(u8, u8, u8),
}

/// Text attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

/// Colors plus attributes applied to newly written cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,

    /// Background color
    pub bg: Color,

    /// Text attributes
    pub attrs: Attributes,
}

impl Attributes {
    /// No attributes set
    pub const NONE: Self = Self {
        bold: false,
        faint: false,
        italic: false,
        underline: false,
        blink: false,
        reverse: false,
        hidden: false,
        strikethrough: false,
    };
}

impl Style {
    /// Default colors, no attributes
    pub const DEFAULT: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attributes::NONE,
    };

    /// Whether this is the neutral style (no colors, no attributes)
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Reset colors and attributes (SGR 0)
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }

    /// Apply an SGR parameter list.
    ///
    /// Parameters are the raw text slices of the control sequence. An empty
    /// list or an empty parameter means 0 (reset). Parameters that are not
    /// decimal numbers are skipped.
    pub fn apply_sgr(&mut self, params: &[&str]) {
        if params.is_empty() {
            self.reset();
            return;
        }

        let mut iter = params.iter().map(|p| parse_code(p));
        while let Some(code) = iter.next() {
            if let Some(code) = code {
                self.apply_code(code, &mut iter);
            }
        }
    }

    fn apply_code<I>(&mut self, code: u16, params: &mut I)
    where
        I: Iterator<Item = Option<u16>>,
    {
        match code {
            0 => self.reset(),

            // Attributes
            1 => self.attrs.bold = true,
            2 => self.attrs.faint = true,
            3 => self.attrs.italic = true,
            4 => self.attrs.underline = true,
            5 | 6 => self.attrs.blink = true,
            7 => self.attrs.reverse = true,
            8 => self.attrs.hidden = true,
            9 => self.attrs.strikethrough = true,

            // Reset attributes
            21 | 22 => {
                self.attrs.bold = false;
                self.attrs.faint = false;
            }
            23 => self.attrs.italic = false,
            24 => self.attrs.underline = false,
            25 => self.attrs.blink = false,
            27 => self.attrs.reverse = false,
            28 => self.attrs.hidden = false,
            29 => self.attrs.strikethrough = false,

            // Foreground colors
            30..=37 => self.fg = Color::Indexed((code - 30) as u8),
            38 => {
                if let Some(color) = extended_color(params) {
                    self.fg = color;
                }
            }
            39 => self.fg = Color::Default,

            // Background colors
            40..=47 => self.bg = Color::Indexed((code - 40) as u8),
            48 => {
                if let Some(color) = extended_color(params) {
                    self.bg = color;
                }
            }
            49 => self.bg = Color::Default,

            // Bright foreground colors
            90..=97 => self.fg = Color::Indexed((code - 90 + 8) as u8),

            // Bright background colors
            100..=107 => self.bg = Color::Indexed((code - 100 + 8) as u8),

            _ => {}
        }
    }
}

/// Parse one SGR parameter. Empty means 0.
fn parse_code(param: &str) -> Option<u16> {
    if param.is_empty() {
        return Some(0);
    }
    param.parse().ok()
}

/// Decode the `5;n` (256-color) or `2;r;g;b` (RGB) tail of SGR 38/48
fn extended_color<I>(params: &mut I) -> Option<Color>
where
    I: Iterator<Item = Option<u16>>,
{
    match params.next().flatten() {
        Some(5) => {
            let index = params.next().flatten()?;
            Some(Color::Indexed(clamp_u8(index)))
        }
        Some(2) => {
            let r = component(params);
            let g = component(params);
            let b = component(params);
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn component<I>(params: &mut I) -> u8
where
    I: Iterator<Item = Option<u16>>,
{
    params.next().flatten().map(clamp_u8).unwrap_or(0)
}

fn clamp_u8(value: u16) -> u8 {
    value.min(u8::MAX as u16) as u8
}
