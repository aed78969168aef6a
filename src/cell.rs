// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content {
    Blank,
    Char(char),
    Glyph(&'static str),
    Wide(char),
    // Right half of the wide glyph to the left.
    Continuation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub content: Content,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        content: Content::Blank,
        fg: None,
        bold: false,
    };
}
