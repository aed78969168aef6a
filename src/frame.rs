// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Content};
use crate::glyphs::Glyph;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub bg: Option<Color>,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        Self {
            width,
            height,
            bg,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let w = self.width as usize;
        let start = (y as usize * w).min(self.cells.len());
        let end = (start + w).min(self.cells.len());
        &self.cells[start..end]
    }

    fn detach(&mut self, i: usize) {
        match self.cells[i].content {
            Content::Continuation => {
                if i > 0 {
                    self.cells[i - 1] = Cell::BLANK;
                }
            }
            Content::Glyph(_) | Content::Wide(_) => {
                if let Some(next) = self.cells.get_mut(i + 1) {
                    if next.content == Content::Continuation {
                        *next = Cell::BLANK;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.detach(i);
            self.cells[i] = cell;
        }
    }

    pub fn put_glyph(&mut self, x: u16, y: u16, glyph: Glyph, fg: Option<Color>, bold: bool) {
        let Some(i) = self.index(x, y) else {
            return;
        };

        if glyph.width >= 2 {
            self.put_wide(i, x, y, Content::Glyph(glyph.text), fg, bold);
            return;
        }

        let content = match single_char(glyph.text) {
            Some(ch) => Content::Char(ch),
            None => Content::Glyph(glyph.text),
        };
        self.set(x, y, Cell { content, fg, bold });
    }

    // Returns false when the second column falls off the right edge.
    fn put_wide(
        &mut self,
        i: usize,
        x: u16,
        y: u16,
        content: Content,
        fg: Option<Color>,
        bold: bool,
    ) -> bool {
        let Some(j) = self.index(x.saturating_add(1), y) else {
            return false;
        };
        self.detach(i);
        self.detach(j);
        self.cells[i] = Cell { content, fg, bold };
        self.cells[j] = Cell {
            content: Content::Continuation,
            fg,
            bold,
        };
        true
    }

    pub fn put_text(&mut self, x: u16, y: u16, text: &str, fg: Option<Color>, bold: bool) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            // Control and zero-width characters have no column of their own.
            let width = match ch.width() {
                Some(w) if w > 0 => w,
                _ => continue,
            };
            let Some(i) = self.index(col, y) else {
                break;
            };

            if width >= 2 {
                if !self.put_wide(i, col, y, Content::Wide(ch), fg, bold) {
                    break;
                }
                col += 2;
                continue;
            }

            self.detach(i);
            self.cells[i] = Cell {
                content: Content::Char(ch),
                fg,
                bold,
            };
            col += 1;
        }
        col
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut it = s.chars();
    let ch = it.next()?;
    it.next().is_none().then_some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow(text: &'static str) -> Glyph {
        Glyph { text, width: 1 }
    }

    fn wide(text: &'static str) -> Glyph {
        Glyph { text, width: 2 }
    }

    #[test]
    fn clear_makes_cells_blank() {
        let mut f = Frame::new(2, 2, None);
        f.put_glyph(0, 0, narrow("x"), None, false);
        assert_eq!(f.get(0, 0).unwrap().content, Content::Char('x'));
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().content, Content::Blank);
    }

    #[test]
    fn wide_glyph_claims_two_cells() {
        let mut f = Frame::new(4, 1, None);
        f.put_glyph(1, 0, wide("🌻"), None, false);
        assert_eq!(f.get(1, 0).unwrap().content, Content::Glyph("🌻"));
        assert_eq!(f.get(2, 0).unwrap().content, Content::Continuation);
    }

    #[test]
    fn wide_glyph_at_right_edge_is_skipped() {
        let mut f = Frame::new(4, 1, None);
        f.put_glyph(3, 0, wide("🌻"), None, false);
        assert_eq!(f.get(3, 0).unwrap().content, Content::Blank);
    }

    #[test]
    fn overwriting_half_of_wide_glyph_blanks_the_rest() {
        let mut f = Frame::new(4, 1, None);
        f.put_glyph(0, 0, wide("🌸"), None, false);
        f.put_glyph(1, 0, narrow("·"), None, false);
        assert_eq!(f.get(0, 0).unwrap().content, Content::Blank);
        assert_eq!(f.get(1, 0).unwrap().content, Content::Char('·'));

        f.put_glyph(2, 0, wide("🌸"), None, false);
        f.put_glyph(2, 0, narrow("o"), None, false);
        assert_eq!(f.get(3, 0).unwrap().content, Content::Blank);
    }

    #[test]
    fn text_is_clipped_at_edge() {
        let mut f = Frame::new(3, 1, None);
        let end = f.put_text(1, 0, "rain", None, false);
        assert_eq!(end, 3);
        assert_eq!(f.get(2, 0).unwrap().content, Content::Char('a'));
    }

    #[test]
    fn wide_text_takes_two_columns_per_char() {
        let mut f = Frame::new(6, 1, None);
        let end = f.put_text(0, 0, "東京abcd", None, false);
        assert_eq!(end, 6);
        let row: Vec<Content> = f.row(0).iter().map(|c| c.content).collect();
        assert_eq!(
            row,
            vec![
                Content::Wide('東'),
                Content::Continuation,
                Content::Wide('京'),
                Content::Continuation,
                Content::Char('a'),
                Content::Char('b'),
            ]
        );
    }

    #[test]
    fn wide_text_char_at_right_edge_is_clipped() {
        let mut f = Frame::new(2, 1, None);
        assert_eq!(f.put_text(0, 0, "a東", None, false), 1);
        assert_eq!(f.get(1, 0).unwrap().content, Content::Blank);
    }

    #[test]
    fn text_over_wide_glyph_blanks_its_other_half() {
        let mut f = Frame::new(4, 1, None);
        f.put_text(0, 0, "東", None, false);
        f.put_text(1, 0, "x", None, false);
        assert_eq!(f.get(0, 0).unwrap().content, Content::Blank);
        assert_eq!(f.get(1, 0).unwrap().content, Content::Char('x'));
    }

    #[test]
    fn multi_codepoint_narrow_glyph_is_kept_whole() {
        let mut f = Frame::new(2, 1, None);
        f.put_glyph(0, 0, narrow("\u{2600}\u{FE0E}"), None, false);
        assert_eq!(
            f.get(0, 0).unwrap().content,
            Content::Glyph("\u{2600}\u{FE0E}")
        );
    }
}
