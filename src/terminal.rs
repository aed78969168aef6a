// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Content;
use crate::frame::Frame;

pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self { stdout: out })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    // Wide glyphs are followed by a MoveTo so a terminal that measures them
    // differently cannot shift the rest of the row.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let bg = frame.bg.unwrap_or(Color::Reset);
        self.stdout.queue(SetBackgroundColor(bg))?;

        let mut cur_fg: Option<Color> = None;
        let mut cur_bold = false;
        self.stdout.queue(SetForegroundColor(Color::Reset))?;

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            let mut resync = false;

            for (x, cell) in frame.row(y).iter().enumerate() {
                if cell.content == Content::Continuation {
                    continue;
                }
                if resync {
                    self.stdout.queue(cursor::MoveTo(x as u16, y))?;
                    resync = false;
                }

                if cell.fg != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = cell.fg;
                }
                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }

                match cell.content {
                    Content::Blank => {
                        self.stdout.queue(Print(' '))?;
                    }
                    Content::Char(ch) => {
                        self.stdout.queue(Print(ch))?;
                    }
                    Content::Glyph(text) => {
                        self.stdout.queue(Print(text))?;
                        resync = true;
                    }
                    Content::Wide(ch) => {
                        self.stdout.queue(Print(ch))?;
                        resync = true;
                    }
                    Content::Continuation => {}
                }
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
