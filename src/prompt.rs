// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_PLACE_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptAction {
    None,
    Submit(String),
    Cancel,
}

#[derive(Clone, Debug, Default)]
pub struct Prompt {
    active: bool,
    buffer: String,
}

impl Prompt {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn open(&mut self) {
        self.active = true;
        self.buffer.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        if !self.active {
            return PromptAction::None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.active = false;
                self.buffer.clear();
                PromptAction::Cancel
            }
            (KeyCode::Enter, _) => {
                let place = self.buffer.trim().to_string();
                self.active = false;
                self.buffer.clear();
                if place.is_empty() {
                    PromptAction::Cancel
                } else {
                    PromptAction::Submit(place)
                }
            }
            (KeyCode::Backspace, _) => {
                self.buffer.pop();
                PromptAction::None
            }
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.buffer.clear();
                PromptAction::None
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                if self.buffer.chars().count() < MAX_PLACE_LEN {
                    self.buffer.push(c);
                }
                PromptAction::None
            }
            _ => PromptAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(p: &mut Prompt, s: &str) {
        for c in s.chars() {
            assert_eq!(p.handle_key(key(KeyCode::Char(c))), PromptAction::None);
        }
    }

    #[test]
    fn inactive_prompt_ignores_keys() {
        let mut p = Prompt::default();
        assert_eq!(p.handle_key(key(KeyCode::Char('x'))), PromptAction::None);
        assert_eq!(p.buffer(), "");
    }

    #[test]
    fn enter_submits_trimmed_place() {
        let mut p = Prompt::default();
        p.open();
        type_str(&mut p, "  new portlandd");
        p.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            p.handle_key(key(KeyCode::Enter)),
            PromptAction::Submit("new portland".to_string())
        );
        assert!(!p.is_active());
    }

    #[test]
    fn empty_submit_and_escape_cancel() {
        let mut p = Prompt::default();
        p.open();
        type_str(&mut p, "   ");
        assert_eq!(p.handle_key(key(KeyCode::Enter)), PromptAction::Cancel);

        p.open();
        type_str(&mut p, "oslo");
        assert_eq!(p.handle_key(key(KeyCode::Esc)), PromptAction::Cancel);
        assert_eq!(p.buffer(), "");
    }

    #[test]
    fn input_length_is_bounded() {
        let mut p = Prompt::default();
        p.open();
        type_str(&mut p, &"a".repeat(200));
        assert_eq!(p.buffer().len(), MAX_PLACE_LEN);
    }
}
