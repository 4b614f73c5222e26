/// Single-line text editor used by the add and filter forms.
/// The cursor counts chars, not bytes, so descriptions like "₦ refund" edit cleanly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineEdit {
    value: String,
    cursor: usize,
}

impl LineEdit {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, s: impl Into<String>) {
        self.value = s.into();
        self.cursor = self.value.chars().count();
    }

    pub fn push(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut edit = LineEdit::default();
        edit.set("Lnch");
        edit.left();
        edit.left();
        edit.left();
        edit.push('u');

        assert_eq!(edit.value(), "Lunch");
        assert_eq!(edit.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut edit = LineEdit::default();
        edit.set("₦20");
        edit.backspace();
        edit.backspace();
        assert_eq!(edit.value(), "₦");

        edit.left();
        edit.delete();
        assert_eq!(edit.value(), "");
        assert_eq!(edit.cursor(), 0);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut edit = LineEdit::default();
        edit.left();
        edit.backspace();
        edit.delete();
        edit.right();
        assert_eq!(edit.cursor(), 0);

        edit.set("ab");
        edit.right();
        assert_eq!(edit.cursor(), 2);
    }
}
