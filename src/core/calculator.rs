use crate::core::expr::evaluate_to_string;

pub const ERROR_MARKER: &str = "Error";
pub const CLEAR_KEY: &str = "C";
pub const BACKSPACE_KEY: &str = "⌫";
pub const EQUALS_KEY: &str = "=";

/// Keypad rows, top to bottom.
pub const KEYPAD: [[&str; 4]; 5] = [
    ["7", "8", "9", "/"],
    ["4", "5", "6", "*"],
    ["1", "2", "3", "-"],
    ["0", ".", "=", "+"],
    ["(", ")", "⌫", "C"],
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calculator {
    pub buffer: String,
}

impl Calculator {
    pub fn press(&mut self, key: &str) {
        match key {
            EQUALS_KEY => self.evaluate(),
            CLEAR_KEY => self.buffer.clear(),
            BACKSPACE_KEY => {
                if self.buffer == ERROR_MARKER {
                    self.buffer.clear();
                } else {
                    self.buffer.pop();
                }
            }
            other => {
                if self.buffer == ERROR_MARKER {
                    self.buffer.clear();
                }
                self.buffer.push_str(other);
            }
        }
    }

    /// Replaces the buffer with its value, or with [`ERROR_MARKER`].
    pub fn evaluate(&mut self) {
        self.buffer = match evaluate_to_string(&self.buffer) {
            Ok(result) => result,
            Err(err) => {
                log::debug!("calculator: {err}");
                ERROR_MARKER.to_string()
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(calc: &mut Calculator, keys: &[&str]) {
        for key in keys {
            calc.press(key);
        }
    }

    #[test]
    fn keys_append_and_equals_evaluates() {
        let mut calc = Calculator::default();
        type_keys(&mut calc, &["1", "2", "+", "7", "*", "3"]);
        assert_eq!(calc.buffer, "12+7*3");
        calc.press("=");
        assert_eq!(calc.buffer, "33");
    }

    #[test]
    fn result_can_be_chained() {
        let mut calc = Calculator::default();
        type_keys(&mut calc, &["9", "/", "2", "="]);
        assert_eq!(calc.buffer, "4.5");
        type_keys(&mut calc, &["*", "2", "="]);
        assert_eq!(calc.buffer, "9");
    }

    #[test]
    fn malformed_input_shows_error_marker() {
        let mut calc = Calculator::default();
        type_keys(&mut calc, &["5", "/", "0", "="]);
        assert_eq!(calc.buffer, ERROR_MARKER);

        calc.buffer = "2++".into();
        calc.press("=");
        assert_eq!(calc.buffer, ERROR_MARKER);
    }

    #[test]
    fn typing_after_error_starts_fresh() {
        let mut calc = Calculator {
            buffer: ERROR_MARKER.into(),
        };
        calc.press("4");
        assert_eq!(calc.buffer, "4");
    }

    #[test]
    fn clear_and_backspace() {
        let mut calc = Calculator::default();
        type_keys(&mut calc, &["1", "2", "3", BACKSPACE_KEY]);
        assert_eq!(calc.buffer, "12");
        calc.press(CLEAR_KEY);
        assert!(calc.buffer.is_empty());
    }

    #[test]
    fn directly_edited_buffer_is_evaluated() {
        let mut calc = Calculator {
            buffer: "(1 + 2) ^ 2".into(),
        };
        calc.press(EQUALS_KEY);
        assert_eq!(calc.buffer, "9");
    }
}
