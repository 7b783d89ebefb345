//! Six-digit one-time-password input.
//!
//! Models the verify-OTP screen as a small state machine: six single-digit
//! cells and a focus index. Views translate key and clipboard events into
//! the methods below and render [`OtpInput::cell`] and [`OtpInput::focus`].

use crate::forms::ValidationError;

/// Number of digits in a one-time password.
pub const OTP_LENGTH: usize = 6;

/// A complete, digits-only one-time password.
#[derive(Clone, PartialEq, Eq)]
pub struct Otp(String);

impl Otp {
    /// Parse a six-digit code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NonDigitOtp`] if any character is not a digit, or
    /// [`ValidationError::IncompleteOtp`] if there are not exactly six.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NonDigitOtp);
        }
        if code.len() != OTP_LENGTH {
            return Err(ValidationError::IncompleteOtp);
        }
        Ok(Self(code.to_owned()))
    }

    /// The code as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Otp([REDACTED])")
    }
}

/// State of the six OTP cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    cells: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    /// All cells empty, focus on the first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Digit in cell `index`, if any.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// Index of the focused cell.
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Move focus to `index` (e.g. the user clicked a cell).
    pub fn focus_cell(&mut self, index: usize) {
        self.focus = index.min(OTP_LENGTH - 1);
    }

    /// Apply typed input to cell `index`.
    ///
    /// An empty value clears the cell. A single digit fills it and moves
    /// focus right (unless it is the last cell). Anything else is rejected
    /// and nothing changes. Returns whether the input was accepted.
    pub fn input(&mut self, index: usize, value: &str) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                *cell = None;
                self.focus = index;
                true
            }
            (Some(digit), None) if digit.is_ascii_digit() => {
                *cell = Some(digit);
                self.focus = if index < OTP_LENGTH - 1 { index + 1 } else { index };
                true
            }
            _ => false,
        }
    }

    /// Handle backspace in cell `index`.
    ///
    /// A filled cell is cleared in place. On an empty cell, focus moves to
    /// the previous cell and that cell is cleared. Returns whether anything
    /// changed.
    pub fn backspace(&mut self, index: usize) -> bool {
        match self.cells.get(index).copied() {
            None => false,
            Some(Some(_)) => {
                if let Some(cell) = self.cells.get_mut(index) {
                    *cell = None;
                }
                self.focus = index;
                true
            }
            Some(None) if index > 0 => {
                let previous = index - 1;
                if let Some(cell) = self.cells.get_mut(previous) {
                    *cell = None;
                }
                self.focus = previous;
                true
            }
            Some(None) => false,
        }
    }

    /// Handle clipboard paste.
    ///
    /// The trimmed text must be one or more digits. Up to six of them fill
    /// the cells from the first, and focus lands on the last cell filled.
    /// Other text is rejected and nothing changes.
    pub fn paste(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let mut last = 0;
        for (index, (cell, digit)) in self.cells.iter_mut().zip(text.chars()).enumerate() {
            *cell = Some(digit);
            last = index;
        }
        self.focus = last;
        true
    }

    /// Whether every cell holds a digit, i.e. submit is enabled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Digits entered so far, in cell order.
    #[must_use]
    pub fn value(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    /// The complete code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::IncompleteOtp`] unless all six cells are filled.
    pub fn submit(&self) -> Result<Otp, ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::IncompleteOtp);
        }
        Otp::parse(&self.value())
    }

    /// Empty every cell and focus the first.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
