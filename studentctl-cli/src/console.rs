//! Line-oriented prompting over any reader/writer pair
//!
//! Malformed numbers are re-prompted a bounded number of times instead of
//! aborting the process.

use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Attempts allowed per numeric field before the flow is cancelled
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Input reached end of file
    #[error("input closed")]
    Closed,

    /// Every attempt at a numeric field was malformed
    #[error("no valid {field} after {attempts} attempts")]
    TooManyAttempts { field: &'static str, attempts: usize },

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub struct Console<R, W> {
    input: R,
    output: W,
    max_attempts: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the per-field attempt limit (at least one)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Print one line
    pub fn say(&mut self, line: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print a prompt and read one trimmed line
    pub fn prompt_text(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_owned())
    }

    /// Prompt until a whole number is entered or attempts run out
    pub fn prompt_int(&mut self, prompt: &str, field: &'static str) -> Result<i32, PromptError> {
        for _ in 0..self.max_attempts {
            match self.prompt_text(prompt)?.parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a valid whole number.")?,
            }
        }

        Err(PromptError::TooManyAttempts {
            field,
            attempts: self.max_attempts,
        })
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn text_is_trimmed() {
        let mut c = console("  Alice Smith \r\n");
        assert_eq!(c.prompt_text("Enter Name: ").unwrap(), "Alice Smith");
        assert_eq!(output(c), "Enter Name: ");
    }

    #[test]
    fn int_reprompts_until_valid() {
        let mut c = console("twenty\n20\n");
        assert_eq!(c.prompt_int("Enter Age: ", "age").unwrap(), 20);
        assert_eq!(
            output(c),
            "Enter Age: Please enter a valid whole number.\nEnter Age: "
        );
    }

    #[test]
    fn int_gives_up_after_max_attempts() {
        let mut c = console("a\nb\nc\n42\n");
        let err = c.prompt_int("Enter ID: ", "id").unwrap_err();
        assert!(matches!(
            err,
            PromptError::TooManyAttempts {
                field: "id",
                attempts: 3
            }
        ));
    }

    #[test]
    fn custom_attempt_limit() {
        let mut c = console("x\n7\n").with_max_attempts(1);
        assert!(matches!(
            c.prompt_int("Enter ID: ", "id"),
            Err(PromptError::TooManyAttempts { attempts: 1, .. })
        ));

        let c = console("").with_max_attempts(0);
        assert_eq!(c.max_attempts, 1);
    }

    #[test]
    fn out_of_range_int_is_rejected() {
        let mut c = console("99999999999\n-5\n");
        assert_eq!(c.prompt_int("Enter Age: ", "age").unwrap(), -5);
    }

    #[test]
    fn eof_is_closed() {
        let mut c = console("");
        assert!(matches!(c.prompt_text("> "), Err(PromptError::Closed)));

        let mut c = console("abc\n");
        assert!(matches!(c.prompt_int("> ", "id"), Err(PromptError::Closed)));
    }
}
