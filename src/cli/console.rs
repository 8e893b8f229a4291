//! Terminal input and output
//!
//! Commands and secrets come from the same input. On a terminal, secrets
//! are read without echo through `rpassword`; when input is piped each
//! secret is simply the next line.

use std::io::{self, BufRead, IsTerminal, Stdin, StdinLock, Stdout, Write};

use crate::crypto::SecureString;
use crate::error::{AbaError, AbaResult};
use crate::services::SecretPrompt;

/// Line-oriented console
pub struct Console<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console on the process's stdin and stdout
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self::new(stdin.lock(), io::stdout(), interactive)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Print a prompt and read one line, without its line ending
    ///
    /// Returns `None` at end of input. A line that is not UTF-8 is a
    /// `Validation` error; the input stays usable.
    pub fn read_line(&mut self, prompt: &str) -> AbaResult<Option<String>> {
        self.read_raw_line(prompt)?.map(decode_line).transpose()
    }

    /// Like [`Console::read_line`] but leaves decoding to the caller
    pub fn read_raw_line(&mut self, prompt: &str) -> AbaResult<Option<Vec<u8>>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }

        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Print a line
    pub fn say(&mut self, text: &str) -> AbaResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

/// Decode one input line
pub(crate) fn decode_line(bytes: Vec<u8>) -> AbaResult<String> {
    String::from_utf8(bytes).map_err(|_| AbaError::Validation("Input is not valid UTF-8".into()))
}

impl<R: BufRead, W: Write> SecretPrompt for Console<R, W> {
    fn read_secret(&mut self, prompt: &str) -> AbaResult<SecureString> {
        if self.interactive {
            self.output.flush()?;
            return rpassword::prompt_password(prompt)
                .map(SecureString::from)
                .map_err(|e| AbaError::Io(format!("Failed to read password: {}", e)));
        }

        match self.read_line(prompt)? {
            Some(line) => {
                writeln!(self.output)?;
                Ok(SecureString::from(line))
            }
            None => Err(AbaError::Io("Failed to read password: end of input".into())),
        }
    }

    fn notice(&mut self, text: &str) {
        // A failed notice is not worth aborting a login over
        let _ = writeln!(self.output, "{}", text);
    }
}
