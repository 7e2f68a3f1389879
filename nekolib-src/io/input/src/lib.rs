use std::io::{self, BufRead, BufReader, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input ended while a value was expected")]
    Eof,
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented reader that writes a prompt before every read.
pub struct Prompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    buf: Vec<u8>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer, buf: vec![] }
    }

    pub fn into_inner(self) -> (R, W) { (self.reader, self.writer) }

    /// Writes `prompt` and returns the next line without its line break.
    /// Bytes that are not valid UTF-8 become U+FFFD.
    pub fn prompt_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.say(prompt)?;
        self.next_line()
    }

    /// Writes `prompt`, then reads lines until one parses as `T` and passes
    /// `accept`, writing `retry` after each rejected line. Surrounding
    /// whitespace is ignored.
    pub fn prompt_parse<T, F>(
        &mut self,
        prompt: &str,
        retry: &str,
        mut accept: F,
    ) -> Result<T, InputError>
    where
        T: FromStr,
        F: FnMut(&T) -> bool,
    {
        self.say(prompt)?;
        loop {
            let line = self.next_line()?;
            match line.trim().parse() {
                Ok(val) if accept(&val) => return Ok(val),
                _ => {
                    debug!(input = %line, "rejected");
                    self.say(retry)?;
                }
            }
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }

    fn next_line(&mut self) -> Result<String, InputError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(InputError::Eof);
        }
        let line = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(String::from_utf8_lossy(line).into_owned())
    }
}

impl<'a> From<&'a str> for Prompter<BufReader<&'a [u8]>, Vec<u8>> {
    fn from(s: &'a str) -> Self {
        Prompter::new(BufReader::new(s.as_bytes()), vec![])
    }
}

#[cfg(test)]
mod tests {
    use crate::{InputError, Prompter};

    fn output<R: std::io::BufRead>(prompter: Prompter<R, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_inner().1).unwrap()
    }

    #[test]
    fn sanity_check() {
        let mut p = Prompter::from("12\n  34  \r\nhello, world\n");
        assert_eq!(p.prompt_parse::<u32, _>("a? ", "", |_| true).unwrap(), 12);
        assert_eq!(p.prompt_parse::<i64, _>("b? ", "", |_| true).unwrap(), 34);
        assert_eq!(p.prompt_line("c? ").unwrap(), "hello, world");
        assert!(matches!(p.prompt_line("d? "), Err(InputError::Eof)));
        assert_eq!(output(p), "a? b? c? d? ");
    }

    #[test]
    fn retry() {
        let mut p = Prompter::from("x\n-3\n0\n3 4\n\n7\n");
        let n = p
            .prompt_parse::<i32, _>("n? ", "again? ", |&n| n > 0)
            .unwrap();
        assert_eq!(n, 7);
        assert_eq!(output(p), "n? again? again? again? again? again? ");
    }

    #[test]
    fn eof_while_retrying() {
        let mut p = Prompter::from("nope\n");
        let res = p.prompt_parse::<u8, _>("n? ", "again? ", |_| true);
        assert!(matches!(res, Err(InputError::Eof)));
        assert_eq!(output(p), "n? again? ");
    }

    #[test]
    fn invalid_utf8() {
        let mut p = Prompter::new(&b"\xff\xfe\n12\nna\xefve\n"[..], vec![]);
        let n = p.prompt_parse::<u32, _>("n? ", "again? ", |_| true).unwrap();
        assert_eq!(n, 12);
        assert_eq!(p.prompt_line("s? ").unwrap(), "na\u{fffd}ve");
        assert_eq!(output(p), "n? again? s? ");
    }

    #[test]
    fn raw_lines() {
        let mut p = Prompter::from("  spaced  out \n\nlast");
        assert_eq!(p.prompt_line("").unwrap(), "  spaced  out ");
        assert_eq!(p.prompt_line("").unwrap(), "");
        assert_eq!(p.prompt_line("").unwrap(), "last");
    }
}
