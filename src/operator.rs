use std::io::{self, BufRead, Write};

/// Where the interactive grant talks to a human.
pub trait OperatorPort {
    /// Displays an informational line.
    fn show(&mut self, text: &str);

    /// Writes `text` without a newline and blocks for one line of input.
    /// The returned line has its trailing line terminator removed.
    fn prompt_line(&mut self, text: &str) -> io::Result<String>;
}

/// Operator I/O over an arbitrary reader and writer.
#[derive(Debug)]
pub struct StreamPort<R, W> {
    input: R,
    output: W,
}

impl<R, W> StreamPort<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        StreamPort { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R, W> OperatorPort for StreamPort<R, W>
where
    R: BufRead,
    W: Write,
{
    fn show(&mut self, text: &str) {
        // write failures surface on the next prompt_line
        let _ = writeln!(self.output, "{}", text);
    }

    fn prompt_line(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a line was entered",
            ));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// The process terminal.
pub type ConsolePort = StreamPort<io::StdinLock<'static>, io::Stdout>;

impl ConsolePort {
    pub fn console() -> Self {
        StreamPort::new(io::stdin().lock(), io::stdout())
    }
}
