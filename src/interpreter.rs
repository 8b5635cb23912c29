use std::fmt::{Display, Formatter};
use std::io::{BufWriter, Write};

use log::debug;

use crate::binpl::{char_for_code, DecodeError, Instruction, Program};
use crate::parser::{classify, normalize, LineKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Region {
    Closed,
    Open,
}

struct RunState {
    region: Region,
    saw_start: bool,
    saw_end: bool,
    program_name: Option<String>,
}

impl RunState {
    fn new() -> Self {
        Self {
            region: Region::Closed,
            saw_start: false,
            saw_end: false,
            program_name: None,
        }
    }
}

#[derive(Debug)]
pub enum RunError {
    NestedStart { line: usize },
    UnmatchedEnd { line: usize },
    MissingStart,
    MissingEnd,
    Io(std::io::Error),
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::NestedStart { line } => {
                write!(f, "nested start marker encountered at line {line}")
            }
            RunError::UnmatchedEnd { line } => {
                write!(f, "::END at line {line} without a matching start marker")
            }
            RunError::MissingStart => write!(f, "missing start marker (::BEGIN or ::START)"),
            RunError::MissingEnd => write!(f, "missing ::END marker"),
            RunError::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Io(e)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RunReport {
    pub emitted: usize,
    pub skipped: usize,
    pub program_name: Option<String>,
}

pub struct Interpreter<W: Write, E: Write> {
    output: BufWriter<W>,
    diagnostics: E,
    state: RunState,
}

impl<W: Write, E: Write> Interpreter<W, E> {
    pub fn new(output: W, diagnostics: E) -> Self {
        Self {
            output: BufWriter::new(output),
            diagnostics,
            state: RunState::new(),
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<RunReport, RunError> {
        let mut emitted = 0;
        let mut skipped = 0;

        for (index, raw) in program.lines().enumerate() {
            let number = index + 1;
            let line = normalize(raw);
            if line.is_empty() {
                continue;
            }

            match classify(&line) {
                LineKind::Start { name } => {
                    if self.state.region == Region::Open {
                        return Err(RunError::NestedStart { line: number });
                    }
                    self.state.region = Region::Open;
                    self.state.saw_start = true;
                    if let Some(name) = name {
                        self.state.program_name = Some(name.to_string());
                        writeln!(self.diagnostics, "Starting program: {name}")?;
                    }
                    debug!("line {number}: region opened");
                }
                LineKind::End => {
                    if self.state.region == Region::Closed {
                        return Err(RunError::UnmatchedEnd { line: number });
                    }
                    self.state.region = Region::Closed;
                    self.state.saw_end = true;
                    debug!("line {number}: region closed, remaining lines ignored");
                    break;
                }
                LineKind::Body(body) => {
                    // Text outside the region is not executed.
                    if self.state.region == Region::Closed {
                        continue;
                    }
                    match Self::decode_line(body) {
                        Ok(c) => {
                            write!(self.output, "{c}")?;
                            emitted += 1;
                        }
                        Err(e) => {
                            skipped += 1;
                            writeln!(self.diagnostics, "line {number}: {e}")?;
                        }
                    }
                }
            }
        }

        if !self.state.saw_start {
            return Err(RunError::MissingStart);
        }
        if !self.state.saw_end {
            return Err(RunError::MissingEnd);
        }

        self.output.flush()?;
        debug!("run finished: {emitted} character(s) emitted, {skipped} line(s) skipped");

        Ok(RunReport {
            emitted,
            skipped,
            program_name: self.state.program_name.clone(),
        })
    }

    fn decode_line(line: &str) -> Result<char, DecodeError> {
        let instruction = Instruction::parse(line)?;
        let value = instruction.decode()?;
        debug!("decoded `{instruction}` to {value}");
        char_for_code(value)
    }
}
