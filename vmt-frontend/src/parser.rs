//! VM code parser
//!
//! The first word of a line selects the instruction; the remaining words are
//! its operands. Lines starting with an unknown word become
//! [`Instruction::Malformed`] and are left for the driver to report. Operands
//! that cannot be read are fatal for the module.

use crate::instruction::{ArithmeticOp, Instruction, ParsedInstruction, Segment, VmModule};
use crate::lexer::LineTokens;
use log::{trace, warn};
use thiserror::Error;
use vmt_common::{Diagnostic, SourceLocation};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{location}: `{token}` is not a valid integer operand for `{keyword}`")]
    InvalidInteger {
        location: SourceLocation,
        keyword: String,
        token: String,
    },

    #[error("{location}: `{keyword}` is missing its {operand} operand")]
    MissingOperand {
        location: SourceLocation,
        keyword: String,
        operand: &'static str,
    },

    #[error("{location}: unknown memory segment `{segment}`")]
    UnknownSegment {
        location: SourceLocation,
        segment: String,
    },
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::InvalidInteger { location, .. }
            | ParseError::MissingOperand { location, .. }
            | ParseError::UnknownSegment { location, .. } => location,
        }
    }
}

pub struct Parser {
    module_name: String,
    diagnostics: Vec<Diagnostic>,
}

/// Operands of one line, consumed left to right
struct Operands<'a> {
    keyword: &'a str,
    rest: std::slice::Iter<'a, String>,
    location: &'a SourceLocation,
}

impl<'a> Operands<'a> {
    fn word(&mut self, operand: &'static str) -> Result<&'a str, ParseError> {
        self.rest
            .next()
            .map(String::as_str)
            .ok_or_else(|| ParseError::MissingOperand {
                location: self.location.clone(),
                keyword: self.keyword.to_string(),
                operand,
            })
    }

    fn integer(&mut self, operand: &'static str) -> Result<u16, ParseError> {
        let token = self.word(operand)?;
        token.parse::<u16>().map_err(|_| ParseError::InvalidInteger {
            location: self.location.clone(),
            keyword: self.keyword.to_string(),
            token: token.to_string(),
        })
    }

    fn segment(&mut self) -> Result<Segment, ParseError> {
        let token = self.word("segment")?;
        token.parse::<Segment>().map_err(|_| ParseError::UnknownSegment {
            location: self.location.clone(),
            segment: token.to_string(),
        })
    }

    fn leftover(&mut self) -> Vec<&'a str> {
        self.rest.by_ref().map(String::as_str).collect()
    }
}

impl Parser {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse the lexed lines of one module
    pub fn parse(mut self, lines: Vec<LineTokens>) -> Result<VmModule, ParseError> {
        let mut instructions = Vec::with_capacity(lines.len());

        for line in &lines {
            let location = SourceLocation::new(&self.module_name, line.line);
            let instruction = self.parse_line(line, &location)?;
            trace!("{}: {}", location, instruction);
            instructions.push(ParsedInstruction { instruction, location });
        }

        Ok(VmModule {
            name: self.module_name,
            instructions,
            diagnostics: self.diagnostics,
        })
    }

    fn parse_line(&mut self, line: &LineTokens, location: &SourceLocation) -> Result<Instruction, ParseError> {
        let Some((keyword, rest)) = line.words.split_first() else {
            return Ok(Instruction::Malformed { text: String::new() });
        };

        let mut operands = Operands {
            keyword,
            rest: rest.iter(),
            location,
        };

        let instruction = match keyword.as_str() {
            "push" => Instruction::Push {
                segment: operands.segment()?,
                index: operands.integer("index")?,
            },
            "pop" => Instruction::Pop {
                segment: operands.segment()?,
                index: operands.integer("index")?,
            },
            "label" => Instruction::Label {
                name: operands.word("label")?.to_string(),
            },
            "goto" => Instruction::Goto {
                name: operands.word("label")?.to_string(),
            },
            "if-goto" => Instruction::IfGoto {
                name: operands.word("label")?.to_string(),
            },
            "function" => Instruction::Function {
                name: operands.word("function name")?.to_string(),
                n_locals: operands.integer("local count")?,
            },
            "call" => Instruction::Call {
                name: operands.word("function name")?.to_string(),
                n_args: operands.integer("argument count")?,
            },
            "return" => Instruction::Return,
            other => match other.parse::<ArithmeticOp>() {
                Ok(op) => Instruction::Arithmetic { op },
                Err(()) => return Ok(Instruction::Malformed { text: line.text() }),
            },
        };

        let leftover = operands.leftover();
        if !leftover.is_empty() {
            let message = format!("ignoring extra operands `{}` after `{}`", leftover.join(" "), instruction);
            self.warn(location, message);
        }

        if let Some(name) = instruction.target_name() {
            if !is_identifier(name) {
                self.warn(location, format!("`{}` is not a valid identifier", name));
            }
        }

        Ok(instruction)
    }

    fn warn(&mut self, location: &SourceLocation, message: String) {
        warn!("{}: {}", location, message);
        self.diagnostics.push(Diagnostic::warning(message, location.clone()));
    }
}

/// Letters, digits, `_`, `.` and `:`, not starting with a digit
fn is_identifier(name: &str) -> bool {
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':');
    match name.chars().next() {
        Some(first) if !first.is_ascii_digit() => name.chars().all(is_name_char),
        _ => false,
    }
}
