use crate::types::{Address, AsmError, Comp, Dest, Instruction, Jump, Line, SourceLine};
use crate::types::is_valid_symbol;

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Parse assembly text, dropping comments and blank lines.
    ///
    /// Errors are collected for every bad line rather than stopping at the
    /// first one.
    pub fn parse_source(&self, source: &str) -> Result<Vec<SourceLine>, Vec<AsmError>> {
        let mut parsed = Vec::new();
        let mut errors = Vec::new();

        for (i, line) in source.lines().enumerate() {
            match self.parse_line(line, i + 1) {
                Ok(Some(line)) => parsed.push(line),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(errors)
        }
    }

    fn parse_line(&self, line: &str, line_number: usize) -> Result<Option<SourceLine>, AsmError> {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };

        // Whitespace is insignificant inside an instruction
        let text: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if text.is_empty() {
            return Ok(None);
        }

        let line = if let Some(label) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            if !is_valid_symbol(label) {
                return Err(AsmError::InvalidSymbol { line: line_number, text: label.to_string() });
            }
            Line::Label(label.to_string())
        } else if let Some(operand) = text.strip_prefix('@') {
            let address = operand.parse::<Address>().map_err(|e| e.at_line(line_number))?;
            Line::Instruction(Instruction::A(address))
        } else {
            Line::Instruction(self.parse_compute(&text).map_err(|e| e.at_line(line_number))?)
        };

        Ok(Some(SourceLine { line, line_number }))
    }

    fn parse_compute(&self, text: &str) -> Result<Instruction, AsmError> {
        let (dest, rest) = match text.split_once('=') {
            Some((dest, rest)) => (Some(dest.parse::<Dest>()?), rest),
            None => (None, text),
        };

        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp, Some(jump.parse::<Jump>()?)),
            None => (rest, None),
        };

        if comp.is_empty() {
            return Err(AsmError::MissingComp { line: 0 });
        }

        Ok(Instruction::C {
            dest,
            comp: comp.parse::<Comp>()?,
            jump,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Line {
        let lines = Parser::new().parse_source(source).unwrap();
        assert_eq!(lines.len(), 1);
        lines[0].line.clone()
    }

    #[test]
    fn test_parse_a_instruction() {
        assert_eq!(parse_one("@21"), Line::Instruction(Instruction::at_value(21)));
        assert_eq!(parse_one("  @LCL  "), Line::Instruction(Instruction::at("LCL")));
    }

    #[test]
    fn test_parse_c_instruction() {
        assert_eq!(
            parse_one("AM=M-1"),
            Line::Instruction(Instruction::assign(Dest::AM, Comp::MMinusOne))
        );
        assert_eq!(
            parse_one("D;JNE"),
            Line::Instruction(Instruction::jump(Comp::D, Jump::JNE))
        );
        assert_eq!(
            parse_one("D = D - A"),
            Line::Instruction(Instruction::assign(Dest::D, Comp::DMinusA))
        );
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_one("(Main.main$LOOP)"), Line::Label("Main.main$LOOP".to_string()));
    }

    #[test]
    fn test_ignore_comments() {
        let lines = Parser::new()
            .parse_source("// header\n\n@SP // stack pointer\nM=M+1")
            .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_number, 3);
        assert_eq!(lines[1].line_number, 4);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let errors = Parser::new().parse_source("@SP\nD=Q\nX=D\n0;JUMP").unwrap_err();

        assert_eq!(
            errors,
            vec![
                AsmError::UnknownComp { line: 2, text: "Q".to_string() },
                AsmError::UnknownDest { line: 3, text: "X".to_string() },
                AsmError::UnknownJump { line: 4, text: "JUMP".to_string() },
            ]
        );
    }
}
