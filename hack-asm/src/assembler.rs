use crate::parser::Parser;
use crate::symbols::SymbolTable;
use crate::types::*;
use std::collections::HashMap;

/// Assembled machine code plus the final symbol table
#[derive(Debug, Clone)]
pub struct Program {
    pub words: Vec<u16>,
    pub symbols: HashMap<String, u16>,
}

impl Program {
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }
}

pub struct HackAssembler {
    parser: Parser,
}

impl HackAssembler {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub fn assemble(&self, source: &str) -> Result<Program, Vec<AsmError>> {
        let parsed = self.parser.parse_source(source)?;
        self.assemble_source_lines(&parsed)
    }

    pub fn assemble_lines(&self, lines: &[Line]) -> Result<Program, Vec<AsmError>> {
        let numbered: Vec<SourceLine> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| SourceLine { line: line.clone(), line_number: i + 1 })
            .collect();
        self.assemble_source_lines(&numbered)
    }

    fn assemble_source_lines(&self, lines: &[SourceLine]) -> Result<Program, Vec<AsmError>> {
        let mut symbols = SymbolTable::new();
        let mut errors = Vec::new();

        // Two-pass assembly
        self.first_pass(lines, &mut symbols, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        let words = self.second_pass(lines, &mut symbols);

        Ok(Program {
            words,
            symbols: symbols.into_map(),
        })
    }

    /// Bind every label to the ROM address of the instruction following it
    fn first_pass(&self, lines: &[SourceLine], symbols: &mut SymbolTable, errors: &mut Vec<AsmError>) {
        let mut rom_address: u16 = 0;

        for source_line in lines {
            match &source_line.line {
                Line::Label(name) => {
                    if symbols.contains(name) {
                        errors.push(AsmError::DuplicateLabel {
                            line: source_line.line_number,
                            label: name.clone(),
                        });
                    } else {
                        symbols.insert(name, rom_address);
                    }
                }
                Line::Instruction(_) => rom_address = rom_address.wrapping_add(1),
                Line::Comment(_) => {}
            }
        }
    }

    fn second_pass(&self, lines: &[SourceLine], symbols: &mut SymbolTable) -> Vec<u16> {
        let mut words = Vec::new();

        for source_line in lines {
            if let Line::Instruction(instruction) = &source_line.line {
                let resolved = match instruction {
                    Instruction::A(Address::Symbol(name)) => Some(symbols.resolve_or_allocate(name)),
                    _ => None,
                };
                words.push(instruction.encode(resolved));
            }
        }

        words
    }
}

impl Default for HackAssembler {
    fn default() -> Self {
        Self::new()
    }
}
