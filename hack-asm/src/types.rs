use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest value an A-instruction can load (15 bits)
pub const MAX_ADDRESS_VALUE: u16 = 0x7FFF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Line {line}: unknown computation `{text}`")]
    UnknownComp { line: usize, text: String },

    #[error("Line {line}: unknown destination `{text}`")]
    UnknownDest { line: usize, text: String },

    #[error("Line {line}: unknown jump `{text}`")]
    UnknownJump { line: usize, text: String },

    #[error("Line {line}: value {value} does not fit in an A-instruction")]
    ValueOutOfRange { line: usize, value: String },

    #[error("Line {line}: invalid symbol `{text}`")]
    InvalidSymbol { line: usize, text: String },

    #[error("Line {line}: label `{label}` is already defined")]
    DuplicateLabel { line: usize, label: String },

    #[error("Line {line}: instruction has no computation")]
    MissingComp { line: usize },
}

impl AsmError {
    /// Rewrite the line number of an error produced without line context
    pub fn at_line(self, line: usize) -> Self {
        match self {
            AsmError::UnknownComp { text, .. } => AsmError::UnknownComp { line, text },
            AsmError::UnknownDest { text, .. } => AsmError::UnknownDest { line, text },
            AsmError::UnknownJump { text, .. } => AsmError::UnknownJump { line, text },
            AsmError::ValueOutOfRange { value, .. } => AsmError::ValueOutOfRange { line, value },
            AsmError::InvalidSymbol { text, .. } => AsmError::InvalidSymbol { line, text },
            AsmError::DuplicateLabel { label, .. } => AsmError::DuplicateLabel { line, label },
            AsmError::MissingComp { .. } => AsmError::MissingComp { line },
        }
    }
}

/// Destination field of a C-instruction (d1 = A, d2 = D, d3 = M)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    pub fn bits(self) -> u16 {
        match self {
            Dest::M => 0b001,
            Dest::D => 0b010,
            Dest::MD => 0b011,
            Dest::A => 0b100,
            Dest::AM => 0b101,
            Dest::AD => 0b110,
            Dest::AMD => 0b111,
        }
    }

    /// Decode the three d-bits of a C-instruction; `None` for no destination
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits & 0b111 {
            0b001 => Some(Dest::M),
            0b010 => Some(Dest::D),
            0b011 => Some(Dest::MD),
            0b100 => Some(Dest::A),
            0b101 => Some(Dest::AM),
            0b110 => Some(Dest::AD),
            0b111 => Some(Dest::AMD),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        }
    }

    pub fn writes_a(self) -> bool {
        self.bits() & 0b100 != 0
    }

    pub fn writes_d(self) -> bool {
        self.bits() & 0b010 != 0
    }

    pub fn writes_m(self) -> bool {
        self.bits() & 0b001 != 0
    }
}

impl FromStr for Dest {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Dest::M),
            "D" => Ok(Dest::D),
            "MD" | "DM" => Ok(Dest::MD),
            "A" => Ok(Dest::A),
            "AM" | "MA" => Ok(Dest::AM),
            "AD" | "DA" => Ok(Dest::AD),
            "AMD" | "ADM" | "MAD" | "MDA" | "DAM" | "DMA" => Ok(Dest::AMD),
            _ => Err(AsmError::UnknownDest { line: 0, text: s.to_string() }),
        }
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Jump field of a C-instruction, tested against the ALU output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub fn bits(self) -> u16 {
        match self {
            Jump::JGT => 0b001,
            Jump::JEQ => 0b010,
            Jump::JGE => 0b011,
            Jump::JLT => 0b100,
            Jump::JNE => 0b101,
            Jump::JLE => 0b110,
            Jump::JMP => 0b111,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Jump::JGT => "JGT",
            Jump::JEQ => "JEQ",
            Jump::JGE => "JGE",
            Jump::JLT => "JLT",
            Jump::JNE => "JNE",
            Jump::JLE => "JLE",
            Jump::JMP => "JMP",
        }
    }
}

impl FromStr for Jump {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JGT" => Ok(Jump::JGT),
            "JEQ" => Ok(Jump::JEQ),
            "JGE" => Ok(Jump::JGE),
            "JLT" => Ok(Jump::JLT),
            "JNE" => Ok(Jump::JNE),
            "JLE" => Ok(Jump::JLE),
            "JMP" => Ok(Jump::JMP),
            _ => Err(AsmError::UnknownJump { line: 0, text: s.to_string() }),
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// ALU computation of a C-instruction.
///
/// Variants reading `M` set the a-bit, so the ALU's y input is RAM[A]
/// instead of the A register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Zero,
    One,
    MinusOne,
    D,
    A,
    NotD,
    NotA,
    NegD,
    NegA,
    DPlusOne,
    APlusOne,
    DMinusOne,
    AMinusOne,
    DPlusA,
    DMinusA,
    AMinusD,
    DAndA,
    DOrA,
    M,
    NotM,
    NegM,
    MPlusOne,
    MMinusOne,
    DPlusM,
    DMinusM,
    MMinusD,
    DAndM,
    DOrM,
}

// (comp, mnemonic, a-bit followed by c1..c6)
const COMP_TABLE: [(Comp, &str, u16); 28] = [
    (Comp::Zero, "0", 0b0_101010),
    (Comp::One, "1", 0b0_111111),
    (Comp::MinusOne, "-1", 0b0_111010),
    (Comp::D, "D", 0b0_001100),
    (Comp::A, "A", 0b0_110000),
    (Comp::NotD, "!D", 0b0_001101),
    (Comp::NotA, "!A", 0b0_110001),
    (Comp::NegD, "-D", 0b0_001111),
    (Comp::NegA, "-A", 0b0_110011),
    (Comp::DPlusOne, "D+1", 0b0_011111),
    (Comp::APlusOne, "A+1", 0b0_110111),
    (Comp::DMinusOne, "D-1", 0b0_001110),
    (Comp::AMinusOne, "A-1", 0b0_110010),
    (Comp::DPlusA, "D+A", 0b0_000010),
    (Comp::DMinusA, "D-A", 0b0_010011),
    (Comp::AMinusD, "A-D", 0b0_000111),
    (Comp::DAndA, "D&A", 0b0_000000),
    (Comp::DOrA, "D|A", 0b0_010101),
    (Comp::M, "M", 0b1_110000),
    (Comp::NotM, "!M", 0b1_110001),
    (Comp::NegM, "-M", 0b1_110011),
    (Comp::MPlusOne, "M+1", 0b1_110111),
    (Comp::MMinusOne, "M-1", 0b1_110010),
    (Comp::DPlusM, "D+M", 0b1_000010),
    (Comp::DMinusM, "D-M", 0b1_010011),
    (Comp::MMinusD, "M-D", 0b1_000111),
    (Comp::DAndM, "D&M", 0b1_000000),
    (Comp::DOrM, "D|M", 0b1_010101),
];

impl Comp {
    fn entry(self) -> &'static (Comp, &'static str, u16) {
        COMP_TABLE
            .iter()
            .find(|(comp, _, _)| *comp == self)
            .unwrap_or(&COMP_TABLE[0])
    }

    /// The a-bit and the six control bits, as laid out in bits 12..6 of a
    /// C-instruction
    pub fn bits(self) -> u16 {
        self.entry().2
    }

    pub fn to_str(self) -> &'static str {
        self.entry().1
    }

    pub fn reads_memory(self) -> bool {
        self.bits() & 0b1_000000 != 0
    }

}

impl FromStr for Comp {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Commutative operators are accepted in either order
        let canonical = match s {
            "1+D" => "D+1",
            "1+A" => "A+1",
            "1+M" => "M+1",
            "A+D" => "D+A",
            "M+D" => "D+M",
            "A&D" => "D&A",
            "M&D" => "D&M",
            "A|D" => "D|A",
            "M|D" => "D|M",
            other => other,
        };

        COMP_TABLE
            .iter()
            .find(|(_, text, _)| *text == canonical)
            .map(|(comp, _, _)| *comp)
            .ok_or_else(|| AsmError::UnknownComp { line: 0, text: s.to_string() })
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Operand of an A-instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Value(u16),
    Symbol(String),
}

impl Address {
    pub fn symbol(name: impl Into<String>) -> Self {
        Address::Symbol(name.into())
    }
}

impl FromStr for Address {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return match s.parse::<u16>() {
                Ok(value) if value <= MAX_ADDRESS_VALUE => Ok(Address::Value(value)),
                _ => Err(AsmError::ValueOutOfRange { line: 0, value: s.to_string() }),
            };
        }

        if is_valid_symbol(s) {
            Ok(Address::Symbol(s.to_string()))
        } else {
            Err(AsmError::InvalidSymbol { line: 0, text: s.to_string() })
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Value(value) => write!(f, "{}", value),
            Address::Symbol(name) => f.write_str(name),
        }
    }
}

/// Symbols are letters, digits, `_`, `.`, `$` and `:`, not starting with a digit
pub fn is_valid_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_digit() && is_symbol_char(first) => {
            chars.all(is_symbol_char)
        }
        _ => false,
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

/// A single machine instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `@value` - loads a constant or symbol address into A
    A(Address),
    /// `dest=comp;jump`
    C {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

impl Instruction {
    pub fn at(symbol: impl Into<String>) -> Self {
        Instruction::A(Address::symbol(symbol))
    }

    pub fn at_value(value: u16) -> Self {
        Instruction::A(Address::Value(value))
    }

    /// `dest=comp`
    pub fn assign(dest: Dest, comp: Comp) -> Self {
        Instruction::C { dest: Some(dest), comp, jump: None }
    }

    /// `comp;jump`
    pub fn jump(comp: Comp, jump: Jump) -> Self {
        Instruction::C { dest: None, comp, jump: Some(jump) }
    }

    /// Encode into a 16-bit word; symbols must already be resolved
    pub fn encode(&self, resolved_address: Option<u16>) -> u16 {
        match self {
            Instruction::A(Address::Value(value)) => value & MAX_ADDRESS_VALUE,
            Instruction::A(Address::Symbol(_)) => resolved_address.unwrap_or(0) & MAX_ADDRESS_VALUE,
            Instruction::C { dest, comp, jump } => {
                0b111 << 13
                    | comp.bits() << 6
                    | dest.map_or(0, Dest::bits) << 3
                    | jump.map_or(0, Jump::bits)
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::A(address) => write!(f, "@{}", address),
            Instruction::C { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
        }
    }
}

/// One line of an assembly listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Instruction(Instruction),
    /// `(NAME)` - binds NAME to the address of the next instruction
    Label(String),
    Comment(String),
}

impl Line {
    pub fn is_instruction(&self) -> bool {
        matches!(self, Line::Instruction(_))
    }
}

impl From<Instruction> for Line {
    fn from(instruction: Instruction) -> Self {
        Line::Instruction(instruction)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Instruction(instruction) => write!(f, "{}", instruction),
            Line::Label(name) => write!(f, "({})", name),
            Line::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// A parsed line together with its position in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub line: Line,
    pub line_number: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comp_round_trip_through_text() {
        for (comp, text, _) in COMP_TABLE.iter() {
            assert_eq!(comp.to_str(), *text);
            assert_eq!(text.parse::<Comp>().unwrap(), *comp);
        }
    }

    #[test]
    fn test_comp_aliases() {
        assert_eq!("M+D".parse::<Comp>().unwrap(), Comp::DPlusM);
        assert_eq!("A|D".parse::<Comp>().unwrap(), Comp::DOrA);
        assert!("D*M".parse::<Comp>().is_err());
    }

    #[test]
    fn test_memory_comps_set_a_bit() {
        assert!(Comp::M.reads_memory());
        assert!(Comp::MMinusD.reads_memory());
        assert!(!Comp::A.reads_memory());
        assert!(!Comp::Zero.reads_memory());
    }

    #[test]
    fn test_dest_fields() {
        assert!(Dest::AM.writes_a());
        assert!(Dest::AM.writes_m());
        assert!(!Dest::AM.writes_d());
        assert_eq!("DM".parse::<Dest>().unwrap(), Dest::MD);

        for dest in ["M", "D", "MD", "A", "AM", "AD", "AMD"] {
            let dest = dest.parse::<Dest>().unwrap();
            assert_eq!(Dest::from_bits(dest.bits()), Some(dest));
        }
        assert_eq!(Dest::from_bits(0), None);
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(Instruction::at("SP").to_string(), "@SP");
        assert_eq!(Instruction::at_value(256).to_string(), "@256");
        assert_eq!(Instruction::assign(Dest::AM, Comp::MMinusOne).to_string(), "AM=M-1");
        assert_eq!(Instruction::jump(Comp::Zero, Jump::JMP).to_string(), "0;JMP");
        assert_eq!(Line::Label("LOOP".to_string()).to_string(), "(LOOP)");
        assert_eq!(Line::Comment("push constant 7".to_string()).to_string(), "// push constant 7");
    }

    #[test]
    fn test_encode_known_words() {
        // Reference encodings from the Hack machine language definition
        assert_eq!(Instruction::at_value(2).encode(None), 0b0000_0000_0000_0010);
        assert_eq!(Instruction::assign(Dest::D, Comp::A).encode(None), 0b1110_1100_0001_0000);
        assert_eq!(Instruction::assign(Dest::D, Comp::DPlusA).encode(None), 0b1110_0000_1001_0000);
        assert_eq!(Instruction::assign(Dest::M, Comp::D).encode(None), 0b1110_0011_0000_1000);
        assert_eq!(Instruction::jump(Comp::Zero, Jump::JMP).encode(None), 0b1110_1010_1000_0111);
        assert_eq!(Instruction::assign(Dest::AM, Comp::MMinusOne).encode(None), 0b1111_1100_1010_1000);
    }

    #[test]
    fn test_address_parsing() {
        assert_eq!("17".parse::<Address>().unwrap(), Address::Value(17));
        assert_eq!("Main.3".parse::<Address>().unwrap(), Address::symbol("Main.3"));
        assert_eq!("f$ret.0".parse::<Address>().unwrap(), Address::symbol("f$ret.0"));
        assert!("32768".parse::<Address>().is_err());
        assert!("a-b".parse::<Address>().is_err());
    }

    #[test]
    fn test_symbol_rules() {
        assert!(is_valid_symbol("$ret.0"));
        assert!(is_valid_symbol("Sys.init"));
        assert!(!is_valid_symbol("1abc"));
        assert!(!is_valid_symbol(""));
    }
}
