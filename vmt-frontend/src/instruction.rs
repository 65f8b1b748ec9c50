//! VM instruction definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vmt_common::{Diagnostic, SourceLocation};

/// Stack arithmetic and logic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// How an operator uses the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Pops two operands, pushes the result
    Binary,
    /// Rewrites the top of the stack in place
    Unary,
    /// Pops two operands, pushes true (-1) or false (0)
    Comparison,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 9] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Neg,
        ArithmeticOp::Eq,
        ArithmeticOp::Gt,
        ArithmeticOp::Lt,
        ArithmeticOp::And,
        ArithmeticOp::Or,
        ArithmeticOp::Not,
    ];

    pub fn kind(self) -> OpKind {
        match self {
            ArithmeticOp::Add | ArithmeticOp::Sub | ArithmeticOp::And | ArithmeticOp::Or => {
                OpKind::Binary
            }
            ArithmeticOp::Neg | ArithmeticOp::Not => OpKind::Unary,
            ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt => OpKind::Comparison,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }
}

impl FromStr for ArithmeticOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArithmeticOp::ALL
            .iter()
            .copied()
            .find(|op| op.to_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Named memory segments addressable by push and pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    pub fn to_str(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
            Segment::Static => "static",
        }
    }
}

impl FromStr for Segment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Segment::Constant),
            "local" => Ok(Segment::Local),
            "argument" => Ok(Segment::Argument),
            "this" => Ok(Segment::This),
            "that" => Ok(Segment::That),
            "temp" => Ok(Segment::Temp),
            "pointer" => Ok(Segment::Pointer),
            "static" => Ok(Segment::Static),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// One VM instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Instruction {
    Arithmetic { op: ArithmeticOp },
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label { name: String },
    Goto { name: String },
    IfGoto { name: String },
    Function { name: String, n_locals: u16 },
    Call { name: String, n_args: u16 },
    Return,
    /// A line whose first word is not an instruction keyword
    Malformed { text: String },
}

impl Instruction {
    /// Net change in stack depth once this instruction has executed.
    ///
    /// For `call` this is the change seen by the caller after the callee
    /// has returned. `return` leaves the current frame entirely, so it has
    /// no delta within it.
    pub fn stack_delta(&self) -> Option<i32> {
        let delta = match self {
            Instruction::Arithmetic { op } => match op.kind() {
                OpKind::Binary | OpKind::Comparison => -1,
                OpKind::Unary => 0,
            },
            Instruction::Push { .. } => 1,
            Instruction::Pop { .. } => -1,
            Instruction::Label { .. } | Instruction::Goto { .. } => 0,
            Instruction::IfGoto { .. } => -1,
            Instruction::Function { n_locals, .. } => i32::from(*n_locals),
            Instruction::Call { n_args, .. } => 1 - i32::from(*n_args),
            Instruction::Return => return None,
            Instruction::Malformed { .. } => 0,
        };
        Some(delta)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Instruction::Malformed { .. })
    }

    /// The label or function name an instruction refers to
    pub fn target_name(&self) -> Option<&str> {
        match self {
            Instruction::Label { name }
            | Instruction::Goto { name }
            | Instruction::IfGoto { name }
            | Instruction::Function { name, .. }
            | Instruction::Call { name, .. } => Some(name),
            Instruction::Arithmetic { .. }
            | Instruction::Push { .. }
            | Instruction::Pop { .. }
            | Instruction::Return
            | Instruction::Malformed { .. } => None,
        }
    }

    /// Whether this instruction defines the function with the given name
    pub fn defines_function(&self, function: &str) -> bool {
        matches!(self, Instruction::Function { name, .. } if name == function)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Arithmetic { op } => write!(f, "{}", op),
            Instruction::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Instruction::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Instruction::Label { name } => write!(f, "label {}", name),
            Instruction::Goto { name } => write!(f, "goto {}", name),
            Instruction::IfGoto { name } => write!(f, "if-goto {}", name),
            Instruction::Function { name, n_locals } => write!(f, "function {} {}", name, n_locals),
            Instruction::Call { name, n_args } => write!(f, "call {} {}", name, n_args),
            Instruction::Return => write!(f, "return"),
            Instruction::Malformed { text } => write!(f, "{}", text),
        }
    }
}

/// An instruction and the line it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInstruction {
    pub instruction: Instruction,
    pub location: SourceLocation,
}

/// A parsed VM module (one `.vm` file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmModule {
    pub name: String,
    pub instructions: Vec<ParsedInstruction>,
    /// Problems the parser tolerated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl VmModule {
    pub fn defines_function(&self, function: &str) -> bool {
        self.instructions
            .iter()
            .any(|parsed| parsed.instruction.defines_function(function))
    }

    pub fn malformed(&self) -> impl Iterator<Item = &ParsedInstruction> {
        self.instructions
            .iter()
            .filter(|parsed| parsed.instruction.is_malformed())
    }
}
