//! Hack CPU emulator
//!
//! Executes assembled Hack machine code one instruction per cycle. Used to
//! check translated VM programs by running them and inspecting RAM.

pub mod alu;
pub mod cpu;

pub use cpu::{Cpu, EmuError, RunOutcome, RAM_SIZE};
