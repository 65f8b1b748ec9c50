use crate::alu;
use hack_asm::{Dest, Jump, Program};
use log::trace;
use thiserror::Error;

/// Addressable data memory (32K words)
pub const RAM_SIZE: usize = 0x8000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmuError {
    #[error("Memory access out of range at pc {pc}: address {address}")]
    AddressOutOfRange { pc: u16, address: u16 },

    #[error("Cycle limit of {limit} reached at pc {pc}")]
    CycleLimit { pc: u16, limit: u64 },
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program counter moved past the last ROM word
    Halted { cycles: u64 },
    /// The program reached a `(L) @L 0;JMP` idle loop
    Looping { pc: u16, cycles: u64 },
}

/// The Hack CPU with its instruction and data memories
pub struct Cpu {
    pub rom: Vec<u16>,
    pub ram: Vec<u16>,
    pub a: u16,
    pub d: u16,
    pub pc: u16,
    pub cycles: u64,
}

impl Cpu {
    pub fn new(rom: Vec<u16>) -> Self {
        Self {
            rom,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            cycles: 0,
        }
    }

    pub fn from_program(program: &Program) -> Self {
        Self::new(program.words.clone())
    }

    pub fn is_halted(&self) -> bool {
        self.pc as usize >= self.rom.len()
    }

    /// Read a RAM cell as a signed word
    pub fn peek(&self, address: u16) -> i16 {
        self.ram[address as usize % RAM_SIZE] as i16
    }

    pub fn poke(&mut self, address: u16, value: i16) {
        self.ram[address as usize % RAM_SIZE] = value as u16;
    }

    /// Execute a single instruction. Returns `false` once halted.
    pub fn step(&mut self) -> Result<bool, EmuError> {
        if self.is_halted() {
            return Ok(false);
        }

        let word = self.rom[self.pc as usize];
        self.cycles += 1;

        if word & 0x8000 == 0 {
            self.a = word;
            self.pc = self.pc.wrapping_add(1);
            return Ok(true);
        }

        let a_bit = word & 0x1000 != 0;
        let control = (word >> 6) & 0b111111;
        let dest = Dest::from_bits(word >> 3);
        let jump = word & 0b111;

        let y = if a_bit { self.read_m()? } else { self.a };
        let out = alu::compute(control, self.d, y);

        // Writes and the jump target all use A as it was before this cycle
        let address = self.a;
        if let Some(dest) = dest {
            if dest.writes_m() {
                self.write(address, out)?;
            }
            if dest.writes_a() {
                self.a = out;
            }
            if dest.writes_d() {
                self.d = out;
            }
        }

        if jump_taken(jump, out as i16) {
            trace!("pc {} jumps to {}", self.pc, address);
            self.pc = address;
        } else {
            self.pc = self.pc.wrapping_add(1);
        }

        Ok(true)
    }

    /// Run until the program halts, settles into an idle loop, or the cycle
    /// budget runs out
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, EmuError> {
        let start = self.cycles;

        loop {
            if self.is_halted() {
                return Ok(RunOutcome::Halted { cycles: self.cycles - start });
            }
            if self.at_idle_loop() {
                return Ok(RunOutcome::Looping { pc: self.pc, cycles: self.cycles - start });
            }
            if self.cycles - start >= max_cycles {
                return Err(EmuError::CycleLimit { pc: self.pc, limit: max_cycles });
            }
            self.step()?;
        }
    }

    /// `@n` at address n followed by an unconditional jump
    fn at_idle_loop(&self) -> bool {
        let pc = self.pc as usize;
        match (self.rom.get(pc), self.rom.get(pc + 1)) {
            (Some(&load), Some(&jump)) => {
                load == self.pc && jump & 0xE007 == 0xE000 | Jump::JMP.bits()
            }
            _ => false,
        }
    }

    fn read_m(&self) -> Result<u16, EmuError> {
        self.ram
            .get(self.a as usize)
            .copied()
            .ok_or(EmuError::AddressOutOfRange { pc: self.pc, address: self.a })
    }

    fn write(&mut self, address: u16, value: u16) -> Result<(), EmuError> {
        let pc = self.pc;
        let cell = self
            .ram
            .get_mut(address as usize)
            .ok_or(EmuError::AddressOutOfRange { pc, address })?;
        *cell = value;
        Ok(())
    }
}

fn jump_taken(jump: u16, out: i16) -> bool {
    let lt = jump & 0b100 != 0 && out < 0;
    let eq = jump & 0b010 != 0 && out == 0;
    let gt = jump & 0b001 != 0 && out > 0;
    lt || eq || gt
}

#[cfg(test)]
mod tests {
    use super::*;
    use hack_asm::assemble;
    use pretty_assertions::assert_eq;

    fn run_source(source: &str) -> Cpu {
        let program = assemble(source).unwrap();
        let mut cpu = Cpu::from_program(&program);
        cpu.run(10_000).unwrap();
        cpu
    }

    #[test]
    fn test_add_constants() {
        let cpu = run_source("@2\nD=A\n@3\nD=D+A\n@0\nM=D");
        assert_eq!(cpu.peek(0), 5);
        assert!(cpu.is_halted());
    }

    #[test]
    fn test_memory_destination_uses_old_a() {
        // AM=M+1 writes RAM[old A] and then loads A with the result
        let mut cpu = Cpu::new(assemble("@7\nAM=M+1\nM=-1").unwrap().words);
        cpu.poke(7, 40);
        cpu.run(10).unwrap();

        assert_eq!(cpu.peek(7), 41);
        assert_eq!(cpu.peek(41), -1);
    }

    #[test]
    fn test_conditional_jump() {
        let source = "@R0\nD=M\n@NEG\nD;JLT\n@R1\nM=1\n@END\n0;JMP\n(NEG)\n@R1\nM=-1\n(END)\n@END\n0;JMP";
        let program = assemble(source).unwrap();

        let mut cpu = Cpu::from_program(&program);
        cpu.poke(0, -3);
        let outcome = cpu.run(100).unwrap();
        assert!(matches!(outcome, RunOutcome::Looping { .. }));
        assert_eq!(cpu.peek(1), -1);

        let mut cpu = Cpu::from_program(&program);
        cpu.poke(0, 3);
        cpu.run(100).unwrap();
        assert_eq!(cpu.peek(1), 1);
    }

    #[test]
    fn test_cycle_limit() {
        let mut cpu = Cpu::new(assemble("(A)\n@B\n0;JMP\n(B)\n@A\n0;JMP").unwrap().words);
        assert_eq!(
            cpu.run(50).unwrap_err(),
            EmuError::CycleLimit { pc: cpu.pc, limit: 50 }
        );
    }

    #[test]
    fn test_out_of_range_access() {
        let mut cpu = Cpu::new(assemble("@32767\nD=A\nA=D+1\nM=1").unwrap().words);
        assert!(matches!(
            cpu.run(10),
            Err(EmuError::AddressOutOfRange { address: 32768, .. })
        ));
    }
}
