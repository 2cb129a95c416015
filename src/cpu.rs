use crate::decoder::{Decoder, INSN_WIDTH};
use crate::disasm::fmt_decoded;
use crate::exec::Executor;
use crate::memory::{Bus, BusError, MEMORY_SIZE};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub memory_size: usize,
    /// Halt on unknown opcodes/sub-ops instead of skipping them.
    pub trap_unimplemented: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            memory_size: MEMORY_SIZE,
            trap_unimplemented: true,
        }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags: u32 {
const C = 1 << 0; // Carry / borrow / shifted-out bit
const P = 1 << 1; // Parity, set when even
const Z = 1 << 2; // Zero
const S = 1 << 3; // Sign
}
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    #[error("Misaligned pc {pc:#010x}")]
    Misaligned { pc: u32 },
    #[error("Bus error at {addr:#010x}: {source}")]
    Bus { addr: u32, #[source] source: BusError },
    #[error("Unimplemented opcode {opcode:#04x} (operand {operand:#06x}) at {pc:#010x}")]
    Unimplemented { pc: u32, opcode: u8, operand: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    Halt,
    Fault(Fault),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Running,
    Halted(HaltReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Halted { steps: u64 },
    BudgetExhausted { steps: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u32,
    pub flags: Flags,
    pub gpr: [u32; 16], // r0..r9, ra..rf
    pub status: Status,
    pub cfg: CpuConfig,
}

impl Cpu {
    pub fn new(cfg: CpuConfig) -> Self {
        Self {
            pc: 0,
            flags: Flags::empty(),
            gpr: [0; 16],
            status: Status::Running,
            cfg,
        }
    }

    /// Clears every register and flag and resumes at `reset_pc`.
    pub fn reset(&mut self, reset_pc: u32) {
        self.pc = reset_pc;
        self.flags = Flags::empty();
        self.gpr = [0; 16];
        self.status = Status::Running;
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.status, Status::Halted(_))
    }

    /// Flag word as shown by the monitor: sign, zero, parity, carry nibbles.
    pub fn flag_word(&self) -> u32 {
        let bit = |f: Flags| u32::from(self.flags.contains(f));
        (bit(Flags::S) << 12) | (bit(Flags::Z) << 8) | (bit(Flags::P) << 4) | bit(Flags::C)
    }

    pub fn step<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<Step, Fault> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }
        match self.try_step(bus, dec, exec) {
            Ok(Step::Halt) => {
                self.status = Status::Halted(HaltReason::Halt);
                Ok(Step::Halt)
            }
            Ok(Step::Continue) => Ok(Step::Continue),
            Err(fault) => {
                warn!(%fault, "cpu halted on fault");
                self.status = Status::Halted(HaltReason::Fault(fault.clone()));
                Err(fault)
            }
        }
    }

    fn try_step<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<Step, Fault> {
        let pc = self.pc;
        if pc % INSN_WIDTH != 0 {
            return Err(Fault::Misaligned { pc });
        }
        let raw32 = bus
            .read_u32(pc)
            .map_err(|source| Fault::Bus { addr: pc, source })?;
        let Some(d) = dec.decode(raw32) else {
            let [opcode, lo, hi, _] = raw32.to_le_bytes();
            let operand = u16::from_le_bytes([lo, hi]);
            if self.cfg.trap_unimplemented {
                return Err(Fault::Unimplemented { pc, opcode, operand });
            }
            trace!(pc, opcode, operand, "skipping unimplemented opcode");
            self.pc = pc.wrapping_add(INSN_WIDTH);
            return Ok(Step::Continue);
        };
        trace!(pc, insn = %fmt_decoded(&d), "step");
        self.pc = pc.wrapping_add(INSN_WIDTH);
        exec.exec(self, bus, d)
    }

    /// Steps until `hlt`, a fault, or `budget` instructions have executed.
    /// `on_step` sees the machine after every instruction that did not fault.
    pub fn run<B, D, X, F>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        budget: Option<u64>,
        mut on_step: F,
    ) -> Result<Exit, Fault>
    where
        B: Bus,
        D: Decoder,
        X: Executor,
        F: FnMut(&Cpu, &mut B),
    {
        let mut steps = 0u64;
        loop {
            if self.is_halted() {
                return Ok(Exit::Halted { steps });
            }
            if budget.is_some_and(|b| steps >= b) {
                return Ok(Exit::BudgetExhausted { steps });
            }
            self.step(bus, dec, exec)?;
            steps += 1;
            on_step(self, bus);
        }
    }
}
