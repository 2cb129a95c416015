pub mod cpu;
pub mod decoder;
pub mod exec;
pub mod disasm;
pub mod instructions;
pub mod memory;
pub mod monitor;

pub mod isa {
    pub mod s3201; // table-driven decoder for the 4-byte encoding
}

pub use cpu::{Cpu, CpuConfig, Exit, Fault, Flags, HaltReason, Status, Step};
pub use memory::{Bus, BusError, LinearMemory, LOADABLE_SIZE, MEMORY_SIZE};
