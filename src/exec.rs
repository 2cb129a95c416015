use crate::cpu::{Cpu, Flags, Fault, Step};
use crate::decoder::{Cond, Decoded, Op};
use crate::memory::Bus;

pub trait Executor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<Step, Fault>;
}

/// 1 when `v` has an even number of set bits, as on the 8080.
pub fn parity_even(v: u32) -> bool {
    v.count_ones() % 2 == 0
}

/// Recomputes all four flags from a 64-bit intermediate.
/// Carry is set when the value does not fit 32 bits; a wrapped
/// 64-bit subtraction lands there too, so it doubles as borrow.
fn set_flags(cpu: &mut Cpu, wide: u64) -> u32 {
    let res = wide as u32;
    cpu.flags.set(Flags::S, res >> 31 == 1);
    cpu.flags.set(Flags::Z, res == 0);
    cpu.flags.set(Flags::P, parity_even(res));
    cpu.flags.set(Flags::C, wide > u64::from(u32::MAX));
    res
}

fn cond_holds(flags: Flags, cond: Cond) -> bool {
    match cond {
        Cond::Always => true,
        Cond::Carry => flags.contains(Flags::C),
        Cond::Parity => flags.contains(Flags::P),
        Cond::Zero => flags.contains(Flags::Z),
        Cond::Sign => flags.contains(Flags::S),
        Cond::NoCarry => !flags.contains(Flags::C),
        Cond::NoParity => !flags.contains(Flags::P),
        Cond::NoZero => !flags.contains(Flags::Z),
        Cond::NoSign => !flags.contains(Flags::S),
    }
}

fn logic(op: Op, t: u64, f: u64) -> u64 {
    match op {
        Op::And => t & f,
        Op::Or => t | f,
        Op::Xor => t ^ f,
        Op::Not => !t & u64::from(u32::MAX),
        Op::Shl => t << 1,
        _ => t >> 1,
    }
}

// div/mod by zero yield 0
fn arith(op: Op, t: u64, f: u64) -> u64 {
    match op {
        Op::Add => t + f,
        Op::Mul => t * f,
        Op::Div => t.checked_div(f).unwrap_or(0),
        Op::Mod => t.checked_rem(f).unwrap_or(0),
        _ => t.wrapping_sub(f), // sub, cmp
    }
}

pub struct IntExecutor;
impl Executor for IntExecutor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<Step, Fault> {
        let to = d.to as usize;
        let from = d.from as usize;
        let t = u64::from(cpu.gpr[to]);
        let f = u64::from(cpu.gpr[from]);
        match d.op {
            Op::Nop | Op::Call | Op::Ret => {}
            Op::Hlt => return Ok(Step::Halt),
            Op::And | Op::Or | Op::Xor | Op::Not | Op::Shl | Op::Shr => {
                let res = set_flags(cpu, logic(d.op, t, f));
                if d.op == Op::Shr {
                    // the bit shifted out lands in carry
                    cpu.flags.set(Flags::C, t & 1 == 1);
                }
                cpu.gpr[to] = res;
            }
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod | Op::Cmp => {
                let res = set_flags(cpu, arith(d.op, t, f));
                if d.op != Op::Cmp {
                    cpu.gpr[to] = res;
                }
            }
            Op::Ldr => cpu.gpr[to] = cpu.gpr[from],
            Op::Ldm => {
                let addr = cpu.gpr[from];
                cpu.gpr[to] = bus
                    .read_u32(addr)
                    .map_err(|source| Fault::Bus { addr, source })?;
            }
            Op::Ldb => {
                let addr = cpu.gpr[from];
                cpu.gpr[to] = bus
                    .read_u8(addr)
                    .map_err(|source| Fault::Bus { addr, source })? as u32;
            }
            Op::Stm => {
                let addr = cpu.gpr[to];
                bus.write_u32(addr, cpu.gpr[from])
                    .map_err(|source| Fault::Bus { addr, source })?;
            }
            Op::Stb => {
                let addr = cpu.gpr[to];
                bus.write_u8(addr, (cpu.gpr[from] & 0xFF) as u8)
                    .map_err(|source| Fault::Bus { addr, source })?;
            }
            Op::Ldu => cpu.gpr[to] = u32::from(d.operand) << 16,
            Op::Ldl => cpu.gpr[to] = u32::from(d.operand),
            Op::Ori => cpu.gpr[to] |= u32::from(d.operand),
            Op::Jump(cond) => {
                if cond_holds(cpu.flags, cond) {
                    cpu.pc = cpu.gpr[to];
                }
            }
        }
        Ok(Step::Continue)
    }
}
