use pretty_assertions::assert_eq;
use s3201_rs::exec::IntExecutor;
use s3201_rs::isa::s3201::S3201Decoder;
use s3201_rs::{Bus, Cpu, CpuConfig, Flags, LinearMemory};

const ADD: u16 = 0;
const SUB: u16 = 1;
const MUL: u16 = 2;
const DIV: u16 = 3;
const MOD: u16 = 4;
const CMP: u16 = 5;

fn enc_arith(sub: u16, to: u8, from: u8) -> u32 {
    let [lo, hi] = sub.to_le_bytes();
    u32::from_le_bytes([0x02, lo, hi, (to << 4) | from])
}

/// Runs one arithmetic op on r1 (to) and r2 (from).
fn arith(sub: u16, a: u32, b: u32) -> Cpu {
    let mut mem = LinearMemory::new(16);
    mem.write_u32(0, enc_arith(sub, 1, 2)).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[1] = a;
    cpu.gpr[2] = b;
    cpu.step(&mut mem, &S3201Decoder::new(), &IntExecutor).unwrap();
    cpu
}

#[test]
fn add_overflow_sets_carry() {
    let cpu = arith(ADD, 0xFFFF_FFFF, 1);
    assert_eq!(cpu.gpr[1], 0);
    assert_eq!(cpu.flags, Flags::C | Flags::Z | Flags::P);

    let cpu = arith(ADD, 2, 3);
    assert_eq!(cpu.gpr[1], 5);
    assert_eq!(cpu.flags, Flags::P);
}

#[test]
fn sub_borrow() {
    let cpu = arith(SUB, 1, 2);
    assert_eq!(cpu.gpr[1], 0xFFFF_FFFF);
    assert!(cpu.flags.contains(Flags::C));
    assert!(cpu.flags.contains(Flags::S));

    let cpu = arith(SUB, 2, 2);
    assert_eq!(cpu.gpr[1], 0);
    assert!(!cpu.flags.contains(Flags::C));
    assert!(cpu.flags.contains(Flags::Z));

    let cpu = arith(SUB, 9, 2);
    assert_eq!(cpu.gpr[1], 7);
    assert!(!cpu.flags.contains(Flags::C));
}

#[test]
fn cmp_sets_sub_flags_without_storing() {
    for (a, b) in [(1u32, 2u32), (2, 2), (9, 2), (0x8000_0000, 1), (0, 0xFFFF_FFFF)] {
        let sub = arith(SUB, a, b);
        let cmp = arith(CMP, a, b);
        assert_eq!(cmp.flags, sub.flags, "flags for {a:#x} cmp {b:#x}");
        assert_eq!(cmp.gpr[1], a);
        assert_eq!(cmp.gpr[2], b);
    }
}

#[test]
fn mul_wide_result() {
    let cpu = arith(MUL, 0x1_0000, 0x1_0000);
    assert_eq!(cpu.gpr[1], 0);
    assert!(cpu.flags.contains(Flags::C));
    assert!(cpu.flags.contains(Flags::Z));

    let cpu = arith(MUL, 6, 7);
    assert_eq!(cpu.gpr[1], 42);
    assert!(!cpu.flags.contains(Flags::C));
}

#[test]
fn div_and_mod() {
    assert_eq!(arith(DIV, 42, 5).gpr[1], 8);
    assert_eq!(arith(MOD, 42, 5).gpr[1], 2);
}

#[test]
fn divide_by_zero_yields_zero() {
    let cpu = arith(DIV, 42, 0);
    assert_eq!(cpu.gpr[1], 0);
    assert!(cpu.flags.contains(Flags::Z));
    assert!(!cpu.is_halted());

    let cpu = arith(MOD, 42, 0);
    assert_eq!(cpu.gpr[1], 0);
    assert!(!cpu.is_halted());
}

#[test]
fn same_register_both_sides() {
    let mut mem = LinearMemory::new(16);
    mem.write_u32(0, enc_arith(ADD, 3, 3)).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[3] = 21;
    cpu.step(&mut mem, &S3201Decoder::new(), &IntExecutor).unwrap();
    assert_eq!(cpu.gpr[3], 42);
}
