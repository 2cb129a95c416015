use s3201_rs::exec::IntExecutor;
use s3201_rs::isa::s3201::S3201Decoder;
use s3201_rs::{Bus, Cpu, CpuConfig, Fault, Flags, HaltReason, LinearMemory, Status, Step};

fn image(words: &[[u8; 4]]) -> LinearMemory {
    let mut mem = LinearMemory::new(128);
    for (i, w) in words.iter().enumerate() {
        mem.write_u32(i as u32 * 4, u32::from_le_bytes(*w)).unwrap();
    }
    mem
}

#[test]
fn jump_to_misaligned_target_halts() {
    // ldl r1, 6 ; j r1
    let mut mem = image(&[[0x05, 6, 0, 0x11], [0x08, 0, 0, 0x11]]);
    let mut cpu = Cpu::new(CpuConfig::default());
    let dec = S3201Decoder::new();
    cpu.step(&mut mem, &dec, &IntExecutor).unwrap();
    cpu.step(&mut mem, &dec, &IntExecutor).unwrap();
    assert_eq!(cpu.pc, 6);

    let err = cpu.step(&mut mem, &dec, &IntExecutor).unwrap_err();
    assert_eq!(err, Fault::Misaligned { pc: 6 });
    assert_eq!(cpu.status, Status::Halted(HaltReason::Fault(Fault::Misaligned { pc: 6 })));
    assert_eq!(cpu.pc, 6);
    // terminal afterwards
    assert_eq!(cpu.step(&mut mem, &dec, &IntExecutor).unwrap(), Step::Halt);
}

#[test]
fn misaligned_reset_faults_before_fetch() {
    let mut mem = image(&[[0xFF, 0, 0, 0]]);
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.reset(1);
    assert_eq!(
        cpu.step(&mut mem, &S3201Decoder::new(), &IntExecutor),
        Err(Fault::Misaligned { pc: 1 })
    );
}

#[test]
fn unknown_opcode_faults_by_default() {
    let mut mem = image(&[[0x0B, 0x34, 0x12, 0]]);
    let mut cpu = Cpu::new(CpuConfig::default());
    let err = cpu
        .step(&mut mem, &S3201Decoder::new(), &IntExecutor)
        .unwrap_err();
    assert_eq!(err, Fault::Unimplemented { pc: 0, opcode: 0x0B, operand: 0x1234 });
    assert!(cpu.is_halted());
}

#[test]
fn unknown_subop_faults_by_default() {
    // logic sub-op 6 does not exist; load opcode with a store sub-op neither
    for word in [[0x01, 6, 0, 0x12], [0x03, 3, 0, 0x12]] {
        let mut mem = image(&[word]);
        let mut cpu = Cpu::new(CpuConfig::default());
        let err = cpu
            .step(&mut mem, &S3201Decoder::new(), &IntExecutor)
            .unwrap_err();
        assert!(matches!(err, Fault::Unimplemented { pc: 0, .. }));
    }
}

#[test]
fn lenient_mode_skips_unknown_opcodes() {
    // <unknown> ; ldl r0, 7 ; hlt
    let mut mem = image(&[[0x0B, 0, 0, 0], [0x05, 7, 0, 0x00], [0xFF, 0, 0, 0]]);
    let mut cpu = Cpu::new(CpuConfig { trap_unimplemented: false, ..CpuConfig::default() });
    let exit = cpu
        .run(&mut mem, &S3201Decoder::new(), &IntExecutor, Some(10), |_, _| {})
        .unwrap();
    assert_eq!(exit, s3201_rs::Exit::Halted { steps: 3 });
    assert_eq!(cpu.gpr[0], 7);
}

#[test]
fn lenient_skip_leaves_registers_and_flags_alone() {
    // logic sub-op 7 does not exist ; hlt
    let mut mem = image(&[[0x01, 0x07, 0x00, 0x11], [0xFF, 0, 0, 0]]);
    let mut cpu = Cpu::new(CpuConfig { trap_unimplemented: false, ..CpuConfig::default() });
    cpu.gpr[1] = 0;
    cpu.flags = Flags::C | Flags::S;
    let step = cpu.step(&mut mem, &S3201Decoder::new(), &IntExecutor).unwrap();
    assert_eq!(step, Step::Continue);
    assert_eq!(cpu.pc, 4);
    assert_eq!(cpu.gpr[1], 0);
    assert_eq!(cpu.flags, Flags::C | Flags::S);
}

#[test]
fn call_and_ret_are_reserved_noops() {
    let mut mem = image(&[[0x09, 0, 0, 0x11], [0x0A, 0, 0, 0], [0xFF, 0, 0, 0]]);
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[1] = 0x40;
    let exit = cpu
        .run(&mut mem, &S3201Decoder::new(), &IntExecutor, Some(10), |_, _| {})
        .unwrap();
    assert_eq!(exit, s3201_rs::Exit::Halted { steps: 3 });
    assert_eq!(cpu.pc, 12);
    assert_eq!(cpu.gpr[1], 0x40);
}

#[test]
fn fetch_past_memory_faults() {
    let mut mem = LinearMemory::new(8);
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.reset(8);
    let err = cpu
        .step(&mut mem, &S3201Decoder::new(), &IntExecutor)
        .unwrap_err();
    assert!(matches!(err, Fault::Bus { addr: 8, .. }));
}
