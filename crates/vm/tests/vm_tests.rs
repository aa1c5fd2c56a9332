//! Integration tests for the LS-8 machine.
//!
//! Organized by instruction group: transfer, ALU, stack, subroutines,
//! branches, then error conditions.

use std::io;

use ls8_common::{Instruction, Opcode, Program};
use ls8_vm::{run, run_with_config, Config, Flags, Machine, RuntimeError, State};

// ============================================================
// Helper functions
// ============================================================

fn ldi(reg: u8, value: u8) -> Instruction {
    Instruction::new(Opcode::Ldi, reg, value)
}

fn op1(op: Opcode, reg: u8) -> Instruction {
    Instruction::unary(op, reg)
}

fn op2(op: Opcode, a: u8, b: u8) -> Instruction {
    Instruction::new(op, a, b)
}

fn hlt() -> Instruction {
    Instruction::nullary(Opcode::Hlt)
}

fn ret() -> Instruction {
    Instruction::nullary(Opcode::Ret)
}

/// Encode instructions back to back from address 0.
fn image(instrs: &[Instruction]) -> Vec<u8> {
    instrs.iter().flat_map(Instruction::encode).collect()
}

/// Run raw bytes and return the halted machine.
fn run_bytes(bytes: Vec<u8>) -> Result<Machine<Vec<u8>>, RuntimeError> {
    let program = Program::new(bytes).unwrap();
    run(&program, Vec::new())
}

/// Run raw bytes and return what PRN printed.
fn output_of(bytes: Vec<u8>) -> String {
    let machine = run_bytes(bytes).unwrap();
    String::from_utf8(machine.into_output()).unwrap()
}

/// Place `code` at `address` in a copy of `base`, zero-padding as needed.
fn place(mut base: Vec<u8>, address: usize, code: &[Instruction]) -> Vec<u8> {
    let code = image(code);
    if base.len() < address + code.len() {
        base.resize(address + code.len(), 0);
    }
    base[address..address + code.len()].copy_from_slice(&code);
    base
}

// ============================================================
// Reference scenarios
// ============================================================

#[test]
fn print8_prints_8_and_halts() {
    let machine = run_bytes(vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]).unwrap();
    assert_eq!(machine.state(), State::Halted);
    assert_eq!(machine.output(), b"8\n");
}

#[test]
fn mult_prints_15() {
    let bytes = image(&[
        ldi(0, 5),
        ldi(1, 3),
        op2(Opcode::Mul, 0, 1),
        op1(Opcode::Prn, 0),
        hlt(),
    ]);
    assert_eq!(output_of(bytes), "15\n");
}

#[test]
fn push_then_pop_moves_value_and_restores_sp() {
    let bytes = image(&[ldi(0, 9), op1(Opcode::Push, 0), op1(Opcode::Pop, 1), hlt()]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.register(1), Ok(9));
    assert_eq!(machine.sp(), 0xF4);
}

// ============================================================
// Machine lifecycle
// ============================================================

#[test]
fn machine_is_idle_until_run() {
    let mut machine = Machine::with_output(Vec::new());
    assert_eq!(machine.state(), State::Idle);
    machine.write_memory(0, &[0x01]).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.state(), State::Halted);
    assert_eq!(machine.pc(), 1);
    assert_eq!(machine.steps(), 1);
}

#[test]
fn halt_leaves_remaining_program_unexecuted() {
    let bytes = image(&[hlt(), ldi(0, 1), op1(Opcode::Prn, 0)]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.register(0), Ok(0));
    assert!(machine.output().is_empty());
}

#[test]
fn ldi_then_prn_prints_immediate() {
    for value in [0u8, 1, 127, 128, 255] {
        let bytes = image(&[ldi(3, value), op1(Opcode::Prn, 3), hlt()]);
        assert_eq!(output_of(bytes), format!("{value}\n"));
    }
}

#[test]
fn program_image_is_visible_in_memory() {
    let bytes = vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01];
    let machine = run_bytes(bytes.clone()).unwrap();
    assert_eq!(&machine.memory()[..bytes.len()], &bytes[..]);
}

// ============================================================
// ALU instructions
// ============================================================

#[test]
fn add_sub_div() {
    let bytes = image(&[
        ldi(0, 20),
        ldi(1, 4),
        op2(Opcode::Add, 0, 1), // 24
        op1(Opcode::Prn, 0),
        op2(Opcode::Sub, 0, 1), // 20
        op1(Opcode::Prn, 0),
        op2(Opcode::Div, 0, 1), // 5
        op1(Opcode::Prn, 0),
        hlt(),
    ]);
    assert_eq!(output_of(bytes), "24\n20\n5\n");
}

#[test]
fn mul_wraps_at_256() {
    let bytes = image(&[
        ldi(0, 20),
        ldi(1, 13),
        op2(Opcode::Mul, 0, 1),
        op1(Opcode::Prn, 0),
        hlt(),
    ]);
    assert_eq!(output_of(bytes), "4\n"); // 260 mod 256
}

#[test]
fn cmp_replaces_previous_flags() {
    let bytes = image(&[
        ldi(0, 1),
        ldi(1, 2),
        op2(Opcode::Cmp, 0, 1), // less
        op2(Opcode::Cmp, 1, 0), // greater
        hlt(),
    ]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.flags().bits(), Flags::GREATER);
}

#[test]
fn cmp_equal() {
    let bytes = image(&[ldi(0, 7), ldi(1, 7), op2(Opcode::Cmp, 0, 1), hlt()]);
    let machine = run_bytes(bytes).unwrap();
    assert!(machine.flags().equal());
    assert_eq!(machine.flags().bits().count_ones(), 1);
}

// ============================================================
// Memory transfer
// ============================================================

#[test]
fn st_then_ld_through_register_address() {
    let bytes = image(&[
        ldi(0, 0x80),
        ldi(1, 77),
        op2(Opcode::St, 0, 1),
        op2(Opcode::Ld, 2, 0),
        op1(Opcode::Prn, 2),
        hlt(),
    ]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.read_memory(0x80), Ok(77));
    assert_eq!(machine.output(), b"77\n");
}

// ============================================================
// Stack
// ============================================================

#[test]
fn stack_is_last_in_first_out() {
    let bytes = image(&[
        ldi(0, 1),
        ldi(1, 2),
        ldi(2, 3),
        op1(Opcode::Push, 0),
        op1(Opcode::Push, 1),
        op1(Opcode::Push, 2),
        op1(Opcode::Pop, 3),
        op1(Opcode::Pop, 4),
        op1(Opcode::Pop, 5),
        hlt(),
    ]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(&machine.registers()[3..6], &[3, 2, 1]);
    assert_eq!(machine.sp(), 0xF4);
}

#[test]
fn push_grows_downward_from_f4() {
    let bytes = image(&[ldi(0, 0xAA), op1(Opcode::Push, 0), hlt()]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.sp(), 0xF3);
    assert_eq!(machine.read_memory(0xF3), Ok(0xAA));
}

#[test]
fn pop_into_stack_pointer_register() {
    // POP increments SP first, then the popped value overwrites R7.
    let bytes = image(&[ldi(0, 0x10), op1(Opcode::Push, 0), op1(Opcode::Pop, 7), hlt()]);
    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.sp(), 0x10);
}

#[test]
fn custom_stack_top() {
    let config = Config {
        stack_top: 0x40,
        ..Config::default()
    };
    let bytes = image(&[ldi(0, 5), op1(Opcode::Push, 0), hlt()]);
    let program = Program::new(bytes).unwrap();
    let machine = run_with_config(&program, config, Vec::new()).unwrap();
    assert_eq!(machine.read_memory(0x3F), Ok(5));
}

// ============================================================
// Subroutines
// ============================================================

/// 0: LDI R0,20 / 3: LDI R1,12 / 6: CALL R1 / 8: PRN R0 / 10: HLT
/// 12: ADD R0,R0 / 15: RET
fn double_subroutine() -> Vec<u8> {
    let main = image(&[
        ldi(0, 20),
        ldi(1, 12),
        op1(Opcode::Call, 1),
        op1(Opcode::Prn, 0),
        hlt(),
    ]);
    place(main, 12, &[op2(Opcode::Add, 0, 0), ret()])
}

#[test]
fn call_and_return() {
    let machine = run_bytes(double_subroutine()).unwrap();
    assert_eq!(machine.output(), b"40\n");
    assert_eq!(machine.sp(), 0xF4);
}

#[test]
fn call_pushes_return_address_and_ret_resumes_after_call() {
    let mut machine = Machine::with_output(Vec::new());
    machine.write_memory(0, &double_subroutine()).unwrap();

    machine.step().unwrap(); // LDI
    machine.step().unwrap(); // LDI
    machine.step().unwrap(); // CALL
    assert_eq!(machine.pc(), 12);
    assert_eq!(machine.sp(), 0xF3);
    assert_eq!(machine.read_memory(0xF3), Ok(8));

    machine.step().unwrap(); // ADD
    machine.step().unwrap(); // RET
    assert_eq!(machine.pc(), 8); // call address 6 + 2
    assert_eq!(machine.sp(), 0xF4);
}

#[test]
fn nested_calls_unwind_in_order() {
    let main = image(&[ldi(1, 10), op1(Opcode::Call, 1), hlt()]);
    let with_outer = place(
        main,
        10,
        &[ldi(2, 20), op1(Opcode::Call, 2), op1(Opcode::Prn, 0), ret()],
    );
    let bytes = place(with_outer, 20, &[ldi(0, 99), ret()]);

    let machine = run_bytes(bytes).unwrap();
    assert_eq!(machine.output(), b"99\n");
    assert_eq!(machine.sp(), 0xF4);
    assert_eq!(machine.pc(), 6);
}

// ============================================================
// Branches
// ============================================================

#[test]
fn countdown_loop_with_jne() {
    let bytes = image(&[
        ldi(0, 3),
        ldi(1, 1),
        ldi(2, 0),
        ldi(3, 12),
        op1(Opcode::Prn, 0), // 12
        op2(Opcode::Sub, 0, 1),
        op2(Opcode::Cmp, 0, 2),
        op1(Opcode::Jne, 3),
        hlt(),
    ]);
    assert_eq!(output_of(bytes), "3\n2\n1\n");
}

#[test]
fn jeq_taken_when_equal() {
    // CMP equal, JEQ over the PRN.
    let bytes = image(&[
        ldi(0, 4),
        ldi(1, 4),
        ldi(2, 16),
        op2(Opcode::Cmp, 0, 1),
        op1(Opcode::Jeq, 2), // 12
        op1(Opcode::Prn, 0), // 14
        hlt(),               // 16
    ]);
    assert_eq!(output_of(bytes), "");
}

#[test]
fn jgt_and_jlt_follow_flags() {
    let program = |jump: Opcode| {
        image(&[
            ldi(0, 5),
            ldi(1, 3),
            ldi(2, 16),
            op2(Opcode::Cmp, 0, 1),
            op1(jump, 2),        // 12
            op1(Opcode::Prn, 0), // 14
            hlt(),               // 16
        ])
    };
    assert_eq!(output_of(program(Opcode::Jgt)), "");
    assert_eq!(output_of(program(Opcode::Jlt)), "5\n");
}

#[test]
fn jmp_is_unconditional() {
    let bytes = image(&[ldi(0, 7), op1(Opcode::Jmp, 0), op1(Opcode::Prn, 0), hlt()]);
    let machine = run_bytes(bytes).unwrap();
    assert!(machine.output().is_empty());
    assert_eq!(machine.pc(), 8);
}

// ============================================================
// Errors
// ============================================================

#[test]
fn unknown_opcode_reports_address_and_value() {
    let bytes = image(&[ldi(0, 7)]).into_iter().chain([0b1111_1111]).collect();
    let err = run_bytes(bytes).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnknownInstruction {
            opcode: 0xFF,
            at: 3
        }
    );
}

#[test]
fn empty_memory_is_unknown_instruction_at_zero() {
    assert_eq!(
        run_bytes(vec![]).unwrap_err(),
        RuntimeError::UnknownInstruction { opcode: 0, at: 0 }
    );
}

#[test]
fn state_before_error_is_kept() {
    let mut machine = Machine::with_output(Vec::new());
    machine.write_memory(0, &[0x82, 0x00, 0x07, 0x47, 0x00, 0x00]).unwrap();
    assert!(machine.run().is_err());
    assert_eq!(machine.register(0), Ok(7));
    assert_eq!(machine.output(), b"7\n");
    assert_eq!(machine.state(), State::Running);
}

#[test]
fn division_by_zero_faults() {
    let bytes = image(&[ldi(0, 9), op2(Opcode::Div, 0, 1), hlt()]);
    assert_eq!(
        run_bytes(bytes).unwrap_err(),
        RuntimeError::DivisionByZero { at: 3 }
    );
}

#[test]
fn register_operand_out_of_range() {
    let bytes = vec![0x82, 0x08, 0x01, 0x01]; // LDI R8,1
    assert_eq!(
        run_bytes(bytes).unwrap_err(),
        RuntimeError::OutOfBounds {
            bank: "register",
            address: 8,
            size: 8
        }
    );
}

#[test]
fn write_memory_past_end_is_rejected() {
    let mut machine = Machine::with_output(Vec::new());
    assert!(matches!(
        machine.write_memory(200, &[0; 100]),
        Err(RuntimeError::OutOfBounds { bank: "memory", .. })
    ));
}

#[test]
fn write_memory_at_huge_address_is_rejected() {
    let mut machine = Machine::with_output(Vec::new());
    assert_eq!(
        machine.write_memory(usize::MAX, &[1]),
        Err(RuntimeError::OutOfBounds {
            bank: "memory",
            address: usize::MAX,
            size: 256
        })
    );
}

#[test]
fn step_limit_stops_infinite_loop() {
    // LDI R0,0; JMP R0
    let bytes = image(&[ldi(0, 0), op1(Opcode::Jmp, 0)]);
    let program = Program::new(bytes).unwrap();
    let config = Config::default().with_step_limit(10);
    assert_eq!(
        run_with_config(&program, config, Vec::new()).unwrap_err(),
        RuntimeError::StepLimitExceeded { limit: 10 }
    );
}

struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn output_failure_is_reported() {
    let program = Program::new(vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]).unwrap();
    let err = run(&program, BrokenPipe).unwrap_err();
    assert!(matches!(err, RuntimeError::Output { at: 3, .. }));
}
