use std::path::PathBuf;

use ls8_core::Machine;
use ls8_cpu::isa::*;
use ls8_cpu::{ErrorKind, Ls8Config, Ls8Cpu, Ls8Machine, RunOutcome, Status};

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(name)
}

fn run_asset(name: &str) -> (String, Ls8Cpu<Vec<u8>>) {
    let mut machine = Ls8Machine::new(Ls8Config::default(), Vec::new());
    machine.load(&asset(name)).unwrap();
    machine.run().unwrap();

    let mut cpu = machine.into_cpu();
    let out = String::from_utf8(std::mem::take(cpu.writer_mut())).unwrap();
    (out, cpu)
}

#[test]
fn print8() {
    let (out, cpu) = run_asset("print8.ls8");
    assert_eq!(out, "8\n");
    assert_eq!(cpu.status(), Status::Halted);
    assert!(!cpu.is_running());
}

#[test]
fn mult() {
    let (out, _) = run_asset("mult.ls8");
    assert_eq!(out, "72\n");
}

#[test]
fn stack() {
    let (out, cpu) = run_asset("stack.ls8");
    assert_eq!(out, "2\n4\n1\n");
    assert_eq!(cpu.registers().sp(), 0xF4);
}

#[test]
fn call() {
    let (out, cpu) = run_asset("call.ls8");
    assert_eq!(out, "20\n30\n36\n60\n");
    assert_eq!(cpu.registers().sp(), 0xF4);
    assert_eq!(cpu.pc(), 23);
}

#[test]
fn countdown() {
    let (out, cpu) = run_asset("countdown.ls8");
    assert_eq!(out, "3\n2\n1\n");
    assert!(cpu.flags().equal());
}

#[test]
fn sctest() {
    let (out, _) = run_asset("sctest.ls8");
    assert_eq!(out, "1\n4\n5\n");
}

#[test]
fn hello() {
    let (out, _) = run_asset("hello.ls8");
    assert_eq!(out, "Hi!\n");
}

#[test]
fn countdown_with_jeq_runs_three_bodies() {
    // R0 counts down from 3; R4 counts loop bodies.
    let program = [
        LDI, 0, 3, //  0
        LDI, 1, 0, //  3
        LDI, 2, 12, //  6
        LDI, 3, 23, //  9
        CMP, 0, 1, // 12: loop
        JEQ, 3, // 15
        INC, 4, // 17
        DEC, 0, // 19
        JMP, 2, // 21
        PRN, 4, // 23: exit
        HLT, // 25
    ];
    let mut cpu = Ls8Cpu::new(Ls8Config::default(), Vec::new());
    cpu.load_image(&program).unwrap();
    cpu.run().unwrap();

    assert_eq!(cpu.writer(), b"3\n");
    assert_eq!(cpu.registers().values()[0], 0);
    assert_eq!(cpu.pc(), 25);
}

#[test]
fn loop_is_bounded_by_step_limit() {
    let mut cpu = Ls8Cpu::new(Ls8Config::default(), Vec::new());
    cpu.load_image(&[LDI, 0, 3, JMP, 0]).unwrap();
    assert_eq!(
        cpu.run_for(1_000).unwrap(),
        RunOutcome::StepLimitReached { steps: 1_000 }
    );
}

#[test]
fn illegal_instruction_reports_kind() {
    let mut machine = Ls8Machine::new(Ls8Config::default(), Vec::new());
    machine.load_image(&[LDI, 0, 1, 0xFF]).unwrap();
    let err = machine.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalInstruction);
    assert_eq!(err.pc(), 3);
    assert_eq!(machine.cpu().status(), Status::Faulted);
}
