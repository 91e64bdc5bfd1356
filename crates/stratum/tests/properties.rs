//! Gas and access-list properties of nested frames.
mod common;

use common::*;
use rstest::rstest;
use stratum::{
    bytecode::opcode::*,
    primitives::{Bytes, U256},
    Context, InMemoryStore, Inspector, InstructionResult, Interpreter, Message, SpecId,
};

/// Records the gas charged by every `SLOAD`, outermost frame included.
#[derive(Debug, Default)]
struct SloadCosts {
    opcode: u8,
    before: u64,
    costs: Vec<u64>,
}

impl Inspector<InMemoryStore> for SloadCosts {
    fn step(&mut self, interp: &mut Interpreter, _: &mut Context<InMemoryStore>) {
        self.opcode = interp.current_opcode();
        self.before = interp.gas.remaining();
    }

    fn step_end(&mut self, interp: &mut Interpreter, _: &mut Context<InMemoryStore>) {
        if self.opcode == SLOAD {
            self.costs.push(self.before - interp.gas.remaining());
        }
    }
}

#[rstest]
#[case::stop(vec![STOP], 0)]
#[case::invalid(vec![INVALID], 0x4000)]
// jumpdest, jump(0) loops until the grant is gone
#[case::out_of_gas(vec![JUMPDEST, PUSH1, 0x00, JUMP], 0x4000)]
fn failed_child_consumes_exactly_its_grant(#[case] child: Vec<u8>, #[case] extra: u64) {
    let run = |child: &[u8]| {
        let mut evm = evm(SpecId::CANCUN);
        deploy(&mut evm, C, child);
        let mut a = call_with_gas(CALL, C, 0x4000, true);
        a.extend([POP, STOP]);
        deploy(&mut evm, A, &a);

        let frame = evm
            .run_message(Message::call(SENDER, A, U256::ZERO, Bytes::new(), 100_000))
            .unwrap();
        assert_eq!(frame.instruction_result(), InstructionResult::Stop);
        frame.result.gas.spent()
    };

    let baseline = run(&[STOP]);
    let spent = run(&child);
    assert_eq!(spent, baseline + extra);
    assert!(spent <= 100_000);
}

#[test]
fn halting_outermost_frame_spends_the_whole_limit() {
    let mut evm = evm(SpecId::CANCUN);
    deploy(&mut evm, A, &[INVALID]);
    let outcome = evm.transact(call_tx(A, 50_000)).unwrap();
    assert!(outcome.result.is_halt());
    assert_eq!(outcome.result.gas_used(), 50_000);
}

#[rstest]
// the slot read by the reverted child is cold again for the parent
#[case::reverted_child(REVERT, [2_100, 2_100])]
#[case::committed_child(RETURN, [2_100, 100])]
fn sload_warmth_follows_checkpoints(#[case] child_exit: u8, #[case] expected: [u64; 2]) {
    let mut evm = evm(SpecId::CANCUN).with_inspector(SloadCosts::default());
    // sload(0), then return(0, 0) or revert(0, 0)
    deploy(
        &mut evm,
        C,
        &[PUSH1, 0x00, SLOAD, POP, PUSH1, 0x00, PUSH1, 0x00, child_exit],
    );
    // delegatecall(C) runs the read against A's storage, then A reads the same slot
    let mut a = call_with_gas(DELEGATECALL, C, 0x4000, false);
    a.extend([POP, PUSH1, 0x00, SLOAD, POP, STOP]);
    deploy(&mut evm, A, &a);

    let outcome = evm.transact(call_tx(A, 100_000)).unwrap();
    assert!(outcome.result.is_success());
    assert_eq!(evm.inspector.costs, expected);
}

#[test]
fn second_sload_is_warm() {
    let mut evm = evm(SpecId::CANCUN).with_inspector(SloadCosts::default());
    deploy(
        &mut evm,
        A,
        &[PUSH1, 0x07, SLOAD, PUSH1, 0x07, SLOAD, STOP],
    );
    evm.transact(call_tx(A, 100_000)).unwrap();
    assert_eq!(evm.inspector.costs, [2_100, 100]);

    // a new transaction starts cold
    evm.inspector.costs.clear();
    let mut tx = call_tx(A, 100_000);
    tx.nonce = 1;
    evm.transact(tx).unwrap();
    assert_eq!(evm.inspector.costs, [2_100, 100]);
}
