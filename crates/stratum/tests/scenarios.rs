//! End-to-end execution scenarios run through the transaction wrapper.
mod common;

use common::*;
use stratum::{
    bytecode::opcode::*,
    primitives::{keccak256, Address, Bytes, TxKind, B256, U256},
    ExecutionResult, InstructionResult, SpecId, TxEnv,
};

#[test]
fn add_and_return() {
    let mut evm = evm(SpecId::CANCUN);
    // add(1, 2), mstore(0, result), return(0, 32)
    let code = [
        PUSH1, 0x01, PUSH1, 0x02, ADD, PUSH1, 0x00, MSTORE, PUSH1, 0x20, PUSH1, 0x00, RETURN,
    ];
    deploy(&mut evm, A, &code);

    let outcome = evm.transact(call_tx(A, 100_000)).unwrap();
    assert!(outcome.result.is_success());
    assert_eq!(
        outcome.result.output(),
        Some(&Bytes::from(U256::from(3).to_be_bytes::<32>().to_vec()))
    );

    // the same code run directly against the state
    let frame = evm.run_code(A, Bytes::copy_from_slice(&code), 100_000).unwrap();
    assert_eq!(frame.instruction_result(), InstructionResult::Return);
    assert_eq!(U256::from_be_slice(&frame.result.output), U256::from(3));
}

#[test]
fn revert_leaves_slot_unmodified() {
    let mut evm = evm(SpecId::CANCUN);
    evm.ctx.state.set_storage(A, U256::from(1), U256::from(9)).unwrap();
    // sstore(1, 5), revert(0, 0)
    deploy(
        &mut evm,
        A,
        &[PUSH1, 0x05, PUSH1, 0x01, SSTORE, PUSH1, 0x00, PUSH1, 0x00, REVERT],
    );

    let outcome = evm.transact(call_tx(A, 100_000)).unwrap();
    assert!(matches!(outcome.result, ExecutionResult::Revert { .. }));
    assert_eq!(storage(&mut evm, A, 1), U256::from(9));
}

#[test]
fn precompile_out_of_gas() {
    let sha256 = Address::with_last_byte(0x02);
    let mut evm = evm(SpecId::CANCUN);
    let mut tx = call_tx(sha256, 0);
    tx.data = Bytes::from(vec![0xab; 32]);
    // intrinsic gas plus 10, below the 72 the precompile needs
    tx.gas_limit = 21_000 + 32 * 16 + 10;
    let gas_limit = tx.gas_limit;

    let outcome = evm.transact(tx).unwrap();
    assert_eq!(
        outcome.result,
        ExecutionResult::Halt {
            reason: InstructionResult::PrecompileOOG,
            gas_used: gas_limit,
        }
    );
    assert_eq!(outcome.result.output(), None);
}

#[test]
fn create2_address_is_deterministic() {
    // return(0, 0)
    let init_code = [PUSH1, 0x00, PUSH1, 0x00, RETURN];
    // mstore(0, init_code), create2(0, 27, 5, 0x2a), sstore(0, address)
    let mut factory = vec![PUSH5];
    factory.extend_from_slice(&init_code);
    factory.extend([
        PUSH1, 0x00, MSTORE, PUSH1, 0x2a, PUSH1, 0x05, PUSH1, 0x1b, PUSH1, 0x00, CREATE2, PUSH1,
        0x00, SSTORE, STOP,
    ]);
    let expected = A.create2(B256::from(U256::from(0x2a)), keccak256(init_code));

    let deployed: Vec<Address> = (0..2)
        .map(|_| {
            let mut evm = evm(SpecId::CANCUN);
            deploy(&mut evm, A, &factory);
            let outcome = evm.transact(call_tx(A, 200_000)).unwrap();
            assert!(outcome.result.is_success());
            assert!(outcome.created.contains(&expected));
            Address::from_word(B256::from(storage(&mut evm, A, 0)))
        })
        .collect();
    assert_eq!(deployed, vec![expected, expected]);
}

#[test]
fn failing_grandchild_only_fails_its_own_frame() {
    let mut evm = evm(SpecId::CANCUN);
    // C halts on an invalid opcode
    deploy(&mut evm, C, &[INVALID]);
    // B calls C, stores the call status in slot 0 and then writes slot 1
    let mut b = call_with_gas(CALL, C, 0x2000, true);
    b.extend([PUSH1, 0x00, SSTORE, PUSH1, 0x01, PUSH1, 0x01, SSTORE, STOP]);
    deploy(&mut evm, B, &b);
    // A calls B and stores the call status in slot 0
    let mut a = call_with_gas(CALL, B, 0xffff, true);
    a.extend([PUSH1, 0x00, SSTORE, STOP]);
    deploy(&mut evm, A, &a);

    let outcome = evm.transact(call_tx(A, 1_000_000)).unwrap();
    assert!(outcome.result.is_success());
    assert_eq!(storage(&mut evm, B, 0), U256::ZERO);
    assert_eq!(storage(&mut evm, B, 1), U256::from(1));
    assert_eq!(storage(&mut evm, A, 0), U256::from(1));
}

#[test]
fn create_transaction_deploys_code() {
    let mut evm = evm(SpecId::CANCUN);
    // mstore8(0, 0x5f), return(0, 1)
    let init_code = [PUSH1, 0x5f, PUSH1, 0x00, MSTORE8, PUSH1, 0x01, PUSH1, 0x00, RETURN];
    let tx = TxEnv {
        caller: SENDER,
        kind: TxKind::Create,
        data: Bytes::copy_from_slice(&init_code),
        gas_limit: 100_000,
        ..Default::default()
    };
    let expected = SENDER.create(0);

    let outcome = evm.transact(tx).unwrap();
    assert_eq!(outcome.result.created_address(), Some(expected));
    let account = evm.ctx.state.account(expected).unwrap().unwrap();
    assert_eq!(account.nonce, 1);
    assert_eq!(
        evm.ctx.state.code(account.code_hash).unwrap().bytes_slice(),
        &[PUSH0]
    );
    assert_eq!(evm.ctx.state.account(SENDER).unwrap().unwrap().nonce, 1);
}
