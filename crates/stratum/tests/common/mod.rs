#![allow(dead_code, unreachable_pub)]

use stratum::{
    bytecode::opcode::{PUSH1, PUSH2, PUSH20},
    primitives::{address, Address, Bytes, U256},
    AccountInfo, Bytecode, CfgEnv, Context, Env, Evm, InMemoryStore, SpecId, TxEnv,
};
use tracing_subscriber::EnvFilter;

pub const SENDER: Address = address!("0x00000000000000000000000000000000000a11ce");
pub const A: Address = address!("0x000000000000000000000000000000000000aaaa");
pub const B: Address = address!("0x000000000000000000000000000000000000bbbb");
pub const C: Address = address!("0x000000000000000000000000000000000000cccc");

pub const SENDER_BALANCE: u64 = 10_000_000_000;

/// Installs a test subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh EVM over an empty store with a funded sender.
pub fn evm(spec: SpecId) -> Evm<InMemoryStore> {
    init_tracing();
    let env = Env {
        cfg: CfgEnv::new_with_spec(spec),
        ..Default::default()
    };
    let mut ctx = Context::new(env, InMemoryStore::new());
    ctx.state.put_account(
        SENDER,
        AccountInfo::from_balance(U256::from(SENDER_BALANCE)),
    );
    Evm::new(ctx)
}

/// Stores `code` as the code of `address`.
pub fn deploy<I>(evm: &mut Evm<InMemoryStore, I>, address: Address, code: &[u8]) {
    let code_hash = evm
        .ctx
        .state
        .put_code(Bytecode::new_raw(Bytes::copy_from_slice(code)));
    let account = evm.ctx.state.account_or_default(address).unwrap();
    evm.ctx
        .state
        .put_account(address, AccountInfo { code_hash, ..account });
}

/// Transaction from [`SENDER`] to `to` with free gas.
pub fn call_tx(to: Address, gas_limit: u64) -> TxEnv {
    TxEnv {
        caller: SENDER,
        kind: stratum::primitives::TxKind::Call(to),
        gas_limit,
        ..Default::default()
    }
}

/// `opcode(gas, to, 0, 0, 0, 0[, 0])` with a fixed gas grant.
///
/// `CALL` and `CALLCODE` take a value argument, the other call opcodes do not.
pub fn call_with_gas(opcode: u8, to: Address, gas: u16, with_value: bool) -> Vec<u8> {
    let mut code = vec![PUSH1, 0x00, PUSH1, 0x00, PUSH1, 0x00, PUSH1, 0x00];
    if with_value {
        code.extend([PUSH1, 0x00]);
    }
    code.push(PUSH20);
    code.extend_from_slice(to.as_slice());
    code.push(PUSH2);
    code.extend(gas.to_be_bytes());
    code.push(opcode);
    code
}

/// Reads a committed storage slot.
pub fn storage<I>(evm: &mut Evm<InMemoryStore, I>, address: Address, slot: u64) -> U256 {
    evm.ctx.state.storage(address, U256::from(slot)).unwrap()
}
