use crate::{gas::static_gas_table, instructions::*, Host, Interpreter};
use bytecode::opcode::{self, info_for};
use core::fmt;
use primitives::Features;

/// EVM opcode function signature.
pub type Instruction<H> = fn(&mut Interpreter, &mut H);

/// Dispatch tables resolved for one feature set.
///
/// Built once per transaction and shared by every frame of it.
pub struct InstructionTables<H: ?Sized> {
    /// Handler of every opcode.
    pub handlers: [Instruction<H>; 256],
    /// Whether the opcode exists and its EIP is active.
    pub enabled: [bool; 256],
    /// Gas charged before the handler runs.
    pub static_gas: [u64; 256],
}

impl<H: ?Sized> fmt::Debug for InstructionTables<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionTables")
            .field("enabled", &self.enabled.iter().filter(|e| **e).count())
            .finish_non_exhaustive()
    }
}

impl<H: Host + ?Sized> InstructionTables<H> {
    /// Resolves handlers, activation and static gas for `features`.
    pub fn new(features: Features) -> Self {
        let mut handlers = [control::unknown as Instruction<H>; 256];
        let mut enabled = [false; 256];
        for (op, handler) in handlers.iter_mut().enumerate() {
            let op = op as u8;
            *handler = instruction(op, features);
            enabled[op as usize] = info_for(op, features).is_some_and(|info| info.is_enabled(features));
        }
        Self {
            handlers,
            enabled,
            static_gas: static_gas_table(features),
        }
    }
}

/// Returns the handler of `op` under `features`.
pub fn instruction<H: Host + ?Sized>(op: u8, features: Features) -> Instruction<H> {
    use opcode::*;

    if features.contains(Features::EIP2315) {
        match op {
            BEGINSUB => return control::beginsub,
            RETURNSUB => return control::returnsub,
            JUMPSUB => return control::jumpsub,
            _ => {}
        }
    }

    match op {
        STOP => control::stop,

        ADD => arithmetic::add,
        MUL => arithmetic::mul,
        SUB => arithmetic::sub,
        DIV => arithmetic::div,
        SDIV => arithmetic::sdiv,
        MOD => arithmetic::rem,
        SMOD => arithmetic::smod,
        ADDMOD => arithmetic::addmod,
        MULMOD => arithmetic::mulmod,
        EXP => arithmetic::exp,
        SIGNEXTEND => arithmetic::signextend,

        LT => bitwise::lt,
        GT => bitwise::gt,
        SLT => bitwise::slt,
        SGT => bitwise::sgt,
        EQ => bitwise::eq,
        ISZERO => bitwise::iszero,
        AND => bitwise::bitand,
        OR => bitwise::bitor,
        XOR => bitwise::bitxor,
        NOT => bitwise::not,
        BYTE => bitwise::byte,
        SHL => bitwise::shl,
        SHR => bitwise::shr,
        SAR => bitwise::sar,

        KECCAK256 => system::keccak256,

        ADDRESS => system::address,
        BALANCE => host::balance,
        ORIGIN => host_env::origin,
        CALLER => system::caller,
        CALLVALUE => system::callvalue,
        CALLDATALOAD => system::calldataload,
        CALLDATASIZE => system::calldatasize,
        CALLDATACOPY => system::calldatacopy,
        CODESIZE => system::codesize,
        CODECOPY => system::codecopy,

        GASPRICE => host_env::gasprice,
        EXTCODESIZE => host::extcodesize,
        EXTCODECOPY => host::extcodecopy,
        RETURNDATASIZE => system::returndatasize,
        RETURNDATACOPY => system::returndatacopy,
        EXTCODEHASH => host::extcodehash,
        BLOCKHASH => host::blockhash,
        COINBASE => host_env::coinbase,
        TIMESTAMP => host_env::timestamp,
        NUMBER => host_env::block_number,
        DIFFICULTY => host_env::difficulty,
        GASLIMIT => host_env::gaslimit,
        CHAINID => host_env::chainid,
        SELFBALANCE => host::selfbalance,
        BASEFEE => host_env::basefee,
        BLOBHASH => host_env::blob_hash,
        BLOBBASEFEE => host_env::blob_basefee,

        POP => stack::pop,
        MLOAD => memory::mload,
        MSTORE => memory::mstore,
        MSTORE8 => memory::mstore8,
        SLOAD => host::sload,
        SSTORE => host::sstore,
        JUMP => control::jump,
        JUMPI => control::jumpi,
        PC => control::pc,
        MSIZE => memory::msize,
        GAS => system::gas,
        JUMPDEST => control::jumpdest,
        TLOAD => host::tload,
        TSTORE => host::tstore,
        MCOPY => memory::mcopy,

        PUSH0 => stack::push0,
        PUSH1 => stack::push::<1, H>,
        PUSH2 => stack::push::<2, H>,
        PUSH3 => stack::push::<3, H>,
        PUSH4 => stack::push::<4, H>,
        PUSH5 => stack::push::<5, H>,
        PUSH6 => stack::push::<6, H>,
        PUSH7 => stack::push::<7, H>,
        PUSH8 => stack::push::<8, H>,
        PUSH9 => stack::push::<9, H>,
        PUSH10 => stack::push::<10, H>,
        PUSH11 => stack::push::<11, H>,
        PUSH12 => stack::push::<12, H>,
        PUSH13 => stack::push::<13, H>,
        PUSH14 => stack::push::<14, H>,
        PUSH15 => stack::push::<15, H>,
        PUSH16 => stack::push::<16, H>,
        PUSH17 => stack::push::<17, H>,
        PUSH18 => stack::push::<18, H>,
        PUSH19 => stack::push::<19, H>,
        PUSH20 => stack::push::<20, H>,
        PUSH21 => stack::push::<21, H>,
        PUSH22 => stack::push::<22, H>,
        PUSH23 => stack::push::<23, H>,
        PUSH24 => stack::push::<24, H>,
        PUSH25 => stack::push::<25, H>,
        PUSH26 => stack::push::<26, H>,
        PUSH27 => stack::push::<27, H>,
        PUSH28 => stack::push::<28, H>,
        PUSH29 => stack::push::<29, H>,
        PUSH30 => stack::push::<30, H>,
        PUSH31 => stack::push::<31, H>,
        PUSH32 => stack::push::<32, H>,

        DUP1 => stack::dup::<1, H>,
        DUP2 => stack::dup::<2, H>,
        DUP3 => stack::dup::<3, H>,
        DUP4 => stack::dup::<4, H>,
        DUP5 => stack::dup::<5, H>,
        DUP6 => stack::dup::<6, H>,
        DUP7 => stack::dup::<7, H>,
        DUP8 => stack::dup::<8, H>,
        DUP9 => stack::dup::<9, H>,
        DUP10 => stack::dup::<10, H>,
        DUP11 => stack::dup::<11, H>,
        DUP12 => stack::dup::<12, H>,
        DUP13 => stack::dup::<13, H>,
        DUP14 => stack::dup::<14, H>,
        DUP15 => stack::dup::<15, H>,
        DUP16 => stack::dup::<16, H>,

        SWAP1 => stack::swap::<1, H>,
        SWAP2 => stack::swap::<2, H>,
        SWAP3 => stack::swap::<3, H>,
        SWAP4 => stack::swap::<4, H>,
        SWAP5 => stack::swap::<5, H>,
        SWAP6 => stack::swap::<6, H>,
        SWAP7 => stack::swap::<7, H>,
        SWAP8 => stack::swap::<8, H>,
        SWAP9 => stack::swap::<9, H>,
        SWAP10 => stack::swap::<10, H>,
        SWAP11 => stack::swap::<11, H>,
        SWAP12 => stack::swap::<12, H>,
        SWAP13 => stack::swap::<13, H>,
        SWAP14 => stack::swap::<14, H>,
        SWAP15 => stack::swap::<15, H>,
        SWAP16 => stack::swap::<16, H>,

        LOG0 => host::log::<0, H>,
        LOG1 => host::log::<1, H>,
        LOG2 => host::log::<2, H>,
        LOG3 => host::log::<3, H>,
        LOG4 => host::log::<4, H>,

        CREATE => contract::create::<false, H>,
        CALL => contract::call,
        CALLCODE => contract::call_code,
        RETURN => control::ret,
        DELEGATECALL => contract::delegate_call,
        CREATE2 => contract::create::<true, H>,
        STATICCALL => contract::static_call,
        REVERT => control::revert,
        INVALID => control::invalid,
        SELFDESTRUCT => host::selfdestruct,

        _ => control::unknown,
    }
}
