use super::constants::{
    BASE, HIGH, LOG, LOGTOPIC, LOW, MID, VERYLOW, WARM_STORAGE_READ_COST, WARM_TRANSIENT, ZERO,
};
use bytecode::opcode::*;
use primitives::Features;

/// Builds the static gas cost of every opcode for a feature set.
///
/// Dynamic parts (memory expansion, cold access surcharges, copy words and the like) are
/// charged by the instruction itself. Unknown opcodes cost nothing here, dispatch rejects them
/// before gas is charged.
pub fn static_gas_table(features: Features) -> [u64; 256] {
    let mut table = [ZERO; 256];

    table[STOP as usize] = ZERO;
    for op in [ADD, SUB] {
        table[op as usize] = VERYLOW;
    }
    for op in [MUL, DIV, SDIV, MOD, SMOD, SIGNEXTEND] {
        table[op as usize] = LOW;
    }
    for op in [ADDMOD, MULMOD] {
        table[op as usize] = MID;
    }
    table[EXP as usize] = super::constants::EXP;

    for op in [
        LT, GT, SLT, SGT, EQ, ISZERO, AND, OR, XOR, NOT, BYTE, SHL, SHR, SAR,
    ] {
        table[op as usize] = VERYLOW;
    }

    table[KECCAK256 as usize] = super::constants::KECCAK256;

    for op in [
        ADDRESS, ORIGIN, CALLER, CALLVALUE, CALLDATASIZE, CODESIZE, GASPRICE, COINBASE,
        TIMESTAMP, NUMBER, DIFFICULTY, GASLIMIT, CHAINID, BASEFEE, BLOBBASEFEE, RETURNDATASIZE,
        POP, PC, MSIZE, GAS,
    ] {
        table[op as usize] = BASE;
    }
    for op in [CALLDATALOAD, CALLDATACOPY, CODECOPY, RETURNDATACOPY, MLOAD, MSTORE, MSTORE8] {
        table[op as usize] = VERYLOW;
    }
    table[BLOBHASH as usize] = VERYLOW;
    table[MCOPY as usize] = VERYLOW;
    table[SELFBALANCE as usize] = LOW;
    table[BLOCKHASH as usize] = super::constants::BLOCKHASH;

    let account_access = account_access_gas(features);
    table[BALANCE as usize] = balance_gas(features);
    table[EXTCODESIZE as usize] = account_access;
    table[EXTCODECOPY as usize] = account_access;
    table[EXTCODEHASH as usize] = extcodehash_gas(features);
    table[SLOAD as usize] = super::calc::sload_cost(features, false);
    // fully dynamic
    table[SSTORE as usize] = ZERO;

    table[JUMP as usize] = MID;
    table[JUMPI as usize] = HIGH;
    table[JUMPDEST as usize] = super::constants::JUMPDEST;

    if features.contains(Features::EIP2315) {
        table[BEGINSUB as usize] = BASE;
        table[RETURNSUB as usize] = LOW;
        table[JUMPSUB as usize] = HIGH;
    } else {
        table[TLOAD as usize] = WARM_TRANSIENT;
        table[TSTORE as usize] = WARM_TRANSIENT;
    }

    table[PUSH0 as usize] = BASE;
    for op in PUSH1..=PUSH32 {
        table[op as usize] = VERYLOW;
    }
    for op in DUP1..=DUP16 {
        table[op as usize] = VERYLOW;
    }
    for op in SWAP1..=SWAP16 {
        table[op as usize] = VERYLOW;
    }
    for (n, op) in (LOG0..=LOG4).enumerate() {
        table[op as usize] = LOG + LOGTOPIC * n as u64;
    }

    table[CREATE as usize] = super::constants::CREATE;
    table[CREATE2 as usize] = super::constants::CREATE;
    for op in [CALL, CALLCODE, DELEGATECALL, STATICCALL] {
        table[op as usize] = account_access;
    }
    table[RETURN as usize] = ZERO;
    table[REVERT as usize] = ZERO;
    table[INVALID as usize] = ZERO;
    // EIP-150: Gas cost changes for IO-heavy operations
    table[SELFDESTRUCT as usize] = if features.contains(Features::EIP150) {
        5000
    } else {
        ZERO
    };

    table
}

/// Warm price of `EXTCODESIZE`, `EXTCODECOPY` and the call family.
const fn account_access_gas(features: Features) -> u64 {
    if features.contains(Features::EIP2929) {
        WARM_STORAGE_READ_COST
    } else if features.contains(Features::EIP150) {
        700
    } else {
        20
    }
}

const fn balance_gas(features: Features) -> u64 {
    if features.contains(Features::EIP2929) {
        WARM_STORAGE_READ_COST
    } else if features.contains(Features::EIP1884) {
        700
    } else if features.contains(Features::EIP150) {
        400
    } else {
        20
    }
}

const fn extcodehash_gas(features: Features) -> u64 {
    if features.contains(Features::EIP2929) {
        WARM_STORAGE_READ_COST
    } else if features.contains(Features::EIP1884) {
        700
    } else {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::SpecId;
    use rstest::rstest;

    #[rstest]
    #[case(SpecId::FRONTIER, 20, 50, 20)]
    #[case(SpecId::TANGERINE, 400, 200, 700)]
    #[case(SpecId::ISTANBUL, 700, 800, 700)]
    #[case(SpecId::BERLIN, 100, 100, 100)]
    fn io_heavy_repricing(
        #[case] spec: SpecId,
        #[case] balance: u64,
        #[case] sload: u64,
        #[case] call: u64,
    ) {
        let table = static_gas_table(Features::for_spec(spec));
        assert_eq!(table[BALANCE as usize], balance);
        assert_eq!(table[SLOAD as usize], sload);
        assert_eq!(table[CALL as usize], call);
    }

    #[test]
    fn subroutines_replace_transient_storage() {
        let cancun = Features::for_spec(SpecId::CANCUN);
        assert_eq!(static_gas_table(cancun)[TLOAD as usize], 100);

        let with_subroutines = Features::for_spec(SpecId::BERLIN) | Features::EIP2315;
        let table = static_gas_table(with_subroutines);
        assert_eq!(table[BEGINSUB as usize], 2);
        assert_eq!(table[RETURNSUB as usize], 5);
        assert_eq!(table[JUMPSUB as usize], 10);
    }

    #[test]
    fn log_topics() {
        let table = static_gas_table(Features::for_spec(SpecId::CANCUN));
        assert_eq!(table[LOG0 as usize], 375);
        assert_eq!(table[LOG4 as usize], 375 * 5);
    }
}
