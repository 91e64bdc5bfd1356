//! Settlement of a finished transaction: refunds, fees and account removal.
use crate::result::{ExecutionResult, FrameResult, Output, SuccessReason};
use context::Context;
use interpreter::Gas;
use primitives::{Address, Features, SpecId, U256};
use state::{BackingStore, StateError};

/// Gas of the whole transaction, built from the gas of its outermost frame.
///
/// Unused gas comes back for successes and reverts. The refund only applies to successes and is
/// capped at a fifth of the spent gas under EIP-3529, half before it.
pub fn transaction_gas(features: Features, gas_limit: u64, frame: &FrameResult) -> Gas {
    let mut gas = Gas::new_spent(gas_limit);
    let instruction_result = frame.instruction_result();
    if instruction_result.is_ok() || instruction_result.is_revert() {
        gas.erase_cost(frame.result.gas.remaining());
    }
    if instruction_result.is_ok() {
        gas.record_refund(frame.result.gas.refunded());
    }
    gas.set_final_refund(features.contains(Features::EIP3529));
    gas
}

/// Pays the caller back for unused and refunded gas.
pub fn reimburse_caller<S: BackingStore>(
    ctx: &mut Context<S>,
    gas: &Gas,
) -> Result<(), StateError<S::Error>> {
    let caller = ctx.env.tx.caller;
    let effective_gas_price = ctx.env.tx.effective_gas_price(ctx.env.block.basefee);
    let returned = gas.remaining() + gas.refunded() as u64;

    let mut account = ctx.state.account_or_default(caller)?;
    account.balance = account
        .balance
        .saturating_add(effective_gas_price.saturating_mul(U256::from(returned)));
    ctx.state.put_account(caller, account);
    Ok(())
}

/// Transfers the fee to the block beneficiary.
///
/// After London the base fee part is burned and only the priority fee is paid.
pub fn reward_beneficiary<S: BackingStore>(
    ctx: &mut Context<S>,
    gas: &Gas,
) -> Result<(), StateError<S::Error>> {
    let beneficiary = ctx.env.block.beneficiary;
    let basefee = ctx.env.block.basefee;
    let effective_gas_price = ctx.env.tx.effective_gas_price(basefee);

    // EIP-1559 discard basefee for coinbase transfer.
    let coinbase_gas_price = if ctx.env.cfg.spec().is_enabled_in(SpecId::LONDON) {
        effective_gas_price.saturating_sub(basefee)
    } else {
        effective_gas_price
    };
    let used = gas.spent() - gas.refunded() as u64;

    let mut account = ctx.state.account_or_default(beneficiary)?;
    account.balance = account
        .balance
        .saturating_add(coinbase_gas_price.saturating_mul(U256::from(used)));
    ctx.state.put_account(beneficiary, account);
    ctx.journal.touch(beneficiary);
    Ok(())
}

/// Deletes the accounts scheduled by `SELFDESTRUCT`.
pub fn destroy_accounts<'a, S: BackingStore>(
    ctx: &mut Context<S>,
    accounts: impl IntoIterator<Item = &'a Address>,
) -> Result<(), StateError<S::Error>> {
    for address in accounts {
        ctx.state.delete_account(*address)?;
    }
    Ok(())
}

/// Builds the transaction result from its outermost frame.
pub fn output(frame: FrameResult, gas: &Gas, is_create: bool) -> ExecutionResult {
    let gas_refunded = gas.refunded() as u64;
    let gas_used = gas.spent() - gas_refunded;
    let instruction_result = frame.instruction_result();
    let data = frame.result.output;

    match SuccessReason::from_instruction_result(instruction_result) {
        Some(reason) => ExecutionResult::Success {
            reason,
            gas_used,
            gas_refunded,
            logs: frame.logs,
            output: if is_create {
                Output::Create(data, frame.created_address)
            } else {
                Output::Call(data)
            },
        },
        None if instruction_result.is_revert() => ExecutionResult::Revert {
            gas_used,
            output: data,
        },
        None => ExecutionResult::Halt {
            reason: instruction_result,
            gas_used,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interpreter::{InstructionResult, InterpreterResult};
    use primitives::Bytes;
    use rstest::rstest;

    fn frame(result: InstructionResult, remaining: u64, refund: i64) -> FrameResult {
        let mut gas = Gas::new(100_000);
        assert!(gas.record_cost(100_000 - remaining));
        gas.record_refund(refund);
        FrameResult::new(InterpreterResult::new(result, Bytes::new(), gas))
    }

    #[rstest]
    // refund capped at half of 40000 spent before London
    #[case(SpecId::BERLIN, 30_000, 20_000)]
    // and at a fifth after it
    #[case(SpecId::LONDON, 30_000, 8_000)]
    #[case(SpecId::LONDON, 1_000, 1_000)]
    fn refund_cap(#[case] spec: SpecId, #[case] refund: i64, #[case] expected: i64) {
        let frame = frame(InstructionResult::Stop, 60_000, refund);
        let gas = transaction_gas(Features::for_spec(spec), 100_000, &frame);
        assert_eq!(gas.spent(), 40_000);
        assert_eq!(gas.refunded(), expected);
    }

    #[test]
    fn revert_returns_gas_but_no_refund() {
        let frame = frame(InstructionResult::Revert, 60_000, 5_000);
        let gas = transaction_gas(Features::for_spec(SpecId::CANCUN), 100_000, &frame);
        assert_eq!(gas.spent(), 40_000);
        assert_eq!(gas.refunded(), 0);
        assert!(matches!(
            output(frame, &gas, false),
            ExecutionResult::Revert { gas_used: 40_000, .. }
        ));
    }

    #[test]
    fn halt_spends_everything() {
        let frame = frame(InstructionResult::InvalidJump, 60_000, 0);
        let gas = transaction_gas(Features::for_spec(SpecId::CANCUN), 100_000, &frame);
        assert_eq!(
            output(frame, &gas, false),
            ExecutionResult::Halt {
                reason: InstructionResult::InvalidJump,
                gas_used: 100_000
            }
        );
    }
}
