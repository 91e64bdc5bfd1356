//! Handles related to the preparation of execution.
//!
//! Warms the accounts a transaction is known to touch and buys its gas.
use context::Context;
use precompile::Precompiles;
use primitives::{Features, U256};
use state::{BackingStore, StateError};

/// Warms the caller, the target, the precompiles, the coinbase (EIP-3651) and the access list.
///
/// These entries stay warm for the whole transaction, reverts included.
pub fn load_accounts<S: BackingStore>(ctx: &mut Context<S>, precompiles: &Precompiles) {
    let features = ctx.features();
    let tx = &ctx.env.tx;

    ctx.journal.warm_permanently(tx.caller);
    if let Some(to) = tx.kind.to() {
        ctx.journal.warm_permanently(*to);
    }

    for address in precompiles.addresses() {
        ctx.journal.warm_permanently(*address);
    }

    // EIP-3651: Warm COINBASE
    if features.contains(Features::EIP3651) {
        ctx.journal.warm_permanently(ctx.env.block.beneficiary);
    }

    // EIP-2930: Optional access lists
    for item in &tx.access_list {
        ctx.journal.warm_permanently(item.address);
        for key in &item.storage_keys {
            ctx.journal
                .warm_slot_permanently(item.address, U256::from_be_bytes(key.0));
        }
    }
}

/// Takes `gas_limit * effective_gas_price` from the caller and bumps its nonce for calls.
///
/// Creations bump the nonce when the create frame derives the new address.
pub fn deduct_caller<S: BackingStore>(ctx: &mut Context<S>) -> Result<(), StateError<S::Error>> {
    let tx = &ctx.env.tx;
    let caller_address = tx.caller;
    let is_call = tx.kind.is_call();
    let effective_gas_price = tx.effective_gas_price(ctx.env.block.basefee);
    let gas_cost = U256::from(tx.gas_limit).saturating_mul(effective_gas_price);
    let disable_balance_check = ctx.env.cfg.disable_balance_check;
    let required = U256::from(tx.gas_limit)
        .saturating_mul(tx.gas_price)
        .saturating_add(tx.value);

    let mut caller = ctx.state.account_or_default(caller_address)?;
    if disable_balance_check && caller.balance < required {
        caller.balance = required;
    }
    caller.balance = caller.balance.saturating_sub(gas_cost);
    if is_call {
        caller.nonce = caller.nonce.saturating_add(1);
    }
    ctx.state.put_account(caller_address, caller);
    ctx.journal.touch(caller_address);
    Ok(())
}
