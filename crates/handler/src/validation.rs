//! Transaction checks run before anything is executed.
use crate::InvalidTransaction;
use context::Env;
use interpreter::gas;
use primitives::{Features, SpecId, U256};
use state::AccountInfo;

/// Validates the transaction against the block and configuration.
pub fn validate_env(env: &Env) -> Result<(), InvalidTransaction> {
    let features = env.cfg.features();
    let tx = &env.tx;

    // EIP-155: Simple replay attack protection
    if let Some(chain_id) = tx.chain_id {
        if chain_id != env.cfg.chain_id {
            return Err(InvalidTransaction::InvalidChainId);
        }
    }

    if tx.gas_limit > env.block.gas_limit {
        return Err(InvalidTransaction::CallerGasLimitMoreThanBlock);
    }

    // EIP-1559: Fee market change for ETH 1.0 chain
    if env.cfg.spec().is_enabled_in(SpecId::LONDON) {
        if let Some(priority_fee) = tx.gas_priority_fee {
            if priority_fee > tx.gas_price {
                return Err(InvalidTransaction::PriorityFeeGreaterThanMaxFee);
            }
        }
        if !env.cfg.disable_base_fee && tx.effective_gas_price(env.block.basefee) < env.block.basefee
        {
            return Err(InvalidTransaction::GasPriceLessThanBasefee);
        }
    }

    if !tx.access_list.is_empty() && !features.contains(Features::EIP2930) {
        return Err(InvalidTransaction::AccessListNotSupported);
    }

    if !tx.blob_hashes.is_empty() && !features.contains(Features::EIP4844) {
        return Err(InvalidTransaction::BlobVersionedHashesNotSupported);
    }

    // EIP-3860: Limit and meter initcode
    if tx.kind.is_create()
        && features.contains(Features::EIP3860)
        && tx.data.len() > env.cfg.max_initcode_size()
    {
        return Err(InvalidTransaction::CreateInitCodeSizeLimit);
    }

    Ok(())
}

/// Computes the intrinsic gas and checks that the gas limit covers it.
pub fn validate_initial_tx_gas(env: &Env) -> Result<u64, InvalidTransaction> {
    let tx = &env.tx;
    let initial_gas = gas::validate_initial_tx_gas(
        env.cfg.features(),
        &tx.data,
        tx.kind.is_create(),
        tx.access_list.len() as u64,
        tx.access_list_storage_keys() as u64,
    );

    if initial_gas > tx.gas_limit {
        return Err(InvalidTransaction::CallGasCostMoreThanGasLimit {
            initial_gas,
            gas_limit: tx.gas_limit,
        });
    }
    Ok(initial_gas)
}

/// Validates the caller account: code, nonce and funds.
pub fn validate_tx_against_state(env: &Env, caller: &AccountInfo) -> Result<(), InvalidTransaction> {
    let tx = &env.tx;

    // EIP-3607: Reject transactions from senders with deployed code
    if caller.has_code() {
        return Err(InvalidTransaction::RejectCallerWithCode);
    }

    // EIP-2681: Limit account nonce to 2^64-1
    if caller.nonce == u64::MAX {
        return Err(InvalidTransaction::NonceOverflowInTransaction);
    }

    if !env.cfg.disable_nonce_check {
        let state = caller.nonce;
        match tx.nonce.cmp(&state) {
            core::cmp::Ordering::Greater => {
                return Err(InvalidTransaction::NonceTooHigh { tx: tx.nonce, state })
            }
            core::cmp::Ordering::Less => {
                return Err(InvalidTransaction::NonceTooLow { tx: tx.nonce, state })
            }
            core::cmp::Ordering::Equal => {}
        }
    }

    let max_fee = max_upfront_cost(env)?;
    if !env.cfg.disable_balance_check && max_fee > caller.balance {
        return Err(InvalidTransaction::LackOfFundForMaxFee {
            fee: Box::new(max_fee),
            balance: Box::new(caller.balance),
        });
    }

    Ok(())
}

/// `gas_limit * gas_price + value`, the most the transaction can cost the caller.
pub fn max_upfront_cost(env: &Env) -> Result<U256, InvalidTransaction> {
    let tx = &env.tx;
    U256::from(tx.gas_limit)
        .checked_mul(tx.gas_price)
        .and_then(|fee| fee.checked_add(tx.value))
        .ok_or(InvalidTransaction::OverflowPaymentInTransaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::{AccessListItem, CfgEnv};
    use primitives::{Bytes, TxKind};

    fn env(spec: SpecId) -> Env {
        Env {
            cfg: CfgEnv::new_with_spec(spec),
            ..Default::default()
        }
    }

    #[test]
    fn intrinsic_gas_of_plain_transfer() {
        let mut env = env(SpecId::CANCUN);
        env.tx.gas_limit = 21_000;
        assert_eq!(validate_initial_tx_gas(&env), Ok(21_000));
        env.tx.gas_limit = 20_999;
        assert_eq!(
            validate_initial_tx_gas(&env),
            Err(InvalidTransaction::CallGasCostMoreThanGasLimit {
                initial_gas: 21_000,
                gas_limit: 20_999
            })
        );
    }

    #[test]
    fn create_pays_initcode_words() {
        let mut env = env(SpecId::SHANGHAI);
        env.tx.kind = TxKind::Create;
        env.tx.data = Bytes::from(vec![1u8; 33]);
        // 53000 base, 33 non-zero bytes, two initcode words
        assert_eq!(validate_initial_tx_gas(&env), Ok(53_000 + 33 * 16 + 2 * 2));
    }

    #[test]
    fn access_list_needs_berlin() {
        let mut env = env(SpecId::ISTANBUL);
        env.tx.access_list = vec![AccessListItem::default()];
        assert_eq!(validate_env(&env), Err(InvalidTransaction::AccessListNotSupported));
    }

    #[test]
    fn chain_id_mismatch() {
        let mut env = env(SpecId::CANCUN);
        env.tx.chain_id = Some(env.cfg.chain_id + 1);
        assert_eq!(validate_env(&env), Err(InvalidTransaction::InvalidChainId));
    }

    #[test]
    fn gas_price_below_basefee() {
        let mut env = env(SpecId::LONDON);
        env.block.basefee = U256::from(10);
        env.tx.gas_price = U256::from(9);
        assert_eq!(validate_env(&env), Err(InvalidTransaction::GasPriceLessThanBasefee));
        env.cfg.disable_base_fee = true;
        assert_eq!(validate_env(&env), Ok(()));
    }

    #[test]
    fn nonce_and_funds() {
        let mut env = env(SpecId::CANCUN);
        env.tx.nonce = 1;
        env.tx.gas_limit = 21_000;
        env.tx.gas_price = U256::from(2);
        let caller = AccountInfo::from_balance(U256::from(42_000));
        assert_eq!(
            validate_tx_against_state(&env, &caller),
            Err(InvalidTransaction::NonceTooHigh { tx: 1, state: 0 })
        );
        env.tx.nonce = 0;
        assert_eq!(validate_tx_against_state(&env, &caller), Ok(()));
        env.tx.value = U256::from(1);
        assert!(matches!(
            validate_tx_against_state(&env, &caller),
            Err(InvalidTransaction::LackOfFundForMaxFee { .. })
        ));
    }
}
