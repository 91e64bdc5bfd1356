//! This module contains [`CfgEnv`].
use primitives::{ConfigError, Features, SpecId, MAX_CODE_SIZE, MAX_INITCODE_SIZE};

/// EVM configuration
///
/// The feature set is resolved from `spec` and `extra_eips` whenever either changes, so
/// consumers read [`CfgEnv::features`] without re-validating.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct CfgEnv {
    /// Chain ID of the EVM. Used in CHAINID opcode and transaction's chain ID check.
    ///
    /// Chain ID is introduced EIP-155.
    pub chain_id: u64,
    /// Specification for EVM represent the hardfork
    spec: SpecId,
    /// EIPs enabled on top of `spec`.
    extra_eips: Vec<u64>,
    /// Resolved feature set.
    features: Features,
    /// Contract code size limit override.
    ///
    /// If None, the limit will be determined by EIP-170.
    ///
    /// Useful to increase this because of tests.
    pub limit_contract_code_size: Option<usize>,
    /// Contract initcode size limit override.
    ///
    /// If None, the limit is twice the code size limit.
    pub limit_contract_initcode_size: Option<usize>,
    /// Skips the nonce validation against the account's nonce
    pub disable_nonce_check: bool,
    /// Skip balance checks if `true`
    ///
    /// Adds transaction cost to balance to ensure execution doesn't fail.
    pub disable_balance_check: bool,
    /// Disables base fee checks for EIP-1559 transactions
    ///
    /// This is useful for testing method calls with zero gas price.
    pub disable_base_fee: bool,
}

impl Default for CfgEnv {
    fn default() -> Self {
        Self::new_with_spec(SpecId::default())
    }
}

impl CfgEnv {
    /// Creates new `CfgEnv` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config for `spec` without extra EIPs.
    pub fn new_with_spec(spec: SpecId) -> Self {
        Self {
            chain_id: 1,
            spec,
            extra_eips: Vec::new(),
            features: Features::for_spec(spec),
            limit_contract_code_size: None,
            limit_contract_initcode_size: None,
            disable_nonce_check: false,
            disable_balance_check: false,
            disable_base_fee: false,
        }
    }

    /// Enables one more EIP on top of the hardfork.
    pub fn with_eip(mut self, eip: u64) -> Result<Self, ConfigError> {
        let mut extra_eips = self.extra_eips.clone();
        extra_eips.push(eip);
        self.features = Features::resolve(self.spec, &extra_eips)?;
        self.extra_eips = extra_eips;
        Ok(self)
    }

    /// Sets the chain id.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Switches the hardfork, keeping the extra EIPs.
    pub fn set_spec(&mut self, spec: SpecId) -> Result<(), ConfigError> {
        self.features = Features::resolve(spec, &self.extra_eips)?;
        self.spec = spec;
        Ok(())
    }

    /// Active hardfork.
    #[inline]
    pub fn spec(&self) -> SpecId {
        self.spec
    }

    /// EIPs enabled on top of the hardfork.
    #[inline]
    pub fn extra_eips(&self) -> &[u64] {
        &self.extra_eips
    }

    /// Resolved feature set.
    #[inline]
    pub fn features(&self) -> Features {
        self.features
    }

    /// Maximum deployed code size.
    pub fn max_code_size(&self) -> usize {
        self.limit_contract_code_size.unwrap_or(MAX_CODE_SIZE)
    }

    /// Maximum initcode size.
    pub fn max_initcode_size(&self) -> usize {
        self.limit_contract_initcode_size
            .or_else(|| self.limit_contract_code_size.map(|size| size.saturating_mul(2)))
            .unwrap_or(MAX_INITCODE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_eip_extends_features() {
        let cfg = CfgEnv::new_with_spec(SpecId::BERLIN).with_eip(3855).unwrap();
        assert!(cfg.features().contains(Features::EIP3855));
        assert!(cfg.features().contains(Features::EIP2929));
        assert_eq!(cfg.extra_eips(), &[3855]);
    }

    #[test]
    fn rejected_eip_leaves_config_unchanged() {
        let cfg = CfgEnv::new_with_spec(SpecId::CANCUN);
        assert_eq!(
            cfg.clone().with_eip(2315),
            Err(ConfigError::ConflictingEips {
                eip: 2315,
                conflicts_with: 1153
            })
        );
        assert_eq!(
            CfgEnv::new_with_spec(SpecId::LONDON).with_eip(99_999),
            Err(ConfigError::UnsupportedEip(99_999))
        );
    }

    #[test]
    fn size_limits() {
        let mut cfg = CfgEnv::default();
        assert_eq!(cfg.max_code_size(), MAX_CODE_SIZE);
        assert_eq!(cfg.max_initcode_size(), MAX_INITCODE_SIZE);
        cfg.limit_contract_code_size = Some(100);
        assert_eq!(cfg.max_initcode_size(), 200);
    }
}
