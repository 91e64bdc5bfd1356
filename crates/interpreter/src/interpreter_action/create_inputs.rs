use context::TxEnv;
use primitives::{Address, Bytes, TxKind, B256, U256};

/// Create scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateScheme {
    /// Legacy create scheme of `CREATE`.
    Create,
    /// Create scheme of `CREATE2`.
    Create2 {
        /// Salt.
        salt: U256,
    },
}

/// Inputs for a create call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateInputs {
    /// Caller address of the EVM.
    pub caller: Address,
    /// The create scheme.
    pub scheme: CreateScheme,
    /// The value to transfer.
    pub value: U256,
    /// The init code of the contract.
    pub init_code: Bytes,
    /// The gas limit of the call.
    pub gas_limit: u64,
}

impl Default for CreateScheme {
    fn default() -> Self {
        Self::Create
    }
}

impl CreateInputs {
    /// Creates the top level create inputs of a transaction.
    ///
    /// Returns `None` for message call transactions.
    pub fn new(tx_env: &TxEnv, gas_limit: u64) -> Option<Self> {
        let TxKind::Create = tx_env.kind else {
            return None;
        };

        Some(CreateInputs {
            caller: tx_env.caller,
            scheme: CreateScheme::Create,
            value: tx_env.value,
            init_code: tx_env.data.clone(),
            gas_limit,
        })
    }

    /// Returns the address that this create call will create.
    ///
    /// `nonce` is the caller nonce before it is bumped for this creation.
    pub fn created_address(&self, nonce: u64) -> Address {
        match self.scheme {
            CreateScheme::Create => self.caller.create(nonce),
            CreateScheme::Create2 { salt } => self
                .caller
                .create2_from_code(B256::from(salt.to_be_bytes()), &self.init_code),
        }
    }
}
