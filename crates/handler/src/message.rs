//! The unit of work handed to the call orchestrator.
use bytecode::Bytecode;
use interpreter::{CallInputs, CallScheme, CreateInputs, CreateScheme};
use primitives::{keccak256, Address, BTreeSet, Bytes, B256, U256};

/// A message call or contract creation, together with the frame context it runs in.
///
/// Built once per frame and not modified afterwards. `selfdestruct` and `created` are the sets
/// of the parent at the moment the message was sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender of the message, `CALLER` inside the frame.
    pub caller: Address,
    /// Account whose storage and balance the frame acts on. `None` creates a new contract.
    pub to: Option<Address>,
    /// Account the executed code is loaded from.
    pub code_address: Address,
    /// Value moved from `caller` to `to`, or the apparent value of a `DELEGATECALL`.
    pub value: U256,
    /// Call data, or init code for creations.
    pub data: Bytes,
    /// Gas available to the frame.
    pub gas_limit: u64,
    /// State changes are forbidden.
    pub is_static: bool,
    /// The value is only apparent and is not transferred.
    pub delegatecall: bool,
    /// Call depth, zero for the transaction's own frame.
    pub depth: usize,
    /// `CREATE2` salt.
    pub salt: Option<B256>,
    /// Code to run instead of the code stored at `code_address`.
    pub code: Option<Bytecode>,
    /// Accounts already scheduled for deletion.
    pub selfdestruct: BTreeSet<Address>,
    /// Accounts already created in this transaction.
    pub created: BTreeSet<Address>,
}

impl Message {
    /// Message call from `caller` to `to`, running the code of `to`.
    pub fn call(caller: Address, to: Address, value: U256, data: Bytes, gas_limit: u64) -> Self {
        Self {
            caller,
            to: Some(to),
            code_address: to,
            value,
            data,
            gas_limit,
            ..Default::default()
        }
    }

    /// Contract creation from `caller` running `init_code`.
    pub fn create(caller: Address, value: U256, init_code: Bytes, gas_limit: u64) -> Self {
        Self {
            caller,
            value,
            data: init_code,
            gas_limit,
            ..Default::default()
        }
    }

    /// Sub call sent by a running frame.
    pub fn from_call_inputs(inputs: &CallInputs, depth: usize) -> Self {
        Self {
            caller: inputs.caller,
            to: Some(inputs.target_address),
            code_address: inputs.bytecode_address,
            value: inputs.value.get(),
            data: inputs.input.clone(),
            gas_limit: inputs.gas_limit,
            is_static: inputs.is_static,
            delegatecall: inputs.scheme == CallScheme::DelegateCall,
            depth,
            ..Default::default()
        }
    }

    /// Creation sent by a running frame.
    pub fn from_create_inputs(inputs: &CreateInputs, depth: usize) -> Self {
        let salt = match inputs.scheme {
            CreateScheme::Create => None,
            CreateScheme::Create2 { salt } => Some(B256::from(salt)),
        };
        Self {
            caller: inputs.caller,
            value: inputs.value,
            data: inputs.init_code.clone(),
            gas_limit: inputs.gas_limit,
            depth,
            salt,
            ..Default::default()
        }
    }

    /// Sets the salt, turning a creation into `CREATE2`.
    pub fn with_salt(mut self, salt: B256) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Runs `code` instead of the code stored at the code address.
    pub fn with_code(mut self, code: Bytecode) -> Self {
        self.code = Some(code);
        self
    }

    /// Hands down the address sets of the sending frame.
    pub fn with_sets(mut self, selfdestruct: BTreeSet<Address>, created: BTreeSet<Address>) -> Self {
        self.selfdestruct = selfdestruct;
        self.created = created;
        self
    }

    /// Returns `true` for contract creations.
    #[inline]
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Returns `true` if the message moves a non-zero value.
    #[inline]
    pub fn transfers_value(&self) -> bool {
        !self.delegatecall && !self.value.is_zero()
    }

    /// Address of the contract this creation deploys.
    ///
    /// `nonce` is the caller nonce before it is bumped for this creation.
    pub fn created_address(&self, nonce: u64) -> Address {
        match self.salt {
            None => self.caller.create(nonce),
            Some(salt) => self.caller.create2(salt, keccak256(&self.data)),
        }
    }
}
