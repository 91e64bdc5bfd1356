use crate::{Host, Interpreter};
use primitives::{Features, U256};

/// EIP-1344: ChainID opcode
pub fn chainid<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, U256::from(host.env().cfg.chain_id));
}

pub fn coinbase<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.beneficiary.into_word().into());
}

pub fn timestamp<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, U256::from(host.env().block.timestamp));
}

pub fn block_number<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, U256::from(host.env().block.number));
}

/// `DIFFICULTY`, reads `PREVRANDAO` after the merge (EIP-4399).
pub fn difficulty<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    let block = &host.env().block;
    let value: U256 = if interpreter.features.contains(Features::EIP4399) {
        block.prevrandao.unwrap_or_default().into()
    } else {
        block.difficulty
    };
    push!(interpreter, value);
}

pub fn gaslimit<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, U256::from(host.env().block.gas_limit));
}

pub fn gasprice<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    let env = host.env();
    push!(interpreter, env.tx.effective_gas_price(env.block.basefee));
}

/// EIP-3198: BASEFEE opcode
pub fn basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.basefee);
}

pub fn origin<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().tx.caller.into_word().into());
}

/// EIP-4844: Shard Blob Transactions
pub fn blob_hash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], index, interpreter);
    let i = as_usize_saturated!(index);
    *index = match host.env().tx.blob_hashes.get(i) {
        Some(hash) => U256::from_be_bytes(hash.0),
        None => U256::ZERO,
    };
}

/// EIP-7516: BLOBBASEFEE opcode
pub fn blob_basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.blob_basefee);
}
