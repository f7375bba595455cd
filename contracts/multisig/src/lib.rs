#![no_std]

mod errors;
mod multisig;
mod types;


pub use crate::errors::MultisigError;
pub use crate::multisig::{
    is_zero_address, validate_quorum, validate_signer_set, zero_address, Multisig, MultisigClient,
};
pub use crate::types::{QuorumUpdateTx, TransferTx};
