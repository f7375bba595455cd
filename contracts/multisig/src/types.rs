use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Deployer,
    Quorum,
    SignerCount,
    Signer(Address),
    TxCount,
    Transaction(u64),
    TransactionSigners(u64),
    QuorumTxCount,
    QuorumUpdate(u64),
    QuorumUpdateSigners(u64),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferTx {
    pub id: u64,
    pub sender: Address,
    pub recipient: Address,
    pub token_address: Address,
    pub amount: i128,
    pub no_of_approvals: u32,
    pub is_completed: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuorumUpdateTx {
    pub id: u64,
    pub new_quorum: u32,
    pub no_of_approvals: u32,
    pub is_completed: bool,
}
