use soroban_sdk::{contract, contractimpl, panic_with_error, token, Address, Env, Vec};

use crate::errors::MultisigError;
use crate::types::{DataKey, QuorumUpdateTx, TransferTx};

// Canonical all-zero account and contract strkeys. Either one is treated
// as "address zero" for input validation.
const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";
const ZERO_CONTRACT: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

pub fn zero_address(env: &Env) -> Address {
    Address::from_str(env, ZERO_ACCOUNT)
}

pub fn is_zero_address(env: &Env, addr: &Address) -> bool {
    *addr == Address::from_str(env, ZERO_ACCOUNT) || *addr == Address::from_str(env, ZERO_CONTRACT)
}

/// Validates the combined signer set (deployer + configured signers): the
/// configured list must be non-empty, no member may be the zero address and
/// no address may appear twice. The deployer counts as a member.
pub fn validate_signer_set(env: &Env, deployer: &Address, valid_signers: &Vec<Address>) {
    if valid_signers.is_empty() {
        panic_with_error!(env, MultisigError::InvalidSignerSet);
    }

    let mut members: Vec<Address> = Vec::new(env);
    members.push_back(deployer.clone());
    for signer in valid_signers.iter() {
        members.push_back(signer);
    }

    for i in 0..members.len() {
        let member = members.get_unchecked(i);
        if is_zero_address(env, &member) {
            panic_with_error!(env, MultisigError::InvalidSignerSet);
        }
        for j in (i + 1)..members.len() {
            if member == members.get_unchecked(j) {
                panic_with_error!(env, MultisigError::InvalidSignerSet);
            }
        }
    }
}

/// Validates a requested quorum against the total signer count.
pub fn validate_quorum(env: &Env, quorum: u32, signer_count: u32) {
    if quorum < 2 {
        panic_with_error!(env, MultisigError::QuorumTooSmall);
    }
    if quorum > signer_count {
        panic_with_error!(env, MultisigError::QuorumExceedsSigners);
    }
}

#[contract]
pub struct Multisig;

#[contractimpl]
impl Multisig {
    /// Sets up the signer registry and quorum. The deployer is always a
    /// signer; `quorum` applies to the combined set.
    pub fn initialize(env: Env, deployer: Address, valid_signers: Vec<Address>, quorum: u32) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, MultisigError::AlreadyInitialized);
        }

        validate_signer_set(&env, &deployer, &valid_signers);

        let signer_count = valid_signers.len() + 1;
        validate_quorum(&env, quorum, signer_count);

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Deployer, &deployer);
        env.storage().instance().set(&DataKey::Quorum, &quorum);
        env.storage().instance().set(&DataKey::SignerCount, &signer_count);
        env.storage().instance().set(&DataKey::TxCount, &0u64);
        env.storage().instance().set(&DataKey::QuorumTxCount, &0u64);

        env.storage().instance().set(&DataKey::Signer(deployer), &true);
        for signer in valid_signers {
            env.storage().instance().set(&DataKey::Signer(signer), &true);
        }
    }

    pub fn quorum(env: Env) -> u32 {
        Self::require_initialized(&env);
        env.storage().instance().get(&DataKey::Quorum).unwrap()
    }

    pub fn no_of_valid_signers(env: Env) -> u32 {
        Self::require_initialized(&env);
        env.storage().instance().get(&DataKey::SignerCount).unwrap()
    }

    pub fn is_valid_signer(env: Env, signer: Address) -> bool {
        Self::require_initialized(&env);
        env.storage().instance().has(&DataKey::Signer(signer))
    }

    pub fn tx_count(env: Env) -> u64 {
        Self::require_initialized(&env);
        env.storage().instance().get(&DataKey::TxCount).unwrap_or(0u64)
    }

    pub fn quorum_tx_count(env: Env) -> u64 {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::QuorumTxCount)
            .unwrap_or(0u64)
    }

    /// Opens a transfer proposal. The caller's own approval is recorded
    /// immediately, so the proposal starts with one vote.
    pub fn transfer(
        env: Env,
        caller: Address,
        amount: i128,
        recipient: Address,
        token_address: Address,
    ) -> u64 {
        caller.require_auth();
        Self::require_initialized(&env);

        if amount <= 0 {
            panic_with_error!(&env, MultisigError::ZeroValueNotAllowed);
        }

        if is_zero_address(&env, &recipient) || is_zero_address(&env, &token_address) {
            panic_with_error!(&env, MultisigError::AddressZeroDetected);
        }

        if !env.storage().instance().has(&DataKey::Signer(caller.clone())) {
            panic_with_error!(&env, MultisigError::UserNotSigner);
        }

        let token_client = token::Client::new(&env, &token_address);
        if token_client.balance(&env.current_contract_address()) < amount {
            panic_with_error!(&env, MultisigError::InsufficientBalance);
        }

        let tx_count: u64 = env.storage().instance().get(&DataKey::TxCount).unwrap_or(0u64);
        let tx_id = tx_count + 1;
        env.storage().instance().set(&DataKey::TxCount, &tx_id);

        let tx = TransferTx {
            id: tx_id,
            sender: caller.clone(),
            recipient,
            token_address,
            amount,
            no_of_approvals: 1,
            is_completed: false,
        };
        env.storage().instance().set(&DataKey::Transaction(tx_id), &tx);

        let mut signed: Vec<Address> = Vec::new(&env);
        signed.push_back(caller);
        env.storage()
            .instance()
            .set(&DataKey::TransactionSigners(tx_id), &signed);

        tx_id
    }

    /// Casts an approval on a transfer proposal. The vote that reaches the
    /// current quorum completes the proposal and performs the token transfer
    /// within the same call. Quorum is read at vote time, so a quorum update
    /// completing while the proposal is open changes its effective threshold.
    pub fn approve_tx(env: Env, caller: Address, tx_id: u64) {
        caller.require_auth();
        Self::require_initialized(&env);

        // Membership is checked before the id: a non-signer is rejected the
        // same way no matter what id it names.
        if !env.storage().instance().has(&DataKey::Signer(caller.clone())) {
            panic_with_error!(&env, MultisigError::UserNotSigner);
        }

        let tx_count: u64 = env.storage().instance().get(&DataKey::TxCount).unwrap_or(0u64);
        if tx_id == 0 || tx_id > tx_count {
            panic_with_error!(&env, MultisigError::InvalidTxId);
        }

        let mut tx: TransferTx = env
            .storage()
            .instance()
            .get(&DataKey::Transaction(tx_id))
            .unwrap();
        if tx.is_completed {
            panic_with_error!(&env, MultisigError::TransactionCompleted);
        }

        let mut signed: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::TransactionSigners(tx_id))
            .unwrap_or(Vec::new(&env));
        if signed.contains(&caller) {
            panic_with_error!(&env, MultisigError::CantSignTwice);
        }

        signed.push_back(caller);
        tx.no_of_approvals += 1;

        let quorum: u32 = env.storage().instance().get(&DataKey::Quorum).unwrap();
        if tx.no_of_approvals >= quorum {
            // Balance may have moved since the proposal was opened. A panic
            // here aborts the whole call, so the vote itself is rolled back
            // and can be retried once the contract is funded again.
            let token_client = token::Client::new(&env, &tx.token_address);
            let contract_address = env.current_contract_address();
            if token_client.balance(&contract_address) < tx.amount {
                panic_with_error!(&env, MultisigError::InsufficientBalance);
            }

            tx.is_completed = true;
            token_client.transfer(&contract_address, &tx.recipient, &tx.amount);
        }

        env.storage().instance().set(&DataKey::Transaction(tx_id), &tx);
        env.storage()
            .instance()
            .set(&DataKey::TransactionSigners(tx_id), &signed);
    }

    /// Opens a quorum-change proposal on its own ledger, with an id space
    /// independent of transfer proposals.
    pub fn update_quorum(env: Env, caller: Address, new_quorum: u32) -> u64 {
        caller.require_auth();
        Self::require_initialized(&env);

        if !env.storage().instance().has(&DataKey::Signer(caller.clone())) {
            panic_with_error!(&env, MultisigError::UserNotSigner);
        }

        let signer_count: u32 = env.storage().instance().get(&DataKey::SignerCount).unwrap();
        validate_quorum(&env, new_quorum, signer_count);

        let quorum_tx_count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::QuorumTxCount)
            .unwrap_or(0u64);
        let tx_id = quorum_tx_count + 1;
        env.storage().instance().set(&DataKey::QuorumTxCount, &tx_id);

        let tx = QuorumUpdateTx {
            id: tx_id,
            new_quorum,
            no_of_approvals: 1,
            is_completed: false,
        };
        env.storage().instance().set(&DataKey::QuorumUpdate(tx_id), &tx);

        let mut signed: Vec<Address> = Vec::new(&env);
        signed.push_back(caller);
        env.storage()
            .instance()
            .set(&DataKey::QuorumUpdateSigners(tx_id), &signed);

        tx_id
    }

    /// Casts an approval on a quorum-change proposal. The vote that reaches
    /// the current quorum completes the proposal and installs the new
    /// threshold within the same call.
    pub fn approve_update_quorum(env: Env, caller: Address, tx_id: u64) {
        caller.require_auth();
        Self::require_initialized(&env);

        if !env.storage().instance().has(&DataKey::Signer(caller.clone())) {
            panic_with_error!(&env, MultisigError::UserNotSigner);
        }

        let quorum_tx_count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::QuorumTxCount)
            .unwrap_or(0u64);
        if tx_id == 0 || tx_id > quorum_tx_count {
            panic_with_error!(&env, MultisigError::InvalidTxId);
        }

        let mut tx: QuorumUpdateTx = env
            .storage()
            .instance()
            .get(&DataKey::QuorumUpdate(tx_id))
            .unwrap();
        if tx.is_completed {
            panic_with_error!(&env, MultisigError::TransactionCompleted);
        }

        let mut signed: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::QuorumUpdateSigners(tx_id))
            .unwrap_or(Vec::new(&env));
        if signed.contains(&caller) {
            panic_with_error!(&env, MultisigError::CantSignTwice);
        }

        signed.push_back(caller);
        tx.no_of_approvals += 1;

        let quorum: u32 = env.storage().instance().get(&DataKey::Quorum).unwrap();
        if tx.no_of_approvals >= quorum {
            tx.is_completed = true;
            env.storage().instance().set(&DataKey::Quorum, &tx.new_quorum);
        }

        env.storage().instance().set(&DataKey::QuorumUpdate(tx_id), &tx);
        env.storage()
            .instance()
            .set(&DataKey::QuorumUpdateSigners(tx_id), &signed);
    }

    /// True iff `signer` has voted on proposal `tx_id` in either ledger.
    /// Never panics; unknown ids answer false.
    pub fn has_signed(env: Env, signer: Address, tx_id: u64) -> bool {
        Self::require_initialized(&env);

        let transfer_signers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::TransactionSigners(tx_id))
            .unwrap_or(Vec::new(&env));
        if transfer_signers.contains(&signer) {
            return true;
        }

        let quorum_signers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::QuorumUpdateSigners(tx_id))
            .unwrap_or(Vec::new(&env));
        quorum_signers.contains(&signer)
    }

    /// Returns the transfer proposal, or a zero-valued record for an
    /// unknown id.
    pub fn transactions(env: Env, tx_id: u64) -> TransferTx {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::Transaction(tx_id))
            .unwrap_or_else(|| TransferTx {
                id: 0,
                sender: zero_address(&env),
                recipient: zero_address(&env),
                token_address: zero_address(&env),
                amount: 0,
                no_of_approvals: 0,
                is_completed: false,
            })
    }

    /// Returns the quorum-change proposal, or a zero-valued record for an
    /// unknown id.
    pub fn quorum_updates(env: Env, tx_id: u64) -> QuorumUpdateTx {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::QuorumUpdate(tx_id))
            .unwrap_or(QuorumUpdateTx {
                id: 0,
                new_quorum: 0,
                no_of_approvals: 0,
                is_completed: false,
            })
    }

    fn require_initialized(env: &Env) {
        if !env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(env, MultisigError::NotInitialized);
        }
    }
}
