use soroban_sdk::{
    contract, contractimpl, contracttype, panic_with_error, Address, BytesN, Env, Vec,
};

use multisig::{validate_quorum, validate_signer_set, MultisigClient, MultisigError};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    WasmHash,
    InstanceCount,
    Instances,
}

#[contract]
pub struct MultisigFactory;

#[contractimpl]
impl MultisigFactory {
    pub fn initialize(env: Env, multisig_wasm_hash: BytesN<32>) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, MultisigError::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage()
            .instance()
            .set(&DataKey::WasmHash, &multisig_wasm_hash);
        env.storage().instance().set(&DataKey::InstanceCount, &0u32);
        env.storage()
            .instance()
            .set(&DataKey::Instances, &Vec::<Address>::new(&env));
    }

    /// Deploys and initializes an independent controller instance. The
    /// caller becomes the instance's deployer and first signer. Construction
    /// parameters are validated with the controller's own checks before
    /// anything is deployed, so rejections carry the controller's error
    /// codes.
    pub fn create_instance(
        env: Env,
        deployer: Address,
        quorum: u32,
        valid_signers: Vec<Address>,
    ) -> Address {
        deployer.require_auth();
        Self::require_initialized(&env);

        validate_signer_set(&env, &deployer, &valid_signers);
        validate_quorum(&env, quorum, valid_signers.len() + 1);

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::InstanceCount)
            .unwrap_or(0u32);
        let wasm_hash: BytesN<32> = env.storage().instance().get(&DataKey::WasmHash).unwrap();

        let mut salt = [0u8; 32];
        salt[28..].copy_from_slice(&count.to_be_bytes());
        let instance = env
            .deployer()
            .with_current_contract(BytesN::from_array(&env, &salt))
            .deploy_v2(wasm_hash, ());

        MultisigClient::new(&env, &instance).initialize(&deployer, &valid_signers, &quorum);

        let mut instances: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Instances)
            .unwrap_or(Vec::new(&env));
        instances.push_back(instance.clone());
        env.storage().instance().set(&DataKey::Instances, &instances);
        env.storage().instance().set(&DataKey::InstanceCount, &(count + 1));

        instance
    }

    pub fn list_instances(env: Env) -> Vec<Address> {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::Instances)
            .unwrap_or(Vec::new(&env))
    }

    pub fn instance_count(env: Env) -> u32 {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::InstanceCount)
            .unwrap_or(0u32)
    }

    fn require_initialized(env: &Env) {
        if !env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(env, MultisigError::NotInitialized);
        }
    }
}
