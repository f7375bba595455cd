#![cfg(test)]
extern crate std;

use super::*;
use multisig::MultisigClient;
use soroban_sdk::{testutils::Address as _, Address, Bytes, BytesN, Env, Vec};

// Built by `stellar contract build`; the end-to-end test skips when absent.
const MULTISIG_WASM_PATHS: &[&str] = &[
    "../../target/wasm32v1-none/release/multisig.wasm",
    "../../target/wasm32-unknown-unknown/release/multisig.wasm",
];

fn read_multisig_wasm() -> Option<std::vec::Vec<u8>> {
    MULTISIG_WASM_PATHS
        .iter()
        .find_map(|path| std::fs::read(path).ok())
}

fn create_signers(env: &Env, count: u32) -> Vec<Address> {
    let mut signers = Vec::new(env);
    for _ in 0..count {
        signers.push_back(Address::generate(env));
    }
    signers
}

// Registers the factory with a placeholder wasm hash. Enough for every
// path that rejects before deploying.
fn register_factory(env: &Env) -> Address {
    let factory_id = env.register(MultisigFactory, ());
    let wasm_hash = BytesN::from_array(env, &[7u8; 32]);
    MultisigFactoryClient::new(env, &factory_id).initialize(&wasm_hash);
    factory_id
}

#[test]
#[should_panic(expected = "Error(Contract, #1)")]
fn test_create_instance_before_initialize() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = env.register(MultisigFactory, ());
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let signers = create_signers(&env, 5);
    client.create_instance(&Address::generate(&env), &3, &signers);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_initialize_twice() {
    let env = Env::default();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    client.initialize(&BytesN::from_array(&env, &[7u8; 32]));
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn test_create_instance_quorum_too_small() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let signers = create_signers(&env, 5);
    client.create_instance(&Address::generate(&env), &1, &signers);
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_create_instance_quorum_exceeds_signers() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let signers = create_signers(&env, 5);
    client.create_instance(&Address::generate(&env), &7, &signers);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_create_instance_empty_signer_list() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let empty = Vec::new(&env);
    client.create_instance(&Address::generate(&env), &2, &empty);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_create_instance_duplicate_signer() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let repeated = Address::generate(&env);
    let mut signers = create_signers(&env, 3);
    signers.push_back(repeated.clone());
    signers.push_back(repeated);
    client.create_instance(&Address::generate(&env), &2, &signers);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_create_instance_zero_address_signer() {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let mut signers = create_signers(&env, 3);
    signers.push_back(multisig::zero_address(&env));
    client.create_instance(&Address::generate(&env), &2, &signers);
}

#[test]
fn test_list_instances_empty() {
    let env = Env::default();
    let factory_id = register_factory(&env);
    let client = MultisigFactoryClient::new(&env, &factory_id);

    assert_eq!(client.list_instances().len(), 0);
    assert_eq!(client.instance_count(), 0);
}

#[test]
fn test_create_instances_end_to_end() {
    let Some(wasm) = read_multisig_wasm() else {
        std::eprintln!("multisig wasm not built; skipping end-to-end factory test");
        return;
    };

    let env = Env::default();
    env.mock_all_auths();
    let factory_id = env.register(MultisigFactory, ());
    let client = MultisigFactoryClient::new(&env, &factory_id);

    let wasm_hash = env
        .deployer()
        .upload_contract_wasm(Bytes::from_slice(&env, &wasm));
    client.initialize(&wasm_hash);

    let deployer = Address::generate(&env);
    let first = client.create_instance(&deployer, &3, &create_signers(&env, 5));
    let second = client.create_instance(&deployer, &3, &create_signers(&env, 5));

    let instances = client.list_instances();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances.get_unchecked(0), first);
    assert_eq!(instances.get_unchecked(1), second);
    assert_eq!(client.instance_count(), 2);

    // Instances are independent and issue proposal ids from 1.
    let first_client = MultisigClient::new(&env, &first);
    let second_client = MultisigClient::new(&env, &second);
    assert_eq!(first_client.quorum(), 3);
    assert_eq!(first_client.no_of_valid_signers(), 6);
    assert!(first_client.is_valid_signer(&deployer));

    assert_eq!(first_client.update_quorum(&deployer, &4), 1);
    assert_eq!(second_client.update_quorum(&deployer, &4), 1);
    assert_eq!(first_client.quorum_tx_count(), 1);
    assert_eq!(second_client.quorum_tx_count(), 1);
}
