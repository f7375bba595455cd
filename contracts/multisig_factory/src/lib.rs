#![no_std]

mod factory;

mod test;

pub use crate::factory::{MultisigFactory, MultisigFactoryClient};
