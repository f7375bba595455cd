use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MultisigError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidSignerSet = 3,
    QuorumTooSmall = 4,
    QuorumExceedsSigners = 5,
    UserNotSigner = 6,
    ZeroValueNotAllowed = 7,
    AddressZeroDetected = 8,
    InsufficientBalance = 9,
    InvalidTxId = 10,
    TransactionCompleted = 11,
    CantSignTwice = 12,
}
