use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RouterError {
    ExpiredDeadline = 300,
    IdenticalAddresses = 301,
    InsufficientAmount = 302,
    InsufficientLiquidity = 303,
    InsufficientInputAmount = 304,
    InsufficientOutputAmount = 305,
    ExcessiveInputAmount = 306,
    InvalidPath = 307,
    PairNotFound = 308,
    InsufficientAAmount = 309,
    InsufficientBAmount = 310,
    Overflow = 311,
    NotInitialized = 312,
    AlreadyInitialized = 313,
}
