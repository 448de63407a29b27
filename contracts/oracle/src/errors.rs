use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OracleError {
    AlreadyInitialized = 400,
    NotInitialized = 401,
    InvalidPair = 402,
    InvalidToken = 403,
    InvalidPeriod = 404,
    InsufficientHistory = 405,
    StalePrice = 406,
    Overflow = 407,
    InvalidAmount = 408,
}
