use alloy_primitives::{address, Address};

// Default FractionalProperty deployment address (first Hardhat deploy slot).
pub const DEFAULT_CONTRACT_ADDRESS: Address =
    address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;

/// EIP-3326: the requested chain has not been added to the wallet.
pub const CODE_UNKNOWN_CHAIN: i64 = 4902;

/// JSON-RPC: a request of this kind is already being processed by the wallet.
pub const CODE_REQUEST_PENDING: i64 = -32002;

/// Message fragments wallets attach to rejections that carry no code.
pub const REJECTION_FRAGMENTS: &[&str] = &["rejected", "User denied", "ACTION_REJECTED"];

/// Message fragment for a wallet still busy with a previous request.
pub const PENDING_FRAGMENT: &str = "already processing";
