//! Bit-exact constants of the Ethereum projection.

use std::time::Duration;

/// Empty hex payload.
pub const EMPTY_HEX: &str = "0x";
/// Minimal zero quantity.
pub const ZERO_HEX: &str = "0x0";
/// Minimal one quantity.
pub const ONE_HEX: &str = "0x1";
/// 8-byte zero (block nonce).
pub const ZERO_HEX_8_BYTE: &str = "0x0000000000000000";
/// 32-byte zero (state/receipts roots, mix hash).
pub const ZERO_HEX_32_BYTE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";
/// 20-byte zero address.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
/// Keccak-256 of an empty RLP array (`sha3Uncles` of every block).
pub const EMPTY_ARRAY_KECCAK: &str =
    "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347";
/// Root of the empty trie (`transactionsRoot` of an empty block).
pub const EMPTY_TRIE_ROOT: &str =
    "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421";
/// 256-byte zero bloom filter.
pub const EMPTY_BLOOM: &str = "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";

/// Conversion factor from the ledger's native tinybar unit to weibar, the
/// EVM-scaled equivalent.
pub const TINYBAR_TO_WEIBAR: u128 = 10_000_000_000;

/// Intrinsic cost of a value transfer; `eth_estimateGas` answer for calls
/// without data.
pub const TX_BASE_COST: u64 = 21_000;
/// Default gas attributed to contract interactions when the caller supplies
/// none.
pub const TX_DEFAULT_GAS: u64 = 400_000;

/// Fee schedule entry consumed by the fee engine.
pub const ETHEREUM_TRANSACTION_TYPE: &str = "EthereumTransaction";

/// Per-block utilization reported by `eth_feeHistory`. The ledger does not
/// expose per-block gas usage, so a fixed ratio stands in.
pub const FEE_HISTORY_GAS_USED_RATIO: f64 = 0.5;

/// Cache key for the current gas price.
pub const CACHE_KEY_GAS_PRICE: &str = "gasPrice";
/// Cache key for the synthesized fee history.
pub const CACHE_KEY_FEE_HISTORY: &str = "feeHistory";
/// TTL shared by the fee caches and the negative-result caches.
pub const CACHE_TTL_ONE_HOUR: Duration = Duration::from_secs(60 * 60);
