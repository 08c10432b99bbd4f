//! Shared codec utilities: hex formatting/parsing and ledger entity ids.

pub mod entity;
pub mod hex;

pub use entity::entity_id_to_evm_address;
pub use hex::{
    parse_hex_u128, parse_hex_u64, prepend_0x, prune_0x, to_address, to_hash32, to_hex,
    to_hex_or_null, to_null_if_empty,
};
