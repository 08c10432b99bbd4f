//! Ledger entity id to EVM address derivation.
//!
//! The ledger identifies entities as `shard.realm.num` triples. The EVM
//! projection packs the triple big-endian into 20 bytes:
//! `shard (4B) ∥ realm (8B) ∥ num (8B)`.

/// Converts a `shard.realm.num` entity id into a 42-character EVM address.
///
/// Returns `None` when the input is not a well-formed triple.
///
/// # Examples
/// ```
/// use bifrost_core::utils::entity_id_to_evm_address;
///
/// assert_eq!(
///     entity_id_to_evm_address("0.0.1234").as_deref(),
///     Some("0x00000000000000000000000000000000000004d2"),
/// );
/// ```
#[must_use]
pub fn entity_id_to_evm_address(entity_id: &str) -> Option<String> {
    let mut parts = entity_id.split('.');
    let shard: u32 = parts.next()?.parse().ok()?;
    let realm: u64 = parts.next()?.parse().ok()?;
    let num: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let mut bytes = [0u8; 20];
    bytes[0..4].copy_from_slice(&shard.to_be_bytes());
    bytes[4..12].copy_from_slice(&realm.to_be_bytes());
    bytes[12..20].copy_from_slice(&num.to_be_bytes());

    Some(format!("0x{}", hex::encode(bytes)))
}
