use soroban_sdk::{BytesN, Env};

/// Derives the consent data id the access gate checks for `data_type`.
///
/// The data type is stored big-endian in the last four bytes of an
/// otherwise zero id, so distinct data types never share an id and data
/// type `0` maps to the all-zero id the ledger rejects.
pub fn for_data_type(env: &Env, data_type: u32) -> BytesN<32> {
    let mut raw = [0u8; 32];
    raw[28..].copy_from_slice(&data_type.to_be_bytes());
    BytesN::from_array(env, &raw)
}

/// Returns `true` for the all-zero id.
pub fn is_zero(data_id: &BytesN<32>) -> bool {
    data_id.to_array() == [0u8; 32]
}
