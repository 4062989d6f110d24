use rand::RngCore;
use rand::rngs::OsRng;

use crate::core::constants::INVITE_TOKEN_BYTES;

/// Generates a hex-encoded invite token from the OS random source.
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; INVITE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn invite_link(origin: &str, token: &str) -> String {
    format!("{}/dashboard/groups/invite/{}", origin.trim_end_matches('/'), token)
}
