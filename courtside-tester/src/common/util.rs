use anyhow::Result;
use courtside_game::PlayRecord;
use sha2::{Digest, Sha256};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Hex SHA-256 of the serialized play log.
pub fn play_log_digest(plays: &[PlayRecord]) -> Result<String> {
    let bytes = serde_json::to_vec(plays)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
