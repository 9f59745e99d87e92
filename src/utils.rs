use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{Track, TrackTableRow};

pub const MILLISECONDS_PER_SECOND: u64 = 1_000;
pub const MILLISECONDS_PER_MINUTE: u64 = 60 * MILLISECONDS_PER_SECOND;

/// Longest playlist the CLI accepts, one day.
pub const MAX_MINUTES: u64 = 24 * 60;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes * MILLISECONDS_PER_MINUTE
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / MILLISECONDS_PER_SECOND;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Value parser for `--minutes`.
pub fn parse_minutes(s: &str) -> Result<u64, String> {
    let minutes: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid value '{}' (expected a whole number of minutes)", s))?;

    if minutes == 0 || minutes > MAX_MINUTES {
        return Err(format!(
            "invalid value '{}' (expected 1 to {} minutes)",
            minutes, MAX_MINUTES
        ));
    }

    Ok(minutes)
}

/// Value parser for `--market`: a two letter country code, upper-cased.
pub fn parse_market(s: &str) -> Result<String, String> {
    let market = s.trim().to_ascii_uppercase();
    if market.len() != 2 || !market.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!(
            "invalid value '{}' (expected a two letter country code like JP)",
            s
        ));
    }
    Ok(market)
}

/// Keeps the first occurrence of every track id.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            duration: format_duration_ms(t.duration_ms),
            name: t.name.clone(),
            artists: t.artist_names.join(", "),
        })
        .collect()
}
