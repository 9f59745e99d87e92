use crate::types::Track;

/// Narrows a pool before selection. Empty criteria keep every track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolFilter {
    /// Two letter country code matched against the ISRC prefix.
    pub market: Option<String>,
    pub artist_ids: Vec<String>,
}

impl PoolFilter {
    pub fn is_empty(&self) -> bool {
        self.market.is_none() && self.artist_ids.is_empty()
    }

    pub fn apply(&self, tracks: Vec<Track>) -> Vec<Track> {
        let tracks = match &self.market {
            Some(market) => filter_by_market(tracks, market),
            None => tracks,
        };

        if self.artist_ids.is_empty() {
            tracks
        } else {
            filter_by_artists(tracks, &self.artist_ids)
        }
    }
}

/// Keeps tracks whose ISRC was registered in `market`.
///
/// The first two characters of an ISRC are the registrant's country code.
pub fn filter_by_market(tracks: Vec<Track>, market: &str) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(|t| {
            t.isrc
                .get(..2)
                .is_some_and(|country| country.eq_ignore_ascii_case(market))
        })
        .collect()
}

/// Keeps tracks credited to at least one of `artist_ids`.
pub fn filter_by_artists(tracks: Vec<Track>, artist_ids: &[String]) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(|t| t.has_any_artist(artist_ids))
        .collect()
}
