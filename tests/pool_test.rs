use playtimer::management::{
    CacheError, CreatedPlaylistsManager, FollowedArtistsManager, POOL_ARTIST_TRACKS,
    POOL_FAVORITES, STATE_TYPE_ARTIST_TRACKS, StateManager, TrackPoolManager,
};
use playtimer::pool::*;
use playtimer::types::{Artist, CreatedPlaylist, Track};

// Helper function to create a test track
fn create_test_track(id: &str, duration_ms: u64, isrc: &str, artist_ids: &[&str]) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: format!("Track {}", id),
        duration_ms,
        isrc: isrc.to_string(),
        artist_ids: artist_ids.iter().map(|a| a.to_string()).collect(),
        artist_names: artist_ids.iter().map(|a| format!("Artist {}", a)).collect(),
    }
}

fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn test_filter_by_market() {
    let tracks = vec![
        create_test_track("1", 180_000, "JPAB01234567", &["a"]),
        create_test_track("2", 180_000, "USRC17607839", &["a"]),
        create_test_track("3", 180_000, "jpxy09876543", &["b"]),
        create_test_track("4", 180_000, "", &["b"]),
        create_test_track("5", 180_000, "J", &["b"]),
    ];

    let filtered = filter_by_market(tracks, "JP");

    assert_eq!(ids(&filtered), vec!["1", "3"]);
}

#[test]
fn test_filter_by_artists() {
    let tracks = vec![
        create_test_track("1", 180_000, "", &["a"]),
        create_test_track("2", 180_000, "", &["b", "c"]),
        create_test_track("3", 180_000, "", &["d"]),
        create_test_track("4", 180_000, "", &[]),
    ];

    let filtered = filter_by_artists(tracks, &["c".to_string(), "a".to_string()]);

    assert_eq!(ids(&filtered), vec!["1", "2"]);
}

#[test]
fn test_pool_filter_combines_criteria() {
    let tracks = vec![
        create_test_track("1", 180_000, "JPAB01234567", &["a"]),
        create_test_track("2", 180_000, "JPAB01234568", &["b"]),
        create_test_track("3", 180_000, "USRC17607839", &["a"]),
    ];

    let filter = PoolFilter {
        market: Some("JP".to_string()),
        artist_ids: vec!["a".to_string()],
    };
    assert!(!filter.is_empty());
    assert_eq!(ids(&filter.apply(tracks.clone())), vec!["1"]);

    let empty = PoolFilter::default();
    assert!(empty.is_empty());
    assert_eq!(empty.apply(tracks).len(), 3);
}

#[test]
fn test_pool_stats() {
    let tracks = vec![
        create_test_track("1", 180_000, "", &[]),
        create_test_track("2", 200_000, "", &[]),
    ];

    let stats = PoolStats::of(&tracks);

    assert_eq!(stats.tracks, 2);
    assert_eq!(stats.total_ms, 380_000);
    assert_eq!(PoolStats::of(&[]), PoolStats::default());
}

#[test]
fn test_pool_source_display() {
    assert_eq!(PoolSource::Favorites.to_string(), "favorites");
    assert_eq!(PoolSource::Artists.to_string(), "artists");
    assert_eq!(PoolSource::Catalog.to_string(), "catalog");
    assert_eq!(PoolSource::default(), PoolSource::Favorites);
}

#[test]
fn test_track_pool_manager_add_tracks() {
    let mut pool_mgr = TrackPoolManager::new(POOL_FAVORITES, None);

    pool_mgr.add_tracks(vec![
        create_test_track("1", 180_000, "", &[]),
        create_test_track("2", 0, "", &[]),
        create_test_track("1", 181_000, "", &[]),
    ]);
    pool_mgr.add_tracks(vec![create_test_track("3", 200_000, "", &[])]);

    assert_eq!(pool_mgr.count(), 2);
    assert_eq!(pool_mgr.total_duration_ms(), 380_000);
    assert_eq!(ids(pool_mgr.get_tracks()), vec!["1", "3"]);

    pool_mgr.replace_tracks(vec![create_test_track("4", 100_000, "", &[])]);
    assert_eq!(ids(pool_mgr.get_tracks()), vec!["4"]);
}

fn create_test_playlist(id: &str, name: &str) -> CreatedPlaylist {
    CreatedPlaylist {
        id: id.to_string(),
        name: name.to_string(),
        track_count: 12,
        created_at: 1_700_000_000,
    }
}

#[test]
fn test_cache_error() {
    let missing = CacheError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
    assert!(missing.is_not_found());
    assert!(missing.to_string().starts_with("cache io error: "));

    let denied = CacheError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
    assert!(!denied.is_not_found());

    let broken = serde_json::from_str::<Vec<Track>>("{").unwrap_err();
    let format = CacheError::from(broken);
    assert!(!format.is_not_found());
    assert!(format.to_string().starts_with("cache format error: "));
    assert!(std::error::Error::source(&format).is_some());
}

#[test]
fn test_created_playlists_add_and_remove() {
    let mut created_mgr = CreatedPlaylistsManager::new(Vec::new());
    assert!(created_mgr.is_empty());

    created_mgr
        .add(create_test_playlist("p1", "45 min"))
        .add(create_test_playlist("p2", "90 min"))
        .add(create_test_playlist("p1", "45 min"));

    let ids: Vec<&str> = created_mgr.get_playlists().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);

    assert!(created_mgr.remove("p1"));
    assert!(!created_mgr.remove("p1"));
    assert_eq!(created_mgr.get_playlists().len(), 1);
}

// Everything touching the data directory lives in this one test, the
// environment is shared by all tests of this binary.
#[tokio::test]
async fn test_caches_in_data_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    // SAFETY: no other test in this binary reads or writes the environment
    unsafe {
        std::env::set_var("PLAYTIMER_DATA_DIR", dir.path());
    }

    // nothing cached yet
    let err = load_pool(PoolSource::Favorites, &PoolFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PoolError::MissingCache(PoolSource::Favorites)));
    assert!(
        load_pool(PoolSource::Catalog, &PoolFilter::default())
            .await
            .is_err()
    );

    TrackPoolManager::new(
        POOL_FAVORITES,
        Some(vec![
            create_test_track("1", 180_000, "JPAB01234567", &["a"]),
            create_test_track("2", 200_000, "USRC17607839", &["b"]),
        ]),
    )
    .save_to_cache()
    .await
    .expect("save favorites");

    let favorites = load_pool(PoolSource::Favorites, &PoolFilter::default())
        .await
        .expect("favorites cached");
    assert_eq!(ids(&favorites), vec!["1", "2"]);

    // catalog tolerates the missing artist pool
    let catalog = load_pool(PoolSource::Catalog, &PoolFilter::default())
        .await
        .expect("catalog from favorites only");
    assert_eq!(catalog.len(), 2);
    assert!(matches!(
        load_pool(PoolSource::Artists, &PoolFilter::default()).await,
        Err(PoolError::MissingCache(PoolSource::Artists))
    ));

    TrackPoolManager::new(
        POOL_ARTIST_TRACKS,
        Some(vec![
            create_test_track("2", 200_000, "USRC17607839", &["b"]),
            create_test_track("3", 220_000, "JPCD01234567", &["c"]),
        ]),
    )
    .save_to_cache()
    .await
    .expect("save artist tracks");

    let catalog = load_pool(PoolSource::Catalog, &PoolFilter::default())
        .await
        .expect("catalog from both pools");
    assert_eq!(ids(&catalog), vec!["1", "2", "3"]);

    let japanese = PoolFilter {
        market: Some("JP".to_string()),
        artist_ids: Vec::new(),
    };
    let catalog_jp = load_pool(PoolSource::Catalog, &japanese)
        .await
        .expect("filtered catalog");
    assert_eq!(ids(&catalog_jp), vec!["1", "3"]);

    // a filter may leave nothing behind without being an error
    let nobody = PoolFilter {
        market: None,
        artist_ids: vec!["z".to_string()],
    };
    let empty = load_pool(PoolSource::Artists, &nobody)
        .await
        .expect("artist pool cached");
    assert!(empty.is_empty());

    // resume state survives a reload and clears without a file
    let mut state = StateManager::new(STATE_TYPE_ARTIST_TRACKS.to_string());
    state.add("a".to_string());
    state.persist().await.expect("persist state");
    let mut reloaded = StateManager::new(STATE_TYPE_ARTIST_TRACKS.to_string())
        .load()
        .await
        .expect("load state");
    assert!(reloaded.has("a"));
    assert!(!reloaded.has("b"));
    reloaded.clear().await.expect("clear state");
    reloaded.clear().await.expect("clearing twice is fine");
    assert!(reloaded.get_state().is_empty());

    FollowedArtistsManager::new(vec![Artist {
        id: "a".to_string(),
        name: "Artist a".to_string(),
        genres: vec!["j-pop".to_string()],
    }])
    .persist()
    .await
    .expect("persist artists");
    let artists = FollowedArtistsManager::load().await.expect("load artists");
    assert_eq!(artists.count(), 1);
    assert_eq!(artists.get_artists()[0].genres, vec!["j-pop".to_string()]);

    // created playlists: missing cache is empty, records survive a reload
    let empty = CreatedPlaylistsManager::load_or_empty()
        .await
        .expect("missing cache is empty");
    assert!(empty.is_empty());
    assert!(CreatedPlaylistsManager::load().await.unwrap_err().is_not_found());

    let mut created_mgr = CreatedPlaylistsManager::new(Vec::new());
    created_mgr
        .add(create_test_playlist("p1", "45 min"))
        .add(create_test_playlist("p2", "90 min"));
    created_mgr.persist().await.expect("persist created playlists");

    let mut reloaded = CreatedPlaylistsManager::load_or_empty()
        .await
        .expect("load created playlists");
    assert_eq!(reloaded.get_playlists(), created_mgr.get_playlists());

    // a removed playlist stays removed after persisting
    reloaded.remove("p1");
    reloaded.persist().await.expect("persist after remove");
    let mut reloaded = CreatedPlaylistsManager::load().await.expect("reload");
    assert_eq!(reloaded.get_playlists(), &[create_test_playlist("p2", "90 min")]);

    reloaded.clear().await.expect("clear created playlists");
    reloaded.clear().await.expect("clearing twice is fine");
    assert!(CreatedPlaylistsManager::load().await.unwrap_err().is_not_found());
}
