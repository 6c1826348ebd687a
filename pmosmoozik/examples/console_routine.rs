//! Example: run a party from the console
//!
//! This example demonstrates:
//! - Loading the client configuration (YAML file and `SMOOZIK_*` variables)
//! - Logging in and starting a party
//! - Publishing a playlist
//! - Announcing the current and next tracks
//! - Reading back the most requested tracks
//!
//! Run with:
//! `SMOOZIK_API_KEY=... SMOOZIK_SECRET=... cargo run --example console_routine -- <user> <password> [config.yaml]`

use anyhow::{Context, bail};
use pmosmoozik::{Playlist, SmoozikApi, SmoozikConfig, Track};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pmosmoozik=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        bail!("usage: console_routine <user> <password> [config.yaml]");
    };

    let mut config = match args.next() {
        Some(path) => SmoozikConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => SmoozikConfig::default(),
    };
    config.apply_env_overrides(std::env::vars())?;

    let mut api = SmoozikApi::from_config(&config)?;

    println!("Smoozik - Console Routine");
    println!("=========================\n");

    api.login(&username, &password).await?;
    println!("Logged in as {}", username);

    let party = api.start_party().await?;
    println!("Party started:\n{}", party);

    let mut playlist = Playlist::new();
    playlist.add_track(
        Track::new("1", "So What")
            .with_artist("Miles Davis")
            .with_album("Kind of Blue")
            .with_duration(562),
    );
    playlist.add_track(
        Track::new("2", "Giant Steps")
            .with_artist("John Coltrane")
            .with_album("Giant Steps")
            .with_duration(286),
    );
    playlist.add_track(
        Track::new("3", "Take Five")
            .with_artist("The Dave Brubeck Quartet")
            .with_album("Time Out")
            .with_duration(324),
    );
    playlist.add_track(Track::new("4", "Blue in Green").with_artist("Miles Davis"));

    api.send_playlist(&playlist).await?;
    println!("Sent {} tracks", playlist.len());

    if let Some(current) = playlist.first() {
        api.set_track(current, 0).await?;
        println!("Now playing: {}", current.name());
    }
    if let Some(next) = playlist.get(1) {
        api.set_track(next, 1).await?;
        println!("Up next: {}", next.name());
    }

    let top = api.get_top_tracks(10, 0).await?;
    println!("\nTop tracks:\n{}", top);

    let top_tracks = Playlist::from_value(&top["tracks"]);
    for (rank, track) in top_tracks.iter().enumerate() {
        println!(
            "  {:2}. {} - {}",
            rank + 1,
            track.artist().unwrap_or("Unknown artist"),
            track.name()
        );
    }

    if let Some(pick) = top_tracks.random_track() {
        println!("\nRandom pick from the top: {}", pick.name());
    }

    api.unset_all_tracks().await?;
    api.logout();

    Ok(())
}
