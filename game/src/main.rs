use std::error::Error;

use engine::HeadlessRunner;
use engine::digest::state_digest;
use log::info;

use yoshi::playtest::{Frame, SessionLogic};
use yoshi::session::{Mode, Outcome};
use yoshi::settings::Difficulty;
use yoshi::store::SettingsStore;

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let ticks = env_usize("YOSHI_TICKS", 20_000).max(1);
    let dt_ms = env_u64("YOSHI_DT_MS", 16).max(1);
    let seed = env_u64("YOSHI_SEED", 0);
    let mode = Mode::from_index(env_usize("YOSHI_MODE", 4))?;

    let mut settings = SettingsStore::from_env().load_or_default();
    if let Ok(index) = std::env::var("YOSHI_DIFFICULTY") {
        settings.difficulty = Difficulty::from_index(index.parse()?)?;
    }

    println!("yoshi autoplay (headless)");
    println!(
        "mode={mode:?} difficulty={:?} seed={seed} ticks={ticks} dt={dt_ms}ms",
        settings.difficulty
    );

    let mut runner = HeadlessRunner::new(SessionLogic::new(mode, settings, seed))?;
    for _ in 0..ticks {
        runner.step(Frame::idle(dt_ms))?;
        if runner.state().is_game_over() {
            break;
        }
    }

    let session = runner.state();
    info!("stopped after {} frames", runner.frame());
    println!("frames={} game_over={}", runner.frame(), session.is_game_over());
    for (index, player) in session.players().iter().enumerate() {
        let stats = player.seat.stats();
        let outcome = session.outcome(index).unwrap_or(Outcome::Playing);
        println!(
            "seat {index}: {outcome:?} score={} yoshis={} matches={} elapsed={:.1}s",
            stats.score,
            stats.yoshis,
            stats.matches,
            stats.clock.elapsed().as_secs_f64()
        );
    }
    println!("digest={}", state_digest(session)?);

    if let Some(path) = std::env::var_os("YOSHI_RECORD") {
        runner.timemachine().save_json_file(&path)?;
        println!("recording saved to {}", std::path::Path::new(&path).display());
    }
    Ok(())
}
