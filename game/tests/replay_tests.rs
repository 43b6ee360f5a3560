use engine::{
    HeadlessRunner,
    digest::{first_divergence, history_digests},
};

use yoshi::playtest::{Frame, SessionLogic};
use yoshi::player::{Key, KeyEdge};
use yoshi::session::Mode;
use yoshi::settings::GameSettings;

/// A fixed input script: idle frames with the occasional key tap.
fn script(frames: usize) -> Vec<Frame> {
    let keys = [Key::Right, Key::Space, Key::Left, Key::Down];
    (0..frames)
        .map(|i| {
            if i % 37 == 0 {
                Frame::with_keys(16, KeyEdge::tap(keys[(i / 37) % keys.len()]))
            } else {
                Frame::idle(16)
            }
        })
        .collect()
}

fn record(mode: Mode, seed: u64, frames: &[Frame]) -> HeadlessRunner<SessionLogic> {
    let logic = SessionLogic::new(mode, GameSettings::default(), seed);
    let mut runner = HeadlessRunner::new(logic).expect("initial session");
    runner.run(frames.iter().cloned()).expect("session steps");
    runner
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let frames = script(1_500);
    for mode in Mode::ALL {
        let a = record(mode, 42, &frames);
        let b = record(mode, 42, &frames);

        let da = history_digests(a.timemachine()).unwrap();
        let db = history_digests(b.timemachine()).unwrap();
        assert_eq!(da.len(), frames.len() + 1);
        assert_eq!(first_divergence(&da, &db), None, "{mode:?}");
    }
}

#[test]
fn different_seeds_differ_from_the_first_frame() {
    let frames = script(10);
    let a = record(Mode::SinglePlayerCpu, 1, &frames);
    let b = record(Mode::SinglePlayerCpu, 2, &frames);

    let da = history_digests(a.timemachine()).unwrap();
    let db = history_digests(b.timemachine()).unwrap();
    assert_eq!(first_divergence(&da, &db), Some(0));
}

#[test]
fn rewound_recording_continues_on_a_new_branch() {
    let frames = script(200);
    let mut runner = record(Mode::SinglePlayerHuman, 3, &frames);
    runner.rewind(50);
    assert_eq!(runner.frame(), 150);
    assert!(runner.timemachine().state_at(200).is_some());
    assert_eq!(runner.timemachine().state_at(150), Some(runner.state()));

    runner.step(Frame::idle(16)).unwrap();
    assert_eq!(runner.frame(), 151);
    assert_eq!(runner.history().len(), 152);

    let straight = record(Mode::SinglePlayerHuman, 3, &frames[..150]);
    let mut branch = straight;
    branch.step(Frame::idle(16)).unwrap();
    assert_eq!(branch.state(), runner.state());
}

#[cfg(feature = "files")]
mod saved {
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use engine::TimeMachine;
    use yoshi::session::Session;

    use super::*;

    fn unique_temp_json_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("yoshi_replay_test_{tag}_{nanos}.json"))
    }

    #[test]
    fn saved_recording_reloads_to_same_history() {
        let runner = record(Mode::VsAttack, 7, &script(400));
        let out = unique_temp_json_path("vs_attack");
        runner
            .timemachine()
            .save_json_file(&out)
            .expect("save recording");

        let loaded = TimeMachine::<Session>::load_json_file(&out).expect("load recording");
        assert_eq!(loaded.frame(), runner.frame());
        assert_eq!(
            history_digests(&loaded).unwrap(),
            history_digests(runner.timemachine()).unwrap()
        );
        assert_eq!(loaded.state(), runner.state());

        // resumed play continues exactly where the recording left off
        let mut original = runner;
        let mut resumed = HeadlessRunner::from_timemachine(original.game().clone(), loaded);
        assert_eq!(resumed.game().mode(), Mode::VsAttack);
        let tail = script(120);
        original.run(tail.iter().cloned()).unwrap();
        resumed.run(tail).unwrap();
        assert_eq!(resumed.frame(), original.frame());
        assert_eq!(resumed.state(), original.state());

        let _ = fs::remove_file(out);
    }
}
