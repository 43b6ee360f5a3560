use std::time::Duration;

use rand::prelude::*;

use yoshi::board::{COLUMNS, ROWS};
use yoshi::piece::PieceKind;
use yoshi::planner::{CpuAction, CpuController, locate_targets};
use yoshi::player::Seat;
use yoshi::random::ScriptedRandom;
use yoshi::settings::{BoardTuning, Difficulty, PlannerWeights};
use yoshi::timer::GameClock;

const DT: Duration = Duration::from_millis(16);

fn seat() -> Seat {
    Seat::new(Difficulty::Easy, BoardTuning::default(), GameClock::untimed())
}

#[test]
fn shell_bottom_and_goomba_over_empty_board() {
    let mut seat = seat();
    seat.board_mut().insert_falling(PieceKind::ShellBottom, 3, 0);
    seat.board_mut().insert_falling(PieceKind::Goomba, 2, 0);

    let mut cpu = CpuController::new(Difficulty::Easy, PlannerWeights::default());
    let mut rng = ScriptedRandom::default();

    cpu.update(&mut seat, DT, &mut rng).unwrap();
    let [t1, t2] = *cpu.targets().expect("targets located on first tick");
    assert_eq!(t1.destination_index, 3);
    let lowest = (0..COLUMNS)
        .map(|c| seat.board().column_height(c))
        .min()
        .unwrap();
    assert_eq!(
        seat.board().column_height(seat.order().index_of(t1.source).unwrap()),
        lowest
    );
    assert!(!t1.conflicts_with(&t2));

    let mut satisfied = false;
    for _ in 0..2_000 {
        cpu.update(&mut seat, DT, &mut rng).unwrap();
        if cpu.targets_satisfied(seat.order()).unwrap() {
            satisfied = true;
            break;
        }
    }
    assert!(satisfied, "cpu never lined up its targets");
    assert_ne!(cpu.last_action(), Some(CpuAction::ForceGravity));

    // Only ticks that end with the last swap still sliding may pass without forcing.
    let mut sliding_ticks = 0;
    loop {
        cpu.update(&mut seat, DT, &mut rng).unwrap();
        if !seat.board().is_swapping() {
            break;
        }
        assert_eq!(cpu.last_action(), Some(CpuAction::Swap));
        sliding_ticks += 1;
        assert!(sliding_ticks < 20, "swap never settled");
    }
    assert_eq!(cpu.last_action(), Some(CpuAction::ForceGravity));
    assert!(seat.board().gravity().is_up());
}

#[test]
fn targets_never_share_destination_or_source() {
    let mut rng = StdRng::seed_from_u64(2024);
    let weights = PlannerWeights::default();

    for _ in 0..300 {
        let mut seat = seat();
        for column in 0..COLUMNS {
            let height = rng.random_range(0..ROWS - 2);
            for depth in 0..height {
                let kind = PieceKind::from_index(rng.random_range(0..6)).unwrap();
                seat.board_mut().insert_placed(kind, column, ROWS - 1 - depth);
            }
        }
        let first = rng.random_range(0..COLUMNS);
        let second = (first + rng.random_range(1..COLUMNS)) % COLUMNS;
        for column in [first, second] {
            let kind = PieceKind::from_index(rng.random_range(0..6)).unwrap();
            seat.board_mut().insert_falling(kind, column, 0);
        }
        for _ in 0..rng.random_range(0..4) {
            seat.move_right();
            let _ = seat.switch_columns();
            while seat.board().is_swapping() {
                seat.board_mut()
                    .tick(DT, &mut ScriptedRandom::default())
                    .unwrap();
            }
        }

        let Some([t1, t2]) = locate_targets(&seat, &weights).unwrap() else {
            continue;
        };
        assert_ne!(t1.destination, t2.destination);
        assert_ne!(t1.source, t2.source);
        assert!(t1.score >= t2.score);
    }
}

#[test]
fn cpu_drops_targets_when_generation_lands() {
    let mut seat = seat();
    seat.board_mut().insert_placed(PieceKind::Boo, 0, 8);
    seat.board_mut().insert_placed(PieceKind::Plant, 1, 8);
    seat.board_mut().insert_falling(PieceKind::Squid, 0, 14);
    seat.board_mut().insert_falling(PieceKind::Squid, 1, 14);

    let mut cpu = CpuController::new(Difficulty::Hard, PlannerWeights::default());
    let mut rng = ScriptedRandom::default();
    cpu.update(&mut seat, DT, &mut rng).unwrap();
    assert!(cpu.targets().is_some());

    let mut cleared = false;
    for _ in 0..500 {
        cpu.update(&mut seat, DT, &mut rng).unwrap();
        if !seat.board().has_falling() && cpu.targets().is_none() {
            cleared = true;
            break;
        }
    }
    assert!(cleared);
}

#[test]
fn lost_board_is_left_alone() {
    let mut seat = seat();
    seat.board_mut().set_game_result(true);
    let mut cpu = CpuController::new(Difficulty::Medium, PlannerWeights::default());
    let report = cpu
        .update(&mut seat, DT, &mut ScriptedRandom::default())
        .unwrap();
    assert!(report.is_none());
    assert_eq!(seat.board().pieces().len(), 0);
}
