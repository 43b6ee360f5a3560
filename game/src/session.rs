use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::board::{BoardEvent, TickReport};
use crate::error::GameError;
use crate::planner::CpuController;
use crate::player::{HumanController, KeyEdge, PlayerController, Seat};
use crate::random::{RandomSource, SeededRng};
use crate::settings::GameSettings;
use crate::timer::GameClock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mode {
    SinglePlayerHuman,
    VsHighScore,
    VsClearBoard,
    VsAttack,
    SinglePlayerCpu,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::SinglePlayerHuman,
        Mode::VsHighScore,
        Mode::VsClearBoard,
        Mode::VsAttack,
        Mode::SinglePlayerCpu,
    ];

    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::UnknownMode(index))
    }

    pub fn is_multiplayer(self) -> bool {
        !matches!(self, Mode::SinglePlayerHuman | Mode::SinglePlayerCpu)
    }

    fn clock(self, settings: &GameSettings) -> GameClock {
        match self {
            Mode::VsHighScore => GameClock::countdown(settings.modes.high_score_limit),
            Mode::VsAttack => GameClock::countdown(settings.modes.attack_limit),
            _ => GameClock::untimed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub seat: Seat,
    pub controller: PlayerController,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

/// One to two players under one mode's rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session<R: RandomSource = SeededRng> {
    mode: Mode,
    settings: GameSettings,
    players: Vec<Player>,
    rng: R,
    game_over: bool,
}

impl<R: RandomSource> Session<R> {
    /// Seat the mode's default line-up: a lone human or CPU, or human versus CPU.
    pub fn new(mode: Mode, settings: GameSettings, rng: R) -> Self {
        let difficulty = settings.difficulty;
        let human = || PlayerController::Human(HumanController::new());
        let cpu = || PlayerController::Cpu(CpuController::new(difficulty, settings.planner));
        let controllers = match mode {
            Mode::SinglePlayerHuman => vec![human()],
            Mode::SinglePlayerCpu => vec![cpu()],
            _ => vec![human(), cpu()],
        };
        Self::with_controllers(mode, settings, rng, controllers)
    }

    pub fn with_controllers(
        mode: Mode,
        settings: GameSettings,
        mut rng: R,
        controllers: Vec<PlayerController>,
    ) -> Self {
        let players = controllers
            .into_iter()
            .map(|controller| {
                let mut seat = Seat::new(settings.difficulty, settings.board, mode.clock(&settings));
                if mode == Mode::VsClearBoard {
                    seat.board_mut().prefill(settings.modes.prefill_rows, &mut rng);
                }
                Player { seat, controller }
            })
            .collect();
        Self {
            mode,
            settings,
            players,
            rng,
            game_over: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.players.get(index).map(|p| &p.seat)
    }

    pub fn seat_mut(&mut self, index: usize) -> Option<&mut Seat> {
        self.players.get_mut(index).map(|p| &mut p.seat)
    }

    pub fn controller(&self, index: usize) -> Option<&PlayerController> {
        self.players.get(index).map(|p| &p.controller)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        let board = self.seat(index)?.board();
        Some(if !board.is_game_over() {
            Outcome::Playing
        } else if board.has_lost() {
            Outcome::Lost
        } else {
            Outcome::Won
        })
    }

    pub fn winner(&self) -> Option<usize> {
        (0..self.players.len()).find(|&i| self.outcome(i) == Some(Outcome::Won))
    }

    /// Advance every seat still in play by `dt`. `keys` go to human seats only.
    pub fn tick(&mut self, dt: Duration, keys: &[KeyEdge]) -> Result<(), GameError> {
        if self.game_over {
            return Ok(());
        }

        for index in 0..self.players.len() {
            let player = &mut self.players[index];
            if player.seat.board().is_game_over() {
                continue;
            }
            let keys: &[KeyEdge] = if player.controller.is_cpu() { &[] } else { keys };
            let report = player
                .controller
                .update(&mut player.seat, dt, &mut self.rng, keys)?;
            if let Some(report) = report {
                self.apply_report(index, &report);
            }
        }

        self.check_mode();
        self.game_over = self.players.iter().all(|p| p.seat.board().is_game_over());
        Ok(())
    }

    fn apply_report(&mut self, index: usize, report: &TickReport) {
        let scoring = self.settings.scoring;
        let attack = self.settings.modes.attack;
        let is_attack = self.mode == Mode::VsAttack;

        let matched = report.matched_pieces();
        if matched > 0 {
            let stats = self.players[index].seat.stats_mut();
            stats.score += matched as u32 * scoring.match_piece;
            stats.matches += (matched / 2) as u32;
            if is_attack {
                self.attack(index, attack.match_heal, attack.match_damage);
            }
        }

        if let Some(size) = report.yoshi_formed() {
            let stats = self.players[index].seat.stats_mut();
            stats.score += size as u32 * scoring.yoshi_piece;
            stats.yoshis += 1;
            if is_attack {
                self.attack(
                    index,
                    attack.scaling.apply(attack.yoshi_heal, size),
                    attack.scaling.apply(attack.yoshi_damage, size),
                );
            }
        }

        if report.has(&BoardEvent::Lost) {
            self.finish_with_loser(index);
        }
    }

    /// Heal the actor, damage everyone else. Countdowns floor at zero.
    fn attack(&mut self, actor: usize, heal: Duration, damage: Duration) {
        for (index, player) in self.players.iter_mut().enumerate() {
            let clock = &mut player.seat.stats_mut().clock;
            if index == actor {
                clock.heal(heal);
            } else {
                clock.damage(damage);
            }
        }
    }

    fn check_mode(&mut self) {
        match self.mode {
            Mode::VsAttack => {
                let expired = self.players.iter().position(|p| {
                    !p.seat.board().is_game_over() && p.seat.stats().clock.is_up()
                });
                if let Some(loser) = expired {
                    self.finish_with_loser(loser);
                }
            }
            Mode::VsClearBoard => {
                let cleared = self.players.iter().position(|p| {
                    !p.seat.board().is_game_over() && p.seat.board().is_cleared()
                });
                if let Some(winner) = cleared {
                    self.finish_with_winner(winner);
                }
            }
            Mode::VsHighScore => {
                let expired = self.players.iter().any(|p| {
                    !p.seat.board().is_game_over() && p.seat.stats().clock.is_up()
                });
                if expired {
                    let mut best: Option<(usize, u32)> = None;
                    for (index, player) in self.players.iter().enumerate() {
                        let score = player.seat.stats().score;
                        if best.is_none_or(|(_, top)| score > top) {
                            best = Some((index, score));
                        }
                    }
                    if let Some((winner, _)) = best {
                        self.finish_with_winner(winner);
                    }
                }
            }
            Mode::SinglePlayerHuman | Mode::SinglePlayerCpu => {}
        }
    }

    fn finish_with_winner(&mut self, winner: usize) {
        info!("session over ({:?}): seat {winner} wins", self.mode);
        for (index, player) in self.players.iter_mut().enumerate() {
            player.seat.board_mut().set_game_result(index != winner);
        }
    }

    fn finish_with_loser(&mut self, loser: usize) {
        if let Some(player) = self.players.get_mut(loser) {
            player.seat.board_mut().set_game_result(true);
        }
        if !self.mode.is_multiplayer() {
            info!("session over ({:?})", self.mode);
            return;
        }
        info!("session over ({:?}): seat {loser} loses", self.mode);
        for (index, player) in self.players.iter_mut().enumerate() {
            if index != loser {
                player.seat.board_mut().set_game_result(false);
            }
        }
    }
}
