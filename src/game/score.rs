use serde::{Deserialize, Serialize};

use super::board::Mark;
use super::rules::Outcome;
use super::session::GameEvent;

/// 跨局累计的比分，由事件驱动，不属于对局本身的状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Scoreboard {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &GameEvent) {
        let GameEvent::OutcomeDecided { outcome } = event else {
            return;
        };
        match outcome {
            Outcome::Win { mark: Mark::X, .. } => self.x_wins += 1,
            Outcome::Win { mark: Mark::O, .. } => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn games_played(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use crate::game::{GameSession, Mode};

    #[test]
    fn tallies_outcomes_across_games() {
        let mut session = GameSession::with_seed(Mode::PlayerVsPlayer, Difficulty::Easy, 5);
        let mut scores = Scoreboard::new();

        for index in [0, 3, 1, 4, 2] {
            let events = session.submit_move(index).expect("move should be legal");
            scores.record_all(&events);
        }
        scores.record_all(&session.reset());
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            let events = session.submit_move(index).expect("move should be legal");
            scores.record_all(&events);
        }

        assert_eq!(
            scores,
            Scoreboard {
                x_wins: 1,
                o_wins: 0,
                draws: 1
            }
        );
        assert_eq!(scores.games_played(), 2);

        scores.reset();
        assert_eq!(scores.games_played(), 0);
    }
}
