//! `FreeSpinsSession`: created on trigger, destroyed on completion, state
//! transitions expressed as `apply(self, Event) -> Result<Self, _>` so a
//! caller holding a session under a lock swaps in the returned value
//! rather than mutating through a shared reference.

use crate::error::FreeSpinsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sf_core::{ConfigId, FreeSpinsSessionId, GameSessionId, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsSession {
    pub id: FreeSpinsSessionId,
    pub player_id: PlayerId,
    pub game_session_id: GameSessionId,
    pub strip_config_ref: ConfigId,
    pub total_awarded: u32,
    pub completed: u32,
    pub remaining: u32,
    pub locked_bet: f64,
    pub total_won: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Events a session can be asked to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreeSpinsEvent {
    /// One free spin resolved for `win`; `retrigger_award` is
    /// `Some(award)` when that same spin's scatter count also triggered a
    /// retrigger (§4.5: "may occur during the final spin").
    ExecuteSpin { win: f64, retrigger_award: Option<u32> },
    /// Administrative force-close: the session stops accepting spins
    /// regardless of `remaining`.
    ForceClose,
}

impl FreeSpinsSession {
    /// Opens a new session on a scatter trigger. `award` is the output of
    /// the paytable's free-spins award formula.
    pub fn trigger(
        player_id: PlayerId,
        game_session_id: GameSessionId,
        strip_config_ref: ConfigId,
        locked_bet: f64,
        award: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: FreeSpinsSessionId::new(),
            player_id,
            game_session_id,
            strip_config_ref,
            total_awarded: award,
            completed: 0,
            remaining: award,
            locked_bet,
            total_won: 0.0,
            active: award > 0,
            created_at,
        }
    }

    pub fn is_completed(&self) -> bool {
        !self.active && self.remaining == 0
    }

    /// Applies one event, returning the session's next value. Never
    /// mutates `self`.
    pub fn apply(&self, event: FreeSpinsEvent) -> Result<Self, FreeSpinsError> {
        match event {
            FreeSpinsEvent::ExecuteSpin { win, retrigger_award } => self.apply_execute_spin(win, retrigger_award),
            FreeSpinsEvent::ForceClose => Ok(self.force_close()),
        }
    }

    fn apply_execute_spin(&self, win: f64, retrigger_award: Option<u32>) -> Result<Self, FreeSpinsError> {
        if self.is_completed() {
            return Err(FreeSpinsError::AlreadyCompleted);
        }
        if !self.active {
            return Err(FreeSpinsError::NotActive);
        }
        if self.remaining == 0 {
            return Err(FreeSpinsError::NoSpinsRemaining);
        }

        let mut next = self.clone();
        next.remaining -= 1;
        next.completed += 1;
        next.total_won += win;
        if let Some(award) = retrigger_award {
            next.total_awarded += award;
            next.remaining += award;
        }
        next.active = next.remaining > 0;
        Ok(next)
    }

    fn force_close(&self) -> Self {
        let mut next = self.clone();
        next.active = false;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture() -> FreeSpinsSession {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        FreeSpinsSession::trigger(PlayerId::new(), GameSessionId::new(), ConfigId::new(), 1.0, 10, created_at)
    }

    #[test]
    fn conservation_invariant_holds_on_trigger() {
        let session = fixture();
        assert_eq!(session.completed + session.remaining, session.total_awarded);
    }

    #[test]
    fn executing_spins_preserves_conservation_and_decrements_remaining() {
        let mut session = fixture();
        for _ in 0..10 {
            session = session
                .apply(FreeSpinsEvent::ExecuteSpin { win: 2.0, retrigger_award: None })
                .unwrap();
            assert_eq!(session.completed + session.remaining, session.total_awarded);
        }
        assert!(session.is_completed());
        assert_eq!(session.total_won, 20.0);
    }

    #[test]
    fn retrigger_is_additive_to_both_totals() {
        let session = fixture();
        let next = session
            .apply(FreeSpinsEvent::ExecuteSpin {
                win: 0.0,
                retrigger_award: Some(14),
            })
            .unwrap();
        assert_eq!(next.total_awarded, 24);
        assert_eq!(next.remaining, 23);
        assert_eq!(next.completed + next.remaining, next.total_awarded);
    }

    #[test]
    fn retrigger_on_the_final_spin_keeps_session_active() {
        let mut session = fixture();
        for _ in 0..9 {
            session = session
                .apply(FreeSpinsEvent::ExecuteSpin { win: 0.0, retrigger_award: None })
                .unwrap();
        }
        assert_eq!(session.remaining, 1);
        let final_spin = session
            .apply(FreeSpinsEvent::ExecuteSpin {
                win: 0.0,
                retrigger_award: Some(12),
            })
            .unwrap();
        assert!(final_spin.active);
        assert_eq!(final_spin.remaining, 12);
    }

    #[test]
    fn completion_is_terminal() {
        let mut session = fixture();
        for _ in 0..10 {
            session = session
                .apply(FreeSpinsEvent::ExecuteSpin { win: 0.0, retrigger_award: None })
                .unwrap();
        }
        let err = session
            .apply(FreeSpinsEvent::ExecuteSpin { win: 0.0, retrigger_award: None })
            .unwrap_err();
        assert_eq!(err, FreeSpinsError::AlreadyCompleted);
    }

    #[test]
    fn force_close_stops_spins_even_with_remaining_balance() {
        let session = fixture();
        let closed = session.apply(FreeSpinsEvent::ForceClose).unwrap();
        assert!(!closed.active);
        assert_eq!(closed.remaining, 10);
        let err = closed
            .apply(FreeSpinsEvent::ExecuteSpin { win: 0.0, retrigger_award: None })
            .unwrap_err();
        assert_eq!(err, FreeSpinsError::NotActive);
    }

    #[test]
    fn locked_bet_never_changes() {
        let mut session = fixture();
        let original_bet = session.locked_bet;
        for _ in 0..5 {
            session = session
                .apply(FreeSpinsEvent::ExecuteSpin { win: 3.0, retrigger_award: Some(2) })
                .unwrap();
            assert_eq!(session.locked_bet, original_bet);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixture(award: u32) -> FreeSpinsSession {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        FreeSpinsSession::trigger(PlayerId::new(), GameSessionId::new(), ConfigId::new(), 1.0, award, created_at)
    }

    proptest! {
        // `completed + remaining == total_awarded` must hold after every
        // spin, `total_won` must never decrease, and `locked_bet` must
        // never move, for any sequence of wins/retriggers that doesn't
        // outrun the session's remaining count.
        #[test]
        fn conservation_holds_across_an_arbitrary_spin_sequence(
            award in 1..20u32,
            wins in prop::collection::vec(0.0..50.0f64, 1..20),
            retriggers in prop::collection::vec(prop::option::of(0..5u32), 1..20),
        ) {
            let mut session = fixture(award);
            let original_bet = session.locked_bet;
            let mut last_total_won = 0.0;

            for (win, retrigger_award) in wins.iter().zip(retriggers.iter()).take(award as usize) {
                if session.is_completed() || !session.active {
                    break;
                }
                let next = session.apply(FreeSpinsEvent::ExecuteSpin { win: *win, retrigger_award: *retrigger_award }).unwrap();
                prop_assert_eq!(next.completed + next.remaining, next.total_awarded);
                prop_assert!(next.total_won >= last_total_won);
                prop_assert_eq!(next.locked_bet, original_bet);
                last_total_won = next.total_won;
                session = next;
            }
        }
    }
}
