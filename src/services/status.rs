//! Display status derivation
//!
//! Nothing moves a game back to `available` when its borrow period lapses, so
//! the booking part of the status is recomputed on every read instead of
//! being trusted from the stored column.

use chrono::{DateTime, Utc};

use crate::models::{Game, GameStatus};

/// Compute the status to show for `game` at instant `now`.
///
/// Administrative states (`maintenance`, `retired`) are returned unchanged.
/// Otherwise the game is `borrowed` while `borrowed_until >= now`, and
/// `available` in every other case.
pub fn derive_status(game: &Game, now: DateTime<Utc>) -> GameStatus {
    if game.status.is_administrative() {
        return game.status;
    }
    match game.borrowed_until {
        Some(until) if until >= now => GameStatus::Borrowed,
        _ => GameStatus::Available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn game(status: GameStatus, borrowed_until: Option<DateTime<Utc>>) -> Game {
        let now = Utc::now();
        Game {
            id: Uuid::new_v4(),
            title: "Catan".to_string(),
            description: None,
            image_url: None,
            min_players: Some(3),
            max_players: Some(4),
            play_time: None,
            recommended_age: None,
            complexity_rating: Some(2.3),
            status,
            condition_notes: None,
            borrowed_until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_administrative_states_win() {
        let now = Utc::now();
        for status in [GameStatus::Maintenance, GameStatus::Retired] {
            for until in [None, Some(now - Duration::days(2)), Some(now + Duration::days(2))] {
                assert_eq!(derive_status(&game(status, until), now), status);
            }
        }
    }

    #[test]
    fn test_borrowed_until_in_future() {
        let now = Utc::now();
        let g = game(GameStatus::Borrowed, Some(now + Duration::hours(1)));
        assert_eq!(derive_status(&g, now), GameStatus::Borrowed);
    }

    #[test]
    fn test_borrowed_until_exactly_now() {
        let now = Utc::now();
        let g = game(GameStatus::Borrowed, Some(now));
        assert_eq!(derive_status(&g, now), GameStatus::Borrowed);
    }

    #[test]
    fn test_lapsed_borrow_is_available() {
        let now = Utc::now();
        let g = game(GameStatus::Borrowed, Some(now - Duration::seconds(1)));
        assert_eq!(derive_status(&g, now), GameStatus::Available);
    }

    #[test]
    fn test_stale_stored_states_are_not_trusted() {
        let now = Utc::now();
        assert_eq!(derive_status(&game(GameStatus::Borrowed, None), now), GameStatus::Available);
        assert_eq!(derive_status(&game(GameStatus::Reserved, None), now), GameStatus::Available);
        assert_eq!(
            derive_status(&game(GameStatus::Available, Some(now + Duration::days(1))), now),
            GameStatus::Borrowed
        );
    }
}
