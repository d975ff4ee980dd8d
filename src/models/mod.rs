//! Data models for the library

pub mod email_log;
pub mod enums;
pub mod game;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use email_log::EmailLog;
pub use enums::{AppRole, DeliveryStatus, GameStatus, ReservationStatus};
pub use game::{CatalogEntry, CreateGame, Game, GameQuery, UpdateGame};
pub use reservation::{CreateReservation, DateRange, NewReservation, Reservation};
pub use user::{CurrentUser, UserClaims};
