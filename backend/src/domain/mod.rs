//! Domain layer: services, commands, models, and the habit ledger core.

pub mod challenge_service;
pub mod commands;
pub mod error;
pub mod group_service;
pub mod habit_service;
pub mod ledger;
pub mod models;
pub mod prayer_service;
pub mod user_service;

pub use challenge_service::ChallengeService;
pub use error::DomainError;
pub use group_service::GroupService;
pub use habit_service::HabitService;
pub use prayer_service::PrayerService;
pub use user_service::UserService;
