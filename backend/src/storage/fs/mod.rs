//! # File Store Module
//!
//! File-backed storage for the tracker. Each user owns a directory of
//! documents; shared entities live at the data root. The layout keeps every
//! aggregate in a single file so each request is one read-modify-write:
//!
//! ```text
//! data/
//! ├── challenges.json
//! ├── challenge_participants.csv
//! ├── groups.json
//! ├── group_members.csv
//! └── {username}/
//!     ├── profile.yaml
//!     ├── habits.json
//!     └── prayers.csv
//! ```
//!
//! All writes go through a temp file followed by an atomic rename.

pub mod challenge_repository;
pub mod connection;
pub mod group_repository;
pub mod habit_repository;
pub mod prayer_repository;
pub mod user_repository;

pub use challenge_repository::ChallengeRepository;
pub use connection::FsConnection;
pub use group_repository::GroupRepository;
pub use habit_repository::HabitRepository;
pub use prayer_repository::PrayerRepository;
pub use user_repository::UserRepository;
