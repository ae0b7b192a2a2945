pub mod fs;
pub mod traits;

pub use traits::{ChallengeStorage, GroupStorage, HabitStorage, PrayerStorage, UserStorage};
