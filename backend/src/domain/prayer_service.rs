//! Prayer logging and the daily reward engine.
//!
//! Today's six records are created lazily on first request of the day and
//! never duplicated. Completing a prayer triggers an explicit reward
//! evaluation over all of today's records: when every mandatory prayer is
//! done, the user aggregate is mutated exactly once per calendar day,
//! guarded by `last_reward_date`. Re-triggering the check the same day is a
//! silent no-op rather than an error.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use log::{debug, info};
use std::sync::Arc;

use crate::domain::commands::prayer::{
    CompletePrayerCommand, CompletePrayerResult, GetTodayCommand, GetTodayResult, LogTodayCommand,
    LogTodayResult,
};
use crate::domain::error::DomainError;
use crate::domain::models::prayer::{PrayerName, PrayerRecord};
use crate::domain::models::user::User;
use crate::storage::fs::{FsConnection, PrayerRepository, UserRepository};
use crate::storage::traits::{PrayerStorage, UserStorage};

/// Points granted when all mandatory prayers are completed
const DAILY_SCORE_REWARD: u32 = 10;
const DAILY_XP_REWARD: u32 = 50;
/// Extra points when Tahajjud is completed as well
const TAHAJJUD_SCORE_BONUS: u32 = 5;
const TAHAJJUD_XP_BONUS: u32 = 20;

#[derive(Clone)]
pub struct PrayerService {
    prayer_repository: PrayerRepository,
    user_repository: UserRepository,
}

impl PrayerService {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        let prayer_repository = PrayerRepository::new((*connection).clone());
        let user_repository = UserRepository::new((*connection).clone());
        Self {
            prayer_repository,
            user_repository,
        }
    }

    pub fn log_today(&self, command: LogTodayCommand) -> Result<LogTodayResult, DomainError> {
        self.log_today_on(command, Local::now().date_naive())
    }

    /// Get-or-create today's six prayer records. Idempotent: if records
    /// already exist for today they are returned unchanged.
    pub fn log_today_on(
        &self,
        command: LogTodayCommand,
        today: NaiveDate,
    ) -> Result<LogTodayResult, DomainError> {
        let existing = self
            .prayer_repository
            .list_prayers_for_date(&command.user_id, today)?;
        if !existing.is_empty() {
            debug!("Prayers already logged for {} on {}", command.user_id, today);
            return Ok(LogTodayResult {
                prayers: existing,
                created: false,
            });
        }

        let now = Utc::now();
        let records: Vec<PrayerRecord> = PrayerName::ALL
            .iter()
            .map(|&name| PrayerRecord {
                id: PrayerRecord::generate_id(today, name),
                user_id: command.user_id.clone(),
                prayer_name: name,
                date: today,
                is_completed: false,
                created_at: now,
            })
            .collect();

        self.prayer_repository.store_prayers(&command.user_id, &records)?;
        info!("Logged {} prayers for {} on {}", records.len(), command.user_id, today);

        Ok(LogTodayResult {
            prayers: records,
            created: true,
        })
    }

    pub fn get_today(&self, command: GetTodayCommand) -> Result<GetTodayResult, DomainError> {
        self.get_today_on(command, Local::now().date_naive())
    }

    pub fn get_today_on(
        &self,
        command: GetTodayCommand,
        today: NaiveDate,
    ) -> Result<GetTodayResult, DomainError> {
        let prayers = self
            .prayer_repository
            .list_prayers_for_date(&command.user_id, today)?;
        if prayers.is_empty() {
            return Err(DomainError::NotFound("No prayers found for today".to_string()));
        }
        Ok(GetTodayResult { prayers })
    }

    pub fn complete_prayer(
        &self,
        command: CompletePrayerCommand,
    ) -> Result<CompletePrayerResult, DomainError> {
        self.complete_prayer_on(command, Local::now().date_naive())
    }

    /// Mark one prayer complete, then run the daily reward evaluation.
    pub fn complete_prayer_on(
        &self,
        command: CompletePrayerCommand,
        today: NaiveDate,
    ) -> Result<CompletePrayerResult, DomainError> {
        info!("Completing prayer {} for {}", command.prayer_id, command.user_id);

        let mut record = self
            .prayer_repository
            .get_prayer(&command.user_id, &command.prayer_id)?
            .ok_or_else(|| {
                DomainError::NotFound("Prayer not found or not authorized".to_string())
            })?;

        record.is_completed = true;
        self.prayer_repository.update_prayer(&command.user_id, &record)?;

        let reward_granted = self.evaluate_daily_reward(&command.user_id, today)?;

        Ok(CompletePrayerResult {
            prayer: record,
            reward_granted,
        })
    }

    /// Grant the daily reward if all mandatory prayers are complete and no
    /// reward was granted today yet. Returns whether a grant happened.
    fn evaluate_daily_reward(&self, user_id: &str, today: NaiveDate) -> Result<bool, DomainError> {
        let todays = self.prayer_repository.list_prayers_for_date(user_id, today)?;

        let mandatory: Vec<&PrayerRecord> = todays
            .iter()
            .filter(|record| record.prayer_name.is_mandatory())
            .collect();
        if mandatory.is_empty() || !mandatory.iter().all(|record| record.is_completed) {
            return Ok(false);
        }

        let mut user = self
            .user_repository
            .get_user(user_id)?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        // Reward guard: at most one grant per calendar day
        if user.last_reward_date == Some(today) {
            debug!("Reward already granted to {} on {}", user_id, today);
            return Ok(false);
        }

        let tahajjud_completed = todays
            .iter()
            .any(|record| record.prayer_name == PrayerName::Tahajjud && record.is_completed);

        apply_daily_reward(&mut user, tahajjud_completed, today, Utc::now());
        self.user_repository.update_user(&user)?;
        info!(
            "Granted daily reward to {}: xp={} level={} streak={}",
            user_id, user.xp, user.level, user.streak_count
        );

        Ok(true)
    }
}

/// Apply one day's reward to the user aggregate.
///
/// The level-up rule is deliberately a single step, not a loop: a reward
/// event caps at +70 xp while the threshold starts at 100 and grows with
/// the level, so one event can never cross two thresholds.
fn apply_daily_reward(
    user: &mut User,
    tahajjud_completed: bool,
    today: NaiveDate,
    now: DateTime<Utc>,
) {
    user.daily_score += DAILY_SCORE_REWARD;
    user.xp += DAILY_XP_REWARD;
    if tahajjud_completed {
        user.daily_score += TAHAJJUD_SCORE_BONUS;
        user.xp += TAHAJJUD_XP_BONUS;
    }

    if user.xp >= user.level * 100 {
        user.level += 1;
        user.xp = 0;
    }

    // Any break resets to 1, not 0: today's reward is itself the first day
    // of the new streak.
    let yesterday = today - Duration::days(1);
    if user.last_reward_date == Some(yesterday) {
        user.streak_count += 1;
    } else {
        user.streak_count = 1;
    }

    match user.streak_count {
        7 => user.award_badge("Weekly Prayers Streak"),
        30 => user.award_badge("Monthly Prayers Streak"),
        100 => user.award_badge("Legendary Streak"),
        _ => {}
    }

    user.last_reward_date = Some(today);
    user.last_activity = Some(now);
    user.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::user::{GetUserCommand, RegisterUserCommand};
    use crate::domain::user_service::UserService;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        service: PrayerService,
        user_service: UserService,
        user_id: String,
        _temp_dir: TempDir,
    }

    fn create_fixture() -> Fixture {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection =
            Arc::new(FsConnection::new(temp_dir.path()).expect("Failed to init test store"));

        let user_service = UserService::new(connection.clone());
        let user_id = user_service
            .register_user(RegisterUserCommand {
                username: "amina".to_string(),
                email: "amina@example.com".to_string(),
                full_name: "Amina".to_string(),
                avatar: None,
            })
            .expect("Failed to register test user")
            .user
            .id;

        Fixture {
            service: PrayerService::new(connection),
            user_service,
            user_id,
            _temp_dir: temp_dir,
        }
    }

    impl Fixture {
        fn log(&self, today: &str) -> Vec<PrayerRecord> {
            self.service
                .log_today_on(LogTodayCommand { user_id: self.user_id.clone() }, date(today))
                .expect("Failed to log prayers")
                .prayers
        }

        fn complete(&self, prayer_id: &str, today: &str) -> CompletePrayerResult {
            self.service
                .complete_prayer_on(
                    CompletePrayerCommand {
                        user_id: self.user_id.clone(),
                        prayer_id: prayer_id.to_string(),
                    },
                    date(today),
                )
                .expect("Failed to complete prayer")
        }

        /// Complete the five mandatory prayers for a day
        fn complete_mandatory(&self, today: &str) {
            for record in self.log(today) {
                if record.prayer_name.is_mandatory() {
                    self.complete(&record.id, today);
                }
            }
        }

        fn user(&self) -> User {
            self.user_service
                .get_user(GetUserCommand { user_id: self.user_id.clone() })
                .expect("Failed to load user")
                .user
        }
    }

    #[test]
    fn test_log_creates_six_records_once() {
        let fixture = create_fixture();

        let first = fixture
            .service
            .log_today_on(LogTodayCommand { user_id: fixture.user_id.clone() }, date("2024-01-15"))
            .unwrap();
        assert!(first.created);
        assert_eq!(first.prayers.len(), 6);
        assert!(first.prayers.iter().all(|record| !record.is_completed));

        let names: Vec<&str> = first.prayers.iter().map(|r| r.prayer_name.as_str()).collect();
        assert_eq!(names, vec!["Fajar", "Dhuhr", "Asr", "Maghrib", "Isha", "Tahajjud"]);

        let second = fixture
            .service
            .log_today_on(LogTodayCommand { user_id: fixture.user_id.clone() }, date("2024-01-15"))
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.prayers, first.prayers);
    }

    #[test]
    fn test_get_today_before_logging_is_not_found() {
        let fixture = create_fixture();
        let result = fixture.service.get_today_on(
            GetTodayCommand { user_id: fixture.user_id.clone() },
            date("2024-01-15"),
        );
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_unknown_prayer_id_is_not_found() {
        let fixture = create_fixture();
        fixture.log("2024-01-15");
        let result = fixture.service.complete_prayer_on(
            CompletePrayerCommand {
                user_id: fixture.user_id.clone(),
                prayer_id: "prayer::nope".to_string(),
            },
            date("2024-01-15"),
        );
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_reward_granted_once_when_mandatory_complete() {
        let fixture = create_fixture();
        let records = fixture.log("2024-01-15");

        // First four mandatory completions: no reward yet
        let mandatory: Vec<_> = records.iter().filter(|r| r.prayer_name.is_mandatory()).collect();
        for record in &mandatory[..4] {
            let result = fixture.complete(&record.id, "2024-01-15");
            assert!(!result.reward_granted);
        }
        assert_eq!(fixture.user().xp, 0);

        // Fifth one triggers the reward
        let result = fixture.complete(&mandatory[4].id, "2024-01-15");
        assert!(result.reward_granted);

        let user = fixture.user();
        assert_eq!(user.xp, 50);
        assert_eq!(user.daily_score, 10);
        assert_eq!(user.streak_count, 1);
        assert_eq!(user.last_reward_date, Some(date("2024-01-15")));
        assert!(user.last_activity.is_some());
    }

    #[test]
    fn test_reward_is_idempotent_within_a_day() {
        let fixture = create_fixture();
        fixture.complete_mandatory("2024-01-15");
        let after_first = fixture.user();

        // Completing an already-completed prayer re-triggers the check
        let records = fixture.log("2024-01-15");
        let result = fixture.complete(&records[0].id, "2024-01-15");
        assert!(!result.reward_granted);

        let after_second = fixture.user();
        assert_eq!(after_second.xp, after_first.xp);
        assert_eq!(after_second.daily_score, after_first.daily_score);
        assert_eq!(after_second.streak_count, after_first.streak_count);
        assert_eq!(after_second.badges, after_first.badges);
    }

    #[test]
    fn test_tahajjud_bonus_applies_when_completed_before_reward() {
        let fixture = create_fixture();
        let records = fixture.log("2024-01-15");

        // Tahajjud first, then the five mandatory ones
        let tahajjud = records
            .iter()
            .find(|r| r.prayer_name == PrayerName::Tahajjud)
            .unwrap();
        fixture.complete(&tahajjud.id, "2024-01-15");
        fixture.complete_mandatory("2024-01-15");

        let user = fixture.user();
        assert_eq!(user.xp, 70);
        assert_eq!(user.daily_score, 15);
    }

    #[test]
    fn test_streak_increments_on_consecutive_days() {
        let fixture = create_fixture();
        fixture.complete_mandatory("2024-01-15");
        fixture.complete_mandatory("2024-01-16");
        fixture.complete_mandatory("2024-01-17");

        assert_eq!(fixture.user().streak_count, 3);
    }

    #[test]
    fn test_streak_resets_to_one_after_gap() {
        let fixture = create_fixture();
        // Rewards on five consecutive days
        for day in 10..15 {
            fixture.complete_mandatory(&format!("2024-01-{:02}", day));
        }
        assert_eq!(fixture.user().streak_count, 5);

        // Skip 2024-01-15, get rewarded on the 16th: reset to 1, not 6, not 0
        fixture.complete_mandatory("2024-01-16");
        assert_eq!(fixture.user().streak_count, 1);
    }

    #[test]
    fn test_weekly_badge_awarded_at_exactly_seven() {
        let fixture = create_fixture();
        for day in 1..=7 {
            fixture.complete_mandatory(&format!("2024-03-{:02}", day));
        }

        let user = fixture.user();
        assert_eq!(user.streak_count, 7);
        assert_eq!(user.badges, vec!["Weekly Prayers Streak".to_string()]);

        // Day 8 does not duplicate the badge
        fixture.complete_mandatory("2024-03-08");
        assert_eq!(fixture.user().badges.len(), 1);
    }

    #[test]
    fn test_level_up_is_single_step() {
        let mut user = User {
            id: "user::1".to_string(),
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            full_name: "Amina".to_string(),
            avatar: None,
            daily_score: 0,
            streak_count: 0,
            xp: 60,
            level: 1,
            badges: Vec::new(),
            last_reward_date: None,
            last_activity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // 60 + 50 = 110 >= 100: one level, xp reset to zero
        apply_daily_reward(&mut user, false, date("2024-01-15"), Utc::now());
        assert_eq!(user.level, 2);
        assert_eq!(user.xp, 0);

        // Next threshold is 200; +50 does not level
        apply_daily_reward(&mut user, false, date("2024-01-16"), Utc::now());
        assert_eq!(user.level, 2);
        assert_eq!(user.xp, 50);
    }

    #[test]
    fn test_no_reward_without_todays_log() {
        let fixture = create_fixture();
        // Log and complete yesterday's prayers, then evaluate against today:
        // yesterday's completions must not satisfy today's reward.
        fixture.complete_mandatory("2024-01-14");
        let records = fixture.log("2024-01-15");

        let result = fixture.complete(&records[0].id, "2024-01-15");
        assert!(!result.reward_granted);
        // Streak from the 14th is untouched
        assert_eq!(fixture.user().last_reward_date, Some(date("2024-01-14")));
    }
}
