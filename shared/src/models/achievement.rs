//! Achievement Models

use serde::{Deserialize, Serialize};

/// Achievement definition
///
/// `criteria_type` stays a free string at the storage boundary; the engine
/// parses it into a closed enum and treats unknown kinds as never-met.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub criteria_type: String,
    pub threshold: Option<i64>,
    /// daily | weekly | monthly | yearly | all_time (null = all_time)
    pub timeframe: Option<String>,
    pub points: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Earned achievement — snapshot taken at award time, never recomputed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserAchievement {
    pub id: i64,
    pub user_id: i64,
    pub achievement_id: i64,
    /// Name snapshot at award time
    pub name: String,
    /// Points snapshot at award time
    pub points: i64,
    /// Counter value that triggered the award
    pub earned_value: i64,
    pub earned_at: i64,
}

/// Progress counter row for a not-yet-earned achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AchievementProgress {
    pub id: i64,
    pub user_id: i64,
    pub achievement_id: i64,
    pub current_value: i64,
    pub target_value: i64,
    pub updated_at: i64,
}

/// In-progress entry for display: live counters plus derived percentage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProgressEntry {
    pub achievement_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub points: i64,
    pub current_value: i64,
    pub target_value: i64,
}

impl ProgressEntry {
    /// Display percentage, rounded; deliberately not clamped — over-target
    /// progress reads as >100
    pub fn progress_percentage(&self) -> i64 {
        if self.target_value <= 0 {
            return 0;
        }
        ((self.current_value as f64 / self.target_value as f64) * 100.0).round() as i64
    }
}

/// Combined achievements view for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAchievements {
    pub earned: Vec<UserAchievement>,
    pub in_progress: Vec<ProgressView>,
}

/// Progress entry with the percentage materialized for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub entry: ProgressEntry,
    pub progress_percentage: i64,
}

impl From<ProgressEntry> for ProgressView {
    fn from(entry: ProgressEntry) -> Self {
        let progress_percentage = entry.progress_percentage();
        Self {
            entry,
            progress_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(current: i64, target: i64) -> ProgressEntry {
        ProgressEntry {
            achievement_id: 1,
            name: "Bookworm".into(),
            description: None,
            icon: None,
            points: 10,
            current_value: current,
            target_value: target,
        }
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(entry(3, 10).progress_percentage(), 30);
        assert_eq!(entry(1, 3).progress_percentage(), 33);
        assert_eq!(entry(2, 3).progress_percentage(), 67);
    }

    #[test]
    fn percentage_over_target_is_not_clamped() {
        assert_eq!(entry(10, 5).progress_percentage(), 200);
    }

    #[test]
    fn percentage_zero_target_is_zero() {
        assert_eq!(entry(5, 0).progress_percentage(), 0);
    }
}
