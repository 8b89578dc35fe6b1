//! Achievement evaluation
//!
//! `evaluate` runs after a qualifying activity: award any newly met
//! achievements, then refresh the progress counters for everything still
//! unearned. It never returns an error — a broken achievement pass must
//! not fail the book-finish/join/review/recommend that triggered it.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use shared::models::{Achievement, UserAchievements};

use crate::achievements::criteria::{CriteriaKind, Timeframe};
use crate::db::repository::{achievement, activity, RepoResult};

/// The user action that triggered an evaluation (for the log line)
#[derive(Debug, Clone, Copy)]
pub enum ActivityKind {
    BookFinished,
    ClubJoined,
    ReviewCreated,
    RecommendationSent,
    RecommendationReceived,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BookFinished => "book_finished",
            Self::ClubJoined => "club_joined",
            Self::ReviewCreated => "review_created",
            Self::RecommendationSent => "recommendation_sent",
            Self::RecommendationReceived => "recommendation_received",
        };
        f.write_str(s)
    }
}

/// Evaluate all unearned achievements for the user. Infallible by design:
/// failures are logged and swallowed.
pub async fn evaluate(pool: &SqlitePool, tz: Tz, user_id: i64, activity: Option<ActivityKind>) {
    let trigger = activity.map(|a| a.to_string()).unwrap_or_default();
    match evaluate_inner(pool, tz, user_id).await {
        Ok(awarded) if !awarded.is_empty() => {
            tracing::info!(
                user_id,
                trigger = %trigger,
                awarded = ?awarded,
                "Achievements awarded"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(
                user_id,
                trigger = %trigger,
                error = %e,
                "Achievement evaluation failed"
            );
        }
    }
}

/// Earned + in-progress view. Earned entries carry the award-time
/// snapshot; in-progress entries carry the stored counters.
pub async fn get_user_achievements(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<UserAchievements> {
    let earned = achievement::find_earned(pool, user_id).await?;
    let in_progress = achievement::find_progress_entries(pool, user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(UserAchievements { earned, in_progress })
}

async fn evaluate_inner(pool: &SqlitePool, tz: Tz, user_id: i64) -> RepoResult<Vec<String>> {
    let now = shared::util::now_millis();
    let unearned = achievement::find_unearned_active(pool, user_id).await?;

    let mut awarded = Vec::new();
    for a in &unearned {
        let count = count_current(pool, user_id, a, now, tz).await?;
        let target = a.threshold.unwrap_or(1);

        if count >= target && achievement::award(pool, user_id, a, count).await? {
            awarded.push(a.name.clone());
            continue;
        }

        // Still unearned: keep the display counters current
        achievement::upsert_progress(pool, user_id, a.id, count, target).await?;
    }

    Ok(awarded)
}

/// Current counter for one achievement. Unsupported criteria count as 0 —
/// fail-closed, never an error.
async fn count_current(
    pool: &SqlitePool,
    user_id: i64,
    achievement: &Achievement,
    now: i64,
    tz: Tz,
) -> RepoResult<i64> {
    let since = Timeframe::parse(achievement.timeframe.as_deref()).window_start(now, tz);

    match CriteriaKind::parse(&achievement.criteria_type) {
        CriteriaKind::BooksRead => activity::count_books_read(pool, user_id, since).await,
        CriteriaKind::RecommendationsSent => {
            activity::count_recommendations_sent(pool, user_id, since).await
        }
        CriteriaKind::ClubsJoined => activity::count_clubs_joined(pool, user_id, since).await,
        CriteriaKind::ReviewsWritten => activity::count_reviews_written(pool, user_id, since).await,
        CriteriaKind::Unsupported(kind) => {
            tracing::debug!(
                achievement_id = achievement.id,
                criteria_type = %kind,
                "No evaluator for criteria type, treating as not met"
            );
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{book, test_support::test_pool};
    use chrono_tz::UTC;

    async fn finish_books(pool: &SqlitePool, user_id: i64, book_ids: &[i64]) {
        for &id in book_ids {
            book::mark_finished(pool, user_id, id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn first_finished_book_awards_first_chapter() {
        let pool = test_pool().await;
        finish_books(&pool, 1, &[101]).await;

        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;

        let result = get_user_achievements(&pool, 1).await.unwrap();
        assert_eq!(result.earned.len(), 1);
        assert_eq!(result.earned[0].name, "First Chapter");
        assert_eq!(result.earned[0].earned_value, 1);

        // Earned achievements leave the in-progress set
        assert!(result
            .in_progress
            .iter()
            .all(|p| p.entry.achievement_id != 1));
    }

    #[tokio::test]
    async fn progress_counters_track_unearned_achievements() {
        let pool = test_pool().await;
        finish_books(&pool, 1, &[101, 102, 103]).await;

        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;

        let result = get_user_achievements(&pool, 1).await.unwrap();
        let bookworm = result
            .in_progress
            .iter()
            .find(|p| p.entry.achievement_id == 2)
            .unwrap();
        assert_eq!(bookworm.entry.current_value, 3);
        assert_eq!(bookworm.entry.target_value, 10);
        assert_eq!(bookworm.progress_percentage, 30);
    }

    #[tokio::test]
    async fn double_evaluation_does_not_double_award() {
        let pool = test_pool().await;
        finish_books(&pool, 1, &[101]).await;

        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;
        evaluate(&pool, UTC, 1, None).await;

        let result = get_user_achievements(&pool, 1).await.unwrap();
        let first_chapter: Vec<_> = result
            .earned
            .iter()
            .filter(|e| e.achievement_id == 1)
            .collect();
        assert_eq!(first_chapter.len(), 1);
    }

    #[tokio::test]
    async fn unsupported_criteria_never_awards_and_never_errors() {
        let pool = test_pool().await;
        finish_books(&pool, 1, &[101]).await;

        evaluate(&pool, UTC, 1, None).await;

        let result = get_user_achievements(&pool, 1).await.unwrap();
        // 'Well Connected' (friends_made) stays unearned at 0/5
        assert!(result.earned.iter().all(|e| e.achievement_id != 9));
        let wc = result
            .in_progress
            .iter()
            .find(|p| p.entry.achievement_id == 9)
            .unwrap();
        assert_eq!(wc.entry.current_value, 0);
        assert_eq!(wc.entry.target_value, 5);
    }

    #[tokio::test]
    async fn engine_failure_is_swallowed() {
        let pool = test_pool().await;
        pool.close().await;
        // Closed pool → every query fails; evaluate must still return
        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;
    }

    #[tokio::test]
    async fn tenth_book_awards_bookworm_end_to_end() {
        let pool = test_pool().await;
        // Nine more seed books
        for i in 0..7 {
            sqlx::query("INSERT INTO book (id, title, author, created_at) VALUES (?, ?, 'x', 0)")
                .bind(200 + i)
                .bind(format!("Book {i}"))
                .execute(&pool)
                .await
                .unwrap();
        }
        finish_books(&pool, 1, &[101, 102, 103, 200, 201, 202, 203, 204, 205]).await;
        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;

        // Ninth book: Bookworm still in progress at 9/10
        let result = get_user_achievements(&pool, 1).await.unwrap();
        assert!(result.earned.iter().all(|e| e.achievement_id != 2));
        let bookworm = result
            .in_progress
            .iter()
            .find(|p| p.entry.achievement_id == 2)
            .unwrap();
        assert_eq!(bookworm.entry.current_value, 9);
        assert_eq!(bookworm.progress_percentage, 90);

        sqlx::query("INSERT INTO book (id, title, author, created_at) VALUES (210, 'Tenth', 'x', 0)")
            .execute(&pool)
            .await
            .unwrap();
        finish_books(&pool, 1, &[210]).await;
        evaluate(&pool, UTC, 1, Some(ActivityKind::BookFinished)).await;

        let result = get_user_achievements(&pool, 1).await.unwrap();
        let bookworm = result
            .earned
            .iter()
            .find(|e| e.achievement_id == 2)
            .unwrap();
        assert_eq!(bookworm.earned_value, 10);
        assert!(result
            .in_progress
            .iter()
            .all(|p| p.entry.achievement_id != 2));
    }
}
