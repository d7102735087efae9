use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::import::{self, ImportKind};
use crate::models::{
    AnalysisRecord, DailyHabitRecord, ErrorType, MockRecord, Mood, Section, SectionScores, Slot,
    SoftSkillRecord, SoftSkillType,
};
use crate::window::DateWindow;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Parses an enum column, treating the empty string as "not set".
fn parse_optional<T>(value: String, column: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .with_context(|| format!("bad value in column {column}"))
}

fn parse_required<T>(value: String, column: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    value
        .parse()
        .with_context(|| format!("bad value in column {column}"))
}

fn mock_from_row(row: &PgRow) -> anyhow::Result<MockRecord> {
    Ok(MockRecord {
        id: row.get("id"),
        name: row.get("name"),
        date: row.get("date"),
        slot: parse_required::<Slot>(row.get("slot"), "slot")?,
        scores: SectionScores {
            varc: row.get("varc"),
            lrdi: row.get("lrdi"),
            qa: row.get("qa"),
        },
        percentile: row.get("percentile"),
        mood: parse_optional::<Mood>(row.get("mood"), "mood")?,
    })
}

fn analysis_from_row(row: &PgRow) -> anyhow::Result<AnalysisRecord> {
    Ok(AnalysisRecord {
        id: row.get("id"),
        mock_id: row.get("mock_id"),
        section: parse_required(row.get("section"), "section")?,
        question_no: row.get("question_no"),
        attempted: row.get("attempted"),
        correct: row.get("correct"),
        error_type: parse_optional::<ErrorType>(row.get("error_type"), "error_type")?,
        why_wrong: row.get("why_wrong"),
        correct_approach: row.get("correct_approach"),
        action_item: row.get("action_item"),
    })
}

fn daily_from_row(row: &PgRow) -> anyhow::Result<DailyHabitRecord> {
    Ok(DailyHabitRecord {
        id: row.get("id"),
        date: row.get("date"),
        quant: row.get("quant"),
        lrdi: row.get("lrdi"),
        varc: row.get("varc"),
        soft_skill: row.get("soft_skill"),
        exercise: row.get("exercise"),
        gaming: row.get("gaming"),
        mood: parse_optional::<Mood>(row.get("mood"), "mood")?,
    })
}

fn soft_skill_from_row(row: &PgRow) -> anyhow::Result<SoftSkillRecord> {
    Ok(SoftSkillRecord {
        id: row.get("id"),
        date: row.get("date"),
        kind: parse_required::<SoftSkillType>(row.get("kind"), "kind")?,
        topic: row.get("topic"),
        duration_minutes: row.get("duration_minutes"),
        rating: row.get("rating"),
        note: row.get("note"),
    })
}

const MOCK_COLUMNS: &str = "id, name, date, slot, varc, lrdi, qa, percentile, mood";
const ANALYSIS_COLUMNS: &str = "id, mock_id, section, question_no, attempted, correct, \
     error_type, why_wrong, correct_approach, action_item";

/// Mocks in the window, most recent first.
pub async fn fetch_mocks(
    pool: &PgPool,
    user_id: Uuid,
    window: &DateWindow,
) -> anyhow::Result<Vec<MockRecord>> {
    let query = format!(
        "SELECT {MOCK_COLUMNS} FROM exam_prep.mocks \
         WHERE user_id = $1 AND date >= $2 AND date <= $3 \
         ORDER BY date DESC, created_at DESC"
    );
    let rows = sqlx::query(&query)
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

    let mocks = rows.iter().map(mock_from_row).collect::<anyhow::Result<Vec<_>>>()?;
    debug_assert!(mocks.iter().all(|mock| window.contains(mock.date)));
    debug!(%user_id, count = mocks.len(), "fetched mocks");
    Ok(mocks)
}

/// The user's latest `limit` mocks regardless of window, most recent first.
pub async fn fetch_recent_mocks(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<MockRecord>> {
    let query = format!(
        "SELECT {MOCK_COLUMNS} FROM exam_prep.mocks \
         WHERE user_id = $1 ORDER BY date DESC, created_at DESC LIMIT $2"
    );
    let rows = sqlx::query(&query)
        .bind(user_id)
        .bind(limit.max(1))
        .fetch_all(pool)
        .await?;

    rows.iter().map(mock_from_row).collect()
}

pub async fn fetch_mock(
    pool: &PgPool,
    user_id: Uuid,
    mock_id: Uuid,
) -> anyhow::Result<Option<MockRecord>> {
    let query = format!("SELECT {MOCK_COLUMNS} FROM exam_prep.mocks WHERE user_id = $1 AND id = $2");
    let row = sqlx::query(&query)
        .bind(user_id)
        .bind(mock_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(mock_from_row).transpose()
}

/// Every analysis the user has logged. Not window-filtered: the accuracy
/// trend spans all time.
pub async fn fetch_all_analyses(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<AnalysisRecord>> {
    let query = format!(
        "SELECT {ANALYSIS_COLUMNS} FROM exam_prep.analyses \
         WHERE user_id = $1 ORDER BY created_at, section, question_no"
    );
    let rows = sqlx::query(&query).bind(user_id).fetch_all(pool).await?;

    let analyses = rows
        .iter()
        .map(analysis_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!(%user_id, count = analyses.len(), "fetched analyses");
    Ok(analyses)
}

pub async fn fetch_mock_analyses(
    pool: &PgPool,
    user_id: Uuid,
    mock_id: Uuid,
) -> anyhow::Result<Vec<AnalysisRecord>> {
    let query = format!(
        "SELECT {ANALYSIS_COLUMNS} FROM exam_prep.analyses \
         WHERE user_id = $1 AND mock_id = $2 ORDER BY section, question_no"
    );
    let rows = sqlx::query(&query)
        .bind(user_id)
        .bind(mock_id)
        .fetch_all(pool)
        .await?;

    rows.iter().map(analysis_from_row).collect()
}

/// Daily entries in the window, oldest first, so the tail holds the most
/// recent days.
pub async fn fetch_windowed_daily(
    pool: &PgPool,
    user_id: Uuid,
    window: &DateWindow,
) -> anyhow::Result<Vec<DailyHabitRecord>> {
    let rows = sqlx::query(
        "SELECT id, date, quant, lrdi, varc, soft_skill, exercise, gaming, mood \
         FROM exam_prep.daily_entries \
         WHERE user_id = $1 AND date >= $2 AND date <= $3 \
         ORDER BY date",
    )
    .bind(user_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool)
    .await?;

    let entries = rows.iter().map(daily_from_row).collect::<anyhow::Result<Vec<_>>>()?;
    debug_assert!(entries.iter().all(|entry| window.contains(entry.date)));
    debug!(%user_id, count = entries.len(), "fetched daily entries");
    Ok(entries)
}

pub async fn fetch_windowed_soft_skills(
    pool: &PgPool,
    user_id: Uuid,
    window: &DateWindow,
) -> anyhow::Result<Vec<SoftSkillRecord>> {
    let rows = sqlx::query(
        "SELECT id, date, kind, topic, duration_minutes, rating, note \
         FROM exam_prep.soft_skills \
         WHERE user_id = $1 AND date >= $2 AND date <= $3 \
         ORDER BY date DESC, created_at DESC",
    )
    .bind(user_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool)
    .await?;

    let entries = rows
        .iter()
        .map(soft_skill_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug_assert!(entries.iter().all(|entry| window.contains(entry.date)));
    debug!(%user_id, count = entries.len(), "fetched soft-skill sessions");
    Ok(entries)
}

pub async fn user_exists(pool: &PgPool, user_id: Uuid) -> anyhow::Result<bool> {
    let row = sqlx::query("SELECT 1 AS present FROM exam_prep.users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

async fn insert_mock(pool: &PgPool, user_id: Uuid, mock: &MockRecord) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO exam_prep.mocks
        (id, user_id, name, date, slot, varc, lrdi, qa, percentile, mood)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(mock.id)
    .bind(user_id)
    .bind(&mock.name)
    .bind(mock.date)
    .bind(mock.slot.as_str())
    .bind(mock.scores.varc)
    .bind(mock.scores.lrdi)
    .bind(mock.scores.qa)
    .bind(mock.percentile)
    .bind(mock.mood.map_or("", Mood::as_str))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_analysis(
    pool: &PgPool,
    user_id: Uuid,
    analysis: &AnalysisRecord,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO exam_prep.analyses
        (id, user_id, mock_id, section, question_no, attempted, correct,
         error_type, why_wrong, correct_approach, action_item)
        SELECT $1, $2, m.id, $4, $5, $6, $7, $8, $9, $10, $11
        FROM exam_prep.mocks m
        WHERE m.id = $3 AND m.user_id = $2
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(analysis.id)
    .bind(user_id)
    .bind(analysis.mock_id)
    .bind(analysis.section.as_str())
    .bind(analysis.question_no)
    .bind(analysis.attempted)
    .bind(analysis.correct)
    .bind(analysis.error_type.map_or("", ErrorType::as_str))
    .bind(&analysis.why_wrong)
    .bind(&analysis.correct_approach)
    .bind(&analysis.action_item)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Creates the entry for its day or overwrites the one already logged.
async fn upsert_daily(pool: &PgPool, user_id: Uuid, entry: &DailyHabitRecord) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO exam_prep.daily_entries
        (id, user_id, date, quant, lrdi, varc, soft_skill, exercise, gaming, mood)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id, date) DO UPDATE SET
            quant = EXCLUDED.quant,
            lrdi = EXCLUDED.lrdi,
            varc = EXCLUDED.varc,
            soft_skill = EXCLUDED.soft_skill,
            exercise = EXCLUDED.exercise,
            gaming = EXCLUDED.gaming,
            mood = EXCLUDED.mood
        "#,
    )
    .bind(entry.id)
    .bind(user_id)
    .bind(entry.date)
    .bind(entry.quant)
    .bind(entry.lrdi)
    .bind(entry.varc)
    .bind(entry.soft_skill)
    .bind(entry.exercise)
    .bind(entry.gaming)
    .bind(entry.mood.map_or("", Mood::as_str))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_soft_skill(
    pool: &PgPool,
    user_id: Uuid,
    entry: &SoftSkillRecord,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO exam_prep.soft_skills
        (id, user_id, kind, topic, duration_minutes, rating, note, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(entry.id)
    .bind(user_id)
    .bind(entry.kind.as_str())
    .bind(&entry.topic)
    .bind(entry.duration_minutes)
    .bind(entry.rating)
    .bind(&entry.note)
    .bind(entry.date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Imports one CSV file of records for `user_id`. Every row is validated,
/// and analyses must reference the user's own mocks, before anything is
/// written. Daily entries replace the one already logged for their day;
/// other rows that already exist are skipped.
pub async fn import_csv(
    pool: &PgPool,
    kind: ImportKind,
    user_id: Uuid,
    csv_path: &Path,
    today: NaiveDate,
) -> anyhow::Result<usize> {
    anyhow::ensure!(user_exists(pool, user_id).await?, "unknown user {user_id}");

    let mut written = 0usize;
    let total = match kind {
        ImportKind::Mocks => {
            let records = import::read_mocks(csv_path, today)?;
            for record in &records {
                written += usize::from(insert_mock(pool, user_id, record).await?);
            }
            records.len()
        }
        ImportKind::Analyses => {
            let records = import::read_analyses(csv_path)?;
            for mock_id in import::referenced_mocks(&records) {
                if fetch_mock(pool, user_id, mock_id).await?.is_none() {
                    bail!("mock {mock_id} not found or does not belong to user {user_id}");
                }
            }
            for record in &records {
                written += usize::from(insert_analysis(pool, user_id, record).await?);
            }
            records.len()
        }
        ImportKind::Daily => {
            let records = import::read_daily(csv_path, today)?;
            for record in &records {
                written += usize::from(upsert_daily(pool, user_id, record).await?);
            }
            records.len()
        }
        ImportKind::SoftSkills => {
            let records = import::read_soft_skills(csv_path, today)?;
            for record in &records {
                written += usize::from(insert_soft_skill(pool, user_id, record).await?);
            }
            records.len()
        }
    };

    info!(?kind, %user_id, written, skipped = total - written, "import finished");
    Ok(written)
}

/// Loads a demo user with a few weeks of history and returns its id.
pub async fn seed(pool: &PgPool, today: NaiveDate) -> anyhow::Result<Uuid> {
    let user_id: Uuid = sqlx::query(
        r#"
        INSERT INTO exam_prep.users (id, full_name, email)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET full_name = EXCLUDED.full_name
        RETURNING id
        "#,
    )
    .bind(Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?)
    .bind("Avery Lee")
    .bind("avery.lee@example.com")
    .fetch_one(pool)
    .await?
    .get("id");

    let mocks = [
        ("c0a80101-0000-4000-8000-000000000001", "SimCAT 1", 20, Slot::Morning, (38.0, 24.0, 30.0), 82.4),
        ("c0a80101-0000-4000-8000-000000000002", "SimCAT 2", 16, Slot::Evening, (41.0, 27.5, 29.0), 85.1),
        ("c0a80101-0000-4000-8000-000000000003", "AIMCAT 1", 12, Slot::Morning, (44.0, 30.0, 35.0), 89.7),
        ("c0a80101-0000-4000-8000-000000000004", "SimCAT 3", 8, Slot::Night, (40.0, 26.0, 33.0), 86.0),
        ("c0a80101-0000-4000-8000-000000000005", "AIMCAT 2", 4, Slot::Morning, (47.5, 33.0, 38.0), 92.3),
        ("c0a80101-0000-4000-8000-000000000006", "SimCAT 4", 1, Slot::Afternoon, (49.0, 31.0, 41.0), 93.8),
    ];

    for (index, (id, name, days_ago, slot, (varc, lrdi, qa), percentile)) in
        mocks.into_iter().enumerate()
    {
        let mock = MockRecord {
            id: Uuid::parse_str(id)?,
            name: name.to_string(),
            date: today - Duration::days(days_ago),
            slot,
            scores: SectionScores { varc, lrdi, qa },
            percentile,
            mood: Some(Mood::ALL[index % Mood::ALL.len()]),
        };
        insert_mock(pool, user_id, &mock).await?;

        // Twelve reviewed questions per mock, accuracy creeping up over time.
        let error_cycle = [ErrorType::Concept, ErrorType::Calculation, ErrorType::Time];
        for question_no in 1..=12 {
            let correct = question_no <= 6 + index as i32;
            let analysis = AnalysisRecord {
                id: Uuid::new_v5(&mock.id, &question_no.to_be_bytes()),
                mock_id: mock.id,
                section: Section::ALL[(question_no as usize) % 3],
                question_no,
                attempted: question_no <= 11,
                correct,
                error_type: (!correct).then(|| error_cycle[question_no as usize % error_cycle.len()]),
                why_wrong: None,
                correct_approach: None,
                action_item: None,
            };
            insert_analysis(pool, user_id, &analysis).await?;
        }
    }

    for days_ago in (0..10).filter(|day| day % 3 != 2) {
        let entry = DailyHabitRecord {
            id: Uuid::new_v5(&user_id, format!("daily-{days_ago}").as_bytes()),
            date: today - Duration::days(days_ago),
            quant: true,
            lrdi: days_ago % 2 == 0,
            varc: days_ago % 2 == 1,
            soft_skill: days_ago % 4 == 0,
            exercise: days_ago % 3 == 0,
            gaming: false,
            mood: Some(Mood::Good),
        };
        upsert_daily(pool, user_id, &entry).await?;
    }

    let sessions = [
        (SoftSkillType::Essay, "Should India adopt a four-day work week?", 40, 4, 3),
        (SoftSkillType::GroupDiscussion, "Cashless economy", 25, 3, 6),
        (SoftSkillType::Interview, "Why an MBA now?", 30, 3, 9),
    ];
    for (kind, topic, duration_minutes, rating, days_ago) in sessions {
        let entry = SoftSkillRecord {
            id: Uuid::new_v5(&user_id, topic.as_bytes()),
            date: today - Duration::days(days_ago),
            kind,
            topic: topic.to_string(),
            duration_minutes,
            rating,
            note: None,
        };
        insert_soft_skill(pool, user_id, &entry).await?;
    }

    Ok(user_id)
}
