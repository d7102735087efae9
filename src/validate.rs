use anyhow::ensure;
use chrono::NaiveDate;

use crate::models::{AnalysisRecord, DailyHabitRecord, MockRecord, Section, SoftSkillRecord};

const MAX_MOCK_NAME: usize = 100;
const MAX_TOPIC: usize = 200;
const MAX_NOTE: usize = 1000;
const MAX_EXPLANATION: usize = 500;
const MAX_ACTION_ITEM: usize = 200;

pub fn validate_score(score: f64, field: &str) -> anyhow::Result<()> {
    ensure!(score.is_finite(), "{field} must be a valid number");
    ensure!(
        (0.0..=100.0).contains(&score),
        "{field} must be between 0 and 100"
    );
    Ok(())
}

pub fn validate_percentile(percentile: f64) -> anyhow::Result<()> {
    ensure!(percentile.is_finite(), "Percentile must be a valid number");
    ensure!(
        (0.0..=100.0).contains(&percentile),
        "Percentile must be between 0 and 100"
    );
    Ok(())
}

pub fn validate_date(date: NaiveDate, today: NaiveDate) -> anyhow::Result<()> {
    ensure!(date <= today, "Cannot create entries for future dates");
    Ok(())
}

fn validate_length(value: Option<&str>, max: usize, field: &str) -> anyhow::Result<()> {
    if let Some(value) = value {
        ensure!(
            value.chars().count() <= max,
            "{field} cannot exceed {max} characters"
        );
    }
    Ok(())
}

pub fn validate_mock(mock: &MockRecord, today: NaiveDate) -> anyhow::Result<()> {
    ensure!(!mock.name.trim().is_empty(), "Mock test name is required");
    validate_length(Some(&mock.name), MAX_MOCK_NAME, "Name")?;
    validate_date(mock.date, today)?;
    for section in Section::ALL {
        validate_score(mock.scores.get(section), &format!("{section} score"))?;
    }
    validate_percentile(mock.percentile)
}

pub fn validate_analysis(analysis: &AnalysisRecord) -> anyhow::Result<()> {
    ensure!(
        analysis.question_no >= 1,
        "Question number must be at least 1"
    );
    ensure!(
        !(analysis.correct && analysis.error_type.is_some()),
        "A correct answer cannot carry an error type"
    );
    validate_length(analysis.why_wrong.as_deref(), MAX_EXPLANATION, "Why wrong explanation")?;
    validate_length(
        analysis.correct_approach.as_deref(),
        MAX_EXPLANATION,
        "Correct approach",
    )?;
    validate_length(analysis.action_item.as_deref(), MAX_ACTION_ITEM, "Action item")
}

pub fn validate_daily(entry: &DailyHabitRecord, today: NaiveDate) -> anyhow::Result<()> {
    validate_date(entry.date, today)
}

pub fn validate_soft_skill(entry: &SoftSkillRecord, today: NaiveDate) -> anyhow::Result<()> {
    ensure!(!entry.topic.trim().is_empty(), "Topic is required");
    validate_length(Some(&entry.topic), MAX_TOPIC, "Topic")?;
    validate_length(entry.note.as_deref(), MAX_NOTE, "Note")?;
    ensure!(
        (1..=300).contains(&entry.duration_minutes),
        "Duration must be between 1 and 300 minutes"
    );
    ensure!(
        (1..=5).contains(&entry.rating),
        "Rating must be between 1 and 5"
    );
    validate_date(entry.date, today)
}
