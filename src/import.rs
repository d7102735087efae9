use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::models::{
    AnalysisRecord, DailyHabitRecord, ErrorType, MockRecord, Mood, Section, SectionScores, Slot,
    SoftSkillRecord, SoftSkillType,
};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportKind {
    Mocks,
    Analyses,
    Daily,
    SoftSkills,
}

/// Reads a closed-set text column through its `FromStr`, which ignores case
/// the same way the database mappers do.
fn text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = anyhow::Error>,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(de::Error::custom)
}

fn optional_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = anyhow::Error>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            value.parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct MockRow {
    id: Option<Uuid>,
    name: String,
    date: NaiveDate,
    #[serde(deserialize_with = "text")]
    slot: Slot,
    varc: f64,
    lrdi: f64,
    qa: f64,
    percentile: f64,
    #[serde(default, deserialize_with = "optional_text")]
    mood: Option<Mood>,
}

impl From<MockRow> for MockRecord {
    fn from(row: MockRow) -> Self {
        MockRecord {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            name: row.name.trim().to_string(),
            date: row.date,
            slot: row.slot,
            scores: SectionScores {
                varc: row.varc,
                lrdi: row.lrdi,
                qa: row.qa,
            },
            percentile: row.percentile,
            mood: row.mood,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisRow {
    id: Option<Uuid>,
    mock_id: Uuid,
    #[serde(deserialize_with = "text")]
    section: Section,
    question_no: i32,
    attempted: bool,
    correct: bool,
    #[serde(default, deserialize_with = "optional_text")]
    error_type: Option<ErrorType>,
    why_wrong: Option<String>,
    correct_approach: Option<String>,
    action_item: Option<String>,
}

impl From<AnalysisRow> for AnalysisRecord {
    fn from(row: AnalysisRow) -> Self {
        AnalysisRecord {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            mock_id: row.mock_id,
            section: row.section,
            question_no: row.question_no,
            attempted: row.attempted,
            correct: row.correct,
            error_type: row.error_type,
            why_wrong: row.why_wrong,
            correct_approach: row.correct_approach,
            action_item: row.action_item,
        }
        .normalized()
    }
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    id: Option<Uuid>,
    date: NaiveDate,
    quant: bool,
    lrdi: bool,
    varc: bool,
    soft_skill: bool,
    exercise: bool,
    gaming: bool,
    #[serde(default, deserialize_with = "optional_text")]
    mood: Option<Mood>,
}

impl From<DailyRow> for DailyHabitRecord {
    fn from(row: DailyRow) -> Self {
        DailyHabitRecord {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            date: row.date,
            quant: row.quant,
            lrdi: row.lrdi,
            varc: row.varc,
            soft_skill: row.soft_skill,
            exercise: row.exercise,
            gaming: row.gaming,
            mood: row.mood,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SoftSkillRow {
    id: Option<Uuid>,
    date: NaiveDate,
    #[serde(rename = "type", deserialize_with = "text")]
    kind: SoftSkillType,
    topic: String,
    duration_minutes: i32,
    rating: i32,
    note: Option<String>,
}

impl From<SoftSkillRow> for SoftSkillRecord {
    fn from(row: SoftSkillRow) -> Self {
        SoftSkillRecord {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            date: row.date,
            kind: row.kind,
            topic: row.topic.trim().to_string(),
            duration_minutes: row.duration_minutes,
            rating: row.rating,
            note: row.note,
        }
    }
}

/// Reads every row of a CSV file and validates it. Errors name the file
/// line, counting the header as line 1.
fn read_rows<Row, Record>(
    path: &Path,
    validate: impl Fn(&Record) -> anyhow::Result<()>,
) -> anyhow::Result<Vec<Record>>
where
    Row: DeserializeOwned,
    Record: From<Row>,
{
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<Row>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("line {line}: malformed row"))?;
        let record = Record::from(row);
        validate(&record).with_context(|| format!("line {line}: invalid record"))?;
        records.push(record);
    }

    Ok(records)
}

pub fn read_mocks(path: &Path, today: NaiveDate) -> anyhow::Result<Vec<MockRecord>> {
    read_rows::<MockRow, MockRecord>(path, |mock| validate::validate_mock(mock, today))
}

pub fn read_analyses(path: &Path) -> anyhow::Result<Vec<AnalysisRecord>> {
    read_rows::<AnalysisRow, AnalysisRecord>(path, validate::validate_analysis)
}

pub fn read_daily(path: &Path, today: NaiveDate) -> anyhow::Result<Vec<DailyHabitRecord>> {
    read_rows::<DailyRow, DailyHabitRecord>(path, |entry| validate::validate_daily(entry, today))
}

pub fn read_soft_skills(path: &Path, today: NaiveDate) -> anyhow::Result<Vec<SoftSkillRecord>> {
    read_rows::<SoftSkillRow, SoftSkillRecord>(path, |entry| validate::validate_soft_skill(entry, today))
}

/// Distinct mocks referenced by `analyses`, in first-seen order.
pub fn referenced_mocks(analyses: &[AnalysisRecord]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for analysis in analyses {
        if !ids.contains(&analysis.mock_id) {
            ids.push(analysis.mock_id);
        }
    }
    ids
}
