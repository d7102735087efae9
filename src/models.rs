use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exam section. Declaration order is the tie-break order used by the
/// section calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    Varc,
    Lrdi,
    Qa,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Varc, Section::Lrdi, Section::Qa];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Varc => "VARC",
            Section::Lrdi => "LRDI",
            Section::Qa => "QA",
        }
    }
}

/// Time-of-day category of a mock sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Morning, Slot::Afternoon, Slot::Evening, Slot::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Morning => "morning",
            Slot::Afternoon => "afternoon",
            Slot::Evening => "evening",
            Slot::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    Concept,
    Calculation,
    Selection,
    Panic,
    Time,
}

impl ErrorType {
    pub const ALL: [ErrorType; 5] = [
        ErrorType::Concept,
        ErrorType::Calculation,
        ErrorType::Selection,
        ErrorType::Panic,
        ErrorType::Time,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::Concept => "Concept",
            ErrorType::Calculation => "Calculation",
            ErrorType::Selection => "Selection",
            ErrorType::Panic => "Panic",
            ErrorType::Time => "Time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excellent,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Excellent, Mood::Good, Mood::Okay, Mood::Bad, Mood::Terrible];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Excellent => "excellent",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoftSkillType {
    Essay,
    #[serde(rename = "GD")]
    GroupDiscussion,
    Extempore,
    Interview,
    Presentation,
    #[serde(rename = "Structured Thinking")]
    StructuredThinking,
}

impl SoftSkillType {
    pub const ALL: [SoftSkillType; 6] = [
        SoftSkillType::Essay,
        SoftSkillType::GroupDiscussion,
        SoftSkillType::Extempore,
        SoftSkillType::Interview,
        SoftSkillType::Presentation,
        SoftSkillType::StructuredThinking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoftSkillType::Essay => "Essay",
            SoftSkillType::GroupDiscussion => "GD",
            SoftSkillType::Extempore => "Extempore",
            SoftSkillType::Interview => "Interview",
            SoftSkillType::Presentation => "Presentation",
            SoftSkillType::StructuredThinking => "Structured Thinking",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(|| anyhow::anyhow!("invalid {}: {:?}", $label, value))
            }
        }
    };
}

text_enum!(Section, "section");
text_enum!(Slot, "slot");
text_enum!(ErrorType, "error type");
text_enum!(Mood, "mood");
text_enum!(SoftSkillType, "soft skill type");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub varc: f64,
    pub lrdi: f64,
    pub qa: f64,
}

impl SectionScores {
    pub fn get(&self, section: Section) -> f64 {
        match section {
            Section::Varc => self.varc,
            Section::Lrdi => self.lrdi,
            Section::Qa => self.qa,
        }
    }

    pub fn total(&self) -> f64 {
        self.varc + self.lrdi + self.qa
    }
}

/// One mock-test sitting. The total is always derived from the section
/// scores and is never stored separately on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockRecord {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub scores: SectionScores,
    pub percentile: f64,
    pub mood: Option<Mood>,
}

impl MockRecord {
    pub fn total(&self) -> f64 {
        self.scores.total()
    }
}

/// Per-question review of a mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub mock_id: Uuid,
    pub section: Section,
    pub question_no: i32,
    pub attempted: bool,
    pub correct: bool,
    pub error_type: Option<ErrorType>,
    pub why_wrong: Option<String>,
    pub correct_approach: Option<String>,
    pub action_item: Option<String>,
}

impl AnalysisRecord {
    /// A correct answer carries no diagnosed error.
    pub fn normalized(mut self) -> Self {
        if self.correct {
            self.error_type = None;
        }
        self
    }

    /// Marked wrong and carrying a diagnosed cause.
    pub fn is_incorrect_with_cause(&self) -> bool {
        !self.correct && self.error_type.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHabitRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub quant: bool,
    pub lrdi: bool,
    pub varc: bool,
    pub soft_skill: bool,
    pub exercise: bool,
    pub gaming: bool,
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkillRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: SoftSkillType,
    pub topic: String,
    pub duration_minutes: i32,
    pub rating: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub overview: Overview,
    pub weakest_section: WeakestSection,
    pub most_common_error: MostCommonError,
    pub accuracy_trend: AccuracyTrend,
    pub performance_patterns: PerformancePatterns,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_mocks: usize,
    pub total_daily_entries: usize,
    pub total_soft_skills: usize,
    pub average_percentile: f64,
    pub average_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionAverages {
    #[serde(rename = "VARC")]
    pub varc: f64,
    #[serde(rename = "LRDI")]
    pub lrdi: f64,
    #[serde(rename = "QA")]
    pub qa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakestSection {
    pub section: Option<Section>,
    pub average_score: f64,
    pub all_section_averages: Option<SectionAverages>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTypeCount {
    pub error_type: ErrorType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostCommonError {
    pub error_type: Option<ErrorType>,
    pub count: usize,
    pub percentage: f64,
    pub total_errors: usize,
    pub distribution: Vec<ErrorTypeCount>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockAccuracy {
    pub date: NaiveDate,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyTrend {
    pub trend: Trend,
    pub current_accuracy: f64,
    pub previous_accuracy: f64,
    pub change: f64,
    pub mock_accuracies: Vec<MockAccuracy>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPerformance {
    pub slot: Slot,
    pub average_score: f64,
    pub average_percentile: f64,
    pub mock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePatterns {
    pub best_slot: Option<Slot>,
    pub worst_slot: Option<Slot>,
    pub patterns: Vec<SlotPerformance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    MockFrequency,
    DailyPractice,
    WeakSection,
    AnalysisCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMock {
    pub name: String,
    pub date: NaiveDate,
    pub total: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockStats {
    pub total_mocks: usize,
    pub average_total: f64,
    pub average_percentile: f64,
    pub average_scores: SectionScores,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub highest_percentile: f64,
    pub lowest_percentile: f64,
    pub recent_mocks: Vec<RecentMock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerTally {
    pub total: usize,
    pub attempted: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTally {
    pub section: Section,
    #[serde(flatten)]
    pub tally: AnswerTally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub overall: AnswerTally,
    pub by_section: Vec<SectionTally>,
    pub error_distribution: Vec<ErrorTypeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodCount {
    pub mood: Mood,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_entries: usize,
    pub quant: usize,
    pub lrdi: usize,
    pub varc: usize,
    pub soft_skill: usize,
    pub exercise: usize,
    pub gaming: usize,
    pub mood_distribution: Vec<MoodCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkillTypeCount {
    #[serde(rename = "type")]
    pub kind: SoftSkillType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkillStats {
    pub total_entries: usize,
    pub type_distribution: Vec<SoftSkillTypeCount>,
    pub average_rating: f64,
    pub total_practice_minutes: i64,
    pub total_practice_hours: f64,
}
