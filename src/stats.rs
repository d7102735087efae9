use crate::insights::{mean, round_to};
use crate::models::{
    AnalysisRecord, AnalysisStats, AnswerTally, DailyHabitRecord, DailyStats, ErrorType,
    ErrorTypeCount, MockRecord, MockStats, Mood, MoodCount, RecentMock, Section, SectionScores,
    SectionTally, SoftSkillRecord, SoftSkillStats, SoftSkillType, SoftSkillTypeCount,
};

const RECENT_SUMMARIES: usize = 5;

/// Summary of the supplied mocks, which the caller has already limited and
/// ordered most-recent-first.
pub fn mock_stats(mocks: &[MockRecord]) -> MockStats {
    let average = |value: fn(&MockRecord) -> f64| {
        mean(mocks.iter().map(value)).map_or(0.0, |avg| round_to(avg, 2))
    };
    let extreme = |value: fn(&MockRecord) -> f64, pick: fn(f64, f64) -> f64| {
        mocks.iter().map(value).reduce(pick).unwrap_or(0.0)
    };

    MockStats {
        total_mocks: mocks.len(),
        average_total: average(MockRecord::total),
        average_percentile: average(|mock| mock.percentile),
        average_scores: SectionScores {
            varc: average(|mock| mock.scores.varc),
            lrdi: average(|mock| mock.scores.lrdi),
            qa: average(|mock| mock.scores.qa),
        },
        highest_score: extreme(MockRecord::total, f64::max),
        lowest_score: extreme(MockRecord::total, f64::min),
        highest_percentile: extreme(|mock| mock.percentile, f64::max),
        lowest_percentile: extreme(|mock| mock.percentile, f64::min),
        recent_mocks: mocks
            .iter()
            .take(RECENT_SUMMARIES)
            .map(|mock| RecentMock {
                name: mock.name.clone(),
                date: mock.date,
                total: mock.total(),
                percentile: mock.percentile,
            })
            .collect(),
    }
}

fn tally<'a>(analyses: impl Iterator<Item = &'a AnalysisRecord>) -> AnswerTally {
    let (total, attempted, correct) = analyses.fold((0, 0, 0), |(total, attempted, correct), a| {
        (
            total + 1,
            attempted + usize::from(a.attempted),
            correct + usize::from(a.correct),
        )
    });

    AnswerTally {
        total,
        attempted,
        correct,
        incorrect: attempted.saturating_sub(correct),
        accuracy: if attempted > 0 {
            round_to(correct as f64 / attempted as f64 * 100.0, 2)
        } else {
            0.0
        },
    }
}

/// Question-level breakdown of a single mock's analysis records.
pub fn mock_analysis_stats(analyses: &[AnalysisRecord]) -> AnalysisStats {
    AnalysisStats {
        overall: tally(analyses.iter()),
        by_section: Section::ALL
            .iter()
            .map(|&section| SectionTally {
                section,
                tally: tally(analyses.iter().filter(|a| a.section == section)),
            })
            .collect(),
        error_distribution: ErrorType::ALL
            .iter()
            .map(|&error_type| ErrorTypeCount {
                error_type,
                count: analyses
                    .iter()
                    .filter(|a| a.error_type == Some(error_type))
                    .count(),
            })
            .collect(),
    }
}

pub fn daily_stats(entries: &[DailyHabitRecord]) -> DailyStats {
    let count = |flag: fn(&DailyHabitRecord) -> bool| entries.iter().filter(|e| flag(e)).count();

    DailyStats {
        total_entries: entries.len(),
        quant: count(|e| e.quant),
        lrdi: count(|e| e.lrdi),
        varc: count(|e| e.varc),
        soft_skill: count(|e| e.soft_skill),
        exercise: count(|e| e.exercise),
        gaming: count(|e| e.gaming),
        mood_distribution: Mood::ALL
            .iter()
            .map(|&mood| MoodCount {
                mood,
                count: entries.iter().filter(|e| e.mood == Some(mood)).count(),
            })
            .collect(),
    }
}

pub fn soft_skill_stats(entries: &[SoftSkillRecord]) -> SoftSkillStats {
    let total_minutes: i64 = entries.iter().map(|e| i64::from(e.duration_minutes)).sum();
    let average_rating = mean(entries.iter().map(|e| f64::from(e.rating))).unwrap_or(0.0);

    SoftSkillStats {
        total_entries: entries.len(),
        type_distribution: SoftSkillType::ALL
            .iter()
            .map(|&kind| SoftSkillTypeCount {
                kind,
                count: entries.iter().filter(|e| e.kind == kind).count(),
            })
            .collect(),
        average_rating: round_to(average_rating, 2),
        total_practice_minutes: total_minutes,
        total_practice_hours: round_to(total_minutes as f64 / 60.0, 2),
    }
}
