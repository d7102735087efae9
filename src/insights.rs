//! Dashboard insights derived from one user's logged records.
//!
//! Every function here is pure: the caller fetches the records and hands
//! them over in the order the record store returns them. Mocks must be
//! most-recent-first and daily entries oldest-first; several calculations
//! ("most recent 5", "last 7 entries", first-encountered tie breaks) read
//! that order directly and do not re-sort.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::models::{
    AccuracyTrend, AnalysisRecord, DailyHabitRecord, ErrorType, ErrorTypeCount, Insights,
    MockAccuracy, MockRecord, MostCommonError, Overview, PerformancePatterns, Priority,
    Recommendation, RecommendationKind, Section, SectionAverages, Slot, SlotPerformance,
    SoftSkillRecord, Trend, WeakestSection,
};

const RECENT_MOCKS: usize = 5;
const TREND_WINDOW: usize = 3;
const TREND_THRESHOLD: f64 = 2.0;
const MIN_MOCKS_FOR_PATTERNS: usize = 3;
const CONSISTENCY_DAYS: usize = 7;
const MIN_PRACTICE_RATE: f64 = 0.5;
const WEAK_SECTION_SCORE: f64 = 50.0;
const ANALYSIS_BACKLOG_MIN: usize = 10;

pub fn compute_insights(
    mocks: &[MockRecord],
    analyses: &[AnalysisRecord],
    daily: &[DailyHabitRecord],
    soft_skills: &[SoftSkillRecord],
) -> Insights {
    if !is_most_recent_first(mocks) {
        warn!(mocks = mocks.len(), "mock records are not ordered most-recent-first");
    }

    let insights = Insights {
        overview: overview(mocks, daily, soft_skills),
        weakest_section: weakest_section(mocks),
        most_common_error: most_common_error(analyses),
        accuracy_trend: accuracy_trend(analyses, mocks),
        performance_patterns: performance_patterns(mocks),
        recommendations: recommendations(mocks, daily, analyses),
    };

    debug!(
        mocks = mocks.len(),
        analyses = analyses.len(),
        daily = daily.len(),
        soft_skills = soft_skills.len(),
        recommendations = insights.recommendations.len(),
        "computed insights"
    );

    insights
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn is_most_recent_first(mocks: &[MockRecord]) -> bool {
    mocks.windows(2).all(|pair| pair[0].date >= pair[1].date)
}

/// Mean score of every section in `Section::ALL` order, or `None` when
/// there are no mocks to average.
fn section_means(mocks: &[MockRecord]) -> Option<[(Section, f64); 3]> {
    if mocks.is_empty() {
        return None;
    }
    let count = mocks.len() as f64;
    Some(Section::ALL.map(|section| {
        let sum: f64 = mocks.iter().map(|mock| mock.scores.get(section)).sum();
        (section, sum / count)
    }))
}

pub fn overview(
    mocks: &[MockRecord],
    daily: &[DailyHabitRecord],
    soft_skills: &[SoftSkillRecord],
) -> Overview {
    let average_percentile = mean(mocks.iter().map(|mock| mock.percentile)).unwrap_or(0.0);
    let average_total = mean(mocks.iter().map(MockRecord::total)).unwrap_or(0.0);

    Overview {
        total_mocks: mocks.len(),
        total_daily_entries: daily.len(),
        total_soft_skills: soft_skills.len(),
        average_percentile: round_to(average_percentile, 2),
        average_total: round_to(average_total, 2),
    }
}

pub fn weakest_section(mocks: &[MockRecord]) -> WeakestSection {
    let recent = &mocks[..mocks.len().min(RECENT_MOCKS)];
    let Some(means) = section_means(recent) else {
        return WeakestSection {
            section: None,
            average_score: 0.0,
            all_section_averages: None,
            message: "No mock data available".to_string(),
        };
    };

    // Strict comparison keeps the earlier section on ties.
    let (section, score) = means[1..]
        .iter()
        .fold(means[0], |lowest, &candidate| {
            if candidate.1 < lowest.1 {
                candidate
            } else {
                lowest
            }
        });
    let average_score = round_to(score, 2);

    WeakestSection {
        section: Some(section),
        average_score,
        all_section_averages: Some(SectionAverages {
            varc: round_to(means[0].1, 2),
            lrdi: round_to(means[1].1, 2),
            qa: round_to(means[2].1, 2),
        }),
        message: format!(
            "{} needs attention with an average score of {:.2}",
            section, average_score
        ),
    }
}

/// Frequency of each error type, in the order each type first appears.
fn count_in_order(errors: impl IntoIterator<Item = ErrorType>) -> Vec<ErrorTypeCount> {
    let mut counts: Vec<ErrorTypeCount> = Vec::new();
    for error_type in errors {
        match counts.iter_mut().find(|entry| entry.error_type == error_type) {
            Some(entry) => entry.count += 1,
            None => counts.push(ErrorTypeCount {
                error_type,
                count: 1,
            }),
        }
    }
    counts
}

pub fn most_common_error(analyses: &[AnalysisRecord]) -> MostCommonError {
    let empty = |message: &str| MostCommonError {
        error_type: None,
        count: 0,
        percentage: 0.0,
        total_errors: 0,
        distribution: Vec::new(),
        message: message.to_string(),
    };

    if analyses.is_empty() {
        return empty("No analysis data available");
    }

    let distribution = count_in_order(
        analyses
            .iter()
            .filter(|analysis| analysis.is_incorrect_with_cause())
            .filter_map(|analysis| analysis.error_type),
    );
    let total_errors: usize = distribution.iter().map(|entry| entry.count).sum();

    let Some(top) = distribution
        .iter()
        .fold(None::<&ErrorTypeCount>, |top, entry| match top {
            Some(current) if current.count >= entry.count => Some(current),
            _ => Some(entry),
        })
        .cloned()
    else {
        return empty("All answers are correct or no error types logged");
    };

    let percentage = round_to(top.count as f64 / total_errors as f64 * 100.0, 1);

    MostCommonError {
        error_type: Some(top.error_type),
        count: top.count,
        percentage,
        total_errors,
        message: format!(
            "{} errors are most common ({:.1}% of mistakes)",
            top.error_type, percentage
        ),
        distribution,
    }
}

/// Accuracy of one mock from its analysed questions, or `None` when no
/// question of the mock has been analysed.
fn mock_accuracy(mock: &MockRecord, analyses: &[AnalysisRecord]) -> Option<MockAccuracy> {
    let (matched, attempted, correct) = analyses
        .iter()
        .filter(|analysis| analysis.mock_id == mock.id)
        .fold((0usize, 0usize, 0usize), |(matched, attempted, correct), analysis| {
            (
                matched + 1,
                attempted + usize::from(analysis.attempted),
                correct + usize::from(analysis.correct),
            )
        });

    if matched == 0 {
        return None;
    }

    let accuracy = if attempted > 0 {
        correct as f64 / attempted as f64 * 100.0
    } else {
        0.0
    };

    Some(MockAccuracy {
        date: mock.date,
        accuracy,
    })
}

pub fn accuracy_trend(analyses: &[AnalysisRecord], mocks: &[MockRecord]) -> AccuracyTrend {
    let flat = |current_accuracy: f64, mock_accuracies: Vec<MockAccuracy>, message: &str| {
        AccuracyTrend {
            trend: Trend::Stable,
            current_accuracy,
            previous_accuracy: 0.0,
            change: 0.0,
            mock_accuracies,
            message: message.to_string(),
        }
    };

    if mocks.is_empty() || analyses.is_empty() {
        return flat(0.0, Vec::new(), "Not enough data to calculate trend");
    }

    let mut series: Vec<MockAccuracy> = mocks
        .iter()
        .filter_map(|mock| mock_accuracy(mock, analyses))
        .collect();
    // Stable, so same-day mocks keep their input order.
    series.sort_by_key(|point| point.date);

    let rounded_series = || {
        series
            .iter()
            .map(|point| MockAccuracy {
                date: point.date,
                accuracy: round_to(point.accuracy, 2),
            })
            .collect::<Vec<_>>()
    };

    if series.len() < 2 {
        let current = series.first().map_or(0.0, |point| round_to(point.accuracy, 2));
        return flat(
            current,
            rounded_series(),
            "Need at least 2 mocks with analysis data for trend",
        );
    }

    let len = series.len();
    let recent_start = len.saturating_sub(TREND_WINDOW);
    let previous_start = len.saturating_sub(TREND_WINDOW * 2);
    let recent = &series[recent_start..];
    let previous = &series[previous_start..recent_start];

    let recent_avg = mean(recent.iter().map(|point| point.accuracy)).unwrap_or(0.0);
    let previous_avg = mean(previous.iter().map(|point| point.accuracy)).unwrap_or(recent_avg);
    let change = recent_avg - previous_avg;

    let trend = if change > TREND_THRESHOLD {
        Trend::Improving
    } else if change < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let shift = round_to(change.abs(), 1);
    let message = match trend {
        Trend::Improving => format!("Great! Accuracy improved by {:.1}%", shift),
        Trend::Declining => format!("Accuracy declined by {:.1}%. Review weak areas.", shift),
        Trend::Stable => "Accuracy is stable. Keep practicing!".to_string(),
    };

    AccuracyTrend {
        trend,
        current_accuracy: round_to(recent_avg, 2),
        previous_accuracy: round_to(previous_avg, 2),
        change: round_to(change, 2),
        mock_accuracies: rounded_series(),
        message,
    }
}

pub fn performance_patterns(mocks: &[MockRecord]) -> PerformancePatterns {
    if mocks.len() < MIN_MOCKS_FOR_PATTERNS {
        return PerformancePatterns {
            best_slot: None,
            worst_slot: None,
            patterns: Vec::new(),
        };
    }

    // (slot, total sum, percentile sum, count) in first-seen slot order.
    let mut groups: Vec<(Slot, f64, f64, usize)> = Vec::new();
    for mock in mocks {
        match groups.iter_mut().find(|group| group.0 == mock.slot) {
            Some(group) => {
                group.1 += mock.total();
                group.2 += mock.percentile;
                group.3 += 1;
            }
            None => groups.push((mock.slot, mock.total(), mock.percentile, 1)),
        }
    }

    let mut averages: Vec<SlotPerformance> = groups
        .into_iter()
        .map(|(slot, total, percentile, count)| SlotPerformance {
            slot,
            average_score: total / count as f64,
            average_percentile: percentile / count as f64,
            mock_count: count,
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average_percentile
            .partial_cmp(&a.average_percentile)
            .unwrap_or(Ordering::Equal)
    });

    let patterns: Vec<SlotPerformance> = averages
        .into_iter()
        .map(|entry| SlotPerformance {
            average_score: round_to(entry.average_score, 2),
            average_percentile: round_to(entry.average_percentile, 2),
            ..entry
        })
        .collect();

    PerformancePatterns {
        best_slot: patterns.first().map(|entry| entry.slot),
        worst_slot: patterns.last().map(|entry| entry.slot),
        patterns,
    }
}

pub fn recommendations(
    mocks: &[MockRecord],
    daily: &[DailyHabitRecord],
    analyses: &[AnalysisRecord],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if mocks.len() < 2 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::MockFrequency,
            priority: Priority::High,
            message: "Take more mock tests to track progress effectively. \
                      Aim for at least 2-3 mocks per week."
                .to_string(),
        });
    }

    // Last entries by position, not by calendar day.
    let last_week = &daily[daily.len().saturating_sub(CONSISTENCY_DAYS)..];
    let practice_rate = last_week.len() as f64 / CONSISTENCY_DAYS as f64;
    if practice_rate < MIN_PRACTICE_RATE {
        recommendations.push(Recommendation {
            kind: RecommendationKind::DailyPractice,
            priority: Priority::High,
            message: format!(
                "Increase daily practice consistency. You practiced only {} out of {} days.",
                last_week.len(),
                CONSISTENCY_DAYS
            ),
        });
    }

    if mocks.len() >= RECENT_MOCKS {
        let weak = section_means(&mocks[..RECENT_MOCKS])
            .and_then(|means| means.into_iter().find(|(_, score)| *score < WEAK_SECTION_SCORE));
        if let Some((section, score)) = weak {
            recommendations.push(Recommendation {
                kind: RecommendationKind::WeakSection,
                priority: Priority::High,
                message: format!(
                    "Focus on {}. Your average score is {:.1}, which needs improvement.",
                    section,
                    round_to(score, 1)
                ),
            });
        }
    }

    let diagnosed = analyses
        .iter()
        .filter(|analysis| analysis.is_incorrect_with_cause())
        .count();
    if diagnosed > ANALYSIS_BACKLOG_MIN && (diagnosed as f64) < analyses.len() as f64 * 0.5 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::AnalysisCompletion,
            priority: Priority::Medium,
            message: "Complete error analysis for more questions to get better insights."
                .to_string(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionScores;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn mock(day: i64, slot: Slot, varc: f64, lrdi: f64, qa: f64, percentile: f64) -> MockRecord {
        MockRecord {
            id: Uuid::new_v4(),
            name: format!("Mock {day}"),
            date: base_date() + Duration::days(day),
            slot,
            scores: SectionScores { varc, lrdi, qa },
            percentile,
            mood: None,
        }
    }

    fn analysis(
        mock_id: Uuid,
        attempted: bool,
        correct: bool,
        error_type: Option<ErrorType>,
    ) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            mock_id,
            section: Section::Qa,
            question_no: 1,
            attempted,
            correct,
            error_type,
            why_wrong: None,
            correct_approach: None,
            action_item: None,
        }
    }

    /// Ten attempted questions of which `correct` are right.
    fn questions(mock_id: Uuid, correct: usize) -> Vec<AnalysisRecord> {
        (0..10)
            .map(|i| analysis(mock_id, true, i < correct, None))
            .collect()
    }

    fn daily(day: i64) -> DailyHabitRecord {
        DailyHabitRecord {
            id: Uuid::new_v4(),
            date: base_date() + Duration::days(day),
            quant: true,
            lrdi: false,
            varc: true,
            soft_skill: false,
            exercise: true,
            gaming: false,
            mood: None,
        }
    }

    /// Mocks on days 1..=n, returned most-recent-first, each with the given
    /// accuracy (out of ten attempted questions) in chronological order.
    fn mocks_with_accuracy(accuracies: &[usize]) -> (Vec<MockRecord>, Vec<AnalysisRecord>) {
        let mut mocks = Vec::new();
        let mut analyses = Vec::new();
        for (day, &correct) in accuracies.iter().enumerate() {
            let record = mock(day as i64, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
            analyses.extend(questions(record.id, correct));
            mocks.push(record);
        }
        mocks.reverse();
        (mocks, analyses)
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(66.666_666, 2), 66.67);
        assert_eq!(round_to(0.125, 2), 0.13);
    }

    #[test]
    fn overview_without_mocks_reports_zero_averages() {
        let result = overview(&[], &[daily(0)], &[]);
        assert_eq!(result.total_mocks, 0);
        assert_eq!(result.total_daily_entries, 1);
        assert_eq!(result.average_percentile, 0.0);
        assert_eq!(result.average_total, 0.0);
        assert!(!result.average_total.is_nan());
    }

    #[test]
    fn overview_averages_percentile_and_total() {
        let mocks = vec![
            mock(2, Slot::Morning, 40.0, 50.0, 60.0, 90.0),
            mock(1, Slot::Evening, 30.0, 30.0, 30.0, 85.5),
            mock(0, Slot::Night, 20.0, 20.0, 21.0, 70.0),
        ];
        let result = overview(&mocks, &[], &[]);
        assert_eq!(result.total_mocks, 3);
        assert_eq!(result.average_percentile, 81.83);
        assert_eq!(result.average_total, 100.33);
    }

    #[test]
    fn weakest_section_uses_five_most_recent_mocks() {
        let mut mocks: Vec<MockRecord> = (0..5)
            .rev()
            .map(|day| mock(day + 1, Slot::Morning, 40.0, 60.0, 50.0, 80.0))
            .collect();
        // Older than the five most recent, so ignored.
        mocks.push(mock(0, Slot::Morning, 100.0, 0.0, 0.0, 80.0));

        let result = weakest_section(&mocks);
        assert_eq!(result.section, Some(Section::Varc));
        assert_eq!(result.average_score, 40.0);
        let averages = result.all_section_averages.unwrap();
        assert_eq!(averages.lrdi, 60.0);
        assert_eq!(averages.qa, 50.0);
        assert_eq!(
            result.message,
            "VARC needs attention with an average score of 40.00"
        );
    }

    #[test]
    fn weakest_section_breaks_ties_in_section_order() {
        let mocks = vec![mock(0, Slot::Morning, 70.0, 45.0, 45.0, 80.0)];
        assert_eq!(weakest_section(&mocks).section, Some(Section::Lrdi));
    }

    #[test]
    fn weakest_section_without_mocks_is_empty() {
        let result = weakest_section(&[]);
        assert_eq!(result.section, None);
        assert_eq!(result.average_score, 0.0);
        assert!(result.all_section_averages.is_none());
        assert_eq!(result.message, "No mock data available");
    }

    #[test]
    fn most_common_error_counts_diagnosed_mistakes() {
        let mock_id = Uuid::new_v4();
        let analyses = vec![
            analysis(mock_id, true, false, Some(ErrorType::Calculation)),
            analysis(mock_id, true, false, Some(ErrorType::Concept)),
            analysis(mock_id, true, false, Some(ErrorType::Concept)),
            analysis(mock_id, true, true, None),
            analysis(mock_id, true, false, None),
            analysis(mock_id, true, false, Some(ErrorType::Concept)),
        ];

        let result = most_common_error(&analyses);
        assert_eq!(result.error_type, Some(ErrorType::Concept));
        assert_eq!(result.count, 3);
        assert_eq!(result.percentage, 75.0);
        assert_eq!(result.total_errors, 4);
        assert_eq!(result.distribution[0].error_type, ErrorType::Calculation);
        assert_eq!(result.distribution[1].count, 3);
        assert_eq!(result.message, "Concept errors are most common (75.0% of mistakes)");
    }

    #[test]
    fn most_common_error_ties_go_to_first_seen() {
        let mock_id = Uuid::new_v4();
        let analyses = vec![
            analysis(mock_id, true, false, Some(ErrorType::Time)),
            analysis(mock_id, true, false, Some(ErrorType::Panic)),
            analysis(mock_id, true, false, Some(ErrorType::Panic)),
            analysis(mock_id, true, false, Some(ErrorType::Time)),
        ];
        let result = most_common_error(&analyses);
        assert_eq!(result.error_type, Some(ErrorType::Time));
        assert_eq!(result.percentage, 50.0);
    }

    #[test]
    fn most_common_error_distinguishes_empty_cases() {
        let none = most_common_error(&[]);
        assert_eq!(none.error_type, None);
        assert_eq!(none.message, "No analysis data available");

        let mock_id = Uuid::new_v4();
        let clean = most_common_error(&[
            analysis(mock_id, true, true, None),
            analysis(mock_id, true, false, None),
        ]);
        assert_eq!(clean.error_type, None);
        assert_eq!(clean.count, 0);
        assert_eq!(clean.message, "All answers are correct or no error types logged");
    }

    #[test]
    fn accuracy_trend_needs_data() {
        let result = accuracy_trend(&[], &[mock(0, Slot::Morning, 1.0, 1.0, 1.0, 1.0)]);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.current_accuracy, 0.0);
        assert_eq!(result.message, "Not enough data to calculate trend");
    }

    #[test]
    fn accuracy_trend_with_single_analysed_mock_is_stable() {
        let analysed = mock(1, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
        let skipped = mock(0, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
        let mut analyses = questions(analysed.id, 6);
        analyses.push(analysis(analysed.id, false, false, None));

        let result = accuracy_trend(&analyses, &[analysed, skipped]);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.current_accuracy, 60.0);
        assert_eq!(result.previous_accuracy, 0.0);
        assert_eq!(result.change, 0.0);
        assert_eq!(result.mock_accuracies.len(), 1);
        assert_eq!(
            result.message,
            "Need at least 2 mocks with analysis data for trend"
        );
    }

    #[test]
    fn accuracy_trend_detects_improvement() {
        let (mocks, analyses) = mocks_with_accuracy(&[7, 7, 7, 8, 8, 8]);
        let result = accuracy_trend(&analyses, &mocks);
        assert_eq!(result.trend, Trend::Improving);
        assert_eq!(result.current_accuracy, 80.0);
        assert_eq!(result.previous_accuracy, 70.0);
        assert_eq!(result.change, 10.0);
        assert_eq!(result.message, "Great! Accuracy improved by 10.0%");
        // Chronological order for charting.
        assert_eq!(result.mock_accuracies[0].accuracy, 70.0);
        assert!(result.mock_accuracies[0].date < result.mock_accuracies[5].date);
    }

    #[test]
    fn accuracy_trend_small_change_is_stable() {
        // Previous window averages 71, recent window 70.
        let mut mocks = Vec::new();
        let mut analyses = Vec::new();
        for (day, (correct, attempted)) in [(71, 100), (71, 100), (71, 100), (7, 10), (7, 10), (7, 10)]
            .into_iter()
            .enumerate()
        {
            let record = mock(day as i64, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
            for i in 0..attempted {
                analyses.push(analysis(record.id, true, i < correct, None));
            }
            mocks.push(record);
        }
        mocks.reverse();

        let result = accuracy_trend(&analyses, &mocks);
        assert_eq!(result.change, -1.0);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.message, "Accuracy is stable. Keep practicing!");
    }

    #[test]
    fn accuracy_trend_detects_decline() {
        let (mocks, analyses) = mocks_with_accuracy(&[9, 9, 5, 5]);
        let result = accuracy_trend(&analyses, &mocks);
        // recent = [9, 5, 5], previous = [9]
        assert_eq!(result.trend, Trend::Declining);
        assert_eq!(result.current_accuracy, 63.33);
        assert_eq!(result.previous_accuracy, 90.0);
        assert_eq!(result.change, -26.67);
        assert_eq!(result.message, "Accuracy declined by 26.7%. Review weak areas.");
    }

    #[test]
    fn accuracy_trend_without_previous_window_has_no_change() {
        let (mocks, analyses) = mocks_with_accuracy(&[3, 9]);
        let result = accuracy_trend(&analyses, &mocks);
        assert_eq!(result.current_accuracy, 60.0);
        assert_eq!(result.previous_accuracy, 60.0);
        assert_eq!(result.change, 0.0);
        assert_eq!(result.trend, Trend::Stable);
    }

    #[test]
    fn performance_patterns_need_three_mocks() {
        let mocks = vec![
            mock(1, Slot::Morning, 50.0, 50.0, 50.0, 80.0),
            mock(0, Slot::Night, 50.0, 50.0, 50.0, 90.0),
        ];
        let result = performance_patterns(&mocks);
        assert_eq!(result.best_slot, None);
        assert_eq!(result.worst_slot, None);
        assert!(result.patterns.is_empty());
    }

    #[test]
    fn performance_patterns_rank_slots_by_percentile() {
        let mocks = vec![
            mock(3, Slot::Morning, 50.0, 50.0, 50.0, 80.0),
            mock(2, Slot::Night, 60.0, 60.0, 60.0, 95.0),
            mock(1, Slot::Morning, 40.0, 40.0, 40.0, 70.0),
            mock(0, Slot::Evening, 30.0, 30.0, 30.0, 60.0),
        ];
        let result = performance_patterns(&mocks);
        assert_eq!(result.best_slot, Some(Slot::Night));
        assert_eq!(result.worst_slot, Some(Slot::Evening));
        assert_eq!(result.patterns.len(), 3);
        let morning = &result.patterns[1];
        assert_eq!(morning.slot, Slot::Morning);
        assert_eq!(morning.mock_count, 2);
        assert_eq!(morning.average_percentile, 75.0);
        assert_eq!(morning.average_score, 135.0);
    }

    #[test]
    fn single_mock_asks_for_more_mocks() {
        let mocks = vec![mock(0, Slot::Morning, 50.0, 50.0, 50.0, 80.0)];
        let daily: Vec<_> = (0..7).map(daily).collect();
        let result = recommendations(&mocks, &daily, &[]);
        let frequency: Vec<_> = result
            .iter()
            .filter(|rec| rec.kind == RecommendationKind::MockFrequency)
            .collect();
        assert_eq!(frequency.len(), 1);
        assert_eq!(frequency[0].priority, Priority::High);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn sparse_practice_names_the_shortfall() {
        let daily: Vec<_> = (0..3).map(daily).collect();
        let result = recommendations(&[], &daily, &[]);
        let practice = result
            .iter()
            .find(|rec| rec.kind == RecommendationKind::DailyPractice)
            .unwrap();
        assert_eq!(
            practice.message,
            "Increase daily practice consistency. You practiced only 3 out of 7 days."
        );
    }

    #[test]
    fn only_one_weak_section_is_reported() {
        let mocks: Vec<_> = (0..5)
            .rev()
            .map(|day| mock(day, Slot::Morning, 60.0, 30.0, 20.0, 80.0))
            .collect();
        let daily: Vec<_> = (0..7).map(daily).collect();
        let result = recommendations(&mocks, &daily, &[]);
        let weak: Vec<_> = result
            .iter()
            .filter(|rec| rec.kind == RecommendationKind::WeakSection)
            .collect();
        assert_eq!(weak.len(), 1);
        assert_eq!(
            weak[0].message,
            "Focus on LRDI. Your average score is 30.0, which needs improvement."
        );
    }

    #[test]
    fn weak_section_needs_five_mocks() {
        let mocks: Vec<_> = (0..4)
            .rev()
            .map(|day| mock(day, Slot::Morning, 10.0, 10.0, 10.0, 40.0))
            .collect();
        let result = recommendations(&mocks, &[], &[]);
        assert!(result
            .iter()
            .all(|rec| rec.kind != RecommendationKind::WeakSection));
    }

    #[test]
    fn large_unanalysed_backlog_asks_for_error_analysis() {
        let mock_id = Uuid::new_v4();
        let mut analyses: Vec<_> = (0..11)
            .map(|_| analysis(mock_id, true, false, Some(ErrorType::Concept)))
            .collect();
        analyses.extend((0..12).map(|_| analysis(mock_id, true, true, None)));

        let result = recommendations(&[], &[], &analyses);
        let completion = result
            .iter()
            .find(|rec| rec.kind == RecommendationKind::AnalysisCompletion)
            .unwrap();
        assert_eq!(completion.priority, Priority::Medium);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn analysis_completion_boundaries() {
        fn asks_for_analysis(diagnosed: usize, correct: usize) -> bool {
            let mock_id = Uuid::new_v4();
            let analyses: Vec<_> = (0..diagnosed)
                .map(|_| analysis(mock_id, true, false, Some(ErrorType::Concept)))
                .chain((0..correct).map(|_| analysis(mock_id, true, true, None)))
                .collect();
            recommendations(&[], &[], &analyses)
                .iter()
                .any(|rec| rec.kind == RecommendationKind::AnalysisCompletion)
        }

        // Needs strictly more than ten diagnosed mistakes.
        assert!(!asks_for_analysis(10, 30));
        // Exactly half diagnosed is not a backlog.
        assert!(!asks_for_analysis(11, 11));
        assert!(asks_for_analysis(11, 12));
    }

    #[test]
    fn four_of_seven_days_is_enough() {
        let daily: Vec<_> = (0..4).map(daily).collect();
        let result = recommendations(&[], &daily, &[]);
        assert!(result
            .iter()
            .all(|rec| rec.kind != RecommendationKind::DailyPractice));
    }

    #[test]
    fn unattempted_mock_counts_as_zero_accuracy() {
        let older = mock(0, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
        let newer = mock(1, Slot::Morning, 50.0, 50.0, 50.0, 80.0);
        let mut analyses = questions(older.id, 10);
        analyses.extend((0..4).map(|_| analysis(newer.id, false, false, None)));
        let newer_date = newer.date;

        let result = accuracy_trend(&analyses, &[newer, older]);
        assert_eq!(result.mock_accuracies.len(), 2);
        assert_eq!(result.mock_accuracies[0].accuracy, 100.0);
        assert_eq!(result.mock_accuracies[1].date, newer_date);
        assert_eq!(result.mock_accuracies[1].accuracy, 0.0);
        assert_eq!(result.current_accuracy, 50.0);
    }

    #[test]
    fn insights_are_idempotent() {
        let (mocks, analyses) = mocks_with_accuracy(&[5, 6, 7, 8]);
        let daily: Vec<_> = (0..4).map(daily).collect();

        let first = compute_insights(&mocks, &analyses, &daily, &[]);
        let second = compute_insights(&mocks, &analyses, &daily, &[]);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn empty_inputs_produce_a_complete_report() {
        let insights = compute_insights(&[], &[], &[], &[]);
        assert_eq!(insights.overview.total_mocks, 0);
        assert_eq!(insights.weakest_section.section, None);
        assert_eq!(insights.most_common_error.error_type, None);
        assert_eq!(insights.accuracy_trend.trend, Trend::Stable);
        assert!(insights.performance_patterns.patterns.is_empty());
        let kinds: Vec<_> = insights.recommendations.iter().map(|rec| rec.kind).collect();
        assert_eq!(
            kinds,
            vec![RecommendationKind::MockFrequency, RecommendationKind::DailyPractice]
        );
    }

    #[test]
    fn insights_serialize_with_dashboard_field_names() {
        let insights = compute_insights(&[], &[], &[], &[]);
        let value = serde_json::to_value(&insights).unwrap();
        assert!(value["weakestSection"]["section"].is_null());
        assert_eq!(value["accuracyTrend"]["trend"], "stable");
        assert_eq!(value["recommendations"][0]["type"], "mock_frequency");
        assert_eq!(value["recommendations"][0]["priority"], "high");
        assert_eq!(value["performancePatterns"]["bestSlot"], serde_json::Value::Null);
    }
}
