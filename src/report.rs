use std::fmt::Write;

use crate::models::{DailyStats, Insights, SoftSkillStats, Trend};
use crate::window::DateWindow;

pub fn build_report(
    label: &str,
    window: &DateWindow,
    insights: &Insights,
    daily: &DailyStats,
    soft_skills: &SoftSkillStats,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Exam Prep Progress Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}: {} to {})",
        label,
        window.label(),
        window.start,
        window.end
    );
    let _ = writeln!(output);

    let overview = &insights.overview;
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(
        output,
        "- {} mocks, {} daily entries, {} soft-skill sessions",
        overview.total_mocks, overview.total_daily_entries, overview.total_soft_skills
    );
    let _ = writeln!(
        output,
        "- Average percentile {:.2}, average total {:.2}",
        overview.average_percentile, overview.average_total
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weakest Section");
    let _ = writeln!(output, "{}", insights.weakest_section.message);
    if let Some(averages) = &insights.weakest_section.all_section_averages {
        let _ = writeln!(
            output,
            "- VARC {:.2} / LRDI {:.2} / QA {:.2}",
            averages.varc, averages.lrdi, averages.qa
        );
    }

    let errors = &insights.most_common_error;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Errors");
    let _ = writeln!(output, "{}", errors.message);
    for entry in errors.distribution.iter() {
        let _ = writeln!(output, "- {}: {}", entry.error_type, entry.count);
    }

    let trend = &insights.accuracy_trend;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Accuracy Trend");
    let _ = writeln!(output, "{}", trend.message);
    if trend.mock_accuracies.len() >= 2 {
        let arrow = match trend.trend {
            Trend::Improving => "up",
            Trend::Declining => "down",
            Trend::Stable => "flat",
        };
        let _ = writeln!(
            output,
            "- Recent {:.2}% vs previous {:.2}% ({}, {:+.2})",
            trend.current_accuracy, trend.previous_accuracy, arrow, trend.change
        );
    }
    for point in trend.mock_accuracies.iter() {
        let _ = writeln!(output, "- {}: {:.2}%", point.date, point.accuracy);
    }

    let patterns = &insights.performance_patterns;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Slot Patterns");
    match (patterns.best_slot, patterns.worst_slot) {
        (Some(best), Some(worst)) => {
            let _ = writeln!(output, "Best slot: {best}. Weakest slot: {worst}.");
            for slot in patterns.patterns.iter() {
                let _ = writeln!(
                    output,
                    "- {}: percentile {:.2}, score {:.2} across {} mocks",
                    slot.slot, slot.average_percentile, slot.average_score, slot.mock_count
                );
            }
        }
        _ => {
            let _ = writeln!(output, "Not enough mocks to compare slots.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Practice Habits");
    if daily.total_entries == 0 {
        let _ = writeln!(output, "No daily entries recorded for this window.");
    } else {
        let _ = writeln!(
            output,
            "- {} entries: quant {}, LRDI {}, VARC {}, soft skills {}, exercise {}, gaming {}",
            daily.total_entries,
            daily.quant,
            daily.lrdi,
            daily.varc,
            daily.soft_skill,
            daily.exercise,
            daily.gaming
        );
        let moods: Vec<String> = daily
            .mood_distribution
            .iter()
            .filter(|entry| entry.count > 0)
            .map(|entry| format!("{} {}", entry.mood, entry.count))
            .collect();
        if !moods.is_empty() {
            let _ = writeln!(output, "- Moods: {}", moods.join(", "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Soft Skills");
    if soft_skills.total_entries == 0 {
        let _ = writeln!(output, "No soft-skill sessions recorded for this window.");
    } else {
        let _ = writeln!(
            output,
            "- {} sessions, {} minutes ({:.2} hours), average rating {:.2}",
            soft_skills.total_entries,
            soft_skills.total_practice_minutes,
            soft_skills.total_practice_hours,
            soft_skills.average_rating
        );
        for entry in soft_skills.type_distribution.iter().filter(|e| e.count > 0) {
            let _ = writeln!(output, "- {}: {}", entry.kind, entry.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    if insights.recommendations.is_empty() {
        let _ = writeln!(output, "Nothing to flag. Keep the routine going.");
    } else {
        for rec in insights.recommendations.iter() {
            let _ = writeln!(output, "- [{}] {}", rec.priority.as_str(), rec.message);
        }
    }

    output
}
