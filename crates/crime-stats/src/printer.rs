//! Console and JSON rendering of a [`SummaryReport`].

use stats_core::formatting::{capitalize, format_count, format_percent};
use stats_core::models::FrequencyMode;
use stats_data::analysis::{AnalysisResult, SummaryReport};
use stats_data::distribution::CategoryCount;

/// Render the report as the plain-text console summary.
pub fn render_text(report: &SummaryReport) -> String {
    let mut lines: Vec<String> = vec![
        format!("Loaded records: {}", format_count(report.loaded_count)),
        format!("After cleaning: {}", format_count(report.cleaned_count)),
        format!(
            "Solving rate WITH location: {}",
            format_percent(report.solve_rate_with_location)
        ),
        format!(
            "Solving rate WITHOUT location: {}",
            format_percent(report.solve_rate_without_location)
        ),
    ];

    lines.push(String::new());
    lines.extend(frequency_section(report));

    if !report.monthly_trend.is_empty() {
        lines.push(String::new());
        lines.push("Monthly trend:".to_string());
        for entry in &report.monthly_trend {
            lines.push(format!("{}  {}", entry.month, format_count(entry.count)));
        }
    }

    category_section(&mut lines, "Crimes by type:", &report.crime_type_counts);
    category_section(&mut lines, "Crime outcomes:", &report.outcome_counts);
    category_section(&mut lines, "Crime severity:", &report.severity_counts);
    category_section(&mut lines, "Areas with highest crime counts:", &report.area_counts);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Render the report and its metadata as pretty-printed JSON.
pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn frequency_section(report: &SummaryReport) -> Vec<String> {
    match report.frequency_mode {
        FrequencyMode::Empty => vec!["No records left after cleaning.".to_string()],
        FrequencyMode::NoRepetition => {
            let mut lines = vec![
                "No crime is repeated.".to_string(),
                "All crimes happened in the same ratio:".to_string(),
                String::new(),
            ];
            lines.extend(report.most_frequent_incidents.iter().map(|incident| {
                match &incident.place {
                    Some(place) => {
                        format!("{} at {}", capitalize(&incident.crime_type), capitalize(place))
                    }
                    None => format!("{} (no location)", capitalize(&incident.crime_type)),
                }
            }));
            lines
        }
        FrequencyMode::Repeated => {
            let mut lines = vec!["Most repeated crime(s):".to_string()];
            lines.extend(report.most_frequent_crimes.iter().map(|c| capitalize(c)));

            lines.push(String::new());
            lines.push("Number of times the crime happened:".to_string());
            lines.extend(
                report
                    .most_frequent_crimes
                    .iter()
                    .map(|c| format!("{} : {}", capitalize(c), report.frequency_of_most)),
            );

            lines.push(String::new());
            lines.push("Place(s) where the repeated crime(s) happened:".to_string());
            lines.extend(report.places_for_most_frequent.iter().map(|p| capitalize(p)));

            if !report.repeated_places.is_empty() {
                lines.push(String::new());
                lines.push("Repeated place(s) for the crime(s):".to_string());
                lines.extend(report.repeated_places.iter().map(|p| capitalize(p)));
            }
            lines
        }
    }
}

fn category_section(lines: &mut Vec<String>, title: &str, counts: &[CategoryCount]) {
    if counts.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(title.to_string());
    for entry in counts {
        lines.push(format!("{}: {}", entry.label, format_count(entry.count)));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
