use acft_score::scoring::table::UNRANKED_MARKER;
use acft_score::scoring::{
    format_seconds, AgeBracket, CompositeScore, Event, EventKind, EventScore, Resolution, Sex,
    StandardsTable,
};
use serde::Serialize;

/// One bracket column of a standards table, in display units.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StandardsView {
    pub(crate) event: Event,
    pub(crate) sex: Sex,
    pub(crate) bracket: AgeBracket,
    pub(crate) rows: Vec<StandardsRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StandardsRow {
    pub(crate) points: i32,
    /// `None` where the table has no threshold for this tier.
    pub(crate) threshold: Option<String>,
}

impl StandardsView {
    pub(crate) fn from_table(table: &StandardsTable, bracket: AgeBracket) -> Option<Self> {
        let column = table.column(bracket)?;
        let event = table.event();
        let rows = column
            .thresholds()
            .iter()
            .zip(column.points())
            .map(|(threshold, points)| StandardsRow {
                points: *points,
                threshold: threshold.value().map(|value| display_value(event, value)),
            })
            .collect();

        Some(Self {
            event,
            sex: table.sex(),
            bracket,
            rows,
        })
    }
}

/// Times as `M:SS`, everything else as the bare number.
pub(crate) fn display_value(event: Event, value: f64) -> String {
    match event.kind() {
        EventKind::Timed => format_seconds(value.round() as u32),
        EventKind::Numeric => format!("{value}"),
    }
}

fn resolution_label(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Exact => "exact",
        Resolution::ExceededStandard => "above max",
        Resolution::BelowMinimum => "below min",
        Resolution::RoundedDown => "rounded down",
    }
}

fn event_line(score: &EventScore) -> String {
    format!(
        "{:<24} {:>8} {:>4} pts  ({})",
        score.event.name(),
        display_value(score.event, score.value),
        score.points,
        resolution_label(score.resolution)
    )
}

pub(crate) fn render_event(score: &EventScore, sex: Sex) -> String {
    format!(
        "Age bracket {} / sex {}\n{}\n",
        score.bracket,
        sex,
        event_line(score)
    )
}

pub(crate) fn render_scorecard(score: &CompositeScore) -> String {
    let mut lines = vec![format!(
        "ACFT scorecard: age bracket {} / sex {}",
        score.bracket, score.sex
    )];
    lines.extend(score.events.values().map(event_line));
    lines.push(format!("{:<24} {:>8} {:>4} pts", "Total", "", score.overall));
    lines.join("\n") + "\n"
}

pub(crate) fn render_standards(view: &StandardsView) -> String {
    let mut lines = vec![format!(
        "{} standards ({}, {})",
        view.event.name(),
        view.sex,
        view.bracket
    )];
    lines.extend(view.rows.iter().map(|row| {
        format!(
            "{:>4}  {}",
            row.points,
            row.threshold.as_deref().unwrap_or(UNRANKED_MARKER)
        )
    }));
    lines.join("\n") + "\n"
}
