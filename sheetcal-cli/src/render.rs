//! Terminal rendering for sync results.

use owo_colors::OwoColorize;
use sheetcal_core::action::Action;
use sheetcal_core::{RowOutcome, SyncReport};
use sheetcal_core::sync::RowReport;

pub trait Render {
    fn render(&self) -> String;
}

fn action_symbol(action: Action) -> &'static str {
    match action {
        Action::Add => "+",
        Action::Update => "~",
        Action::Delete => "-",
    }
}

impl Render for RowReport {
    fn render(&self) -> String {
        let row = format!("row {}", self.row);
        match &self.outcome {
            RowOutcome::Skipped => format!("  {} {}", " ", row.dimmed()),
            RowOutcome::Unrecognized(tag) => {
                format!("  {} {} unknown action '{}'", "?".yellow(), row, tag)
            }
            RowOutcome::Applied { action, result } => {
                let symbol = action_symbol(*action);
                let line = format!("{} {}", result.status, result.event_id)
                    .trim_end()
                    .to_string();
                let (symbol, line) = match action {
                    Action::Add => (symbol.green().to_string(), line.green().to_string()),
                    Action::Update => (symbol.yellow().to_string(), line.yellow().to_string()),
                    Action::Delete => (symbol.red().to_string(), line.red().to_string()),
                };
                format!("  {} {} {}", symbol, row, line)
            }
            RowOutcome::Kept { action, result } => format!(
                "  {} {} {} not applied, kept {}",
                "!".red(),
                row,
                action,
                format!("'{}' '{}'", result.status, result.event_id).dimmed()
            ),
        }
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .filter(|r| r.outcome != RowOutcome::Skipped)
            .map(Render::render)
            .collect();

        if lines.is_empty() {
            lines.push("No rows had an action.".dimmed().to_string());
        }
        lines.push(String::new());
        lines.push(summary(self));
        lines.join("\n")
    }
}

/// Totals line, e.g. "1 added, 0 updated, 2 deleted, 1 kept".
pub fn summary(report: &SyncReport) -> String {
    let mut parts = vec![
        format!("{} added", report.added()),
        format!("{} updated", report.updated()),
        format!("{} deleted", report.deleted()),
    ];
    if report.kept() > 0 {
        parts.push(format!("{} kept", report.kept()));
    }
    if report.unrecognized() > 0 {
        parts.push(format!("{} unrecognized", report.unrecognized()));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcal_core::RowResult;

    fn report(outcomes: Vec<RowOutcome>) -> SyncReport {
        SyncReport {
            rows: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| RowReport {
                    row: i as u32 + 2,
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let report = report(vec![
            RowOutcome::Applied {
                action: Action::Add,
                result: RowResult::new("Added", "evt-1"),
            },
            RowOutcome::Skipped,
            RowOutcome::Kept {
                action: Action::Delete,
                result: RowResult::new("Added", "evt-2"),
            },
        ]);

        assert_eq!(summary(&report), "1 added, 0 updated, 0 deleted, 1 kept");
    }

    #[test]
    fn summary_mentions_unrecognized() {
        let report = report(vec![RowOutcome::Unrecognized("Archive".to_string())]);
        assert_eq!(
            summary(&report),
            "0 added, 0 updated, 0 deleted, 1 unrecognized"
        );
    }

    #[test]
    fn skipped_rows_are_not_listed() {
        let rendered = report(vec![RowOutcome::Skipped]).render();
        assert!(rendered.contains("No rows had an action."));
        assert!(!rendered.contains("row 2"));
    }

    #[test]
    fn applied_row_lists_status_and_id() {
        let rendered = report(vec![RowOutcome::Applied {
            action: Action::Update,
            result: RowResult::new("Updated", "evt-9"),
        }])
        .render();
        assert!(rendered.contains("row 2"));
        assert!(rendered.contains("Updated evt-9"));
    }
}
