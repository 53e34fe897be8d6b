//! Usage query command handler.
//!
//! Drives the whole pipeline: parse the range selection, resolve it
//! against now, fetch entities and raw usage, normalize into dense
//! rows, and render them in the chosen output format.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use fluxgate_api::{PanelClient, UsageScope};
use fluxgate_core::{
    ChartRow, LabelContext, QueryRange, RangeSelection, Shortcut, StatsSeries, convert, normalize,
    resolve_range, total_usage_gb,
};

use crate::cli::{GlobalOpts, OutputFormat, RangeArgs, UsageCommand};
use crate::error::CliError;
use crate::output;

/// Structured report for json/yaml output.
#[derive(Serialize)]
struct UsageReport<'a> {
    range: &'a QueryRange,
    total_usage_gb: f64,
    rows: &'a [ChartRow],
}

pub async fn handle(
    client: &PanelClient,
    command: UsageCommand,
    global: &GlobalOpts,
    labels: &LabelContext,
    default_range: Option<Shortcut>,
) -> Result<(), CliError> {
    let (scope, range_args) = match command {
        UsageCommand::Nodes(args) => (UsageScope::Nodes, args),
        UsageCommand::Admins(args) => (UsageScope::Admins, args),
    };

    let selection = parse_selection(&range_args, default_range)?;
    let range = resolve_range(&selection, labels.now)?;

    let entities = match scope {
        UsageScope::Nodes => convert::entities_from_nodes(&client.list_nodes().await?),
        UsageScope::Admins => convert::entities_from_admins(&client.list_admins().await?),
    };

    let raw = client
        .get_usage(
            scope,
            range.start,
            range.end,
            &range.granularity.to_string(),
        )
        .await?;
    let stats = StatsSeries::from(&raw);

    let rows = normalize(&range, &stats, &entities, labels);
    let total = total_usage_gb(&rows);

    match global.output {
        OutputFormat::Table => {
            render_usage_table(&rows, &entities, total, global);
        }
        OutputFormat::Json => output::print_output(
            &output::render_json_pretty(&UsageReport {
                range: &range,
                total_usage_gb: total,
                rows: &rows,
            }),
            global.quiet,
        ),
        OutputFormat::JsonCompact => output::print_output(
            &output::render_json_compact(&UsageReport {
                range: &range,
                total_usage_gb: total,
                rows: &rows,
            }),
            global.quiet,
        ),
        OutputFormat::Yaml => output::print_output(
            &output::render_yaml(&UsageReport {
                range: &range,
                total_usage_gb: total,
                rows: &rows,
            }),
            global.quiet,
        ),
        OutputFormat::Plain => {
            let lines: Vec<String> = rows
                .iter()
                .map(|r| {
                    format!(
                        "{}\t{:.6}",
                        r.period_start.to_rfc3339_opts(SecondsFormat::Secs, true),
                        r.total_gb()
                    )
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
        }
    }
    Ok(())
}

/// Table rendering: one column per entity plus a total, and a summary
/// line underneath.
fn render_usage_table(
    rows: &[ChartRow],
    entities: &[fluxgate_core::Entity],
    total: f64,
    global: &GlobalOpts,
) {
    if rows.is_empty() {
        output::print_output("No usage data for this range", global.quiet);
        return;
    }

    let mut header = vec!["PERIOD".to_owned()];
    header.extend(entities.iter().map(|e| e.name.to_uppercase()));
    header.push("TOTAL".to_owned());

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.time_label.clone()];
            cells.extend(row.usage_gb.values().map(|gb| format!("{gb:.3}")));
            cells.push(format!("{:.3}", row.total_gb()));
            cells
        })
        .collect();

    output::print_output(&output::render_dynamic_table(header, table_rows), global.quiet);

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    let total_bytes = (total * fluxgate_core::BYTES_PER_GB).round() as u64;
    let summary = format!(
        "{} buckets, {} total",
        rows.len(),
        bytesize::ByteSize(total_bytes)
    );
    if output::should_color(&global.color) {
        output::print_output(&summary.dimmed().to_string(), global.quiet);
    } else {
        output::print_output(&summary, global.quiet);
    }
}

// ── Range parsing ────────────────────────────────────────────────────

/// Build the range selection from CLI flags, falling back to the
/// configured default shortcut.
fn parse_selection(
    args: &RangeArgs,
    default_range: Option<Shortcut>,
) -> Result<RangeSelection, CliError> {
    if let Some(ref shortcut) = args.last {
        let shortcut =
            Shortcut::from_str(shortcut).map_err(|_| CliError::Validation {
                field: "last".into(),
                reason: format!(
                    "unknown shortcut '{shortcut}' (expected 1h, 6h, 24h, 3d, 1w, 2w, 1m, or all)"
                ),
            })?;
        return Ok(RangeSelection::Shortcut(shortcut));
    }

    // clap enforces from/to pairing; no flags means the default.
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        Ok(RangeSelection::Custom {
            from: parse_time(from, "from")?,
            to: parse_time(to, "to")?,
        })
    } else {
        Ok(RangeSelection::Shortcut(
            default_range.unwrap_or(Shortcut::OneDay),
        ))
    }
}

/// Parse a timestamp as Unix seconds or RFC 3339.
fn parse_time(value: &str, field: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(ts) = value.parse::<i64>() {
        return DateTime::from_timestamp(ts, 0).ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("timestamp '{value}' is out of range"),
        });
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("invalid timestamp '{value}' (use Unix seconds or RFC3339)"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn range_args(last: Option<&str>, from: Option<&str>, to: Option<&str>) -> RangeArgs {
        RangeArgs {
            last: last.map(str::to_owned),
            from: from.map(str::to_owned),
            to: to.map(str::to_owned),
        }
    }

    #[test]
    fn shortcut_flag_parses() {
        let selection = parse_selection(&range_args(Some("24h"), None, None), None).unwrap();
        assert_eq!(selection, RangeSelection::Shortcut(Shortcut::OneDay));
    }

    #[test]
    fn unknown_shortcut_is_a_usage_error() {
        let result = parse_selection(&range_args(Some("5y"), None, None), None);
        assert!(matches!(result, Err(CliError::Validation { .. })));
    }

    #[test]
    fn explicit_window_parses_rfc3339_and_unix() {
        let selection = parse_selection(
            &range_args(None, Some("2024-01-01T00:00:00Z"), Some("1704189600")),
            None,
        )
        .unwrap();
        match selection {
            RangeSelection::Custom { from, to } => {
                assert_eq!(from.timestamp(), 1_704_067_200);
                assert_eq!(to.timestamp(), 1_704_189_600);
            }
            RangeSelection::Shortcut(_) => panic!("expected custom range"),
        }
    }

    #[test]
    fn no_flags_fall_back_to_configured_default() {
        let selection =
            parse_selection(&range_args(None, None, None), Some(Shortcut::OneWeek)).unwrap();
        assert_eq!(selection, RangeSelection::Shortcut(Shortcut::OneWeek));

        let selection = parse_selection(&range_args(None, None, None), None).unwrap();
        assert_eq!(selection, RangeSelection::Shortcut(Shortcut::OneDay));
    }
}
