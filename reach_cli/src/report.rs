//! Live status display and results-table rendering.

use reach_core::SweepReport;
use reach_traits::Presenter;
use serde_json::json;
use std::io::Write;

/// Writes live status lines to stderr, overwriting in place so the results
/// table on stdout stays clean.
#[derive(Default)]
pub struct StderrPresenter;

impl Presenter for StderrPresenter {
    fn live(&mut self, text: &str) {
        let mut err = std::io::stderr();
        let _ = write!(err, "\r{text}\x1b[K");
        let _ = err.flush();
    }
}

/// Render the per-DOF tables as plain text: one median column per style
/// plus the combined mean, in milliseconds.
pub fn render_text(report: &SweepReport) -> String {
    let mut out = String::new();
    for table in &report.tables {
        out.push_str(&format!("\n== {} DOF ==\n", table.dof));
        out.push_str(&format!("{:<12}", "decoder"));
        for style in &table.styles {
            out.push_str(&format!("{:>12}", style.as_str()));
        }
        out.push_str(&format!("{:>12}\n", "combined"));
        for row in &table.rows {
            out.push_str(&format!("{:<12}", row.decoder));
            for m in &row.medians_ms {
                out.push_str(&format!("{m:>10.0}ms"));
            }
            out.push_str(&format!("{:>10.0}ms\n", row.combined_ms));
        }
    }
    out
}

/// The same table as structured JSON, for `--json` and `--out`.
pub fn to_json(report: &SweepReport) -> serde_json::Value {
    json!({
        "tables": report
            .tables
            .iter()
            .map(|table| {
                json!({
                    "dof": table.dof,
                    "styles": table.styles.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                    "rows": table
                        .rows
                        .iter()
                        .map(|row| {
                            json!({
                                "decoder": row.decoder,
                                "medians_ms": row.medians_ms,
                                "combined_ms": row.combined_ms,
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_core::sweep::{SweepRow, SweepTable};
    use reach_core::target::TargetStyle;

    fn sample_report() -> SweepReport {
        SweepReport {
            tables: vec![SweepTable {
                dof: 2,
                styles: vec![TargetStyle::Random, TargetStyle::CenterOut],
                rows: vec![SweepRow {
                    decoder: "GT".into(),
                    medians_ms: vec![900.0, 1100.0],
                    combined_ms: 1000.0,
                }],
            }],
        }
    }

    #[test]
    fn text_table_names_every_column() {
        let text = render_text(&sample_report());
        assert!(text.contains("2 DOF"));
        assert!(text.contains("random"));
        assert!(text.contains("centerout"));
        assert!(text.contains("combined"));
        assert!(text.contains("GT"));
        assert!(text.contains("1000ms"));
    }

    #[test]
    fn json_shape_matches_the_tables() {
        let v = to_json(&sample_report());
        assert_eq!(v["tables"][0]["dof"], 2);
        assert_eq!(v["tables"][0]["rows"][0]["decoder"], "GT");
        assert_eq!(v["tables"][0]["rows"][0]["combined_ms"], 1000.0);
    }
}
