//! Text rendering of simulation reports

use std::fmt::Write;

use rf_reel_sim::SimulationReport;

/// Aligned `value  count  share` table followed by a summary line
pub fn render_table(report: &SimulationReport) -> String {
    let mut out = String::new();
    let total = report.table.total();
    let count_width = total.to_string().len().max("count".len());

    let _ = writeln!(out, "{:>8}  {:>count_width$}  {:>8}", "value", "count", "share");
    for (value, count) in report.table.iter() {
        let share = report.table.share(value) * 100.0;
        let _ = writeln!(out, "{value:>8}  {count:>count_width$}  {share:>7.3}%");
    }

    let mean = report
        .table
        .mean()
        .map(|m| format!("{m:.4}"))
        .unwrap_or_else(|| "-".into());
    let _ = writeln!(
        out,
        "trials: {}/{}  shards: {}  mean: {}  elapsed: {}ms{}",
        report.trials_completed,
        report.trials_requested,
        report.shards,
        mean,
        report.elapsed_ms,
        if report.cancelled { "  (cancelled)" } else { "" }
    );
    out
}
