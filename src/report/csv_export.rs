//! CSV investment report

use crate::error::ReportError;
use crate::format::dollars;
use crate::projection::{ProjectionInput, ProjectionResult};
use crate::reference::HistoricalReferenceData;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

/// Accumulates report lines; each non-blank line is one CSV record
#[derive(Default)]
struct ReportLines {
    lines: Vec<String>,
}

impl ReportLines {
    fn row(&mut self, fields: &[&str]) -> Result<(), ReportError> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut buf);
            writer.write_record(fields)?;
            writer.flush()?;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        self.lines.push(String::from_utf8(buf)?);
        Ok(())
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Render the report as text (lines joined with `\n`, no trailing newline)
pub fn render_report(
    result: &ProjectionResult,
    input: &ProjectionInput,
    reference: &HistoricalReferenceData,
) -> Result<String, ReportError> {
    let mut out = ReportLines::default();

    out.row(&["Investment Report"])?;
    out.blank();

    out.row(&["SUMMARY"])?;
    out.row(&["Total Investment", &dollars(input.total_investment())])?;
    out.row(&["Investment Duration", &format!("{} months", input.duration())])?;
    out.row(&["Final Balance", &dollars(result.total_return as f64)])?;
    out.row(&["Total Profit", &dollars(result.total_profit as f64)])?;
    out.row(&["Percentage Return", &format!("{}%", result.percentage_return)])?;
    out.row(&["Average Monthly Return", &format!("{}%", result.avg_monthly_return)])?;
    out.row(&["Average Monthly Profit", &dollars(result.avg_monthly_profit as f64)])?;
    out.row(&["Risk Level", result.risk_level.as_str()])?;
    out.row(&["Risk Description", &result.risk_description])?;
    out.blank();

    out.row(&["STRATEGY ALLOCATION"])?;
    out.row(&["Strategy", "Allocation %", "Investment Amount", "Number of Pairs"])?;
    for (strategy, pct) in input.allocations().iter() {
        let investment = input.total_investment() * (pct / 100.0);
        out.row(&[
            strategy.name(),
            &format!("{}%", pct),
            &dollars(investment),
            &reference.pair_count(strategy.name()).to_string(),
        ])?;
    }
    out.blank();

    out.row(&["MONTHLY PROJECTIONS"])?;
    out.row(&["Month", "Investment Value", "Profit"])?;
    for point in &result.monthly_projections {
        out.row(&[
            &point.month.to_string(),
            &dollars(point.value as f64),
            &dollars(point.profit as f64),
        ])?;
    }

    log::debug!(
        "Rendered report: {} months, {} lines",
        input.duration(),
        out.lines.len()
    );

    Ok(out.finish())
}

/// Render the report into `writer`
pub fn write_report<W: Write>(
    mut writer: W,
    result: &ProjectionResult,
    input: &ProjectionInput,
    reference: &HistoricalReferenceData,
) -> Result<(), ReportError> {
    let text = render_report(result, input, reference)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// `investment-report-2026-10-17T09-30-00-000Z.csv`
pub fn report_file_name(timestamp: DateTime<Utc>) -> String {
    let iso = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("investment-report-{}.csv", iso.replace([':', '.'], "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{ProjectionEngine, ProjectionRequest, ValidationBounds};
    use crate::strategy::Allocations;
    use chrono::TimeZone;

    fn run(investment: f64, duration: u32, split: [f64; 4]) -> (ProjectionResult, ProjectionInput) {
        let input = ProjectionRequest::new(
            investment,
            duration,
            Allocations::new(split[0], split[1], split[2], split[3]),
        )
        .validate(&ValidationBounds::default())
        .unwrap();
        let engine = ProjectionEngine::with_builtin();
        let outcome = engine.project_input(&input).unwrap();
        (outcome.result, input)
    }

    #[test]
    fn test_report_sections() {
        let (result, input) = run(100_000.0, 12, [25.0; 4]);
        let report = render_report(&result, &input, &HistoricalReferenceData::default_table()).unwrap();
        let lines: Vec<&str> = report.split('\n').collect();

        assert_eq!(lines[0], "Investment Report");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "SUMMARY");
        assert_eq!(lines[3], "Total Investment,\"$100,000\"");
        assert_eq!(lines[4], "Investment Duration,12 months");
        assert_eq!(lines[7], format!("Percentage Return,{}%", result.percentage_return));
        assert_eq!(lines[8], "Average Monthly Return,3.41%");
        assert_eq!(lines[10], "Risk Level,Moderate");
        assert_eq!(lines[11], "Risk Description,Balanced portfolio with moderate volatility");
        assert_eq!(lines[12], "");
        assert_eq!(lines[13], "STRATEGY ALLOCATION");
        assert_eq!(lines[14], "Strategy,Allocation %,Investment Amount,Number of Pairs");
        assert_eq!(lines[15], "Falcon,25%,\"$25,000\",5");
        assert_eq!(lines[16], "BS Buy Sell,25%,\"$25,000\",3");
        assert_eq!(lines[17], "Max Distance + RSI,25%,\"$25,000\",10");
        assert_eq!(lines[18], "UBS WITH ATR,25%,\"$25,000\",4");
        assert_eq!(lines[19], "");
        assert_eq!(lines[20], "MONTHLY PROJECTIONS");
        assert_eq!(lines[21], "Month,Investment Value,Profit");
        assert_eq!(lines[22], "0,\"$100,000\",$0");
        assert_eq!(lines.len(), 22 + 13);
        assert!(!report.ends_with('\n'));
    }

    #[test]
    fn test_quoted_fields_parse_back() {
        let (result, input) = run(150_000.0, 6, [40.0, 10.0, 20.0, 30.0]);
        let report = render_report(&result, &input, &HistoricalReferenceData::default_table()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(report.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        let final_balance = records.iter().find(|r| &r[0] == "Final Balance").unwrap();
        assert_eq!(final_balance.len(), 2);
        assert_eq!(&final_balance[1], crate::format::dollars(result.total_return as f64));
    }

    #[test]
    fn test_pair_count_follows_reference() {
        let (result, input) = run(100_000.0, 3, [25.0; 4]);
        let report = render_report(&result, &input, &HistoricalReferenceData::default()).unwrap();
        assert!(report.contains("Falcon,25%,\"$25,000\",0"));
    }

    #[test]
    fn test_write_report_matches_render() {
        let (result, input) = run(100_000.0, 2, [100.0, 0.0, 0.0, 0.0]);
        let table = HistoricalReferenceData::default_table();
        let mut buf = Vec::new();
        write_report(&mut buf, &result, &input, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render_report(&result, &input, &table).unwrap());
    }

    #[test]
    fn test_report_file_name() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 5).unwrap();
        assert_eq!(report_file_name(ts), "investment-report-2026-10-17T09-30-05-000Z.csv");
    }
}
