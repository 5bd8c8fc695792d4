//! Eval command implementation
//!
//! Reads `t`, `p`, `x`, `y` arrays from a JSON file, interpolates them and
//! writes `v`, `a`, `inds` as JSON, CSV or a table.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use interp_core::interp::{InterpOutput, Interpolator};
use interp_core::types::{Array, Element};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{CliError, Result};

/// Input document: four arrays with `shape` and flat `data`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct EvalInput<T> {
    pub t: Array<T>,
    pub p: Array<T>,
    pub x: Array<T>,
    pub y: Array<T>,
}

/// Output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Table,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

/// One flattened query in CSV output
#[derive(Debug, Serialize)]
struct CsvRecord<T> {
    row: usize,
    n: usize,
    t: T,
    v: T,
    a: T,
    ind: i64,
}

/// Run the eval command
pub fn run(
    interpolator: &Interpolator,
    input: &str,
    output: Option<&str>,
    format: &str,
    dtype: &str,
) -> Result<()> {
    info!("Starting evaluation...");
    info!("  Input: {}", input);
    info!("  Output: {}", output.unwrap_or("stdout"));
    info!("  Format: {}", format);
    info!("  Element type: {}", dtype);

    let format = OutputFormat::from_str(format)?;
    if !Path::new(input).exists() {
        return Err(CliError::FileNotFound(input.to_string()));
    }
    let content = std::fs::read_to_string(input)?;

    // the destination is only touched once the whole call has succeeded
    let mut rendered = Vec::new();
    match dtype {
        "f64" => evaluate::<f64>(interpolator, &content, format, &mut rendered)?,
        "f32" => evaluate::<f32>(interpolator, &content, format, &mut rendered)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown element type: {}. Supported: f64, f32",
                other
            )));
        }
    }

    match output {
        Some(path) => std::fs::write(path, &rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }

    info!("Evaluation complete");
    Ok(())
}

/// Parse, interpolate and write one document of element type `T`
pub fn evaluate<T>(
    interpolator: &Interpolator,
    content: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Element + Serialize + DeserializeOwned + Display,
{
    let input: EvalInput<T> = serde_json::from_str(content)?;

    let started = Instant::now();
    let result = interpolator.interp(input.t.view(), input.p.view(), input.x.view(), input.y.view())?;
    info!(
        queries = result.v.data().len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "interpolated batch"
    );

    write_output(&input.t, &result, format, out)
}

fn write_output<T>(
    t: &Array<T>,
    result: &InterpOutput<T>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()>
where
    T: Element + Serialize + Display,
{
    let n = t.shape().last().copied().unwrap_or(0);
    let records = t
        .data()
        .iter()
        .zip(result.v.data())
        .zip(result.a.data())
        .zip(result.inds.data())
        .enumerate()
        .map(|(i, (((&t, &v), &a), &ind))| CsvRecord {
            row: i / n,
            n: i % n,
            t,
            v,
            a,
            ind,
        });

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            writeln!(out, "┌───────┬───────┬──────────────┬──────────────┬──────────────┬───────┐")?;
            writeln!(out, "│ Row   │ N     │ t            │ v            │ a            │ Index │")?;
            writeln!(out, "├───────┼───────┼──────────────┼──────────────┼──────────────┼───────┤")?;
            for r in records {
                writeln!(
                    out,
                    "│ {:<5} │ {:<5} │ {:>12.6} │ {:>12.6} │ {:>12.6} │ {:>5} │",
                    r.row, r.n, r.t, r.v, r.a, r.ind
                )?;
            }
            writeln!(out, "└───────┴───────┴──────────────┴──────────────┴──────────────┴───────┘")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCENARIO: &str = r#"{
        "t": {"shape": [7], "data": [-1.0, 0.0, 0.5, 1.0, 2.5, 3.0, 10.0]},
        "p": {"shape": [], "data": [0.0]},
        "x": {"shape": [4], "data": [0.0, 1.0, 2.0, 3.0]},
        "y": {"shape": [4], "data": [0.0, 10.0, 20.0, 30.0]}
    }"#;

    #[test]
    fn test_evaluate_json() {
        let mut buf = Vec::new();
        evaluate::<f64>(&Interpolator::default(), SCENARIO, OutputFormat::Json, &mut buf).unwrap();
        let out: InterpOutput<f64> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(out.v.data(), &[0.0, 0.0, 5.0, 10.0, 25.0, 30.0, 30.0]);
        assert_eq!(out.inds.data(), &[0, 0, 1, 2, 3, 5, 5]);
    }

    #[test]
    fn test_evaluate_csv_f32() {
        let mut buf = Vec::new();
        evaluate::<f32>(&Interpolator::default(), SCENARIO, OutputFormat::Csv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("row,n,t,v,a,ind"));
        let third: Vec<&str> = lines.nth(2).unwrap().split(',').collect();
        assert_eq!(third[0], "0");
        assert_eq!(third[1], "2");
        assert_relative_eq!(third[3].parse::<f32>().unwrap(), 5.0);
        assert_eq!(third[5], "1");
    }

    #[test]
    fn test_evaluate_table() {
        let mut buf = Vec::new();
        evaluate::<f64>(&Interpolator::default(), SCENARIO, OutputFormat::Table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 7 + 4);
    }

    #[test]
    fn test_evaluate_rejects_bad_shape() {
        let bad = SCENARIO.replace(r#""shape": [], "data": [0.0]"#, r#""shape": [1], "data": [0.0]"#);
        let err = evaluate::<f64>(&Interpolator::default(), &bad, OutputFormat::Json, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CliError::Interp(_)));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        let output = dir.path().join("output.json");
        std::fs::write(&input, SCENARIO).unwrap();

        run(
            &Interpolator::default(),
            input.to_str().unwrap(),
            Some(output.to_str().unwrap()),
            "json",
            "f64",
        )
        .unwrap();

        let out: InterpOutput<f64> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(out.v.shape(), &[7]);
    }

    #[test]
    fn test_failed_run_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        let output = dir.path().join("output.json");
        let bad = SCENARIO.replace(r#""shape": [], "data": [0.0]"#, r#""shape": [1], "data": [0.0]"#);
        std::fs::write(&input, bad).unwrap();
        std::fs::write(&output, "PREVIOUS RESULTS").unwrap();
        let (input, output) = (input.to_str().unwrap(), output.to_str().unwrap());

        let err = run(&Interpolator::default(), input, Some(output), "json", "f64").unwrap_err();
        assert!(matches!(err, CliError::Interp(_)));
        assert_eq!(std::fs::read_to_string(output).unwrap(), "PREVIOUS RESULTS");

        let err = run(&Interpolator::default(), input, Some(output), "json", "f16").unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(std::fs::read_to_string(output).unwrap(), "PREVIOUS RESULTS");
    }

    #[test]
    fn test_run_missing_input() {
        let err = run(&Interpolator::default(), "/nonexistent.json", None, "json", "f64").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_run_rejects_unknown_format_and_dtype() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(&input, SCENARIO).unwrap();
        let input = input.to_str().unwrap();

        assert!(matches!(
            run(&Interpolator::default(), input, None, "xml", "f64"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            run(&Interpolator::default(), input, None, "json", "f16"),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
