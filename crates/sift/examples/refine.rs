//! Example: refine a CSV file with sift.
//!
//! Usage:
//!   cargo run --example refine -- <file_path>

use std::env;
use std::fs::File;
use std::process;

use sift::{CleaningOptions, Record, Sift, Value};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example refine -- <file_path>");
        process::exit(1);
    }

    let file = match File::open(&args[1]) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: cannot open {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(String::from).collect(),
        Err(e) => {
            eprintln!("Error: cannot read header row: {}", e);
            process::exit(1);
        }
    };

    let records: Vec<Record> = reader
        .records()
        .filter_map(|row| row.ok())
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), Value::from(v)))
                .collect()
        })
        .collect();

    let separator = "=".repeat(72);
    println!("{}", separator);
    println!("Sift refinement: {} ({} rows)", args[1], records.len());
    println!("{}", separator);
    println!();

    let sift = Sift::new();
    let result = match sift.refine(&records, &CleaningOptions::default()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("## Column profiles");
    for (column, profile) in &result.profiles {
        println!(
            "  {:20} {:8?} confidence={:<3} nulls={:<3} ({})",
            column,
            profile.inferred_type,
            profile.confidence,
            profile.null_percentage,
            profile.type_explanation(),
        );
    }
    println!();

    println!("## Generated rules");
    for (column, rules) in &result.rules {
        let kinds: Vec<&str> = rules.iter().map(|r| r.check.name()).collect();
        println!("  {:20} {}", column, kinds.join(", "));
    }
    println!();

    println!("## Validation");
    println!("  Valid rows:   {}", result.report.valid_rows);
    println!("  Invalid rows: {}", result.report.invalid_rows);
    println!("  Errors:       {}", result.report.total_errors);
    println!("  Warnings:     {}", result.report.total_warnings);
    println!("  Quality:      {}%", result.report.quality_score());
    for issue in result.report.errors.iter().take(10) {
        println!(
            "    row {:4} {}: {}",
            issue.row_index, issue.column, issue.message
        );
    }
    println!();

    println!("## Cleaning");
    println!("  Actions: {}", result.cleaning_log.len());
    println!("  Removed: {}", result.removed_count);
    println!("  Output:  {} rows", result.records.len());
}
