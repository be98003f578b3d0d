use citemetrics::chart::{ChartOptions, save_bar_chart};
use citemetrics::export;
use citemetrics::loader::{ColumnSelector, extract_citations, table_from_path};
use citemetrics::metrics::Analysis;

use std::env;
use std::process;

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <FILE> [--column <name-or-index>] [--chart <out.png>] [--export <out.csv|out.xlsx>]",
        program
    );
    eprintln!();
    eprintln!("Computes the h-index and i10-index from a CSV or Excel file of");
    eprintln!("citation counts. The column defaults to index 12; pass a header");
    eprintln!("name such as \"Cited by\" or a zero-based index to override it.");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(2);
    }

    let filepath = args[1].clone();
    let mut selector = ColumnSelector::default();
    let mut chart_path: Option<String> = None;
    let mut export_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--column" => {
                i += 1;
                let value = args.get(i).ok_or("--column requires a value")?;
                selector = ColumnSelector::parse(value);
            }
            "--chart" => {
                i += 1;
                chart_path = Some(args.get(i).ok_or("--chart requires a path")?.clone());
            }
            "--export" => {
                i += 1;
                export_path = Some(args.get(i).ok_or("--export requires a path")?.clone());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(&args[0]);
                process::exit(2);
            }
        }
        i += 1;
    }

    let table = table_from_path(&filepath)?;
    let citations = extract_citations(&table, &selector)?;

    let filename = std::path::Path::new(&filepath)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("citations.csv")
        .to_string();

    let analysis = Analysis::new(filename, table.headers.clone(), table.preview(5), citations)?;

    println!("File loaded successfully!");
    println!();
    println!("Results");
    println!("  papers:          {}", analysis.summary.papers);
    println!("  h-index:         {}", analysis.summary.h_index);
    println!("  i10-index:       {}", analysis.summary.i10_index);
    println!("  total citations: {}", analysis.summary.total_citations);
    println!("  max citations:   {}", analysis.summary.max_citations);

    if let Some(path) = chart_path {
        save_bar_chart(&analysis.citations, &ChartOptions::default(), &path)?;
        println!();
        println!("Chart saved to {}", path);
    }

    if let Some(path) = export_path {
        if path.to_lowercase().ends_with(".xlsx") {
            let bytes = export::to_xlsx(&analysis)?;
            std::fs::write(&path, bytes)?;
        } else {
            let csv = export::to_csv(&analysis)?;
            std::fs::write(&path, csv)?;
        }
        println!("Metrics exported to {}", path);
    }

    Ok(())
}
