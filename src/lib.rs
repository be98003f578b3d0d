/*!
# Research Metrics Calculator

A small web tool (plus a CLI) that computes bibliometric indices from a
table of citation counts, built in Rust.

## Overview

The user uploads a CSV or Excel file of publication records, picks the
column holding citation counts (by position or by header name), and gets
back the h-index and i10-index together with a bar chart of the citation
distribution. The chart and the computed metrics are downloadable (PNG,
CSV, XLSX).

## Architecture

The computational core is two pure functions over a list of non-negative
integers; everything else is plumbing around them:

### Core
- **IndexCalculator** (`metrics`) - h-index and i10-index, stateless and
  deterministic, invoked once per upload
- `CitationSummary` / `Analysis` - the derived values handed to the web
  page, CLI and exports

### Ingestion
- **Loader** (`loader`) - CSV and XLSX parsing into a `CitationTable`,
  column selection (`ByIndex` / `ByName`), and the validation step that
  turns a loosely typed column into a clean citation list

### Presentation
- **Chart** (`chart`) - plotters bar chart of the distribution, rendered
  to PNG bytes for download or straight to a file
- **Export** (`export`) - CSV / XLSX export of ranked citations plus the
  indices
- **Web app** (`app`) - axum routes for upload, results, chart and export
  downloads; holds only the most recent analysis

## Key Features

- CSV and Excel (XLSX) input with quoted-field CSV handling
- Column selection by positional index or header name
- h-index and i10-index computation with typed input validation
- Citation distribution bar chart, served as a PNG download
- CSV/XLSX export of the ranked citations and computed indices
- Web front end and a command-line front end over the same library

## HTTP Endpoints

- `GET /` - upload page
- `POST /api/upload` - multipart upload (`file`, optional `column`)
- `GET /api/results` - most recent analysis as JSON
- `GET /api/chart.png` - citation distribution chart download
- `GET /api/export?format=csv|xlsx` - metrics export download
*/

// Re-export all modules so they appear in the documentation
pub mod app;
pub mod chart;
pub mod export;
pub mod loader;
pub mod metrics;

/// Re-export everything from these modules to make it easier to use
pub use chart::*;
pub use export::*;
pub use loader::*;
pub use metrics::*;
