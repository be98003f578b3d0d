use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Configuration options for the citation distribution chart
///
/// This structure contains the customizable properties for rendering the
/// bar chart of citation counts.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    /// Default configuration matching the chart the results page shows:
    /// 800x600 pixels, papers on the x-axis, citations on the y-axis.
    fn default() -> Self {
        Self {
            title: "Citations Distribution".to_string(),
            x_label: "Papers".to_string(),
            y_label: "Citations".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Render the citation distribution as PNG bytes
///
/// Draws one bar per paper in upload order (x = publication rank, y =
/// citation count) and returns the encoded PNG, ready to serve as a
/// download.
///
/// # Arguments
/// * `citations` - Citation counts, one per paper
/// * `options` - Chart styling options
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
///
/// # Examples
/// ```no_run
/// use citemetrics::chart::{ChartOptions, render_bar_chart};
///
/// match render_bar_chart(&[10, 8, 5, 4, 3], &ChartOptions::default()) {
///     Ok(png_data) => println!("Chart rendered: {} bytes", png_data.len()),
///     Err(e) => eprintln!("Failed to render chart: {}", e),
/// }
/// ```
pub fn render_bar_chart(
    citations: &[i64],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    // Plotters' bitmap backend writes to a file; render into a temp file
    // and read the bytes back.
    let tmp = tempfile::Builder::new().suffix(".png").tempfile()?;
    let path = tmp.path().to_path_buf();

    draw_bars(citations, options, &path)?;

    let png_data = std::fs::read(&path)?;
    Ok(png_data)
}

/// Save the citation distribution chart to a file
///
/// Same chart as [`render_bar_chart`] but written straight to `path`,
/// which is what the CLI uses.
///
/// # Arguments
/// * `citations` - Citation counts, one per paper
/// * `options` - Chart styling options
/// * `path` - File path where the chart should be saved
///
/// # Returns
/// * A Result indicating success or failure
pub fn save_bar_chart(
    citations: &[i64],
    options: &ChartOptions,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    draw_bars(citations, options, path.as_ref())
}

// Draw the bar chart onto a bitmap backend at `path`. One bar per paper,
// [rank, rank+1) wide, filled blue.
fn draw_bars(citations: &[i64], options: &ChartOptions, path: &Path) -> Result<(), Box<dyn Error>> {
    if citations.is_empty() {
        return Err("No citation data to plot".into());
    }

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = citations.iter().copied().max().unwrap_or(0);

    let x_range = 0i64..citations.len() as i64;
    let y_range = 0i64..max_y + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(
        citations
            .iter()
            .enumerate()
            .map(|(rank, &count)| {
                let x = rank as i64;
                Rectangle::new([(x, 0), (x + 1, count)], BLUE.filled())
            }),
    )?;

    root.present()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_citation_list_is_an_error() {
        let err = render_bar_chart(&[], &ChartOptions::default()).unwrap_err();
        assert!(err.to_string().contains("No citation data"));
    }

    #[test]
    fn default_options_match_results_page() {
        let options = ChartOptions::default();
        assert_eq!(options.title, "Citations Distribution");
        assert_eq!(options.x_label, "Papers");
        assert_eq!(options.y_label, "Citations");
        assert_eq!((options.width, options.height), (800, 600));
    }
}
