// ============================================================
// Layer 6 — Learning-Curve Charts
// ============================================================
// Renders the epoch metrics as two side-by-side line charts:
// loss (train vs validation) and accuracy (train vs validation),
// drawn on fixed-size character grids so they display anywhere a
// terminal does — SSH sessions and CI logs included.
//
// Panel anatomy:
//
//        Loss over epochs
//   3.210 |*
//         |  *
//         |    +  *
//   2.845 |         + *
//         +----------------
//              epoch
//         * train  + val
//
// Pure presentation: rendering reads the history and never
// touches training state. Degenerate inputs (no epochs, a single
// epoch, flat series) render without error.

use crate::infra::metrics::MetricsHistory;

/// Plot columns per panel
const CHART_WIDTH: usize = 30;
/// Plot rows per panel
const CHART_HEIGHT: usize = 10;
/// Width of the y-axis label gutter, including the axis bar
const GUTTER: usize = 9;

const TRAIN_MARK: char = '*';
const VAL_MARK: char = '+';
/// Drawn where both series land on the same cell
const BOTH_MARK: char = '#';

/// Render both charts side by side as one multi-line string.
pub fn render_learning_curves(history: &MetricsHistory) -> String {
    let loss = panel(
        "Loss over epochs",
        history.train_loss(),
        history.val_loss(),
    );
    let accuracy = panel(
        "Accuracy over epochs",
        history.train_accuracy(),
        history.val_accuracy(),
    );

    loss.iter()
        .zip(&accuracy)
        .map(|(l, r)| format!("{l}   {r}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one chart panel as equal-width lines:
/// title, plot rows, x axis, x label, legend.
fn panel(title: &str, train: &[f64], val: &[f64]) -> Vec<String> {
    let width = GUTTER + CHART_WIDTH;
    let mut lines = Vec::with_capacity(CHART_HEIGHT + 4);

    lines.push(center(title, width));

    let finite: Vec<f64> = train.iter().chain(val).copied()
        .filter(|v| v.is_finite())
        .collect();

    if finite.is_empty() {
        // No epochs (or all-NaN series): an empty frame, no plot
        for _ in 0..CHART_HEIGHT {
            lines.push(format!("{:>gutter$}{}", "|", " ".repeat(CHART_WIDTH), gutter = GUTTER));
        }
    } else {
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
        plot_series(&mut grid, train, min, max, TRAIN_MARK);
        plot_series(&mut grid, val, min, max, VAL_MARK);

        for (row_idx, row) in grid.iter().enumerate() {
            // Value labels on the top and bottom rows only
            let label = if row_idx == 0 {
                format!("{max:>7.3} ")
            } else if row_idx == CHART_HEIGHT - 1 {
                format!("{min:>7.3} ")
            } else {
                " ".repeat(GUTTER - 1)
            };
            lines.push(format!("{label}|{}", row.iter().collect::<String>()));
        }
    }

    lines.push(format!("{}+{}", " ".repeat(GUTTER - 1), "-".repeat(CHART_WIDTH)));
    lines.push(center("epoch", width));
    lines.push(center(&format!("{TRAIN_MARK} train  {VAL_MARK} val"), width));
    lines
}

/// Place one series onto the grid. Epochs spread across the full
/// width; values scale between min and max. NaN entries (an empty
/// validation partition) are skipped.
fn plot_series(grid: &mut [Vec<char>], series: &[f64], min: f64, max: f64, mark: char) {
    let n = series.len();
    for (i, &v) in series.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        let col = if n <= 1 {
            0
        } else {
            i * (CHART_WIDTH - 1) / (n - 1)
        };
        let range = max - min;
        let scaled = if range == 0.0 {
            0.5
        } else {
            (v - min) / range
        };
        let row = CHART_HEIGHT - 1 - (scaled * (CHART_HEIGHT - 1) as f64).round() as usize;

        let cell = &mut grid[row][col];
        *cell = if *cell == ' ' || *cell == mark { mark } else { BOTH_MARK };
    }
}

/// Center `text` in a field of `width` characters.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::metrics::EpochMetrics;

    fn history(epochs: usize) -> MetricsHistory {
        let mut h = MetricsHistory::new();
        for e in 1..=epochs {
            let loss = 3.0 / e as f64;
            h.record(EpochMetrics::new(e, loss, 0.1 * e as f64, loss + 0.1, 0.08 * e as f64));
        }
        h
    }

    #[test]
    fn test_contains_titles_axes_and_legend() {
        let out = render_learning_curves(&history(5));
        assert!(out.contains("Loss over epochs"));
        assert!(out.contains("Accuracy over epochs"));
        assert!(out.contains("epoch"));
        assert!(out.contains("* train  + val"));
    }

    #[test]
    fn test_both_series_are_plotted() {
        let out = render_learning_curves(&history(5));
        assert!(out.contains('*'));
        assert!(out.contains('+'));
    }

    #[test]
    fn test_empty_history_renders() {
        let out = render_learning_curves(&MetricsHistory::new());
        assert!(out.contains("Loss over epochs"));
        // Frame only: no marker in any plot row (legend lines have no '|')
        for line in out.lines().filter(|l| l.contains('|')) {
            assert!(!line.contains(TRAIN_MARK));
            assert!(!line.contains(VAL_MARK));
        }
    }

    #[test]
    fn test_single_epoch_renders() {
        let out = render_learning_curves(&history(1));
        assert!(out.contains("Loss over epochs"));
    }

    #[test]
    fn test_panels_share_line_count() {
        // Every output line holds both panels, so all lines have
        // the same on-screen width
        let out = render_learning_curves(&history(3));
        let widths: Vec<usize> = out.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_nan_values_are_skipped() {
        let mut h = MetricsHistory::new();
        h.record(EpochMetrics::new(1, 2.0, 0.1, f64::NAN, f64::NAN));
        let out = render_learning_curves(&h);
        assert!(out.contains("Loss over epochs"));
    }
}
