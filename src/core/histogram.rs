use serde::{Deserialize, Serialize};

use crate::core::{Figure, FigureLayout, HistogramNormalization, Scalar, Trace};
use crate::error::{ChartError, ChartResult};

const MAX_BINS: usize = 1_000_000;

/// One fixed-width histogram bin, `[start, end)` except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// `count` or its probability density, depending on normalization.
    pub value: f64,
}

/// Counts samples into fixed-width bins aligned on multiples of `bin_size`.
///
/// Non-finite samples are skipped; no finite samples yields no bins.
pub fn histogram_bins(
    samples: &[f64],
    bin_size: f64,
    normalization: HistogramNormalization,
) -> ChartResult<Vec<HistogramBin>> {
    if !bin_size.is_finite() || bin_size <= 0.0 {
        return Err(ChartError::InvalidData(
            "histogram bin size must be finite and > 0".to_owned(),
        ));
    }

    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Ok(Vec::new());
    };

    let start = (min / bin_size).floor() * bin_size;
    let span_bins = ((max - start) / bin_size).floor();
    if span_bins >= MAX_BINS as f64 {
        return Err(ChartError::InvalidData(format!(
            "histogram would need more than {MAX_BINS} bins"
        )));
    }
    let bin_count = span_bins as usize + 1;
    let mut counts = vec![0_usize; bin_count];
    for value in &finite {
        let index = (((value - start) / bin_size).floor() as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    let total = finite.len() as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| {
            let bin_start = start + index as f64 * bin_size;
            let value = match normalization {
                HistogramNormalization::Count => count as f64,
                HistogramNormalization::ProbabilityDensity => count as f64 / (total * bin_size),
            };
            HistogramBin {
                start: bin_start,
                end: bin_start + bin_size,
                count,
                value,
            }
        })
        .collect())
}

/// Distribution plot: one probability-density histogram per group, each
/// with its own bin size.
pub fn distribution_figure(
    groups: &[(String, Vec<f64>)],
    bin_sizes: &[f64],
) -> ChartResult<Figure> {
    if groups.len() != bin_sizes.len() {
        return Err(ChartError::InvalidData(format!(
            "{} groups but {} bin sizes",
            groups.len(),
            bin_sizes.len()
        )));
    }

    let traces = groups
        .iter()
        .zip(bin_sizes)
        .map(|((label, samples), bin_size)| {
            let samples = samples.iter().copied().map(Scalar::Number).collect();
            let trace = Trace::histogram(label.clone(), samples, Some(*bin_size))
                .with_normalization(HistogramNormalization::ProbabilityDensity);
            trace.validate()?;
            Ok(trace)
        })
        .collect::<ChartResult<Vec<_>>>()?;

    Ok(Figure::new(traces).with_layout(FigureLayout::default().with_show_legend(true)))
}
