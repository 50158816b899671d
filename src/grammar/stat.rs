//! Statistical transform kinds and their typed parameter sets.
//!
//! Every statistic is a closed enum variant with a typed parameter struct,
//! so parameter validation happens eagerly and the dispatch in
//! [`crate::stats`] is exhaustiveness-checked by the compiler.

/// Regression method for the smooth statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothMethod {
    /// Ordinary least squares line.
    Linear,
    /// Local linear regression with tricube weights.
    Loess {
        /// Fraction of the group used for each local fit, in (0, 1].
        span: f64,
    },
}

impl Default for SmoothMethod {
    fn default() -> Self {
        SmoothMethod::Loess { span: 0.75 }
    }
}

/// Aggregation applied by the summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Arithmetic mean.
    Mean,
    /// Median (type-7 quantile).
    Median,
    /// Sum.
    Sum,
    /// Row count.
    Count,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
}

impl Aggregate {
    /// Reduce a slice of values. Empty input yields `None`.
    #[must_use]
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Aggregate::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Aggregate::Median => {
                let mut v = values.to_vec();
                v.sort_by(f64::total_cmp);
                Some(crate::stats::quantile(&v, 0.5))
            }
            Aggregate::Sum => Some(values.iter().sum()),
            Aggregate::Count => Some(values.len() as f64),
            Aggregate::Min => values.iter().copied().min_by(f64::total_cmp),
            Aggregate::Max => values.iter().copied().max_by(f64::total_cmp),
        }
    }
}

/// Parameters for the 1D binning statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinParams {
    /// Number of bins spanning the group range. Ignored when `width` is set.
    pub bins: usize,
    /// Explicit bin width in data units.
    pub width: Option<f64>,
    /// A position that must coincide with a bin edge.
    pub boundary: Option<f64>,
}

impl Default for BinParams {
    fn default() -> Self {
        Self { bins: 30, width: None, boundary: None }
    }
}

/// Parameters for the smooth statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Regression method.
    pub method: SmoothMethod,
    /// Number of evenly spaced prediction points.
    pub n: usize,
    /// Whether to emit a confidence band (ymin/ymax columns).
    pub se: bool,
    /// Confidence level for the band, in (0, 1).
    pub level: f64,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self { method: SmoothMethod::default(), n: 80, se: true, level: 0.95 }
    }
}

/// Parameters for the kernel density statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityParams {
    /// Explicit bandwidth; Silverman's rule when unset.
    pub bandwidth: Option<f64>,
    /// Bandwidth multiplier.
    pub adjust: f64,
    /// Grid resolution; values below 64 are raised to 64.
    pub n: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self { bandwidth: None, adjust: 1.0, n: 256 }
    }
}

/// Statistical transform kind applied to each group of a layer's rows.
#[derive(Debug, Clone, PartialEq)]
pub enum StatKind {
    /// Pass rows through unchanged.
    Identity,
    /// Count rows per discrete x value.
    Count,
    /// Histogram binning of a numeric x column.
    Bin(BinParams),
    /// Five-number summary with outliers, per x position.
    Boxplot {
        /// Whisker reach as a multiple of the IQR.
        coef: f64,
    },
    /// Regression curve with optional confidence band.
    Smooth(SmoothParams),
    /// Kernel density estimate along x.
    Density(DensityParams),
    /// Kernel density estimate along y, per x position (violins).
    YDensity(DensityParams),
    /// Aggregate y per discrete x value.
    Summary {
        /// Aggregation to apply.
        fun: Aggregate,
    },
    /// Aggregate y per x bin.
    SummaryBin {
        /// Aggregation to apply.
        fun: Aggregate,
        /// Number of x bins.
        bins: usize,
    },
    /// Empirical cumulative distribution function of x.
    Ecdf,
    /// Sample quantiles of y against theoretical normal quantiles.
    Qq,
    /// Reference line through the first and third quartile points of a Q-Q
    /// display.
    QqLine,
    /// Iso-density contour lines of the 2D kernel density estimate.
    Density2d {
        /// Grid resolution per axis.
        n: usize,
        /// Number of contour levels.
        levels: usize,
    },
    /// Iso-lines of a gridded z column at evenly spaced thresholds.
    Contour {
        /// Number of contour levels.
        levels: usize,
    },
    /// Hexagonal 2D binning.
    BinHex {
        /// Approximate number of hexagons across the x range.
        bins: usize,
    },
    /// Normal-theory data ellipse of (x, y).
    Ellipse {
        /// Coverage level, in (0, 1).
        level: f64,
        /// Number of polygon vertices.
        segments: usize,
    },
}

impl StatKind {
    /// Binning statistic with a given bin count.
    #[must_use]
    pub fn bin(bins: usize) -> Self {
        StatKind::Bin(BinParams { bins, ..BinParams::default() })
    }

    /// Binning statistic with an explicit bin width.
    #[must_use]
    pub fn bin_width(width: f64) -> Self {
        StatKind::Bin(BinParams { width: Some(width), ..BinParams::default() })
    }

    /// Boxplot statistic with the conventional 1.5 IQR whiskers.
    #[must_use]
    pub fn boxplot() -> Self {
        StatKind::Boxplot { coef: 1.5 }
    }

    /// Linear smooth with defaults.
    #[must_use]
    pub fn smooth_linear() -> Self {
        StatKind::Smooth(SmoothParams { method: SmoothMethod::Linear, ..SmoothParams::default() })
    }

    /// Loess smooth with defaults.
    #[must_use]
    pub fn smooth_loess() -> Self {
        StatKind::Smooth(SmoothParams::default())
    }

    /// Density statistic with defaults.
    #[must_use]
    pub fn density() -> Self {
        StatKind::Density(DensityParams::default())
    }

    /// 2D density contours with defaults.
    #[must_use]
    pub fn density_2d() -> Self {
        StatKind::Density2d { n: 25, levels: 10 }
    }

    /// Confidence ellipse with defaults.
    #[must_use]
    pub fn ellipse() -> Self {
        StatKind::Ellipse { level: 0.95, segments: 51 }
    }

    /// Short name used in errors and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Identity => "identity",
            StatKind::Count => "count",
            StatKind::Bin(_) => "bin",
            StatKind::Boxplot { .. } => "boxplot",
            StatKind::Smooth(_) => "smooth",
            StatKind::Density(_) => "density",
            StatKind::YDensity(_) => "ydensity",
            StatKind::Summary { .. } => "summary",
            StatKind::SummaryBin { .. } => "summary_bin",
            StatKind::Ecdf => "ecdf",
            StatKind::Qq => "qq",
            StatKind::QqLine => "qq_line",
            StatKind::Density2d { .. } => "density_2d",
            StatKind::Contour { .. } => "contour",
            StatKind::BinHex { .. } => "bin_hex",
            StatKind::Ellipse { .. } => "ellipse",
        }
    }
}
