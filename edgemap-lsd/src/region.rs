use edgemap_core::Segment;

/// Running sums over the pixels of one grown region, enough to fit a line by PCA
/// without keeping per-pixel coordinates around twice.
#[derive(Debug, Default)]
pub(crate) struct Region {
    pub indices: Vec<usize>,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
    aligned: usize,
}

impl Region {
    pub fn reset(&mut self) {
        self.indices.clear();
        self.sum_x = 0.0;
        self.sum_y = 0.0;
        self.sum_xx = 0.0;
        self.sum_yy = 0.0;
        self.sum_xy = 0.0;
        self.aligned = 0;
    }

    pub fn push(&mut self, idx: usize, width: usize, aligned: bool) {
        self.indices.push(idx);
        let x = (idx % width) as f64;
        let y = (idx / width) as f64;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
        if aligned {
            self.aligned += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn aligned_fraction(&self) -> f64 {
        if self.indices.is_empty() {
            0.0
        } else {
            self.aligned as f64 / self.indices.len() as f64
        }
    }

    /// Fits a segment along the principal axis of the region.
    ///
    /// The endpoints are the extreme projections of the region's pixels onto that axis.
    /// Returns `None` if the region is shorter than `min_length` or has no dominant direction.
    pub fn fit(&self, width: usize, min_length: f64) -> Option<Segment> {
        if self.indices.is_empty() {
            return None;
        }
        let count = self.len() as f64;
        let cx = self.sum_x / count;
        let cy = self.sum_y / count;
        let cxx = self.sum_xx / count - cx * cx;
        let cyy = self.sum_yy / count - cy * cy;
        let cxy = self.sum_xy / count - cx * cy;

        // Largest eigenvalue of the 2x2 covariance and the angle of its eigenvector.
        let half_trace = 0.5 * (cxx + cyy);
        let spread = (0.25 * (cxx - cyy).powi(2) + cxy * cxy).sqrt();
        let lambda_max = half_trace + spread;
        if !lambda_max.is_finite() || lambda_max <= 0.0 {
            return None;
        }
        let theta = 0.5 * (2.0 * cxy).atan2(cxx - cyy);
        let (ty, tx) = theta.sin_cos();

        let (smin, smax) = self
            .indices
            .iter()
            .map(|&idx| {
                let dx = (idx % width) as f64 - cx;
                let dy = (idx / width) as f64 - cy;
                dx * tx + dy * ty
            })
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s), hi.max(s))
            });

        let length = smax - smin;
        if !length.is_finite() || length < min_length {
            return None;
        }

        Some(Segment::from_xyxy([
            cx + smin * tx,
            cy + smin * ty,
            cx + smax * tx,
            cy + smax * ty,
        ]))
    }
}
