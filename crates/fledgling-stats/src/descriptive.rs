/// Summary measures for a sample of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Smallest value in the sample.
    pub min: f32,
    /// Largest value in the sample.
    pub max: f32,
    /// Arithmetic mean.
    pub mean: f32,
    /// Median of the sorted sample.
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics over a sample, or `None` when it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fledgling_stats::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values: Vec<f32> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f32::total_cmp);

        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min: values[0],
            max: values[values.len() - 1],
            mean,
            median: values[values.len() / 2],
            std_dev: variance.sqrt(),
        })
    }
}
