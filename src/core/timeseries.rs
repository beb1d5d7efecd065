use crate::error::Unavailable;
use crate::models::DataPoint;
use chrono::{DateTime, Utc};

/// Read-only snapshot of one upstream series, sorted ascending by timestamp.
///
/// Gaps are kept as `None` values so positional offsets (e.g. "12 months
/// back") still land on the right period.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    series_id: String,
    points: Vec<DataPoint>,
}

impl TimeSeries {
    pub fn new(series_id: impl Into<String>, mut points: Vec<DataPoint>) -> Self {
        points.sort_by_key(|dp| dp.timestamp);
        // Duplicate dates: keep the last reported value.
        points.dedup_by(|later, earlier| {
            if later.timestamp == earlier.timestamp {
                *earlier = later.clone();
                true
            } else {
                false
            }
        });

        Self { series_id: series_id.into(), points }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Drops gap observations. Used for daily series where a gap is a
    /// market holiday rather than a missing period.
    pub fn without_gaps(mut self) -> Self {
        self.points.retain(|dp| dp.value.is_some());
        self
    }

    /// Most recent observation and its timestamp.
    pub fn latest(&self) -> Result<(f64, DateTime<Utc>), Unavailable> {
        let point = self.point_from_end(0)?;
        let value = point.value.ok_or(Unavailable::MissingValue)?;
        Ok((value, point.timestamp))
    }

    /// Value `n` observations before the latest (`n = 0` is the latest).
    pub fn nth_from_end(&self, n: usize) -> Result<f64, Unavailable> {
        self.point_from_end(n)?.value.ok_or(Unavailable::MissingValue)
    }

    /// Timestamp of the last observation, present or not.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|dp| dp.timestamp)
    }

    fn point_from_end(&self, n: usize) -> Result<&DataPoint, Unavailable> {
        let len = self.points.len();
        if n >= len {
            return Err(Unavailable::InsufficientHistory { needed: n + 1, available: len });
        }
        Ok(&self.points[len - 1 - n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_datapoint(date: &str, value: Option<f64>) -> DataPoint {
        DataPoint {
            timestamp: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
            value,
        }
    }

    #[test]
    fn test_sorted_on_construction() {
        let series = TimeSeries::new(
            "UNRATE",
            vec![
                create_datapoint("2024-03-01", Some(3.9)),
                create_datapoint("2024-01-01", Some(3.7)),
                create_datapoint("2024-02-01", Some(3.8)),
            ],
        );

        assert_eq!(series.latest().unwrap().0, 3.9);
        assert_eq!(series.nth_from_end(1).unwrap(), 3.8);
        assert_eq!(series.nth_from_end(2).unwrap(), 3.7);
    }

    #[test]
    fn test_duplicate_dates_keep_last() {
        let series = TimeSeries::new(
            "X",
            vec![
                create_datapoint("2024-01-01", Some(1.0)),
                create_datapoint("2024-01-01", Some(2.0)),
            ],
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().unwrap().0, 2.0);
    }

    #[test]
    fn test_latest_returns_timestamp() {
        let series = TimeSeries::new("X", vec![create_datapoint("2024-05-01", Some(1.5))]);
        let (value, ts) = series.latest().unwrap();
        assert_eq!(value, 1.5);
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[test]
    fn test_insufficient_history() {
        let series = TimeSeries::new("X", vec![create_datapoint("2024-01-01", Some(1.0))]);
        assert_eq!(
            series.nth_from_end(1),
            Err(Unavailable::InsufficientHistory { needed: 2, available: 1 })
        );

        let empty = TimeSeries::new("X", vec![]);
        assert!(empty.is_empty());
        assert_eq!(
            empty.latest(),
            Err(Unavailable::InsufficientHistory { needed: 1, available: 0 })
        );
    }

    #[test]
    fn test_gap_is_missing_value() {
        let series = TimeSeries::new(
            "X",
            vec![
                create_datapoint("2024-01-01", Some(1.0)),
                create_datapoint("2024-01-02", None),
            ],
        );
        assert_eq!(series.latest(), Err(Unavailable::MissingValue));
        assert_eq!(series.nth_from_end(1).unwrap(), 1.0);

        let trimmed = series.without_gaps();
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.latest().unwrap().0, 1.0);
    }
}
