// Aggregation of repository records into chartable (label, value) series.
//
// Purpose
// - One configurable pipeline for every chart: extract the metric, sort by value,
//   truncate to the requested top-N.
//
// Boundaries
// - Pure and infallible. Empty input yields an empty series.

use crate::modules::repository_charts::core::record::RepositoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Forks,
    Stars,
    /// Number of repositories per primary language.
    Languages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregatedSeries {
    points: Vec<SeriesPoint>,
    descending: bool,
}

impl AggregatedSeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ascending by value, so that a bar chart drawn from its baseline puts the
    /// largest value on top. Ties keep the order they were ranked in, reversed.
    pub fn into_display_order(self) -> Vec<SeriesPoint> {
        let mut points = self.points;
        if self.descending {
            points.reverse();
        }
        points
    }
}

pub fn aggregate(
    records: &[RepositoryRecord],
    metric: Metric,
    top_n: Option<usize>,
    sort_descending: bool,
) -> AggregatedSeries {
    let mut points = extract(records, metric);

    // stable: equal values keep first-occurrence order
    if sort_descending {
        points.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        points.sort_by(|a, b| a.value.cmp(&b.value));
    }

    if let Some(n) = top_n {
        points.truncate(n);
    }

    AggregatedSeries {
        points,
        descending: sort_descending,
    }
}

fn extract(records: &[RepositoryRecord], metric: Metric) -> Vec<SeriesPoint> {
    match metric {
        Metric::Forks => records
            .iter()
            .map(|r| SeriesPoint::new(&r.name, r.fork_count))
            .collect(),
        Metric::Stars => records
            .iter()
            .map(|r| SeriesPoint::new(&r.name, r.star_count))
            .collect(),
        Metric::Languages => count_languages(records),
    }
}

fn count_languages(records: &[RepositoryRecord]) -> Vec<SeriesPoint> {
    let mut counts: Vec<SeriesPoint> = Vec::new();
    for language in records.iter().filter_map(RepositoryRecord::language) {
        match counts.iter_mut().find(|p| p.label == language) {
            Some(point) => point.value += 1,
            None => counts.push(SeriesPoint::new(language, 1)),
        }
    }
    counts
}
