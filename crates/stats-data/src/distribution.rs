//! Value counts over a single record field, for bar and pie chart series.

use std::collections::HashMap;

use serde::Serialize;
use stats_core::models::CrimeRecord;

/// One bar of a category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Stateless value-count helper.
pub struct CategoryDistribution;

impl CategoryDistribution {
    /// Count the values `key` extracts from `records`.
    ///
    /// Records for which `key` returns `None` are skipped. The result is
    /// sorted by count descending; equal counts keep first-appearance order.
    pub fn count_by<'a>(
        records: &'a [CrimeRecord],
        key: impl Fn(&'a CrimeRecord) -> Option<&'a str>,
    ) -> Vec<CategoryCount> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<CategoryCount> = Vec::new();

        for label in records.iter().filter_map(key) {
            match index.get(label) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(label, counts.len());
                    counts.push(CategoryCount {
                        label: label.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-appearance order among ties.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Like [`Self::count_by`], truncated to the `limit` largest categories.
    pub fn top_by<'a>(
        records: &'a [CrimeRecord],
        key: impl Fn(&'a CrimeRecord) -> Option<&'a str>,
        limit: usize,
    ) -> Vec<CategoryCount> {
        let mut counts = Self::count_by(records, key);
        counts.truncate(limit);
        counts
    }
}
