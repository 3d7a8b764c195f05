use std::cmp::Ordering;

use crate::process::reshape::TidyRecord;
use crate::schema::ReportProfile;

/// Every record of a run, sorted by (year, date, sector, category in schema order).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label_name: String,
    pub category_name: String,
    pub value_name: String,
    categories: Vec<String>,
    records: Vec<TidyRecord>,
}

impl Dataset {
    pub fn from_records(profile: &ReportProfile, records: Vec<TidyRecord>) -> Self {
        let mut ds = Self {
            label_name: profile.label_name.clone(),
            category_name: profile.category_name.clone(),
            value_name: profile.value_name.clone(),
            categories: profile.categories(),
            records,
        };
        ds.sort();
        ds
    }

    fn category_rank(&self, category: &str) -> usize {
        self.categories
            .iter()
            .position(|c| c == category)
            .unwrap_or(self.categories.len())
    }

    fn sort(&mut self) {
        let mut keyed: Vec<(usize, TidyRecord)> = std::mem::take(&mut self.records)
            .into_iter()
            .map(|r| (self.category_rank(&r.category), r))
            .collect();
        keyed.sort_by(|(ra, a), (rb, b)| {
            a.year
                .cmp(&b.year)
                .then(a.date.cmp(&b.date))
                .then_with(|| a.sector.cmp(&b.sector))
                .then(ra.cmp(rb))
                .then_with(|| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
        });
        self.records = keyed.into_iter().map(|(_, r)| r).collect();
    }

    /// Output column names, in order.
    pub fn columns(&self) -> [&str; 5] {
        [
            "year",
            "date",
            &self.label_name,
            &self.category_name,
            &self.value_name,
        ]
    }

    pub fn records(&self) -> &[TidyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
