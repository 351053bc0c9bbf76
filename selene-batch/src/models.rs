use chrono::{Days, NaiveDate};

/// One day of api metrics moved from `metric.api` into `metric.api_history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiMetricsPartition {
    pub date: NaiveDate,
}

impl ApiMetricsPartition {
    pub fn new(date: NaiveDate) -> Self {
        ApiMetricsPartition { date }
    }

    /// Only digits come from the date, so the name is safe to splice into DDL.
    pub fn table_name(&self) -> String {
        format!("metric.api_history_{}", self.date.format("%Y%m%d"))
    }

    pub fn lower_bound(&self) -> NaiveDate {
        self.date
    }

    pub fn upper_bound(&self) -> Option<NaiveDate> {
        self.date.checked_add_days(Days::new(1))
    }
}
