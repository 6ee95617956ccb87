//! Daily analytics upserts.

use chrono::NaiveDate;
use support_core::AnalyticsData;

use crate::SupportStore;

/// Partial metric update for one calendar day. `None` fields are left
/// unchanged on existing records (and default to zero on fresh ones).
#[derive(Debug, Clone, Default)]
pub struct MetricsPatch {
    pub total_tickets: Option<u64>,
    pub resolved_tickets: Option<u64>,
    pub avg_resolution_time: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    pub agent_utilization: Option<f64>,
    pub first_response_time: Option<f64>,
    pub chat_volume: Option<u64>,
    pub peak_hours: Option<Vec<u8>>,
}

impl SupportStore {
    /// Upsert the analytics record for a day, merging the patch over the
    /// existing metrics.
    pub async fn update_analytics(&self, date: NaiveDate, patch: MetricsPatch) -> AnalyticsData {
        let mut inner = self.inner.write().await;
        let record = inner
            .analytics
            .entry(date.to_string())
            .or_insert_with(|| AnalyticsData::empty(date));

        let metrics = &mut record.metrics;
        if let Some(v) = patch.total_tickets {
            metrics.total_tickets = v;
        }
        if let Some(v) = patch.resolved_tickets {
            metrics.resolved_tickets = v;
        }
        if let Some(v) = patch.avg_resolution_time {
            metrics.avg_resolution_time = v;
        }
        if let Some(v) = patch.customer_satisfaction {
            metrics.customer_satisfaction = v;
        }
        if let Some(v) = patch.agent_utilization {
            metrics.agent_utilization = v;
        }
        if let Some(v) = patch.first_response_time {
            metrics.first_response_time = v;
        }
        if let Some(v) = patch.chat_volume {
            metrics.chat_volume = v;
        }
        if let Some(v) = patch.peak_hours {
            metrics.peak_hours = v;
        }

        record.clone()
    }

    /// Analytics records, optionally limited to an inclusive date range,
    /// sorted by date.
    pub async fn get_analytics(&self, range: Option<(NaiveDate, NaiveDate)>) -> Vec<AnalyticsData> {
        let inner = self.inner.read().await;
        let mut records: Vec<AnalyticsData> = inner
            .analytics
            .values()
            .filter(|a| range.map_or(true, |(start, end)| a.date >= start && a.date <= end))
            .cloned()
            .collect();
        records.sort_by_key(|a| a.date);
        records
    }
}
