use chrono::NaiveDateTime;
use serde::Serialize;

/// Counts written for one event by a reconciliation pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EventReconcileSummary {
    pub event_id: i64,
    pub event_name: String,
    pub absent_count: usize,
    pub late_count: usize,
    pub early_count: usize,
    pub partial_count: usize,
}

impl EventReconcileSummary {
    pub fn changes(&self) -> usize {
        self.absent_count + self.late_count + self.early_count + self.partial_count
    }
}

/// An event that could not be reconciled; its writes were rolled back.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventFailure {
    pub event_id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReconcileReport {
    pub as_of: NaiveDateTime,
    pub events_processed: usize,
    pub absent_count: usize,
    pub late_count: usize,
    pub early_count: usize,
    pub partial_count: usize,
    pub events: Vec<EventReconcileSummary>,
    pub failures: Vec<EventFailure>,
}

impl ReconcileReport {
    pub fn new(as_of: NaiveDateTime) -> Self {
        Self {
            as_of,
            events_processed: 0,
            absent_count: 0,
            late_count: 0,
            early_count: 0,
            partial_count: 0,
            events: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, summary: EventReconcileSummary) {
        self.events_processed += 1;
        self.absent_count += summary.absent_count;
        self.late_count += summary.late_count;
        self.early_count += summary.early_count;
        self.partial_count += summary.partial_count;
        self.events.push(summary);
    }

    pub fn fail(&mut self, event_id: i64, reason: String) {
        self.failures.push(EventFailure { event_id, reason });
    }
}
