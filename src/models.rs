use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of a source table with every logical field resolved and parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub source: String,
    pub id: Option<String>,
    pub last_call_code: Option<String>,
    pub last_call_reason: Option<String>,
    pub total_tries: Option<u32>,
    pub last_try_time: Option<NaiveDateTime>,
    pub import_created_on: Option<NaiveDateTime>,
    pub close_reason: Option<String>,
    pub record_state: Option<String>,
    pub end_reason: Option<String>,
    pub disconnect_reason: Option<String>,
    pub disconnect_cause: Option<String>,
}

impl RawRecord {
    pub fn attempts(&self) -> u32 {
        self.total_tries.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Booked,
    Open,
    CallbackAgent,
    CallbackSystem,
    ClosedByAgent,
    ClosedBySystem,
    Unusable,
    /// Postponed or deferred state, whatever the outcome code says.
    Postponed,
}

impl Category {
    pub const COUNT: usize = 8;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Booked,
        Category::Open,
        Category::CallbackAgent,
        Category::CallbackSystem,
        Category::ClosedByAgent,
        Category::ClosedBySystem,
        Category::Unusable,
        Category::Postponed,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFlags([bool; Category::COUNT]);

impl CategoryFlags {
    pub fn get(&self, category: Category) -> bool {
        self.0[category as usize]
    }

    pub fn set(&mut self, category: Category, value: bool) {
        self.0[category as usize] = value;
    }

    /// Open, postponed or waiting for any kind of callback; counted once per record.
    pub fn is_unconsumed(&self) -> bool {
        self.get(Category::Open)
            || self.get(Category::CallbackAgent)
            || self.get(Category::CallbackSystem)
            || self.get(Category::Postponed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record: RawRecord,
    pub flags: CategoryFlags,
}

impl ClassifiedRecord {
    pub fn is(&self, category: Category) -> bool {
        self.flags.get(category)
    }
}

/// Counts and bounds for all records of one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceAggregate {
    pub source: String,
    pub records: usize,
    pub attempts: u64,
    pub counts: [usize; Category::COUNT],
    pub unconsumed: usize,
    pub last_contact: Option<NaiveDateTime>,
    pub imported: Option<NaiveDateTime>,
}

impl SourceAggregate {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertBucket {
    #[serde(rename = "too early to judge")]
    TooEarly,
    #[serde(rename = "no data")]
    NoData,
    #[serde(rename = "outstanding")]
    Outstanding,
    #[serde(rename = "very good")]
    VeryGood,
    #[serde(rename = "solid")]
    Solid,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "weak")]
    Weak,
    #[serde(rename = "burned out")]
    BurnedOut,
}

impl AlertBucket {
    pub fn label(self) -> &'static str {
        match self {
            AlertBucket::TooEarly => "too early to judge",
            AlertBucket::NoData => "no data",
            AlertBucket::Outstanding => "outstanding",
            AlertBucket::VeryGood => "very good",
            AlertBucket::Solid => "solid",
            AlertBucket::Average => "average",
            AlertBucket::Weak => "weak",
            AlertBucket::BurnedOut => "burned out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UsageStatus {
    #[serde(rename = "early")]
    Early,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "worked through")]
    WorkedThrough,
    #[serde(rename = "no data")]
    NoData,
}

impl UsageStatus {
    pub fn label(self) -> &'static str {
        match self {
            UsageStatus::Early => "early",
            UsageStatus::InProgress => "in progress",
            UsageStatus::WorkedThrough => "worked through",
            UsageStatus::NoData => "no data",
        }
    }
}

/// One output row per source, fields in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "L100R")]
    pub l100r: Option<f64>,
    #[serde(rename = "CTR")]
    pub ctr: Option<f64>,
    #[serde(rename = "Booking rate (%)")]
    pub booking_rate: Option<f64>,
    #[serde(rename = "Utilization (%)")]
    pub utilization: Option<f64>,
    #[serde(rename = "Unconsumed (%)")]
    pub unconsumed: Option<f64>,
    #[serde(rename = "Status")]
    pub status: UsageStatus,
    #[serde(rename = "Retry rate (%)")]
    pub retry_rate: Option<f64>,
    #[serde(rename = "System retry rate (%)")]
    pub system_retry_rate: Option<f64>,
    #[serde(rename = "Avg attempts")]
    pub avg_attempts: f64,
    #[serde(rename = "Records")]
    pub records: usize,
    #[serde(rename = "Uncontacted (open)")]
    pub open: usize,
    #[serde(rename = "Callback (agent)")]
    pub callback_agent: usize,
    #[serde(rename = "Callback (system)")]
    pub callback_system: usize,
    #[serde(rename = "Closed by agent")]
    pub closed_by_agent: usize,
    #[serde(rename = "Closed by system")]
    pub closed_by_system: usize,
    #[serde(rename = "No phone")]
    pub unusable: usize,
    #[serde(rename = "Attempts")]
    pub attempts: u64,
    #[serde(rename = "Bookings")]
    pub bookings: usize,
    #[serde(rename = "Last contact")]
    pub last_contact: Option<NaiveDateTime>,
    #[serde(rename = "Import date")]
    pub imported: Option<NaiveDateTime>,
    #[serde(rename = "Avg reaction (days)")]
    pub reaction_days: Option<i64>,
    #[serde(rename = "CTR alert")]
    pub alert: AlertBucket,
    #[serde(rename = "Narrative")]
    pub narrative: String,
}

/// Retry-depth statistics for the multi-attempt records of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryDepthRow {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Multi-attempt records")]
    pub multi_attempt_records: usize,
    #[serde(rename = "Bookings (multi-attempt)")]
    pub bookings: usize,
    #[serde(rename = "Mean attempt at booking")]
    pub mean_attempt: Option<f64>,
    #[serde(rename = "Median attempt at booking")]
    pub median_attempt: Option<f64>,
    #[serde(rename = "Attempt distribution")]
    pub distribution: String,
    #[serde(rename = "Callbacks (all)")]
    pub callbacks_total: usize,
    #[serde(rename = "Callbacks (system)")]
    pub callbacks_system: usize,
}

/// An input file that could not be read as a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSource {
    pub path: String,
    pub reason: String,
}
