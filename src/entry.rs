use crate::queue::Category;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity of a [`Log`] line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// One log line as understood by the logs endpoint.
///
/// Only the commonly used fields are typed; anything else the API version
/// accepts can be attached with [`Log::field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub log_level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<(String, Value)>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Log {
    /// Create a log line stamped with the current UTC time.
    pub fn new(log_level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            log_level,
            message: message.into(),
            namespace: None,
            request_id: None,
            server: None,
            date: now_utc(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn tag(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.push((name.into(), value.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// One error report as understood by the reports endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub http_status: u16,
    /// Reporting client name; filled from the settings when left unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traceback: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<(String, Value)>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single traceback line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "cline")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
    pub fn_name: Option<String>,
}

impl Frame {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
            fn_name: None,
        }
    }
}

impl Report {
    /// Create a report for the given HTTP status, started now.
    pub fn new(http_status: u16) -> Self {
        Self {
            http_status,
            client: None,
            error: None,
            priority: None,
            url: None,
            view_name: None,
            server: None,
            username: None,
            request_id: None,
            start_time: now_utc(),
            end_time: None,
            traceback: Vec::new(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Build a 500 report from an error: the message becomes `error` and
    /// each `source()` in the chain becomes one traceback frame.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let mut report = Report::new(500).error(err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            report.traceback.push(Frame::new(cause.to_string()));
            source = cause.source();
        }
        report
    }

    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = Some(view_name.into());
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self
    }

    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn traceback(mut self, frames: Vec<Frame>) -> Self {
        self.traceback = frames;
        self
    }

    pub fn tag(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.push((name.into(), value.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// A telemetry record routed to the queue of its category.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Log(Log),
    Report(Report),
}

impl Entry {
    pub fn category(&self) -> Category {
        match self {
            Entry::Log(_) => Category::Logs,
            Entry::Report(_) => Category::Reports,
        }
    }
}

impl From<Log> for Entry {
    fn from(log: Log) -> Self {
        Entry::Log(log)
    }
}

impl From<Report> for Entry {
    fn from(report: Report) -> Self {
        Entry::Report(report)
    }
}

// ------------------------------------------------------------------
// Timestamps
// ------------------------------------------------------------------

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmm`, the format the API expects.
pub(crate) fn now_utc() -> String {
    use std::time::SystemTime;
    let elapsed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(elapsed.as_secs(), elapsed.subsec_millis())
}

fn format_utc(secs: u64, millis: u32) -> String {
    let (year, month, day) = civil_from_days(secs / 86_400);
    let of_day = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

// Howard Hinnant's days-from-civil inverse.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
