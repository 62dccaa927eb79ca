use crate::context::HostContext;
use crate::entry::{Entry, Log, Report};
use crate::ids::{IdGenerator, RandomIds};
use crate::queue::{Category, EndpointQueue};
use crate::response::{interpret, SendOutcome};
use crate::settings::{ConfigError, Settings};
use crate::transport::{HttpTransport, OutgoingRequest, Transport};

use serde::Serialize;
use serde_json::Value;

const API_KEY_HEADER: &str = "X-errormator-api-key";

/// Batching AppEnlight client.
///
/// Logs and reports accumulate in two independent in-memory queues and are
/// shipped only when the caller asks for it with [`send_logs`] or
/// [`send_reports`]. Each send blocks until the transport returns.
///
/// A queue is emptied as soon as its batch is serialized, before the
/// result of the request is known: entries of a failed transmission are
/// lost, never resent.
///
/// The client is not internally synchronized. Hosts with several producer
/// threads must funnel access through a lock or a single owner thread.
///
/// [`send_logs`]: AppEnlightClient::send_logs
/// [`send_reports`]: AppEnlightClient::send_reports
pub struct AppEnlightClient<T: Transport = HttpTransport> {
    settings: Settings,
    logs: EndpointQueue<Log>,
    reports: EndpointQueue<Report>,
    transport: T,
    ids: Box<dyn IdGenerator + Send + Sync>,
}

impl AppEnlightClient<HttpTransport> {
    /// Create a client over HTTP. The connection is opened on the first send.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        Self::with_transport(settings, HttpTransport::new())
    }

    /// Create a client from the settings a host integration provides.
    pub fn from_context(ctx: &dyn HostContext) -> Result<Self, ConfigError> {
        Self::new(ctx.settings()?)
    }
}

impl<T: Transport> AppEnlightClient<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(settings: Settings, transport: T) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            logs: EndpointQueue::new(Category::Logs),
            reports: EndpointQueue::new(Category::Reports),
            transport,
            ids: Box::new(RandomIds),
        })
    }

    /// Replace the correlation-id source used by [`request_id`](Self::request_id).
    pub fn with_id_generator(mut self, ids: impl IdGenerator + Send + Sync + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn add_log(&mut self, log: Log) -> &mut Self {
        self.logs.add(log);
        self
    }

    /// Queue a report, tagged with the configured client name unless it
    /// already names one.
    pub fn add_report(&mut self, mut report: Report) -> &mut Self {
        if report.client.is_none() {
            report.client = Some(self.settings.client.clone());
        }
        self.reports.add(report);
        self
    }

    /// Queue an entry in the queue matching its category.
    pub fn add(&mut self, entry: impl Into<Entry>) -> &mut Self {
        match entry.into() {
            Entry::Log(log) => self.add_log(log),
            Entry::Report(report) => self.add_report(report),
        }
    }

    /// Ship the queue named by `category` (`"logs"` or `"reports"`).
    ///
    /// Any other name returns [`SendOutcome::Unrecognized`] without touching
    /// the queues or the transport.
    pub fn send(&mut self, category: &str) -> SendOutcome {
        match Category::parse(category) {
            Some(category) => self.send_category(category),
            None => {
                tracing::warn!("[appenlight] unrecognized dispatch target '{category}'");
                SendOutcome::Unrecognized
            }
        }
    }

    pub fn send_logs(&mut self) -> SendOutcome {
        self.send_category(Category::Logs)
    }

    pub fn send_reports(&mut self) -> SendOutcome {
        self.send_category(Category::Reports)
    }

    /// Serialize, clear, POST and interpret one category's batch.
    pub fn send_category(&mut self, category: Category) -> SendOutcome {
        let headers = self.headers();

        let (count, body) = match category {
            Category::Logs => take_batch(&mut self.logs),
            Category::Reports => take_batch(&mut self.reports),
        };
        let body = match body {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(
                    %category,
                    error = %e,
                    "[appenlight] failed to serialize batch, dropped {count} entries"
                );
                return SendOutcome::Diagnostic(Value::Null);
            }
        };

        let request = OutgoingRequest {
            url: self.build_url(category),
            headers,
            body,
        };
        tracing::debug!(
            %category,
            entries = count,
            url = %request.url,
            "[appenlight] sending batch"
        );

        let response = match self.transport.post(&request) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    %category,
                    error = %e,
                    "[appenlight] send failed, dropped {count} entries"
                );
                String::new()
            }
        };

        let outcome = interpret(&response);
        if !outcome.is_success() {
            tracing::debug!(%category, ?outcome, "[appenlight] batch not acknowledged");
        }
        outcome
    }

    /// `{scheme}://{host}/{path}?protocol_version={version}`
    pub fn build_url(&self, category: Category) -> String {
        format!(
            "{}://{}/{}?protocol_version={}",
            self.settings.scheme,
            self.settings.host,
            category.path(),
            self.settings.protocol_version
        )
    }

    /// A fresh correlation id for tagging entries of one unit of work.
    pub fn request_id(&self) -> String {
        self.ids.generate()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings used by subsequent sends.
    pub fn set_settings(&mut self, settings: Settings) -> Result<&mut Self, ConfigError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Number of logs waiting for the next send.
    pub fn pending_logs(&self) -> usize {
        self.logs.len()
    }

    /// Number of reports waiting for the next send.
    pub fn pending_reports(&self) -> usize {
        self.reports.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (API_KEY_HEADER.to_string(), self.settings.api_key.clone()),
        ]
    }
}

/// Serialize the queue and empty it, whatever happens next.
fn take_batch<E: Serialize>(
    queue: &mut EndpointQueue<E>,
) -> (usize, serde_json::Result<Vec<u8>>) {
    let count = queue.len();
    let body = queue.serialize();
    queue.clear();
    (count, body)
}
