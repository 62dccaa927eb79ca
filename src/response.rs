use serde_json::Value;

/// Result of one `send` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The service acknowledged the batch with an `OK…` body.
    Success,
    /// Anything else: the decoded JSON body, or `Value::Null` when the body
    /// was empty, not JSON, or the service could not be reached.
    Diagnostic(Value),
    /// The dispatch target was not `logs` or `reports`. Nothing was sent.
    Unrecognized,
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success)
    }

    pub fn diagnostic(&self) -> Option<&Value> {
        match self {
            SendOutcome::Diagnostic(value) => Some(value),
            _ => None,
        }
    }
}

/// Apply the response protocol to a raw body.
///
/// A body longer than two characters starting with `OK` is a success; a
/// bare `OK` is not.
pub fn interpret(body: &str) -> SendOutcome {
    if body.chars().count() > 2 && body.starts_with("OK") {
        return SendOutcome::Success;
    }
    SendOutcome::Diagnostic(serde_json::from_str(body).unwrap_or(Value::Null))
}
