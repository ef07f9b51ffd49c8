use std::fmt;

use crate::ids::UserId;

/// A request-scoped logging handle.
///
/// `RequestLog` is obtained from [`Ctx::log`](crate::Ctx::log) and borrows
/// from the context, so it cannot outlive the request. Every message carries
/// the request ID, and the principal's ID once the guard has resolved one.
///
/// Secret values are automatically redacted when logged due to their `Debug`
/// and `Display` implementations.
#[derive(Debug)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    principal: Option<&'a UserId>,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(request_id: &'a str, principal: Option<&'a UserId>) -> Self {
        Self {
            request_id,
            principal,
        }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use session_core::{RequestLog, Secret};
    /// # fn example(log: &RequestLog) {
    /// let token = Secret::new("abc.def");
    /// log.info(format_args!("received token {:?}", token));
    /// # }
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::info!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::info!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::warn!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::warn!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::error!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::error!(request_id = %self.request_id, "{}", args),
        }
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        match self.principal {
            Some(p) => tracing::debug!(request_id = %self.request_id, principal = %p, "{}", args),
            None => tracing::debug!(request_id = %self.request_id, "{}", args),
        }
    }
}
