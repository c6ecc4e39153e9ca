//! Error sinks notified when the database cannot be reached

/// Receives a formatted message for every connection error.
///
/// Called inline on the failing operation's task, so implementations must not
/// block; hand the message off to a channel or logger instead.
pub trait ErrorSink: Send + Sync {
   fn log(&self, message: &str);
}

/// Discards every message. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ErrorSink for NoopSink {
   fn log(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
   fn log(&self, message: &str) {
      tracing::error!("{}", message);
   }
}
