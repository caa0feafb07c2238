//! Messaging channel abstraction: outbound notifications and the inbound
//! command stream.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod telegram;

pub use mock::MockChannel;
pub use telegram::TelegramChannel;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One inbound item from the command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Monotonically increasing stream identifier; the cursor records the
    /// highest one consumed.
    pub id: i64,
    /// Channel identity of the sender; only the configured identity is
    /// honored.
    pub originator: String,
    pub text: String,
}

/// Outbound notification delivery.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    async fn send(&self, text: &str) -> Result<(), ChannelError>;
}

/// Ordered inbound command stream.
#[async_trait]
pub trait CommandInbox: Send + Sync + fmt::Debug {
    /// Fetch items after `cursor` (all items when `None`), in stream order.
    async fn fetch_new(&self, cursor: Option<i64>) -> Result<Vec<InboundMessage>, ChannelError>;
}
