//! In-memory channel for tests: records every send, serves scripted
//! inbound messages.

use super::{ChannelError, CommandInbox, InboundMessage, Notifier};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockChannel {
    inbound: Vec<InboundMessage>,
    sent: Mutex<Vec<String>>,
    fail_sends: bool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inbound(mut self, id: i64, originator: &str, text: &str) -> Self {
        self.inbound.push(InboundMessage {
            id,
            originator: originator.to_string(),
            text: text.to_string(),
        });
        self
    }

    /// Make every send fail, to exercise delivery-failure paths.
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl Notifier for MockChannel {
    async fn send(&self, text: &str) -> Result<(), ChannelError> {
        if self.fail_sends {
            return Err(ChannelError::Network("mock send failure".to_string()));
        }
        self.sent.lock().expect("mock lock").push(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl CommandInbox for MockChannel {
    async fn fetch_new(&self, cursor: Option<i64>) -> Result<Vec<InboundMessage>, ChannelError> {
        Ok(self
            .inbound
            .iter()
            .filter(|m| cursor.map_or(true, |c| m.id > c))
            .cloned()
            .collect())
    }
}
