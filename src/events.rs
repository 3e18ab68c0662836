// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Event subscription support for the optional "watch" capability.
//!
//! The subscription transport itself is an external collaborator behind
//! [`EventSource`]; this module owns the delivery loop contract: each event
//! is delivered to the callback at most once, and a callback error is routed
//! to the caller-supplied error handler without ending the loop.

use async_trait::async_trait;
use futures_util::{StreamExt, stream::BoxStream};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{common::types::ObjectId, error::FeedError};

/// An event emitted by the remote program.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// The program that emitted the event.
    pub program: ObjectId,
    /// The emitting module name.
    pub module: String,
    /// Fully qualified event type tag.
    pub event_type: String,
    /// JSON-shaped event payload.
    pub payload: Value,
    /// Ledger timestamp in milliseconds.
    pub timestamp_ms: u64,
}

/// A conjunction of event predicates; `None` matches anything.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub program: Option<ObjectId>,
    pub module: Option<String>,
    pub event_type: Option<String>,
}

impl EventFilter {
    /// Creates an empty filter matching every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to events emitted by `program`.
    pub fn program(mut self, program: ObjectId) -> Self {
        self.program = Some(program);
        self
    }

    /// Restricts to events emitted from `module`.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Restricts to events of the given type tag.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Returns `true` when the event satisfies every set predicate.
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.program.is_none_or(|p| p == event.program)
            && self
                .module
                .as_ref()
                .is_none_or(|m| *m == event.module)
            && self
                .event_type
                .as_ref()
                .is_none_or(|t| *t == event.event_type)
    }
}

/// An external event subscription transport.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Opens a stream of events matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be established.
    async fn subscribe(
        &self,
        filter: EventFilter,
    ) -> Result<BoxStream<'static, LedgerEvent>, FeedError>;
}

/// A running event delivery loop.
#[derive(Debug)]
pub struct EventSubscription {
    handle: tokio::task::JoinHandle<()>,
}

impl EventSubscription {
    /// Subscribes to `filter` on `source` and spawns the delivery loop.
    ///
    /// The callback is invoked at most once per event. A callback error is
    /// passed to `on_error` and the loop continues; the loop ends when the
    /// source closes the stream or [`EventSubscription::stop`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be established.
    pub async fn spawn<F, H>(
        source: &dyn EventSource,
        filter: EventFilter,
        mut callback: F,
        mut on_error: H,
    ) -> Result<Self, FeedError>
    where
        F: FnMut(LedgerEvent) -> Result<(), FeedError> + Send + 'static,
        H: FnMut(FeedError) + Send + 'static,
    {
        let mut stream = source.subscribe(filter).await?;
        let handle = tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                if let Err(e) = callback(event) {
                    warn!("event callback failed: {e}");
                    on_error(e);
                }
            }
        });
        Ok(Self { handle })
    }

    /// Releases the subscription, ending the delivery loop.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Returns `true` while the delivery loop is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use futures_util::stream;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn event(event_type: &str) -> LedgerEvent {
        LedgerEvent {
            program: ObjectId::new_unchecked("0xprog"),
            module: "aggregator_save_result_action".to_string(),
            event_type: event_type.to_string(),
            payload: json!({}),
            timestamp_ms: 0,
        }
    }

    struct FixedSource {
        events: Vec<LedgerEvent>,
    }

    #[async_trait]
    impl EventSource for FixedSource {
        async fn subscribe(
            &self,
            filter: EventFilter,
        ) -> Result<BoxStream<'static, LedgerEvent>, FeedError> {
            let events: Vec<LedgerEvent> = self
                .events
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect();
            Ok(stream::iter(events).boxed())
        }
    }

    #[rstest]
    fn test_filter_conjunction() {
        let filter = EventFilter::new()
            .program(ObjectId::new_unchecked("0xprog"))
            .event_type("0xprog::events::AggregatorUpdateEvent");

        assert!(filter.matches(&event("0xprog::events::AggregatorUpdateEvent")));
        assert!(!filter.matches(&event("0xprog::events::OracleHeartbeatEvent")));
    }

    #[tokio::test]
    async fn test_callback_error_does_not_end_loop() {
        let source = FixedSource {
            events: vec![event("a"), event("b"), event("c")],
        };
        let delivered = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));

        let delivered_in_cb = delivered.clone();
        let errors_in_handler = errors.clone();
        let subscription = EventSubscription::spawn(
            &source,
            EventFilter::new(),
            move |event| {
                delivered_in_cb.fetch_add(1, Ordering::SeqCst);
                if event.event_type == "b" {
                    Err(FeedError::decode("bad payload"))
                } else {
                    Ok(())
                }
            },
            move |_| {
                errors_in_handler.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

        // Let the delivery loop drain the fixed stream.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(delivered.load(Ordering::SeqCst), 3);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert!(!subscription.is_active());
    }
}
