//! Infrastructure wiring behind the HTTP handlers.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use carbonharvest_events::{Event, EventBus, InMemoryEventBus};
use carbonharvest_ledger::{InMemoryLedger, LedgerEvent};
use carbonharvest_notify::{Mailer, Notifier, TracingMailer};

/// Message fanned out to live SSE subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Shared application services, attached to the router as an extension.
pub struct AppServices {
    ledger: InMemoryLedger,
    bus: Arc<InMemoryEventBus<LedgerEvent>>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

/// Wire the in-memory ledger, event bus, notification worker, and realtime
/// broadcast together.
pub fn build_services() -> AppServices {
    let ledger = InMemoryLedger::in_memory();
    let bus: Arc<InMemoryEventBus<LedgerEvent>> = Arc::new(InMemoryEventBus::new());

    // Realtime channel (SSE): lossy broadcast, no backpressure on handlers.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    let mailer: Arc<dyn Mailer> = Arc::new(TracingMailer);
    let notifier = Notifier::new(mailer);

    // Background subscriber: bus -> notifier + SSE broadcast.
    {
        let sub = bus.subscribe();
        let realtime_tx = realtime_tx.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                match sub.recv() {
                    Ok(event) => {
                        notifier.handle(&event);

                        let _ = realtime_tx.send(RealtimeMessage {
                            topic: event.event_type().to_string(),
                            payload: serde_json::to_value(&event)
                                .unwrap_or(serde_json::Value::Null),
                        });
                    }
                    Err(_) => break,
                }
            }
        });
    }

    AppServices {
        ledger,
        bus,
        realtime_tx,
    }
}

impl AppServices {
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Publish a ledger event for notification/streaming consumers.
    ///
    /// Best-effort: the ledger record is already committed, so a publish
    /// failure is logged and the request still succeeds.
    pub fn publish(&self, event: LedgerEvent) {
        if let Err(e) = self.bus.publish(event) {
            tracing::warn!("event publish failed: {e:?}");
        }
    }
}
