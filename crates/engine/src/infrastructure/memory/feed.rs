//! Tokio-broadcast change feed.
//!
//! One channel per encounter, created lazily on first publish or subscribe.
//! Publishing never blocks; a subscriber that falls behind the buffer gets a
//! `ResyncRequired` marker instead of silently losing events.

use dashmap::DashMap;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;

use sprawl_domain::EncounterId;

use crate::infrastructure::ports::{ChangeEvent, ChangeFeed};

pub struct MemoryChangeFeed {
    capacity: usize,
    channels: DashMap<EncounterId, broadcast::Sender<ChangeEvent>>,
}

impl MemoryChangeFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: DashMap::new(),
        }
    }

    fn sender(&self, encounter_id: EncounterId) -> broadcast::Sender<ChangeEvent> {
        self.channels
            .entry(encounter_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl ChangeFeed for MemoryChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        // A send error just means nobody is subscribed right now.
        let _ = self.sender(event.encounter_id()).send(event);
    }

    fn subscribe(&self, encounter_id: EncounterId) -> BoxStream<'static, ChangeEvent> {
        let receiver = self.sender(encounter_id).subscribe();
        futures_util::stream::unfold(
            (receiver, encounter_id),
            |(mut receiver, encounter_id)| async move {
                match receiver.recv().await {
                    Ok(event) => Some((event, (receiver, encounter_id))),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            encounter_id = %encounter_id,
                            missed,
                            "change feed subscriber lagged; requesting resync"
                        );
                        Some((
                            ChangeEvent::ResyncRequired { encounter_id },
                            (receiver, encounter_id),
                        ))
                    }
                    Err(broadcast::error::RecvError::Closed) => None,
                }
            },
        )
        .boxed()
    }
}
