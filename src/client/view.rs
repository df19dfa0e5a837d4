use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;
use uuid::Uuid;

use crate::client::api::{ClientError, ConversationApi};
use crate::models::message::{Message, UploadedFile};

/// How often an open view refetches its conversation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A live view of one conversation. Opening a view fetches the timeline
/// immediately and then keeps polling in the background until the view is
/// closed or dropped. The timeline is only ever replaced wholesale with
/// whatever the server returned last.
pub struct ConversationView<C: ConversationApi> {
    api: Arc<C>,
    conversation_id: Uuid,
    timeline: Arc<watch::Sender<Vec<Message>>>,
    receiver: watch::Receiver<Vec<Message>>,
    poller: JoinHandle<()>,
}

impl<C: ConversationApi> ConversationView<C> {
    pub fn open(api: Arc<C>, conversation_id: Uuid) -> Self {
        Self::open_with_interval(api, conversation_id, DEFAULT_POLL_INTERVAL)
    }

    pub fn open_with_interval(
        api: Arc<C>,
        conversation_id: Uuid,
        poll_interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let timeline = Arc::new(tx);

        let poller = tokio::spawn({
            let api = Arc::clone(&api);
            let timeline = Arc::clone(&timeline);
            async move {
                // The first tick completes at once, so an opened view does
                // not wait a full interval for its initial timeline.
                let mut ticker = time::interval(poll_interval);
                loop {
                    ticker.tick().await;
                    publish_latest(api.as_ref(), conversation_id, &timeline).await;
                }
            }
        });

        Self {
            api,
            conversation_id,
            timeline,
            receiver: rx,
            poller,
        }
    }

    /// The timeline as of the last successful fetch.
    pub fn messages(&self) -> Vec<Message> {
        self.receiver.borrow().clone()
    }

    /// A receiver that wakes whenever the timeline content changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.receiver.clone()
    }

    /// Sends a text message and refetches the timeline right away instead
    /// of waiting for the next tick. Nothing is appended locally; the
    /// message only appears once the server returns it.
    pub async fn send_text(&self, body: &str) -> Result<Message, ClientError> {
        let message = self.api.send_text(self.conversation_id, body).await?;
        self.refresh().await;
        Ok(message)
    }

    /// Sends a file with an optional text body, then refetches.
    pub async fn send_file(
        &self,
        file: &UploadedFile,
        body: Option<&str>,
    ) -> Result<Message, ClientError> {
        let message = self
            .api
            .send_file(self.conversation_id, file, body)
            .await?;
        self.refresh().await;
        Ok(message)
    }

    /// Refetches the timeline now. A failed fetch keeps the current
    /// timeline; the next tick retries.
    pub async fn refresh(&self) {
        publish_latest(self.api.as_ref(), self.conversation_id, &self.timeline).await;
    }

    /// Stops the background poller. Dropping the view has the same effect.
    pub fn close(self) {
        self.poller.abort();
    }
}

impl<C: ConversationApi> Drop for ConversationView<C> {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

async fn publish_latest<C: ConversationApi>(
    api: &C,
    conversation_id: Uuid,
    timeline: &watch::Sender<Vec<Message>>,
) {
    match api.fetch_messages(conversation_id).await {
        Ok(messages) => {
            // Unchanged timelines do not wake subscribers.
            timeline.send_if_modified(|current| {
                if *current == messages {
                    false
                } else {
                    *current = messages;
                    true
                }
            });
        }
        Err(e) => {
            debug!("poll failed for conversation {}: {}", conversation_id, e);
        }
    }
}
