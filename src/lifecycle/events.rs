//! Session event plumbing.
//!
//! The host's session notifier is bridged into the controller over a channel.
//! [`PreserveController::subscribe`] returns an explicit subscription object
//! owned by the caller; dropping it tears the listener down, so there is no
//! process-global callback slot to double-register.

use crate::lifecycle::controller::PreserveController;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Lifecycle notifications delivered by the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A save was requested; pre-save logic may run, the save then proceeds
    /// unmodified
    WillSave,
    /// A transient session is beginning
    SessionBegin,
    /// A transient session has ended
    SessionEnd,
}

/// Handle to a live event subscription.
///
/// Dropping the subscription aborts the listener task and stops event
/// delivery.
pub struct EventSubscription {
    events: mpsc::UnboundedSender<SessionEvent>,
    worker: JoinHandle<()>,
}

impl EventSubscription {
    /// Deliver an event to the controller. Returns `false` once the listener
    /// has shut down.
    pub fn notify(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.worker.abort();
        debug!("Session event subscription dropped");
    }
}

impl PreserveController {
    /// Spawn the event listener and return its subscription handle
    pub fn subscribe(self: &Arc<Self>) -> EventSubscription {
        let (events, mut receiver) = mpsc::unbounded_channel();
        let controller = Arc::clone(self);

        let worker = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                controller.handle_event(event).await;
            }
        });

        EventSubscription { events, worker }
    }

    /// Dispatch one session event to the matching lifecycle hook
    pub async fn handle_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::WillSave => {
                if let Err(e) = self.on_will_save().await {
                    error!("Pre-save snapshot failed: {:#}", e);
                }
            }
            SessionEvent::SessionBegin => self.on_session_begin(),
            SessionEvent::SessionEnd => {
                // The restore job runs detached; it is deliberately never
                // cancelled once scheduled.
                let _ = self.on_session_end().await;
            }
        }
    }
}
