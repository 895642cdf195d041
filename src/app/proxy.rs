//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// Sends `UserEvent`s towards the event loop.
///
/// Fire-and-forget: handlers never learn whether the window is still there,
/// which lets the test suite swap in a channel-backed double.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // A closed event loop means the app is shutting down; only log it.
        if let Err(e) = EventLoopProxy::send_event(self, event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
