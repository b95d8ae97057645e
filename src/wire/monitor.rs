//! Bridges the async push transport to the engine's event loop.
//!
//! The transport feeds raw frames into a tokio channel; the monitor decodes
//! them and forwards normalized events over std mpsc to the loop that owns
//! the `SyncController`. A decode failure skips the frame and keeps the
//! monitor alive.

use std::sync::mpsc::Sender;

use serde_json::Value;
use tokio::{
    runtime::Runtime,
    sync::{mpsc, watch},
};

use super::decode;
use crate::domain::events::PushEvent;

const PUSH_MONITOR_STARTED: &str = "PUSH_MONITOR_STARTED";
const PUSH_MONITOR_STOPPED: &str = "PUSH_MONITOR_STOPPED";
const PUSH_MONITOR_SHUTDOWN_SIGNALED: &str = "PUSH_MONITOR_SHUTDOWN_SIGNALED";
const PUSH_MONITOR_FORWARD_FAILED: &str = "PUSH_MONITOR_FORWARD_FAILED";
const PUSH_MONITOR_DECODE_FAILED: &str = "PUSH_MONITOR_DECODE_FAILED";

/// One frame as it arrives from the push transport: topic-scoped event name
/// plus its JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub event: String,
    pub payload: Value,
}

#[derive(Debug)]
pub struct PushMonitor {
    stop_tx: Option<watch::Sender<bool>>,
}

impl PushMonitor {
    pub fn start(
        runtime: &Runtime,
        frames: mpsc::Receiver<RawFrame>,
        events: Sender<PushEvent>,
    ) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        runtime.spawn(run_monitor(frames, events, stop_rx));

        tracing::info!(code = PUSH_MONITOR_STARTED, "push monitor started");

        Self {
            stop_tx: Some(stop_tx),
        }
    }
}

impl Drop for PushMonitor {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            tracing::info!(
                code = PUSH_MONITOR_SHUTDOWN_SIGNALED,
                "push monitor shutdown signal sent"
            );
        }
    }
}

async fn run_monitor(
    mut frames: mpsc::Receiver<RawFrame>,
    events: Sender<PushEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(code = PUSH_MONITOR_STOPPED, "push monitor stopped");
                    return;
                }
            }
            frame = frames.recv() => {
                let Some(frame) = frame else {
                    tracing::info!(
                        code = PUSH_MONITOR_STOPPED,
                        "push monitor stopped: frame channel closed"
                    );
                    return;
                };

                match decode::decode_event(&frame.event, &frame.payload) {
                    Ok(event) => {
                        tracing::debug!(kind = event.kind(), "push frame decoded");
                        if let Err(error) = events.send(event) {
                            tracing::warn!(
                                code = PUSH_MONITOR_FORWARD_FAILED,
                                error = %error,
                                "push monitor failed to forward event"
                            );
                            return;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = PUSH_MONITOR_DECODE_FAILED,
                            event = %frame.event,
                            error = %error,
                            "push frame dropped; keeping monitor alive"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;

    #[test]
    fn forwards_decoded_events_and_survives_bad_frames() {
        let runtime = Runtime::new().expect("runtime must start");
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = std::sync::mpsc::channel();

        let monitor = PushMonitor::start(&runtime, frame_rx, event_tx);

        frame_tx
            .blocking_send(RawFrame {
                event: "bogus:event".to_owned(),
                payload: json!({}),
            })
            .expect("frame must send");
        frame_tx
            .blocking_send(RawFrame {
                event: "typing".to_owned(),
                payload: json!({"userId": "u2", "name": "Bea"}),
            })
            .expect("frame must send");

        let event = event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("event must arrive");
        assert_eq!(
            event,
            PushEvent::Typing {
                user_id: "u2".to_owned(),
                display_name: Some("Bea".to_owned()),
            }
        );

        drop(monitor);
    }

    #[test]
    fn closing_the_frame_channel_stops_the_monitor() {
        let runtime = Runtime::new().expect("runtime must start");
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = std::sync::mpsc::channel();

        let _monitor = PushMonitor::start(&runtime, frame_rx, event_tx);
        drop(frame_tx);

        // with the monitor task gone, the event channel reports disconnect
        assert!(event_rx.recv_timeout(Duration::from_secs(5)).is_err());
    }
}
