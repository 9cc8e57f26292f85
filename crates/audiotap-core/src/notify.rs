//! Audio stream notification: fan-out of [`AudioStreamEvent`]s to subscribers
//! without holding up the request path.
//!
//! Registered handlers each own an unbounded queue, so every event reaches
//! every handler no matter how far behind it runs. Raw [`broadcast`]
//! receivers from [`AudioStreamHub::subscribe`] are bounded and may lag.

use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio::sync::mpsc;

use crate::request::AudioStreamEvent;

pub struct AudioStreamHub {
    tx: broadcast::Sender<AudioStreamEvent>,
    handlers: Mutex<Vec<mpsc::UnboundedSender<AudioStreamEvent>>>,
}

impl AudioStreamHub {
    /// `capacity` bounds each [`Self::subscribe`] receiver; handlers are unbounded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Never blocks. Events published with no subscribers are dropped.
    pub fn publish(&self, event: AudioStreamEvent) {
        {
            let mut handlers = self.handlers.lock().unwrap();
            // A closed queue means the handler task is gone (runtime shut down).
            handlers.retain(|handler| handler.send(event.clone()).is_ok());
        }
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AudioStreamEvent> {
        self.tx.subscribe()
    }

    /// Runs `handler` for every event on its own tokio task, in publish order.
    /// The task lives until the hub is dropped. Must be called within a tokio runtime.
    pub fn on_audio_stream<F>(&self, handler: F) -> tokio::task::JoinHandle<()>
    where
        F: Fn(AudioStreamEvent) + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.handlers.lock().unwrap().push(tx);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handler(event);
            }
        })
    }
}

impl Default for AudioStreamHub {
    fn default() -> Self {
        Self::new(64)
    }
}
