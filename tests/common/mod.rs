//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agent_notify::config::{NotifyConfig, SpeechConfig, VisualConfig};
use agent_notify::http::HttpServer;
use agent_notify::lifecycle::Shutdown;
use agent_notify::notification::channels::{
    AudioChannel, AudioError, DesktopNotifier, Popup, SpeechSynthesizer, Utterance,
    VisualChannel, VisualError,
};
use agent_notify::notification::NotificationDispatcher;
use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Records spoken text; fails every call when `fail` is set.
#[derive(Default)]
pub struct RecordingSynthesizer {
    pub fail: bool,
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&self, utterance: &Utterance<'_>) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::Failed {
                code: Some(1),
                stderr: "no audio device".to_string(),
            });
        }
        self.spoken.lock().unwrap().push(utterance.text.to_string());
        Ok(())
    }
}

/// Counts popups; fails every call when `fail` is set.
#[derive(Default)]
pub struct CountingNotifier {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl CountingNotifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DesktopNotifier for CountingNotifier {
    async fn show(&self, _popup: &Popup) -> Result<(), VisualError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(VisualError::Backend("no display".to_string()));
        }
        Ok(())
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Serve `config` on an ephemeral loopback port with fake channels.
pub async fn start_server(
    config: NotifyConfig,
    synth: Arc<RecordingSynthesizer>,
    notifier: Arc<CountingNotifier>,
) -> TestServer {
    let dispatcher = NotificationDispatcher::new(
        AudioChannel::new(synth, &SpeechConfig::default()),
        Some(VisualChannel::new(notifier, &VisualConfig::default())),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_dispatcher(config, dispatcher);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}
