//! Call-recording channel backends for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::audio::{AudioError, SpeechSynthesizer, Utterance};
use super::visual::{DesktopNotifier, Popup, VisualError};

#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    Fail,
    Hang,
}

type Spoken = (Option<String>, u32, String);

pub struct FakeSynthesizer {
    behaviour: Behaviour,
    spoken: Mutex<Vec<Spoken>>,
}

impl FakeSynthesizer {
    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with(Behaviour::Succeed)
    }

    /// Exits with status 1.
    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    /// Never finishes.
    pub fn hanging() -> Self {
        Self::with(Behaviour::Hang)
    }

    pub fn calls(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }

    pub fn spoken(&self) -> Vec<Spoken> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn speak(&self, utterance: &Utterance<'_>) -> Result<(), AudioError> {
        self.spoken.lock().unwrap().push((
            utterance.voice.map(str::to_string),
            utterance.rate,
            utterance.text.to_string(),
        ));
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(AudioError::Failed {
                code: Some(1),
                stderr: "voice not found".to_string(),
            }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

pub struct FakeNotifier {
    behaviour: Behaviour,
    shown: Mutex<Vec<Popup>>,
}

impl FakeNotifier {
    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with(Behaviour::Succeed)
    }

    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    pub fn calls(&self) -> usize {
        self.shown.lock().unwrap().len()
    }

    pub fn shown(&self) -> Vec<Popup> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl DesktopNotifier for FakeNotifier {
    async fn show(&self, popup: &Popup) -> Result<(), VisualError> {
        self.shown.lock().unwrap().push(popup.clone());
        match self.behaviour {
            Behaviour::Fail => Err(VisualError::Backend("no display".to_string())),
            _ => Ok(()),
        }
    }
}
