//! Delivery channels.
//!
//! - `audio`: mandatory speech channel (external synthesizer process)
//! - `visual`: best-effort desktop popup

pub mod audio;
pub mod visual;

#[cfg(test)]
pub(crate) mod testing;

pub use audio::{AudioChannel, AudioError, CommandSynthesizer, SpeechSynthesizer, Utterance};
pub use visual::{
    DesktopNotifier, Popup, SystemNotifier, VisualChannel, VisualError, VisualOutcome,
};
