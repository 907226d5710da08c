//! Audio channel: speak the message through an external synthesizer.
//!
//! This is the mandatory channel. Any failure (spawn error, non-zero exit,
//! missed deadline) fails the whole dispatch.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::config::SpeechConfig;

/// Errors from the speech synthesizer.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to run speech command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech command exited with status {}: {stderr}", exit_code(.code))]
    Failed { code: Option<i32>, stderr: String },

    #[error("speech command did not finish within {0:?}")]
    TimedOut(Duration),
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// One request to the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance<'a> {
    /// `None` lets the synthesizer use the system default voice.
    pub voice: Option<&'a str>,
    /// Words per minute.
    pub rate: u32,
    pub text: &'a str,
}

/// Something that can speak text and report whether it succeeded.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, utterance: &Utterance<'_>) -> Result<(), AudioError>;
}

/// Runs a `say`-compatible program: `<program> [-v voice] -r rate message`.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument list for one utterance.
    pub fn args(utterance: &Utterance<'_>) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        if let Some(voice) = utterance.voice {
            args.push("-v".to_string());
            args.push(voice.to_string());
        }
        args.push("-r".to_string());
        args.push(utterance.rate.to_string());
        args.push(utterance.text.to_string());
        args
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, utterance: &Utterance<'_>) -> Result<(), AudioError> {
        // kill_on_drop: a deadline that drops this future also stops the child.
        let output = Command::new(&self.program)
            .args(Self::args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(AudioError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// The mandatory speech channel with its configured voice, rate and deadline.
#[derive(Clone)]
pub struct AudioChannel {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    voice: String,
    rate: u32,
    timeout: Duration,
}

impl AudioChannel {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: &SpeechConfig) -> Self {
        Self {
            synthesizer,
            voice: config.voice.clone(),
            rate: config.rate,
            timeout: config.timeout(),
        }
    }

    /// Production channel backed by the configured speech command.
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(Arc::new(CommandSynthesizer::new(&config.command)), config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn utterance<'a>(&'a self, text: &'a str) -> Utterance<'a> {
        Utterance {
            voice: Some(self.voice.as_str()).filter(|v| !v.is_empty()),
            rate: self.rate,
            text,
        }
    }

    /// Speak `text`, waiting for the synthesizer to finish or the deadline.
    pub async fn deliver(&self, text: &str) -> Result<(), AudioError> {
        let utterance = self.utterance(text);
        match tokio::time::timeout(self.timeout, self.synthesizer.speak(&utterance)).await {
            Ok(result) => result,
            Err(_) => Err(AudioError::TimedOut(self.timeout)),
        }
    }
}
