//! Analyzer session — owns the child process and the tasks that service
//! its pipes.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::codec::{LineFramer, LineWriter};
use crate::error::ClientError;
use crate::router::NotificationRouter;
use crate::types::{AnalyzerConfig, ClientEvent, SessionState, StopReason};

const WRITER_CHANNEL_CAPACITY: usize = 64;

const READ_CHUNK_BYTES: usize = 8 * 1024;

enum WriterCommand {
    Send(serde_json::Value),
    Shutdown,
}

/// One live analyzer subprocess.
///
/// The reader task drives the whole inbound chain — pipe chunk, framer,
/// router, events — one chunk at a time, in arrival order. The session is
/// an owned value passed to every operation; there is no global registry.
#[derive(Debug)]
pub(crate) struct AnalyzerSession {
    command: String,
    child: Child,
    writer_tx: mpsc::Sender<WriterCommand>,
    state: SessionState,
    #[allow(dead_code)]
    reader_handle: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    stderr_handle: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    writer_handle: tokio::task::JoinHandle<()>,
}

impl AnalyzerSession {
    /// Spawn the analyzer and wire its stdio.
    ///
    /// Fails if the executable cannot be resolved or launched; whether to
    /// retry or abort is the caller's decision, never this layer's.
    pub fn spawn(
        config: &AnalyzerConfig,
        event_tx: mpsc::Sender<ClientEvent>,
    ) -> Result<Self, ClientError> {
        let resolved = which::which(&config.command).map_err(|source| ClientError::NotFound {
            command: config.command.clone(),
            source,
        })?;

        let mut cmd = Command::new(&resolved);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ClientError::Spawn {
            command: config.command.clone(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| ClientError::Spawn {
            command: config.command.clone(),
            source: std::io::Error::other("child stdout was not captured"),
        })?;
        let stdin = child.stdin.take().ok_or_else(|| ClientError::Spawn {
            command: config.command.clone(),
            source: std::io::Error::other("child stdin was not captured"),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| ClientError::Spawn {
            command: config.command.clone(),
            source: std::io::Error::other("child stderr was not captured"),
        })?;

        let (writer_tx, mut writer_rx) = mpsc::channel::<WriterCommand>(WRITER_CHANNEL_CAPACITY);
        let writer_handle = tokio::spawn(async move {
            let mut writer = LineWriter::new(stdin);
            while let Some(cmd) = writer_rx.recv().await {
                match cmd {
                    WriterCommand::Send(frame) => {
                        if let Err(e) = writer.write_frame(&frame).await {
                            tracing::warn!("Analyzer write error: {e}");
                            break;
                        }
                    }
                    WriterCommand::Shutdown => break,
                }
            }
        });

        // Error-channel output is logged as-is; it never affects session
        // state or message flow.
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::warn!("analyzer stderr: {line}");
            }
        });

        let router = NotificationRouter::new(
            config.unresolved_marker.clone(),
            config.imports.clone(),
            event_tx.clone(),
        );
        let reader_handle = tokio::spawn(async move {
            let mut stdout = stdout;
            let mut framer = LineFramer::new();
            let mut chunk = vec![0u8; READ_CHUNK_BYTES];
            loop {
                match stdout.read(&mut chunk).await {
                    Ok(0) => {
                        tracing::info!("Analyzer closed stdout");
                        let _ = event_tx
                            .send(ClientEvent::SessionStopped {
                                reason: StopReason::Exited,
                            })
                            .await;
                        break;
                    }
                    Ok(n) => {
                        for frame in framer.feed(&chunk[..n]) {
                            router.route(&frame).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Analyzer read error: {e}");
                        let _ = event_tx
                            .send(ClientEvent::SessionStopped {
                                reason: StopReason::Failed(e.to_string()),
                            })
                            .await;
                        break;
                    }
                }
            }
        });

        let mut session = Self {
            command: config.command.clone(),
            child,
            writer_tx,
            state: SessionState::Starting,
            reader_handle,
            stderr_handle,
            writer_handle,
        };
        tracing::info!(
            "Analyzer session started: {} {:?}",
            session.command,
            config.args
        );
        session.state = SessionState::Running;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Enqueue one outbound frame.
    ///
    /// Fails if the session is stopped or the process has already exited;
    /// the write is never queued across process death and never retried.
    pub async fn send(&mut self, frame: serde_json::Value) -> Result<(), ClientError> {
        if self.state == SessionState::Stopped {
            return Err(ClientError::Write);
        }
        if let Ok(Some(status)) = self.child.try_wait() {
            tracing::info!("Analyzer `{}` exited with {status}", self.command);
            self.state = SessionState::Stopped;
            return Err(ClientError::Write);
        }
        self.writer_tx
            .send(WriterCommand::Send(frame))
            .await
            .map_err(|_| ClientError::Write)
    }

    /// Request termination.
    ///
    /// Idempotent: stopping an already-stopped session does nothing. Does
    /// not wait for the child to exit — the reader task reports the exit
    /// separately once stdout closes.
    pub async fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopped;
        let _ = self.writer_tx.send(WriterCommand::Shutdown).await;
        if let Err(e) = self.child.start_kill() {
            tracing::debug!("Analyzer `{}` already gone on stop: {e}", self.command);
        }
    }

    /// Exit code, if the child has been reaped.
    pub fn exit_code(&mut self) -> Option<i32> {
        self.child
            .try_wait()
            .ok()
            .flatten()
            .and_then(|status| status.code())
    }
}
