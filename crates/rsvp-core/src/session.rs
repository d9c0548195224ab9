//! Reader session: one document, one playback machine, one advance timer.
//!
//! Everything that touches playback state runs on the task that drives
//! [`ReaderSession::run`]: UI commands, timer fires and load completions
//! arrive as messages and are handled one at a time.

use crate::error::{LoadError, invariant_violation};
use crate::navigation::Navigation;
use crate::pace::PacingProfile;
use crate::playback::{Advance, PlaybackMachine, PlaybackSnapshot, PlaybackStatus};
use crate::rate::ReadingRate;
use crate::scheduler::{Scheduler, TimerFired};
use crate::source::{DocumentWordSource, TokenList};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Rate every freshly loaded document starts at.
    pub initial_rate: ReadingRate,
    pub pacing: PacingProfile,
    /// Start playing as soon as a load succeeds.
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionCommand {
    GetSnapshot,
    Play,
    Pause,
    TogglePlayPause,
    SetRate { wpm: i32 },
    RateUp,
    RateDown,
    Load { document_id: String },
    Back,
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::Play => "reader_play",
            Self::Pause => "reader_pause",
            Self::TogglePlayPause => "reader_toggle_play_pause",
            Self::SetRate { .. } => "reader_set_rate",
            Self::RateUp => "reader_rate_up",
            Self::RateDown => "reader_rate_down",
            Self::Load { .. } => "reader_load",
            Self::Back => "reader_back",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: PlaybackSnapshot,
}

#[derive(Debug)]
pub struct LoadCompleted {
    pub request_id: u64,
    pub document_id: String,
    pub result: Result<TokenList, LoadError>,
}

pub struct ReaderSession {
    source: Arc<dyn DocumentWordSource>,
    navigation: Box<dyn Navigation>,
    options: SessionOptions,
    machine: PlaybackMachine,
    scheduler: Scheduler,
    fired_rx: mpsc::UnboundedReceiver<TimerFired>,
    load_tx: mpsc::UnboundedSender<LoadCompleted>,
    load_rx: mpsc::UnboundedReceiver<LoadCompleted>,
    load_request_id: u64,
    document_id: Option<String>,
    loading: bool,
    closed: bool,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
}

impl ReaderSession {
    pub fn new(
        source: Arc<dyn DocumentWordSource>,
        navigation: Box<dyn Navigation>,
        options: SessionOptions,
    ) -> Self {
        let options = SessionOptions {
            pacing: options.pacing.sanitized(),
            ..options
        };
        let machine = PlaybackMachine::new(TokenList::default(), options.initial_rate);
        let (scheduler, fired_rx) = Scheduler::new();
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(machine.snapshot(false));
        Self {
            source,
            navigation,
            options,
            machine,
            scheduler,
            fired_rx,
            load_tx,
            load_rx,
            load_request_id: 0,
            document_id: None,
            loading: false,
            closed: false,
            snapshot_tx,
        }
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.machine.snapshot(self.loading)
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Dispatch one command. After `back` the session is closed and every
    /// command only reports the current snapshot.
    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        if self.closed {
            debug!(action, "Ignoring command on a closed session");
            return SessionEvent {
                action,
                snapshot: self.snapshot(),
            };
        }
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::TogglePlayPause => {
                if self.machine.status() == PlaybackStatus::Playing {
                    self.pause();
                } else {
                    self.play();
                }
            }
            SessionCommand::SetRate { wpm } => {
                let rate = self.machine.set_rate(i64::from(wpm));
                info!(requested = wpm, wpm = rate.wpm(), "Playback rate set");
            }
            SessionCommand::RateUp => {
                let rate = self.machine.nudge_rate(true);
                info!(wpm = rate.wpm(), "Playback rate increased");
            }
            SessionCommand::RateDown => {
                let rate = self.machine.nudge_rate(false);
                info!(wpm = rate.wpm(), "Playback rate decreased");
            }
            SessionCommand::Load { document_id } => self.start_load(document_id),
            SessionCommand::Back => self.back(),
        }
        SessionEvent {
            action,
            snapshot: self.publish(),
        }
    }

    /// Handle a fire from the advance timer. Stale fires are dropped and
    /// reported as `false`.
    pub fn on_timer_fired(&mut self, fired: TimerFired) -> bool {
        if !self.scheduler.accept(fired) {
            return false;
        }
        match self.machine.advance() {
            Ok(Advance::Moved { cursor }) => {
                trace!(cursor, "Advanced to next word");
                self.arm_current_word();
            }
            Ok(Advance::Finished) => {
                info!(
                    total = self.machine.total(),
                    "Reached the end of the document"
                );
            }
            Err(err) => invariant_violation(&err),
        }
        self.publish();
        true
    }

    pub fn on_load_completed(&mut self, completed: LoadCompleted) -> bool {
        if self.closed || completed.request_id != self.load_request_id {
            debug!(
                request_id = completed.request_id,
                current_request_id = self.load_request_id,
                document_id = %completed.document_id,
                "Ignoring stale document load"
            );
            return false;
        }

        self.loading = false;
        self.scheduler.cancel();
        let rate = self.options.initial_rate;
        match completed.result {
            Ok(tokens) => {
                info!(
                    document_id = %completed.document_id,
                    words = tokens.len(),
                    wpm = rate.wpm(),
                    "Document ready"
                );
                self.machine = PlaybackMachine::new(tokens, rate);
                if self.options.autoplay {
                    self.play();
                }
            }
            Err(err) => {
                warn!(document_id = %completed.document_id, %err, "Document load failed");
                self.machine = PlaybackMachine::failed(&err, rate);
            }
        }
        self.publish();
        true
    }

    /// Stop the timer and leave playback in a resting state.
    pub fn teardown(&mut self) {
        if self.scheduler.cancel() {
            debug!("Advance timer cancelled on teardown");
        }
        self.machine.pause();
        self.publish();
    }

    /// Drive the session until `back` is received or the command channel
    /// closes. Returns the last published snapshot.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> PlaybackSnapshot {
        info!("Reader session started");
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("Command channel closed");
                        break;
                    };
                    let event = self.apply_command(command);
                    debug!(
                        action = event.action,
                        status = %event.snapshot.status,
                        cursor = event.snapshot.cursor,
                        "Applied session command"
                    );
                    if self.closed {
                        break;
                    }
                }
                Some(fired) = self.fired_rx.recv() => {
                    self.on_timer_fired(fired);
                }
                Some(completed) = self.load_rx.recv() => {
                    self.on_load_completed(completed);
                }
            }
        }
        self.teardown();
        info!("Reader session stopped");
        self.snapshot()
    }

    fn play(&mut self) {
        if self.loading {
            debug!("Ignoring play while a document is loading");
            return;
        }
        if self.machine.play() {
            info!(
                cursor = self.machine.cursor(),
                wpm = self.machine.rate().wpm(),
                "Playback started"
            );
            self.arm_current_word();
        }
    }

    fn pause(&mut self) {
        if self.machine.status() != PlaybackStatus::Playing {
            return;
        }
        self.scheduler.cancel();
        self.machine.pause();
        info!(cursor = self.machine.cursor(), "Playback paused");
    }

    fn back(&mut self) {
        self.scheduler.cancel();
        self.machine.pause();
        self.closed = true;
        info!("Leaving reader");
        self.navigation.back();
    }

    fn start_load(&mut self, document_id: String) {
        self.scheduler.cancel();
        self.load_request_id += 1;
        self.loading = true;
        self.document_id = Some(document_id.clone());
        self.machine = PlaybackMachine::new(TokenList::default(), self.options.initial_rate);

        let request_id = self.load_request_id;
        info!(request_id, document_id = %document_id, "Loading document");
        let source = Arc::clone(&self.source);
        let load_tx = self.load_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = source.load(&document_id);
            let _ = load_tx.send(LoadCompleted {
                request_id,
                document_id,
                result,
            });
        });
    }

    fn arm_current_word(&mut self) {
        let Some(delay) = self.machine.current_delay(&self.options.pacing) else {
            return;
        };
        if let Ok(generation) = self.scheduler.arm(delay) {
            trace!(
                generation,
                cursor = self.machine.cursor(),
                delay_ms = delay.as_millis() as u64,
                "Scheduled next advance"
            );
        }
    }

    fn publish(&self) -> PlaybackSnapshot {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
