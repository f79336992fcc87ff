//! Scan-only mode state machine and its shared manager.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::modes::{ModeCommand, ModeObserver, ModeState, NoopObserver};

//--------------------------------------------------
// ScanModeMachine (internal, wrapped by ScanModeManager)
//--------------------------------------------------

struct ScanModeMachine {
    state: ModeState,
    queue: VecDeque<ModeCommand>,
    observer: Arc<dyn ModeObserver>,
}

impl ScanModeMachine {
    fn new(observer: Arc<dyn ModeObserver>) -> Self {
        let machine = Self {
            state: ModeState::Idle,
            queue: VecDeque::new(),
            observer,
        };
        machine.enter_state();
        machine
    }

    fn current_state(&self) -> ModeState {
        self.state
    }

    fn queue_command(&mut self, command: ModeCommand) {
        self.queue.push_back(command);
    }

    fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Drain the queue, one command at a time in arrival order.
    fn process_queue(&mut self) -> usize {
        let mut count = 0;
        while let Some(command) = self.queue.pop_front() {
            self.handle(command);
            count += 1;
        }
        count
    }

    fn handle(&mut self, command: ModeCommand) {
        match self.state {
            ModeState::Idle => match command {
                ModeCommand::Start => self.transition_to(ModeState::Started),
                ModeCommand::Stop => {
                    // This should be safe to ignore.
                    log::debug!("received Stop when idle, ignoring");
                }
                other => self.unhandled(other),
            },
            ModeState::Started => match command {
                ModeCommand::Start => {
                    // Already started, ignore this command.
                }
                ModeCommand::Stop => {
                    log::debug!("stopping scan mode");
                    self.transition_to(ModeState::Idle);
                }
                other => self.unhandled(other),
            },
        }
    }

    fn unhandled(&self, command: ModeCommand) {
        log::debug!("unhandled command {:?} in state {}", command, self.state);
        self.observer.on_unhandled(self.state, &command);
    }

    fn transition_to(&mut self, next: ModeState) {
        self.exit_state();
        self.state = next;
        self.enter_state();
    }

    fn enter_state(&self) {
        log::debug!("entering {}", self.state);
        self.observer.on_enter(self.state);
    }

    fn exit_state(&self) {
        log::debug!("exiting {}", self.state);
        self.observer.on_exit(self.state);
    }
}

impl fmt::Debug for ScanModeMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanModeMachine")
            .field("state", &self.state)
            .field("queue_size", &self.queue.len())
            .finish_non_exhaustive()
    }
}

//--------------------------------------------------
// ScanModeManager (public API)
//--------------------------------------------------

/// Run-state manager interface.
#[async_trait]
pub trait ModeManager: Send + Sync {
    /// Queue a start of the mode.
    async fn start(&self);

    /// Queue a stop of the mode and synchronously run the current state's
    /// exit hook.
    async fn stop(&self);

    /// Send an arbitrary command.
    async fn send(&self, command: ModeCommand);

    /// Process all queued commands, returning how many ran.
    async fn process_queue(&self) -> usize;

    async fn current_state(&self) -> ModeState;
}

/// Thread-safe shared handle to the scan-only mode machine.
#[derive(Clone)]
pub struct ScanModeManager {
    machine: Arc<Mutex<ScanModeMachine>>,
}

impl ScanModeManager {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn ModeObserver>) -> Self {
        Self {
            machine: Arc::new(Mutex::new(ScanModeMachine::new(observer))),
        }
    }

    pub async fn queue_size(&self) -> usize {
        self.machine.lock().await.queue_size()
    }
}

impl Default for ScanModeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModeManager for ScanModeManager {
    async fn start(&self) {
        self.machine.lock().await.queue_command(ModeCommand::Start);
    }

    async fn stop(&self) {
        let mut machine = self.machine.lock().await;
        machine.queue_command(ModeCommand::Stop);
        // The exit hook runs here, before the queued Stop is dispatched:
        // teardown must not wait for the queue. The hook runs again when
        // the Stop command is processed; exit hooks are reentrant.
        machine.exit_state();
    }

    async fn send(&self, command: ModeCommand) {
        self.machine.lock().await.queue_command(command);
    }

    async fn process_queue(&self) -> usize {
        self.machine.lock().await.process_queue()
    }

    async fn current_state(&self) -> ModeState {
        self.machine.lock().await.current_state()
    }
}

impl fmt::Debug for ScanModeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanModeManager").finish_non_exhaustive()
    }
}
