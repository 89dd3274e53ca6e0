use tokio::sync::oneshot;

/// Held by a worker thread until the coordinator opens (or drops) the gate.
pub(super) struct StartGate {
    rx: oneshot::Receiver<()>,
}

impl StartGate {
    /// Blocks the calling OS thread. Returns `false` when the launch was
    /// aborted before the gate opened.
    pub(super) fn wait(self) -> bool {
        self.rx.blocking_recv().is_ok()
    }
}

pub(super) struct GateHandle {
    tx: oneshot::Sender<()>,
}

impl GateHandle {
    /// Returns `false` when the worker is no longer waiting.
    pub(super) fn open(self) -> bool {
        self.tx.send(()).is_ok()
    }
}

pub(super) fn start_gate() -> (GateHandle, StartGate) {
    let (tx, rx) = oneshot::channel();
    (GateHandle { tx }, StartGate { rx })
}
