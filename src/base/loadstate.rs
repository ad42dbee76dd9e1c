/// The externally observable state of a single request.
///
/// One request moves `Created → InFlight → ReceivingHeaders →
/// StreamingBody → Complete`. `Failed` is reachable from `InFlight`
/// (connect/timeout errors) and from `StreamingBody` (mid-stream
/// errors). `Complete` and `Failed` are terminal and mutually
/// exclusive; no retries happen at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Constructed but not yet executed.
    #[default]
    Created,

    /// Handed to the transport; no response head yet.
    InFlight,

    /// Response head arrived; cookies and metadata being captured.
    ReceivingHeaders,

    /// Body chunks are being accumulated.
    StreamingBody,

    /// The completion record was produced.
    Complete,

    /// A transport-level error was surfaced.
    Failed,
}

impl LoadState {
    /// True once the request can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Complete | LoadState::Failed)
    }
}
