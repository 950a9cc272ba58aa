// Session state machine (Section 4.6).
//
// A session starts CLOSED, moves to CONNECTED once the transport is up, to
// AUTHOK once a bind_transceiver exchange succeeds, and back to CLOSED on
// unbind or any transport failure. The state is shared between the
// connection's read/write tasks and the keep-alive watchdog, so it is held
// behind a single atomic rather than a mutex, following the lock-free style
// `seq::SequenceAllocator` already uses for shared counters.

use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Closed = 0,
    Connected = 1,
    AuthOk = 2,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Closed,
            1 => SessionState::Connected,
            2 => SessionState::AuthOk,
            other => unreachable!("invalid session state byte {other}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("operation '{operation}' is not valid in session state {state:?}")]
pub struct SessionStateError {
    pub operation: &'static str,
    pub state: SessionState,
}

/// Tracks where a session sits in the CLOSED -> CONNECTED -> AUTHOK -> CLOSED
/// lifecycle and rejects operations the current state doesn't permit.
#[derive(Debug)]
pub struct Session {
    state: AtomicU8,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(SessionState::Closed as u8),
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Transport connected: CLOSED -> CONNECTED.
    pub fn on_connect(&self) -> Result<(), SessionStateError> {
        self.require(SessionState::Closed, "connect")?;
        self.set(SessionState::Connected);
        Ok(())
    }

    /// A bind_transceiver_resp carrying ESME_ROK arrived: CONNECTED -> AUTHOK.
    pub fn on_bind_success(&self) -> Result<(), SessionStateError> {
        self.require(SessionState::Connected, "bind success")?;
        self.set(SessionState::AuthOk);
        Ok(())
    }

    /// A bind_transceiver_resp carrying an error status arrived; the
    /// connection stays open but unauthenticated, so the state does not
    /// advance and the caller is expected to close the transport.
    pub fn on_bind_failure(&self) -> Result<(), SessionStateError> {
        self.require(SessionState::Connected, "bind failure")?;
        Ok(())
    }

    /// unbind initiated or acknowledged: AUTHOK -> CLOSED.
    pub fn on_unbind(&self) -> Result<(), SessionStateError> {
        self.require(SessionState::AuthOk, "unbind")?;
        self.set(SessionState::Closed);
        Ok(())
    }

    /// Transport dropped unexpectedly; valid from any state.
    pub fn on_transport_error(&self) {
        self.set(SessionState::Closed);
    }

    /// Returns `Ok(())` only if the session is bound (AUTHOK), the state
    /// required to submit, deliver, or query messages.
    pub fn require_auth_ok(&self, operation: &'static str) -> Result<(), SessionStateError> {
        self.require(SessionState::AuthOk, operation)
    }

    fn require(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), SessionStateError> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(SessionStateError { operation, state })
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_through_every_state() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Closed);

        session.on_connect().unwrap();
        assert_eq!(session.state(), SessionState::Connected);

        session.on_bind_success().unwrap();
        assert_eq!(session.state(), SessionState::AuthOk);

        session.on_unbind().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn bind_failure_leaves_state_unchanged() {
        let session = Session::new();
        session.on_connect().unwrap();
        session.on_bind_failure().unwrap();
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn submit_is_rejected_before_bind_completes() {
        let session = Session::new();
        session.on_connect().unwrap();
        let err = session.require_auth_ok("submit_sm").unwrap_err();
        assert_eq!(err.state, SessionState::Connected);
        assert_eq!(err.operation, "submit_sm");
    }

    #[test]
    fn double_connect_is_rejected() {
        let session = Session::new();
        session.on_connect().unwrap();
        assert!(session.on_connect().is_err());
    }

    #[test]
    fn transport_error_forces_closed_from_any_state() {
        let session = Session::new();
        session.on_connect().unwrap();
        session.on_bind_success().unwrap();
        session.on_transport_error();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn unbind_requires_auth_ok() {
        let session = Session::new();
        session.on_connect().unwrap();
        assert!(session.on_unbind().is_err());
    }
}
