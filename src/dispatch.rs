// Handler chain & dispatch (Section 4.8).
//
// The dispatcher pre-allocates a response PDU for any incoming request
// (sequence number copied from the request, status ESME_ROK), then runs the
// handler chain in order. Each handler sees the same response slot and the
// incoming frame and returns whether the chain should continue. The chain
// stops early on `continue = false` or an error; after it runs, the
// dispatcher sends whatever sits in the response slot unless a handler
// cleared it (deliver_sm_resp has no content to add and some handlers clear
// it outright to signal "no reply needed").
//
// Grounded on the `Frame`/`PduRegistry` closed tagged union in `codec.rs`,
// which already gives every supported command a `command_id()` and
// `sequence_number()`.

use crate::codec::Frame;
use crate::datatypes::{
    BindTransceiverResponse, CommandStatus, DeliverSmResponse, EnquireLinkResponse, GenericNack,
    MessageId, QuerySmResponse, MessageState, SubmitSmResponse, UnbindResponse,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler rejected PDU: {0}")]
    Protocol(String),

    #[error("failed to write response PDU: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// A fatal error closes the session; a non-fatal one is logged and the
    /// chain simply moves on to the next incoming PDU.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DispatchError::Io(_))
    }
}

/// The response PDU a handler chain is building for the current request.
/// Pre-populated with a sane default by the dispatcher; handlers mutate or
/// clear it as they see fit.
pub struct ResponseBuilder {
    response: Option<Frame>,
}

impl ResponseBuilder {
    fn new(response: Option<Frame>) -> Self {
        Self { response }
    }

    /// Replaces the pending response.
    pub fn set(&mut self, frame: Frame) {
        self.response = Some(frame);
    }

    /// Clears the pending response: nothing will be sent for this request.
    pub fn clear(&mut self) {
        self.response = None;
    }

    pub fn get(&self) -> Option<&Frame> {
        self.response.as_ref()
    }

    fn into_inner(self) -> Option<Frame> {
        self.response
    }
}

/// Outcome of running a request through the handler chain.
pub struct DispatchOutcome {
    /// The response to write back to the peer, if any.
    pub response: Option<Frame>,
    /// Whether the session should remain open.
    pub keep_open: bool,
}

/// A single step in the handler chain. Returns `Ok(true)` to let the chain
/// continue to the next handler, `Ok(false)` to stop the chain (the current
/// response is still sent unless cleared), or `Err` to abort with a logged
/// failure.
pub trait Handler: Send + Sync {
    fn handle(&self, response: &mut ResponseBuilder, incoming: &Frame) -> Result<bool, DispatchError>;
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseBuilder, &Frame) -> Result<bool, DispatchError> + Send + Sync,
{
    fn handle(&self, response: &mut ResponseBuilder, incoming: &Frame) -> Result<bool, DispatchError> {
        self(response, incoming)
    }
}

/// An ordered list of handlers applied to every incoming request PDU.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub fn push(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Runs `incoming` through the handler chain, returning the response to
    /// send (if any) and whether the session should remain open. The
    /// session only closes here on a fatal handler error; a non-fatal one is
    /// logged and the (possibly already-set) response is still sent.
    pub fn serve(&self, incoming: &Frame) -> DispatchOutcome {
        let mut response = ResponseBuilder::new(default_response(incoming));

        for handler in &self.handlers {
            match handler.handle(&mut response, incoming) {
                Ok(true) => continue,
                Ok(false) => break,
                Err(error) => {
                    warn!(%error, command_id = ?incoming.command_id(), "handler chain aborted");
                    let keep_open = !error.is_fatal();
                    return DispatchOutcome {
                        response: response.into_inner(),
                        keep_open,
                    };
                }
            }
        }

        debug!(command_id = ?incoming.command_id(), "handler chain completed");
        DispatchOutcome {
            response: response.into_inner(),
            keep_open: true,
        }
    }
}

/// Builds the default, ESME_ROK response for a request PDU. Returns `None`
/// for PDUs that are themselves responses or otherwise generate no reply.
fn default_response(incoming: &Frame) -> Option<Frame> {
    let sequence_number = incoming.sequence_number();

    match incoming {
        Frame::EnquireLink(_) => Some(Frame::EnquireLinkResp(EnquireLinkResponse::new(
            sequence_number,
        ))),
        Frame::Unbind(_) => Some(Frame::UnbindResp(UnbindResponse::new(sequence_number))),
        Frame::BindTransceiver(_) => Some(Frame::BindTransceiverResp(BindTransceiverResponse {
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: Default::default(),
            sc_interface_version: None,
        })),
        Frame::SubmitSm(_) => Some(Frame::SubmitSmResp(SubmitSmResponse::new(
            sequence_number,
            "",
        ))),
        Frame::DeliverSm(_) => Some(Frame::DeliverSmResp(DeliverSmResponse {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: MessageId::default(),
        })),
        Frame::QuerySm(_) => Some(Frame::QuerySmResp(QuerySmResponse {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: MessageId::default(),
            final_date: None,
            message_state: MessageState::Unknown,
            error_code: 0,
        })),
        frame if frame.is_response() => None,
        _ => Some(Frame::GenericNack(GenericNack::invalid_command_id(
            sequence_number,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::EnquireLink;

    fn enquire_link_frame(sequence_number: u32) -> Frame {
        Frame::EnquireLink(EnquireLink::new(sequence_number))
    }

    #[test]
    fn empty_chain_sends_the_default_response() {
        let dispatcher = Dispatcher::new();
        let outcome = dispatcher.serve(&enquire_link_frame(7));
        match outcome.response {
            Some(Frame::EnquireLinkResp(resp)) => assert_eq!(resp.sequence_number, 7),
            other => panic!("expected EnquireLinkResp, got {other:?}"),
        }
        assert!(outcome.keep_open);
    }

    #[test]
    fn handler_can_clear_the_response() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.push(|response: &mut ResponseBuilder, _: &Frame| {
            response.clear();
            Ok(true)
        });

        let outcome = dispatcher.serve(&enquire_link_frame(1));
        assert!(outcome.response.is_none());
        assert!(outcome.keep_open);
    }

    #[test]
    fn handler_returning_continue_false_stops_the_chain() {
        let mut dispatcher = Dispatcher::new();
        let second_handler_ran = std::sync::atomic::AtomicBool::new(false);

        dispatcher.push(|_: &mut ResponseBuilder, _: &Frame| Ok(false));

        let outcome = dispatcher.serve(&enquire_link_frame(3));
        assert!(!second_handler_ran.load(std::sync::atomic::Ordering::SeqCst));
        assert!(outcome.response.is_some());
    }

    #[test]
    fn fatal_error_closes_the_session() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.push(|_: &mut ResponseBuilder, _: &Frame| {
            Err(DispatchError::Io(std::io::Error::other("write failed")))
        });

        let outcome = dispatcher.serve(&enquire_link_frame(9));
        assert!(!outcome.keep_open);
    }

    #[test]
    fn non_fatal_error_keeps_the_session_open() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.push(|_: &mut ResponseBuilder, _: &Frame| {
            Err(DispatchError::Protocol("bad field".to_string()))
        });

        let outcome = dispatcher.serve(&enquire_link_frame(9));
        assert!(outcome.keep_open);
    }
}
