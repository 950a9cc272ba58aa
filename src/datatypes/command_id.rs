// ABOUTME: Defines SMPP v3.4 command identifiers per specification Table 4-1
// ABOUTME: Implements command_id field validation and response bit handling

use num_enum::TryFromPrimitive;

/// SMPP v3.4 Command Identifiers (Table 4-1)
///
/// The command_id field identifies the SMPP PDU type. Per SMPP v3.4 specification
/// Section 2.2.1, this is a 4-octet field in the PDU header.
///
/// ## Command ID Structure
/// - **Bit 31 (MSB)**: Response indicator bit
///   - 0 = Request PDU
///   - 1 = Response PDU
/// - **Bits 30-0**: Command type identifier
///
/// Only the command ids this crate implements are represented here; the rest
/// of Table 4-1 (bind_receiver/bind_transmitter, replace_sm, cancel_sm,
/// submit_multi, outbind, data_sm, alert_notification, the SMPP v5.0
/// broadcast operations) are out of scope (see spec Non-goals) and are
/// rejected as unrecognized command ids by `PduHeader::decode`.
///
/// ## References
/// - SMPP v3.4 Specification Section 2.2.1 (PDU Header Format)
/// - SMPP v3.4 Specification Table 4-1 (Command ID Definitions)
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum CommandId {
    /// generic_nack PDU (Section 4.3.1) - Error response for invalid PDUs
    GenericNack = 0x8000_0000,

    // Message Management Operations (Section 4.7-4.9)
    /// query_sm PDU (Section 4.8.1) - Query message status
    QuerySm = 0x0000_0003,
    /// query_sm_resp PDU (Section 4.8.2) - Response to query_sm
    QuerySmResp = 0x8000_0003,

    // Message Submission Operations (Section 4.4)
    /// submit_sm PDU (Section 4.4.1) - Submit short message
    SubmitSm = 0x0000_0004,
    /// submit_sm_resp PDU (Section 4.4.2) - Response to submit_sm
    SubmitSmResp = 0x8000_0004,

    // Message Delivery Operations (Section 4.6)
    /// deliver_sm PDU (Section 4.6.1) - Deliver message to ESME
    DeliverSm = 0x0000_0005,
    /// deliver_sm_resp PDU (Section 4.6.2) - Response to deliver_sm
    DeliverSmResp = 0x8000_0005,

    // Session Management Operations (Section 4.2)
    /// unbind PDU (Section 4.2.1) - Unbind from SMSC
    Unbind = 0x0000_0006,
    /// unbind_resp PDU (Section 4.2.2) - Response to unbind
    UnbindResp = 0x8000_0006,

    // Transceiver Operations (Section 4.2.5-4.2.6)
    /// bind_transceiver PDU (Section 4.2.5) - Bind as transceiver (TX+RX)
    BindTransceiver = 0x0000_0009,
    /// bind_transceiver_resp PDU (Section 4.2.6) - Response to bind_transceiver
    BindTransceiverResp = 0x8000_0009,

    // Link Management Operations (Section 4.11)
    /// enquire_link PDU (Section 4.11.1) - Link verification request
    EnquireLink = 0x0000_0015,
    /// enquire_link_resp PDU (Section 4.11.2) - Response to enquire_link
    EnquireLinkResp = 0x8000_0015,
}
