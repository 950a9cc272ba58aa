use crate::datatypes::CommandStatus;
use crate::macros::impl_complete_header_only_pdu;

/// The purpose of the SMPP enquire_link operation is to provide a
/// confidence-check of the communication path between an ESME and an SMSC.
/// On receipt of this request the receiving party should respond with an
/// enquire_link_resp, thus confirming that the application level connection
/// between the SMSC and the ESME is functioning.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLink {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(EnquireLink, crate::datatypes::CommandId::EnquireLink);
impl_complete_header_only_pdu!(
    EnquireLinkResponse,
    crate::datatypes::CommandId::EnquireLinkResp
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Decodable, Encodable, PduHeader};
    use std::io::Cursor;

    #[test]
    fn enquire_link_encode_decode_roundtrip() {
        let original = EnquireLink::new(42);
        let bytes = original.to_bytes();

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = EnquireLink::decode(header, &mut cursor).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn enquire_link_response_encode_decode_roundtrip() {
        let original = EnquireLinkResponse::new(7);
        let bytes = original.to_bytes();

        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = EnquireLinkResponse::decode(header, &mut cursor).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn enquire_link_response_error_status() {
        let resp = EnquireLinkResponse::error(9, CommandStatus::SystemError);
        assert_eq!(resp.command_status, CommandStatus::SystemError);

        let bytes = resp.to_bytes();
        let mut cursor = Cursor::new(bytes.as_ref());
        let header = PduHeader::decode(&mut cursor).unwrap();
        let decoded = EnquireLinkResponse::decode(header, &mut cursor).unwrap();
        assert_eq!(resp, decoded);
    }

    #[test]
    fn enquire_link_has_no_body() {
        let enquire_link = EnquireLink::new(1);
        let bytes = enquire_link.to_bytes();
        assert_eq!(bytes.len(), PduHeader::SIZE);
    }
}
