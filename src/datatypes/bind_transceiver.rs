use crate::codec::{CodecError, Decodable, Encodable, PduHeader, decode_cstring};
use crate::datatypes::interface_version::InterfaceVersion;
use crate::datatypes::numeric_plan_indicator::NumericPlanIndicator;
use crate::datatypes::tlv::Tlv;
use crate::datatypes::{
    AddressRange, CommandId, CommandStatus, Password, SystemId, SystemType, TypeOfNumber,
};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

/// BindTransceiver is used to bind a transceiver ESME to the SMSC.
/// A transceiver ESME can both send and receive messages through a single connection.
#[derive(Clone, Debug, PartialEq)]
pub struct BindTransceiver {
    // pub command_length: u32,
    // pub command_id: CommandId::BindTransceiver,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    // Body
    /// 5.2.1 system_id: This is the identification of the ESME requesting to
    ///       bind as a transceiver with the SMSC. It is a fixed length
    ///       alphanumeric field of up to 16 characters. The value may be left
    ///       justified, with trailing blanks (i.e. "abc " is valid). The
    ///       system_id may be used as a destination address for Mobile
    ///       Terminated messages originated by this ESME. The system_id may
    ///       also be used as an originating address for Mobile Originated
    ///        messages sent to this ESME.
    pub system_id: SystemId,

    /// 5.2.2 password: This is the password for authentication. It is a fixed
    ///       length string of 9 characters. If fewer than 9 characters are
    ///       supplied, it must be null padded. If no password is required by
    ///       the SMSC, a NULL (i.e. zero) password should be supplied.
    pub password: Option<Password>,

    /// 5.2.3 system_type: This is used to categorize the type of ESME that is
    ///       binding to the SMSC. Examples include "VMS" (voice mail system)
    ///       and "OTA" (over-the-air activation system). (See section 5.2.7
    ///       for a list of suggested values.) The system_type is specified as
    ///       a fixed length alphanumeric field of up to 13 characters.
    pub system_type: SystemType,

    /// 5.2.4 interface_version: Interface version level supported by the SMSC.
    pub interface_version: InterfaceVersion,

    /// 5.2.5 addr_ton: Type of Number format of the ESME address(es) served
    ///       via this SMPP.
    pub addr_ton: TypeOfNumber,

    /// 5.2.6 addr_npi: Numbering Plan Indicator of the ESME address(es) served
    ///       via this SMPP.
    pub addr_npi: NumericPlanIndicator,

    /// 5.2.7 address_range: This is used to specify a range of SME addresses
    ///       serviced by the ESME. A single address may also be specified.
    pub address_range: AddressRange,
}

#[derive(Debug, thiserror::Error)]
pub enum BindTransceiverValidationError {
    #[error("Fixed array fields are always valid - this error should not occur")]
    FixedArrayError,
}

impl BindTransceiver {
    /// Validates the BindTransceiver PDU according to SMPP v3.4 specification
    /// Fixed array fields are always valid by construction
    pub fn validate(&self) -> Result<(), BindTransceiverValidationError> {
        // Fixed-size arrays guarantee field length constraints are met
        Ok(())
    }

    /// Creates a builder for constructing BindTransceiver PDUs with validation
    pub fn builder() -> BindTransceiverBuilder {
        BindTransceiverBuilder::new()
    }
}

/// Builder for creating BindTransceiver PDUs with validation and sensible defaults
pub struct BindTransceiverBuilder {
    command_status: CommandStatus,
    sequence_number: u32,
    system_id: SystemId,
    password: Option<Password>,
    system_type: SystemType,
    interface_version: InterfaceVersion,
    addr_ton: TypeOfNumber,
    addr_npi: NumericPlanIndicator,
    address_range: AddressRange,
}

impl Default for BindTransceiverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BindTransceiverBuilder {
    pub fn new() -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 1,
            system_id: SystemId::default(),
            password: None,
            system_type: SystemType::default(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: AddressRange::default(),
        }
    }

    pub fn sequence_number(mut self, seq: u32) -> Self {
        self.sequence_number = seq;
        self
    }

    pub fn system_id(mut self, system_id: &str) -> Self {
        self.system_id = SystemId::from(system_id);
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(Password::from(password));
        self
    }

    pub fn system_type(mut self, system_type: &str) -> Self {
        self.system_type = SystemType::from(system_type);
        self
    }

    pub fn interface_version(mut self, version: InterfaceVersion) -> Self {
        self.interface_version = version;
        self
    }

    pub fn addr_ton(mut self, ton: TypeOfNumber) -> Self {
        self.addr_ton = ton;
        self
    }

    pub fn addr_npi(mut self, npi: NumericPlanIndicator) -> Self {
        self.addr_npi = npi;
        self
    }

    pub fn address_range(mut self, range: &str) -> Self {
        self.address_range = AddressRange::from(range);
        self
    }

    /// Build the BindTransceiver, performing validation
    pub fn build(self) -> Result<BindTransceiver, BindTransceiverValidationError> {
        let bind_transceiver = BindTransceiver {
            command_status: self.command_status,
            sequence_number: self.sequence_number,
            system_id: self.system_id,
            password: self.password,
            system_type: self.system_type,
            interface_version: self.interface_version,
            addr_ton: self.addr_ton,
            addr_npi: self.addr_npi,
            address_range: self.address_range,
        };

        // Validate before returning
        bind_transceiver.validate()?;
        Ok(bind_transceiver)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BindTransceiverResponse {
    // pub command_length: u32,
    // pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    // body
    pub system_id: SystemId,
    pub sc_interface_version: Option<Tlv>,
}

impl Encodable for BindTransceiver {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        // Fixed arrays are always valid by construction
        let system_id = self.system_id.as_ref();
        let password = self.password.as_ref().map(|p| p.as_ref());
        let system_type = self.system_type.as_ref();
        let address_range = self.address_range.as_ref();

        let body_len = 7
            + system_id.len()
            + 1
            + password.map_or(0, |p| p.len())
            + 1
            + system_type.len()
            + 1
            + address_range.len()
            + 1;
        let length = PduHeader::SIZE + body_len;

        let header = PduHeader {
            command_length: length as u32,
            command_id: CommandId::BindTransceiver,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        };
        header.encode(buf)?;

        buf.put(system_id);
        buf.put_u8(b'\0');

        if let Some(password) = password {
            buf.put(password);
        }
        buf.put_u8(b'\0');

        buf.put(system_type);
        buf.put_u8(b'\0');

        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton as u8);
        buf.put_u8(self.addr_npi as u8);

        buf.put(address_range);
        buf.put_u8(b'\0');

        Ok(())
    }
}

impl Decodable for BindTransceiver {
    fn command_id() -> CommandId {
        CommandId::BindTransceiver
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let system_id_str = decode_cstring(buf, 16, "system_id")?;
        let system_id = SystemId::try_from(system_id_str).map_err(|e| CodecError::FieldValidation {
            field: "system_id",
            reason: format!("{e}"),
        })?;

        let password_str = decode_cstring(buf, 9, "password")?;
        let password = if password_str.is_empty() {
            None
        } else {
            Some(
                Password::try_from(password_str).map_err(|e| CodecError::FieldValidation {
                    field: "password",
                    reason: format!("{e}"),
                })?,
            )
        };

        let system_type_str = decode_cstring(buf, 13, "system_type")?;
        let system_type =
            SystemType::try_from(system_type_str).map_err(|e| CodecError::FieldValidation {
                field: "system_type",
                reason: format!("{e}"),
            })?;

        if buf.remaining() < 3 {
            return Err(CodecError::Incomplete);
        }
        let interface_version =
            InterfaceVersion::try_from(buf.get_u8()).map_err(|_| CodecError::FieldValidation {
                field: "interface_version",
                reason: "unrecognized interface_version byte".to_string(),
            })?;
        let addr_ton = TypeOfNumber::try_from(buf.get_u8()).map_err(|_| {
            CodecError::FieldValidation {
                field: "addr_ton",
                reason: "unrecognized addr_ton byte".to_string(),
            }
        })?;
        let addr_npi = NumericPlanIndicator::try_from(buf.get_u8()).map_err(|_| {
            CodecError::FieldValidation {
                field: "addr_npi",
                reason: "unrecognized addr_npi byte".to_string(),
            }
        })?;

        let address_range_str = decode_cstring(buf, 41, "address_range")?;
        let address_range = AddressRange::try_from(address_range_str).map_err(|e| {
            CodecError::FieldValidation {
                field: "address_range",
                reason: format!("{e}"),
            }
        })?;

        Ok(BindTransceiver {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

impl Encodable for BindTransceiverResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let system_id = self.system_id.as_ref();

        let mut body_len = system_id.len() + 1;
        if let Some(ref tlv) = self.sc_interface_version {
            body_len += tlv.encoded_size();
        }
        let length = PduHeader::SIZE + body_len;

        let header = PduHeader {
            command_length: length as u32,
            command_id: CommandId::BindTransceiverResp,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        };
        header.encode(buf)?;

        buf.put(system_id);
        buf.put_u8(b'\0');

        if let Some(ref tlv) = self.sc_interface_version {
            tlv.encode(buf)?;
        }

        Ok(())
    }
}

impl Decodable for BindTransceiverResponse {
    fn command_id() -> CommandId {
        CommandId::BindTransceiverResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let system_id_str = decode_cstring(buf, 16, "system_id")?;
        let system_id = SystemId::try_from(system_id_str).map_err(|e| CodecError::FieldValidation {
            field: "system_id",
            reason: format!("{e}"),
        })?;

        let sc_interface_version = if buf.has_remaining() {
            Some(Tlv::decode(buf)?)
        } else {
            None
        };

        Ok(BindTransceiverResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            sc_interface_version,
        })
    }
}
