use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, cstring_encoded_len, decode_cstring, decode_u8,
    encode_cstring, encode_u8,
};
use crate::datatypes::numeric_plan_indicator::NumericPlanIndicator;
use crate::datatypes::tags;
use crate::datatypes::tlv::Tlv;
use crate::datatypes::{
    CommandId, CommandStatus, DataCoding, DestinationAddr, EsmClass, MessageId,
    ScheduleDeliveryTime, ServiceType, ShortMessage, SourceAddr, TypeOfNumber, ValidityPeriod,
};
use bytes::{Buf, BytesMut};
use std::io::Cursor;

/// This operation is used by an ESME to submit a short message to the SMSC for onward
/// transmission to a specified short message entity (SME). The submit_sm PDU does not
/// support the transaction message mode.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    // pub command_length: u32,
    // pub command_id: CommandId::SubmitSm,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    // Mandatory parameters
    /// 4.3.1 service_type: SMS application service associated with the message.
    pub service_type: ServiceType,

    /// 4.3.2 source_addr_ton: Type of Number for source address.
    pub source_addr_ton: TypeOfNumber,

    /// 4.3.3 source_addr_npi: Numbering Plan Indicator for source address.
    pub source_addr_npi: NumericPlanIndicator,

    /// 4.3.4 source_addr: Address of SME originating this message.
    pub source_addr: SourceAddr,

    /// 4.3.5 dest_addr_ton: Type of Number for destination address.
    pub dest_addr_ton: TypeOfNumber,

    /// 4.3.6 dest_addr_npi: Numbering Plan Indicator for destination address.
    pub dest_addr_npi: NumericPlanIndicator,

    /// 4.3.7 destination_addr: Destination address of this short message.
    pub destination_addr: DestinationAddr,

    /// 4.3.8 esm_class: Message Mode and Message Type, including the UDH flag used
    ///       by segmentation.
    pub esm_class: EsmClass,

    /// 4.3.9 protocol_id: Protocol Identifier. Network specific field.
    pub protocol_id: u8,

    /// 4.3.10 priority_flag: Priority level of the message, Level 0 (lowest) to
    ///        Level 3 (highest).
    pub priority_flag: u8,

    /// 4.3.11 schedule_delivery_time: scheduled delivery time, or NULL for immediate
    ///        delivery.
    pub schedule_delivery_time: ScheduleDeliveryTime,

    /// 4.3.12 validity_period: expiry of the message, or NULL for the SMSC default.
    pub validity_period: ValidityPeriod,

    /// 4.3.13 registered_delivery: whether an SMSC delivery receipt or intermediate
    ///        notification is requested.
    pub registered_delivery: u8,

    /// 4.3.14 replace_if_present_flag: replace a previously submitted message.
    pub replace_if_present_flag: u8,

    /// 4.3.15 data_coding: encoding scheme of the short message user data.
    pub data_coding: DataCoding,

    /// 4.3.16 sm_default_msg_id: index of a predefined SMSC message, or 0.
    pub sm_default_msg_id: u8,

    /// 4.3.17 sm_length: length in octets of short_message. Range 0-254.
    pub sm_length: u8,

    /// 4.3.18 short_message: up to 254 octets of user data. When message_payload is
    ///        used instead, this is empty and sm_length is 0.
    pub short_message: ShortMessage,

    // Optional parameters (TLV format)
    /// User Message Reference TLV (0x0204): ESME assigned reference number.
    pub user_message_reference: Option<Tlv>,

    /// Source Port TLV (0x020A): application port of the source address.
    pub source_port: Option<Tlv>,

    /// Destination Port TLV (0x020B): application port of the destination address.
    pub destination_port: Option<Tlv>,

    /// SAR Message Reference Number TLV (0x020C): reference for one concatenated
    /// message. Written by the segmentation layer; all segments of one original
    /// message share the same value.
    pub sar_msg_ref_num: Option<Tlv>,

    /// SAR Total Segments TLV (0x020E): total number of segments of the concatenated
    /// message.
    pub sar_total_segments: Option<Tlv>,

    /// SAR Segment Sequence Number TLV (0x020F): 1-based position of this segment.
    pub sar_segment_seqnum: Option<Tlv>,

    /// More Messages To Send TLV (0x0426): indicates more messages are queued for the
    /// same destination.
    pub more_messages_to_send: Option<Tlv>,

    /// Payload Type TLV (0x0019): defines the type of payload carried by
    /// message_payload.
    pub payload_type: Option<Tlv>,

    /// Message Payload TLV (0x0424): extended short message user data; must not be
    /// specified together with short_message/sm_length.
    pub message_payload: Option<Tlv>,

    /// Privacy Indicator TLV (0x0201): privacy level associated with the message.
    pub privacy_indicator: Option<Tlv>,

    /// Callback Number TLV (0x0381): callback number associated with the message.
    pub callback_num: Option<Tlv>,

    /// Callback Number Presentation Indicator TLV (0x0302).
    pub callback_num_pres_ind: Option<Tlv>,

    /// Callback Number Associated Tag TLV (0x0303).
    pub callback_num_atag: Option<Tlv>,

    /// Source Subaddress TLV (0x0202): subaddress of the message originator.
    pub source_subaddress: Option<Tlv>,

    /// Destination Subaddress TLV (0x0203): subaddress of the message destination.
    pub dest_subaddress: Option<Tlv>,

    /// Display Time TLV (0x1201): requests a display time for the message on the
    /// handset.
    pub display_time: Option<Tlv>,

    /// SMS Signal TLV (0x1203): alert signal tone.
    pub sms_signal: Option<Tlv>,

    /// MS Validity TLV (0x1204): validity information for the Mobile Station.
    pub ms_validity: Option<Tlv>,

    /// MS Message Wait Facilities TLV (0x1205): message waiting indicator.
    pub ms_msg_wait_facilities: Option<Tlv>,

    /// Number of Messages TLV (0x0205): count of messages in a mailbox, used for
    /// voicemail-style notifications.
    pub number_of_messages: Option<Tlv>,

    /// Alert on Message Delivery TLV (0x130C): requests a handset alert on delivery.
    pub alert_on_msg_delivery: Option<Tlv>,

    /// Language Indicator TLV (0x020D): language of the short message.
    pub language_indicator: Option<Tlv>,

    /// ITS Reply Type TLV (0x1380): Interactive Teleservice reply method.
    pub its_reply_type: Option<Tlv>,

    /// ITS Session Info TLV (0x1383): Interactive Teleservice session control info.
    pub its_session_info: Option<Tlv>,

    /// User Data Header TLV (0x0005): raw UDH, set by the segmentation layer when
    /// esm_class carries the UDH flag.
    pub user_data_header: Option<Tlv>,

    /// USSD Service Op TLV (0x0501): USSD service operation code.
    pub ussd_service_op: Option<Tlv>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitSmValidationError {
    #[error("sm_length ({sm_length}) does not match short_message length ({message_length})")]
    SmLengthMismatch {
        sm_length: u8,
        message_length: usize,
    },

    #[error("Cannot use both short_message and message_payload - they are mutually exclusive")]
    MutualExclusivityViolation,
}

impl SubmitSm {
    /// Validates the SubmitSm PDU according to SMPP v3.4 specification.
    pub fn validate(&self) -> Result<(), SubmitSmValidationError> {
        if self.sm_length as usize != self.short_message.len() as usize {
            return Err(SubmitSmValidationError::SmLengthMismatch {
                sm_length: self.sm_length,
                message_length: self.short_message.len() as usize,
            });
        }

        if !self.short_message.is_empty() && self.message_payload.is_some() {
            return Err(SubmitSmValidationError::MutualExclusivityViolation);
        }

        Ok(())
    }

    /// Creates a builder for constructing SubmitSm PDUs with validation.
    pub fn builder() -> SubmitSmBuilder {
        SubmitSmBuilder::new()
    }
}

/// Builder for creating SubmitSm PDUs with validation and sensible defaults.
pub struct SubmitSmBuilder {
    command_status: CommandStatus,
    sequence_number: u32,
    service_type: ServiceType,
    source_addr_ton: TypeOfNumber,
    source_addr_npi: NumericPlanIndicator,
    source_addr: SourceAddr,
    dest_addr_ton: TypeOfNumber,
    dest_addr_npi: NumericPlanIndicator,
    destination_addr: DestinationAddr,
    esm_class: EsmClass,
    protocol_id: u8,
    priority_flag: u8,
    schedule_delivery_time: ScheduleDeliveryTime,
    validity_period: ValidityPeriod,
    registered_delivery: u8,
    replace_if_present_flag: u8,
    data_coding: DataCoding,
    sm_default_msg_id: u8,
    short_message: ShortMessage,
    sm_length: u8,
    user_message_reference: Option<Tlv>,
    source_port: Option<Tlv>,
    destination_port: Option<Tlv>,
    sar_msg_ref_num: Option<Tlv>,
    sar_total_segments: Option<Tlv>,
    sar_segment_seqnum: Option<Tlv>,
    more_messages_to_send: Option<Tlv>,
    payload_type: Option<Tlv>,
    message_payload: Option<Tlv>,
    privacy_indicator: Option<Tlv>,
    callback_num: Option<Tlv>,
    callback_num_pres_ind: Option<Tlv>,
    callback_num_atag: Option<Tlv>,
    source_subaddress: Option<Tlv>,
    dest_subaddress: Option<Tlv>,
    display_time: Option<Tlv>,
    sms_signal: Option<Tlv>,
    ms_validity: Option<Tlv>,
    ms_msg_wait_facilities: Option<Tlv>,
    number_of_messages: Option<Tlv>,
    alert_on_msg_delivery: Option<Tlv>,
    language_indicator: Option<Tlv>,
    its_reply_type: Option<Tlv>,
    its_session_info: Option<Tlv>,
    user_data_header: Option<Tlv>,
    ussd_service_op: Option<Tlv>,
}

impl Default for SubmitSmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitSmBuilder {
    pub fn new() -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number: 1,
            service_type: ServiceType::default(),
            source_addr_ton: TypeOfNumber::Unknown,
            source_addr_npi: NumericPlanIndicator::Unknown,
            source_addr: SourceAddr::default(),
            dest_addr_ton: TypeOfNumber::Unknown,
            dest_addr_npi: NumericPlanIndicator::Unknown,
            destination_addr: DestinationAddr::default(),
            esm_class: EsmClass::default(),
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: ScheduleDeliveryTime::default(),
            validity_period: ValidityPeriod::default(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: DataCoding::default(),
            sm_default_msg_id: 0,
            short_message: ShortMessage::default(),
            sm_length: 0,
            user_message_reference: None,
            source_port: None,
            destination_port: None,
            sar_msg_ref_num: None,
            sar_total_segments: None,
            sar_segment_seqnum: None,
            more_messages_to_send: None,
            payload_type: None,
            message_payload: None,
            privacy_indicator: None,
            callback_num: None,
            callback_num_pres_ind: None,
            callback_num_atag: None,
            source_subaddress: None,
            dest_subaddress: None,
            display_time: None,
            sms_signal: None,
            ms_validity: None,
            ms_msg_wait_facilities: None,
            number_of_messages: None,
            alert_on_msg_delivery: None,
            language_indicator: None,
            its_reply_type: None,
            its_session_info: None,
            user_data_header: None,
            ussd_service_op: None,
        }
    }

    pub fn sequence_number(mut self, seq: u32) -> Self {
        self.sequence_number = seq;
        self
    }

    pub fn service_type(mut self, service_type: &str) -> Self {
        self.service_type = ServiceType::from(service_type);
        self
    }

    pub fn source_addr(mut self, addr: &str) -> Self {
        self.source_addr = SourceAddr::new(addr, TypeOfNumber::Unknown).unwrap_or_default();
        self
    }

    pub fn destination_addr(mut self, addr: &str) -> Self {
        self.destination_addr =
            DestinationAddr::new(addr, TypeOfNumber::Unknown).unwrap_or_default();
        self
    }

    pub fn source_addr_ton(mut self, ton: TypeOfNumber) -> Self {
        self.source_addr_ton = ton;
        self
    }

    pub fn source_addr_npi(mut self, npi: NumericPlanIndicator) -> Self {
        self.source_addr_npi = npi;
        self
    }

    pub fn dest_addr_ton(mut self, ton: TypeOfNumber) -> Self {
        self.dest_addr_ton = ton;
        self
    }

    pub fn dest_addr_npi(mut self, npi: NumericPlanIndicator) -> Self {
        self.dest_addr_npi = npi;
        self
    }

    pub fn short_message(mut self, message: &str) -> Self {
        self.short_message = ShortMessage::from(message);
        self
    }

    pub fn esm_class(mut self, esm_class: EsmClass) -> Self {
        self.esm_class = esm_class;
        self
    }

    pub fn data_coding(mut self, data_coding: DataCoding) -> Self {
        self.data_coding = data_coding;
        self
    }

    pub fn priority_flag(mut self, priority_flag: u8) -> Self {
        self.priority_flag = priority_flag;
        self
    }

    pub fn registered_delivery(mut self, registered_delivery: u8) -> Self {
        self.registered_delivery = registered_delivery;
        self
    }

    pub fn sar_msg_ref_num(mut self, tlv: Tlv) -> Self {
        self.sar_msg_ref_num = Some(tlv);
        self
    }

    pub fn sar_total_segments(mut self, tlv: Tlv) -> Self {
        self.sar_total_segments = Some(tlv);
        self
    }

    pub fn sar_segment_seqnum(mut self, tlv: Tlv) -> Self {
        self.sar_segment_seqnum = Some(tlv);
        self
    }

    pub fn user_data_header(mut self, tlv: Tlv) -> Self {
        self.user_data_header = Some(tlv);
        self
    }

    pub fn message_payload(mut self, tlv: Tlv) -> Self {
        self.message_payload = Some(tlv);
        self
    }

    /// Builds the SubmitSm, performing validation and calculating sm_length automatically.
    pub fn build(mut self) -> Result<SubmitSm, SubmitSmValidationError> {
        self.sm_length = self.short_message.len();

        let submit_sm = SubmitSm {
            command_status: self.command_status,
            sequence_number: self.sequence_number,
            service_type: self.service_type,
            source_addr_ton: self.source_addr_ton,
            source_addr_npi: self.source_addr_npi,
            source_addr: self.source_addr,
            dest_addr_ton: self.dest_addr_ton,
            dest_addr_npi: self.dest_addr_npi,
            destination_addr: self.destination_addr,
            esm_class: self.esm_class,
            protocol_id: self.protocol_id,
            priority_flag: self.priority_flag,
            schedule_delivery_time: self.schedule_delivery_time,
            validity_period: self.validity_period,
            registered_delivery: self.registered_delivery,
            replace_if_present_flag: self.replace_if_present_flag,
            data_coding: self.data_coding,
            sm_default_msg_id: self.sm_default_msg_id,
            sm_length: self.sm_length,
            short_message: self.short_message,
            user_message_reference: self.user_message_reference,
            source_port: self.source_port,
            destination_port: self.destination_port,
            sar_msg_ref_num: self.sar_msg_ref_num,
            sar_total_segments: self.sar_total_segments,
            sar_segment_seqnum: self.sar_segment_seqnum,
            more_messages_to_send: self.more_messages_to_send,
            payload_type: self.payload_type,
            message_payload: self.message_payload,
            privacy_indicator: self.privacy_indicator,
            callback_num: self.callback_num,
            callback_num_pres_ind: self.callback_num_pres_ind,
            callback_num_atag: self.callback_num_atag,
            source_subaddress: self.source_subaddress,
            dest_subaddress: self.dest_subaddress,
            display_time: self.display_time,
            sms_signal: self.sms_signal,
            ms_validity: self.ms_validity,
            ms_msg_wait_facilities: self.ms_msg_wait_facilities,
            number_of_messages: self.number_of_messages,
            alert_on_msg_delivery: self.alert_on_msg_delivery,
            language_indicator: self.language_indicator,
            its_reply_type: self.its_reply_type,
            its_session_info: self.its_session_info,
            user_data_header: self.user_data_header,
            ussd_service_op: self.ussd_service_op,
        };

        submit_sm.validate()?;
        Ok(submit_sm)
    }
}

/// The submit_sm_resp PDU is the response to a submit_sm request, carrying the
/// SMSC-assigned message identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    // pub command_length: u32,
    // pub command_id: CommandId::SubmitSmResp,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// 4.4.1 message_id: SMSC assigned message identifier, opaque, up to 65 octets
    /// including the NUL terminator. Empty when command_status is non-zero.
    pub message_id: MessageId,
}

impl SubmitSmResponse {
    pub fn new(sequence_number: u32, message_id: &str) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: MessageId::from(message_id),
        }
    }

    pub fn error(sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            sequence_number,
            message_id: MessageId::from(""),
        }
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        self.validate().map_err(|e| CodecError::FieldValidation {
            field: "submit_sm",
            reason: e.to_string(),
        })?;

        let header = PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSm,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        };
        header.encode(buf)?;

        encode_cstring(buf, self.service_type.as_str(), 6);
        encode_u8(buf, self.source_addr_ton as u8);
        encode_u8(buf, self.source_addr_npi as u8);
        encode_cstring(buf, self.source_addr.as_str().unwrap_or(""), 21);
        encode_u8(buf, self.dest_addr_ton as u8);
        encode_u8(buf, self.dest_addr_npi as u8);
        encode_cstring(buf, self.destination_addr.as_str().unwrap_or(""), 21);
        encode_u8(buf, self.esm_class.to_byte());
        encode_u8(buf, self.protocol_id);
        encode_u8(buf, self.priority_flag);
        encode_cstring(buf, self.schedule_delivery_time.as_str().unwrap_or(""), 17);
        encode_cstring(buf, self.validity_period.as_str().unwrap_or(""), 17);
        encode_u8(buf, self.registered_delivery);
        encode_u8(buf, self.replace_if_present_flag);
        encode_u8(buf, self.data_coding.to_byte());
        encode_u8(buf, self.sm_default_msg_id);
        encode_u8(buf, self.sm_length);

        let message_bytes = self.short_message.as_bytes();
        buf.extend_from_slice(&message_bytes[..(self.sm_length as usize).min(message_bytes.len())]);

        for tlv in self.tlvs() {
            tlv.encode(buf)?;
        }

        Ok(())
    }

    fn encoded_size(&self) -> usize {
        let mut size = PduHeader::SIZE;
        size += cstring_encoded_len(self.service_type.as_str(), 6);
        size += 2; // source_addr_ton, source_addr_npi
        size += cstring_encoded_len(self.source_addr.as_str().unwrap_or(""), 21);
        size += 2; // dest_addr_ton, dest_addr_npi
        size += cstring_encoded_len(self.destination_addr.as_str().unwrap_or(""), 21);
        size += 3; // esm_class, protocol_id, priority_flag
        size += cstring_encoded_len(self.schedule_delivery_time.as_str().unwrap_or(""), 17);
        size += cstring_encoded_len(self.validity_period.as_str().unwrap_or(""), 17);
        size += 5; // registered_delivery, replace_if_present_flag, data_coding, sm_default_msg_id, sm_length
        size += self.sm_length as usize;
        for tlv in self.tlvs() {
            size += tlv.encoded_size();
        }
        size
    }
}

impl SubmitSm {
    /// Returns the populated optional TLVs in wire order, for encoding/size
    /// calculation.
    fn tlvs(&self) -> impl Iterator<Item = &Tlv> {
        [
            &self.user_message_reference,
            &self.source_port,
            &self.destination_port,
            &self.sar_msg_ref_num,
            &self.sar_total_segments,
            &self.sar_segment_seqnum,
            &self.more_messages_to_send,
            &self.payload_type,
            &self.message_payload,
            &self.privacy_indicator,
            &self.callback_num,
            &self.callback_num_pres_ind,
            &self.callback_num_atag,
            &self.source_subaddress,
            &self.dest_subaddress,
            &self.display_time,
            &self.sms_signal,
            &self.ms_validity,
            &self.ms_msg_wait_facilities,
            &self.number_of_messages,
            &self.alert_on_msg_delivery,
            &self.language_indicator,
            &self.its_reply_type,
            &self.its_session_info,
            &self.user_data_header,
            &self.ussd_service_op,
        ]
        .into_iter()
        .filter_map(|opt| opt.as_ref())
    }
}

impl Decodable for SubmitSm {
    fn command_id() -> CommandId {
        CommandId::SubmitSm
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = ServiceType::from(decode_cstring(buf, 6, "service_type")?.as_str());
        let source_addr_ton = TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "source_addr_ton",
                reason: "unrecognized source_addr_ton byte".to_string(),
            }
        })?;
        let source_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "source_addr_npi",
                reason: "unrecognized source_addr_npi byte".to_string(),
            }
        })?;
        let source_addr_str = decode_cstring(buf, 21, "source_addr")?;
        let source_addr = SourceAddr::new(&source_addr_str, source_addr_ton).map_err(|e| {
            CodecError::FieldValidation {
                field: "source_addr",
                reason: format!("{e}"),
            }
        })?;

        let dest_addr_ton = TypeOfNumber::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "dest_addr_ton",
                reason: "unrecognized dest_addr_ton byte".to_string(),
            }
        })?;
        let dest_addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).map_err(|_| {
            CodecError::FieldValidation {
                field: "dest_addr_npi",
                reason: "unrecognized dest_addr_npi byte".to_string(),
            }
        })?;
        let destination_addr_str = decode_cstring(buf, 21, "destination_addr")?;
        let destination_addr = DestinationAddr::new(&destination_addr_str, dest_addr_ton)
            .map_err(|e| CodecError::FieldValidation {
                field: "destination_addr",
                reason: format!("{e}"),
            })?;

        let esm_class = EsmClass::from(decode_u8(buf)?);
        let protocol_id = decode_u8(buf)?;
        let priority_flag = decode_u8(buf)?;
        let schedule_delivery_time =
            ScheduleDeliveryTime::from(decode_cstring(buf, 17, "schedule_delivery_time")?.as_str());
        let validity_period =
            ValidityPeriod::from(decode_cstring(buf, 17, "validity_period")?.as_str());
        let registered_delivery = decode_u8(buf)?;
        let replace_if_present_flag = decode_u8(buf)?;
        let data_coding = DataCoding::from_byte(decode_u8(buf)?);
        let sm_default_msg_id = decode_u8(buf)?;
        let sm_length = decode_u8(buf)?;

        if buf.remaining() < sm_length as usize {
            return Err(CodecError::Incomplete);
        }
        let message_bytes = buf.copy_to_bytes(sm_length as usize);
        let short_message =
            ShortMessage::try_from(String::from_utf8_lossy(&message_bytes).into_owned())
                .map_err(|e| CodecError::FieldValidation {
                    field: "short_message",
                    reason: format!("{e}"),
                })?;

        let mut submit_sm = SubmitSm {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            sm_length,
            short_message,
            user_message_reference: None,
            source_port: None,
            destination_port: None,
            sar_msg_ref_num: None,
            sar_total_segments: None,
            sar_segment_seqnum: None,
            more_messages_to_send: None,
            payload_type: None,
            message_payload: None,
            privacy_indicator: None,
            callback_num: None,
            callback_num_pres_ind: None,
            callback_num_atag: None,
            source_subaddress: None,
            dest_subaddress: None,
            display_time: None,
            sms_signal: None,
            ms_validity: None,
            ms_msg_wait_facilities: None,
            number_of_messages: None,
            alert_on_msg_delivery: None,
            language_indicator: None,
            its_reply_type: None,
            its_session_info: None,
            user_data_header: None,
            ussd_service_op: None,
        };

        while buf.has_remaining() {
            let tlv = Tlv::decode(buf)?;
            match tlv.tag {
                tags::USER_MESSAGE_REFERENCE => submit_sm.user_message_reference = Some(tlv),
                tags::SOURCE_PORT => submit_sm.source_port = Some(tlv),
                tags::DESTINATION_PORT => submit_sm.destination_port = Some(tlv),
                tags::SAR_MSG_REF_NUM => submit_sm.sar_msg_ref_num = Some(tlv),
                tags::SAR_TOTAL_SEGMENTS => submit_sm.sar_total_segments = Some(tlv),
                tags::SAR_SEGMENT_SEQNUM => submit_sm.sar_segment_seqnum = Some(tlv),
                tags::MORE_MESSAGES_TO_SEND => submit_sm.more_messages_to_send = Some(tlv),
                tags::PAYLOAD_TYPE => submit_sm.payload_type = Some(tlv),
                tags::MESSAGE_PAYLOAD => submit_sm.message_payload = Some(tlv),
                tags::PRIVACY_INDICATOR => submit_sm.privacy_indicator = Some(tlv),
                tags::CALLBACK_NUM => submit_sm.callback_num = Some(tlv),
                tags::CALLBACK_NUM_PRES_IND => submit_sm.callback_num_pres_ind = Some(tlv),
                tags::CALLBACK_NUM_ATAG => submit_sm.callback_num_atag = Some(tlv),
                tags::SOURCE_SUBADDRESS => submit_sm.source_subaddress = Some(tlv),
                tags::DEST_SUBADDRESS => submit_sm.dest_subaddress = Some(tlv),
                tags::DISPLAY_TIME => submit_sm.display_time = Some(tlv),
                tags::SMS_SIGNAL => submit_sm.sms_signal = Some(tlv),
                tags::MS_VALIDITY => submit_sm.ms_validity = Some(tlv),
                tags::MS_MSG_WAIT_FACILITIES => submit_sm.ms_msg_wait_facilities = Some(tlv),
                tags::NUMBER_OF_MESSAGES => submit_sm.number_of_messages = Some(tlv),
                tags::ALERT_ON_MSG_DELIVERY => submit_sm.alert_on_msg_delivery = Some(tlv),
                tags::LANGUAGE_INDICATOR => submit_sm.language_indicator = Some(tlv),
                tags::ITS_REPLY_TYPE => submit_sm.its_reply_type = Some(tlv),
                tags::ITS_SESSION_INFO => submit_sm.its_session_info = Some(tlv),
                tags::USER_DATA_HEADER => submit_sm.user_data_header = Some(tlv),
                tags::USSD_SERVICE_OP => submit_sm.ussd_service_op = Some(tlv),
                unknown => {
                    tracing::debug!(tag = format!("{unknown:#x}"), "ignoring unknown submit_sm TLV");
                }
            }
        }

        submit_sm
            .validate()
            .map_err(|e| CodecError::FieldValidation {
                field: "submit_sm",
                reason: e.to_string(),
            })?;

        Ok(submit_sm)
    }
}

impl Decodable for SubmitSmResponse {
    fn command_id() -> CommandId {
        CommandId::SubmitSmResp
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let message_id_str = decode_cstring(buf, 65, "message_id")?;
        let message_id = MessageId::from(message_id_str.as_str());

        Ok(SubmitSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let header = PduHeader {
            command_length: 0,
            command_id: CommandId::SubmitSmResp,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        };
        header.encode(buf)?;

        encode_cstring(buf, self.message_id.as_str().unwrap_or(""), 65);

        Ok(())
    }

    fn encoded_size(&self) -> usize {
        PduHeader::SIZE + cstring_encoded_len(self.message_id.as_str().unwrap_or(""), 65)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_sm_to_bytes_basic() {
        let submit_sm = SubmitSm::builder()
            .source_addr("1234567890")
            .destination_addr("8618012345678")
            .short_message("hello")
            .build()
            .unwrap();

        let bytes = submit_sm.to_bytes();

        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_be_bytes());
        assert_eq!(&bytes[4..8], &(CommandId::SubmitSm as u32).to_be_bytes());
        assert_eq!(submit_sm.sm_length, 5);
        assert!(
            bytes
                .windows("hello".len())
                .any(|window| window == "hello".as_bytes())
        );
    }

    #[test]
    fn submit_sm_roundtrip_with_sar_tlvs() {
        let submit_sm = SubmitSm::builder()
            .source_addr("1234567890")
            .destination_addr("0987654321")
            .esm_class(EsmClass::from(0x40))
            .data_coding(DataCoding::Ucs2)
            .short_message("segment body")
            .sar_msg_ref_num(Tlv::new(tags::SAR_MSG_REF_NUM, vec![0x00, 0x07]))
            .sar_total_segments(Tlv::new(tags::SAR_TOTAL_SEGMENTS, vec![0x03]))
            .sar_segment_seqnum(Tlv::new(tags::SAR_SEGMENT_SEQNUM, vec![0x01]))
            .sequence_number(9)
            .build()
            .unwrap();

        let mut buf = BytesMut::new();
        submit_sm.encode(&mut buf).unwrap();

        let mut header_cursor = Cursor::new(&buf[..PduHeader::SIZE]);
        let header = PduHeader::decode(&mut header_cursor).unwrap();
        let mut body_cursor = Cursor::new(&buf[PduHeader::SIZE..]);
        let decoded = SubmitSm::decode(header, &mut body_cursor).unwrap();

        assert_eq!(decoded.destination_addr, "0987654321");
        assert_eq!(decoded.short_message.as_str().unwrap(), "segment body");
        assert!(decoded.sar_msg_ref_num.is_some());
        assert!(decoded.sar_total_segments.is_some());
        assert!(decoded.sar_segment_seqnum.is_some());
    }

    #[test]
    fn submit_sm_response_roundtrip() {
        let resp = SubmitSmResponse::new(5, "1234567890");
        let mut buf = BytesMut::new();
        resp.encode(&mut buf).unwrap();

        let mut header_cursor = Cursor::new(&buf[..PduHeader::SIZE]);
        let header = PduHeader::decode(&mut header_cursor).unwrap();
        let mut body_cursor = Cursor::new(&buf[PduHeader::SIZE..]);
        let decoded = SubmitSmResponse::decode(header, &mut body_cursor).unwrap();

        assert_eq!(decoded.message_id.as_str().unwrap(), "1234567890");
        assert_eq!(decoded.sequence_number, 5);
    }

    #[test]
    #[should_panic(expected = "sm_length (5) does not match short_message length (11)")]
    fn submit_sm_validation_sm_length_mismatch() {
        let mut submit_sm = SubmitSm::builder()
            .source_addr("1234567890")
            .destination_addr("0987654321")
            .short_message("Hello World")
            .build()
            .unwrap();
        submit_sm.sm_length = 5;

        let _ = submit_sm.to_bytes();
    }
}
