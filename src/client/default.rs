// ABOUTME: Default SMPP client implementation providing complete trait implementations
// ABOUTME: Binds as a transceiver and drives Connection::send/recv against the session state machine

use crate::Frame;
use crate::client::error::{SmppError, SmppResult};
use crate::client::keepalive::{KeepAliveConfig, KeepAliveManager, KeepAliveStatus};
use crate::client::traits::{SmppClient, SmppConnection, SmppReceiver, SmppTransmitter};
use crate::client::types::{BindCredentials, SmsMessage};
use crate::connection::Connection;
use crate::datatypes::*;
use crate::session::Session;
use tokio::net::{TcpStream, ToSocketAddrs};

/// Default SMPP client implementation
///
/// Every session binds as a transceiver. Provides a complete implementation
/// of all SMPP client traits with proper error handling, response
/// validation, and sequence number management.
pub struct DefaultClient {
    /// The TCP connection with SMPP protocol frame handling
    connection: Connection,
    /// Session state machine (Section 4.6): CLOSED -> CONNECTED -> AUTHOK
    session: Session,
    /// Sequence number for PDU correlation
    sequence_number: u32,
    /// Keep-alive manager for automatic enquire_link handling
    keep_alive: Option<KeepAliveManager>,
}

impl SmppConnection for DefaultClient {
    async fn connect<T: ToSocketAddrs + Send>(addr: T) -> SmppResult<Self> {
        let socket = TcpStream::connect(addr).await?;
        let connection = Connection::new(socket);
        let session = Session::new();
        session
            .on_connect()
            .map_err(|e| SmppError::InvalidState(e.to_string()))?;

        Ok(DefaultClient {
            connection,
            session,
            sequence_number: 0,
            keep_alive: None,
        })
    }

    async fn disconnect(&mut self) -> SmppResult<()> {
        if let Some(keep_alive) = &mut self.keep_alive {
            keep_alive.disable();
        }
        self.keep_alive = None;
        self.session.on_transport_error();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.session.state() != crate::session::SessionState::Closed
    }
}

impl SmppClient for DefaultClient {
    async fn bind(&mut self, credentials: &BindCredentials) -> SmppResult<()> {
        self.sequence_number += 1;

        let bind_transceiver = BindTransceiver {
            command_status: CommandStatus::Ok,
            sequence_number: self.sequence_number,
            system_id: SystemId::from(credentials.system_id.as_str()),
            password: Some(Password::from(credentials.password.as_str())),
            system_type: SystemType::from(credentials.system_type.as_deref().unwrap_or("")),
            interface_version: credentials.interface_version,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: AddressRange::default(),
        };

        let frame = Frame::BindTransceiver(bind_transceiver);
        self.connection.send(&frame, &self.session).await?;

        match self.connection.recv(None).await? {
            Frame::BindTransceiverResp(response) => {
                if response.command_status != CommandStatus::Ok {
                    let _ = self.session.on_bind_failure();
                    return Err(SmppError::Protocol(response.command_status));
                }
                self.session
                    .on_bind_success()
                    .map_err(|e| SmppError::InvalidState(e.to_string()))?;
                Ok(())
            }
            other => Err(SmppError::UnexpectedPdu {
                expected: "BindTransceiverResp".to_string(),
                actual: format!("{other:?}"),
            }),
        }
    }

    async fn unbind(&mut self) -> SmppResult<()> {
        self.sequence_number += 1;

        let unbind = Unbind {
            command_status: CommandStatus::Ok,
            sequence_number: self.sequence_number,
        };

        let frame = Frame::Unbind(unbind);
        self.connection.send(&frame, &self.session).await?;

        match self.connection.recv(None).await {
            Ok(Frame::UnbindResp(response)) => {
                self.session
                    .on_unbind()
                    .map_err(|e| SmppError::InvalidState(e.to_string()))?;
                if response.command_status != CommandStatus::Ok {
                    return Err(SmppError::Protocol(response.command_status));
                }
                Ok(())
            }
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: "UnbindResp".to_string(),
                actual: format!("{other:?}"),
            }),
            Err(e) => {
                self.session.on_transport_error();
                Err(e)
            }
        }
    }

    async fn enquire_link(&mut self) -> SmppResult<()> {
        if let Some(keep_alive) = &mut self.keep_alive {
            keep_alive.on_ping_sent();
        }

        self.sequence_number += 1;

        let enquire_link = EnquireLink {
            command_status: CommandStatus::Ok,
            sequence_number: self.sequence_number,
        };

        let frame = Frame::EnquireLink(enquire_link);
        if let Err(e) = self.connection.send(&frame, &self.session).await {
            if let Some(keep_alive) = &mut self.keep_alive {
                keep_alive.on_ping_failure();
            }
            return Err(e.into());
        }

        match self.connection.recv(None).await {
            Ok(Frame::EnquireLinkResp(_)) => {
                if let Some(keep_alive) = &mut self.keep_alive {
                    keep_alive.on_ping_success();
                }
                Ok(())
            }
            Ok(other) => {
                if let Some(keep_alive) = &mut self.keep_alive {
                    keep_alive.on_ping_failure();
                }
                Err(SmppError::UnexpectedPdu {
                    expected: "EnquireLinkResp".to_string(),
                    actual: format!("{other:?}"),
                })
            }
            Err(e) => {
                if let Some(keep_alive) = &mut self.keep_alive {
                    keep_alive.on_ping_failure();
                }
                Err(e.into())
            }
        }
    }

    async fn start_keep_alive(&mut self, config: KeepAliveConfig) -> SmppResult<()> {
        self.keep_alive = Some(KeepAliveManager::new(config));
        Ok(())
    }

    async fn stop_keep_alive(&mut self) -> SmppResult<()> {
        if let Some(keep_alive) = &mut self.keep_alive {
            keep_alive.disable();
        }
        self.keep_alive = None;
        Ok(())
    }

    fn keep_alive_status(&self) -> KeepAliveStatus {
        self.keep_alive
            .as_ref()
            .map(|ka| ka.status())
            .unwrap_or(KeepAliveStatus {
                running: false,
                consecutive_failures: 0,
                total_pings: 0,
                total_pongs: 0,
            })
    }

    fn next_sequence_number(&mut self) -> u32 {
        self.sequence_number += 1;
        self.sequence_number
    }
}

impl DefaultClient {
    /// Send a keep-alive ping if the configured interval has elapsed.
    ///
    /// Call this periodically in long-running applications to maintain
    /// connection health via the `KeepAliveManager` integration.
    pub async fn maintain_keep_alive(&mut self) -> SmppResult<bool> {
        if let Some(keep_alive) = &self.keep_alive {
            if keep_alive.should_ping() {
                self.enquire_link().await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns true once the configured maximum consecutive keep-alive
    /// failures has been reached.
    pub fn is_keep_alive_failed(&self) -> bool {
        self.keep_alive
            .as_ref()
            .map(|ka| ka.is_connection_failed())
            .unwrap_or(false)
    }
}

impl SmppTransmitter for DefaultClient {
    async fn send_sms(&mut self, message: &SmsMessage) -> SmppResult<String> {
        if message.text.len() > 254 {
            return Err(SmppError::InvalidData(
                "Message too long (>254 bytes). Use submit_sm with message_payload TLV for longer messages.".to_string()
            ));
        }

        let sequence_number = self.next_sequence_number();

        let submit_sm = SubmitSm {
            command_status: CommandStatus::Ok,
            sequence_number,
            service_type: ServiceType::default(),
            source_addr_ton: message.options.source_ton,
            source_addr_npi: message.options.source_npi,
            source_addr: SourceAddr::new(&message.from, message.options.source_ton)
                .unwrap_or_default(),
            dest_addr_ton: message.options.dest_ton,
            dest_addr_npi: message.options.dest_npi,
            destination_addr: DestinationAddr::new(&message.to, message.options.dest_ton)
                .unwrap_or_default(),
            esm_class: EsmClass::default(),
            protocol_id: 0,
            priority_flag: message.options.priority as u8,
            schedule_delivery_time: ScheduleDeliveryTime::default(),
            validity_period: ValidityPeriod::default(),
            registered_delivery: message.options.registered_delivery,
            replace_if_present_flag: 0,
            data_coding: message.options.data_coding,
            sm_default_msg_id: 0,
            sm_length: message.text.len() as u8,
            short_message: ShortMessage::from(message.text.as_str()),
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

        self.submit_sm(&submit_sm).await
    }

    async fn submit_sm(&mut self, submit: &SubmitSm) -> SmppResult<String> {
        self.session
            .require_auth_ok("submit_sm")
            .map_err(|e| SmppError::InvalidState(e.to_string()))?;

        let frame = Frame::SubmitSm(Box::new(submit.clone()));
        self.connection.send(&frame, &self.session).await?;

        match self.connection.recv(None).await {
            Ok(Frame::SubmitSmResp(response)) => {
                if response.command_status != CommandStatus::Ok {
                    return Err(SmppError::Protocol(response.command_status));
                }
                Ok(response.message_id.to_string())
            }
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: "SubmitSmResp".to_string(),
                actual: format!("{other:?}"),
            }),
            Err(e) => {
                self.session.on_transport_error();
                Err(e)
            }
        }
    }
}

impl SmppReceiver for DefaultClient {
    async fn receive_message(&mut self) -> SmppResult<DeliverSm> {
        self.session
            .require_auth_ok("receive_message")
            .map_err(|e| SmppError::InvalidState(e.to_string()))?;

        match self.connection.recv(None).await {
            Ok(Frame::DeliverSm(deliver_sm)) => {
                let sequence_number = deliver_sm.sequence_number;
                let response = DeliverSmResponse {
                    command_status: CommandStatus::Ok,
                    sequence_number,
                    message_id: MessageId::from(""),
                };
                let frame = Frame::DeliverSmResp(response);
                self.connection.send(&frame, &self.session).await?;
                Ok(*deliver_sm)
            }
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: "DeliverSm".to_string(),
                actual: format!("{other:?}"),
            }),
            Err(e) => {
                self.session.on_transport_error();
                Err(e)
            }
        }
    }
}
