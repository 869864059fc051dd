use std::{collections::HashMap, mem};

use log::{debug, info, warn};

use slotsync_shared::{
    read_packet, write_packets, ActionOutcome, ClientMessage, ContainerError, HostMessage,
    Protocol, SessionError, SessionId, SessionOpen, SlotAction,
};

use crate::{
    events::Events,
    session::ClientSession,
    transport::{PacketReceiver, PacketSender},
    ClientConfig, SlotsyncClientError,
};

/// Mirrors the sessions a Server opens for this client. Actions are applied
/// locally first and then confirmed or corrected by the host.
pub struct Client {
    config: ClientConfig,
    protocol: Protocol,
    io: Option<(Box<dyn PacketSender>, Box<dyn PacketReceiver>)>,
    sessions: HashMap<SessionId, ClientSession>,
    outgoing: Vec<ClientMessage>,
    desync_count: u64,
    incoming_events: Events,
}

impl Client {
    /// Create a new Client. The protocol must be built exactly like the
    /// Server's, and is locked if it is not already.
    pub fn new(config: ClientConfig, mut protocol: Protocol) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            config,
            protocol,
            io: None,
            sessions: HashMap::new(),
            outgoing: Vec::new(),
            desync_count: 0,
            incoming_events: Events::new(),
        }
    }

    pub fn connect(&mut self, sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) {
        self.io = Some((sender, receiver));
    }

    pub fn is_connected(&self) -> bool {
        self.io.is_some()
    }

    /// Drops every mirrored session without telling the Server
    pub fn disconnect(&mut self) {
        self.io = None;
        self.outgoing.clear();
        let mut session_ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        session_ids.sort();
        for session_id in session_ids {
            self.sessions.remove(&session_id);
            self.incoming_events.push_session_close(&session_id);
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Returns all events received or raised since the last call
    pub fn take_events(&mut self) -> Events {
        mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Number of host acks that reported a mispredicted action
    pub fn desync_count(&self) -> u64 {
        self.desync_count
    }

    // Sessions

    pub fn session(&self, session_id: &SessionId) -> Option<&ClientSession> {
        self.sessions.get(session_id)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut session_ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        session_ids.sort();
        session_ids
    }

    /// Applies the action to the local mirror right away and sends it to
    /// the host along with the predicted result
    pub fn click(
        &mut self,
        session_id: &SessionId,
        action: SlotAction,
    ) -> Result<ActionOutcome, SlotsyncClientError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSessionId {
                session_id: *session_id,
            })?;
        if session.pending_predictions() >= self.config.max_pending_predictions {
            warn!(
                "Session {} has {} unacknowledged actions, requesting a resync",
                session_id,
                session.pending_predictions()
            );
            session.clear_pending();
            self.outgoing.push(ClientMessage::RequestResync {
                session_id: *session_id,
            });
        }
        let layout = self.protocol.layout(session.type_tag())?;
        let (outcome, request) = session.predict(&self.protocol.item_catalog, layout, action)?;
        debug!(
            "Session {} predicted action {}",
            session_id,
            request.sequence.value()
        );
        self.outgoing.push(ClientMessage::Action(request));
        Ok(outcome)
    }

    /// Sends a host-defined signal, e.g. a button press. The client applies
    /// nothing locally.
    pub fn signal(&mut self, session_id: &SessionId, signal_id: u32) -> Result<(), SlotsyncClientError> {
        if !self.sessions.contains_key(session_id) {
            return Err(SessionError::UnknownSessionId {
                session_id: *session_id,
            }
            .into());
        }
        self.outgoing.push(ClientMessage::Signal {
            session_id: *session_id,
            signal_id,
        });
        Ok(())
    }

    /// Tears down the mirror and tells the host. Returns false if the
    /// session was already gone.
    pub fn close_session(&mut self, session_id: &SessionId) -> bool {
        if self.sessions.remove(session_id).is_none() {
            return false;
        }
        self.outgoing.push(ClientMessage::CloseSession {
            session_id: *session_id,
        });
        self.incoming_events.push_session_close(session_id);
        info!("Closed session {}", session_id);
        true
    }

    pub fn request_resync(&mut self, session_id: &SessionId) -> Result<(), SlotsyncClientError> {
        if !self.sessions.contains_key(session_id) {
            return Err(SessionError::UnknownSessionId {
                session_id: *session_id,
            }
            .into());
        }
        self.outgoing.push(ClientMessage::RequestResync {
            session_id: *session_id,
        });
        Ok(())
    }

    // Messages

    /// Must be called regularly, reads and applies every packet waiting on
    /// the transport, in arrival order
    pub fn receive_all_packets(&mut self) {
        let Some((_, receiver)) = self.io.as_mut() else {
            return;
        };
        let mut packets = Vec::new();
        loop {
            match receiver.receive() {
                Ok(Some(payload)) => packets.push(payload.to_vec()),
                Ok(None) => break,
                Err(_) => {
                    self.incoming_events.push_error(SlotsyncClientError::RecvError);
                    break;
                }
            }
        }

        for payload in packets {
            match read_packet::<HostMessage>(&payload) {
                Ok(messages) => {
                    for message in messages {
                        self.handle_message(message);
                    }
                }
                Err(error) => {
                    warn!("Malformed packet from the server: {}", error);
                    self.incoming_events
                        .push_error(SlotsyncClientError::Decode { error });
                }
            }
        }
    }

    fn handle_message(&mut self, message: HostMessage) {
        let session_id = message.session_id();
        if let HostMessage::OpenSession(open) = message {
            self.open_session(open);
            return;
        }
        let Some(session) = self.sessions.get_mut(&session_id) else {
            debug!("Dropping message for unknown session {}", session_id);
            return;
        };

        match message {
            HostMessage::OpenSession(_) => {}
            HostMessage::SlotUpdate {
                revision,
                index,
                stack,
                ..
            } => match session.apply_slot_update(revision, index, stack) {
                Ok(()) => self.incoming_events.push_slot_update(&session_id, index),
                Err(error) => self.reject(session_id, error),
            },
            HostMessage::CursorUpdate {
                revision, stack, ..
            } => {
                session.apply_cursor_update(revision, stack);
            }
            HostMessage::PropertyUpdate { index, value, .. } => {
                match session.apply_property_update(index, value) {
                    Ok(()) => self
                        .incoming_events
                        .push_property_update(&session_id, index, value),
                    Err(error) => {
                        warn!("Session {} rejected property update: {}", session_id, error);
                        self.incoming_events.push_error(error.into());
                    }
                }
            }
            HostMessage::SessionContents(contents) => match session.apply_resync(contents) {
                Ok(()) => {
                    debug!("Session {} resynced", session_id);
                    self.incoming_events.push_resync(&session_id);
                }
                Err(error) => {
                    self.reject(session_id, error);
                    self.outgoing
                        .push(ClientMessage::RequestResync { session_id });
                }
            },
            HostMessage::ActionAck {
                sequence, matched, ..
            } => {
                if !session.acknowledge(sequence) {
                    debug!(
                        "Session {} got an ack for action {} which was not pending",
                        session_id,
                        sequence.value()
                    );
                }
                if !matched {
                    self.desync_count += 1;
                    warn!(
                        "Session {} mispredicted action {}, host state applied",
                        session_id,
                        sequence.value()
                    );
                    self.incoming_events.push_desync(&session_id, sequence);
                }
            }
            HostMessage::CloseSession { .. } => {
                self.sessions.remove(&session_id);
                self.incoming_events.push_session_close(&session_id);
                info!("Server closed session {}", session_id);
            }
        }
    }

    fn open_session(&mut self, open: SessionOpen) {
        let SessionOpen {
            session_id,
            type_tag,
            revision,
            slots,
            cursor,
            properties,
            extra,
        } = open;
        let layout = match self.protocol.layout(&type_tag) {
            Ok(layout) => layout,
            Err(error) => {
                warn!("Server opened session {} of unknown kind '{}'", session_id, type_tag);
                self.incoming_events.push_error(error.into());
                self.outgoing.push(ClientMessage::CloseSession { session_id });
                return;
            }
        };

        let mut session = ClientSession::new(session_id, &type_tag, layout, extra);
        if let Err(error) = session.apply_contents(revision, slots, cursor, &properties) {
            self.reject(session_id, error);
            self.outgoing
                .push(ClientMessage::RequestResync { session_id });
        }
        if self.sessions.insert(session_id, session).is_some() {
            warn!("Session {} was opened again, replacing the old mirror", session_id);
        }
        self.incoming_events.push_session_open(&session_id, &type_tag);
        info!("Opened '{}' session {}", type_tag, session_id);
    }

    fn reject(&mut self, session_id: SessionId, error: ContainerError) {
        warn!("Session {} rejected host update: {}", session_id, error);
        self.incoming_events
            .push_error(SlotsyncClientError::Rejected { session_id, error });
    }

    /// Sends every queued message to the Server
    pub fn send_all_packets(&mut self) {
        if self.outgoing.is_empty() {
            return;
        }
        let Some((sender, _)) = self.io.as_ref() else {
            warn!("Client is not connected, dropping outgoing messages");
            self.incoming_events
                .push_error(SlotsyncClientError::NotConnected);
            self.outgoing.clear();
            return;
        };
        let messages = mem::take(&mut self.outgoing);
        debug!("Sending {} messages to the server", messages.len());
        for packet in write_packets(&messages) {
            if sender.send(&packet).is_err() {
                self.incoming_events.push_error(SlotsyncClientError::SendError);
                break;
            }
        }
    }
}
