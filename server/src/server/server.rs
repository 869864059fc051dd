use std::{collections::HashMap, mem, net::SocketAddr};

use log::{debug, info, warn};

use slotsync_shared::{
    read_packet, write_packets, ActionRequest, ClientMessage, ContainerError, HostMessage,
    ItemStack, Protocol, SessionError, SessionId,
};

use crate::{
    events::Events,
    session::{HandlerFactory, HostSession, SessionContext, SessionHandler},
    storage::Storage,
    transport::{PacketReceiver, PacketSender},
    user::User,
    ServerConfig, SlotsyncServerError, StorageKey, UserKey,
};

/// The authoritative end of every session. Applies client actions, runs
/// session handlers, and pushes the resulting diffs to each client mirror.
pub struct Server {
    config: ServerConfig,
    protocol: Protocol,
    io: Option<(Box<dyn PacketSender>, Box<dyn PacketReceiver>)>,
    handler_factories: HashMap<String, HandlerFactory>,
    // Users
    users: HashMap<UserKey, User>,
    user_connections: HashMap<SocketAddr, UserKey>,
    next_user_key: u64,
    // Sessions
    sessions: HashMap<SessionId, HostSession>,
    next_session_id: u32,
    storages: HashMap<StorageKey, Storage>,
    next_storage_key: u64,
    // open & close messages, sent ahead of any session diffs
    outgoing: HashMap<UserKey, Vec<HostMessage>>,
    // Events
    incoming_events: Events,
}

impl Server {
    /// Create a new Server. The protocol is locked if it is not already.
    pub fn new(config: ServerConfig, mut protocol: Protocol) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            config,
            protocol,
            io: None,
            handler_factories: HashMap::new(),
            users: HashMap::new(),
            user_connections: HashMap::new(),
            next_user_key: 0,
            sessions: HashMap::new(),
            next_session_id: 0,
            storages: HashMap::new(),
            next_storage_key: 0,
            outgoing: HashMap::new(),
            incoming_events: Events::new(),
        }
    }

    /// Start sending and receiving through the given transport
    pub fn listen(&mut self, sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) {
        self.io = Some((sender, receiver));
    }

    pub fn is_listening(&self) -> bool {
        self.io.is_some()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Sessions opened with `type_tag` get a handler from `factory`
    pub fn register_handler<F>(&mut self, type_tag: &str, factory: F) -> Result<(), SlotsyncServerError>
    where
        F: Fn() -> Box<dyn SessionHandler> + Send + Sync + 'static,
    {
        self.protocol.layout(type_tag)?;
        self.handler_factories
            .insert(type_tag.to_string(), Box::new(factory));
        Ok(())
    }

    /// Returns all events received or raised since the last call
    pub fn take_events(&mut self) -> Events {
        mem::replace(&mut self.incoming_events, Events::new())
    }

    // Users

    pub fn add_user(&mut self, address: SocketAddr) -> UserKey {
        if let Some(user_key) = self.user_connections.get(&address) {
            warn!("User at {} already exists", address);
            return *user_key;
        }
        let user_key = UserKey::new(self.next_user_key);
        self.next_user_key += 1;
        self.users.insert(user_key, User::new(address));
        self.user_connections.insert(address, user_key);
        info!("Added user {:?} at {}", user_key, address);
        user_key
    }

    /// Closes every session of the user without notifying it
    pub fn remove_user(&mut self, user_key: &UserKey) -> bool {
        let Some(session_ids) = self.users.get(user_key).map(|user| user.sessions().to_vec()) else {
            return false;
        };
        for session_id in session_ids {
            self.close_session_inner(&session_id, false);
        }
        if let Some(user) = self.users.remove(user_key) {
            self.user_connections.remove(&user.address());
        }
        self.outgoing.remove(user_key);
        info!("Removed user {:?}", user_key);
        true
    }

    pub fn user_exists(&self, user_key: &UserKey) -> bool {
        self.users.contains_key(user_key)
    }

    pub fn user_address(&self, user_key: &UserKey) -> Option<SocketAddr> {
        self.users.get(user_key).map(|user| user.address())
    }

    /// Open sessions of the user, oldest first
    pub fn user_sessions(&self, user_key: &UserKey) -> Vec<SessionId> {
        self.users
            .get(user_key)
            .map(|user| user.sessions().to_vec())
            .unwrap_or_default()
    }

    pub fn users_count(&self) -> usize {
        self.users.len()
    }

    // Sessions

    /// Opens a session of kind `type_tag` for the user, with the handler
    /// registered for that kind if there is one
    pub fn open_session(&mut self, user_key: &UserKey, type_tag: &str) -> Result<SessionId, SlotsyncServerError> {
        let handler = self.handler_factories.get(type_tag).map(|factory| factory());
        self.open_session_inner(user_key, type_tag, handler)
    }

    pub fn open_session_with(
        &mut self,
        user_key: &UserKey,
        type_tag: &str,
        handler: Box<dyn SessionHandler>,
    ) -> Result<SessionId, SlotsyncServerError> {
        self.open_session_inner(user_key, type_tag, Some(handler))
    }

    fn open_session_inner(
        &mut self,
        user_key: &UserKey,
        type_tag: &str,
        handler: Option<Box<dyn SessionHandler>>,
    ) -> Result<SessionId, SlotsyncServerError> {
        if !self.users.contains_key(user_key) {
            return Err(SlotsyncServerError::UnknownUser {
                user_key: *user_key,
            });
        }
        self.protocol.layout(type_tag)?;

        if let Some(max_sessions) = self.config.max_sessions_per_user {
            while let Some(oldest) = self
                .users
                .get(user_key)
                .filter(|user| !user.sessions().is_empty() && user.sessions().len() >= max_sessions)
                .map(|user| user.sessions()[0])
            {
                debug!("User {:?} is at its session limit, closing {}", user_key, oldest);
                self.close_session(&oldest);
            }
        }

        let session_id = SessionId::new(self.next_session_id);
        self.next_session_id = self.next_session_id.wrapping_add(1);

        let layout = self.protocol.layout(type_tag)?;
        let mut session = HostSession::new(session_id, *user_key, type_tag, layout, handler);
        session.run_handler(&self.protocol.item_catalog, layout, |handler, context| {
            handler.init(context)
        });
        let extra = session.extra_payload();
        let message = session.open_message(extra);
        self.sessions.insert(session_id, session);

        if let Some(user) = self.users.get_mut(user_key) {
            user.add_session(session_id);
        }
        self.outgoing.entry(*user_key).or_default().push(message);
        self.incoming_events.push_session_open(user_key, &session_id);
        info!("Opened '{}' session {} for user {:?}", type_tag, session_id, user_key);
        Ok(session_id)
    }

    /// Closes the session and tells its client. Safe to call on a session
    /// in any state; returns false if it was already gone.
    pub fn close_session(&mut self, session_id: &SessionId) -> bool {
        self.close_session_inner(session_id, true)
    }

    fn close_session_inner(&mut self, session_id: &SessionId, notify: bool) -> bool {
        let Some(session) = self.sessions.get_mut(session_id) else {
            return false;
        };
        if let Ok(layout) = self.protocol.layout(session.type_tag()) {
            session.close(&self.protocol.item_catalog, layout);
        }
        self.propagate_storage(session_id);

        let Some(session) = self.sessions.remove(session_id) else {
            return false;
        };
        for (storage_key, _) in session.storage_links() {
            if let Some(storage) = self.storages.get_mut(storage_key) {
                storage.remove_link(session_id);
            }
        }
        let user_key = session.user_key();
        if let Some(user) = self.users.get_mut(&user_key) {
            user.remove_session(session_id);
        }
        if notify && self.users.contains_key(&user_key) {
            self.outgoing
                .entry(user_key)
                .or_default()
                .push(HostMessage::CloseSession {
                    session_id: *session_id,
                });
        }
        self.incoming_events.push_session_close(&user_key, session_id);
        info!("Closed session {} of user {:?}", session_id, user_key);
        true
    }

    pub fn session(&self, session_id: &SessionId) -> Option<&HostSession> {
        self.sessions.get(session_id)
    }

    pub fn session_exists(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Mutates a session from outside any client action, e.g. background
    /// processing. Linked storages are updated before this returns.
    pub fn mutate_session<R, F>(&mut self, session_id: &SessionId, f: F) -> Result<R, SlotsyncServerError>
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSessionId {
                session_id: *session_id,
            })?;
        let layout = self.protocol.layout(session.type_tag())?;
        let result = {
            let mut context = session.context(&self.protocol.item_catalog, layout);
            f(&mut context)
        };
        self.propagate_storage(session_id);
        Ok(result)
    }

    /// Sends the full session contents on the next `send_all_packets()`
    pub fn resync_session(&mut self, session_id: &SessionId) -> Result<(), SlotsyncServerError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSessionId {
                session_id: *session_id,
            })?;
        session.request_resync();
        Ok(())
    }

    // Storage

    pub fn create_storage(&mut self, len: usize) -> StorageKey {
        let storage_key = StorageKey::new(self.next_storage_key);
        self.next_storage_key += 1;
        self.storages.insert(storage_key, Storage::new(len));
        storage_key
    }

    pub fn storage(&self, storage_key: &StorageKey) -> Option<&[ItemStack]> {
        self.storages.get(storage_key).map(|storage| storage.stacks())
    }

    /// Writes one stack and fans it out to every linked session
    pub fn set_storage_stack(
        &mut self,
        storage_key: &StorageKey,
        index: usize,
        stack: ItemStack,
    ) -> Result<(), SlotsyncServerError> {
        let storage = self
            .storages
            .get_mut(storage_key)
            .ok_or(SlotsyncServerError::UnknownStorage {
                storage_key: *storage_key,
            })?;
        if index >= storage.len() {
            return Err(ContainerError::IndexOutOfRange {
                index,
                len: storage.len(),
            }
            .into());
        }
        if !storage.set_stack(index, stack) {
            return Ok(());
        }
        for (session_id, first_slot) in storage.links() {
            if let Some(session) = self.sessions.get_mut(session_id) {
                storage.push_into(session.container_mut(), *first_slot, &[index]);
            }
        }
        Ok(())
    }

    /// Shows the storage in slots `first_slot..first_slot + len` of the
    /// session. The storage's current contents overwrite those slots.
    pub fn link_storage(
        &mut self,
        session_id: &SessionId,
        storage_key: &StorageKey,
        first_slot: usize,
    ) -> Result<(), SlotsyncServerError> {
        let storage = self
            .storages
            .get_mut(storage_key)
            .ok_or(SlotsyncServerError::UnknownStorage {
                storage_key: *storage_key,
            })?;
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSessionId {
                session_id: *session_id,
            })?;
        let slot_count = session.container().len();
        if first_slot + storage.len() > slot_count {
            return Err(SlotsyncServerError::StorageOutOfRange {
                session_id: *session_id,
                first_slot,
                len: storage.len(),
                slot_count,
            });
        }

        storage.add_link(*session_id, first_slot);
        session.add_storage_link(*storage_key, first_slot);
        let offsets: Vec<usize> = (0..storage.len()).collect();
        storage.push_into(session.container_mut(), first_slot, &offsets);
        debug!(
            "Linked storage {:?} to session {} at slot {}",
            storage_key, session_id, first_slot
        );
        Ok(())
    }

    pub fn unlink_storage(&mut self, session_id: &SessionId, storage_key: &StorageKey) {
        if let Some(storage) = self.storages.get_mut(storage_key) {
            storage.remove_link(session_id);
        }
        if let Some(session) = self.sessions.get_mut(session_id) {
            session.remove_storage_link(storage_key);
        }
    }

    pub fn delete_storage(&mut self, storage_key: &StorageKey) -> bool {
        let Some(storage) = self.storages.remove(storage_key) else {
            return false;
        };
        for (session_id, _) in storage.links() {
            if let Some(session) = self.sessions.get_mut(session_id) {
                session.remove_storage_link(storage_key);
            }
        }
        true
    }

    /// Writes the session's linked ranges back to their storages and copies
    /// any change into every other linked range, including other ranges of
    /// the source session
    fn propagate_storage(&mut self, source: &SessionId) {
        let Some(session) = self.sessions.get(source) else {
            return;
        };
        let links = session.storage_links().to_vec();

        for (storage_key, first_slot) in links {
            let Some(storage) = self.storages.get_mut(&storage_key) else {
                continue;
            };
            let Some(session) = self.sessions.get(source) else {
                return;
            };
            let changed = storage.pull_from(session.container(), first_slot);
            if changed.is_empty() {
                continue;
            }
            for (session_id, other_first_slot) in storage.links() {
                if session_id == source && *other_first_slot == first_slot {
                    continue;
                }
                if let Some(other) = self.sessions.get_mut(session_id) {
                    storage.push_into(other.container_mut(), *other_first_slot, &changed);
                }
            }
        }
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
                Ok(Some((address, payload))) => packets.push((address, payload.to_vec())),
                Ok(None) => break,
                Err(_) => {
                    self.incoming_events.push_error(SlotsyncServerError::RecvError);
                    break;
                }
            }
        }

        for (address, payload) in packets {
            self.process_packet(address, &payload);
        }
    }

    fn process_packet(&mut self, address: SocketAddr, payload: &[u8]) {
        let Some(user_key) = self.user_connections.get(&address).copied() else {
            warn!("Received packet from unknown address {}", address);
            self.incoming_events
                .push_error(SlotsyncServerError::UnknownAddress { address });
            return;
        };
        match read_packet::<ClientMessage>(payload) {
            Ok(messages) => {
                for message in messages {
                    self.handle_message(user_key, message);
                }
            }
            Err(error) => {
                warn!("Malformed packet from {}: {}", address, error);
                self.incoming_events
                    .push_error(SlotsyncServerError::Decode { address, error });
            }
        }
    }

    fn handle_message(&mut self, user_key: UserKey, message: ClientMessage) {
        let session_id = message.session_id();
        let Some(session) = self.sessions.get_mut(&session_id) else {
            debug!("Dropping message for unknown session {}", session_id);
            return;
        };
        if session.user_key() != user_key {
            warn!("User {:?} addressed session {} it does not own", user_key, session_id);
            self.incoming_events
                .push_error(SessionError::NotOwner { session_id }.into());
            return;
        }

        match message {
            ClientMessage::Action(request) => self.handle_action(user_key, request),
            ClientMessage::Signal { signal_id, .. } => {
                if let Ok(layout) = self.protocol.layout(session.type_tag()) {
                    session.run_handler(&self.protocol.item_catalog, layout, |handler, context| {
                        handler.on_signal(context, signal_id)
                    });
                }
                debug!("Session {} received signal {}", session_id, signal_id);
                self.incoming_events
                    .push_signal(&user_key, &session_id, signal_id);
                self.propagate_storage(&session_id);
            }
            ClientMessage::CloseSession { .. } => {
                self.close_session_inner(&session_id, false);
            }
            ClientMessage::RequestResync { .. } => {
                debug!("Session {} requested a resync", session_id);
                session.request_resync();
            }
        }
    }

    fn handle_action(&mut self, user_key: UserKey, request: ActionRequest) {
        let session_id = request.session_id;
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };
        let layout = match self.protocol.layout(session.type_tag()) {
            Ok(layout) => layout,
            Err(error) => {
                self.incoming_events.push_error(error.into());
                return;
            }
        };

        match session.apply_action(
            &self.protocol.item_catalog,
            layout,
            &request,
            &self.config.resync,
        ) {
            Ok((outcome, _matched)) => {
                if !outcome.thrown().is_empty() {
                    self.incoming_events
                        .push_throw(&user_key, &session_id, outcome.thrown().clone());
                }
                self.incoming_events
                    .push_action(&user_key, &session_id, request.action, outcome);
                self.propagate_storage(&session_id);
            }
            Err(error) => {
                warn!("Rejected action in session {}: {}", session_id, error);
                self.incoming_events
                    .push_error(SlotsyncServerError::Action { session_id, error });
            }
        }
    }

    /// Runs background processing for every session
    pub fn tick(&mut self) {
        let mut session_ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        session_ids.sort();
        for session_id in session_ids {
            let Some(session) = self.sessions.get_mut(&session_id) else {
                continue;
            };
            let Ok(layout) = self.protocol.layout(session.type_tag()) else {
                continue;
            };
            session.tick(
                &self.protocol.item_catalog,
                layout,
                self.config.resync.periodic_ticks,
            );
            self.propagate_storage(&session_id);
        }
    }

    /// Sends everything each client has not seen yet: queued open/close
    /// messages first, then per-session diffs and acks
    pub fn send_all_packets(&mut self) {
        let mut outgoing = mem::take(&mut self.outgoing);

        let mut session_ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        session_ids.sort();
        for session_id in session_ids {
            let Some(session) = self.sessions.get_mut(&session_id) else {
                continue;
            };
            let user_key = session.user_key();
            let messages = outgoing.entry(user_key).or_default();
            if session.collect_messages(messages) {
                debug!("Sent full resync for session {}", session_id);
                self.incoming_events.push_resync(&user_key, &session_id);
            }
        }

        let Some((sender, _)) = self.io.as_ref() else {
            if outgoing.values().any(|messages| !messages.is_empty()) {
                warn!("Server is not listening, dropping outgoing messages");
            }
            return;
        };

        let mut user_keys: Vec<UserKey> = outgoing.keys().copied().collect();
        user_keys.sort();
        for user_key in user_keys {
            let Some(messages) = outgoing.remove(&user_key) else {
                continue;
            };
            if messages.is_empty() {
                continue;
            }
            let Some(user) = self.users.get(&user_key) else {
                continue;
            };
            let address = user.address();
            debug!("Sending {} messages to {}", messages.len(), address);
            for packet in write_packets(&messages) {
                if sender.send(&address, &packet).is_err() {
                    self.incoming_events
                        .push_error(SlotsyncServerError::SendError { address });
                    break;
                }
            }
        }
    }
}
