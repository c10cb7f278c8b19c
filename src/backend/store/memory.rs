/**
 * In-memory Store
 *
 * All tables live in one struct behind a single `tokio::sync::RwLock`, so
 * every mutation is trivially atomic across the records it touches. The
 * server falls back to this store when `DATABASE_URL` is not set (state
 * then lives only as long as the process); the test suite uses it
 * directly.
 */

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::messaging::store::{MessageStore, MessageStoreError, NewMessage};
use crate::backend::social::store::{GraphError, GraphStore};
use crate::backend::users::store::{
    NewUser, ProfileUpdate, UserRecord, UserStore, UserStoreError,
};
use crate::shared::follow::FollowCounts;
use crate::shared::message::{Message, MessageStatus};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    /// (follower, followee)
    follows: HashSet<(Uuid, Uuid)>,
    /// (requester, target), in insertion order
    requests: Vec<(Uuid, Uuid)>,
    /// Insertion order doubles as chronological order
    messages: Vec<Message>,
}

impl Tables {
    fn require_users(&self, a: Uuid, b: Uuid) -> Result<(), GraphError> {
        if self.users.contains_key(&a) && self.users.contains_key(&b) {
            Ok(())
        } else {
            Err(GraphError::UserNotFound)
        }
    }

    fn has_request(&self, requester: Uuid, target: Uuid) -> bool {
        self.requests
            .iter()
            .any(|&(r, t)| r == requester && t == target)
    }

    fn remove_request(&mut self, requester: Uuid, target: Uuid) -> bool {
        let before = self.requests.len();
        self.requests.retain(|&(r, t)| !(r == requester && t == target));
        self.requests.len() != before
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, UserStoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(UserStoreError::HandleTaken);
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: new_user.username,
            display_name: new_user.display_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar_url: None,
            bio: None,
            birthday: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_except(&self, id: Uuid) -> Result<Vec<UserRecord>, UserStoreError> {
        let tables = self.tables.read().await;
        let mut users: Vec<UserRecord> = tables
            .users
            .values()
            .filter(|u| u.id != id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UserStoreError> {
        let mut tables = self.tables.write().await;
        let record = tables.users.get_mut(&id).ok_or(UserStoreError::NotFound)?;
        if let Some(display_name) = update.display_name {
            record.display_name = display_name;
        }
        if let Some(bio) = update.bio {
            record.bio = Some(bio);
        }
        if let Some(birthday) = update.birthday {
            record.birthday = Some(birthday);
        }
        if let Some(avatar_url) = update.avatar_url {
            record.avatar_url = Some(avatar_url);
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(UserStoreError::NotFound);
        }
        // Cascade: the identity disappears from everyone's graph state.
        // Messages are retained.
        tables.follows.retain(|&(a, b)| a != id && b != id);
        tables.requests.retain(|&(r, t)| r != id && t != id);
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn send_follow_request(&self, from: Uuid, to: Uuid) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfReference);
        }
        let mut tables = self.tables.write().await;
        tables.require_users(from, to)?;
        if tables.follows.contains(&(from, to)) {
            return Err(GraphError::AlreadyFollowing);
        }
        if tables.has_request(from, to) {
            return Err(GraphError::DuplicateRequest);
        }
        tables.requests.push((from, to));
        Ok(())
    }

    async fn accept_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError> {
        if user == requester {
            return Err(GraphError::SelfReference);
        }
        let mut tables = self.tables.write().await;
        tables.require_users(user, requester)?;
        if !tables.remove_request(requester, user) {
            return Err(GraphError::NoSuchRequest);
        }
        tables.follows.insert((requester, user));
        Ok(())
    }

    async fn reject_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError> {
        if user == requester {
            return Err(GraphError::SelfReference);
        }
        let mut tables = self.tables.write().await;
        tables.require_users(user, requester)?;
        if !tables.remove_request(requester, user) {
            return Err(GraphError::NoSuchRequest);
        }
        Ok(())
    }

    async fn follow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError> {
        if user == target {
            return Err(GraphError::SelfReference);
        }
        let mut tables = self.tables.write().await;
        tables.require_users(user, target)?;
        if !tables.follows.insert((user, target)) {
            return Err(GraphError::AlreadyFollowing);
        }
        // A pending request in the same direction is now moot
        tables.remove_request(user, target);
        Ok(())
    }

    async fn unfollow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError> {
        if user == target {
            return Err(GraphError::SelfReference);
        }
        let mut tables = self.tables.write().await;
        tables.require_users(user, target)?;
        if !tables.follows.remove(&(user, target)) {
            return Err(GraphError::NotFollowing);
        }
        Ok(())
    }

    async fn followers_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|&&(_, followee)| followee == user)
            .map(|&(follower, _)| follower)
            .collect())
    }

    async fn following_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|&&(follower, _)| follower == user)
            .map(|&(_, followee)| followee)
            .collect())
    }

    async fn pending_requests(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .iter()
            .filter(|&&(_, target)| target == user)
            .map(|&(requester, _)| requester)
            .collect())
    }

    async fn is_mutual_follow(&self, a: Uuid, b: Uuid) -> Result<bool, GraphError> {
        let tables = self.tables.read().await;
        Ok(tables.follows.contains(&(a, b)) && tables.follows.contains(&(b, a)))
    }

    async fn counts(&self, user: Uuid) -> Result<FollowCounts, GraphError> {
        let tables = self.tables.read().await;
        let followers = tables
            .follows
            .iter()
            .filter(|&&(_, followee)| followee == user)
            .count() as u64;
        let following = tables
            .follows
            .iter()
            .filter(|&&(follower, _)| follower == user)
            .count() as u64;
        Ok(FollowCounts {
            followers,
            following,
        })
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, new: NewMessage) -> Result<Message, MessageStoreError> {
        let mut tables = self.tables.write().await;
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            text: new.text,
            image_url: new.image_url,
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>, MessageStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn set_status_if_higher(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<bool, MessageStoreError> {
        let mut tables = self.tables.write().await;
        let message = tables
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(MessageStoreError::NotFound)?;
        if status.priority() <= message.status.priority() {
            return Ok(false);
        }
        message.status = status;
        Ok(true)
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, MessageStoreError> {
        let tables = self.tables.read().await;
        // Insertion order is chronological
        Ok(tables
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b)
                    || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect())
    }

    async fn mark_all_read(
        &self,
        sender: Uuid,
        receiver: Uuid,
    ) -> Result<u64, MessageStoreError> {
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for message in tables.messages.iter_mut() {
            if message.sender_id == sender
                && message.receiver_id == receiver
                && message.status != MessageStatus::Read
            {
                message.status = MessageStatus::Read;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
