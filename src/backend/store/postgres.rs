/**
 * PostgreSQL Store
 *
 * Production implementation of the user, graph, and message store traits
 * over a sqlx pool. Multi-statement graph mutations (request bookkeeping
 * plus edge writes) run inside a transaction, so the two-record updates the
 * follow workflow performs commit or roll back as a unit. Message status
 * forwarding is a single conditional UPDATE: the priority comparison
 * happens in the statement itself, never in a read-then-write gap.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::backend::messaging::store::{MessageStore, MessageStoreError, NewMessage};
use crate::backend::social::store::{GraphError, GraphStore};
use crate::backend::users::store::{
    NewUser, ProfileUpdate, UserRecord, UserStore, UserStoreError,
};
use crate::shared::follow::FollowCounts;
use crate::shared::message::{Message, MessageStatus};

const USER_COLUMNS: &str = "id, username, display_name, email, password_hash, avatar_url, \
                            bio, birthday, email_verified, created_at, updated_at";

/// Ranks a status string so the lifecycle comparison can run in SQL
const STATUS_RANK: &str = "CASE {col} WHEN 'sent' THEN 1 WHEN 'delivered' THEN 2 ELSE 3 END";

fn status_rank(col: &str) -> String {
    STATUS_RANK.replace("{col}", col)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fails with `UserNotFound` unless both IDs exist
    async fn require_users<'e, E>(executor: E, a: Uuid, b: Uuid) -> Result<(), GraphError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE id = $1 OR id = $2")
            .bind(a)
            .bind(b)
            .fetch_one(executor)
            .await
            .map_err(GraphError::storage)?;
        let count: i64 = row.get("count");
        if count == 2 {
            Ok(())
        } else {
            Err(GraphError::UserNotFound)
        }
    }
}

fn message_from_row(row: &PgRow) -> Message {
    let status: String = row.get("status");
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        text: row.get("text"),
        image_url: row.get("image_url"),
        status: MessageStatus::from_str(&status).unwrap_or(MessageStatus::Sent),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, UserStoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (id, username, display_name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new_user.username)
        .bind(&new_user.display_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                UserStoreError::HandleTaken
            } else {
                UserStoreError::storage(e)
            }
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, UserStoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserStoreError::storage)
    }

    async fn list_except(&self, id: Uuid) -> Result<Vec<UserRecord>, UserStoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id <> $1 ORDER BY username ASC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(UserStoreError::storage)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UserStoreError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                birthday = COALESCE($4, birthday),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.display_name)
        .bind(update.bio)
        .bind(update.birthday)
        .bind(update.avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(UserStoreError::storage)?
        .ok_or(UserStoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError> {
        // Graph edges and pending requests cascade through the foreign
        // keys; messages are retained by design.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(UserStoreError::storage)?;
        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for PgStore {
    async fn send_follow_request(&self, from: Uuid, to: Uuid) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfReference);
        }
        let mut tx = self.pool.begin().await.map_err(GraphError::storage)?;
        Self::require_users(&mut *tx, from, to).await?;

        let row = sqlx::query(
            r#"
            SELECT
              EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2) AS following,
              EXISTS(SELECT 1 FROM follow_requests WHERE requester_id = $1 AND target_id = $2) AS pending
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await
        .map_err(GraphError::storage)?;

        if row.get::<bool, _>("following") {
            return Err(GraphError::AlreadyFollowing);
        }
        if row.get::<bool, _>("pending") {
            return Err(GraphError::DuplicateRequest);
        }

        sqlx::query("INSERT INTO follow_requests (requester_id, target_id) VALUES ($1, $2)")
            .bind(from)
            .bind(to)
            .execute(&mut *tx)
            .await
            .map_err(GraphError::storage)?;

        tx.commit().await.map_err(GraphError::storage)
    }

    async fn accept_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError> {
        if user == requester {
            return Err(GraphError::SelfReference);
        }
        let mut tx = self.pool.begin().await.map_err(GraphError::storage)?;
        Self::require_users(&mut *tx, user, requester).await?;

        let deleted =
            sqlx::query("DELETE FROM follow_requests WHERE requester_id = $1 AND target_id = $2")
                .bind(requester)
                .bind(user)
                .execute(&mut *tx)
                .await
                .map_err(GraphError::storage)?;
        if deleted.rows_affected() == 0 {
            return Err(GraphError::NoSuchRequest);
        }

        sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(requester)
        .bind(user)
        .execute(&mut *tx)
        .await
        .map_err(GraphError::storage)?;

        tx.commit().await.map_err(GraphError::storage)
    }

    async fn reject_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError> {
        if user == requester {
            return Err(GraphError::SelfReference);
        }
        Self::require_users(&self.pool, user, requester).await?;

        let deleted =
            sqlx::query("DELETE FROM follow_requests WHERE requester_id = $1 AND target_id = $2")
                .bind(requester)
                .bind(user)
                .execute(&self.pool)
                .await
                .map_err(GraphError::storage)?;
        if deleted.rows_affected() == 0 {
            return Err(GraphError::NoSuchRequest);
        }
        Ok(())
    }

    async fn follow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError> {
        if user == target {
            return Err(GraphError::SelfReference);
        }
        let mut tx = self.pool.begin().await.map_err(GraphError::storage)?;
        Self::require_users(&mut *tx, user, target).await?;

        let inserted = sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user)
        .bind(target)
        .execute(&mut *tx)
        .await
        .map_err(GraphError::storage)?;
        if inserted.rows_affected() == 0 {
            return Err(GraphError::AlreadyFollowing);
        }

        // A pending request in the same direction is now moot
        sqlx::query("DELETE FROM follow_requests WHERE requester_id = $1 AND target_id = $2")
            .bind(user)
            .bind(target)
            .execute(&mut *tx)
            .await
            .map_err(GraphError::storage)?;

        tx.commit().await.map_err(GraphError::storage)
    }

    async fn unfollow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError> {
        if user == target {
            return Err(GraphError::SelfReference);
        }
        Self::require_users(&self.pool, user, target).await?;

        let deleted = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(user)
            .bind(target)
            .execute(&self.pool)
            .await
            .map_err(GraphError::storage)?;
        if deleted.rows_affected() == 0 {
            return Err(GraphError::NotFollowing);
        }
        Ok(())
    }

    async fn followers_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let rows = sqlx::query("SELECT follower_id FROM follows WHERE followee_id = $1")
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(GraphError::storage)?;
        Ok(rows.iter().map(|r| r.get("follower_id")).collect())
    }

    async fn following_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let rows = sqlx::query("SELECT followee_id FROM follows WHERE follower_id = $1")
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(GraphError::storage)?;
        Ok(rows.iter().map(|r| r.get("followee_id")).collect())
    }

    async fn pending_requests(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError> {
        let rows = sqlx::query(
            "SELECT requester_id FROM follow_requests WHERE target_id = $1 ORDER BY created_at ASC",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(GraphError::storage)?;
        Ok(rows.iter().map(|r| r.get("requester_id")).collect())
    }

    async fn is_mutual_follow(&self, a: Uuid, b: Uuid) -> Result<bool, GraphError> {
        let row = sqlx::query(
            r#"
            SELECT
              EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2) AS ab,
              EXISTS(SELECT 1 FROM follows WHERE follower_id = $2 AND followee_id = $1) AS ba
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await
        .map_err(GraphError::storage)?;
        Ok(row.get::<bool, _>("ab") && row.get::<bool, _>("ba"))
    }

    async fn counts(&self, user: Uuid) -> Result<FollowCounts, GraphError> {
        let row = sqlx::query(
            r#"
            SELECT
              (SELECT COUNT(*) FROM follows WHERE followee_id = $1) AS followers,
              (SELECT COUNT(*) FROM follows WHERE follower_id = $1) AS following
            "#,
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .map_err(GraphError::storage)?;
        Ok(FollowCounts {
            followers: row.get::<i64, _>("followers") as u64,
            following: row.get::<i64, _>("following") as u64,
        })
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert(&self, new: NewMessage) -> Result<Message, MessageStoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, text, image_url, status, created_at)
            VALUES ($1, $2, $3, $4, $5, 'sent', $6)
            RETURNING id, sender_id, receiver_id, text, image_url, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.sender_id)
        .bind(new.receiver_id)
        .bind(new.text)
        .bind(new.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(MessageStoreError::storage)?;
        Ok(message_from_row(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>, MessageStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, text, image_url, status, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(MessageStoreError::storage)?;
        Ok(row.as_ref().map(message_from_row))
    }

    async fn set_status_if_higher(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<bool, MessageStoreError> {
        let result = sqlx::query(&format!(
            "UPDATE messages SET status = $2 WHERE id = $1 AND {} < {}",
            status_rank("status"),
            status_rank("$2"),
        ))
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(MessageStoreError::storage)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Distinguish "lifecycle no-op" from "no such message"
        let exists = sqlx::query("SELECT 1 AS one FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(MessageStoreError::storage)?
            .is_some();
        if exists {
            Ok(false)
        } else {
            Err(MessageStoreError::NotFound)
        }
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, MessageStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, text, image_url, status, created_at
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await
        .map_err(MessageStoreError::storage)?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn mark_all_read(
        &self,
        sender: Uuid,
        receiver: Uuid,
    ) -> Result<u64, MessageStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = 'read'
            WHERE sender_id = $1 AND receiver_id = $2 AND status <> 'read'
            "#,
        )
        .bind(sender)
        .bind(receiver)
        .execute(&self.pool)
        .await
        .map_err(MessageStoreError::storage)?;
        Ok(result.rows_affected())
    }
}
