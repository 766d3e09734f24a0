//! `PostgreSQL` event repository.
//!
//! Membership changes and edits take a row lock on the event
//! (`SELECT ... FOR UPDATE`) and keep it until commit, so the capacity check
//! and the write happen in one serialized step per event.

use chrono::{DateTime, Utc};
use event_manager_core::error::{EventError, Result};
use event_manager_core::event::{Event, EventDraft, Membership, MembershipChange};
use event_manager_core::id::{EventId, UserId};
use event_manager_core::repository::{Admission, EventRepository};
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, creator_id, title, description, event_type, status, date, \
                             capacity, created_at, updated_at";

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    creator_id: Uuid,
    title: String,
    description: String,
    event_type: String,
    status: String,
    date: DateTime<Utc>,
    capacity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, attendees: BTreeSet<UserId>) -> Result<Event> {
        let capacity = u32::try_from(self.capacity).map_err(|_| {
            EventError::Storage(format!(
                "event {} has out-of-range capacity {}",
                self.id, self.capacity
            ))
        })?;

        Ok(Event {
            id: EventId::from_uuid(self.id),
            creator: UserId::from_uuid(self.creator_id),
            title: self.title,
            description: self.description,
            event_type: self.event_type,
            status: self.status,
            date: self.date,
            capacity,
            attendees,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> EventError {
    move |e| {
        tracing::error!(error = %e, context, "Event repository query failed");
        metrics::counter!("event_manager_store_errors_total", "context" => context).increment(1);
        EventError::Storage(format!("{context}: {e}"))
    }
}

/// `PostgreSQL` implementation of [`EventRepository`].
///
/// # Example
///
/// ```no_run
/// use event_manager_postgres::PostgresEventRepository;
/// use sqlx::PgPool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPool::connect("postgresql://localhost/events").await?;
/// event_manager_postgres::migrate(&pool).await?;
/// let events = PostgresEventRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn attendees_of(conn: &mut PgConnection, event_id: Uuid) -> Result<BTreeSet<UserId>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM event_attendees WHERE event_id = $1")
                .bind(event_id)
                .fetch_all(&mut *conn)
                .await
                .map_err(db_error("load attendees"))?;

        Ok(rows.into_iter().map(|(id,)| UserId::from_uuid(id)).collect())
    }

    /// Load an event and lock its row until the transaction ends.
    async fn load_locked(conn: &mut PgConnection, event_id: EventId) -> Result<Event> {
        let row: EventRow = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(event_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("lock event"))?
        .ok_or(EventError::NotFound(event_id))?;

        let attendees = Self::attendees_of(conn, row.id).await?;
        row.into_event(attendees)
    }

    /// Attach attendee sets to a page of event rows with one extra query.
    async fn hydrate(&self, rows: Vec<EventRow>) -> Result<Vec<Event>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let pairs: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT event_id, user_id FROM event_attendees WHERE event_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load attendees"))?;

        let mut by_event: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
        for (event_id, user_id) in pairs {
            by_event
                .entry(event_id)
                .or_default()
                .insert(UserId::from_uuid(user_id));
        }

        rows.into_iter()
            .map(|row| {
                let attendees = by_event.remove(&row.id).unwrap_or_default();
                row.into_event(attendees)
            })
            .collect()
    }

    async fn count_attendees(conn: &mut PgConnection, event_id: EventId) -> Result<usize> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM event_attendees WHERE event_id = $1")
                .bind(event_id.as_uuid())
                .fetch_one(&mut *conn)
                .await
                .map_err(db_error("count attendees"))?;

        usize::try_from(count).map_err(|_| EventError::Storage(format!("bad count {count}")))
    }
}

impl EventRepository for PostgresEventRepository {
    #[tracing::instrument(skip(self, draft))]
    async fn create(
        &self,
        creator: UserId,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<Event> {
        let event = Event::new(creator, draft, now)?;

        sqlx::query(
            r"
            INSERT INTO events
                (id, creator_id, title, description, event_type, status, date,
                 capacity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(event.id.as_uuid())
        .bind(event.creator.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.event_type)
        .bind(&event.status)
        .bind(event.date)
        .bind(i64::from(event.capacity))
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return EventError::Validation(format!("unknown creator {creator}"));
                }
            }
            db_error("insert event")(e)
        })?;

        Ok(event)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: EventId) -> Result<Event> {
        let row: EventRow =
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("get event"))?
                .ok_or(EventError::NotFound(id))?;

        let mut conn = self.pool.acquire().await.map_err(db_error("acquire"))?;
        let attendees = Self::attendees_of(&mut conn, row.id).await?;
        row.into_event(attendees)
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_creator(&self, creator: UserId) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE creator_id = $1 ORDER BY created_at, id"
        ))
        .bind(creator.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list own events"))?;

        self.hydrate(rows).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list events"))?;

        self.hydrate(rows).await
    }

    #[tracing::instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: Event) -> Result<Event> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin"))?;
        let current = Self::load_locked(&mut tx, event.id).await?;
        current.check_capacity(event.capacity)?;

        sqlx::query(
            r"
            UPDATE events
            SET title = $2, description = $3, event_type = $4, status = $5,
                date = $6, capacity = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.event_type)
        .bind(&event.status)
        .bind(event.date)
        .bind(i64::from(event.capacity))
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("update event"))?;

        tx.commit().await.map_err(db_error("commit"))?;

        Ok(Event {
            attendees: current.attendees,
            creator: current.creator,
            created_at: current.created_at,
            ..event
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: EventId) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete event"))?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, admit))]
    async fn add_attendee<F>(&self, event_id: EventId, user: UserId, admit: F) -> Result<Membership>
    where
        F: FnOnce(&Event) -> Result<Admission> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(db_error("begin"))?;
        let event = Self::load_locked(&mut tx, event_id).await?;

        let change = match admit(&event)? {
            Admission::Skip => MembershipChange::Unchanged,
            Admission::Proceed => {
                let inserted = sqlx::query(
                    r"
                    INSERT INTO event_attendees (event_id, user_id)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING
                    ",
                )
                .bind(event_id.as_uuid())
                .bind(user.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_foreign_key_violation() {
                            return EventError::Validation(format!("unknown user {user}"));
                        }
                    }
                    db_error("insert attendee")(e)
                })?
                .rows_affected();

                if inserted == 1 {
                    MembershipChange::Added
                } else {
                    MembershipChange::Unchanged
                }
            }
        };

        let attendee_count = Self::count_attendees(&mut tx, event_id).await?;
        tx.commit().await.map_err(db_error("commit"))?;

        Ok(Membership {
            event_id,
            user_id: user,
            attendee_count,
            change,
        })
    }

    #[tracing::instrument(skip(self, admit))]
    async fn remove_attendee<F>(
        &self,
        event_id: EventId,
        user: UserId,
        admit: F,
    ) -> Result<Membership>
    where
        F: FnOnce(&Event) -> Result<Admission> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(db_error("begin"))?;
        let event = Self::load_locked(&mut tx, event_id).await?;

        let change = match admit(&event)? {
            Admission::Skip => MembershipChange::Unchanged,
            Admission::Proceed => {
                let removed =
                    sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
                        .bind(event_id.as_uuid())
                        .bind(user.as_uuid())
                        .execute(&mut *tx)
                        .await
                        .map_err(db_error("delete attendee"))?
                        .rows_affected();

                if removed == 1 {
                    MembershipChange::Removed
                } else {
                    MembershipChange::Unchanged
                }
            }
        };

        let attendee_count = Self::count_attendees(&mut tx, event_id).await?;
        tx.commit().await.map_err(db_error("commit"))?;

        Ok(Membership {
            event_id,
            user_id: user,
            attendee_count,
            change,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("ping"))?;
        Ok(())
    }
}
