use chrono::{DateTime, Utc};
use exemplar::Model;
use rusqlite::{Connection, OptionalExtension};
use sea_query::{enum_def, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use serde::{Deserialize, Serialize};

use crate::{
    model::{Rowid, StoreError},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Model, Serialize, Deserialize)]
#[table("user")]
#[check("../../../server/migrations/001-user/up.sql")]
#[enum_def]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Model, Serialize, Deserialize)]
#[table("user")]
#[check("../../../server/migrations/001-user/up.sql")]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new<T: Into<String>>(username: T) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<User, StoreError> {
        let (sql, values) = Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::CreatedAt,
                UserIden::UpdatedAt,
            ])
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row)?;
        Ok(user)
    }

    pub fn fetch_by_username(
        conn: &Connection,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        let (sql, values) = Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::CreatedAt,
                UserIden::UpdatedAt,
            ])
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Username).eq(username))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt
            .query_row(&*values.as_params(), User::from_row)
            .optional()?;
        Ok(user)
    }

    /// Every user, in the order the rows were inserted. No paging.
    pub fn fetch_all(conn: &Connection) -> Result<Vec<User>, StoreError> {
        let (sql, values) = Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::CreatedAt,
                UserIden::UpdatedAt,
            ])
            .from(UserIden::Table)
            .order_by(Rowid, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let users = stmt
            .query_map(&*values.as_params(), User::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(users)
    }

    pub fn create(conn: &mut Connection, new_user: NewUser) -> Result<User, StoreError> {
        let tx = conn.transaction()?;
        let user = {
            new_user.insert(&tx)?;
            User::fetch_by_id(&tx, &new_user.id)?
        };
        tx.commit()?;

        Ok(user)
    }

    /// Returns the stored user for the username, inserting it first if
    /// this is the first time the username has been seen. An insert that
    /// loses a race against an identical concurrent insert re-reads and
    /// returns the winner instead of surfacing the uniqueness error.
    pub fn create_or_get(conn: &mut Connection, new_user: NewUser) -> Result<User, StoreError> {
        if let Some(existing) = Self::fetch_by_username(conn, &new_user.username)? {
            return Ok(existing);
        }

        let username = new_user.username.clone();
        match Self::create(conn, new_user) {
            Err(StoreError::UniqueViolation(message)) => {
                match Self::fetch_by_username(conn, &username)? {
                    Some(winner) => Ok(winner),
                    None => Err(StoreError::UniqueViolation(message)),
                }
            },
            other => other,
        }
    }
}
