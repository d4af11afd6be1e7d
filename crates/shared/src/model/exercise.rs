use chrono::NaiveDate;
use exemplar::Model;
use rusqlite::Connection;
use sea_query::{enum_def, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use serde::{Deserialize, Serialize};

use crate::{
    model::{Rowid, StoreError},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Model, Serialize, Deserialize)]
#[table("exercise")]
#[check("../../../server/migrations/002-exercise/up.sql")]
#[enum_def]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Model, Serialize, Deserialize)]
#[table("exercise")]
#[check("../../../server/migrations/002-exercise/up.sql")]
pub struct NewExercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl NewExercise {
    pub fn new<T: Into<String>>(
        user_id: Uuid,
        description: T,
        duration: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            description: description.into(),
            duration,
            date,
        }
    }
}

/// Optional inclusive date bounds and row cap applied to a user's log
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

impl Exercise {
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Exercise, StoreError> {
        let (sql, values) = Query::select()
            .columns([
                ExerciseIden::Id,
                ExerciseIden::UserId,
                ExerciseIden::Description,
                ExerciseIden::Duration,
                ExerciseIden::Date,
            ])
            .from(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let exercise = stmt.query_row(&*values.as_params(), Exercise::from_row)?;
        Ok(exercise)
    }

    pub fn create(conn: &mut Connection, new_exercise: NewExercise) -> Result<Exercise, StoreError> {
        let tx = conn.transaction()?;
        let exercise = {
            new_exercise.insert(&tx)?;
            Exercise::fetch_by_id(&tx, &new_exercise.id)?
        };
        tx.commit()?;

        Ok(exercise)
    }

    /// The user's exercises in insertion order. Bounds are inclusive and
    /// only applied when present; the limit truncates the result count.
    pub fn fetch_log(
        conn: &Connection,
        user_id: &Uuid,
        filter: &LogFilter,
    ) -> Result<Vec<Exercise>, StoreError> {
        let mut query = Query::select();
        query
            .columns([
                ExerciseIden::Id,
                ExerciseIden::UserId,
                ExerciseIden::Description,
                ExerciseIden::Duration,
                ExerciseIden::Date,
            ])
            .from(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::UserId).eq(user_id))
            .order_by(Rowid, Order::Asc);

        if let Some(from) = filter.from {
            query.and_where(Expr::col(ExerciseIden::Date).gte(from));
        }
        if let Some(to) = filter.to {
            query.and_where(Expr::col(ExerciseIden::Date).lte(to));
        }
        if let Some(limit) = filter.limit {
            query.limit(limit);
        }

        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let exercises = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(exercises)
    }
}
