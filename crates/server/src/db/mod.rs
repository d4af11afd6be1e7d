use std::{
    ffi::c_int,
    sync::Once,
    time::{Duration, Instant},
};

use anyhow::anyhow;
use include_dir::{include_dir, Dir};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use rusqlite_migration::{Migrations, SchemaVersion};
use tracing::{debug, error, info, instrument, trace, warn};

mod database_connection;
pub use database_connection::*;

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

fn sqlite_connection_profiling_callback(query: &str, duration: Duration) {
    trace!(target: "sqlite_profiling", ?duration, query);
}

fn sqlite_connection_trace_callback(query: &str) {
    trace!(target: "sqlite_tracing", query);
}

fn sqlite_log_callback(sqlite_code: c_int, msg: &str) {
    use rusqlite::ffi;
    let err_code = ffi::Error::new(sqlite_code);

    // See https://www.sqlite.org/rescode.html for description of result codes.
    match sqlite_code & 0xff {
        ffi::SQLITE_NOTICE => info!(target: "sqlite", msg, %err_code, "SQLITE NOTICE"),
        ffi::SQLITE_WARNING => warn!(target: "sqlite", msg, %err_code, "SQLITE WARNING"),
        _ => error!(target: "sqlite", msg, %err_code, "SQLITE ERROR"),
    };
}

pub fn get_migrations() -> Result<Migrations<'static>, anyhow::Error> {
    Ok(Migrations::from_directory(&MIGRATIONS_DIR)
        .map_err(|e| anyhow!("Migrations::from_directory: {e:?}"))?)
}

#[instrument(skip(conn))]
pub fn configure_new_connection(conn: &mut Connection) -> Result<(), anyhow::Error> {
    run_pragmas(conn)?;

    if cfg!(debug_assertions) {
        conn.trace(Some(sqlite_connection_trace_callback));
    } else {
        conn.profile(Some(sqlite_connection_profiling_callback));
    }

    Ok(())
}

#[instrument(skip(conn))]
pub fn run_pragmas(conn: &Connection) -> Result<(), anyhow::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Brings the schema to the latest migration, returning how many
/// migrations ran. Called once at startup before the pool exists.
#[instrument]
pub fn run_migrations(connection_string: &str) -> Result<usize, anyhow::Error> {
    // Route sqlite's global log hook into tracing before the first open
    static CONFIG_LOG: Once = Once::new();
    let mut config_result = Ok(());
    CONFIG_LOG.call_once(|| unsafe {
        config_result = rusqlite::trace::config_log(Some(sqlite_log_callback));
    });
    config_result?;

    let open_flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_CREATE;

    let mut conn = Connection::open_with_flags(connection_string, open_flags)?;
    configure_new_connection(&mut conn)?;

    debug!("Checking DB is writable");
    conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;

    let migrations = get_migrations()?;

    let initial_version = schema_version(&migrations, &conn)?;
    migrations
        .to_latest(&mut conn)
        .map_err(|e| anyhow!("Migrations::to_latest: {e:?}"))?;
    let final_version = schema_version(&migrations, &conn)?;

    close_database(conn)?;

    Ok(final_version - initial_version)
}

fn schema_version(migrations: &Migrations<'_>, conn: &Connection) -> Result<usize, anyhow::Error> {
    match migrations
        .current_version(conn)
        .map_err(|e| anyhow!("Migrations::current_version: {e:?}"))?
    {
        SchemaVersion::Inside(n) => Ok(n.into()),
        SchemaVersion::Outside(n) => Err(anyhow!(
            "Schema version {n} is outside of known schema migrations. Manual intervention required"
        )),
        SchemaVersion::NoneSet => Ok(0),
    }
}

/// Runs an optimize on the database. Should be run periodically to keep the
/// database running optimally. It should be very fast if run regularly
#[instrument(skip(conn))]
pub fn optimize_database(conn: &Connection) -> Result<Duration, anyhow::Error> {
    let start = Instant::now();
    conn.pragma_update(None, "analysis_limit", "400")?;
    conn.pragma_update(None, "optimize", "")?;

    Ok(start.elapsed())
}

// Vacuums the database to free up space and improve fragmentation
#[instrument(skip(conn))]
pub fn vacuum_database(conn: &Connection) -> Result<Duration, anyhow::Error> {
    let start = Instant::now();
    conn.execute("VACUUM", ())?;
    Ok(start.elapsed())
}

#[instrument(skip(conn))]
pub fn close_database(conn: Connection) -> Result<(), anyhow::Error> {
    let d1 = optimize_database(&conn)?;
    let d2 = vacuum_database(&conn)?;

    info!(
        "Optimize db took: {:.3}, vacuum took: {:.3}, total: {:.3}",
        d1.as_secs_f32(),
        d2.as_secs_f32(),
        (d1 + d2).as_secs_f32()
    );
    if let Err((_conn, e)) = conn.close() {
        Err(e)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use shared::{
        model::{Exercise, LogFilter, NewExercise, NewUser, StoreError, User},
        types::Uuid,
    };

    use super::*;

    fn test_connection() -> Connection {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        run_pragmas(&conn).expect("run pragmas");
        get_migrations()
            .expect("load migrations")
            .to_latest(&mut conn)
            .expect("apply migrations");
        conn
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    fn log_exercise(conn: &mut Connection, user: &User, description: &str, day: &str) -> Exercise {
        Exercise::create(conn, NewExercise::new(user.id, description, 30, date(day)))
            .expect("create exercise")
    }

    #[test]
    fn migrations_validate() {
        get_migrations()
            .expect("load migrations")
            .validate()
            .expect("migrations validate");
    }

    #[test]
    fn create_or_get_returns_a_stable_user_per_username() {
        let mut conn = test_connection();

        let first = User::create_or_get(&mut conn, NewUser::new("alice")).expect("first call");
        let second = User::create_or_get(&mut conn, NewUser::new("alice")).expect("second call");

        assert_eq!(first.username, "alice");
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);

        let users = User::fetch_all(&conn).expect("fetch all");
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn duplicate_inserts_report_a_unique_violation() {
        let mut conn = test_connection();

        User::create(&mut conn, NewUser::new("bob")).expect("first insert");
        let err = User::create(&mut conn, NewUser::new("bob")).expect_err("duplicate insert");

        assert!(matches!(err, StoreError::UniqueViolation(_)), "got {err:?}");
    }

    #[test]
    fn create_or_get_observes_a_winner_committed_first() {
        let mut conn = test_connection();

        // The state a losing writer sees: the winner's row landed before
        // its own create-or-get ran
        let winner = User::create(&mut conn, NewUser::new("carol")).expect("winner insert");
        let loser = User::create_or_get(&mut conn, NewUser::new("carol")).expect("loser converges");

        assert_eq!(winner.id, loser.id);
    }

    #[test]
    fn users_are_listed_in_insertion_order() {
        let mut conn = test_connection();

        for name in ["carol", "alice", "bob"] {
            User::create(&mut conn, NewUser::new(name)).expect("create user");
        }

        let names: Vec<_> = User::fetch_all(&conn)
            .expect("fetch all")
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }

    #[test]
    fn missing_users_are_not_found() {
        let conn = test_connection();

        let err = User::fetch_by_id(&conn, &Uuid::new_v4()).expect_err("missing user");
        assert!(matches!(err, StoreError::NotFound), "got {err:?}");

        assert_eq!(
            User::fetch_by_username(&conn, "nobody").expect("fetch"),
            None
        );
    }

    #[test]
    fn exercises_require_an_existing_user() {
        let mut conn = test_connection();

        // Foreign keys back the referential check the routes perform
        let orphan = NewExercise::new(Uuid::new_v4(), "run", 30, date("2023-01-15"));
        assert!(Exercise::create(&mut conn, orphan).is_err());
    }

    #[test]
    fn log_keeps_insertion_order_not_date_order() {
        let mut conn = test_connection();
        let user = User::create(&mut conn, NewUser::new("erin")).expect("create user");

        log_exercise(&mut conn, &user, "swim", "2023-03-03");
        log_exercise(&mut conn, &user, "row", "2023-01-01");
        log_exercise(&mut conn, &user, "run", "2023-02-02");

        let log = Exercise::fetch_log(&conn, &user.id, &LogFilter::default()).expect("fetch log");
        let descriptions: Vec<_> = log.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, ["swim", "row", "run"]);
    }

    #[test]
    fn log_bounds_are_inclusive_and_combine() {
        let mut conn = test_connection();
        let user = User::create(&mut conn, NewUser::new("frank")).expect("create user");

        for day in [
            "2022-12-31",
            "2023-01-01",
            "2023-06-15",
            "2023-12-31",
            "2024-01-01",
        ] {
            log_exercise(&mut conn, &user, "run", day);
        }

        let filter = LogFilter {
            from: Some(date("2023-01-01")),
            to: Some(date("2023-12-31")),
            ..Default::default()
        };
        let log = Exercise::fetch_log(&conn, &user.id, &filter).expect("fetch log");
        let days: Vec<_> = log.iter().map(|e| e.date).collect();
        assert_eq!(
            days,
            [date("2023-01-01"), date("2023-06-15"), date("2023-12-31")]
        );

        let from_only = LogFilter {
            from: Some(date("2023-06-15")),
            ..Default::default()
        };
        assert_eq!(
            Exercise::fetch_log(&conn, &user.id, &from_only)
                .expect("fetch log")
                .len(),
            3
        );
    }

    #[test]
    fn log_limit_truncates_the_result() {
        let mut conn = test_connection();
        let user = User::create(&mut conn, NewUser::new("grace")).expect("create user");

        for day in 1..=5 {
            log_exercise(&mut conn, &user, "run", &format!("2023-01-0{day}"));
        }

        let filter = LogFilter {
            limit: Some(2),
            ..Default::default()
        };
        let log = Exercise::fetch_log(&conn, &user.id, &filter).expect("fetch log");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].date, date("2023-01-01"));
        assert_eq!(log[1].date, date("2023-01-02"));
    }

    #[test]
    fn logs_are_scoped_to_their_user() {
        let mut conn = test_connection();
        let heidi = User::create(&mut conn, NewUser::new("heidi")).expect("create user");
        let ivan = User::create(&mut conn, NewUser::new("ivan")).expect("create user");

        log_exercise(&mut conn, &heidi, "run", "2023-01-01");
        log_exercise(&mut conn, &ivan, "swim", "2023-01-02");

        let log = Exercise::fetch_log(&conn, &heidi.id, &LogFilter::default()).expect("fetch log");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].description, "run");
        assert_eq!(log[0].user_id, heidi.id);
    }
}
