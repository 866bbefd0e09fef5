//! Data-access layer for a small online judge, generated at build time from
//! `models.toml`.
//!
//! Every table gets a record type, a by-key getter, one getter per relation
//! column and `write`/`delete` methods. The only hand-written parts are the
//! [`Verify`] implementations in this file.
//!
//! # Example
//!
//! ```
//! use dalgen_demo::{Contest, get_contest, open_in_memory};
//!
//! let db = open_in_memory().unwrap();
//! let mut contest = Contest {
//!     title: "Spring Cup".to_string(),
//!     ..Contest::default()
//! };
//! contest.write(&db).unwrap();
//! assert_eq!(contest.id, 1);
//! assert_eq!(get_contest(&db, 1).unwrap().title, "Spring Cup");
//! ```

use dalgen_runtime::rusqlite::{self, Connection};
use dalgen_runtime::{Error, Result, Verify};

macro_rules! generated {
    ($($module:ident => $file:literal),* $(,)?) => {
        $(
            pub mod $module {
                include!(concat!(env!("OUT_DIR"), "/", $file));
            }
            pub use $module::*;
        )*
    };
}

generated! {
    contest_participants => "contest_participants_generated.rs",
    contests => "contests_generated.rs",
    problem_results => "problem_results_generated.rs",
    problem_tags => "problem_tags_generated.rs",
    problems => "problems_generated.rs",
    submissions => "submissions_generated.rs",
    tags => "tags_generated.rs",
    users => "users_generated.rs",
}

/// Table definitions matching `models.toml`.
pub const SCHEMA_SQL: &str = include_str!("../schema.sql");

/// Opens an in-memory database with every table created.
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{what} must not be empty")));
    }
    Ok(())
}

impl Verify for User {
    fn verify(&self) -> Result<()> {
        require(&self.id, "user id")?;
        require(&self.display_name, "display name")?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(Error::invalid(format!("invalid email address {email:?}")));
            }
        }
        Ok(())
    }
}

impl Verify for Contest {
    fn verify(&self) -> Result<()> {
        require(&self.title, "contest title")?;
        if self.ends_at.is_some_and(|ends| ends < self.starts_at) {
            return Err(Error::invalid("contest ends before it starts"));
        }
        Ok(())
    }
}

impl Verify for ContestParticipant {
    fn verify(&self) -> Result<()> {
        require(&self.user_id, "participant")
    }
}

impl Verify for Problem {
    fn verify(&self) -> Result<()> {
        require(&self.title, "problem title")?;
        if self.time_limit_ms <= 0 {
            return Err(Error::invalid("time limit must be positive"));
        }
        Ok(())
    }
}

impl Verify for Submission {
    fn verify(&self) -> Result<()> {
        require(&self.language, "language")?;
        if self.source.is_empty() {
            return Err(Error::invalid("submission source is empty"));
        }
        Ok(())
    }
}

impl Verify for ProblemResult {
    fn verify(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(Error::invalid(format!("score {} out of range", self.score)));
        }
        Ok(())
    }
}

impl Verify for Tag {
    fn verify(&self) -> Result<()> {
        require(&self.id, "tag id")?;
        require(&self.label, "tag label")
    }
}

impl Verify for ProblemTag {
    fn verify(&self) -> Result<()> {
        require(&self.tag_id, "tag id")
    }
}
