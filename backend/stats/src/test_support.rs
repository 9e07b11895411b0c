//! Fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use activity24_core::{ActivityStore, SelectQuery, UserSession, UserType};
use anyhow::{bail, Result};
use async_trait::async_trait;

pub const TTL: Duration = Duration::from_secs(300);

pub const NOW: i64 = 1_792_249_445;

/// In-memory store that counts every query it answers.
#[derive(Default)]
pub struct CountingStore {
    posts: u64,
    topics: u64,
    new_users: u64,
    guests: u64,
    users: Vec<UserSession>,
    fail_on: Option<&'static str>,
    count_queries: AtomicUsize,
    user_queries: AtomicUsize,
    guest_queries: AtomicUsize,
    last_sql: Mutex<Option<String>>,
    last_guest_since: Mutex<Option<i64>>,
}

impl CountingStore {
    pub fn with_counts(posts: u64, topics: u64, new_users: u64) -> Self {
        Self {
            posts,
            topics,
            new_users,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: Vec<UserSession>) -> Self {
        self.users = users;
        self
    }

    pub fn with_guests(mut self, guests: u64) -> Self {
        self.guests = guests;
        self
    }

    /// Make one query fail: "posts", "topics", "users", "active" or "guests".
    pub fn failing_on(mut self, what: &'static str) -> Self {
        self.fail_on = Some(what);
        self
    }

    pub fn count_queries(&self) -> usize {
        self.count_queries.load(Ordering::SeqCst)
    }

    pub fn user_queries(&self) -> usize {
        self.user_queries.load(Ordering::SeqCst)
    }

    pub fn guest_queries(&self) -> usize {
        self.guest_queries.load(Ordering::SeqCst)
    }

    pub fn total_queries(&self) -> usize {
        self.count_queries() + self.user_queries() + self.guest_queries()
    }

    pub fn last_sql(&self) -> Option<String> {
        self.last_sql.lock().unwrap().clone()
    }

    pub fn last_guest_since(&self) -> Option<i64> {
        *self.last_guest_since.lock().unwrap()
    }

    fn check(&self, what: &str) -> Result<()> {
        if self.fail_on == Some(what) {
            bail!("{what} table unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for CountingStore {
    async fn count_posts_since(&self, _threshold: i64) -> Result<u64> {
        self.count_queries.fetch_add(1, Ordering::SeqCst);
        self.check("posts")?;
        Ok(self.posts)
    }

    async fn count_topics_since(&self, _threshold: i64) -> Result<u64> {
        self.count_queries.fetch_add(1, Ordering::SeqCst);
        self.check("topics")?;
        Ok(self.topics)
    }

    async fn count_users_registered_since(&self, _threshold: i64) -> Result<u64> {
        self.count_queries.fetch_add(1, Ordering::SeqCst);
        self.check("users")?;
        Ok(self.new_users)
    }

    async fn active_users(&self, query: &SelectQuery) -> Result<Vec<UserSession>> {
        self.user_queries.fetch_add(1, Ordering::SeqCst);
        *self.last_sql.lock().unwrap() = Some(query.build());
        self.check("active")?;
        Ok(self.users.clone())
    }

    async fn distinct_guest_ips_since(&self, since: i64) -> Result<u64> {
        self.guest_queries.fetch_add(1, Ordering::SeqCst);
        *self.last_guest_since.lock().unwrap() = Some(since);
        self.check("guests")?;
        Ok(self.guests)
    }
}

/// A visible, normal user seen `ago` seconds before [`NOW`].
pub fn member(user_id: i64, name: &str, ago: i64) -> UserSession {
    UserSession {
        user_id,
        username: name.to_string(),
        user_colour: String::new(),
        user_type: UserType::Normal,
        last_visit: NOW - ago,
        session_time: None,
        session_view_online: None,
        allow_view_online: true,
    }
}

/// A crawler with a live session.
pub fn bot(user_id: i64, name: &str, last_visit_ago: i64, session_ago: i64) -> UserSession {
    UserSession {
        user_type: UserType::Bot,
        session_time: Some(NOW - session_ago),
        session_view_online: Some(true),
        ..member(user_id, name, last_visit_ago)
    }
}
