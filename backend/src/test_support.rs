//! Shared test doubles for unit tests inside the crate.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::UserRepository;
use crate::domain::{Email, PasswordHash, User, UserId, Username};
use crate::outbound::memory::InMemoryBlogStore;

/// Fixed instant used as "now" by service tests.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single() {
        Some(now) => now,
        None => panic!("valid fixture timestamp"),
    }
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `minutes`.
    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Register `username` (as `<username>@example.com`) directly in the store.
pub async fn seed_user(store: &Arc<InMemoryBlogStore>, username: &str) -> User {
    let user = User::register(
        UserId::random(),
        Email::new(format!("{username}@example.com")).expect("fixture email"),
        Username::new(username).expect("fixture username"),
        fixture_now(),
    );
    let hash = PasswordHash::generate("secret1").expect("fixture hash");
    store.create(&user, &hash).await.expect("seed user");
    user
}
