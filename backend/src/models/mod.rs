pub mod history;
pub mod idea;
pub mod journal;
pub mod task;
pub mod user;

use chrono::{Local, NaiveDate};

/// Today's calendar day in server-local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
