//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `birthday_core` linkage.
//! - Print the next reminder for a sample birthday using the default fire time.

use birthday_core::{next_occurrence, FireTime, LeapDayPolicy};
use chrono::{Local, NaiveDate};

fn main() {
    println!("birthday_core ping={}", birthday_core::ping());
    println!("birthday_core version={}", birthday_core::core_version());

    let today = Local::now().date_naive();
    let fire_time = FireTime::default();
    println!(
        "birthday_core fire_time={:02}:{:02}",
        fire_time.hour(),
        fire_time.minute()
    );
    if let Some(sample) = NaiveDate::from_ymd_opt(1604, 2, 29) {
        let next = next_occurrence(sample, today, fire_time, LeapDayPolicy::default());
        println!("birthday_core sample_feb29_next={next}");
    }
}
