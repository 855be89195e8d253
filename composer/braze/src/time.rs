use beacon_composer_common::Clock;
use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Utc};

/// Formats a timestamp the way Braze expects it in `/users/track`:
/// `YYYY-MM-DDTHH:MM:SS.mmZ`, where every component, milliseconds included,
/// is padded to at least two digits.
pub fn format_braze_time(time: &DateTime<Utc>) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:02}Z",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis() % 1000
    )
}

/// The time used for events without timestamp: the local calendar date of today
/// at midnight, labelled as UTC without any offset conversion.
pub fn midnight_of_today<C: Clock + ?Sized>(clock: &C) -> DateTime<Utc> {
    Utc.from_utc_datetime(&clock.today().and_time(NaiveTime::default()))
}
