pub mod time;

pub use self::time::{format_message_time, now_timestamp, parse_timestamp, TimeLocale};
