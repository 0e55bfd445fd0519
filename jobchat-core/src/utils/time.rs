use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// Timestamp layout the backend stores and sends (local wall clock, no offset).
const BACKEND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const BACKEND_FORMAT_T: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Label shown for timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Locale used for the message time label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeLocale {
    /// `오후 03:04` today, `3월 13일 오전 09:05` otherwise
    #[default]
    Korean,
    /// `15:04` today, `Mar 13, 09:05` otherwise
    English,
}

impl std::str::FromStr for TimeLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Ok(TimeLocale::Korean),
            "en" | "en-us" | "english" => Ok(TimeLocale::English),
            other => Err(format!("unknown time locale: {other}")),
        }
    }
}

/// Current local time in the backend layout, e.g. "2025-03-14 15:04:05".
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(BACKEND_FORMAT).unwrap_or_default()
}

/// Parses a backend timestamp into local wall clock time.
/// Naive timestamps are taken as already local; RFC 3339 ones are shifted to `offset`.
pub fn parse_timestamp(raw: &str, offset: UtcOffset) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        let at = at.to_offset(offset);
        return Some(PrimitiveDateTime::new(at.date(), at.time()));
    }
    PrimitiveDateTime::parse(raw, BACKEND_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(raw, BACKEND_FORMAT_T))
        .ok()
}

/// Formats a message timestamp relative to `now`: time only when it falls on
/// today's date, month/day plus time otherwise.
pub fn format_message_time(raw: &str, now: OffsetDateTime, locale: TimeLocale) -> String {
    let Some(at) = parse_timestamp(raw, now.offset()) else {
        return INVALID_DATE.to_string();
    };
    let clock = clock_label(&at, locale);
    if at.date() == now.date() {
        return clock;
    }
    match locale {
        TimeLocale::Korean => format!("{}월 {}일 {}", u8::from(at.month()), at.day(), clock),
        TimeLocale::English => {
            let month = at.month().to_string();
            format!("{} {}, {}", &month[..3], at.day(), clock)
        }
    }
}

fn clock_label(at: &PrimitiveDateTime, locale: TimeLocale) -> String {
    match locale {
        TimeLocale::Korean => {
            let meridiem = if at.hour() < 12 { "오전" } else { "오후" };
            let hour = match at.hour() % 12 {
                0 => 12,
                h => h,
            };
            format!("{meridiem} {hour:02}:{:02}", at.minute())
        }
        TimeLocale::English => format!("{:02}:{:02}", at.hour(), at.minute()),
    }
}
