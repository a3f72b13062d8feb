use std::fmt;
use std::str::FromStr;

/// A calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeOffset {
    /// A suffix which, when applied to a time, denotes a UTC offset of 00:00;
    /// often spoken “Zulu” from the ICAO phonetic alphabet representation of the letter “Z”.
    /// RFC 3339 section 2
    Z,
    /// Offset between local time and UTC, kept as authored so that `-00:00`
    /// stays distinct from `+00:00`.
    Custom { negative: bool, hours: u8, minutes: u8 },
}

impl TimeOffset {
    /// Signed offset from UTC in minutes.
    pub fn minutes(&self) -> i32 {
        match *self {
            TimeOffset::Z => 0,
            TimeOffset::Custom {
                negative,
                hours,
                minutes,
            } => {
                let total = hours as i32 * 60 + minutes as i32;
                if negative { -total } else { total }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    precision: u8,
}

impl Time {
    /// Creates a time without fractional seconds.
    pub fn new(hour: u8, minute: u8, second: u8) -> Time {
        Time {
            hour,
            minute,
            second,
            nanosecond: 0,
            precision: 0,
        }
    }

    /// Sets the fractional seconds, rendered with as many digits as needed.
    pub fn with_nanosecond(mut self, nanosecond: u32) -> Time {
        let mut precision = 9u8;
        let mut rest = nanosecond;
        if rest == 0 {
            precision = 0;
        } else {
            while rest % 10 == 0 {
                rest /= 10;
                precision -= 1;
            }
        }
        self.nanosecond = nanosecond;
        self.precision = precision;
        self
    }

    /// Number of fraction digits as written, 0 if there were none.
    pub fn subsecond_precision(&self) -> u8 {
        self.precision
    }
}

/// The four lexical date/time forms of TOML.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatetimeKind {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

/// Container for temporal times for TOML format, based on RFC 3339
///
/// A `Datetime` records which parts were present in the source. Parsing never
/// fails; text that is not a date/time yields an invalid value, so callers
/// must check [`Datetime::is_valid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Datetime {
    date: Option<Date>,
    time: Option<Time>,
    offset: Option<TimeOffset>,
}

/// Error returned by [`Datetime::from_str`] for text that is not a date/time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidDatetime;

impl fmt::Display for InvalidDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid date/time literal")
    }
}

impl std::error::Error for InvalidDatetime {}

fn is_leap_year(year: u16) -> bool {
    (((year as u64 * 1073750999) as u32) & 3221352463) <= 126976
}

fn days_in_month(year: u16, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

impl Datetime {
    const INVALID: Datetime = Datetime {
        date: None,
        time: None,
        offset: None,
    };

    /// Parses a TOML date/time literal.
    ///
    /// The whole input must be consumed. Anything else yields a value for
    /// which [`is_valid`](Self::is_valid) returns `false`.
    pub fn parse(input: &str) -> Datetime {
        match Self::munch(input.as_bytes()) {
            Some((amount, value)) if amount == input.len() => value,
            _ => Self::INVALID,
        }
    }

    /// Wraps a date and time with an explicit UTC offset.
    pub fn offset_date_time(date: Date, time: Time, offset: TimeOffset) -> Datetime {
        Datetime {
            date: Some(date),
            time: Some(time),
            offset: Some(offset),
        }
    }

    pub fn local_date_time(date: Date, time: Time) -> Datetime {
        Datetime {
            date: Some(date),
            time: Some(time),
            offset: None,
        }
    }

    pub fn local_date(date: Date) -> Datetime {
        Datetime {
            date: Some(date),
            time: None,
            offset: None,
        }
    }

    pub fn local_time(time: Time) -> Datetime {
        Datetime {
            date: None,
            time: Some(time),
            offset: None,
        }
    }

    /// Returns `true` unless this is the result of parsing invalid text.
    pub fn is_valid(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }

    /// Date and time are both present.
    pub fn is_date_time(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }

    /// No UTC offset applies: a bare date, a bare time, or no recorded offset.
    pub fn is_local(&self) -> bool {
        self.date.is_none() || self.time.is_none() || self.offset.is_none()
    }

    pub fn is_date(&self) -> bool {
        self.date.is_some() && self.time.is_none()
    }

    pub fn is_time(&self) -> bool {
        self.time.is_some() && self.date.is_none()
    }

    /// The lexical form, or `None` when invalid.
    pub fn kind(&self) -> Option<DatetimeKind> {
        match (self.date, self.time, self.offset) {
            (Some(_), Some(_), Some(_)) => Some(DatetimeKind::OffsetDateTime),
            (Some(_), Some(_), None) => Some(DatetimeKind::LocalDateTime),
            (Some(_), None, _) => Some(DatetimeKind::LocalDate),
            (None, Some(_), _) => Some(DatetimeKind::LocalTime),
            (None, None, _) => None,
        }
    }

    pub fn date(&self) -> Option<Date> {
        self.date
    }

    pub fn time(&self) -> Option<Time> {
        self.time
    }

    pub fn offset(&self) -> Option<TimeOffset> {
        self.offset
    }

    /// Milliseconds since the Unix epoch.
    ///
    /// Local values are read as UTC, and a bare time is placed on 0000-01-01.
    pub fn unix_millis(&self) -> Option<i64> {
        if !self.is_valid() {
            return None;
        }
        let date = self.date.unwrap_or(Date {
            year: 0,
            month: 1,
            day: 1,
        });
        let days = days_from_civil(date.year as i64, date.month as i64, date.day as i64);
        let mut millis = days * 86_400_000;
        if let Some(time) = self.time {
            millis += time.hour as i64 * 3_600_000
                + time.minute as i64 * 60_000
                + time.second as i64 * 1_000
                + (time.nanosecond / 1_000_000) as i64;
        }
        if let Some(offset) = self.offset {
            millis -= offset.minutes() as i64 * 60_000;
        }
        Some(millis)
    }

    pub(crate) fn munch(input: &[u8]) -> Option<(usize, Datetime)> {
        enum State {
            Year,
            Month,
            Day,
            Hour,
            Minute,
            Second,
            Frac,
            OffHour,
            OffMin,
        }
        let mut state = match input {
            [_, _, b':', _, _, ..] => State::Hour,
            [_, _, _, _, b'-', _, _, b'-', ..] => State::Year,
            _ => return None,
        };

        let mut date = Date {
            year: 0,
            month: 0,
            day: 0,
        };
        let mut time = Time::new(0, 0, 0);
        let mut value = Datetime::INVALID;

        let mut current = 0u32;
        let mut len = 0u32;
        let mut off_negative = false;
        let mut off_hour: u8 = 0;
        let mut i = 0usize;
        let mut valid = false;

        'outer: loop {
            let byte = input.get(i).copied().unwrap_or(0);
            if byte.is_ascii_digit() {
                len += 1;
                if len <= 9 {
                    current = current * 10 + (byte - b'0') as u32;
                }
                i += 1;
                continue;
            }
            'next: {
                match state {
                    State::Year => {
                        if len != 4 || byte != b'-' {
                            break 'outer;
                        }
                        date.year = current as u16;
                        state = State::Month;
                        break 'next;
                    }
                    State::Month => {
                        let m = current as u8;
                        if len != 2 || byte != b'-' || m < 1 || m > 12 {
                            break 'outer;
                        }
                        date.month = m;
                        state = State::Day;
                        break 'next;
                    }
                    State::Day => {
                        let d = current as u8;
                        if len != 2 || d < 1 || d > days_in_month(date.year, date.month) {
                            break 'outer;
                        }
                        date.day = d;
                        value.date = Some(date);
                        if byte == b'T' || byte == b't' {
                            state = State::Hour;
                            break 'next;
                        } else if byte == b' '
                            && input.get(i + 1).is_some_and(|b| b.is_ascii_digit())
                        {
                            state = State::Hour;
                            break 'next;
                        } else {
                            valid = true;
                            break 'outer;
                        }
                    }
                    State::Hour => {
                        let h = current as u8;
                        if len != 2 || byte != b':' || h > 23 {
                            break 'outer;
                        }
                        time.hour = h;
                        state = State::Minute;
                        break 'next;
                    }
                    State::Minute => {
                        let m = current as u8;
                        if len != 2 || byte != b':' || m > 59 {
                            break 'outer;
                        }
                        time.minute = m;
                        state = State::Second;
                        break 'next;
                    }
                    State::Second => {
                        let s = current as u8;
                        // Second is allowed to be 60, for leap second rule.
                        if len != 2 || s > 60 {
                            break 'outer;
                        }
                        time.second = s;
                        value.time = Some(time);
                        if byte == b'.' {
                            state = State::Frac;
                            break 'next;
                        }
                        // fallthrough to check offset
                    }
                    State::Frac => {
                        if len == 0 {
                            break 'outer;
                        }
                        let nd = if len > 9 { 9u8 } else { len as u8 };
                        let mut nanos = current;
                        let mut s = nd;
                        while s < 9 {
                            nanos *= 10;
                            s += 1;
                        }
                        time.nanosecond = nanos;
                        time.precision = nd;
                        value.time = Some(time);
                        // fallthrough to check offset
                    }
                    State::OffHour => {
                        let h = current as u8;
                        if len != 2 || byte != b':' || h > 23 {
                            break 'outer;
                        }
                        off_hour = h;
                        state = State::OffMin;
                        break 'next;
                    }
                    State::OffMin => {
                        if len != 2 || current > 59 {
                            break 'outer;
                        }
                        value.offset = Some(TimeOffset::Custom {
                            negative: off_negative,
                            hours: off_hour,
                            minutes: current as u8,
                        });
                        valid = true;
                        break 'outer;
                    }
                }
                match byte {
                    b'Z' | b'z' => {
                        value.offset = Some(TimeOffset::Z);
                        i += 1;
                        valid = true;
                        break 'outer;
                    }
                    b'+' => {
                        off_negative = false;
                        state = State::OffHour;
                    }
                    b'-' => {
                        off_negative = true;
                        state = State::OffHour;
                    }
                    _ => {
                        valid = true;
                        break 'outer;
                    }
                }
            }
            i += 1;
            current = 0;
            len = 0;
        }
        if !valid || (value.date.is_none() && value.offset.is_some()) {
            return None;
        }
        Some((i, value))
    }
}

impl FromStr for Datetime {
    type Err = InvalidDatetime;

    fn from_str(s: &str) -> Result<Datetime, InvalidDatetime> {
        let value = Datetime::parse(s);
        if value.is_valid() {
            Ok(value)
        } else {
            Err(InvalidDatetime)
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.precision > 0 {
            let digits = format!("{:09}", self.nanosecond);
            write!(f, ".{}", &digits[..self.precision as usize])?;
        }
        Ok(())
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeOffset::Z => f.write_str("Z"),
            TimeOffset::Custom {
                negative,
                hours,
                minutes,
            } => {
                let sign = if negative { '-' } else { '+' };
                write!(f, "{sign}{hours:02}:{minutes:02}")
            }
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("invalid-datetime");
        }
        if let Some(date) = &self.date {
            write!(f, "{date}")?;
            if self.time.is_some() {
                f.write_str("T")?;
            }
        }
        if let Some(time) = &self.time {
            write!(f, "{time}")?;
            if self.date.is_some() {
                if let Some(offset) = &self.offset {
                    write!(f, "{offset}")?;
                }
            }
        }
        Ok(())
    }
}
