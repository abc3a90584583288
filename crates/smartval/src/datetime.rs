//! Date layouts and exact round-trip date resolution.
//!
//! Layouts use the single-letter tokens of the rule language (`Y-m-d`,
//! `d/m/Y H:i:s`, `Y-m-d\TH:i:sP`, ...). A value only matches a layout when
//! parsing it and rendering the result with the same layout gives back the
//! original text byte for byte, so out-of-range components such as
//! `2024-02-30` or zero-padding differences never slip through.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt;
use tracing::trace;

/// Layouts tried, in order, when no explicit layout is supplied.
pub const LEGACY_LAYOUTS: &[&str] = &[
    "Y-m-d",
    "Y-m",
    "d/m/Y",
    "m/Y",
    "Y-m-d H:i:s",
    "d/m/Y H:i:s",
    "Ymd",
    "d-m-Y",
    "d-M-Y",
    r"Y-m-d\TH:i:s.u",
    r"Y-m-d\TH:i:sP",
    r"Y-m-d\TH:i:sO",
    r"Y-m-d\TH:i:s",
    r"Y-m-d\TH:i:s.v",
    "d-M-Y H:i:s",
    "d-M-Y h:i:s A",
];

/// Which components a layout mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Components {
    year: bool,
    month: bool,
    day: bool,
    hour24: bool,
    hour12: bool,
    meridiem: bool,
    minute: bool,
    second: bool,
    offset: bool,
    timestamp: bool,
}

/// A compiled date layout.
#[derive(Clone, PartialEq, Eq)]
pub struct DateLayout {
    source: String,
    strftime: String,
    components: Components,
}

impl DateLayout {
    /// Compile a layout. Characters that are not layout tokens match
    /// themselves; `\` makes the next character literal.
    pub fn compile(layout: &str) -> Self {
        let mut strftime = String::with_capacity(layout.len() * 2);
        let mut components = Components::default();
        let mut chars = layout.chars();

        while let Some(c) = chars.next() {
            let spec = match c {
                'Y' => {
                    components.year = true;
                    "%Y"
                }
                'y' => {
                    components.year = true;
                    "%y"
                }
                'm' => {
                    components.month = true;
                    "%m"
                }
                'n' => {
                    components.month = true;
                    "%-m"
                }
                'M' => {
                    components.month = true;
                    "%b"
                }
                'F' => {
                    components.month = true;
                    "%B"
                }
                'd' => {
                    components.day = true;
                    "%d"
                }
                'j' => {
                    components.day = true;
                    "%-d"
                }
                'D' => "%a",
                'l' => "%A",
                'H' => {
                    components.hour24 = true;
                    "%H"
                }
                'G' => {
                    components.hour24 = true;
                    "%-H"
                }
                'h' => {
                    components.hour12 = true;
                    "%I"
                }
                'g' => {
                    components.hour12 = true;
                    "%-I"
                }
                'A' => {
                    components.meridiem = true;
                    "%p"
                }
                'a' => {
                    components.meridiem = true;
                    "%P"
                }
                'i' => {
                    components.minute = true;
                    "%M"
                }
                's' => {
                    components.second = true;
                    "%S"
                }
                'u' => "%6f",
                'v' => "%3f",
                'P' => {
                    components.offset = true;
                    "%:z"
                }
                'O' => {
                    components.offset = true;
                    "%z"
                }
                'U' => {
                    components.timestamp = true;
                    "%s"
                }
                '\\' => {
                    if let Some(literal) = chars.next() {
                        push_literal(&mut strftime, literal);
                    } else {
                        push_literal(&mut strftime, '\\');
                    }
                    continue;
                }
                other => {
                    push_literal(&mut strftime, other);
                    continue;
                }
            };
            strftime.push_str(spec);
        }

        Self {
            source: layout.to_string(),
            strftime,
            components,
        }
    }

    /// The layout as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parse `text` leniently. Components the layout does not mention
    /// default to 1970-01-01 00:00:00 UTC.
    pub fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.strftime)).ok()?;
        self.fill_defaults(&mut parsed);

        if self.components.offset {
            parsed.to_datetime().ok()
        } else {
            let naive = parsed.to_naive_datetime_with_offset(0).ok()?;
            let utc = FixedOffset::east_opt(0)?;
            Some(utc.from_utc_datetime(&naive))
        }
    }

    /// Render `datetime` with this layout.
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        datetime.format(&self.strftime).to_string()
    }

    /// Parse `text` and require the rendered result to equal it exactly.
    pub fn parse_exact(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let datetime = self.parse(text)?;
        if self.format(&datetime) == text {
            Some(datetime)
        } else {
            trace!(layout = %self.source, text, "date parsed but did not round-trip");
            None
        }
    }

    fn fill_defaults(&self, parsed: &mut Parsed) {
        let c = &self.components;
        // A timestamp pins every component; defaults would only conflict.
        if c.timestamp {
            return;
        }
        // Setters refuse to overwrite a parsed value, so each default only
        // lands where the layout left a gap.
        if !c.year {
            let _ = parsed.set_year(1970);
        }
        if !c.month {
            let _ = parsed.set_month(1);
        }
        if !c.day {
            let _ = parsed.set_day(1);
        }
        if c.hour12 && !c.meridiem {
            let _ = parsed.set_ampm(false);
        }
        if !c.hour24 && !c.hour12 {
            if c.meridiem {
                let _ = parsed.set_hour12(12);
            } else {
                let _ = parsed.set_hour(0);
            }
        }
        if !c.minute {
            let _ = parsed.set_minute(0);
        }
        if !c.second {
            let _ = parsed.set_second(0);
        }
    }
}

impl fmt::Debug for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DateLayout").field(&self.source).finish()
    }
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn push_literal(strftime: &mut String, c: char) {
    if c == '%' {
        strftime.push_str("%%");
    } else {
        strftime.push(c);
    }
}

/// Resolves text against explicit layouts or the ordered legacy list.
#[derive(Debug, Clone)]
pub struct DateTimeResolver {
    layouts: Vec<DateLayout>,
}

impl Default for DateTimeResolver {
    fn default() -> Self {
        Self::with_layouts(LEGACY_LAYOUTS.iter().copied())
    }
}

impl DateTimeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom ordered auto-detect list.
    pub fn with_layouts<I, S>(layouts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            layouts: layouts
                .into_iter()
                .map(|l| DateLayout::compile(l.as_ref()))
                .collect(),
        }
    }

    /// The auto-detect list, in trial order.
    pub fn layouts(&self) -> &[DateLayout] {
        &self.layouts
    }

    /// Exact round-trip match against one explicit layout.
    pub fn resolve(&self, layout: &str, text: &str) -> Option<DateTime<FixedOffset>> {
        DateLayout::compile(layout).parse_exact(text)
    }

    /// First auto-detect layout that round-trips `text`.
    pub fn detect(&self, text: &str) -> Option<(&DateLayout, DateTime<FixedOffset>)> {
        self.layouts
            .iter()
            .find_map(|layout| layout.parse_exact(text).map(|dt| (layout, dt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn round_trips_a_valid_date() {
        let layout = DateLayout::compile("Y-m-d");
        let dt = layout.parse_exact("2024-03-05").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));
        assert_eq!(layout.format(&dt), "2024-03-05");
    }

    #[test]
    fn rejects_impossible_day() {
        let layout = DateLayout::compile("Y-m-d");
        assert!(layout.parse_exact("2024-02-30").is_none());
        assert!(layout.parse_exact("1990-01-99").is_none());
    }

    #[test]
    fn rejects_missing_zero_padding() {
        let layout = DateLayout::compile("Y-m-d");
        assert!(layout.parse("2024-3-5").is_some());
        assert!(layout.parse_exact("2024-3-5").is_none());
    }

    #[test]
    fn unpadded_tokens() {
        let layout = DateLayout::compile("j/n/Y");
        assert!(layout.parse_exact("5/3/2024").is_some());
        assert!(layout.parse_exact("05/03/2024").is_none());
    }

    #[test]
    fn partial_layouts_default_missing_components() {
        let dt = DateLayout::compile("m/Y").parse_exact("07/2021").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 7, 1));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn escaped_literal_and_offset() {
        let layout = DateLayout::compile(r"Y-m-d\TH:i:sP");
        let dt = layout.parse_exact("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert!(layout.parse_exact("2024-01-15 10:30:00+02:00").is_none());
    }

    #[test]
    fn twelve_hour_clock() {
        let layout = DateLayout::compile("d-M-Y h:i:s A");
        let dt = layout.parse_exact("05-Mar-2024 01:15:00 PM").unwrap();
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn fractional_seconds() {
        assert!(DateLayout::compile(r"Y-m-d\TH:i:s.u")
            .parse_exact("2024-01-15T10:30:00.123456")
            .is_some());
        assert!(DateLayout::compile(r"Y-m-d\TH:i:s.v")
            .parse_exact("2024-01-15T10:30:00.123")
            .is_some());
    }

    #[test]
    fn percent_is_literal() {
        let layout = DateLayout::compile("Y%m");
        assert!(layout.parse_exact("2024%03").is_some());
    }

    #[test]
    fn detect_returns_first_round_trip_match() {
        let resolver = DateTimeResolver::new();

        let (layout, _) = resolver.detect("2024-03-05").unwrap();
        assert_eq!(layout.as_str(), "Y-m-d");

        let (layout, _) = resolver.detect("20240305").unwrap();
        assert_eq!(layout.as_str(), "Ymd");

        let (layout, _) = resolver.detect("05-Mar-2024").unwrap();
        assert_eq!(layout.as_str(), "d-M-Y");

        assert!(resolver.detect("not a date").is_none());
        assert!(resolver.detect("2024-02-30").is_none());
    }

    #[test]
    fn custom_layout_list() {
        let resolver = DateTimeResolver::with_layouts(["d.m.Y"]);
        assert!(resolver.detect("05.03.2024").is_some());
        assert!(resolver.detect("2024-03-05").is_none());
        assert!(resolver.resolve("Y-m-d", "2024-03-05").is_some());
    }
}
