//! WhatsApp hand-off: number formatting, deep links, message templates
//! and business-hours checks.

use std::collections::BTreeMap;

use chrono::prelude::*;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Regex, RegexBuilder};

pub const DESKTOP_BASE_URL: &str = "https://wa.me";
pub const MOBILE_BASE_URL: &str = "whatsapp://send";

/// Message behind the floating contact button
pub const DEFAULT_GREETING: &str = "Hi! I'd like to inquire about your jerseys.";

pub const OPEN_RESPONSE_TIME: &str = "Within 30 minutes";
pub const CLOSED_RESPONSE_TIME: &str = "Within 24 hours";

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

lazy_static! {
    static ref MOBILE_USER_AGENT: Regex = RegexBuilder::new("Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .case_insensitive(true)
        .build()
        .expect("Invalid mobile user agent pattern");
}

pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Digits only, prefixed with the country code unless already there
pub fn format_number(phone: &str, country_code: &str) -> String {
    let cleaned = phone.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if cleaned.starts_with(country_code) {
        cleaned
    } else {
        format!("{}{}", country_code, cleaned)
    }
}

pub fn generate_link(business_number: &str, message: &str, is_mobile: bool, country_code: &str) -> String {
    let base_url = if is_mobile { MOBILE_BASE_URL } else { DESKTOP_BASE_URL };
    format!(
        "{}?phone={}&text={}",
        base_url,
        format_number(business_number, country_code),
        encode_uri_component(message)
    )
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_USER_AGENT.is_match(user_agent)
}

fn greeting(customer_name: Option<&str>) -> String {
    match customer_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Hi, I'm {}. ", name),
        None => "Hi, ".to_string(),
    }
}

pub fn jersey_inquiry_message(jersey_name: &str, team: &str, size: &str, quantity: i32, customer_name: Option<&str>) -> String {
    format!(
        "{}I'm interested in purchasing:\n\n*Jersey:* {}\n*Team:* {}\n*Size:* {}\n*Quantity:* {}\n\nCould you please provide more details about availability and total price including delivery?",
        greeting(customer_name),
        jersey_name,
        team,
        size,
        quantity
    )
}

pub fn bulk_inquiry_message(item_count: i64) -> String {
    format!(
        "Hi, I'd like to inquire about a bulk order of {} jerseys. Could you provide pricing and delivery information?",
        item_count
    )
}

pub fn custom_request_message(team: &str, league: &str, jersey_name: &str, size: &str, customer_name: Option<&str>) -> String {
    format!(
        "{}I'm looking for a custom jersey:\n\n*Team:* {}\n*League:* {}\n*Jersey:* {}\n*Size:* {}\n\nIs this available? If so, what's the price and delivery time?",
        greeting(customer_name),
        team,
        league,
        jersey_name,
        size
    )
}

/// One line of an itemised cart message
#[derive(Clone, Debug, PartialEq)]
pub struct MessageLine<'a> {
    pub name: &'a str,
    pub team: &'a str,
    pub size: &'a str,
    pub quantity: i32,
    pub line_total: f64,
}

pub fn cart_inquiry_message(order_number: &str, lines: &[MessageLine], total: f64, customer_name: Option<&str>) -> String {
    let mut message = format!("{}I'd like to order the following (ref {}):\n", greeting(customer_name), order_number);
    for line in lines {
        message.push_str(&format!(
            "\n*{}* ({})\n*Size:* {} x {} = ₦{:.2}",
            line.name, line.team, line.size, line.quantity, line.line_total
        ));
    }
    message.push_str(&format!(
        "\n\n*Total:* ₦{:.2}\n\nCould you please confirm availability and delivery cost?",
        total
    ));
    message
}

/// Opening hours for one weekday, `HH:MM` strings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

/// Keyed by lowercase weekday name
pub type BusinessHours = BTreeMap<String, DayHours>;

fn open_day(open: &str, close: &str) -> DayHours {
    DayHours {
        open: Some(open.to_string()),
        close: Some(close.to_string()),
        closed: false,
    }
}

pub fn default_business_hours() -> BusinessHours {
    btreemap! {
        "monday".to_string() => open_day("09:00", "18:00"),
        "tuesday".to_string() => open_day("09:00", "18:00"),
        "wednesday".to_string() => open_day("09:00", "18:00"),
        "thursday".to_string() => open_day("09:00", "18:00"),
        "friday".to_string() => open_day("09:00", "18:00"),
        "saturday".to_string() => open_day("10:00", "16:00"),
        "sunday".to_string() => DayHours { closed: true, ..Default::default() },
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Open when today is not closed and `open <= HH:MM <= close`.
/// A missing bound compares as an empty string, so a day without `close` is never open.
pub fn is_business_open<Tz: TimeZone>(hours: &BusinessHours, now: &DateTime<Tz>) -> bool
where
    Tz::Offset: ::std::fmt::Display,
{
    let today = match hours.get(weekday_name(now.weekday())) {
        Some(today) if !today.closed => today,
        _ => return false,
    };

    let current = now.format("%H:%M").to_string();
    let open = today.open.as_ref().map(String::as_str).unwrap_or("");
    let close = today.close.as_ref().map(String::as_str).unwrap_or("");

    current.as_str() >= open && current.as_str() <= close
}

pub fn estimated_response_time<Tz: TimeZone>(hours: &BusinessHours, now: &DateTime<Tz>) -> &'static str
where
    Tz::Offset: ::std::fmt::Display,
{
    if is_business_open(hours, now) {
        OPEN_RESPONSE_TIME
    } else {
        CLOSED_RESPONSE_TIME
    }
}

/// Wall-clock time in the business timezone
pub fn local_time(now: DateTime<Utc>, utc_offset_seconds: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_get_country_code() {
        assert_eq!(format_number("+234 801 234 5678", "234"), "2348012345678");
        assert_eq!(format_number("801-234-5678", "234"), "2348012345678");
        assert_eq!(format_number("08012345678", "234"), "23408012345678");
    }

    #[test]
    fn links_depend_on_device() {
        assert_eq!(
            generate_link("2348012345678", "Hi there & welcome", false, "234"),
            "https://wa.me?phone=2348012345678&text=Hi%20there%20%26%20welcome"
        );
        assert_eq!(
            generate_link("08012345678", "ok", true, "234"),
            "whatsapp://send?phone=23408012345678&text=ok"
        );
    }

    #[test]
    fn encoding_matches_encode_uri_component() {
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_uri_component("*Size:* L\n"), "*Size%3A*%20L%0A");
        assert_eq!(encode_uri_component("₦"), "%E2%82%A6");
    }

    #[test]
    fn inquiry_message_template() {
        assert_eq!(
            jersey_inquiry_message("Home Kit", "Arsenal", "L", 2, Some("Tunde")),
            "Hi, I'm Tunde. I'm interested in purchasing:\n\n*Jersey:* Home Kit\n*Team:* Arsenal\n*Size:* L\n*Quantity:* 2\n\nCould you please provide more details about availability and total price including delivery?"
        );
        assert!(jersey_inquiry_message("Home Kit", "Arsenal", "L", 1, None).starts_with("Hi, I'm interested"));
        assert!(jersey_inquiry_message("Home Kit", "Arsenal", "L", 1, Some(" ")).starts_with("Hi, I'm interested"));
    }

    #[test]
    fn bulk_and_custom_templates() {
        assert_eq!(
            bulk_inquiry_message(12),
            "Hi, I'd like to inquire about a bulk order of 12 jerseys. Could you provide pricing and delivery information?"
        );
        assert_eq!(
            custom_request_message("Nigeria", "International", "1994 Home", "XL", None),
            "Hi, I'm looking for a custom jersey:\n\n*Team:* Nigeria\n*League:* International\n*Jersey:* 1994 Home\n*Size:* XL\n\nIs this available? If so, what's the price and delivery time?"
        );
    }

    #[test]
    fn cart_message_lists_lines_and_total() {
        let lines = vec![
            MessageLine {
                name: "Home Kit",
                team: "Arsenal",
                size: "L",
                quantity: 2,
                line_total: 30000.0,
            },
            MessageLine {
                name: "Away Kit",
                team: "Chelsea",
                size: "M",
                quantity: 1,
                line_total: 18000.0,
            },
        ];
        let message = cart_inquiry_message("ORD-20240307-0042", &lines, 48000.0, None);

        assert!(message.starts_with("Hi, I'd like to order the following (ref ORD-20240307-0042):"));
        assert!(message.contains("*Home Kit* (Arsenal)\n*Size:* L x 2 = ₦30000.00"));
        assert!(message.contains("*Total:* ₦48000.00"));
    }

    #[test]
    fn mobile_agents_are_detected() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; android 14)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0"
        ));
    }

    #[test]
    fn business_hours_window() {
        let hours = default_business_hours();
        // 2024-03-04 is a Monday
        let at = |h, m| Utc.ymd(2024, 3, 4).and_hms(h, m, 0);

        assert!(is_business_open(&hours, &at(9, 0)));
        assert!(is_business_open(&hours, &at(18, 0)));
        assert!(!is_business_open(&hours, &at(18, 1)));
        assert!(!is_business_open(&hours, &at(8, 59)));
        assert_eq!(estimated_response_time(&hours, &at(12, 0)), OPEN_RESPONSE_TIME);

        let sunday = Utc.ymd(2024, 3, 10).and_hms(12, 0, 0);
        assert!(!is_business_open(&hours, &sunday));
        assert_eq!(estimated_response_time(&hours, &sunday), CLOSED_RESPONSE_TIME);
    }

    #[test]
    fn missing_day_or_close_means_closed() {
        let mut hours = BusinessHours::new();
        hours.insert(
            "monday".to_string(),
            DayHours {
                open: Some("09:00".to_string()),
                ..Default::default()
            },
        );
        let monday_noon = Utc.ymd(2024, 3, 4).and_hms(12, 0, 0);

        assert!(!is_business_open(&hours, &monday_noon));
        assert!(!is_business_open(&BusinessHours::new(), &monday_noon));
    }

    #[test]
    fn local_time_applies_offset() {
        let now = Utc.ymd(2024, 3, 4).and_hms(16, 30, 0);
        let local = local_time(now, 3600);

        assert_eq!(local.format("%H:%M").to_string(), "17:30");
        assert!(is_business_open(&default_business_hours(), &local));
        assert!(!is_business_open(&default_business_hours(), &local_time(now, 7200)));
    }
}
