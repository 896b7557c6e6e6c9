//! Appointment categorization, status badges and search.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::appointment::{Appointment, AppointmentStatus, StatusColor};

/// Problem with an individual record found while categorizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategorizeWarning {
    MalformedDatetime { appointment_id: String, value: String },
}

/// Appointment list split into dashboard tabs.
///
/// `orphaned` holds records no tab claims: open appointments whose time has
/// passed, closed ones dated in the future, unknown statuses and unparsable
/// datetimes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Categorized<'a> {
    pub upcoming: Vec<&'a Appointment>,
    pub past: Vec<&'a Appointment>,
    pub cancelled: Vec<&'a Appointment>,
    pub orphaned: Vec<&'a Appointment>,
    pub warnings: Vec<CategorizeWarning>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub upcoming: usize,
    pub past: usize,
    pub cancelled: usize,
    pub orphaned: usize,
}

impl Categorized<'_> {
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            upcoming: self.upcoming.len(),
            past: self.past.len(),
            cancelled: self.cancelled.len(),
            orphaned: self.orphaned.len(),
        }
    }
}

/// Parse an ISO 8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Split `appointments` into upcoming, past, cancelled and orphaned lists,
/// each in input order.
///
/// Cancelled appointments are cancelled whatever their date. Otherwise an
/// appointment is upcoming when it is pending or confirmed and later than
/// `now`, and past when it is completed or a no-show at or before `now`.
pub fn categorize(appointments: &[Appointment], now: DateTime<Utc>) -> Categorized<'_> {
    let mut out = Categorized::default();

    for appointment in appointments {
        if appointment.status == AppointmentStatus::Cancelled {
            out.cancelled.push(appointment);
            continue;
        }

        let Some(when) = parse_datetime(&appointment.appointment_datetime) else {
            warn!(
                appointment_id = %appointment.id,
                value = %appointment.appointment_datetime,
                "Unparsable appointment datetime"
            );
            out.warnings.push(CategorizeWarning::MalformedDatetime {
                appointment_id: appointment.id.clone(),
                value: appointment.appointment_datetime.clone(),
            });
            out.orphaned.push(appointment);
            continue;
        };

        match appointment.status {
            AppointmentStatus::Pending | AppointmentStatus::Confirmed if when > now => {
                out.upcoming.push(appointment)
            }
            AppointmentStatus::Completed | AppointmentStatus::NoShow if when <= now => {
                out.past.push(appointment)
            }
            _ => out.orphaned.push(appointment),
        }
    }

    debug!(counts = ?out.counts(), "Categorized appointments");
    out
}

pub fn status_color(status: &AppointmentStatus) -> StatusColor {
    match status {
        AppointmentStatus::Pending => StatusColor::Yellow,
        AppointmentStatus::Confirmed => StatusColor::Green,
        AppointmentStatus::Completed => StatusColor::Blue,
        AppointmentStatus::Cancelled => StatusColor::Red,
        AppointmentStatus::NoShow => StatusColor::Orange,
        AppointmentStatus::Other(_) => StatusColor::Gray,
    }
}

pub fn status_label(status: &AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "Pending",
        AppointmentStatus::Confirmed => "Confirmed",
        AppointmentStatus::Completed => "Completed",
        AppointmentStatus::Cancelled => "Cancelled",
        AppointmentStatus::NoShow => "No Show",
        AppointmentStatus::Other(_) => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status: AppointmentStatus,
    pub label: &'static str,
    pub color: StatusColor,
}

/// Badge for every known status, in lifecycle order.
pub fn status_catalog() -> Vec<StatusBadge> {
    AppointmentStatus::KNOWN
        .into_iter()
        .map(|status| StatusBadge {
            label: status_label(&status),
            color: status_color(&status),
            status,
        })
        .collect()
}

/// Case-insensitive substring search over patient, doctor and clinic names
/// and the visit reason. An empty query keeps everything.
pub fn filter_by_search<'a>(appointments: &'a [Appointment], query: &str) -> Vec<&'a Appointment> {
    if query.is_empty() {
        return appointments.iter().collect();
    }

    let needle = query.to_lowercase();
    appointments
        .iter()
        .filter(|a| {
            [
                &a.patient_name,
                &a.doctor_name,
                &a.clinic_name,
                &a.reason_for_visit,
            ]
            .into_iter()
            .any(|field| {
                field
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use fake::faker::company::en::CompanyName;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn at(offset: Duration, id: &str, status: AppointmentStatus) -> Appointment {
        Appointment::new(id, (now() + offset).to_rfc3339(), status)
    }

    fn ids(list: &[&Appointment]) -> Vec<String> {
        list.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn confirmed_tomorrow_is_upcoming_and_cancelled_is_only_cancelled() {
        let confirmed = [at(Duration::days(1), "a1", AppointmentStatus::Confirmed)];
        let result = categorize(&confirmed, now());
        assert_eq!(ids(&result.upcoming), vec!["a1"]);
        assert!(result.past.is_empty() && result.cancelled.is_empty());

        let cancelled = [at(Duration::days(1), "a1", AppointmentStatus::Cancelled)];
        let result = categorize(&cancelled, now());
        assert_eq!(ids(&result.cancelled), vec!["a1"]);
        assert!(result.upcoming.is_empty() && result.past.is_empty() && result.orphaned.is_empty());
    }

    #[test]
    fn pending_yesterday_lands_in_no_tab() {
        let list = [at(Duration::days(-1), "a1", AppointmentStatus::Pending)];
        let result = categorize(&list, now());

        assert!(result.upcoming.is_empty());
        assert!(result.past.is_empty());
        assert!(result.cancelled.is_empty());
        assert_eq!(ids(&result.orphaned), vec!["a1"]);
        assert!(result.warnings.is_empty());
    }

    #[test_case(AppointmentStatus::Pending, 1, "upcoming" ; "future pending")]
    #[test_case(AppointmentStatus::Confirmed, 1, "upcoming" ; "future confirmed")]
    #[test_case(AppointmentStatus::Completed, -1, "past" ; "past completed")]
    #[test_case(AppointmentStatus::NoShow, -1, "past" ; "past no show")]
    #[test_case(AppointmentStatus::Cancelled, -1, "cancelled" ; "past cancelled")]
    #[test_case(AppointmentStatus::Completed, 1, "orphaned" ; "future completed")]
    #[test_case(AppointmentStatus::Confirmed, -1, "orphaned" ; "past confirmed")]
    #[test_case(AppointmentStatus::Other("waitlisted".into()), 1, "orphaned" ; "unknown status")]
    fn buckets_by_status_and_time(status: AppointmentStatus, days: i64, bucket: &str) {
        let list = [at(Duration::days(days), "x", status)];
        let counts = categorize(&list, now()).counts();

        let actual = match counts {
            CategoryCounts { upcoming: 1, .. } => "upcoming",
            CategoryCounts { past: 1, .. } => "past",
            CategoryCounts { cancelled: 1, .. } => "cancelled",
            CategoryCounts { orphaned: 1, .. } => "orphaned",
            _ => "none",
        };
        assert_eq!(actual, bucket);
    }

    #[test]
    fn appointment_exactly_now_is_past() {
        let list = [
            at(Duration::zero(), "done", AppointmentStatus::Completed),
            at(Duration::zero(), "open", AppointmentStatus::Confirmed),
        ];
        let result = categorize(&list, now());

        assert_eq!(ids(&result.past), vec!["done"]);
        assert_eq!(ids(&result.orphaned), vec!["open"]);
    }

    #[test]
    fn buckets_keep_input_order() {
        let list = [
            at(Duration::hours(5), "c", AppointmentStatus::Pending),
            at(Duration::hours(1), "a", AppointmentStatus::Confirmed),
            at(Duration::days(-2), "old", AppointmentStatus::Completed),
            at(Duration::hours(3), "b", AppointmentStatus::Confirmed),
        ];
        let result = categorize(&list, now());

        assert_eq!(ids(&result.upcoming), vec!["c", "a", "b"]);
    }

    #[test]
    fn malformed_datetime_warns_without_failing_the_batch() {
        let list = [
            Appointment::new("bad", "next tuesday", AppointmentStatus::Confirmed),
            Appointment::new("bad-cancelled", "??", AppointmentStatus::Cancelled),
            at(Duration::days(2), "good", AppointmentStatus::Pending),
        ];
        let result = categorize(&list, now());

        assert_eq!(ids(&result.upcoming), vec!["good"]);
        assert_eq!(ids(&result.cancelled), vec!["bad-cancelled"]);
        assert_eq!(ids(&result.orphaned), vec!["bad"]);
        assert_eq!(
            result.warnings,
            vec![CategorizeWarning::MalformedDatetime {
                appointment_id: "bad".into(),
                value: "next tuesday".into()
            }]
        );
    }

    #[test_case("2026-03-10T12:00:00Z" ; "utc designator")]
    #[test_case("2026-03-10T14:00:00+02:00" ; "offset")]
    #[test_case("2026-03-10T12:00:00" ; "naive")]
    #[test_case("2026-03-10 12:00:00.000" ; "space separated")]
    fn parses_backend_timestamps(value: &str) {
        assert_eq!(parse_datetime(value), Some(now()));
    }

    #[test]
    fn random_lists_partition_exactly() {
        let statuses = [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
            AppointmentStatus::Other("rescheduled".into()),
        ];

        for _ in 0..20 {
            let len: usize = (0..60usize).fake();
            let list: Vec<Appointment> = (0..len)
                .map(|i| {
                    let status = statuses[(0..statuses.len()).fake::<usize>()].clone();
                    let hours: i64 = (-500i64..500).fake();
                    let mut a = at(Duration::hours(hours), &format!("apt-{i}"), status);
                    a.patient_name = Some(Name().fake());
                    a
                })
                .collect();

            let result = categorize(&list, now());
            let mut seen: Vec<String> = [
                &result.upcoming,
                &result.past,
                &result.cancelled,
                &result.orphaned,
            ]
            .iter()
            .flat_map(|bucket| ids(bucket))
            .collect();
            seen.sort();

            let mut expected: Vec<String> = list.iter().map(|a| a.id.clone()).collect();
            expected.sort();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn status_lookups_are_total() {
        let unknown = AppointmentStatus::Other("on_hold".into());

        assert_eq!(status_label(&unknown), "Unknown");
        assert_eq!(status_color(&unknown), StatusColor::Gray);
        assert_eq!(status_label(&AppointmentStatus::NoShow), "No Show");
        assert_eq!(status_color(&AppointmentStatus::Cancelled), StatusColor::Red);
    }

    #[test]
    fn catalog_lists_known_statuses() {
        let catalog = status_catalog();

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[0].status, AppointmentStatus::Pending);
        assert_eq!(catalog[0].color, StatusColor::Yellow);
        assert_eq!(catalog[4].label, "No Show");
    }

    fn searchable() -> Vec<Appointment> {
        let mut a = Appointment::new("1", "2026-03-11T09:00:00Z", AppointmentStatus::Confirmed);
        a.patient_name = Some("Maria Lopez".into());
        a.doctor_name = Some("Dr. Okafor".into());

        let mut b = Appointment::new("2", "2026-03-12T09:00:00Z", AppointmentStatus::Pending);
        b.clinic_name = Some("Riverside Family Clinic".into());
        b.reason_for_visit = Some("Annual checkup".into());

        let mut c = Appointment::new("3", "2026-03-13T09:00:00Z", AppointmentStatus::Pending);
        c.clinic_name = Some(CompanyName().fake());
        c.reason_for_visit = Some("Follow-up on LOPEZ referral".into());

        vec![a, b, c]
    }

    #[test]
    fn empty_query_returns_everything() {
        let list = searchable();
        let found = filter_by_search(&list, "");

        assert_eq!(found, list.iter().collect::<Vec<_>>());
    }

    #[test_case("lopez", &["1", "3"] ; "matches patient and reason case insensitively")]
    #[test_case("OKAFOR", &["1"] ; "matches doctor")]
    #[test_case("riverside", &["2"] ; "matches clinic")]
    #[test_case("checkup", &["2"] ; "matches reason")]
    #[test_case("cardiology", &[] ; "no match")]
    fn search_matches_any_field(query: &str, expected: &[&str]) {
        let list = searchable();
        let found = filter_by_search(&list, query);

        assert_eq!(ids(&found), expected);
    }
}
