//! Monthly late-arrival escalation.
//!
//! Every moderate late arrival in a calendar month bumps a per-employee
//! counter: the first three are labelled in order and the fourth onward costs
//! a half day. Arrivals more than thirty minutes late cost a half day on
//! their own and leave the counter alone. Counters restart every month, so
//! remarks are always derived from the whole month, whatever sub-range is
//! being displayed.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};

use super::calendar::{MonthWindow, first_of_month};
use super::clock::Elapsed;

/// Lateness up to this is tolerated without a remark.
pub const GRACE_PERIOD: Elapsed = Elapsed::from_secs(5 * 60);
/// Lateness beyond this is a half day outright.
pub const HALF_DAY_THRESHOLD: Elapsed = Elapsed::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumString)]
pub enum LateRemark {
    #[strum(serialize = "1st Late")]
    FirstLate,
    #[strum(serialize = "2nd Late")]
    SecondLate,
    #[strum(serialize = "3rd Late")]
    ThirdLate,
    #[strum(serialize = "Half Day (Late Limit)")]
    LateLimitHalfDay,
    #[strum(serialize = "Half Day (>30m)")]
    SevereLateHalfDay,
}

impl LateRemark {
    fn for_count(count: u32) -> Self {
        match count {
            1 => LateRemark::FirstLate,
            2 => LateRemark::SecondLate,
            3 => LateRemark::ThirdLate,
            _ => LateRemark::LateLimitHalfDay,
        }
    }
}

/// Identifies one employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemarkKey {
    pub employee_id: String,
    pub attendance_date: NaiveDate,
}

/// One stored lateness value, as read for classification.
#[derive(Debug, Clone, FromRow)]
pub struct LateByEntry {
    #[sqlx(rename = "EmployeeID")]
    pub employee_id: String,
    #[sqlx(rename = "AttendanceDate")]
    pub attendance_date: NaiveDate,
    #[sqlx(rename = "LateBy")]
    pub late_by: Option<String>,
}

/// Running late counts per employee and calendar month.
#[derive(Debug, Default)]
pub struct LateCounters(HashMap<(String, NaiveDate), u32>);

impl LateCounters {
    /// Classifies one day and advances the employee's counter for that
    /// day's month when the day counts towards the monthly limit.
    pub fn observe(&mut self, employee_id: &str, date: NaiveDate, late_by: Elapsed) -> Option<LateRemark> {
        if late_by > HALF_DAY_THRESHOLD {
            return Some(LateRemark::SevereLateHalfDay);
        }
        if late_by <= GRACE_PERIOD {
            return None;
        }
        let count = self
            .0
            .entry((employee_id.to_string(), first_of_month(date)))
            .or_insert(0);
        *count += 1;
        Some(LateRemark::for_count(*count))
    }
}

/// Remarks for every remarked employee-day among `entries`.
///
/// `entries` should cover whole months; they are folded in date order so the
/// caller's ordering does not matter.
pub fn remark_ledger(entries: &[LateByEntry]) -> HashMap<RemarkKey, LateRemark> {
    let mut ordered: Vec<&LateByEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.attendance_date);

    let (_, ledger) = ordered.into_iter().fold(
        (LateCounters::default(), HashMap::new()),
        |(mut counters, mut ledger), entry| {
            let late_by = entry.late_by.as_deref().map(Elapsed::parse).unwrap_or_default();
            if let Some(remark) = counters.observe(&entry.employee_id, entry.attendance_date, late_by) {
                ledger.insert(
                    RemarkKey {
                        employee_id: entry.employee_id.clone(),
                        attendance_date: entry.attendance_date,
                    },
                    remark,
                );
            }
            (counters, ledger)
        },
    );

    ledger
}

/// A row that can carry a late remark.
pub trait Remarkable {
    fn employee_id(&self) -> &str;
    fn attendance_date(&self) -> NaiveDate;
    fn set_late_remark(&mut self, remark: Option<LateRemark>);
}

/// Stamps every record with its remark from `ledger`, clearing the rest.
pub fn apply_remarks<R: Remarkable>(records: &mut [R], ledger: &HashMap<RemarkKey, LateRemark>) {
    for record in records.iter_mut() {
        let key = RemarkKey {
            employee_id: record.employee_id().to_string(),
            attendance_date: record.attendance_date(),
        };
        record.set_late_remark(ledger.get(&key).copied());
    }
}

/// Reads every lateness value of `employee_ids` within `window`, oldest first.
pub async fn fetch_late_by_entries(
    pool: &MySqlPool,
    employee_ids: &[String],
    window: MonthWindow,
) -> Result<Vec<LateByEntry>, sqlx::Error> {
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; employee_ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT EmployeeID, AttendanceDate, CAST(LateBy AS CHAR) AS LateBy
        FROM AttendanceLog
        WHERE EmployeeID IN ({})
        AND AttendanceDate BETWEEN ? AND ?
        ORDER BY AttendanceDate ASC
        "#,
        placeholders
    );

    let mut query = sqlx::query_as::<_, LateByEntry>(&sql);
    for employee_id in employee_ids {
        query = query.bind(employee_id);
    }
    query
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await
}

/// Classifies `records`, whose dates lie within `range_start..=range_end`,
/// against the full months around that range.
///
/// A failed read is returned as-is; records are never remarked from a partial
/// month.
pub async fn annotate_late_remarks<R: Remarkable>(
    pool: &MySqlPool,
    records: &mut [R],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<(), sqlx::Error> {
    if records.is_empty() {
        return Ok(());
    }

    let mut employee_ids: Vec<String> = records
        .iter()
        .map(|r| r.employee_id().to_string())
        .collect();
    employee_ids.sort();
    employee_ids.dedup();

    let window = MonthWindow::spanning(range_start, range_end);
    let entries = fetch_late_by_entries(pool, &employee_ids, window).await?;
    tracing::debug!(
        employees = employee_ids.len(),
        entries = entries.len(),
        start = %window.start,
        end = %window.end,
        "Classifying late remarks"
    );

    apply_remarks(records, &remark_ledger(&entries));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Day {
        employee: String,
        date: NaiveDate,
        remark: Option<LateRemark>,
    }

    impl Remarkable for Day {
        fn employee_id(&self) -> &str {
            &self.employee
        }

        fn attendance_date(&self) -> NaiveDate {
            self.date
        }

        fn set_late_remark(&mut self, remark: Option<LateRemark>) {
            self.remark = remark;
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn entry(employee: &str, d: u32, late_by: &str) -> LateByEntry {
        LateByEntry {
            employee_id: employee.to_string(),
            attendance_date: date(d),
            late_by: Some(late_by.to_string()),
        }
    }

    fn remark_of(ledger: &HashMap<RemarkKey, LateRemark>, employee: &str, d: u32) -> Option<LateRemark> {
        ledger
            .get(&RemarkKey {
                employee_id: employee.to_string(),
                attendance_date: date(d),
            })
            .copied()
    }

    fn classify(entries: &[LateByEntry], from: u32, to: u32) -> Vec<Day> {
        let ledger = remark_ledger(entries);
        let mut days: Vec<Day> = entries
            .iter()
            .filter(|e| (date(from)..=date(to)).contains(&e.attendance_date))
            .map(|e| Day {
                employee: e.employee_id.clone(),
                date: e.attendance_date,
                remark: None,
            })
            .collect();
        apply_remarks(&mut days, &ledger);
        days
    }

    #[test]
    fn test_remark_labels() {
        assert_eq!(LateRemark::FirstLate.to_string(), "1st Late");
        assert_eq!(LateRemark::SecondLate.to_string(), "2nd Late");
        assert_eq!(LateRemark::ThirdLate.to_string(), "3rd Late");
        assert_eq!(LateRemark::LateLimitHalfDay.to_string(), "Half Day (Late Limit)");
        assert_eq!(LateRemark::SevereLateHalfDay.as_ref(), "Half Day (>30m)");
        assert_eq!("2nd Late".parse::<LateRemark>().unwrap(), LateRemark::SecondLate);
    }

    #[test]
    fn test_escalates_through_the_month() {
        let entries = vec![
            entry("E1", 4, "00:10:00"),
            entry("E1", 5, "00:00:00"),
            entry("E1", 11, "00:10:00"),
            entry("E1", 18, "00:10:00"),
            entry("E1", 25, "00:10:00"),
            entry("E1", 26, "00:10:00"),
        ];
        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 4), Some(LateRemark::FirstLate));
        assert_eq!(remark_of(&ledger, "E1", 5), None);
        assert_eq!(remark_of(&ledger, "E1", 11), Some(LateRemark::SecondLate));
        assert_eq!(remark_of(&ledger, "E1", 18), Some(LateRemark::ThirdLate));
        assert_eq!(remark_of(&ledger, "E1", 25), Some(LateRemark::LateLimitHalfDay));
        assert_eq!(remark_of(&ledger, "E1", 26), Some(LateRemark::LateLimitHalfDay));
    }

    #[test]
    fn test_severe_late_does_not_advance_counter() {
        let entries = vec![entry("E1", 2, "00:45:00"), entry("E1", 3, "00:06:00")];
        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 2), Some(LateRemark::SevereLateHalfDay));
        assert_eq!(remark_of(&ledger, "E1", 3), Some(LateRemark::FirstLate));
    }

    #[test]
    fn test_threshold_boundaries() {
        let entries = vec![
            entry("E1", 1, "00:05:00"),
            entry("E1", 2, "00:05:01"),
            entry("E1", 3, "00:30:00"),
            entry("E1", 4, "00:30:01"),
        ];
        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 1), None);
        assert_eq!(remark_of(&ledger, "E1", 2), Some(LateRemark::FirstLate));
        assert_eq!(remark_of(&ledger, "E1", 3), Some(LateRemark::SecondLate));
        assert_eq!(remark_of(&ledger, "E1", 4), Some(LateRemark::SevereLateHalfDay));
    }

    #[test]
    fn test_counters_are_per_employee() {
        let entries = vec![
            entry("E1", 1, "00:10:00"),
            entry("E2", 1, "00:10:00"),
            entry("E1", 2, "00:10:00"),
        ];
        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 2), Some(LateRemark::SecondLate));
        assert_eq!(remark_of(&ledger, "E2", 1), Some(LateRemark::FirstLate));
    }

    #[test]
    fn test_entry_order_does_not_matter() {
        let entries = vec![entry("E1", 20, "00:10:00"), entry("E1", 3, "00:10:00")];
        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 3), Some(LateRemark::FirstLate));
        assert_eq!(remark_of(&ledger, "E1", 20), Some(LateRemark::SecondLate));
    }

    #[test]
    fn test_missing_or_malformed_late_by_is_not_late() {
        let mut missing = entry("E1", 1, "");
        missing.late_by = None;
        let entries = vec![missing, entry("E1", 2, "late"), entry("E1", 3, "00:10:00")];
        let ledger = remark_ledger(&entries);
        assert_eq!(ledger.len(), 1);
        assert_eq!(remark_of(&ledger, "E1", 3), Some(LateRemark::FirstLate));
    }

    #[test]
    fn test_sub_range_matches_full_month() {
        let entries = vec![
            entry("E1", 3, "00:10:00"),
            entry("E1", 9, "00:10:00"),
            entry("E1", 16, "00:10:00"),
            entry("E1", 29, "00:10:00"),
            entry("E2", 20, "00:50:00"),
            entry("E2", 21, "00:07:00"),
        ];
        let full = classify(&entries, 1, 31);
        let tail = classify(&entries, 15, 31);

        let remark_on = |days: &[Day], employee: &str, d: u32| {
            days.iter()
                .find(|day| day.employee == employee && day.date == date(d))
                .and_then(|day| day.remark)
        };
        assert_eq!(remark_on(&tail, "E1", 29), Some(LateRemark::LateLimitHalfDay));
        for (employee, d) in [("E1", 16), ("E1", 29), ("E2", 20), ("E2", 21)] {
            assert_eq!(remark_on(&full, employee, d), remark_on(&tail, employee, d));
        }
    }

    #[test]
    fn test_counters_restart_each_month() {
        let mut entries: Vec<LateByEntry> = [4, 11, 18]
            .into_iter()
            .map(|d| entry("E1", d, "00:10:00"))
            .collect();
        entries.push(LateByEntry {
            employee_id: "E1".to_string(),
            attendance_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            late_by: Some("00:10:00".to_string()),
        });

        let ledger = remark_ledger(&entries);
        assert_eq!(remark_of(&ledger, "E1", 18), Some(LateRemark::ThirdLate));
        let april = RemarkKey {
            employee_id: "E1".to_string(),
            attendance_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        };
        assert_eq!(ledger.get(&april), Some(&LateRemark::FirstLate));
    }

    #[test]
    fn test_apply_clears_unremarked_rows() {
        let mut days = vec![Day {
            employee: "E1".to_string(),
            date: date(1),
            remark: Some(LateRemark::ThirdLate),
        }];
        apply_remarks(&mut days, &HashMap::new());
        assert_eq!(days[0].remark, None);
    }
}
