use serde::Serialize;
use utoipa::ToSchema;

use super::clock::{ClockTime, Elapsed};
use super::punch::{break_duration, parse_punch_log};

/// Daily break allowance before early-arrival credit starts absorbing it.
pub const FIXED_BREAK: Elapsed = Elapsed::from_secs(60 * 60);

/// The raw inputs of one attendance day, as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTimes<'a> {
    pub scheduled_in: Option<&'a str>,
    pub scheduled_out: Option<&'a str>,
    pub actual_in: Option<&'a str>,
    pub actual_out: Option<&'a str>,
    pub punch_records: Option<&'a str>,
}

/// Everything derived from a day's raw times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TimeMetrics {
    #[schema(value_type = String, example = "00:10:00")]
    pub early_by_in: Elapsed,
    #[schema(value_type = String, example = "00:00:00")]
    pub late_by_out: Elapsed,
    #[schema(value_type = String, example = "00:00:00")]
    pub late_by: Elapsed,
    #[schema(value_type = String, example = "00:00:00")]
    pub early_going_by: Elapsed,
    #[schema(value_type = String, example = "01:30:00")]
    pub actual_break: Elapsed,
    #[schema(value_type = String, example = "00:10:00")]
    pub break_adjustment: Elapsed,
    #[schema(value_type = String, example = "01:20:00")]
    pub adjusted_break_result: Elapsed,
    #[schema(value_type = String, example = "00:00:00")]
    pub adjusted_overtime: Elapsed,
    #[schema(value_type = String, example = "07:50:00")]
    pub net_work_duration: Elapsed,
    /// Same value as `NetWorkDuration`.
    #[schema(value_type = String, example = "07:50:00")]
    pub work_duration: Elapsed,
    /// Same value as `AdjustedOvertime`.
    #[schema(value_type = String, example = "00:00:00")]
    pub overtime: Elapsed,
    #[schema(value_type = String, example = "09:10:00")]
    pub total_duration: Elapsed,
}

/// Derives the day's metrics. Missing or malformed inputs zero the metrics
/// that depend on them; this never fails.
pub fn compute(raw: &RawTimes<'_>) -> TimeMetrics {
    let scheduled_in = ClockTime::parse(raw.scheduled_in);
    let scheduled_out = ClockTime::parse(raw.scheduled_out);
    let actual_in = ClockTime::parse(raw.actual_in);
    let actual_out = ClockTime::parse(raw.actual_out);

    // Arrival and departure deltas are gated separately; each pair is
    // mutually exclusive only because both sides share the same guard.
    let early_by_in = match (scheduled_in, actual_in) {
        (Some(scheduled), Some(actual)) => scheduled.since(actual),
        _ => Elapsed::ZERO,
    };
    let late_by = match (scheduled_in, actual_in) {
        (Some(scheduled), Some(actual)) => actual.since(scheduled),
        _ => Elapsed::ZERO,
    };
    let late_by_out = match (scheduled_out, actual_out) {
        (Some(scheduled), Some(actual)) => actual.since(scheduled),
        _ => Elapsed::ZERO,
    };
    let early_going_by = match (scheduled_out, actual_out) {
        (Some(scheduled), Some(actual)) => scheduled.since(actual),
        _ => Elapsed::ZERO,
    };

    let actual_break = raw
        .punch_records
        .map(|log| break_duration(&parse_punch_log(log)))
        .unwrap_or(Elapsed::ZERO);

    let excess_break = actual_break.saturating_sub(FIXED_BREAK);
    let early_in_used_for_break = excess_break.min(early_by_in);
    let adjusted_break_result = actual_break.saturating_sub(early_in_used_for_break);
    let remaining_early_in = early_by_in.saturating_sub(early_in_used_for_break);
    let adjusted_overtime = late_by_out + remaining_early_in;

    let total_duration = match (actual_in, actual_out) {
        (Some(start), Some(end)) => end.since(start),
        _ => Elapsed::ZERO,
    };
    let net_work_duration = total_duration.saturating_sub(adjusted_break_result);

    TimeMetrics {
        early_by_in,
        late_by_out,
        late_by,
        early_going_by,
        actual_break,
        break_adjustment: early_in_used_for_break,
        adjusted_break_result,
        adjusted_overtime,
        net_work_duration,
        work_duration: net_work_duration,
        overtime: adjusted_overtime,
        total_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day<'a>(
        scheduled: (&'a str, &'a str),
        actual: (&'a str, &'a str),
        punches: &'a str,
    ) -> RawTimes<'a> {
        RawTimes {
            scheduled_in: Some(scheduled.0),
            scheduled_out: Some(scheduled.1),
            actual_in: Some(actual.0),
            actual_out: Some(actual.1),
            punch_records: Some(punches),
        }
    }

    fn secs(e: Elapsed) -> u64 {
        e.as_secs()
    }

    #[test]
    fn test_late_arrival_sets_only_late_by() {
        let m = compute(&day(("09:00:00", "18:00:00"), ("09:12:00", "18:00:00"), ""));
        assert_eq!(secs(m.late_by), 720);
        assert_eq!(secs(m.early_by_in), 0);
    }

    #[test]
    fn test_early_arrival_sets_only_early_by_in() {
        let m = compute(&day(("09:00:00", "18:00:00"), ("08:45:00", "18:00:00"), ""));
        assert_eq!(secs(m.early_by_in), 900);
        assert_eq!(secs(m.late_by), 0);
    }

    #[test]
    fn test_on_time_arrival_zeroes_both() {
        let m = compute(&day(("09:00:00", "18:00:00"), ("09:00:00", "18:00:00"), ""));
        assert!(m.late_by == Elapsed::ZERO && m.early_by_in == Elapsed::ZERO);
        assert!(m.late_by_out == Elapsed::ZERO && m.early_going_by == Elapsed::ZERO);
    }

    #[test]
    fn test_departure_deltas() {
        let late = compute(&day(("09:00:00", "18:00:00"), ("09:00:00", "18:30:00"), ""));
        assert_eq!(secs(late.late_by_out), 1800);
        assert_eq!(secs(late.early_going_by), 0);

        let early = compute(&day(("09:00:00", "18:00:00"), ("09:00:00", "17:40:00"), ""));
        assert_eq!(secs(early.early_going_by), 1200);
        assert_eq!(secs(early.late_by_out), 0);
    }

    #[test]
    fn test_break_overage_absorbed_by_early_arrival() {
        // 90 min break, arrived 10 min early.
        let m = compute(&day(
            ("09:00:00", "18:00:00"),
            ("08:50:00", "18:00:00"),
            "08:50:00:in,12:00:00:out,13:30:00:in,18:00:00:out",
        ));
        assert_eq!(secs(m.actual_break), 5400);
        assert_eq!(secs(m.break_adjustment), 600);
        assert_eq!(secs(m.adjusted_break_result), 4800);
        assert_eq!(secs(m.adjusted_overtime), 0);
        assert_eq!(secs(m.total_duration), 9 * 3600 + 600);
        assert_eq!(secs(m.net_work_duration), 9 * 3600 + 600 - 4800);
    }

    #[test]
    fn test_unused_early_credit_becomes_overtime() {
        // 30 min break within allowance, 20 min early, 15 min late out.
        let m = compute(&day(
            ("09:00:00", "18:00:00"),
            ("08:40:00", "18:15:00"),
            "12:00:00:out,12:30:00:in",
        ));
        assert_eq!(secs(m.break_adjustment), 0);
        assert_eq!(secs(m.adjusted_break_result), 1800);
        assert_eq!(secs(m.adjusted_overtime), 900 + 1200);
        assert_eq!(m.overtime, m.adjusted_overtime);
        assert_eq!(m.work_duration, m.net_work_duration);
    }

    #[test]
    fn test_missing_times_zero_dependent_metrics() {
        let m = compute(&RawTimes {
            scheduled_in: Some("09:00:00"),
            scheduled_out: Some("18:00:00"),
            actual_in: Some(""),
            actual_out: None,
            punch_records: None,
        });
        assert_eq!(m, TimeMetrics::default());
    }

    #[test]
    fn test_midnight_actual_in_is_absent() {
        let m = compute(&day(("09:00:00", "18:00:00"), ("00:00:00", "18:00:00"), ""));
        assert!(m.early_by_in == Elapsed::ZERO);
        assert!(m.total_duration == Elapsed::ZERO);
    }

    #[test]
    fn test_out_before_in_gives_zero_total() {
        let m = compute(&day(("22:00:00", "06:00:00"), ("22:00:00", "06:00:00"), ""));
        assert!(m.total_duration == Elapsed::ZERO);
        assert!(m.net_work_duration == Elapsed::ZERO);
    }

    #[test]
    fn test_break_longer_than_shift_clamps_net_work() {
        let m = compute(&day(
            ("09:00:00", "10:00:00"),
            ("09:00:00", "10:00:00"),
            "06:00:00:out,11:00:00:in",
        ));
        assert_eq!(secs(m.actual_break), 5 * 3600);
        assert!(m.net_work_duration == Elapsed::ZERO);
    }

    #[test]
    fn test_oversized_fields_degrade_to_zero() {
        let m = compute(&RawTimes {
            scheduled_in: Some("09:00:00"),
            scheduled_out: Some("18:00:00"),
            actual_in: Some("99999999999999999:00:00"),
            actual_out: Some("１８:００:００"),
            punch_records: Some("99999999999999999:00:00:out,99999999999999999:00:00:in"),
        });
        assert_eq!(m, TimeMetrics::default());

        let m = compute(&day(
            ("09:00:00", "18:00:00"),
            ("09:00:00", "5124095576030431:00:00"),
            "",
        ));
        assert_eq!(secs(m.late_by_out), 5_124_095_576_030_431 * 3600 - 18 * 3600);
        assert_eq!(m.adjusted_overtime, m.late_by_out);
    }

    #[test]
    fn test_derived_invariants_hold_over_a_grid() {
        let ins = ["08:00:00", "08:55:00", "09:00:00", "09:20:00", "10:45:00", ""];
        let outs = ["16:00:00", "17:59:59", "18:00:00", "19:30:00", ""];
        let logs = [
            "",
            "17:00:00:out",
            "12:00:00:out,13:00:00:in",
            "11:00:00:out,13:30:00:in,15:00:00:out,15:45:00:in",
        ];
        for actual_in in ins {
            for actual_out in outs {
                for log in logs {
                    let m = compute(&day(("09:00:00", "18:00:00"), (actual_in, actual_out), log));
                    assert!(m.adjusted_break_result <= m.actual_break);
                    assert!(m.net_work_duration <= m.total_duration);
                    assert!(m.late_by == Elapsed::ZERO || m.early_by_in == Elapsed::ZERO);
                    assert!(m.late_by_out == Elapsed::ZERO || m.early_going_by == Elapsed::ZERO);
                }
            }
        }
    }
}
