use super::clock::{Elapsed, parse_seconds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchKind {
    In,
    Out,
}

/// One clock event from a day's punch log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Punch {
    pub at: u64,
    pub kind: PunchKind,
}

/// Parses a comma-separated log of `HH:MM:SS:type` tokens.
///
/// Tokens with fewer than four colon-separated fields, or whose type is
/// neither `in` nor `out`, are dropped. The result is in log order.
pub fn parse_punch_log(raw: &str) -> Vec<Punch> {
    raw.split(',')
        .filter_map(|token| {
            let fields: Vec<&str> = token.trim().split(':').collect();
            if fields.len() < 4 {
                return None;
            }
            let kind = match fields[3] {
                "in" => PunchKind::In,
                "out" => PunchKind::Out,
                _ => return None,
            };
            Some(Punch {
                at: parse_seconds(&fields[..3].join(":")),
                kind,
            })
        })
        .collect()
}

/// Total time spent between each `out` and the next `in`, in time order.
///
/// A second `out` before any `in` replaces the pending one, and a trailing
/// `out` with nothing after it adds nothing.
pub fn break_duration(punches: &[Punch]) -> Elapsed {
    let mut ordered = punches.to_vec();
    ordered.sort_by_key(|p| p.at);

    let (total, _) = ordered
        .iter()
        .fold((0u64, None::<u64>), |(total, pending_out), punch| {
            match (punch.kind, pending_out) {
                (PunchKind::Out, _) => (total, Some(punch.at)),
                (PunchKind::In, Some(out)) => (total.saturating_add(punch.at.saturating_sub(out)), None),
                (PunchKind::In, None) => (total, None),
            }
        });

    Elapsed::from_secs(total)
}

/// True when the log holds an odd number of non-empty tokens.
pub fn has_missed_punch(raw: &str) -> bool {
    raw.split(',').filter(|token| !token.is_empty()).count() % 2 != 0
}
