//! Pairwise interference arbitration over candidate `rx_signals_in` (§4.3.6).

use ew_types::{carrier_to_interference_db, overlap_pct, RfSignal};

/// Filters `candidates` down to a stable, order-independent survivor set:
/// no surviving carrier is fully dominated in-band by another.
pub fn arbitrate(candidates: Vec<RfSignal>) -> Vec<RfSignal> {
    let n = candidates.len();
    let mut blocked = vec![false; n];
    let mut degraded = vec![false; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let s = &candidates[i];
            let o = &candidates[j];
            let pct = overlap_pct(s, o);
            if pct == 0.0 {
                continue;
            }
            let ci_db = carrier_to_interference_db(s.power, o.power).value();

            if ci_db < 10.0 && pct >= 50.0 {
                if o.power.value() > s.power.value() {
                    blocked[i] = true;
                } else {
                    degraded[i] = true;
                }
            } else if ci_db < 15.0 && pct >= 25.0 {
                degraded[i] = true;
            }
        }
    }

    candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !blocked[*i])
        .map(|(i, s)| if degraded[i] { s.degraded() } else { s })
        .collect()
}
