use core_types::Lap;
use std::collections::BTreeMap;

/// Extracts one driver's lap times, ordered by lap number.
///
/// Providers do not guarantee ordering and occasionally repeat a lap; the last
/// record seen for a lap number wins. Laps without a time (pit laps, aborted
/// laps) leave gaps, and a gap ends a stint: only the longest run of
/// consecutive lap numbers is returned, the later one on a tie. Position `i`
/// of the result is lap `i + 1` of that stint.
pub fn lap_times_for(laps: &[Lap], driver_id: &str) -> Vec<f64> {
    let by_number: Vec<(u32, f64)> = laps
        .iter()
        .filter(|lap| lap.driver_id == driver_id && lap.number >= 1)
        .map(|lap| (lap.number, lap.time))
        .collect::<BTreeMap<u32, f64>>()
        .into_iter()
        .collect();

    let mut longest = 0..0;
    let mut start = 0;
    for i in 1..=by_number.len() {
        let run_ends = i == by_number.len() || by_number[i].0 != by_number[i - 1].0 + 1;
        if run_ends {
            if i - start >= longest.len() {
                longest = start..i;
            }
            start = i;
        }
    }

    by_number[longest].iter().map(|&(_, time)| time).collect()
}

/// Distinct driver ids present in a set of laps, in first-seen order.
pub fn drivers_in(laps: &[Lap]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for lap in laps {
        if !seen.iter().any(|id| id == &lap.driver_id) {
            seen.push(lap.driver_id.clone());
        }
    }
    seen
}
