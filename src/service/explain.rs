//! Main-reason heuristic for batch predictions
//!
//! Picks a short human-readable explanation from the raw ratings and delay
//! minutes. Sorts are stable, so ties fall back to the canonical
//! `SERVICE_FEATURES` declaration order (first listed wins).

use crate::models::{PassengerRecord, SATISFIED, SERVICE_FEATURES};

/// Derive the "Main Reason" string for one predicted row.
pub fn main_reason(record: &PassengerRecord, label: &str) -> String {
    if label.eq_ignore_ascii_case(SATISFIED) {
        // Highest-rated services, best first.
        let mut good: Vec<(&str, f64)> = SERVICE_FEATURES
            .iter()
            .zip(record.ratings.iter())
            .filter(|(_, &rating)| rating >= 4.0)
            .map(|((_, display), &rating)| (*display, rating))
            .collect();
        if good.is_empty() {
            return "Overall Experience".to_string();
        }
        good.sort_by(|a, b| b.1.total_cmp(&a.1));
        join_top_two(&good)
    } else {
        // Lowest-rated services, worst first.
        let mut poor: Vec<(&str, f64)> = SERVICE_FEATURES
            .iter()
            .zip(record.ratings.iter())
            .filter(|(_, &rating)| rating <= 2.0)
            .map(|((_, display), &rating)| (*display, rating))
            .collect();
        if !poor.is_empty() {
            poor.sort_by(|a, b| a.1.total_cmp(&b.1));
            return join_top_two(&poor);
        }
        if record.departure_delay > 30.0 {
            "Departure Delay".to_string()
        } else if record.arrival_delay > 30.0 {
            "Arrival Delay".to_string()
        } else {
            "Multiple Factors".to_string()
        }
    }
}

fn join_top_two(services: &[(&str, f64)]) -> String {
    services
        .iter()
        .take(2)
        .map(|(display, _)| *display)
        .collect::<Vec<_>>()
        .join(", ")
}
