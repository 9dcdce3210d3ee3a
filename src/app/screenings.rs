// src/app/screenings.rs
use super::data::Screening;

pub const COMING_SOON: &str = "Coming Soon";

/// "date - time" of the very first showtime, or "Coming Soon" when nothing is scheduled.
pub fn first_screening_time(screenings: &[Screening]) -> String {
    let Some(first) = screenings.first() else {
        return COMING_SOON.to_string();
    };
    match first.showtimes.first() {
        Some(show) => format!("{} - {}", first.date(), show.time()),
        None if first.date().is_empty() => COMING_SOON.to_string(),
        None => first.date().to_string(),
    }
}

pub fn has_available_screenings(screenings: &[Screening]) -> bool {
    screenings
        .iter()
        .flat_map(|s| s.showtimes.iter())
        .any(|show| !show.is_sold_out())
}

/// Empty lists are "Coming Soon", never sold out.
pub fn is_all_sold_out(screenings: &[Screening]) -> bool {
    !screenings.is_empty()
        && screenings
            .iter()
            .all(|s| s.showtimes.iter().all(|show| show.is_sold_out()))
}

pub fn screening_dates(screenings: &[Screening]) -> Vec<&str> {
    screenings.iter().map(Screening::date).collect()
}
