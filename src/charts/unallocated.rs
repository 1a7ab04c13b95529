use std::collections::HashMap;

use chrono::NaiveDate;

use crate::charts::types::{Point, Series};
use crate::drivingbook::Trip;

/// Id of the single series produced by [`unallocated_trips_by_day`].
pub const SIMULATION_SERIES: &str = "Simulation";

/// Counts, per start day, the trips the simulation could not allocate.
///
/// Every day with at least one trip gets a point, in the order the days first
/// appear in `trips`; days without trips are not filled in.
pub fn unallocated_trips_by_day(trips: &[Trip]) -> Series<u64> {
    let mut data: Vec<Point<u64>> = Vec::new();
    let mut positions: HashMap<NaiveDate, usize> = HashMap::new();

    for trip in trips {
        let day = trip.day();
        let position = *positions.entry(day).or_insert_with(|| {
            data.push(Point {
                x: day.format("%Y-%m-%d").to_string(),
                y: 0,
            });
            data.len() - 1
        });

        if trip.is_unallocated() {
            data[position].y += 1;
        }
    }

    Series {
        id: SIMULATION_SERIES.to_string(),
        data,
    }
}
