//! Trip-distance histograms per vehicle category.

use serde::{Deserialize, Serialize};

use crate::charts::types::DistributionRow;
use crate::drivingbook::{Assignment, Trip, VehicleType};

/// Width of each distance bucket in kilometres.
pub const BUCKET_SIZE: f64 = 20.0;
/// Number of buckets, the last one open-ended.
pub const NUM_BUCKETS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub bucket_size: f64,
    pub num_buckets: usize,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            bucket_size: BUCKET_SIZE,
            num_buckets: NUM_BUCKETS,
        }
    }
}

impl BucketConfig {
    /// Bucket a distance falls in; anything at or past the start of the last
    /// bucket is clamped into it. Requires at least one bucket.
    pub fn bucket_index(&self, distance: f64) -> usize {
        let last = self.num_buckets - 1;
        if distance < last as f64 * self.bucket_size {
            ((distance / self.bucket_size).floor() as usize).min(last)
        } else {
            last
        }
    }

    fn empty_rows(&self) -> Vec<DistributionRow> {
        (0..self.num_buckets)
            .map(|i| {
                let lower = i as f64 * self.bucket_size;
                let label = if i + 1 < self.num_buckets {
                    format!("{}-{} km", lower, lower + self.bucket_size)
                } else {
                    format!("{}+ km", lower)
                };
                DistributionRow {
                    label,
                    km: lower,
                    bike: 0,
                    e_bike: 0,
                    e_car: 0,
                    fossil_car: 0,
                    unassigned: 0,
                }
            })
            .collect()
    }
}

impl DistributionRow {
    fn count(&mut self, vehicle_type: VehicleType) {
        match vehicle_type {
            VehicleType::Bike => self.bike += 1,
            VehicleType::EBike => self.e_bike += 1,
            VehicleType::ECar => self.e_car += 1,
            VehicleType::FossilCar => self.fossil_car += 1,
            VehicleType::Unallocated | VehicleType::Other(_) => self.unassigned += 1,
        }
    }
}

/// Builds the distance histogram for one side of the driving book.
///
/// Rows come out in ascending bucket order and their totals add up to the
/// number of trips. A config with no buckets yields no rows.
pub fn trips_by_distance(
    trips: &[Trip],
    assignment: Assignment,
    config: &BucketConfig,
) -> Vec<DistributionRow> {
    if config.num_buckets == 0 {
        return Vec::new();
    }

    let mut rows = config.empty_rows();
    for trip in trips {
        rows[config.bucket_index(trip.distance)].count(trip.vehicle_type(assignment));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivingbook::{RawTrip, normalize_trip};

    fn trip(distance: f64, current: i64, simulation: i64) -> Trip {
        let raw = RawTrip {
            start_time: Some("2024-01-01T08:00:00".to_string()),
            end_time: Some("2024-01-01T09:00:00".to_string()),
            distance: Some(distance),
            current_type: Some(current),
            simulation_type: Some(simulation),
            ..Default::default()
        };
        normalize_trip(0, &raw).unwrap()
    }

    #[test]
    fn test_bucket_boundaries() {
        let config = BucketConfig::default();
        assert_eq!(config.bucket_index(0.0), 0);
        assert_eq!(config.bucket_index(19.9), 0);
        assert_eq!(config.bucket_index(20.0), 1);
        assert_eq!(config.bucket_index(99.99), 4);
        assert_eq!(config.bucket_index(100.0), 5);
        assert_eq!(config.bucket_index(250.0), 5);
    }

    #[test]
    fn test_labels_and_order() {
        let rows = trips_by_distance(&[], Assignment::Current, &BucketConfig::default());
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();

        assert_eq!(
            labels,
            vec!["0-20 km", "20-40 km", "40-60 km", "60-80 km", "80-100 km", "100+ km"]
        );
        assert!(rows.windows(2).all(|w| w[0].km < w[1].km));
    }

    #[test]
    fn test_counts_per_assignment() {
        let trips = vec![
            trip(5.0, 4, 1),
            trip(25.0, 4, 2),
            trip(25.0, 3, -1),
            trip(300.0, 7, 3),
        ];
        let config = BucketConfig::default();

        let current = trips_by_distance(&trips, Assignment::Current, &config);
        let simulated = trips_by_distance(&trips, Assignment::Simulation, &config);

        assert_eq!(current[0].fossil_car, 1);
        assert_eq!(current[1].fossil_car, 1);
        assert_eq!(current[1].e_car, 1);
        assert_eq!(current[5].unassigned, 1);

        assert_eq!(simulated[0].bike, 1);
        assert_eq!(simulated[1].e_bike, 1);
        assert_eq!(simulated[1].unassigned, 1);
        assert_eq!(simulated[5].e_car, 1);
    }

    #[test]
    fn test_totals_match_trip_count() {
        let trips: Vec<Trip> = (0..50).map(|i| trip(i as f64 * 3.7, i % 6, (i % 5) - 1)).collect();

        for assignment in [Assignment::Current, Assignment::Simulation] {
            let rows = trips_by_distance(&trips, assignment, &BucketConfig::default());
            assert_eq!(rows.iter().map(DistributionRow::total).sum::<usize>(), trips.len());
        }
    }

    #[test]
    fn test_custom_bucket_config() {
        let config = BucketConfig {
            bucket_size: 10.0,
            num_buckets: 3,
        };
        let rows = trips_by_distance(&[trip(15.0, 1, 1)], Assignment::Current, &config);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].label, "20+ km");
        assert_eq!(rows[1].bike, 1);
    }

    #[test]
    fn test_zero_buckets() {
        let config = BucketConfig {
            bucket_size: 20.0,
            num_buckets: 0,
        };
        assert!(trips_by_distance(&[trip(1.0, 1, 1)], Assignment::Current, &config).is_empty());
    }
}
