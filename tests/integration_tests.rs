use fleet_charts::charts::colors::{SHIFT_PALETTE, create_color_map};
use fleet_charts::charts::distribution::trips_by_distance;
use fleet_charts::charts::heatmap::normalize_heatmap;
use fleet_charts::charts::unallocated::unallocated_trips_by_day;
use fleet_charts::charts::utility::{MAX_TICKS, y_ticks};
use fleet_charts::config::ChartConfig;
use fleet_charts::drivingbook::{Assignment, filter_trips};
use fleet_charts::parser::{parse_location_activity, parse_result_document};
use fleet_charts::results::{SimulationResults, convert_simulation_results};
use fleet_charts::table::{Order, TripColumn, UsageColumn, sort_rows};

fn fixture_results() -> SimulationResults {
    let bytes = include_bytes!("fixtures/simulation.json");
    let simulation = parse_result_document(bytes).expect("Failed to parse simulation");
    convert_simulation_results(&simulation).expect("Failed to convert simulation")
}

#[test]
fn test_full_pipeline() {
    let results = fixture_results();

    assert_eq!(results.unallocated_trips, 2);
    assert_eq!(results.total_trips, 6);
    assert_eq!(results.driving_book.len(), 6);
    assert_eq!(results.current_expense, 90000.0);
    assert_eq!(results.simulation_expense, 98000.0);
    assert_eq!(results.current_emission, 2.25);
    assert_eq!(results.simulation_emission, 0.9);
}

#[test]
fn test_driving_book_is_normalised() {
    let results = fixture_results();
    let first = &results.driving_book[0];

    assert_eq!(first.current_vehicle_name, "Toyota Yaris 1");
    assert_eq!(first.simulation_vehicle_name, "Cykel 1");
    assert_eq!(first.simulation_vehicle_id, Some(201));
    assert_eq!(results.driving_book[1].simulation_vehicle_id, None);
    assert!(results.driving_book[1].is_unallocated());
}

#[test]
fn test_fleet_changes() {
    let results = fixture_results();
    let rows: Vec<(&str, i64, i64, i64)> = results
        .vehicle_differences
        .iter()
        .map(|d| (d.name.as_str(), d.current_count, d.simulation_count, d.change_count))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Toyota Yaris", 1, 0, -1),
            ("VW ID.3", 1, 2, 1),
            ("Cykel", 1, 1, 0),
            ("El-cykel", 0, 1, 1),
        ]
    );
    assert_eq!(results.fleet_change_totals.current, 3);
    assert_eq!(results.fleet_change_totals.simulation, 4);
    assert_eq!(results.fleet_change_totals.change, 1);
}

#[test]
fn test_usage_tables() {
    let results = fixture_results();
    let yaris = &results.vehicle_usage.current[0];

    assert_eq!(yaris.annual_km, 12000.0);
    assert_eq!(yaris.wltp, "20,5 km/l");
    assert_eq!(yaris.annual_operating_cost, 8000.0);
    assert_eq!(yaris.annual_socioeconomic_cost, 2500.0);
    assert_eq!(results.vehicle_usage.simulation[3].total_annual_cost, 0.0);

    let by_cost = sort_rows(&results.vehicle_usage.current, UsageColumn::TotalAnnualCost, Order::Desc);
    let names: Vec<&str> = by_cost.iter().map(|r| r.vehicle.as_str()).collect();
    assert_eq!(names, vec!["VW ID.3 1", "Toyota Yaris 1", "Cykel 2", "Benzin Medarbejderbil"]);
}

#[test]
fn test_unallocated_by_day() {
    let results = fixture_results();
    let series = unallocated_trips_by_day(&results.driving_book);
    let points: Vec<(&str, u64)> = series.data.iter().map(|p| (p.x.as_str(), p.y)).collect();

    assert_eq!(series.id, "Simulation");
    assert_eq!(points, vec![("2024-04-08", 1), ("2024-04-09", 1), ("2024-04-10", 0)]);
    assert_eq!(
        points.iter().map(|(_, y)| y).sum::<u64>(),
        results.driving_book.iter().filter(|t| t.is_unallocated()).count() as u64
    );
}

#[test]
fn test_distance_distribution() {
    let results = fixture_results();
    let config = ChartConfig::default();

    let current = trips_by_distance(&results.driving_book, Assignment::Current, &config.distance);
    let simulated = trips_by_distance(&results.driving_book, Assignment::Simulation, &config.distance);

    let labels: Vec<&str> = current.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["0-20 km", "20-40 km", "40-60 km", "60-80 km", "80-100 km", "100+ km"]
    );

    assert_eq!((current[0].fossil_car, current[0].bike), (1, 1));
    assert_eq!(current[1].fossil_car, 2);
    assert_eq!(current[3].e_car, 1);
    assert_eq!(current[5].e_car, 1);

    assert_eq!((simulated[0].bike, simulated[0].e_bike), (1, 1));
    assert_eq!(simulated[1].e_car, 2);
    assert_eq!(simulated[3].unassigned, 1);
    assert_eq!(simulated[5].unassigned, 1);

    for rows in [&current, &simulated] {
        assert_eq!(rows.iter().map(|r| r.total()).sum::<usize>(), 6);
    }

    let totals: Vec<u64> = current.iter().map(|r| r.total() as u64).collect();
    assert_eq!(y_ticks(&totals, MAX_TICKS), vec![0, 1, 2]);
}

#[test]
fn test_driving_book_table() {
    let results = fixture_results();

    let by_distance = sort_rows(&results.driving_book, TripColumn::Distance, Order::Desc);
    let distances: Vec<f64> = by_distance.iter().map(|t| t.distance).collect();
    assert_eq!(distances, vec![145.5, 64.0, 33.3, 20.0, 12.4, 4.2]);

    assert_eq!(filter_trips(&results.driving_book, "id.3").len(), 4);
}

#[test]
fn test_heatmap_from_fixture() {
    let bytes = include_bytes!("fixtures/locations.json");
    let locations = parse_location_activity(bytes).expect("Failed to parse locations");

    let rows = normalize_heatmap(&locations).unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        let weeks: Vec<&str> = row.data.iter().map(|c| c.x.as_str()).collect();
        assert_eq!(weeks, vec!["2024-02", "2024-03", "2024-04"]);
    }

    let first = &rows[0];
    assert_eq!(first.location_id, "3");
    assert_eq!(first.id, "Rådhuspladsen 1");
    assert_eq!(first.data[0].start_date, "2024-01-08");
    assert_eq!(first.data[0].end_date, "2024-01-14");
    assert_eq!(first.data[1].y, 0.0);
    assert_eq!(first.data[1].start_date, "2024-01-15");
    assert_eq!(first.data[2].y, 0.9);
    assert_eq!(first.data[2].start_date, "2024-01-22");

    assert_eq!(rows[1].data[1].y, 0.1);
    assert_eq!(rows[1].data[2].y, 0.0);
}

#[test]
fn test_shift_colors() {
    let labels = ["Nat - Fra 22:00 til 06:00", "Dag - Fra 07:00 til 15:00"];
    let map = create_color_map(&labels, &SHIFT_PALETTE);

    assert_eq!(map["Dag - Fra 07:00 til 15:00"], SHIFT_PALETTE[0]);
    assert_eq!(map["Nat - Fra 22:00 til 06:00"], SHIFT_PALETTE[4]);
}
