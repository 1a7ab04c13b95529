//! Conversion of finished simulations into the shape the results view shows.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::drivingbook::{Trip, normalize_driving_book};
use crate::error::Result;
use crate::simulation::{FleetSimulationResult, GoalSimulationResult, GoalSolution, VehicleUsage};
use crate::usage::{self, VehicleUsageRow, convert_usage, get_number_value};

/// Usage rows of this name stand for employees' private cars and are not
/// part of the fleet.
const EMPLOYEE_CAR: &str = "Benzin Medarbejderbil";

/// How many vehicles of one model each fleet holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleDifference {
    pub name: String,
    pub current_count: i64,
    pub simulation_count: i64,
    pub change_count: i64,
}

/// Column sums of the fleet-change table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetChangeTotals {
    pub current: i64,
    pub simulation: i64,
    pub change: i64,
}

impl FleetChangeTotals {
    pub fn from_differences(differences: &[VehicleDifference]) -> Self {
        differences.iter().fold(Self::default(), |acc, d| Self {
            current: acc.current + d.current_count,
            simulation: acc.simulation + d.simulation_count,
            change: acc.change + d.change_count,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageTables {
    pub current: Vec<VehicleUsageRow>,
    pub simulation: Vec<VehicleUsageRow>,
}

/// A simulation ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults {
    pub unallocated_trips: u64,
    pub total_trips: u64,
    pub current_expense: f64,
    pub simulation_expense: f64,
    /// Tonnes CO2e per year.
    pub current_emission: f64,
    pub simulation_emission: f64,
    pub driving_book: Vec<Trip>,
    pub simulation_options: Value,
    pub vehicle_differences: Vec<VehicleDifference>,
    pub fleet_change_totals: FleetChangeTotals,
    pub vehicle_usage: UsageTables,
    /// Position among the goal-search solutions, if this is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_number: Option<usize>,
}

/// Trims a usage name and drops a trailing numeric token, so `Cykel 3` and
/// `Cykel 7` count as the same model. Employee cars normalise to `""`.
pub fn normalize_vehicle_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed == EMPLOYEE_CAR {
        return String::new();
    }
    let (head, last) = trimmed.rsplit_once(' ').unwrap_or(("", trimmed));
    if is_numeric_token(last) {
        head.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a whitespace-free token reads as a number. Rust's float parser
/// also takes `inf` and `nan`, which are names here, not numbers.
fn is_numeric_token(token: &str) -> bool {
    if matches!(token, "Infinity" | "+Infinity" | "-Infinity") {
        return true;
    }
    let has_letters = token
        .chars()
        .any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E'));
    !has_letters && token.parse::<f64>().is_ok()
}

fn sum_field(items: &[Value], key: &str) -> f64 {
    items.iter().map(|item| get_number_value(item.get(key))).sum()
}

/// Counts vehicles per normalised name, in order of first appearance.
pub fn vehicle_differences(current: &[Value], simulation: &[Value]) -> Vec<VehicleDifference> {
    let mut differences: Vec<VehicleDifference> = Vec::new();

    let mut count = |items: &[Value], is_simulation: bool| {
        for item in items {
            let raw = item.get(usage::VEHICLE).and_then(Value::as_str).unwrap_or("");
            let name = normalize_vehicle_name(raw);
            if name.is_empty() {
                continue;
            }
            let index = match differences.iter().position(|d| d.name == name) {
                Some(index) => index,
                None => {
                    differences.push(VehicleDifference {
                        name,
                        current_count: 0,
                        simulation_count: 0,
                        change_count: 0,
                    });
                    differences.len() - 1
                }
            };
            if is_simulation {
                differences[index].simulation_count += 1;
            } else {
                differences[index].current_count += 1;
            }
        }
    };
    count(current, false);
    count(simulation, true);

    for difference in &mut differences {
        difference.change_count = difference.simulation_count - difference.current_count;
    }
    differences
}

fn usage_tables(usage: &VehicleUsage) -> UsageTables {
    UsageTables {
        current: convert_usage(&usage.current),
        simulation: convert_usage(&usage.simulation),
    }
}

/// Converts a finished fleet simulation.
///
/// Expenses are the summed total annual cost of each fleet, emissions the
/// summed annual emission in tonnes.
///
/// # Errors
///
/// Fails when a driving-book entry cannot be normalised.
pub fn convert_simulation_results(input: &FleetSimulationResult) -> Result<SimulationResults> {
    let fleets = &input.results.vehicle_usage;
    let vehicle_differences = vehicle_differences(&fleets.current, &fleets.simulation);

    let results = SimulationResults {
        unallocated_trips: input.unallocated,
        total_trips: input.number_of_trips,
        current_expense: sum_field(&fleets.current, usage::TOTAL_ANNUAL_COST),
        simulation_expense: sum_field(&fleets.simulation, usage::TOTAL_ANNUAL_COST),
        current_emission: sum_field(&fleets.current, usage::ANNUAL_EMISSION) / 1000.0,
        simulation_emission: sum_field(&fleets.simulation, usage::ANNUAL_EMISSION) / 1000.0,
        driving_book: normalize_driving_book(&input.driving_book)?,
        simulation_options: input.simulation_options.clone(),
        fleet_change_totals: FleetChangeTotals::from_differences(&vehicle_differences),
        vehicle_differences,
        vehicle_usage: usage_tables(fleets),
        solution_number: None,
    };
    debug!(
        trips = results.driving_book.len(),
        models = results.vehicle_differences.len(),
        "Simulation results converted"
    );
    Ok(results)
}

/// Goal-search solutions fix exactly the vehicles they propose, one each.
fn goal_options(options: &Value) -> Value {
    let mut options = options.clone();
    if let Some(map) = options.as_object_mut() {
        let vehicles: Vec<Value> = map
            .get("fixed_vehicles")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .map(|id| serde_json::json!({ "id": id, "simulation_count": 1 }))
                    .collect()
            })
            .unwrap_or_default();
        map.remove("fixed_vehicles");
        map.insert("simulation_vehicles".to_string(), Value::Array(vehicles));
    }
    options
}

fn convert_goal_solution(
    index: usize,
    solution: &GoalSolution,
    options: &Value,
) -> Result<SimulationResults> {
    let tables = solution.results.clone().unwrap_or_default();
    let fleets = &tables.results.vehicle_usage;
    let driving_book = normalize_driving_book(&tables.driving_book)?;
    let vehicle_differences = vehicle_differences(&fleets.current, &fleets.simulation);

    Ok(SimulationResults {
        unallocated_trips: solution.unallocated,
        total_trips: driving_book.len() as u64,
        current_expense: solution.current_expense,
        simulation_expense: solution.simulation_expense,
        current_emission: solution.current_co2e,
        simulation_emission: solution.simulation_co2e,
        driving_book,
        simulation_options: options.clone(),
        fleet_change_totals: FleetChangeTotals::from_differences(&vehicle_differences),
        vehicle_differences,
        vehicle_usage: usage_tables(fleets),
        solution_number: Some(index),
    })
}

/// Converts every solution of a goal search.
pub fn convert_goal_solutions(input: &GoalSimulationResult) -> Result<Vec<SimulationResults>> {
    let options = goal_options(&input.simulation_options);
    input
        .solutions
        .iter()
        .enumerate()
        .map(|(index, solution)| convert_goal_solution(index, solution, &options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn usage_item(name: &str, cost: Value, emission: Value) -> Value {
        json!({
            "Køretøj": name,
            "Samlet Årlig Omkostning kr": cost,
            "Årlig udledning (kg CO2e)": emission,
        })
    }

    #[test]
    fn test_normalize_vehicle_name() {
        assert_eq!(normalize_vehicle_name("  Cykel 3 "), "Cykel");
        assert_eq!(normalize_vehicle_name("Toyota Yaris 1.0"), "Toyota Yaris");
        assert_eq!(normalize_vehicle_name("Tesla Model 3"), "Tesla Model");
        assert_eq!(normalize_vehicle_name("Peugeot e-208"), "Peugeot e-208");
        assert_eq!(normalize_vehicle_name("Skoda nan"), "Skoda nan");
        assert_eq!(normalize_vehicle_name("Benzin Medarbejderbil"), "");
        assert_eq!(normalize_vehicle_name("42"), "");
    }

    #[test]
    fn test_vehicle_differences_first_appearance_order() {
        let current = vec![
            usage_item("VW ID.3 1", json!(0), json!(0)),
            usage_item("Cykel 1", json!(0), json!(0)),
            usage_item("VW ID.3 2", json!(0), json!(0)),
            usage_item("Benzin Medarbejderbil", json!(0), json!(0)),
        ];
        let simulation = vec![
            usage_item("Cykel 1", json!(0), json!(0)),
            usage_item("Cykel 2", json!(0), json!(0)),
            usage_item("Renault Zoe 1", json!(0), json!(0)),
        ];

        let differences = vehicle_differences(&current, &simulation);
        let rows: Vec<(&str, i64, i64, i64)> = differences
            .iter()
            .map(|d| (d.name.as_str(), d.current_count, d.simulation_count, d.change_count))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("VW ID.3", 2, 0, -2),
                ("Cykel", 1, 2, 1),
                ("Renault Zoe", 0, 1, 1),
            ]
        );
        assert_eq!(
            FleetChangeTotals::from_differences(&differences),
            FleetChangeTotals {
                current: 3,
                simulation: 3,
                change: 0
            }
        );
    }

    #[test]
    fn test_convert_simulation_results_totals() {
        let input: FleetSimulationResult = serde_json::from_value(json!({
            "unallocated": 1,
            "number_of_trips": 2,
            "driving_book": [{
                "start_time": "2024-05-01T08:00:00",
                "end_time": "2024-05-01T09:00:00",
                "distance": 14.0,
                "current_vehicle_name": "Cykel 1",
                "current_type": 1,
                "simulation_vehicle_name": "",
                "simulation_type": -1
            }],
            "results": {"vehicle_usage": {
                "current": [
                    usage_item("Cykel 1", json!(1000), json!(0)),
                    usage_item("Toyota Yaris 2", json!("20000.5"), json!(1500)),
                ],
                "simulation": [
                    usage_item("Cykel 1", json!({"parsedValue": 1000}), json!(null)),
                ]
            }},
            "simulation_options": {"limit_km": false}
        }))
        .unwrap();

        let results = convert_simulation_results(&input).unwrap();

        assert_eq!(results.unallocated_trips, 1);
        assert_eq!(results.total_trips, 2);
        assert_eq!(results.current_expense, 21000.5);
        assert_eq!(results.simulation_expense, 1000.0);
        assert_eq!(results.current_emission, 1.5);
        assert_eq!(results.simulation_emission, 0.0);
        assert_eq!(results.driving_book.len(), 1);
        assert!(results.driving_book[0].is_unallocated());
        assert_eq!(results.vehicle_usage.current[1].total_annual_cost, 20000.5);
        assert_eq!(results.fleet_change_totals.change, -1);
        assert_eq!(results.simulation_options, json!({"limit_km": false}));
    }

    #[test]
    fn test_convert_rejects_bad_driving_book() {
        let input: FleetSimulationResult =
            serde_json::from_value(json!({"driving_book": [{"start_time": "2024-05-01"}]})).unwrap();

        assert!(convert_simulation_results(&input).is_err());
    }

    #[test]
    fn test_convert_goal_solutions() {
        let input: GoalSimulationResult = serde_json::from_value(json!({
            "solutions": [
                {
                    "unallocated": 0,
                    "current_expense": 100.0,
                    "simulation_expense": 80.0,
                    "current_co2e": 2.0,
                    "simulation_co2e": 1.5,
                    "results": {
                        "driving_book": [{
                            "start_time": "2024-05-01T08:00:00",
                            "end_time": "2024-05-01T08:30:00",
                            "distance": 3.0
                        }],
                        "results": {"vehicle_usage": {"current": [], "simulation": [
                            usage_item("Cykel 4", json!(0), json!(0))
                        ]}}
                    }
                },
                {"unallocated": 4}
            ],
            "simulation_options": {"fixed_vehicles": [7, 9], "limit_km": true}
        }))
        .unwrap();

        let solutions = convert_goal_solutions(&input).unwrap();

        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].solution_number, Some(0));
        assert_eq!(solutions[0].total_trips, 1);
        assert_eq!(solutions[0].simulation_expense, 80.0);
        assert_eq!(solutions[0].vehicle_differences[0].change_count, 1);
        assert_eq!(
            solutions[0].simulation_options["simulation_vehicles"],
            json!([{"id": 7, "simulation_count": 1}, {"id": 9, "simulation_count": 1}])
        );
        assert_eq!(solutions[1].total_trips, 0);
        assert_eq!(solutions[1].unallocated_trips, 4);
    }
}
