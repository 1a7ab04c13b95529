//! Simulation settings as a pure state transition.
//!
//! Every change to the settings goes through [`reduce`], which returns a new
//! state and leaves the old one untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::vehicles::SelectionGroup;

/// How many vehicles of one kind to put into the simulated fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationVehicle {
    pub id: i64,
    pub simulation_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location_id: Option<i64>,
    #[serde(default)]
    pub location_ids: Vec<i64>,
    #[serde(default)]
    pub intelligent_allocation: bool,
    #[serde(default)]
    pub limit_km: bool,
    #[serde(default)]
    pub simulation_vehicles: Vec<SimulationVehicle>,
    /// Vehicles the goal search must keep.
    #[serde(default)]
    pub fixed_vehicles: Vec<i64>,
}

impl SimulationSettings {
    /// Simulated count recorded for `id`, 0 when none is.
    pub fn simulation_count(&self, id: i64) -> usize {
        self.simulation_vehicles
            .iter()
            .find(|v| v.id == id)
            .map_or(0, |v| v.simulation_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    SetDates {
        start: NaiveDate,
        end: NaiveDate,
    },
    SetLocation(i64),
    SetLocations(Vec<i64>),
    SetIntelligentAllocation(bool),
    SetLimitKm(bool),
    /// Records a simulated count; a count of 0 drops the entry.
    SetSimulationVehicle(SimulationVehicle),
    SetGoalVehicles(Vec<i64>),
    /// Requests `count` vehicles of a selection group. With `restrict` the
    /// request is bounded by how many vehicles the group holds.
    SetGroupCount {
        group: SelectionGroup,
        count: usize,
        restrict: bool,
    },
}

fn with_simulation_vehicle(
    mut vehicles: Vec<SimulationVehicle>,
    vehicle: SimulationVehicle,
) -> Vec<SimulationVehicle> {
    vehicles.retain(|v| v.id != vehicle.id);
    if vehicle.simulation_count > 0 {
        vehicles.push(vehicle);
    }
    vehicles
}

/// Applies `action` to `state`.
pub fn reduce(state: &SimulationSettings, action: SettingsAction) -> SimulationSettings {
    let mut next = state.clone();
    match action {
        SettingsAction::SetDates { start, end } => {
            next.start_date = Some(start);
            next.end_date = Some(end);
        }
        SettingsAction::SetLocation(id) => next.location_id = Some(id),
        SettingsAction::SetLocations(ids) => next.location_ids = ids,
        SettingsAction::SetIntelligentAllocation(on) => next.intelligent_allocation = on,
        SettingsAction::SetLimitKm(on) => next.limit_km = on,
        SettingsAction::SetSimulationVehicle(vehicle) => {
            next.simulation_vehicles = with_simulation_vehicle(next.simulation_vehicles, vehicle);
        }
        SettingsAction::SetGoalVehicles(ids) => next.fixed_vehicles = ids,
        SettingsAction::SetGroupCount {
            group,
            count,
            restrict,
        } => {
            let count = match (restrict, group.count) {
                (true, 0) => 0,
                (true, available) if count > available => return next,
                _ => count,
            };

            next.fixed_vehicles.retain(|id| !group.group_ids.contains(id));
            next.fixed_vehicles
                .extend(group.group_ids.iter().take(count).copied());
            next.simulation_vehicles = with_simulation_vehicle(
                next.simulation_vehicles,
                SimulationVehicle {
                    id: group.vehicle.id,
                    simulation_count: count,
                },
            );
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::Vehicle;

    fn group(id: i64, ids: &[i64]) -> SelectionGroup {
        SelectionGroup {
            vehicle: Vehicle {
                id,
                ..Default::default()
            },
            count: ids.len(),
            group_ids: ids.to_vec(),
            extra: false,
        }
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let state = SimulationSettings::default();
        let next = reduce(&state, SettingsAction::SetLimitKm(true));

        assert!(next.limit_km);
        assert!(!state.limit_km);
    }

    #[test]
    fn test_set_simulation_vehicle_replaces_and_drops() {
        let state = reduce(
            &SimulationSettings::default(),
            SettingsAction::SetSimulationVehicle(SimulationVehicle {
                id: 4,
                simulation_count: 2,
            }),
        );
        let state = reduce(
            &state,
            SettingsAction::SetSimulationVehicle(SimulationVehicle {
                id: 4,
                simulation_count: 3,
            }),
        );
        assert_eq!(state.simulation_count(4), 3);
        assert_eq!(state.simulation_vehicles.len(), 1);

        let state = reduce(
            &state,
            SettingsAction::SetSimulationVehicle(SimulationVehicle {
                id: 4,
                simulation_count: 0,
            }),
        );
        assert!(state.simulation_vehicles.is_empty());
    }

    #[test]
    fn test_group_count_maps_to_concrete_ids() {
        let state = SimulationSettings {
            fixed_vehicles: vec![99, 11, 12],
            ..Default::default()
        };

        let next = reduce(
            &state,
            SettingsAction::SetGroupCount {
                group: group(10, &[10, 11, 12]),
                count: 2,
                restrict: true,
            },
        );

        assert_eq!(next.fixed_vehicles, vec![99, 10, 11]);
        assert_eq!(next.simulation_count(10), 2);
    }

    #[test]
    fn test_restricted_group_count_above_size_is_ignored() {
        let state = SimulationSettings::default();
        let next = reduce(
            &state,
            SettingsAction::SetGroupCount {
                group: group(10, &[10, 11]),
                count: 3,
                restrict: true,
            },
        );

        assert_eq!(next, state);
    }

    #[test]
    fn test_restricted_empty_group_forces_zero() {
        let state = SimulationSettings {
            simulation_vehicles: vec![SimulationVehicle {
                id: 5,
                simulation_count: 1,
            }],
            ..Default::default()
        };
        let next = reduce(
            &state,
            SettingsAction::SetGroupCount {
                group: group(5, &[]),
                count: 4,
                restrict: true,
            },
        );

        assert_eq!(next.simulation_count(5), 0);
    }

    #[test]
    fn test_unrestricted_group_count_may_exceed_group() {
        let next = reduce(
            &SimulationSettings::default(),
            SettingsAction::SetGroupCount {
                group: group(7, &[7]),
                count: 3,
                restrict: false,
            },
        );

        assert_eq!(next.fixed_vehicles, vec![7]);
        assert_eq!(next.simulation_count(7), 3);
    }

    #[test]
    fn test_settings_serialize_dates_as_iso() {
        let next = reduce(
            &SimulationSettings::default(),
            SettingsAction::SetDates {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            },
        );
        let json = serde_json::to_value(&next).unwrap();

        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["end_date"], "2024-03-31");
    }
}
