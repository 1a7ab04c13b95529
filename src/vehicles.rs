//! Vehicle de-duplication for the selection views.
//!
//! Fleets often contain many functionally identical vehicles. The selection
//! views show one line per distinct vehicle with a count, while simulation
//! requests still need the concrete backend ids behind each line.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A vehicle as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Annual cost in kroner.
    #[serde(default)]
    pub omkostning_aar: Option<f64>,
    #[serde(default)]
    pub wltp_el: Option<f64>,
    #[serde(default)]
    pub wltp_fossil: Option<f64>,
    #[serde(default)]
    pub end_leasing: Option<String>,
    /// Attributes that play no part in grouping but are passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    /// Two vehicles are duplicates when make, model, annual cost, electric
    /// and fossil consumption, and lease end all match exactly.
    pub fn is_duplicate_of(&self, other: &Vehicle) -> bool {
        self.make == other.make
            && self.model == other.model
            && self.omkostning_aar == other.omkostning_aar
            && self.wltp_el == other.wltp_el
            && self.wltp_fossil == other.wltp_fossil
            && self.end_leasing == other.end_leasing
    }
}

/// A distinct vehicle together with every backend id it stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleGroup {
    /// First vehicle encountered with this attribute set.
    pub vehicle: Vehicle,
    pub count: usize,
    pub original_vehicles: Vec<i64>,
}

/// Collapses duplicate vehicles into groups in a single pass.
///
/// Groups keep the order in which their first member appeared, and every
/// input id lands in exactly one group.
pub fn reduce_duplicate_vehicles(vehicles: &[Vehicle]) -> Vec<VehicleGroup> {
    vehicles.iter().fold(Vec::<VehicleGroup>::new(), |mut groups, current| {
        match groups.iter_mut().find(|group| group.vehicle.is_duplicate_of(current)) {
            Some(group) => {
                group.original_vehicles.push(current.id);
                group.count += 1;
            }
            None => groups.push(VehicleGroup {
                vehicle: current.clone(),
                count: 1,
                original_vehicles: vec![current.id],
            }),
        }
        groups
    })
}

/// A line in the vehicle selection table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionGroup {
    pub vehicle: Vehicle,
    /// Vehicles of this kind available in the current fleet.
    pub count: usize,
    pub group_ids: Vec<i64>,
    /// Hypothetical vehicle added for the simulation only.
    pub extra: bool,
}

impl From<VehicleGroup> for SelectionGroup {
    fn from(group: VehicleGroup) -> Self {
        Self {
            vehicle: group.vehicle,
            count: group.count,
            group_ids: group.original_vehicles,
            extra: false,
        }
    }
}

/// Builds the selection table: grouped current vehicles followed by grouped
/// extra vehicles, which own no backend ids.
pub fn selection_groups(current: &[Vehicle], extra: &[Vehicle]) -> Vec<SelectionGroup> {
    let extras = reduce_duplicate_vehicles(extra)
        .into_iter()
        .map(|group| SelectionGroup {
            vehicle: group.vehicle,
            count: 0,
            group_ids: Vec::new(),
            extra: true,
        });

    reduce_duplicate_vehicles(current)
        .into_iter()
        .map(SelectionGroup::from)
        .chain(extras)
        .collect()
}
