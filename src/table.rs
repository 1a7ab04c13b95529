//! Sorting for the results tables.
//!
//! Tables are sorted on one column at a time. Rows that compare equal keep
//! their original relative order in both directions.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::drivingbook::Trip;
use crate::error::PipelineError;
use crate::usage::VehicleUsageRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Order {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(PipelineError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// A cell value as seen by the comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Time(NaiveDateTime),
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Text(_) => 1,
            SortValue::Time(_) => 2,
        }
    }

    /// Total order over cell values. NaN sorts above every number, and values
    /// of different kinds order as numbers, then text, then times.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            },
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A table row that can be sorted by one of its columns.
pub trait Sortable {
    type Column: Copy;

    fn sort_value(&self, column: Self::Column) -> SortValue<'_>;
}

/// Orders `a` before `b` when `b < a`, i.e. descending.
fn descending<T: Sortable>(a: &T, b: &T, column: T::Column) -> Ordering {
    b.sort_value(column).total_cmp(&a.sort_value(column))
}

/// Comparator for one column and direction.
pub fn comparator<T: Sortable>(order: Order, column: T::Column) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| match order {
        Order::Desc => descending(a, b, column),
        Order::Asc => descending(a, b, column).reverse(),
    }
}

/// Sorts with `compare`, breaking ties on original position.
pub fn stable_sort<T, F>(rows: &[T], compare: F) -> Vec<&T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut indexed: Vec<(usize, &T)> = rows.iter().enumerate().collect();
    indexed.sort_unstable_by(|(ia, a), (ib, b)| compare(*a, *b).then(ia.cmp(ib)));
    indexed.into_iter().map(|(_, row)| row).collect()
}

/// Sorts table rows by a column.
pub fn sort_rows<T: Sortable>(rows: &[T], column: T::Column, order: Order) -> Vec<&T> {
    stable_sort(rows, comparator::<T>(order, column))
}

/// Sortable columns of the vehicle-usage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageColumn {
    Vehicle,
    AllocatedKm,
    AnnualKm,
    Wltp,
    AllocatedEmission,
    AnnualEmission,
    AnnualCost,
    AnnualOperatingCost,
    AnnualSocioeconomicCost,
    TotalAnnualCost,
}

impl Sortable for VehicleUsageRow {
    type Column = UsageColumn;

    fn sort_value(&self, column: UsageColumn) -> SortValue<'_> {
        match column {
            UsageColumn::Vehicle => SortValue::Text(&self.vehicle),
            UsageColumn::AllocatedKm => SortValue::Number(self.allocated_km),
            UsageColumn::AnnualKm => SortValue::Number(self.annual_km),
            UsageColumn::Wltp => SortValue::Text(&self.wltp),
            UsageColumn::AllocatedEmission => SortValue::Number(self.allocated_emission),
            UsageColumn::AnnualEmission => SortValue::Number(self.annual_emission),
            UsageColumn::AnnualCost => SortValue::Number(self.annual_cost),
            UsageColumn::AnnualOperatingCost => SortValue::Number(self.annual_operating_cost),
            UsageColumn::AnnualSocioeconomicCost => {
                SortValue::Number(self.annual_socioeconomic_cost)
            }
            UsageColumn::TotalAnnualCost => SortValue::Number(self.total_annual_cost),
        }
    }
}

/// Sortable columns of the driving-book table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripColumn {
    StartTime,
    EndTime,
    Distance,
    CurrentVehicle,
    SimulationVehicle,
}

impl FromStr for TripColumn {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_time" => Ok(TripColumn::StartTime),
            "end_time" => Ok(TripColumn::EndTime),
            "distance" => Ok(TripColumn::Distance),
            "current_vehicle_name" => Ok(TripColumn::CurrentVehicle),
            "simulation_vehicle_name" => Ok(TripColumn::SimulationVehicle),
            other => Err(PipelineError::UnknownColumn(other.to_string())),
        }
    }
}

impl Sortable for Trip {
    type Column = TripColumn;

    fn sort_value(&self, column: TripColumn) -> SortValue<'_> {
        match column {
            TripColumn::StartTime => SortValue::Time(self.start_time),
            TripColumn::EndTime => SortValue::Time(self.end_time),
            TripColumn::Distance => SortValue::Number(self.distance),
            TripColumn::CurrentVehicle => SortValue::Text(&self.current_vehicle_name),
            TripColumn::SimulationVehicle => SortValue::Text(&self.simulation_vehicle_name),
        }
    }
}
