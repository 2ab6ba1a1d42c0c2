//! Vehicle status record shapes
//!
//! Each sub-resource of the connected-vehicle API has a schema table (a
//! `static` [`Schema`]) and a typed struct implementing [`Resource`].

pub mod access;
pub mod capabilities;
pub mod charging;
pub mod climatisation;
pub mod fuel;
pub mod health;
pub mod lights;
pub mod measurements;
pub mod position;
pub mod vehicle;

pub use access::{Access, AccessStatus};
pub use capabilities::UserCapabilities;
pub use charging::{BatteryStatus, ChargeMode, Charging, ChargingSettings, ChargingStatus, PlugStatus};
pub use climatisation::{
    Climatisation, ClimatisationSettings, ClimatisationStatus, ClimatisationTimers,
    ClimatisationTimersStatus, SingleTimer, Timer, WindowHeatingStatus,
};
pub use fuel::{Engine, FuelRangeStatus, FuelStatus};
pub use health::{
    MaintenanceStatus, OilLevel, OilLevelStatus, VehicleHealthInspection, VehicleHealthWarnings,
    WarningLights,
};
pub use lights::{LightsStatus, VehicleLights};
pub use measurements::{
    FuelLevelStatus, Measurements, OdometerStatus, RangeStatus, TemperatureBatteryStatus,
};
pub use position::{Location, Position};
pub use vehicle::{Model, StatusReport, SubResource, MODEL};

use crate::record::Resource;
use crate::schema::Schema;

/// Root schemas of every resource that can be fetched on its own
pub fn resource_schemas() -> Vec<&'static Schema> {
    let mut schemas: Vec<&'static Schema> = vec![Model::schema()];
    schemas.extend(SubResource::ALL.iter().map(|r| r.schema()));
    schemas.push(Position::schema());
    schemas.push(Location::schema());
    schemas
}

/// Every schema table, each once
pub fn all_schemas() -> Vec<&'static Schema> {
    let mut seen = std::collections::HashSet::new();
    resource_schemas()
        .into_iter()
        .flat_map(|s| s.walk())
        .filter(|s| seen.insert(s.name))
        .collect()
}

/// Find a schema table by record name (`BatteryStatus`) or resource key (`charging`)
pub fn find_schema(name: &str) -> Option<&'static Schema> {
    if let Some(resource) = SubResource::from_key(name) {
        return Some(resource.schema());
    }
    let compact = name.replace(['_', '-'], "");
    all_schemas()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name) || s.name.eq_ignore_ascii_case(&compact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_schemas_are_clean() {
        let issues: Vec<String> = all_schemas()
            .iter()
            .flat_map(|s| s.check())
            .map(|i| i.to_string())
            .collect();
        assert!(issues.is_empty(), "schema issues: {:#?}", issues);
    }

    #[test]
    fn test_all_schemas_unique() {
        let schemas = all_schemas();
        let mut names: Vec<_> = schemas.iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), schemas.len());
        assert!(names.contains(&"SingleTimer"));
        assert!(names.contains(&"Engine"));
    }

    #[test]
    fn test_sub_resource_keys() {
        for resource in SubResource::ALL {
            assert_eq!(SubResource::from_key(resource.key()), Some(resource));
            assert_eq!(SubResource::from_key(resource.field()), Some(resource));
            assert!(MODEL.field(resource.field()).is_some());
        }
        assert_eq!(SubResource::from_key("position"), None);
    }

    #[test]
    fn test_find_schema() {
        assert_eq!(find_schema("BatteryStatus").map(|s| s.name), Some("BatteryStatus"));
        assert_eq!(find_schema("battery_status").map(|s| s.name), Some("BatteryStatus"));
        assert_eq!(find_schema("fuelStatus").map(|s| s.name), Some("FuelStatus"));
        assert_eq!(find_schema("position").map(|s| s.name), Some("Position"));
        assert!(find_schema("trunk").is_none());
    }

    #[test]
    fn test_only_source_required_fields() {
        let required: Vec<String> = all_schemas()
            .iter()
            .flat_map(|s| s.required_fields().map(move |f| format!("{}.{}", s.name, f)))
            .collect();
        assert_eq!(
            required,
            vec![
                "AccessStatus.car_captured_timestamp",
                "Timer.id",
                "Timer.enabled",
                "Timer.single_timer",
                "SingleTimer.start",
                "SingleTimer.target",
                "TemperatureBatteryStatus.temperature_hv_battery_max_k",
                "TemperatureBatteryStatus.temperature_hv_battery_min_k",
                "OilLevelStatus.value",
            ]
        );
    }
}
