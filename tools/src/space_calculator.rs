//! Navigation arithmetic: distance, gravity and travel time.
//!
//! Positions are heliocentric coordinates in kilometres. Each calculation is
//! available as a plain function and as a [`Tool`] for the agent.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::ToolError;
use crate::result::ToolResult;
use crate::spec::{DataType, InputConstraints, ToolInput, ToolSpec};
use crate::tool::{Tool, parse_args};

/// Tool name of the distance calculation.
pub const CALCULATE_DISTANCE: &str = "space_calculator-calculate_distance";

/// Tool name of the gravity calculation.
pub const CALCULATE_GRAVITY: &str = "space_calculator-calculate_gravity";

/// Tool name of the travel time calculation.
pub const CALCULATE_TRAVEL_TIME: &str = "space_calculator-calculate_travel_time";

/// Kilometres in one astronomical unit.
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Kilometres in one light year.
pub const KM_PER_LIGHT_YEAR: f64 = 9_460_730_472_580.8;

/// Newtonian constant of gravitation, m³·kg⁻¹·s⁻².
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A point or displacement in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// X component in kilometres.
    pub x: f64,

    /// Y component in kilometres.
    pub y: f64,

    /// Z component in kilometres.
    pub z: f64,
}

impl Coordinates {
    /// Create coordinates from their components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn towards(&self, other: &Coordinates) -> Coordinates {
        Coordinates::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }

    fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn rounded(&self, places: i32) -> Coordinates {
        Coordinates::new(
            round_to(self.x, places),
            round_to(self.y, places),
            round_to(self.z, places),
        )
    }
}

/// Unit a distance is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Km,
    Au,
    Ly,
}

impl DistanceUnit {
    /// Every supported unit, in the order tools list them.
    pub const ALL: [DistanceUnit; 3] = [Self::Km, Self::Au, Self::Ly];

    /// Lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Au => "au",
            Self::Ly => "ly",
        }
    }

    /// Convert a distance in kilometres to this unit.
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            Self::Km => km,
            Self::Au => km / KM_PER_AU,
            Self::Ly => km / KM_PER_LIGHT_YEAR,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| ToolError::UnsupportedUnit(s.to_string()))
    }
}

/// Output of [`calculate_distance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    /// Straight-line distance in `unit`.
    pub distance: f64,

    /// Unit of `distance`.
    pub unit: DistanceUnit,

    /// Displacement from the spacecraft to the object, in kilometres.
    pub vector: Coordinates,
}

/// Output of [`calculate_gravity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityReport {
    /// Attraction between the two bodies, in newtons.
    pub force_newtons: f64,

    /// Spacecraft mass as given.
    pub spacecraft_mass_kg: f64,

    /// Object mass as given.
    pub object_mass_kg: f64,

    /// Separation as given, in metres.
    pub distance_m: f64,
}

/// Output of [`calculate_travel_time`].
///
/// Every field is the same duration in a different unit. Years are Julian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeReport {
    /// Duration in seconds, to 2 decimals.
    pub seconds: f64,

    /// Duration in minutes, to 2 decimals.
    pub minutes: f64,

    /// Duration in hours, to 2 decimals.
    pub hours: f64,

    /// Duration in days, to 2 decimals.
    pub days: f64,

    /// Duration in years, to 4 decimals.
    pub years: f64,
}

/// Distance between the spacecraft and an object, with the displacement
/// vector between them.
pub fn calculate_distance(
    current: &Coordinates,
    object: &Coordinates,
    unit: &str,
) -> ToolResult<DistanceReport> {
    if !current.is_finite() || !object.is_finite() {
        return ToolResult::err("Coordinate values must be numbers");
    }

    let unit = match unit.parse::<DistanceUnit>() {
        Ok(unit) => unit,
        Err(e) => return ToolResult::err(e.to_string()),
    };

    let vector = current.towards(object);
    let distance = unit.from_km(vector.length());
    if !distance.is_finite() {
        return ToolResult::err("Distance calculation resulted in invalid value");
    }

    debug!("distance {distance} {unit}");
    ToolResult::ok(DistanceReport {
        distance: round_to(distance, 4),
        unit,
        vector: vector.rounded(4),
    })
}

/// Newtonian attraction between the spacecraft and an object.
///
/// Masses are in kilograms and `distance` is in metres.
pub fn calculate_gravity(
    spacecraft_mass: f64,
    object_mass: f64,
    distance: f64,
) -> ToolResult<GravityReport> {
    if ![spacecraft_mass, object_mass, distance]
        .into_iter()
        .all(f64::is_finite)
    {
        return ToolResult::err("All input values must be numbers");
    }
    if distance <= 0.0 {
        return ToolResult::err("Distance must be greater than zero");
    }
    if spacecraft_mass <= 0.0 || object_mass <= 0.0 {
        return ToolResult::err("Masses must be greater than zero");
    }

    let force = GRAVITATIONAL_CONSTANT * spacecraft_mass * object_mass / distance.powi(2);
    if !force.is_finite() {
        return ToolResult::err("Gravitational force calculation resulted in invalid value");
    }

    debug!("gravitational force {force} N");
    ToolResult::ok(GravityReport {
        force_newtons: round_to(force, 4),
        spacecraft_mass_kg: spacecraft_mass,
        object_mass_kg: object_mass,
        distance_m: distance,
    })
}

/// Time to cover `distance` kilometres at a constant `speed` in km/s.
pub fn calculate_travel_time(distance: f64, speed: f64) -> ToolResult<TravelTimeReport> {
    if !distance.is_finite() || !speed.is_finite() {
        return ToolResult::err("Distance and speed must be numbers");
    }
    if distance < 0.0 {
        return ToolResult::err("Distance cannot be negative");
    }
    if speed <= 0.0 {
        return ToolResult::err("Speed must be greater than zero");
    }

    let seconds = distance / speed;
    if !seconds.is_finite() {
        return ToolResult::err("Time conversion resulted in invalid value");
    }
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let years = days / DAYS_PER_YEAR;

    ToolResult::ok(TravelTimeReport {
        seconds: round_to(seconds, 2),
        minutes: round_to(minutes, 2),
        hours: round_to(hours, 2),
        days: round_to(days, 2),
        years: round_to(years, 4),
    })
}

/// Round half away from zero to `places` decimals. Values too large to
/// scale are returned unchanged.
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn coordinates_input(name: &str, description: &str) -> ToolInput {
    ToolInput::required(name, DataType::Object, description).with_properties(
        ["x", "y", "z"]
            .into_iter()
            .map(|axis| ToolInput::required(axis, DataType::Number, format!("{axis} in km")))
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
struct DistanceArgs {
    current_coordinates: Coordinates,
    object_coordinates: Coordinates,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct GravityArgs {
    spacecraft_mass: f64,
    object_mass: f64,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct TravelTimeArgs {
    distance: f64,
    speed: f64,
}

/// [`calculate_distance`] as a tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceTool;

#[async_trait]
impl Tool for DistanceTool {
    fn name(&self) -> &str {
        CALCULATE_DISTANCE
    }

    fn description(&self) -> &str {
        "Calculates the distance between the spacecraft and a celestial object. \
         Use it to find how far a planet, moon or star is, to plan routes and \
         course corrections, and to get the direction vector towards a target."
    }

    fn spec(&self) -> ToolSpec {
        let units = DistanceUnit::ALL
            .iter()
            .map(|unit| json!(unit.as_str()))
            .collect();

        ToolSpec::new()
            .with_input(coordinates_input(
                "current_coordinates",
                "The current coordinates of the spacecraft in 3D space (x,y,z)",
            ))
            .with_input(coordinates_input(
                "object_coordinates",
                "The coordinates of the target object in a heliocentric coordinate system (x,y,z)",
            ))
            .with_input(
                ToolInput::required(
                    "unit",
                    DataType::String,
                    "The unit of measurement for the result (km, au, ly)",
                )
                .with_constraints(InputConstraints::enum_of(units)),
            )
    }

    async fn call(&self, input: Value) -> ToolResult<Value> {
        match parse_args::<DistanceArgs>(&self.spec(), input) {
            Ok(args) => calculate_distance(
                &args.current_coordinates,
                &args.object_coordinates,
                &args.unit,
            )
            .into_value(),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// [`calculate_gravity`] as a tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityTool;

#[async_trait]
impl Tool for GravityTool {
    fn name(&self) -> &str {
        CALCULATE_GRAVITY
    }

    fn description(&self) -> &str {
        "Calculates the gravitational force between the spacecraft and a celestial \
         object. Use it to assess gravity-related dangers and to plan orbital \
         maneuvers or gravitational assists."
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new()
            .with_input(ToolInput::required(
                "spacecraft_mass",
                DataType::Number,
                "The total mass of the spacecraft in kilograms, including fuel and payload",
            ))
            .with_input(ToolInput::required(
                "object_mass",
                DataType::Number,
                "The mass of the celestial object in kilograms",
            ))
            .with_input(ToolInput::required(
                "distance",
                DataType::Number,
                "The distance between the spacecraft and the object in meters",
            ))
    }

    async fn call(&self, input: Value) -> ToolResult<Value> {
        match parse_args::<GravityArgs>(&self.spec(), input) {
            Ok(args) => {
                calculate_gravity(args.spacecraft_mass, args.object_mass, args.distance)
                    .into_value()
            }
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// [`calculate_travel_time`] as a tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelTimeTool;

#[async_trait]
impl Tool for TravelTimeTool {
    fn name(&self) -> &str {
        CALCULATE_TRAVEL_TIME
    }

    fn description(&self) -> &str {
        "Calculates the time required to travel from the current position to a \
         destination at constant speed. Use it to plan mission durations and \
         estimate arrival times."
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new()
            .with_input(ToolInput::required(
                "distance",
                DataType::Number,
                "The distance to travel in kilometers",
            ))
            .with_input(ToolInput::required(
                "speed",
                DataType::Number,
                "The spacecraft's speed in kilometers per second",
            ))
    }

    async fn call(&self, input: Value) -> ToolResult<Value> {
        match parse_args::<TravelTimeArgs>(&self.spec(), input) {
            Ok(args) => calculate_travel_time(args.distance, args.speed).into_value(),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}
