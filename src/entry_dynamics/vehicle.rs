/// Aerodynamic and mass properties of one entry vehicle.
///
/// The default catalog entry is an MSL-class capsule: ballistic coefficient
/// 115 kg/m^2 and L/D 0.24 (Li & Jiang 2014).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VehicleModel {
    pub name: &'static str,
    /// Entry mass [kg].
    pub mass_kg: f64,
    pub drag_coefficient: f64,
    pub lift_coefficient: f64,
    /// Aerodynamic reference area [m^2].
    pub reference_area_m2: f64,
}

pub const MSL_CLASS: VehicleModel = VehicleModel {
    name: "default",
    mass_kg: 2920.0,
    drag_coefficient: 1.6,
    lift_coefficient: 0.384,
    // 4.5 m aeroshell
    reference_area_m2: 15.9,
};

impl VehicleModel {
    /// Looks up a vehicle from the static catalog by case-insensitive name.
    pub fn by_name(name: &str) -> Option<VehicleModel> {
        match name.to_ascii_lowercase().as_str() {
            "default" | "msl" => Some(MSL_CLASS),
            _ => None,
        }
    }

    /// Ballistic coefficient `m / (C_d * A)` [kg/m^2].
    pub fn ballistic_coefficient(&self) -> f64 {
        self.mass_kg / (self.drag_coefficient * self.reference_area_m2)
    }

    /// Lift-to-drag ratio `C_l / C_d`.
    pub fn lift_to_drag(&self) -> f64 { self.lift_coefficient / self.drag_coefficient }
}
