/// Static physical and atmospheric parameters of one celestial body.
///
/// Constructed once at startup and read-only thereafter. Planetary constants
/// follow Curtis, "Orbital Mechanics for Engineering Students", Appendix A;
/// the exponential atmosphere parameters are fitted against the tabulated
/// density models used by the entry literature (Mars-GRAM averages for Mars).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PlanetModel {
    pub name: &'static str,
    /// Body mass [kg].
    pub mass_kg: f64,
    /// Mean equatorial radius [m].
    pub radius_m: f64,
    /// Altitude above which the atmosphere is treated as vacuum [m].
    pub atmosphere_height_m: f64,
    /// Density at zero altitude [kg/m^3].
    pub surface_density: f64,
    /// Exponential scale height [m].
    pub scale_height_m: f64,
}

pub const MARS: PlanetModel = PlanetModel {
    name: "mars",
    // mu = 4.2828e13 m^3/s^2
    mass_kg: 6.4171e23,
    radius_m: 3.3962e6,
    atmosphere_height_m: 132_000.0,
    surface_density: 0.02,
    scale_height_m: 11_100.0,
};

pub const EARTH: PlanetModel = PlanetModel {
    name: "earth",
    mass_kg: 5.9722e24,
    radius_m: 6.371e6,
    atmosphere_height_m: 140_000.0,
    surface_density: 1.225,
    scale_height_m: 8_500.0,
};

pub const JUPITER: PlanetModel = PlanetModel {
    name: "jupiter",
    mass_kg: 1.89813e27,
    radius_m: 6.9911e7,
    atmosphere_height_m: 320_000.0,
    surface_density: 0.16,
    scale_height_m: 27_000.0,
};

impl PlanetModel {
    /// Looks up a body from the static catalog by case-insensitive name.
    pub fn by_name(name: &str) -> Option<PlanetModel> {
        match name.to_ascii_lowercase().as_str() {
            "mars" => Some(MARS),
            "earth" => Some(EARTH),
            "jupiter" => Some(JUPITER),
            _ => None,
        }
    }

    /// Atmospheric density at the given altitude above the surface.
    ///
    /// Evaluates `surface_density * exp(-h / scale_height)` inside the
    /// atmosphere shell and `0.0` above it. Negative altitudes are clamped to
    /// the surface value; there are no error conditions.
    ///
    /// # Arguments
    /// * `altitude_m` - Altitude above the mean surface [m].
    ///
    /// # Returns
    /// Density [kg/m^3].
    pub fn atmospheric_density(&self, altitude_m: f64) -> f64 {
        let h = altitude_m.max(0.0);
        if h > self.atmosphere_height_m {
            return 0.0;
        }
        self.surface_density * (-h / self.scale_height_m).exp()
    }

    /// Standard gravitational parameter `G * M` [m^3/s^2].
    pub fn mu(&self) -> f64 { crate::entry_dynamics::physics::GRAVITATIONAL_CONSTANT * self.mass_kg }
}
