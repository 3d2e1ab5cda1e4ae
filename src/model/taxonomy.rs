//! Energy type taxonomy.
//!
//! Fuel labels follow the EIA consumption categories. Matching is
//! case-insensitive because the source pages are not consistent about
//! letter casing.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Renewable or nonrenewable origin of an energy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Renewable,
    Nonrenewable,
}

impl EnergySource {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Renewable => "Renewable",
            Self::Nonrenewable => "Nonrenewable",
        }
    }

    /// Energy types that make up this source, in display order.
    #[must_use]
    pub const fn energy_types(&self) -> &'static [EnergyType] {
        match self {
            Self::Renewable => RENEWABLE_TYPES,
            Self::Nonrenewable => NONRENEWABLE_TYPES,
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "renewable" | "rec" => Some(Self::Renewable),
            "nonrenewable" | "non-renewable" | "nec" => Some(Self::Nonrenewable),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnergySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fuel category reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EnergyType {
    AllPetroleumProducts,
    Coal,
    NaturalGas,
    NuclearPower,
    Biomass,
    FuelEthanol,
    Geothermal,
    Hydroelectricity,
    SolarEnergy,
    WindEnergy,
    RenewableEnergy,
    /// Any label outside the taxonomy; kept as a column, excluded from totals
    Other(String),
}

/// Nonrenewable energy types.
pub const NONRENEWABLE_TYPES: &[EnergyType] = &[
    EnergyType::AllPetroleumProducts,
    EnergyType::Coal,
    EnergyType::NaturalGas,
    EnergyType::NuclearPower,
];

/// Renewable energy types.
pub const RENEWABLE_TYPES: &[EnergyType] = &[
    EnergyType::Biomass,
    EnergyType::FuelEthanol,
    EnergyType::Geothermal,
    EnergyType::Hydroelectricity,
    EnergyType::SolarEnergy,
    EnergyType::WindEnergy,
    EnergyType::RenewableEnergy,
];

impl EnergyType {
    /// Parse a store label. Unknown labels become [`EnergyType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "all petroleum products" => Self::AllPetroleumProducts,
            "coal" => Self::Coal,
            "natural gas including supplemental gaseous fuels" => Self::NaturalGas,
            "nuclear power" => Self::NuclearPower,
            "biomass" => Self::Biomass,
            "fuel ethanol excluding denaturant" => Self::FuelEthanol,
            "geothermal" => Self::Geothermal,
            "hydroelectricity" => Self::Hydroelectricity,
            "solar energy" => Self::SolarEnergy,
            "wind energy" => Self::WindEnergy,
            "renewable energy" => Self::RenewableEnergy,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Canonical EIA label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::AllPetroleumProducts => "All Petroleum Products",
            Self::Coal => "Coal",
            Self::NaturalGas => "Natural Gas including Supplemental Gaseous Fuels",
            Self::NuclearPower => "Nuclear Power",
            Self::Biomass => "Biomass",
            Self::FuelEthanol => "Fuel Ethanol excluding Denaturant",
            Self::Geothermal => "Geothermal",
            Self::Hydroelectricity => "Hydroelectricity",
            Self::SolarEnergy => "Solar Energy",
            Self::WindEnergy => "Wind Energy",
            Self::RenewableEnergy => "Renewable Energy",
            Self::Other(label) => label,
        }
    }

    /// Legend name: the first two words of the label.
    #[must_use]
    pub fn short_name(&self) -> String {
        self.label()
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Which total this type contributes to, if any.
    #[must_use]
    pub const fn source(&self) -> Option<EnergySource> {
        match self {
            Self::AllPetroleumProducts | Self::Coal | Self::NaturalGas | Self::NuclearPower => {
                Some(EnergySource::Nonrenewable)
            }
            Self::Biomass
            | Self::FuelEthanol
            | Self::Geothermal
            | Self::Hydroelectricity
            | Self::SolarEnergy
            | Self::WindEnergy
            | Self::RenewableEnergy => Some(EnergySource::Renewable),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub const fn is_renewable(&self) -> bool {
        matches!(self.source(), Some(EnergySource::Renewable))
    }

    #[must_use]
    pub const fn is_nonrenewable(&self) -> bool {
        matches!(self.source(), Some(EnergySource::Nonrenewable))
    }
}

impl std::fmt::Display for EnergyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for EnergyType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EnergyType> for String {
    fn from(energy_type: EnergyType) -> Self {
        energy_type.label().to_string()
    }
}
