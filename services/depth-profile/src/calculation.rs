//! Bridge between a resolved site profile and the wellbore calculation engine.
//!
//! The engine itself is external and plugged in through [`WellCalculator`].
//! This module validates the user-supplied hydraulic parameters, checks the
//! site is feasible and assembles the engine input.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use aquifer_common::{AquiferError, AquiferLayerCode, DepthTable, DepthTableColumns};

use crate::pipeline::{AquiferProfilePipeline, ProfileError, ProfileQuery};

/// Hydraulic parameters supplied by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialInputValues {
    /// Required flow rate (L/s)
    pub required_flow_rate: f64,
    /// Hydraulic conductivity (m/day)
    pub hydraulic_conductivity: f64,
    /// Average porosity, a fraction in [0, 1]
    pub average_porosity: f64,
    pub bore_lifetime_year: f64,
    /// Long-term decline rate of the water level (m/year)
    pub long_term_decline_rate: f64,
    pub allowable_drawdown: f64,
    pub safety_margin: f64,
    #[serde(default)]
    pub is_production_pump: bool,
}

impl InitialInputValues {
    pub fn validate(&self) -> Result<(), WellboreError> {
        let non_negative = [
            ("required_flow_rate", self.required_flow_rate),
            ("hydraulic_conductivity", self.hydraulic_conductivity),
            ("average_porosity", self.average_porosity),
            ("bore_lifetime_year", self.bore_lifetime_year),
            ("long_term_decline_rate", self.long_term_decline_rate),
            ("allowable_drawdown", self.allowable_drawdown),
            ("safety_margin", self.safety_margin),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(WellboreError::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.average_porosity > 1.0 {
            return Err(WellboreError::InvalidInput(format!(
                "average_porosity must be between 0 and 1, got {}",
                self.average_porosity
            )));
        }

        Ok(())
    }
}

/// Complete input of the calculation engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationInput {
    #[serde(flatten)]
    pub values: InitialInputValues,
    pub groundwater_depth: f64,
    pub top_aquifer_layer: AquiferLayerCode,
    pub target_aquifer_layer: AquiferLayerCode,
    pub aquifer_layer_table: DepthTableColumns,
}

/// Failures reported by the calculation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("Invalid groundwater layer: {0}")]
    InvalidGroundwaterLayer(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Target formation is too shallow: {0}")]
    ShallowTargetFormation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Calculation error: {0}")]
    Other(String),
}

impl CalculationError {
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationError::InvalidGroundwaterLayer(_) => "invalid_groundwater_layer",
            CalculationError::MissingData(_) => "missing_data",
            CalculationError::ShallowTargetFormation(_) => "shallow_target_formation",
            CalculationError::Validation(_) => "validation",
            CalculationError::Other(_) => "other",
        }
    }

    /// Errors caused by the site or the inputs rather than by the engine.
    pub fn is_input_fault(&self) -> bool {
        !matches!(self, CalculationError::Other(_))
    }
}

/// The external wellbore calculation engine.
pub trait WellCalculator: Send + Sync {
    fn calculate(&self, input: &CalculationInput) -> Result<serde_json::Value, CalculationError>;
}

#[derive(Debug, Error)]
pub enum WellboreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Always `AquiferError::InfeasibleLocation`.
    #[error(transparent)]
    Infeasible(AquiferError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

impl WellboreError {
    pub fn http_status_code(&self) -> u16 {
        match self {
            WellboreError::InvalidInput(_) | WellboreError::Infeasible(_) => 400,
            WellboreError::Profile(e) => e.http_status_code(),
            WellboreError::Calculation(e) if e.is_input_fault() => 400,
            WellboreError::Calculation(_) => 500,
        }
    }
}

/// Result of a successful calculation.
#[derive(Debug, Clone, Serialize)]
pub struct WellboreOutcome {
    pub input: CalculationInput,
    pub results: serde_json::Value,
}

/// Runs site resolution, feasibility and the calculation engine in order.
#[derive(Clone)]
pub struct WellboreService {
    pipeline: AquiferProfilePipeline,
    calculator: Arc<dyn WellCalculator>,
}

impl WellboreService {
    pub fn new(pipeline: AquiferProfilePipeline, calculator: Arc<dyn WellCalculator>) -> Self {
        Self {
            pipeline,
            calculator,
        }
    }

    /// Assemble the engine input for `query` without running the engine.
    pub async fn prepare(
        &self,
        query: &ProfileQuery,
        values: InitialInputValues,
    ) -> Result<CalculationInput, WellboreError> {
        values.validate()?;

        let site = self.pipeline.resolve_site(query).await?;
        let (top, target) = site.feasibility.into_layers().map_err(|e| {
            warn!(error = %e, "Calculation feasibility check failed");
            WellboreError::Infeasible(e)
        })?;

        Ok(build_input(values, site.watertable_depth, top, target, &site.depth_table))
    }

    #[instrument(skip(self, values), fields(crs = %query.crs_type))]
    pub async fn calculate(
        &self,
        query: &ProfileQuery,
        values: InitialInputValues,
    ) -> Result<WellboreOutcome, WellboreError> {
        let input = self.prepare(query, values).await?;

        let results = self.calculator.calculate(&input).map_err(|e| {
            error!(kind = e.kind(), error = %e, "Wellbore calculation failed");
            e
        })?;

        info!(
            top_aquifer_layer = %input.top_aquifer_layer,
            target_aquifer_layer = %input.target_aquifer_layer,
            "Wellbore calculation completed"
        );

        Ok(WellboreOutcome { input, results })
    }
}

fn build_input(
    values: InitialInputValues,
    groundwater_depth: f64,
    top_aquifer_layer: AquiferLayerCode,
    target_aquifer_layer: AquiferLayerCode,
    table: &DepthTable,
) -> CalculationInput {
    CalculationInput {
        values,
        groundwater_depth,
        top_aquifer_layer,
        target_aquifer_layer,
        aquifer_layer_table: table.to_columns(),
    }
}
