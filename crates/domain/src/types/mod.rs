//! Common data types used throughout the application

pub mod bom;
pub mod catalog;
pub mod consumption;
pub mod profile;
pub mod project;
pub mod quote;
pub mod simulation;

pub use bom::{BomLine, BomMode, BomTemplate, TemplateLine};
pub use catalog::{Product, ProductCategory};
pub use consumption::{ConsumptionPoint, ConsumptionSeries};
pub use profile::LoadProfile;
pub use project::{ComponentSelection, DesignType, Project, SystemDesign};
pub use quote::{QuoteLine, QuoteStatus, QuoteVersion};
pub use simulation::{
    FinancialModelRequest, QuickSimulationRequest, SimulationRequest, TimeseriesPoint,
};
