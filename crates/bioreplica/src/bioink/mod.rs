//! Bioink chemistry: formulation and preparation protocol.

mod formulation;
mod protocol;

pub use formulation::{
    BioinkFormulation, BioinkFormulationEngine, Component, ComponentRole, PrintingTime,
};
pub use protocol::{CrosslinkChemistry, DISSOLUTION_ORDER, PreparationProtocol};

pub(crate) use protocol::title_case;
