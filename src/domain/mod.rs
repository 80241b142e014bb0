// Domain layer: the menu model, the Outcome type and the ports the adapters implement.

pub mod model;
pub mod outcome;
pub mod ports;
