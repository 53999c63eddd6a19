// Domain layer: slot models and the ports the resolver depends on.

pub mod model;
pub mod ports;
