// Domain layer: record model, normalization and email rules, and the sink port.

pub mod email;
pub mod model;
pub mod normalize;
pub mod ports;
