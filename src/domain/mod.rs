// Domain layer: company model and ports. No knowledge of HTTP or file formats.

pub mod model;
pub mod ports;
