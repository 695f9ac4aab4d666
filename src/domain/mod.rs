// Domain layer: form models, wire payloads and ports (interfaces). No I/O here.

pub mod model;
pub mod ports;
