// Domain layer: campaign models and ports (interfaces) for the stats source and the list consumer.

pub mod model;
pub mod ports;
