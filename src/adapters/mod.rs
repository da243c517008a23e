// Adapters layer: concrete implementations of the domain ports (HTTP campaign API, console output).

pub mod console;
pub mod http;
