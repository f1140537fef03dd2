pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod filtering;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod read;
pub mod signal;
