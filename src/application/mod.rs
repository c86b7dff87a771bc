pub mod events;
pub mod machine;
pub mod projector;
pub mod sdk;
pub mod state;
pub mod workers;
