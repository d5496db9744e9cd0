//! Infrastructure layer — adapters implementing the application ports.

pub mod checks;
pub mod gateway;
pub mod inventory;
pub mod renderer;
pub mod store;

pub use checks::DirCheckSource;
pub use gateway::DriverClient;
pub use inventory::load_inventory;
pub use renderer::RenderClient;
pub use store::DirArtifactStore;
