pub mod clock;
pub mod config;
pub mod frame_driver;
pub mod ipc;
pub mod scheduler;
pub mod session;
pub mod shared_session;
pub mod simulation;

pub use clock::*;
pub use config::*;
pub use frame_driver::*;
pub use ipc::*;
pub use scheduler::*;
pub use session::*;
pub use shared_session::*;
pub use simulation::*;
