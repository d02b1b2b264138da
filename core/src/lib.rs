pub mod discovery;
pub mod network;
pub mod scanner;
pub mod service;


pub use discovery::{DiscoveryService, find_service, is_reachable};
pub use service::{DiscoveredService, ServiceStatus};
