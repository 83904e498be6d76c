// Blue/green replica lifecycle

pub mod manager;

pub use manager::ReplicaManager;
