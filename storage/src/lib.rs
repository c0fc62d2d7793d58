// storage/src/lib.rs

pub mod errors;
pub mod memory;
pub mod sled_store;
pub mod stores;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use sled_store::SledStore;
pub use stores::{AppointmentStore, AuditStore, ClinicalNoteStore, ClinicianStore, PatientStore};
