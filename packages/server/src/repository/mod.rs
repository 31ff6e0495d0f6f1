//! Persistence seam for the permission controller.

mod error;
mod traits;

pub mod memory;
pub mod seaorm;

pub use error::RepositoryError;
pub use memory::MemoryPermissionRepository;
pub use seaorm::SeaOrmPermissionRepository;
pub use traits::{PermissionRepository, Repository};
