//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod contact_repo;
pub mod media_repo;
pub mod product_repo;
pub mod profile_repo;

pub use category_repo::CategoryRepo;
pub use contact_repo::ContactRepo;
pub use media_repo::MediaRepo;
pub use product_repo::ProductRepo;
pub use profile_repo::ProfileRepo;
