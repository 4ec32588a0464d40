//! Repository traits for metadata operations.

pub mod files;
pub mod folders;
pub mod link_shares;
pub mod shares;
pub mod stars;

pub use files::FileRepo;
pub use folders::FolderRepo;
pub use link_shares::LinkShareRepo;
pub use shares::ShareRepo;
pub use stars::StarRepo;
