pub mod village_repo;

pub use village_repo::VillageRepository;
