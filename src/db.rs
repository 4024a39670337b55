pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod logo_repo;
pub use logo_repo::LogoRepository;
pub mod plant_repo;
pub use plant_repo::PlantRepository;
