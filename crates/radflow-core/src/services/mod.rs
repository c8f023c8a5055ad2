mod distribution_service;


pub use distribution_service::DistributionService;
