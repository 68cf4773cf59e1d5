mod division_service;

pub use division_service::DivisionService;
