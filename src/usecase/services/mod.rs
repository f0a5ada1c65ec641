pub mod cascade;
pub mod preset_service;
pub mod session;
pub mod ward_options;
