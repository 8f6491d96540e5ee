mod locations;

pub use locations::LocationRepository;
