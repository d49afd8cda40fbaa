pub mod inspect;
pub mod scatter;
pub mod version;
