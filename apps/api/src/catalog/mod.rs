pub mod careers;
pub mod companies;
pub mod offers;
