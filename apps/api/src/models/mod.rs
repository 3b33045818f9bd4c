pub mod career;
pub mod company;
pub mod graduate;
pub mod notification;
pub mod offer;
pub mod status;
pub mod user;
