pub mod entities;
pub mod use_cases;
pub mod listing;
pub mod publishing;
pub mod seo;
pub mod password;
