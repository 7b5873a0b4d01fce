pub mod prelude;

pub mod digital_signatures;
pub mod documents;
pub mod sea_orm_active_enums;
pub mod properties;
pub mod transactions;
pub mod user_profiles;
pub mod users;
