pub use super::digital_signatures::Entity as DigitalSignatures;
pub use super::documents::Entity as Documents;
pub use super::properties::Entity as Properties;
pub use super::transactions::Entity as Transactions;
pub use super::user_profiles::Entity as UserProfiles;
pub use super::users::Entity as Users;
