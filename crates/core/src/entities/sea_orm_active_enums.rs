use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum IdType {
    #[sea_orm(string_value = "passport")]
    Passport,
    #[sea_orm(string_value = "national_id")]
    NationalId,
    #[sea_orm(string_value = "driver_license")]
    DriverLicense,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[sea_orm(string_value = "residential")]
    Residential,
    #[sea_orm(string_value = "commercial")]
    Commercial,
    #[sea_orm(string_value = "land")]
    Land,
    #[sea_orm(string_value = "apartment")]
    Apartment,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(100))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[sea_orm(string_value = "sale_agreement")]
    SaleAgreement,
    #[sea_orm(string_value = "deed_of_assignment")]
    DeedOfAssignment,
    #[sea_orm(string_value = "power_of_attorney")]
    PowerOfAttorney,
    #[sea_orm(string_value = "title_deed")]
    TitleDeed,
    #[sea_orm(string_value = "certificate_of_occupancy")]
    CertificateOfOccupancy,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Lifecycle of a transaction. Transitions are caller-driven; nothing here
/// enforces an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "signed")]
    Signed,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}
