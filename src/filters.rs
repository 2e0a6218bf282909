// src/filters.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

// Sentinel labels the dashboard sends when a dimension is unconstrained.
// They exist only at this boundary; internally "no constraint" is `None`.
pub const ALL_DEGREES: &str = "All Degrees";
pub const ALL_SECTORS: &str = "All Sectors";
pub const ALL_TIERS: &str = "All Tiers";
pub const ALL_ROLES: &str = "All Roles";

/// The four selectable filter dimensions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Qualification,
    Sector,
    Location,
    JobRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualification {
    #[serde(rename = "BSC")]
    Bsc,
    BCom,
    #[serde(rename = "BA")]
    Ba,
}

impl Qualification {
    pub const ALL: [Qualification; 3] = [Qualification::Bsc, Qualification::BCom, Qualification::Ba];

    pub fn label(&self) -> &'static str {
        match self {
            Qualification::Bsc => "BSC",
            Qualification::BCom => "BCom",
            Qualification::Ba => "BA",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.label() == raw)
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "IT")]
    It,
    Finance,
    Retail,
    Logistics,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::It,
        Sector::Finance,
        Sector::Retail,
        Sector::Logistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sector::It => "IT",
            Sector::Finance => "Finance",
            Sector::Retail => "Retail",
            Sector::Logistics => "Logistics",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == raw)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Indian city tier classification, Tier 1 metros down to Tier 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityTier {
    #[serde(rename = "Tier 1 (Metros)")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
    #[serde(rename = "Tier 4")]
    Tier4,
}

impl CityTier {
    pub const ALL: [CityTier; 4] = [
        CityTier::Tier1,
        CityTier::Tier2,
        CityTier::Tier3,
        CityTier::Tier4,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CityTier::Tier1 => "Tier 1 (Metros)",
            CityTier::Tier2 => "Tier 2",
            CityTier::Tier3 => "Tier 3",
            CityTier::Tier4 => "Tier 4",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == raw)
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical entry-level job roles across the BPO, Banking, Fintech and
/// Logistics domains. The catalog is fixed; there is no free-text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobRole {
    #[serde(rename = "Customer Support Executive")]
    CustomerSupportExecutive,
    #[serde(rename = "Technical Support Representative")]
    TechnicalSupportRepresentative,
    #[serde(rename = "Telecaller")]
    Telecaller,
    #[serde(rename = "Chat Process Executive")]
    ChatProcessExecutive,
    #[serde(rename = "Data Entry Operator")]
    DataEntryOperator,
    #[serde(rename = "Process Associate")]
    ProcessAssociate,
    #[serde(rename = "Bank Teller")]
    BankTeller,
    #[serde(rename = "Loan Officer")]
    LoanOfficer,
    #[serde(rename = "Relationship Manager (Entry-Level)")]
    RelationshipManager,
    #[serde(rename = "KYC Analyst")]
    KycAnalyst,
    #[serde(rename = "Operations Analyst (Fintech)")]
    OperationsAnalyst,
    #[serde(rename = "Payment Support Specialist")]
    PaymentSupportSpecialist,
    #[serde(rename = "Fraud Analyst")]
    FraudAnalyst,
    #[serde(rename = "Logistics Coordinator")]
    LogisticsCoordinator,
    #[serde(rename = "Supply Chain Executive")]
    SupplyChainExecutive,
    #[serde(rename = "Warehouse Supervisor")]
    WarehouseSupervisor,
    #[serde(rename = "Delivery Associate")]
    DeliveryAssociate,
}

impl JobRole {
    pub const ALL: [JobRole; 17] = [
        JobRole::CustomerSupportExecutive,
        JobRole::TechnicalSupportRepresentative,
        JobRole::Telecaller,
        JobRole::ChatProcessExecutive,
        JobRole::DataEntryOperator,
        JobRole::ProcessAssociate,
        JobRole::BankTeller,
        JobRole::LoanOfficer,
        JobRole::RelationshipManager,
        JobRole::KycAnalyst,
        JobRole::OperationsAnalyst,
        JobRole::PaymentSupportSpecialist,
        JobRole::FraudAnalyst,
        JobRole::LogisticsCoordinator,
        JobRole::SupplyChainExecutive,
        JobRole::WarehouseSupervisor,
        JobRole::DeliveryAssociate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            JobRole::CustomerSupportExecutive => "Customer Support Executive",
            JobRole::TechnicalSupportRepresentative => "Technical Support Representative",
            JobRole::Telecaller => "Telecaller",
            JobRole::ChatProcessExecutive => "Chat Process Executive",
            JobRole::DataEntryOperator => "Data Entry Operator",
            JobRole::ProcessAssociate => "Process Associate",
            JobRole::BankTeller => "Bank Teller",
            JobRole::LoanOfficer => "Loan Officer",
            JobRole::RelationshipManager => "Relationship Manager (Entry-Level)",
            JobRole::KycAnalyst => "KYC Analyst",
            JobRole::OperationsAnalyst => "Operations Analyst (Fintech)",
            JobRole::PaymentSupportSpecialist => "Payment Support Specialist",
            JobRole::FraudAnalyst => "Fraud Analyst",
            JobRole::LogisticsCoordinator => "Logistics Coordinator",
            JobRole::SupplyChainExecutive => "Supply Chain Executive",
            JobRole::WarehouseSupervisor => "Warehouse Supervisor",
            JobRole::DeliveryAssociate => "Delivery Associate",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == raw)
    }
}

impl fmt::Display for JobRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current filter selection. `None` means the dimension is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub qualification: Option<Qualification>,
    pub sector: Option<Sector>,
    pub location: Option<CityTier>,
    pub job_role: Option<JobRole>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw option label coming from the dashboard into the typed
    /// model. Accepts exactly the catalog labels plus the "All ..." sentinel
    /// for the dimension; anything else is rejected.
    pub fn set(&mut self, dimension: FilterDimension, raw: &str) -> Result<()> {
        match dimension {
            FilterDimension::Qualification => {
                self.qualification = if raw == ALL_DEGREES {
                    None
                } else {
                    Some(Qualification::from_label(raw).ok_or_else(|| {
                        anyhow::anyhow!("unknown qualification option: {}", raw)
                    })?)
                };
            }
            FilterDimension::Sector => {
                self.sector = if raw == ALL_SECTORS {
                    None
                } else {
                    Some(
                        Sector::from_label(raw)
                            .ok_or_else(|| anyhow::anyhow!("unknown sector option: {}", raw))?,
                    )
                };
            }
            FilterDimension::Location => {
                self.location = if raw == ALL_TIERS {
                    None
                } else {
                    Some(
                        CityTier::from_label(raw)
                            .ok_or_else(|| anyhow::anyhow!("unknown location tier option: {}", raw))?,
                    )
                };
            }
            FilterDimension::JobRole => {
                self.job_role = if raw == ALL_ROLES {
                    None
                } else {
                    Some(
                        JobRole::from_label(raw)
                            .ok_or_else(|| anyhow::anyhow!("unknown job role option: {}", raw))?,
                    )
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconstrained() {
        let filters = Filters::new();
        assert_eq!(filters.qualification, None);
        assert_eq!(filters.sector, None);
        assert_eq!(filters.location, None);
        assert_eq!(filters.job_role, None);
    }

    #[test]
    fn test_set_resolves_catalog_labels() {
        let mut filters = Filters::new();
        filters
            .set(FilterDimension::Qualification, "BSC")
            .unwrap();
        filters.set(FilterDimension::Sector, "IT").unwrap();
        filters
            .set(FilterDimension::Location, "Tier 1 (Metros)")
            .unwrap();
        filters
            .set(FilterDimension::JobRole, "KYC Analyst")
            .unwrap();

        assert_eq!(filters.qualification, Some(Qualification::Bsc));
        assert_eq!(filters.sector, Some(Sector::It));
        assert_eq!(filters.location, Some(CityTier::Tier1));
        assert_eq!(filters.job_role, Some(JobRole::KycAnalyst));
    }

    #[test]
    fn test_sentinels_clear_the_dimension() {
        let mut filters = Filters::new();
        filters.set(FilterDimension::Sector, "Finance").unwrap();
        filters.set(FilterDimension::Sector, ALL_SECTORS).unwrap();
        assert_eq!(filters.sector, None);

        filters.set(FilterDimension::JobRole, "Telecaller").unwrap();
        filters.set(FilterDimension::JobRole, ALL_ROLES).unwrap();
        assert_eq!(filters.job_role, None);
    }

    #[test]
    fn test_unknown_labels_are_rejected() {
        let mut filters = Filters::new();
        assert!(filters.set(FilterDimension::Qualification, "PhD").is_err());
        assert!(filters.set(FilterDimension::Sector, "Mining").is_err());
        assert!(filters.set(FilterDimension::Location, "Tier 5").is_err());
        assert!(filters
            .set(FilterDimension::JobRole, "Chief Executive Officer")
            .is_err());
        // A sentinel belonging to another dimension is not valid either
        assert!(filters.set(FilterDimension::Sector, ALL_DEGREES).is_err());
    }

    #[test]
    fn test_role_catalog_labels_are_unique() {
        let mut labels: Vec<&str> = JobRole::ALL.iter().map(|r| r.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), JobRole::ALL.len());
        assert_eq!(JobRole::ALL.len(), 17);
    }

    #[test]
    fn test_labels_round_trip() {
        for tier in CityTier::ALL {
            assert_eq!(CityTier::from_label(tier.label()), Some(tier));
        }
        for role in JobRole::ALL {
            assert_eq!(JobRole::from_label(role.label()), Some(role));
        }
        assert_eq!(CityTier::from_label("Tier 1"), None);
    }
}
