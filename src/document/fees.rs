//! Tuition and transportation fee calculation.
//!
//! Unknown stages and paths never fail: they fall back to a zero tuition and a
//! zero surcharge respectively.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Stage, TransportationPath};

/// Charge for one bus route option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRate {
    /// Surcharge shown on its own line of the contract.
    pub surcharge: u32,
    /// Route fee added to the tuition total.
    pub fee: u32,
    /// Tax on `fee`, also added to the tuition total.
    pub vat: u32,
    /// Arabic label printed on the contract.
    pub label: String,
}

impl PathRate {
    /// Amount added to the base tuition when computing the total.
    pub fn addend(&self) -> u32 {
        self.fee.saturating_add(self.vat)
    }
}

/// Fixed rate table. The defaults are the published rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub kindergarten: u32,
    pub elementary: u32,
    pub middle: u32,
    pub high: u32,
    pub one_path: PathRate,
    pub two_paths: PathRate,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            kindergarten: 0,
            elementary: 24_100,
            middle: 25_100,
            high: 26_100,
            one_path: PathRate {
                surcharge: 3_450,
                fee: 3_000,
                vat: 450,
                label: "مسار واحد".to_string(),
            },
            two_paths: PathRate {
                surcharge: 5_750,
                fee: 5_000,
                vat: 750,
                label: "مسارين".to_string(),
            },
        }
    }
}

/// Fees for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub base_tuition: u32,
    pub transportation_surcharge: u32,
    /// Base tuition plus the route addend; equals the base tuition when no
    /// recognized route is selected.
    pub total: u32,
    /// Arabic route label, or the raw selection when it is not recognized.
    pub path_label: Option<String>,
}

impl FeeSchedule {
    pub fn tuition_for(&self, stage: Option<&Stage>) -> u32 {
        match stage {
            Some(Stage::Kindergarten) => self.kindergarten,
            Some(Stage::Elementary) => self.elementary,
            Some(Stage::Middle) => self.middle,
            Some(Stage::High) => self.high,
            Some(Stage::Other(raw)) => {
                log::warn!("No tuition rate for stage '{}', using 0", raw);
                0
            }
            None => 0,
        }
    }

    pub fn path_rate(&self, path: &TransportationPath) -> Option<&PathRate> {
        match path {
            TransportationPath::OnePath => Some(&self.one_path),
            TransportationPath::TwoPaths => Some(&self.two_paths),
            TransportationPath::Other(_) => None,
        }
    }

    /// Compute the fee breakdown for a stage and an optional bus route.
    pub fn compute(
        &self,
        stage: Option<&Stage>,
        path: Option<&TransportationPath>,
    ) -> FeeBreakdown {
        let base_tuition = self.tuition_for(stage);

        match path.and_then(|p| self.path_rate(p)) {
            Some(rate) => FeeBreakdown {
                base_tuition,
                transportation_surcharge: rate.surcharge,
                total: base_tuition.saturating_add(rate.addend()),
                path_label: Some(rate.label.clone()),
            },
            None => {
                if let Some(TransportationPath::Other(raw)) = path {
                    log::debug!("Unrecognized transportation path '{}', no surcharge", raw);
                }
                FeeBreakdown {
                    base_tuition,
                    transportation_surcharge: 0,
                    total: base_tuition,
                    path_label: path.map(|p| p.as_str().to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementary_one_path() {
        let fees = FeeSchedule::default()
            .compute(Some(&Stage::Elementary), Some(&TransportationPath::OnePath));
        assert_eq!(fees.base_tuition, 24_100);
        assert_eq!(fees.transportation_surcharge, 3_450);
        assert_eq!(fees.total, 27_550);
        assert_eq!(fees.path_label.as_deref(), Some("مسار واحد"));
    }

    #[test]
    fn test_middle_two_paths() {
        let fees = FeeSchedule::default()
            .compute(Some(&Stage::Middle), Some(&TransportationPath::TwoPaths));
        assert_eq!(fees.base_tuition, 25_100);
        assert_eq!(fees.transportation_surcharge, 5_750);
        assert_eq!(fees.total, 30_950);
        assert_eq!(fees.path_label.as_deref(), Some("مسارين"));
    }

    #[test]
    fn test_unknown_stage_has_no_tuition() {
        let stage = Stage::from("Nursery".to_string());
        let fees = FeeSchedule::default().compute(Some(&stage), Some(&TransportationPath::OnePath));
        assert_eq!(fees.base_tuition, 0);
        assert_eq!(fees.total, 3_450);
    }

    #[test]
    fn test_no_path_total_falls_back_to_tuition() {
        let fees = FeeSchedule::default().compute(Some(&Stage::High), None);
        assert_eq!(fees.base_tuition, 26_100);
        assert_eq!(fees.transportation_surcharge, 0);
        assert_eq!(fees.total, 26_100);
        assert_eq!(fees.path_label, None);
    }

    #[test]
    fn test_unknown_path_passes_label_through() {
        let path = TransportationPath::from("Three paths".to_string());
        let fees = FeeSchedule::default().compute(Some(&Stage::Kindergarten), Some(&path));
        assert_eq!(fees.base_tuition, 0);
        assert_eq!(fees.transportation_surcharge, 0);
        assert_eq!(fees.path_label.as_deref(), Some("Three paths"));
    }

    #[test]
    fn test_oversized_rates_saturate() {
        let schedule = FeeSchedule {
            high: u32::MAX - 10,
            one_path: PathRate {
                surcharge: 1,
                fee: u32::MAX,
                vat: 450,
                label: "مسار واحد".to_string(),
            },
            ..FeeSchedule::default()
        };
        let fees = schedule.compute(Some(&Stage::High), Some(&TransportationPath::OnePath));
        assert_eq!(fees.total, u32::MAX);
        assert_eq!(schedule.one_path.addend(), u32::MAX);
    }

    #[test]
    fn test_schedule_override_from_json() {
        let json = r#"{ "elementary": 30000 }"#;
        let schedule: FeeSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.elementary, 30_000);
        assert_eq!(schedule.middle, 25_100);
        assert_eq!(schedule.one_path.addend(), 3_450);
    }
}
