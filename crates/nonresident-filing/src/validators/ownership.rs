use serde::{Deserialize, Serialize};

/// One hundred percent expressed in basis points.
pub const FULL_OWNERSHIP_BASIS_POINTS: i64 = 10_000;

/// One owner's share of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipEntry {
    pub owner_id: String,
    pub percentage: f64,
}

impl OwnershipEntry {
    pub fn new(owner_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            owner_id: owner_id.into(),
            percentage,
        }
    }

    /// Share in basis points, rounding ties toward positive infinity.
    pub fn basis_points(&self) -> i64 {
        to_basis_points(self.percentage)
    }
}

/// Reason a set of ownership shares was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
pub enum OwnershipErrorCode {
    #[error("at least one owner is required")]
    AtLeastOneOwner,
    #[error("ownership shares add up to less than 100%")]
    PercentageUnder100,
    #[error("ownership shares add up to more than 100%")]
    PercentageOver100,
    #[error("every ownership share must be positive")]
    PercentageMustBePositive,
    #[error("an ownership share cannot exceed 100%")]
    PercentageExceeds100,
}

impl OwnershipErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            OwnershipErrorCode::AtLeastOneOwner => "atLeastOneOwner",
            OwnershipErrorCode::PercentageUnder100 => "percentageUnder100",
            OwnershipErrorCode::PercentageOver100 => "percentageOver100",
            OwnershipErrorCode::PercentageMustBePositive => "percentageMustBePositive",
            OwnershipErrorCode::PercentageExceeds100 => "percentageExceeds100",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<OwnershipErrorCode>,
}

impl From<Result<(), OwnershipErrorCode>> for OwnershipValidation {
    fn from(result: Result<(), OwnershipErrorCode>) -> Self {
        Self {
            valid: result.is_ok(),
            error_code: result.err(),
        }
    }
}

/// Check that `entries` account for exactly the whole property.
///
/// The total is compared in integer basis points. Per-entry bounds are only inspected
/// once the total is exact, so a lone 150 % share reports `PercentageOver100`.
pub fn check_ownership(entries: &[OwnershipEntry]) -> Result<(), OwnershipErrorCode> {
    if entries.is_empty() {
        return Err(OwnershipErrorCode::AtLeastOneOwner);
    }

    let total = total_basis_points(entries);
    if total != FULL_OWNERSHIP_BASIS_POINTS {
        return Err(if total < FULL_OWNERSHIP_BASIS_POINTS {
            OwnershipErrorCode::PercentageUnder100
        } else {
            OwnershipErrorCode::PercentageOver100
        });
    }

    for entry in entries {
        // Negated so that NaN is rejected too.
        if !(entry.percentage > 0.0) {
            return Err(OwnershipErrorCode::PercentageMustBePositive);
        }
        if entry.percentage > 100.0 {
            return Err(OwnershipErrorCode::PercentageExceeds100);
        }
    }

    Ok(())
}

pub fn validate_ownership_percentages(entries: &[OwnershipEntry]) -> OwnershipValidation {
    check_ownership(entries).into()
}

/// Where a running total stands relative to 100 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipBalance {
    Balanced,
    Under,
    Over,
}

/// Exact running total for the ownership table, shown before final submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipSummary {
    pub total_basis_points: i64,
    pub remaining_basis_points: i64,
    pub balance: OwnershipBalance,
    pub total_display: String,
}

pub fn ownership_summary(entries: &[OwnershipEntry]) -> OwnershipSummary {
    let total = total_basis_points(entries);
    let remaining = FULL_OWNERSHIP_BASIS_POINTS.saturating_sub(total);
    let balance = match total.cmp(&FULL_OWNERSHIP_BASIS_POINTS) {
        std::cmp::Ordering::Equal => OwnershipBalance::Balanced,
        std::cmp::Ordering::Less => OwnershipBalance::Under,
        std::cmp::Ordering::Greater => OwnershipBalance::Over,
    };

    OwnershipSummary {
        total_basis_points: total,
        remaining_basis_points: remaining,
        balance,
        total_display: format_hundredths(total),
    }
}

/// Render a value kept in hundredths (basis points, cents): `1234` becomes `"12.34"`.
pub fn format_hundredths(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100)
}

fn total_basis_points(entries: &[OwnershipEntry]) -> i64 {
    entries
        .iter()
        .fold(0i64, |sum, entry| sum.saturating_add(entry.basis_points()))
}

fn to_basis_points(percentage: f64) -> i64 {
    let scaled = percentage * 100.0;
    let rounded = scaled.round();
    // `f64::round` sends negative ties away from zero; pull them back up.
    let rounded = if rounded - scaled == -0.5 {
        rounded + 1.0
    } else {
        rounded
    };
    // Saturating cast: infinities clamp, NaN becomes 0.
    rounded as i64
}
