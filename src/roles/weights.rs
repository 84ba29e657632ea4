//! Vote weights of the executive roles.

use crate::core::{Error, Result};
use crate::roles::ExecutiveRole;
use serde::{Deserialize, Serialize};

/// Total weight held by the executive roles together.
pub const TOTAL_WEIGHT: i32 = 100;

/// Static mapping from executive role to signed vote weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWeightTable {
    pub cto: i32,
    pub ceo: i32,
    pub coo: i32,
}

impl RoleWeightTable {
    /// Build a table; fails unless every weight is positive and they sum to 100.
    pub fn new(cto: i32, ceo: i32, coo: i32) -> Result<Self> {
        let table = Self { cto, ceo, coo };
        table.validate()?;
        Ok(table)
    }

    /// Check the table invariants.
    pub fn validate(&self) -> Result<()> {
        if ExecutiveRole::ALL.iter().any(|exec| self.weight_of(*exec) <= 0) {
            return Err(Error::InvalidConfig(
                "every executive weight must be positive".to_string(),
            ));
        }
        let total = self.total();
        if total != TOTAL_WEIGHT {
            return Err(Error::InvalidConfig(format!(
                "executive weights must sum to {}, got {}",
                TOTAL_WEIGHT, total
            )));
        }
        Ok(())
    }

    /// Weight of an executive role.
    pub fn weight_of(&self, role: ExecutiveRole) -> i32 {
        match role {
            ExecutiveRole::Cto => self.cto,
            ExecutiveRole::Ceo => self.ceo,
            ExecutiveRole::Coo => self.coo,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> i32 {
        self.cto + self.ceo + self.coo
    }
}

impl Default for RoleWeightTable {
    fn default() -> Self {
        Self {
            cto: 32,
            ceo: 36,
            coo: 32,
        }
    }
}
