//! Supervisor Records, Line Assignments and the Balance Feed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Working shift assigned to a line or a supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    A,
    B,
    C,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::A, Shift::B, Shift::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::A => "A",
            Shift::B => "B",
            Shift::C => "C",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Shift::A),
            "B" | "b" => Ok(Shift::B),
            "C" | "c" => Ok(Shift::C),
            other => Err(format!("unknown shift: {other:?}")),
        }
    }
}

/// Supervisor record as stored by `/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    /// Server-assigned identifier, absent on creation
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::wire::lenient_opt_string"
    )]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    /// Alert category this supervisor answers for (e.g. "Qualité")
    #[serde(rename = "type")]
    pub kind: String,
    /// Line type: MR, IR, VIDEO, ARBEIT
    pub genre: String,
    /// Rank: Technician, Supervisor, Assistant Director, Director
    pub level: String,
    pub post: String,
    /// Phone number
    pub tlp: String,
    /// Server-assigned registration date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Line name with its current shift, as served by `/test-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAssignment {
    pub name: String,
    #[serde(default, deserialize_with = "crate::wire::lenient_opt_string")]
    pub post: Option<String>,
}

/// Body of `/get-balance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub code: String,
    #[serde(default, deserialize_with = "crate::wire::lenient_f64")]
    pub balance: Option<f64>,
}

impl BalanceReport {
    /// Code the backend uses for a valid reading
    pub const OK: &'static str = "ok";

    /// The balance, if the backend marked the reading as valid
    pub fn value(&self) -> Option<f64> {
        if self.code == Self::OK {
            self.balance
        } else {
            None
        }
    }

    /// Above the threshold the dashboard shows the balance in green
    pub fn is_healthy(balance: f64, threshold: f64) -> bool {
        balance > threshold
    }
}
