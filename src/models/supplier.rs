use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supplier {
    Grainger,
    #[serde(rename = "McMaster-Carr")]
    McMasterCarr,
    Fastenal,
}

impl Supplier {
    pub const ALL: [Supplier; 3] = [Supplier::Grainger, Supplier::McMasterCarr, Supplier::Fastenal];

    pub fn key(&self) -> &'static str {
        match self {
            Supplier::Grainger => "grainger",
            Supplier::McMasterCarr => "mcmaster",
            Supplier::Fastenal => "fastenal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "grainger" => Some(Supplier::Grainger),
            "mcmaster" => Some(Supplier::McMasterCarr),
            "fastenal" => Some(Supplier::Fastenal),
            _ => None,
        }
    }

    /// Name as published in responses.
    pub fn display_name(&self) -> &'static str {
        match self {
            Supplier::Grainger => "Grainger",
            Supplier::McMasterCarr => "McMaster-Carr",
            Supplier::Fastenal => "Fastenal",
        }
    }

    pub fn default_origin(&self) -> &'static str {
        match self {
            Supplier::Grainger => "https://www.grainger.com",
            Supplier::McMasterCarr => "https://www.mcmaster.com",
            Supplier::Fastenal => "https://www.fastenal.com",
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
