use serde::{Deserialize, Serialize};

/// Direction of a QR scan at the guard post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Entry,
    Exit,
}

impl ScanType {
    pub fn from_input(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "entry" | "in" => Some(Self::Entry),
            "exit" | "out" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Entry => "entry",
            ScanType::Exit => "exit",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, ScanType::Entry)
    }
}
