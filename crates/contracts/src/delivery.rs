//! DeliveryOutcome - result of a retrying remote delivery

/// Whether the records reached the remote endpoint, and after how many attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Endpoint answered with a success status
    Delivered { attempts: u32, status: u16 },
    /// Every attempt failed; `last_failure` describes the final one
    NotDelivered { attempts: u32, last_failure: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Number of POST attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts, .. } | Self::NotDelivered { attempts, .. } => *attempts,
        }
    }
}
