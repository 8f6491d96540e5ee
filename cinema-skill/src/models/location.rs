use serde::{Deserialize, Serialize};

/// Per-user progress of collecting the home location.
///
/// Both flags false means the user was never asked. `in_progress` is set while
/// the skill waits for an address, `completed` once it has been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationState {
    pub in_progress: bool,
    pub completed: bool,
    pub city: String,
    pub subway: String,
}

/// Where a user is in the dialog, derived from their [`LocationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStage {
    New,
    AwaitingLocation,
    Ready,
}

impl std::fmt::Display for DialogStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::AwaitingLocation => write!(f, "awaiting_location"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

impl LocationState {
    pub fn stage(&self) -> DialogStage {
        if self.completed {
            DialogStage::Ready
        } else if self.in_progress {
            DialogStage::AwaitingLocation
        } else {
            DialogStage::New
        }
    }

    /// The skill has asked for an address and waits for the answer.
    pub fn await_location(&mut self) {
        self.in_progress = true;
        self.completed = false;
    }

    /// A freshly resolved address replaces whatever was stored before.
    pub fn resolved(location: ResolvedLocation) -> Self {
        Self {
            in_progress: false,
            completed: true,
            city: location.city,
            subway: location.subway,
        }
    }

    /// Spoken form of the stored address.
    pub fn describe(&self) -> String {
        if self.subway.is_empty() {
            format!("Ваш адрес: город {}", self.city)
        } else {
            format!("Ваш адрес: город {}, метро {}", self.city, self.subway)
        }
    }
}

/// Result of geocoding a spoken address. `subway` is empty for cities without a metro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub city: String,
    pub subway: String,
}
