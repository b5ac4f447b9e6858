// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;

/// Safety verdict for one image or one whole route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Danger,
}

impl Verdict {
    /// Interpret a free-text model answer.
    ///
    /// Only an answer mentioning "danger" (any case) is dangerous; everything
    /// else, including empty or off-topic text, is safe.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().to_lowercase().contains("danger") {
            Verdict::Danger
        } else {
            Verdict::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Danger => "danger",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
