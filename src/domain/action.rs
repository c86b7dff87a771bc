use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

/// A payment action requested from the customer.
///
/// Constructed by the caller and consumed once per create/update call.
/// Amounts are in minor currency units. When `scope_id` is unset, the
/// request builder falls back to the configured client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PaymentAction {
    #[serde(rename = "ONE_TIME_PAYMENT")]
    OneTime {
        amount: u64,
        currency: Currency,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope_id: Option<String>,
    },
    #[serde(rename = "ON_FILE_PAYMENT")]
    OnFile {
        #[serde(skip_serializing_if = "Option::is_none")]
        scope_id: Option<String>,
    },
}

impl PaymentAction {
    pub fn one_time(amount: u64, currency: Currency) -> Self {
        Self::OneTime {
            amount,
            currency,
            scope_id: None,
        }
    }

    pub fn on_file() -> Self {
        Self::OnFile { scope_id: None }
    }

    pub fn scope_id(&self) -> Option<&str> {
        match self {
            Self::OneTime { scope_id, .. } | Self::OnFile { scope_id } => scope_id.as_deref(),
        }
    }

    /// Returns a copy with `scope_id` filled in from `client_id` if unset.
    pub(crate) fn with_scope_fallback(&self, client_id: &str) -> Self {
        let fallback = |scope: &Option<String>| {
            scope
                .clone()
                .or_else(|| Some(client_id.to_string()))
        };
        match self {
            Self::OneTime {
                amount,
                currency,
                scope_id,
            } => Self::OneTime {
                amount: *amount,
                currency: *currency,
                scope_id: fallback(scope_id),
            },
            Self::OnFile { scope_id } => Self::OnFile {
                scope_id: fallback(scope_id),
            },
        }
    }
}
