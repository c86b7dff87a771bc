use serde::{Deserialize, Serialize};

/// Server-reported status of a payment request.
///
/// Unrecognized wire strings deserialize to `Unknown`; the machine treats
/// `Unknown` as a defensive failure path when it has to make a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Processing,
    Approved,
    Declined,
    #[serde(other)]
    Unknown,
}

/// A token-like object returned once a payment has been authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<String>,
}

/// Triggers the server provides to continue authorization out-of-process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlowTriggers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshes_at: Option<u64>,
}

/// The latest server-reported snapshot of a payment request.
///
/// Owned by whichever machine state currently carries it and replaced
/// wholesale on each successful network result, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_flow_triggers: Option<AuthFlowTriggers>,
}

impl PaymentRequest {
    /// The authorization-success condition: approved with at least one grant.
    pub fn is_approved_with_grants(&self) -> bool {
        self.status == RequestStatus::Approved && !self.grants.is_empty()
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.auth_flow_triggers
            .as_ref()
            .and_then(|t| t.redirect_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_status_deserializes_to_unknown() {
        let json = r#"{"id": "req_1", "status": "SOMETHING_NEW"}"#;
        let request: PaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::Unknown);
        assert!(request.grants.is_empty());
    }

    #[test]
    fn test_approval_requires_grants() {
        let mut request = PaymentRequest {
            id: "req_1".to_string(),
            status: RequestStatus::Approved,
            grants: vec![],
            auth_flow_triggers: None,
        };
        assert!(!request.is_approved_with_grants());

        request.grants.push(Grant {
            id: "grant_1".to_string(),
            customer_id: None,
            grant_type: None,
        });
        assert!(request.is_approved_with_grants());
    }

    #[test]
    fn test_empty_redirect_url_is_absent() {
        let request = PaymentRequest {
            id: "req_1".to_string(),
            status: RequestStatus::Pending,
            grants: vec![],
            auth_flow_triggers: Some(AuthFlowTriggers {
                redirect_url: Some(String::new()),
                qr_code_url: None,
                refreshes_at: None,
            }),
        };
        assert_eq!(request.redirect_url(), None);
    }
}
