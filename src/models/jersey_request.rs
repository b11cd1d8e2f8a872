use std::fmt;
use std::str::FromStr;

use chrono::prelude::*;
use validator::Validate;

use super::common::*;
use errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Fulfilled => "fulfilled",
        }
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        use self::RequestStatus::*;

        match (*self, next) {
            (Pending, Approved) | (Pending, Rejected) | (Approved, Fulfilled) => true,
            _ => false,
        }
    }

    pub fn transition_to(self, next: RequestStatus) -> Result<RequestStatus, Error> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            other => Err(Error::invalid_input("status", format!("unknown request status '{}'", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JerseyRequest {
    pub id: JerseyRequestId,
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub jersey_name: String,
    pub team: String,
    pub league: Option<String>,
    pub size: String,
    pub additional_notes: Option<String>,
    pub status: RequestStatus,
    pub admin_response: Option<String>,
    pub whatsapp_contacted: bool,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub inquiry_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form submitted by a customer looking for a jersey outside the catalog
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct JerseyRequestPayload {
    #[validate(length(min = "1", max = "100", message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"), length(max = "255", message = "Email is too long"))]
    pub email: String,
    #[validate(length(min = "1", max = "20", message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = "1", max = "200", message = "Jersey name is required"))]
    pub jersey_name: String,
    #[validate(length(min = "1", max = "100", message = "Team is required"))]
    pub team: String,
    #[validate(length(max = "100", message = "League name is too long"))]
    pub league: Option<String>,
    #[validate(length(min = "1", max = "10", message = "Size is required"))]
    pub size: String,
    #[validate(length(max = "1000", message = "Notes are too long"))]
    pub additional_notes: Option<String>,
    /// Open a WhatsApp conversation right after submitting
    #[serde(default)]
    pub contact_via_whatsapp: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewJerseyRequest {
    pub id: JerseyRequestId,
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub jersey_name: String,
    pub team: String,
    pub league: Option<String>,
    pub size: String,
    pub additional_notes: Option<String>,
    pub status: RequestStatus,
    pub whatsapp_contacted: bool,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl JerseyRequestPayload {
    /// Trims every field, then validates. Nothing is written when this fails.
    pub fn into_new_request(self, user_id: Option<UserId>, now: DateTime<Utc>) -> Result<NewJerseyRequest, Error> {
        let payload = JerseyRequestPayload {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            jersey_name: self.jersey_name.trim().to_string(),
            team: self.team.trim().to_string(),
            league: non_blank(self.league),
            size: self.size.trim().to_string(),
            additional_notes: non_blank(self.additional_notes),
            contact_via_whatsapp: self.contact_via_whatsapp,
        };
        payload.validate().map_err(Error::Validate)?;

        let contacted = payload.contact_via_whatsapp;
        Ok(NewJerseyRequest {
            id: JerseyRequestId::new(),
            user_id,
            full_name: payload.full_name,
            email: payload.email,
            phone_number: payload.phone_number,
            jersey_name: payload.jersey_name,
            team: payload.team,
            league: payload.league,
            size: payload.size,
            additional_notes: payload.additional_notes,
            status: RequestStatus::Pending,
            whatsapp_contacted: contacted,
            last_contacted_at: if contacted { Some(now) } else { None },
            created_at: now,
        })
    }
}

impl From<NewJerseyRequest> for JerseyRequest {
    fn from(v: NewJerseyRequest) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            full_name: v.full_name,
            email: v.email,
            phone_number: v.phone_number,
            jersey_name: v.jersey_name,
            team: v.team,
            league: v.league,
            size: v.size,
            additional_notes: v.additional_notes,
            status: v.status,
            admin_response: None,
            whatsapp_contacted: v.whatsapp_contacted,
            last_contacted_at: v.last_contacted_at,
            inquiry_id: None,
            created_at: v.created_at,
            updated_at: v.created_at,
        }
    }
}

/// Result of submitting a request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmittedJerseyRequest {
    pub request: JerseyRequest,
    pub whatsapp_link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JerseyRequestFilter {
    pub id: Option<JerseyRequestId>,
    pub user_id: Option<UserId>,
}

impl From<JerseyRequestId> for JerseyRequestFilter {
    fn from(id: JerseyRequestId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JerseyRequestUpdateData {
    pub status: Option<RequestStatus>,
    pub admin_response: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JerseyRequestUpdater {
    pub filter: JerseyRequestFilter,
    pub data: JerseyRequestUpdateData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestStatusPayload {
    pub status: RequestStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct RequestResponsePayload {
    #[validate(length(min = "1", max = "2000", message = "Response cannot be empty"))]
    pub admin_response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> JerseyRequestPayload {
        JerseyRequestPayload {
            full_name: " Ada Obi ".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "08012345678".to_string(),
            jersey_name: "1994 World Cup Home".to_string(),
            team: "Nigeria".to_string(),
            league: Some("  ".to_string()),
            size: "L".to_string(),
            additional_notes: None,
            contact_via_whatsapp: true,
        }
    }

    #[test]
    fn request_lifecycle() {
        use self::RequestStatus::*;

        assert_eq!(Pending.transition_to(Approved).unwrap(), Approved);
        assert_eq!(Pending.transition_to(Rejected).unwrap(), Rejected);
        assert_eq!(Approved.transition_to(Fulfilled).unwrap(), Fulfilled);

        assert!(Pending.transition_to(Fulfilled).is_err());
        assert!(Rejected.transition_to(Approved).is_err());
        assert!(Fulfilled.transition_to(Pending).is_err());
        assert!(Approved.transition_to(Approved).is_err());
    }

    #[test]
    fn submission_is_trimmed_and_marked_contacted() {
        let now = Utc::now();
        let request = payload().into_new_request(None, now).unwrap();

        assert_eq!(request.full_name, "Ada Obi");
        assert_eq!(request.league, None);
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.whatsapp_contacted);
        assert_eq!(request.last_contacted_at, Some(now));
    }

    #[test]
    fn missing_required_field_fails_validation() {
        let mut p = payload();
        p.phone_number = "   ".to_string();

        match p.into_new_request(None, Utc::now()) {
            Err(Error::Validate(errors)) => assert!(errors.field_errors().contains_key("phone_number")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_email_fails_validation() {
        let mut p = payload();
        p.email = "not-an-email".to_string();

        match p.into_new_request(None, Utc::now()) {
            Err(Error::Validate(errors)) => assert!(errors.field_errors().contains_key("email")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn status_parses_from_lowercase() {
        assert_eq!("approved".parse::<RequestStatus>().unwrap(), RequestStatus::Approved);
        assert!("Approved".parse::<RequestStatus>().is_err());
    }
}
