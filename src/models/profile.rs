use chrono::prelude::*;
use validator::Validate;

use super::common::*;
use errors::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub delivery_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProfileUpdatePayload {
    #[validate(length(max = "100", message = "Name is too long"))]
    pub full_name: Option<String>,
    #[validate(length(max = "20", message = "Phone number is too long"))]
    pub phone_number: Option<String>,
    #[validate(length(max = "500", message = "Address is too long"))]
    pub delivery_address: Option<String>,
    #[validate(length(max = "100", message = "City is too long"))]
    pub city: Option<String>,
    #[validate(length(max = "100", message = "State is too long"))]
    pub state: Option<String>,
}

/// Profile columns a customer may change. `Some(None)` clears the column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdateData {
    pub full_name: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub delivery_address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
}

impl ProfileUpdatePayload {
    pub fn into_update_data(self) -> Result<ProfileUpdateData, Error> {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        let payload = ProfileUpdatePayload {
            full_name: trim(self.full_name),
            phone_number: trim(self.phone_number),
            delivery_address: trim(self.delivery_address),
            city: trim(self.city),
            state: trim(self.state),
        };
        payload.validate().map_err(Error::Validate)?;

        let clearable = |v: Option<String>| v.map(|s| if s.is_empty() { None } else { Some(s) });
        Ok(ProfileUpdateData {
            full_name: clearable(payload.full_name),
            phone_number: clearable(payload.phone_number),
            delivery_address: clearable(payload.delivery_address),
            city: clearable(payload.city),
            state: clearable(payload.state),
        })
    }
}

impl ProfileUpdateData {
    pub fn apply(&self, profile: &mut Profile) {
        let fields = vec![
            (&self.full_name, &mut profile.full_name),
            (&self.phone_number, &mut profile.phone_number),
            (&self.delivery_address, &mut profile.delivery_address),
            (&self.city, &mut profile.city),
            (&self.state, &mut profile.state),
        ];
        for (update, field) in fields {
            if let Some(value) = update {
                *field = value.clone();
            }
        }
        profile.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub data: ProfileUpdateData,
    pub created_at: DateTime<Utc>,
}

impl NewProfile {
    pub fn new(user_id: UserId, data: ProfileUpdateData) -> Self {
        Self {
            id: ProfileId::new(),
            user_id,
            data,
            created_at: Utc::now(),
        }
    }
}

impl From<NewProfile> for Profile {
    fn from(v: NewProfile) -> Self {
        let mut profile = Profile {
            id: v.id,
            user_id: v.user_id,
            full_name: None,
            phone_number: None,
            delivery_address: None,
            city: None,
            state: None,
            avatar_url: None,
            is_admin: false,
            created_at: v.created_at,
            updated_at: v.created_at,
        };
        v.data.apply(&mut profile);
        profile.updated_at = v.created_at;
        profile
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileFilter {
    pub user_id: Option<UserId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileUpdater {
    pub filter: ProfileFilter,
    pub data: ProfileUpdateData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_clear_and_missing_fields_stay() {
        let data = ProfileUpdatePayload {
            full_name: Some(" Ngozi ".to_string()),
            city: Some("".to_string()),
            ..Default::default()
        }.into_update_data()
            .unwrap();

        let mut profile: Profile = NewProfile::new(
            UserId::new(),
            ProfileUpdateData {
                city: Some(Some("Abuja".to_string())),
                state: Some(Some("FCT".to_string())),
                ..Default::default()
            },
        ).into();
        data.apply(&mut profile);

        assert_eq!(profile.full_name, Some("Ngozi".to_string()));
        assert_eq!(profile.city, None);
        assert_eq!(profile.state, Some("FCT".to_string()));
    }

    #[test]
    fn long_phone_is_rejected() {
        let payload = ProfileUpdatePayload {
            phone_number: Some("1".repeat(21)),
            ..Default::default()
        };

        assert!(payload.into_update_data().is_err());
    }
}
