use chrono::Utc;
use failure::Error as FailureError;
use validator::Validate;

use super::contact::{business_number, link_for};
use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;
use repos::*;
use whatsapp;

pub trait JerseyRequestService {
    /// Records a request for a jersey outside the catalog
    fn submit(&self, payload: JerseyRequestPayload, user_agent: Option<String>) -> ServiceFuture<SubmittedJerseyRequest>;
    fn list_mine(&self) -> ServiceFuture<Vec<JerseyRequest>>;
    fn list_all(&self) -> ServiceFuture<Vec<JerseyRequest>>;
    fn set_status(&self, request_id: JerseyRequestId, status: RequestStatus) -> ServiceFuture<JerseyRequest>;
    /// Stores the admin's answer and marks the customer as contacted
    fn respond(&self, request_id: JerseyRequestId, payload: RequestResponsePayload) -> ServiceFuture<JerseyRequest>;
}

pub struct JerseyRequestServiceImpl {
    pub ctx: ServiceContext,
}

fn get_request(session: &mut RepoSession, request_id: JerseyRequestId) -> Result<JerseyRequest, FailureError> {
    let request = session.jersey_requests().select_one(request_id.into())?;
    Ok(request.ok_or(Error::NotFound)?)
}

fn update_request(session: &mut RepoSession, request_id: JerseyRequestId, data: JerseyRequestUpdateData) -> Result<JerseyRequest, FailureError> {
    let updated = session.jersey_requests().update(JerseyRequestUpdater {
        filter: request_id.into(),
        data,
    })?;
    Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
}

impl JerseyRequestService for JerseyRequestServiceImpl {
    fn submit(&self, payload: JerseyRequestPayload, user_agent: Option<String>) -> ServiceFuture<SubmittedJerseyRequest> {
        let login = self.ctx.login.clone();
        let whatsapp_config = self.ctx.whatsapp.clone();
        self.ctx.spawn_on_pool(move |session| {
            let new_request = payload.into_new_request(login.user_id(), Utc::now())?;
            let request = session.jersey_requests().insert(new_request)?;
            info!("Jersey request {} submitted for {} {}", request.id, request.team, request.jersey_name);

            let whatsapp_link = if request.whatsapp_contacted {
                let message = whatsapp::custom_request_message(
                    &request.team,
                    request.league.as_ref().map(String::as_str).unwrap_or(""),
                    &request.jersey_name,
                    &request.size,
                    Some(&request.full_name),
                );
                let number = business_number(session, &whatsapp_config)?;
                Some(link_for(&whatsapp_config, &number, &message, user_agent.as_ref().map(String::as_str)))
            } else {
                None
            };

            Ok(SubmittedJerseyRequest { request, whatsapp_link })
        })
    }

    fn list_mine(&self) -> ServiceFuture<Vec<JerseyRequest>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            Ok(session.jersey_requests().select(JerseyRequestFilter {
                user_id: Some(user_id),
                ..Default::default()
            })?)
        })
    }

    fn list_all(&self) -> ServiceFuture<Vec<JerseyRequest>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            Ok(session.jersey_requests().select(JerseyRequestFilter::default())?)
        })
    }

    fn set_status(&self, request_id: JerseyRequestId, status: RequestStatus) -> ServiceFuture<JerseyRequest> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            acl::ensure_admin(&login)?;
            let request = get_request(session, request_id)?;
            let status = request.status.transition_to(status)?;
            info!("Jersey request {} moves from {} to {}", request_id, request.status, status);

            update_request(
                session,
                request_id,
                JerseyRequestUpdateData {
                    status: Some(status),
                    ..Default::default()
                },
            )
        })
    }

    fn respond(&self, request_id: JerseyRequestId, payload: RequestResponsePayload) -> ServiceFuture<JerseyRequest> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            let admin_response = payload.admin_response.trim().to_string();
            RequestResponsePayload {
                admin_response: admin_response.clone(),
            }.validate()
                .map_err(Error::Validate)?;
            get_request(session, request_id)?;

            update_request(
                session,
                request_id,
                JerseyRequestUpdateData {
                    admin_response: Some(admin_response),
                    last_contacted_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
        })
    }
}
