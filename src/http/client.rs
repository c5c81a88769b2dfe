use std::collections::HashMap;

use axum::http::Method;

use super::{form_data, Request, Response, SessionChange, Site};
use crate::auth::Principal;
use crate::entity::User;

/// In-process client bound to one site.
///
/// Each client carries its own principal. Login and logout responses update
/// it the way a browser session cookie would.
pub struct Client<'a> {
    site: &'a dyn Site,
    principal: Principal,
}

impl<'a> Client<'a> {
    pub fn anonymous(site: &'a dyn Site) -> Self {
        Self {
            site,
            principal: Principal::Anonymous,
        }
    }

    /// A client already logged in as `user`
    pub fn logged_in(site: &'a dyn Site, user: User) -> Self {
        Self {
            site,
            principal: Principal::User(user),
        }
    }

    pub fn force_login(&mut self, user: User) {
        self.principal = Principal::User(user);
    }

    pub fn logout(&mut self) {
        self.principal = Principal::Anonymous;
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// GET a path. A `?key=value&...` suffix is split into the query.
    pub fn get(&mut self, path: &str) -> Response {
        self.send(Method::GET, path, &[])
    }

    pub fn post(&mut self, path: &str, form: &[(&str, &str)]) -> Response {
        self.send(Method::POST, path, form)
    }

    pub fn delete(&mut self, path: &str) -> Response {
        self.send(Method::DELETE, path, &[])
    }

    fn send(&mut self, method: Method, target: &str, form: &[(&str, &str)]) -> Response {
        let (path, query) = split_target(target);
        let request = Request::new(method, path, self.principal.clone())
            .with_query(query)
            .with_form(form_data(form));
        let response = self.site.handle(&request);
        match &response.session {
            Some(SessionChange::Login(user)) => self.principal = Principal::User(user.clone()),
            Some(SessionChange::Logout) => self.principal = Principal::Anonymous,
            None => {}
        }
        response
    }
}

fn split_target(target: &str) -> (&str, HashMap<String, String>) {
    let (path, raw_query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };
    let query = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();
    (path, query)
}
